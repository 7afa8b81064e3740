//! Zero-copy field decoder
//!
//! [`Cursor`] reads from a shared [`Bytes`] buffer. String, blob and unknown
//! bodies are split off the buffer without copying.

use bytes::{Buf, Bytes};

use crate::dynint::DynInt;
use crate::error::{Error, Result};
use crate::size;
use crate::tag::{LogicalType, TypeTag};
use crate::uuid::{self, UUID_LEN};
use crate::value::Value;
use crate::MAX_NESTING_DEPTH;

/// Cursor over an encoded buffer
#[derive(Debug, Clone)]
pub struct Cursor {
    buf: Bytes,
}

impl Cursor {
    /// Create a cursor positioned at the start of `buf`
    #[inline]
    pub fn new(buf: Bytes) -> Self {
        Self { buf }
    }

    /// Get remaining bytes in cursor
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    /// Check if cursor is at end
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    fn ensure(&self, n: usize) -> Result<()> {
        if self.buf.len() < n {
            return Err(Error::UnexpectedEof);
        }
        Ok(())
    }

    /// Skip bytes in the cursor
    #[inline]
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.buf.advance(n);
        Ok(())
    }

    /// Read a u8 value
    #[inline]
    pub fn get_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.buf.get_u8())
    }

    /// Read a u16 value (little-endian)
    #[inline]
    pub fn get_u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        Ok(self.buf.get_u16_le())
    }

    /// Read a u32 value (little-endian)
    #[inline]
    pub fn get_u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(self.buf.get_u32_le())
    }

    /// Read a u64 value (little-endian)
    #[inline]
    pub fn get_u64(&mut self) -> Result<u64> {
        self.ensure(8)?;
        Ok(self.buf.get_u64_le())
    }

    /// Read an IEEE-754 double (little-endian)
    #[inline]
    pub fn get_f64(&mut self) -> Result<f64> {
        self.ensure(8)?;
        Ok(self.buf.get_f64_le())
    }

    /// Read raw bytes without length prefix
    #[inline]
    pub fn get_bytes(&mut self, len: u64) -> Result<Bytes> {
        let len = usize::try_from(len).map_err(|_| Error::UnexpectedEof)?;
        self.ensure(len)?;
        Ok(self.buf.split_to(len))
    }

    /// Read a size prefix
    #[inline]
    pub fn get_size(&mut self) -> Result<u64> {
        let (value, consumed) = size::decode(&self.buf)?;
        self.buf.advance(consumed);
        Ok(value)
    }

    /// Read bytes with a size prefix
    #[inline]
    pub fn get_prefixed(&mut self) -> Result<Bytes> {
        let len = self.get_size()?;
        self.get_bytes(len)
    }

    /// Read a tag byte
    #[inline]
    pub fn get_tag(&mut self) -> Result<TypeTag> {
        Ok(TypeTag::unpack(self.get_u8()?))
    }
}

/// Decode a sequence of tagged fields until `buf` is exhausted
pub fn decode_fields(buf: Bytes) -> Result<Vec<Value>> {
    decode_fields_at(buf, 0)
}

fn decode_fields_at(buf: Bytes, depth: usize) -> Result<Vec<Value>> {
    let mut cur = Cursor::new(buf);
    let mut values = Vec::new();
    while !cur.is_at_end() {
        let tag = cur.get_tag()?;
        values.push(decode_value(tag, &mut cur, depth)?);
    }
    Ok(values)
}

fn descend(depth: usize) -> Result<usize> {
    let next = depth + 1;
    if next > MAX_NESTING_DEPTH {
        return Err(Error::NestingTooDeep(next));
    }
    Ok(next)
}

/// Decode one value body whose tag has already been read
///
/// `depth` is the nesting level of the value; payload fields are at 0.
pub fn decode_value(tag: TypeTag, cur: &mut Cursor, depth: usize) -> Result<Value> {
    if !tag.is_known() {
        return decode_unknown(tag, cur);
    }
    if tag.empty {
        return Ok(Value::absent(tag.logical));
    }

    let value = match tag.logical {
        LogicalType::U8 => Value::U8(Some(cur.get_u8()?)),
        LogicalType::U32 => Value::U32(Some(cur.get_u32()?)),
        LogicalType::U64 => Value::U64(Some(cur.get_u64()?)),
        LogicalType::Double => Value::Double(Some(cur.get_f64()?)),
        LogicalType::Bool => Value::Bool(Some(cur.get_u8()? == 0x01)),
        LogicalType::String => Value::String(Some(cur.get_prefixed()?)),
        LogicalType::Blob => Value::Blob(Some(cur.get_prefixed()?)),
        LogicalType::Uuid => {
            let raw = cur.get_bytes(UUID_LEN as u64)?;
            Value::Uuid(Some(uuid::format(&raw)))
        }
        LogicalType::DynInt => Value::DynInt(Some(DynInt::decode(cur)?)),
        LogicalType::Struct => {
            let inner = cur.get_prefixed()?;
            Value::Struct(Some(decode_fields_at(inner, descend(depth)?)?))
        }
        LogicalType::Array => decode_array(cur, descend(depth)?)?,
        LogicalType::Any => decode_any(cur, descend(depth)?)?,
        LogicalType::Unknown => return decode_unknown(tag, cur),
    };
    Ok(value)
}

fn decode_unknown(tag: TypeTag, cur: &mut Cursor) -> Result<Value> {
    if tag.empty {
        return Ok(Value::Unknown {
            type_id: tag.type_id,
            body: None,
        });
    }
    if !tag.length_prefixed {
        return Err(Error::UnknownUndecodableType(tag.type_id));
    }

    let body = cur.get_prefixed()?;
    tracing::warn!(type_id = tag.type_id, len = body.len(), "skipping field of unknown type");
    Ok(Value::Unknown {
        type_id: tag.type_id,
        body: Some(body),
    })
}

fn decode_array(cur: &mut Cursor, depth: usize) -> Result<Value> {
    let inner_len = cur.get_size()?;
    let tag_byte = cur.get_u8()?;
    let element = TypeTag::unpack(tag_byte);
    if element.empty {
        return Err(Error::MalformedArray(tag_byte));
    }
    if !element.is_known() && !element.length_prefixed {
        return Err(Error::UnknownUndecodableType(element.type_id));
    }

    let count = cur.get_size()?;
    let inner = cur.get_bytes(inner_len)?;

    // Every element occupies at least one byte
    let capacity = count.min(inner.len() as u64) as usize;
    let mut items = Vec::with_capacity(capacity);
    let mut sub = Cursor::new(inner);
    while !sub.is_at_end() {
        items.push(decode_value(element, &mut sub, depth)?);
    }

    if items.len() as u64 != count {
        tracing::debug!(declared = count, decoded = items.len(), "array element count mismatch");
    }
    Ok(Value::Array(Some(items)))
}

fn decode_any(cur: &mut Cursor, depth: usize) -> Result<Value> {
    let inner = cur.get_prefixed()?;
    if inner.is_empty() {
        return Err(Error::UnexpectedEof);
    }

    let mut sub = Cursor::new(inner);
    let tag = sub.get_tag()?;
    let held = decode_value(tag, &mut sub, depth)?;
    if !sub.is_at_end() {
        return Err(Error::TrailingAnyBytes(sub.remaining()));
    }
    Ok(Value::any(held))
}
