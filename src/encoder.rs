//! Field encoder
//!
//! The encoder appends to a growable buffer. Composite values (structs,
//! arrays, `any`) are first encoded into a child encoder so their inner
//! length is known before the size prefix is written.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Error, Result};
use crate::schema::{ArraySchema, Cardinality, FieldSchema, Schema};
use crate::size;
use crate::tag::{LogicalType, TypeTag};
use crate::uuid;
use crate::value::Value;

/// Appending encoder for fields and primitives
#[derive(Debug, Default)]
pub struct Encoder {
    buf: BytesMut,
}

impl Encoder {
    /// Create an empty encoder
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an encoder with preallocated capacity
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// Write a u8 value
    #[inline]
    pub fn put_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    /// Write a u16 value (little-endian)
    #[inline]
    pub fn put_u16(&mut self, value: u16) {
        self.buf.put_u16_le(value);
    }

    /// Write a u32 value (little-endian)
    #[inline]
    pub fn put_u32(&mut self, value: u32) {
        self.buf.put_u32_le(value);
    }

    /// Write a u64 value (little-endian)
    #[inline]
    pub fn put_u64(&mut self, value: u64) {
        self.buf.put_u64_le(value);
    }

    /// Write an IEEE-754 double (little-endian)
    #[inline]
    pub fn put_f64(&mut self, value: f64) {
        self.buf.put_f64_le(value);
    }

    /// Write a bool as `0x01`/`0x00`
    #[inline]
    pub fn put_bool(&mut self, value: bool) {
        self.buf.put_u8(u8::from(value));
    }

    /// Write a type tag byte
    #[inline]
    pub fn put_tag(&mut self, tag: TypeTag) {
        self.buf.put_u8(tag.pack());
    }

    /// Write a size prefix
    #[inline]
    pub fn put_size(&mut self, value: u64) {
        size::encode(value, &mut self.buf);
    }

    /// Write raw bytes without length prefix
    #[inline]
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }

    /// Write bytes with a size prefix
    #[inline]
    pub fn put_prefixed(&mut self, bytes: &[u8]) {
        self.put_size(bytes.len() as u64);
        self.put_bytes(bytes);
    }

    /// Number of bytes written so far
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written yet
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Get a slice of the encoded data
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Finish encoding and take the buffer
    #[inline]
    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }

    /// Encode one field
    ///
    /// With `write_tag` unset the tag is omitted and an absent value writes
    /// nothing; array elements use this form.
    pub fn encode_field(&mut self, field: &FieldSchema, value: &Value, write_tag: bool) -> Result<()> {
        let found = value.logical_type();
        if field.kind == LogicalType::Unknown || found != field.kind {
            return Err(Error::TypeMismatch {
                expected: field.kind,
                found,
            });
        }

        let tag = TypeTag::new(field.kind);
        if !value.is_present() {
            if write_tag {
                self.put_tag(tag.absent());
            }
            return Ok(());
        }

        if write_tag {
            self.put_tag(tag);
        }

        match value {
            Value::U8(Some(v)) => self.put_u8(*v),
            Value::U32(Some(v)) => self.put_u32(*v),
            Value::U64(Some(v)) => self.put_u64(*v),
            Value::Double(Some(v)) => self.put_f64(*v),
            Value::Bool(Some(v)) => self.put_bool(*v),
            Value::String(Some(b)) | Value::Blob(Some(b)) => self.put_prefixed(b),
            Value::Uuid(Some(text)) => self.put_bytes(&uuid::parse(text)?),
            Value::DynInt(Some(d)) => d.encode(self),
            Value::Array(Some(items)) => {
                let array = field
                    .array
                    .as_ref()
                    .ok_or(Error::InvalidArrayType(LogicalType::Unknown))?;
                self.encode_array(array, field, items)?;
            }
            Value::Struct(Some(fields)) => {
                let nested = field.nested.as_ref().ok_or(Error::MissingNestedSchema(0))?;
                self.encode_struct(nested, fields, false)?;
            }
            Value::Any(Some(inner)) => self.encode_any(inner)?,
            // Absent values returned above and Unknown never matches a field kind.
            _ => {
                return Err(Error::TypeMismatch {
                    expected: field.kind,
                    found,
                })
            }
        }
        Ok(())
    }

    /// Encode a struct body
    ///
    /// A root struct is the whole message payload and is written without a
    /// size prefix. The struct's own tag, if any, is written by the caller.
    pub fn encode_struct(&mut self, schema: &Schema, values: &[Value], root: bool) -> Result<()> {
        if schema.len() != values.len() {
            return Err(Error::FieldCountMismatch {
                expected: schema.len(),
                found: values.len(),
            });
        }

        let mut inner = Encoder::new();
        for (index, (field, value)) in schema.fields().iter().zip(values).enumerate() {
            if field.kind == LogicalType::Struct && field.nested.is_none() && value.is_present() {
                return Err(Error::MissingNestedSchema(index));
            }
            inner.encode_field(field, value, true)?;
        }

        if !root {
            self.put_size(inner.len() as u64);
        }
        self.put_bytes(inner.as_slice());
        Ok(())
    }

    /// Encode an array body: inner length, element tag, element count, elements
    fn encode_array(&mut self, array: &ArraySchema, field: &FieldSchema, items: &[Value]) -> Result<()> {
        if array.element == LogicalType::Unknown || array.element == LogicalType::Array {
            return Err(Error::InvalidArrayType(array.element));
        }
        if array.element == LogicalType::Struct && field.nested.is_none() {
            return Err(Error::MissingNestedSchema(0));
        }

        let element = FieldSchema {
            kind: array.element,
            array: None,
            nested: field.nested.clone(),
        };

        let mut inner = Encoder::new();
        for (index, item) in items.iter().enumerate() {
            if !item.is_present() {
                return Err(Error::AbsentArrayElement(index));
            }
            inner.encode_field(&element, item, false)?;
        }

        self.put_size(inner.len() as u64);
        self.put_tag(TypeTag::new(array.element));
        self.put_size(items.len() as u64);
        self.put_bytes(inner.as_slice());
        Ok(())
    }

    /// Encode an `any` body: size prefix and one tagged field
    fn encode_any(&mut self, held: &Value) -> Result<()> {
        let kind = held.logical_type();
        let field = match held {
            Value::Struct(_) => return Err(Error::UnsupportedAnyPayload("a struct")),
            Value::Any(_) => return Err(Error::UnsupportedAnyPayload("a nested any")),
            Value::Unknown { .. } => return Err(Error::UnsupportedAnyPayload("an unknown value")),
            Value::Array(items) => {
                let items = items.as_deref().unwrap_or_default();
                let element = any_array_element(items)?;
                FieldSchema::array(element, Cardinality::Unbounded)
            }
            _ => FieldSchema::of(kind),
        };

        let mut inner = Encoder::new();
        inner.encode_field(&field, held, true)?;

        self.put_size(inner.len() as u64);
        self.put_bytes(inner.as_slice());
        Ok(())
    }
}

/// Element type of an array carried by `any`
fn any_array_element(items: &[Value]) -> Result<LogicalType> {
    let first = items
        .first()
        .ok_or(Error::UnsupportedAnyPayload("an empty array"))?
        .logical_type();

    if first == LogicalType::Struct {
        return Err(Error::UnsupportedAnyPayload("an array of structs"));
    }
    if !first.is_scalar() {
        return Err(Error::UnsupportedAnyPayload("a nested collection"));
    }

    match items.iter().find(|item| item.logical_type() != first) {
        Some(other) => Err(Error::TypeMismatch {
            expected: first,
            found: other.logical_type(),
        }),
        None => Ok(first),
    }
}
