//! High-level serialization entry points
//!
//! Framed messages carry a root struct as their payload. Standalone values
//! are a single tagged struct with no envelope, for storage or embedding in
//! other containers.

use bytes::Bytes;

use crate::decoder::{decode_value, Cursor};
use crate::encoder::Encoder;
use crate::error::{Error, Result};
use crate::frame::{write_message, MessageMeta};
use crate::schema::{Package, Schema, Structured};
use crate::tag::{LogicalType, TypeTag};
use crate::value::Value;

/// Serialize a root struct into a framed message
pub fn serialize(values: &[Value], schema: &Schema, package_id: u8, message_id: u8) -> Result<Bytes> {
    let mut enc = Encoder::new();
    enc.encode_struct(schema, values, true)?;
    write_message(&MessageMeta::new(package_id, message_id), enc.as_slice())
}

/// Serialize a struct as a tagged, length-prefixed value with no envelope
pub fn serialize_standalone(values: &[Value], schema: &Schema) -> Result<Bytes> {
    let mut enc = Encoder::new();
    enc.put_tag(TypeTag::new(LogicalType::Struct));
    enc.encode_struct(schema, values, false)?;
    Ok(enc.into_bytes())
}

/// Decode a value written by [`serialize_standalone`]
///
/// An absent struct decodes as no fields. Bytes after the struct are ignored.
pub fn decode_standalone(bytes: Bytes, schema: &Schema) -> Result<Vec<Value>> {
    let mut cur = Cursor::new(bytes);
    let tag = cur.get_tag()?;
    if tag.logical != LogicalType::Struct {
        return Err(Error::TypeMismatch {
            expected: LogicalType::Struct,
            found: tag.logical,
        });
    }

    match decode_value(tag, &mut cur, 0)? {
        Value::Struct(Some(fields)) => {
            schema.check(&fields)?;
            Ok(fields)
        }
        _ => Ok(Vec::new()),
    }
}

/// Serialize a typed package into a framed message
pub fn serialize_package<P: Package>(package: &P, message_id: u8) -> Result<Bytes> {
    serialize(&package.to_values(), &P::describe(), P::PACKAGE_ID, message_id)
}

/// Serialize a typed struct with no envelope
pub fn serialize_structured<T: Structured>(value: &T) -> Result<Bytes> {
    serialize_standalone(&value.to_values(), &T::describe())
}

/// Decode a typed struct written by [`serialize_structured`]
pub fn decode_structured<T: Structured>(bytes: Bytes) -> Result<T> {
    T::from_values(decode_standalone(bytes, &T::describe())?)
}
