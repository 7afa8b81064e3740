//! Generic value tree
//!
//! [`Value`] is both the input to the encoder and the output of the decoder.
//! Every variant carries an `Option`: `None` is the protocol's empty marker,
//! distinct from a present zero-length value.

use bytes::Bytes;

use crate::dynint::DynInt;
use crate::tag::LogicalType;

/// A single field value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Unsigned 8-bit integer
    U8(Option<u8>),
    /// Unsigned 32-bit integer
    U32(Option<u32>),
    /// Unsigned 64-bit integer
    U64(Option<u64>),
    /// IEEE-754 double
    Double(Option<f64>),
    /// Text bytes; not validated as UTF-8 when decoded
    String(Option<Bytes>),
    /// Opaque bytes
    Blob(Option<Bytes>),
    /// Boolean
    Bool(Option<bool>),
    /// Homogeneous array
    Array(Option<Vec<Value>>),
    /// UUID as hex text
    Uuid(Option<String>),
    /// Single dynamically typed value
    Any(Option<Box<Value>>),
    /// Nested structure, fields in schema order
    Struct(Option<Vec<Value>>),
    /// Dynamic integer
    DynInt(Option<DynInt>),
    /// Skipped field of a type this crate does not know
    Unknown {
        /// Raw type id from the tag
        type_id: u8,
        /// Body without its size prefix
        body: Option<Bytes>,
    },
}

impl Value {
    /// Absent value of the given type
    pub fn absent(logical: LogicalType) -> Self {
        match logical {
            LogicalType::Unknown => Value::Unknown {
                type_id: LogicalType::Unknown.type_id(),
                body: None,
            },
            LogicalType::U8 => Value::U8(None),
            LogicalType::U32 => Value::U32(None),
            LogicalType::U64 => Value::U64(None),
            LogicalType::Double => Value::Double(None),
            LogicalType::String => Value::String(None),
            LogicalType::Blob => Value::Blob(None),
            LogicalType::Bool => Value::Bool(None),
            LogicalType::Array => Value::Array(None),
            LogicalType::Uuid => Value::Uuid(None),
            LogicalType::Any => Value::Any(None),
            LogicalType::Struct => Value::Struct(None),
            LogicalType::DynInt => Value::DynInt(None),
        }
    }

    /// Logical type of this value
    pub fn logical_type(&self) -> LogicalType {
        match self {
            Value::U8(_) => LogicalType::U8,
            Value::U32(_) => LogicalType::U32,
            Value::U64(_) => LogicalType::U64,
            Value::Double(_) => LogicalType::Double,
            Value::String(_) => LogicalType::String,
            Value::Blob(_) => LogicalType::Blob,
            Value::Bool(_) => LogicalType::Bool,
            Value::Array(_) => LogicalType::Array,
            Value::Uuid(_) => LogicalType::Uuid,
            Value::Any(_) => LogicalType::Any,
            Value::Struct(_) => LogicalType::Struct,
            Value::DynInt(_) => LogicalType::DynInt,
            Value::Unknown { .. } => LogicalType::Unknown,
        }
    }

    /// Whether the value is present (not the empty marker)
    pub fn is_present(&self) -> bool {
        match self {
            Value::U8(v) => v.is_some(),
            Value::U32(v) => v.is_some(),
            Value::U64(v) => v.is_some(),
            Value::Double(v) => v.is_some(),
            Value::String(v) | Value::Blob(v) => v.is_some(),
            Value::Bool(v) => v.is_some(),
            Value::Array(v) | Value::Struct(v) => v.is_some(),
            Value::Uuid(v) => v.is_some(),
            Value::Any(v) => v.is_some(),
            Value::DynInt(v) => v.is_some(),
            Value::Unknown { body, .. } => body.is_some(),
        }
    }

    /// Present `u8`
    pub fn u8(v: u8) -> Self {
        Value::U8(Some(v))
    }

    /// Present `u32`
    pub fn u32(v: u32) -> Self {
        Value::U32(Some(v))
    }

    /// Present `u64`
    pub fn u64(v: u64) -> Self {
        Value::U64(Some(v))
    }

    /// Present double
    pub fn double(v: f64) -> Self {
        Value::Double(Some(v))
    }

    /// Present string
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::String(Some(Bytes::copy_from_slice(s.as_ref().as_bytes())))
    }

    /// Present blob
    pub fn blob(b: impl Into<Bytes>) -> Self {
        Value::Blob(Some(b.into()))
    }

    /// Present bool
    pub fn bool(v: bool) -> Self {
        Value::Bool(Some(v))
    }

    /// Present UUID; the text is validated when encoded
    pub fn uuid(text: impl Into<String>) -> Self {
        Value::Uuid(Some(text.into()))
    }

    /// Present dynamic integer
    pub fn dyn_int(v: impl Into<DynInt>) -> Self {
        Value::DynInt(Some(v.into()))
    }

    /// Present array
    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(Some(items.into_iter().collect()))
    }

    /// Present struct
    pub fn structure(fields: impl IntoIterator<Item = Value>) -> Self {
        Value::Struct(Some(fields.into_iter().collect()))
    }

    /// Present `any` holding `inner`
    pub fn any(inner: Value) -> Self {
        Value::Any(Some(Box::new(inner)))
    }

    /// Contained `u8`, if present
    pub fn as_u8(&self) -> Option<u8> {
        match self {
            Value::U8(v) => *v,
            _ => None,
        }
    }

    /// Contained `u32`, if present
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Value::U32(v) => *v,
            _ => None,
        }
    }

    /// Contained `u64`, if present
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::U64(v) => *v,
            _ => None,
        }
    }

    /// Contained double, if present
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(v) => *v,
            _ => None,
        }
    }

    /// Contained bool, if present
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => *v,
            _ => None,
        }
    }

    /// Contained string, if present and valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(Some(b)) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    /// Raw bytes of a present string or blob
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::String(Some(b)) | Value::Blob(Some(b)) => Some(b),
            _ => None,
        }
    }

    /// Contained UUID text, if present
    pub fn as_uuid(&self) -> Option<&str> {
        match self {
            Value::Uuid(Some(s)) => Some(s),
            _ => None,
        }
    }

    /// Contained dynamic integer, if present
    pub fn as_dyn_int(&self) -> Option<DynInt> {
        match self {
            Value::DynInt(v) => *v,
            _ => None,
        }
    }

    /// Array elements, if present
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(Some(items)) => Some(items),
            _ => None,
        }
    }

    /// Struct fields, if present
    pub fn as_struct(&self) -> Option<&[Value]> {
        match self {
            Value::Struct(Some(fields)) => Some(fields),
            _ => None,
        }
    }

    /// Value held by a present `any`
    pub fn as_any(&self) -> Option<&Value> {
        match self {
            Value::Any(Some(inner)) => Some(inner),
            _ => None,
        }
    }
}
