//! Schema descriptors and binding traits
//!
//! A [`Schema`] is the ordered list of field annotations for one structured
//! type. Field order, not field names, is the wire contract: encoder and
//! decoder must agree on it exactly.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use bytes::Bytes;

use crate::dynint::DynInt;
use crate::error::{Error, Result};
use crate::tag::LogicalType;
use crate::value::Value;

/// Declared number of array elements
///
/// Parsed and checked, never enforced: the runtime collection length is what
/// gets written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cardinality {
    /// `*`
    #[default]
    Unbounded,
    /// A literal element count
    Fixed(usize),
}

impl FromStr for Cardinality {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s == "*" {
            return Ok(Cardinality::Unbounded);
        }
        s.parse::<usize>()
            .map(Cardinality::Fixed)
            .map_err(|_| Error::InvalidArraySize(s.to_owned()))
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::Unbounded => f.write_str("*"),
            Cardinality::Fixed(n) => write!(f, "{n}"),
        }
    }
}

/// Element description of an array field
#[derive(Debug, Clone, PartialEq)]
pub struct ArraySchema {
    /// Logical type of every element
    pub element: LogicalType,
    /// Declared element count
    pub cardinality: Cardinality,
}

/// Annotation for one field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    /// Logical type of the field
    pub kind: LogicalType,
    /// Element description, for array fields
    pub array: Option<ArraySchema>,
    /// Schema of the nested struct, for struct fields and struct arrays
    pub nested: Option<Arc<Schema>>,
}

impl FieldSchema {
    /// Field of a non-composite type
    pub fn of(kind: LogicalType) -> Self {
        Self {
            kind,
            array: None,
            nested: None,
        }
    }

    /// Nested struct field
    pub fn structure(schema: impl Into<Arc<Schema>>) -> Self {
        Self {
            kind: LogicalType::Struct,
            array: None,
            nested: Some(schema.into()),
        }
    }

    /// Array of non-struct elements
    pub fn array(element: LogicalType, cardinality: Cardinality) -> Self {
        Self {
            kind: LogicalType::Array,
            array: Some(ArraySchema {
                element,
                cardinality,
            }),
            nested: None,
        }
    }

    /// Array of structs sharing one schema
    pub fn array_of_structs(schema: impl Into<Arc<Schema>>, cardinality: Cardinality) -> Self {
        Self {
            kind: LogicalType::Array,
            array: Some(ArraySchema {
                element: LogicalType::Struct,
                cardinality,
            }),
            nested: Some(schema.into()),
        }
    }

    fn check(&self, value: &Value) -> Result<()> {
        let found = value.logical_type();
        if found != self.kind {
            return Err(Error::TypeMismatch {
                expected: self.kind,
                found,
            });
        }

        match value {
            Value::Struct(Some(fields)) => match &self.nested {
                Some(nested) => nested.check(fields),
                None => Ok(()),
            },
            Value::Array(Some(items)) => {
                let Some(array) = &self.array else {
                    return Ok(());
                };
                let element = FieldSchema {
                    kind: array.element,
                    array: None,
                    nested: self.nested.clone(),
                };
                items.iter().try_for_each(|item| element.check(item))
            }
            _ => Ok(()),
        }
    }
}

/// Ordered field annotations of a structured type
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    fields: Vec<FieldSchema>,
}

impl Schema {
    /// Schema from its fields, in declaration order
    pub fn new(fields: Vec<FieldSchema>) -> Self {
        Self { fields }
    }

    /// Schema with no fields
    pub fn empty() -> Self {
        Self::default()
    }

    /// Field annotations
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check a decoded value tree against this schema
    ///
    /// Values are matched positionally, recursing into nested structs and
    /// struct arrays. Missing trailing values read as absent and extra
    /// trailing values are ignored, so neither is an error.
    pub fn check(&self, values: &[Value]) -> Result<()> {
        self.fields
            .iter()
            .zip(values)
            .try_for_each(|(field, value)| field.check(value))
    }
}

impl FromIterator<FieldSchema> for Schema {
    fn from_iter<I: IntoIterator<Item = FieldSchema>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A type that maps onto a struct on the wire
///
/// Implementations list their fields in declaration order in
/// [`describe`](Structured::describe) and produce/consume values in the same
/// order.
pub trait Structured: Sized {
    /// Field annotations of this type
    fn describe() -> Schema;

    /// Field values, in schema order
    fn to_values(&self) -> Vec<Value>;

    /// Rebuild an instance from decoded field values
    fn from_values(values: Vec<Value>) -> Result<Self>;
}

/// A top-level structured type sent as a message payload
pub trait Package: Structured {
    /// Package type id written in the message header
    const PACKAGE_ID: u8;
}

fn mismatch(expected: LogicalType, found: &Value) -> Error {
    Error::TypeMismatch {
        expected,
        found: found.logical_type(),
    }
}

macro_rules! scalar_readers {
    ($($name:ident => $variant:ident: $t:ty),* $(,)?) => {
        $(
            #[doc = concat!("Next field as a nullable `", stringify!($t), "`")]
            pub fn $name(&mut self) -> Result<Option<$t>> {
                match self.next_value(LogicalType::$variant)? {
                    Value::$variant(v) => Ok(v),
                    other => Err(mismatch(LogicalType::$variant, &other)),
                }
            }
        )*
    };
}

/// Sequential reader over decoded struct fields
///
/// Used by [`Structured::from_values`] implementations. Fields past the end
/// of the decoded sequence read as absent.
#[derive(Debug)]
pub struct Fields {
    values: std::vec::IntoIter<Value>,
}

impl Fields {
    /// Reader over the given values
    pub fn new(values: Vec<Value>) -> Self {
        Self {
            values: values.into_iter(),
        }
    }

    /// Next field, checked against `kind`
    pub fn next_value(&mut self, kind: LogicalType) -> Result<Value> {
        match self.values.next() {
            None => Ok(Value::absent(kind)),
            Some(v) if v.logical_type() == kind => Ok(v),
            Some(other) => Err(mismatch(kind, &other)),
        }
    }

    scalar_readers! {
        u8 => U8: u8,
        u32 => U32: u32,
        u64 => U64: u64,
        double => Double: f64,
        bool => Bool: bool,
        blob => Blob: Bytes,
        uuid => Uuid: String,
        dyn_int => DynInt: DynInt,
    }

    /// Next field as a nullable string, replacing invalid UTF-8
    pub fn string(&mut self) -> Result<Option<String>> {
        match self.next_value(LogicalType::String)? {
            Value::String(v) => Ok(v.map(|b| String::from_utf8_lossy(&b).into_owned())),
            other => Err(mismatch(LogicalType::String, &other)),
        }
    }

    /// Next field as the value held by an `any`
    pub fn any(&mut self) -> Result<Option<Value>> {
        match self.next_value(LogicalType::Any)? {
            Value::Any(v) => Ok(v.map(|inner| *inner)),
            other => Err(mismatch(LogicalType::Any, &other)),
        }
    }

    /// Next field as a nested struct
    pub fn structure<T: Structured>(&mut self) -> Result<Option<T>> {
        match self.next_value(LogicalType::Struct)? {
            Value::Struct(v) => v.map(T::from_values).transpose(),
            other => Err(mismatch(LogicalType::Struct, &other)),
        }
    }

    /// Next field as array elements; an absent array reads as empty
    pub fn array(&mut self) -> Result<Vec<Value>> {
        match self.next_value(LogicalType::Array)? {
            Value::Array(v) => Ok(v.unwrap_or_default()),
            other => Err(mismatch(LogicalType::Array, &other)),
        }
    }

    /// Next field as an array of strings
    pub fn strings(&mut self) -> Result<Vec<String>> {
        self.array()?
            .into_iter()
            .map(|item| match item {
                Value::String(Some(b)) => Ok(String::from_utf8_lossy(&b).into_owned()),
                other => Err(mismatch(LogicalType::String, &other)),
            })
            .collect()
    }

    /// Next field as an array of nested structs
    pub fn array_of<T: Structured>(&mut self) -> Result<Vec<T>> {
        self.array()?
            .into_iter()
            .map(|item| match item {
                Value::Struct(Some(fields)) => T::from_values(fields),
                other => Err(mismatch(LogicalType::Struct, &other)),
            })
            .collect()
    }
}
