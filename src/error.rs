//! Error types for the Ludwieg wire protocol

use thiserror::Error;

use crate::tag::LogicalType;

/// Errors that can occur while encoding or decoding values and messages.
///
/// Every error aborts only the encode/decode call that produced it. Framing
/// anomalies seen by the streaming [`Deserializer`](crate::Deserializer) are
/// never reported through this type: the state machine resets silently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Buffer ended before the value was complete
    #[error("unexpected end of buffer")]
    UnexpectedEof,
    /// Decode requested for a package id missing from the registry
    #[error("unknown package type {0:#04x}")]
    UnknownPackageType(u8),
    /// A second schema was registered under an existing package id
    #[error("illegal attempt to register two packages with same id {0:#04x}")]
    DuplicatePackageRegistration(u8),
    /// Size selector byte outside the known range
    #[error("unknown size prefix {0:#04x}")]
    MalformedSizePrefix(u8),
    /// Value does not match the logical type declared for its position
    #[error("type mismatch: expected {expected:?}, found {found:?}")]
    TypeMismatch {
        /// Declared logical type
        expected: LogicalType,
        /// Logical type of the presented value
        found: LogicalType,
    },
    /// UUID text is not 32 hexadecimal characters
    #[error("invalid value {0:?} for UUID field")]
    InvalidUuidFormat(String),
    /// `any` was asked to carry a value it cannot represent
    #[error("type any cannot serialize {0}")]
    UnsupportedAnyPayload(&'static str),
    /// Unknown type tag without a length prefix, so it cannot be skipped
    #[error("unknown type {0:#04x} with no prefixed length cannot be decoded")]
    UnknownUndecodableType(u8),
    /// Array element type is unknown or itself an array
    #[error("invalid array type {0:?}")]
    InvalidArrayType(LogicalType),
    /// Array cardinality is neither `*` nor a non-negative integer
    #[error("invalid array size {0:?}")]
    InvalidArraySize(String),
    /// Arrays cannot carry absent elements
    #[error("array element {0} is absent")]
    AbsentArrayElement(usize),
    /// Struct value has a different number of fields than its schema
    #[error("expected {expected} fields, found {found}")]
    FieldCountMismatch {
        /// Fields declared by the schema
        expected: usize,
        /// Fields present in the value
        found: usize,
    },
    /// Struct field declared without the schema of the nested struct
    #[error("struct field {0} has no nested schema")]
    MissingNestedSchema(usize),
    /// Dynamic integer kind byte outside the known range
    #[error("invalid dynamic integer kind {0:#04x}")]
    InvalidDynIntKind(u8),
    /// Array element tag carries the empty bit
    #[error("array element tag {0:#04x} is marked empty")]
    MalformedArray(u8),
    /// Any body holds bytes after its single field
    #[error("{0} trailing bytes after any value")]
    TrailingAnyBytes(usize),
    /// Nested structs or containers exceed the depth limit
    #[error("nesting deeper than {0} levels")]
    NestingTooDeep(usize),
    /// Message carries a protocol version this crate does not speak
    #[error("unsupported protocol version {0}")]
    UnsupportedVersion(u8),
    /// Encoded payload exceeds the maximum message size
    #[error("payload of {0} bytes exceeds the maximum message size")]
    PayloadTooLarge(usize),
}

/// Result type alias for Ludwieg operations
pub type Result<T> = core::result::Result<T, Error>;
