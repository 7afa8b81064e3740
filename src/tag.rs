//! Type tag packing and unpacking
//!
//! Every encoded field starts with a single tag byte:
//!
//! ```text
//! +---------------------------+--------------+----------------+
//! | type index (bits 7..2)    | empty (bit 1)| prefixed (bit 0)|
//! +---------------------------+--------------+----------------+
//! ```
//!
//! The length-prefix bit is part of each known type's identity; the empty bit
//! only exists on the wire.

/// Tag bit set on types whose body starts with a size prefix
pub const LENGTH_PREFIXED_BIT: u8 = 0x01;

/// Tag bit marking an absent value
pub const EMPTY_BIT: u8 = 0x02;

/// Logical types known to the protocol
///
/// Discriminants are the exact tag bytes (type index shifted left by two,
/// length-prefix bit included).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalType {
    /// Catch-all for tag bytes that match no known type
    Unknown = 0x00,
    /// Unsigned 8-bit integer
    U8 = 0x01 << 2,
    /// Unsigned 32-bit integer
    U32 = 0x02 << 2,
    /// Unsigned 64-bit integer
    U64 = 0x03 << 2,
    /// IEEE-754 double
    Double = 0x04 << 2,
    /// UTF-8 text
    String = (0x05 << 2) | LENGTH_PREFIXED_BIT,
    /// Opaque bytes
    Blob = (0x06 << 2) | LENGTH_PREFIXED_BIT,
    /// Boolean
    Bool = 0x07 << 2,
    /// Homogeneous array
    Array = (0x08 << 2) | LENGTH_PREFIXED_BIT,
    /// 128-bit UUID
    Uuid = 0x09 << 2,
    /// Single dynamically typed value
    Any = (0x0A << 2) | LENGTH_PREFIXED_BIT,
    /// Nested structure
    Struct = (0x0B << 2) | LENGTH_PREFIXED_BIT,
    /// Precision-minimizing number
    DynInt = 0x0C << 2,
}

impl LogicalType {
    /// All known types, in type index order
    pub const KNOWN: [LogicalType; 12] = [
        LogicalType::U8,
        LogicalType::U32,
        LogicalType::U64,
        LogicalType::Double,
        LogicalType::String,
        LogicalType::Blob,
        LogicalType::Bool,
        LogicalType::Array,
        LogicalType::Uuid,
        LogicalType::Any,
        LogicalType::Struct,
        LogicalType::DynInt,
    ];

    /// Map a type id (tag byte without the empty bit) to a logical type
    #[inline]
    pub fn from_type_id(type_id: u8) -> Self {
        Self::KNOWN
            .iter()
            .copied()
            .find(|t| *t as u8 == type_id)
            .unwrap_or(LogicalType::Unknown)
    }

    /// Tag byte of this type with the empty bit cleared
    #[inline]
    pub const fn type_id(self) -> u8 {
        self as u8
    }

    /// Whether the body of this type starts with a size prefix
    #[inline]
    pub const fn is_length_prefixed(self) -> bool {
        self as u8 & LENGTH_PREFIXED_BIT != 0
    }

    /// Whether values of this type may be elements of an `any` array
    #[inline]
    pub const fn is_scalar(self) -> bool {
        matches!(
            self,
            LogicalType::U8
                | LogicalType::U32
                | LogicalType::U64
                | LogicalType::Double
                | LogicalType::String
                | LogicalType::Blob
                | LogicalType::Bool
                | LogicalType::Uuid
                | LogicalType::DynInt
        )
    }
}

/// Pack a type id and its flags into a tag byte
#[inline]
pub const fn pack(type_id: u8, length_prefixed: bool, empty: bool) -> u8 {
    let mut result = type_id;
    if empty {
        result |= EMPTY_BIT;
    } else {
        result &= !EMPTY_BIT;
    }
    if length_prefixed {
        result |= LENGTH_PREFIXED_BIT;
    } else {
        result &= !LENGTH_PREFIXED_BIT;
    }
    result
}

/// Unpacked tag byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeTag {
    /// Raw type id: the tag byte with the empty bit masked off
    pub type_id: u8,
    /// Logical type the id resolves to
    pub logical: LogicalType,
    /// Body starts with a size prefix
    pub length_prefixed: bool,
    /// Value is absent
    pub empty: bool,
}

impl TypeTag {
    /// Tag for a present value of the given type
    #[inline]
    pub const fn new(logical: LogicalType) -> Self {
        Self {
            type_id: logical.type_id(),
            logical,
            length_prefixed: logical.is_length_prefixed(),
            empty: false,
        }
    }

    /// Same tag with the empty bit set
    #[inline]
    pub const fn absent(mut self) -> Self {
        self.empty = true;
        self
    }

    /// Decode a tag byte
    #[inline]
    pub fn unpack(byte: u8) -> Self {
        let type_id = byte & !EMPTY_BIT;
        Self {
            type_id,
            logical: LogicalType::from_type_id(type_id),
            length_prefixed: byte & LENGTH_PREFIXED_BIT != 0,
            empty: byte & EMPTY_BIT != 0,
        }
    }

    /// Encode into a tag byte
    #[inline]
    pub const fn pack(&self) -> u8 {
        pack(self.type_id, self.length_prefixed, self.empty)
    }

    /// Whether the type id matched a known type
    #[inline]
    pub fn is_known(&self) -> bool {
        self.logical != LogicalType::Unknown
    }
}
