//! Ludwieg: self-describing binary wire protocol
//!
//! Every value on the wire carries a one-byte type tag, so payloads can be
//! walked without a schema. Schemas are still used on both ends to check
//! that field order and types agree.
//!
//! # Message Format
//!
//! ```text
//! +----------------+---------+---------+-------------+-------------+---------+
//! | Magic 27 24 50 | Ver u8  | Msg u8  | Package u8  | Size prefix | Payload |
//! +----------------+---------+---------+-------------+-------------+---------+
//!
//! Payload:  [Tag Body] [Tag Body] ...     (fields of the root struct)
//! Tag:      bit 0 length-prefixed, bit 1 empty, bits 2..7 type index
//! Size:     selector (0 empty, 1 u8, 2 u16, 3 u32, 4 u64) + LE bytes
//! ```
//!
//! # Features
//!
//! - Nullable fields: any value can be absent at the cost of one byte
//! - Nested structs, homogeneous arrays and single-value `any` containers
//! - Fields of unknown types are skipped when they are length-prefixed
//! - Streaming deserializer that resynchronises on corrupted input
//! - Zero-copy string and blob bodies via [`bytes::Bytes`]
//!
//! # Example
//!
//! ```rust
//! use ludwieg::*;
//!
//! let schema = Schema::new(vec![
//!     FieldSchema::of(LogicalType::U8),
//!     FieldSchema::of(LogicalType::String),
//! ]);
//! let mut registry = Registry::new();
//! registry.register(1, schema.clone())?;
//!
//! let bytes = serialize(&[Value::u8(27), Value::string("hi")], &schema, 1, 7)?;
//!
//! let mut deserializer = Deserializer::new();
//! let candidates = deserializer.feed_slice(&bytes);
//! assert_eq!(candidates.len(), 1);
//! assert_eq!(candidates[0].meta().message_id, 7);
//!
//! let values = candidates[0].decode(&registry)?;
//! assert_eq!(values[0].as_u8(), Some(27));
//! assert_eq!(values[1].as_str(), Some("hi"));
//! # Ok::<(), ludwieg::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod decoder;
pub mod deserializer;
pub mod dynint;
pub mod encoder;
pub mod error;
pub mod frame;
pub mod message;
pub mod registry;
pub mod schema;
pub mod size;
pub mod tag;
pub mod uuid;
pub mod value;

// Re-export main types
pub use decoder::Cursor;
pub use deserializer::{Candidate, Deserializer};
pub use dynint::{DynInt, DynIntKind};
pub use encoder::Encoder;
pub use error::{Error, Result};
pub use frame::MessageMeta;
pub use message::{
    decode_standalone, decode_structured, serialize, serialize_package, serialize_standalone,
    serialize_structured,
};
pub use registry::Registry;
pub use schema::{ArraySchema, Cardinality, FieldSchema, Fields, Package, Schema, Structured};
pub use tag::{LogicalType, TypeTag};
pub use value::Value;

/// Magic bytes opening every message
pub const MAGIC: [u8; 3] = [0x27, 0x24, 0x50];

/// Current protocol version
pub const PROTOCOL_VERSION: u8 = 1;

/// Maximum payload size (16MB - safety limit)
pub const MAX_PAYLOAD_SIZE: usize = 16 * 1024 * 1024;

/// Maximum depth of nested structs, arrays and `any` values when decoding
pub const MAX_NESTING_DEPTH: usize = 64;
