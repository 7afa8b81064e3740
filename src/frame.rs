//! Message envelope
//!
//! ```text
//! +---------------+--------+--------+------------+-------------+---------+
//! | Magic 27 24 50| Ver u8 | Msg u8 | Package u8 | Size prefix | Payload |
//! +---------------+--------+--------+------------+-------------+---------+
//! ```

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Error, Result};
use crate::size;
use crate::{MAGIC, MAX_PAYLOAD_SIZE, PROTOCOL_VERSION};

/// Header fields following the magic bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageMeta {
    /// Protocol version byte
    pub protocol_version: u8,
    /// Caller-chosen message id, echoed back unchanged
    pub message_id: u8,
    /// Registered package type id
    pub package_type: u8,
}

impl MessageMeta {
    /// Meta size in bytes (fixed)
    pub const SIZE: usize = 3;

    /// Full header size before the size prefix: magic plus meta
    pub const HEADER_SIZE: usize = MAGIC.len() + Self::SIZE;

    /// Meta for the current protocol version
    #[inline]
    pub fn new(package_type: u8, message_id: u8) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            message_id,
            package_type,
        }
    }

    /// Validate the header
    #[inline]
    pub fn validate(&self) -> Result<()> {
        if self.protocol_version != PROTOCOL_VERSION {
            return Err(Error::UnsupportedVersion(self.protocol_version));
        }
        Ok(())
    }

    /// Write magic and meta bytes
    #[inline]
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_slice(&MAGIC);
        buf.put_u8(self.protocol_version);
        buf.put_u8(self.message_id);
        buf.put_u8(self.package_type);
    }
}

/// Frame a payload into a complete message
pub fn write_message(meta: &MessageMeta, payload: &[u8]) -> Result<Bytes> {
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(Error::PayloadTooLarge(payload.len()));
    }

    let len = payload.len() as u64;
    let mut buf =
        BytesMut::with_capacity(MessageMeta::HEADER_SIZE + size::encoded_len(len) + payload.len());
    meta.encode(&mut buf);
    size::encode(len, &mut buf);
    buf.put_slice(payload);
    Ok(buf.freeze())
}
