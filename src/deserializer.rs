//! Streaming message deserializer
//!
//! [`Deserializer`] is a byte-at-a-time state machine that finds messages in
//! an arbitrary byte stream. It never fails: malformed framing resets the
//! machine and scanning continues with the next byte. Completed frames are
//! handed out as [`Candidate`]s, which are decoded against a [`Registry`] on
//! request.

use bytes::{Bytes, BytesMut};

use crate::decoder;
use crate::error::{Error, Result};
use crate::frame::MessageMeta;
use crate::registry::Registry;
use crate::schema::Package;
use crate::size::{self, SizeSelector};
use crate::value::Value;
use crate::{MAGIC, MAX_PAYLOAD_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Prelude,
    ProtocolVersion,
    MessageId,
    PackageType,
    PackageSizePrelude,
    PackageSizeValue,
    Payload,
}

/// Message-framing state machine for one byte stream
#[derive(Debug)]
pub struct Deserializer {
    state: State,
    magic_pos: usize,
    meta: MessageMeta,
    size_width: usize,
    size_buf: [u8; 8],
    size_pos: usize,
    payload_len: usize,
    payload: BytesMut,
    max_payload: usize,
}

impl Default for Deserializer {
    fn default() -> Self {
        Self::with_max_payload(MAX_PAYLOAD_SIZE)
    }
}

impl Deserializer {
    /// Create a deserializer with the default payload limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a deserializer rejecting payloads longer than `max_payload`
    pub fn with_max_payload(max_payload: usize) -> Self {
        Self {
            state: State::Prelude,
            magic_pos: 0,
            meta: MessageMeta::new(0, 0),
            size_width: 0,
            size_buf: [0; 8],
            size_pos: 0,
            payload_len: 0,
            payload: BytesMut::new(),
            max_payload,
        }
    }

    /// Drop any partial frame and wait for a new magic sequence
    pub fn reset(&mut self) {
        self.state = State::Prelude;
        self.magic_pos = 0;
        self.meta = MessageMeta::new(0, 0);
        self.size_width = 0;
        self.size_pos = 0;
        self.payload_len = 0;
        self.payload = BytesMut::new();
    }

    /// Whether no partial frame is buffered
    pub fn is_idle(&self) -> bool {
        self.state == State::Prelude && self.magic_pos == 0
    }

    /// Feed one byte; returns a candidate when it completes a frame
    pub fn feed(&mut self, byte: u8) -> Option<Candidate> {
        match self.state {
            State::Prelude => {
                self.feed_magic(byte);
                None
            }
            State::ProtocolVersion => {
                self.meta.protocol_version = byte;
                self.state = State::MessageId;
                None
            }
            State::MessageId => {
                self.meta.message_id = byte;
                self.state = State::PackageType;
                None
            }
            State::PackageType => {
                self.meta.package_type = byte;
                self.state = State::PackageSizePrelude;
                None
            }
            State::PackageSizePrelude => match SizeSelector::from_byte(byte) {
                None => {
                    tracing::debug!(selector = byte, "bad payload size selector, resetting");
                    self.reset();
                    None
                }
                Some(SizeSelector::Empty) => Some(self.complete()),
                Some(selector) => {
                    self.size_width = selector.width();
                    self.size_pos = 0;
                    self.state = State::PackageSizeValue;
                    None
                }
            },
            State::PackageSizeValue => {
                if let Some(slot) = self.size_buf.get_mut(self.size_pos) {
                    *slot = byte;
                }
                self.size_pos += 1;
                if self.size_pos < self.size_width {
                    return None;
                }
                self.begin_payload()
            }
            State::Payload => {
                self.payload.extend_from_slice(&[byte]);
                if self.payload.len() < self.payload_len {
                    return None;
                }
                Some(self.complete())
            }
        }
    }

    /// Feed a slice, collecting every completed candidate
    pub fn feed_slice(&mut self, bytes: &[u8]) -> Vec<Candidate> {
        bytes.iter().filter_map(|&b| self.feed(b)).collect()
    }

    fn feed_magic(&mut self, byte: u8) {
        if MAGIC.get(self.magic_pos) == Some(&byte) {
            self.magic_pos += 1;
            if self.magic_pos == MAGIC.len() {
                self.magic_pos = 0;
                self.state = State::ProtocolVersion;
            }
            return;
        }

        if self.magic_pos > 0 {
            tracing::trace!(byte, matched = self.magic_pos, "magic mismatch, resynchronising");
        }
        self.reset();
        // The breaking byte may start a new frame
        if byte == MAGIC[0] {
            self.magic_pos = 1;
        }
    }

    fn begin_payload(&mut self) -> Option<Candidate> {
        let len = self
            .size_buf
            .get(..self.size_width)
            .and_then(size::read_le)
            .unwrap_or(u64::MAX);
        if len == 0 {
            return Some(self.complete());
        }
        if len > self.max_payload as u64 {
            tracing::debug!(len, max = self.max_payload, "payload too large, resetting");
            self.reset();
            return None;
        }

        self.payload_len = len as usize;
        self.payload = BytesMut::with_capacity(self.payload_len);
        self.state = State::Payload;
        None
    }

    fn complete(&mut self) -> Candidate {
        let candidate = Candidate {
            meta: self.meta,
            payload: std::mem::take(&mut self.payload).freeze(),
        };
        tracing::trace!(
            package_type = candidate.meta.package_type,
            message_id = candidate.meta.message_id,
            len = candidate.payload.len(),
            "message framed"
        );
        self.reset();
        candidate
    }
}

/// A framed message whose payload has not been decoded yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    meta: MessageMeta,
    payload: Bytes,
}

impl Candidate {
    /// Header fields of the message
    pub fn meta(&self) -> &MessageMeta {
        &self.meta
    }

    /// Raw payload bytes
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Whether the package type is registered
    pub fn can_decode(&self, registry: &Registry) -> bool {
        registry.contains(self.meta.package_type)
    }

    /// Decode the payload and check it against the registered schema
    pub fn decode(&self, registry: &Registry) -> Result<Vec<Value>> {
        let schema = registry
            .schema(self.meta.package_type)
            .ok_or(Error::UnknownPackageType(self.meta.package_type))?;
        self.meta.validate()?;

        let values = decoder::decode_fields(self.payload.clone())?;
        schema.check(&values)?;
        Ok(values)
    }

    /// Decode the payload into a typed package
    ///
    /// Fails with `UnknownPackageType` when the frame carries another
    /// package's id.
    pub fn decode_into<P: Package>(&self, registry: &Registry) -> Result<P> {
        if self.meta.package_type != P::PACKAGE_ID {
            return Err(Error::UnknownPackageType(self.meta.package_type));
        }
        P::from_values(self.decode(registry)?)
    }
}
