//! Size/length prefix encoding
//!
//! A size is a one-byte selector followed by 0, 1, 2, 4 or 8 little-endian
//! bytes. Used for every length-prefixed body, array element counts and the
//! message payload length.

use bytes::BufMut;

use crate::error::{Error, Result};

/// Maximum bytes needed for an encoded size (selector + u64)
pub const MAX_SIZE_LEN: usize = 9;

/// Width selector written before a size value
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeSelector {
    /// Logical zero, no value bytes
    Empty = 0,
    /// One value byte
    U8 = 1,
    /// Two value bytes
    U16 = 2,
    /// Four value bytes
    U32 = 3,
    /// Eight value bytes
    U64 = 4,
}

impl SizeSelector {
    /// Parse a selector byte
    #[inline]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(SizeSelector::Empty),
            1 => Some(SizeSelector::U8),
            2 => Some(SizeSelector::U16),
            3 => Some(SizeSelector::U32),
            4 => Some(SizeSelector::U64),
            _ => None,
        }
    }

    /// Smallest selector able to hold `value`
    ///
    /// `Empty` is never chosen: zero encodes as a one-byte value.
    #[inline]
    pub const fn for_value(value: u64) -> Self {
        if value <= u8::MAX as u64 {
            SizeSelector::U8
        } else if value <= u16::MAX as u64 {
            SizeSelector::U16
        } else if value <= u32::MAX as u64 {
            SizeSelector::U32
        } else {
            SizeSelector::U64
        }
    }

    /// Number of value bytes following the selector
    #[inline]
    pub const fn width(self) -> usize {
        match self {
            SizeSelector::Empty => 0,
            SizeSelector::U8 => 1,
            SizeSelector::U16 => 2,
            SizeSelector::U32 => 4,
            SizeSelector::U64 => 8,
        }
    }
}

/// Number of bytes `encode` writes for `value`
#[inline]
pub const fn encoded_len(value: u64) -> usize {
    1 + SizeSelector::for_value(value).width()
}

/// Encode a size into the given buffer
///
/// Returns the number of bytes written.
#[inline]
pub fn encode<B: BufMut>(value: u64, buf: &mut B) -> usize {
    let selector = SizeSelector::for_value(value);
    buf.put_u8(selector as u8);
    match selector {
        SizeSelector::Empty => {}
        SizeSelector::U8 => buf.put_u8(value as u8),
        SizeSelector::U16 => buf.put_u16_le(value as u16),
        SizeSelector::U32 => buf.put_u32_le(value as u32),
        SizeSelector::U64 => buf.put_u64_le(value),
    }
    1 + selector.width()
}

/// Decode a little-endian value of 0, 1, 2, 4 or 8 bytes
///
/// Returns `None` for any other width.
#[inline]
pub fn read_le(bytes: &[u8]) -> Option<u64> {
    match *bytes {
        [] => Some(0),
        [a] => Some(a as u64),
        [a, b] => Some(u16::from_le_bytes([a, b]) as u64),
        [a, b, c, d] => Some(u32::from_le_bytes([a, b, c, d]) as u64),
        [a, b, c, d, e, f, g, h] => Some(u64::from_le_bytes([a, b, c, d, e, f, g, h])),
        _ => None,
    }
}

/// Decode a size from the given buffer
///
/// Returns (value, bytes_consumed) or an error.
#[inline]
pub fn decode(buf: &[u8]) -> Result<(u64, usize)> {
    let (&first, rest) = buf.split_first().ok_or(Error::UnexpectedEof)?;
    let selector = SizeSelector::from_byte(first).ok_or(Error::MalformedSizePrefix(first))?;
    let width = selector.width();

    let raw = rest.get(..width).ok_or(Error::UnexpectedEof)?;
    let value = read_le(raw).ok_or(Error::MalformedSizePrefix(first))?;

    Ok((value, 1 + width))
}
