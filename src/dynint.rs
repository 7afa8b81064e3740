//! Dynamic integer: a number that picks its own wire width
//!
//! The value is held as an `f64` together with the narrowest kind able to
//! represent it. Kinds are chosen at construction time:
//!
//! - a fractional part whose magnitude lies strictly inside
//!   `(EPSILON, 1 - EPSILON)` selects a float kind;
//! - otherwise the truncated value is matched against the ranges of
//!   `u8, u16, u32, u64, i8, i16, i32, i64`, in that order;
//! - anything else is `Invalid` and carries no payload.
//!
//! Float kinds always travel as an 8-byte double.

use crate::decoder::Cursor;
use crate::encoder::Encoder;
use crate::error::{Error, Result};

/// Margin used when deciding whether a value has a fractional part
pub const EPSILON: f64 = 1e-9;

/// Width and signedness selected for a dynamic integer
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DynIntKind {
    /// Value fits no supported range
    #[default]
    Invalid = 0,
    /// Unsigned 8-bit
    U8,
    /// Unsigned 16-bit
    U16,
    /// Unsigned 32-bit
    U32,
    /// Unsigned 64-bit
    U64,
    /// Signed 8-bit
    I8,
    /// Signed 16-bit
    I16,
    /// Signed 32-bit
    I32,
    /// Signed 64-bit
    I64,
    /// 32-bit float
    F32,
    /// 64-bit float
    F64,
}

impl DynIntKind {
    /// Parse a kind byte
    #[inline]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            0 => DynIntKind::Invalid,
            1 => DynIntKind::U8,
            2 => DynIntKind::U16,
            3 => DynIntKind::U32,
            4 => DynIntKind::U64,
            5 => DynIntKind::I8,
            6 => DynIntKind::I16,
            7 => DynIntKind::I32,
            8 => DynIntKind::I64,
            9 => DynIntKind::F32,
            10 => DynIntKind::F64,
            _ => return None,
        })
    }

    /// Payload bytes following the kind byte
    #[inline]
    pub const fn width(self) -> usize {
        match self {
            DynIntKind::Invalid => 0,
            DynIntKind::U8 | DynIntKind::I8 => 1,
            DynIntKind::U16 | DynIntKind::I16 => 2,
            DynIntKind::U32 | DynIntKind::I32 => 4,
            DynIntKind::U64 | DynIntKind::I64 | DynIntKind::F32 | DynIntKind::F64 => 8,
        }
    }
}

const INTEGER_RANGES: [(f64, f64, DynIntKind); 8] = [
    (0.0, u8::MAX as f64, DynIntKind::U8),
    (0.0, u16::MAX as f64, DynIntKind::U16),
    (0.0, u32::MAX as f64, DynIntKind::U32),
    (0.0, u64::MAX as f64, DynIntKind::U64),
    (i8::MIN as f64, i8::MAX as f64, DynIntKind::I8),
    (i16::MIN as f64, i16::MAX as f64, DynIntKind::I16),
    (i32::MIN as f64, i32::MAX as f64, DynIntKind::I32),
    (i64::MIN as f64, i64::MAX as f64, DynIntKind::I64),
];

/// Pick the kind for `value` and the magnitude to retain
fn classify(value: f64) -> (DynIntKind, f64) {
    let integer = value.trunc();
    let frac = value.fract().abs();

    if frac > EPSILON && frac < 1.0 - EPSILON {
        // FIXME: always tagged F32, even when the magnitude needs F64
        // precision. The body is written as an f64 either way.
        return (DynIntKind::F32, value);
    }

    INTEGER_RANGES
        .iter()
        .find(|(min, max, _)| integer >= *min && integer <= *max)
        .map(|(_, _, kind)| (*kind, integer))
        .unwrap_or((DynIntKind::Invalid, 0.0))
}

/// Number with a self-selected wire width
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DynInt {
    value: f64,
    kind: DynIntKind,
}

impl DynInt {
    /// Classify and wrap a number
    pub fn new(value: f64) -> Self {
        let (kind, value) = classify(value);
        Self { value, kind }
    }

    /// Kind selected for this value
    #[inline]
    pub fn kind(&self) -> DynIntKind {
        self.kind
    }

    /// Retained magnitude
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    // Two's complement view of the magnitude, wrapping like a C cast.
    fn bits(&self) -> i64 {
        if self.value > i64::MAX as f64 {
            self.value as u64 as i64
        } else {
            self.value as i64
        }
    }

    /// Value as `u8`, truncating
    pub fn as_u8(&self) -> u8 {
        self.bits() as u8
    }

    /// Value as `u16`, truncating
    pub fn as_u16(&self) -> u16 {
        self.bits() as u16
    }

    /// Value as `u32`, truncating
    pub fn as_u32(&self) -> u32 {
        self.bits() as u32
    }

    /// Value as `u64`, truncating
    pub fn as_u64(&self) -> u64 {
        self.bits() as u64
    }

    /// Value as `i8`, truncating
    pub fn as_i8(&self) -> i8 {
        self.bits() as i8
    }

    /// Value as `i16`, truncating
    pub fn as_i16(&self) -> i16 {
        self.bits() as i16
    }

    /// Value as `i32`, truncating
    pub fn as_i32(&self) -> i32 {
        self.bits() as i32
    }

    /// Value as `i64`, truncating
    pub fn as_i64(&self) -> i64 {
        self.bits()
    }

    /// Value as `f32`
    pub fn as_f32(&self) -> f32 {
        self.value as f32
    }

    /// Value as `f64`
    pub fn as_f64(&self) -> f64 {
        self.value
    }

    /// Write the kind byte and payload
    pub(crate) fn encode(&self, enc: &mut Encoder) {
        enc.put_u8(self.kind as u8);
        match self.kind {
            DynIntKind::Invalid => {}
            DynIntKind::U8 | DynIntKind::I8 => enc.put_u8(self.bits() as u8),
            DynIntKind::U16 | DynIntKind::I16 => enc.put_u16(self.bits() as u16),
            DynIntKind::U32 | DynIntKind::I32 => enc.put_u32(self.bits() as u32),
            DynIntKind::U64 | DynIntKind::I64 => enc.put_u64(self.bits() as u64),
            DynIntKind::F32 | DynIntKind::F64 => enc.put_f64(self.value),
        }
    }

    /// Read the kind byte and payload
    pub(crate) fn decode(cur: &mut Cursor) -> Result<Self> {
        let byte = cur.get_u8()?;
        let kind = DynIntKind::from_byte(byte).ok_or(Error::InvalidDynIntKind(byte))?;

        let value = match kind {
            DynIntKind::Invalid => 0.0,
            DynIntKind::U8 => cur.get_u8()? as f64,
            DynIntKind::I8 => cur.get_u8()? as i8 as f64,
            DynIntKind::U16 => cur.get_u16()? as f64,
            DynIntKind::I16 => cur.get_u16()? as i16 as f64,
            DynIntKind::U32 => cur.get_u32()? as f64,
            DynIntKind::I32 => cur.get_u32()? as i32 as f64,
            DynIntKind::U64 => cur.get_u64()? as f64,
            DynIntKind::I64 => cur.get_u64()? as i64 as f64,
            DynIntKind::F32 | DynIntKind::F64 => cur.get_f64()?,
        };

        Ok(Self { value, kind })
    }
}

macro_rules! impl_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for DynInt {
                #[inline]
                fn from(value: $t) -> Self {
                    DynInt::new(value as f64)
                }
            }
        )*
    };
}

impl_from_number!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64);
