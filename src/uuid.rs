//! UUID text <-> wire conversion
//!
//! UUIDs travel as 16 raw bytes. Text is accepted with or without hyphens and
//! in any case; decoded text is always 32 lowercase hex characters with no
//! hyphens.

use crate::error::{Error, Result};

/// Number of raw bytes a UUID occupies on the wire
pub const UUID_LEN: usize = 16;

/// Parse UUID text into its raw bytes
pub fn parse(text: &str) -> Result<[u8; UUID_LEN]> {
    let normalized: String = text
        .chars()
        .filter(|c| *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if normalized.len() != UUID_LEN * 2 {
        return Err(Error::InvalidUuidFormat(normalized));
    }

    let mut raw = [0u8; UUID_LEN];
    hex::decode_to_slice(&normalized, &mut raw)
        .map_err(|_| Error::InvalidUuidFormat(normalized.clone()))?;
    Ok(raw)
}

/// Render raw UUID bytes as 32 lowercase hex characters
#[inline]
pub fn format(raw: &[u8]) -> String {
    hex::encode(raw)
}
