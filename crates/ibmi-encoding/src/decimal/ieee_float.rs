//! IEEE 754 floating point (REAL/DOUBLE) decoding.
//!
//! REAL maps to single precision (4 bytes), DOUBLE to double precision
//! (8 bytes). Both are stored big-endian. NaN and the infinities are
//! legal column values and decode as such.

use crate::error::EncodingError;
use crate::Result;

/// Decode a 4-byte REAL, widened to f64.
///
/// # Errors
/// Returns `BufferTooShort` for fewer than 4 bytes.
pub fn decode_ieee_short(bytes: &[u8]) -> Result<f64> {
    let raw: [u8; 4] = bytes
        .get(..4)
        .and_then(|b| b.try_into().ok())
        .ok_or(EncodingError::BufferTooShort {
            expected: 4,
            actual: bytes.len(),
        })?;
    Ok(f64::from(f32::from_be_bytes(raw)))
}

/// Decode an 8-byte DOUBLE.
///
/// # Errors
/// Returns `BufferTooShort` for fewer than 8 bytes.
pub fn decode_ieee_long(bytes: &[u8]) -> Result<f64> {
    let raw: [u8; 8] = bytes
        .get(..8)
        .and_then(|b| b.try_into().ok())
        .ok_or(EncodingError::BufferTooShort {
            expected: 8,
            actual: bytes.len(),
        })?;
    Ok(f64::from_be_bytes(raw))
}
