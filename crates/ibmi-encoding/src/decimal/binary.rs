//! Binary integer (SMALLINT/INTEGER/BIGINT) decoding.
//!
//! IBM i stores binary columns in big-endian two's complement.

use crate::error::EncodingError;
use crate::Result;

fn take<const N: usize>(bytes: &[u8]) -> Result<[u8; N]> {
    bytes
        .get(..N)
        .and_then(|b| b.try_into().ok())
        .ok_or(EncodingError::BufferTooShort {
            expected: N,
            actual: bytes.len(),
        })
}

/// Decode a 2-byte SMALLINT.
pub fn decode_i16(bytes: &[u8]) -> Result<i16> {
    take::<2>(bytes).map(i16::from_be_bytes)
}

/// Decode a 4-byte INTEGER.
pub fn decode_i32(bytes: &[u8]) -> Result<i32> {
    take::<4>(bytes).map(i32::from_be_bytes)
}

/// Decode an 8-byte BIGINT.
pub fn decode_i64(bytes: &[u8]) -> Result<i64> {
    take::<8>(bytes).map(i64::from_be_bytes)
}
