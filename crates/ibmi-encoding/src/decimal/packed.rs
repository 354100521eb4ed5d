//! Packed decimal (DECIMAL) encoding and decoding.
//!
//! Packed decimal stores two digits per byte with the rightmost nibble
//! holding the sign. A `DECIMAL(p, s)` column occupies `p / 2 + 1` bytes;
//! when `p` is even the leftmost nibble is a pad digit.
//!
//! Example: +123.45 as DECIMAL(5, 2)
//! - Layout: d1|d2 d3|d4 d5|sign
//! - Binary: 0x12 0x34 0x5F

use rust_decimal::Decimal;

use super::{decimal_to_digits, digits_to_decimal, HostDecimal, Sign};
use crate::error::EncodingError;
use crate::Result;

/// Bytes occupied by a packed decimal with `digits` total digits.
pub fn packed_storage_size(digits: usize) -> usize {
    digits / 2 + 1
}

/// Decode a packed decimal field.
///
/// `digits` is the declared precision and `scale` the number of fractional
/// digits. Only the first `packed_storage_size(digits)` bytes are read.
///
/// # Errors
/// Returns `BufferTooShort` if `bytes` is shorter than the field, and
/// `ConversionFailed` for a digit nibble above 9 or an invalid sign nibble.
pub fn unpack_decimal(bytes: &[u8], digits: usize, scale: usize) -> Result<HostDecimal> {
    let size = packed_storage_size(digits);
    if bytes.len() < size {
        return Err(EncodingError::BufferTooShort {
            expected: size,
            actual: bytes.len(),
        });
    }
    let field = &bytes[..size];

    let mut nibbles = Vec::with_capacity(size * 2 - 1);
    for (i, &byte) in field.iter().enumerate() {
        nibbles.push(byte >> 4);
        if i < size - 1 {
            nibbles.push(byte & 0x0F);
        }
    }

    if let Some(bad) = nibbles.iter().find(|&&n| n > 9) {
        return Err(EncodingError::ConversionFailed {
            message: format!("invalid packed digit nibble 0x{:X} in {:02X?}", bad, field),
        });
    }

    let sign = Sign::from_nibble(field[size - 1] & 0x0F)?;
    Ok(digits_to_decimal(&nibbles, scale, sign))
}

/// Encode a decimal as a `DECIMAL(digits, scale)` field.
///
/// Positive values get the 0xF sign nibble the host writes.
pub fn pack_decimal(value: &Decimal, digits: usize, scale: usize) -> Result<Vec<u8>> {
    let size = packed_storage_size(digits);
    let mut nibbles = decimal_to_digits(value, size * 2 - 1, scale)?;
    let sign = if value.is_sign_negative() && !value.is_zero() {
        Sign::Negative
    } else {
        Sign::Positive
    };
    nibbles.push(sign.to_nibble());

    Ok(nibbles
        .chunks(2)
        .map(|pair| (pair[0] << 4) | pair[1])
        .collect())
}
