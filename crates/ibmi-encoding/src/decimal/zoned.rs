//! Zoned decimal (NUMERIC) encoding and decoding.
//!
//! Zoned decimal stores one digit per byte: the zone nibble is high, the
//! digit low. The sign lives in the zone nibble of the rightmost byte.
//! A `NUMERIC(p, s)` column occupies `p` bytes.
//!
//! Example: -123.45 as NUMERIC(5, 2)
//! - Binary: 0xF1 0xF2 0xF3 0xF4 0xD5

use rust_decimal::Decimal;

use super::{decimal_to_digits, digits_to_decimal, HostDecimal, Sign};
use crate::error::EncodingError;
use crate::Result;

/// Decode a zoned decimal field of `digits` bytes.
///
/// # Errors
/// Returns `BufferTooShort` if `bytes` is shorter than the field, and
/// `ConversionFailed` for a digit nibble above 9 or an invalid sign zone.
pub fn unzone_decimal(bytes: &[u8], digits: usize, scale: usize) -> Result<HostDecimal> {
    if digits == 0 || bytes.len() < digits {
        return Err(EncodingError::BufferTooShort {
            expected: digits.max(1),
            actual: bytes.len(),
        });
    }
    let field = &bytes[..digits];

    let mut values = Vec::with_capacity(digits);
    for &byte in field {
        let digit = byte & 0x0F;
        if digit > 9 {
            return Err(EncodingError::ConversionFailed {
                message: format!("invalid zoned digit in byte 0x{:02X}", byte),
            });
        }
        values.push(digit);
    }

    let sign = Sign::from_nibble(field[digits - 1] >> 4)?;
    Ok(digits_to_decimal(&values, scale, sign))
}

/// Encode a decimal as a `NUMERIC(digits, scale)` field.
pub fn zone_decimal(value: &Decimal, digits: usize, scale: usize) -> Result<Vec<u8>> {
    let values = decimal_to_digits(value, digits, scale)?;
    let negative = value.is_sign_negative() && !value.is_zero();

    Ok(values
        .iter()
        .enumerate()
        .map(|(i, &d)| {
            if i == values.len() - 1 && negative {
                0xD0 | d
            } else {
                0xF0 | d
            }
        })
        .collect())
}
