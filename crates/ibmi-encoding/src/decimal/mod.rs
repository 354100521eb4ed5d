//! Numeric storage formats of IBM i database fields.
//!
//! - **Packed Decimal (DECIMAL)**: BCD encoding with a trailing sign nibble
//! - **Zoned Decimal (NUMERIC)**: one digit per byte, sign in the last zone nibble
//! - **Binary (SMALLINT/INTEGER/BIGINT)**: big-endian two's complement
//! - **IEEE Float (REAL/DOUBLE)**: big-endian IEEE 754

mod binary;
mod ieee_float;
mod packed;
mod zoned;

pub use binary::{decode_i16, decode_i32, decode_i64};
pub use ieee_float::{decode_ieee_long, decode_ieee_short};
pub use packed::{pack_decimal, packed_storage_size, unpack_decimal};
pub use zoned::{unzone_decimal, zone_decimal};

use std::fmt;

use rust_decimal::Decimal;

use crate::error::EncodingError;
use crate::Result;

/// Sign of a packed or zoned decimal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// Sign nibble 0xC, 0xA or 0xE.
    Positive,
    /// Sign nibble 0xD or 0xB.
    Negative,
    /// Sign nibble 0xF, treated as positive.
    Unsigned,
}

impl Sign {
    /// Parse a sign nibble.
    pub fn from_nibble(nibble: u8) -> Result<Self> {
        match nibble & 0x0F {
            0x0C | 0x0A | 0x0E => Ok(Sign::Positive),
            0x0D | 0x0B => Ok(Sign::Negative),
            0x0F => Ok(Sign::Unsigned),
            other => Err(EncodingError::ConversionFailed {
                message: format!("invalid sign nibble: 0x{:X}", other),
            }),
        }
    }

    /// The preferred sign nibble written by the host (0xF for positive).
    pub fn to_nibble(self) -> u8 {
        match self {
            Sign::Negative => 0x0D,
            Sign::Positive | Sign::Unsigned => 0x0F,
        }
    }
}

/// A decoded DECIMAL or NUMERIC value.
///
/// The host allows up to 63 digits and any scale up to the precision.
/// Values that `Decimal` can hold (28 digits, scale 28) are returned as
/// `Fixed`; anything wider is kept as exact text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HostDecimal {
    Fixed(Decimal),
    /// Canonical text: optional `-`, integer digits without leading zeros,
    /// then exactly `scale` fractional digits.
    Wide(String),
}

impl HostDecimal {
    /// The value as a `Decimal`, if it fits one.
    pub fn as_decimal(&self) -> Option<&Decimal> {
        match self {
            HostDecimal::Fixed(d) => Some(d),
            HostDecimal::Wide(_) => None,
        }
    }
}

impl From<Decimal> for HostDecimal {
    fn from(value: Decimal) -> Self {
        HostDecimal::Fixed(value)
    }
}

impl fmt::Display for HostDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostDecimal::Fixed(d) => write!(f, "{}", d),
            HostDecimal::Wide(text) => f.write_str(text),
        }
    }
}

/// Build a value from validated digits (0-9, most significant first).
///
/// `scale` is the number of fractional digits.
pub(crate) fn digits_to_decimal(digits: &[u8], scale: usize, sign: Sign) -> HostDecimal {
    match fixed_decimal(digits, scale, sign) {
        Some(value) => HostDecimal::Fixed(value),
        None => HostDecimal::Wide(digits_to_text(digits, scale, sign)),
    }
}

fn fixed_decimal(digits: &[u8], scale: usize, sign: Sign) -> Option<Decimal> {
    let mut mantissa: i128 = 0;
    for &d in digits {
        mantissa = mantissa.checked_mul(10)?.checked_add(i128::from(d))?;
    }
    if sign == Sign::Negative {
        mantissa = -mantissa;
    }
    let scale = u32::try_from(scale).ok()?;
    Decimal::try_from_i128_with_scale(mantissa, scale).ok()
}

fn digits_to_text(digits: &[u8], scale: usize, sign: Sign) -> String {
    let mut padded = vec![0u8; (scale + 1).saturating_sub(digits.len())];
    padded.extend_from_slice(digits);
    let (int_part, frac_part) = padded.split_at(padded.len() - scale);

    let first = int_part
        .iter()
        .position(|&d| d != 0)
        .unwrap_or(int_part.len() - 1);
    let mut text = String::with_capacity(padded.len() + 2);
    if sign == Sign::Negative && padded.iter().any(|&d| d != 0) {
        text.push('-');
    }
    text.extend(int_part[first..].iter().map(|&d| char::from(b'0' + d)));
    if !frac_part.is_empty() {
        text.push('.');
        text.extend(frac_part.iter().map(|&d| char::from(b'0' + d)));
    }
    text
}

/// Split a decimal into exactly `total_digits` digits at the given scale.
pub(crate) fn decimal_to_digits(value: &Decimal, total_digits: usize, scale: usize) -> Result<Vec<u8>> {
    let mut scaled = value.abs();
    scaled.rescale(scale as u32);
    let digit_string = scaled.mantissa().to_string();

    if digit_string.len() > total_digits {
        return Err(EncodingError::ConversionFailed {
            message: format!(
                "value {} requires {} digits but only {} available",
                value,
                digit_string.len(),
                total_digits
            ),
        });
    }

    let mut digits = vec![0u8; total_digits - digit_string.len()];
    digits.extend(digit_string.bytes().map(|b| b - b'0'));
    Ok(digits)
}
