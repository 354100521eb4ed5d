//! IBM i storage formats for journal and record decoding.
//!
//! This crate converts the external field representations used by IBM i
//! database files into Rust values.
//!
//! # Features
//!
//! - **EBCDIC Conversion**: CCSID 37, 500 and 1140
//! - **Packed Decimal**: DECIMAL columns, two digits per byte plus a sign nibble
//! - **Zoned Decimal**: NUMERIC columns, one digit per byte with the sign in the last zone
//! - **Binary Integer**: SMALLINT/INTEGER/BIGINT, big-endian two's complement
//! - **IEEE Float**: REAL/DOUBLE, big-endian
//!
//! # Example
//!
//! ```rust
//! use ibmi_encoding::{unpack_decimal, HostDecimal, CP037};
//! use rust_decimal::Decimal;
//! use std::str::FromStr;
//!
//! assert_eq!(CP037.decode(&[0xC8, 0xC9]), "HI");
//!
//! // DECIMAL(5, 2) holding +123.45
//! let value = unpack_decimal(&[0x12, 0x34, 0x5C], 5, 2).unwrap();
//! assert_eq!(value, HostDecimal::Fixed(Decimal::from_str("123.45").unwrap()));
//! ```

pub mod decimal;
pub mod ebcdic;
pub mod error;

pub use decimal::{
    decode_i16, decode_i32, decode_i64, decode_ieee_long, decode_ieee_short, pack_decimal,
    packed_storage_size, unpack_decimal, unzone_decimal, zone_decimal, HostDecimal, Sign,
};
pub use ebcdic::{CodePage, CP037, CP1140, CP500};
pub use error::EncodingError;

/// Result type for encoding operations.
pub type Result<T> = std::result::Result<T, EncodingError>;
