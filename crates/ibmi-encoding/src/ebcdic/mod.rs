//! EBCDIC text conversion for IBM i host code pages.
//!
//! Character columns in journal entries are stored in the CCSID of the
//! journaled file. This module converts those bytes to UTF-8 and back.
//!
//! # Supported Code Pages
//!
//! - **CCSID 37:** US/Canada, the usual system CCSID
//! - **CCSID 500:** International Latin-1
//! - **CCSID 1140:** CCSID 37 with the Euro sign at 0x9F
//!
//! Use [`CodePage::from_ccsid`] for runtime lookup.

mod tables;

pub use tables::{CodePage, CP037, CP1140, CP500};

use crate::error::EncodingError;
use crate::Result;

impl CodePage {
    /// Decode EBCDIC bytes to a UTF-8 string.
    ///
    /// Every byte maps to exactly one character, so the result has as many
    /// characters as `bytes` has bytes.
    pub fn decode(&self, bytes: &[u8]) -> String {
        bytes.iter().map(|&b| self.ebcdic_to_char(b)).collect()
    }

    /// Encode a UTF-8 string to EBCDIC bytes.
    ///
    /// # Errors
    /// Returns `EncodingError::ConversionFailed` if the string contains
    /// characters that cannot be represented in this code page, including
    /// Latin-1 characters whose byte is taken by a special character.
    pub fn encode(&self, s: &str) -> Result<Vec<u8>> {
        let mut result = Vec::with_capacity(s.len());

        for ch in s.chars() {
            if let Some(&(eb, _)) = self.special_chars.iter().find(|&&(_, c)| c == ch) {
                result.push(eb);
                continue;
            }

            let eb = u8::try_from(u32::from(ch))
                .ok()
                .map(|latin1| self.ascii_to_ebcdic[usize::from(latin1)])
                .filter(|eb| !self.special_chars.iter().any(|&(taken, _)| taken == *eb))
                .ok_or_else(|| EncodingError::ConversionFailed {
                    message: format!(
                        "character '{}' (U+{:04X}) cannot be encoded in {}",
                        ch, ch as u32, self.name
                    ),
                })?;
            result.push(eb);
        }

        Ok(result)
    }

    /// Convert a single EBCDIC byte to its Unicode character.
    pub fn ebcdic_to_char(&self, ebcdic: u8) -> char {
        match self.special_chars.iter().find(|&&(eb, _)| eb == ebcdic) {
            Some(&(_, ch)) => ch,
            None => char::from(self.ebcdic_to_ascii[ebcdic as usize]),
        }
    }

    /// Look up a code page by CCSID number.
    ///
    /// # Errors
    /// Returns `EncodingError::InvalidCodePage` if the CCSID is not supported.
    pub fn from_ccsid(ccsid: u16) -> Result<&'static CodePage> {
        match ccsid {
            37 => Ok(&CP037),
            500 => Ok(&CP500),
            1140 => Ok(&CP1140),
            other => Err(EncodingError::InvalidCodePage(format!("CCSID {}", other))),
        }
    }
}
