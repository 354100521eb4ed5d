//! Encoding error types.

use miette::Diagnostic;
use thiserror::Error;

/// Errors produced while converting host storage formats.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum EncodingError {
    /// The bytes do not form a valid value of the requested format.
    #[error("conversion failed: {message}")]
    #[diagnostic(code(encoding::conversion_failed))]
    ConversionFailed {
        /// What went wrong.
        message: String,
    },

    /// The requested code page is not supported.
    #[error("unsupported code page: {0}")]
    #[diagnostic(code(encoding::invalid_code_page))]
    InvalidCodePage(String),

    /// Fewer bytes are available than the format requires.
    #[error("buffer too short: expected {expected} bytes, got {actual}")]
    #[diagnostic(code(encoding::buffer_too_short))]
    BufferTooShort {
        /// Bytes required.
        expected: usize,
        /// Bytes available.
        actual: usize,
    },
}
