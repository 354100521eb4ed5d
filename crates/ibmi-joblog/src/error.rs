//! Job log error types.

use miette::Diagnostic;
use thiserror::Error;

use crate::model::JobLog;

/// Errors produced while configuring or running the job log reader.
#[derive(Debug, Error, Diagnostic)]
pub enum JobLogError {
    /// The job log source could not be opened.
    #[error("cannot open job log: {0}")]
    #[diagnostic(code(joblog::io))]
    Io(#[from] std::io::Error),

    /// Reading failed part way through; `partial` holds what was parsed so far.
    #[error("read error after {} page(s): {source}", .partial.pages().len())]
    #[diagnostic(code(joblog::stream))]
    Stream {
        #[source]
        source: std::io::Error,
        partial: Box<JobLog>,
    },

    /// No page header line was recognised anywhere in the input.
    #[error("not a job log: no page header line was found")]
    #[diagnostic(
        code(joblog::invalid_format),
        help("check that the spooled file is a QPJOBLOG and that the locale patterns match its language")
    )]
    InvalidJobLogFormat,

    /// A configured pattern is not a valid regular expression.
    #[error("pattern '{name}' is invalid: {source}")]
    #[diagnostic(code(joblog::invalid_pattern))]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    /// A configured pattern lacks a capture group the reader depends on.
    #[error("pattern '{pattern}' has no capture group named '{group}'")]
    #[diagnostic(code(joblog::missing_capture_group))]
    MissingCaptureGroup { pattern: String, group: String },

    /// The configuration file could not be read or is inconsistent.
    #[error("invalid job log configuration {path}: {message}")]
    #[diagnostic(code(joblog::config))]
    Config { path: String, message: String },
}
