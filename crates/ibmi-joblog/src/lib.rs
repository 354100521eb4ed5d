//! # Job Log Parsing
//!
//! Reads spooled IBM i job logs (QPJOBLOG printed as plain text) into a
//! structured [`JobLog`]: job identity, pages and messages with their
//! module, procedure, statement, text and cause attributes.
//!
//! ## Features
//!
//! - **State machine**: idle, page header and message states driven line by line
//! - **Locale patterns**: regular expressions with named groups, loadable from TOML
//! - **Continuation lines**: indented text joined onto the preceding attribute
//! - **Filtering**: select messages by id, type and severity
//!
//! ## Example
//!
//! ```rust
//! use ibmi_joblog::JobLogReader;
//!
//! let mut reader = JobLogReader::english().unwrap();
//! let outcome = reader.parse_lines(["not a job log"]);
//! assert!(outcome.into_checked().is_err());
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod reader;

pub use config::{CompiledPatterns, JobLogReaderConfig, PatternConfig};
pub use error::JobLogError;
pub use filter::MessageFilter;
pub use model::{HeaderField, JobLog, Message, Page};
pub use reader::{JobLogReader, ParseOutcome, ParserState};

/// Convenience result type for job log operations.
pub type Result<T> = std::result::Result<T, JobLogError>;
