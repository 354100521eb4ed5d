//! # Journal Entry Decoding
//!
//! Decodes the entry-specific data (JOESD) of IBM i journal entries into
//! typed rows, driven by the column metadata of the journaled table.
//!
//! ## Features
//!
//! - **Layouts**: column schema to fixed record layout with running offsets
//! - **Codecs**: binary, float, packed, zoned, character and ISO date/time fields
//! - **Comparison**: field-by-field before/after image highlighting
//! - **Metadata cache**: load-once table schemas with explicit invalidation
//!
//! ## Example
//!
//! ```rust
//! use ibmi_encoding::CP037;
//! use ibmi_journal::{DataType, FieldLayout, FieldValue, MetaColumn, QualifiedName};
//!
//! let columns = vec![MetaColumn::new("ID", DataType::SmallInt, 0, 0)];
//! let layout = FieldLayout::build(&columns, &CP037).unwrap();
//! let table = QualifiedName::new("APPLIB", "ITEMS");
//! let record = layout.decode(&[0x00, 0x2A], 0, &table, &table).unwrap();
//! assert_eq!(record.get("ID"), Some(&FieldValue::Integer(42)));
//! ```

pub mod cache;
pub mod compare;
pub mod entry;
pub mod error;
pub mod layout;
pub mod meta;
pub mod record;

pub use cache::{MetaDataCache, MetaDataLoader};
pub use compare::{compare_records, RecordComparison};
pub use entry::{JoesdParser, JournalEntry};
pub use error::JournalError;
pub use layout::{FieldCodec, FieldLayout, LayoutField};
pub use meta::{DataType, MetaColumn, MetaTable, QualifiedName};
pub use record::{DecodedField, DecodedRecord, FieldValue};

/// Convenience result type for journal operations.
pub type Result<T> = std::result::Result<T, JournalError>;
