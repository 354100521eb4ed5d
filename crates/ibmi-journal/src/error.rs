//! Journal decoding error types.

use ibmi_encoding::EncodingError;
use miette::Diagnostic;
use thiserror::Error;

use crate::meta::{DataType, QualifiedName};

/// Errors produced while building layouts or decoding journal entries.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum JournalError {
    /// A column uses a data type that has no fixed external layout.
    #[error("column {column}: data type {data_type} is not supported")]
    #[diagnostic(
        code(journal::unsupported_field_type),
        help("CLOB columns are stored outside the record and cannot be decoded from entry data")
    )]
    UnsupportedFieldType {
        /// Column name.
        column: String,
        /// Offending data type.
        data_type: DataType,
    },

    /// The schema describes a different object than the one that wrote the entry.
    #[error("table metadata {schema} does not match journal entry object {entry}")]
    #[diagnostic(code(journal::schema_mismatch))]
    SchemaMismatch {
        /// Object the schema was loaded for.
        schema: QualifiedName,
        /// Object recorded in the journal entry.
        entry: QualifiedName,
    },

    /// A single field could not be converted.
    #[error("column {column}: {source}")]
    #[diagnostic(code(journal::field_decode))]
    FieldDecode {
        /// Column name.
        column: String,
        /// Underlying conversion failure.
        #[source]
        source: EncodingError,
    },

    /// Table metadata could not be retrieved.
    #[error("failed to load metadata of {table}: {message}")]
    #[diagnostic(code(journal::metadata_load))]
    MetadataLoad {
        /// Qualified table name.
        table: QualifiedName,
        /// Loader failure text.
        message: String,
    },
}
