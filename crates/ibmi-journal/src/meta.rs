//! Table metadata: the column schema that describes a journaled record.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A `LIBRARY/NAME` pair identifying a host object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QualifiedName {
    /// Library (schema) name.
    pub library: String,
    /// Object (table) name.
    pub name: String,
}

impl QualifiedName {
    pub fn new(library: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            library: library.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.library, self.name)
    }
}

/// SQL data types reported by the host catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataType {
    BigInt,
    Char,
    Clob,
    Date,
    Decimal,
    Double,
    Integer,
    Numeric,
    Real,
    SmallInt,
    Time,
    #[serde(rename = "TIMESTMP")]
    Timestamp,
    VarChar,
}

impl DataType {
    /// Catalog spelling of the type.
    pub fn as_str(self) -> &'static str {
        match self {
            DataType::BigInt => "BIGINT",
            DataType::Char => "CHAR",
            DataType::Clob => "CLOB",
            DataType::Date => "DATE",
            DataType::Decimal => "DECIMAL",
            DataType::Double => "DOUBLE",
            DataType::Integer => "INTEGER",
            DataType::Numeric => "NUMERIC",
            DataType::Real => "REAL",
            DataType::SmallInt => "SMALLINT",
            DataType::Time => "TIME",
            DataType::Timestamp => "TIMESTMP",
            DataType::VarChar => "VARCHAR",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One column of a table schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaColumn {
    /// Column name, unique within the table.
    pub name: String,
    /// Declared SQL type.
    pub data_type: DataType,
    /// Length in bytes for character types, total digits for DECIMAL/NUMERIC.
    #[serde(default)]
    pub size: usize,
    /// Fractional digits for DECIMAL/NUMERIC.
    #[serde(default)]
    pub precision: usize,
    /// Column heading text, for display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_text: Option<String>,
}

impl MetaColumn {
    /// Create a column. The name is trimmed.
    pub fn new(name: &str, data_type: DataType, size: usize, precision: usize) -> Self {
        Self {
            name: name.trim().to_string(),
            data_type,
            size,
            precision,
            column_text: None,
        }
    }

    /// Attach column heading text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.column_text = Some(text.into());
        self
    }

    /// `NAME (column text)`, or just the name when there is no text.
    pub fn display_label(&self) -> String {
        let name = self.name.trim();
        match self.column_text.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => format!("{} ({})", name, text),
            _ => name.to_string(),
        }
    }
}

fn loaded_by_default() -> bool {
    true
}

/// The ordered column schema of a journaled table.
///
/// A value is never modified after it has been handed out; reloading
/// metadata produces a new `MetaTable`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaTable {
    /// Library of the table.
    pub library: String,
    /// Table name.
    pub name: String,
    /// Byte offset of the first column inside the entry-specific data.
    #[serde(default)]
    pub parsing_offset: usize,
    /// Whether the columns were retrieved from the host.
    #[serde(default = "loaded_by_default")]
    pub loaded: bool,
    /// Columns in record order.
    pub columns: Vec<MetaColumn>,
}

impl MetaTable {
    /// A loaded table with the given columns.
    pub fn new(
        library: impl Into<String>,
        name: impl Into<String>,
        parsing_offset: usize,
        columns: Vec<MetaColumn>,
    ) -> Self {
        Self {
            library: library.into(),
            name: name.into(),
            parsing_offset,
            loaded: true,
            columns,
        }
    }

    /// A placeholder for a table whose metadata is not available yet.
    pub fn pending(library: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            library: library.into(),
            name: name.into(),
            parsing_offset: 0,
            loaded: false,
            columns: Vec::new(),
        }
    }

    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::new(self.library.clone(), self.name.clone())
    }

    pub fn column(&self, name: &str) -> Option<&MetaColumn> {
        self.columns.iter().find(|c| c.name == name)
    }
}
