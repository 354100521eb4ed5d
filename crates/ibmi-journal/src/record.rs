//! Decoded record values.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use ibmi_encoding::HostDecimal;
use rust_decimal::Decimal;
use serde::Serialize;

/// A typed column value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// CHAR and VARCHAR.
    Text(String),
    /// SMALLINT, INTEGER and BIGINT.
    Integer(i64),
    /// DECIMAL and NUMERIC.
    Decimal(Decimal),
    /// DECIMAL and NUMERIC values beyond 28 digits or scale 28, as exact text.
    WideDecimal(String),
    /// REAL and DOUBLE.
    Float(f64),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Decimal(d) => write!(f, "{}", d),
            FieldValue::WideDecimal(text) => f.write_str(text),
            FieldValue::Float(x) => write!(f, "{}", x),
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FieldValue::Time(t) => write!(f, "{}", t.format("%H.%M.%S")),
            FieldValue::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d-%H.%M.%S%.6f")),
        }
    }
}

impl From<HostDecimal> for FieldValue {
    fn from(value: HostDecimal) -> Self {
        match value {
            HostDecimal::Fixed(d) => FieldValue::Decimal(d),
            HostDecimal::Wide(text) => FieldValue::WideDecimal(text),
        }
    }
}

/// One decoded column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedField {
    pub name: String,
    /// Display label, see [`crate::MetaColumn::display_label`].
    pub label: String,
    pub value: FieldValue,
}

/// A record decoded from journal entry data, columns in schema order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedRecord {
    fields: Vec<DecodedField>,
}

impl DecodedRecord {
    pub(crate) fn new(fields: Vec<DecodedField>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[DecodedField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Value of the named column.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    /// `(label, rendered value)` pairs in schema order, as shown in entry detail views.
    pub fn properties(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .map(|f| (f.label.clone(), f.value.to_string()))
            .collect()
    }
}
