//! Fixed record layouts built from table metadata.
//!
//! Building walks the columns left to right, picks a [`FieldCodec`] for each
//! declared type and assigns the running byte offset. Decoding reads each
//! field at `start_offset + offset` and converts it with its codec.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use ibmi_encoding::{
    decode_i16, decode_i32, decode_i64, decode_ieee_long, decode_ieee_short, packed_storage_size,
    unpack_decimal, unzone_decimal, CodePage, EncodingError,
};

use crate::error::JournalError;
use crate::meta::{DataType, MetaColumn, MetaTable, QualifiedName};
use crate::record::{DecodedField, DecodedRecord, FieldValue};
use crate::Result;

/// Length prefix that precedes VARCHAR data.
pub const VARCHAR_PREFIX_LEN: usize = 2;
/// `YYYY-MM-DD`
pub const DATE_LEN: usize = 10;
/// `HH.MM.SS`
pub const TIME_LEN: usize = 8;
/// `YYYY-MM-DD-HH.MM.SS.ffffff`
pub const TIMESTAMP_LEN: usize = 26;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H.%M.%S";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H.%M.%S%.f";

/// How one field is stored in the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCodec {
    SmallInt,
    Integer,
    BigInt,
    Real,
    Double,
    Char { len: usize },
    VarChar { max_len: usize },
    Packed { digits: usize, scale: usize },
    Zoned { digits: usize, scale: usize },
    Date,
    Time,
    Timestamp,
}

impl FieldCodec {
    /// Select the codec for a column, or `None` for types without a fixed layout.
    pub fn for_column(column: &MetaColumn) -> Option<Self> {
        let codec = match column.data_type {
            DataType::BigInt => FieldCodec::BigInt,
            DataType::Char => FieldCodec::Char { len: column.size },
            DataType::Clob => return None,
            DataType::Date => FieldCodec::Date,
            DataType::Decimal => FieldCodec::Packed {
                digits: column.size,
                scale: column.precision,
            },
            DataType::Double => FieldCodec::Double,
            DataType::Integer => FieldCodec::Integer,
            DataType::Numeric => FieldCodec::Zoned {
                digits: column.size,
                scale: column.precision,
            },
            DataType::Real => FieldCodec::Real,
            DataType::SmallInt => FieldCodec::SmallInt,
            DataType::Time => FieldCodec::Time,
            DataType::Timestamp => FieldCodec::Timestamp,
            DataType::VarChar => FieldCodec::VarChar {
                max_len: column.size,
            },
        };
        Some(codec)
    }

    /// Bytes the field occupies in the record.
    pub fn width(&self) -> usize {
        match *self {
            FieldCodec::SmallInt => 2,
            FieldCodec::Integer | FieldCodec::Real => 4,
            FieldCodec::BigInt | FieldCodec::Double => 8,
            FieldCodec::Char { len } => len,
            FieldCodec::VarChar { max_len } => max_len + VARCHAR_PREFIX_LEN,
            FieldCodec::Packed { digits, .. } => packed_storage_size(digits),
            FieldCodec::Zoned { digits, .. } => digits,
            FieldCodec::Date => DATE_LEN,
            FieldCodec::Time => TIME_LEN,
            FieldCodec::Timestamp => TIMESTAMP_LEN,
        }
    }

    /// Convert exactly `self.width()` bytes.
    pub fn decode(&self, bytes: &[u8], code_page: &CodePage) -> ibmi_encoding::Result<FieldValue> {
        let value = match *self {
            FieldCodec::SmallInt => FieldValue::Integer(i64::from(decode_i16(bytes)?)),
            FieldCodec::Integer => FieldValue::Integer(i64::from(decode_i32(bytes)?)),
            FieldCodec::BigInt => FieldValue::Integer(decode_i64(bytes)?),
            FieldCodec::Real => FieldValue::Float(decode_ieee_short(bytes)?),
            FieldCodec::Double => FieldValue::Float(decode_ieee_long(bytes)?),
            FieldCodec::Char { .. } => FieldValue::Text(code_page.decode(bytes)),
            FieldCodec::VarChar { max_len } => {
                FieldValue::Text(decode_varchar(bytes, max_len, code_page)?)
            }
            FieldCodec::Packed { digits, scale } => {
                FieldValue::from(unpack_decimal(bytes, digits, scale)?)
            }
            FieldCodec::Zoned { digits, scale } => {
                FieldValue::from(unzone_decimal(bytes, digits, scale)?)
            }
            FieldCodec::Date => {
                let text = code_page.decode(bytes);
                FieldValue::Date(parse_host_text(&text, |t| {
                    NaiveDate::parse_from_str(t, DATE_FORMAT)
                })?)
            }
            FieldCodec::Time => {
                let text = code_page.decode(bytes);
                FieldValue::Time(parse_host_text(&text, |t| {
                    NaiveTime::parse_from_str(t, TIME_FORMAT)
                })?)
            }
            FieldCodec::Timestamp => {
                let text = code_page.decode(bytes);
                FieldValue::Timestamp(parse_host_text(&text, |t| {
                    NaiveDateTime::parse_from_str(t, TIMESTAMP_FORMAT)
                })?)
            }
        };
        Ok(value)
    }
}

fn decode_varchar(
    bytes: &[u8],
    max_len: usize,
    code_page: &CodePage,
) -> ibmi_encoding::Result<String> {
    let len = usize::from(decode_i16(bytes)? as u16);
    if len > max_len {
        return Err(EncodingError::ConversionFailed {
            message: format!("VARCHAR length {} exceeds maximum {}", len, max_len),
        });
    }
    let data = &bytes[VARCHAR_PREFIX_LEN..];
    if data.len() < len {
        return Err(EncodingError::BufferTooShort {
            expected: VARCHAR_PREFIX_LEN + len,
            actual: bytes.len(),
        });
    }
    Ok(code_page.decode(&data[..len]))
}

fn parse_host_text<T>(
    text: &str,
    parse: impl FnOnce(&str) -> chrono::ParseResult<T>,
) -> ibmi_encoding::Result<T> {
    parse(text).map_err(|e| EncodingError::ConversionFailed {
        message: format!("'{}': {}", text, e),
    })
}

/// A column placed in the record layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutField {
    pub name: String,
    pub label: String,
    pub codec: FieldCodec,
    /// Offset relative to the first column.
    pub offset: usize,
}

/// Immutable record layout. Safe to share between threads.
#[derive(Debug, Clone)]
pub struct FieldLayout {
    fields: Vec<LayoutField>,
    record_length: usize,
    code_page: &'static CodePage,
}

impl FieldLayout {
    /// Build the layout for `columns` in declared order.
    ///
    /// # Errors
    /// Fails with [`JournalError::UnsupportedFieldType`] at the first CLOB
    /// column; no layout is produced.
    pub fn build(columns: &[MetaColumn], code_page: &'static CodePage) -> Result<Self> {
        let mut fields = Vec::with_capacity(columns.len());
        let mut offset = 0;

        for column in columns {
            let codec = FieldCodec::for_column(column).ok_or_else(|| {
                JournalError::UnsupportedFieldType {
                    column: column.name.trim().to_string(),
                    data_type: column.data_type,
                }
            })?;
            fields.push(LayoutField {
                name: column.name.trim().to_string(),
                label: column.display_label(),
                codec,
                offset,
            });
            offset += codec.width();
        }

        tracing::debug!(
            columns = fields.len(),
            record_length = offset,
            ccsid = code_page.ccsid,
            "record layout built"
        );

        Ok(Self {
            fields,
            record_length: offset,
            code_page,
        })
    }

    /// Build the layout for a table's columns.
    pub fn for_table(table: &MetaTable, code_page: &'static CodePage) -> Result<Self> {
        Self::build(&table.columns, code_page)
    }

    pub fn fields(&self) -> &[LayoutField] {
        &self.fields
    }

    /// Sum of all field widths.
    pub fn record_length(&self) -> usize {
        self.record_length
    }

    pub fn code_page(&self) -> &'static CodePage {
        self.code_page
    }

    /// Decode the record that starts at `start_offset` inside `buffer`.
    ///
    /// `owner` is the object the layout was built for and `entry` the object
    /// recorded in the journal entry; they must be equal.
    ///
    /// # Errors
    /// [`JournalError::SchemaMismatch`] if the objects differ, and
    /// [`JournalError::FieldDecode`] for the first field that cannot be
    /// converted. No partial record is returned.
    pub fn decode(
        &self,
        buffer: &[u8],
        start_offset: usize,
        owner: &QualifiedName,
        entry: &QualifiedName,
    ) -> Result<DecodedRecord> {
        if owner != entry {
            return Err(JournalError::SchemaMismatch {
                schema: owner.clone(),
                entry: entry.clone(),
            });
        }

        let mut decoded = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let value = self
                .read_field(buffer, start_offset, field)
                .map_err(|source| {
                    tracing::debug!(column = %field.name, error = %source, "field decode failed");
                    JournalError::FieldDecode {
                        column: field.name.clone(),
                        source,
                    }
                })?;
            decoded.push(DecodedField {
                name: field.name.clone(),
                label: field.label.clone(),
                value,
            });
        }

        Ok(DecodedRecord::new(decoded))
    }

    fn read_field(
        &self,
        buffer: &[u8],
        start_offset: usize,
        field: &LayoutField,
    ) -> ibmi_encoding::Result<FieldValue> {
        let width = field.codec.width();
        let range = start_offset
            .checked_add(field.offset)
            .and_then(|begin| Some(begin..begin.checked_add(width)?));
        let bytes = range
            .and_then(|range| buffer.get(range))
            .ok_or(EncodingError::BufferTooShort {
                expected: start_offset
                    .saturating_add(field.offset)
                    .saturating_add(width),
                actual: buffer.len(),
            })?;
        field.codec.decode(bytes, self.code_page)
    }
}
