//! Before/after image comparison.

use serde::Serialize;

use crate::record::{DecodedRecord, FieldValue};

/// Result of comparing two decoded records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordComparison {
    /// At least one field differs, or the field counts differ.
    pub different: bool,
    /// Both records should be shown highlighted.
    pub highlighted: bool,
    /// Per-field difference flags in schema order. Empty when the field
    /// counts differ, since no field-by-field comparison takes place.
    pub field_highlights: Vec<bool>,
}

/// Compare two records field by field in schema order.
///
/// Records with different field counts are different without looking at
/// any value. Otherwise every field is compared, even after the first
/// difference, so that all differing fields are flagged.
pub fn compare_records(left: &DecodedRecord, right: &DecodedRecord) -> RecordComparison {
    if left.len() != right.len() {
        return RecordComparison {
            different: true,
            highlighted: true,
            field_highlights: Vec::new(),
        };
    }

    let field_highlights: Vec<bool> = left
        .fields()
        .iter()
        .zip(right.fields())
        .map(|(l, r)| !same_value(&l.value, &r.value))
        .collect();
    let different = field_highlights.iter().any(|&d| d);

    RecordComparison {
        different,
        highlighted: different,
        field_highlights,
    }
}

/// Floats are equal when their bit patterns are, so a NaN matches itself.
fn same_value(left: &FieldValue, right: &FieldValue) -> bool {
    match (left, right) {
        (FieldValue::Float(l), FieldValue::Float(r)) => l.to_bits() == r.to_bits(),
        _ => left == right,
    }
}
