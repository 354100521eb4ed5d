//! Integration tests: decoding and comparing before/after images of journal entries.

use std::str::FromStr;
use std::sync::Arc;

use ibmi_encoding::{pack_decimal, zone_decimal, CP037};
use ibmi_journal::{
    compare_records, DataType, FieldLayout, FieldValue, JoesdParser, JournalEntry, JournalError,
    MetaColumn, MetaDataCache, MetaTable, QualifiedName,
};
use rust_decimal::Decimal;

/// Fixed entry header preceding the row image in these fixtures.
const HEADER_LEN: usize = 16;

fn customer_table() -> MetaTable {
    MetaTable::new(
        "APPLIB",
        "CUSTOMER",
        HEADER_LEN,
        vec![
            MetaColumn::new("CUSNO", DataType::Decimal, 7, 0).with_text("Customer number"),
            MetaColumn::new("NAME", DataType::Char, 10, 0).with_text("Name"),
            MetaColumn::new("BALANCE", DataType::Numeric, 9, 2),
            MetaColumn::new("VISITS", DataType::Integer, 0, 0),
        ],
    )
}

fn row_image(cusno: i64, name: &str, balance: &str, visits: i32) -> Vec<u8> {
    let mut data = vec![0u8; HEADER_LEN];
    data.extend(pack_decimal(&Decimal::from(cusno), 7, 0).unwrap());
    data.extend(CP037.encode(&format!("{:<10}", name)).unwrap());
    data.extend(zone_decimal(&Decimal::from_str(balance).unwrap(), 9, 2).unwrap());
    data.extend_from_slice(&visits.to_be_bytes());
    data
}

fn entry(sequence: u64, entry_type: &str, data: Vec<u8>) -> JournalEntry {
    JournalEntry {
        sequence_number: sequence,
        journal_code: 'R',
        entry_type: entry_type.to_string(),
        object_library: "APPLIB".to_string(),
        object_name: "CUSTOMER".to_string(),
        specific_data: data,
    }
}

#[test]
fn test_update_before_and_after_images() {
    let parser = JoesdParser::new(&customer_table(), &CP037).unwrap();

    let before = parser
        .parse(&entry(100, "UB", row_image(4711, "MUELLER", "120.50", 3)))
        .unwrap();
    let after = parser
        .parse(&entry(101, "UP", row_image(4711, "MUELLER", "99.95", 4)))
        .unwrap();

    assert_eq!(before.get("CUSNO"), Some(&FieldValue::Decimal(Decimal::from(4711))));
    assert_eq!(
        after.get("BALANCE"),
        Some(&FieldValue::Decimal(Decimal::from_str("99.95").unwrap()))
    );

    let comparison = compare_records(&before, &after);
    assert!(comparison.different);
    assert!(comparison.highlighted);
    assert_eq!(comparison.field_highlights, vec![false, false, true, true]);
}

#[test]
fn test_properties_use_column_text() {
    let parser = JoesdParser::new(&customer_table(), &CP037).unwrap();
    let record = parser
        .parse(&entry(1, "PT", row_image(1, "ABC", "0.00", 0)))
        .unwrap();
    let properties = record.properties();
    assert_eq!(properties[0], ("CUSNO (Customer number)".to_string(), "1".to_string()));
    assert_eq!(properties[1], ("NAME (Name)".to_string(), "ABC       ".to_string()));
    assert_eq!(properties[2].0, "BALANCE");
}

#[test]
fn test_records_of_different_schemas_are_different() {
    let full = JoesdParser::new(&customer_table(), &CP037).unwrap();
    let mut narrow_table = customer_table();
    narrow_table.columns.truncate(2);
    let narrow = JoesdParser::new(&narrow_table, &CP037).unwrap();

    let data = row_image(7, "SAME", "1.00", 1);
    let a = full.parse(&entry(1, "PT", data.clone())).unwrap();
    let b = narrow.parse(&entry(1, "PT", data)).unwrap();

    let comparison = compare_records(&a, &b);
    assert!(comparison.different);
    assert!(comparison.highlighted);
    assert!(comparison.field_highlights.is_empty());
}

#[test]
fn test_clob_table_cannot_be_parsed() {
    let mut table = customer_table();
    table
        .columns
        .push(MetaColumn::new("NOTES", DataType::Clob, 32000, 0));
    let err = JoesdParser::new(&table, &CP037).unwrap_err();
    assert!(matches!(err, JournalError::UnsupportedFieldType { .. }));
}

#[test]
fn test_layout_shared_between_threads() {
    let layout = Arc::new(FieldLayout::for_table(&customer_table(), &CP037).unwrap());
    let owner = QualifiedName::new("APPLIB", "CUSTOMER");

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let layout = Arc::clone(&layout);
                let owner = owner.clone();
                scope.spawn(move || {
                    let data = row_image(i, "T", "1.00", i as i32);
                    layout.decode(&data, HEADER_LEN, &owner, &owner).unwrap()
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let record = handle.join().unwrap();
            assert_eq!(record.get("VISITS"), Some(&FieldValue::Integer(i as i64)));
        }
    });
}

#[test]
fn test_cache_feeds_parser() {
    let mut cache = MetaDataCache::new(
        |_: &str, library: &str, name: &str| -> ibmi_journal::Result<MetaTable> {
            assert_eq!((library, name), ("APPLIB", "CUSTOMER"));
            Ok(customer_table())
        },
    );
    let table = cache.retrieve("PROD", "APPLIB", "CUSTOMER").unwrap();
    let parser = JoesdParser::new(&table, &CP037).unwrap();
    let record = parser
        .parse(&entry(5, "DL", row_image(9, "GONE", "0.00", 0)))
        .unwrap();
    assert_eq!(record.len(), 4);
}

#[test]
fn test_record_serializes_to_json() {
    let parser = JoesdParser::new(&customer_table(), &CP037).unwrap();
    let record = parser
        .parse(&entry(1, "PT", row_image(12, "X", "3.10", 2)))
        .unwrap();
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["fields"][0]["name"], "CUSNO");
    assert_eq!(json["fields"][3]["value"]["type"], "integer");
    assert_eq!(json["fields"][3]["value"]["value"], 2);
}
