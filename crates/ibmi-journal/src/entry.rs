//! Journal entries and the entry-specific data parser.

use ibmi_encoding::CodePage;

use crate::layout::FieldLayout;
use crate::meta::{MetaTable, QualifiedName};
use crate::record::DecodedRecord;
use crate::Result;

/// One journal entry as retrieved from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    /// Journal sequence number.
    pub sequence_number: u64,
    /// Journal code, e.g. `R` for record-level operations.
    pub journal_code: char,
    /// Entry type, e.g. `UB` (update before) or `UP` (update after).
    pub entry_type: String,
    /// Library of the journaled object.
    pub object_library: String,
    /// Name of the journaled object.
    pub object_name: String,
    /// Entry-specific data (JOESD).
    pub specific_data: Vec<u8>,
}

impl JournalEntry {
    pub fn object(&self) -> QualifiedName {
        QualifiedName::new(self.object_library.clone(), self.object_name.clone())
    }
}

/// Decodes the specific data of entries written for one table.
#[derive(Debug, Clone)]
pub struct JoesdParser {
    table: QualifiedName,
    parsing_offset: usize,
    layout: FieldLayout,
}

impl JoesdParser {
    /// Build the record layout of `metadata`.
    pub fn new(metadata: &MetaTable, code_page: &'static CodePage) -> Result<Self> {
        Ok(Self {
            table: metadata.qualified_name(),
            parsing_offset: metadata.parsing_offset,
            layout: FieldLayout::for_table(metadata, code_page)?,
        })
    }

    pub fn layout(&self) -> &FieldLayout {
        &self.layout
    }

    /// Decode the row image carried by `entry`.
    pub fn parse(&self, entry: &JournalEntry) -> Result<DecodedRecord> {
        tracing::trace!(
            table = %self.table,
            sequence = entry.sequence_number,
            entry_type = %entry.entry_type,
            "parsing entry specific data"
        );
        self.layout.decode(
            &entry.specific_data,
            self.parsing_offset,
            &self.table,
            &entry.object(),
        )
    }
}
