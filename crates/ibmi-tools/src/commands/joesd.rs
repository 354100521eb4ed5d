//! Joesd command - decodes journal entry specific data.

use std::path::{Path, PathBuf};

use ibmi_encoding::CodePage;
use ibmi_journal::{compare_records, DecodedRecord, JoesdParser, JournalEntry, MetaTable};
use miette::{IntoDiagnostic, Result, WrapErr};
use serde::Serialize;

/// Arguments of the joesd command.
#[derive(Debug)]
pub struct JoesdArgs {
    pub schema: PathBuf,
    pub data: PathBuf,
    pub library: String,
    pub object: String,
    pub offset: Option<usize>,
    pub ccsid: u16,
    pub compare: Option<PathBuf>,
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct JoesdOutput {
    table: String,
    record: DecodedRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    compare: Option<CompareOutput>,
}

#[derive(Debug, Serialize)]
struct CompareOutput {
    record: DecodedRecord,
    different: bool,
    field_highlights: Vec<bool>,
}

/// Run the joesd command.
pub fn run(args: JoesdArgs) -> Result<()> {
    let mut table = load_schema(&args.schema)?;
    if let Some(offset) = args.offset {
        table.parsing_offset = offset;
    }
    let code_page = CodePage::from_ccsid(args.ccsid)?;

    tracing::info!(
        table = %table.qualified_name(),
        columns = table.columns.len(),
        ccsid = code_page.ccsid,
        "Decoding entry specific data"
    );

    let parser = JoesdParser::new(&table, code_page)?;
    let record = decode_file(&parser, &args, &args.data, 1)?;
    let compare = match &args.compare {
        Some(path) => {
            let other = decode_file(&parser, &args, path, 2)?;
            let comparison = compare_records(&record, &other);
            Some(CompareOutput {
                record: other,
                different: comparison.different,
                field_highlights: comparison.field_highlights,
            })
        }
        None => None,
    };

    let output = JoesdOutput {
        table: table.qualified_name().to_string(),
        record,
        compare,
    };

    if args.json {
        let text = serde_json::to_string_pretty(&output).into_diagnostic()?;
        println!("{}", text);
    } else {
        print_records(&output);
    }
    Ok(())
}

fn load_schema(path: &Path) -> Result<MetaTable> {
    let content = std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read schema: {}", path.display()))?;
    serde_json::from_str(&content)
        .into_diagnostic()
        .wrap_err_with(|| format!("Invalid schema: {}", path.display()))
}

fn decode_file(
    parser: &JoesdParser,
    args: &JoesdArgs,
    path: &Path,
    sequence_number: u64,
) -> Result<DecodedRecord> {
    let specific_data = std::fs::read(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read entry data: {}", path.display()))?;

    let entry = JournalEntry {
        sequence_number,
        journal_code: 'R',
        entry_type: String::new(),
        object_library: args.library.clone(),
        object_name: args.object.clone(),
        specific_data,
    };

    parser
        .parse(&entry)
        .wrap_err_with(|| format!("Failed to decode {}", path.display()))
}

fn print_records(output: &JoesdOutput) {
    println!("Table: {}", output.table);
    println!();

    match &output.compare {
        None => {
            for (label, value) in output.record.properties() {
                println!("  {:<40} {}", label, value);
            }
        }
        Some(compare) => {
            let left = output.record.properties();
            let right = compare.record.properties();
            if compare.field_highlights.is_empty() && compare.different {
                println!("  Records have different layouts");
            }
            for (i, (label, value)) in left.iter().enumerate() {
                let marker = if compare.field_highlights.get(i).copied().unwrap_or(false) {
                    '*'
                } else {
                    ' '
                };
                let other = right.get(i).map(|(_, v)| v.as_str()).unwrap_or_default();
                println!("{} {:<40} {:<30} {}", marker, label, value, other);
            }
            println!();
            println!(
                "{}",
                if compare.different {
                    "Records differ"
                } else {
                    "Records are identical"
                }
            );
        }
    }
}
