//! Joblog command - summarizes a spooled job log.

use std::path::PathBuf;

use ibmi_joblog::{JobLog, JobLogReader, JobLogReaderConfig, Message, MessageFilter, Page};
use miette::{IntoDiagnostic, Result, WrapErr};
use serde::Serialize;

/// JSON form of a job log with the filter applied to its messages.
#[derive(Debug, Serialize)]
struct JobLogOutput<'a> {
    job: String,
    job_description: String,
    header_complete: bool,
    pages: &'a [Page],
    messages: Vec<&'a Message>,
}

/// Run the joblog command.
pub fn run(
    input: PathBuf,
    config: Option<PathBuf>,
    filter: MessageFilter,
    json: bool,
) -> Result<()> {
    let config = match config {
        Some(path) => JobLogReaderConfig::from_file(&path)?,
        None => JobLogReaderConfig::english(),
    };
    tracing::debug!(locale = %config.locale, "Using job log configuration");

    let mut reader = JobLogReader::new(&config)?;
    let job_log = reader
        .load_from_file(&input)
        .and_then(|outcome| outcome.into_checked())
        .wrap_err_with(|| format!("Failed to load job log: {}", input.display()))?;

    if json {
        let output = JobLogOutput {
            job: job_log.qualified_job_name(),
            job_description: job_log.qualified_job_description_name(),
            header_complete: job_log.is_header_complete(),
            pages: job_log.pages(),
            messages: job_log.filtered_messages(&filter).collect(),
        };
        let text = serde_json::to_string_pretty(&output).into_diagnostic()?;
        println!("{}", text);
        return Ok(());
    }

    print_summary(&job_log, &filter);
    Ok(())
}

fn print_summary(job_log: &JobLog, filter: &MessageFilter) {
    let shown = job_log.filtered_messages(filter).count();

    println!("Job log . . . . : {}", job_log.qualified_job_name());
    println!("Job description : {}", job_log.qualified_job_description_name());
    println!("Pages . . . . . : {}", job_log.pages().len());
    println!(
        "Messages  . . . : {} ({} shown)",
        job_log.messages().len(),
        shown
    );

    for page in job_log.pages() {
        let messages: Vec<&Message> = job_log
            .page_messages(page)
            .iter()
            .filter(|m| filter.matches(m))
            .collect();
        if messages.is_empty() {
            continue;
        }

        println!();
        println!("  Page {}", page.number);
        for message in messages {
            let severity = message
                .severity
                .map(|s| format!("{:02}", s))
                .unwrap_or_default();
            println!(
                "    {:<8} {:<12} {:>2}  {} {}",
                message.id, message.message_type, severity, message.date, message.time
            );
            print_attribute("      ", message.text.as_deref());
            print_attribute("      Cause: ", message.cause.as_deref());
            print_attribute("         to: ", message.to_module.as_deref());
            print_attribute("           : ", message.to_procedure.as_deref());
            print_attribute("           : ", message.to_statement.as_deref());
            print_attribute("       from: ", message.from_module.as_deref());
            print_attribute("           : ", message.from_procedure.as_deref());
            print_attribute("           : ", message.from_statement.as_deref());
        }
    }
}

fn print_attribute(label: &str, value: Option<&str>) {
    if let Some(value) = value {
        println!("{}{}", label, value);
    }
}
