//! Line-driven job log state machine.
//!
//! ```text
//! Idle --page break--> PageHeader --identity complete--> Message
//!                          ^                                |
//!                          +-- page break, identity incomplete
//! ```
//!
//! A page break is checked on every line. Once all five identity fields
//! are known, page breaks only start a new [`Page`](crate::Page).

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use regex::Captures;
use serde::Serialize;

use crate::config::{CompiledPatterns, JobLogReaderConfig};
use crate::error::JobLogError;
use crate::model::{JobLog, Message};
use crate::Result;

/// Reader state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParserState {
    /// No page break seen yet.
    Idle,
    /// Collecting job identity fields from page headers.
    PageHeader,
    /// Collecting messages and their attributes.
    Message,
}

/// Result of one parse run.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub job_log: JobLog,
    /// Characters read, line terminators excluded.
    pub chars_processed: usize,
    /// State the reader ended in.
    pub state: ParserState,
}

impl ParseOutcome {
    /// The job log, or [`JobLogError::InvalidJobLogFormat`] when no page break was ever found.
    pub fn into_checked(self) -> Result<JobLog> {
        if self.state == ParserState::Idle {
            return Err(JobLogError::InvalidJobLogFormat);
        }
        Ok(self.job_log)
    }
}

/// The message currently receiving attribute lines.
#[derive(Debug)]
struct PendingMessage {
    index: usize,
    /// Leading whitespace of continuation lines, fixed by the first attribute line.
    indent: Option<String>,
    attributes: Vec<String>,
}

/// Parses the lines of a spooled job log into a [`JobLog`].
///
/// One reader handles one stream at a time; every `load_*`/`parse_lines`
/// call starts from a fresh state.
#[derive(Debug)]
pub struct JobLogReader {
    patterns: CompiledPatterns,
    state: ParserState,
    header_count: usize,
    job_log: JobLog,
    pending: Option<PendingMessage>,
    chars_processed: usize,
}

impl JobLogReader {
    /// Create a reader for the given locale configuration.
    pub fn new(config: &JobLogReaderConfig) -> Result<Self> {
        Ok(Self::with_patterns(config.compile()?))
    }

    /// Create a reader for English job logs.
    pub fn english() -> Result<Self> {
        Self::new(&JobLogReaderConfig::english())
    }

    pub fn with_patterns(patterns: CompiledPatterns) -> Self {
        Self {
            patterns,
            state: ParserState::Idle,
            header_count: 0,
            job_log: JobLog::new(),
            pending: None,
            chars_processed: 0,
        }
    }

    /// Discard all progress and return to [`ParserState::Idle`].
    pub fn reset(&mut self) {
        self.state = ParserState::Idle;
        self.header_count = 0;
        self.job_log = JobLog::new();
        self.pending = None;
        self.chars_processed = 0;
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Job log parsed so far. Attributes of the current message are not applied yet.
    pub fn job_log(&self) -> &JobLog {
        &self.job_log
    }

    /// Process one line, without its terminator.
    pub fn feed_line(&mut self, line: &str) {
        self.chars_processed += line.chars().count();

        self.check_for_start_of_page(line);

        match self.state {
            ParserState::Idle => {}
            ParserState::PageHeader => self.parse_page_header(line),
            ParserState::Message => self.parse_message(line),
        }
    }

    /// Flush the current message and hand out the result. The reader is reset.
    pub fn finish(&mut self) -> ParseOutcome {
        self.finish_pending();
        let outcome = ParseOutcome {
            job_log: std::mem::take(&mut self.job_log),
            chars_processed: self.chars_processed,
            state: self.state,
        };
        self.reset();
        outcome
    }

    /// Parse already split lines.
    pub fn parse_lines<'a, I>(&mut self, lines: I) -> ParseOutcome
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.reset();
        for line in lines {
            self.feed_line(line);
        }
        self.finish()
    }

    /// Parse a job log from a line-oriented source.
    ///
    /// A read error aborts the parse with [`JobLogError::Stream`], which carries
    /// the job log accumulated up to that point.
    pub fn load_from_stream<R: BufRead>(&mut self, source: R) -> Result<ParseOutcome> {
        self.reset();
        for line in source.lines() {
            match line {
                Ok(line) => self.feed_line(&line),
                Err(source) => {
                    let outcome = self.finish();
                    tracing::error!(
                        error = %source,
                        pages = outcome.job_log.pages().len(),
                        "Job log read failed"
                    );
                    return Err(JobLogError::Stream {
                        source,
                        partial: Box::new(outcome.job_log),
                    });
                }
            }
        }
        Ok(self.finish())
    }

    /// Parse a job log stream file.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<ParseOutcome> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let outcome = self.load_from_stream(BufReader::new(file))?;
        tracing::info!(
            path = %path.display(),
            job = %outcome.job_log.qualified_job_name(),
            pages = outcome.job_log.pages().len(),
            messages = outcome.job_log.messages().len(),
            chars = outcome.chars_processed,
            "Job log loaded"
        );
        Ok(outcome)
    }

    fn check_for_start_of_page(&mut self, line: &str) {
        if line.chars().count() <= self.patterns.page_header_min_width {
            return;
        }

        let Some(caps) = self.patterns.start_of_page.captures(line.trim()) else {
            return;
        };

        let number = match group(&caps, "page").trim().parse::<u32>() {
            Ok(number) => number,
            Err(e) => {
                tracing::warn!(page = %group(&caps, "page"), error = %e, "Ignoring page break with bad page number");
                return;
            }
        };

        self.job_log.add_page(number);
        tracing::debug!(page = number, "Page started");

        if !self.job_log.is_header_complete() {
            self.state = ParserState::PageHeader;
        }
    }

    fn parse_page_header(&mut self, line: &str) {
        if !self.job_log.is_header_complete() {
            for caps in self.patterns.page_header.captures_iter(line) {
                let position = self.header_count;
                self.header_count += 1;
                if let Some(field) = self.patterns.header_field(position) {
                    self.job_log.set_header_field(field, group(&caps, "value").trim());
                }
            }
        }

        if self.job_log.is_header_complete() {
            tracing::debug!(job = %self.job_log.qualified_job_name(), "Job identity complete");
            self.state = ParserState::Message;
        }
    }

    fn parse_message(&mut self, line: &str) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return;
        }

        if let Some(caps) = self.patterns.start_of_message.captures(trimmed) {
            let severity = match caps.name("severity") {
                Some(m) => match m.as_str().trim().parse::<u32>() {
                    Ok(severity) => Some(severity),
                    Err(e) => {
                        tracing::warn!(severity = %m.as_str(), error = %e, "Ignoring message with bad severity");
                        return;
                    }
                },
                None => None,
            };

            self.finish_pending();

            let message = Message {
                id: group(&caps, "id").to_string(),
                message_type: group(&caps, "type").to_string(),
                severity,
                date: group(&caps, "date").to_string(),
                time: group(&caps, "time").to_string(),
                ..Message::default()
            };
            match self.job_log.add_message(message) {
                Some(index) => {
                    self.pending = Some(PendingMessage {
                        index,
                        indent: None,
                        attributes: Vec::new(),
                    });
                }
                None => tracing::warn!("Ignoring message before first page"),
            }
            return;
        }

        let Some(pending) = self.pending.as_mut() else {
            return;
        };

        if let Some(caps) = self.patterns.message_attribute.captures(line) {
            if pending.attributes.is_empty() {
                let leading = line.len() - line.trim_start().len();
                pending.indent = Some(" ".repeat(leading + 2));
            }
            pending.attributes.push(group(&caps, "value").trim().to_string());
            return;
        }

        if let Some(indent) = &pending.indent {
            if let Some(last) = pending.attributes.last_mut() {
                if let Some(rest) = line.strip_prefix(indent.as_str()) {
                    concatenate(last, rest.trim());
                }
            }
        }
    }

    fn finish_pending(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };

        if pending.attributes.len() > self.patterns.max_message_attributes {
            tracing::warn!(
                attributes = pending.attributes.len(),
                max = self.patterns.max_message_attributes,
                "Message has more attribute lines than the locale defines"
            );
        }

        if let Some(message) = self.job_log.message_mut(pending.index) {
            message.apply_attributes(&pending.attributes);
        }
    }
}

/// Text of a named group, empty when it did not participate in the match.
fn group<'h>(caps: &Captures<'h>, name: &str) -> &'h str {
    caps.name(name).map(|m| m.as_str()).unwrap_or_default()
}

/// Append a continuation line, separated by one space unless `value` is empty.
fn concatenate(value: &mut String, continuation: &str) {
    if !value.is_empty() {
        value.push(' ');
    }
    value.push_str(continuation);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_line(number: u32) -> String {
        format!(
            " 5770SS1 V7R3M0  160422                    Display Job Log                     GFD400   03.11.16  14:58:40 CET     Page {:>4}",
            number
        )
    }

    const HEADER_1: &str = "  Job name . . . . . . . . . . :   QPADEV0001      User  . . . . . . :   RADDATZ      Number . . . . . . . . . . . :   712703";
    const HEADER_2: &str = "  Job description  . . . . . . :   QDFTJOBD        Library . . . . . :   QGPL";
    const COLUMNS: &str = " MSGID      TYPE                    SEV  DATE      TIME             FROM PGM     LIBRARY     INST     TO PGM      LIBRARY     INST";

    fn attribute(label: &str, value: &str) -> String {
        format!("{:>36}{} . . . . :   {}", "", label, value)
    }

    fn reader() -> JobLogReader {
        JobLogReader::english().unwrap()
    }

    fn header_lines() -> Vec<String> {
        vec![page_line(1), HEADER_1.to_string(), HEADER_2.to_string(), COLUMNS.to_string()]
    }

    fn parse(lines: &[String]) -> ParseOutcome {
        reader().parse_lines(lines.iter().map(String::as_str))
    }

    #[test]
    fn test_idle_until_page_break() {
        let mut r = reader();
        r.feed_line("some text");
        r.feed_line(HEADER_1);
        assert_eq!(r.state(), ParserState::Idle);
        assert!(r.job_log().job_name().is_none());
        r.feed_line(&page_line(1));
        assert_eq!(r.state(), ParserState::PageHeader);
        assert_eq!(r.job_log().pages()[0].number, 1);
    }

    #[test]
    fn test_short_line_is_not_page_break() {
        let mut r = reader();
        r.feed_line("5770SS1 V7R3M0 160422 Display Job Log Page 1");
        assert_eq!(r.state(), ParserState::Idle);
        assert!(r.job_log().pages().is_empty());
    }

    #[test]
    fn test_header_fields_in_order() {
        let mut r = reader();
        r.feed_line(&page_line(1));
        r.feed_line("  Job name . . . . . . . . . . :   QPADEV0001");
        r.feed_line("  User . . . . . . . . . . . . :   RADDATZ");
        r.feed_line("  Number . . . . . . . . . . . :   712703");
        r.feed_line("  Job description  . . . . . . :   QDFTJOBD");
        assert!(!r.job_log().is_header_complete());
        assert_eq!(r.job_log().job_name(), Some("QPADEV0001"));
        assert_eq!(r.job_log().job_description_library(), None);
        assert_eq!(r.state(), ParserState::PageHeader);

        r.feed_line("  Library  . . . . . . . . . . :   QGPL");
        assert!(r.job_log().is_header_complete());
        assert_eq!(r.state(), ParserState::Message);
        assert_eq!(r.job_log().qualified_job_name(), "712703/RADDATZ/QPADEV0001");
        assert_eq!(r.job_log().qualified_job_description_name(), "QGPL/QDFTJOBD");
    }

    #[test]
    fn test_header_resumes_on_next_page() {
        let mut r = reader();
        r.feed_line(&page_line(1));
        r.feed_line(HEADER_1);
        r.feed_line(COLUMNS);
        r.feed_line(&page_line(2));
        assert_eq!(r.state(), ParserState::PageHeader);
        r.feed_line(HEADER_2);
        assert!(r.job_log().is_header_complete());
        assert_eq!(r.job_log().job_description(), Some("QDFTJOBD"));
        assert_eq!(r.state(), ParserState::Message);

        r.feed_line(&page_line(3));
        assert_eq!(r.state(), ParserState::Message);
        assert_eq!(r.job_log().pages().len(), 3);
    }

    #[test]
    fn test_continuation_joins_third_attribute() {
        let mut lines = header_lines();
        lines.push("CPF9801    Diagnostic              40   03.11.16  14:58:40.100000  QCLRSLV      QSYS        00F3     QCMDEXC     QSYS        01D6".to_string());
        lines.push(attribute("Message", "Object MISSING in library"));
        lines.push(attribute("Cause", "The object was not"));
        lines.push(attribute("Recovery", "Correct the name"));
        lines.push(format!("{:>38}{}", "", "and then try the request again."));

        let mut r = reader();
        for line in &lines {
            r.feed_line(line);
        }
        let pending = r.pending.as_ref().unwrap();
        assert_eq!(pending.indent.as_deref(), Some(" ".repeat(38).as_str()));
        assert_eq!(
            pending.attributes,
            vec![
                "Object MISSING in library",
                "The object was not",
                "Correct the name and then try the request again.",
            ]
        );

        let outcome = r.finish();
        let message = &outcome.job_log.messages()[0];
        assert_eq!(message.id, "CPF9801");
        assert_eq!(message.severity, Some(40));
        assert_eq!(message.text.as_deref(), Some("Object MISSING in library"));
        assert_eq!(message.cause.as_deref(), Some("The object was not"));
    }

    #[test]
    fn test_continuation_uses_last_attribute_only() {
        let mut r = reader();
        for line in header_lines() {
            r.feed_line(&line);
        }
        r.feed_line("CPF1124    Information             00   03.11.16  14:58:40.123456  QWTPIIPP     QSYS        067D     *EXT                    *N");
        r.feed_line(&attribute("Message", "Job 712703/RADDATZ/QPADEV0001 started on"));
        r.feed_line(&format!("{:>38}{}", "", "11/03/16 at 14:58:40 in subsystem QINTER."));
        // Deeper indent and trailing blanks do not reach the value.
        r.feed_line(&format!("{:>38}{}", "", "   Job entered system.    "));
        // Indented less than the continuation indent.
        r.feed_line(&format!("{:>20}{}", "", "stray text"));
        let outcome = r.finish();

        assert_eq!(
            outcome.job_log.messages()[0].text.as_deref(),
            Some("Job 712703/RADDATZ/QPADEV0001 started on 11/03/16 at 14:58:40 in subsystem QINTER. Job entered system.")
        );
    }

    #[test]
    fn test_continuation_onto_empty_value() {
        let mut lines = header_lines();
        lines.push("CPF1124    Information             00   03.11.16  14:58:40.123456  QWTPIIPP     QSYS        067D".to_string());
        lines.push(format!("{:>36}Message . . . . :", ""));
        lines.push(format!("{:>38}{}", "", "Text on next line."));
        let outcome = parse(&lines);
        assert_eq!(outcome.job_log.messages()[0].text.as_deref(), Some("Text on next line."));
    }

    #[test]
    fn test_previous_message_finalized_on_next_start() {
        let mut lines = header_lines();
        lines.push("CPF1124    Information             00   03.11.16  14:58:40.123456  QWTPIIPP     QSYS        067D".to_string());
        for (label, value) in [
            ("To module", "QWTMCMNL"),
            ("To procedure", "QWTMCMNL"),
            ("Statement", "0000000006"),
            ("Message", "Job started."),
        ] {
            lines.push(attribute(label, value));
        }
        lines.push("*NONE      Request                      03.11.16  14:58:41.000001  QMHGSD       QSYS        0195".to_string());
        lines.push(attribute("Message", "-CALL PGM(X)"));

        let outcome = parse(&lines);
        let messages = outcome.job_log.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].to_module.as_deref(), Some("QWTMCMNL"));
        assert_eq!(messages[0].to_statement.as_deref(), Some("0000000006"));
        assert_eq!(messages[0].text.as_deref(), Some("Job started."));
        assert_eq!(messages[0].cause, None);
        assert_eq!(messages[1].id, "*NONE");
        assert_eq!(messages[1].severity, None);
        assert_eq!(messages[1].text.as_deref(), Some("-CALL PGM(X)"));
    }

    #[test]
    fn test_end_of_stream_flushes_attributes() {
        let mut lines = header_lines();
        lines.push("CPF9801    Diagnostic              40   03.11.16  14:58:40.100000  QCLRSLV      QSYS        00F3".to_string());
        lines.push(attribute("Message", "Object X not found."));
        lines.push(attribute("Cause", "The object does not exist."));
        lines.push(attribute("Recovery", "Correct it."));

        let outcome = parse(&lines);
        let message = &outcome.job_log.messages()[0];
        assert_eq!(message.text.as_deref(), Some("Object X not found."));
        assert_eq!(message.cause.as_deref(), Some("The object does not exist."));
        assert_eq!(outcome.state, ParserState::Message);
    }

    #[test]
    fn test_messages_bound_to_pages() {
        let mut lines = header_lines();
        lines.push("CPF1124    Information             00   03.11.16  14:58:40.123456  QWTPIIPP     QSYS        067D".to_string());
        lines.push(page_line(2));
        lines.push(HEADER_1.to_string());
        lines.push("CPF1164    Completion              00   03.11.16  14:59:00.000000  QWTMCEOJ     QSYS        00BF".to_string());

        let outcome = parse(&lines);
        let log = &outcome.job_log;
        assert_eq!(log.pages().len(), 2);
        assert_eq!(log.page_messages(&log.pages()[0])[0].id, "CPF1124");
        assert_eq!(log.page_messages(&log.pages()[1])[0].id, "CPF1164");
        assert_eq!(log.messages()[1].page_number, 2);
    }

    #[test]
    fn test_bad_page_number_skips_line() {
        let mut r = reader();
        r.feed_line(&page_line(1).replace("Page    1", "Page 99999999999"));
        assert_eq!(r.state(), ParserState::Idle);
        assert!(r.job_log().pages().is_empty());
        r.feed_line(&page_line(1));
        assert_eq!(r.job_log().pages().len(), 1);
    }

    #[test]
    fn test_bad_severity_skips_line() {
        let mut config = JobLogReaderConfig::english();
        config.patterns.start_of_message =
            r"^(?P<id>[A-Z][A-Z0-9]{6})\s+(?P<type>\w+)\s+(?P<severity>\S+)\s+(?P<date>\S+)\s+(?P<time>\S+)"
                .to_string();
        let mut r = JobLogReader::new(&config).unwrap();
        for line in header_lines() {
            r.feed_line(&line);
        }
        r.feed_line("CPF1124 Information XX 03.11.16 14:58:40");
        r.feed_line("CPF1164 Completion 10 03.11.16 14:59:00");
        let outcome = r.finish();
        assert_eq!(outcome.job_log.messages().len(), 1);
        assert_eq!(outcome.job_log.messages()[0].severity, Some(10));
    }

    #[test]
    fn test_chars_processed_excludes_terminators() {
        let outcome = reader().parse_lines(["abc", "", "de"]);
        assert_eq!(outcome.chars_processed, 5);
        assert_eq!(outcome.state, ParserState::Idle);
        assert!(matches!(outcome.into_checked(), Err(JobLogError::InvalidJobLogFormat)));
    }

    #[test]
    fn test_reader_reusable_after_finish() {
        let mut r = reader();
        let first = r.parse_lines(header_lines().iter().map(String::as_str));
        assert!(first.job_log.is_header_complete());
        assert_eq!(r.state(), ParserState::Idle);
        let second = r.parse_lines(["nothing here"]);
        assert!(second.job_log.pages().is_empty());
    }

    #[test]
    fn test_concatenate() {
        let mut value = String::new();
        concatenate(&mut value, "a");
        concatenate(&mut value, "b");
        assert_eq!(value, "a b");
    }
}
