//! Locale pattern configuration for the job log reader.
//!
//! A configuration can be loaded from a TOML file:
//!
//! ```toml
//! locale = "en"
//! page_header_min_width = 116
//! header_fields = ["job_name", "user_name", "job_number", "job_description", "job_description_library"]
//!
//! [patterns]
//! start_of_page = '...(?P<page>\d+)$'
//! ```
//!
//! Missing keys fall back to the built-in English configuration.

use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::JobLogError;
use crate::model::HeaderField;
use crate::Result;

const EN_START_OF_PAGE: &str = r"^(?P<release>5\d{3}[A-Z0-9]{3}\s+V\dR\dM\d\s+\d{6})\s+(?P<title>.+?)\s+Page\s+(?P<page>\d+)$";
const EN_PAGE_HEADER: &str = r"(?P<label>[A-Za-z][A-Za-z ]*?)\s*(?:\.\s?)+\s*:\s+(?P<value>\S+)";
const EN_START_OF_MESSAGE: &str = r"^(?P<id>\*NONE|[A-Z][A-Z0-9]{6})\s+(?P<type>Information|Diagnostic|Escape|Notify|Completion|Inquiry|Reply|Request|Sender copy|Status|Scope|Command)\s+(?:(?P<severity>\d{2})\s+)?(?P<date>\d{2}[./-]\d{2}[./-]\d{2})\s+(?P<time>\d{2}:\d{2}:\d{2}(?:\.\d+)?)";
const EN_MESSAGE_ATTRIBUTE: &str = r"^\s{5,}(?P<label>[A-Za-z][A-Za-z ]*?)\s*(?:\.\s?)+\s*:\s*(?P<value>.*?)\s*$";

/// Job log reader configuration for one spooled-file language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobLogReaderConfig {
    /// Locale key, e.g. `en`.
    pub locale: String,
    /// Lines of this length or shorter are never checked for a page break.
    pub page_header_min_width: usize,
    /// Messages with more attribute lines than this are logged as suspicious.
    pub max_message_attributes: usize,
    /// Identity fields in the order their labels appear in the page header.
    pub header_fields: Vec<HeaderField>,
    /// Line patterns.
    pub patterns: PatternConfig,
}

impl Default for JobLogReaderConfig {
    fn default() -> Self {
        Self::english()
    }
}

/// Regular expressions recognising the job log line kinds.
///
/// Each pattern must provide the named groups the reader extracts:
/// `page` for `start_of_page`, `value` for `page_header` and
/// `message_attribute`, and `id`, `type`, `date`, `time` for
/// `start_of_message` (`severity` is optional).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Page-break line, matched against the trimmed line.
    pub start_of_page: String,
    /// Labeled identity field, matched repeatedly against the raw line.
    pub page_header: String,
    /// First line of a message, matched against the trimmed line.
    pub start_of_message: String,
    /// Labeled message attribute, matched against the raw line.
    pub message_attribute: String,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            start_of_page: EN_START_OF_PAGE.to_string(),
            page_header: EN_PAGE_HEADER.to_string(),
            start_of_message: EN_START_OF_MESSAGE.to_string(),
            message_attribute: EN_MESSAGE_ATTRIBUTE.to_string(),
        }
    }
}

impl JobLogReaderConfig {
    /// The built-in configuration for English job logs.
    pub fn english() -> Self {
        Self {
            locale: "en".to_string(),
            page_header_min_width: 116,
            max_message_attributes: 8,
            header_fields: HeaderField::PRINT_ORDER.to_vec(),
            patterns: PatternConfig::default(),
        }
    }

    /// The built-in configuration for `locale`.
    ///
    /// Only English ships built in; other locales are loaded with [`Self::from_file`].
    pub fn for_locale(locale: &str) -> Option<Self> {
        match locale {
            "en" => Some(Self::english()),
            _ => None,
        }
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| JobLogError::Config {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Load a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| JobLogError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| JobLogError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration and compile its patterns.
    pub fn compile(&self) -> Result<CompiledPatterns> {
        self.validate_header_fields()?;

        let start_of_page = compile_pattern("start_of_page", &self.patterns.start_of_page, &["page"])?;
        let page_header = compile_pattern("page_header", &self.patterns.page_header, &["value"])?;
        let start_of_message = compile_pattern(
            "start_of_message",
            &self.patterns.start_of_message,
            &["id", "type", "date", "time"],
        )?;
        let message_attribute = compile_pattern(
            "message_attribute",
            &self.patterns.message_attribute,
            &["value"],
        )?;

        Ok(CompiledPatterns {
            start_of_page,
            page_header,
            start_of_message,
            message_attribute,
            header_fields: self.header_fields.clone(),
            page_header_min_width: self.page_header_min_width,
            max_message_attributes: self.max_message_attributes,
        })
    }

    fn validate_header_fields(&self) -> Result<()> {
        let complete = self.header_fields.len() == HeaderField::PRINT_ORDER.len()
            && HeaderField::PRINT_ORDER
                .iter()
                .all(|field| self.header_fields.contains(field));
        if complete {
            Ok(())
        } else {
            Err(JobLogError::Config {
                path: self.locale.clone(),
                message: "header_fields must list each of the five job identity fields once"
                    .to_string(),
            })
        }
    }
}

fn compile_pattern(name: &str, pattern: &str, required: &[&str]) -> Result<Regex> {
    let regex = Regex::new(pattern).map_err(|source| JobLogError::InvalidPattern {
        name: name.to_string(),
        source,
    })?;

    for group in required {
        if !regex.capture_names().flatten().any(|n| n == *group) {
            return Err(JobLogError::MissingCaptureGroup {
                pattern: name.to_string(),
                group: group.to_string(),
            });
        }
    }

    Ok(regex)
}

/// Validated, compiled form of a [`JobLogReaderConfig`].
#[derive(Debug, Clone)]
pub struct CompiledPatterns {
    pub(crate) start_of_page: Regex,
    pub(crate) page_header: Regex,
    pub(crate) start_of_message: Regex,
    pub(crate) message_attribute: Regex,
    pub(crate) header_fields: Vec<HeaderField>,
    pub(crate) page_header_min_width: usize,
    pub(crate) max_message_attributes: usize,
}

impl CompiledPatterns {
    /// Compiled built-in English patterns.
    pub fn english() -> Result<Self> {
        JobLogReaderConfig::english().compile()
    }

    /// Identity field bound to the `position`-th header match (zero based).
    pub(crate) fn header_field(&self, position: usize) -> Option<HeaderField> {
        self.header_fields.get(position).copied()
    }
}
