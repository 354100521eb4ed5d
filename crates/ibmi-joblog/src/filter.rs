//! Message selection by id, type and severity.

use serde::{Deserialize, Serialize};

use crate::model::Message;

/// Selects messages of a job log. Unset criteria match every message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageFilter {
    /// Message id, e.g. `CPF1124`.
    pub id: Option<String>,
    /// Message type, compared ignoring case.
    #[serde(rename = "type")]
    pub message_type: Option<String>,
    /// Exact severity. Messages without a severity never match a set value.
    pub severity: Option<u32>,
}

impl MessageFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_type(mut self, message_type: impl Into<String>) -> Self {
        self.message_type = Some(message_type.into());
        self
    }

    pub fn with_severity(mut self, severity: u32) -> Self {
        self.severity = Some(severity);
        self
    }

    /// No criterion is set.
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.message_type.is_none() && self.severity.is_none()
    }

    pub fn matches(&self, message: &Message) -> bool {
        if let Some(id) = &self.id {
            if message.id != *id {
                return false;
            }
        }
        if let Some(message_type) = &self.message_type {
            if !message.message_type.eq_ignore_ascii_case(message_type) {
                return false;
            }
        }
        match self.severity {
            Some(severity) => message.severity == Some(severity),
            None => true,
        }
    }
}
