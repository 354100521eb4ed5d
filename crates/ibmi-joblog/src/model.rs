//! Job log model: job identity, pages and messages.

use serde::{Deserialize, Serialize};

use crate::filter::MessageFilter;

/// The five job identity fields printed in each page header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderField {
    JobName,
    UserName,
    JobNumber,
    JobDescription,
    JobDescriptionLibrary,
}

impl HeaderField {
    /// Header fields in the order they are printed on an English job log.
    pub const PRINT_ORDER: [HeaderField; 5] = [
        HeaderField::JobName,
        HeaderField::UserName,
        HeaderField::JobNumber,
        HeaderField::JobDescription,
        HeaderField::JobDescriptionLibrary,
    ];
}

/// One page of the spooled file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Page number printed in the page-break line.
    pub number: u32,
    first_message: Option<usize>,
    last_message: Option<usize>,
}

impl Page {
    fn new(number: u32) -> Self {
        Self {
            number,
            first_message: None,
            last_message: None,
        }
    }

    /// Index of the first message started on this page.
    pub fn first_message(&self) -> Option<usize> {
        self.first_message
    }

    /// Index of the last message started on this page.
    pub fn last_message(&self) -> Option<usize> {
        self.last_message
    }
}

/// One message of the job log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub severity: Option<u32>,
    pub date: String,
    pub time: String,
    /// Page the message starts on.
    pub page_number: u32,
    pub text: Option<String>,
    pub cause: Option<String>,
    pub to_module: Option<String>,
    pub to_procedure: Option<String>,
    pub to_statement: Option<String>,
    pub from_module: Option<String>,
    pub from_procedure: Option<String>,
    pub from_statement: Option<String>,
}

impl Message {
    /// Assign buffered attribute values by position.
    ///
    /// - 7 or more: to module/procedure/statement, from module/procedure/statement, text, [cause]
    /// - 4 to 6: to module/procedure/statement, text, [cause]
    /// - 1 to 3: text, [cause]
    pub fn apply_attributes(&mut self, attributes: &[String]) {
        let at = |i: usize| attributes.get(i).cloned();

        if attributes.len() >= 7 {
            self.to_module = at(0);
            self.to_procedure = at(1);
            self.to_statement = at(2);
            self.from_module = at(3);
            self.from_procedure = at(4);
            self.from_statement = at(5);
            self.text = at(6);
            if attributes.len() >= 8 {
                self.cause = at(7);
            }
        } else if attributes.len() >= 4 {
            self.to_module = at(0);
            self.to_procedure = at(1);
            self.to_statement = at(2);
            self.text = at(3);
            if attributes.len() >= 5 {
                self.cause = at(4);
            }
        } else if !attributes.is_empty() {
            self.text = at(0);
            if attributes.len() >= 2 {
                self.cause = at(1);
            }
        }
    }
}

/// A parsed job log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobLog {
    job_name: Option<String>,
    user_name: Option<String>,
    job_number: Option<String>,
    job_description: Option<String>,
    job_description_library: Option<String>,
    header_complete: bool,
    pages: Vec<Page>,
    messages: Vec<Message>,
}

impl JobLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn job_name(&self) -> Option<&str> {
        self.job_name.as_deref()
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    pub fn job_number(&self) -> Option<&str> {
        self.job_number.as_deref()
    }

    pub fn job_description(&self) -> Option<&str> {
        self.job_description.as_deref()
    }

    pub fn job_description_library(&self) -> Option<&str> {
        self.job_description_library.as_deref()
    }

    /// All five identity fields have been captured.
    pub fn is_header_complete(&self) -> bool {
        self.header_complete
    }

    /// `number/user/name`
    pub fn qualified_job_name(&self) -> String {
        format!(
            "{}/{}/{}",
            self.job_number().unwrap_or_default(),
            self.user_name().unwrap_or_default(),
            self.job_name().unwrap_or_default()
        )
    }

    /// `library/description`
    pub fn qualified_job_description_name(&self) -> String {
        format!(
            "{}/{}",
            self.job_description_library().unwrap_or_default(),
            self.job_description().unwrap_or_default()
        )
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// All messages in file order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Messages started on `page`.
    pub fn page_messages(&self, page: &Page) -> &[Message] {
        match (page.first_message, page.last_message) {
            (Some(first), Some(last)) => &self.messages[first..=last],
            _ => &[],
        }
    }

    pub fn filtered_messages<'a>(
        &'a self,
        filter: &'a MessageFilter,
    ) -> impl Iterator<Item = &'a Message> + 'a {
        self.messages.iter().filter(move |m| filter.matches(m))
    }

    pub(crate) fn set_header_field(&mut self, field: HeaderField, value: &str) {
        let slot = match field {
            HeaderField::JobName => &mut self.job_name,
            HeaderField::UserName => &mut self.user_name,
            HeaderField::JobNumber => &mut self.job_number,
            HeaderField::JobDescription => &mut self.job_description,
            HeaderField::JobDescriptionLibrary => &mut self.job_description_library,
        };
        *slot = Some(value.to_string());
        self.header_complete = self.job_name.is_some()
            && self.user_name.is_some()
            && self.job_number.is_some()
            && self.job_description.is_some()
            && self.job_description_library.is_some();
    }

    pub(crate) fn add_page(&mut self, number: u32) {
        self.pages.push(Page::new(number));
    }

    /// Append `message` to the current page, returning its index.
    ///
    /// Returns `None` when no page has been started yet.
    pub(crate) fn add_message(&mut self, mut message: Message) -> Option<usize> {
        let index = self.messages.len();
        let page = self.pages.last_mut()?;
        message.page_number = page.number;
        if page.first_message.is_none() {
            page.first_message = Some(index);
        }
        page.last_message = Some(index);
        self.messages.push(message);
        Some(index)
    }

    pub(crate) fn message_mut(&mut self, index: usize) -> Option<&mut Message> {
        self.messages.get_mut(index)
    }
}
