use crate::model::link::Links;
use crate::model::Meta;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

pub type Errors = Vec<Error>;

/// Error location
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ErrorSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pointer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
}

/// JSON-API Error
/// All fields are optional
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Error {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ErrorSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl Error {
    /// One line: `[status] title: detail (pointer)`, skipping missing parts.
    pub fn summary(&self) -> String {
        let mut line = String::new();
        if let Some(status) = &self.status {
            line.push_str(&format!("[{}] ", status));
        }
        match (&self.title, &self.detail) {
            (Some(title), Some(detail)) if title != detail => {
                line.push_str(&format!("{}: {}", title, detail))
            },
            (Some(text), _) | (None, Some(text)) => line.push_str(text),
            (None, None) => line.push_str(self.code.as_deref().unwrap_or("unknown error")),
        }
        if let Some(pointer) = self.source.as_ref().and_then(|s| s.pointer.as_ref()) {
            line.push_str(&format!(" ({})", pointer));
        }
        line
    }
}

#[derive(Deserialize)]
struct ErrorsOnly {
    errors: Errors,
}

/// Reads the `errors` member of a response body, if the body is a JSON:API
/// error document.
pub fn parse_errors(body: &[u8]) -> Option<Errors> {
    serde_json::from_slice::<ErrorsOnly>(body).ok().map(|doc| doc.errors).filter(|e| !e.is_empty())
}

pub fn summarize(errors: &[Error]) -> String { errors.iter().map(Error::summary).join("\n") }
