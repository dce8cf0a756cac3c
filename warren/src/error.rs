use crate::model::error::{parse_errors, summarize, Errors};
use thiserror::Error;

/// Fatal failures of one request/decode cycle. Attribute drift, unresolved
/// relationship targets and unknown sparse fields are not errors.
#[derive(Error, Debug)]
pub enum WarrenError {
    #[error("{message}")]
    Transport { status: Option<http::StatusCode>, message: String, body: String },
    #[error("cannot decode response document: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },
    #[error("unexpected primary data: expected {expected}, found {found}")]
    UnexpectedData { expected: &'static str, found: &'static str },
    #[error("server returned {} error(s)", .0.len())]
    ErrorDocument(Errors),
    #[error("invalid URI `{0}`")]
    InvalidUri(String, #[source] http::uri::InvalidUri),
    #[error("invalid base URL `{0}`")]
    InvalidBaseUrl(String, #[source] url::ParseError),
    #[error("cannot serialize request body")]
    Serialize(#[source] serde_json::Error),
    #[error("query string is not valid UTF-8")]
    NotUtf8(#[source] std::str::Utf8Error),
}

impl WarrenError {
    /// Raw response body attached to the failure, if any.
    pub fn body(&self) -> Option<&str> {
        match self {
            WarrenError::Transport { body, .. } | WarrenError::Decode { body, .. }
                if !body.trim().is_empty() =>
            {
                Some(body.as_str())
            },
            _ => None,
        }
    }

    /// Diagnostic text for the user: the server's JSON:API errors one per
    /// line when the body is an error document, otherwise the raw body.
    pub fn summary(&self) -> Option<String> {
        if let WarrenError::ErrorDocument(errors) = self {
            return Some(summarize(errors));
        }
        self.body().map(|body| match parse_errors(body.as_bytes()) {
            Some(errors) => summarize(&errors),
            None => body.to_string(),
        })
    }
}

impl From<std::str::Utf8Error> for WarrenError {
    fn from(err: std::str::Utf8Error) -> Self { WarrenError::NotUtf8(err) }
}
