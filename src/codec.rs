//! Shared contract for the on-disk annotation formats
//!
//! A codec is stateless apart from its configuration: `parse` turns text
//! into a [`Document`], `serialize` turns it back, and `validate` reports
//! problems without building anything.

use crate::document::Document;
use thiserror::Error;

/// Fatal parse failures. Local problems become [`ParseWarning`]s instead.
#[derive(Debug, Error, PartialEq)]
pub enum CodecError {
    #[error("Line {line}: Mismatched closing tag </{tag}>")]
    MismatchedClosingTag { line: usize, tag: String },

    #[error("Unclosed tags: {}", .0.join(", "))]
    UnclosedTags(Vec<String>),

    #[error("Expected a single document, found {0}")]
    MultipleDocuments(usize),
}

/// A recoverable problem: the offending line was skipped
#[derive(Debug, Clone, PartialEq)]
pub struct ParseWarning {
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Line {}: {}", self.line, self.message)
    }
}

/// A parsed document plus every line that had to be skipped
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Parsed {
    pub document: Document,
    pub warnings: Vec<ParseWarning>,
}

/// Outcome of `validate`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Validation {
    pub errors: Vec<String>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn push(&mut self, line: usize, message: impl std::fmt::Display) {
        self.errors.push(format!("Line {line}: {message}"));
    }
}

/// A text format that round-trips [`Document`]s
pub trait FormatCodec {
    fn parse(&self, text: &str) -> Result<Parsed, CodecError>;

    fn serialize(&self, document: &Document) -> String;

    fn validate(&self, text: &str) -> Validation;
}
