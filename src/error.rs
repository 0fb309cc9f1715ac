use std::fmt;
use std::path::PathBuf;

/// Custom error types for SMI trip decoding
#[derive(Debug)]
pub enum SmiError {
    /// Input file missing or unreadable
    InputNotFound(PathBuf),
    /// Annotation payload is not valid base64 or not UTF-8 text
    InvalidPayload { line: usize, reason: String },
    /// Decoded record is too short or has non-numeric key fields
    MalformedRecord { line: usize, reason: String },
    /// KML/CSV/preview could not be written
    Export(String),
}

impl fmt::Display for SmiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SmiError::InputNotFound(path) => write!(
                f,
                "Filename {} does not exist - check your file/path and try again",
                path.display()
            ),
            SmiError::InvalidPayload { line, reason } => {
                write!(f, "Invalid annotation payload on line {}: {}", line, reason)
            }
            SmiError::MalformedRecord { line, reason } => {
                write!(f, "Malformed record on line {}: {}", line, reason)
            }
            SmiError::Export(msg) => write!(f, "Export error: {}", msg),
        }
    }
}

impl std::error::Error for SmiError {}

/// Error raised while turning one decoded record into a [`crate::WaypointRecord`].
///
/// Line numbers are not known at that level; the parser attaches them when
/// converting into [`SmiError::MalformedRecord`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordError {
    TooFewFields { found: usize, required: usize },
    InvalidNumber { field: &'static str, value: String },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::TooFewFields { found, required } => write!(
                f,
                "expected at least {} ';'-separated fields, found {}",
                required, found
            ),
            RecordError::InvalidNumber { field, value } => {
                write!(f, "{} field is not a number: {:?}", field, value)
            }
        }
    }
}

impl std::error::Error for RecordError {}

impl RecordError {
    pub fn at_line(self, line: usize) -> SmiError {
        SmiError::MalformedRecord {
            line,
            reason: self.to_string(),
        }
    }
}

pub type Result<T> = anyhow::Result<T>;
