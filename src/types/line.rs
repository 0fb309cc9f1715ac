#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opening marker of an embedded telemetry comment
pub const ANNOTATION_OPEN: &str = "<P Class=ENCC ><!--";
/// Closing marker of an embedded telemetry comment
pub const ANNOTATION_CLOSE: &str = " -->";
/// Prefix of the human-readable coordinate line written after each annotation
pub const COORDINATE_PREFIX: &str = "<P Class=ENCC >";

/// Wrapper markers used to recognise annotation lines
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnnotationMarkers {
    pub open: String,
    pub close: String,
    pub coordinate_prefix: String,
}

impl Default for AnnotationMarkers {
    fn default() -> Self {
        Self {
            open: ANNOTATION_OPEN.to_string(),
            close: ANNOTATION_CLOSE.to_string(),
            coordinate_prefix: COORDINATE_PREFIX.to_string(),
        }
    }
}

impl AnnotationMarkers {
    /// Rebuild an annotation line around already-decoded record text
    pub fn wrap_decoded(&self, decoded: &str) -> String {
        format!("\t{}{}{}\n", self.open, decoded, self.close)
    }

    /// Build the plain coordinate line that follows a decoded annotation
    pub fn coordinate_line(&self, longitude: &str, latitude: &str) -> String {
        format!("\t{}{} {}\n", self.coordinate_prefix, longitude, latitude)
    }
}

/// A classified line of SMI input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmiLine<'a> {
    /// Line carrying an embedded comment; holds the text between the markers
    Annotation(&'a str),
    /// Anything else, passed through untouched
    Plain,
}

impl SmiLine<'_> {
    pub fn is_annotation(&self) -> bool {
        matches!(self, SmiLine::Annotation(_))
    }
}
