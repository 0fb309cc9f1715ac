//! Annotation line matching and payload decoding
//!
//! The dashcam hides one GPS sample per subtitle cue inside an HTML comment:
//!
//! ```text
//! 	<P Class=ENCC ><!--MTY3NzcxNTIwMDAwMDsw OzA7MDstNzUuNjk3Mjs0NS40MjE1 -->
//! ```
//!
//! The comment body is a list of base64 segments separated by single spaces.
//! Each segment decodes to a slice of the record text; joining the decoded
//! bytes in order gives the full `;`-separated record.

use crate::types::{AnnotationMarkers, SmiLine};
use crate::Result;
use anyhow::Context;
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Classify a single line of SMI text
///
/// The line is an annotation when, ignoring surrounding whitespace, it starts
/// with the open marker and ends with the close marker.
pub fn classify_line<'a>(line: &'a str, markers: &AnnotationMarkers) -> SmiLine<'a> {
    line.trim()
        .strip_prefix(markers.open.as_str())
        .and_then(|rest| rest.strip_suffix(markers.close.as_str()))
        .map_or(SmiLine::Plain, SmiLine::Annotation)
}

/// Split an encoded block into its base64 segments
///
/// Tabs are dropped before splitting; empty segments produced by repeated
/// spaces are ignored.
pub fn split_segments(payload: &str) -> Vec<String> {
    let block: String = payload.chars().filter(|&c| c != '\t').collect();
    block
        .split(' ')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Decode every segment and concatenate the result as UTF-8 text
pub fn decode_payload(payload: &str) -> Result<String> {
    let mut bytes = Vec::new();
    for (index, segment) in split_segments(payload).iter().enumerate() {
        let decoded = STANDARD
            .decode(segment)
            .with_context(|| format!("segment {} ({:?}) is not valid base64", index + 1, segment))?;
        bytes.extend_from_slice(&decoded);
    }

    String::from_utf8(bytes).context("decoded payload is not UTF-8 text")
}

/// Encode record text the way the dashcam does, splitting it into segments
/// of at most `segment_len` input bytes
///
/// Used to build fixtures; the parser only ever decodes.
pub fn encode_payload(text: &str, segment_len: usize) -> String {
    let segment_len = segment_len.max(1);
    text.as_bytes()
        .chunks(segment_len)
        .map(|chunk| STANDARD.encode(chunk))
        .collect::<Vec<_>>()
        .join(" ")
}
