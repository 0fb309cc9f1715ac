use crate::types::{Coordinate, WaypointRecord};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Counters collected while decoding one SMI file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecodeStats {
    pub total_lines: usize,
    pub annotation_lines: usize,
    pub invalid_payloads: usize,
    pub malformed_records: usize,
}

impl DecodeStats {
    /// Annotation lines that did not produce a waypoint
    pub fn skipped_annotations(&self) -> usize {
        self.invalid_payloads + self.malformed_records
    }
}

/// Complete decoded trip from a single SMI file
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Trip {
    /// Input file name, used to name the exported artifacts
    pub name: String,
    pub records: Vec<WaypointRecord>,
    pub coordinates: Vec<Coordinate>,
    pub stats: DecodeStats,
    /// The SMI text with annotations decoded and coordinate lines inserted
    pub decoded_smi: Vec<u8>,
}

impl Trip {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: Vec::new(),
            coordinates: Vec::new(),
            stats: DecodeStats::default(),
            decoded_smi: Vec::new(),
        }
    }

    pub fn push_record(&mut self, record: WaypointRecord) {
        self.coordinates.push(record.coordinate());
        self.records.push(record);
    }

    pub fn waypoint_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn start_timestamp_ms(&self) -> Option<i64> {
        self.records.first().map(|r| r.timestamp_ms)
    }

    pub fn end_timestamp_ms(&self) -> Option<i64> {
        self.records.last().map(|r| r.timestamp_ms)
    }

    /// Get the duration of the trip in milliseconds
    pub fn duration_ms(&self) -> i64 {
        match (self.start_timestamp_ms(), self.end_timestamp_ms()) {
            (Some(start), Some(end)) => end.saturating_sub(start),
            _ => 0,
        }
    }

    /// Get the duration of the trip in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.duration_ms() as f64 / 1000.0
    }

    /// Rewritten SMI as text, replacing any non-UTF-8 passthrough bytes
    pub fn decoded_smi_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.decoded_smi)
    }
}
