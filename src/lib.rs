//! SMI Parser Library
//!
//! A Rust library for decoding GPS trip telemetry that dashcam apps hide in
//! SMI subtitle files as base64 comment annotations, and exporting the trip
//! to KML.
//!
//! # Features
//!
//! - **`csv`** (default): Enable CSV waypoint export
//! - **`cli`** (default): Build the command-line interface binary
//! - **`serde`**: Enable serialization/deserialization of types
//!
//! # Quick Start
//!
//! Decode a file and inspect the waypoints:
//! ```rust,no_run
//! use smi_parser::{parse_smi_file, DecoderOptions};
//! use std::path::Path;
//!
//! let trip = parse_smi_file(Path::new("20230301_trip.smi"), &DecoderOptions::default()).unwrap();
//! println!("Decoded {} waypoints", trip.waypoint_count());
//! for record in &trip.records {
//!     println!("{} {} {}", record.timestamp_ms, record.longitude, record.latitude);
//! }
//! ```
//!
//! Export the trip to KML:
//! ```rust,no_run
//! use smi_parser::{export_to_kml, parse_smi_file, DecoderOptions, ExportOptions};
//! use std::path::Path;
//!
//! let trip = parse_smi_file(Path::new("20230301_trip.smi"), &DecoderOptions::default()).unwrap();
//! let export_options = ExportOptions {
//!     kml: true,
//!     ..Default::default()
//! };
//! if let Some(path) = export_to_kml(&trip, &export_options).unwrap() {
//!     println!("Exported to: {}", path.display());
//! }
//! ```
//!
//! # Public API
//!
//! ## Parsing Functions
//! - [`parse_smi_file`] - Decode an SMI file from disk
//! - [`parse_smi_bytes`] - Decode SMI data from memory
//! - [`parse_smi_reader`] - Decode from any buffered reader
//! - [`classify_line`] - Tell annotation lines from plain lines
//! - [`decode_payload`] - Decode a space-separated list of base64 segments
//!
//! ## Data Types
//! - [`Trip`] - Decoded records, coordinates and the rewritten SMI text
//! - [`WaypointRecord`] - One typed telemetry sample
//! - [`AnnotationMarkers`] - Wrapper markers recognised by the decoder
//!
//! ## Export Functions
//! - [`export_to_kml`] - Write the trip overview as KML
//! - [`export_to_csv`] - Write one CSV row per waypoint
//! - [`write_decoded_smi`] - Persist the decoded SMI preview
//! - [`render_kml`] - Render KML into any writer

// Module declarations
pub mod conversion;
pub mod error;
pub mod export;
pub mod filters;
pub mod kml;
pub mod parser;
pub mod types;

pub use conversion::*;
pub use error::{RecordError, SmiError};
pub use export::*;
pub use filters::*;
pub use kml::*;
pub use parser::*;
pub use types::*;

pub use error::Result;
