//! Export functionality for decoded trips
//!
//! Contains functions for writing a decoded trip to KML, CSV and a decoded
//! SMI preview file.

use crate::kml::render_trip_kml;
use crate::types::*;
use crate::Result;
use anyhow::Context;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Export options for controlling output formats
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub kml: bool,
    pub csv: bool,
    /// Directory for KML/CSV output; `None` means the current directory
    pub output_dir: Option<String>,
}

/// Output file locations for one trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub kml: PathBuf,
    pub csv: PathBuf,
}

/// Compute output paths for a trip: `{trip_name}.kml` and `{trip_name}.csv`
pub fn compute_export_paths(trip_name: &str, export_options: &ExportOptions) -> ExportPaths {
    let base = match export_options.output_dir.as_deref() {
        Some(dir) => Path::new(dir).to_path_buf(),
        None => PathBuf::new(),
    };

    ExportPaths {
        kml: base.join(format!("{}.kml", trip_name)),
        csv: base.join(format!("{}.csv", trip_name)),
    }
}

/// Legacy location of the decoded SMI preview: the input path with `2` appended
pub fn decoded_smi_path(input_path: &Path) -> PathBuf {
    let mut path = input_path.as_os_str().to_owned();
    path.push("2");
    PathBuf::from(path)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
            log::debug!("Created output directory: {:?}", parent);
        }
    }
    Ok(())
}

/// Export a trip overview to KML
///
/// Returns the written path, or `None` when KML export is disabled or the
/// trip has no waypoints and nothing was written.
pub fn export_to_kml(trip: &Trip, export_options: &ExportOptions) -> Result<Option<PathBuf>> {
    if !export_options.kml || trip.is_empty() {
        return Ok(None);
    }

    let path = compute_export_paths(&trip.name, export_options).kml;
    ensure_parent_dir(&path)?;

    let file =
        File::create(&path).with_context(|| format!("Failed to create KML file: {:?}", path))?;
    if let Err(e) = render_trip_kml(trip, BufWriter::new(file)) {
        // Do not leave a truncated document behind
        let _ = std::fs::remove_file(&path);
        return Err(e.context(format!("Failed to write KML file: {:?}", path)));
    }

    Ok(Some(path))
}

/// Export every waypoint to CSV, one row per record
///
/// Columns: `index,timestamp_ms,utc_time,longitude,latitude,fields`, where
/// `fields` is the full decoded record. Returns `None` when CSV export is
/// disabled or the trip has no waypoints.
#[cfg(feature = "csv")]
pub fn export_to_csv(trip: &Trip, export_options: &ExportOptions) -> Result<Option<PathBuf>> {
    use crate::conversion::format_utc_timestamp_or_raw;

    if !export_options.csv || trip.is_empty() {
        return Ok(None);
    }

    let path = compute_export_paths(&trip.name, export_options).csv;
    ensure_parent_dir(&path)?;

    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Failed to create CSV file: {:?}", path))?;
    writer.write_record([
        "index",
        "timestamp_ms",
        "utc_time",
        "longitude",
        "latitude",
        "fields",
    ])?;

    for (index, record) in trip.records.iter().enumerate() {
        writer.write_record([
            index.to_string(),
            record.timestamp_ms.to_string(),
            format_utc_timestamp_or_raw(record.timestamp_ms),
            record.longitude_text().to_string(),
            record.latitude_text().to_string(),
            record.to_record_text(),
        ])?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to flush CSV file: {:?}", path))?;

    Ok(Some(path))
}

/// Write the decoded SMI text to `output_path`
pub fn write_decoded_smi(trip: &Trip, output_path: &Path) -> Result<()> {
    ensure_parent_dir(output_path)?;
    std::fs::write(output_path, &trip.decoded_smi)
        .with_context(|| format!("Failed to write decoded SMI file: {:?}", output_path))
}
