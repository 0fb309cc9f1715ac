//! Integration tests for export functionality
//!
//! Tests the export layer across different scenarios:
//! - KML export with directory creation
//! - Empty trips produce no files
//! - CSV waypoint export
//! - Decoded SMI preview round trip

use smi_parser::export::*;
use smi_parser::{encode_payload, parse_smi_bytes, parse_smi_file, DecoderOptions, Trip};
use std::fs;
use tempfile::TempDir;

const SCENARIO_RECORD: &str = "1677715200000;0;0;0;-75.6972;45.4215";

fn smi_with_records(records: &[&str]) -> String {
    let mut smi = String::from("<SAMI>\n<BODY>\n");
    for (i, record) in records.iter().enumerate() {
        smi.push_str(&format!("<SYNC Start={}>\n", i * 1000));
        smi.push_str(&format!(
            "\t<P Class=ENCC ><!--{} -->\n",
            encode_payload(record, 12)
        ));
    }
    smi.push_str("</BODY>\n</SAMI>\n");
    smi
}

fn decode(records: &[&str]) -> Trip {
    let smi = smi_with_records(records);
    parse_smi_bytes("trip.smi", smi.as_bytes(), &DecoderOptions::default())
        .expect("Failed to decode SMI")
}

fn kml_options(dir: &TempDir) -> ExportOptions {
    ExportOptions {
        kml: true,
        csv: true,
        output_dir: Some(dir.path().to_str().unwrap().to_string()),
    }
}

#[test]
fn test_export_kml_creates_output_directory() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let nonexistent_dir = temp_dir.path().join("nonexistent").join("output");

    let trip = decode(&[SCENARIO_RECORD]);
    let export_opts = ExportOptions {
        kml: true,
        output_dir: Some(nonexistent_dir.to_str().unwrap().to_string()),
        ..Default::default()
    };

    let path = export_to_kml(&trip, &export_opts)
        .expect("KML export should succeed and create directories")
        .expect("KML export should write a file");

    assert!(
        nonexistent_dir.exists(),
        "Output directory should be created"
    );
    assert_eq!(path, nonexistent_dir.join("trip.smi.kml"));
    assert!(path.exists(), "KML file should be created in new directory");
}

#[test]
fn test_single_annotation_end_to_end() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_path = temp_dir.path().join("trip.smi");
    fs::write(&input_path, smi_with_records(&[SCENARIO_RECORD])).unwrap();

    let trip = parse_smi_file(&input_path, &DecoderOptions::default()).unwrap();
    assert_eq!(trip.name, "trip.smi");
    assert!(trip
        .decoded_smi_lossy()
        .contains("\t<P Class=ENCC >-75.6972 45.4215\n"));

    let path = export_to_kml(&trip, &kml_options(&temp_dir)).unwrap().unwrap();
    let kml = fs::read_to_string(path).expect("Failed to read KML file");

    assert!(kml.contains("<name>Start - 2023-03-02 00:00:00 UTC</name>"));
    assert!(kml.contains("<name>End - 2023-03-02 00:00:00 UTC</name>"));
    assert!(kml.contains("<LineString>"));
    assert!(kml.contains("<coordinates>-75.6972,45.4215</coordinates>"));
}

#[test]
fn test_export_kml_empty_trip_returns_none() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let trip = decode(&[]);

    let result = export_to_kml(&trip, &kml_options(&temp_dir));
    assert!(
        matches!(result, Ok(None)),
        "Export should succeed without output for an empty trip"
    );

    let kml_path = temp_dir.path().join("trip.smi.kml");
    assert!(
        !kml_path.exists(),
        "No KML file should be created for an empty trip"
    );
}

#[test]
fn test_export_kml_failure_is_reported() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    // A regular file where the output directory should be
    let blocker = temp_dir.path().join("blocked");
    fs::write(&blocker, "not a directory").unwrap();

    let trip = decode(&[SCENARIO_RECORD]);
    let export_opts = ExportOptions {
        kml: true,
        output_dir: Some(blocker.to_str().unwrap().to_string()),
        ..Default::default()
    };

    assert!(export_to_kml(&trip, &export_opts).is_err());
}

#[test]
fn test_export_csv_rows() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let trip = decode(&[
        SCENARIO_RECORD,
        "1677715201000;12;x;0;-75.6975;45.4217;extra",
    ]);

    let path = export_to_csv(&trip, &kml_options(&temp_dir))
        .unwrap()
        .expect("CSV export should write a file");
    let content = fs::read_to_string(path).expect("Failed to read CSV file");
    let lines: Vec<&str> = content.lines().collect();

    assert_eq!(
        lines[0],
        "index,timestamp_ms,utc_time,longitude,latitude,fields"
    );
    assert_eq!(
        lines[1],
        "0,1677715200000,2023-03-02 00:00:00 UTC,-75.6972,45.4215,1677715200000;0;0;0;-75.6972;45.4215"
    );
    assert_eq!(
        lines[2],
        "1,1677715201000,2023-03-02 00:00:01 UTC,-75.6975,45.4217,1677715201000;12;x;0;-75.6975;45.4217;extra"
    );
    assert_eq!(lines.len(), 3);
}

#[test]
fn test_export_csv_empty_trip_returns_none() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let trip = decode(&[]);

    assert!(matches!(
        export_to_csv(&trip, &kml_options(&temp_dir)),
        Ok(None)
    ));
    assert!(!temp_dir.path().join("trip.smi.csv").exists());
}

#[test]
fn test_write_decoded_smi_without_annotations_matches_input() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = "<SAMI>\r\n<BODY>\r\n<SYNC Start=0><P Class=KRCC>hello\r\n</BODY>\r\n</SAMI>";
    let input_path = temp_dir.path().join("plain.smi");
    fs::write(&input_path, input).unwrap();

    let trip = parse_smi_file(&input_path, &DecoderOptions::default()).unwrap();
    let preview_path = decoded_smi_path(&input_path);
    write_decoded_smi(&trip, &preview_path).unwrap();

    assert_eq!(preview_path, temp_dir.path().join("plain.smi2"));
    assert_eq!(fs::read(&preview_path).unwrap(), input.as_bytes());
}
