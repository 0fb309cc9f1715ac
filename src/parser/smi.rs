use crate::error::SmiError;
use crate::parser::annotation::{classify_line, decode_payload};
use crate::types::*;
use crate::Result;
use anyhow::Context;
use log::{debug, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Options controlling how annotation lines are recognised and handled
#[derive(Debug, Clone, Default)]
pub struct DecoderOptions {
    pub markers: AnnotationMarkers,
    /// Abort on the first undecodable or malformed annotation instead of
    /// skipping it
    pub strict: bool,
}

/// Parse an SMI file from disk
///
/// The trip is named after the file name of `file_path`.
pub fn parse_smi_file(file_path: &Path, options: &DecoderOptions) -> Result<Trip> {
    let file = match File::open(file_path) {
        Ok(file) => file,
        Err(e) => {
            debug!("Failed to open {}: {}", file_path.display(), e);
            return Err(SmiError::InputNotFound(file_path.to_path_buf()).into());
        }
    };

    if let Ok(metadata) = file.metadata() {
        debug!(
            "File size: {} bytes ({:.2} KB)",
            metadata.len(),
            metadata.len() as f64 / 1024.0
        );
    }

    let name = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("trip");

    parse_smi_reader(name, BufReader::new(file), options)
        .with_context(|| format!("Failed to decode SMI file: {:?}", file_path))
}

/// Parse SMI data from memory
pub fn parse_smi_bytes(name: &str, data: &[u8], options: &DecoderOptions) -> Result<Trip> {
    parse_smi_reader(name, data, options)
}

/// Stream SMI lines from `reader`, decoding annotations as they appear
///
/// Plain lines are copied to the rewritten output byte-for-byte, line
/// terminator included. Each decodable annotation becomes two lines: the
/// decoded comment and a `{longitude} {latitude}` coordinate line.
pub fn parse_smi_reader<R: BufRead>(
    name: &str,
    mut reader: R,
    options: &DecoderOptions,
) -> Result<Trip> {
    let mut trip = Trip::new(name);
    let mut raw = Vec::new();
    let mut line_number = 0;

    loop {
        raw.clear();
        if reader.read_until(b'\n', &mut raw)? == 0 {
            break;
        }
        line_number += 1;
        trip.stats.total_lines += 1;

        // Non-UTF-8 lines cannot hold an annotation; pass them through
        let payload = match std::str::from_utf8(&raw) {
            Ok(text) => match classify_line(text, &options.markers) {
                SmiLine::Annotation(payload) => payload.to_string(),
                SmiLine::Plain => {
                    trip.decoded_smi.extend_from_slice(&raw);
                    continue;
                }
            },
            Err(_) => {
                trip.decoded_smi.extend_from_slice(&raw);
                continue;
            }
        };

        trip.stats.annotation_lines += 1;
        process_annotation(&mut trip, &payload, &raw, line_number, options)?;
    }

    debug!(
        "Decoded {} waypoint(s) from {} annotation line(s) in {} line(s)",
        trip.waypoint_count(),
        trip.stats.annotation_lines,
        trip.stats.total_lines
    );

    Ok(trip)
}

fn process_annotation(
    trip: &mut Trip,
    payload: &str,
    raw: &[u8],
    line_number: usize,
    options: &DecoderOptions,
) -> Result<()> {
    let markers = &options.markers;

    let decoded = match decode_payload(payload) {
        Ok(decoded) => decoded,
        Err(e) => {
            let err = SmiError::InvalidPayload {
                line: line_number,
                reason: format!("{:#}", e),
            };
            if options.strict {
                return Err(err.into());
            }
            warn!("{}; line kept as-is", err);
            trip.stats.invalid_payloads += 1;
            trip.decoded_smi.extend_from_slice(raw);
            return Ok(());
        }
    };

    trip.decoded_smi
        .extend_from_slice(markers.wrap_decoded(&decoded).as_bytes());

    match WaypointRecord::parse(&decoded) {
        Ok(record) => {
            debug!(
                "Line {}: t={} lon={} lat={}",
                line_number,
                record.timestamp_ms,
                record.longitude_text(),
                record.latitude_text()
            );
            trip.decoded_smi.extend_from_slice(
                markers
                    .coordinate_line(record.longitude_text(), record.latitude_text())
                    .as_bytes(),
            );
            trip.push_record(record);
        }
        Err(e) => {
            let err = e.at_line(line_number);
            if options.strict {
                return Err(err.into());
            }
            warn!("{}; no waypoint recorded", err);
            trip.stats.malformed_records += 1;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::annotation::encode_payload;

    fn annotation(text: &str) -> String {
        format!("\t<P Class=ENCC ><!--{} -->\n", encode_payload(text, 15))
    }

    #[test]
    fn test_single_annotation_is_rewritten() {
        let record = "1677715200000;0;0;0;-75.6972;45.4215";
        let input = format!("<SYNC Start=0>\n{}</SYNC>\n", annotation(record));

        let trip =
            parse_smi_bytes("trip.smi", input.as_bytes(), &DecoderOptions::default()).unwrap();

        assert_eq!(trip.waypoint_count(), 1);
        assert_eq!(trip.coordinates.len(), 1);
        assert_eq!(trip.records[0].timestamp_ms, 1_677_715_200_000);
        assert_eq!(
            trip.decoded_smi_lossy(),
            format!(
                "<SYNC Start=0>\n\t<P Class=ENCC ><!--{} -->\n\t<P Class=ENCC >-75.6972 45.4215\n</SYNC>\n",
                record
            )
        );
    }

    #[test]
    fn test_plain_lines_pass_through_byte_for_byte() {
        let mut input = b"<SAMI>\r\n<BODY>\n".to_vec();
        input.extend_from_slice(&[0xb1, 0xdb, b'\n']); // EUC-KR text
        input.extend_from_slice(b"no newline at end");

        let trip = parse_smi_bytes("plain.smi", &input, &DecoderOptions::default()).unwrap();

        assert!(trip.is_empty());
        assert_eq!(trip.stats.total_lines, 4);
        assert_eq!(trip.decoded_smi, input);
    }

    #[test]
    fn test_counts_match_annotation_lines() {
        let mut input = String::from("<SAMI>\n");
        for i in 0..5 {
            input.push_str(&format!("<SYNC Start={}>\n", i * 1000));
            input.push_str(&annotation(&format!(
                "{};0;0;0;-75.{};45.{}",
                1_677_715_200_000i64 + i * 1000,
                i,
                i
            )));
        }

        let trip =
            parse_smi_bytes("trip.smi", input.as_bytes(), &DecoderOptions::default()).unwrap();

        assert_eq!(trip.stats.annotation_lines, 5);
        assert_eq!(trip.records.len(), 5);
        assert_eq!(trip.coordinates.len(), 5);
        assert!(trip
            .records
            .windows(2)
            .all(|w| w[0].timestamp_ms <= w[1].timestamp_ms));
    }

    #[test]
    fn test_short_record_is_skipped_but_decoded() {
        let input = annotation("1677715200000;0;0;-75.6972");

        let trip =
            parse_smi_bytes("trip.smi", input.as_bytes(), &DecoderOptions::default()).unwrap();

        assert!(trip.is_empty());
        assert_eq!(trip.stats.malformed_records, 1);
        assert_eq!(
            trip.decoded_smi_lossy(),
            "\t<P Class=ENCC ><!--1677715200000;0;0;-75.6972 -->\n"
        );
    }

    #[test]
    fn test_invalid_payload_line_kept_verbatim() {
        let input = "\t<P Class=ENCC ><!--not*base64 -->\n";

        let trip =
            parse_smi_bytes("trip.smi", input.as_bytes(), &DecoderOptions::default()).unwrap();

        assert!(trip.is_empty());
        assert_eq!(trip.stats.invalid_payloads, 1);
        assert_eq!(trip.decoded_smi_lossy(), input);
    }

    #[test]
    fn test_strict_mode_fails_with_line_number() {
        let input = format!(
            "<SAMI>\n{}{}",
            annotation("1677715200000;0;0;0;-75.6972;45.4215"),
            annotation("1677715201000;0;0")
        );
        let options = DecoderOptions {
            strict: true,
            ..Default::default()
        };

        let err = parse_smi_bytes("trip.smi", input.as_bytes(), &options).unwrap_err();
        match err.downcast_ref::<SmiError>() {
            Some(SmiError::MalformedRecord { line, .. }) => assert_eq!(*line, 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_strict_mode_fails_on_invalid_payload() {
        let input = format!(
            "<SAMI>\n{}\t<P Class=ENCC ><!--not*base64 -->\n",
            annotation("1677715200000;0;0;0;-75.6972;45.4215")
        );
        let options = DecoderOptions {
            strict: true,
            ..Default::default()
        };

        let err = parse_smi_bytes("trip.smi", input.as_bytes(), &options).unwrap_err();
        match err.downcast_ref::<SmiError>() {
            Some(SmiError::InvalidPayload { line, .. }) => assert_eq!(*line, 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_input_not_found() {
        let err = parse_smi_file(Path::new("/nonexistent/trip.smi"), &DecoderOptions::default())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SmiError>(),
            Some(SmiError::InputNotFound(_))
        ));
    }
}
