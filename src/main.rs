//! CLI binary for SMI Parser
//!
//! Decodes the GPS telemetry in a dashcam SMI file and writes a KML trip
//! overview to the current directory.

use anyhow::Result;
use clap::{Arg, Command};
use smi_parser::{
    decoded_smi_path, export_to_csv, export_to_kml, format_duration_ms,
    format_utc_timestamp_or_raw, parse_smi_file, should_skip_export, write_decoded_smi,
    DecoderOptions, ExportOptions, SmiError, Trip,
};
use std::path::PathBuf;

fn build_command() -> Command {
    Command::new("SMI Parser")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Decode GPS trip data embedded in dashcam SMI subtitle files and export it to KML.")
        .arg(
            Arg::new("input")
                .short('i')
                .help("SMI file")
                .value_name("input_file"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug output and detailed decoding information")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .help("Directory for KML/CSV output files (default: current directory)")
                .value_name("DIR"),
        )
        .arg(
            Arg::new("csv")
                .long("csv")
                .help("Also export every decoded waypoint to a CSV file")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("keep-decoded")
                .long("keep-decoded")
                .help("Keep the decoded SMI next to the input file (saved as <input>2)")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("Stop at the first annotation that cannot be decoded instead of skipping it")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("skip-no-fix")
                .long("skip-no-fix")
                .help("Skip exports when every decoded position is 0,0 (no GPS fix)")
                .action(clap::ArgAction::SetTrue),
        )
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn display_trip_info(trip: &Trip) {
    println!(
        "Decoded {} waypoint(s) from {} annotation line(s) ({} lines total)",
        trip.waypoint_count(),
        trip.stats.annotation_lines,
        trip.stats.total_lines
    );

    let skipped = trip.stats.skipped_annotations();
    if skipped > 0 {
        eprintln!(
            "Warning: {skipped} annotation line(s) could not be decoded ({} invalid payload, {} malformed record)",
            trip.stats.invalid_payloads, trip.stats.malformed_records
        );
    }

    if let (Some(start), Some(end)) = (trip.start_timestamp_ms(), trip.end_timestamp_ms()) {
        println!("Trip starts at {}", format_utc_timestamp_or_raw(start));
        println!("Trip ends at {}", format_utc_timestamp_or_raw(end));
        println!("Duration: {}", format_duration_ms(trip.duration_ms()));
    }
}

fn main() -> Result<()> {
    let matches = build_command().get_matches();

    let debug = matches.get_flag("debug");
    init_logging(debug);

    // Check if no input was provided and show help
    let input_path = match matches.get_one::<String>("input") {
        Some(input) => PathBuf::from(input),
        None => {
            build_command().print_help()?;
            println!();
            return Ok(());
        }
    };

    let decoder_options = DecoderOptions {
        strict: matches.get_flag("strict"),
        ..Default::default()
    };
    let export_options = ExportOptions {
        kml: true,
        csv: matches.get_flag("csv"),
        output_dir: matches.get_one::<String>("output-dir").cloned(),
    };
    let keep_decoded = matches.get_flag("keep-decoded");
    let skip_no_fix = matches.get_flag("skip-no-fix");

    let filename = input_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");
    println!("Processing: {filename}");

    let trip = match parse_smi_file(&input_path, &decoder_options) {
        Ok(trip) => trip,
        Err(e) => {
            match e.downcast_ref::<SmiError>() {
                Some(SmiError::InputNotFound(_)) => eprintln!("{e}"),
                _ => eprintln!("Error processing {filename}: {e:#}"),
            }
            std::process::exit(1);
        }
    };

    display_trip_info(&trip);

    if keep_decoded {
        let preview_path = decoded_smi_path(&input_path);
        match write_decoded_smi(&trip, &preview_path) {
            Ok(()) => println!("Decoded SMI saved as {}", preview_path.display()),
            Err(e) => eprintln!("Warning: Failed to save decoded SMI for {filename}: {e:#}"),
        }
    }

    let (should_skip, reason) = should_skip_export(&trip, skip_no_fix);
    if should_skip {
        println!("Skipping exports for this trip: {reason}");
        return Ok(());
    }

    if export_options.kml {
        println!("Generating KML data...");
        match export_to_kml(&trip, &export_options) {
            Ok(Some(path)) => println!("KML file generated - {}", path.display()),
            Ok(None) => println!("No waypoints to export for {filename}"),
            Err(e) => eprintln!("Warning: Failed to export KML for {filename}: {e:#}"),
        }
    }

    if export_options.csv {
        match export_to_csv(&trip, &export_options) {
            Ok(Some(path)) => println!("Exported waypoints to: {}", path.display()),
            Ok(None) => println!("No waypoints to export for {filename}"),
            Err(e) => eprintln!("Warning: Failed to export CSV for {filename}: {e:#}"),
        }
    }

    Ok(())
}
