//! Export filtering heuristics for identifying trips worth exporting
//!
//! A trip with no decoded waypoints has nothing to draw and is always
//! skipped. Callers may also opt in to skipping trips whose positions are all
//! `0,0`, which some dashcams write while they have no satellite fix.

use crate::types::{Coordinate, Trip};

/// True when the coordinate is anything other than `0,0`
pub fn has_gps_fix(coord: &Coordinate) -> bool {
    coord.longitude != 0.0 || coord.latitude != 0.0
}

/// Determines if a trip should be skipped for export
///
/// # Arguments
/// * `trip` - The decoded trip to evaluate
/// * `skip_no_fix` - If true, also skip trips where every position is `0,0`
///
/// # Returns
/// Tuple of (should_skip, reason_description)
pub fn should_skip_export(trip: &Trip, skip_no_fix: bool) -> (bool, String) {
    if trip.is_empty() {
        return (true, "no waypoints decoded".to_string());
    }

    if skip_no_fix && !trip.coordinates.iter().any(has_gps_fix) {
        return (
            true,
            format!(
                "no GPS fix in any of {} waypoint(s)",
                trip.coordinates.len()
            ),
        );
    }

    (false, String::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WaypointRecord;

    fn trip_with(records: &[&str]) -> Trip {
        let mut trip = Trip::new("trip.smi");
        for text in records {
            trip.push_record(WaypointRecord::parse(text).unwrap());
        }
        trip
    }

    #[test]
    fn test_empty_trip_always_skipped() {
        let trip = Trip::new("empty.smi");
        assert!(should_skip_export(&trip, true).0);
        let (skip, reason) = should_skip_export(&trip, false);
        assert!(skip);
        assert_eq!(reason, "no waypoints decoded");
    }

    #[test]
    fn test_zero_position_trip_exported_by_default() {
        let trip = trip_with(&["1000;0;0;0;0;0", "2000;0;0;0;0.0;0.0"]);
        assert_eq!(should_skip_export(&trip, false), (false, String::new()));
    }

    #[test]
    fn test_zero_position_trip_skipped_when_requested() {
        let trip = trip_with(&["1000;0;0;0;0;0", "2000;0;0;0;0.0;0.0"]);
        let (skip, reason) = should_skip_export(&trip, true);
        assert!(skip);
        assert_eq!(reason, "no GPS fix in any of 2 waypoint(s)");
    }

    #[test]
    fn test_trip_with_fix_kept() {
        let trip = trip_with(&["1000;0;0;0;0;0", "2000;0;0;0;-75.6972;45.4215"]);
        assert_eq!(should_skip_export(&trip, true), (false, String::new()));
    }
}
