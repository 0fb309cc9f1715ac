use crate::error::RecordError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Separator between fields of a decoded record
pub const FIELD_SEPARATOR: &str = ";";
/// Minimum number of fields a usable record carries
pub const MIN_RECORD_FIELDS: usize = 6;

pub const TIMESTAMP_FIELD: usize = 0;
pub const LONGITUDE_FIELD: usize = 4;
pub const LATITUDE_FIELD: usize = 5;

/// A (longitude, latitude) pair in decimal degrees, KML axis order
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
}

/// One decoded GPS sample from the dashcam telemetry
///
/// The dashcam writes more fields than the position and time (speed and
/// sensor readings among them); those are kept verbatim in `fields` but
/// not interpreted.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WaypointRecord {
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: i64,
    pub longitude: f64,
    pub latitude: f64,
    /// Every field of the record, in order, exactly as decoded
    pub fields: Vec<String>,
}

impl WaypointRecord {
    /// Split decoded record text on `;` and validate the positional fields
    pub fn parse(text: &str) -> std::result::Result<Self, RecordError> {
        let fields: Vec<String> = text.split(FIELD_SEPARATOR).map(str::to_string).collect();

        if fields.len() < MIN_RECORD_FIELDS {
            return Err(RecordError::TooFewFields {
                found: fields.len(),
                required: MIN_RECORD_FIELDS,
            });
        }

        let timestamp_ms = parse_field(&fields[TIMESTAMP_FIELD], "timestamp")?;
        let longitude = parse_degrees(&fields[LONGITUDE_FIELD], "longitude")?;
        let latitude = parse_degrees(&fields[LATITUDE_FIELD], "latitude")?;

        Ok(Self {
            timestamp_ms,
            longitude,
            latitude,
            fields,
        })
    }

    /// Longitude exactly as written by the dashcam
    pub fn longitude_text(&self) -> &str {
        &self.fields[LONGITUDE_FIELD]
    }

    /// Latitude exactly as written by the dashcam
    pub fn latitude_text(&self) -> &str {
        &self.fields[LATITUDE_FIELD]
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            longitude: self.longitude,
            latitude: self.latitude,
        }
    }

    /// Re-join the fields into the original decoded text
    pub fn to_record_text(&self) -> String {
        self.fields.join(FIELD_SEPARATOR)
    }
}

fn parse_field<T: std::str::FromStr>(
    value: &str,
    field: &'static str,
) -> std::result::Result<T, RecordError> {
    value.trim().parse().map_err(|_| RecordError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

/// Decimal degrees; `NaN` and infinities parse as `f64` but are not positions
fn parse_degrees(value: &str, field: &'static str) -> std::result::Result<f64, RecordError> {
    let degrees: f64 = parse_field(value, field)?;
    if !degrees.is_finite() {
        return Err(RecordError::InvalidNumber {
            field,
            value: value.to_string(),
        });
    }
    Ok(degrees)
}
