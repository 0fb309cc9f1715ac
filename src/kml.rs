//! KML rendering of a decoded trip
//!
//! Produces one document with a styled path, start and end markers and a
//! balloon listing the trip's time range. XML is emitted through
//! `quick_xml::Writer`, so all text content is escaped.

use crate::conversion::{format_coordinate, format_utc_timestamp_or_raw};
use crate::error::SmiError;
use crate::types::{Coordinate, Trip, WaypointRecord};
use crate::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

const PATH_ICON: &str = "https://www.gstatic.com/mapspro/images/stock/503-wht-blank_maps.png";
const START_ICON: &str = "http://maps.google.com/mapfiles/kml/paddle/A.png";
const END_ICON: &str = "http://maps.google.com/mapfiles/kml/paddle/B.png";

// KML colors are aabbggrr
const ICON_COLOR: &str = "ff3644db";
const NORMAL_LINE_COLOR: &str = "ffff6712";
const HIGHLIGHT_LINE_COLOR: &str = "ff0000ff";
const BALLOON_BG_COLOR: &str = "ffffffff";
const BALLOON_TEXT_COLOR: &str = "ff000000";

const NORMAL_STYLE_ID: &str = "trip-normal";
const HIGHLIGHT_STYLE_ID: &str = "trip-highlight";
const STYLE_MAP_ID: &str = "trip-stylemap";
const START_STYLE_ID: &str = "trip-start";
const END_STYLE_ID: &str = "trip-end";

/// Visual state of the path line; Google Earth swaps between the two on hover
struct PathStyle<'a> {
    id: &'a str,
    label_scale: f64,
    line_color: &'a str,
    line_width: f64,
    balloon_text: Option<&'a str>,
}

/// Render a trip overview as KML into `sink`
///
/// `coordinates` and `records` must both be non-empty. The first and last
/// records supply the start and end times.
pub fn render_kml<W: Write>(
    name: &str,
    coordinates: &[Coordinate],
    records: &[WaypointRecord],
    sink: W,
) -> Result<()> {
    let (Some(first_coord), Some(last_coord)) = (coordinates.first(), coordinates.last()) else {
        return Err(SmiError::Export(format!("trip {} has no coordinates", name)).into());
    };
    let (Some(first_record), Some(last_record)) = (records.first(), records.last()) else {
        return Err(SmiError::Export(format!("trip {} has no waypoint records", name)).into());
    };

    let start_time = format_utc_timestamp_or_raw(first_record.timestamp_ms);
    let end_time = format_utc_timestamp_or_raw(last_record.timestamp_ms);
    let balloon = format!(
        "{}\nTrip starts at {}\nTrip ends at {}",
        name, start_time, end_time
    );

    let mut description = String::new();
    for coord in coordinates {
        description.push_str(&format_coordinate(coord));
        description.push('\n');
    }

    let mut kml = KmlWriter::new(sink);
    kml.declaration()?;
    kml.open_with("kml", &[("xmlns", KML_NAMESPACE)])?;
    kml.open("Document")?;
    kml.text("name", name)?;

    kml.path_style(&PathStyle {
        id: NORMAL_STYLE_ID,
        label_scale: 0.0,
        line_color: NORMAL_LINE_COLOR,
        line_width: 5.0,
        balloon_text: None,
    })?;
    kml.path_style(&PathStyle {
        id: HIGHLIGHT_STYLE_ID,
        label_scale: 1.0,
        line_color: HIGHLIGHT_LINE_COLOR,
        line_width: 7.5,
        balloon_text: Some(&balloon),
    })?;
    kml.style_map(STYLE_MAP_ID, NORMAL_STYLE_ID, HIGHLIGHT_STYLE_ID)?;
    kml.point_style(START_STYLE_ID, START_ICON)?;
    kml.point_style(END_STYLE_ID, END_ICON)?;

    // Path
    kml.open("Placemark")?;
    kml.text("name", name)?;
    kml.text("description", &description)?;
    kml.text("styleUrl", &format!("#{}", STYLE_MAP_ID))?;
    kml.open("LineString")?;
    kml.text("tessellate", "1")?;
    kml.text("coordinates", &join_coordinates(coordinates))?;
    kml.close("LineString")?;
    kml.close("Placemark")?;

    kml.point(
        &format!("Start - {}", start_time),
        Some(name),
        START_STYLE_ID,
        first_coord,
    )?;
    kml.point(&format!("End - {}", end_time), None, END_STYLE_ID, last_coord)?;

    kml.close("Document")?;
    kml.close("kml")?;
    kml.finish()
}

/// Render a decoded trip using its own name, coordinates and records
pub fn render_trip_kml<W: Write>(trip: &Trip, sink: W) -> Result<()> {
    render_kml(&trip.name, &trip.coordinates, &trip.records, sink)
}

fn join_coordinates(coordinates: &[Coordinate]) -> String {
    coordinates
        .iter()
        .map(format_coordinate)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Thin element-level helpers over the quick-xml event writer
struct KmlWriter<W: Write> {
    inner: Writer<W>,
}

impl<W: Write> KmlWriter<W> {
    fn new(sink: W) -> Self {
        Self {
            inner: Writer::new_with_indent(sink, b' ', 2),
        }
    }

    fn declaration(&mut self) -> Result<()> {
        self.inner
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(())
    }

    fn open(&mut self, name: &str) -> Result<()> {
        self.inner.write_event(Event::Start(BytesStart::new(name)))?;
        Ok(())
    }

    fn open_with(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut start = BytesStart::new(name);
        for &attr in attrs {
            start.push_attribute(attr);
        }
        self.inner.write_event(Event::Start(start))?;
        Ok(())
    }

    fn empty_with(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut element = BytesStart::new(name);
        for &attr in attrs {
            element.push_attribute(attr);
        }
        self.inner.write_event(Event::Empty(element))?;
        Ok(())
    }

    fn close(&mut self, name: &str) -> Result<()> {
        self.inner.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn text(&mut self, name: &str, value: &str) -> Result<()> {
        self.open(name)?;
        self.inner.write_event(Event::Text(BytesText::new(value)))?;
        self.close(name)
    }

    fn icon_style(&mut self, color: Option<&str>, href: &str) -> Result<()> {
        self.open("IconStyle")?;
        if let Some(color) = color {
            self.text("color", color)?;
            self.text("scale", "1")?;
        }
        self.open("Icon")?;
        self.text("href", href)?;
        self.close("Icon")?;
        if color.is_some() {
            self.empty_with(
                "hotSpot",
                &[
                    ("x", "32"),
                    ("y", "64"),
                    ("xunits", "pixels"),
                    ("yunits", "insetPixels"),
                ],
            )?;
        }
        self.close("IconStyle")
    }

    fn path_style(&mut self, style: &PathStyle<'_>) -> Result<()> {
        self.open_with("Style", &[("id", style.id)])?;
        self.icon_style(Some(ICON_COLOR), PATH_ICON)?;

        self.open("LabelStyle")?;
        self.text("scale", &style.label_scale.to_string())?;
        self.close("LabelStyle")?;

        self.open("LineStyle")?;
        self.text("color", style.line_color)?;
        self.text("width", &style.line_width.to_string())?;
        self.close("LineStyle")?;

        if let Some(balloon) = style.balloon_text {
            self.open("BalloonStyle")?;
            self.text("bgColor", BALLOON_BG_COLOR)?;
            self.text("textColor", BALLOON_TEXT_COLOR)?;
            self.text("text", balloon)?;
            self.close("BalloonStyle")?;
        }

        self.close("Style")
    }

    fn style_map(&mut self, id: &str, normal: &str, highlight: &str) -> Result<()> {
        self.open_with("StyleMap", &[("id", id)])?;
        for (key, style_id) in [("normal", normal), ("highlight", highlight)] {
            self.open("Pair")?;
            self.text("key", key)?;
            self.text("styleUrl", &format!("#{}", style_id))?;
            self.close("Pair")?;
        }
        self.close("StyleMap")
    }

    fn point_style(&mut self, id: &str, href: &str) -> Result<()> {
        self.open_with("Style", &[("id", id)])?;
        self.icon_style(None, href)?;
        self.close("Style")
    }

    fn point(
        &mut self,
        name: &str,
        description: Option<&str>,
        style_id: &str,
        coord: &Coordinate,
    ) -> Result<()> {
        self.open("Placemark")?;
        self.text("name", name)?;
        if let Some(description) = description {
            self.text("description", description)?;
        }
        self.text("styleUrl", &format!("#{}", style_id))?;
        self.open("Point")?;
        self.text("coordinates", &format_coordinate(coord))?;
        self.close("Point")?;
        self.close("Placemark")
    }

    fn finish(self) -> Result<()> {
        let mut sink = self.inner.into_inner();
        sink.flush()?;
        Ok(())
    }
}
