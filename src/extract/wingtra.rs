//! Wingtra JSON telemetry
//!
//! The flight JSON is scanned as text rather than deserialized: only the
//! first `"coordinate"` block and the `"timestamp"` values matter, and the
//! numbers appear both quoted and bare depending on the app version.

use crate::config::QueryConfig;
use crate::error::{Result, SaposError};
use crate::extract::time::gps_millis_to_utc;
use crate::types::{DatasetKind, ExtractedFix, FlightFix, FolderLayout};
use log::debug;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

const COORDINATE_MARKER: &str = "\"coordinate\"";

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"-?\d+(?:\.\d+)?(?:[eE][-+]?\d+)?").unwrap())
}

fn timestamp_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#""timestamp"\s*:\s*"?(-?\d+(?:\.\d+)?)"#).unwrap())
}

/// Latitude, longitude and altitude from the first coordinate record
pub fn parse_coordinate(text: &str) -> Result<[f64; 3]> {
    let start = text
        .find(COORDINATE_MARKER)
        .ok_or_else(|| SaposError::malformed("no \"coordinate\" record in Wingtra JSON"))?;
    let tail = &text[start + COORDINATE_MARKER.len()..];

    let values: Vec<f64> = number_pattern()
        .find_iter(tail)
        .take(3)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();
    match values[..] {
        [lat, lon, alt] => Ok([lat, lon, alt]),
        _ => Err(SaposError::malformed(format!(
            "expected 3 coordinate values in Wingtra JSON, found {}",
            values.len()
        ))),
    }
}

/// First and last `"timestamp"` value in file order (GPS milliseconds)
pub fn parse_timestamp_range(text: &str) -> Result<(f64, f64)> {
    let mut first = None;
    let mut last = None;
    for caps in timestamp_pattern().captures_iter(text) {
        if let Ok(value) = caps[1].parse::<f64>() {
            first.get_or_insert(value);
            last = Some(value);
        }
    }
    match (first, last) {
        (Some(first), Some(last)) => Ok((first, last)),
        _ => Err(SaposError::malformed("no timestamps found in Wingtra JSON")),
    }
}

/// Join whitespace-separated words of a folder name with underscores
pub fn collapse_whitespace(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}

fn flight_label(json: &Path, folder: &Path, layout: FolderLayout) -> Result<String> {
    let named = match layout {
        FolderLayout::Classic => json.parent().and_then(Path::parent),
        FolderLayout::Nested => Some(folder),
    };
    let name = named
        .and_then(Path::file_name)
        .and_then(|n| n.to_str())
        .map(collapse_whitespace)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| {
            SaposError::malformed(format!("cannot derive flight name for {}", json.display()))
        })?;
    Ok(name)
}

pub fn extract(
    json: &Path,
    folder: &Path,
    layout: FolderLayout,
    config: &QueryConfig,
) -> Result<FlightFix> {
    let text = fs::read_to_string(json)?;
    let [latitude, longitude, altitude] = parse_coordinate(&text)?;
    let (start_ms, end_ms) = parse_timestamp_range(&text)?;
    debug!(
        "{}: coordinate {} {} {}, timestamps {} .. {}",
        json.display(),
        latitude,
        longitude,
        altitude,
        start_ms,
        end_ms
    );

    let fix = ExtractedFix::new(
        latitude,
        longitude,
        altitude + config.wingtra_altitude_offset_m,
        gps_millis_to_utc(start_ms)?,
        gps_millis_to_utc(end_ms)?,
    )?;

    Ok(FlightFix {
        kind: DatasetKind::Wingtra,
        fix,
        flight_name: flight_label(json, folder, layout)?,
        folder: folder.to_path_buf(),
    })
}
