//! SAPOS query line rendering
//!
//! Two layouts are in use and must not be mixed:
//!
//! - DJI lines use decimal commas and three-space separators:
//!   `52,001   13,001   101   01.05.2024   08:19:42   35   1   R3   Forst12`
//! - Wingtra lines use decimal points, six decimals and single spaces:
//!   `47.397742 8.545594 608 01.05.2024 08:25:00 21 1 R3 Forst_Nord`

use crate::config::QueryConfig;
use crate::error::Result;
use crate::types::{DatasetKind, FlightFix};
use crate::window::QueryWindow;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    /// Wingtra: `47.397742 8.545594 ...`
    DecimalPoint,
    /// DJI: `52,001   13,001   ...`
    DecimalComma,
}

impl LineStyle {
    pub fn for_kind(kind: DatasetKind) -> Self {
        if kind.is_dji() {
            LineStyle::DecimalComma
        } else {
            LineStyle::DecimalPoint
        }
    }
}

/// Shortest round-trip decimal with a comma separator; whole numbers keep `,0`
pub fn decimal_comma(value: f64) -> String {
    let mut text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        text.push_str(".0");
    }
    text.replace('.', ",")
}

/// Render the query line for one flight
pub fn format_line(flight: &FlightFix, window: &QueryWindow, config: &QueryConfig) -> String {
    let fix = &flight.fix;
    let elevation = fix.elevation.trunc() as i64;

    match LineStyle::for_kind(flight.kind) {
        LineStyle::DecimalPoint => format!(
            "{:.6} {:.6} {} {} {} {} {} {}",
            fix.latitude,
            fix.longitude,
            elevation,
            window.start.format("%d.%m.%Y %H:%M:%S"),
            window.duration_minutes,
            config.station_count,
            config.receiver_type,
            flight.flight_name
        ),
        LineStyle::DecimalComma => format!(
            "{}   {}   {}   {}   {}   {}   {}   {}   {}",
            decimal_comma(fix.latitude),
            decimal_comma(fix.longitude),
            elevation,
            window.start.format("%d.%m.%Y"),
            window.start.format("%H:%M:%S"),
            window.duration_minutes,
            config.station_count,
            config.receiver_type,
            flight.flight_name
        )
        .trim()
        .to_string(),
    }
}

/// Overwrite the query file in `folder` and return its path
///
/// Wingtra files end with a newline, DJI files do not.
pub fn write_query_file(
    folder: &Path,
    line: &str,
    style: LineStyle,
    config: &QueryConfig,
) -> Result<PathBuf> {
    let path = folder.join(&config.output_file_name);
    let contents = match style {
        LineStyle::DecimalPoint => format!("{}\n", line),
        LineStyle::DecimalComma => line.trim().to_string(),
    };
    fs::write(&path, contents)?;
    info!("SAPOS query written to {}", path.display());
    Ok(path)
}
