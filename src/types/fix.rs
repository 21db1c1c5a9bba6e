use crate::error::{Result, SaposError};
use crate::types::DatasetKind;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Position and time span recovered from one flight's raw files
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Meters; Wingtra values already carry the altitude offset
    pub elevation: f64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl ExtractedFix {
    /// Build a fix, rejecting out-of-range coordinates and reversed time spans
    pub fn new(
        latitude: f64,
        longitude: f64,
        elevation: f64,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(SaposError::malformed(format!(
                "latitude {} outside [-90, 90]",
                latitude
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(SaposError::malformed(format!(
                "longitude {} outside [-180, 180]",
                longitude
            )));
        }
        if !elevation.is_finite() {
            return Err(SaposError::malformed(format!("elevation {}", elevation)));
        }
        if start_time > end_time {
            return Err(SaposError::malformed(format!(
                "start time {} is after end time {}",
                start_time, end_time
            )));
        }
        Ok(Self {
            latitude,
            longitude,
            elevation,
            start_time,
            end_time,
        })
    }

    pub fn span(&self) -> chrono::Duration {
        self.end_time - self.start_time
    }
}

/// An extracted fix together with what it describes
#[derive(Debug, Clone, PartialEq)]
pub struct FlightFix {
    pub kind: DatasetKind,
    pub fix: ExtractedFix,
    /// Label written as the last field of the query line
    pub flight_name: String,
    /// Folder that receives the query file
    pub folder: PathBuf,
}
