//! Query configuration
//!
//! Every constant that shapes a SAPOS query line lives in [`QueryConfig`]:
//! buffers, the leap-second shift, the civil time zone the DJI cameras write
//! and the trailing station/receiver tokens. Defaults reproduce the values
//! the WZE-UAV workflow has always used; a TOML file can override any subset.
//!
//! ```toml
//! leap_seconds = 18
//! dji_buffer_minutes = 10
//! receiver_type = "R3"
//! timezone = "Europe/Berlin"
//! ```

use crate::error::{Result, SaposError};
use chrono::Duration;
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::Path;

/// Name of the per-folder output file
pub const QUERY_FILE_NAME: &str = "@sapos_query.txt";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueryConfig {
    /// Added to the Wingtra coordinate altitude (meters)
    pub wingtra_altitude_offset_m: f64,
    /// Wingtra window expansion on each side (milliseconds)
    pub wingtra_buffer_ms: i64,
    /// DJI window expansion on each side (minutes)
    pub dji_buffer_minutes: i64,
    /// GPS-UTC offset subtracted from DJI capture times
    pub leap_seconds: i64,
    pub station_count: u32,
    pub receiver_type: String,
    /// IANA zone the DJI cameras use for file names and EXIF
    pub timezone: String,
    pub output_file_name: String,
    pub master_file_name: String,
    pub nested_master_file_name: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            wingtra_altitude_offset_m: 120.0,
            wingtra_buffer_ms: 300_000,
            dji_buffer_minutes: 10,
            leap_seconds: 18,
            station_count: 1,
            receiver_type: "R3".to_string(),
            timezone: "Europe/Berlin".to_string(),
            output_file_name: QUERY_FILE_NAME.to_string(),
            master_file_name: "all_sapos_queries.txt".to_string(),
            nested_master_file_name: "all_sapos_queries_v2.txt".to_string(),
        }
    }
}

impl QueryConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: QueryConfig =
            toml::from_str(text).map_err(|e| SaposError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text).map_err(|e| match e {
            SaposError::Config(msg) => {
                SaposError::Config(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.tz()?;
        if self.wingtra_buffer_ms < 0 || self.dji_buffer_minutes < 0 {
            return Err(SaposError::Config("buffers must not be negative".into()));
        }
        if self.output_file_name.is_empty() || self.output_file_name.contains(['/', '\\']) {
            return Err(SaposError::Config(format!(
                "invalid output file name '{}'",
                self.output_file_name
            )));
        }
        if self.receiver_type.split_whitespace().count() != 1 {
            return Err(SaposError::Config(format!(
                "receiver type must be a single token, got '{}'",
                self.receiver_type
            )));
        }
        Ok(())
    }

    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| SaposError::Config(format!("unknown time zone '{}'", self.timezone)))
    }

    pub fn leap_shift(&self) -> Duration {
        Duration::seconds(self.leap_seconds)
    }

    pub fn dji_buffer(&self) -> Duration {
        Duration::minutes(self.dji_buffer_minutes)
    }

    pub fn wingtra_buffer(&self) -> Duration {
        Duration::milliseconds(self.wingtra_buffer_ms)
    }
}
