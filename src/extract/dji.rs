//! DJI MRK position logs
//!
//! An MRK line is whitespace separated; the fields this module reads carry a
//! unit suffix after a comma:
//!
//! ```text
//! 1  315215.200  [2245]  -12,N  5,E  -8,V  52.00000000,Lat  13.00000000,Lon  100.500,Ellh  ...
//! ```
//!
//! Field 6 is latitude, 7 longitude and 8 ellipsoidal height. The flight
//! time span comes either from `DJI_YYYYMMDDHHMM` file names or from the
//! `DateTimeOriginal` EXIF tag of the JPGs.

use crate::config::QueryConfig;
use crate::error::{Result, SaposError};
use crate::extract::time::local_to_gps_utc;
use crate::scan::{files_in_dir, files_recursive};
use crate::types::{DatasetKind, ExtractedFix, FlightFix};
use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use regex::Regex;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const LAT_FIELD: usize = 6;
const LON_FIELD: usize = 7;
const HEIGHT_FIELD: usize = 8;

/// Index of the flight name among the `_`-separated MRK file stem tokens
const NAME_TOKEN: usize = 3;

const EXIF_TIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Position summary of one MRK file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MrkSummary {
    /// Mean of the first and last latitude
    pub latitude: f64,
    /// Mean of the first and last longitude
    pub longitude: f64,
    /// Middle line height, rounded to whole meters
    pub elevation: f64,
}

fn filename_time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"DJI_(\d{4})(\d{2})(\d{2})(\d{2})(\d{2})").unwrap())
}

fn field(line: &str, index: usize, line_no: usize) -> Result<f64> {
    let raw = line.split_whitespace().nth(index).ok_or_else(|| {
        SaposError::malformed(format!(
            "MRK line {} has no field {}: '{}'",
            line_no + 1,
            index,
            line.trim()
        ))
    })?;
    let number = raw.split(',').next().unwrap_or(raw);
    number.parse::<f64>().map_err(|_| {
        SaposError::malformed(format!(
            "MRK line {} field {} is not a number: '{}'",
            line_no + 1,
            index,
            raw
        ))
    })
}

/// Average the first and last fix and take the height of the middle line
pub fn parse_mrk(text: &str) -> Result<MrkSummary> {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return Err(SaposError::malformed("MRK file is empty"));
    }
    let last = lines.len() - 1;
    let middle = lines.len() / 2;

    let lat_first = field(lines[0], LAT_FIELD, 0)?;
    let lon_first = field(lines[0], LON_FIELD, 0)?;
    let lat_last = field(lines[last], LAT_FIELD, last)?;
    let lon_last = field(lines[last], LON_FIELD, last)?;
    let height = field(lines[middle], HEIGHT_FIELD, middle)?;

    Ok(MrkSummary {
        latitude: (lat_first + lat_last) / 2.0,
        longitude: (lon_first + lon_last) / 2.0,
        elevation: height.round(),
    })
}

/// Minute-resolution local time embedded in a `DJI_YYYYMMDDHHMM...` name
pub fn time_from_name(name: &str) -> Result<NaiveDateTime> {
    let caps = filename_time_pattern().captures(name).ok_or_else(|| {
        SaposError::malformed(format!("'{}' does not match DJI_YYYYMMDDHHMM", name))
    })?;
    let num = |i: usize| caps[i].parse::<u32>().unwrap_or(u32::MAX);
    let year = caps[1].parse::<i32>().unwrap_or(i32::MIN);

    NaiveDate::from_ymd_opt(year, num(2), num(3))
        .and_then(|d| d.and_hms_opt(num(4), num(5), 0))
        .ok_or_else(|| SaposError::malformed(format!("invalid date/time in '{}'", name)))
}

/// `DateTimeOriginal` of a JPG as naive local time
pub fn exif_capture_time(jpg: &Path) -> Result<NaiveDateTime> {
    let mut reader = BufReader::new(File::open(jpg)?);
    let exif = match exif::Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(exif::Error::Io(e)) => return Err(SaposError::Io(e)),
        Err(e) => {
            return Err(SaposError::missing(format!(
                "no EXIF data in {}: {}",
                jpg.display(),
                e
            )))
        }
    };

    let field = exif
        .get_field(exif::Tag::DateTimeOriginal, exif::In::PRIMARY)
        .ok_or_else(|| {
            SaposError::missing(format!("no EXIF DateTimeOriginal in {}", jpg.display()))
        })?;
    let raw = match field.value {
        exif::Value::Ascii(ref parts) if !parts.is_empty() => {
            String::from_utf8_lossy(&parts[0]).into_owned()
        }
        _ => {
            return Err(SaposError::malformed(format!(
                "EXIF DateTimeOriginal in {} is not text",
                jpg.display()
            )))
        }
    };
    let text = raw.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    NaiveDateTime::parse_from_str(text, EXIF_TIME_FORMAT).map_err(|_| {
        SaposError::malformed(format!(
            "EXIF DateTimeOriginal '{}' in {} is not YYYY:MM:DD HH:MM:SS",
            text,
            jpg.display()
        ))
    })
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or("")
}

fn first_and_last(jpgs: &[PathBuf]) -> Option<(&PathBuf, &PathBuf)> {
    Some((jpgs.first()?, jpgs.last()?))
}

/// Flight name taken from the MRK file stem, e.g. `DJI_202405011030_001_Forst12`
pub fn flight_name_from_mrk(mrk: &Path) -> Result<String> {
    mrk.file_stem()
        .and_then(|s| s.to_str())
        .and_then(|s| s.split('_').nth(NAME_TOKEN))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            SaposError::malformed(format!(
                "MRK name '{}' has no flight name token",
                file_name(mrk)
            ))
        })
}

fn build(
    mrk: &Path,
    folder: &Path,
    kind: DatasetKind,
    start_local: NaiveDateTime,
    end_local: NaiveDateTime,
    flight_name: String,
    config: &QueryConfig,
) -> Result<FlightFix> {
    let tz = config.tz()?;
    let start = local_to_gps_utc(start_local, tz, config.leap_shift())?;
    let end = local_to_gps_utc(end_local, tz, config.leap_shift())?;

    let summary = parse_mrk(&fs::read_to_string(mrk)?)?;
    debug!(
        "{}: {:?}, local {} .. {}",
        mrk.display(),
        summary,
        start_local,
        end_local
    );

    Ok(FlightFix {
        kind,
        fix: ExtractedFix::new(
            summary.latitude,
            summary.longitude,
            summary.elevation,
            start,
            end,
        )?,
        flight_name,
        folder: folder.to_path_buf(),
    })
}

/// Start time from the MRK name, end time from the last JPG beside it
pub fn extract_from_filenames(
    mrk: &Path,
    folder: &Path,
    kind: DatasetKind,
    config: &QueryConfig,
) -> Result<FlightFix> {
    let mrk_dir = mrk.parent().unwrap_or(folder);
    let jpgs = files_in_dir(mrk_dir, "jpg")?;
    let (_, last_jpg) = first_and_last(&jpgs).ok_or_else(|| {
        SaposError::missing(format!("no JPG files next to {}", mrk.display()))
    })?;

    let start_local = time_from_name(file_name(mrk))?;
    let end_local = time_from_name(file_name(last_jpg))?;
    let flight_name = flight_name_from_mrk(mrk)?;
    build(mrk, folder, kind, start_local, end_local, flight_name, config)
}

/// Start and end from the EXIF capture time of the first and last JPG under the folder
pub fn extract_from_exif(
    mrk: &Path,
    folder: &Path,
    kind: DatasetKind,
    config: &QueryConfig,
) -> Result<FlightFix> {
    let jpgs = files_recursive(folder, "jpg")?;
    let (first_jpg, last_jpg) = first_and_last(&jpgs).ok_or_else(|| {
        SaposError::missing(format!("no JPG files under {}", folder.display()))
    })?;

    let start_local = exif_capture_time(first_jpg)?;
    let end_local = exif_capture_time(last_jpg)?;
    let flight_name = folder
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            SaposError::malformed(format!("cannot derive flight name for {}", folder.display()))
        })?;
    build(mrk, folder, kind, start_local, end_local, flight_name, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mrk_line(index: u32, lat: &str, lon: &str, height: &str) -> String {
        format!(
            "{}\t315215.200\t[2245]\t  -12,N\t    5,E\t   -8,V\t{},Lat\t{},Lon\t{},Ellh\t0.012, 0.010, 0.020\t50,Q\n",
            index, lat, lon, height
        )
    }

    #[test]
    fn test_parse_mrk_averages_endpoints() {
        let text = [
            mrk_line(1, "52.000000", "13.000000", "98.0"),
            mrk_line(2, "52.100000", "13.100000", "100.5"),
            mrk_line(3, "52.002000", "13.002000", "99.0"),
        ]
        .concat();
        let summary = parse_mrk(&text).unwrap();
        assert!((summary.latitude - 52.001).abs() < 1e-12);
        assert!((summary.longitude - 13.001).abs() < 1e-12);
        assert_eq!(summary.elevation, 101.0);
    }

    #[test]
    fn test_middle_line_uses_floor_index() {
        let text = [
            mrk_line(1, "52.0", "13.0", "10.0"),
            mrk_line(2, "52.0", "13.0", "20.0"),
            mrk_line(3, "52.0", "13.0", "30.4"),
            mrk_line(4, "52.0", "13.0", "40.0"),
        ]
        .concat();
        assert_eq!(parse_mrk(&text).unwrap().elevation, 30.0);
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let text = format!("\n{}\n\n", mrk_line(1, "52.0", "13.0", "77.7"));
        let summary = parse_mrk(&text).unwrap();
        assert_eq!(summary.latitude, 52.0);
        assert_eq!(summary.elevation, 78.0);
    }

    #[test]
    fn test_empty_and_short_lines_are_malformed() {
        assert!(matches!(parse_mrk(""), Err(SaposError::MalformedRecord(_))));
        let err = parse_mrk("1 2 3 4 5 6 52.0,Lat\n").unwrap_err();
        assert!(err.to_string().contains("no field 7"));
        let err = parse_mrk("1 2 3 4 5 6 north,Lat 13.0,Lon 1.0,Ellh\n").unwrap_err();
        assert!(err.to_string().contains("not a number"));
    }

    #[test]
    fn test_time_from_name() {
        let t = time_from_name("DJI_202405011030_001_Forst12.MRK").unwrap();
        assert_eq!(t.to_string(), "2024-05-01 10:30:00");
        let t = time_from_name("DJI_20240501104512_0042_D.JPG").unwrap();
        assert_eq!(t.to_string(), "2024-05-01 10:45:00");
    }

    #[test]
    fn test_time_from_name_rejects_bad_names() {
        assert!(time_from_name("IMG_0001.JPG").is_err());
        assert!(matches!(
            time_from_name("DJI_202413011030_0001.JPG"),
            Err(SaposError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_flight_name_from_mrk() {
        let name = flight_name_from_mrk(Path::new("/x/DJI_202405011030_001_Forst12.MRK")).unwrap();
        assert_eq!(name, "Forst12");
        assert!(flight_name_from_mrk(Path::new("/x/DJI_202405011030.MRK")).is_err());
    }
}
