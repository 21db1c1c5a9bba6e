//! Clock conversions used by the extractors
//!
//! DJI cameras stamp file names and EXIF with naive civil time. Those are
//! localized in the configured zone (with its historical DST rules), moved to
//! UTC, then shifted back by the GPS-UTC leap-second count. Wingtra
//! timestamps skip all of that: the millisecond count is read as Unix time.

use crate::error::{Result, SaposError};
use chrono::offset::LocalResult;
use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Interpret `local` in `tz` and return the GPS-aligned UTC instant
///
/// Ambiguous wall-clock times (autumn fall-back) resolve to standard time.
/// Times inside the spring gap use the offset in force just before it.
pub fn local_to_gps_utc(local: NaiveDateTime, tz: Tz, leap: Duration) -> Result<DateTime<Utc>> {
    let utc = match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(_, standard) => standard.with_timezone(&Utc),
        LocalResult::None => {
            let before_gap = local - Duration::hours(1);
            match tz.from_local_datetime(&before_gap) {
                LocalResult::Single(dt) => dt.with_timezone(&Utc) + Duration::hours(1),
                _ => {
                    return Err(SaposError::malformed(format!(
                        "local time {} does not exist in {}",
                        local,
                        tz.name()
                    )))
                }
            }
        }
    };
    Ok(utc - leap)
}

/// Wingtra GPS milliseconds, taken as milliseconds since the Unix epoch
pub fn gps_millis_to_utc(millis: f64) -> Result<DateTime<Utc>> {
    if !millis.is_finite() {
        return Err(SaposError::malformed(format!("timestamp {}", millis)));
    }
    DateTime::<Utc>::from_timestamp_micros((millis * 1000.0).round() as i64)
        .ok_or_else(|| SaposError::malformed(format!("timestamp {} out of range", millis)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use chrono_tz::Europe::Berlin;

    fn naive(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_summer_and_winter_offsets() {
        let leap = Duration::seconds(18);
        let summer = local_to_gps_utc(naive(2024, 7, 1, 12, 0, 0), Berlin, leap).unwrap();
        let winter = local_to_gps_utc(naive(2024, 1, 15, 12, 0, 0), Berlin, leap).unwrap();
        assert_eq!(summer, utc(2024, 7, 1, 9, 59, 42));
        assert_eq!(winter, utc(2024, 1, 15, 10, 59, 42));
    }

    #[test]
    fn test_one_local_hour_across_fall_back_is_two_utc_hours() {
        let leap = Duration::seconds(18);
        let before = local_to_gps_utc(naive(2024, 10, 27, 1, 30, 0), Berlin, leap).unwrap();
        let after = local_to_gps_utc(naive(2024, 10, 27, 2, 30, 0), Berlin, leap).unwrap();
        assert_eq!(before, utc(2024, 10, 26, 23, 29, 42));
        assert_eq!(after, utc(2024, 10, 27, 1, 29, 42));
        assert_eq!(after - before, Duration::hours(2));
    }

    #[test]
    fn test_ambiguous_time_uses_standard_offset() {
        let t = local_to_gps_utc(naive(2024, 10, 27, 2, 30, 0), Berlin, Duration::zero()).unwrap();
        assert_eq!(t, utc(2024, 10, 27, 1, 30, 0));
    }

    #[test]
    fn test_spring_gap_uses_previous_offset() {
        let t = local_to_gps_utc(naive(2024, 3, 31, 2, 30, 0), Berlin, Duration::zero()).unwrap();
        assert_eq!(t, utc(2024, 3, 31, 1, 30, 0));
    }

    #[test]
    fn test_gps_millis_are_unix_millis() {
        let t = gps_millis_to_utc(1_714_552_200_000.0).unwrap();
        assert_eq!(t, utc(2024, 5, 1, 8, 30, 0));
        assert!(gps_millis_to_utc(f64::NAN).is_err());
    }
}
