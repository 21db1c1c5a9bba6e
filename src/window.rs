//! Query time windows
//!
//! The two dataset families pad and round their windows differently and
//! both rules are kept as the downstream submissions expect them.

use crate::config::QueryConfig;
use crate::types::{DatasetKind, ExtractedFix, FlightFix};
use chrono::{DateTime, Duration, Utc};

/// Start instant and length of the requested correction data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    pub start: DateTime<Utc>,
    pub duration_minutes: i64,
}

fn minutes(span: Duration) -> f64 {
    match span.num_microseconds() {
        Some(us) => us as f64 / 60_000_000.0,
        None => span.num_seconds() as f64 / 60.0,
    }
}

impl QueryWindow {
    pub fn for_flight(flight: &FlightFix, config: &QueryConfig) -> Self {
        match flight.kind {
            DatasetKind::Wingtra => Self::wingtra(&flight.fix, config.wingtra_buffer()),
            DatasetKind::ZenmuseL2 | DatasetKind::DjiMrk => {
                Self::dji(&flight.fix, config.dji_buffer())
            }
        }
    }

    /// Pad both ends, then round(minutes + 1) with ties to even
    pub fn wingtra(fix: &ExtractedFix, buffer: Duration) -> Self {
        let start = fix.start_time - buffer;
        let end = fix.end_time + buffer;
        Self {
            start,
            duration_minutes: (minutes(end - start) + 1.0).round_ties_even() as i64,
        }
    }

    /// ceil(minutes + 2 * buffer), starting one buffer early
    pub fn dji(fix: &ExtractedFix, buffer: Duration) -> Self {
        let padded = minutes(fix.span()) + 2.0 * minutes(buffer);
        Self {
            start: fix.start_time - buffer,
            duration_minutes: padded.ceil() as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fix(start: DateTime<Utc>, end: DateTime<Utc>) -> ExtractedFix {
        ExtractedFix::new(52.0, 13.0, 100.0, start, end).unwrap()
    }

    #[test]
    fn test_wingtra_window() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        let window = QueryWindow::wingtra(
            &fix(start, start + Duration::minutes(10)),
            Duration::minutes(5),
        );
        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 5, 1, 8, 25, 0).unwrap());
        // 10 + 2 * 5 + 1
        assert_eq!(window.duration_minutes, 21);
    }

    #[test]
    fn test_wingtra_rounds_partial_minutes() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        let short = QueryWindow::wingtra(
            &fix(start, start + Duration::seconds(10 * 60 + 20)),
            Duration::minutes(5),
        );
        assert_eq!(short.duration_minutes, 21);
        let long = QueryWindow::wingtra(
            &fix(start, start + Duration::seconds(10 * 60 + 40)),
            Duration::minutes(5),
        );
        assert_eq!(long.duration_minutes, 22);
    }

    #[test]
    fn test_wingtra_half_minute_rounds_to_even() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        // 1.5 + 2 * 5 + 1 = 12.5
        let tie = QueryWindow::wingtra(
            &fix(start, start + Duration::seconds(90)),
            Duration::minutes(5),
        );
        assert_eq!(tie.duration_minutes, 12);
        // 2.5 + 2 * 5 + 1 = 13.5
        let odd = QueryWindow::wingtra(
            &fix(start, start + Duration::seconds(150)),
            Duration::minutes(5),
        );
        assert_eq!(odd.duration_minutes, 14);
    }

    #[test]
    fn test_dji_window_rounds_up() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 8, 29, 42).unwrap();
        let exact = QueryWindow::dji(&fix(start, start + Duration::minutes(15)), Duration::minutes(10));
        assert_eq!(exact.duration_minutes, 35);
        assert_eq!(exact.start, Utc.with_ymd_and_hms(2024, 5, 1, 8, 19, 42).unwrap());

        let partial = QueryWindow::dji(
            &fix(start, start + Duration::seconds(15 * 60 + 1)),
            Duration::minutes(10),
        );
        assert_eq!(partial.duration_minutes, 36);
    }

    #[test]
    fn test_zero_length_dji_flight() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let window = QueryWindow::dji(&fix(start, start), Duration::minutes(10));
        assert_eq!(window.duration_minutes, 20);
    }
}
