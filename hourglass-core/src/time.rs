//! Time utilities: the calendar date a report is stamped with.

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use std::fmt::Write;

pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimeError {
    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("invalid date format: {0}")]
    InvalidFormat(String),
}

/// Today's date in an IANA tz like "America/Chicago".
pub fn today_in(tz: &str) -> Result<NaiveDate, TimeError> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| TimeError::InvalidTimezone(tz.to_string()))?;
    Ok(Utc::now().with_timezone(&tz).date_naive())
}

/// Format a date with a strftime pattern, rejecting patterns chrono cannot render.
pub fn format_date(date: NaiveDate, pattern: &str) -> Result<String, TimeError> {
    let mut out = String::new();
    write!(out, "{}", date.format(pattern))
        .map_err(|_| TimeError::InvalidFormat(pattern.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_us_style_by_default() {
        let d = NaiveDate::from_ymd_opt(2026, 2, 5).unwrap();
        assert_eq!(format_date(d, DEFAULT_DATE_FORMAT).unwrap(), "2/5/2026");
        assert_eq!(format_date(d, "%Y-%m-%d").unwrap(), "2026-02-05");
    }

    #[test]
    fn rejects_unknown_timezone() {
        assert!(today_in("Mars/Olympus").is_err());
        assert!(today_in("America/Chicago").is_ok());
    }

    #[test]
    fn rejects_broken_pattern() {
        let d = NaiveDate::from_ymd_opt(2026, 2, 5).unwrap();
        assert!(format_date(d, "%Q").is_err());
    }
}
