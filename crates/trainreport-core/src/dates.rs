//! Date handling for roster records.
//!
//! Completion and expiration dates arrive as `M/D/YYYY` strings (zero padding
//! optional). The configured check date uses ISO `YYYY-MM-DD`.

use chrono::NaiveDate;

use crate::error::{ConfigError, DateParseError};

/// Format used when rendering a parsed record date back to text
pub const RECORD_DATE_FORMAT: &str = "%m/%d/%Y";

/// Earliest year a roster date may carry
const MIN_RECORD_YEAR: i32 = 1;

/// Format of the configured check date
pub const CHECK_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a roster date in strict `month/day/year` form.
///
/// Month and day take one or two digits, the year exactly four. Anything
/// else, including surrounding whitespace, is `Malformed`. A well-shaped
/// string naming a day that does not exist (`13/45/2024`, `2/30/2023`) is
/// `OutOfRange`.
pub fn parse_record_date(raw: &str) -> Result<NaiveDate, DateParseError> {
    if raw.is_empty() {
        return Err(DateParseError::Empty);
    }

    let malformed = || DateParseError::Malformed(raw.to_string());

    let mut parts = raw.split('/');
    let (Some(month), Some(day), Some(year), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(malformed());
    };

    if !is_digits(month, 1, 2) || !is_digits(day, 1, 2) || !is_digits(year, 4, 4) {
        return Err(malformed());
    }

    let month: u32 = month.parse().map_err(|_| malformed())?;
    let day: u32 = day.parse().map_err(|_| malformed())?;
    let year: i32 = year.parse().map_err(|_| malformed())?;

    // Four digits still allow 0000, which is not a usable calendar year
    if year < MIN_RECORD_YEAR {
        return Err(DateParseError::OutOfRange(raw.to_string()));
    }

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| DateParseError::OutOfRange(raw.to_string()))
}

/// Parse the `YYYY-MM-DD` check date used by the expiration report
pub fn parse_check_date(raw: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(raw.trim(), CHECK_DATE_FORMAT).map_err(|_| ConfigError::CheckDate {
        value: raw.to_string(),
    })
}

/// Render a date the way the roster writes it, zero padded
pub fn format_record_date(date: NaiveDate) -> String {
    date.format(RECORD_DATE_FORMAT).to_string()
}

fn is_digits(s: &str, min_len: usize, max_len: usize) -> bool {
    (min_len..=max_len).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}
