//! Section headers of the form `## YYYYMMDD`.

use chrono::NaiveDate;
use thiserror::Error;

/// Two-character marker every section header starts with.
pub const HEADER_MARKER: &str = "##";

/// Date layout used in headers and in the date override.
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Why a line is not a section header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("header must start with ##")]
    MissingPrefix,

    #[error("header must have exactly two fields, found {0}")]
    FieldCount(usize),

    #[error("invalid header date {0:?}: expected YYYYMMDD")]
    InvalidDate(String),
}

/// Parse a `YYYYMMDD` token into a calendar day.
///
/// chrono's `%Y` accepts signs and longer years, so the token shape is
/// checked first.
pub fn parse_date(token: &str) -> Option<NaiveDate> {
    if token.len() != 8 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(token, DATE_FORMAT).ok()
}

/// Format a day the way headers and overrides spell it.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a line as a section header, returning its date.
///
/// A trailing newline is tolerated. Most lines of a log are entries, so
/// callers scanning past the first line treat any error as "not a header".
pub fn parse_header(line: &str) -> Result<NaiveDate, HeaderError> {
    if !line.starts_with(HEADER_MARKER) {
        return Err(HeaderError::MissingPrefix);
    }

    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 2 {
        return Err(HeaderError::FieldCount(fields.len()));
    }

    parse_date(fields[1]).ok_or_else(|| HeaderError::InvalidDate(fields[1].to_string()))
}

/// Render the header line (without newline) for a section date.
pub fn format_header(date: NaiveDate) -> String {
    format!("{} {}", HEADER_MARKER, format_date(date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_header_valid() {
        assert_eq!(parse_header("## 20240101"), Ok(day(2024, 1, 1)));
        assert_eq!(parse_header("## 20231231\n"), Ok(day(2023, 12, 31)));
        // Extra whitespace between fields still splits into two fields
        assert_eq!(parse_header("##   20240229  "), Ok(day(2024, 2, 29)));
    }

    #[test]
    fn test_parse_header_round_trip() {
        for date in [day(2024, 1, 1), day(1999, 12, 31), day(2024, 2, 29)] {
            assert_eq!(parse_header(&format_header(date)), Ok(date));
        }
    }

    #[test]
    fn test_parse_header_missing_prefix() {
        assert_eq!(parse_header("* note"), Err(HeaderError::MissingPrefix));
        assert_eq!(parse_header(""), Err(HeaderError::MissingPrefix));
        assert_eq!(parse_header("# 20240101"), Err(HeaderError::MissingPrefix));
        assert_eq!(parse_header(" ## 20240101"), Err(HeaderError::MissingPrefix));
    }

    #[test]
    fn test_parse_header_field_count() {
        assert_eq!(parse_header("##"), Err(HeaderError::FieldCount(1)));
        assert_eq!(parse_header("##20240101"), Err(HeaderError::FieldCount(1)));
        assert_eq!(
            parse_header("## 20240101 extra"),
            Err(HeaderError::FieldCount(3))
        );
    }

    #[test]
    fn test_parse_header_invalid_date() {
        assert_eq!(
            parse_header("## 20241301"),
            Err(HeaderError::InvalidDate("20241301".to_string()))
        );
        assert_eq!(
            parse_header("## 20230229"),
            Err(HeaderError::InvalidDate("20230229".to_string()))
        );
        assert_eq!(
            parse_header("## 2024-01-01"),
            Err(HeaderError::InvalidDate("2024-01-01".to_string()))
        );
        assert_eq!(
            parse_header("## Notes"),
            Err(HeaderError::InvalidDate("Notes".to_string()))
        );
    }

    #[test]
    fn test_parse_date_requires_eight_digits() {
        assert_eq!(parse_date("20240101"), Some(day(2024, 1, 1)));
        assert_eq!(parse_date("2024011"), None);
        assert_eq!(parse_date("+2024010"), None);
        assert_eq!(parse_date("202401011"), None);
    }
}
