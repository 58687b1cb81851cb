//! Raw log lines.
//!
//! The log is read as bytes, one line at a time with its terminator kept,
//! so rewrites can copy lines back exactly as they were. Text is only
//! decoded where a line has to be inspected.

use std::borrow::Cow;
use std::io::BufRead;

use chrono::NaiveDate;

use crate::error::Error;
use crate::header;

/// Read the next line, terminator included, into `buf`.
///
/// Returns `false` at end of input.
pub fn read_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> Result<bool, Error> {
    buf.clear();
    let n = reader
        .read_until(b'\n', buf)
        .map_err(|e| Error::io("reading log", e))?;
    Ok(n > 0)
}

/// The line without its `\n` or `\r\n` terminator.
pub fn content(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Line ending to use for lines added next to `line`.
pub fn ending(line: &[u8]) -> &'static [u8] {
    if line.ends_with(b"\r\n") {
        b"\r\n"
    } else {
        b"\n"
    }
}

/// Line text for display; invalid UTF-8 is replaced.
pub fn lossy(line: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(content(line))
}

/// Section date, if the line is a valid header. Non-UTF-8 lines never are.
pub fn header_date(line: &[u8]) -> Option<NaiveDate> {
    std::str::from_utf8(content(line))
        .ok()
        .and_then(|text| header::parse_header(text).ok())
}

pub fn is_blank(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}
