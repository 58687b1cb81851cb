//! Stdin input utilities.

use std::io::{self, IsTerminal, Read};

/// Read from stdin if piped (not a terminal).
///
/// Returns the content read from stdin, or an empty string if stdin is a terminal.
pub fn read_stdin() -> String {
    if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        if io::stdin().read_to_string(&mut buffer).is_ok() {
            return buffer;
        }
    }
    String::new()
}

/// Fold text into a single entry body.
///
/// Entries are one line each, so line breaks become spaces and blank lines
/// are dropped.
pub fn single_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
