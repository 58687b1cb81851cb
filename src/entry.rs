//! Entry lines and their marks.

use std::fmt;

use serde::Serialize;

/// One-character mark that opens every entry line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    /// `*` plain note
    Note,
    /// `-` pending task
    Task,
    /// `x` completed task
    Done,
}

impl Mark {
    pub const ALL: [Mark; 3] = [Mark::Note, Mark::Task, Mark::Done];

    pub fn symbol(self) -> char {
        match self {
            Mark::Note => '*',
            Mark::Task => '-',
            Mark::Done => 'x',
        }
    }

    /// Mark plus its trailing space, the text an entry line starts with.
    pub fn prefix(self) -> &'static str {
        match self {
            Mark::Note => "* ",
            Mark::Task => "- ",
            Mark::Done => "x ",
        }
    }

    /// Split a line into its mark and body, if it is an entry line.
    pub fn split_line(line: &str) -> Option<(Mark, &str)> {
        Mark::ALL
            .into_iter()
            .find_map(|mark| line.strip_prefix(mark.prefix()).map(|body| (mark, body)))
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A new line to be written into the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub mark: Mark,
    pub body: String,
}

impl Entry {
    pub fn new(mark: Mark, body: impl Into<String>) -> Self {
        Self {
            mark,
            body: body.into(),
        }
    }

    /// The line as it appears in the file, without newline.
    pub fn to_line(&self) -> String {
        format!("{}{}", self.mark.prefix(), self.body)
    }
}

#[cfg(test)]
impl Entry {
    pub fn note(body: impl Into<String>) -> Self {
        Self::new(Mark::Note, body)
    }

    pub fn task(body: impl Into<String>) -> Self {
        Self::new(Mark::Task, body)
    }
}
