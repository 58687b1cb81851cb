//! Crate-wide error type.
//!
//! Every operation returns `Result<_, Error>`; only `main` decides whether
//! an error ends the process and with which exit code.

use std::io;
use std::num::ParseIntError;
use std::path::Path;

use thiserror::Error;

use crate::header::HeaderError;

#[derive(Debug, Error)]
pub enum Error {
    /// Creating, opening, reading, writing or renaming a file failed.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// The first line of a non-empty log is not a section header.
    #[error("malformed log: first line {line:?} is not a section header ({source})")]
    MalformedHeader {
        line: String,
        #[source]
        source: HeaderError,
    },

    /// User-supplied task index is not a non-negative integer.
    #[error("invalid task index {input:?}: {source}")]
    InvalidTaskIndex {
        input: String,
        #[source]
        source: ParseIntError,
    },

    /// Date override is not a `YYYYMMDD` calendar date.
    #[error("invalid date {input:?}: expected YYYYMMDD")]
    InvalidDate { input: String },

    /// Missing or unusable command arguments.
    #[error("{0}")]
    Usage(String),

    #[error("{0}")]
    Serialize(String),

    /// `validate` found error-level issues.
    #[error("validation failed: {0} error(s)")]
    Invalid(usize),
}

impl Error {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }

    /// Shorthand for I/O failures on a specific path.
    pub fn io_at(action: &str, path: &Path, source: io::Error) -> Self {
        Error::io(format!("{} {}", action, path.display()), source)
    }

    /// Process exit code for this error.
    ///
    /// Bad task indices and other usage errors are 2; everything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidTaskIndex { .. } | Error::Usage(_) => 2,
            _ => 1,
        }
    }
}
