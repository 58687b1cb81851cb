//! The log file on disk.
//!
//! Reads stream through a `BufReader`; writes go to a temp file beside the
//! log and are renamed over it, so readers only ever see a complete log.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::{info, warn};
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::entry::{Entry, Mark};
use crate::error::Error;
use crate::header;
use crate::lines;
use crate::rewrite::{self, Placement};

/// Name prefix of replacement files written beside the log.
const TEMP_PREFIX: &str = ".BULLETLOG.";

/// An entry line as seen by the listing commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggedEntry {
    /// Date of the enclosing section, if the line sits under a header.
    pub date: Option<String>,
    pub mark: Mark,
    pub body: String,
    /// Ordinal among pending tasks; only set for pending tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// 1-based line number in the file.
    pub line: usize,
}

/// Handle to the log file at a resolved path.
#[derive(Debug, Clone)]
pub struct LogFile {
    path: PathBuf,
}

impl LogFile {
    /// Open the log, creating it empty if it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| Error::io_at("creating", &path, e))?;
        Ok(Self { path })
    }

    /// Buffered reader over the current content.
    pub fn reader(&self) -> Result<BufReader<File>, Error> {
        let file = File::open(&self.path).map_err(|e| Error::io_at("opening", &self.path, e))?;
        Ok(BufReader::new(file))
    }

    /// Directory the temp file must live in so the rename stays on one
    /// filesystem.
    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }

    fn temp_file(&self) -> Result<NamedTempFile, Error> {
        tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempfile_in(self.dir())
            .map_err(|e| Error::io_at("creating temp file in", self.dir(), e))
    }

    /// Swap a fully written temp file in for the log.
    fn replace_with(&self, writer: BufWriter<NamedTempFile>) -> Result<(), Error> {
        let tmp = writer
            .into_inner()
            .map_err(|e| Error::io_at("flushing replacement for", &self.path, e.into_error()))?;
        // Temp files are created 0600; keep the log's own mode
        if let Ok(meta) = fs::metadata(&self.path) {
            tmp.as_file()
                .set_permissions(meta.permissions())
                .map_err(|e| Error::io_at("setting permissions on replacement for", &self.path, e))?;
        }
        tmp.as_file()
            .sync_all()
            .map_err(|e| Error::io_at("syncing replacement for", &self.path, e))?;
        tmp.persist(&self.path)
            .map_err(|e| Error::io_at("replacing", &self.path, e.error))?;
        Ok(())
    }

    /// Add `entry` to the section for `date`, creating the section if needed.
    pub fn add_entry(&self, date: NaiveDate, entry: &Entry) -> Result<Placement, Error> {
        let reader = self.reader()?;
        let mut writer = BufWriter::new(self.temp_file()?);

        let placement = rewrite::insert_entry(reader, &mut writer, date, entry)?;
        self.replace_with(writer)?;

        info!(
            "added {:?} entry to {} ({:?})",
            entry.mark,
            self.path.display(),
            placement
        );
        Ok(placement)
    }

    /// Mark the `index`-th pending task as completed.
    ///
    /// Returns the task body, or `None` (leaving the file untouched) when
    /// there is no such task.
    pub fn complete_task(&self, index: usize) -> Result<Option<String>, Error> {
        let reader = self.reader()?;
        let mut writer = BufWriter::new(self.temp_file()?);

        let completed = rewrite::complete_task(reader, &mut writer, index)?;
        match &completed {
            Some(body) => {
                self.replace_with(writer)?;
                info!("completed task {} ({}) in {}", index, body, self.path.display());
            }
            None => {
                // Dropping the writer removes the temp file
                warn!("no pending task at index {}; log unchanged", index);
            }
        }
        Ok(completed)
    }

    /// Every entry line in file order, with section dates and task indices.
    pub fn entries(&self) -> Result<Vec<LoggedEntry>, Error> {
        scan_entries(self.reader()?)
    }

    /// Note lines only.
    pub fn notes(&self) -> Result<Vec<LoggedEntry>, Error> {
        Ok(self
            .entries()?
            .into_iter()
            .filter(|e| e.mark == Mark::Note)
            .collect())
    }

    /// Pending tasks, each carrying the index `complete` expects.
    pub fn pending_tasks(&self) -> Result<Vec<LoggedEntry>, Error> {
        Ok(self
            .entries()?
            .into_iter()
            .filter(|e| e.mark == Mark::Task)
            .collect())
    }

    #[cfg(test)]
    pub fn read_to_string(&self) -> Result<String, Error> {
        fs::read_to_string(&self.path).map_err(|e| Error::io_at("reading", &self.path, e))
    }
}

/// Collect entry lines from a log stream.
///
/// Lines that are not valid UTF-8 are listed with replacement characters,
/// so task indices stay in step with [`rewrite::complete_task`].
pub fn scan_entries<R: BufRead>(mut reader: R) -> Result<Vec<LoggedEntry>, Error> {
    let mut entries = Vec::new();
    let mut section = None;
    let mut next_task = 0;
    let mut buf = Vec::new();
    let mut n = 0;

    while lines::read_line(&mut reader, &mut buf)? {
        n += 1;

        if let Some(date) = lines::header_date(&buf) {
            section = Some(header::format_date(date));
            continue;
        }

        let text = lines::lossy(&buf);
        if let Some((mark, body)) = Mark::split_line(&text) {
            let index = (mark == Mark::Task).then(|| {
                next_task += 1;
                next_task - 1
            });
            entries.push(LoggedEntry {
                date: section.clone(),
                mark,
                body: body.to_string(),
                index,
                line: n,
            });
        }
    }

    Ok(entries)
}
