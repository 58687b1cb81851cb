//! Streaming rewrites of the log.
//!
//! Both mutating operations read the current log line by line and write a
//! full replacement. Lines from the input are copied back byte for byte,
//! line endings and invalid UTF-8 included; only added lines are new.
//! Placing a new entry is a small state machine driven by [`step`] and
//! closed by [`finish`]; neither touches I/O, so the placement rules are
//! testable on plain strings.

use std::io::{BufRead, Write};

use chrono::NaiveDate;
use log::debug;

use crate::entry::{Entry, Mark};
use crate::error::Error;
use crate::header::{self, format_header};
use crate::lines;

/// Where the scan stands relative to the target date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertState {
    /// Every section seen so far is newer than the target date.
    BeforeMatch,
    /// Inside the section whose date equals the target. Blank lines are
    /// held back so the entry lands after the section's last entry.
    InTarget {
        held: Vec<Vec<u8>>,
        has_entries: bool,
    },
    /// The entry has been emitted; the rest is copied through.
    PassThrough,
}

/// One line of rewrite output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emit {
    /// Input line, terminator included, written back unchanged.
    Copy(Vec<u8>),
    /// Line added by the rewrite; the log's line ending is appended.
    Added(String),
}

/// How an entry ended up in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The log was empty; it now holds one section.
    NewLog,
    /// A section for the target date was created.
    NewSection,
    /// The entry was appended to the existing section for the target date.
    ExistingSection,
}

fn new_section(target: NaiveDate, entry: &str) -> Vec<Emit> {
    vec![
        Emit::Added(format_header(target)),
        Emit::Added(String::new()),
        Emit::Added(entry.to_string()),
        Emit::Added(String::new()),
    ]
}

fn close_section(held: Vec<Vec<u8>>, has_entries: bool, entry: &str) -> Vec<Emit> {
    let mut out = Vec::with_capacity(held.len() + 3);
    let mut held = held.into_iter().map(Emit::Copy);

    // An empty section still gets the blank line under its header
    if !has_entries {
        out.push(held.next().unwrap_or(Emit::Added(String::new())));
    }
    out.push(Emit::Added(entry.to_string()));

    let rest: Vec<Emit> = held.collect();
    if rest.is_empty() {
        out.push(Emit::Added(String::new()));
    } else {
        out.extend(rest);
    }
    out
}

/// Advance the state machine by one input line.
///
/// `line` is the raw line with its terminator and `header` its parsed date
/// when it is a section header. Returns the lines to write (in order) and
/// the next state.
///
/// On the target date the entry goes after the section's last entry, ahead
/// of the blank lines that separate it from the next header, so it never
/// ends up detached below the section.
pub fn step(
    state: InsertState,
    line: &[u8],
    header: Option<NaiveDate>,
    target: NaiveDate,
    entry: &str,
) -> (Vec<Emit>, InsertState) {
    match (state, header) {
        (InsertState::BeforeMatch, Some(date)) if target > date => {
            let mut out = new_section(target, entry);
            out.push(Emit::Copy(line.to_vec()));
            (out, InsertState::PassThrough)
        }
        (InsertState::BeforeMatch, Some(date)) if target == date => (
            vec![Emit::Copy(line.to_vec())],
            InsertState::InTarget {
                held: Vec::new(),
                has_entries: false,
            },
        ),
        (InsertState::InTarget { held, has_entries }, Some(_)) => {
            let mut out = close_section(held, has_entries, entry);
            out.push(Emit::Copy(line.to_vec()));
            (out, InsertState::PassThrough)
        }
        (InsertState::InTarget { mut held, has_entries }, None) => {
            held.push(line.to_vec());
            if lines::is_blank(line) {
                (Vec::new(), InsertState::InTarget { held, has_entries })
            } else {
                // Flush the held blanks together with this line
                (
                    held.into_iter().map(Emit::Copy).collect(),
                    InsertState::InTarget {
                        held: Vec::new(),
                        has_entries: true,
                    },
                )
            }
        }
        (state, _) => (vec![Emit::Copy(line.to_vec())], state),
    }
}

/// Lines to write once the input is exhausted.
///
/// `ended_blank` tells whether the last copied line was blank, so a section
/// appended at the end stays separated from the one before it.
pub fn finish(state: InsertState, target: NaiveDate, entry: &str, ended_blank: bool) -> Vec<Emit> {
    match state {
        InsertState::BeforeMatch => {
            let mut out = Vec::with_capacity(5);
            if !ended_blank {
                out.push(Emit::Added(String::new()));
            }
            out.extend(new_section(target, entry));
            out
        }
        InsertState::InTarget { held, has_entries } => close_section(held, has_entries, entry),
        InsertState::PassThrough => Vec::new(),
    }
}

/// Writes rewrite output, terminating a copied final line only when more
/// output follows it.
struct LineWriter<'a, W: Write> {
    out: &'a mut W,
    eol: &'static [u8],
    unterminated: bool,
}

impl<'a, W: Write> LineWriter<'a, W> {
    fn new(out: &'a mut W, eol: &'static [u8]) -> Self {
        Self {
            out,
            eol,
            unterminated: false,
        }
    }

    fn put(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.out
            .write_all(bytes)
            .map_err(|e| Error::io("writing replacement log", e))
    }

    fn terminate(&mut self) -> Result<(), Error> {
        if self.unterminated {
            self.put(self.eol)?;
            self.unterminated = false;
        }
        Ok(())
    }

    fn copy(&mut self, line: &[u8]) -> Result<(), Error> {
        self.terminate()?;
        self.put(line)?;
        self.unterminated = !line.ends_with(b"\n");
        Ok(())
    }

    fn added(&mut self, text: &str) -> Result<(), Error> {
        self.terminate()?;
        self.put(text.as_bytes())?;
        self.put(self.eol)
    }

    fn write_all(&mut self, emits: &[Emit]) -> Result<(), Error> {
        for emit in emits {
            match emit {
                Emit::Copy(line) => self.copy(line)?,
                Emit::Added(text) => self.added(text)?,
            }
        }
        Ok(())
    }
}

/// Copy `reader` to `out`, placing `entry` in the section for `target`.
///
/// The first line of a non-empty log must be a header; anything else is
/// reported as [`Error::MalformedHeader`]. Later lines that fail to parse as
/// headers are ordinary entry lines. Added lines use the first line's
/// ending, so a CRLF log stays CRLF.
pub fn insert_entry<R: BufRead, W: Write>(
    mut reader: R,
    out: &mut W,
    target: NaiveDate,
    entry: &Entry,
) -> Result<Placement, Error> {
    let entry_line = entry.to_line();
    let mut buf = Vec::new();

    if !lines::read_line(&mut reader, &mut buf)? {
        debug!("log is empty, starting section {}", header::format_date(target));
        LineWriter::new(out, b"\n").write_all(&new_section(target, &entry_line))?;
        return Ok(Placement::NewLog);
    }

    let first = lines::lossy(&buf).into_owned();
    let first_date = header::parse_header(&first)
        .map_err(|source| Error::MalformedHeader { line: first, source })?;

    let mut out = LineWriter::new(out, lines::ending(&buf));
    let mut placement = None;
    let (emit, mut state) = step(
        InsertState::BeforeMatch,
        &buf,
        Some(first_date),
        target,
        &entry_line,
    );
    if state == InsertState::PassThrough {
        placement = Some(Placement::NewSection);
    }
    out.write_all(&emit)?;
    let mut ended_blank = false;

    while lines::read_line(&mut reader, &mut buf)? {
        if state == InsertState::PassThrough {
            out.copy(&buf)?;
            continue;
        }

        let date = lines::header_date(&buf);
        let was_in_target = matches!(state, InsertState::InTarget { .. });
        let (emit, next) = step(state, &buf, date, target, &entry_line);
        if next == InsertState::PassThrough {
            placement = Some(if was_in_target {
                Placement::ExistingSection
            } else {
                Placement::NewSection
            });
        }
        state = next;
        out.write_all(&emit)?;
        ended_blank = lines::is_blank(&buf);
    }

    let placement = placement.unwrap_or(match state {
        InsertState::InTarget { .. } => Placement::ExistingSection,
        _ => Placement::NewSection,
    });
    out.write_all(&finish(state, target, &entry_line, ended_blank))?;

    debug!("placed {:?} for {}", placement, header::format_date(target));
    Ok(placement)
}

/// Copy `reader` to `out`, completing the `index`-th pending task.
///
/// Indices count pending-task lines in file order, starting at 0, and are
/// recomputed on every call. Returns the body of the completed task, or
/// `None` when the log has fewer pending tasks than `index + 1`. Only the
/// mark of the completed line changes; every other byte is copied.
pub fn complete_task<R: BufRead, W: Write>(
    mut reader: R,
    out: &mut W,
    index: usize,
) -> Result<Option<String>, Error> {
    let task = Mark::Task.prefix().as_bytes();
    let done = Mark::Done.prefix().as_bytes();
    let mut buf = Vec::new();
    let mut seen = 0;
    let mut completed = None;

    while lines::read_line(&mut reader, &mut buf)? {
        let write = match buf.strip_prefix(task) {
            Some(rest) if seen == index => {
                seen += 1;
                completed = Some(lines::lossy(rest).into_owned());
                out.write_all(done).and_then(|()| out.write_all(rest))
            }
            Some(_) => {
                seen += 1;
                out.write_all(&buf)
            }
            None => out.write_all(&buf),
        };
        write.map_err(|e| Error::io("writing replacement log", e))?;
    }

    Ok(completed)
}
