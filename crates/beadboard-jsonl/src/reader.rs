//! JSONL reading operations.
//!
//! This module provides async, line-at-a-time reading of JSONL files with
//! line number tracking, plus a synchronous entry point for text that is
//! already in memory (for example content fetched over HTTP).

use crate::error::{Error, Result};
use crate::warning::{Warning, WarningCollector};
use serde::de::DeserializeOwned;
use std::io;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::warn;

/// Async reader for JSONL (JSON Lines) data.
///
/// `JsonlReader` wraps an async reader in a [`BufReader`] and tracks the
/// current line so dropped lines can be reported precisely.
///
/// # Examples
///
/// ```no_run
/// use beadboard_jsonl::{JsonlReader, WarningCollector};
/// use tokio::fs::File;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let file = File::open("issues.jsonl").await?;
/// let mut reader = JsonlReader::new(file);
/// let warnings = WarningCollector::new();
/// let records: Vec<serde_json::Value> = reader.read_resilient(&warnings).await?;
/// # Ok(())
/// # }
/// ```
pub struct JsonlReader<R> {
    /// Buffered reader wrapping the underlying async reader.
    reader: BufReader<R>,
    /// Current line number (1-based, 0 before any lines are read).
    line_number: usize,
}

impl<R: AsyncRead + Unpin> JsonlReader<R> {
    /// Creates a new `JsonlReader` wrapping the given async reader.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
        }
    }

    /// Creates a new `JsonlReader` with a custom buffer capacity.
    #[must_use]
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader: BufReader::with_capacity(capacity, reader),
            line_number: 0,
        }
    }

    /// Returns the current line number.
    ///
    /// Returns 0 before any lines have been read, otherwise the 1-based number
    /// of the last line read.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Reads every remaining line, keeping the ones that deserialize as `T`.
    ///
    /// Blank (whitespace-only) lines are skipped silently. Every other line
    /// that fails to deserialize is logged, recorded in `warnings`, and
    /// dropped; reading continues with the next line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] if the input is not valid UTF-8 and
    /// [`Error::Io`] for any other read failure. Neither is a per-line
    /// condition, so the records read so far are discarded.
    pub async fn read_resilient<T: DeserializeOwned>(
        &mut self,
        warnings: &WarningCollector,
    ) -> Result<Vec<T>> {
        let mut records = Vec::new();
        let mut line = String::new();

        loop {
            line.clear();
            let read = match self.reader.read_line(&mut line).await {
                Ok(read) => read,
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    return Err(Error::InvalidFormat(format!(
                        "line {} is not valid UTF-8",
                        self.line_number + 1
                    )));
                }
                Err(e) => return Err(e.into()),
            };
            if read == 0 {
                break;
            }
            self.line_number += 1;

            if let Some(record) = parse_line(&line, self.line_number, warnings) {
                records.push(record);
            }
        }

        Ok(records)
    }

    /// Consumes the reader, returning the underlying buffered reader.
    #[must_use]
    pub fn into_inner(self) -> BufReader<R> {
        self.reader
    }
}

/// Parses one physical line. `None` means the line was blank or dropped.
fn parse_line<T: DeserializeOwned>(
    line: &str,
    line_number: usize,
    warnings: &WarningCollector,
) -> Option<T> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str(trimmed) {
        Ok(record) => Some(record),
        Err(e) => {
            let warning = Warning::from_json_error(line_number, &e);
            warn!(line = line_number, kind = warning.kind(), error = %e, "Dropping JSONL line");
            warnings.add(warning);
            None
        }
    }
}

/// Reads a JSONL file, skipping lines that fail to parse.
///
/// Returns the parsed records together with a warning for every dropped line.
///
/// # Errors
///
/// Fails only if the file cannot be opened or read as UTF-8 text.
pub async fn read_jsonl_resilient<T: DeserializeOwned>(
    path: impl AsRef<Path>,
) -> Result<(Vec<T>, Vec<Warning>)> {
    let file = File::open(path.as_ref()).await?;
    let mut reader = JsonlReader::new(file);
    let warnings = WarningCollector::new();
    let records = reader.read_resilient(&warnings).await?;
    Ok((records, warnings.into_warnings()))
}

/// Parses JSONL text that is already in memory, skipping lines that fail to parse.
///
/// Applies exactly the same per-line rule as [`read_jsonl_resilient`].
#[must_use]
pub fn parse_jsonl_resilient<T: DeserializeOwned>(content: &str) -> (Vec<T>, Vec<Warning>) {
    let warnings = WarningCollector::new();
    let records = content
        .lines()
        .enumerate()
        .filter_map(|(index, line)| parse_line(line, index + 1, &warnings))
        .collect();
    (records, warnings.into_warnings())
}
