//! Warning types for lines dropped during JSONL parsing.
//!
//! A beads export is only as good as its worst line, and hand edits or
//! interrupted writes regularly leave one behind. Rather than rejecting the
//! whole file, readers skip the offending line and record a [`Warning`] in a
//! [`WarningCollector`], which the caller drains once parsing is done.
//!
//! # Examples
//!
//! ```
//! use beadboard_jsonl::warning::{Warning, WarningCollector};
//!
//! let collector = WarningCollector::new();
//!
//! collector.add(Warning::MalformedJson {
//!     line_number: 5,
//!     error: "unexpected end of input".to_string(),
//! });
//!
//! collector.add(Warning::SkippedLine {
//!     line_number: 10,
//!     reason: "unknown variant `someday`".to_string(),
//! });
//!
//! let warnings = collector.into_warnings();
//! assert_eq!(warnings.len(), 2);
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A line that was dropped while parsing JSONL input.
///
/// Each variant carries the 1-based physical line number so the report can
/// point straight at the offending line in the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The line is not syntactically valid JSON.
    MalformedJson {
        /// The 1-based line number where the error occurred.
        line_number: usize,
        /// A description of the JSON parsing error.
        error: String,
    },

    /// The line is valid JSON but does not describe a record.
    ///
    /// Typical causes are a missing required field or an enum value the
    /// record type does not know.
    SkippedLine {
        /// The 1-based line number that was skipped.
        line_number: usize,
        /// The reason the line was skipped.
        reason: String,
    },
}

impl Warning {
    /// Builds the warning for a line that `serde_json` rejected.
    ///
    /// Syntax and end-of-input errors become [`Warning::MalformedJson`];
    /// well-formed JSON of the wrong shape becomes [`Warning::SkippedLine`].
    #[must_use]
    pub fn from_json_error(line_number: usize, error: &serde_json::Error) -> Self {
        if error.is_data() {
            Self::SkippedLine {
                line_number,
                reason: format!("does not match record schema: {error}"),
            }
        } else {
            Self::MalformedJson {
                line_number,
                error: error.to_string(),
            }
        }
    }

    /// Returns the line number associated with this warning.
    ///
    /// ```
    /// use beadboard_jsonl::warning::Warning;
    ///
    /// let warning = Warning::MalformedJson {
    ///     line_number: 42,
    ///     error: "unexpected token".to_string(),
    /// };
    /// assert_eq!(warning.line_number(), 42);
    /// ```
    #[must_use]
    pub fn line_number(&self) -> usize {
        match self {
            Self::MalformedJson { line_number, .. } | Self::SkippedLine { line_number, .. } => {
                *line_number
            }
        }
    }

    /// Returns a human-readable description of the warning.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::MalformedJson { line_number, error } => {
                format!("line {line_number}: malformed JSON: {error}")
            }
            Self::SkippedLine {
                line_number,
                reason,
            } => {
                format!("line {line_number}: skipped: {reason}")
            }
        }
    }

    /// Returns a static string identifying the warning kind.
    ///
    /// ```
    /// use beadboard_jsonl::warning::Warning;
    ///
    /// let warning = Warning::SkippedLine {
    ///     line_number: 10,
    ///     reason: "missing field `title`".to_string(),
    /// };
    /// assert_eq!(warning.kind(), "skipped_line");
    /// ```
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedJson { .. } => "malformed_json",
            Self::SkippedLine { .. } => "skipped_line",
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::error::Error for Warning {}

/// A shareable accumulator for warnings.
///
/// Clones share the same underlying list, so a collector can be handed to a
/// reader and inspected afterwards by the caller.
///
/// A poisoned lock is recovered rather than propagated: the guarded value is
/// a plain `Vec` that cannot be left half-updated by a panicking push.
#[derive(Debug, Clone, Default)]
pub struct WarningCollector {
    warnings: Arc<Mutex<Vec<Warning>>>,
}

impl WarningCollector {
    /// Creates a new empty `WarningCollector`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Warning>> {
        self.warnings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a warning to the collector.
    pub fn add(&self, warning: Warning) {
        self.lock().push(warning);
    }

    /// Returns the number of warnings collected.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if no warnings have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a copy of all collected warnings without consuming the collector.
    #[must_use]
    pub fn warnings(&self) -> Vec<Warning> {
        self.lock().clone()
    }

    /// Consumes the collector and returns all collected warnings.
    ///
    /// If this is the last handle to the underlying list the warnings are
    /// moved out, otherwise they are cloned.
    #[must_use]
    pub fn into_warnings(self) -> Vec<Warning> {
        match Arc::try_unwrap(self.warnings) {
            Ok(mutex) => mutex.into_inner().unwrap_or_else(PoisonError::into_inner),
            Err(shared) => shared
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        }
    }
}
