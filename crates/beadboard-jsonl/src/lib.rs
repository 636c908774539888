//! Resilient JSON Lines parsing.
//!
//! Issue exports are written one JSON object per line. A single corrupt line
//! must not cost the rest of the file, so every reader in this crate parses
//! lines independently and reports the ones it drops as [`Warning`]s instead
//! of failing.
//!
//! ```
//! use beadboard_jsonl::parse_jsonl_resilient;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Record {
//!     id: u32,
//! }
//!
//! let (records, warnings) = parse_jsonl_resilient::<Record>("{\"id\":1}\nnot json\n\n{\"id\":2}\n");
//! assert_eq!(records.len(), 2);
//! assert_eq!(warnings.len(), 1);
//! assert_eq!(warnings[0].line_number(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod reader;
pub mod warning;

pub use error::{Error, Result};
pub use reader::{JsonlReader, parse_jsonl_resilient, read_jsonl_resilient};
pub use warning::{Warning, WarningCollector};
