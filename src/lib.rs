//! # sheetstream
//!
//! Streaming XLSX export for arbitrary tabular sources.
//!
//! ## Features
//!
//! - **Constant memory**: rows stream through a reusable record pool and
//!   out to disk as they are produced - row count never affects footprint
//! - **Any source**: one pull-based [`RowSource`] contract covers
//!   in-memory data, database cursors and file scans
//! - **Valid OOXML**: cell text is externalized into a shared-strings
//!   table and the package carries every part a spreadsheet application
//!   expects
//! - **Optional dedup**: repeated cell text can share one table slot
//!   when the dataset warrants the memory trade
//!
//! ## Quick Start
//!
//! ```no_run
//! use sheetstream::IterSource;
//!
//! # fn main() -> sheetstream::Result<()> {
//! let rows = vec![
//!     vec!["Name".to_string(), "City".to_string()],
//!     vec!["Alice".to_string(), "Oslo".to_string()],
//!     vec!["Bob".to_string(), "Lima".to_string()],
//! ];
//!
//! sheetstream::export("people.xlsx", &mut IterSource::new(rows.into_iter()))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom sources
//!
//! Anything that can hand out one row at a time is a source:
//!
//! ```
//! use sheetstream::RowSource;
//!
//! struct Countdown(u32);
//!
//! impl RowSource for Countdown {
//!     fn next_row(&mut self) -> Option<Vec<String>> {
//!         if self.0 == 0 {
//!             return None;
//!         }
//!         self.0 -= 1;
//!         Some(vec![self.0.to_string()])
//!     }
//! }
//! ```

pub mod column;
pub mod error;
pub mod package;
pub mod row_pool;
pub mod sanitize;
pub mod shared_strings;
pub mod sheet_writer;
pub mod source;

mod parts;

pub use column::column_letter;
pub use error::{ExportError, Result};
pub use package::{export, Exporter};
pub use row_pool::{Cell, RowPool, RowRecord};
pub use sanitize::strip_control_chars;
pub use shared_strings::SharedStringEmitter;
pub use sheet_writer::SheetWriter;
pub use source::{IterSource, RowSource};
