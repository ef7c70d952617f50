//! # Taskpilot Import
//!
//! Tabular-import adapter: turns externally hosted CSV/TSV data (typically
//! a published Google Sheet) into [`Task`] records. Format detection and
//! parsing only; no scheduling logic lives here.

pub mod sheet;

pub use sheet::{fetch_tasks, normalize_sheet_url, parse_tabular, Delimiter, ImportError};

// Re-export the record shape this adapter produces.
pub use taskpilot_core::Task;
