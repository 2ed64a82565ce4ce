//! Document filtering module
//!
//! This module owns the whole .docx transform: package I/O, markup
//! scanning, the per-table row filter, style capture/replay and the
//! vertical-merge planner.

pub(crate) mod error;
pub(crate) mod filter;
pub(crate) mod io;
pub(crate) mod merge;
pub mod models;
pub(crate) mod scan;
pub(crate) mod style;

pub use error::DocError;
pub use filter::clean_report;
pub use models::{FilterReport, TableSummary};
