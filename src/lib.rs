//! doctrim: filter compliance-status tables in .docx reports
//!
//! This library rewrites the compliance tables of a Word report: rows
//! whose status column reads "符合" or "不适用" (configurable) are dropped,
//! surviving rows are re-rendered with their original cell styling and a
//! uniform font, and repeated category labels in the first column are
//! merged into vertical spans.

pub mod config;
pub mod document;

// Re-export commonly used types
pub use config::FilterConfig;
pub use document::{DocError, FilterReport, TableSummary, clean_report};
