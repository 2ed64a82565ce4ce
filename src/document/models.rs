//! Data structures shared across the filter pipeline.

use serde::{Deserialize, Serialize};

use super::style::StyleSnapshot;

/// One surviving data row: per-column text and the style snapshot captured
/// from the source cell at the same column index. Column 0's text is the
/// row's effective category, never the cell's own (possibly blank) text.
#[derive(Debug, Clone)]
pub(crate) struct KeptRow {
    pub(crate) texts: Vec<String>,
    pub(crate) styles: Vec<StyleSnapshot>,
}

/// Outcome for one table that had a status column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSummary {
    /// Zero-based position among the document's top-level tables.
    pub table_index: usize,
    /// Zero-based column holding the compliance status.
    pub status_column: usize,
    pub rows_scanned: usize,
    pub rows_kept: usize,
    pub rows_dropped: usize,
}

/// Summary of a whole run, printable as JSON via `--report-json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterReport {
    /// All top-level tables seen, compliance tables or not.
    pub tables_seen: usize,
    /// Tables without a status column, passed through unchanged.
    pub tables_skipped: usize,
    pub rows_kept: usize,
    pub rows_dropped: usize,
    pub tables: Vec<TableSummary>,
}

impl FilterReport {
    pub(crate) fn record(&mut self, summary: TableSummary) {
        self.rows_kept += summary.rows_kept;
        self.rows_dropped += summary.rows_dropped;
        self.tables.push(summary);
    }

    pub fn tables_filtered(&self) -> usize {
        self.tables.len()
    }
}
