//! Compliance-table row filtering
//!
//! The transform works per top-level table, in four steps mirroring the
//! reconstruction the reports need:
//!
//! 1. locate the status column by header substring,
//! 2. read the data rows, propagating the running category down blank
//!    first cells, and snapshot every surviving cell's style,
//! 3. drop all data rows,
//! 4. re-emit the kept rows with restored styling, normalized fonts and a
//!    vertical-merge plan over the category column.
//!
//! At the markup level steps 3 and 4 are a single splice: everything from
//! the first data row to the last row of the `<w:tbl>` is replaced, while
//! the table properties, grid and header row are kept byte-for-byte.

use std::ops::Range;
use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;

use super::error::DocError;
use super::io::{self, DOCUMENT_XML};
use super::merge::{MergeState, merge_plan};
use super::models::{FilterReport, KeptRow, TableSummary};
use super::scan::{cell_text, child_ranges};
use super::style::{StyleSnapshot, render_cell_paragraph};
use crate::config::FilterConfig;

static GRID_COL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<w:gridCol[\s/>]").expect("invalid regex"));
static GRID_SPAN_VAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"w:val="(\d+)""#).expect("invalid regex"));

/// Filter one report: read the package, rewrite every compliance table in
/// `word/document.xml`, and write the filtered copy. Nothing is written
/// unless the whole transform succeeded.
pub fn clean_report(
    input: &Path,
    output: &Path,
    config: &FilterConfig,
) -> Result<FilterReport> {
    io::validate_docx_file(input)?;

    let mut entries = io::read_package(input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let document = entries
        .iter_mut()
        .find(|(name, _)| name == DOCUMENT_XML)
        .ok_or(DocError::MissingDocumentXml)?;
    let xml = String::from_utf8(std::mem::take(&mut document.1)).map_err(DocError::from)?;

    let (rewritten, report) = filter_document_xml(&xml, config)?;
    document.1 = rewritten.into_bytes();

    io::write_package(output, &entries)
        .with_context(|| format!("failed to write {}", output.display()))?;

    Ok(report)
}

/// Rewrite every compliance table in a `document.xml` body; tables without
/// a status column pass through untouched.
pub(crate) fn filter_document_xml(
    document_xml: &str,
    config: &FilterConfig,
) -> Result<(String, FilterReport), DocError> {
    let tables = child_ranges(document_xml, "w:tbl")?;

    let mut report = FilterReport {
        tables_seen: tables.len(),
        ..FilterReport::default()
    };
    let mut out = String::with_capacity(document_xml.len());
    let mut cursor = 0usize;

    for (table_index, range) in tables.iter().enumerate() {
        out.push_str(&document_xml[cursor..range.start]);
        let table_xml = &document_xml[range.clone()];

        match filter_table(table_xml, config)? {
            Some(filtered) => {
                out.push_str(&filtered.markup);
                report.record(TableSummary {
                    table_index,
                    status_column: filtered.status_column,
                    rows_scanned: filtered.rows_scanned,
                    rows_kept: filtered.rows_kept,
                    rows_dropped: filtered.rows_scanned - filtered.rows_kept,
                });
            }
            None => {
                report.tables_skipped += 1;
                out.push_str(table_xml);
            }
        }
        cursor = range.end;
    }
    out.push_str(&document_xml[cursor..]);

    Ok((out, report))
}

struct FilteredTable {
    markup: String,
    status_column: usize,
    rows_scanned: usize,
    rows_kept: usize,
}

/// Rewrite one table, or `None` when it is not a compliance table (no
/// header cell contains the status marker) — a normal outcome, not an
/// error.
fn filter_table(
    table_xml: &str,
    config: &FilterConfig,
) -> Result<Option<FilteredTable>, DocError> {
    let rows = child_ranges(table_xml, "w:tr")?;
    let Some(header) = rows.first() else {
        return Ok(None);
    };

    let header_xml = &table_xml[header.clone()];
    let header_cells = child_ranges(header_xml, "w:tc")?;
    let Some(status_column) = locate_status_column(header_xml, &header_cells, config)? else {
        return Ok(None);
    };

    let kept = collect_kept_rows(table_xml, &rows[1..], status_column, config)?;
    let rows_scanned = rows.len() - 1;
    let rows_kept = kept.len();

    // Rebuilt rows take the grid's column count; a grid-less table falls
    // back to the header row's width in grid positions.
    let columns = match grid_column_count(table_xml)? {
        Some(count) if count > 0 => count,
        _ => {
            let mut total = 0;
            for cell in &header_cells {
                total += cell_grid_span(&header_xml[cell.clone()])?;
            }
            total
        }
    };

    let mut markup = String::with_capacity(table_xml.len());
    match rows.get(1) {
        Some(first_data_row) => {
            markup.push_str(&table_xml[..first_data_row.start]);
            let categories: Vec<&str> = kept.iter().map(|row| row.category()).collect();
            let plan = merge_plan(&categories);
            for (row, state) in kept.iter().zip(plan) {
                markup.push_str(&render_row(row, columns, state, config));
            }
            markup.push_str(&table_xml[rows.last().unwrap_or(header).end..]);
        }
        // Header-only table: nothing to erase or rewrite.
        None => markup.push_str(table_xml),
    }

    Ok(Some(FilteredTable {
        markup,
        status_column,
        rows_scanned,
        rows_kept,
    }))
}

/// Grid position of the first header cell whose text contains the status
/// marker. Matching strips newlines (only newlines) from the trimmed cell
/// text and then tests substring containment. Positions advance by each
/// cell's `w:gridSpan`, so horizontally merged header cells do not shift
/// the columns after them.
fn locate_status_column(
    header_xml: &str,
    header_cells: &[Range<usize>],
    config: &FilterConfig,
) -> Result<Option<usize>, DocError> {
    let mut column = 0;
    for cell in header_cells {
        let cell_xml = &header_xml[cell.clone()];
        let text = cell_text(cell_xml)?;
        if text.trim().replace('\n', "").contains(&config.status_marker) {
            return Ok(Some(column));
        }
        column += cell_grid_span(cell_xml)?;
    }
    Ok(None)
}

/// Read-only pass over the data rows: propagate the running category,
/// decide keep/drop from the status column, and snapshot every kept cell.
///
/// Cells are addressed by grid position, not physical `<w:tc>` index: a
/// `w:gridSpan` cell repeats its text and style once per position it
/// covers, so the status column lines up even when an earlier cell in the
/// row is horizontally merged. Rows too short to reach the status column
/// read an empty status, which is never in the discard set, so they are
/// kept rather than silently lost.
fn collect_kept_rows(
    table_xml: &str,
    data_rows: &[Range<usize>],
    status_column: usize,
    config: &FilterConfig,
) -> Result<Vec<KeptRow>, DocError> {
    let mut kept = Vec::new();
    let mut current_category = String::new();

    for row in data_rows {
        let row_xml = &table_xml[row.clone()];

        let mut texts = Vec::new();
        let mut styles = Vec::new();
        for cell in child_ranges(row_xml, "w:tc")? {
            let cell_xml = &row_xml[cell];
            let text = cell_text(cell_xml)?.trim().to_string();
            let style = StyleSnapshot::capture(cell_xml)?;
            for _ in 0..cell_grid_span(cell_xml)? {
                texts.push(text.clone());
                styles.push(style.clone());
            }
        }

        if let Some(category) = texts.first()
            && !category.is_empty()
        {
            current_category = category.clone();
        }

        let status = texts.get(status_column).map(String::as_str).unwrap_or("");
        if config.discard_statuses.iter().any(|s| s.as_str() == status) {
            continue;
        }

        if let Some(first) = texts.first_mut() {
            *first = current_category.clone();
        }
        kept.push(KeptRow { texts, styles });
    }

    Ok(kept)
}

/// Grid positions a cell occupies: its `w:gridSpan` value, 1 when absent.
fn cell_grid_span(cell_xml: &str) -> Result<usize, DocError> {
    let Some(tcpr) = child_ranges(cell_xml, "w:tcPr")?.into_iter().next() else {
        return Ok(1);
    };
    let tcpr_xml = &cell_xml[tcpr];
    let Some(span) = child_ranges(tcpr_xml, "w:gridSpan")?.into_iter().next() else {
        return Ok(1);
    };
    let span = GRID_SPAN_VAL_RE
        .captures(&tcpr_xml[span])
        .and_then(|c| c[1].parse::<usize>().ok())
        .unwrap_or(1);
    Ok(span.max(1))
}

/// Emit one rewritten `<w:tr>` with exactly `columns` cells. Saved columns
/// beyond the grid are dropped; missing ones pad with empty default-styled
/// cells. A `Continue` merge state clears column 0's visible text.
fn render_row(
    row: &KeptRow,
    columns: usize,
    state: MergeState,
    config: &FilterConfig,
) -> String {
    let default_style = StyleSnapshot::default();
    let mut tr = String::from("<w:tr>");

    for j in 0..columns {
        let text = match (j, state) {
            (0, MergeState::Continue) => "",
            _ => row.texts.get(j).map(String::as_str).unwrap_or(""),
        };
        let style = row.styles.get(j).unwrap_or(&default_style);
        let merge = (j == 0).then_some(state);

        tr.push_str("<w:tc>");
        tr.push_str(&style.render_tc_pr(merge));
        tr.push_str(&render_cell_paragraph(text, config));
        tr.push_str("</w:tc>");
    }

    tr.push_str("</w:tr>");
    tr
}

/// Column count from the table's `<w:tblGrid>`, if it has one.
fn grid_column_count(table_xml: &str) -> Result<Option<usize>, DocError> {
    let Some(grid) = child_ranges(table_xml, "w:tblGrid")?.into_iter().next() else {
        return Ok(None);
    };
    Ok(Some(GRID_COL_RE.find_iter(&table_xml[grid]).count()))
}

impl KeptRow {
    fn category(&self) -> &str {
        self.texts.first().map(String::as_str).unwrap_or("")
    }
}
