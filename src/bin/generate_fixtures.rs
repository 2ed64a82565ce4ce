//! Generate sample compliance-report .docx files for manual runs and
//! integration tests.
//!
//! Usage: `cargo run --bin generate_fixtures [OUTPUT_DIR]`
//! (defaults to tests/fixtures)

use anyhow::Result;
use docx_rs::{Docx, Paragraph, Run, Table, TableCell, TableRow};
use std::fs::File;
use std::path::PathBuf;

fn cell(text: &str) -> TableCell {
    TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text(text)))
}

fn row(texts: &[&str]) -> TableRow {
    TableRow::new(texts.iter().map(|t| cell(t)).collect())
}

/// A compliance table exercising every filter path: discarded statuses,
/// blank category cells that inherit from above, and a category that
/// repeats across consecutive kept rows.
fn compliance_table() -> Table {
    Table::new(vec![
        row(&["条款", "要求", "符合情况"]),
        row(&["物理安全", "机房门禁", "符合"]),
        row(&["", "视频监控", "不符合"]),
        row(&["", "防雷接地", "部分符合"]),
        row(&["网络安全", "边界防护", "不适用"]),
        row(&["", "入侵检测", "不符合"]),
        row(&["数据安全", "备份策略", "符合"]),
    ])
    .set_grid(vec![2000, 5000, 2000])
}

/// A table without a status column; the filter must pass it through.
fn inventory_table() -> Table {
    Table::new(vec![
        row(&["名称", "数量"]),
        row(&["服务器", "12"]),
        row(&["交换机", "4"]),
    ])
    .set_grid(vec![4000, 2000])
}

fn main() -> Result<()> {
    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures"));
    std::fs::create_dir_all(&dir)?;

    let path = dir.join("compliance-report.docx");
    let file = File::create(&path)?;
    Docx::new()
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text("合规检查报告")))
        .add_table(compliance_table())
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text("资产清单")))
        .add_table(inventory_table())
        .build()
        .pack(file)?;
    println!("Wrote {}", path.display());

    Ok(())
}
