use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use doctrim::{FilterConfig, clean_report};

#[derive(Parser)]
#[command(
    name = "doctrim",
    version,
    about = "Filter compliance-status tables in .docx reports"
)]
struct Cli {
    /// Input .docx report
    #[arg(short, long)]
    input: PathBuf,

    /// Output path for the filtered copy
    #[arg(short, long)]
    output: PathBuf,

    /// Config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Header substring that marks the status column
    #[arg(long)]
    marker: Option<String>,

    /// Status value whose rows are dropped (repeatable; replaces the
    /// configured set)
    #[arg(long = "discard-status")]
    discard_statuses: Vec<String>,

    /// Print the run summary as JSON
    #[arg(long)]
    report_json: bool,
}

/// CLI flags override the config file, which overrides the defaults.
fn effective_config(cli: &Cli) -> Result<FilterConfig> {
    let mut config = match &cli.config {
        Some(path) => FilterConfig::load_from(path)?,
        None => FilterConfig::load()?,
    };
    if let Some(marker) = &cli.marker {
        config.status_marker = marker.clone();
    }
    if !cli.discard_statuses.is_empty() {
        config.discard_statuses = cli.discard_statuses.clone();
    }
    Ok(config)
}

fn run(cli: &Cli) -> Result<()> {
    let config = effective_config(cli)?;
    let report = clean_report(&cli.input, &cli.output, &config)?;

    if cli.report_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Processed {}: {} table(s), {} filtered, {} skipped",
            cli.input.display(),
            report.tables_seen,
            report.tables_filtered(),
            report.tables_skipped,
        );
        println!(
            "Kept {} row(s), dropped {} row(s)",
            report.rows_kept, report.rows_dropped
        );
        println!("Saved to: {}", cli.output.display());
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
