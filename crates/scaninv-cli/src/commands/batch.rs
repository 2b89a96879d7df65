//! Batch command - one output-table pair per input document.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use scaninv_core::models::config::ScaninvConfig;
use scaninv_core::models::invoice::InvoiceRecord;
use scaninv_core::{assemble_rows, CustomerDirectory, COLUMNS};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input directory of invoice files (.pdf with embedded text, .txt)
    input_dir: PathBuf,

    /// Output directory, created if absent
    #[arg(short, long, default_value = "out")]
    output_dir: PathBuf,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    error: Option<String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::load_config(config_path)?;
    let customers = CustomerDirectory::builtin();

    // A missing input directory ends this run without raising; other
    // invocations are unaffected.
    if !args.input_dir.is_dir() {
        eprintln!(
            "{} Input directory '{}' does not exist.",
            style("✗").red(),
            args.input_dir.display()
        );
        return Ok(());
    }

    let mut files: Vec<PathBuf> = fs::read_dir(&args.input_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && super::is_input_document(p))
        .collect();
    files.sort();

    if files.is_empty() {
        println!(
            "{} No invoice files found in {}",
            style("ℹ").blue(),
            args.input_dir.display()
        );
        return Ok(());
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    fs::create_dir_all(&args.output_dir)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    // Documents are independent; a single bad one never aborts the batch.
    let mut results = Vec::with_capacity(files.len());
    for path in files {
        let result = match super::extract_file(&path, &customers, &config) {
            Ok(record) => match write_output_pair(&path, &record, &args.output_dir, &config) {
                Ok(()) => ProcessResult {
                    path,
                    error: None,
                },
                Err(e) => ProcessResult {
                    path,
                    error: Some(e.to_string()),
                },
            },
            Err(e) => {
                warn!("failed to process {}: {}", path.display(), e);
                ProcessResult {
                    path,
                    error: Some(e.to_string()),
                }
            }
        };
        results.push(result);
        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Write the CSV and tab-separated outputs for one document, named after the
/// input file's base name.
fn write_output_pair(
    input: &Path,
    record: &InvoiceRecord,
    output_dir: &Path,
    config: &ScaninvConfig,
) -> anyhow::Result<()> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("invoice");

    let csv_path = output_dir.join(format!("{stem}.csv"));
    let csv_content = super::process::format_record_csv(record, config)?;
    fs::write(&csv_path, csv_content)?;

    let txt_path = output_dir.join(format!("{stem}.txt"));
    fs::write(&txt_path, format_record_tsv(record, config))?;

    debug!(
        "wrote {} and {}",
        csv_path.display(),
        txt_path.display()
    );
    Ok(())
}

/// Tab-separated rendition with amounts formatted to two decimal places.
fn format_record_tsv(record: &InvoiceRecord, config: &ScaninvConfig) -> String {
    let mut out = String::new();
    out.push_str(&COLUMNS.join("\t"));
    out.push('\n');

    for row in assemble_rows(record, &config.output, Some(2)) {
        out.push_str(&row.join("\t"));
        out.push('\n');
    }

    out
}
