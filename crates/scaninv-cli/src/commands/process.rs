//! Process command - extract rows from a single invoice file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use scaninv_core::models::invoice::InvoiceRecord;
use scaninv_core::{assemble_rows, CustomerDirectory, COLUMNS};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF with embedded text, or OCR'd .txt)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON record
    Json,
    /// Ledger import rows as CSV
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::load_config(config_path)?;
    let customers = CustomerDirectory::builtin();

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());
    let record = super::extract_file(&args.input, &customers, &config)?;

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&record)?,
        OutputFormat::Csv => format_record_csv(&record, &config)?,
        OutputFormat::Text => format_record_text(&record),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_record_csv(
    record: &InvoiceRecord,
    config: &scaninv_core::ScaninvConfig,
) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(COLUMNS)?;
    for row in assemble_rows(record, &config.output, None) {
        wtr.write_record(&row)?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_record_text(record: &InvoiceRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("Invoice: {}\n", record.header.invoice_number));
    output.push_str(&format!("Date: {}\n", record.header.date));
    output.push_str(&format!("Customer PO: {}\n", record.header.purchase_order));
    output.push('\n');

    if let Some(bill_to) = &record.header.bill_to {
        output.push_str("Bill to:\n");
        output.push_str(&format!(
            "  {} ({})\n",
            bill_to.display_name, bill_to.customer_id
        ));
        output.push('\n');
    }

    if let Some(ship_to) = &record.header.ship_to {
        output.push_str("Ship to:\n");
        output.push_str(&format!("  {}\n", ship_to.display_name));
        for line in &record.header.ship_to_address {
            output.push_str(&format!("  {}\n", line));
        }
        output.push('\n');
    }

    output.push_str(&format!("Items ({}):\n", record.items.len()));
    for item in &record.items {
        output.push_str(&format!(
            "  {} x {} @ {} = {}\n",
            item.quantity, item.description, item.unit_amount, item.amount
        ));
    }

    output
}
