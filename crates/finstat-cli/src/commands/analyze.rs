//! Analyze command - compute and grade banking ratios.

use std::fs;
use std::path::PathBuf;

use chrono::Local;
use clap::Args;
use console::style;
use rust_decimal::Decimal;
use tracing::{debug, info};

use finstat_core::models::config::FinstatConfig;
use finstat_core::{
    AnalysisReport, DocumentType, FieldKey, FinancialInputs, MetricCategory, MetricResult,
    StatementParser, Status, Vocabulary,
};

use super::{extract_statement, load_config, read_statement};

/// Arguments for the analyze command.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// JSON file with input values
    #[arg(short, long)]
    inputs: Option<PathBuf>,

    /// Statement files (OCR text or images) to extract inputs from (repeatable)
    #[arg(long = "from-text", value_name = "FILE")]
    from_text: Vec<PathBuf>,

    /// Model directory for image inputs
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Previous period AUM (total assets)
    #[arg(long)]
    prev_aum: Option<Decimal>,

    /// Previous period gross loans
    #[arg(long)]
    prev_loans: Option<Decimal>,

    /// Previous period deposits
    #[arg(long)]
    prev_deposits: Option<Decimal>,

    /// Previous period operating income
    #[arg(long)]
    prev_operating_income: Option<Decimal>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: ReportFormat,

    /// Export the report as CSV
    #[arg(short, long, value_name = "FILE")]
    export: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ReportFormat {
    /// Metric table grouped by category
    Text,
    /// JSON report
    Json,
}

pub async fn run(args: AnalyzeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let mut inputs = match &args.inputs {
        Some(path) => FinancialInputs::from_file(path)?,
        None => FinancialInputs::new(),
    };

    if !args.from_text.is_empty() {
        let parser = StatementParser::from_config(&config)?;
        for path in &args.from_text {
            let source = read_statement(path, &config, args.model_dir.as_deref()).await?;
            let result = extract_statement(&parser, &source, None);
            if result.document_type == DocumentType::Unknown {
                eprintln!(
                    "{} {}: could not determine document type",
                    style("⚠").yellow(),
                    path.display()
                );
            }
            let applied = result.apply_to(&mut inputs);
            info!(
                "Applied {} fields from {} ({})",
                applied,
                path.display(),
                result.document_type
            );
        }
    }

    let previous = &mut inputs.previous;
    for (slot, value) in [
        (&mut previous.aum, args.prev_aum),
        (&mut previous.loans, args.prev_loans),
        (&mut previous.deposits, args.prev_deposits),
        (&mut previous.operating_income, args.prev_operating_income),
    ] {
        if let Some(value) = value {
            *slot = value;
        }
    }

    let report = AnalysisReport::compute(&inputs);

    match args.format {
        ReportFormat::Text => print!("{}", format_report(&report)),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if let Some(export_path) = &args.export {
        let csv = export_csv(&report, &config)?;
        fs::write(export_path, csv)?;
        debug!("Exported report to {}", export_path.display());
        println!(
            "{} Report exported to {}",
            style("✓").green(),
            export_path.display()
        );
    }

    Ok(())
}

fn styled_status(metric: &MetricResult) -> String {
    let label = metric.status_label();
    match metric.status {
        Some(Status::Excellent) => style(label).green().bold().to_string(),
        Some(Status::Good) => style(label).green().to_string(),
        Some(Status::Average) => style(label).yellow().to_string(),
        Some(Status::Poor) => style(label).red().to_string(),
        None => style(label).dim().to_string(),
    }
}

fn format_report(report: &AnalysisReport) -> String {
    let mut output = String::new();
    let mut category: Option<MetricCategory> = None;

    for metric in &report.metrics {
        if category != Some(metric.category) {
            if category.is_some() {
                output.push('\n');
            }
            output.push_str(&format!("{}\n", style(metric.category.label()).bold()));
            category = Some(metric.category);
        }
        output.push_str(&format!(
            "  {:<26} {:>10}  {:<10} {}\n",
            metric.metric.name(),
            metric.display_value(),
            metric.metric.benchmark(),
            styled_status(metric)
        ));
    }

    output
}

/// CSV table with every field quoted.
fn quoted_table(header: &[&str], rows: &[Vec<String>]) -> anyhow::Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(vec![]);
    wtr.write_record(header)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    Ok(String::from_utf8(wtr.into_inner()?)?)
}

/// Plain CSV table, quoting only where needed.
fn table(header: &[&str], rows: &[Vec<String>]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(header)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    Ok(String::from_utf8(wtr.into_inner()?)?)
}

/// Report export: title, timestamp, input summary and the metric table.
pub fn export_csv(report: &AnalysisReport, config: &FinstatConfig) -> anyhow::Result<String> {
    let vocabulary = Vocabulary::default();
    let mut output = String::new();

    output.push_str("Banking Financial Analysis Report\n");
    output.push_str(&format!(
        "Generated on: {}\n\n",
        report
            .generated_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
    ));

    output.push_str("INPUT DATA SUMMARY\n");
    let mut inputs: Vec<Vec<String>> = FieldKey::all()
        .map(|field| {
            vec![
                field.statement().label().to_string(),
                vocabulary.display_name(field),
                report.inputs.get(field).normalize().to_string(),
            ]
        })
        .collect();
    let previous = &report.inputs.previous;
    for (item, value) in [
        ("Previous AUM", previous.aum),
        ("Previous Loans", previous.loans),
        ("Previous Deposits", previous.deposits),
        ("Previous Operating Income", previous.operating_income),
    ] {
        inputs.push(vec![
            "Previous Period".to_string(),
            item.to_string(),
            value.normalize().to_string(),
        ]);
    }
    let value_header = format!("Value ({})", config.analysis.currency_label);
    output.push_str(&table(&["Category", "Item", &value_header], &inputs)?);
    output.push('\n');

    output.push_str("CALCULATED METRICS\n");
    let metrics: Vec<Vec<String>> = report
        .metrics
        .iter()
        .map(|m| {
            vec![
                m.category.label().to_string(),
                m.metric.name().to_string(),
                m.display_value(),
                m.metric.benchmark(),
                m.status_label().to_string(),
            ]
        })
        .collect();
    output.push_str(&quoted_table(
        &["Category", "Metric Name", "Calculated Value", "Benchmark", "Status"],
        &metrics,
    )?);

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_export_layout() {
        let mut inputs = FinancialInputs::new();
        inputs.gross_advances = Decimal::from_str("780").unwrap();
        inputs.deposits = Decimal::from(1000);
        inputs.previous.deposits = Decimal::from(800);

        let report = AnalysisReport::compute(&inputs);
        let csv = export_csv(&report, &FinstatConfig::default()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Banking Financial Analysis Report");
        assert!(lines[1].starts_with("Generated on: "));
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "INPUT DATA SUMMARY");
        assert_eq!(lines[4], "Category,Item,Value (₹ Cr)");
        assert_eq!(lines[5], "Balance Sheet,Total Assets,0");
        assert!(csv.contains("Balance Sheet,Deposits,1000\n"));
        assert!(csv.contains("Previous Period,Previous Deposits,800\n"));
        assert!(csv.contains("CALCULATED METRICS\n\"Category\",\"Metric Name\",\"Calculated Value\",\"Benchmark\",\"Status\"\n"));
        assert!(csv.contains("\"Growth Metrics\",\"Deposit Growth\",\"25.00%\",\">= 25%\",\"Excellent\""));
        assert!(csv.contains("\"Liquidity\",\"Loan-to-Deposit Ratio\",\"78.00%\",\"70-80%\",\"Excellent\""));
        assert!(csv.contains("\"Profitability\",\"Return on Assets\",\"-\",\">= 3%\",\"Not Calculated\""));
    }

    #[test]
    fn test_report_lists_every_category() {
        let report = AnalysisReport::compute(&FinancialInputs::new());
        let text = format_report(&report);
        for label in ["Growth Metrics", "Profitability", "Asset Quality", "Efficiency", "Capital Adequacy", "Liquidity"] {
            assert!(text.contains(label), "{}", label);
        }
        assert!(text.contains("Net Interest Margin"));
    }
}
