//! Extract command - pull statement fields from a single file.

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use tracing::{debug, info};

use finstat_core::{ConfidenceBand, DocumentType, ExtractionResult, FieldKey, FieldMapping, StatementParser};

use super::{extract_statement, load_config, read_statement};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (OCR text or statement image)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Skip classification and treat the input as this statement type
    #[arg(short, long, value_parser = DocumentType::from_str)]
    document_type: Option<DocumentType>,

    /// Correct an extracted value (field=value, repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_correction)]
    corrections: Vec<(FieldKey, Decimal)>,

    /// Show extraction confidence scores
    #[arg(long)]
    show_confidence: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Text => "txt",
        }
    }
}

/// Parse a `field=value` correction.
pub fn parse_correction(s: &str) -> Result<(FieldKey, Decimal), String> {
    let (field, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{}'", s))?;
    let field = FieldKey::from_str(field.trim()).map_err(|e| e.to_string())?;
    let value = Decimal::from_str(value.trim())
        .map_err(|e| format!("invalid value for {}: {}", field, e))?;
    Ok((field, value))
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    pb.set_message("Reading statement...");
    pb.set_position(10);
    let source = read_statement(&args.input, &config, args.model_dir.as_deref()).await?;

    pb.set_message("Extracting fields...");
    pb.set_position(70);
    let parser = StatementParser::from_config(&config)?;
    let mut result = extract_statement(&parser, &source, args.document_type);

    for (field, value) in &args.corrections {
        result.correct(*field, *value)?;
        debug!("Corrected {} to {}", field, value);
    }

    pb.finish_and_clear();

    for warning in &result.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    let output = format_result(
        &result,
        args.format,
        config.extraction.min_display_confidence,
        args.show_confidence,
    )?;

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

    if args.show_confidence {
        eprintln!();
        eprintln!(
            "{} {} of {} fields extracted as {}",
            style("ℹ").blue(),
            result.mappings.len(),
            parser.vocabulary().fields_for(result.document_type).len(),
            result.document_type.label()
        );
        eprintln!(
            "{} Processing time: {}ms",
            style("ℹ").blue(),
            result.processing_time_ms
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Mappings shown for review, in field order.
fn visible(result: &ExtractionResult, min_confidence: f32) -> impl Iterator<Item = &FieldMapping> {
    result
        .mappings
        .iter()
        .filter(move |m| m.confidence >= min_confidence)
}

pub fn format_result(
    result: &ExtractionResult,
    format: OutputFormat,
    min_confidence: f32,
    show_confidence: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_csv(result, min_confidence),
        OutputFormat::Text => Ok(format_text(result, min_confidence, show_confidence)),
    }
}

fn format_csv(result: &ExtractionResult, min_confidence: f32) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    let values = result.form_values();

    wtr.write_record([
        "field",
        "field_name",
        "value",
        "confidence",
        "band",
        "line_index",
        "value_line_index",
        "original_text",
    ])?;

    for mapping in visible(result, min_confidence) {
        wtr.write_record([
            mapping.field.as_str(),
            &mapping.field_name,
            values.get(&mapping.field).map(String::as_str).unwrap_or(""),
            &format!("{:.2}", mapping.confidence),
            mapping.band().as_str(),
            &mapping.line_index.to_string(),
            &mapping.value_line_index.to_string(),
            &mapping.original_text,
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ExtractionResult, min_confidence: f32, show_confidence: bool) -> String {
    let mut output = String::new();
    let values = result.form_values();

    output.push_str(&format!("Document type: {}\n", result.document_type.label()));
    output.push('\n');

    if result.mappings.is_empty() {
        output.push_str("No fields extracted\n");
        return output;
    }

    for mapping in visible(result, min_confidence) {
        let value = values.get(&mapping.field).map(String::as_str).unwrap_or("");
        output.push_str(&format!("  {:<28} {:>14}", mapping.field_name, value));
        if show_confidence {
            let band = match mapping.band() {
                ConfidenceBand::High => style(mapping.band().as_str()).green(),
                ConfidenceBand::Medium => style(mapping.band().as_str()).yellow(),
                ConfidenceBand::Low => style(mapping.band().as_str()).red(),
            };
            output.push_str(&format!(
                "  {:>3.0}% {:<6}  line {}: {}",
                mapping.confidence * 100.0,
                band,
                mapping.line_index + 1,
                mapping.original_text
            ));
        }
        output.push('\n');
    }

    output
}
