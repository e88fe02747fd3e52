//! CLI subcommands and the input handling they share.

pub mod analyze;
pub mod batch;
pub mod config;
pub mod extract;

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use finstat_core::models::config::FinstatConfig;
use finstat_core::{
    DocumentType, ExtractionResult, OcrResult, PureOcrEngine, StatementExtractor, StatementParser,
    TextRecognizer,
};

/// Image extensions routed through OCR.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "tiff", "tif", "bmp"];

/// Extensions read as OCR text.
pub const TEXT_EXTENSIONS: [&str; 2] = ["txt", "text"];

/// Load the configuration named on the command line, or the defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<FinstatConfig> {
    match config_path {
        Some(path) => Ok(FinstatConfig::from_file(Path::new(path))?),
        None => Ok(FinstatConfig::default()),
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Whether a file is something `extract` can read.
pub fn is_supported(path: &Path) -> bool {
    let ext = extension_of(path);
    TEXT_EXTENSIONS.contains(&ext.as_str()) || IMAGE_EXTENSIONS.contains(&ext.as_str())
}

/// Statement text, either read directly or recognized from an image.
pub enum StatementSource {
    Text(String),
    Image(OcrResult),
}

impl StatementSource {
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Image(ocr) => &ocr.text,
        }
    }
}

/// Read a text file or run OCR over an image.
///
/// OCR runs on the blocking pool; extraction starts only after it returns.
pub async fn read_statement(
    path: &Path,
    config: &FinstatConfig,
    model_dir: Option<&Path>,
) -> anyhow::Result<StatementSource> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    let extension = extension_of(path);
    if TEXT_EXTENSIONS.contains(&extension.as_str()) {
        debug!("Reading OCR text from {}", path.display());
        return Ok(StatementSource::Text(fs::read_to_string(path)?));
    }
    if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        anyhow::bail!("Unsupported file format: {}", extension);
    }

    let image_path = path.to_path_buf();
    let model_dir = model_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.models.model_dir.clone());
    let config = config.clone();

    let ocr = tokio::task::spawn_blocking(move || run_ocr(&image_path, &model_dir, &config)).await??;

    if ocr.text.trim().is_empty() {
        anyhow::bail!("No text detected in image");
    }
    Ok(StatementSource::Image(ocr))
}

fn run_ocr(path: &Path, model_dir: &Path, config: &FinstatConfig) -> anyhow::Result<OcrResult> {
    let image = image::open(path)?;

    let det_model = model_dir.join(&config.models.detection_model);
    let rec_model = model_dir.join(&config.models.recognition_model);
    if !det_model.exists() || !rec_model.exists() {
        anyhow::bail!(
            "OCR models not found at {}.\n\n\
             Place {} and {} there or pass --model-dir.",
            model_dir.display(),
            config.models.detection_model,
            config.models.recognition_model
        );
    }

    let engine = PureOcrEngine::from_dir(model_dir, &config.models, config.ocr.clone())
        .map_err(|e| anyhow::anyhow!("Failed to load OCR models: {}", e))?;
    let result = engine
        .recognize(&image)
        .map_err(|e| anyhow::anyhow!("OCR failed: {}", e))?;

    info!(
        "OCR detected {} text boxes in {}ms",
        result.boxes.len(),
        result.processing_time_ms
    );
    Ok(result)
}

/// Run extraction over a statement, optionally with a forced document type.
pub fn extract_statement(
    parser: &StatementParser,
    source: &StatementSource,
    document_type: Option<DocumentType>,
) -> ExtractionResult {
    match (source, document_type) {
        (StatementSource::Text(text), None) => parser.extract_from_text(text),
        (StatementSource::Image(ocr), None) => parser.extract(ocr),
        (source, Some(document_type)) => {
            let mut result = parser.parse_as(source.text(), document_type);
            if let StatementSource::Image(ocr) = source {
                result.processing_time_ms += ocr.processing_time_ms;
            }
            result
        }
    }
}
