//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::FinstatError;
use crate::statement::rules::DEFAULT_LOOKAHEAD;

/// Main configuration for finstat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinstatConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Model configuration.
    pub models: ModelConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Ratio analysis configuration.
    pub analysis: AnalysisConfig,
}

/// OCR engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Keep `[UNK]` tokens in recognized text.
    pub keep_unk: bool,

    /// Maximum image dimension (longer side) for processing.
    pub max_image_size: u32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            keep_unk: false,
            max_image_size: 2048,
        }
    }
}

/// Model file paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Lines searched after a keyword line for its number.
    pub lookahead_lines: usize,

    /// Optional JSON vocabulary replacing the built-in keyword tables.
    pub vocabulary_path: Option<PathBuf>,

    /// Hide mappings below this confidence in review output.
    pub min_display_confidence: f32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            lookahead_lines: DEFAULT_LOOKAHEAD,
            vocabulary_path: None,
            min_display_confidence: 0.0,
        }
    }
}

/// Ratio analysis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Unit label printed next to input amounts in reports.
    pub currency_label: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            currency_label: "₹ Cr".to_string(),
        }
    }
}

impl FinstatConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| FinstatError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get full path to a model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.models.model_dir.join(model_name)
    }
}
