//! Pure Rust OCR engine wrapper using `pure-onnx-ocr`.

use std::path::Path;
use std::time::Instant;

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::{ModelConfig, OcrConfig};

use super::{OcrResult, TextBox, TextRecognizer};

/// OCR engine backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).
pub struct PureOcrEngine {
    engine: pure_onnx_ocr::engine::OcrEngine,
    config: OcrConfig,
}

impl PureOcrEngine {
    /// Create an engine from the model files named in `models`, looked up in
    /// `model_dir`.
    pub fn from_dir(model_dir: &Path, models: &ModelConfig, config: OcrConfig) -> Result<Self, OcrError> {
        let det_path = model_dir.join(&models.detection_model);
        let rec_path = model_dir.join(&models.recognition_model);
        let dict_path = model_dir.join(&models.dictionary);

        for path in [&det_path, &rec_path, &dict_path] {
            if !path.exists() {
                return Err(OcrError::ModelLoad(format!("missing {}", path.display())));
            }
        }

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", model_dir.display());

        Ok(Self { engine, config })
    }

    /// Downscale so the longer side fits `max_image_size`. Returns the scale
    /// factor applied.
    fn fit(&self, image: &DynamicImage) -> (Option<DynamicImage>, f32) {
        let (width, height) = image.dimensions();
        let longer = width.max(height);
        let limit = self.config.max_image_size;
        if limit == 0 || longer <= limit {
            return (None, 1.0);
        }

        let scale = limit as f32 / longer as f32;
        let resized = image.resize(
            limit,
            limit,
            image::imageops::FilterType::Lanczos3,
        );
        debug!(
            "Downscaled {}x{} to {}x{}",
            width,
            height,
            resized.width(),
            resized.height()
        );
        (Some(resized), scale)
    }
}

impl TextRecognizer for PureOcrEngine {
    fn recognize(&self, image: &DynamicImage) -> Result<OcrResult, OcrError> {
        let start = Instant::now();
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(OcrError::InvalidImage(format!("{}x{}", width, height)));
        }

        info!("Processing image: {}x{}", width, height);

        let (resized, scale) = self.fit(image);
        let input = resized.as_ref().unwrap_or(image);

        let results = self
            .engine
            .run_from_image(input)
            .map_err(|e| OcrError::Detection(format!("pure-onnx-ocr: {}", e)))?;

        debug!("pure-onnx-ocr returned {} text regions", results.len());

        let boxes: Vec<TextBox> = results
            .iter()
            .map(|r| {
                let text = if self.config.keep_unk {
                    r.text.clone()
                } else {
                    r.text.replace("[UNK]", " ")
                };
                TextBox {
                    bbox: polygon_to_bbox(&r.bounding_box, scale),
                    text,
                    confidence: r.confidence,
                }
            })
            .collect();

        let result = OcrResult::from_boxes(boxes, (width, height), start.elapsed().as_millis() as u64);

        info!(
            "OCR complete: {} text boxes in {}ms",
            result.boxes.len(),
            result.processing_time_ms
        );

        Ok(result)
    }
}

/// Convert a `Polygon<f64>` to our `[f32; 8]` bbox format in original image
/// coordinates.
fn polygon_to_bbox(polygon: &pure_onnx_ocr::Polygon<f64>, scale: f32) -> [f32; 8] {
    let mut bbox = [0.0f32; 8];
    for (i, coord) in polygon.exterior().coords().take(4).enumerate() {
        bbox[i * 2] = coord.x as f32 / scale;
        bbox[i * 2 + 1] = coord.y as f32 / scale;
    }
    bbox
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_models() {
        let dir = std::env::temp_dir().join("finstat-no-models");
        let err = PureOcrEngine::from_dir(&dir, &ModelConfig::default(), OcrConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, OcrError::ModelLoad(_)));
    }
}
