//! OCR boundary: recognized text boxes and the recognizer trait.
//!
//! Extraction only ever sees the flattened text of an [`OcrResult`]; boxes
//! are kept for reading-order reconstruction and review.

#[cfg(feature = "native")]
mod pure_engine;

#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// Vertical bucket, in pixels, for grouping boxes into one text row.
const ROW_HEIGHT: f32 = 20.0;

/// A detected text box with its coordinates and content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    /// Bounding box coordinates (x1, y1, x2, y2, x3, y3, x4, y4) for quadrilateral.
    pub bbox: [f32; 8],

    /// Recognized text content.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0).
    pub confidence: f32,
}

impl TextBox {
    /// Get the center point of the bounding box.
    pub fn center(&self) -> (f32, f32) {
        let x = (self.bbox[0] + self.bbox[2] + self.bbox[4] + self.bbox[6]) / 4.0;
        let y = (self.bbox[1] + self.bbox[3] + self.bbox[5] + self.bbox[7]) / 4.0;
        (x, y)
    }

    /// Get the axis-aligned bounding rectangle.
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }

    /// Text row of the box, bucketed by its vertical center.
    fn row(&self) -> i32 {
        let (_, center_y) = self.center();
        (center_y / ROW_HEIGHT) as i32
    }
}

/// Result of OCR processing on an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrResult {
    /// Detected and recognized text boxes.
    pub boxes: Vec<TextBox>,

    /// Full text, one line per text row.
    pub text: String,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,

    /// Image dimensions (width, height).
    pub image_size: (u32, u32),
}

impl OcrResult {
    /// Build a result from unordered boxes.
    pub fn from_boxes(boxes: Vec<TextBox>, image_size: (u32, u32), processing_time_ms: u64) -> Self {
        let mut result = Self {
            boxes,
            text: String::new(),
            processing_time_ms,
            image_size,
        };
        result.sort_by_reading_order();
        result
    }

    /// Mean recognition confidence, 0 without boxes.
    pub fn mean_confidence(&self) -> f32 {
        if self.boxes.is_empty() {
            return 0.0;
        }
        self.boxes.iter().map(|b| b.confidence).sum::<f32>() / self.boxes.len() as f32
    }

    /// Sort boxes by reading order (top-to-bottom, left-to-right) and
    /// rebuild the text.
    ///
    /// Boxes sharing a row are joined with a space so a label and its amount
    /// printed side by side end up on one line.
    pub fn sort_by_reading_order(&mut self) {
        self.boxes.sort_by(|a, b| {
            let (row_a, row_b) = (a.row(), b.row());
            if row_a != row_b {
                row_a.cmp(&row_b)
            } else {
                let (ax, _, _, _) = a.rect();
                let (bx, _, _, _) = b.rect();
                ax.partial_cmp(&bx).unwrap_or(std::cmp::Ordering::Equal)
            }
        });

        let mut lines: Vec<String> = Vec::new();
        let mut current_row = None;
        for text_box in &self.boxes {
            let text = text_box.text.trim();
            if text.is_empty() {
                continue;
            }
            let row = text_box.row();
            match lines.last_mut() {
                Some(line) if current_row == Some(row) => {
                    line.push(' ');
                    line.push_str(text);
                }
                _ => lines.push(text.to_string()),
            }
            current_row = Some(row);
        }

        self.text = lines.join("\n");
    }
}

/// Turns a statement image into text.
pub trait TextRecognizer {
    /// Run OCR over an image.
    fn recognize(&self, image: &DynamicImage) -> Result<OcrResult, OcrError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text_box(text: &str, x: f32, y: f32) -> TextBox {
        TextBox {
            bbox: [x, y, x + 100.0, y, x + 100.0, y + 15.0, x, y + 15.0],
            text: text.to_string(),
            confidence: 0.9,
        }
    }

    #[test]
    fn test_rect_and_center() {
        let b = text_box("x", 10.0, 40.0);
        assert_eq!(b.rect(), (10.0, 40.0, 110.0, 55.0));
        assert_eq!(b.center(), (60.0, 47.5));
    }

    #[test]
    fn test_reading_order_joins_rows() {
        let boxes = vec![
            text_box("48,250.75 cr", 400.0, 62.0),
            text_box("BALANCE SHEET", 10.0, 5.0),
            text_box("Total Assets", 10.0, 61.0),
            text_box("Deposits", 10.0, 100.0),
        ];
        let result = OcrResult::from_boxes(boxes, (800, 600), 12);

        assert_eq!(result.text, "BALANCE SHEET\nTotal Assets 48,250.75 cr\nDeposits");
        assert_eq!(result.boxes[0].text, "BALANCE SHEET");
        assert_eq!(result.processing_time_ms, 12);
    }

    #[test]
    fn test_rows_grouped_by_center() {
        // Taller amount box starts a row higher but shares the label's center.
        let mut amount = text_box("1,200 cr", 400.0, 34.0);
        amount.bbox = [400.0, 34.0, 480.0, 34.0, 480.0, 66.0, 400.0, 66.0];
        let boxes = vec![amount, text_box("Deposits", 10.0, 42.0)];
        let result = OcrResult::from_boxes(boxes, (800, 600), 0);
        assert_eq!(result.text, "Deposits 1,200 cr");
    }

    #[test]
    fn test_blank_boxes_skipped() {
        let boxes = vec![text_box("  ", 10.0, 5.0), text_box("Net profit", 10.0, 45.0)];
        let result = OcrResult::from_boxes(boxes, (100, 100), 0);
        assert_eq!(result.text, "Net profit");
    }

    #[test]
    fn test_mean_confidence() {
        assert_eq!(OcrResult::from_boxes(Vec::new(), (1, 1), 0).mean_confidence(), 0.0);
        let mut low = text_box("a", 0.0, 0.0);
        low.confidence = 0.5;
        let result = OcrResult::from_boxes(vec![low, text_box("b", 0.0, 30.0)], (1, 1), 0);
        assert!((result.mean_confidence() - 0.7).abs() < 1e-6);
    }
}
