//! Financial statement field extraction module.

mod parser;
pub mod rules;

pub use parser::{ExtractionResult, StatementParser};

use crate::ocr::OcrResult;

/// Trait for statement field extractors.
///
/// Extraction is total: text the rules cannot read yields missing fields
/// and warnings, never an error.
pub trait StatementExtractor {
    /// Extract statement fields from an OCR result.
    fn extract(&self, ocr_result: &OcrResult) -> ExtractionResult;

    /// Extract statement fields from plain text.
    fn extract_from_text(&self, text: &str) -> ExtractionResult;
}
