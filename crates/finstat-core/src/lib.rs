//! Core library for financial statement OCR and banking ratio analysis.
//!
//! This crate provides:
//! - Document classification (balance sheet vs. income statement)
//! - Keyword-based field extraction from line-oriented OCR text
//! - Amount normalization across currency symbols and magnitude words into crores
//! - Confidence scoring and an overwrite-on-improvement mapping store
//! - Banking ratio computation graded against benchmark bands
//! - An OCR wrapper (native builds) turning statement photos into text

pub mod analysis;
pub mod error;
pub mod models;
pub mod ocr;
pub mod statement;

pub use analysis::{AnalysisReport, Metric, MetricCategory, MetricResult, Status};
pub use error::{ExtractionError, FinstatError, OcrError, Result};
pub use models::field::{DocumentType, FieldKey};
pub use models::financials::{FinancialInputs, PriorPeriod};
pub use models::mapping::{ConfidenceBand, FieldMapping, FieldMappings};
pub use ocr::{OcrResult, TextBox, TextRecognizer};
#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
pub use statement::{ExtractionResult, StatementExtractor, StatementParser};
pub use statement::rules::{classify_document, normalize_amount, score_confidence, Vocabulary};
