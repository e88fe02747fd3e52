//! Error types for the finstat-core library.

use thiserror::Error;

/// Main error type for the finstat library.
#[derive(Error, Debug)]
pub enum FinstatError {
    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Statement extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text detection failed.
    #[error("text detection failed: {0}")]
    Detection(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Errors related to statement field handling.
///
/// Extraction itself never fails on odd input; these only surface when a
/// caller asks for something the extraction run did not produce.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractionError {
    /// Field has no mapping to correct.
    #[error("no mapping for field: {0}")]
    MissingField(String),

    /// Field key is not part of any vocabulary.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Unknown document type name.
    #[error("unknown document type: {0}")]
    UnknownDocumentType(String),

    /// Failed to parse a value.
    #[error("failed to parse {field}: {value}")]
    Parse { field: String, value: String },
}

/// Result type for the finstat library.
pub type Result<T> = std::result::Result<T, FinstatError>;
