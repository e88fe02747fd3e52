//! WASM bindings for financial statement extraction and ratio analysis.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! OCR itself runs on the JavaScript side; recognized boxes or plain text
//! are handed over for classification and field extraction.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use finstat_core::{
    AnalysisReport, ConfidenceBand, DocumentType, ExtractionError, ExtractionResult, FieldKey,
    FinancialInputs, OcrResult, StatementParser, TextBox,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Serialize into plain JS objects (maps become objects, decimals strings).
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn js_error(e: impl ToString) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn log_warnings(result: &ExtractionResult) {
    for warning in &result.warnings {
        web_sys::console::warn_1(&JsValue::from_str(warning));
    }
}

/// Current time from the JS clock; `Utc::now` is unavailable here.
fn js_now() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
}

/// Classify the text and extract its fields.
///
/// Returns the full extraction result: document type, mappings keyed by
/// field, raw text and warnings.
#[wasm_bindgen]
pub fn extract_fields_from_text(text: &str) -> Result<JsValue, JsValue> {
    let result = StatementParser::new().parse(text);
    log_warnings(&result);
    to_js(&result)
}

/// Classify a statement: `"balance_sheet"`, `"income_statement"` or `"unknown"`.
#[wasm_bindgen]
pub fn classify_document(text: &str) -> String {
    finstat_core::classify_document(text).as_str().to_string()
}

/// Normalize an amount fragment (e.g. `"₹ 1,234.56 Cr"`) into crores.
#[wasm_bindgen]
pub fn normalize_amount(fragment: &str) -> Option<f64> {
    finstat_core::normalize_amount(fragment).and_then(|d| d.to_f64())
}

/// Review band for a confidence score: `"high"`, `"medium"` or `"low"`.
#[wasm_bindgen]
pub fn confidence_band(confidence: f32) -> String {
    ConfidenceBand::from_confidence(confidence).as_str().to_string()
}

/// Compute and grade every ratio from a form object.
///
/// Missing form fields count as zero.
#[wasm_bindgen]
pub fn compute_metrics(inputs: JsValue) -> Result<JsValue, JsValue> {
    let inputs: FinancialInputs = serde_wasm_bindgen::from_value(inputs).map_err(js_error)?;
    to_js(&AnalysisReport::compute_at(&inputs, js_now()))
}

/// Extraction session for browser use.
///
/// Holds the latest extraction so the user can review and correct values
/// before they are copied into the analysis form.
#[wasm_bindgen]
pub struct ExtractionSession {
    parser: StatementParser,
    result: Option<ExtractionResult>,
}

#[wasm_bindgen]
impl ExtractionSession {
    /// Create a new session with the built-in vocabulary.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            parser: StatementParser::new(),
            result: None,
        }
    }

    /// Set the number of lines searched after a keyword line.
    #[wasm_bindgen]
    pub fn set_lookahead(&mut self, lookahead: usize) {
        self.parser = self.parser.clone().with_lookahead(lookahead);
    }

    /// Extract fields, replacing any previous result.
    #[wasm_bindgen]
    pub fn extract(&mut self, text: &str) -> Result<JsValue, JsValue> {
        let result = self.parser.parse(text);
        self.store(result)
    }

    /// Extract fields for a known statement type.
    #[wasm_bindgen]
    pub fn extract_as(&mut self, text: &str, document_type: &str) -> Result<JsValue, JsValue> {
        let document_type = DocumentType::from_str(document_type).map_err(js_error)?;
        let result = self.parser.parse_as(text, document_type);
        self.store(result)
    }

    /// Detected document type of the current result.
    #[wasm_bindgen]
    pub fn document_type(&self) -> Option<String> {
        self.result
            .as_ref()
            .map(|r| r.document_type.as_str().to_string())
    }

    /// Current mappings, or `null` before the first extraction.
    #[wasm_bindgen]
    pub fn mappings(&self) -> Result<JsValue, JsValue> {
        match &self.result {
            Some(result) => to_js(&result.mappings),
            None => Ok(JsValue::NULL),
        }
    }

    /// Correct an extracted value. The value is in crores.
    #[wasm_bindgen]
    pub fn correct(&mut self, field: &str, value: &str) -> Result<(), JsValue> {
        let key = FieldKey::from_str(field).map_err(js_error)?;
        let amount = Decimal::from_str(value.trim()).map_err(|_| {
            js_error(ExtractionError::Parse {
                field: field.to_string(),
                value: value.to_string(),
            })
        })?;

        let result = self
            .result
            .as_mut()
            .ok_or_else(|| js_error(ExtractionError::MissingField(key.to_string())))?;
        result.correct(key, amount).map_err(js_error)
    }

    /// Drop the extracted mappings and warnings.
    #[wasm_bindgen]
    pub fn clear(&mut self) {
        if let Some(result) = &mut self.result {
            result.clear();
        }
    }

    /// Form values formatted to two decimals, keyed by field.
    #[wasm_bindgen]
    pub fn form_values(&self) -> Result<JsValue, JsValue> {
        match &self.result {
            Some(result) => to_js(&result.form_values()),
            None => to_js(&BTreeMap::<FieldKey, String>::new()),
        }
    }

    /// Copy the extracted values into a form object and return the updated form.
    #[wasm_bindgen]
    pub fn apply_to(&self, inputs: JsValue) -> Result<JsValue, JsValue> {
        let mut inputs: FinancialInputs = if inputs.is_undefined() || inputs.is_null() {
            FinancialInputs::new()
        } else {
            serde_wasm_bindgen::from_value(inputs).map_err(js_error)?
        };
        if let Some(result) = &self.result {
            result.apply_to(&mut inputs);
        }
        to_js(&inputs)
    }
}

impl ExtractionSession {
    fn store(&mut self, result: ExtractionResult) -> Result<JsValue, JsValue> {
        log_warnings(&result);
        let value = to_js(&result)?;
        self.result = Some(result);
        Ok(value)
    }
}

impl Default for ExtractionSession {
    fn default() -> Self {
        Self::new()
    }
}

/// OCR result from browser-side processing.
#[wasm_bindgen]
pub struct OcrResultJs {
    boxes: Vec<TextBox>,
    text: String,
    width: u32,
    height: u32,
}

#[wasm_bindgen]
impl OcrResultJs {
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            boxes: Vec::new(),
            text: String::new(),
            width,
            height,
        }
    }

    /// Add a text box to the result.
    #[wasm_bindgen]
    #[allow(clippy::too_many_arguments)]
    pub fn add_box(
        &mut self,
        text: &str,
        x1: f32, y1: f32,
        x2: f32, y2: f32,
        x3: f32, y3: f32,
        x4: f32, y4: f32,
        confidence: f32,
    ) {
        self.boxes.push(TextBox {
            text: text.to_string(),
            bbox: [x1, y1, x2, y2, x3, y3, x4, y4],
            confidence,
        });
    }

    /// Set the full text, bypassing box ordering.
    #[wasm_bindgen]
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    /// Mean recognition confidence of the boxes.
    #[wasm_bindgen]
    pub fn mean_confidence(&self) -> f32 {
        self.to_result().mean_confidence()
    }

    /// Get the full text, one line per text row.
    #[wasm_bindgen]
    pub fn get_text(&self) -> String {
        self.to_result().text
    }

    /// Extract statement fields from this OCR result.
    #[wasm_bindgen]
    pub fn extract(&self) -> Result<JsValue, JsValue> {
        extract_fields_from_text(&self.get_text())
    }
}

impl OcrResultJs {
    fn to_result(&self) -> OcrResult {
        let mut result = OcrResult::from_boxes(self.boxes.clone(), (self.width, self.height), 0);
        if !self.text.is_empty() {
            result.text = self.text.clone();
        }
        result
    }
}
