//! Statement parser: classification followed by keyword field matching.

use std::collections::BTreeMap;
use std::time::Instant;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ExtractionError;
use crate::models::config::FinstatConfig;
use crate::models::field::{DocumentType, FieldKey};
use crate::models::financials::FinancialInputs;
use crate::models::mapping::FieldMappings;
use crate::ocr::OcrResult;

use super::rules::{classify_document, FieldMatcher, Vocabulary, DEFAULT_LOOKAHEAD};
use super::StatementExtractor;

/// Result of one extraction run.
///
/// Owns its mappings; corrections and form population go through it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Detected (or forced) statement type.
    pub document_type: DocumentType,
    /// Extracted fields.
    pub mappings: FieldMappings,
    /// Raw extracted text.
    pub raw_text: String,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    /// Correct the value of an extracted field.
    pub fn correct(&mut self, field: FieldKey, value: Decimal) -> Result<(), ExtractionError> {
        self.mappings.set_value(field, value)
    }

    /// Drop every mapping and warning.
    pub fn clear(&mut self) {
        self.mappings.clear();
        self.warnings.clear();
    }

    /// Form values formatted to two decimals.
    pub fn form_values(&self) -> BTreeMap<FieldKey, String> {
        self.mappings.form_values()
    }

    /// Copy extracted values into a form. Returns the number of fields set.
    pub fn apply_to(&self, inputs: &mut FinancialInputs) -> usize {
        self.mappings.apply_to(inputs)
    }
}

/// Rule-based statement parser.
#[derive(Debug, Clone)]
pub struct StatementParser {
    vocabulary: Vocabulary,
    lookahead: usize,
}

impl StatementParser {
    /// Create a parser with the built-in vocabulary.
    pub fn new() -> Self {
        Self {
            vocabulary: Vocabulary::default(),
            lookahead: DEFAULT_LOOKAHEAD,
        }
    }

    /// Build a parser from configuration, loading the vocabulary file if one
    /// is configured.
    pub fn from_config(config: &FinstatConfig) -> crate::Result<Self> {
        let vocabulary = match &config.extraction.vocabulary_path {
            Some(path) => {
                debug!("Loading vocabulary from {}", path.display());
                Vocabulary::from_file(path)?
            }
            None => Vocabulary::default(),
        };

        Ok(Self::new()
            .with_vocabulary(vocabulary)
            .with_lookahead(config.extraction.lookahead_lines))
    }

    /// Replace the vocabulary.
    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// Set the number of lines searched after a keyword line.
    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead;
        self
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Classify the text and extract its fields.
    pub fn parse(&self, text: &str) -> ExtractionResult {
        let start = now();
        let document_type = classify_document(text);
        self.run(text, document_type, start)
    }

    /// Extract fields with a known statement type, skipping classification.
    pub fn parse_as(&self, text: &str, document_type: DocumentType) -> ExtractionResult {
        self.run(text, document_type, now())
    }

    fn run(&self, text: &str, document_type: DocumentType, start: Option<Instant>) -> ExtractionResult {
        info!(
            "Parsing {} from {} characters of text",
            document_type.label(),
            text.len()
        );

        let mappings = FieldMatcher::new(&self.vocabulary)
            .with_lookahead(self.lookahead)
            .extract(text, document_type);

        let mut warnings = Vec::new();
        if document_type == DocumentType::Unknown {
            warnings.push("Could not determine document type".to_string());
        } else {
            for entry in self.vocabulary.fields_for(document_type) {
                if mappings.get(entry.field).is_none() {
                    warnings.push(format!(
                        "Could not extract {}",
                        self.vocabulary.display_name(entry.field)
                    ));
                }
            }
        }

        debug!(
            "Extracted {} fields with {} warnings",
            mappings.len(),
            warnings.len()
        );

        ExtractionResult {
            document_type,
            mappings,
            raw_text: text.to_string(),
            warnings,
            processing_time_ms: start.map_or(0, |s| s.elapsed().as_millis() as u64),
        }
    }
}

// `Instant::now` panics on wasm32-unknown-unknown.
#[cfg(not(target_arch = "wasm32"))]
fn now() -> Option<Instant> {
    Some(Instant::now())
}

#[cfg(target_arch = "wasm32")]
fn now() -> Option<Instant> {
    None
}

impl Default for StatementParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementExtractor for StatementParser {
    fn extract(&self, ocr_result: &OcrResult) -> ExtractionResult {
        let mut result = self.parse(&ocr_result.text);
        result.processing_time_ms += ocr_result.processing_time_ms;
        result
    }

    fn extract_from_text(&self, text: &str) -> ExtractionResult {
        self.parse(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::rules::FieldAliases;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    const BALANCE_SHEET: &str = r#"
        STATE CO-OPERATIVE BANK LTD
        BALANCE SHEET AS AT 31 MARCH 2024
        (₹ in crore)

        Total Assets            48,250.75 cr
        Interest earning assets 41,100 cr
        Cash and cash equivalents
        ₹ 2,315.40 Cr
        Gross advances          29,870.25 cr
        Gross NPA               896.10 cr
        Provision for NPA       610.35 cr
        Total deposits          38,400 cr
        Shareholders equity     4,120.60 cr
        Risk weighted assets    27,500 cr
        Tier 1 capital          3,300 cr
        Tier 2 capital          520 cr
    "#;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_balance_sheet() {
        let parser = StatementParser::new();
        let result = parser.parse(BALANCE_SHEET);

        assert_eq!(result.document_type, DocumentType::BalanceSheet);
        let value = |field| result.mappings.get(field).map(|m| m.value);
        assert_eq!(value(FieldKey::TotalAssets), Some(dec("48250.75")));
        assert_eq!(value(FieldKey::InterestEarningAssets), Some(dec("41100")));
        assert_eq!(value(FieldKey::CashEquivalents), Some(dec("2315.40")));
        assert_eq!(value(FieldKey::GrossAdvances), Some(dec("29870.25")));
        assert_eq!(value(FieldKey::GrossNpas), Some(dec("896.10")));
        assert_eq!(value(FieldKey::ProvisionsNpas), Some(dec("610.35")));
        assert_eq!(value(FieldKey::Deposits), Some(dec("38400")));
        assert_eq!(value(FieldKey::ShareholdersEquity), Some(dec("4120.60")));
        assert_eq!(value(FieldKey::RiskWeightedAssets), Some(dec("27500")));
        // The first number on the line wins, so the tier digit in the label
        // is read as a bare amount and scaled down like any other.
        assert_eq!(value(FieldKey::Tier1Capital), Some(dec("0.0000001")));
        assert_eq!(value(FieldKey::Tier2Capital), Some(dec("0.0000002")));

        assert!(result.warnings.contains(&"Could not extract External Debt".to_string()));
        assert!(result.warnings.contains(&"Could not extract Total Liabilities".to_string()));
    }

    #[test]
    fn test_parse_roman_tier_labels() {
        let text = "Balance sheet\nTier I capital 3,300 cr\nTier II capital 520 cr";
        let result = StatementParser::new().parse(text);

        let tier1 = result.mappings.get(FieldKey::Tier1Capital).unwrap();
        assert_eq!(tier1.value, dec("3300"));
        assert_eq!(tier1.line_index, 1);
        assert_eq!(result.mappings.get(FieldKey::Tier2Capital).unwrap().value, dec("520"));
    }

    #[test]
    fn test_unknown_document() {
        let result = StatementParser::new().parse("Minutes of the annual general meeting\n12 members present");
        assert_eq!(result.document_type, DocumentType::Unknown);
        assert!(result.mappings.is_empty());
        assert_eq!(result.warnings, vec!["Could not determine document type".to_string()]);
    }

    #[test]
    fn test_parse_as_overrides_classification() {
        let text = "Net profit 120 cr\nTotal assets 9,000 cr";
        let parser = StatementParser::new();

        assert_eq!(parser.parse(text).document_type, DocumentType::IncomeStatement);

        let forced = parser.parse_as(text, DocumentType::BalanceSheet);
        assert_eq!(forced.document_type, DocumentType::BalanceSheet);
        assert_eq!(forced.mappings.get(FieldKey::TotalAssets).unwrap().value, dec("9000"));
        assert!(forced.mappings.get(FieldKey::NetIncome).is_none());
    }

    #[test]
    fn test_custom_vocabulary() {
        let mut vocabulary = Vocabulary::empty();
        vocabulary.income_statement.push(FieldAliases {
            field: FieldKey::NetIncome,
            aliases: vec!["pat".to_string()],
        });
        let parser = StatementParser::new().with_vocabulary(vocabulary);

        let result = parser.parse_as("PAT for the year 77 cr", DocumentType::IncomeStatement);
        let mapping = result.mappings.get(FieldKey::NetIncome).unwrap();
        assert_eq!(mapping.value, dec("77"));
        assert_eq!(mapping.field_name, "Net Income");
    }

    #[test]
    fn test_session_correct_and_apply() {
        let mut result = StatementParser::new().parse("Income statement\nNet profit 45.5 cr");
        assert_eq!(result.document_type, DocumentType::IncomeStatement);

        result.correct(FieldKey::NetIncome, dec("46.25")).unwrap();
        assert_eq!(
            result.correct(FieldKey::InterestIncome, dec("1")),
            Err(ExtractionError::MissingField("interest_income".to_string()))
        );

        let mut inputs = FinancialInputs::new();
        assert_eq!(result.apply_to(&mut inputs), 1);
        assert_eq!(inputs.get(FieldKey::NetIncome), dec("46.25"));
        assert_eq!(
            result.form_values().get(&FieldKey::NetIncome).map(String::as_str),
            Some("46.25")
        );

        result.clear();
        assert!(result.mappings.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_from_config_lookahead() {
        let mut config = FinstatConfig::default();
        config.extraction.lookahead_lines = 0;
        let parser = StatementParser::from_config(&config).unwrap();

        let result = parser.parse_as("Total assets\n1,200 cr", DocumentType::BalanceSheet);
        assert!(result.mappings.get(FieldKey::TotalAssets).is_none());
    }

    #[test]
    fn test_from_config_missing_vocabulary_file() {
        let mut config = FinstatConfig::default();
        config.extraction.vocabulary_path = Some("/nonexistent/vocabulary.json".into());
        assert!(StatementParser::from_config(&config).is_err());
    }

    #[test]
    fn test_extract_adds_ocr_time() {
        let ocr = OcrResult {
            boxes: Vec::new(),
            text: "Balance sheet\nTotal assets 10 cr".to_string(),
            processing_time_ms: 250,
            image_size: (800, 600),
        };
        let result = StatementParser::new().extract(&ocr);
        assert!(result.processing_time_ms >= 250);
        assert_eq!(result.mappings.len(), 1);
    }
}
