//! Keyword-driven field matching over line-oriented OCR text.

use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::models::field::DocumentType;
use crate::models::mapping::{FieldMapping, FieldMappings};

use super::amounts::normalize_amount;
use super::confidence::score_confidence;
use super::vocabulary::Vocabulary;

/// Lines searched after a keyword line when it carries no number.
pub const DEFAULT_LOOKAHEAD: usize = 3;

/// A trimmed, non-empty line of OCR output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawLine<'a> {
    /// Position among the non-empty lines.
    pub index: usize,
    pub text: &'a str,
}

/// Split text into trimmed, non-empty lines.
pub fn split_lines(text: &str) -> Vec<RawLine<'_>> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .enumerate()
        .map(|(index, text)| RawLine { index, text })
        .collect()
}

/// First amount on the line at `start` or on one of the `lookahead` lines
/// after it, with the index of the line it came from.
fn find_amount(lines: &[RawLine<'_>], start: usize, lookahead: usize) -> Option<(usize, Decimal)> {
    lines
        .iter()
        .skip(start)
        .take(lookahead.saturating_add(1))
        .find_map(|line| normalize_amount(line.text).map(|value| (line.index, value)))
}

/// Field matcher for one vocabulary.
pub struct FieldMatcher<'v> {
    vocabulary: &'v Vocabulary,
    lookahead: usize,
}

impl<'v> FieldMatcher<'v> {
    pub fn new(vocabulary: &'v Vocabulary) -> Self {
        Self {
            vocabulary,
            lookahead: DEFAULT_LOOKAHEAD,
        }
    }

    /// Set how many following lines are searched for a number.
    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead;
        self
    }

    /// Extract fields from text using the vocabulary of `document_type`.
    ///
    /// Every (line, field, alias) hit yields at most one candidate; the store
    /// keeps the most confident candidate per field, the earliest on ties.
    pub fn extract(&self, text: &str, document_type: DocumentType) -> FieldMappings {
        let lines = split_lines(text);
        let fields = self.vocabulary.fields_for(document_type);
        let mut mappings = FieldMappings::new();

        for (pos, line) in lines.iter().enumerate() {
            let lower = line.text.to_lowercase();

            for entry in fields {
                for alias in &entry.aliases {
                    if !lower.contains(alias.as_str()) {
                        continue;
                    }

                    let Some((value_line_index, value)) = find_amount(&lines, pos, self.lookahead)
                    else {
                        trace!("No amount near '{}' on line {}", alias, line.index);
                        continue;
                    };

                    let confidence = score_confidence(&lower, alias, value);
                    mappings.offer(FieldMapping {
                        field: entry.field,
                        value,
                        original_text: line.text.to_string(),
                        line_index: line.index,
                        value_line_index,
                        confidence,
                        field_name: self.vocabulary.display_name(entry.field),
                    });
                }
            }
        }

        debug!(
            "Matched {} of {} {} fields over {} lines",
            mappings.len(),
            fields.len(),
            document_type,
            lines.len()
        );

        mappings
    }
}

/// Extract fields with the default lookahead.
pub fn extract_fields(text: &str, document_type: DocumentType, vocabulary: &Vocabulary) -> FieldMappings {
    FieldMatcher::new(vocabulary).extract(text, document_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::field::FieldKey;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_split_lines_skips_blanks() {
        let lines = split_lines("  A  \n\n   \nB\r\n");
        assert_eq!(
            lines,
            vec![RawLine { index: 0, text: "A" }, RawLine { index: 1, text: "B" }]
        );
    }

    #[test]
    fn test_value_on_following_line() {
        let vocabulary = Vocabulary::default();
        let mappings = extract_fields(
            "Total Assets\n₹ 1,234.56 Cr",
            DocumentType::BalanceSheet,
            &vocabulary,
        );

        let m = mappings.get(FieldKey::TotalAssets).unwrap();
        assert_eq!(m.value, dec("1234.56"));
        assert!(m.confidence > 0.0);
        assert_eq!(m.line_index, 0);
        assert_eq!(m.value_line_index, 1);
        assert!(m.from_lookahead());
        assert_eq!(m.original_text, "Total Assets");
        assert_eq!(m.field_name, "Total Assets");
    }

    #[test]
    fn test_lookahead_limit() {
        let vocabulary = Vocabulary::default();
        let text = "Deposits\n----\n====\n|  |\n500 cr";
        let mappings = extract_fields(text, DocumentType::BalanceSheet, &vocabulary);
        assert!(mappings.get(FieldKey::Deposits).is_none());

        let wider = FieldMatcher::new(&vocabulary)
            .with_lookahead(4)
            .extract(text, DocumentType::BalanceSheet);
        assert_eq!(wider.get(FieldKey::Deposits).unwrap().value, dec("500"));
    }

    #[test]
    fn test_unbounded_lookahead() {
        let vocabulary = Vocabulary::default();
        let matcher = FieldMatcher::new(&vocabulary).with_lookahead(usize::MAX);

        let mappings = matcher.extract("Total assets\n1,200 cr", DocumentType::BalanceSheet);
        let m = mappings.get(FieldKey::TotalAssets).unwrap();
        assert_eq!(m.value, dec("1200"));
        assert_eq!(m.value_line_index, 1);

        let same_line = matcher.extract("Deposits 800 cr", DocumentType::BalanceSheet);
        assert_eq!(same_line.get(FieldKey::Deposits).unwrap().value, dec("800"));
    }

    #[test]
    fn test_noise_lines_within_lookahead() {
        let vocabulary = Vocabulary::default();
        let text = "Deposits\n----\n====\n500 cr";
        let mappings = extract_fields(text, DocumentType::BalanceSheet, &vocabulary);
        let m = mappings.get(FieldKey::Deposits).unwrap();
        assert_eq!(m.value, dec("500"));
        assert_eq!(m.value_line_index, 3);
    }

    #[test]
    fn test_higher_confidence_later_match_replaces() {
        let vocabulary = Vocabulary::default();
        // Zero scores 0.6; 1,200 cr scores 1.0.
        let text = "Total assets 0\nNotes\nTotal assets 1,200 cr";
        let mappings = extract_fields(text, DocumentType::BalanceSheet, &vocabulary);
        let m = mappings.get(FieldKey::TotalAssets).unwrap();
        assert_eq!(m.value, dec("1200"));
        assert_eq!(m.original_text, "Total assets 1,200 cr");
        assert!((m.confidence - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_lower_confidence_later_match_ignored() {
        let vocabulary = Vocabulary::default();
        let text = "Total assets 1,200 cr\nTotal assets 0";
        let mappings = extract_fields(text, DocumentType::BalanceSheet, &vocabulary);
        assert_eq!(mappings.get(FieldKey::TotalAssets).unwrap().value, dec("1200"));
    }

    #[test]
    fn test_unknown_document_has_no_mappings() {
        let vocabulary = Vocabulary::default();
        let mappings = extract_fields("Total assets 1,200 cr", DocumentType::Unknown, &vocabulary);
        assert!(mappings.is_empty());
    }

    #[test]
    fn test_vocabulary_follows_document_type() {
        let vocabulary = Vocabulary::default();
        let text = "Total assets 1,200 cr\nNet profit 45 cr";

        let bs = extract_fields(text, DocumentType::BalanceSheet, &vocabulary);
        assert!(bs.get(FieldKey::TotalAssets).is_some());
        assert!(bs.get(FieldKey::NetIncome).is_none());

        let is = extract_fields(text, DocumentType::IncomeStatement, &vocabulary);
        assert!(is.get(FieldKey::TotalAssets).is_none());
        assert_eq!(is.get(FieldKey::NetIncome).unwrap().value, dec("45"));
    }

    #[test]
    fn test_income_statement_fields() {
        let vocabulary = Vocabulary::default();
        let text = "\
            Profit and Loss Account for the year\n\
            Interest earned 9,450.25 cr\n\
            Interest expended 5,120.10 cr\n\
            Operating expenses 1,980 cr\n\
            Net profit 1,045.75 cr\n";
        let mappings = extract_fields(text, DocumentType::IncomeStatement, &vocabulary);

        assert_eq!(mappings.get(FieldKey::InterestIncome).unwrap().value, dec("9450.25"));
        assert_eq!(mappings.get(FieldKey::InterestExpense).unwrap().value, dec("5120.10"));
        assert_eq!(mappings.get(FieldKey::OperatingExpenses).unwrap().value, dec("1980"));
        assert_eq!(mappings.get(FieldKey::NetIncome).unwrap().value, dec("1045.75"));
    }

    #[test]
    fn test_deterministic() {
        let vocabulary = Vocabulary::default();
        let text = "Balance Sheet\nTotal Assets\n1,200 cr\nDeposits 900 cr\nAdvances 700 cr";
        let first = extract_fields(text, DocumentType::BalanceSheet, &vocabulary);
        let second = extract_fields(text, DocumentType::BalanceSheet, &vocabulary);
        assert_eq!(first, second);
    }
}
