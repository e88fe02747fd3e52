//! Statement type classification by keyword presence.

use tracing::debug;

use crate::models::field::DocumentType;

/// Phrases that indicate a balance sheet.
pub const BALANCE_SHEET_KEYWORDS: [&str; 5] = [
    "balance sheet",
    "total assets",
    "liabilities",
    "shareholders",
    "advances",
];

/// Phrases that indicate an income statement.
pub const INCOME_STATEMENT_KEYWORDS: [&str; 5] = [
    "income statement",
    "profit and loss",
    "interest income",
    "operating expenses",
    "net profit",
];

/// Keyword hit counts for each statement type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocumentScores {
    pub balance_sheet: usize,
    pub income_statement: usize,
}

impl DocumentScores {
    /// Count distinct keywords present in the text. Repeats count once.
    pub fn score(text: &str) -> Self {
        let lower = text.to_lowercase();
        let hits = |keywords: &[&str]| keywords.iter().filter(|k| lower.contains(*k)).count();

        Self {
            balance_sheet: hits(&BALANCE_SHEET_KEYWORDS),
            income_statement: hits(&INCOME_STATEMENT_KEYWORDS),
        }
    }

    /// Balance sheet only on a strict majority; equal nonzero scores go to
    /// the income statement.
    pub fn document_type(&self) -> DocumentType {
        if self.balance_sheet > self.income_statement {
            DocumentType::BalanceSheet
        } else if self.income_statement > 0 {
            DocumentType::IncomeStatement
        } else {
            DocumentType::Unknown
        }
    }
}

/// Classify statement text.
pub fn classify_document(text: &str) -> DocumentType {
    let scores = DocumentScores::score(text);
    let document_type = scores.document_type();
    debug!(
        "Classified as {} (balance sheet {}, income statement {})",
        document_type, scores.balance_sheet, scores.income_statement
    );
    document_type
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_sheet_majority() {
        let text = "ABC Bank Ltd\nBALANCE SHEET as at 31 March\nTotal Assets 1,200 cr\nAdvances 800 cr\nInterest income 90 cr";
        let scores = DocumentScores::score(text);
        assert_eq!(scores, DocumentScores { balance_sheet: 3, income_statement: 1 });
        assert_eq!(classify_document(text), DocumentType::BalanceSheet);
    }

    #[test]
    fn test_tie_goes_to_income_statement() {
        let text = "Total assets 10\nNet profit 2";
        assert_eq!(
            DocumentScores::score(text),
            DocumentScores { balance_sheet: 1, income_statement: 1 }
        );
        assert_eq!(classify_document(text), DocumentType::IncomeStatement);
    }

    #[test]
    fn test_no_keywords_is_unknown() {
        assert_eq!(classify_document("Quarterly newsletter\nBranch openings"), DocumentType::Unknown);
        assert_eq!(classify_document(""), DocumentType::Unknown);
    }

    #[test]
    fn test_repeats_count_once() {
        let text = "net profit\nNET PROFIT\nnet profit\nliabilities";
        assert_eq!(
            DocumentScores::score(text),
            DocumentScores { balance_sheet: 1, income_statement: 1 }
        );
    }

    #[test]
    fn test_income_statement() {
        let text = "Profit and Loss Account\nInterest income 500\nOperating expenses 120\nNet profit 80";
        assert_eq!(classify_document(text), DocumentType::IncomeStatement);
    }

    #[test]
    fn test_deterministic() {
        let text = "Balance sheet\nTotal assets\nNet profit";
        let first = classify_document(text);
        for _ in 0..5 {
            assert_eq!(classify_document(text), first);
        }
    }
}
