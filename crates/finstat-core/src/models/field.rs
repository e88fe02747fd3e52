//! Financial line items and statement types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

/// Type of financial statement a document was classified as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Balance sheet (assets, liabilities, capital).
    BalanceSheet,
    /// Income statement (profit and loss account).
    IncomeStatement,
    /// Could not be determined.
    #[default]
    Unknown,
}

impl DocumentType {
    /// Stable snake_case identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BalanceSheet => "balance_sheet",
            Self::IncomeStatement => "income_statement",
            Self::Unknown => "unknown",
        }
    }

    /// Human-readable label for review screens.
    pub fn label(&self) -> &'static str {
        match self {
            Self::BalanceSheet => "Balance Sheet",
            Self::IncomeStatement => "Income Statement",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "balance_sheet" | "bs" => Ok(Self::BalanceSheet),
            "income_statement" | "is" | "profit_and_loss" | "pnl" => Ok(Self::IncomeStatement),
            "unknown" => Ok(Self::Unknown),
            _ => Err(ExtractionError::UnknownDocumentType(s.to_string())),
        }
    }
}

/// A recognized financial statement line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    // Balance sheet
    TotalAssets,
    InterestEarningAssets,
    CashEquivalents,
    ShortTermInvestments,
    GrossAdvances,
    GrossNpas,
    ProvisionsNpas,
    TotalLiabilities,
    Deposits,
    ExternalDebt,
    ShareholdersEquity,
    RiskWeightedAssets,
    #[serde(rename = "tier1_capital")]
    Tier1Capital,
    #[serde(rename = "tier2_capital")]
    Tier2Capital,

    // Income statement
    InterestIncome,
    InterestExpense,
    NonInterestIncome,
    OperatingIncome,
    OperatingExpenses,
    ProvisionsWriteoffs,
    NetIncome,
}

impl FieldKey {
    /// Balance sheet line items, in form order.
    pub const BALANCE_SHEET: [FieldKey; 14] = [
        Self::TotalAssets,
        Self::InterestEarningAssets,
        Self::CashEquivalents,
        Self::ShortTermInvestments,
        Self::GrossAdvances,
        Self::GrossNpas,
        Self::ProvisionsNpas,
        Self::TotalLiabilities,
        Self::Deposits,
        Self::ExternalDebt,
        Self::ShareholdersEquity,
        Self::RiskWeightedAssets,
        Self::Tier1Capital,
        Self::Tier2Capital,
    ];

    /// Income statement line items, in form order.
    pub const INCOME_STATEMENT: [FieldKey; 7] = [
        Self::InterestIncome,
        Self::InterestExpense,
        Self::NonInterestIncome,
        Self::OperatingIncome,
        Self::OperatingExpenses,
        Self::ProvisionsWriteoffs,
        Self::NetIncome,
    ];

    /// All line items.
    pub fn all() -> impl Iterator<Item = FieldKey> {
        Self::BALANCE_SHEET
            .into_iter()
            .chain(Self::INCOME_STATEMENT)
    }

    /// Stable snake_case identifier (matches the serde name).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TotalAssets => "total_assets",
            Self::InterestEarningAssets => "interest_earning_assets",
            Self::CashEquivalents => "cash_equivalents",
            Self::ShortTermInvestments => "short_term_investments",
            Self::GrossAdvances => "gross_advances",
            Self::GrossNpas => "gross_npas",
            Self::ProvisionsNpas => "provisions_npas",
            Self::TotalLiabilities => "total_liabilities",
            Self::Deposits => "deposits",
            Self::ExternalDebt => "external_debt",
            Self::ShareholdersEquity => "shareholders_equity",
            Self::RiskWeightedAssets => "risk_weighted_assets",
            Self::Tier1Capital => "tier1_capital",
            Self::Tier2Capital => "tier2_capital",
            Self::InterestIncome => "interest_income",
            Self::InterestExpense => "interest_expense",
            Self::NonInterestIncome => "non_interest_income",
            Self::OperatingIncome => "operating_income",
            Self::OperatingExpenses => "operating_expenses",
            Self::ProvisionsWriteoffs => "provisions_writeoffs",
            Self::NetIncome => "net_income",
        }
    }

    /// Statement the line item is read from.
    pub fn statement(&self) -> DocumentType {
        if Self::BALANCE_SHEET.contains(self) {
            DocumentType::BalanceSheet
        } else {
            DocumentType::IncomeStatement
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKey {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Self::all()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| ExtractionError::UnknownField(s.to_string()))
    }
}

/// Turn a field key into a display label: separators become spaces and each
/// word is capitalized (`gross_npas` -> `Gross Npas`).
pub fn humanize_key(key: &str) -> String {
    key.split(['_', '-'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_defaults_to_unknown() {
        assert_eq!(DocumentType::default(), DocumentType::Unknown);
    }

    #[test]
    fn test_field_key_round_trips_through_str() {
        for key in FieldKey::all() {
            assert_eq!(key.as_str().parse::<FieldKey>().unwrap(), key);
        }
        assert_eq!(FieldKey::all().count(), 21);
    }

    #[test]
    fn test_field_key_serde_name_matches_as_str() {
        for key in FieldKey::all() {
            let json = serde_json::to_string(&key).unwrap();
            assert_eq!(json, format!("\"{}\"", key.as_str()));
        }
    }

    #[test]
    fn test_unknown_field_key() {
        assert_eq!(
            "goodwill".parse::<FieldKey>(),
            Err(ExtractionError::UnknownField("goodwill".to_string()))
        );
    }

    #[test]
    fn test_field_statement() {
        assert_eq!(FieldKey::Tier2Capital.statement(), DocumentType::BalanceSheet);
        assert_eq!(FieldKey::NetIncome.statement(), DocumentType::IncomeStatement);
    }

    #[test]
    fn test_document_type_parsing() {
        assert_eq!("balance-sheet".parse::<DocumentType>().unwrap(), DocumentType::BalanceSheet);
        assert!("P&L".parse::<DocumentType>().is_err());
        assert_eq!("income statement".parse::<DocumentType>().unwrap(), DocumentType::IncomeStatement);
    }

    #[test]
    fn test_humanize_key() {
        assert_eq!(humanize_key("total_assets"), "Total Assets");
        assert_eq!(humanize_key("tier1_capital"), "Tier1 Capital");
        assert_eq!(humanize_key("non-interest_income"), "Non Interest Income");
        assert_eq!(humanize_key(""), "");
    }
}
