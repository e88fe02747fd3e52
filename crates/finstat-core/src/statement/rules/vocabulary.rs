//! Keyword vocabularies and display names for statement line items.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::field::{humanize_key, DocumentType, FieldKey};

/// Aliases for one line item, lowercase, tried in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAliases {
    pub field: FieldKey,
    pub aliases: Vec<String>,
}

impl FieldAliases {
    fn new(field: FieldKey, aliases: &[&str]) -> Self {
        Self {
            field,
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Keyword tables for both statement types plus display names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub balance_sheet: Vec<FieldAliases>,
    pub income_statement: Vec<FieldAliases>,
    pub display_names: BTreeMap<FieldKey, String>,
}

impl Vocabulary {
    /// Vocabulary with no keywords and no display names.
    pub fn empty() -> Self {
        Self {
            balance_sheet: Vec::new(),
            income_statement: Vec::new(),
            display_names: BTreeMap::new(),
        }
    }

    /// Load a vocabulary from a JSON file.
    ///
    /// Aliases are lowercased on load so matching against lowercased lines
    /// stays a plain substring test.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut vocabulary: Self = serde_json::from_str(&content)?;
        for entry in vocabulary
            .balance_sheet
            .iter_mut()
            .chain(vocabulary.income_statement.iter_mut())
        {
            for alias in &mut entry.aliases {
                *alias = alias.trim().to_lowercase();
            }
            entry.aliases.retain(|a| !a.is_empty());
        }
        Ok(vocabulary)
    }

    /// Fields consulted for a document type. Empty for unknown documents.
    pub fn fields_for(&self, document_type: DocumentType) -> &[FieldAliases] {
        match document_type {
            DocumentType::BalanceSheet => &self.balance_sheet,
            DocumentType::IncomeStatement => &self.income_statement,
            DocumentType::Unknown => &[],
        }
    }

    /// Display name of a field, falling back to the humanized key.
    pub fn display_name(&self, field: FieldKey) -> String {
        self.display_names
            .get(&field)
            .cloned()
            .unwrap_or_else(|| humanize_key(field.as_str()))
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        use FieldKey::*;

        let balance_sheet = vec![
            FieldAliases::new(TotalAssets, &["total assets", "total asset"]),
            FieldAliases::new(
                InterestEarningAssets,
                &["interest earning assets", "interest-earning assets", "earning assets"],
            ),
            FieldAliases::new(
                CashEquivalents,
                &["cash and cash equivalents", "cash equivalents", "cash and balances"],
            ),
            FieldAliases::new(
                ShortTermInvestments,
                &["short term investments", "short-term investments", "current investments"],
            ),
            FieldAliases::new(
                GrossAdvances,
                &["gross advances", "loans and advances", "gross loans", "advances"],
            ),
            FieldAliases::new(
                GrossNpas,
                &["gross npa", "gross non-performing", "gross non performing"],
            ),
            FieldAliases::new(
                ProvisionsNpas,
                &["provision for npa", "provisions for npa", "npa provisions"],
            ),
            FieldAliases::new(TotalLiabilities, &["total liabilities"]),
            FieldAliases::new(Deposits, &["total deposits", "deposits"]),
            FieldAliases::new(
                ExternalDebt,
                &["external debt", "external borrowings", "borrowings"],
            ),
            FieldAliases::new(
                ShareholdersEquity,
                &["shareholders equity", "shareholders' equity", "total equity", "net worth"],
            ),
            FieldAliases::new(
                RiskWeightedAssets,
                &["risk weighted assets", "risk-weighted assets"],
            ),
            FieldAliases::new(Tier1Capital, &["tier 1 capital", "tier1 capital", "tier i capital"]),
            FieldAliases::new(Tier2Capital, &["tier 2 capital", "tier2 capital", "tier ii capital"]),
        ];

        let income_statement = vec![
            FieldAliases::new(InterestIncome, &["interest income", "interest earned"]),
            FieldAliases::new(
                InterestExpense,
                &["interest expense", "interest expended", "interest paid"],
            ),
            FieldAliases::new(
                NonInterestIncome,
                &["non-interest income", "non interest income", "other income"],
            ),
            FieldAliases::new(
                OperatingIncome,
                &["operating income", "total income", "operating revenue"],
            ),
            FieldAliases::new(
                OperatingExpenses,
                &["operating expenses", "operating costs", "opex"],
            ),
            FieldAliases::new(
                ProvisionsWriteoffs,
                &["provisions and contingencies", "write-offs", "write offs", "provisions"],
            ),
            FieldAliases::new(
                NetIncome,
                &["net income", "net profit", "profit after tax"],
            ),
        ];

        let display_names = [
            (TotalAssets, "Total Assets"),
            (InterestEarningAssets, "Interest Earning Assets"),
            (CashEquivalents, "Cash & Cash Equivalents"),
            (ShortTermInvestments, "Short-term Investments"),
            (GrossAdvances, "Gross Advances"),
            (GrossNpas, "Gross NPAs"),
            (ProvisionsNpas, "Provisions for NPAs"),
            (TotalLiabilities, "Total Liabilities"),
            (Deposits, "Deposits"),
            (ExternalDebt, "External Debt"),
            (ShareholdersEquity, "Shareholders' Equity"),
            (RiskWeightedAssets, "Risk Weighted Assets"),
            (Tier1Capital, "Tier 1 Capital"),
            (Tier2Capital, "Tier 2 Capital"),
            (InterestIncome, "Interest Income"),
            (InterestExpense, "Interest Expense"),
            (NonInterestIncome, "Non-Interest Income"),
            (OperatingIncome, "Operating Income"),
            (OperatingExpenses, "Operating Expenses"),
            (ProvisionsWriteoffs, "Provisions & Write-offs"),
            (NetIncome, "Net Income"),
        ]
        .into_iter()
        .map(|(field, name)| (field, name.to_string()))
        .collect();

        Self {
            balance_sheet,
            income_statement,
            display_names,
        }
    }
}
