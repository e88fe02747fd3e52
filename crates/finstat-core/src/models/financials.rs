//! Manual-input form backing the ratio analysis.
//!
//! All amounts are in crores. Fields that were never filled in are zero,
//! which the analysis treats as "not available".

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::field::FieldKey;

/// Prior-period figures used for growth ratios.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorPeriod {
    /// Assets under management (total assets) last period.
    pub aum: Decimal,
    /// Gross loans last period.
    pub loans: Decimal,
    /// Deposits last period.
    pub deposits: Decimal,
    /// Operating income last period.
    pub operating_income: Decimal,
}

/// Current-period statement figures plus the prior period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialInputs {
    // Balance sheet
    pub total_assets: Decimal,
    pub interest_earning_assets: Decimal,
    pub cash_equivalents: Decimal,
    pub short_term_investments: Decimal,
    pub gross_advances: Decimal,
    pub gross_npas: Decimal,
    pub provisions_npas: Decimal,
    pub total_liabilities: Decimal,
    pub deposits: Decimal,
    pub external_debt: Decimal,
    pub shareholders_equity: Decimal,
    pub risk_weighted_assets: Decimal,
    pub tier1_capital: Decimal,
    pub tier2_capital: Decimal,

    // Income statement
    pub interest_income: Decimal,
    pub interest_expense: Decimal,
    pub non_interest_income: Decimal,
    pub operating_income: Decimal,
    pub operating_expenses: Decimal,
    pub provisions_writeoffs: Decimal,
    pub net_income: Decimal,

    /// Previous period data.
    pub previous: PriorPeriod,
}

macro_rules! field_slots {
    ($($key:ident => $name:ident),* $(,)?) => {
        impl FinancialInputs {
            /// Current value of a line item.
            pub fn get(&self, field: FieldKey) -> Decimal {
                match field {
                    $(FieldKey::$key => self.$name,)*
                }
            }

            /// Set a line item.
            pub fn set(&mut self, field: FieldKey, value: Decimal) {
                match field {
                    $(FieldKey::$key => self.$name = value,)*
                }
            }
        }
    };
}

field_slots! {
    TotalAssets => total_assets,
    InterestEarningAssets => interest_earning_assets,
    CashEquivalents => cash_equivalents,
    ShortTermInvestments => short_term_investments,
    GrossAdvances => gross_advances,
    GrossNpas => gross_npas,
    ProvisionsNpas => provisions_npas,
    TotalLiabilities => total_liabilities,
    Deposits => deposits,
    ExternalDebt => external_debt,
    ShareholdersEquity => shareholders_equity,
    RiskWeightedAssets => risk_weighted_assets,
    Tier1Capital => tier1_capital,
    Tier2Capital => tier2_capital,
    InterestIncome => interest_income,
    InterestExpense => interest_expense,
    NonInterestIncome => non_interest_income,
    OperatingIncome => operating_income,
    OperatingExpenses => operating_expenses,
    ProvisionsWriteoffs => provisions_writeoffs,
    NetIncome => net_income,
}

impl FinancialInputs {
    /// Create an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset every value, including the prior period, to zero.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Load a form from a JSON file. Missing keys default to zero.
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_every_field() {
        let mut inputs = FinancialInputs::new();
        for (i, field) in FieldKey::all().enumerate() {
            inputs.set(field, Decimal::from(i as i64 + 1));
        }
        for (i, field) in FieldKey::all().enumerate() {
            assert_eq!(inputs.get(field), Decimal::from(i as i64 + 1));
        }
    }

    #[test]
    fn test_clear() {
        let mut inputs = FinancialInputs::new();
        inputs.set(FieldKey::NetIncome, Decimal::from(10));
        inputs.previous.aum = Decimal::from(5);
        inputs.clear();
        assert_eq!(inputs, FinancialInputs::default());
    }

    #[test]
    fn test_partial_json_defaults_to_zero() {
        let inputs: FinancialInputs =
            serde_json::from_str(r#"{"total_assets": "1200.5", "previous": {"aum": 1000}}"#).unwrap();
        assert_eq!(inputs.total_assets, Decimal::new(12005, 1));
        assert_eq!(inputs.previous.aum, Decimal::from(1000));
        assert!(inputs.deposits.is_zero());
    }
}
