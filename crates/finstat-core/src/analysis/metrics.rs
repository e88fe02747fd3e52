//! Banking ratio definitions and benchmark grading.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::financials::FinancialInputs;

/// Report section a metric belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricCategory {
    Growth,
    Profitability,
    AssetQuality,
    Efficiency,
    CapitalAdequacy,
    Liquidity,
}

impl MetricCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Growth => "Growth Metrics",
            Self::Profitability => "Profitability",
            Self::AssetQuality => "Asset Quality",
            Self::Efficiency => "Efficiency",
            Self::CapitalAdequacy => "Capital Adequacy",
            Self::Liquidity => "Liquidity",
        }
    }
}

impl fmt::Display for MetricCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a value is compared with its thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grading {
    HigherIsBetter,
    LowerIsBetter,
    /// Best inside 70-80, widening to 65-85 and 60-90.
    TargetRange,
}

/// Benchmark grade of a calculated metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Poor,
    Average,
    Good,
    Excellent,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Poor => "Poor",
            Self::Average => "Average",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Standardized banking ratios, all expressed in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    AumGrowth,
    LoanGrowth,
    DepositGrowth,
    OpIncomeGrowth,
    Nim,
    GrossNim,
    Roa,
    Roe,
    PppRatio,
    GrossNpa,
    NetNpa,
    CreditCost,
    ProvisionCoverage,
    EfficiencyRatio,
    CostToIncome,
    Car,
    ExternalDebtTnw,
    LoanToDeposit,
}

fn pct(mantissa: i64, scale: u32) -> Decimal {
    Decimal::new(mantissa, scale)
}

/// `numerator / denominator * 100`, or zero when the denominator is not
/// positive or the result does not fit.
fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    numerator
        .checked_div(denominator)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

/// Growth of `current` over `previous` in percent.
fn growth(current: Decimal, previous: Decimal) -> Decimal {
    match current.checked_sub(previous) {
        Some(delta) => ratio(delta, previous),
        None => Decimal::ZERO,
    }
}

impl Metric {
    /// Every metric in report order.
    pub const ALL: [Metric; 18] = [
        Self::AumGrowth,
        Self::LoanGrowth,
        Self::DepositGrowth,
        Self::OpIncomeGrowth,
        Self::Nim,
        Self::GrossNim,
        Self::Roa,
        Self::Roe,
        Self::PppRatio,
        Self::GrossNpa,
        Self::NetNpa,
        Self::CreditCost,
        Self::ProvisionCoverage,
        Self::EfficiencyRatio,
        Self::CostToIncome,
        Self::Car,
        Self::ExternalDebtTnw,
        Self::LoanToDeposit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AumGrowth => "aum_growth",
            Self::LoanGrowth => "loan_growth",
            Self::DepositGrowth => "deposit_growth",
            Self::OpIncomeGrowth => "op_income_growth",
            Self::Nim => "nim",
            Self::GrossNim => "gross_nim",
            Self::Roa => "roa",
            Self::Roe => "roe",
            Self::PppRatio => "ppp_ratio",
            Self::GrossNpa => "gross_npa",
            Self::NetNpa => "net_npa",
            Self::CreditCost => "credit_cost",
            Self::ProvisionCoverage => "provision_coverage",
            Self::EfficiencyRatio => "efficiency_ratio",
            Self::CostToIncome => "cost_to_income",
            Self::Car => "car",
            Self::ExternalDebtTnw => "external_debt_tnw",
            Self::LoanToDeposit => "loan_to_deposit",
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AumGrowth => "AUM Growth",
            Self::LoanGrowth => "Loan Growth",
            Self::DepositGrowth => "Deposit Growth",
            Self::OpIncomeGrowth => "Operating Income Growth",
            Self::Nim => "Net Interest Margin",
            Self::GrossNim => "Gross NIM",
            Self::Roa => "Return on Assets",
            Self::Roe => "Return on Equity",
            Self::PppRatio => "PPP % of Risk Assets",
            Self::GrossNpa => "Gross NPA",
            Self::NetNpa => "Net NPA",
            Self::CreditCost => "Credit Cost",
            Self::ProvisionCoverage => "Provision Coverage Ratio",
            Self::EfficiencyRatio => "Efficiency Ratio",
            Self::CostToIncome => "Cost-to-Income",
            Self::Car => "Capital Adequacy Ratio",
            Self::ExternalDebtTnw => "External Debt/TNW",
            Self::LoanToDeposit => "Loan-to-Deposit Ratio",
        }
    }

    pub fn category(&self) -> MetricCategory {
        match self {
            Self::AumGrowth | Self::LoanGrowth | Self::DepositGrowth | Self::OpIncomeGrowth => {
                MetricCategory::Growth
            }
            Self::Nim | Self::GrossNim | Self::Roa | Self::Roe | Self::PppRatio => {
                MetricCategory::Profitability
            }
            Self::GrossNpa | Self::NetNpa | Self::CreditCost | Self::ProvisionCoverage => {
                MetricCategory::AssetQuality
            }
            Self::EfficiencyRatio | Self::CostToIncome => MetricCategory::Efficiency,
            Self::Car | Self::ExternalDebtTnw => MetricCategory::CapitalAdequacy,
            Self::LoanToDeposit => MetricCategory::Liquidity,
        }
    }

    pub fn grading(&self) -> Grading {
        match self {
            Self::GrossNpa
            | Self::NetNpa
            | Self::CreditCost
            | Self::EfficiencyRatio
            | Self::CostToIncome
            | Self::ExternalDebtTnw => Grading::LowerIsBetter,
            Self::LoanToDeposit => Grading::TargetRange,
            _ => Grading::HigherIsBetter,
        }
    }

    /// Thresholds as `[poor, average, good]`.
    pub fn thresholds(&self) -> [Decimal; 3] {
        match self {
            Self::AumGrowth | Self::LoanGrowth | Self::DepositGrowth => {
                [pct(15, 0), pct(20, 0), pct(25, 0)]
            }
            Self::OpIncomeGrowth => [pct(12, 0), pct(18, 0), pct(24, 0)],
            Self::Nim => [pct(3, 0), pct(45, 1), pct(6, 0)],
            Self::GrossNim => [pct(7, 0), pct(10, 0), pct(12, 0)],
            Self::Roa => [pct(1, 0), pct(2, 0), pct(3, 0)],
            Self::Roe => [pct(12, 0), pct(18, 0), pct(25, 0)],
            Self::PppRatio => [pct(25, 1), pct(4, 0), pct(55, 1)],
            Self::GrossNpa => [pct(3, 0), pct(15, 1), pct(5, 1)],
            Self::NetNpa => [pct(1, 0), pct(5, 1), pct(1, 1)],
            Self::CreditCost => [pct(1, 0), pct(5, 1), pct(2, 1)],
            Self::ProvisionCoverage => [pct(70, 0), pct(85, 0), pct(95, 0)],
            Self::EfficiencyRatio => [pct(50, 0), pct(40, 0), pct(30, 0)],
            Self::CostToIncome => [pct(60, 0), pct(50, 0), pct(40, 0)],
            Self::Car => [pct(115, 1), pct(14, 0), pct(16, 0)],
            Self::ExternalDebtTnw => [pct(100, 0), pct(75, 0), pct(50, 0)],
            Self::LoanToDeposit => [pct(80, 0), pct(75, 0), pct(70, 0)],
        }
    }

    /// Benchmark text shown next to the value.
    pub fn benchmark(&self) -> String {
        let [_, _, good] = self.thresholds();
        match self.grading() {
            Grading::HigherIsBetter => format!(">= {}%", good.normalize()),
            Grading::LowerIsBetter => format!("<= {}%", good.normalize()),
            Grading::TargetRange => "70-80%".to_string(),
        }
    }

    /// Compute the metric in percent. Zero when a denominator is missing.
    pub fn compute(&self, inputs: &FinancialInputs) -> Decimal {
        let i = inputs;
        let prev = &inputs.previous;
        let net_interest_income = i.interest_income - i.interest_expense;

        match self {
            Self::AumGrowth => growth(i.total_assets, prev.aum),
            Self::LoanGrowth => growth(i.gross_advances, prev.loans),
            Self::DepositGrowth => growth(i.deposits, prev.deposits),
            Self::OpIncomeGrowth => growth(i.operating_income, prev.operating_income),
            Self::Nim => ratio(net_interest_income, i.interest_earning_assets),
            Self::GrossNim => ratio(i.interest_income, i.interest_earning_assets),
            Self::Roa => ratio(i.net_income, i.total_assets),
            Self::Roe => ratio(i.net_income, i.shareholders_equity),
            Self::PppRatio => ratio(
                i.operating_income - i.operating_expenses,
                i.risk_weighted_assets,
            ),
            Self::GrossNpa => ratio(i.gross_npas, i.gross_advances),
            Self::NetNpa => ratio(
                i.gross_npas - i.provisions_npas,
                i.gross_advances - i.provisions_npas,
            ),
            Self::CreditCost => ratio(i.provisions_writeoffs, i.risk_weighted_assets),
            Self::ProvisionCoverage => ratio(i.provisions_npas, i.gross_npas),
            Self::EfficiencyRatio => ratio(
                i.operating_expenses,
                net_interest_income + i.non_interest_income,
            ),
            Self::CostToIncome => ratio(i.operating_expenses, i.operating_income),
            Self::Car => ratio(i.tier1_capital + i.tier2_capital, i.risk_weighted_assets),
            Self::ExternalDebtTnw => ratio(i.external_debt, i.shareholders_equity),
            Self::LoanToDeposit => ratio(i.gross_advances, i.deposits),
        }
    }

    /// Grade a value. Zero means "not calculated" and has no grade.
    pub fn grade(&self, value: Decimal) -> Option<Status> {
        if value.is_zero() {
            return None;
        }
        let [poor, average, good] = self.thresholds();

        let status = match self.grading() {
            Grading::HigherIsBetter => {
                if value >= good {
                    Status::Excellent
                } else if value >= average {
                    Status::Good
                } else if value >= poor {
                    Status::Average
                } else {
                    Status::Poor
                }
            }
            Grading::LowerIsBetter => {
                if value <= good {
                    Status::Excellent
                } else if value <= average {
                    Status::Good
                } else if value <= poor {
                    Status::Average
                } else {
                    Status::Poor
                }
            }
            Grading::TargetRange => {
                let within = |low: i64, high: i64| {
                    value >= Decimal::from(low) && value <= Decimal::from(high)
                };
                if within(70, 80) {
                    Status::Excellent
                } else if within(65, 85) {
                    Status::Good
                } else if within(60, 90) {
                    Status::Average
                } else {
                    Status::Poor
                }
            }
        };
        Some(status)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
