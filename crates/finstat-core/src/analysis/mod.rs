//! Banking ratio analysis over the financial inputs form.

mod metrics;

pub use metrics::{Grading, Metric, MetricCategory, Status};

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::financials::FinancialInputs;

/// Shown in place of a metric that could not be calculated.
pub const NOT_CALCULATED: &str = "Not Calculated";

/// One computed metric with its grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    pub metric: Metric,
    pub category: MetricCategory,
    /// Value in percent; zero when not calculated.
    pub value: Decimal,
    /// Grade, absent when not calculated.
    pub status: Option<Status>,
}

impl MetricResult {
    fn new(metric: Metric, inputs: &FinancialInputs) -> Self {
        let value = metric.compute(inputs);
        Self {
            metric,
            category: metric.category(),
            value,
            status: metric.grade(value),
        }
    }

    pub fn is_calculated(&self) -> bool {
        !self.value.is_zero()
    }

    /// `"12.34%"`, or `"-"` when not calculated.
    pub fn display_value(&self) -> String {
        if !self.is_calculated() {
            return "-".to_string();
        }
        let rounded = self
            .value
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{:.2}%", rounded)
    }

    pub fn status_label(&self) -> &'static str {
        self.status.map(|s| s.label()).unwrap_or(NOT_CALCULATED)
    }
}

/// Every metric computed from one set of inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub inputs: FinancialInputs,
    pub metrics: Vec<MetricResult>,
}

impl AnalysisReport {
    /// Compute every metric now.
    pub fn compute(inputs: &FinancialInputs) -> Self {
        Self::compute_at(inputs, Utc::now())
    }

    /// Compute every metric with an explicit timestamp.
    pub fn compute_at(inputs: &FinancialInputs, generated_at: DateTime<Utc>) -> Self {
        let metrics: Vec<MetricResult> = Metric::ALL
            .iter()
            .map(|metric| MetricResult::new(*metric, inputs))
            .collect();

        debug!(
            "Computed {} of {} metrics",
            metrics.iter().filter(|m| m.is_calculated()).count(),
            metrics.len()
        );

        Self {
            generated_at,
            inputs: inputs.clone(),
            metrics,
        }
    }

    /// Result for one metric.
    pub fn get(&self, metric: Metric) -> Option<&MetricResult> {
        self.metrics.iter().find(|m| m.metric == metric)
    }

    /// Results of one category in report order.
    pub fn by_category(&self, category: MetricCategory) -> impl Iterator<Item = &MetricResult> {
        self.metrics.iter().filter(move |m| m.category == category)
    }

    /// Number of metrics per status, not-calculated ones excluded.
    pub fn status_counts(&self) -> [(Status, usize); 4] {
        [Status::Excellent, Status::Good, Status::Average, Status::Poor]
            .map(|status| {
                let count = self.metrics.iter().filter(|m| m.status == Some(status)).count();
                (status, count)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_empty_inputs_report() {
        let report = AnalysisReport::compute(&FinancialInputs::new());
        assert_eq!(report.metrics.len(), 18);
        for m in &report.metrics {
            assert_eq!(m.display_value(), "-");
            assert_eq!(m.status_label(), NOT_CALCULATED);
        }
        assert!(report.status_counts().iter().all(|(_, n)| *n == 0));
    }

    #[test]
    fn test_display_and_status() {
        let mut inputs = FinancialInputs::new();
        inputs.tier1_capital = dec("1500.5");
        inputs.tier2_capital = dec("250");
        inputs.risk_weighted_assets = dec("12000");
        inputs.gross_advances = dec("7800");
        inputs.deposits = dec("10000");

        let at = Utc.with_ymd_and_hms(2024, 3, 31, 10, 0, 0).unwrap();
        let report = AnalysisReport::compute_at(&inputs, at);
        assert_eq!(report.generated_at, at);

        let car = report.get(Metric::Car).unwrap();
        // 1750.5 / 12000 = 14.5875%
        assert_eq!(car.display_value(), "14.59%");
        assert_eq!(car.status, Some(Status::Good));
        assert_eq!(car.category, MetricCategory::CapitalAdequacy);

        let ltd = report.get(Metric::LoanToDeposit).unwrap();
        assert_eq!(ltd.display_value(), "78.00%");
        assert_eq!(ltd.status_label(), "Excellent");

        assert_eq!(report.by_category(MetricCategory::Growth).count(), 4);
        assert_eq!(
            report.status_counts(),
            [
                (Status::Excellent, 1),
                (Status::Good, 1),
                (Status::Average, 0),
                (Status::Poor, 0)
            ]
        );
    }

    #[test]
    fn test_negative_value_displays() {
        let mut inputs = FinancialInputs::new();
        inputs.total_assets = dec("900");
        inputs.previous.aum = dec("1000");

        let report = AnalysisReport::compute(&inputs);
        let aum = report.get(Metric::AumGrowth).unwrap();
        assert_eq!(aum.display_value(), "-10.00%");
        assert_eq!(aum.status, Some(Status::Poor));
    }

    #[test]
    fn test_report_serializes() {
        let report = AnalysisReport::compute(&FinancialInputs::new());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["metrics"][0]["metric"], "aum_growth");
        assert_eq!(json["metrics"][0]["status"], serde_json::Value::Null);
    }
}
