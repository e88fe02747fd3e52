//! Confidence scoring for extracted fields.

use rust_decimal::Decimal;

const BASE: f32 = 0.5;
const KEYWORD_BONUS: f32 = 0.3;
const RANGE_BONUS: f32 = 0.2;
const IMPLAUSIBLE_PENALTY: f32 = 0.2;

/// Score a candidate value read for `keyword` on `line`.
///
/// Values are in crores: anything in (0, 1,000,000) is plausible, below
/// 0.01 or above 10,000,000 is suspicious. `line` is expected lowercased.
pub fn score_confidence(line: &str, keyword: &str, value: Decimal) -> f32 {
    let mut score = BASE;

    if line.contains(keyword) {
        score += KEYWORD_BONUS;
    }

    if value > Decimal::ZERO && value < Decimal::from(1_000_000) {
        score += RANGE_BONUS;
    }

    if value < Decimal::new(1, 2) || value > Decimal::from(10_000_000) {
        score -= IMPLAUSIBLE_PENALTY;
    }

    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_plausible_value() {
        let score = score_confidence("total assets", "total assets", Decimal::from(1234));
        assert!(close(score, 1.0));
    }

    #[test]
    fn test_tiny_value() {
        // In range but under 0.01 crore.
        let value = Decimal::from_str("0.0001234").unwrap();
        assert!(close(score_confidence("total assets 1234", "total assets", value), 0.8));
    }

    #[test]
    fn test_zero_and_huge_values() {
        assert!(close(score_confidence("deposits 0", "deposits", Decimal::ZERO), 0.6));
        assert!(close(
            score_confidence("deposits", "deposits", Decimal::from(1_000_000_000)),
            0.6
        ));
        assert!(close(
            score_confidence("deposits", "deposits", Decimal::from(5_000_000)),
            0.8
        ));
    }

    #[test]
    fn test_keyword_checked_not_assumed() {
        let score = score_confidence("something else", "deposits", Decimal::from(10));
        assert!(close(score, 0.7));
    }

    #[test]
    fn test_always_in_unit_range() {
        let values = [
            Decimal::MIN,
            Decimal::from(-5),
            Decimal::ZERO,
            Decimal::new(1, 3),
            Decimal::ONE,
            Decimal::from(999_999),
            Decimal::from(1_000_000_000),
            Decimal::MAX,
        ];
        for value in values {
            for (line, keyword) in [("net profit", "net profit"), ("", "net profit"), ("x", "")] {
                let score = score_confidence(line, keyword, value);
                assert!((0.0..=1.0).contains(&score), "{} for {}", score, value);
            }
        }
    }
}
