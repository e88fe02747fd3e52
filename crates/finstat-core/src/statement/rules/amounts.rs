//! Amount normalization for financial statements.
//!
//! Every amount is re-expressed in crores (10,000,000 base-currency units),
//! the working unit of the ratio analysis. Notations are tried in a fixed
//! order and the first one whose pattern matches decides the result.

use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::trace;

use super::patterns::{AMOUNT_BARE, AMOUNT_DOLLAR, AMOUNT_WITH_CURRENCY, GROUPING};

/// One crore in base-currency units.
pub const CRORE: i64 = 10_000_000;

/// Numeric notations understood by the normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountNotation {
    /// `1234.56`, `12 cr`, `5 lakh`.
    Bare,
    /// `₹ 1234 Cr`, `Rs. 50 lakh`.
    CurrencySymbol,
    /// `$2.5M`, `$300 thousand`.
    Dollar,
}

impl AmountNotation {
    /// Matching order. Reordering changes results for fragments that more
    /// than one notation can read.
    pub const ORDERED: [AmountNotation; 3] = [Self::Bare, Self::CurrencySymbol, Self::Dollar];

    fn pattern(&self) -> &'static Regex {
        match self {
            Self::Bare => &AMOUNT_BARE,
            Self::CurrencySymbol => &AMOUNT_WITH_CURRENCY,
            Self::Dollar => &AMOUNT_DOLLAR,
        }
    }

    /// Read a fragment with this notation only, in crores.
    ///
    /// `None` when the pattern does not match or the digits cannot be
    /// represented.
    pub fn parse(&self, fragment: &str) -> Option<Decimal> {
        let cleaned = strip_grouping(fragment);
        self.read(&cleaned)?
    }

    /// `None` if the pattern did not match, `Some(None)` if it matched but
    /// the amount was unusable.
    fn read(&self, cleaned: &str) -> Option<Option<Decimal>> {
        let caps = self.pattern().captures(cleaned)?;
        let amount = Decimal::from_str(&caps[1]).ok().and_then(|number| {
            let scaled = match caps.get(2) {
                Some(unit) => number.checked_mul(unit_multiplier(unit.as_str())?)?,
                None => number,
            };
            scaled.checked_div(Decimal::from(CRORE))
        });
        trace!("{:?} read {:?} from {:?}", self, amount, cleaned);
        Some(amount)
    }
}

/// Multiplier of a magnitude word, in base-currency units.
pub fn unit_multiplier(unit: &str) -> Option<Decimal> {
    let multiplier: i64 = match unit.to_lowercase().as_str() {
        "cr" | "crore" | "crores" => CRORE,
        "lakh" | "lakhs" => 100_000,
        "million" | "m" => 1_000_000,
        "billion" | "b" => 1_000_000_000,
        "thousand" | "k" => 1_000,
        _ => return None,
    };
    Some(Decimal::from(multiplier))
}

/// Remove thousands separators and parentheses.
pub fn strip_grouping(fragment: &str) -> String {
    GROUPING.replace_all(fragment, "").into_owned()
}

/// Normalize a text fragment into an amount in crores.
///
/// A number without a magnitude word is taken as base currency, so `"1234"`
/// becomes `0.0001234` while `"1234 cr"` stays `1234`. Never fails: text
/// without a readable number gives `None`.
pub fn normalize_amount(fragment: &str) -> Option<Decimal> {
    let cleaned = strip_grouping(fragment);
    AmountNotation::ORDERED
        .iter()
        .find_map(|notation| notation.read(&cleaned))
        .flatten()
}

/// Notation that decides how a fragment is read, if any.
pub fn matching_notation(fragment: &str) -> Option<AmountNotation> {
    let cleaned = strip_grouping(fragment);
    AmountNotation::ORDERED
        .into_iter()
        .find(|notation| notation.pattern().is_match(&cleaned))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_unit_words() {
        let cases = [
            ("cr", "100"),
            ("crore", "100"),
            ("crores", "100"),
            ("lakh", "1"),
            ("lakhs", "1"),
            ("million", "10"),
            ("billion", "10000"),
            ("thousand", "0.01"),
        ];
        for (unit, expected) in cases {
            assert_eq!(
                normalize_amount(&format!("100 {}", unit)),
                Some(dec(expected)),
                "unit {}",
                unit
            );
        }
    }

    #[test]
    fn test_dollar_only_units() {
        for (unit, expected) in [("k", "0.01"), ("m", "10"), ("b", "10000"), ("million", "10")] {
            assert_eq!(
                AmountNotation::Dollar.parse(&format!("$100 {}", unit)),
                Some(dec(expected)),
                "unit {}",
                unit
            );
        }
    }

    #[test]
    fn test_canonical_examples() {
        assert_eq!(normalize_amount("1 cr"), Some(dec("1")));
        assert_eq!(normalize_amount("1 lakh"), Some(dec("0.01")));
        assert_eq!(normalize_amount("100 million"), Some(dec("10")));
        assert_eq!(normalize_amount("₹ 1,234.56 Cr"), Some(dec("1234.56")));
        assert_eq!(normalize_amount("Rs. 2,50,000 Lakhs"), Some(dec("2500")));
    }

    #[test]
    fn test_bare_number_is_base_currency() {
        assert_eq!(normalize_amount("1234"), Some(dec("0.0001234")));
        assert_eq!(normalize_amount("(5,00,00,000)"), Some(dec("5")));
        assert_eq!(normalize_amount("-20000000"), Some(dec("-2")));
    }

    #[test]
    fn test_no_digits() {
        assert_eq!(normalize_amount("Total Assets"), None);
        assert_eq!(normalize_amount(""), None);
        assert_eq!(normalize_amount("₹ Cr"), None);
        assert_eq!(matching_notation("n/a"), None);
    }

    #[test]
    fn test_unrepresentable_digits_give_none() {
        assert_eq!(normalize_amount("99999999999999999999999999999999999 cr"), None);
    }

    #[test]
    fn test_notation_order_decides() {
        // The bare pattern reads any digit run, so it wins even when a
        // later notation would pick up a unit the bare one does not know.
        assert_eq!(matching_notation("$2 m"), Some(AmountNotation::Bare));
        assert_eq!(normalize_amount("$2 m"), Some(dec("0.0000002")));
        assert_eq!(AmountNotation::Dollar.parse("$2 m"), Some(dec("0.2")));

        assert_eq!(matching_notation("₹ 5 cr"), Some(AmountNotation::Bare));
        assert_eq!(AmountNotation::CurrencySymbol.parse("₹ 5 cr"), Some(dec("5")));
        assert_eq!(AmountNotation::CurrencySymbol.parse("5 cr"), None);
    }

    #[test]
    fn test_first_number_on_line_wins() {
        assert_eq!(normalize_amount("Deposits 2023 1,500 cr"), Some(dec("0.0002023")));
    }
}
