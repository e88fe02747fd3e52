//! Common regex patterns for financial statement extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Thousands-group separators and accounting parentheses
    pub static ref GROUPING: Regex = Regex::new(r"[,()]").unwrap();

    // Bare number with an optional Indian/English magnitude word
    pub static ref AMOUNT_BARE: Regex = Regex::new(
        r"(?i)(-?\d+(?:\.\d+)?)(?:\s*(crores|crore|cr|lakhs|lakh|million|billion|thousand)\b)?"
    ).unwrap();

    // Currency-symbol-prefixed number (₹ 1,234 Cr, Rs. 50 lakh, INR 12)
    pub static ref AMOUNT_WITH_CURRENCY: Regex = Regex::new(
        r"(?i)(?:₹|rs\.?|inr|\$|€|£)\s*(-?\d+(?:\.\d+)?)(?:\s*(crores|crore|cr|lakhs|lakh|million|billion|thousand)\b)?"
    ).unwrap();

    // Dollar amounts with English-only magnitude words ($2.5M, $300 k)
    pub static ref AMOUNT_DOLLAR: Regex = Regex::new(
        r"(?i)\$\s*(-?\d+(?:\.\d+)?)(?:\s*(million|billion|thousand|k|m|b)\b)?"
    ).unwrap();
}
