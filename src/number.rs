//! Decimal formatting and validation for the `#number` and `%bigint`
//! tokens.
//!
//! Validation is regex-backed, the same approach `lexeme::Pattern` uses to
//! recognize a token by matching a compiled expression against the input
//! at the current cursor.

use num_bigint::BigInt;
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?(0|[1-9][0-9]*))?$").unwrap()
});

static BIGINT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?(0|[1-9][0-9]*)$").unwrap());

pub fn is_valid_number_body(body: &str) -> bool {
    NUMBER_RE.is_match(body)
}

pub fn is_valid_bigint_body(body: &str) -> bool {
    BIGINT_RE.is_match(body)
}

pub fn parse_number(body: &str) -> Option<f64> {
    if !is_valid_number_body(body) {
        return None;
    }

    body.parse::<f64>().ok()
}

pub fn parse_bigint(body: &str) -> Option<BigInt> {
    if !is_valid_bigint_body(body) {
        return None;
    }

    BigInt::from_str(body).ok()
}

/// Formats a finite `f64` in decimal, matching the `#number` grammar.
///
/// Rust's native `f64` `Display` already picks the shortest decimal that
/// round-trips back to the same bits, so no separate formatting pass is
/// needed to get a minimal, unambiguous representation.
pub fn format_number(n: f64) -> String {
    debug_assert!(n.is_finite());
    format!("{}", n)
}

pub fn format_bigint(n: &BigInt) -> String {
    n.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_numbers() {
        for body in ["0", "-0", "42", "-42", "3.14", "0.5", "1e10", "1E+10", "1.5e-3", "-9e9"] {
            assert!(is_valid_number_body(body), "expected {} to be valid", body);
        }
    }

    #[test]
    fn rejects_leading_zero_and_other_malformed_numbers() {
        for body in ["01", "-01", "1.", ".5", "1e", "1e+", "+1", "", "--1"] {
            assert!(!is_valid_number_body(body), "expected {} to be invalid", body);
        }
    }

    #[test]
    fn accepts_well_formed_bigints() {
        for body in ["0", "-0", "123456789012345678901234567890", "-7"] {
            assert!(is_valid_bigint_body(body));
        }
    }

    #[test]
    fn rejects_malformed_bigints() {
        for body in ["01", "1.5", "", "-", "1e5"] {
            assert!(!is_valid_bigint_body(body));
        }
    }

    #[test]
    fn formats_integral_floats_without_trailing_point() {
        assert_eq!(format_number(42.0), "42");
    }
}
