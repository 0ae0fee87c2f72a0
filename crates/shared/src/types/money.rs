//! Money parsing and display.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` end to end. The backing store does not
//! guarantee numeric column types, so every amount entering the system goes
//! through [`parse_or_zero`] or [`deserialize_lenient`].

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

/// Currency symbol used for display.
pub const RUPEE: &str = "\u{20b9}";

/// Parses a decimal amount, returning zero for anything unparseable.
///
/// Accepts plain decimals (`"1250.50"`), surrounding whitespace and
/// scientific notation (`"1.2e3"`).
#[must_use]
pub fn parse_or_zero(raw: &str) -> Decimal {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .unwrap_or(Decimal::ZERO)
}

/// Coerces a loosely-typed JSON value into a decimal amount.
///
/// Numbers and numeric strings are parsed; `null`, booleans, arrays,
/// objects and garbage strings become zero.
#[must_use]
pub fn coerce_value(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => parse_or_zero(&n.to_string()),
        Value::String(s) => parse_or_zero(s),
        _ => Decimal::ZERO,
    }
}

/// Serde adapter for amount fields: `#[serde(deserialize_with = "deserialize_lenient")]`.
///
/// Never fails on the value itself; only a malformed document fails.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_value(&value))
}

/// Formats an amount as whole rupees with Indian digit grouping.
///
/// `1234567.4` renders as `₹12,34,567`; negatives carry a leading `-`.
#[must_use]
pub fn format_inr(amount: Decimal) -> String {
    let rounded = amount
        .abs()
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .trunc();
    let digits = rounded.to_string();
    let sign = if amount.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{RUPEE}{}", group_indian(&digits))
}

/// Groups an unsigned digit string as `xx,xx,xxx`.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    if end > 0 {
        groups.push(&head[..end]);
    }
    groups.reverse();

    format!("{},{last_three}", groups.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[rstest]
    #[case("1000", dec!(1000))]
    #[case("  250.75 ", dec!(250.75))]
    #[case("1.2e3", dec!(1200))]
    #[case("-40", dec!(-40))]
    #[case("", dec!(0))]
    #[case("abc", dec!(0))]
    #[case("12abc", dec!(0))]
    fn test_parse_or_zero(#[case] raw: &str, #[case] expected: Decimal) {
        assert_eq!(parse_or_zero(raw), expected);
    }

    #[test]
    fn test_coerce_value_variants() {
        assert_eq!(coerce_value(&json!(900)), dec!(900));
        assert_eq!(coerce_value(&json!(12.5)), dec!(12.5));
        assert_eq!(coerce_value(&json!("300")), dec!(300));
        assert_eq!(coerce_value(&json!(null)), Decimal::ZERO);
        assert_eq!(coerce_value(&json!(true)), Decimal::ZERO);
        assert_eq!(coerce_value(&json!({"amount": 1})), Decimal::ZERO);
    }

    #[test]
    fn test_deserialize_lenient_in_struct() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(deserialize_with = "deserialize_lenient")]
            amount: Decimal,
        }

        let row: Row = serde_json::from_value(json!({"amount": "1500.25"})).unwrap();
        assert_eq!(row.amount, dec!(1500.25));

        let row: Row = serde_json::from_value(json!({"amount": "n/a"})).unwrap();
        assert_eq!(row.amount, Decimal::ZERO);
    }

    #[rstest]
    #[case(dec!(0), "\u{20b9}0")]
    #[case(dec!(999), "\u{20b9}999")]
    #[case(dec!(1000), "\u{20b9}1,000")]
    #[case(dec!(123456), "\u{20b9}1,23,456")]
    #[case(dec!(1234567.4), "\u{20b9}12,34,567")]
    #[case(dec!(100000000), "\u{20b9}10,00,00,000")]
    #[case(dec!(2.5), "\u{20b9}3")]
    #[case(dec!(-300), "-\u{20b9}300")]
    #[case(dec!(-0.2), "\u{20b9}0")]
    fn test_format_inr(#[case] amount: Decimal, #[case] expected: &str) {
        assert_eq!(format_inr(amount), expected);
    }
}
