//! Type-safe price representation and price normalization.
//!
//! External price data arrives in several shapes (bare numbers, `{amount}`
//! objects with numeric or string amounts, or nothing at all).
//! [`normalize_price`] collapses all of them into one non-negative
//! [`Decimal`] so that downstream arithmetic never branches on shape.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A price with currency information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., rupees, not paise).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Build a price from an untrusted amount representation.
    #[must_use]
    pub fn normalized(amount: &Value, currency_code: CurrencyCode) -> Self {
        Self::new(normalize_price(amount), currency_code)
    }

    /// Format for display (e.g., "₹100.00").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

/// ISO 4217 currency codes.
///
/// Codes without a dedicated variant are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum CurrencyCode {
    #[default]
    INR,
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
    Other(String),
}

impl CurrencyCode {
    /// Display symbol, falling back to the code itself.
    #[must_use]
    pub fn symbol(&self) -> &str {
        match self {
            Self::INR => "₹",
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
            Self::Other(code) => code,
        }
    }

    /// The three-letter ISO code.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::INR => "INR",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
            Self::Other(code) => code,
        }
    }
}

impl From<&str> for CurrencyCode {
    fn from(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "INR" => Self::INR,
            "USD" => Self::USD,
            "EUR" => Self::EUR,
            "GBP" => Self::GBP,
            "CAD" => Self::CAD,
            "AUD" => Self::AUD,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl From<String> for CurrencyCode {
    fn from(code: String) -> Self {
        Self::from(code.as_str())
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.code().to_owned()
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Normalized price captured on a cart line, serialized as `{"amount": <number>}`.
///
/// Deserialization accepts any shape and runs it through [`normalize_price`],
/// so a persisted cart written by an older build restores cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct LinePrice {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl LinePrice {
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self { amount }
    }
}

impl From<&Price> for LinePrice {
    fn from(price: &Price) -> Self {
        Self::new(price.amount.max(Decimal::ZERO))
    }
}

impl From<Value> for LinePrice {
    fn from(value: Value) -> Self {
        Self::new(normalize_price(&value))
    }
}

/// Normalize an arbitrary price representation into a non-negative decimal.
///
/// | input                     | output          |
/// |---------------------------|-----------------|
/// | `5`                       | `5`             |
/// | `{"amount": 5}`           | `5`             |
/// | `{"amount": "5"}`         | `5`             |
/// | `"5"`                     | `5`             |
/// | `{"amount": "abc"}`       | `0`             |
/// | `null`, `[]`, `true`, ... | `0`             |
///
/// Negative amounts also normalize to `0`. This function never fails.
///
/// ```
/// use kiosk_core::normalize_price;
/// use rust_decimal::Decimal;
/// use serde_json::json;
///
/// assert_eq!(normalize_price(&json!({"amount": "12.50"})), Decimal::new(1250, 2));
/// assert_eq!(normalize_price(&json!(null)), Decimal::ZERO);
/// ```
#[must_use]
pub fn normalize_price(value: &Value) -> Decimal {
    let amount = match value {
        Value::Number(_) | Value::String(_) => scalar_amount(value),
        Value::Object(map) => map.get("amount").and_then(scalar_amount),
        _ => None,
    };

    amount
        .filter(|amount| !amount.is_sign_negative())
        .unwrap_or(Decimal::ZERO)
}

fn scalar_amount(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(Decimal::from(u))
            } else {
                n.as_f64().and_then(|f| Decimal::try_from(f).ok())
            }
        }
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_is_total() {
        let five = Decimal::from(5);
        assert_eq!(normalize_price(&json!(5)), five);
        assert_eq!(normalize_price(&json!({"amount": 5})), five);
        assert_eq!(normalize_price(&json!({"amount": "5"})), five);
        assert_eq!(normalize_price(&json!({"amount": "abc"})), Decimal::ZERO);
        assert_eq!(normalize_price(&json!(null)), Decimal::ZERO);
        assert_eq!(normalize_price(&json!({})), Decimal::ZERO);
    }

    #[test]
    fn test_normalize_fractional_amounts() {
        assert_eq!(normalize_price(&json!(12.5)), Decimal::new(125, 1));
        assert_eq!(
            normalize_price(&json!({"amount": " 499.00 ", "currencyCode": "INR"})),
            Decimal::new(49900, 2)
        );
    }

    #[test]
    fn test_normalize_rejects_wrong_shapes() {
        assert_eq!(normalize_price(&json!(true)), Decimal::ZERO);
        assert_eq!(normalize_price(&json!([5])), Decimal::ZERO);
        assert_eq!(normalize_price(&json!({"amount": null})), Decimal::ZERO);
        assert_eq!(normalize_price(&json!({"amount": {"amount": 5}})), Decimal::ZERO);
    }

    #[test]
    fn test_normalize_clamps_negative() {
        assert_eq!(normalize_price(&json!(-3)), Decimal::ZERO);
        assert_eq!(normalize_price(&json!({"amount": "-1.5"})), Decimal::ZERO);
    }

    #[test]
    fn test_line_price_serializes_as_number() {
        let price = LinePrice::new(Decimal::new(10050, 2));
        let json = serde_json::to_value(price).unwrap();
        assert_eq!(json, json!({"amount": 100.5}));
    }

    #[test]
    fn test_line_price_deserializes_any_shape() {
        let from_string: LinePrice = serde_json::from_value(json!({"amount": "50"})).unwrap();
        assert_eq!(from_string.amount, Decimal::from(50));

        let from_number: LinePrice = serde_json::from_value(json!(50)).unwrap();
        assert_eq!(from_number.amount, Decimal::from(50));

        let from_garbage: LinePrice = serde_json::from_value(json!("n/a")).unwrap();
        assert_eq!(from_garbage.amount, Decimal::ZERO);
    }

    #[test]
    fn test_currency_code_parsing() {
        assert_eq!(CurrencyCode::from("inr"), CurrencyCode::INR);
        assert_eq!(CurrencyCode::from("JPY"), CurrencyCode::Other("JPY".to_string()));
        assert_eq!(CurrencyCode::INR.symbol(), "₹");
        assert_eq!(CurrencyCode::from("JPY").symbol(), "JPY");
    }

    #[test]
    fn test_price_display() {
        let price = Price::new(Decimal::from(250), CurrencyCode::INR);
        assert_eq!(price.display(), "₹250.00");
    }
}
