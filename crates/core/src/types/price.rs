//! Non-negative prices using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A unit price for a laundry service or product.
///
/// The amount is in the currency's standard unit (dollars, not cents) and is
/// never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPrice")]
pub struct Price {
    amount: Decimal,
    currency_code: CurrencyCode,
}

#[derive(Deserialize)]
struct RawPrice {
    amount: Decimal,
    #[serde(default)]
    currency_code: CurrencyCode,
}

impl TryFrom<RawPrice> for Price {
    type Error = PriceError;

    fn try_from(raw: RawPrice) -> Result<Self, Self::Error> {
        Self::new(raw.amount, raw.currency_code)
    }
}

impl Price {
    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `amount` is below zero.
    pub fn new(amount: Decimal, currency_code: CurrencyCode) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self {
            amount,
            currency_code,
        })
    }

    /// Create a price from an amount in minor units (e.g. cents).
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `cents` is below zero.
    pub fn from_cents(cents: i64, currency_code: CurrencyCode) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, 2), currency_code)
    }

    /// The amount in the currency's standard unit.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// The ISO 4217 currency code.
    #[must_use]
    pub const fn currency_code(&self) -> CurrencyCode {
        self.currency_code
    }

    /// The price of `quantity` units.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Decimal {
        self.amount * Decimal::from(quantity)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:.2}",
            self.currency_code.symbol(),
            self.amount.round_dp(2)
        )
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
    INR,
}

impl CurrencyCode {
    /// The display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
            Self::INR => "₹",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative_amount() {
        assert!(matches!(
            Price::from_cents(-1, CurrencyCode::USD),
            Err(PriceError::Negative(_))
        ));
    }

    #[test]
    fn test_zero_is_allowed() {
        let price = Price::new(Decimal::ZERO, CurrencyCode::EUR).unwrap();
        assert_eq!(price, Price::zero(CurrencyCode::EUR));
    }

    #[test]
    fn test_times() {
        let price = Price::from_cents(450, CurrencyCode::USD).unwrap();
        assert_eq!(price.times(3), Decimal::new(1350, 2));
    }

    #[test]
    fn test_display() {
        let price = Price::from_cents(1999, CurrencyCode::GBP).unwrap();
        assert_eq!(price.to_string(), "£19.99");
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        let ok: Price =
            serde_json::from_str(r#"{"amount":"2.50","currency_code":"USD"}"#).unwrap();
        assert_eq!(ok.amount(), Decimal::new(250, 2));

        let bad = serde_json::from_str::<Price>(r#"{"amount":"-2.50"}"#);
        assert!(bad.is_err());
    }
}
