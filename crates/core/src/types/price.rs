//! Type-safe price representation using decimal arithmetic.
//!
//! Prices render the way the landing page's `ja-JP` locale shows currency:
//! locale symbol, `,` thousands grouping, and the currency's minor units.
//!
//! ```
//! use product_swipe_core::Price;
//!
//! assert_eq!(Price::parse("1000", "JPY").unwrap().to_string(), "￥1,000");
//! assert_eq!(Price::parse("19.9", "USD").unwrap().to_string(), "$19.90");
//! ```

use core::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is not a decimal number.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    /// The currency code is not one we know how to display.
    #[error("unsupported currency code: {0}")]
    UnsupportedCurrency(String),
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., yen or dollars, not cents).
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

    /// Parse a price from the string pair Shopify returns for `MoneyV2`.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not a decimal or the currency is
    /// not supported.
    pub fn parse(amount: &str, currency_code: &str) -> Result<Self, PriceError> {
        let currency_code = currency_code.parse::<CurrencyCode>()?;
        let amount = Decimal::from_str(amount.trim())
            .map_err(|_| PriceError::InvalidAmount(amount.to_string()))?;
        Ok(Self::new(amount, currency_code))
    }

    /// The amount rounded to the currency's minor units.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        let mut rounded = self.amount.round_dp_with_strategy(
            self.currency_code.minor_units(),
            RoundingStrategy::MidpointAwayFromZero,
        );
        rounded.rescale(self.currency_code.minor_units());
        rounded
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.rounded();
        let digits = rounded.abs().to_string();
        let (whole, fraction) = digits
            .split_once('.')
            .map_or((digits.as_str(), None), |(w, fr)| (w, Some(fr)));

        // Sign follows the unrounded amount, so -0.4 JPY shows as -￥0
        if self.amount.is_sign_negative() {
            f.write_str("-")?;
        }
        f.write_str(self.currency_code.symbol())?;
        f.write_str(&group_thousands(whole))?;
        if let Some(fraction) = fraction {
            write!(f, ".{fraction}")?;
        }
        Ok(())
    }
}

/// Insert `,` between every group of three integer digits.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    JPY,
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
    CNY,
    KRW,
    TWD,
    HKD,
}

impl CurrencyCode {
    /// The three-letter ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::JPY => "JPY",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
            Self::CNY => "CNY",
            Self::KRW => "KRW",
            Self::TWD => "TWD",
            Self::HKD => "HKD",
        }
    }

    /// Display symbol in the `ja-JP` locale.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::JPY => "￥",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
            Self::CAD => "CA$",
            Self::AUD => "A$",
            Self::CNY => "元",
            Self::KRW => "₩",
            Self::TWD => "NT$",
            Self::HKD => "HK$",
        }
    }

    /// Number of digits shown after the decimal point.
    #[must_use]
    pub const fn minor_units(self) -> u32 {
        match self {
            Self::JPY | Self::KRW => 0,
            _ => 2,
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "JPY" => Ok(Self::JPY),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            "CNY" => Ok(Self::CNY),
            "KRW" => Ok(Self::KRW),
            "TWD" => Ok(Self::TWD),
            "HKD" => Ok(Self::HKD),
            _ => Err(PriceError::UnsupportedCurrency(s.to_string())),
        }
    }
}
