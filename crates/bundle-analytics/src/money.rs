//! Monetary amounts and currencies.
//!
//! Amounts are held as integer hundredths so that every value is rounded
//! exactly once, when it enters the model. Payloads render them back as
//! two-decimal numbers.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};

use crate::error::AnalyticsError;

/// An ISO-4217 alphabetic currency code.
///
/// Any three ASCII letters are accepted and stored uppercase; the storefront
/// sells in whatever currency checkout hands over, so there is no closed list.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency([u8; 3]);

impl Currency {
    pub const USD: Currency = Currency(*b"USD");
    pub const EUR: Currency = Currency(*b"EUR");
    pub const GBP: Currency = Currency(*b"GBP");
    pub const JPY: Currency = Currency(*b"JPY");
    pub const CAD: Currency = Currency(*b"CAD");
    pub const AUD: Currency = Currency(*b"AUD");

    /// Get the currency code (e.g., "USD").
    pub fn code(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Parse a currency code string, ignoring case and surrounding whitespace.
    ///
    /// ```
    /// use bundle_analytics::Currency;
    /// assert_eq!(Currency::from_code(" sar ").map(|c| c.to_string()), Some("SAR".to_string()));
    /// assert_eq!(Currency::from_code("US$"), None);
    /// ```
    pub fn from_code(code: &str) -> Option<Self> {
        let bytes: [u8; 3] = code.trim().as_bytes().try_into().ok()?;
        if !bytes.iter().all(u8::is_ascii_alphabetic) {
            return None;
        }
        Some(Currency(bytes.map(|b| b.to_ascii_uppercase())))
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::USD
    }
}

impl TryFrom<String> for Currency {
    type Error = AnalyticsError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Currency::from_code(&code).ok_or(AnalyticsError::InvalidCurrency(code))
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.code().to_string()
    }
}

impl fmt::Debug for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Currency({})", self.code())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary amount rounded to two decimal places.
///
/// Serializes as a decimal number. Deserializes from a number or a numeric
/// string, rounding on the way in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    cents: i64,
}

impl Amount {
    /// Zero.
    pub const ZERO: Amount = Amount { cents: 0 };

    /// Create an amount from hundredths.
    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Create an amount from a decimal, rounding half away from zero.
    ///
    /// ```
    /// use bundle_analytics::Amount;
    /// assert_eq!(Amount::from_decimal(19.999).cents(), 2000);
    /// assert_eq!(Amount::from_decimal(f64::NAN), Amount::ZERO);
    /// ```
    pub fn from_decimal(amount: f64) -> Self {
        if !amount.is_finite() {
            return Self::ZERO;
        }
        Self::from_cents((amount * 100.0).round() as i64)
    }

    /// Amount in hundredths.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        self.cents as f64 / 100.0
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }

    /// Clamp negative amounts to zero.
    pub fn non_negative(self) -> Self {
        Self::from_cents(self.cents.max(0))
    }

    /// `Some(self)` unless the amount is zero.
    pub fn non_zero(self) -> Option<Self> {
        if self.is_zero() {
            None
        } else {
            Some(self)
        }
    }

    /// Multiply by a quantity.
    pub fn multiply(&self, quantity: u32) -> Amount {
        Amount::from_cents(self.cents.saturating_mul(i64::from(quantity)))
    }
}

impl From<f64> for Amount {
    fn from(amount: f64) -> Self {
        Amount::from_decimal(amount)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, other: Amount) -> Amount {
        Amount::from_cents(self.cents.saturating_add(other.cents))
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, other: Amount) -> Amount {
        Amount::from_cents(self.cents.saturating_sub(other.cents))
    }
}

impl Mul<u32> for Amount {
    type Output = Amount;

    fn mul(self, quantity: u32) -> Amount {
        self.multiply(quantity)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, |acc, a| acc + a)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.to_decimal())
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Loose {
            Number(f64),
            Text(String),
        }

        match Loose::deserialize(deserializer)? {
            Loose::Number(n) => Ok(Amount::from_decimal(n)),
            Loose::Text(s) if s.trim().is_empty() => Ok(Amount::ZERO),
            Loose::Text(s) => s
                .trim()
                .parse::<f64>()
                .map(Amount::from_decimal)
                .map_err(|_| de::Error::custom(format!("invalid amount: {s:?}"))),
        }
    }
}
