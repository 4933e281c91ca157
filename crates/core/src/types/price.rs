//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored as [`Decimal`] in the currency's major unit (rupees, not
//! paise) and are always within [`Price::MIN`]..=[`Price::MAX`]. On the wire a
//! price is a plain JSON number; on input a numeric string is accepted too,
//! since admin forms submit text fields.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a number or numeric string.
    #[error("Price must be a number")]
    NotANumber,
    /// The value falls outside the allowed range.
    #[error("Price must be between {min} and {max}")]
    OutOfRange {
        /// Inclusive lower bound.
        min: Decimal,
        /// Inclusive upper bound.
        max: Decimal,
    },
}

/// A catalog price in major currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// Lowest allowed price.
    pub const MIN: Decimal = Decimal::ZERO;
    /// Highest allowed price.
    pub const MAX: Decimal = Decimal::from_parts(999_999, 0, 0, false, 0);
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price, checking the allowed range.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::OutOfRange` if the amount is negative or above
    /// [`Price::MAX`].
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount < Self::MIN || amount > Self::MAX {
            return Err(PriceError::OutOfRange {
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(amount.normalize()))
    }

    /// Parse a price from loosely-typed JSON input.
    ///
    /// Accepts a JSON number or a string containing a number.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::NotANumber` for any other shape and
    /// `PriceError::OutOfRange` when the parsed value is out of range.
    pub fn from_json(value: &Value) -> Result<Self, PriceError> {
        let amount = match value {
            Value::Number(n) => parse_decimal(&n.to_string())?,
            Value::String(s) => parse_decimal(s.trim())?,
            _ => return Err(PriceError::NotANumber),
        };
        Self::new(amount)
    }

    /// Returns the amount in major units.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

fn parse_decimal(s: &str) -> Result<Decimal, PriceError> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .map_err(|_| PriceError::NotANumber)
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(serde::de::Error::custom)
    }
}
