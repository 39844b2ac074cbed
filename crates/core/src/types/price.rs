//! Type-safe price representation using decimal arithmetic.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when building a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
    /// The amount is outside `-Price::MAX..=Price::MAX`.
    #[error("price must be at most {max} in magnitude")]
    OutOfRange {
        /// Largest allowed magnitude.
        max: Decimal,
    },
}

/// A unit price in the currency's standard unit (e.g., dollars, not cents).
///
/// Amounts are rounded to cents (half away from zero) and bounded by
/// [`Price::MAX`]. Persisted carts store prices as JSON numbers; within that
/// range a cent amount survives the trip through `f64` unchanged.
///
/// Sums and line totals saturate instead of overflowing, so they may exceed
/// [`Price::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest unit price magnitude: 999,999,999.99.
    pub const MAX: Decimal = Decimal::from_parts(1_215_752_191, 23, 0, false, 2);

    const DECIMAL_PLACES: u32 = 2;

    /// Create a price, rounding to cents.
    ///
    /// ```
    /// use marketplace_core::Price;
    /// use rust_decimal::Decimal;
    ///
    /// let price = Price::new(Decimal::new(12_345, 3)).unwrap();
    /// assert_eq!(price.to_string(), "12.35");
    /// assert!(Price::new(Decimal::MAX).is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::OutOfRange`] if the rounded amount exceeds
    /// [`Price::MAX`] in magnitude.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        let rounded = amount.round_dp_with_strategy(
            Self::DECIMAL_PLACES,
            RoundingStrategy::MidpointAwayFromZero,
        );
        if rounded.abs() > Self::MAX {
            return Err(PriceError::OutOfRange { max: Self::MAX });
        }
        Ok(Self(rounded))
    }

    /// Create a price from an amount in the smallest currency unit.
    ///
    /// Every `i32` cent amount is within range.
    ///
    /// ```
    /// use marketplace_core::Price;
    ///
    /// assert_eq!(Price::from_cents(1999).to_string(), "19.99");
    /// ```
    #[must_use]
    pub fn from_cents(cents: i32) -> Self {
        Self(Decimal::new(i64::from(cents), Self::DECIMAL_PLACES))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display with a currency symbol (e.g., "$19.99").
    #[must_use]
    pub fn display(&self, currency: CurrencyCode) -> String {
        format!("{}{:.2}", currency.symbol(), self.0.round_dp(Self::DECIMAL_PLACES))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount =
            Decimal::from_str(s.trim()).map_err(|e| PriceError::Invalid(e.to_string()))?;
        Self::new(amount)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
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
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// The three-letter ISO code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}

/// Error returned when a currency code is not supported.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported currency code: {0}")]
pub struct UnknownCurrency(pub String);

impl FromStr for CurrencyCode {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            _ => Err(UnknownCurrency(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_json_number() {
        let price: Price = "12.5".parse().unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "12.5");
    }

    #[test]
    fn test_deserializes_from_json_number() {
        let price: Price = serde_json::from_str("19.99").unwrap();
        assert_eq!(price, Price::from_cents(1999));
    }

    #[test]
    fn test_line_total_is_exact() {
        let price = Price::from_cents(10);
        assert_eq!(price * 3, Price::from_cents(30));
    }

    #[test]
    fn test_sum() {
        let total: Price = [Price::from_cents(150), Price::from_cents(250)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(400));
    }

    #[test]
    fn test_new_rounds_to_cents() {
        let price: Price = "0.12345678901234567890".parse().unwrap();
        assert_eq!(price, Price::from_cents(12));

        let half: Price = "0.125".parse().unwrap();
        assert_eq!(half, Price::from_cents(13));
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(matches!(
            "79228162514264337593543950335".parse::<Price>(),
            Err(PriceError::OutOfRange { .. })
        ));
        assert!(Price::new(Decimal::MAX).is_err());
        assert!(Price::new(-Price::MAX).is_ok());
        assert!("abc".parse::<Price>().is_err());
    }

    #[test]
    fn test_max_survives_json_round_trip() {
        let max = Price::new(Price::MAX).unwrap();
        assert_eq!(max.to_string(), "999999999.99");

        let json = serde_json::to_string(&max).unwrap();
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, max);
    }

    #[test]
    fn test_cent_amounts_survive_json_round_trip() {
        for cents in [1, 7, 29, 1_999, 12_345_629, 987_654_321, i32::MAX] {
            let price = Price::from_cents(cents);
            let json = serde_json::to_string(&price).unwrap();
            let back: Price = serde_json::from_str(&json).unwrap();
            assert_eq!(back, price, "cents = {cents}");
        }
    }

    #[test]
    fn test_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<Price>("1e20").is_err());
    }

    #[test]
    fn test_arithmetic_saturates_instead_of_panicking() {
        let max = Price::new(Price::MAX).unwrap();
        let line = max * u32::MAX;
        let total: Price = std::iter::repeat_n(line, 1_000).sum();
        assert!(total > line);

        let huge = Price(Decimal::MAX);
        assert_eq!(huge + huge, huge);
        assert_eq!(huge * 2, huge);
    }

    #[test]
    fn test_display_with_currency() {
        let price = Price::from_cents(500);
        assert_eq!(price.display(CurrencyCode::USD), "$5.00");
        assert_eq!(price.display(CurrencyCode::GBP), "£5.00");
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("eur".parse::<CurrencyCode>().unwrap(), CurrencyCode::EUR);
        assert!("XYZ".parse::<CurrencyCode>().is_err());
    }
}
