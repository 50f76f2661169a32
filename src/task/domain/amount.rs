//! Settlement amounts held as exact micro-unit integers.

use super::ValidationError;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;

/// Amount of the settlement currency (ALGO), stored in micro-units.
///
/// Decimal input is converted without floating point arithmetic. Digits
/// beyond the sixth decimal place are truncated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Amount(u64);

impl Amount {
    /// Micro-units in one whole unit.
    pub const MICRO_PER_UNIT: u64 = 1_000_000;

    /// Number of decimal places representable.
    const DECIMALS: usize = 6;

    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from micro-units.
    #[must_use]
    pub const fn from_micro(micro: u64) -> Self {
        Self(micro)
    }

    /// Creates an amount from whole units.
    #[must_use]
    pub const fn from_whole(units: u64) -> Self {
        Self(units.saturating_mul(Self::MICRO_PER_UNIT))
    }

    /// Parses a non-negative decimal string such as `"15"` or `"0.25"`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAmount`] for empty, signed,
    /// exponent-form, or otherwise non-decimal input, and for values that
    /// overflow the micro-unit range.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidAmount(input.to_owned());
        let trimmed = input.trim();
        let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        let is_digits = |part: &str| part.chars().all(|ch| ch.is_ascii_digit());
        if !is_digits(whole) || !is_digits(fraction) {
            return Err(invalid());
        }

        let whole_units = if whole.is_empty() {
            0
        } else {
            whole.parse::<u64>().map_err(|_| invalid())?
        };

        let mut fraction_micro = 0_u64;
        let mut scale = Self::MICRO_PER_UNIT;
        for digit in fraction.chars().take(Self::DECIMALS) {
            scale = scale.div_euclid(10);
            let value = digit.to_digit(10).map(u64::from).ok_or_else(invalid)?;
            fraction_micro += value * scale;
        }

        whole_units
            .checked_mul(Self::MICRO_PER_UNIT)
            .and_then(|micro| micro.checked_add(fraction_micro))
            .map(Self)
            .ok_or_else(invalid)
    }

    /// Returns the amount in micro-units.
    #[must_use]
    pub const fn micro(self) -> u64 {
        self.0
    }

    /// Returns `true` when the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Adds two amounts, saturating at the numeric bound.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0.div_euclid(Self::MICRO_PER_UNIT);
        let fraction = self.0.rem_euclid(Self::MICRO_PER_UNIT);
        if fraction == 0 {
            return write!(f, "{whole}");
        }
        let digits = format!("{fraction:06}");
        write!(f, "{whole}.{}", digits.trim_end_matches('0'))
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.rem_euclid(Self::MICRO_PER_UNIT) == 0 {
            return serializer.serialize_u64(self.0.div_euclid(Self::MICRO_PER_UNIT));
        }
        let decimal = self
            .to_string()
            .parse::<f64>()
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_f64(decimal)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl Visitor<'_> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a non-negative decimal amount")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Amount, E> {
        value
            .checked_mul(Amount::MICRO_PER_UNIT)
            .map(Amount)
            .ok_or_else(|| E::custom(format!("amount {value} is out of range")))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Amount, E> {
        let unsigned = u64::try_from(value)
            .map_err(|_| E::custom(format!("amount {value} must not be negative")))?;
        self.visit_u64(unsigned)
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Amount, E> {
        self.visit_str(&value.to_string())
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Amount, E> {
        Amount::parse(value).map_err(E::custom)
    }
}
