//! Monetary amounts in integer minor units
//!
//! Amounts are held as whole cents. On the wire they are JSON numbers with
//! at most two fractional digits.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Minor units per major unit (scale 2)
pub const CENTS_PER_UNIT: u64 = 100;

/// Largest amount in cents that survives a trip through a JSON number
/// without losing precision (2^53 - 1).
pub const MAX_AMOUNT_CENTS: u64 = (1 << 53) - 1;

// == Amount ==
/// A non-negative monetary balance in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(u64);

impl Amount {
    /// Creates an amount from a number of cents.
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Returns the amount in cents.
    pub const fn cents(self) -> u64 {
        self.0
    }

    /// Converts a decimal number of major units into cents.
    ///
    /// Rejects negative, non-finite, oversized values and anything with
    /// more than two fractional digits.
    pub fn from_major(value: f64) -> Result<Self, String> {
        if !value.is_finite() {
            return Err("amount must be a finite number".to_string());
        }
        if value < 0.0 {
            return Err("amount must not be negative".to_string());
        }

        let scaled = value * CENTS_PER_UNIT as f64;
        let rounded = scaled.round();
        // Only the error of parsing and scaling a float is tolerated, which is
        // relative to the magnitude. Any real sub-cent digit is far larger.
        let tolerance = scaled * f64::EPSILON * 4.0;
        if (scaled - rounded).abs() > tolerance {
            return Err("amount must have at most two fractional digits".to_string());
        }
        if rounded > MAX_AMOUNT_CENTS as f64 {
            return Err("amount is too large".to_string());
        }

        Ok(Self(rounded as u64))
    }

    /// Returns the amount in major units, for the JSON representation only.
    pub fn as_major(self) -> f64 {
        self.0 as f64 / CENTS_PER_UNIT as f64
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:02}",
            self.0 / CENTS_PER_UNIT,
            self.0 % CENTS_PER_UNIT
        )
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_major())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Amount::from_major(value).map_err(de::Error::custom)
    }
}
