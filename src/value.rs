//! Exact decimal values for metrics
//!
//! Metric values are fixed-point numbers with two fractional digits and at
//! most twelve digits in total, i.e. `numeric(12, 2)`. They are held as a
//! count of hundredths so no precision is ever lost to floating point.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Number of fractional digits kept.
pub const SCALE: u32 = 2;

/// Total number of significant digits allowed.
pub const PRECISION: u32 = 12;

const UNITS_PER_WHOLE: i64 = 10_i64.pow(SCALE);
const MAX_HUNDREDTHS: i64 = 10_i64.pow(PRECISION) - 1;

/// A metric measurement, e.g. `92.50` or `18.00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MetricValue {
    hundredths: i64,
}

impl MetricValue {
    /// Build a value from a count of hundredths (`9250` is `92.50`).
    pub fn from_hundredths(hundredths: i64) -> Result<Self> {
        if hundredths.abs() > MAX_HUNDREDTHS {
            return Err(Error::InvalidValue(format!(
                "{} exceeds numeric({}, {})",
                hundredths, PRECISION, SCALE
            )));
        }
        Ok(Self { hundredths })
    }

    pub fn hundredths(&self) -> i64 {
        self.hundredths
    }

    /// Parse decimal text, rounding extra fractional digits half away from zero.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || Error::InvalidValue(format!("'{}' is not a decimal number", input));

        let text = input.trim();
        let (negative, digits) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };

        let (whole, fraction) = match digits.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (digits, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let whole = whole.trim_start_matches('0');
        if whole.len() > (PRECISION - SCALE) as usize {
            return Err(Error::InvalidValue(format!(
                "'{}' has more than {} integer digits",
                input,
                PRECISION - SCALE
            )));
        }

        let mut hundredths: i64 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| invalid())? };
        hundredths *= UNITS_PER_WHOLE;

        let fraction = fraction.as_bytes();
        for (i, digit) in fraction.iter().take(SCALE as usize).enumerate() {
            let place = 10_i64.pow(SCALE - 1 - i as u32);
            hundredths += i64::from(digit - b'0') * place;
        }
        if fraction.get(SCALE as usize).is_some_and(|d| *d >= b'5') {
            hundredths += 1;
        }

        Self::from_hundredths(if negative { -hundredths } else { hundredths })
    }
}

impl FromStr for MetricValue {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.hundredths < 0 { "-" } else { "" };
        let magnitude = self.hundredths.unsigned_abs();
        let units = UNITS_PER_WHOLE as u64;
        write!(
            f,
            "{}{}.{:0width$}",
            sign,
            magnitude / units,
            magnitude % units,
            width = SCALE as usize
        )
    }
}

impl Serialize for MetricValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MetricValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        MetricValue::parse(&s).map_err(serde::de::Error::custom)
    }
}
