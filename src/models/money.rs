//! Money type for representing currency amounts
//!
//! Internally stores amounts in minor units (paise/cents, i64) so totals are
//! exact. On the wire the backend's `numeric` columns carry major units as a
//! JSON number, so serde converts at the boundary.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Represents a monetary amount stored in minor units (hundredths)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from minor units
    ///
    /// # Examples
    /// ```
    /// use finwise::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from whole major units
    pub const fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    /// Create a Money amount from a floating point major-unit value,
    /// rounding to the nearest minor unit
    pub fn from_major(value: f64) -> Self {
        Self((value * 100.0).round() as i64)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in minor units
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole units portion (truncated toward zero)
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Get the minor units portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// The amount in major units as a float (wire representation)
    pub fn as_major(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Check if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if the amount is positive
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Check if the amount is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "₹10.50", "$10.50", "10", "1,250.75"
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let s = s.trim();

        let (negative, s) = if let Some(stripped) = s.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, s)
        };

        let s = s
            .strip_prefix('₹')
            .or_else(|| s.strip_prefix('$'))
            .unwrap_or(s);
        let cleaned: String = s.chars().filter(|c| *c != ',').collect();
        let s = cleaned.as_str();

        if s.is_empty() {
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        }

        let invalid = || MoneyParseError::InvalidFormat(s.to_string());

        let (units_str, cents_str) = match s.split_once('.') {
            Some((units, cents)) => (units, Some(cents)),
            None => (s, None),
        };
        if !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let units: i64 = if units_str.is_empty() {
            0
        } else {
            units_str.parse().map_err(|_| MoneyParseError::OutOfRange(s.to_string()))?
        };

        let cents: i64 = match cents_str {
            None => 0,
            Some(frac) if !frac.chars().all(|c| c.is_ascii_digit()) => return Err(invalid()),
            Some(frac) if frac.len() > 2 => {
                return Err(MoneyParseError::TooPrecise(s.to_string()))
            }
            Some("") => 0,
            Some(frac) => {
                let value: i64 = frac.parse().map_err(|_| invalid())?;
                if frac.len() == 1 {
                    value * 10
                } else {
                    value
                }
            }
        };

        if units_str.is_empty() && cents_str.map_or(true, str::is_empty) {
            return Err(invalid());
        }

        let cents = units
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents))
            .ok_or_else(|| MoneyParseError::OutOfRange(s.to_string()))?;

        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Format with a currency symbol and thousands separators
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            symbol,
            group_thousands(self.units().abs()),
            self.cents_part()
        )
    }

    /// Plain editable form ("5000", "5000.5")
    pub fn to_input_string(&self) -> String {
        if self.cents_part() == 0 {
            format!("{}", self.units())
        } else {
            let sign = if self.is_negative() { "-" } else { "" };
            let frac = format!("{:02}", self.cents_part());
            format!(
                "{}{}.{}",
                sign,
                self.units().abs(),
                frac.trim_end_matches('0')
            )
        }
    }
}

fn group_thousands(value: i64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_symbol("₹"))
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_major())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        if !value.is_finite() {
            return Err(serde::de::Error::custom("money amount must be finite"));
        }
        Ok(Money::from_major(value))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    /// More than two digits after the decimal point
    TooPrecise(String),
    /// Does not fit in the minor-unit range
    OutOfRange(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
            MoneyParseError::TooPrecise(s) => {
                write!(f, "At most two decimal places are allowed: {}", s)
            }
            MoneyParseError::OutOfRange(s) => write!(f, "Amount is too large: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let m = Money::from_cents(1050);
        assert_eq!(m.cents(), 1050);
        assert_eq!(m.units(), 10);
        assert_eq!(m.cents_part(), 50);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1050)), "₹10.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "₹0.00");
        assert_eq!(format!("{}", Money::from_cents(-1050)), "-₹10.50");
        assert_eq!(format!("{}", Money::from_units(125_000)), "₹125,000.00");
    }

    #[test]
    fn test_format_with_symbol() {
        assert_eq!(Money::from_cents(123_456_789).format_with_symbol("$"), "$1,234,567.89");
        assert_eq!(Money::from_cents(-99).format_with_symbol("$"), "-$0.99");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((-a).cents(), -1000);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("₹10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("$10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("-10.50").unwrap().cents(), -1050);
        assert_eq!(Money::parse("10").unwrap().cents(), 1000);
        assert_eq!(Money::parse("10.5").unwrap().cents(), 1050);
        assert_eq!(Money::parse(".75").unwrap().cents(), 75);
        assert_eq!(Money::parse("1,250.75").unwrap().cents(), 125_075);
        assert!(Money::parse("").is_err());
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("1.2.3").is_err());
        assert!(Money::parse(".").is_err());
        assert!(Money::parse("1+2").is_err());
    }

    #[test]
    fn test_parse_overflow_is_error() {
        assert!(matches!(
            Money::parse("100000000000000000"),
            Err(MoneyParseError::OutOfRange(_))
        ));
        assert!(matches!(
            Money::parse("99999999999999999999"),
            Err(MoneyParseError::OutOfRange(_))
        ));
        assert_eq!(
            Money::parse("92233720368547758.08").unwrap_err().to_string(),
            "Amount is too large: 92233720368547758.08"
        );
        assert_eq!(Money::parse("92233720368547758.07").unwrap().cents(), i64::MAX);
    }

    #[test]
    fn test_parse_rejects_extra_decimals() {
        assert!(matches!(
            Money::parse("12.999"),
            Err(MoneyParseError::TooPrecise(_))
        ));
        assert_eq!(Money::parse("12.99").unwrap().cents(), 1299);
        assert_eq!(Money::parse("12.").unwrap().cents(), 1200);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let big = Money::from_cents(i64::MAX - 10);
        let total: Money = [big, Money::from_cents(100)].iter().sum();
        assert_eq!(total.cents(), i64::MAX);
        assert_eq!((Money::from_cents(i64::MIN) - big).cents(), i64::MIN);
    }

    #[test]
    fn test_input_string() {
        assert_eq!(Money::from_units(5000).to_input_string(), "5000");
        assert_eq!(Money::from_cents(500_050).to_input_string(), "5000.5");
        assert_eq!(Money::from_cents(1205).to_input_string(), "12.05");
    }

    #[test]
    fn test_sum_is_exact() {
        let amounts = vec![
            Money::from_cents(10),
            Money::from_cents(20),
            Money::from_cents(30),
        ];
        let total: Money = amounts.iter().sum();
        assert_eq!(total.cents(), 60);
    }

    #[test]
    fn test_serialization_uses_major_units() {
        let m = Money::from_cents(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "10.5");

        let deserialized: Money = serde_json::from_str("10.5").unwrap();
        assert_eq!(m, deserialized);

        let whole: Money = serde_json::from_str("5000").unwrap();
        assert_eq!(whole, Money::from_units(5000));
    }
}
