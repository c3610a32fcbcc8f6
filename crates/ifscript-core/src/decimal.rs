//! A 128-bit fixed-point decimal, the numeric half of [`crate::Value`].
//!
//! Stored as an `i128` scaled by [`SCALE`]. Nine fractional digits is enough
//! headroom for anything a script author writes by hand while staying exact
//! under `+ - *` (division rounds to the nearest unit at that scale).

use std::fmt;
use std::str::FromStr;

/// Number of implied fractional decimal digits.
pub const SCALE: i128 = 1_000_000_000;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Decimal(i128);

impl Decimal {
    pub const ZERO: Decimal = Decimal(0);
    pub const ONE: Decimal = Decimal(SCALE);

    pub fn from_i64(v: i64) -> Self {
        Decimal(v as i128 * SCALE)
    }

    pub fn is_finite(&self) -> bool {
        true // i128 has no NaN/Infinity; non-finite literals are rejected at parse time.
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn checked_add(self, other: Decimal) -> Option<Decimal> {
        self.0.checked_add(other.0).map(Decimal)
    }

    pub fn checked_sub(self, other: Decimal) -> Option<Decimal> {
        self.0.checked_sub(other.0).map(Decimal)
    }

    pub fn checked_mul(self, other: Decimal) -> Option<Decimal> {
        self.0
            .checked_mul(other.0)
            .map(|scaled| scaled / SCALE)
            .map(Decimal)
    }

    /// Division rounds to nearest, ties away from zero. Returns `None` on division by zero.
    pub fn checked_div(self, other: Decimal) -> Option<Decimal> {
        if other.0 == 0 {
            return None;
        }
        let numerator = self.0.checked_mul(SCALE)?;
        let half = other.0.abs() / 2;
        let adjusted = if numerator.signum() * other.0.signum() < 0 {
            numerator - half
        } else {
            numerator + half
        };
        Some(Decimal(adjusted / other.0))
    }
}

/// Parse errors for decimal literals (`set x = abc`, `if timer is NaN`, …).
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("not a number: {0:?}")]
pub struct ParseDecimalError(pub String);

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseDecimalError(s.to_string()));
        }
        let (sign, rest) = match s.strip_prefix('-') {
            Some(rest) => (-1i128, rest),
            None => (1i128, s.strip_prefix('+').unwrap_or(s)),
        };
        let mut parts = rest.splitn(2, '.');
        let int_part = parts.next().unwrap_or("");
        let frac_part = parts.next();
        if int_part.is_empty() && frac_part.is_none() {
            return Err(ParseDecimalError(s.to_string()));
        }
        let int_value: i128 = if int_part.is_empty() {
            0
        } else {
            int_part
                .parse()
                .map_err(|_| ParseDecimalError(s.to_string()))?
        };
        let mut scaled = int_value
            .checked_mul(SCALE)
            .ok_or_else(|| ParseDecimalError(s.to_string()))?;
        if let Some(frac) = frac_part {
            if frac.is_empty() || !frac.chars().all(|c| c.is_ascii_digit()) {
                return Err(ParseDecimalError(s.to_string()));
            }
            let digits = frac.len().min(9);
            let frac_value: i128 = frac[..digits]
                .parse()
                .map_err(|_| ParseDecimalError(s.to_string()))?;
            let pad = SCALE / 10i128.pow(digits as u32);
            scaled += frac_value * pad;
        }
        Ok(Decimal(sign * scaled))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let neg = self.0 < 0;
        let mag = self.0.unsigned_abs();
        let int_part = mag / SCALE as u128;
        let frac_part = mag % SCALE as u128;
        if neg && (int_part != 0 || frac_part != 0) {
            write!(f, "-")?;
        }
        if frac_part == 0 {
            write!(f, "{int_part}")
        } else {
            let mut digits = format!("{frac_part:09}");
            while digits.ends_with('0') {
                digits.pop();
            }
            write!(f, "{int_part}.{digits}")
        }
    }
}

impl From<i64> for Decimal {
    fn from(v: i64) -> Self {
        Decimal::from_i64(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays_round_trip() {
        for s in ["0", "1", "-1", "2.5", "-2.5", "0.1", "100"] {
            let d: Decimal = s.parse().unwrap();
            assert_eq!(d.to_string(), s);
        }
    }

    #[test]
    fn arithmetic() {
        let a: Decimal = "2".parse().unwrap();
        let b: Decimal = "1".parse().unwrap();
        assert_eq!(a.checked_add(b).unwrap().to_string(), "3");
        assert_eq!(a.checked_sub(b).unwrap().to_string(), "1");
        assert_eq!(a.checked_mul(b).unwrap().to_string(), "2");
        assert_eq!(a.checked_div(b).unwrap().to_string(), "2");
    }

    #[test]
    fn rejects_garbage() {
        assert!("NaN".parse::<Decimal>().is_err());
        assert!("".parse::<Decimal>().is_err());
        assert!("1.2.3".parse::<Decimal>().is_err());
    }

    #[test]
    fn division_by_zero_is_none() {
        let a: Decimal = "1".parse().unwrap();
        assert_eq!(a.checked_div(Decimal::ZERO), None);
    }
}
