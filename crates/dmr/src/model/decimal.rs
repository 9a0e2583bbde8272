//! Arbitrary-precision decimal numbers.
//!
//! A decimal is stored as `unscaled * 10^-scale`, where the unscaled value is
//! an arbitrary-precision integer. The scale is part of the value: `1.0` and
//! `1.00` are different decimals, the same way they carry different wire
//! payloads.
//!
//! Display uses plain notation unless that would pad more than
//! [`MAX_PLAIN_PADDING`] zeros, in which case it switches to `1.5E+3000`
//! style scientific notation.

use std::fmt::{self, Write};
use std::str::FromStr;

use num_bigint::{BigInt, Sign};
use num_traits::{ToPrimitive, Zero};
use thiserror::Error;

/// Most zeros plain notation may pad with before switching to scientific.
pub const MAX_PLAIN_PADDING: usize = 1024;

/// Error returned when a string is not a decimal literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid decimal literal: {text:?}")]
pub struct ParseDecimalError {
    pub text: String,
}

/// Arbitrary-precision decimal: value = unscaled * 10^-scale.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BigDecimal {
    unscaled: BigInt,
    scale: i32,
}

impl BigDecimal {
    /// Creates a decimal from its unscaled value and scale.
    pub fn new(unscaled: BigInt, scale: i32) -> Self {
        Self { unscaled, scale }
    }

    /// Returns the unscaled integer.
    pub fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    /// Returns the scale (number of digits right of the decimal point).
    pub fn scale(&self) -> i32 {
        self.scale
    }

    /// Returns true if the value is zero at any scale.
    pub fn is_zero(&self) -> bool {
        self.unscaled.is_zero()
    }

    /// Converts a double using its shortest round-trip decimal digits.
    ///
    /// The scale follows the conventional double-to-text rendering: at least
    /// one fractional digit, so `100.0` has scale 1 and `1e21` is `1.0E+21`
    /// with scale -20. Zero is `0.0`. Returns `None` for NaN and infinities.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        if value == 0.0 {
            return Some(Self::new(BigInt::zero(), 1));
        }

        let magnitude = value.abs();
        let text = format!("{:e}", magnitude);
        let (mantissa, exponent) = text.split_once('e')?;
        let exponent: i32 = exponent.parse().ok()?;
        let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
        let frac_digits = digits.len() as i32 - 1;

        // Scale of the bare digits; the rendered scale only ever adds zeros.
        let natural = frac_digits - exponent;
        let scale = if (1e-3..1e7).contains(&magnitude) {
            natural.max(1)
        } else {
            frac_digits.max(1) - exponent
        };

        let mut unscaled = BigInt::parse_bytes(digits.as_bytes(), 10)?;
        unscaled *= ten_pow((scale - natural) as u32);
        if value < 0.0 {
            unscaled = -unscaled;
        }
        Some(Self::new(unscaled, scale))
    }

    /// Truncates toward zero to an integer.
    ///
    /// The result is exact, so a scale of `-n` allocates an `n`-digit
    /// integer. Decoded values have their scale bounded by
    /// [`MAX_DECIMAL_SCALE`](crate::limits::MAX_DECIMAL_SCALE).
    pub fn to_big_integer(&self) -> BigInt {
        if self.scale <= 0 {
            return &self.unscaled * ten_pow(self.scale.unsigned_abs());
        }
        let digits = self.unscaled.magnitude().to_string().len();
        if self.scale as usize > digits {
            return BigInt::zero();
        }
        &self.unscaled / ten_pow(self.scale as u32)
    }

    /// Returns the low 64 bits of the truncated integer.
    ///
    /// Never materializes the integer for large negative scales: `10^n` is a
    /// multiple of `2^64` once `n >= 64`, so those low bits are all zero.
    pub fn to_i64_wrapping(&self) -> i64 {
        if self.scale <= -64 || self.unscaled.is_zero() {
            return 0;
        }
        low_i64(&self.to_big_integer())
    }

    /// Returns the nearest double.
    pub fn to_f64(&self) -> f64 {
        // Scientific form keeps the string short for extreme scales.
        let text = format!("{}e{}", self.unscaled, -(self.scale as i64));
        text.parse().unwrap_or(f64::NAN)
    }
}

impl From<BigInt> for BigDecimal {
    fn from(unscaled: BigInt) -> Self {
        Self::new(unscaled, 0)
    }
}

impl From<i64> for BigDecimal {
    fn from(value: i64) -> Self {
        Self::new(BigInt::from(value), 0)
    }
}

impl FromStr for BigDecimal {
    type Err = ParseDecimalError;

    /// Parses `[+-]digits[.digits][(e|E)[+-]digits]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseDecimalError { text: s.to_string() };

        let (mantissa, exponent) = match s.find(['e', 'E']) {
            Some(pos) => {
                let exp: i64 = s[pos + 1..].parse().map_err(|_| invalid())?;
                (&s[..pos], exp)
            }
            None => (s, 0),
        };

        let (negative, unsigned) = match mantissa.as_bytes().first() {
            Some(b'-') => (true, &mantissa[1..]),
            Some(b'+') => (false, &mantissa[1..]),
            _ => (false, mantissa),
        };

        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((i, f)) => (i, f),
            None => (unsigned, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let digits = format!("{}{}", int_part, frac_part);
        let magnitude = BigInt::parse_bytes(digits.as_bytes(), 10).ok_or_else(invalid)?;
        let unscaled = if negative { -magnitude } else { magnitude };

        let scale = frac_part.len() as i64 - exponent;
        let scale = i32::try_from(scale).map_err(|_| invalid())?;

        Ok(Self::new(unscaled, scale))
    }
}

impl fmt::Display for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.unscaled.magnitude().to_string();
        let padding = if self.scale <= 0 {
            self.scale.unsigned_abs() as usize
        } else {
            (self.scale as usize).saturating_sub(digits.len())
        };
        if padding > MAX_PLAIN_PADDING {
            return write_scientific(f, self.unscaled.sign() == Sign::Minus, &digits, self.scale);
        }

        if self.unscaled.is_zero() && self.scale <= 0 {
            return f.write_str("0");
        }
        if self.unscaled.sign() == Sign::Minus {
            f.write_str("-")?;
        }
        if self.scale <= 0 {
            f.write_str(&digits)?;
            return write_zeros(f, padding);
        }

        let scale = self.scale as usize;
        if digits.len() > scale {
            let (int_part, frac_part) = digits.split_at(digits.len() - scale);
            write!(f, "{}.{}", int_part, frac_part)
        } else {
            f.write_str("0.")?;
            write_zeros(f, padding)?;
            f.write_str(&digits)
        }
    }
}

/// `d.dddE+n`, with the exponent adjusted to a single leading digit.
fn write_scientific(f: &mut fmt::Formatter<'_>, negative: bool, digits: &str, scale: i32) -> fmt::Result {
    if negative {
        f.write_str("-")?;
    }
    let (lead, rest) = digits.split_at(1);
    f.write_str(lead)?;
    if !rest.is_empty() {
        write!(f, ".{}", rest)?;
    }
    let exponent = (digits.len() as i64 - 1) - scale as i64;
    write!(f, "E{:+}", exponent)
}

fn write_zeros(f: &mut fmt::Formatter<'_>, count: usize) -> fmt::Result {
    for _ in 0..count {
        f.write_char('0')?;
    }
    Ok(())
}

fn ten_pow(exp: u32) -> BigInt {
    num_traits::pow(BigInt::from(10u8), exp as usize)
}

/// Returns the low 64 bits of a two's complement integer.
pub(crate) fn low_i64(value: &BigInt) -> i64 {
    if let Some(v) = value.to_i64() {
        return v;
    }
    let bytes = value.to_signed_bytes_le();
    let fill = if value.sign() == Sign::Minus { 0xFF } else { 0x00 };
    let mut buf = [fill; 8];
    for (dst, src) in buf.iter_mut().zip(bytes.iter()) {
        *dst = *src;
    }
    i64::from_le_bytes(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(dec("12.340").to_string(), "12.340");
        assert_eq!(dec("12.340").scale(), 3);
        assert_eq!(dec("-0.005").to_string(), "-0.005");
        assert_eq!(dec("1.5E3").to_string(), "1500");
        assert_eq!(dec("1.5E3").scale(), -2);
        assert_eq!(dec("1e-3").to_string(), "0.001");
        assert_eq!(dec(".5").to_string(), "0.5");
        assert_eq!(dec("7.").to_string(), "7");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for s in ["", "-", ".", "1.2.3", "abc", "1e", "1x", "--1"] {
            assert!(s.parse::<BigDecimal>().is_err(), "accepted {:?}", s);
        }
    }

    #[test]
    fn test_scale_is_significant() {
        assert_ne!(dec("1.0"), dec("1.00"));
        assert_eq!(dec("1.0"), BigDecimal::new(BigInt::from(10), 1));
    }

    #[test]
    fn test_from_f64_uses_shortest_repr() {
        assert_eq!(BigDecimal::from_f64(0.1).unwrap(), dec("0.1"));
        assert_eq!(BigDecimal::from_f64(-2.5).unwrap(), dec("-2.5"));
        assert_eq!(BigDecimal::from_f64(1.234e-5).unwrap(), dec("1.234E-5"));
        assert_eq!(BigDecimal::from_f64(0.001).unwrap(), dec("0.001"));
        assert!(BigDecimal::from_f64(f64::NAN).is_none());
        assert!(BigDecimal::from_f64(f64::INFINITY).is_none());
    }

    #[test]
    fn test_from_f64_keeps_one_fractional_digit() {
        let hundred = BigDecimal::from_f64(100.0).unwrap();
        assert_eq!(hundred, BigDecimal::new(BigInt::from(1000), 1));
        assert_eq!(hundred.to_string(), "100.0");
        assert_eq!(BigDecimal::from_f64(0.0).unwrap(), BigDecimal::new(BigInt::zero(), 1));
        assert_eq!(BigDecimal::from_f64(-0.0).unwrap().to_string(), "0.0");
        assert_eq!(BigDecimal::from_f64(1e7).unwrap(), BigDecimal::new(BigInt::from(10), -6));
        assert_eq!(BigDecimal::from_f64(1e21).unwrap(), BigDecimal::new(BigInt::from(10), -20));
        assert_eq!(BigDecimal::from_f64(-5e-4).unwrap(), BigDecimal::new(BigInt::from(-50), 5));
    }

    #[test]
    fn test_to_big_integer_truncates() {
        assert_eq!(dec("9.99").to_big_integer(), BigInt::from(9));
        assert_eq!(dec("-9.99").to_big_integer(), BigInt::from(-9));
        assert_eq!(dec("12e2").to_big_integer(), BigInt::from(1200));
        assert_eq!(BigDecimal::new(BigInt::from(5), i32::MAX).to_big_integer(), BigInt::zero());
    }

    #[test]
    fn test_to_big_integer_extreme_scales() {
        let tiny = BigDecimal::new(BigInt::from(123), i32::MAX - 1);
        assert_eq!(tiny.to_big_integer(), BigInt::zero());
        let huge = BigDecimal::new(BigInt::from(3), -200);
        assert_eq!(huge.to_big_integer(), BigInt::from(3) * ten_pow(200));
    }

    #[test]
    fn test_to_i64_wrapping_skips_huge_powers() {
        assert_eq!(BigDecimal::new(BigInt::from(1), i32::MIN).to_i64_wrapping(), 0);
        assert_eq!(BigDecimal::new(BigInt::from(-7), -64).to_i64_wrapping(), 0);
        assert_eq!(BigDecimal::new(BigInt::from(1), -63).to_i64_wrapping(), low_i64(&ten_pow(63)));
        assert_eq!(dec("-12.9").to_i64_wrapping(), -12);
        assert_eq!(BigDecimal::new(BigInt::from(5), i32::MAX).to_i64_wrapping(), 0);
    }

    #[test]
    fn test_display_switches_to_scientific_for_extreme_scales() {
        assert_eq!(BigDecimal::new(BigInt::from(1), i32::MIN).to_string(), "1E+2147483648");
        assert_eq!(BigDecimal::new(BigInt::from(-15), -2000).to_string(), "-1.5E+2001");
        assert_eq!(BigDecimal::new(BigInt::from(25), i32::MAX).to_string(), "2.5E-2147483646");
        assert_eq!(BigDecimal::new(BigInt::zero(), -5000).to_string(), "0E+5000");

        let at_limit = BigDecimal::new(BigInt::from(1), -(MAX_PLAIN_PADDING as i32));
        assert_eq!(at_limit.to_string().len(), MAX_PLAIN_PADDING + 1);
    }

    #[test]
    fn test_scientific_display_parses_back() {
        for d in [
            BigDecimal::new(BigInt::from(-15), -2000),
            BigDecimal::new(BigInt::from(987), 5000),
            BigDecimal::new(BigInt::from(1), i32::MIN),
        ] {
            assert_eq!(d.to_string().parse::<BigDecimal>().unwrap(), d);
        }
    }

    #[test]
    fn test_to_f64() {
        assert_eq!(dec("0.25").to_f64(), 0.25);
        assert_eq!(dec("-1e300").to_f64(), -1e300);
    }

    #[test]
    fn test_low_i64_wraps() {
        assert_eq!(low_i64(&BigInt::from(-5)), -5);
        let big = BigInt::from(u64::MAX) + BigInt::from(2);
        assert_eq!(low_i64(&big), 1);
        let neg: BigInt = -(BigInt::from(1u8) << 64usize) - BigInt::from(1);
        assert_eq!(low_i64(&neg), -1);
    }
}
