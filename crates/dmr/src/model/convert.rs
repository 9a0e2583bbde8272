//! Conversion surface shared by every value kind.
//!
//! Each kind defines a coercion rule for every target type. The only
//! conversions that fail are those on an undefined value (use the `_or`
//! forms to supply a default), unparseable string or expression text, and a
//! non-finite double widened to a decimal.
//!
//! The `_or` forms ignore their default for any defined value.

use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};

use crate::error::ConversionError;
use crate::expression::Expression;
use crate::model::decimal::low_i64;
use crate::model::{BigDecimal, Kind, Value};

impl Value {
    /// Converts to a 64-bit integer.
    pub fn as_i64(&self) -> Result<i64, ConversionError> {
        const TARGET: &str = "long";
        Ok(match self {
            Value::Boolean(v) => *v as i64,
            Value::Int(v) => *v as i64,
            Value::Long(v) => *v,
            Value::Double(v) => *v as i64,
            Value::BigDecimal(v) => v.to_i64_wrapping(),
            Value::BigInteger(v) => low_i64(v),
            Value::Bytes(v) => bytes_to_u64(v.as_slice()) as i64,
            Value::String(s) => parse_text(Kind::String, s, TARGET)?,
            Value::Expression(e) => parse_text(Kind::Expression, e.as_str(), TARGET)?,
            Value::List(items) => items.len() as i64,
            Value::Object(entries) => entries.len() as i64,
            Value::Property { value, .. } => value.as_i64()?,
            Value::Undefined => return Err(ConversionError::Undefined { target: TARGET }),
        })
    }

    /// Converts to a 64-bit integer, or `default` if undefined.
    pub fn as_i64_or(&self, default: i64) -> Result<i64, ConversionError> {
        match self {
            Value::Undefined => Ok(default),
            _ => self.as_i64(),
        }
    }

    /// Converts to a 32-bit integer.
    pub fn as_i32(&self) -> Result<i32, ConversionError> {
        const TARGET: &str = "int";
        Ok(match self {
            Value::Boolean(v) => *v as i32,
            Value::Int(v) => *v,
            Value::Long(v) => *v as i32,
            Value::Double(v) => *v as i32,
            Value::BigDecimal(v) => v.to_i64_wrapping() as i32,
            Value::BigInteger(v) => low_i64(v) as i32,
            Value::Bytes(v) => bytes_to_u32(v.as_slice()) as i32,
            Value::String(s) => parse_text(Kind::String, s, TARGET)?,
            Value::Expression(e) => parse_text(Kind::Expression, e.as_str(), TARGET)?,
            Value::List(items) => items.len() as i32,
            Value::Object(entries) => entries.len() as i32,
            Value::Property { value, .. } => value.as_i32()?,
            Value::Undefined => return Err(ConversionError::Undefined { target: TARGET }),
        })
    }

    /// Converts to a 32-bit integer, or `default` if undefined.
    pub fn as_i32_or(&self, default: i32) -> Result<i32, ConversionError> {
        match self {
            Value::Undefined => Ok(default),
            _ => self.as_i32(),
        }
    }

    /// Converts to a double.
    pub fn as_f64(&self) -> Result<f64, ConversionError> {
        const TARGET: &str = "double";
        Ok(match self {
            Value::Boolean(v) => {
                if *v {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Int(v) => *v as f64,
            Value::Long(v) => *v as f64,
            Value::Double(v) => *v,
            Value::BigDecimal(v) => v.to_f64(),
            Value::BigInteger(v) => v.to_f64().unwrap_or(f64::NAN),
            Value::Bytes(v) => f64::from_bits(bytes_to_u64(v.as_slice())),
            Value::String(s) => parse_text(Kind::String, s, TARGET)?,
            Value::Expression(e) => parse_text(Kind::Expression, e.as_str(), TARGET)?,
            Value::List(items) => items.len() as f64,
            Value::Object(entries) => entries.len() as f64,
            Value::Property { value, .. } => value.as_f64()?,
            Value::Undefined => return Err(ConversionError::Undefined { target: TARGET }),
        })
    }

    /// Converts to a double, or `default` if undefined.
    pub fn as_f64_or(&self, default: f64) -> Result<f64, ConversionError> {
        match self {
            Value::Undefined => Ok(default),
            _ => self.as_f64(),
        }
    }

    /// Converts to a boolean.
    pub fn as_bool(&self) -> Result<bool, ConversionError> {
        const TARGET: &str = "boolean";
        Ok(match self {
            Value::Boolean(v) => *v,
            Value::Int(v) => *v != 0,
            Value::Long(v) => *v != 0,
            Value::Double(v) => *v != 0.0,
            Value::BigDecimal(v) => !v.is_zero(),
            Value::BigInteger(v) => !v.is_zero(),
            Value::Bytes(v) => v.as_slice().iter().any(|b| *b != 0),
            Value::String(s) => parse_bool(Kind::String, s)?,
            Value::Expression(e) => parse_bool(Kind::Expression, e.as_str())?,
            Value::List(items) => !items.is_empty(),
            Value::Object(entries) => !entries.is_empty(),
            Value::Property { value, .. } => value.as_bool()?,
            Value::Undefined => return Err(ConversionError::Undefined { target: TARGET }),
        })
    }

    /// Converts to a boolean, or `default` if undefined.
    pub fn as_bool_or(&self, default: bool) -> Result<bool, ConversionError> {
        match self {
            Value::Undefined => Ok(default),
            _ => self.as_bool(),
        }
    }

    /// Converts to an arbitrary-precision decimal.
    pub fn as_big_decimal(&self) -> Result<BigDecimal, ConversionError> {
        const TARGET: &str = "big decimal";
        Ok(match self {
            Value::Boolean(v) => BigDecimal::from(*v as i64),
            Value::Int(v) => BigDecimal::from(*v as i64),
            Value::Long(v) => BigDecimal::from(*v),
            Value::Double(v) => {
                BigDecimal::from_f64(*v).ok_or_else(|| ConversionError::NonFinite {
                    value: v.to_string(),
                    target: TARGET,
                })?
            }
            Value::BigDecimal(v) => v.clone(),
            Value::BigInteger(v) => BigDecimal::from(v.clone()),
            Value::Bytes(v) => BigDecimal::from(BigInt::from_signed_bytes_be(v.as_slice())),
            Value::String(s) => parse_text(Kind::String, s, TARGET)?,
            Value::Expression(e) => parse_text(Kind::Expression, e.as_str(), TARGET)?,
            Value::List(items) => BigDecimal::from(items.len() as i64),
            Value::Object(entries) => BigDecimal::from(entries.len() as i64),
            Value::Property { value, .. } => value.as_big_decimal()?,
            Value::Undefined => return Err(ConversionError::Undefined { target: TARGET }),
        })
    }

    /// Converts to an arbitrary-precision decimal, or `default` if undefined.
    pub fn as_big_decimal_or(&self, default: BigDecimal) -> Result<BigDecimal, ConversionError> {
        match self {
            Value::Undefined => Ok(default),
            _ => self.as_big_decimal(),
        }
    }

    /// Converts to an arbitrary-precision integer.
    pub fn as_big_integer(&self) -> Result<BigInt, ConversionError> {
        const TARGET: &str = "big integer";
        Ok(match self {
            Value::Boolean(v) => BigInt::from(*v as u8),
            Value::Int(v) => BigInt::from(*v),
            Value::Long(v) => BigInt::from(*v),
            // Saturating truncation toward zero, then widen.
            Value::Double(v) => BigInt::from(*v as i64),
            Value::BigDecimal(v) => v.to_big_integer(),
            Value::BigInteger(v) => v.clone(),
            Value::Bytes(v) => BigInt::from_signed_bytes_be(v.as_slice()),
            Value::String(s) => parse_text(Kind::String, s, TARGET)?,
            Value::Expression(e) => parse_text(Kind::Expression, e.as_str(), TARGET)?,
            Value::List(items) => BigInt::from(items.len()),
            Value::Object(entries) => BigInt::from(entries.len()),
            Value::Property { value, .. } => value.as_big_integer()?,
            Value::Undefined => return Err(ConversionError::Undefined { target: TARGET }),
        })
    }

    /// Converts to an arbitrary-precision integer, or `default` if undefined.
    pub fn as_big_integer_or(&self, default: BigInt) -> Result<BigInt, ConversionError> {
        match self {
            Value::Undefined => Ok(default),
            _ => self.as_big_integer(),
        }
    }

    /// Converts to bytes. The result is always a fresh copy.
    pub fn as_bytes(&self) -> Result<Vec<u8>, ConversionError> {
        const TARGET: &str = "bytes";
        Ok(match self {
            Value::Boolean(v) => vec![*v as u8],
            Value::Int(v) => v.to_be_bytes().to_vec(),
            Value::Long(v) => v.to_be_bytes().to_vec(),
            Value::Double(v) => v.to_bits().to_be_bytes().to_vec(),
            Value::BigDecimal(v) => {
                let mut bytes = v.scale().to_be_bytes().to_vec();
                bytes.extend_from_slice(&v.unscaled().to_signed_bytes_be());
                bytes
            }
            Value::BigInteger(v) => v.to_signed_bytes_be(),
            Value::Bytes(v) => v.to_vec(),
            Value::String(s) => s.as_bytes().to_vec(),
            Value::Expression(e) => e.as_str().as_bytes().to_vec(),
            Value::List(_) | Value::Object(_) => self.to_string().into_bytes(),
            Value::Property { value, .. } => value.as_bytes()?,
            Value::Undefined => return Err(ConversionError::Undefined { target: TARGET }),
        })
    }

    /// Converts to bytes, or `default` if undefined.
    pub fn as_bytes_or(&self, default: Vec<u8>) -> Result<Vec<u8>, ConversionError> {
        match self {
            Value::Undefined => Ok(default),
            _ => self.as_bytes(),
        }
    }

    /// Converts to a string.
    ///
    /// Strings and expressions yield their raw text; every other defined
    /// kind yields its single-line native rendering.
    pub fn as_string(&self) -> Result<String, ConversionError> {
        match self {
            Value::String(s) => Ok(s.clone()),
            Value::Expression(e) => Ok(e.as_str().to_string()),
            Value::Undefined => Err(ConversionError::Undefined { target: "string" }),
            _ => Ok(self.to_string()),
        }
    }

    /// Converts to a string, or `default` if undefined.
    pub fn as_string_or(&self, default: impl Into<String>) -> Result<String, ConversionError> {
        match self {
            Value::Undefined => Ok(default.into()),
            _ => self.as_string(),
        }
    }

    /// Converts to an expression wrapping this value's string form.
    pub fn as_expression(&self) -> Result<Expression, ConversionError> {
        match self {
            Value::Expression(e) => Ok(e.clone()),
            Value::Undefined => Err(ConversionError::Undefined { target: "expression" }),
            _ => Ok(Expression::new(self.as_string()?)),
        }
    }

    /// Converts to an expression, or `default` if undefined.
    pub fn as_expression_or(&self, default: Expression) -> Result<Expression, ConversionError> {
        match self {
            Value::Undefined => Ok(default),
            _ => self.as_expression(),
        }
    }
}

/// Low-order 8 bytes, big-endian, zero-extended.
fn bytes_to_u64(bytes: &[u8]) -> u64 {
    let start = bytes.len().saturating_sub(8);
    bytes[start..].iter().fold(0u64, |v, b| (v << 8) | *b as u64)
}

/// Low-order 4 bytes, big-endian, zero-extended.
fn bytes_to_u32(bytes: &[u8]) -> u32 {
    let start = bytes.len().saturating_sub(4);
    bytes[start..].iter().fold(0u32, |v, b| (v << 8) | *b as u32)
}

fn parse_text<T: std::str::FromStr>(
    kind: Kind,
    text: &str,
    target: &'static str,
) -> Result<T, ConversionError> {
    text.trim().parse().map_err(|_| ConversionError::Unparseable {
        kind,
        target,
        text: text.to_string(),
    })
}

fn parse_bool(kind: Kind, text: &str) -> Result<bool, ConversionError> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ConversionError::Unparseable {
            kind,
            target: "boolean",
            text: text.to_string(),
        })
    }
}
