//! Value encoding/decoding.
//!
//! Every value is one tag byte (see [`Kind`]) followed by a kind-specific
//! payload:
//!
//! | kind | payload |
//! |---|---|
//! | boolean | `0x00` or `0x01` |
//! | int | 4-byte two's complement |
//! | long | 8-byte two's complement |
//! | double | 8-byte IEEE 754 |
//! | big integer | length, two's complement bytes |
//! | big decimal | length, unscaled two's complement bytes, 4-byte scale |
//! | bytes | length, raw bytes |
//! | string, expression | length, UTF-8 bytes |
//! | list | count, values |
//! | object | count, (length-prefixed key, value) pairs |
//! | property | length-prefixed name, value |
//! | undefined | nothing |

use num_bigint::BigInt;
use tracing::trace;

use crate::codec::primitives::{Reader, Writer};
use crate::error::{DecodeError, EncodeError};
use crate::expression::Expression;
use crate::limits::{
    MAX_BIG_NUMBER_LEN, MAX_BYTES_LEN, MAX_COLLECTION_LEN, MAX_DECIMAL_SCALE, MAX_DEPTH, MAX_STRING_LEN,
};
use crate::model::{BigDecimal, Blob, Kind, Value};

/// Limits applied while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximum length of a bytes payload.
    pub max_bytes_len: usize,
    /// Maximum length of a string, expression, key, or property name.
    pub max_string_len: usize,
    /// Maximum length of a big integer or big decimal magnitude.
    pub max_big_number_len: usize,
    /// Maximum magnitude of a big decimal scale.
    pub max_decimal_scale: u32,
    /// Maximum element count of a list or object.
    pub max_collection_len: usize,
    /// Maximum nesting depth.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_bytes_len: MAX_BYTES_LEN,
            max_string_len: MAX_STRING_LEN,
            max_big_number_len: MAX_BIG_NUMBER_LEN,
            max_decimal_scale: MAX_DECIMAL_SCALE,
            max_collection_len: MAX_COLLECTION_LEN,
            max_depth: MAX_DEPTH,
        }
    }
}

impl DecodeOptions {
    /// Creates options with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the maximum magnitude of a big decimal scale.
    pub fn with_max_decimal_scale(mut self, max_decimal_scale: u32) -> Self {
        self.max_decimal_scale = max_decimal_scale;
        self
    }

    /// Sets the maximum bytes, string, and collection lengths.
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_bytes_len = max_len;
        self.max_string_len = max_len;
        self.max_big_number_len = max_len;
        self.max_collection_len = max_len;
        self
    }
}

// =============================================================================
// DECODING
// =============================================================================

/// Decodes a complete buffer holding exactly one value.
pub fn decode(data: &[u8]) -> Result<Value, DecodeError> {
    decode_with_options(data, &DecodeOptions::default())
}

/// Decodes a complete buffer holding exactly one value, with custom limits.
pub fn decode_with_options(data: &[u8], options: &DecodeOptions) -> Result<Value, DecodeError> {
    let mut reader = Reader::new(data);
    let value = decode_value(&mut reader, options)?;
    if !reader.is_empty() {
        return Err(DecodeError::TrailingBytes {
            count: reader.remaining_len(),
        });
    }
    Ok(value)
}

/// Decodes the next value from the reader.
pub fn decode_value(reader: &mut Reader<'_>, options: &DecodeOptions) -> Result<Value, DecodeError> {
    decode_at_depth(reader, options, 0)
}

fn decode_at_depth(
    reader: &mut Reader<'_>,
    options: &DecodeOptions,
    depth: usize,
) -> Result<Value, DecodeError> {
    if depth > options.max_depth {
        return Err(DecodeError::DepthExceeded {
            max: options.max_depth,
        });
    }

    let tag = reader.read_byte("tag")?;
    let kind = Kind::from_u8(tag).ok_or(DecodeError::UnknownTag { tag })?;
    trace!("decoding {} at offset {}", kind.name(), reader.position() - 1);

    match kind {
        Kind::Boolean => decode_bool(reader),
        Kind::Int => Ok(Value::Int(reader.read_i32("int")?)),
        Kind::Long => Ok(Value::Long(reader.read_i64("long")?)),
        Kind::Double => Ok(Value::Double(reader.read_f64("double")?)),
        Kind::BigInteger => {
            let bytes = reader.read_bytes_prefixed(options.max_big_number_len, "big_integer")?;
            Ok(Value::BigInteger(BigInt::from_signed_bytes_be(bytes)))
        }
        Kind::BigDecimal => decode_big_decimal(reader, options),
        Kind::Bytes => {
            let bytes = reader.read_bytes_prefixed(options.max_bytes_len, "bytes")?;
            Ok(Value::Bytes(Blob::new(bytes)))
        }
        Kind::String => Ok(Value::String(
            reader.read_string(options.max_string_len, "string")?,
        )),
        Kind::Expression => Ok(Value::Expression(Expression::new(
            reader.read_string(options.max_string_len, "expression")?,
        ))),
        Kind::List => {
            let count = reader.read_len(options.max_collection_len, "list")?;
            // Every element takes at least one byte.
            let mut items = Vec::with_capacity(count.min(reader.remaining_len()));
            for _ in 0..count {
                items.push(decode_at_depth(reader, options, depth + 1)?);
            }
            Ok(Value::List(items))
        }
        Kind::Object => {
            let count = reader.read_len(options.max_collection_len, "object")?;
            let mut entries = Vec::with_capacity(count.min(reader.remaining_len() / 5));
            for _ in 0..count {
                let key = reader.read_string(options.max_string_len, "object.key")?;
                let value = decode_at_depth(reader, options, depth + 1)?;
                entries.push((key, value));
            }
            Ok(Value::Object(entries))
        }
        Kind::Property => {
            let name = reader.read_string(options.max_string_len, "property.name")?;
            let value = decode_at_depth(reader, options, depth + 1)?;
            Ok(Value::Property {
                name,
                value: Box::new(value),
            })
        }
        Kind::Undefined => Ok(Value::Undefined),
    }
}

fn decode_big_decimal(reader: &mut Reader<'_>, options: &DecodeOptions) -> Result<Value, DecodeError> {
    let bytes = reader.read_bytes_prefixed(options.max_big_number_len, "big_decimal")?;
    let scale = reader.read_i32("big_decimal.scale")?;
    if scale.unsigned_abs() > options.max_decimal_scale {
        return Err(DecodeError::ScaleExceedsLimit {
            scale,
            max: options.max_decimal_scale,
        });
    }
    Ok(Value::BigDecimal(BigDecimal::new(
        BigInt::from_signed_bytes_be(bytes),
        scale,
    )))
}

fn decode_bool(reader: &mut Reader<'_>) -> Result<Value, DecodeError> {
    let byte = reader.read_byte("boolean")?;
    match byte {
        0x00 => Ok(Value::Boolean(false)),
        0x01 => Ok(Value::Boolean(true)),
        _ => Err(DecodeError::InvalidBool { value: byte }),
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes a value into a new buffer.
pub fn encode(value: &Value) -> Result<Vec<u8>, EncodeError> {
    let mut writer = Writer::new();
    encode_value(&mut writer, value)?;
    Ok(writer.into_bytes())
}

/// Encodes a value, appending to the writer.
pub fn encode_value(writer: &mut Writer, value: &Value) -> Result<(), EncodeError> {
    writer.write_byte(value.kind().tag());

    match value {
        Value::Boolean(v) => writer.write_byte(*v as u8),
        Value::Int(v) => writer.write_i32(*v),
        Value::Long(v) => writer.write_i64(*v),
        Value::Double(v) => writer.write_f64(*v),
        Value::BigInteger(v) => {
            writer.write_bytes_prefixed(&v.to_signed_bytes_be(), "big_integer")?;
        }
        Value::BigDecimal(v) => {
            writer.write_bytes_prefixed(&v.unscaled().to_signed_bytes_be(), "big_decimal")?;
            writer.write_i32(v.scale());
        }
        Value::Bytes(v) => writer.write_bytes_prefixed(v.as_slice(), "bytes")?,
        Value::String(v) => writer.write_string(v, "string")?,
        Value::Expression(v) => writer.write_string(v.as_str(), "expression")?,
        Value::List(items) => {
            writer.write_len(items.len(), "list")?;
            for item in items {
                encode_value(writer, item)?;
            }
        }
        Value::Object(entries) => {
            writer.write_len(entries.len(), "object")?;
            for (key, item) in entries {
                writer.write_string(key, "object.key")?;
                encode_value(writer, item)?;
            }
        }
        Value::Property { name, value } => {
            writer.write_string(name, "property.name")?;
            encode_value(writer, value)?;
        }
        Value::Undefined => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(value: &Value) -> Value {
        let bytes = encode(value).unwrap();
        decode(&bytes).unwrap()
    }

    #[test]
    fn test_scalar_roundtrip() {
        let values = [
            Value::Boolean(true),
            Value::Boolean(false),
            Value::Int(i32::MIN),
            Value::Long(i64::MAX),
            Value::Double(-0.0),
            Value::Double(f64::NAN),
            Value::Double(f64::INFINITY),
            Value::BigInteger(BigInt::from(-1234567890123456789i64) * BigInt::from(1000)),
            Value::BigDecimal("-12.3400".parse().unwrap()),
            Value::BigDecimal("5e10".parse().unwrap()),
            Value::from(&[0xDEu8, 0xAD][..]),
            Value::from(""),
            Value::from("unicode: \u{1F600}"),
            Value::expression("${a:b}"),
            Value::Undefined,
        ];

        for value in values {
            assert_eq!(roundtrip(&value), value);
        }
    }

    #[test]
    fn test_nested_roundtrip() {
        let value = Value::object([
            ("list", Value::list([Value::Int(1), Value::Undefined, Value::list(Vec::<Value>::new())])),
            ("prop", Value::property("inner", Value::object([("k", 1i64), ("k", 2i64)]))),
            ("empty", Value::Object(vec![])),
        ]);
        assert_eq!(roundtrip(&value), value);
    }

    #[test]
    fn test_bytes_layout() {
        let bytes = encode(&Value::from(&[1u8, 2, 3][..])).unwrap();
        assert_eq!(bytes, vec![b'b', 0, 0, 0, 3, 1, 2, 3]);
    }

    #[test]
    fn test_double_layout() {
        let bytes = encode(&Value::Double(1.0)).unwrap();
        assert_eq!(bytes, vec![b'D', 0x3F, 0xF0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_scalar_layouts() {
        assert_eq!(encode(&Value::Boolean(true)).unwrap(), vec![b'Z', 1]);
        assert_eq!(encode(&Value::Int(-2)).unwrap(), vec![b'I', 0xFF, 0xFF, 0xFF, 0xFE]);
        assert_eq!(encode(&Value::from("hi")).unwrap(), vec![b's', 0, 0, 0, 2, b'h', b'i']);
        assert_eq!(encode(&Value::Undefined).unwrap(), vec![b'u']);
        assert_eq!(
            encode(&Value::BigDecimal("1.5".parse().unwrap())).unwrap(),
            vec![b'd', 0, 0, 0, 1, 15, 0, 0, 0, 1]
        );
        assert_eq!(
            encode(&Value::property("a", true)).unwrap(),
            vec![b'p', 0, 0, 0, 1, b'a', b'Z', 1]
        );
    }

    #[test]
    fn test_unknown_tag() {
        assert!(matches!(decode(&[b'x']), Err(DecodeError::UnknownTag { tag: b'x' })));
        assert_eq!(decode(&[0x00]).unwrap_err().code(), crate::error::ErrorCode::UnknownTag);
    }

    #[test]
    fn test_truncated_input() {
        assert!(matches!(decode(&[]), Err(DecodeError::UnexpectedEof { context: "tag" })));
        assert!(matches!(
            decode(&[b'b', 0, 0, 0, 4, 1, 2]),
            Err(DecodeError::UnexpectedEof { context: "bytes" })
        ));
        assert!(matches!(
            decode(&[b'D', 0x3F, 0xF0]),
            Err(DecodeError::UnexpectedEof { context: "double" })
        ));
        assert!(matches!(
            decode(&[b'l', 0, 0, 0, 2, b'Z', 1]),
            Err(DecodeError::UnexpectedEof { context: "tag" })
        ));
    }

    #[test]
    fn test_invalid_bool() {
        assert!(matches!(decode(&[b'Z', 2]), Err(DecodeError::InvalidBool { value: 2 })));
    }

    #[test]
    fn test_trailing_bytes() {
        assert!(matches!(
            decode(&[b'u', b'u']),
            Err(DecodeError::TrailingBytes { count: 1 })
        ));
    }

    #[test]
    fn test_streamed_values() {
        let mut writer = Writer::new();
        encode_value(&mut writer, &Value::Int(1)).unwrap();
        encode_value(&mut writer, &Value::from("two")).unwrap();

        let mut reader = Reader::new(writer.as_bytes());
        let options = DecodeOptions::default();
        assert_eq!(decode_value(&mut reader, &options).unwrap(), Value::Int(1));
        assert_eq!(decode_value(&mut reader, &options).unwrap(), Value::from("two"));
        assert!(reader.is_empty());
    }

    #[test]
    fn test_depth_limit() {
        let mut value = Value::Int(0);
        for _ in 0..5 {
            value = Value::list([value]);
        }
        let bytes = encode(&value).unwrap();

        let options = DecodeOptions::new().with_max_depth(4);
        assert!(matches!(
            decode_with_options(&bytes, &options),
            Err(DecodeError::DepthExceeded { max: 4 })
        ));
        let options = DecodeOptions::new().with_max_depth(5);
        assert_eq!(decode_with_options(&bytes, &options).unwrap(), value);
    }

    #[test]
    fn test_length_limit() {
        let bytes = encode(&Value::from("too long")).unwrap();
        let options = DecodeOptions::new().with_max_len(4);
        assert!(matches!(
            decode_with_options(&bytes, &options),
            Err(DecodeError::LengthExceedsLimit { field: "string", len: 8, max: 4 })
        ));
    }

    #[test]
    fn test_extreme_decimal_scale_rejected() {
        let data = [b'd', 0, 0, 0, 1, 1, 0x80, 0, 0, 0];
        let err = decode(&data).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::ScaleExceedsLimit { scale: i32::MIN, max: MAX_DECIMAL_SCALE }
        ));
        assert_eq!(err.code(), crate::error::ErrorCode::MalformedEncoding);

        let data = [b'd', 0, 0, 0, 1, 1, 0x7F, 0xFF, 0xFF, 0xFF];
        assert!(matches!(
            decode(&data),
            Err(DecodeError::ScaleExceedsLimit { scale: i32::MAX, .. })
        ));
    }

    #[test]
    fn test_decimal_scale_limit_is_configurable() {
        let value = Value::BigDecimal(BigDecimal::new(BigInt::from(7), -300));
        let bytes = encode(&value).unwrap();

        let options = DecodeOptions::new().with_max_decimal_scale(299);
        assert!(matches!(
            decode_with_options(&bytes, &options),
            Err(DecodeError::ScaleExceedsLimit { scale: -300, max: 299 })
        ));

        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded, value);
        assert_eq!(decoded.as_i64().unwrap(), 0);
        assert_eq!(decoded.to_string().len(), "big decimal ".len() + 301);
    }

    #[test]
    fn test_huge_declared_count_does_not_preallocate() {
        let data = [b'l', 0x00, 0x0F, 0xFF, 0xFF];
        assert!(matches!(decode(&data), Err(DecodeError::UnexpectedEof { .. })));
    }
}
