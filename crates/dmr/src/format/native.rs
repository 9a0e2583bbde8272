//! Native notation.

use std::fmt::{self, Write};

use crate::format::indent;
use crate::model::Value;

/// Bytes rendered per line in multi-line mode.
const BYTES_PER_LINE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    SingleLine,
    MultiLine,
    /// Multi-line only where it helps: bytes longer than one line,
    /// non-empty lists and objects.
    Auto,
}

/// Renders `value` in native notation at the given indentation depth.
pub fn format_native<W: Write>(w: &mut W, value: &Value, level: usize, multi_line: bool) -> fmt::Result {
    let layout = if multi_line {
        Layout::MultiLine
    } else {
        Layout::SingleLine
    };
    write_value(w, value, level, layout)
}

/// Renders `value` in native notation, picking multi-line layout per element.
///
/// Bytes go multi-line only when longer than eight; lists and objects go
/// multi-line when non-empty; scalars stay on one line.
pub fn format_native_pretty<W: Write>(w: &mut W, value: &Value, level: usize) -> fmt::Result {
    write_value(w, value, level, Layout::Auto)
}

fn write_value<W: Write>(w: &mut W, value: &Value, level: usize, layout: Layout) -> fmt::Result {
    match value {
        Value::Boolean(v) => write!(w, "{}", v),
        Value::Int(v) => write!(w, "{}", v),
        Value::Long(v) => write!(w, "{}L", v),
        Value::Double(v) => w.write_str(&format_double(*v)),
        Value::BigDecimal(v) => write!(w, "big decimal {}", v),
        Value::BigInteger(v) => write!(w, "big integer {}", v),
        Value::Bytes(v) => {
            let multi = match layout {
                Layout::SingleLine => false,
                Layout::MultiLine => true,
                Layout::Auto => v.len() > BYTES_PER_LINE,
            };
            write_bytes(w, v.as_slice(), level, multi)
        }
        Value::String(v) => write_quoted(w, v),
        Value::Expression(v) => {
            w.write_str("expression ")?;
            write_quoted(w, v.as_str())
        }
        Value::List(items) => {
            if items.is_empty() {
                return w.write_str("[]");
            }
            w.write_char('[')?;
            let multi = layout != Layout::SingleLine;
            for (i, item) in items.iter().enumerate() {
                if multi {
                    w.write_char('\n')?;
                    indent(w, level + 1)?;
                } else if i > 0 {
                    w.write_str(", ")?;
                }
                write_value(w, item, level + 1, layout)?;
                if multi && i + 1 < items.len() {
                    w.write_char(',')?;
                }
            }
            if multi {
                w.write_char('\n')?;
                indent(w, level)?;
            }
            w.write_char(']')
        }
        Value::Object(entries) => {
            if entries.is_empty() {
                return w.write_str("{}");
            }
            w.write_char('{')?;
            let multi = layout != Layout::SingleLine;
            for (i, (key, item)) in entries.iter().enumerate() {
                if multi {
                    w.write_char('\n')?;
                    indent(w, level + 1)?;
                } else if i > 0 {
                    w.write_str(", ")?;
                }
                write_quoted(w, key)?;
                w.write_str(" => ")?;
                write_value(w, item, level + 1, layout)?;
                if multi && i + 1 < entries.len() {
                    w.write_char(',')?;
                }
            }
            if multi {
                w.write_char('\n')?;
                indent(w, level)?;
            }
            w.write_char('}')
        }
        Value::Property { name, value } => {
            w.write_char('(')?;
            write_quoted(w, name)?;
            w.write_str(" => ")?;
            write_value(w, value, level, layout)?;
            w.write_char(')')
        }
        Value::Undefined => w.write_str("undefined"),
    }
}

fn write_bytes<W: Write>(w: &mut W, bytes: &[u8], level: usize, multi: bool) -> fmt::Result {
    w.write_str("bytes {")?;
    if multi {
        w.write_char('\n')?;
        indent(w, level + 1)?;
    } else {
        w.write_char(' ')?;
    }
    for (i, b) in bytes.iter().enumerate() {
        write!(w, "0x{:02x}", b)?;
        if i + 1 != bytes.len() {
            if multi && i % BYTES_PER_LINE == BYTES_PER_LINE - 1 {
                w.write_str(",\n")?;
                indent(w, level + 1)?;
            } else {
                w.write_str(", ")?;
            }
        }
    }
    if multi {
        w.write_char('\n')?;
        indent(w, level)?;
    } else {
        w.write_char(' ')?;
    }
    w.write_char('}')
}

/// Double-quotes `s`, escaping `"` and `\`.
fn write_quoted<W: Write>(w: &mut W, s: &str) -> fmt::Result {
    w.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => w.write_str("\\\"")?,
            '\\' => w.write_str("\\\\")?,
            _ => w.write_char(c)?,
        }
    }
    w.write_char('"')
}

/// Shortest round-trip form of a double.
pub(crate) fn format_double(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        let s = if v > 0.0 { "Infinity" } else { "-Infinity" };
        s.to_string()
    } else {
        format!("{:?}", v)
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigInt;

    use super::*;

    fn single(v: &Value) -> String {
        v.to_native_string(false)
    }

    fn multi(v: &Value) -> String {
        v.to_native_string(true)
    }

    #[test]
    fn test_scalars() {
        assert_eq!(single(&Value::Boolean(true)), "true");
        assert_eq!(single(&Value::Int(-3)), "-3");
        assert_eq!(single(&Value::Long(42)), "42L");
        assert_eq!(single(&Value::Double(1.0)), "1.0");
        assert_eq!(single(&Value::Double(f64::NEG_INFINITY)), "-Infinity");
        assert_eq!(single(&Value::BigDecimal("1.50".parse().unwrap())), "big decimal 1.50");
        assert_eq!(single(&Value::BigInteger(BigInt::from(-12))), "big integer -12");
        assert_eq!(single(&Value::from("a\"b\\c")), "\"a\\\"b\\\\c\"");
        assert_eq!(single(&Value::expression("${x}")), "expression \"${x}\"");
        assert_eq!(single(&Value::Undefined), "undefined");
    }

    #[test]
    fn test_bytes_single_line() {
        let v = Value::from(&[0x01u8, 0xAB, 0x00][..]);
        assert_eq!(single(&v), "bytes { 0x01, 0xab, 0x00 }");
        assert_eq!(single(&Value::from(Vec::<u8>::new())), "bytes {  }");
    }

    #[test]
    fn test_bytes_multi_line_groups_eight() {
        let v = Value::from((0u8..10).collect::<Vec<_>>());
        assert_eq!(
            multi(&v),
            "bytes {\n    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07,\n    0x08, 0x09\n}"
        );
    }

    #[test]
    fn test_pretty_keeps_short_bytes_on_one_line() {
        let short = Value::from(vec![1u8; 8]);
        assert_eq!(short.to_pretty_string(), single(&short));
        let long = Value::from(vec![1u8; 9]);
        assert_eq!(long.to_pretty_string(), multi(&long));
    }

    #[test]
    fn test_collections() {
        let v = Value::object([
            ("a", Value::Int(1)),
            ("b", Value::list([Value::Long(2), Value::from("x")])),
        ]);
        assert_eq!(single(&v), "{\"a\" => 1, \"b\" => [2L, \"x\"]}");
        assert_eq!(
            multi(&v),
            "{\n    \"a\" => 1,\n    \"b\" => [\n        2L,\n        \"x\"\n    ]\n}"
        );
        assert_eq!(single(&Value::List(vec![])), "[]");
        assert_eq!(multi(&Value::Object(vec![])), "{}");
        assert_eq!(single(&Value::property("k", true)), "(\"k\" => true)");
    }

    #[test]
    fn test_display_matches_single_line() {
        let v = Value::list([Value::from(&[0xFFu8][..]), Value::Undefined]);
        assert_eq!(v.to_string(), "[bytes { 0xff }, undefined]");
        assert_eq!(v.as_string().unwrap(), v.to_string());
    }

    #[test]
    fn test_nested_bytes_indent() {
        let v = Value::list([Value::from(vec![7u8; 9])]);
        assert_eq!(
            v.to_pretty_string(),
            "[\n    bytes {\n        0x07, 0x07, 0x07, 0x07, 0x07, 0x07, 0x07, 0x07,\n        0x07\n    }\n]"
        );
    }
}
