//! JSON rendering.
//!
//! Kinds without a JSON counterpart render as a one-entry object keyed by a
//! type marker, e.g. `{ "BYTES_VALUE" : "3q2+7w==" }`.

use std::fmt::{self, Write};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::format::indent;
use crate::format::native::format_double;
use crate::model::{Kind, Value};

/// Renders `value` as JSON at the given indentation depth.
///
/// Multi-line mode breaks after opening and before closing delimiters;
/// single-line mode pads the inside of non-empty delimiters with one space.
pub fn format_json<W: Write>(w: &mut W, value: &Value, level: usize, multi_line: bool) -> fmt::Result {
    match value {
        Value::Boolean(v) => write!(w, "{}", v),
        Value::Int(v) => write!(w, "{}", v),
        Value::Long(v) => write!(w, "{}", v),
        Value::Double(v) => {
            if v.is_finite() {
                w.write_str(&format_double(*v))
            } else {
                w.write_str(&json_escape(&format_double(*v)))
            }
        }
        Value::String(v) => w.write_str(&json_escape(v)),
        Value::BigDecimal(v) => write_marker(w, Kind::BigDecimal, &json_escape(&v.to_string()), level, multi_line),
        Value::BigInteger(v) => write_marker(w, Kind::BigInteger, &json_escape(&v.to_string()), level, multi_line),
        Value::Bytes(v) => write_marker(
            w,
            Kind::Bytes,
            &json_escape(&STANDARD.encode(v.as_slice())),
            level,
            multi_line,
        ),
        Value::Expression(v) => write_marker(w, Kind::Expression, &json_escape(v.as_str()), level, multi_line),
        Value::Undefined => write_marker(w, Kind::Undefined, "null", level, multi_line),
        Value::List(items) => {
            if items.is_empty() {
                return w.write_str("[]");
            }
            w.write_char('[')?;
            open(w, level, multi_line)?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    separate(w, level, multi_line)?;
                }
                format_json(w, item, level + 1, multi_line)?;
            }
            close(w, level, multi_line)?;
            w.write_char(']')
        }
        Value::Object(entries) => {
            if entries.is_empty() {
                return w.write_str("{}");
            }
            w.write_char('{')?;
            open(w, level, multi_line)?;
            for (i, (key, item)) in entries.iter().enumerate() {
                if i > 0 {
                    separate(w, level, multi_line)?;
                }
                w.write_str(&json_escape(key))?;
                w.write_str(" : ")?;
                format_json(w, item, level + 1, multi_line)?;
            }
            close(w, level, multi_line)?;
            w.write_char('}')
        }
        Value::Property { name, value } => {
            w.write_char('{')?;
            open(w, level, multi_line)?;
            w.write_str(&json_escape(name))?;
            w.write_str(" : ")?;
            format_json(w, value, level + 1, multi_line)?;
            close(w, level, multi_line)?;
            w.write_char('}')
        }
    }
}

/// Returns the marker key for a kind, e.g. `BYTES_VALUE`.
pub fn type_marker(kind: Kind) -> String {
    format!("{}_VALUE", kind.name())
}

fn write_marker<W: Write>(w: &mut W, kind: Kind, payload: &str, level: usize, multi_line: bool) -> fmt::Result {
    w.write_char('{')?;
    open(w, level, multi_line)?;
    w.write_str(&json_escape(&type_marker(kind)))?;
    w.write_str(" : ")?;
    w.write_str(payload)?;
    close(w, level, multi_line)?;
    w.write_char('}')
}

fn open<W: Write>(w: &mut W, level: usize, multi_line: bool) -> fmt::Result {
    if multi_line {
        w.write_char('\n')?;
        indent(w, level + 1)
    } else {
        w.write_char(' ')
    }
}

fn separate<W: Write>(w: &mut W, level: usize, multi_line: bool) -> fmt::Result {
    if multi_line {
        w.write_str(",\n")?;
        indent(w, level + 1)
    } else {
        w.write_str(", ")
    }
}

fn close<W: Write>(w: &mut W, level: usize, multi_line: bool) -> fmt::Result {
    if multi_line {
        w.write_char('\n')?;
        indent(w, level)
    } else {
        w.write_char(' ')
    }
}

/// Quotes `s` as a JSON string, escaping quotes, backslashes, and control characters.
pub fn json_escape(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\""))
}
