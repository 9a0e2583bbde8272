//! Text renderings of values.
//!
//! Two independent renderers share the same shape: a target writer, the
//! current indentation depth, and a single-line or multi-line mode.
//! - [`native`]: the library's own notation (`bytes { 0x01 }`, `42L`, ...)
//! - [`json`]: standard JSON, with `{ "<KIND>_VALUE" : ... }` markers for
//!   kinds JSON cannot express
//!
//! One indentation level is four spaces.

pub mod json;
pub mod native;

use std::fmt;

pub use json::{format_json, json_escape};
pub use native::{format_native, format_native_pretty};

use crate::model::Value;

const INDENT: &str = "    ";

fn indent<W: fmt::Write>(w: &mut W, level: usize) -> fmt::Result {
    for _ in 0..level {
        w.write_str(INDENT)?;
    }
    Ok(())
}

impl Value {
    /// Renders in native notation.
    pub fn to_native_string(&self, multi_line: bool) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = format_native(&mut out, self, 0, multi_line);
        out
    }

    /// Renders in native notation, choosing multi-line layout per element.
    pub fn to_pretty_string(&self) -> String {
        let mut out = String::new();
        let _ = format_native_pretty(&mut out, self, 0);
        out
    }

    /// Renders as JSON.
    pub fn to_json_string(&self, multi_line: bool) -> String {
        let mut out = String::new();
        let _ = format_json(&mut out, self, 0, multi_line);
        out
    }
}

impl fmt::Display for Value {
    /// Single-line native notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_native(f, self, 0, false)
    }
}
