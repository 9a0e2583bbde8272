//! DMR: a dynamically typed value model with a binary codec, text renderers,
//! and `${...}` expression resolution.
//!
//! # Overview
//!
//! A [`Value`] is one of thirteen kinds: scalars (boolean, int, long,
//! double, big decimal, big integer), byte blobs, strings, ordered lists,
//! objects with ordered (possibly duplicate) keys, named properties,
//! unresolved expressions, and the distinguished undefined value.
//! - **Self-describing**: every encoded value starts with a one-byte kind tag
//! - **Total conversions**: any value can be asked for any target type
//! - **Immutable**: payloads never alias caller buffers
//!
//! # Quick Start
//!
//! ```rust
//! use dmr::{decode, encode, Value};
//!
//! let value = Value::object([
//!     ("name", Value::from("widget")),
//!     ("sizes", Value::list([Value::Int(1), Value::Long(2)])),
//!     ("blob", Value::from(&[0xDEu8, 0xAD][..])),
//! ]);
//!
//! let bytes = encode(&value).unwrap();
//! let decoded = decode(&bytes).unwrap();
//! assert_eq!(value, decoded);
//!
//! assert_eq!(Value::from("42").as_i32().unwrap(), 42);
//! assert_eq!(
//!     value.to_json_string(false),
//!     r#"{ "name" : "widget", "sizes" : [ 1, 2 ], "blob" : { "BYTES_VALUE" : "3q0=" } }"#
//! );
//! ```
//!
//! # Modules
//!
//! - [`model`]: The value type, kinds, and conversions
//! - [`codec`]: Binary encoding/decoding
//! - [`format`]: Native and JSON text renderings
//! - [`expression`]: Expression parsing and name resolution
//! - [`error`]: Error types
//! - [`limits`]: Security limits for decoding
//!
//! # Security
//!
//! The decoder is designed to safely handle untrusted input:
//! - Declared lengths are checked against configurable limits before allocating
//! - Nesting depth and big decimal scale are bounded
//! - Truncated or trailing input is rejected with descriptive errors

pub mod codec;
pub mod error;
pub mod expression;
pub mod format;
pub mod limits;
pub mod model;

// Re-export commonly used types at crate root
pub use codec::{decode, decode_with_options, encode, DecodeOptions};
pub use error::{ConversionError, DecodeError, EncodeError, ExpressionError};
pub use expression::{Expression, ExpressionResolver, NameResolver, StandardResolver};
pub use model::{BigDecimal, Blob, Kind, Value};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
