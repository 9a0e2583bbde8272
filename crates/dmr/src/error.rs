//! Error types for value decoding, conversion, and expression resolution.

use thiserror::Error;

use crate::model::Kind;

/// Error codes grouping the decode failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E001: Input ended before a declared length or fixed width was satisfied
    Truncated,
    /// E002: Tag byte does not name a known kind
    UnknownTag,
    /// E003: Invalid UTF-8 encoding
    InvalidUtf8,
    /// E004: Length, depth, or payload violates a limit or the encoding rules
    MalformedEncoding,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::Truncated => "E001",
            ErrorCode::UnknownTag => "E002",
            ErrorCode::InvalidUtf8 => "E003",
            ErrorCode::MalformedEncoding => "E004",
        }
    }
}

/// Error during binary decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    // === E001: Truncated input ===
    #[error("[E001] unexpected end of input while reading {context}")]
    UnexpectedEof { context: &'static str },

    // === E002: Unknown tag ===
    #[error("[E002] unknown value tag: 0x{tag:02x}")]
    UnknownTag { tag: u8 },

    // === E003: Invalid UTF-8 ===
    #[error("[E003] invalid UTF-8 in {field}")]
    InvalidUtf8 { field: &'static str },

    // === E004: Malformed encoding ===
    #[error("[E004] {field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("[E004] invalid bool value: {value} (expected 0x00 or 0x01)")]
    InvalidBool { value: u8 },

    #[error("[E004] big decimal scale {scale} exceeds maximum magnitude {max}")]
    ScaleExceedsLimit { scale: i32, max: u32 },

    #[error("[E004] nesting depth exceeds maximum {max}")]
    DepthExceeded { max: usize },

    #[error("[E004] {count} trailing bytes after value")]
    TrailingBytes { count: usize },
}

impl DecodeError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DecodeError::UnexpectedEof { .. } => ErrorCode::Truncated,
            DecodeError::UnknownTag { .. } => ErrorCode::UnknownTag,
            DecodeError::InvalidUtf8 { .. } => ErrorCode::InvalidUtf8,
            _ => ErrorCode::MalformedEncoding,
        }
    }
}

/// Error during binary encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("{field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

/// Error from the value conversion surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("cannot convert undefined value to {target}")]
    Undefined { target: &'static str },

    #[error("cannot convert {kind:?} text {text:?} to {target}")]
    Unparseable {
        kind: Kind,
        target: &'static str,
        text: String,
    },

    #[error("cannot convert non-finite double {value} to {target}")]
    NonFinite { value: String, target: &'static str },
}

/// Error during expression resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    /// The input ended inside `${` before a terminator was seen.
    #[error("incomplete expression: {partial}")]
    Malformed { partial: String },

    /// No alternative resolved and no default clause was present.
    #[error("failed to resolve expression: {expression}")]
    Unresolved { expression: String },
}
