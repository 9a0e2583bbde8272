//! Safety limits applied while decoding untrusted input.
//!
//! Every length read from the wire is checked against these before any
//! allocation happens. `DecodeOptions` carries a copy so callers can tighten
//! them per call.

/// Maximum byte length of a bytes payload (64 MiB).
pub const MAX_BYTES_LEN: usize = 64 * 1024 * 1024;

/// Maximum byte length of a string, expression, key, or property name (16 MiB).
pub const MAX_STRING_LEN: usize = 16 * 1024 * 1024;

/// Maximum byte length of a big integer or big decimal magnitude.
pub const MAX_BIG_NUMBER_LEN: usize = 64 * 1024;

/// Maximum magnitude of a big decimal scale.
///
/// A scale of `-n` stands for `n` trailing zeros, so an unbounded scale lets
/// a ten-byte payload demand gigabytes once the value is printed or
/// truncated to an integer.
pub const MAX_DECIMAL_SCALE: u32 = 16 * 1024;

/// Maximum element count of a list or object.
pub const MAX_COLLECTION_LEN: usize = 1024 * 1024;

/// Maximum nesting depth of lists, objects, and properties.
pub const MAX_DEPTH: usize = 256;
