//! Binary encoding/decoding.
//!
//! Each value is one tag byte followed by a kind-specific payload. Values
//! carry no framing beyond that, so several can be written back to back into
//! one `Writer` and read back in order from one `Reader`.

pub mod primitives;
pub mod value;

pub use primitives::{Reader, Writer};
pub use value::{decode, decode_value, decode_with_options, encode, encode_value, DecodeOptions};
