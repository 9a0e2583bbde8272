//! Primitive encoding/decoding for the value wire format.
//!
//! All fixed-width numbers are big-endian. Lengths and counts are 4-byte
//! unsigned big-endian integers.

use crate::error::{DecodeError, EncodeError};

// =============================================================================
// DECODING
// =============================================================================

/// Reader for decoding binary data.
///
/// Wraps a byte slice and provides methods for reading primitives
/// with bounds checking and error handling.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader from a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the current position in the data.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of remaining bytes.
    pub fn remaining_len(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns true if all data has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Reads a single byte.
    #[inline]
    pub fn read_byte(&mut self, context: &'static str) -> Result<u8, DecodeError> {
        if self.pos >= self.data.len() {
            return Err(DecodeError::UnexpectedEof { context });
        }
        let byte = self.data[self.pos];
        self.pos += 1;
        Ok(byte)
    }

    /// Reads exactly n bytes.
    #[inline]
    pub fn read_bytes(&mut self, n: usize, context: &'static str) -> Result<&'a [u8], DecodeError> {
        if n > self.remaining_len() {
            return Err(DecodeError::UnexpectedEof { context });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Reads exactly N bytes into an array.
    #[inline]
    fn read_array<const N: usize>(&mut self, context: &'static str) -> Result<[u8; N], DecodeError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.read_bytes(N, context)?);
        Ok(buf)
    }

    /// Reads a big-endian u32.
    #[inline]
    pub fn read_u32(&mut self, context: &'static str) -> Result<u32, DecodeError> {
        Ok(u32::from_be_bytes(self.read_array(context)?))
    }

    /// Reads a big-endian i32.
    #[inline]
    pub fn read_i32(&mut self, context: &'static str) -> Result<i32, DecodeError> {
        Ok(i32::from_be_bytes(self.read_array(context)?))
    }

    /// Reads a big-endian i64.
    #[inline]
    pub fn read_i64(&mut self, context: &'static str) -> Result<i64, DecodeError> {
        Ok(i64::from_be_bytes(self.read_array(context)?))
    }

    /// Reads a big-endian IEEE 754 f64. NaN payloads are preserved.
    #[inline]
    pub fn read_f64(&mut self, context: &'static str) -> Result<f64, DecodeError> {
        Ok(f64::from_bits(u64::from_be_bytes(self.read_array(context)?)))
    }

    /// Reads a 4-byte length and checks it against `max_len`.
    pub fn read_len(&mut self, max_len: usize, field: &'static str) -> Result<usize, DecodeError> {
        let len = self.read_u32(field)? as usize;
        if len > max_len {
            return Err(DecodeError::LengthExceedsLimit {
                field,
                len,
                max: max_len,
            });
        }
        Ok(len)
    }

    /// Reads a length-prefixed UTF-8 string.
    #[inline]
    pub fn read_string(
        &mut self,
        max_len: usize,
        field: &'static str,
    ) -> Result<String, DecodeError> {
        let bytes = self.read_bytes_prefixed(max_len, field)?;
        std::str::from_utf8(bytes)
            .map(|s| s.to_string())
            .map_err(|_| DecodeError::InvalidUtf8 { field })
    }

    /// Reads a length-prefixed byte array, borrowing from the input.
    pub fn read_bytes_prefixed(
        &mut self,
        max_len: usize,
        field: &'static str,
    ) -> Result<&'a [u8], DecodeError> {
        let len = self.read_len(max_len, field)?;
        self.read_bytes(len, field)
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Writer for encoding binary data.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Creates a new writer.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Returns the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Returns a reference to the written bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Returns the number of bytes written.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if no bytes have been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Writes a single byte.
    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Writes raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes a big-endian u32.
    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Writes a big-endian i32.
    #[inline]
    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Writes a big-endian i64.
    #[inline]
    pub fn write_i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Writes a big-endian IEEE 754 f64.
    #[inline]
    pub fn write_f64(&mut self, value: f64) {
        self.buf.extend_from_slice(&value.to_bits().to_be_bytes());
    }

    /// Writes a 4-byte length.
    pub fn write_len(&mut self, len: usize, field: &'static str) -> Result<(), EncodeError> {
        let len32 = u32::try_from(len).map_err(|_| EncodeError::LengthExceedsLimit {
            field,
            len,
            max: u32::MAX as usize,
        })?;
        self.write_u32(len32);
        Ok(())
    }

    /// Writes a length-prefixed UTF-8 string.
    pub fn write_string(&mut self, s: &str, field: &'static str) -> Result<(), EncodeError> {
        self.write_bytes_prefixed(s.as_bytes(), field)
    }

    /// Writes a length-prefixed byte array.
    pub fn write_bytes_prefixed(&mut self, bytes: &[u8], field: &'static str) -> Result<(), EncodeError> {
        self.write_len(bytes.len(), field)?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_width_is_big_endian() {
        let mut writer = Writer::new();
        writer.write_i32(0x0102_0304);
        writer.write_i64(-2);
        writer.write_f64(1.0);
        assert_eq!(
            writer.as_bytes(),
            &[
                0x01, 0x02, 0x03, 0x04, //
                0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE, //
                0x3F, 0xF0, 0, 0, 0, 0, 0, 0,
            ]
        );

        let mut reader = Reader::new(writer.as_bytes());
        assert_eq!(reader.read_i32("test").unwrap(), 0x0102_0304);
        assert_eq!(reader.read_i64("test").unwrap(), -2);
        assert_eq!(reader.read_f64("test").unwrap(), 1.0);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_f64_nan_bits_preserved() {
        let nan = f64::from_bits(0x7FF8_0000_0000_1234);
        let mut writer = Writer::new();
        writer.write_f64(nan);

        let mut reader = Reader::new(writer.as_bytes());
        assert_eq!(reader.read_f64("test").unwrap().to_bits(), nan.to_bits());
    }

    #[test]
    fn test_string_roundtrip() {
        let test_strings = ["", "hello", "hello world", "unicode: \u{1F600}"];

        for s in test_strings {
            let mut writer = Writer::new();
            writer.write_string(s, "test").unwrap();
            assert_eq!(writer.len(), 4 + s.len());

            let mut reader = Reader::new(writer.as_bytes());
            let decoded = reader.read_string(1000, "test").unwrap();
            assert_eq!(s, decoded);
        }
    }

    #[test]
    fn test_string_too_long() {
        let mut writer = Writer::new();
        writer.write_u32(1000);
        writer.write_bytes(&[0u8; 1000]);

        let mut reader = Reader::new(writer.as_bytes());
        let result = reader.read_string(100, "test");
        assert!(matches!(
            result,
            Err(DecodeError::LengthExceedsLimit { max: 100, .. })
        ));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut writer = Writer::new();
        writer.write_bytes_prefixed(&[0xC3, 0x28], "test").unwrap();

        let mut reader = Reader::new(writer.as_bytes());
        assert!(matches!(
            reader.read_string(100, "test"),
            Err(DecodeError::InvalidUtf8 { field: "test" })
        ));
    }

    #[test]
    fn test_unexpected_eof() {
        let data = [0u8; 5];
        let mut reader = Reader::new(&data);
        let result = reader.read_bytes(10, "test");
        assert!(matches!(result, Err(DecodeError::UnexpectedEof { .. })));

        let mut reader = Reader::new(&data[..3]);
        assert!(matches!(
            reader.read_i32("int"),
            Err(DecodeError::UnexpectedEof { context: "int" })
        ));
    }

    #[test]
    fn test_declared_length_past_end() {
        let mut writer = Writer::new();
        writer.write_u32(10);
        writer.write_bytes(&[1, 2, 3]);

        let mut reader = Reader::new(writer.as_bytes());
        assert!(matches!(
            reader.read_bytes_prefixed(100, "bytes"),
            Err(DecodeError::UnexpectedEof { context: "bytes" })
        ));
    }

    #[test]
    fn test_bytes_prefixed_borrows_payload() {
        let mut writer = Writer::new();
        writer.write_bytes_prefixed(&[7, 8, 9], "bytes").unwrap();
        writer.write_byte(0xAA);

        let mut reader = Reader::new(writer.as_bytes());
        assert_eq!(reader.read_bytes_prefixed(3, "bytes").unwrap(), &[7, 8, 9]);
        assert_eq!(reader.position(), 7);
        assert_eq!(reader.read_byte("tail").unwrap(), 0xAA);
    }
}
