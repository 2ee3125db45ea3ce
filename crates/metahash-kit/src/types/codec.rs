//! Wire codec for integers and byte strings.
//!
//! Integers use a tag-prefixed, fixed-width layout:
//!
//! | First byte | Value |
//! |------------|-------|
//! | `0x00..=0xf9` | the number itself (0-249) |
//! | `0xfa` | 16-bit little-endian |
//! | `0xfb` | 32-bit little-endian |
//! | `0xfc` | 64-bit little-endian |
//! | `0xfd` | 128-bit little-endian |
//! | `0xfe` | 256-bit little-endian |
//! | `0xff` | 512-bit little-endian |
//!
//! The tag picks the smallest width that holds the number; the magnitude is
//! written least-significant byte first and zero-padded up to the full width.
//! Byte strings are written as-is, except that an empty string is written as a
//! single `0x00`.
//!
//! # Example
//!
//! ```
//! use metahash_kit::codec::{Buffer, encode_integer};
//! use num_bigint::BigInt;
//!
//! assert_eq!(encode_integer(&BigInt::from(65536)).unwrap(), [0xfb, 0x00, 0x00, 0x01, 0x00]);
//!
//! let mut buffer = Buffer::new();
//! buffer.append_integer(&BigInt::from(249)).unwrap();
//! buffer.append_bytes(&[]);
//! assert_eq!(buffer.data(), [0xf9, 0x00]);
//! ```

use num_bigint::{BigInt, BigUint, Sign};

use crate::error::CodecError;

/// Largest bit length the codec can encode.
pub const MAX_BITS: u64 = 512;

/// Largest value written as a bare single byte.
pub const MAX_SINGLE_BYTE: u8 = 249;

/// Tag of the narrowest (16-bit) wide encoding.
const FIRST_WIDE_TAG: u8 = 250;

/// Widths selectable by the tags `0xfa..=0xff`, in tag order.
const WIDTHS: [u64; 6] = [16, 32, 64, 128, 256, 512];

/// Encode a non-negative integer.
///
/// Fails with [`CodecError::NegativeNumber`] for negative input and
/// [`CodecError::TooBig`] when the bit length exceeds [`MAX_BITS`].
pub fn encode_integer(number: &BigInt) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    write_integer(number, &mut out)?;
    Ok(out)
}

/// Encode a byte string. Empty input becomes a single zero byte.
pub fn encode_bytes(bytes: &[u8]) -> Vec<u8> {
    if bytes.is_empty() {
        vec![0]
    } else {
        bytes.to_vec()
    }
}

/// Decode one integer from the front of `bytes`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode_integer(bytes: &[u8]) -> Result<(BigInt, usize), CodecError> {
    let Some(&tag) = bytes.first() else {
        return Err(CodecError::Truncated {
            expected: 1,
            actual: 0,
        });
    };

    if tag < FIRST_WIDE_TAG {
        return Ok((BigInt::from(tag), 1));
    }

    let width_bytes = (WIDTHS[usize::from(tag - FIRST_WIDE_TAG)] / 8) as usize;
    let end = 1 + width_bytes;
    if bytes.len() < end {
        return Err(CodecError::Truncated {
            expected: end,
            actual: bytes.len(),
        });
    }

    let magnitude = BigUint::from_bytes_le(&bytes[1..end]);
    Ok((BigInt::from(magnitude), end))
}

fn write_integer(number: &BigInt, out: &mut Vec<u8>) -> Result<(), CodecError> {
    let (sign, magnitude) = number.to_bytes_le();
    if sign == Sign::Minus {
        return Err(CodecError::NegativeNumber);
    }

    let bits = number.bits();
    if bits > MAX_BITS {
        return Err(CodecError::TooBig { bits });
    }

    // Zero comes back from `to_bytes_le` as a single 0x00 byte.
    if bits <= 8 && magnitude[0] <= MAX_SINGLE_BYTE {
        out.push(magnitude[0]);
        return Ok(());
    }

    let (index, width) = WIDTHS
        .iter()
        .enumerate()
        .find(|(_, width)| **width >= bits)
        .ok_or(CodecError::TooBig { bits })?;

    out.push(FIRST_WIDE_TAG + index as u8);
    let start = out.len();
    out.extend_from_slice(&magnitude);
    out.resize(start + (*width / 8) as usize, 0);
    Ok(())
}

/// Accumulates encoded integers and byte strings in call order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Buffer {
    data: Vec<u8>,
}

impl Buffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an encoded integer. Nothing is written on error.
    pub fn append_integer(&mut self, number: &BigInt) -> Result<(), CodecError> {
        write_integer(number, &mut self.data)
    }

    /// Append an encoded byte string.
    pub fn append_bytes(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            self.data.push(0);
        } else {
            self.data.extend_from_slice(bytes);
        }
    }

    /// Hex-decode `s` and append it as a byte string.
    pub fn append_hex(&mut self, s: &str) -> Result<(), hex::FromHexError> {
        let bytes = hex::decode(s)?;
        self.append_bytes(&bytes);
        Ok(())
    }

    /// The bytes accumulated so far.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer, returning its bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Number of bytes accumulated.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
