//! # Primitive Wire Codecs
//!
//! Low-level byte-order reads and writes shared by the schema loader, encoder
//! and decoder.
//!
//! Everything on the wire is little-endian. 64-bit integers travel in one of
//! two forms: a 4-byte word sign-extended from 32 bits, or an 8-byte pair of
//! 32-bit words (low word first) combined as `high * 2^32 + low` with `high`
//! treated as signed. All arithmetic stays in genuine 64-bit integers; a
//! double loses precision above 2^53 and is never used as an intermediate.
//!
//! [`Reader`] is the bounds-checked cursor the parsers are built on: every
//! read either yields a value or reports exactly how the buffer fell short,
//! so no caller can run past the end of a slice.

use crate::error::{constants, CodecError, Result};

/// Read a little-endian u16 from the start of `buf`.
#[inline]
pub fn read_u16(buf: &[u8; 2]) -> u16 {
    u16::from_le_bytes(*buf)
}

/// Read a little-endian u32 from the start of `buf`.
#[inline]
pub fn read_u32(buf: &[u8; 4]) -> u32 {
    u32::from_le_bytes(*buf)
}

/// Sign-extend the 4-byte wire form of an integer.
#[inline]
pub fn expand64(word: u32) -> i64 {
    word as i32 as i64
}

/// Combine the 8-byte wire form of an integer from its two 32-bit words.
///
/// The high word carries the sign; the low word is unsigned. This is exactly
/// `high * 2^32 + low` in two's complement.
#[inline]
pub fn combine64(low: u32, high: u32) -> i64 {
    ((high as i64) << 32) | low as i64
}

/// Split an integer into the (low, high) words of its 8-byte wire form.
#[inline]
pub fn split64(value: i64) -> (u32, u32) {
    (value as u32, (value >> 32) as u32)
}

/// Whether `value` fits the 4-byte sign-extended wire form.
#[inline]
pub fn fits_word(value: i64) -> bool {
    value >= i32::MIN as i64 && value <= i32::MAX as i64
}

/// Decode an IEEE-754 double from its 8 raw little-endian bytes.
#[inline]
pub fn read_f64(buf: &[u8; 8]) -> f64 {
    f64::from_le_bytes(*buf)
}

/// Encode an IEEE-754 double to its 8 raw little-endian bytes.
#[inline]
pub fn write_f64(value: f64) -> [u8; 8] {
    value.to_le_bytes()
}

/// A bounds-checked forward cursor over a byte slice.
///
/// Short reads surface as [`CodecError::MalformedBuffer`] with a static
/// context message; the cursor never advances past the end of the slice.
#[derive(Debug, Clone, Copy)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Wrap a slice, positioned at its start.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Bytes consumed so far.
    pub fn consumed(&self) -> usize {
        self.pos
    }

    /// Take the next `n` bytes, or report which structure fell short.
    pub fn take(&mut self, n: usize, context: &'static str) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(CodecError::MalformedBuffer(context));
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    /// Read a little-endian u16.
    pub fn u16(&mut self, context: &'static str) -> Result<u16> {
        let bytes = self.take(2, context)?;
        Ok(read_u16(&[bytes[0], bytes[1]]))
    }

    /// Read a little-endian u32.
    pub fn u32(&mut self, context: &'static str) -> Result<u32> {
        let bytes = self.take(4, context)?;
        Ok(read_u32(&[bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a 4-byte length prefix followed by that many bytes of payload.
    pub fn length_prefixed(&mut self) -> Result<&'a [u8]> {
        let len = self.u32(constants::ERR_SHORT_LENGTH_PREFIX)? as usize;
        self.take(len, constants::ERR_SHORT_PAYLOAD)
    }
}
