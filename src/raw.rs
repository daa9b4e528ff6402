//! Primitive binary I/O for the EffDir format.
//!
//! All multi-byte values are little-endian; there is no byte-order
//! negotiation anywhere in the format.  [`ByteReader`] is an explicit
//! cursor over an in-memory slice — every read checks the remaining length
//! first and fails with [`EffDirError::UnexpectedEndOfInput`] rather than
//! guessing.  [`ByteWriter`] mirrors every read operation over any
//! `io::Write` sink; writes are total apart from sink failure.
//!
//! Counted strings are a 4-byte length followed by that many raw bytes,
//! decoded permissively (undecodable bytes are replaced, never fatal).  On
//! encode the length is always re-derived from the string itself, so a
//! stored count can never disagree with the bytes that follow it.

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use std::io::Write;

use crate::error::{EffDirError, Result};

// ── Reader ───────────────────────────────────────────────────────────────────

/// Cursor over a fully buffered input slice.
#[derive(Debug)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(EffDirError::UnexpectedEndOfInput {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.take(1)?[0] as i8)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(LittleEndian::read_i16(self.take(2)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.take(4)?))
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        Ok(self.take(n)?.to_vec())
    }

    /// Read an `n`-byte (1..=8) little-endian unsigned value.  Used for the
    /// format's bit-packed fields whose widths are not multiples of 32 bits.
    pub fn read_packed(&mut self, n: usize) -> Result<u64> {
        debug_assert!((1..=8).contains(&n));
        Ok(LittleEndian::read_uint(self.take(n)?, n))
    }

    /// Read a u32 byte length, then that many bytes, decoded permissively.
    pub fn read_counted_str(&mut self) -> Result<String> {
        let len = self.read_u32()? as usize;
        let bytes = self.take(len)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

// ── Writer ───────────────────────────────────────────────────────────────────

/// Mirror of [`ByteReader`] over any byte sink.
#[derive(Debug)]
pub struct ByteWriter<W: Write> {
    sink: W,
}

impl<W: Write> ByteWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    pub fn write_u8(&mut self, v: u8) -> Result<()> {
        Ok(self.sink.write_u8(v)?)
    }

    pub fn write_u16(&mut self, v: u16) -> Result<()> {
        Ok(self.sink.write_u16::<LittleEndian>(v)?)
    }

    pub fn write_u32(&mut self, v: u32) -> Result<()> {
        Ok(self.sink.write_u32::<LittleEndian>(v)?)
    }

    pub fn write_i8(&mut self, v: i8) -> Result<()> {
        Ok(self.sink.write_i8(v)?)
    }

    pub fn write_i16(&mut self, v: i16) -> Result<()> {
        Ok(self.sink.write_i16::<LittleEndian>(v)?)
    }

    pub fn write_i32(&mut self, v: i32) -> Result<()> {
        Ok(self.sink.write_i32::<LittleEndian>(v)?)
    }

    pub fn write_f32(&mut self, v: f32) -> Result<()> {
        Ok(self.sink.write_f32::<LittleEndian>(v)?)
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        Ok(self.sink.write_all(bytes)?)
    }

    /// Write an `n`-byte (1..=8) little-endian unsigned value.
    ///
    /// # Panics
    /// Panics if `v` does not fit in `n` bytes.  The schema engine checks
    /// the width before calling and reports a `MalformedEntry` instead.
    pub fn write_packed(&mut self, v: u64, n: usize) -> Result<()> {
        debug_assert!((1..=8).contains(&n));
        Ok(self.sink.write_uint::<LittleEndian>(v, n)?)
    }

    /// Write a counted string.  The length is derived from the string's own
    /// bytes — never from a stored count that could have gone stale.
    pub fn write_counted_str(&mut self, s: &str) -> Result<()> {
        self.write_u32(s.len() as u32)?;
        self.write_bytes(s.as_bytes())
    }
}
