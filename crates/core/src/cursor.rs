//! Bounds-checked reads over an immutable byte buffer.
//!
//! Every offset and size read out of a firmware image is untrusted, so all
//! three decoding stages slice through [`ByteCursor`] (or [`slice_at`]) and get a
//! [`DecodeError::OutOfBounds`] naming their [`Stage`] instead of a panic when
//! the data lies.

use crate::error::{DecodeError, DecodeResult, Stage};

/// Slice `len` bytes starting at `offset`, failing cleanly when out of range.
pub fn slice_at(buf: &[u8], offset: usize, len: usize, stage: Stage) -> DecodeResult<&[u8]> {
    let end = offset.checked_add(len).filter(|end| *end <= buf.len()).ok_or(
        DecodeError::OutOfBounds { stage, offset, len, available: buf.len() },
    )?;
    Ok(&buf[offset..end])
}

/// Read a little-endian `u32` at an absolute offset.
pub fn u32_le_at(buf: &[u8], offset: usize, stage: Stage) -> DecodeResult<u32> {
    let bytes = slice_at(buf, offset, 4, stage)?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Read a little-endian `u16` at an absolute offset.
pub fn u16_le_at(buf: &[u8], offset: usize, stage: Stage) -> DecodeResult<u16> {
    let bytes = slice_at(buf, offset, 2, stage)?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

/// Forward-only cursor over a borrowed buffer, owned by one decoding stage.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
    stage: Stage,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8], stage: Stage) -> Self {
        Self { buf, pos: 0, stage }
    }

    /// Start reading at `pos`. The position itself is not validated until a read.
    pub fn at(buf: &'a [u8], pos: usize, stage: Stage) -> Self {
        Self { buf, pos, stage }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Read the next `n` bytes and advance past them.
    pub fn read_bytes(&mut self, n: usize) -> DecodeResult<&'a [u8]> {
        let bytes = slice_at(self.buf, self.pos, n, self.stage)?;
        self.pos += n;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> DecodeResult<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16_le(&mut self) -> DecodeResult<u16> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32_le(&mut self) -> DecodeResult<u32> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Advance by `n` bytes without reading them. Skipping past the end fails.
    pub fn skip(&mut self, n: usize) -> DecodeResult<()> {
        self.read_bytes(n).map(|_| ())
    }
}
