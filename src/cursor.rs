//! Bounds-checked little-endian reader over a byte slice.

use crate::error::{Error, Result};

/// Cursor over an externally-owned byte buffer.
///
/// Every typed read advances the position by the type's width, or fails with
/// [`Error::OutOfData`] without advancing when too few bytes remain.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Creates a cursor positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current position in the stream.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total stream length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the stream holds no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left between the position and the end of the stream.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Moves the position to `pos`, clamped to the stream length.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.data.len());
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(Error::OutOfData {
                offset: self.pos,
                needed: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Reads `n` raw bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n)
    }

    /// Advances past `n` bytes without decoding them.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.take(1)?[0] as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        let b = self.take(2)?;
        Ok(i16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let b = self.take(4)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_reads_advance() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        let mut cursor = ByteCursor::new(&data);

        assert_eq!(cursor.read_u8().unwrap(), 0x01);
        assert_eq!(cursor.read_u16().unwrap(), 0x0302);
        assert_eq!(cursor.read_u32().unwrap(), 0x07060504);
        assert_eq!(cursor.position(), 7);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_out_of_data_does_not_advance() {
        let data = [0xAA, 0xBB];
        let mut cursor = ByteCursor::new(&data);
        cursor.read_u8().unwrap();

        let err = cursor.read_u32().unwrap_err();
        assert!(matches!(err, Error::OutOfData { offset: 1, .. }));
        // Position unchanged after a failed read.
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.read_u8().unwrap(), 0xBB);
    }

    #[test]
    fn test_signed_reads() {
        let data = [0xFF, 0xFE, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_i8().unwrap(), -1);
        assert_eq!(cursor.read_i16().unwrap(), -2);
        assert_eq!(cursor.read_i32().unwrap(), -1);
    }

    #[test]
    fn test_seek_clamps() {
        let data = [0u8; 4];
        let mut cursor = ByteCursor::new(&data);
        cursor.seek(100);
        assert_eq!(cursor.position(), 4);
        assert_eq!(cursor.remaining(), 0);
    }
}
