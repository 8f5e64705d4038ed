//! Sequential byte-buffer reader.
//!
//! [`ByteReader`] wraps a byte slice and advances a cursor as fields are
//! read off the front, mirroring the accessor set the firmware container
//! and encrypted-block formats are built from: fixed-width little- and
//! big-endian integers, length-prefixed byte strings, and raw skips.

use crate::error::{CoreError, Result};

/// A cursor over a borrowed byte slice.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Wrap `data` starting at offset zero.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Number of bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Current read offset from the start of the original slice.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The unread tail of the buffer.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(CoreError::unexpected_eof(n, self.remaining()));
        }
        let chunk = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(chunk)
    }

    /// Advance the cursor by `n` bytes without returning them.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n)?;
        Ok(())
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Read `n` raw bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n)
    }

    /// Read a little-endian `i32`.
    pub fn read_i32_le(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.take(4)?.try_into().unwrap()))
    }

    /// Read a little-endian `u32`.
    pub fn read_u32_le(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.take(4)?.try_into().unwrap()))
    }

    /// Read a big-endian `u32`.
    pub fn read_u32_be(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.take(4)?.try_into().unwrap()))
    }

    /// Read a little-endian `f32`.
    pub fn read_f32_le(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.take(4)?.try_into().unwrap()))
    }

    /// Read a little-endian `i16`.
    pub fn read_i16_le(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.take(2)?.try_into().unwrap()))
    }

    /// Read a little-endian `u16`.
    pub fn read_u16_le(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.take(2)?.try_into().unwrap()))
    }

    /// Read a big-endian `u16`.
    pub fn read_u16_be(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.take(2)?.try_into().unwrap()))
    }

    /// Read a single length-prefixed byte string: one length byte followed
    /// by that many bytes.
    pub fn read_byte_string(&mut self) -> Result<&'a [u8]> {
        let len = self.read_u8()? as usize;
        self.read_bytes(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_and_big_endian() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut r = ByteReader::new(&data);
        assert_eq!(r.clone().read_u32_le().unwrap(), 0x0403_0201);
        assert_eq!(r.read_u32_be().unwrap(), 0x0102_0304);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn eof_on_short_read() {
        let data = [0x01, 0x02];
        let mut r = ByteReader::new(&data);
        let err = r.read_u32_le().unwrap_err();
        assert!(matches!(
            err,
            CoreError::UnexpectedEof {
                needed: 4,
                available: 2
            }
        ));
    }

    #[test]
    fn length_prefixed_byte_string() {
        let data = [0x03, b'a', b'b', b'c', 0xFF];
        let mut r = ByteReader::new(&data);
        assert_eq!(r.read_byte_string().unwrap(), b"abc");
        assert_eq!(r.read_u8().unwrap(), 0xFF);
    }

    #[test]
    fn skip_advances_cursor() {
        let data = [0u8; 10];
        let mut r = ByteReader::new(&data);
        r.skip(4).unwrap();
        assert_eq!(r.position(), 4);
        assert_eq!(r.remaining(), 6);
        assert!(r.skip(100).is_err());
    }
}
