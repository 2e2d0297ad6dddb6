use edid_wire::block::{BLOCK_SIZE, CHECKSUM_OFFSET, compute_checksum};

use crate::error::BuildError;

/// Positional writer over one 128-byte block.
///
/// `BlockWriter` lays records into a zero-initialized block from a moving
/// offset. Writes that would touch the checksum byte fail with
/// [`BuildError::BlockOverflow`]; the checksum is only ever written by
/// [`finish`](Self::finish).
///
/// ```text
///   ┌─────┬─────┬───────────────────────────────┬──────────┐
///   │ tag │ ver │ body written front to back →  │ checksum │
///   └─────┴─────┴───────────────────────────────┴──────────┘
///    0     1     2 ..                          126  127
/// ```
pub struct BlockWriter {
    buf: [u8; BLOCK_SIZE],
    pos: usize,
}

impl BlockWriter {
    /// Start a block with the given tag byte and position the writer
    /// after it.
    #[must_use]
    pub fn new(tag: u8) -> Self {
        let mut buf = [0u8; BLOCK_SIZE];
        buf[0] = tag;
        Self { buf, pos: 1 }
    }

    /// Current write offset.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left before the checksum.
    #[must_use]
    pub fn remaining(&self) -> usize {
        CHECKSUM_OFFSET - self.pos
    }

    /// Write one byte.
    ///
    /// # Errors
    ///
    /// [`BuildError::BlockOverflow`] once the body is full.
    pub fn write_u8(&mut self, value: u8) -> Result<&mut Self, BuildError> {
        self.write_bytes(&[value])
    }

    /// Write a little-endian `u16`.
    ///
    /// # Errors
    ///
    /// [`BuildError::BlockOverflow`] if fewer than 2 bytes remain.
    pub fn write_u16_le(&mut self, value: u16) -> Result<&mut Self, BuildError> {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Write a run of bytes.
    ///
    /// # Errors
    ///
    /// [`BuildError::BlockOverflow`] if the run does not fit before the
    /// checksum byte. Nothing is written in that case.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<&mut Self, BuildError> {
        if bytes.len() > self.remaining() {
            return Err(BuildError::BlockOverflow {
                offset: self.pos,
                len: bytes.len(),
            });
        }
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
        Ok(self)
    }

    /// Overwrite a byte that was already laid out (length and count
    /// fields that are only known after the payload is written).
    ///
    /// # Errors
    ///
    /// [`BuildError::BlockOverflow`] for the checksum offset or beyond.
    pub fn patch(&mut self, offset: usize, value: u8) -> Result<&mut Self, BuildError> {
        if offset >= CHECKSUM_OFFSET {
            return Err(BuildError::BlockOverflow { offset, len: 1 });
        }
        self.buf[offset] = value;
        Ok(self)
    }

    /// Read back a byte that was already laid out.
    #[must_use]
    pub fn get(&self, offset: usize) -> u8 {
        self.buf.get(offset).copied().unwrap_or(0)
    }

    /// Seal the block with a correct checksum.
    #[must_use]
    pub fn finish(self) -> [u8; BLOCK_SIZE] {
        let mut buf = self.buf;
        buf[CHECKSUM_OFFSET] = compute_checksum(&buf[..CHECKSUM_OFFSET]);
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_advance_and_checksum_seals() {
        let mut w = BlockWriter::new(0x10);
        w.write_u8(0x01).unwrap().write_u16_le(0x0201).unwrap();
        assert_eq!(w.position(), 4);
        let block = w.finish();
        assert_eq!(&block[..4], &[0x10, 0x01, 0x01, 0x02]);
        let sum = block.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
        assert_eq!(sum, 0);
    }

    #[test]
    fn body_holds_exactly_126_bytes_after_tag() {
        let mut w = BlockWriter::new(0xFF);
        w.write_bytes(&[0xAA; 126]).unwrap();
        assert_eq!(w.remaining(), 0);
        assert_eq!(
            w.write_u8(0).err(),
            Some(BuildError::BlockOverflow {
                offset: 127,
                len: 1
            })
        );
    }

    #[test]
    fn patch_cannot_touch_checksum() {
        let mut w = BlockWriter::new(0x02);
        assert!(w.patch(126, 1).is_ok());
        assert!(w.patch(127, 1).is_err());
        assert_eq!(w.get(126), 1);
    }
}
