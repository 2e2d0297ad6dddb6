use crate::error::WireError;

/// Bounds-checked forward cursor over a byte window.
///
/// Every read either returns the requested bytes or a
/// [`WireError::UnexpectedEof`]; the cursor never indexes past the end of
/// the slice it was built from. Handlers use it instead of manual offset
/// arithmetic so a hostile count field cannot turn into an out-of-bounds
/// read.
///
/// ```text
///   window:  [ b0 b1 b2 ... bN-1 ]
///                  ^
///                  pos  (0 ≤ pos ≤ N)
///
///   read_array::<3>()  → &[b2, b3, b4], pos += 3
///   read_u8() at pos=N → Err(UnexpectedEof { offset: N, wanted: 1 })
/// ```
///
/// A failed read leaves the position unchanged, so callers may report the
/// failure and still inspect what remains.
#[derive(Clone, Debug)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `buf`.
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Create a cursor over `buf` starting at `pos`.
    ///
    /// A start position past the end is clamped to the end, which yields
    /// an empty cursor rather than a panic.
    #[must_use]
    pub fn at(buf: &'a [u8], pos: usize) -> Self {
        Self {
            buf,
            pos: pos.min(buf.len()),
        }
    }

    /// Number of bytes consumed so far (offset from the window start).
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total size of the window.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Number of bytes still available.
    #[must_use]
    pub fn remaining_len(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// The unread tail of the window.
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    /// True once every byte has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// True if at least `n` more bytes can be read.
    #[must_use]
    pub fn has(&self, n: usize) -> bool {
        self.remaining_len() >= n
    }

    /// Look at the next byte without consuming it.
    #[must_use]
    pub fn peek_u8(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    /// Read one byte.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if the window is exhausted.
    pub fn read_u8(&mut self) -> Result<u8, WireError> {
        let [b] = *self.read_array::<1>()?;
        Ok(b)
    }

    /// Read a little-endian `u16`.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than 2 bytes remain.
    pub fn read_u16_le(&mut self) -> Result<u16, WireError> {
        Ok(u16::from_le_bytes(*self.read_array::<2>()?))
    }

    /// Read a little-endian `u32`.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than 4 bytes remain.
    pub fn read_u32_le(&mut self) -> Result<u32, WireError> {
        Ok(u32::from_le_bytes(*self.read_array::<4>()?))
    }

    /// Read exactly `N` bytes as a fixed-size array reference.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than `N` bytes remain.
    pub fn read_array<const N: usize>(&mut self) -> Result<&'a [u8; N], WireError> {
        let slice = self.read_slice(N)?;
        // read_slice returned exactly N bytes
        slice
            .try_into()
            .map_err(|_| WireError::UnexpectedEof {
                offset: self.pos,
                wanted: N,
            })
    }

    /// Read exactly `n` bytes.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than `n` bytes remain.
    pub fn read_slice(&mut self, n: usize) -> Result<&'a [u8], WireError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.buf.len())
            .ok_or(WireError::UnexpectedEof {
                offset: self.pos,
                wanted: n,
            })?;
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    /// Advance past `n` bytes without looking at them.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than `n` bytes remain.
    pub fn skip(&mut self, n: usize) -> Result<(), WireError> {
        self.read_slice(n).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_advance_position() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_u8().unwrap(), 0x01);
        assert_eq!(cursor.read_u16_le().unwrap(), 0x0302);
        assert_eq!(cursor.read_u32_le().unwrap(), 0x0706_0504);
        assert_eq!(cursor.position(), 7);
        assert!(cursor.is_empty());
    }

    #[test]
    fn read_past_end_is_an_error() {
        let data = [0xAA; 4];
        let mut cursor = ByteCursor::new(&data);
        cursor.skip(3).unwrap();
        let result = cursor.read_array::<2>();
        assert_eq!(
            result,
            Err(WireError::UnexpectedEof {
                offset: 3,
                wanted: 2
            })
        );
    }

    #[test]
    fn failed_read_does_not_move_cursor() {
        let data = [0u8; 5];
        let mut cursor = ByteCursor::new(&data);
        cursor.skip(4).unwrap();
        assert!(cursor.read_slice(18).is_err());
        assert_eq!(cursor.position(), 4);
        assert_eq!(cursor.read_u8().unwrap(), 0);
    }

    #[test]
    fn huge_length_does_not_overflow() {
        let data = [0u8; 8];
        let mut cursor = ByteCursor::at(&data, 2);
        assert!(cursor.read_slice(usize::MAX).is_err());
        assert_eq!(cursor.remaining_len(), 6);
    }

    #[test]
    fn start_position_is_clamped() {
        let data = [1u8, 2, 3];
        let cursor = ByteCursor::at(&data, 10);
        assert!(cursor.is_empty());
        assert_eq!(cursor.remaining(), &[] as &[u8]);
        assert_eq!(cursor.peek_u8(), None);
    }

    #[test]
    fn has_reports_remaining_capacity() {
        let data = [0u8; 20];
        let mut cursor = ByteCursor::new(&data);
        assert!(cursor.has(18));
        cursor.skip(3).unwrap();
        assert!(!cursor.has(18));
        assert!(cursor.has(17));
    }
}
