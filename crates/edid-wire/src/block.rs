use crate::cursor::ByteCursor;
use crate::error::WireError;

/// Size of every EDID block, base and extension alike.
pub const BLOCK_SIZE: usize = 128;

/// Offset of the checksum byte inside a block.
pub const CHECKSUM_OFFSET: usize = BLOCK_SIZE - 1;

/// Known extension tag bytes (byte 0 of blocks 1..N).
///
/// These are the raw values that appear on the wire. `edid-types` maps
/// them onto the closed `ExtensionTag` enumeration.
pub mod tag {
    pub const DUMMY: u8 = 0x00;
    pub const CTA_861: u8 = 0x02;
    pub const VIDEO_TIMING_BLOCK: u8 = 0x10;
    pub const EDID_2_0: u8 = 0x20;
    pub const COLOR_INFO: u8 = 0x30;
    pub const DISPLAY_INFO: u8 = 0x40;
    pub const LOCALIZED_STRING: u8 = 0x50;
    pub const MICRODISPLAY: u8 = 0x60;
    pub const DISPLAY_ID: u8 = 0x70;
    pub const DPVL_A7: u8 = 0xA7;
    pub const DPVL_AF: u8 = 0xAF;
    pub const DPVL_BF: u8 = 0xBF;
    pub const BLOCK_MAP: u8 = 0xF0;
    pub const VENDOR_SPECIFIC: u8 = 0xFF;
}

/// A complete EDID blob: one base block followed by zero or more
/// extension blocks.
///
/// ```text
/// ┌───────────┬──────────────┬──────────────┬─────┐
/// │ block 0   │ block 1      │ block 2      │ ... │
/// │ base EDID │ extension    │ extension    │     │
/// │ 128 bytes │ 128 bytes    │ 128 bytes    │     │
/// └───────────┴──────────────┴──────────────┴─────┘
/// ```
///
/// The blob only borrows the caller's bytes. Construction is the single
/// place where the overall input shape is checked; everything downstream
/// can assume whole blocks.
#[derive(Clone, Copy, Debug)]
pub struct EdidBlob<'a> {
    bytes: &'a [u8],
    base: &'a [u8; BLOCK_SIZE],
}

impl<'a> EdidBlob<'a> {
    /// Wrap `bytes` after checking they form whole 128-byte blocks.
    ///
    /// # Errors
    ///
    /// - [`WireError::Empty`] for zero-length input.
    /// - [`WireError::Misaligned`] if the length is not a multiple of 128.
    pub fn new(bytes: &'a [u8]) -> Result<Self, WireError> {
        if bytes.is_empty() {
            return Err(WireError::Empty);
        }
        if bytes.len() % BLOCK_SIZE != 0 {
            return Err(WireError::Misaligned { len: bytes.len() });
        }
        let base = bytes
            .first_chunk::<BLOCK_SIZE>()
            .ok_or(WireError::Misaligned { len: bytes.len() })?;
        Ok(Self { bytes, base })
    }

    /// Raw bytes of the whole blob.
    #[must_use]
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Number of blocks, base block included.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.bytes.len() / BLOCK_SIZE
    }

    /// Block at `index`, or `None` past the end.
    #[must_use]
    pub fn block(&self, index: usize) -> Option<Block<'a>> {
        let start = index.checked_mul(BLOCK_SIZE)?;
        let window = self.bytes.get(start..start.checked_add(BLOCK_SIZE)?)?;
        let bytes: &'a [u8; BLOCK_SIZE] = window.try_into().ok()?;
        Some(Block { index, bytes })
    }

    /// The base block (index 0). Always present.
    #[must_use]
    pub fn base(&self) -> Block<'a> {
        Block {
            index: 0,
            bytes: self.base,
        }
    }

    /// Iterate all blocks in order.
    pub fn blocks(&self) -> impl Iterator<Item = Block<'a>> + '_ {
        (0..self.block_count()).filter_map(|i| self.block(i))
    }
}

/// One 128-byte window of a blob.
///
/// For extension blocks byte 0 is the tag and byte 1 is usually a version
/// or revision; byte 127 is always the checksum that makes the sum of all
/// 128 bytes zero modulo 256.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block<'a> {
    index: usize,
    bytes: &'a [u8; BLOCK_SIZE],
}

impl<'a> Block<'a> {
    /// Wrap a standalone 128-byte array as block `index`.
    #[must_use]
    pub fn new(index: usize, bytes: &'a [u8; BLOCK_SIZE]) -> Self {
        Self { index, bytes }
    }

    /// Position of this block in the blob (0 = base).
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// All 128 bytes.
    #[must_use]
    pub fn bytes(&self) -> &'a [u8; BLOCK_SIZE] {
        self.bytes
    }

    /// Extension tag (byte 0).
    #[must_use]
    pub fn tag(&self) -> u8 {
        self.bytes[0]
    }

    /// Version / revision byte (byte 1).
    #[must_use]
    pub fn version(&self) -> u8 {
        self.bytes[1]
    }

    /// Bytes after the tag and version (126 bytes, checksum included).
    #[must_use]
    pub fn body(&self) -> &'a [u8] {
        &self.bytes[2..]
    }

    /// The stored checksum byte.
    #[must_use]
    pub fn checksum(&self) -> u8 {
        self.bytes[CHECKSUM_OFFSET]
    }

    /// The checksum byte that would make this block sum to zero.
    #[must_use]
    pub fn expected_checksum(&self) -> u8 {
        compute_checksum(&self.bytes[..CHECKSUM_OFFSET])
    }

    /// True if the stored checksum is correct.
    #[must_use]
    pub fn checksum_ok(&self) -> bool {
        self.checksum() == self.expected_checksum()
    }

    /// A cursor over the full block starting at `offset`.
    #[must_use]
    pub fn cursor_at(&self, offset: usize) -> ByteCursor<'a> {
        ByteCursor::at(self.bytes, offset)
    }
}

/// Compute the byte that makes `bytes` plus itself sum to 0 mod 256.
#[must_use]
pub fn compute_checksum(bytes: &[u8]) -> u8 {
    let sum = bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    0u8.wrapping_sub(sum)
}
