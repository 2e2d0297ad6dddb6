use edid_wire::block::{BLOCK_SIZE, CHECKSUM_OFFSET, compute_checksum, tag};
use edid_wire::header::{EDID_HEADER, EXTENSION_COUNT_OFFSET};

use crate::error::BuildError;
use crate::extension::{CtaBuilder, DisplayIdBuilder, VtbExtBuilder};
use crate::timing::DtdSpec;

/// Offset of the first of the eight standard timing slots.
const STANDARD_TIMINGS_OFFSET: usize = 0x26;

/// Offset of the first of the four 18-byte descriptor slots.
const DESCRIPTORS_OFFSET: usize = 0x36;

/// EDID fixture builder: synthesizes complete blobs for tests, benches
/// and fuzz seeds.
///
/// A new builder starts from a conformant EDID 1.4 base block: a digital
/// DisplayPort panel whose preferred timing is 1920x1080 at 60 Hz, with
/// range limits, a product name and a dummy descriptor. Methods like
/// [`add_vtb_ext`](Self::add_vtb_ext) append extension blocks; raw
/// overrides like [`base_byte`](Self::base_byte) make a fixture
/// deliberately wrong.
///
/// # Usage
///
/// ```rust
/// use edid_builder::{EdidBuilder, VtbExtBuilder};
///
/// let blob = EdidBuilder::new()
///     .add_vtb_ext(VtbExtBuilder::new().standard_timing([0xD1, 0xC0]))
///     .build()
///     .unwrap();
/// assert_eq!(blob.len(), 256);
/// assert_eq!(blob[126], 1);
/// ```
///
/// # Output layout
///
/// `.build()` sets byte 126 of the base block to the number of
/// extensions and seals every block with a correct checksum, unless
/// [`declare_extensions`](Self::declare_extensions),
/// [`corrupt_checksum`](Self::corrupt_checksum) or
/// [`preserve_checksums`](Self::preserve_checksums) say otherwise.
pub struct EdidBuilder {
    base: [u8; BLOCK_SIZE],
    extensions: Vec<PendingExtension>,
    declared_extensions: Option<u8>,
    corrupt: Vec<usize>,
    fix_checksums: bool,
    /// First error raised by a chained call, reported by `.build()`.
    deferred: Option<BuildError>,
}

/// An extension block awaiting final layout. Block maps are filled in
/// last because they list the tags of the blocks that follow them.
enum PendingExtension {
    Ready([u8; BLOCK_SIZE]),
    BlockMap,
}

fn default_base() -> [u8; BLOCK_SIZE] {
    let mut b = [0u8; BLOCK_SIZE];
    b[0..8].copy_from_slice(&EDID_HEADER);
    b[8..10].copy_from_slice(&encode_manufacturer(*b"TST").to_be_bytes());
    b[10..12].copy_from_slice(&1u16.to_le_bytes());
    b[16] = 1;
    b[17] = 30;
    b[18] = 1;
    b[19] = 4;
    // digital, 8 bpc, DisplayPort
    b[20] = 0xA5;
    b[21] = 60;
    b[22] = 34;
    // gamma 2.20
    b[23] = 120;
    b[24] = 0x02;
    b[25..35].copy_from_slice(&[0xEE, 0x91, 0xA3, 0x54, 0x4C, 0x99, 0x26, 0x0F, 0x50, 0x54]);
    b[35..38].copy_from_slice(&[0x21, 0x08, 0x00]);
    for slot in 0..8 {
        let at = STANDARD_TIMINGS_OFFSET + slot * 2;
        b[at..at + 2].copy_from_slice(&[0x01, 0x01]);
    }
    b[STANDARD_TIMINGS_OFFSET..STANDARD_TIMINGS_OFFSET + 2].copy_from_slice(&[0xD1, 0xC0]);

    let mut at = DESCRIPTORS_OFFSET;
    b[at..at + 18].copy_from_slice(&DtdSpec::cea_1080p60().encode());
    at += 18;
    let mut limits = [0u8; 18];
    limits[3] = 0xFD;
    limits[5..11].copy_from_slice(&[56, 76, 30, 81, 17, 0x01]);
    limits[11] = 0x0A;
    limits[12..].fill(0x20);
    b[at..at + 18].copy_from_slice(&limits);
    at += 18;
    let mut name = [0u8; 18];
    name[3] = 0xFC;
    name[5..].copy_from_slice(b"EDID TEST\n   ");
    b[at..at + 18].copy_from_slice(&name);
    at += 18;
    b[at + 3] = 0x10;
    b
}

/// Pack three ASCII capitals into the big-endian PNP ID word.
fn encode_manufacturer(letters: [u8; 3]) -> u16 {
    letters.iter().fold(0u16, |acc, &c| {
        let v = if c.is_ascii_uppercase() { u16::from(c - b'A' + 1) } else { 0 };
        (acc << 5) | v
    })
}

impl Default for EdidBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EdidBuilder {
    /// Start from the default EDID 1.4 base block and no extensions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base: default_base(),
            extensions: Vec::new(),
            declared_extensions: None,
            corrupt: Vec::new(),
            fix_checksums: true,
            deferred: None,
        }
    }

    fn defer(&mut self, err: BuildError) {
        if self.deferred.is_none() {
            self.deferred = Some(err);
        }
    }

    // ── Base block fields ───────────────────────────────────────────────

    /// Set the EDID revision (byte 19). Below 4 this also switches the
    /// range limits descriptor to default GTF and clears the 1.4-only
    /// color depth and interface bits of the video input byte.
    pub fn revision(&mut self, revision: u8) -> &mut Self {
        self.base[19] = revision;
        if revision < 4 {
            self.base[DESCRIPTORS_OFFSET + 18 + 10] = 0x00;
            self.base[20] &= 0x80;
        }
        self
    }

    /// Set the three-letter PNP manufacturer ID. Characters outside `A-Z`
    /// encode as 0, which the decoder rejects.
    pub fn manufacturer(&mut self, letters: [u8; 3]) -> &mut Self {
        self.base[8..10].copy_from_slice(&encode_manufacturer(letters).to_be_bytes());
        self
    }

    pub fn product_code(&mut self, code: u16) -> &mut Self {
        self.base[10..12].copy_from_slice(&code.to_le_bytes());
        self
    }

    pub fn serial_number(&mut self, serial: u32) -> &mut Self {
        self.base[12..16].copy_from_slice(&serial.to_le_bytes());
        self
    }

    /// Replace standard timing slot `slot` (0-7).
    pub fn standard_timing(&mut self, slot: usize, raw: [u8; 2]) -> &mut Self {
        if slot < 8 {
            let at = STANDARD_TIMINGS_OFFSET + slot * 2;
            self.base[at..at + 2].copy_from_slice(&raw);
        } else {
            self.defer(BuildError::BlockOverflow {
                offset: STANDARD_TIMINGS_OFFSET + slot * 2,
                len: 2,
            });
        }
        self
    }

    /// Replace descriptor slot `slot` (0-3) with raw bytes.
    pub fn descriptor(&mut self, slot: usize, raw: [u8; 18]) -> &mut Self {
        if slot < 4 {
            let at = DESCRIPTORS_OFFSET + slot * 18;
            self.base[at..at + 18].copy_from_slice(&raw);
        } else {
            self.defer(BuildError::BlockOverflow {
                offset: DESCRIPTORS_OFFSET + slot * 18,
                len: 18,
            });
        }
        self
    }

    /// Replace the preferred timing (descriptor slot 0).
    pub fn preferred_timing(&mut self, spec: &DtdSpec) -> &mut Self {
        self.descriptor(0, spec.encode())
    }

    /// Overwrite any byte of the base block before checksumming.
    pub fn base_byte(&mut self, offset: usize, value: u8) -> &mut Self {
        if offset < CHECKSUM_OFFSET {
            self.base[offset] = value;
        } else {
            self.defer(BuildError::BlockOverflow { offset, len: 1 });
        }
        self
    }

    // ── Extension blocks ────────────────────────────────────────────────

    fn push_built(&mut self, built: Result<[u8; BLOCK_SIZE], BuildError>) -> &mut Self {
        match built {
            Ok(block) => self.extensions.push(PendingExtension::Ready(block)),
            Err(err) => self.defer(err),
        }
        self
    }

    pub fn add_vtb_ext(&mut self, vtb: &VtbExtBuilder) -> &mut Self {
        self.push_built(vtb.build())
    }

    pub fn add_cta(&mut self, cta: &CtaBuilder) -> &mut Self {
        self.push_built(cta.build())
    }

    pub fn add_displayid(&mut self, displayid: &DisplayIdBuilder) -> &mut Self {
        self.push_built(displayid.build())
    }

    /// Append a block map whose entries list the tags of the extension
    /// blocks that follow it.
    pub fn add_block_map(&mut self) -> &mut Self {
        self.extensions.push(PendingExtension::BlockMap);
        self
    }

    /// Append a block verbatim. Its checksum is still fixed up unless
    /// checksums are preserved.
    pub fn add_raw_extension(&mut self, block: [u8; BLOCK_SIZE]) -> &mut Self {
        self.extensions.push(PendingExtension::Ready(block));
        self
    }

    /// Append a zero-filled block carrying only a tag byte.
    pub fn add_tagged_extension(&mut self, tag_byte: u8) -> &mut Self {
        let mut block = [0u8; BLOCK_SIZE];
        block[0] = tag_byte;
        self.add_raw_extension(block)
    }

    // ── Finishing overrides ─────────────────────────────────────────────

    /// Write `count` as the extension count instead of the real number.
    pub fn declare_extensions(&mut self, count: u8) -> &mut Self {
        self.declared_extensions = Some(count);
        self
    }

    /// Store a wrong checksum in block `index` (0 = base).
    pub fn corrupt_checksum(&mut self, index: usize) -> &mut Self {
        self.corrupt.push(index);
        self
    }

    /// Keep whatever checksum bytes the blocks already carry.
    pub fn preserve_checksums(&mut self) -> &mut Self {
        self.fix_checksums = false;
        self
    }

    /// Serialize all blocks into one blob.
    ///
    /// # Errors
    ///
    /// - The first error raised by a chained call.
    /// - [`BuildError::TooManyExtensions`] above 255 extensions.
    pub fn build(&self) -> Result<Vec<u8>, BuildError> {
        if let Some(err) = &self.deferred {
            return Err(err.clone());
        }
        let count = self.extensions.len();
        let declared = match self.declared_extensions {
            Some(n) => n,
            None => u8::try_from(count).map_err(|_| BuildError::TooManyExtensions { count })?,
        };

        let mut blocks = Vec::with_capacity(count + 1);
        let mut base = self.base;
        base[EXTENSION_COUNT_OFFSET] = declared;
        blocks.push(base);
        for ext in &self.extensions {
            blocks.push(match ext {
                PendingExtension::Ready(block) => *block,
                PendingExtension::BlockMap => {
                    let mut block = [0u8; BLOCK_SIZE];
                    block[0] = tag::BLOCK_MAP;
                    block
                }
            });
        }
        for (index, ext) in self.extensions.iter().enumerate() {
            if let PendingExtension::BlockMap = ext {
                let map_index = index + 1;
                for entry in 1..CHECKSUM_OFFSET {
                    if let Some(follower) = blocks.get(map_index + entry) {
                        let tag_byte = follower[0];
                        blocks[map_index][entry] = tag_byte;
                    }
                }
            }
        }

        for (index, block) in blocks.iter_mut().enumerate() {
            if self.fix_checksums {
                block[CHECKSUM_OFFSET] = compute_checksum(&block[..CHECKSUM_OFFSET]);
            }
            if self.corrupt.contains(&index) {
                block[CHECKSUM_OFFSET] = block[CHECKSUM_OFFSET].wrapping_add(1);
            }
        }
        Ok(blocks.concat())
    }
}
