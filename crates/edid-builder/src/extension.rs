use edid_wire::block::{BLOCK_SIZE, compute_checksum, tag};

use crate::block_writer::BlockWriter;
use crate::error::BuildError;
use crate::timing::DtdSpec;

// ── VTB-EXT ───────────────────────────────────────────────────────────

/// Builder for a Video Timing Block extension (tag 0x10).
///
/// ```text
/// ┌──────┬─────────┬─────────┬─────────┬────────┬────────────────────┐
/// │ 0x10 │ version │ num_dtd │ num_cvt │ num_st │ DTDs, CVTs, STs ...│
/// └──────┴─────────┴─────────┴─────────┴────────┴────────────────────┘
/// ```
///
/// The count bytes follow the records added unless
/// [`declare_counts`](Self::declare_counts) overrides them, which is how
/// tests produce blocks whose counts do not fit.
#[derive(Clone, Debug, Default)]
pub struct VtbExtBuilder {
    version: Option<u8>,
    dtds: Vec<[u8; 18]>,
    cvts: Vec<[u8; 3]>,
    standard: Vec<[u8; 2]>,
    declared: Option<(u8, u8, u8)>,
}

impl VtbExtBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&mut self, version: u8) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn dtd(&mut self, spec: &DtdSpec) -> &mut Self {
        self.dtds.push(spec.encode());
        self
    }

    pub fn dtd_raw(&mut self, raw: [u8; 18]) -> &mut Self {
        self.dtds.push(raw);
        self
    }

    pub fn cvt(&mut self, raw: [u8; 3]) -> &mut Self {
        self.cvts.push(raw);
        self
    }

    pub fn standard_timing(&mut self, raw: [u8; 2]) -> &mut Self {
        self.standard.push(raw);
        self
    }

    /// Write these counts instead of the number of records added.
    pub fn declare_counts(&mut self, dtds: u8, cvts: u8, standard: u8) -> &mut Self {
        self.declared = Some((dtds, cvts, standard));
        self
    }

    /// Lay out the block with a correct checksum.
    ///
    /// # Errors
    ///
    /// [`BuildError::BlockOverflow`] if the records added do not fit in
    /// bytes 5..127.
    pub fn build(&self) -> Result<[u8; BLOCK_SIZE], BuildError> {
        let count = |n: usize| u8::try_from(n).unwrap_or(u8::MAX);
        let (d, c, s) = self.declared.unwrap_or((
            count(self.dtds.len()),
            count(self.cvts.len()),
            count(self.standard.len()),
        ));
        let mut w = BlockWriter::new(tag::VIDEO_TIMING_BLOCK);
        w.write_u8(self.version.unwrap_or(1))?
            .write_u8(d)?
            .write_u8(c)?
            .write_u8(s)?;
        for dtd in &self.dtds {
            w.write_bytes(dtd)?;
        }
        for cvt in &self.cvts {
            w.write_bytes(cvt)?;
        }
        for st in &self.standard {
            w.write_bytes(st)?;
        }
        Ok(w.finish())
    }
}

// ── CTA-861 ───────────────────────────────────────────────────────────

/// Data block type codes (bits 7-5 of a data block header).
pub mod cta_tag {
    pub const AUDIO: u8 = 1;
    pub const VIDEO: u8 = 2;
    pub const VENDOR: u8 = 3;
    pub const SPEAKER: u8 = 4;
    pub const VESA_DTC: u8 = 5;
    pub const EXTENDED: u8 = 7;
}

/// Builder for a CTA-861 extension (tag 0x02).
///
/// ```text
/// ┌──────┬─────┬──────────┬───────┬──────────────────┬──────────┬─────────┐
/// │ 0x02 │ rev │ dtd off  │ flags │ data block coll. │ DTDs ... │ padding │
/// └──────┴─────┴──────────┴───────┴──────────────────┴──────────┴─────────┘
///   0      1     2          3       4 ..               dtd off
/// ```
#[derive(Clone, Debug)]
pub struct CtaBuilder {
    revision: u8,
    flags: u8,
    data_blocks: Vec<(u8, Vec<u8>)>,
    dtds: Vec<[u8; 18]>,
    dtd_offset: Option<u8>,
}

impl Default for CtaBuilder {
    fn default() -> Self {
        Self {
            revision: 3,
            flags: 0,
            data_blocks: Vec::new(),
            dtds: Vec::new(),
            dtd_offset: None,
        }
    }
}

impl CtaBuilder {
    /// Revision 3 with no flags and no data blocks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revision(&mut self, revision: u8) -> &mut Self {
        self.revision = revision;
        self
    }

    /// Byte 3 verbatim: underscan, basic audio, YCbCr 4:4:4 / 4:2:2 and
    /// the native DTD count.
    pub fn flags(&mut self, flags: u8) -> &mut Self {
        self.flags = flags;
        self
    }

    /// Append a data block with a raw type code and payload.
    pub fn data_block(&mut self, block_tag: u8, payload: &[u8]) -> &mut Self {
        self.data_blocks.push((block_tag, payload.to_vec()));
        self
    }

    /// Append a video data block listing short video descriptors.
    pub fn video(&mut self, svds: &[u8]) -> &mut Self {
        self.data_block(cta_tag::VIDEO, svds)
    }

    /// Append an audio data block of 3-byte short audio descriptors.
    pub fn audio(&mut self, sads: &[[u8; 3]]) -> &mut Self {
        let payload: Vec<u8> = sads.iter().flatten().copied().collect();
        self.data_block(cta_tag::AUDIO, &payload)
    }

    pub fn speaker_allocation(&mut self, payload: [u8; 3]) -> &mut Self {
        self.data_block(cta_tag::SPEAKER, &payload)
    }

    /// Append a vendor-specific data block; `oui` is written
    /// little-endian ahead of `payload`.
    pub fn vendor(&mut self, oui: u32, payload: &[u8]) -> &mut Self {
        let mut body = oui.to_le_bytes()[..3].to_vec();
        body.extend_from_slice(payload);
        self.data_block(cta_tag::VENDOR, &body)
    }

    /// Append an extended-tag data block.
    pub fn extended(&mut self, ext_tag: u8, payload: &[u8]) -> &mut Self {
        let mut body = vec![ext_tag];
        body.extend_from_slice(payload);
        self.data_block(cta_tag::EXTENDED, &body)
    }

    pub fn dtd(&mut self, spec: &DtdSpec) -> &mut Self {
        self.dtds.push(spec.encode());
        self
    }

    /// Write this DTD offset instead of the computed one.
    pub fn dtd_offset(&mut self, offset: u8) -> &mut Self {
        self.dtd_offset = Some(offset);
        self
    }

    /// Lay out the block with a correct checksum.
    ///
    /// # Errors
    ///
    /// - [`BuildError::DataBlockTooLong`] for a payload above 31 bytes.
    /// - [`BuildError::BlockOverflow`] if the content exceeds the block.
    pub fn build(&self) -> Result<[u8; BLOCK_SIZE], BuildError> {
        let mut w = BlockWriter::new(tag::CTA_861);
        w.write_u8(self.revision)?.write_u8(0)?.write_u8(self.flags)?;
        for (block_tag, payload) in &self.data_blocks {
            let len = u8::try_from(payload.len())
                .ok()
                .filter(|&len| len <= 0x1F)
                .ok_or(BuildError::DataBlockTooLong {
                    len: payload.len(),
                    limit: 0x1F,
                })?;
            w.write_u8((block_tag << 5) | len)?.write_bytes(payload)?;
        }
        let computed = u8::try_from(w.position()).unwrap_or(u8::MAX);
        for dtd in &self.dtds {
            w.write_bytes(dtd)?;
        }
        w.patch(2, self.dtd_offset.unwrap_or(computed))?;
        Ok(w.finish())
    }
}

// ── DisplayID ─────────────────────────────────────────────────────────

/// Builder for a DisplayID section carried in an EDID extension (tag
/// 0x70).
///
/// ```text
/// ┌──────┬─────┬─────────┬──────────┬─────────┬─────────────┬──────────┐
/// │ 0x70 │ ver │ payload │ product  │ ext cnt │ data blocks │ section  │
/// │      │     │ length  │ type     │         │ tag rev len │ checksum │
/// └──────┴─────┴─────────┴──────────┴─────────┴─────────────┴──────────┘
///   0      1     2         3          4         5 ..          5 + len
/// ```
#[derive(Clone, Debug)]
pub struct DisplayIdBuilder {
    version: u8,
    product_type: u8,
    blocks: Vec<(u8, u8, Vec<u8>)>,
    corrupt_section_checksum: bool,
}

impl Default for DisplayIdBuilder {
    fn default() -> Self {
        Self {
            version: 0x12,
            product_type: 0,
            blocks: Vec::new(),
            corrupt_section_checksum: false,
        }
    }
}

/// Largest section payload that fits an EDID extension block.
pub const DISPLAYID_MAX_PAYLOAD: usize = 121;

impl DisplayIdBuilder {
    /// DisplayID 1.2 extension section with no data blocks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&mut self, version: u8) -> &mut Self {
        self.version = version;
        self
    }

    pub fn product_type(&mut self, product_type: u8) -> &mut Self {
        self.product_type = product_type;
        self
    }

    pub fn data_block(&mut self, block_tag: u8, revision: u8, payload: &[u8]) -> &mut Self {
        self.blocks.push((block_tag, revision, payload.to_vec()));
        self
    }

    /// Store a wrong section checksum (the block checksum stays correct).
    pub fn corrupt_section_checksum(&mut self) -> &mut Self {
        self.corrupt_section_checksum = true;
        self
    }

    /// Lay out the section and block checksums.
    ///
    /// # Errors
    ///
    /// - [`BuildError::DataBlockTooLong`] if a data block payload exceeds
    ///   255 bytes or the section exceeds 121 bytes.
    /// - [`BuildError::BlockOverflow`] if the section does not fit.
    pub fn build(&self) -> Result<[u8; BLOCK_SIZE], BuildError> {
        let mut w = BlockWriter::new(tag::DISPLAY_ID);
        w.write_u8(self.version)?
            .write_u8(0)?
            .write_u8(self.product_type)?
            .write_u8(0)?;
        for (block_tag, revision, payload) in &self.blocks {
            let len = u8::try_from(payload.len()).map_err(|_| BuildError::DataBlockTooLong {
                len: payload.len(),
                limit: 0xFF,
            })?;
            w.write_u8(*block_tag)?
                .write_u8(*revision)?
                .write_u8(len)?
                .write_bytes(payload)?;
        }
        let payload_len = w.position() - 5;
        if payload_len > DISPLAYID_MAX_PAYLOAD {
            return Err(BuildError::DataBlockTooLong {
                len: payload_len,
                limit: DISPLAYID_MAX_PAYLOAD,
            });
        }
        w.patch(2, u8::try_from(payload_len).unwrap_or(u8::MAX))?;
        let section: Vec<u8> = (1..w.position()).map(|i| w.get(i)).collect();
        let mut checksum = compute_checksum(&section);
        if self.corrupt_section_checksum {
            checksum = checksum.wrapping_add(1);
        }
        w.write_u8(checksum)?;
        Ok(w.finish())
    }
}
