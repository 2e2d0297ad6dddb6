use crate::block::Block;

/// Fixed 8-byte pattern that opens every base EDID block.
pub const EDID_HEADER: [u8; 8] = [0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00];

/// The only EDID structure version this decoder understands.
pub const EDID_VERSION: u8 = 1;

/// Highest revision defined for version 1 (EDID 1.4).
pub const EDID_MAX_REVISION: u8 = 4;

/// Offset of the extension-count byte in the base block.
pub const EXTENSION_COUNT_OFFSET: usize = 126;

/// Identification fields from the first 20 bytes of the base block.
///
/// ```text
/// ┌────────┬─────────┬──────────────────────────────────────┐
/// │ Offset │ Size    │ Description                          │
/// ├────────┼─────────┼──────────────────────────────────────┤
/// │ 0x00   │ 8 bytes │ Header 00 FF FF FF FF FF FF 00       │
/// │ 0x08   │ 2 bytes │ Manufacturer ID (big-endian, 3×5 bit)│
/// │ 0x0A   │ 2 bytes │ Product code (little-endian)         │
/// │ 0x0C   │ 4 bytes │ Serial number (little-endian)        │
/// │ 0x10   │ 1 byte  │ Week of manufacture / 0xFF model yr  │
/// │ 0x11   │ 1 byte  │ Year − 1990                          │
/// │ 0x12   │ 1 byte  │ Version                              │
/// │ 0x13   │ 1 byte  │ Revision                             │
/// └────────┴─────────┴──────────────────────────────────────┘
/// ```
///
/// Parsing never fails: a block-sized window always has these bytes, and
/// whether their values are acceptable is a question for the decoder's
/// validation pass, not for the wire layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseHeader {
    pub magic: [u8; 8],
    pub manufacturer_raw: u16,
    pub product_code: u16,
    pub serial_number: u32,
    pub week: u8,
    pub year_byte: u8,
    pub version: u8,
    pub revision: u8,
}

impl BaseHeader {
    /// Read the identification fields of a base block.
    #[must_use]
    pub fn read_from(block: &Block<'_>) -> Self {
        let b = block.bytes();
        let mut magic = [0u8; 8];
        magic.copy_from_slice(&b[0..8]);
        Self {
            magic,
            manufacturer_raw: u16::from_be_bytes([b[8], b[9]]),
            product_code: u16::from_le_bytes([b[10], b[11]]),
            serial_number: u32::from_le_bytes([b[12], b[13], b[14], b[15]]),
            week: b[16],
            year_byte: b[17],
            version: b[18],
            revision: b[19],
        }
    }

    /// True if the 8-byte header pattern is intact.
    #[must_use]
    pub fn has_valid_magic(&self) -> bool {
        self.magic == EDID_HEADER
    }

    /// Decode the three-letter PNP manufacturer ID.
    ///
    /// Each letter is 5 bits with `1` = `A`. Letters outside 1..=26 come
    /// back as `None` in their slot so the caller can report exactly which
    /// one is wrong.
    #[must_use]
    pub fn manufacturer_letters(&self) -> [Option<char>; 3] {
        let raw = self.manufacturer_raw;
        let letter = |shift: u16| {
            let v = ((raw >> shift) & 0x1F) as u8;
            (1..=26).contains(&v).then(|| char::from(b'A' + v - 1))
        };
        [letter(10), letter(5), letter(0)]
    }

    /// The reserved top bit of the manufacturer ID (must be 0).
    #[must_use]
    pub fn manufacturer_reserved_bit(&self) -> bool {
        self.manufacturer_raw & 0x8000 != 0
    }

    /// Manufacture or model year.
    #[must_use]
    pub fn year(&self) -> u16 {
        1990 + u16::from(self.year_byte)
    }

    /// True when the week byte marks the year as a model year (EDID 1.4).
    #[must_use]
    pub fn is_model_year(&self) -> bool {
        self.week == 0xFF
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BLOCK_SIZE;

    fn base_bytes() -> [u8; BLOCK_SIZE] {
        let mut raw = [0u8; BLOCK_SIZE];
        raw[0..8].copy_from_slice(&EDID_HEADER);
        // "DEL": D=4, E=5, L=12 → 0b0_00100_00101_01100 = 0x10AC
        raw[8] = 0x10;
        raw[9] = 0xAC;
        raw[10] = 0x34;
        raw[11] = 0x12;
        raw[12..16].copy_from_slice(&0xDEAD_BEEF_u32.to_le_bytes());
        raw[16] = 12;
        raw[17] = 30;
        raw[18] = 1;
        raw[19] = 4;
        raw
    }

    #[test]
    fn reads_identification_fields() {
        let raw = base_bytes();
        let header = BaseHeader::read_from(&Block::new(0, &raw));
        assert!(header.has_valid_magic());
        assert_eq!(header.manufacturer_letters(), [Some('D'), Some('E'), Some('L')]);
        assert!(!header.manufacturer_reserved_bit());
        assert_eq!(header.product_code, 0x1234);
        assert_eq!(header.serial_number, 0xDEAD_BEEF);
        assert_eq!(header.week, 12);
        assert_eq!(header.year(), 2020);
        assert!(!header.is_model_year());
        assert_eq!((header.version, header.revision), (1, 4));
    }

    #[test]
    fn detects_bad_magic() {
        let mut raw = base_bytes();
        raw[3] = 0x00;
        let header = BaseHeader::read_from(&Block::new(0, &raw));
        assert!(!header.has_valid_magic());
    }

    #[test]
    fn out_of_range_letters_are_none() {
        let mut raw = base_bytes();
        // letters 0, 27, 31
        let value: u16 = (27 << 5) | 31;
        raw[8..10].copy_from_slice(&value.to_be_bytes());
        let header = BaseHeader::read_from(&Block::new(0, &raw));
        assert_eq!(header.manufacturer_letters(), [None, None, None]);
    }
}
