use edid_wire::block::tag;

/// Extension block tag identifiers (byte 0 of blocks 1..N).
///
/// Each decoded variant maps to the wire byte mirrored by the
/// `edid_wire::block::tag` constants. Standardized tags that this decoder
/// recognizes but does not interpret are captured as `Unsupported(u8)` so
/// they can be named in the report; everything else is `Unknown(u8)`.
///
/// ```text
/// ┌──────┬──────────────────┬──────────────────────────────────┐
/// │ Wire │ Variant          │ Description                      │
/// ├──────┼──────────────────┼──────────────────────────────────┤
/// │ 0x00 │ Dummy            │ All-zero placeholder block       │
/// │ 0x02 │ Cta861           │ CTA-861 timing/audio extension   │
/// │ 0x10 │ VideoTimingBlock │ VESA VTB-EXT                     │
/// │ 0x70 │ DisplayId        │ DisplayID section                │
/// │ 0xF0 │ BlockMap         │ Extension block map              │
/// │ 0xFF │ VendorSpecific   │ Manufacturer-defined contents    │
/// └──────┴──────────────────┴──────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtensionTag {
    Dummy,
    Cta861,
    VideoTimingBlock,
    DisplayId,
    BlockMap,
    VendorSpecific,
    /// A tag assigned by VESA whose contents this decoder does not
    /// interpret (EDID 2.0, DI-EXT, LS-EXT, MI-EXT, DPVL, ...).
    Unsupported(u8),
    /// A tag value with no assigned meaning.
    Unknown(u8),
}

impl ExtensionTag {
    /// Return the wire byte for this tag.
    #[must_use]
    pub fn wire_id(&self) -> u8 {
        match self {
            Self::Dummy => tag::DUMMY,
            Self::Cta861 => tag::CTA_861,
            Self::VideoTimingBlock => tag::VIDEO_TIMING_BLOCK,
            Self::DisplayId => tag::DISPLAY_ID,
            Self::BlockMap => tag::BLOCK_MAP,
            Self::VendorSpecific => tag::VENDOR_SPECIFIC,
            Self::Unsupported(id) | Self::Unknown(id) => *id,
        }
    }

    /// Classify a wire byte.
    #[must_use]
    pub fn from_wire_id(id: u8) -> Self {
        match id {
            tag::DUMMY => Self::Dummy,
            tag::CTA_861 => Self::Cta861,
            tag::VIDEO_TIMING_BLOCK => Self::VideoTimingBlock,
            tag::DISPLAY_ID => Self::DisplayId,
            tag::BLOCK_MAP => Self::BlockMap,
            tag::VENDOR_SPECIFIC => Self::VendorSpecific,
            tag::EDID_2_0
            | tag::COLOR_INFO
            | tag::DISPLAY_INFO
            | tag::LOCALIZED_STRING
            | tag::MICRODISPLAY
            | tag::DPVL_A7
            | tag::DPVL_AF
            | tag::DPVL_BF => Self::Unsupported(id),
            other => Self::Unknown(other),
        }
    }

    /// Block name as printed in block headings.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Dummy => "Dummy Extension Block",
            Self::Cta861 => "CTA-861 Extension Block",
            Self::VideoTimingBlock => "Video Timing Extension Block",
            Self::DisplayId => "DisplayID Extension Block",
            Self::BlockMap => "Block Map Extension Block",
            Self::VendorSpecific => "Manufacturer-Specific Extension Block",
            Self::Unsupported(id) => match *id {
                tag::EDID_2_0 => "EDID 2.0 Extension Block",
                tag::COLOR_INFO => "Color Information Extension Block",
                tag::DISPLAY_INFO => "Display Information Extension Block",
                tag::LOCALIZED_STRING => "Localized String Extension Block",
                tag::MICRODISPLAY => "Microdisplay Interface Extension Block",
                _ => "Display Transfer Characteristics Data Block",
            },
            Self::Unknown(_) => "Unknown Extension Block",
        }
    }
}
