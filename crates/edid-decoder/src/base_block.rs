//! Block 0: the base EDID structure.
//!
//! ```text
//! ┌───────────┬──────────────────────────────────────────────┐
//! │ Offset    │ Content                                      │
//! ├───────────┼──────────────────────────────────────────────┤
//! │ 0x00-0x07 │ Header 00 FF FF FF FF FF FF 00               │
//! │ 0x08-0x11 │ Manufacturer, product, serial, week, year    │
//! │ 0x12-0x13 │ Version, revision                            │
//! │ 0x14-0x18 │ Basic display parameters and features        │
//! │ 0x19-0x22 │ Chromaticity coordinates                     │
//! │ 0x23-0x25 │ Established timings I and II                 │
//! │ 0x26-0x35 │ Eight standard timings                       │
//! │ 0x36-0x7D │ Four 18-byte descriptors                     │
//! │ 0x7E      │ Extension block count                        │
//! │ 0x7F      │ Checksum                                     │
//! └───────────┴──────────────────────────────────────────────┘
//! ```

use edid_types::descriptor::{DescriptorTag, descriptor_text};
use edid_types::detailed_timing::DTD_SIZE;
use edid_types::enums::{DigitalInterface, RangeTimingSupport};
use edid_types::established::{ESTABLISHED_I_II, ESTABLISHED_III};
use edid_wire::block::Block;
use edid_wire::header::{BaseHeader, EDID_MAX_REVISION, EDID_VERSION, EXTENSION_COUNT_OFFSET};

use crate::state::DecodeState;
use crate::timings::{self, EmptyRecords};
use crate::vendor;

/// Heading name of block 0.
pub const BASE_BLOCK_NAME: &str = "Base EDID";

const STANDARD_TIMINGS: usize = 0x26;
const DESCRIPTORS: usize = 0x36;

/// Which required descriptors the base block carried.
#[derive(Debug, Default)]
struct Seen {
    product_name: bool,
    range_limits: bool,
}

/// Decode block 0 into `state`, recording the EDID version, revision and
/// declared extension count for the blocks that follow.
pub fn decode(block: &Block<'_>, state: &mut DecodeState) {
    let b = block.bytes();
    let header = BaseHeader::read_from(block);
    state.version = header.version;
    state.revision = header.revision;
    state.declared_extensions = b[EXTENSION_COUNT_OFFSET];

    if !header.has_valid_magic() {
        state.fail("Block 0 does not start with the EDID header");
    }
    state.report(format!(
        "EDID Structure Version & Revision: {}.{}",
        header.version, header.revision
    ));
    if header.version != EDID_VERSION {
        state.fail(format!("Unsupported EDID version {}", header.version));
    } else if header.revision > EDID_MAX_REVISION {
        state.warn(format!(
            "Unknown EDID revision 1.{}, decoding as 1.4",
            header.revision
        ));
    }

    state.report("Vendor & Product Identification:");
    state.nested(|s| identification(s, &header));

    state.report("Basic Display Parameters & Features:");
    state.nested(|s| display_parameters(s, b));

    state.report("Color Characteristics:");
    state.nested(|s| chromaticity(s, b));

    state.report("Established Timings I & II:");
    state.nested(|s| {
        if timings::report_established(s, &b[0x23..0x26], &ESTABLISHED_I_II) == 0 {
            s.report("none");
        }
        if b[0x25] & 0x7F != 0 {
            s.report(format!("Manufacturer-specified timings: 0x{:02x}", b[0x25] & 0x7F));
        }
    });

    state.report("Standard Timings:");
    state.nested(|s| {
        let mut listed = 0;
        for pair in b[STANDARD_TIMINGS..DESCRIPTORS].chunks_exact(2) {
            if timings::report_standard(s, pair[0], pair[1], EmptyRecords::Skip).is_some() {
                listed += 1;
            }
        }
        if listed == 0 {
            s.report("none");
        }
    });

    let mut seen = Seen::default();
    state.report("Detailed Timing Descriptors:");
    state.nested(|s| {
        let mut dtd_number = 0;
        for slot in 0..4 {
            let at = DESCRIPTORS + slot * DTD_SIZE;
            let mut raw = [0u8; DTD_SIZE];
            raw.copy_from_slice(&b[at..at + DTD_SIZE]);
            if raw[0] != 0 || raw[1] != 0 {
                dtd_number += 1;
                timings::report_dtd(s, dtd_number, &raw);
                continue;
            }
            if slot == 0 && s.version == 1 && s.revision >= 3 {
                s.fail("The first descriptor must be the preferred detailed timing");
            }
            display_descriptor(s, &raw, &mut seen);
        }
    });

    let extensions = b[EXTENSION_COUNT_OFFSET];
    state.report(format!("Extension blocks: {extensions}"));

    if state.version == 1 && state.revision == 3 {
        if !seen.product_name {
            state.fail("Missing Display Product Name, required by EDID 1.3");
        }
        if !seen.range_limits {
            state.fail("Missing Display Range Limits Descriptor, required by EDID 1.3");
        }
    }
    if state.is_edid_1_4() && b[0x18] & 0x01 != 0 && !seen.range_limits {
        state.fail("Display is continuous frequency but has no Display Range Limits Descriptor");
    }
}

// ── Identification ────────────────────────────────────────────────────

fn identification(state: &mut DecodeState, header: &BaseHeader) {
    let letters = header.manufacturer_letters();
    let name: String = letters.iter().map(|l| l.unwrap_or('?')).collect();
    state.report(format!("Manufacturer: {name}"));
    if letters.iter().any(Option::is_none) {
        state.fail("Manufacturer name field contains garbage");
    }
    if header.manufacturer_reserved_bit() {
        state.fail("Manufacturer name field has its reserved bit set");
    }
    state.report(format!("Model: {}", header.product_code));
    if header.serial_number != 0 {
        state.report(format!("Serial Number: {}", header.serial_number));
    }

    let year = header.year();
    match header.week {
        0xFF => {
            state.report(format!("Model year: {year}"));
            if !state.is_edid_1_4() {
                state.fail("Week 255 (model year) requires EDID 1.4");
            }
        }
        0 => state.report(format!("Made in: {year}")),
        week @ 1..=54 => state.report(format!("Made in: week {week} of {year}")),
        week => {
            state.report(format!("Made in: {year}"));
            state.fail(format!("Invalid week {week}"));
        }
    }
    if state.is_edid_1_4() && year < 2006 {
        state.fail(format!("Year {year} is before 2006, when EDID 1.4 was released"));
    }
}

// ── Basic display parameters ──────────────────────────────────────────

const SIGNAL_LEVELS: [&str; 4] = [
    "0.700 : 0.300 : 1.000 V p-p",
    "0.714 : 0.286 : 1.000 V p-p",
    "1.000 : 0.400 : 1.400 V p-p",
    "0.700 : 0.000 : 0.700 V p-p",
];

const ANALOG_SYNC: [(u8, &str); 5] = [
    (0x10, "Blank-to-black setup/pedestal"),
    (0x08, "Separate sync supported"),
    (0x04, "Composite sync (on HSync) supported"),
    (0x02, "Sync on green supported"),
    (0x01, "VSync pulse must be serrated when composite or sync-on-green is used"),
];

fn display_parameters(state: &mut DecodeState, b: &[u8; 128]) {
    let input = b[0x14];
    let digital = input & 0x80 != 0;
    if digital {
        state.report("Digital display");
        if state.is_edid_1_4() {
            match (input >> 4) & 0x07 {
                0 => state.report("Color depth is undefined"),
                7 => state.fail("Color depth field is reserved (7)"),
                depth => state.report(format!(
                    "Bits per primary color channel: {}",
                    4 + 2 * depth
                )),
            }
            match DigitalInterface::from_code(input & 0x0F) {
                Ok(interface) => state.report(interface.label()),
                Err(_) => state.fail(format!("Unknown digital interface 0x{:x}", input & 0x0F)),
            }
        } else {
            if input & 0x7E != 0 {
                state.fail(format!(
                    "Digital video input bits 6-1 are reserved in EDID 1.{}",
                    state.revision
                ));
            }
            if input & 0x01 != 0 {
                state.report("DFP 1.x compatible TMDS");
            }
        }
    } else {
        state.report("Analog display");
        state.report(format!(
            "Signal Level Standard: {}",
            SIGNAL_LEVELS[usize::from((input >> 5) & 0x03)]
        ));
        for (mask, label) in ANALOG_SYNC {
            if input & mask != 0 {
                state.report(label);
            }
        }
    }

    match (b[0x15], b[0x16]) {
        (0, 0) => state.report("Image size is variable"),
        (h, v) if h != 0 && v != 0 => {
            state.report(format!("Maximum image size: {h} cm x {v} cm"));
        }
        (h, v) if state.is_edid_1_4() => {
            if v == 0 {
                let ratio = (f64::from(h) + 99.0) / 100.0;
                state.report(format!("Aspect ratio: {ratio:.2} (landscape)"));
            } else {
                let ratio = 100.0 / (f64::from(v) + 99.0);
                state.report(format!("Aspect ratio: {ratio:.2} (portrait)"));
            }
        }
        _ => state.fail("Only one of the image size bytes is zero"),
    }

    match b[0x17] {
        0xFF if state.is_edid_1_4() => state.report("Gamma is defined in an extension block"),
        gamma => state.report(format!("Gamma: {:.2}", (f64::from(gamma) + 100.0) / 100.0)),
    }

    let features = b[0x18];
    let dpms: Vec<&str> = [(0x80, "Standby"), (0x40, "Suspend"), (0x20, "Off")]
        .into_iter()
        .filter(|&(mask, _)| features & mask != 0)
        .map(|(_, label)| label)
        .collect();
    if !dpms.is_empty() {
        state.report(format!("DPMS levels: {}", dpms.join(" ")));
    }
    let color = usize::from((features >> 3) & 0x03);
    if digital && state.is_edid_1_4() {
        state.report(
            [
                "Supported color formats: RGB 4:4:4",
                "Supported color formats: RGB 4:4:4, YCrCb 4:4:4",
                "Supported color formats: RGB 4:4:4, YCrCb 4:2:2",
                "Supported color formats: RGB 4:4:4, YCrCb 4:4:4, YCrCb 4:2:2",
            ][color],
        );
    } else {
        state.report(
            [
                "Monochrome or grayscale display",
                "RGB color display",
                "Non-RGB color display",
                "Undefined display color type",
            ][color],
        );
    }
    if features & 0x04 != 0 {
        state.report("Default (sRGB) color space is primary color space");
    }
    if state.is_edid_1_4() {
        if features & 0x02 != 0 {
            state.report(
                "First detailed timing includes the native pixel format and preferred refresh rate",
            );
        }
        if features & 0x01 != 0 {
            state.report("Display is continuous frequency");
        }
    } else {
        if features & 0x02 != 0 {
            state.report("First detailed timing is the preferred timing");
        } else {
            state.fail("Required bit 'First detailed timing is preferred timing' is not set");
        }
        if features & 0x01 != 0 {
            state.report("Supports GTF timings within operating range");
        }
    }
}

// ── Chromaticity ──────────────────────────────────────────────────────

fn chromaticity(state: &mut DecodeState, b: &[u8; 128]) {
    let coord = |high: usize, low: u8, shift: u8| -> f64 {
        let raw = (u16::from(b[high]) << 2) | u16::from((low >> shift) & 0x03);
        f64::from(raw) / 1024.0
    };
    let (rg, bw) = (b[0x19], b[0x1A]);
    let points = [
        ("Red  ", coord(0x1B, rg, 6), coord(0x1C, rg, 4)),
        ("Green", coord(0x1D, rg, 2), coord(0x1E, rg, 0)),
        ("Blue ", coord(0x1F, bw, 6), coord(0x20, bw, 4)),
        ("White", coord(0x21, bw, 2), coord(0x22, bw, 0)),
    ];
    for (name, x, y) in points {
        state.report(format!("{name}: {x:.4}, {y:.4}"));
    }
}

// ── Display descriptors ───────────────────────────────────────────────

fn display_descriptor(state: &mut DecodeState, raw: &[u8; DTD_SIZE], seen: &mut Seen) {
    let tag = DescriptorTag::from_byte(raw[3]);
    if raw[2] != 0 {
        state.fail(format!("{}: byte 2 is not zero", tag.name()));
    }
    let flags_allowed = tag == DescriptorTag::RangeLimits && state.is_edid_1_4();
    if raw[4] != 0 && !flags_allowed {
        state.fail(format!("{}: byte 4 is not zero", tag.name()));
    }

    match tag {
        DescriptorTag::SerialNumber | DescriptorTag::DataString | DescriptorTag::ProductName => {
            let text = descriptor_text(&raw[5..]);
            state.report(format!("{}: '{}'", tag.name(), text.text));
            if text.had_unprintable {
                state.fail(format!("{} contains non-printable characters", tag.name()));
            }
            if text.bad_padding {
                state.warn(format!(
                    "{} is not padded with spaces after the 0x0A terminator",
                    tag.name()
                ));
            }
            if tag == DescriptorTag::ProductName {
                seen.product_name = true;
            }
        }
        DescriptorTag::RangeLimits => {
            seen.range_limits = true;
            state.report(format!("{}:", tag.name()));
            state.nested(|s| range_limits(s, raw));
        }
        DescriptorTag::ColorPoint => {
            state.report(format!("{}:", tag.name()));
            state.nested(|s| color_point(s, raw));
        }
        DescriptorTag::StandardTimings => {
            state.report(format!("{}:", tag.name()));
            state.nested(|s| {
                for pair in raw[5..17].chunks_exact(2) {
                    timings::report_standard(s, pair[0], pair[1], EmptyRecords::Skip);
                }
                if raw[17] != 0x0A {
                    s.warn("Standard Timing Identifications: byte 17 should be 0x0A");
                }
            });
        }
        DescriptorTag::ColorManagement => {
            state.report(format!("{}: version {}", tag.name(), raw[5]));
            if raw[5] != 3 {
                state.fail(format!("Unknown Display Color Management Data version {}", raw[5]));
            }
        }
        DescriptorTag::CvtCodes => {
            state.report(format!("{}:", tag.name()));
            if raw[5] != 1 {
                state.fail(format!("Unknown CVT 3 Byte Timing Codes version {}", raw[5]));
            }
            state.nested(|s| {
                for (i, code) in raw[6..18].chunks_exact(3).enumerate() {
                    let code = [code[0], code[1], code[2]];
                    timings::report_cvt(s, i + 1, &code, EmptyRecords::Skip);
                }
            });
        }
        DescriptorTag::EstablishedIii => {
            state.report(format!("{}:", tag.name()));
            if raw[5] != 10 {
                state.fail(format!("Unknown Established timings III version {}", raw[5]));
            }
            state.nested(|s| {
                timings::report_established(s, &raw[6..12], &ESTABLISHED_III);
            });
        }
        DescriptorTag::Dummy => {
            state.report(tag.name());
            if raw[5..].iter().any(|&b| b != 0) {
                state.fail("Dummy Descriptor contains non-zero bytes");
            }
        }
        DescriptorTag::Manufacturer(id) => {
            state.report(format!("{} (0x{id:02x}):", tag.name()));
            state.nested(|s| vendor::hex_dump(s, &raw[5..]));
        }
        DescriptorTag::Reserved(id) => {
            state.report(format!("{} (0x{id:02x})", tag.name()));
            state.unknown(format!("Unknown display descriptor tag 0x{id:02x}"));
        }
    }
}

fn range_limits(state: &mut DecodeState, raw: &[u8; DTD_SIZE]) {
    let flags = raw[4];
    if flags & 0xF0 != 0 {
        state.fail("Display Range Limits: offset flag bits 7-4 are reserved");
    }
    if flags & 0x03 == 0x01 || flags & 0x0C == 0x04 {
        state.fail("Display Range Limits: minimum offset is set without maximum offset");
    }
    let offset = |set: bool| if set { 255u16 } else { 0 };
    let min_v = u16::from(raw[5]) + offset(flags & 0x03 == 0x03);
    let max_v = u16::from(raw[6]) + offset(flags & 0x02 != 0);
    let min_h = u16::from(raw[7]) + offset(flags & 0x0C == 0x0C);
    let max_h = u16::from(raw[8]) + offset(flags & 0x08 != 0);
    let max_clock = u16::from(raw[9]) * 10;

    let support = RangeTimingSupport::from_code(raw[10]);
    let label = match support {
        Ok(RangeTimingSupport::DefaultGtf) => "GTF",
        Ok(RangeTimingSupport::RangeLimitsOnly) => "Bare Limits",
        Ok(RangeTimingSupport::SecondaryGtf) => "Secondary GTF",
        Ok(RangeTimingSupport::Cvt) => "CVT",
        Err(_) => "invalid",
    };
    state.report(format!(
        "Monitor ranges ({label}): {min_v}-{max_v} Hz V, {min_h}-{max_h} kHz H, \
         max dotclock {max_clock} MHz"
    ));
    if min_v > max_v {
        state.fail(format!("Minimum vertical rate {min_v} Hz exceeds maximum {max_v} Hz"));
    }
    if min_h > max_h {
        state.fail(format!(
            "Minimum horizontal rate {min_h} kHz exceeds maximum {max_h} kHz"
        ));
    }

    match support {
        Err(_) => state.fail(format!(
            "Unknown range limits timing support 0x{:02x}",
            raw[10]
        )),
        Ok(RangeTimingSupport::DefaultGtf | RangeTimingSupport::RangeLimitsOnly) => {
            if raw[11] != 0x0A || raw[12..].iter().any(|&b| b != 0x20) {
                state.warn("Display Range Limits: padding should be 0x0A followed by spaces");
            }
            if support == Ok(RangeTimingSupport::RangeLimitsOnly) && !state.is_edid_1_4() {
                state.fail("Bare Limits range descriptor requires EDID 1.4");
            }
        }
        Ok(RangeTimingSupport::SecondaryGtf) => {
            let m = u16::from_le_bytes([raw[14], raw[15]]);
            state.report(format!(
                "GTF Secondary Curve: start {} kHz, C {:.1}, M {m}, K {}, J {:.1}",
                u16::from(raw[12]) * 2,
                f64::from(raw[13]) / 2.0,
                raw[16],
                f64::from(raw[17]) / 2.0,
            ));
        }
        Ok(RangeTimingSupport::Cvt) => {
            if !state.is_edid_1_4() {
                state.fail("CVT range descriptor requires EDID 1.4");
            }
            cvt_range(state, raw, max_clock);
        }
    }
}

fn cvt_range(state: &mut DecodeState, raw: &[u8; DTD_SIZE], max_clock: u16) {
    let (major, minor) = (raw[11] >> 4, raw[11] & 0x0F);
    state.report(format!("CVT version {major}.{minor}"));
    if raw[11] != 0x11 {
        state.warn(format!("Unknown CVT version {major}.{minor}"));
    }
    let reduction = f64::from(raw[12] >> 2) * 0.25;
    if reduction > 0.0 {
        state.report(format!(
            "Maximum pixel clock: {:.2} MHz",
            f64::from(max_clock) - reduction
        ));
    }
    let max_width = ((u16::from(raw[12] & 0x03) << 8) | u16::from(raw[13])) * 8;
    if max_width != 0 {
        state.report(format!("Maximum active pixels per line: {max_width}"));
    }
    let aspects: Vec<&str> = [
        (0x80, "4:3"),
        (0x40, "16:9"),
        (0x20, "16:10"),
        (0x10, "5:4"),
        (0x08, "15:9"),
    ]
    .into_iter()
    .filter(|&(mask, _)| raw[14] & mask != 0)
    .map(|(_, label)| label)
    .collect();
    state.report(format!("Supported aspect ratios: {}", aspects.join(" ")));
    if raw[17] != 0 {
        state.report(format!("Preferred vertical refresh: {} Hz", raw[17]));
    }
}

fn color_point(state: &mut DecodeState, raw: &[u8; DTD_SIZE]) {
    for entry in [&raw[5..10], &raw[10..15]] {
        let index = entry[0];
        if index == 0 {
            continue;
        }
        let x = (u16::from(entry[2]) << 2) | u16::from((entry[1] >> 2) & 0x03);
        let y = (u16::from(entry[3]) << 2) | u16::from(entry[1] & 0x03);
        let gamma = match entry[4] {
            0xFF => "defined in an extension block".to_owned(),
            g => format!("{:.2}", (f64::from(g) + 100.0) / 100.0),
        };
        state.report(format!(
            "Index {index}: {:.4}, {:.4}, gamma {gamma}",
            f64::from(x) / 1024.0,
            f64::from(y) / 1024.0
        ));
    }
}
