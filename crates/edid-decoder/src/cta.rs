//! CTA-861 extension (tag 0x02).
//!
//! ```text
//! ┌────────┬─────────────────────────────────────────────────────────┐
//! │ Offset │ Content                                                 │
//! ├────────┼─────────────────────────────────────────────────────────┤
//! │ 1      │ Revision (1-3)                                          │
//! │ 2      │ d: offset of the first DTD, 0 = no DTDs, no data blocks │
//! │ 3      │ Underscan, basic audio, YCbCr 4:4:4, 4:2:2, native DTDs │
//! │ 4 .. d │ Data block collection: header (tag 7-5, len 4-0) + data │
//! │ d ..   │ 18-byte DTDs until a zero pixel clock, then zero padding│
//! └────────┴─────────────────────────────────────────────────────────┘
//! ```

use edid_types::detailed_timing::DTD_SIZE;
use edid_types::enums::AudioFormat;
use edid_types::vic;
use edid_wire::WireError;
use edid_wire::block::{Block, CHECKSUM_OFFSET};
use tracing::trace;

use crate::state::DecodeState;
use crate::timings;
use crate::vendor::hex_dump;

/// First byte of the data block collection.
const COLLECTION_START: usize = 4;

const OUI_HDMI: u32 = 0x00_0C03;
const OUI_HDMI_FORUM: u32 = 0xC4_5DD8;
const OUI_AMD: u32 = 0x00_001A;

/// Decode one CTA-861 extension block.
///
/// # Errors
///
/// A cursor bounds error if a length check was missed; every data block
/// is checked against the collection end before it is read.
pub fn decode(block: &Block<'_>, state: &mut DecodeState) -> Result<(), WireError> {
    let mut header = block.cursor_at(1);
    let revision = header.read_u8()?;
    let offset = header.read_u8()?;
    let flags = header.read_u8()?;

    state.report(format!("Revision: {revision}"));
    if !(1..=3).contains(&revision) {
        state.fail(format!("Unknown CTA-861 revision {revision}"));
    }
    if revision >= 2 {
        for (mask, label) in [
            (0x80, "Underscans IT Video Formats by default"),
            (0x40, "Basic audio support"),
            (0x20, "Supports YCbCr 4:4:4"),
            (0x10, "Supports YCbCr 4:2:2"),
        ] {
            if flags & mask != 0 {
                state.report(label);
            }
        }
        state.report(format!("Native detailed modes: {}", flags & 0x0F));
    } else if flags != 0 {
        state.fail("Byte 3 must be 0 in CTA-861 revision 1");
    }

    let (collection_end, dtd_start) = match usize::from(offset) {
        0 => (COLLECTION_START, None),
        d @ 1..=3 => {
            state.fail(format!("Invalid DTD offset {d}"));
            (COLLECTION_START, Some(COLLECTION_START))
        }
        d if d <= CHECKSUM_OFFSET => (d, Some(d)),
        d => {
            state.violation(format!("DTD offset {d} is past the end of the block"));
            (CHECKSUM_OFFSET, None)
        }
    };

    if revision >= 3 {
        data_block_collection(block, collection_end, state)?;
    } else if collection_end > COLLECTION_START {
        state.unknown(format!(
            "Data block collection ignored for CTA-861 revision {revision}"
        ));
    }

    let padding_start = match dtd_start {
        Some(start) => detailed_timings(block, start, state)?,
        None => collection_end,
    };
    let padding = block
        .cursor_at(padding_start)
        .read_slice(CHECKSUM_OFFSET - padding_start)?;
    if padding.iter().any(|&x| x != 0) {
        state.fail("Padding contains non-zero bytes");
    }
    Ok(())
}

fn data_block_collection(
    block: &Block<'_>,
    end: usize,
    state: &mut DecodeState,
) -> Result<(), WireError> {
    let mut cursor = block.cursor_at(COLLECTION_START);
    while cursor.position() < end {
        let at = cursor.position();
        let header = cursor.read_u8()?;
        let tag = header >> 5;
        let len = usize::from(header & 0x1F);
        trace!(offset = at, tag, len, "CTA data block");
        if cursor.position() + len > end {
            state.violation(format!(
                "{} at offset {at} has length {len}, which runs past the data block \
                 collection end at offset {end}",
                block_name(tag)
            ));
            break;
        }
        let payload = cursor.read_slice(len)?;
        data_block(state, tag, payload);
    }
    Ok(())
}

/// Report DTDs from `start` and return where the padding begins.
fn detailed_timings(
    block: &Block<'_>,
    start: usize,
    state: &mut DecodeState,
) -> Result<usize, WireError> {
    let mut cursor = block.cursor_at(start);
    let mut n = 0;
    while cursor.position() + DTD_SIZE <= CHECKSUM_OFFSET {
        let clock = cursor.remaining().get(..2).unwrap_or_default();
        if clock.iter().all(|&x| x == 0) {
            break;
        }
        if n == 0 {
            state.report("Detailed Timing Descriptors:");
        }
        n += 1;
        let raw = cursor.read_array::<DTD_SIZE>()?;
        state.nested(|s| timings::report_dtd(s, n, raw));
    }
    Ok(cursor.position())
}

// ── Data blocks ───────────────────────────────────────────────────────

fn block_name(tag: u8) -> &'static str {
    match tag {
        1 => "Audio Data Block",
        2 => "Video Data Block",
        3 => "Vendor-Specific Data Block",
        4 => "Speaker Allocation Data Block",
        5 => "VESA Display Transfer Characteristics Data Block",
        7 => "Extended tag data block",
        _ => "Reserved Data Block",
    }
}

fn data_block(state: &mut DecodeState, tag: u8, payload: &[u8]) {
    match tag {
        1 => {
            state.report(format!("{}:", block_name(tag)));
            if payload.len() % 3 != 0 {
                state.fail(format!(
                    "Audio Data Block length {} is not a multiple of 3",
                    payload.len()
                ));
            }
            state.nested(|s| {
                for sad in payload.chunks_exact(3) {
                    short_audio(s, [sad[0], sad[1], sad[2]]);
                }
            });
        }
        2 => {
            state.report(format!("{}:", block_name(tag)));
            state.nested(|s| {
                for &svd in payload {
                    short_video(s, svd);
                }
            });
        }
        3 => vendor_specific(state, payload),
        4 => speaker_allocation(state, payload),
        5 => {
            state.report(format!("{}:", block_name(tag)));
            state.nested(|s| hex_dump(s, payload));
        }
        7 => extended(state, payload),
        _ => {
            state.report(format!("{} (tag {tag}):", block_name(tag)));
            state.unknown(format!("Unknown CTA-861 data block tag {tag}"));
        }
    }
}

const SAMPLE_RATES: [&str; 7] = ["32", "44.1", "48", "88.2", "96", "176.4", "192"];

fn short_audio(state: &mut DecodeState, sad: [u8; 3]) {
    let code = (sad[0] >> 3) & 0x0F;
    let Ok(format) = AudioFormat::from_code(code) else {
        state.report("Reserved audio format 0");
        state.fail("Audio Format Code 0 is reserved");
        return;
    };
    state.report(format!("{format}:"));
    state.nested(|s| {
        s.report(format!("Max channels: {}", (sad[0] & 0x07) + 1));
        let rates: Vec<&str> = SAMPLE_RATES
            .iter()
            .enumerate()
            .filter(|&(bit, _)| sad[1] & (1u8 << bit) != 0)
            .map(|(_, rate)| *rate)
            .collect();
        s.report(format!("Supported sample rates (kHz): {}", rates.join(" ")));
        if sad[1] & 0x80 != 0 {
            s.fail("Sample rate bit 7 is reserved");
        }
        match format {
            AudioFormat::Lpcm => {
                let sizes: Vec<&str> = [(0x01, "16"), (0x02, "20"), (0x04, "24")]
                    .into_iter()
                    .filter(|&(mask, _)| sad[2] & mask != 0)
                    .map(|(_, size)| size)
                    .collect();
                s.report(format!("Supported sample sizes (bits): {}", sizes.join(" ")));
            }
            AudioFormat::Ac3
            | AudioFormat::Mpeg1
            | AudioFormat::Mp3
            | AudioFormat::Mpeg2
            | AudioFormat::Aac
            | AudioFormat::Dts
            | AudioFormat::Atrac => {
                s.report(format!("Maximum bit rate: {} kb/s", u16::from(sad[2]) * 8));
            }
            AudioFormat::Extended => {
                s.report(format!("Extended format type {}", sad[2] >> 3));
            }
            _ => s.report(format!("Format dependent value: 0x{:02x}", sad[2])),
        }
    });
}

fn short_video(state: &mut DecodeState, svd: u8) {
    let (code, native) = match svd {
        0 => {
            state.fail("VIC 0 is reserved");
            return;
        }
        0x80 => {
            state.fail("Short video descriptor 0x80 is reserved");
            return;
        }
        0x81..=0xC0 => (svd & 0x7F, true),
        _ => (svd, false),
    };
    let suffix = if native { " (native)" } else { "" };
    match vic::lookup(code) {
        Some(format) => state.report(format!("{format}{suffix}")),
        None => state.report(format!("VIC {code:3}: format not listed{suffix}")),
    }
}

fn format_oui(oui: u32) -> String {
    format!(
        "{:02X}-{:02X}-{:02X}",
        (oui >> 16) & 0xFF,
        (oui >> 8) & 0xFF,
        oui & 0xFF
    )
}

fn vendor_specific(state: &mut DecodeState, payload: &[u8]) {
    let [o0, o1, o2, rest @ ..] = payload else {
        state.report(format!("{}:", block_name(3)));
        state.fail(format!(
            "Vendor-Specific Data Block is too short ({} bytes)",
            payload.len()
        ));
        return;
    };
    let oui = u32::from(*o0) | (u32::from(*o1) << 8) | (u32::from(*o2) << 16);
    match oui {
        OUI_HDMI => {
            state.report(format!("Vendor-Specific Data Block (HDMI), OUI {}:", format_oui(oui)));
            state.nested(|s| hdmi(s, rest));
        }
        OUI_HDMI_FORUM => {
            state.report(format!(
                "Vendor-Specific Data Block (HDMI Forum), OUI {}:",
                format_oui(oui)
            ));
            state.nested(|s| hdmi_forum(s, rest));
        }
        OUI_AMD => {
            state.report(format!("Vendor-Specific Data Block (AMD), OUI {}:", format_oui(oui)));
            state.nested(|s| amd(s, rest));
        }
        _ => {
            state.report(format!("Vendor-Specific Data Block, OUI {}:", format_oui(oui)));
            state.nested(|s| hex_dump(s, rest));
        }
    }
}

/// FreeSync range: version, flags, then minimum and maximum refresh.
fn amd(state: &mut DecodeState, rest: &[u8]) {
    let [version, _, min, max, ..] = rest else {
        state.fail("AMD VSDB is too short to hold a refresh range");
        return;
    };
    state.report(format!("Version: {version}"));
    state.report(format!("Minimum Refresh Rate: {min} Hz"));
    state.report(format!("Maximum Refresh Rate: {max} Hz"));
    if min > max {
        state.fail(format!("AMD VSDB minimum refresh {min} Hz exceeds maximum {max} Hz"));
    }
}

fn hdmi(state: &mut DecodeState, rest: &[u8]) {
    let [ab, cd, tail @ ..] = rest else {
        state.fail("HDMI VSDB is too short to hold a source physical address");
        return;
    };
    state.report(format!(
        "Source physical address: {}.{}.{}.{}",
        ab >> 4,
        ab & 0x0F,
        cd >> 4,
        cd & 0x0F
    ));
    if let Some(&caps) = tail.first() {
        for (mask, label) in [
            (0x80, "Supports_AI"),
            (0x40, "DC_48bit"),
            (0x20, "DC_36bit"),
            (0x10, "DC_30bit"),
            (0x08, "DC_Y444"),
            (0x01, "DVI_Dual"),
        ] {
            if caps & mask != 0 {
                state.report(label);
            }
        }
    }
    if let Some(&clock) = tail.get(1)
        && clock != 0
    {
        state.report(format!("Maximum TMDS clock: {} MHz", u16::from(clock) * 5));
    }
}

fn hdmi_forum(state: &mut DecodeState, rest: &[u8]) {
    let [version, rate, ..] = rest else {
        state.fail("HDMI Forum VSDB is too short");
        return;
    };
    state.report(format!("Version: {version}"));
    if *version != 1 {
        state.fail(format!("HDMI Forum VSDB version {version}, should be 1"));
    }
    if *rate != 0 {
        state.report(format!(
            "Maximum TMDS Character Rate: {} MHz",
            u16::from(*rate) * 5
        ));
    }
}

const SPEAKERS: [[&str; 8]; 3] = [
    [
        "FL/FR - Front Left/Right",
        "LFE1 - Low Frequency Effects 1",
        "FC - Front Center",
        "BL/BR - Back Left/Right",
        "BC - Back Center",
        "FLc/FRc - Front Left/Right of Center",
        "RLC/RRC - Rear Left/Right of Center",
        "FLw/FRw - Front Left/Right Wide",
    ],
    [
        "TpFL/TpFR - Top Front Left/Right",
        "TpC - Top Center",
        "TpFC - Top Front Center",
        "LS/RS - Left/Right Surround",
        "LFE2 - Low Frequency Effects 2",
        "TpBC - Top Back Center",
        "SiL/SiR - Side Left/Right",
        "TpSiL/TpSiR - Top Side Left/Right",
    ],
    [
        "TpBL/TpBR - Top Back Left/Right",
        "BtFC - Bottom Front Center",
        "BtFL/BtFR - Bottom Front Left/Right",
        "TpLS/TpRS - Top Left/Right Surround",
        "",
        "",
        "",
        "",
    ],
];

fn speaker_allocation(state: &mut DecodeState, payload: &[u8]) {
    state.report(format!("{}:", block_name(4)));
    if payload.len() != 3 {
        state.fail(format!(
            "Speaker Allocation Data Block length {}, should be 3",
            payload.len()
        ));
    }
    if payload.get(2).is_some_and(|&b| b & 0xF0 != 0) {
        state.fail("Speaker Allocation Data Block byte 3 bits 7-4 are reserved");
    }
    state.nested(|s| {
        for (byte, names) in payload.iter().zip(SPEAKERS) {
            for (bit, name) in names.iter().enumerate() {
                if *byte & (1u8 << bit) != 0 && !name.is_empty() {
                    s.report(*name);
                }
            }
        }
    });
}

// ── Extended tag data blocks ──────────────────────────────────────────

const SCAN_BEHAVIOR: [&str; 4] = [
    "Not Supported",
    "Always Overscanned",
    "Always Underscanned",
    "Supports both over- and underscan",
];

const COLORIMETRY: [&str; 8] = [
    "xvYCC601",
    "xvYCC709",
    "sYCC601",
    "opYCC601",
    "opRGB",
    "BT2020cYCC",
    "BT2020YCC",
    "BT2020RGB",
];

const EOTFS: [&str; 4] = [
    "Traditional gamma - SDR luminance range",
    "Traditional gamma - HDR luminance range",
    "SMPTE ST2084",
    "Hybrid Log-Gamma",
];

fn extended_name(ext: u8) -> Option<&'static str> {
    Some(match ext {
        0 => "Video Capability Data Block",
        1 => "Vendor-Specific Video Data Block",
        2 => "VESA Video Display Device Data Block",
        3 => "VESA Video Timing Block Extension",
        5 => "Colorimetry Data Block",
        6 => "HDR Static Metadata Data Block",
        7 => "HDR Dynamic Metadata Data Block",
        13 => "Video Format Preference Data Block",
        14 => "YCbCr 4:2:0 Video Data Block",
        15 => "YCbCr 4:2:0 Capability Map Data Block",
        17 => "Vendor-Specific Audio Data Block",
        18 => "HDMI Audio Data Block",
        19 => "Room Configuration Data Block",
        20 => "Speaker Location Data Block",
        32 => "InfoFrame Data Block",
        _ => return None,
    })
}

fn extended(state: &mut DecodeState, payload: &[u8]) {
    let Some((&ext, rest)) = payload.split_first() else {
        state.report(format!("{}:", block_name(7)));
        state.fail("Extended tag data block has no extended tag byte");
        return;
    };
    let Some(name) = extended_name(ext) else {
        state.report(format!("Unknown extended tag data block (extended tag {ext}):"));
        state.unknown(format!("Unknown CTA-861 extended tag {ext}"));
        return;
    };
    state.report(format!("{name}:"));
    state.nested(|s| match ext {
        0 => video_capability(s, rest),
        5 => colorimetry(s, rest),
        6 => hdr_static_metadata(s, rest),
        14 => {
            for &svd in rest {
                short_video(s, svd);
            }
        }
        _ => hex_dump(s, rest),
    });
}

fn video_capability(state: &mut DecodeState, rest: &[u8]) {
    let [caps] = rest else {
        state.fail(format!(
            "Video Capability Data Block payload is {} bytes, should be 1",
            rest.len()
        ));
        return;
    };
    let selectable = |set: bool| if set { "Selectable" } else { "No Data" };
    state.report(format!("YCbCr quantization: {}", selectable(caps & 0x80 != 0)));
    state.report(format!("RGB quantization: {}", selectable(caps & 0x40 != 0)));
    let pt = usize::from((caps >> 4) & 0x03);
    state.report(format!(
        "PT scan behavior: {}",
        if pt == 0 { "No Data" } else { SCAN_BEHAVIOR[pt] }
    ));
    state.report(format!("IT scan behavior: {}", SCAN_BEHAVIOR[usize::from((caps >> 2) & 0x03)]));
    state.report(format!("CE scan behavior: {}", SCAN_BEHAVIOR[usize::from(caps & 0x03)]));
}

fn colorimetry(state: &mut DecodeState, rest: &[u8]) {
    let [standards, extra] = rest else {
        state.fail(format!(
            "Colorimetry Data Block payload is {} bytes, should be 2",
            rest.len()
        ));
        return;
    };
    for (bit, name) in COLORIMETRY.iter().enumerate() {
        if *standards & (1u8 << bit) != 0 {
            state.report(*name);
        }
    }
    if extra & 0x80 != 0 {
        state.report("DCI-P3");
    }
    if extra & 0x70 != 0 {
        state.fail("Colorimetry Data Block byte 2 bits 6-4 are reserved");
    }
    if extra & 0x0F != 0 {
        state.report(format!("Gamut metadata profiles: 0x{:x}", extra & 0x0F));
    }
}

fn luminance(code: u8) -> f64 {
    50.0 * 2f64.powf(f64::from(code) / 32.0)
}

fn hdr_static_metadata(state: &mut DecodeState, rest: &[u8]) {
    let [eotf, descriptors, luma @ ..] = rest else {
        state.fail("HDR Static Metadata Data Block is too short");
        return;
    };
    state.report("Electro optical transfer functions:");
    state.nested(|s| {
        for (bit, name) in EOTFS.iter().enumerate() {
            if *eotf & (1u8 << bit) != 0 {
                s.report(*name);
            }
        }
    });
    if eotf & 0xF0 != 0 {
        state.fail("HDR Static Metadata Data Block reserved EOTF bits are set");
    }
    if descriptors & 0x01 != 0 {
        state.report("Supported static metadata descriptors: Static metadata type 1");
    }
    if let Some(&max) = luma.first() {
        state.report(format!(
            "Desired content max luminance: {max} ({:.3} cd/m^2)",
            luminance(max)
        ));
    }
    if let Some(&avg) = luma.get(1) {
        state.report(format!(
            "Desired content max frame-average luminance: {avg} ({:.3} cd/m^2)",
            luminance(avg)
        ));
    }
    if let (Some(&max), Some(&min)) = (luma.first(), luma.get(2)) {
        let ratio = f64::from(min) / 255.0;
        state.report(format!(
            "Desired content min luminance: {min} ({:.3} cd/m^2)",
            luminance(max) * ratio * ratio / 100.0
        ));
    }
}

#[cfg(test)]
mod tests {
    use edid_builder::{CtaBuilder, DtdSpec};
    use edid_wire::block::{BLOCK_SIZE, compute_checksum};

    use super::*;
    use crate::state::DiagnosticKind;

    fn run(raw: &[u8; BLOCK_SIZE]) -> DecodeState {
        let mut state = DecodeState::new();
        state.enter_block(1, "CTA-861 Extension Block");
        decode(&Block::new(1, raw), &mut state).unwrap();
        state
    }

    fn texts(state: DecodeState) -> Vec<String> {
        state.finish().lines.into_iter().map(|l| l.text).collect()
    }

    #[test]
    fn typical_tv_block_is_clean() {
        let raw = CtaBuilder::new()
            .flags(0xF1)
            .video(&[0x90, 0x04])
            .audio(&[[0x09, 0x07, 0x07]])
            .speaker_allocation([0x01, 0x00, 0x00])
            .vendor(OUI_HDMI, &[0x10, 0x00, 0x80, 0x3C])
            .dtd(&DtdSpec::cea_720p60())
            .build()
            .unwrap();
        let state = run(&raw);
        assert_eq!(state.failure_count(), 0);
        assert_eq!(state.warning_count(), 0);
        let lines = texts(state);
        for expected in [
            "Revision: 3",
            "Native detailed modes: 1",
            "VIC  16: 1920x1080p 60 Hz 16:9 (native)",
            "VIC   4: 1280x720p 60 Hz 16:9",
            "Linear PCM:",
            "Max channels: 2",
            "Supported sample rates (kHz): 32 44.1 48",
            "Supported sample sizes (bits): 16 20 24",
            "FL/FR - Front Left/Right",
            "Vendor-Specific Data Block (HDMI), OUI 00-0C-03:",
            "Source physical address: 1.0.0.0",
            "Supports_AI",
            "Maximum TMDS clock: 300 MHz",
        ] {
            assert!(lines.iter().any(|l| l == expected), "missing line {expected:?}");
        }
        assert!(lines.iter().any(|l| l.starts_with("DTD 1: 1280x720 60.000 Hz")));
    }

    #[test]
    fn data_block_past_collection_end_is_a_violation() {
        let raw = CtaBuilder::new()
            .video(&[0x90, 0x04, 0x03, 0x02])
            .dtd_offset(6)
            .build()
            .unwrap();
        let report = run(&raw).finish();
        let violations = report
            .diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::StructuralViolation)
            .count();
        assert_eq!(violations, 1);
    }

    #[test]
    fn non_zero_padding_fails() {
        let mut raw = CtaBuilder::new().video(&[0x90]).build().unwrap();
        raw[100] = 0x55;
        raw[127] = compute_checksum(&raw[..127]);
        let report = run(&raw).finish();
        assert_eq!(report.failure_count(), 1);
        assert_eq!(report.diagnostics[0].message, "Padding contains non-zero bytes");
    }

    #[test]
    fn unknown_extended_tag_warns() {
        let raw = CtaBuilder::new().extended(0x30, &[1, 2]).build().unwrap();
        let state = run(&raw);
        assert_eq!(state.failure_count(), 0);
        assert_eq!(state.warning_count(), 1);
    }

    #[test]
    fn hdr_and_colorimetry() {
        let raw = CtaBuilder::new()
            .extended(5, &[0xE0, 0x80])
            .extended(6, &[0x05, 0x01])
            .build()
            .unwrap();
        let state = run(&raw);
        assert_eq!(state.failure_count(), 0);
        let lines = texts(state);
        for expected in [
            "BT2020RGB",
            "DCI-P3",
            "SMPTE ST2084",
            "Traditional gamma - SDR luminance range",
        ] {
            assert!(lines.iter().any(|l| l == expected), "missing line {expected:?}");
        }
    }

    #[test]
    fn short_vendor_block_fails() {
        let raw = CtaBuilder::new().data_block(3, &[0x03, 0x0C]).build().unwrap();
        assert_eq!(run(&raw).failure_count(), 1);
    }

    #[test]
    fn reserved_svd_and_audio_code_fail() {
        let raw = CtaBuilder::new()
            .video(&[0x00, 0x80])
            .audio(&[[0x01, 0x07, 0x00]])
            .build()
            .unwrap();
        assert_eq!(run(&raw).failure_count(), 3);
    }

    #[test]
    fn amd_refresh_range_is_decoded() {
        let raw = CtaBuilder::new()
            .vendor(OUI_AMD, &[0x02, 0x00, 48, 144])
            .vendor(OUI_AMD, &[0x02, 0x00, 90, 60])
            .build()
            .unwrap();
        let state = run(&raw);
        assert_eq!(state.failure_count(), 1);
        let lines = texts(state);
        for expected in [
            "Vendor-Specific Data Block (AMD), OUI 00-00-1A:",
            "Minimum Refresh Rate: 48 Hz",
            "Maximum Refresh Rate: 144 Hz",
        ] {
            assert!(lines.iter().any(|l| l == expected), "missing line {expected:?}");
        }
    }

    #[test]
    fn dtds_end_at_zero_clock_and_padding_is_checked_after_them() {
        let mut raw = CtaBuilder::new()
            .dtd(&DtdSpec::cea_1080p60())
            .dtd(&DtdSpec::cea_720p60())
            .build()
            .unwrap();
        let clean = run(&raw);
        assert_eq!(clean.failure_count(), 0);
        let lines = texts(clean);
        assert!(lines.iter().any(|l| l.starts_with("DTD 1: 1920x1080")));
        assert!(lines.iter().any(|l| l.starts_with("DTD 2: 1280x720")));
        assert!(!lines.iter().any(|l| l.starts_with("DTD 3:")));

        raw[4 + 2 * DTD_SIZE + 2] = 0x55;
        raw[127] = compute_checksum(&raw[..127]);
        let report = run(&raw).finish();
        assert_eq!(report.failure_count(), 1);
        assert_eq!(report.diagnostics[0].message, "Padding contains non-zero bytes");
    }
}
