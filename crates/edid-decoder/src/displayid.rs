//! DisplayID section carried in an EDID extension (tag 0x70).
//!
//! ```text
//! ┌──────────┬────────────────────────────────────────────────┐
//! │ Offset   │ Content                                        │
//! ├──────────┼────────────────────────────────────────────────┤
//! │ 1        │ Version: 0x10-0x13 (1.x) or 0x20-0x21 (2.x)    │
//! │ 2        │ Payload length n (at most 121)                 │
//! │ 3        │ Product type (1.x) / primary use case (2.x)    │
//! │ 4        │ Extension count                                │
//! │ 5 .. 5+n │ Data blocks: tag, revision, length, payload    │
//! │ 5+n      │ Section checksum over bytes 1..=5+n            │
//! └──────────┴────────────────────────────────────────────────┘
//! ```

use edid_types::displayid_timing::{DISPLAYID_TIMING_SIZE, DisplayIdTiming};
use edid_wire::WireError;
use edid_wire::block::{Block, CHECKSUM_OFFSET};
use edid_wire::cursor::ByteCursor;
use tracing::trace;

use crate::state::DecodeState;

/// First data block offset.
const SECTION_START: usize = 5;

/// Largest payload that leaves room for the section checksum.
pub const MAX_PAYLOAD: usize = CHECKSUM_OFFSET - SECTION_START - 1;

/// Data block header size: tag, revision, length.
const BLOCK_HEADER: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Generation {
    V1,
    V2,
}

/// Decode one DisplayID extension block.
///
/// # Errors
///
/// A cursor bounds error if a length check was missed.
pub fn decode(block: &Block<'_>, state: &mut DecodeState) -> Result<(), WireError> {
    let mut header = block.cursor_at(1);
    let version = header.read_u8()?;
    let declared_len = header.read_u8()?;
    let product = header.read_u8()?;
    let extension_count = header.read_u8()?;
    let generation = match version {
        0x10..=0x13 => Some(Generation::V1),
        0x20..=0x21 => Some(Generation::V2),
        _ => None,
    };
    state.report(format!("Version: {}.{}", version >> 4, version & 0x0F));
    if generation.is_none() {
        state.fail(format!("Unknown DisplayID version 0x{version:02x}"));
    }

    let mut len = usize::from(declared_len);
    if len > MAX_PAYLOAD {
        state.violation(format!(
            "DisplayID payload length {len} exceeds the {MAX_PAYLOAD} bytes an extension \
             block can hold"
        ));
        len = MAX_PAYLOAD;
    }

    match generation {
        Some(Generation::V2) => match primary_use_case(product) {
            Some(name) => state.report(format!("Primary use case: {name}")),
            None => state.fail(format!("Unknown primary use case {product}")),
        },
        _ => match product_type(product) {
            Some(name) => state.report(format!("Display product type: {name}")),
            None => state.fail(format!("Unknown display product type {product}")),
        },
    }
    state.report(format!("Extension count: {extension_count}"));

    let end = SECTION_START + len;
    data_blocks(block, end, generation.unwrap_or(Generation::V1), state)?;

    let mut cursor = block.cursor_at(1);
    let section = cursor.read_slice(end)?;
    let stored = section.last().copied().unwrap_or_default();
    let section_sum = section.iter().fold(0u8, |acc, &x| acc.wrapping_add(x));
    state.report(format!("Section checksum: 0x{stored:02x}"));
    if section_sum != 0 {
        let expected = stored.wrapping_sub(section_sum);
        state.fail(format!(
            "Invalid DisplayID section checksum 0x{stored:02x} (should be 0x{expected:02x})"
        ));
    }
    let padding = cursor.read_slice(CHECKSUM_OFFSET - cursor.position())?;
    if padding.iter().any(|&x| x != 0) {
        state.fail("Padding after the DisplayID section contains non-zero bytes");
    }
    Ok(())
}

fn data_blocks(
    block: &Block<'_>,
    end: usize,
    generation: Generation,
    state: &mut DecodeState,
) -> Result<(), WireError> {
    let mut cursor = block.cursor_at(SECTION_START);
    while cursor.position() < end {
        let at = cursor.position();
        let remaining = cursor.remaining().get(..end - at).unwrap_or_default();
        if remaining.iter().all(|&x| x == 0) {
            break;
        }
        if end - at < BLOCK_HEADER {
            state.violation(format!(
                "Data block header at offset {at} is cut off by the section end at {end}"
            ));
            break;
        }
        let tag = cursor.read_u8()?;
        let revision = cursor.read_u8()?;
        let len = usize::from(cursor.read_u8()?);
        trace!(offset = at, tag, revision, len, "DisplayID data block");
        if cursor.position() + len > end {
            state.violation(format!(
                "Data block 0x{tag:02x} at offset {at} has length {len}, which runs past the \
                 section end at {end}"
            ));
            break;
        }
        let payload = cursor.read_slice(len)?;
        data_block(state, generation, tag, payload);
    }
    Ok(())
}

fn product_type(code: u8) -> Option<&'static str> {
    Some(match code {
        0 => "Extension Section",
        1 => "Test Structure; test equipment only",
        2 => "Display panel or other transducer, LCD or PDP module, etc.",
        3 => "Standalone display device",
        4 => "Television receiver",
        5 => "Repeater/translator",
        6 => "DIRECT DRIVE monitor",
        _ => return None,
    })
}

fn primary_use_case(code: u8) -> Option<&'static str> {
    Some(match code {
        0 => "Same primary use case as the base section",
        1 => "Test Structure; test equipment only",
        2 => "Generic display",
        3 => "Television (TV) display",
        4 => "Desktop productivity display",
        5 => "Desktop gaming display",
        6 => "Presentation display",
        7 => "Head-mounted Virtual Reality (VR) display",
        8 => "Head-mounted Augmented Reality (AR) display",
        _ => return None,
    })
}

/// Name of a data block tag and the generation it belongs to.
fn block_name(tag: u8) -> Option<(&'static str, Generation)> {
    use Generation::{V1, V2};
    Some(match tag {
        0x00 => ("Product Identification Data Block", V1),
        0x01 => ("Display Parameters Data Block", V1),
        0x02 => ("Color Characteristics Data Block", V1),
        0x03 => ("Video Timing Modes Type 1 - Detailed Timings Data Block", V1),
        0x04 => ("Video Timing Modes Type 2 - Detailed Timings Data Block", V1),
        0x05 => ("Video Timing Modes Type 3 - Short Timings Data Block", V1),
        0x06 => ("Video Timing Modes Type 4 - DMT Timings Data Block", V1),
        0x07 => ("Supported Timing Modes Type 1 - VESA DMT Timings Data Block", V1),
        0x08 => ("Supported Timing Modes Type 2 - CTA-861 Timings Data Block", V1),
        0x09 => ("Video Timing Range Data Block", V1),
        0x0A => ("Product Serial Number Data Block", V1),
        0x0B => ("GP ASCII String Data Block", V1),
        0x0C => ("Display Device Data Data Block", V1),
        0x0D => ("Interface Power Sequencing Data Block", V1),
        0x0E => ("Transfer Characteristics Data Block", V1),
        0x0F => ("Display Interface Data Block", V1),
        0x10 => ("Stereo Display Interface Data Block", V1),
        0x11 => ("Video Timing Modes Type 5 - Short Timings Data Block", V1),
        0x12 => ("Tiled Display Topology Data Block", V1),
        0x13 => ("Video Timing Modes Type 6 - Detailed Timings Data Block", V1),
        0x7F => ("Vendor-Specific Data Block", V1),
        0x20 => ("Product Identification Data Block", V2),
        0x21 => ("Display Parameters Data Block", V2),
        0x22 => ("Video Timing Modes Type 7 - Detailed Timings Data Block", V2),
        0x23 => ("Video Timing Modes Type 8 - Enumerated Timing Codes Data Block", V2),
        0x24 => ("Video Timing Modes Type 9 - Formula-based Timings Data Block", V2),
        0x25 => ("Dynamic Video Timing Range Limits Data Block", V2),
        0x26 => ("Display Interface Features Data Block", V2),
        0x27 => ("Stereo Display Interface Data Block", V2),
        0x28 => ("Tiled Display Topology Data Block", V2),
        0x29 => ("ContainerID Data Block", V2),
        0x7E => ("Vendor-Specific Data Block", V2),
        0x81 => ("CTA-861 DisplayID Data Block", V2),
        _ => return None,
    })
}

fn data_block(state: &mut DecodeState, generation: Generation, tag: u8, payload: &[u8]) {
    let Some((name, home)) = block_name(tag) else {
        state.report(format!("Unknown Data Block (0x{tag:02x}):"));
        state.unknown(format!("Unknown DisplayID data block tag 0x{tag:02x}"));
        return;
    };
    state.report(format!("{name}:"));
    if home != generation && tag != 0x81 {
        let version = if generation == Generation::V1 { "1.x" } else { "2.x" };
        state.fail(format!("{name} (0x{tag:02x}) is not allowed in DisplayID {version}"));
    }
    state.nested(|s| match tag {
        0x00 | 0x20 => product_identification(s, tag, payload),
        0x03 => detailed_timings(s, payload, 10),
        0x22 => detailed_timings(s, payload, 1),
        _ => s.report(format!("{} bytes, not decoded", payload.len())),
    });
}

fn product_identification(state: &mut DecodeState, tag: u8, payload: &[u8]) {
    if payload.len() < 12 {
        state.fail(format!(
            "Product Identification Data Block is {} bytes, needs at least 12",
            payload.len()
        ));
        return;
    }
    if tag == 0x00 {
        let vendor: String = payload[..3].iter().map(|&c| char::from(c)).collect();
        state.report(format!("Vendor ID: {vendor}"));
    } else {
        state.report(format!(
            "Vendor OUI: {:02X}-{:02X}-{:02X}",
            payload[0], payload[1], payload[2]
        ));
    }
    let product = u16::from_le_bytes([payload[3], payload[4]]);
    let serial = u32::from_le_bytes([payload[5], payload[6], payload[7], payload[8]]);
    state.report(format!("Product Code: {product}"));
    if serial != 0 {
        state.report(format!("Serial Number: {serial}"));
    }
    let (week, year) = (payload[9], 2000 + u16::from(payload[10]));
    match week {
        0 => state.report(format!("Year of Manufacture: {year}")),
        0xFF => state.report(format!("Model Year: {year}")),
        week @ 1..=54 => state.report(format!("Year of Manufacture: {year}, Week {week}")),
        week => {
            state.report(format!("Year of Manufacture: {year}"));
            state.fail(format!("Invalid week {week}"));
        }
    }
    let name_len = usize::from(payload[11]);
    match payload.get(12..12 + name_len) {
        Some(name) if !name.is_empty() => {
            let text: String = name.iter().map(|&c| char::from(c)).collect();
            state.report(format!("Product ID: '{text}'"));
        }
        Some(_) => {}
        None => state.violation(format!(
            "Product ID string length {name_len} runs past the data block"
        )),
    }
}

fn detailed_timings(state: &mut DecodeState, payload: &[u8], clock_unit_khz: u32) {
    if payload.len() % DISPLAYID_TIMING_SIZE != 0 {
        state.fail(format!(
            "Detailed timings data block length {} is not a multiple of {DISPLAYID_TIMING_SIZE}",
            payload.len()
        ));
    }
    let mut records = ByteCursor::new(payload);
    while let Ok(raw) = records.read_array::<DISPLAYID_TIMING_SIZE>() {
        let timing = DisplayIdTiming::parse(raw, clock_unit_khz);
        state.report(format!("DTD: {timing}"));
        if timing.aspect().is_none() {
            state.fail(format!("Reserved aspect ratio code {}", timing.aspect_code));
        }
        if timing.h_front + timing.h_sync > timing.h_blank {
            state.fail(format!(
                "DTD {}x{}: horizontal front porch + sync exceeds blanking",
                timing.h_active, timing.v_active
            ));
        }
        if timing.v_front + timing.v_sync > timing.v_blank {
            state.fail(format!(
                "DTD {}x{}: vertical front porch + sync exceeds blanking",
                timing.h_active, timing.v_active
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use edid_builder::DisplayIdBuilder;
    use edid_wire::block::{BLOCK_SIZE, compute_checksum};

    use super::*;
    use crate::state::DiagnosticKind;

    fn run(raw: &[u8; BLOCK_SIZE]) -> DecodeState {
        let mut state = DecodeState::new();
        state.enter_block(1, "DisplayID Extension Block");
        decode(&Block::new(1, raw), &mut state).unwrap();
        state
    }

    fn timing_1080p() -> Vec<u8> {
        let field = |v: u16| (v - 1).to_le_bytes();
        let mut raw = Vec::new();
        raw.extend_from_slice(&(14_850u32 - 1).to_le_bytes()[..3]);
        raw.push(0x84);
        for v in [1920, 280, 88, 44, 1080, 45, 4, 5] {
            raw.extend_from_slice(&field(v));
        }
        raw
    }

    #[test]
    fn type_one_timing_section() {
        let mut product = b"TST".to_vec();
        product.extend_from_slice(&[0x01, 0x00, 0, 0, 0, 0, 10, 24, 3]);
        product.extend_from_slice(b"ABC");
        let raw = DisplayIdBuilder::new()
            .product_type(3)
            .data_block(0x00, 0, &product)
            .data_block(0x03, 0, &timing_1080p())
            .build()
            .unwrap();
        let state = run(&raw);
        assert_eq!(state.failure_count(), 0);
        let lines: Vec<_> = state.finish().lines.into_iter().map(|l| l.text).collect();
        for expected in [
            "Version: 1.2",
            "Display product type: Standalone display device",
            "Vendor ID: TST",
            "Year of Manufacture: 2024, Week 10",
            "Product ID: 'ABC'",
            "DTD: 1920x1080 60.000 Hz 16:9 148.500 MHz (preferred)",
        ] {
            assert!(lines.iter().any(|l| l == expected), "missing line {expected:?}");
        }
    }

    #[test]
    fn corrupt_section_checksum_fails() {
        let raw = DisplayIdBuilder::new().corrupt_section_checksum().build().unwrap();
        let report = run(&raw).finish();
        assert_eq!(report.failure_count(), 1);
        assert!(report.diagnostics[0].message.starts_with("Invalid DisplayID section checksum"));
    }

    #[test]
    fn oversized_payload_is_clamped() {
        let mut raw = DisplayIdBuilder::new().build().unwrap();
        raw[2] = 200;
        raw[127] = compute_checksum(&raw[..127]);
        let report = run(&raw).finish();
        assert_eq!(
            report
                .diagnostics
                .iter()
                .filter(|d| d.kind == DiagnosticKind::StructuralViolation)
                .count(),
            1
        );
    }

    #[test]
    fn generation_mismatch_and_unknown_tags() {
        let raw = DisplayIdBuilder::new()
            .version(0x20)
            .data_block(0x03, 0, &timing_1080p())
            .data_block(0x55, 0, &[1, 2, 3])
            .build()
            .unwrap();
        let state = run(&raw);
        assert_eq!(state.failure_count(), 1);
        assert_eq!(state.warning_count(), 1);
    }

    #[test]
    fn every_timing_record_is_read_and_padding_is_checked() {
        let mut payload = timing_1080p();
        payload.extend_from_slice(&timing_1080p());
        let mut raw = DisplayIdBuilder::new()
            .data_block(0x03, 0, &payload)
            .build()
            .unwrap();
        raw[126] = 0x01;
        raw[127] = compute_checksum(&raw[..127]);
        let report = run(&raw).finish();
        let timings = report
            .lines
            .iter()
            .filter(|l| l.text.starts_with("DTD: 1920x1080"))
            .count();
        assert_eq!(timings, 2);
        let failures: Vec<_> = report.diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            failures,
            vec!["Padding after the DisplayID section contains non-zero bytes"]
        );
    }
}
