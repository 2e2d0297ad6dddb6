//! VTB-EXT handler properties, checked over whole families of inputs
//! rather than single fixtures.

use edid_builder::{EdidBuilder, VtbExtBuilder};
use edid_decoder::vtb_ext::{self, VtbSummary, required_len};
use edid_decoder::{DecodeState, DecoderConfig, DiagnosticKind, EdidDecoder, Severity};
use edid_tests::{raw_vtb, vtb_mixed};
use edid_wire::block::{BLOCK_SIZE, Block};

fn run(raw: &[u8; BLOCK_SIZE], config: &DecoderConfig) -> (VtbSummary, DecodeState) {
    let mut state = DecodeState::new();
    state.enter_block(1, "Video Timing Extension Block");
    let summary = vtb_ext::decode(&Block::new(1, raw), &mut state, config)
        .unwrap_or_else(|e| panic!("handler returned a wire error: {e}"));
    (summary, state)
}

fn quiet() -> DecoderConfig {
    DecoderConfig {
        flag_vtb_refresh_convention: false,
        ..DecoderConfig::default()
    }
}

// ── Version ───────────────────────────────────────────────────────────────────

#[test]
fn any_version_but_one_fails_exactly_once() {
    for version in [0u8, 2, 3, 0x10, 0xFF] {
        let raw = raw_vtb(version, 1, 1, 1, 0x00);
        let (summary, state) = run(&raw, &quiet());
        let report = state.finish();
        let invalid: Vec<_> = report
            .diagnostics
            .iter()
            .filter(|d| d.message.starts_with("Invalid version"))
            .collect();
        assert_eq!(invalid.len(), 1, "version {version}");
        assert_eq!(invalid[0].message, format!("Invalid version {version}"));
        // Counts are still honoured.
        assert_eq!((summary.dtds, summary.cvts, summary.standard_timings), (1, 1, 1));
    }
}

// ── Counts and bounds ─────────────────────────────────────────────────────────

#[test]
fn counts_that_fit_are_consumed_exactly() {
    for dtds in 0u8..=6 {
        for cvts in [0u8, 1, 3, 5] {
            for standard in [0u8, 1, 2, 8] {
                let needed = required_len(dtds, cvts, standard);
                if needed > BLOCK_SIZE {
                    continue;
                }
                let raw = raw_vtb(1, dtds, cvts, standard, 0x00);
                let (summary, state) = run(&raw, &quiet());
                assert_eq!(summary.consumed, needed, "{dtds}/{cvts}/{standard}");
                assert_eq!(
                    (summary.dtds, summary.cvts, summary.standard_timings),
                    (usize::from(dtds), usize::from(cvts), usize::from(standard))
                );
                assert!(
                    state
                        .finish()
                        .diagnostics
                        .iter()
                        .all(|d| d.kind != DiagnosticKind::StructuralViolation)
                );
            }
        }
    }
}

#[test]
fn counts_that_overflow_are_one_violation_and_clamped() {
    let counts = [0u8, 1, 6, 7, 41, 62, 255];
    for &dtds in &counts {
        for &cvts in &counts {
            for &standard in &counts {
                let needed = required_len(dtds, cvts, standard);
                for fill in [0x00, 0x5A, 0xFF] {
                    let raw = raw_vtb(1, dtds, cvts, standard, fill);
                    let (summary, state) = run(&raw, &quiet());
                    assert!(summary.consumed <= BLOCK_SIZE);
                    assert!(summary.dtds <= usize::from(dtds));
                    assert!(summary.cvts <= usize::from(cvts));
                    assert!(summary.standard_timings <= usize::from(standard));
                    let violations = state
                        .finish()
                        .diagnostics
                        .iter()
                        .filter(|d| d.kind == DiagnosticKind::StructuralViolation)
                        .count();
                    let expected = usize::from(needed > BLOCK_SIZE);
                    assert_eq!(violations, expected, "{dtds}/{cvts}/{standard} fill {fill:#x}");
                }
            }
        }
    }
}

#[test]
fn records_are_read_in_dtd_cvt_standard_order() {
    let raw = vtb_mixed().build().unwrap();
    let (_, state) = run(&raw, &quiet());
    let sections: Vec<_> = state
        .finish()
        .lines
        .into_iter()
        .filter(|l| l.depth == 1)
        .map(|l| l.text)
        .collect();
    assert_eq!(
        sections,
        vec![
            "Version: 1",
            "Detailed Timing Descriptors:",
            "Coordinated Video Timings:",
            "Standard Timings:",
        ]
    );
}

// ── Standard timing refresh ───────────────────────────────────────────────────

#[test]
fn refresh_is_field_plus_sixty_for_every_byte() {
    for x1 in 0u8..=255 {
        let raw = VtbExtBuilder::new()
            .standard_timing([0x81, x1])
            .build()
            .unwrap();
        let (_, state) = run(&raw, &quiet());
        let expected = format!(" {} Hz ", u16::from(x1 & 0x3F) + 60);
        let report = state.finish();
        assert!(
            report
                .lines
                .iter()
                .any(|l| l.depth == 2 && l.text.starts_with("1280x") && l.text.contains(&expected)),
            "x1 = {x1:#04x}"
        );
    }
}

#[test]
fn only_field_sixty_raises_the_advisory() {
    for field in 0u8..=63 {
        let raw = VtbExtBuilder::new()
            .standard_timing([0xD1, 0xC0 | field])
            .build()
            .unwrap();
        let (_, state) = run(&raw, &DecoderConfig::default());
        let advisories = state
            .finish()
            .diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::Advisory)
            .count();
        assert_eq!(advisories, usize::from(field == 60), "field {field}");
    }
}

// ── Whole-blob behaviour ──────────────────────────────────────────────────────

#[test]
fn decoding_is_idempotent() {
    let bytes = EdidBuilder::new()
        .add_vtb_ext(&vtb_mixed())
        .add_vtb_ext(VtbExtBuilder::new().declare_counts(7, 0, 0))
        .build()
        .unwrap();
    let first = EdidDecoder::decode(&bytes).unwrap();
    let second = EdidDecoder::decode(&bytes).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.render(), second.render());
}

#[test]
fn version_one_single_standard_timing_end_to_end() {
    let bytes = EdidBuilder::new()
        .add_vtb_ext(VtbExtBuilder::new().standard_timing([0x81, 0x00]))
        .build()
        .unwrap();
    let report = EdidDecoder::decode(&bytes).unwrap();
    assert_eq!(report.failure_count(), 0);
    let timings: Vec<_> = report
        .lines
        .iter()
        .filter(|l| l.block == 1 && l.depth == 2)
        .map(|l| l.text.as_str())
        .collect();
    assert_eq!(timings, vec!["1280x800 60 Hz 16:10"]);
}

#[test]
fn version_two_with_zero_counts_end_to_end() {
    let bytes = EdidBuilder::new()
        .add_vtb_ext(VtbExtBuilder::new().version(2))
        .build()
        .unwrap();
    let report = EdidDecoder::decode(&bytes).unwrap();
    let failures: Vec<_> = report
        .diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Failure)
        .collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].block_index, 1);
    assert_eq!(failures[0].message, "Invalid version 2");
}

#[test]
fn vtb_revision_follows_the_base_block() {
    // Aspect bits 00 mean 1:1 before EDID 1.3 and 16:10 from 1.3 on.
    let old = EdidBuilder::new()
        .revision(2)
        .add_vtb_ext(VtbExtBuilder::new().standard_timing([0x81, 0x00]))
        .build()
        .unwrap();
    let report = EdidDecoder::decode(&old).unwrap();
    assert!(
        report
            .lines
            .iter()
            .any(|l| l.block == 1 && l.text == "1280x1280 60 Hz 1:1")
    );
}
