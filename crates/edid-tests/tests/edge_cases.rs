//! Edge cases across the whole decoder: malformed input shapes, broken
//! extension chains, unknown tags and arbitrary bytes.

use edid_builder::{CtaBuilder, DisplayIdBuilder, EdidBuilder, VtbExtBuilder};
use edid_decoder::{DecodeError, DecoderConfig, DiagnosticKind, EdidDecoder, Severity};
use edid_tests::{base_only, full_chain, noise, raw_vtb};
use edid_wire::WireError;
use edid_wire::block::BLOCK_SIZE;

// ── Input shape ───────────────────────────────────────────────────────────────

#[test]
fn empty_input_is_the_only_kind_of_abort() {
    let err = EdidDecoder::decode(&[]).unwrap_err();
    assert!(matches!(err, DecodeError::InputSize(WireError::Empty)));
    assert_eq!(
        err.to_string(),
        "invalid EDID input: input is empty: an EDID needs at least one 128-byte block"
    );
}

#[test]
fn truncated_input_is_rejected() {
    let mut bytes = base_only();
    bytes.truncate(100);
    assert!(matches!(
        EdidDecoder::decode(&bytes),
        Err(DecodeError::InputSize(WireError::Misaligned { len: 100 }))
    ));

    let mut bytes = base_only();
    bytes.push(0);
    assert!(matches!(
        EdidDecoder::decode(&bytes),
        Err(DecodeError::InputSize(WireError::Misaligned { len: 129 }))
    ));
}

#[test]
fn block_limit_is_configurable() {
    let bytes = vec![0u8; BLOCK_SIZE * 257];
    assert!(matches!(
        EdidDecoder::decode(&bytes),
        Err(DecodeError::InputSize(WireError::TooManyBlocks {
            count: 257,
            limit: 256
        }))
    ));
    let roomy = DecoderConfig {
        max_blocks: 300,
        ..DecoderConfig::default()
    };
    let report = EdidDecoder::decode_with_config(&bytes, &roomy).unwrap();
    assert_eq!(report.blocks.len(), 257);
}

// ── Chain structure ───────────────────────────────────────────────────────────

#[test]
fn full_chain_conforms() {
    let report = EdidDecoder::decode(&full_chain()).unwrap();
    assert!(report.conforms(), "{}", report.render());
    let names: Vec<_> = report.blocks.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Base EDID",
            "Block Map Extension Block",
            "Video Timing Extension Block",
            "CTA-861 Extension Block",
            "DisplayID Extension Block",
        ]
    );
    assert!(report.blocks.iter().all(|b| b.checksum_ok == Some(true)));
}

#[test]
fn missing_extension_blocks_are_reported_on_the_base_block() {
    let bytes = EdidBuilder::new()
        .add_vtb_ext(&VtbExtBuilder::new())
        .declare_extensions(2)
        .build()
        .unwrap();
    let report = EdidDecoder::decode(&bytes).unwrap();
    let base: Vec<_> = report.diagnostics_for(0).collect();
    assert_eq!(base.len(), 1);
    assert_eq!(base[0].severity, Severity::Failure);
    // The block that is present is still decoded.
    assert!(report.render_block(1).contains("Version: 1"));
}

#[test]
fn every_bad_checksum_is_its_own_failure() {
    let bytes = EdidBuilder::new()
        .add_vtb_ext(&VtbExtBuilder::new())
        .add_cta(&CtaBuilder::new())
        .corrupt_checksum(0)
        .corrupt_checksum(2)
        .build()
        .unwrap();
    let report = EdidDecoder::decode(&bytes).unwrap();
    let bad: Vec<_> = report
        .diagnostics
        .iter()
        .filter(|d| d.message.starts_with("Invalid checksum"))
        .map(|d| d.block_index)
        .collect();
    assert_eq!(bad, vec![0, 2]);
    assert_eq!(report.blocks[1].checksum_ok, Some(true));
}

#[test]
fn block_map_away_from_block_one_fails() {
    let bytes = EdidBuilder::new()
        .add_vtb_ext(&VtbExtBuilder::new())
        .add_block_map()
        .build()
        .unwrap();
    let report = EdidDecoder::decode(&bytes).unwrap();
    assert!(
        report
            .diagnostics_for(2)
            .any(|d| d.message.starts_with("Block map is at block 2"))
    );
}

// ── Tags ──────────────────────────────────────────────────────────────────────

#[test]
fn unknown_and_unsupported_tags_warn_and_decoding_continues() {
    let bytes = EdidBuilder::new()
        .add_tagged_extension(0x42)
        .add_tagged_extension(0x40)
        .add_vtb_ext(VtbExtBuilder::new().version(3))
        .build()
        .unwrap();
    let report = EdidDecoder::decode(&bytes).unwrap();
    assert_eq!(report.blocks[1].name, "Unknown Extension Block");
    assert!(
        report
            .diagnostics_for(1)
            .all(|d| d.kind == DiagnosticKind::UnknownConstruct)
    );
    assert!(
        report
            .diagnostics_for(2)
            .all(|d| d.severity == Severity::Warning)
    );
    assert_eq!(report.diagnostics_for(2).count(), 1);
    assert!(
        report
            .diagnostics_for(3)
            .any(|d| d.message == "Invalid version 3")
    );
}

#[test]
fn dummy_extension_must_be_zero_filled() {
    let mut block = [0u8; BLOCK_SIZE];
    block[50] = 0xAA;
    let bytes = EdidBuilder::new()
        .add_tagged_extension(0x00)
        .add_raw_extension(block)
        .build()
        .unwrap();
    let report = EdidDecoder::decode(&bytes).unwrap();
    assert_eq!(report.diagnostics_for(1).count(), 0);
    assert_eq!(
        report
            .diagnostics_for(2)
            .filter(|d| d.severity == Severity::Failure)
            .count(),
        1
    );
}

#[test]
fn displayid_section_checksum_is_separate_from_block_checksum() {
    let bytes = EdidBuilder::new()
        .add_displayid(DisplayIdBuilder::new().corrupt_section_checksum())
        .build()
        .unwrap();
    let report = EdidDecoder::decode(&bytes).unwrap();
    assert_eq!(report.blocks[1].checksum_ok, Some(true));
    assert_eq!(report.failure_count(), 1);
}

// ── Arbitrary bytes ───────────────────────────────────────────────────────────

#[test]
fn arbitrary_blobs_never_panic() {
    for seed in 0..64u64 {
        let blocks = 1 + usize::try_from(seed % 4).unwrap();
        let mut bytes = noise(seed, blocks * BLOCK_SIZE);
        // Steer some blocks at the handlers that parse the most.
        for (i, tag) in [0x10u8, 0x02, 0x70].iter().enumerate() {
            if i + 1 < blocks && seed % 2 == 0 {
                bytes[(i + 1) * BLOCK_SIZE] = *tag;
            }
        }
        let report = EdidDecoder::decode(&bytes).unwrap();
        assert_eq!(report.blocks.len(), blocks);
        let rendered = report.render();
        assert!(rendered.ends_with("EDID conformity: FAIL\n"));
    }
}

#[test]
fn extreme_vtb_counts_in_a_full_blob() {
    let bytes = EdidBuilder::new()
        .add_raw_extension(raw_vtb(1, 0xFF, 0xFF, 0xFF, 0x5A))
        .add_raw_extension(raw_vtb(1, 0, 0, 0, 0))
        .build()
        .unwrap();
    let report = EdidDecoder::decode(&bytes).unwrap();
    assert_eq!(
        report
            .diagnostics_for(1)
            .filter(|d| d.kind == DiagnosticKind::StructuralViolation)
            .count(),
        1
    );
    assert_eq!(report.diagnostics_for(2).count(), 0);
}
