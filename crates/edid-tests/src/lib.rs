//! Shared fixtures for the integration tests and benches.
//!
//! Every fixture is synthesized with `edid-builder`, so the suite needs no
//! binary files on disk and each blob's contents are visible in code.

use edid_builder::{CtaBuilder, DisplayIdBuilder, DtdSpec, EdidBuilder, VtbExtBuilder};
use edid_wire::block::{BLOCK_SIZE, compute_checksum};

/// HDMI Licensing IEEE OUI.
pub const OUI_HDMI: u32 = 0x00_0C_03;

/// Base block only: the builder's default EDID 1.4 panel.
#[must_use]
pub fn base_only() -> Vec<u8> {
    EdidBuilder::new()
        .build()
        .unwrap_or_else(|e| panic!("base fixture: {e}"))
}

/// A VTB-EXT block with one record of each kind: 1080p DTD, one CVT code
/// and two standard timings (1920x1080 and 1280x1024 at 60 Hz).
#[must_use]
pub fn vtb_mixed() -> VtbExtBuilder {
    let mut vtb = VtbExtBuilder::new();
    vtb.dtd(&DtdSpec::cea_1080p60())
        .cvt([0x1B, 0x24, 0x29])
        .standard_timing([0xD1, 0xC0])
        .standard_timing([0x81, 0x80]);
    vtb
}

/// A CTA-861 block for a typical HDMI television.
#[must_use]
pub fn cta_tv() -> CtaBuilder {
    let mut cta = CtaBuilder::new();
    cta.flags(0xF1)
        .video(&[0x90, 0x04])
        .audio(&[[0x09, 0x07, 0x07]])
        .speaker_allocation([0x01, 0x00, 0x00])
        .vendor(OUI_HDMI, &[0x10, 0x00, 0x80, 0x3C])
        .dtd(&DtdSpec::cea_720p60());
    cta
}

/// Base block, block map, VTB-EXT, CTA-861 and DisplayID: one of every
/// decoded extension kind.
#[must_use]
pub fn full_chain() -> Vec<u8> {
    EdidBuilder::new()
        .add_block_map()
        .add_vtb_ext(&vtb_mixed())
        .add_cta(&cta_tv())
        .add_displayid(DisplayIdBuilder::new().product_type(3))
        .build()
        .unwrap_or_else(|e| panic!("full chain fixture: {e}"))
}

/// A VTB-EXT block with the given header and `fill` in every record byte.
/// The counts need not fit the block.
#[must_use]
pub fn raw_vtb(version: u8, dtds: u8, cvts: u8, standard: u8, fill: u8) -> [u8; BLOCK_SIZE] {
    let mut raw = [fill; BLOCK_SIZE];
    raw[..5].copy_from_slice(&[0x10, version, dtds, cvts, standard]);
    raw[BLOCK_SIZE - 1] = compute_checksum(&raw[..BLOCK_SIZE - 1]);
    raw
}

/// Deterministic pseudo-random bytes (64-bit LCG, high byte).
#[must_use]
pub fn noise(seed: u64, len: usize) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            state.to_be_bytes()[0]
        })
        .collect()
}
