#![no_main]

use edid_decoder::vtb_ext::{self, required_len};
use edid_decoder::{DecodeState, DecoderConfig};
use edid_wire::block::{Block, BLOCK_SIZE};
use libfuzzer_sys::fuzz_target;

// Fuzz target: VTB-EXT handler on one arbitrary 128-byte block.
//
// Asserts the bounds property directly: the handler never reports
// consuming more than the block, never reads more records than declared,
// and raises a structural violation exactly when the counts overflow.
fuzz_target!(|data: &[u8]| {
    let mut raw = [0u8; BLOCK_SIZE];
    let n = data.len().min(BLOCK_SIZE);
    raw[..n].copy_from_slice(&data[..n]);
    raw[0] = 0x10;

    let mut state = DecodeState::new();
    state.enter_block(1, "Video Timing Extension Block");
    let summary = vtb_ext::decode(&Block::new(1, &raw), &mut state, &DecoderConfig::default())
        .unwrap();

    assert!(summary.consumed <= BLOCK_SIZE);
    assert!(summary.dtds <= usize::from(raw[2]));
    assert!(summary.cvts <= usize::from(raw[3]));
    assert!(summary.standard_timings <= usize::from(raw[4]));

    let overflow = required_len(raw[2], raw[3], raw[4]) > BLOCK_SIZE;
    let violations = state
        .finish()
        .diagnostics
        .iter()
        .filter(|d| d.kind == edid_decoder::DiagnosticKind::StructuralViolation)
        .count();
    assert_eq!(violations, usize::from(overflow));
});
