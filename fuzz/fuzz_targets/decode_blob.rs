#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: full EDID decoder entry point.
//
// Input is padded or cut to a whole number of blocks so most runs reach
// the block handlers instead of stopping at the size check.
//
// Catches bugs in:
// - Base block field decoding
// - Extension dispatch for every tag byte
// - Count and length fields that point past a block
// - Report rendering and JSON serialization
fuzz_target!(|data: &[u8]| {
    let _ = edid_decoder::EdidDecoder::decode(data);

    let blocks = (data.len() / 128).clamp(1, 8);
    let mut bytes = data.to_vec();
    bytes.resize(blocks * 128, 0);
    let report = edid_decoder::EdidDecoder::decode(&bytes).unwrap();
    assert_eq!(report.blocks.len(), blocks);
    let _ = report.render();
    let _ = report.to_json().unwrap();
});
