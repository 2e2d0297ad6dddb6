//! Blocks that carry no timing data this decoder interprets: the dummy
//! block, manufacturer-specific blocks and tags that are assigned but not
//! decoded or not assigned at all.

use edid_types::ExtensionTag;
use edid_wire::block::{Block, CHECKSUM_OFFSET};

use crate::state::DecodeState;

/// Bytes per line of a hex dump.
const HEX_LINE: usize = 16;

/// Dummy extension (tag 0x00): everything but the checksum must be zero.
pub fn decode_dummy(block: &Block<'_>, state: &mut DecodeState) {
    let payload = &block.bytes()[1..CHECKSUM_OFFSET];
    if payload.iter().any(|&b| b != 0) {
        state.fail("Dummy block contains non-zero bytes");
    }
}

/// Manufacturer-specific extension (tag 0xFF): opaque, dumped as hex.
pub fn decode_vendor(block: &Block<'_>, state: &mut DecodeState) {
    hex_dump(state, &block.bytes()[1..CHECKSUM_OFFSET]);
}

/// A tag assigned by VESA whose layout this decoder does not implement.
pub fn decode_unsupported(block: &Block<'_>, tag: ExtensionTag, state: &mut DecodeState) {
    state.unknown(format!(
        "{} (tag 0x{:02x}) is not decoded",
        tag.name(),
        block.tag()
    ));
    hex_dump(state, &block.bytes()[1..CHECKSUM_OFFSET]);
}

/// A tag with no assigned meaning.
pub fn decode_unknown(block: &Block<'_>, state: &mut DecodeState) {
    state.unknown(format!("Unknown extension block tag 0x{:02x}", block.tag()));
}

/// Report `bytes` as lines of lowercase hex pairs.
pub fn hex_dump(state: &mut DecodeState, bytes: &[u8]) {
    for chunk in bytes.chunks(HEX_LINE) {
        let line: Vec<String> = chunk.iter().map(|b| format!("{b:02x}")).collect();
        state.report(line.join(" "));
    }
}
