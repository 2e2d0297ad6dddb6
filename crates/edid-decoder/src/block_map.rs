//! Block map extension (tag 0xF0).
//!
//! A block map lists the tags of the blocks that follow it: entry `i`
//! (byte `i`, 1..=126) names block `map_index + i`. It may only sit at
//! block 1, covering blocks 2..=127, or at block 128, covering 129..=254.

use edid_types::ExtensionTag;
use edid_wire::WireError;
use edid_wire::block::{Block, CHECKSUM_OFFSET, EdidBlob};

use crate::state::DecodeState;

/// Block indices at which a block map is legal.
pub const BLOCK_MAP_POSITIONS: [usize; 2] = [1, 128];

/// Decode a block map and check each entry against the block it names.
///
/// # Errors
///
/// Only a cursor bounds error; entries are read from a fixed range.
pub fn decode(
    block: &Block<'_>,
    blob: &EdidBlob<'_>,
    state: &mut DecodeState,
) -> Result<(), WireError> {
    let index = block.index();
    if !BLOCK_MAP_POSITIONS.contains(&index) {
        state.fail(format!(
            "Block map is at block {index}; it must be block 1 or block 128"
        ));
    }

    let mut cursor = block.cursor_at(1);
    let mut listed = 0usize;
    while cursor.position() < CHECKSUM_OFFSET {
        let entry = cursor.position();
        let tag_byte = cursor.read_u8()?;
        let target = index + entry;
        match blob.block(target) {
            Some(actual) => {
                let tag = ExtensionTag::from_wire_id(tag_byte);
                state.report(format!("Block {target}: {}", tag.name()));
                listed += 1;
                if tag_byte != actual.tag() {
                    state.fail(format!(
                        "Block map entry {entry} is 0x{tag_byte:02x}, but block {target} \
                         has tag 0x{:02x}",
                        actual.tag()
                    ));
                }
            }
            None if tag_byte != 0 => {
                state.fail(format!(
                    "Block map entry {entry} is 0x{tag_byte:02x}, but block {target} \
                     does not exist"
                ));
            }
            None => {}
        }
    }
    if listed == 0 {
        state.report("No blocks mapped");
    }
    Ok(())
}
