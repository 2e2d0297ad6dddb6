use edid_types::ExtensionTag;
use edid_wire::WireError;
use edid_wire::block::{Block, EdidBlob};
use tracing::debug;

use crate::config::DecoderConfig;
use crate::state::DecodeState;
use crate::{block_map, cta, displayid, vendor, vtb_ext};

/// Decode one extension block: heading, tag-specific handler, checksum.
///
/// ```text
///   tag byte ──▶ ExtensionTag::from_wire_id
///     0x00 Dummy            → vendor::decode_dummy
///     0x02 CTA-861          → cta::decode
///     0x10 VTB-EXT          → vtb_ext::decode
///     0x70 DisplayID        → displayid::decode
///     0xF0 Block Map        → block_map::decode
///     0xFF Vendor-specific  → vendor::decode_vendor
///     assigned, undecoded   → vendor::decode_unsupported
///     anything else         → vendor::decode_unknown
/// ```
///
/// A handler that runs off the block reports a structural violation here;
/// the next block is decoded regardless.
pub fn decode_extension(
    block: &Block<'_>,
    blob: &EdidBlob<'_>,
    state: &mut DecodeState,
    config: &DecoderConfig,
) {
    let tag = ExtensionTag::from_wire_id(block.tag());
    debug!(index = block.index(), tag = block.tag(), name = tag.name(), "dispatching block");
    state.enter_block(block.index(), tag.name());
    state.set_block_tag(block.tag());

    let outcome: Result<(), WireError> = match tag {
        ExtensionTag::VideoTimingBlock => vtb_ext::decode(block, state, config).map(|_| ()),
        ExtensionTag::Cta861 => cta::decode(block, state),
        ExtensionTag::DisplayId => displayid::decode(block, state),
        ExtensionTag::BlockMap => block_map::decode(block, blob, state),
        ExtensionTag::Dummy => {
            vendor::decode_dummy(block, state);
            Ok(())
        }
        ExtensionTag::VendorSpecific => {
            vendor::decode_vendor(block, state);
            Ok(())
        }
        ExtensionTag::Unsupported(_) => {
            vendor::decode_unsupported(block, tag, state);
            Ok(())
        }
        ExtensionTag::Unknown(_) => {
            vendor::decode_unknown(block, state);
            Ok(())
        }
    };
    if let Err(err) = outcome {
        state.violation(format!("Block ends inside a record: {err}"));
    }
    report_checksum(block, state, config);
}

/// Print the block checksum and fail it when it does not sum to zero.
pub fn report_checksum(block: &Block<'_>, state: &mut DecodeState, config: &DecoderConfig) {
    let ok = block.checksum_ok();
    state.set_checksum_ok(ok);
    state.report(format!("Checksum: 0x{:02x}", block.checksum()));
    if !ok && config.verify_checksums {
        state.fail(format!(
            "Invalid checksum 0x{:02x} (should be 0x{:02x})",
            block.checksum(),
            block.expected_checksum()
        ));
    }
}

/// Compare the extension count declared in the base block with the number
/// of blocks that follow it.
pub fn check_extension_count(blob: &EdidBlob<'_>, state: &mut DecodeState) {
    let declared = usize::from(state.declared_extensions);
    let present = blob.block_count() - 1;
    if declared != present {
        state.fail(format!(
            "Base block declares {declared} extension blocks, but {present} follow"
        ));
    }
}

#[cfg(test)]
mod tests {
    use edid_wire::block::{BLOCK_SIZE, compute_checksum};

    use super::*;

    fn sealed(mut raw: [u8; BLOCK_SIZE]) -> [u8; BLOCK_SIZE] {
        raw[127] = compute_checksum(&raw[..127]);
        raw
    }

    #[test]
    fn bad_checksum_fails_unless_disabled() {
        let mut raw = sealed([0u8; BLOCK_SIZE]);
        raw[127] ^= 0xFF;
        let block = Block::new(1, &raw);

        let mut state = DecodeState::new();
        report_checksum(&block, &mut state, &DecoderConfig::default());
        assert_eq!(state.failure_count(), 1);

        let lenient = DecoderConfig {
            verify_checksums: false,
            ..DecoderConfig::default()
        };
        let mut state = DecodeState::new();
        report_checksum(&block, &mut state, &lenient);
        assert_eq!(state.failure_count(), 0);
    }

    #[test]
    fn unknown_tag_is_a_warning_and_decoding_goes_on() {
        let mut bytes = vec![0u8; BLOCK_SIZE * 2];
        let mut unknown = [0u8; BLOCK_SIZE];
        unknown[0] = 0x42;
        bytes[BLOCK_SIZE..].copy_from_slice(&sealed(unknown));
        let blob = EdidBlob::new(&bytes).unwrap();
        let block = blob.block(1).unwrap();

        let mut state = DecodeState::new();
        decode_extension(&block, &blob, &mut state, &DecoderConfig::default());
        assert_eq!(state.failure_count(), 0);
        assert_eq!(state.warning_count(), 1);
        let report = state.finish();
        assert_eq!(report.blocks[0].name, "Unknown Extension Block");
        assert_eq!(report.blocks[0].tag, Some(0x42));
        assert_eq!(report.blocks[0].checksum_ok, Some(true));
    }
}
