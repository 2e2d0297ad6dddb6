use edid_wire::WireError;
use edid_wire::block::EdidBlob;
use tracing::debug;

use crate::base_block::{self, BASE_BLOCK_NAME};
use crate::config::DecoderConfig;
use crate::dispatch;
use crate::error::DecodeError;
use crate::report::DecodeReport;
use crate::state::DecodeState;

/// Whole-blob EDID decoder.
///
/// Decoding walks the blob once, front to back:
///
///   1. **Shape**: cut the input into 128-byte blocks. Empty or
///      misaligned input, or more than `max_blocks` blocks, is the only
///      hard error.
///   2. **Base block**: decode block 0 and record the EDID version,
///      revision and declared extension count in the shared
///      [`DecodeState`]. Later blocks read standard timings with the
///      revision learned here.
///   3. **Extensions**: hand every following block to the dispatcher,
///      which picks a handler by tag and checks the block checksum.
///   4. **Report**: fold the lines and diagnostics into a
///      [`DecodeReport`].
///
/// A damaged block never stops the walk: each problem becomes a
/// diagnostic and the next block is decoded as usual.
///
/// # Example
///
/// ```rust
/// use edid_builder::{EdidBuilder, VtbExtBuilder};
/// use edid_decoder::EdidDecoder;
///
/// let edid = EdidBuilder::new()
///     .add_vtb_ext(VtbExtBuilder::new().standard_timing([0x81, 0x00]))
///     .build()
///     .unwrap();
///
/// let report = EdidDecoder::decode(&edid).unwrap();
/// assert!(report.conforms());
/// assert_eq!(report.blocks.len(), 2);
/// ```
pub struct EdidDecoder;

impl EdidDecoder {
    /// Decode a blob with the default [`DecoderConfig`].
    ///
    /// # Errors
    ///
    /// [`DecodeError::InputSize`] if the input is empty, not a multiple of
    /// 128 bytes, or holds more than 256 blocks.
    pub fn decode(bytes: &[u8]) -> Result<DecodeReport, DecodeError> {
        Self::decode_with_config(bytes, &DecoderConfig::default())
    }

    /// Decode a blob with explicit settings.
    ///
    /// # Errors
    ///
    /// [`DecodeError::InputSize`] if the input is empty, not a multiple of
    /// 128 bytes, or holds more than `config.max_blocks` blocks.
    pub fn decode_with_config(
        bytes: &[u8],
        config: &DecoderConfig,
    ) -> Result<DecodeReport, DecodeError> {
        let blob = EdidBlob::new(bytes)?;
        if blob.block_count() > config.max_blocks {
            return Err(WireError::TooManyBlocks {
                count: blob.block_count(),
                limit: config.max_blocks,
            }
            .into());
        }
        debug!(blocks = blob.block_count(), "decoding EDID");

        let mut state = DecodeState::new();
        let base = blob.base();
        state.enter_block(0, BASE_BLOCK_NAME);
        state.set_block_tag(base.tag());
        base_block::decode(&base, &mut state);
        dispatch::check_extension_count(&blob, &mut state);
        dispatch::report_checksum(&base, &mut state, config);

        for block in blob.blocks().skip(1) {
            dispatch::decode_extension(&block, &blob, &mut state, config);
        }

        let report = state.finish();
        debug!(
            failures = report.failure_count(),
            warnings = report.warning_count(),
            "decode finished"
        );
        Ok(report)
    }
}
