//! Video Timing Block extension (tag 0x10).
//!
//! ```text
//! ┌────────┬──────────────────────────────────────────────────────────┐
//! │ Offset │ Content                                                  │
//! ├────────┼──────────────────────────────────────────────────────────┤
//! │ 0      │ Tag 0x10                                                 │
//! │ 1      │ Version, must be 1                                       │
//! │ 2      │ d = number of 18-byte detailed timings                   │
//! │ 3      │ c = number of 3-byte CVT codes                           │
//! │ 4      │ s = number of 2-byte standard timings                    │
//! │ 5 ..   │ d DTDs, then c CVT codes, then s standard timings        │
//! │ 127    │ Checksum                                                 │
//! └────────┴──────────────────────────────────────────────────────────┘
//! ```
//!
//! The records are packed back to back with no tags, so the counts are
//! the only thing that locates them. When `5 + 18d + 3c + 2s` exceeds the
//! block the counts are reported once as a structural violation and
//! iteration stops at the last record that fits.

use edid_types::cvt::CVT_SIZE;
use edid_types::detailed_timing::DTD_SIZE;
use edid_types::standard_timing::STANDARD_TIMING_SIZE;
use edid_wire::WireError;
use edid_wire::block::{BLOCK_SIZE, Block};
use serde::Serialize;
use tracing::debug;

use crate::config::DecoderConfig;
use crate::state::DecodeState;
use crate::timings::{self, EmptyRecords};

/// Offset of the first record.
pub const VTB_HEADER_SIZE: usize = 5;

/// The only version defined for the block.
pub const VTB_VERSION: u8 = 1;

/// Records consumed from one VTB-EXT block.
///
/// `consumed` is the offset just past the last record read: exactly
/// `5 + 18d + 3c + 2s` when the declared counts fit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct VtbSummary {
    pub dtds: usize,
    pub cvts: usize,
    pub standard_timings: usize,
    pub consumed: usize,
}

/// Bytes the declared counts require, header included.
#[must_use]
pub fn required_len(dtds: u8, cvts: u8, standard: u8) -> usize {
    VTB_HEADER_SIZE
        + DTD_SIZE * usize::from(dtds)
        + CVT_SIZE * usize::from(cvts)
        + STANDARD_TIMING_SIZE * usize::from(standard)
}

/// Decode one VTB-EXT block into `state`.
///
/// A version other than 1 fails but decoding continues with the version 1
/// layout.
///
/// # Errors
///
/// Only a cursor bounds error, which the record loop guards against.
pub fn decode(
    block: &Block<'_>,
    state: &mut DecodeState,
    config: &DecoderConfig,
) -> Result<VtbSummary, WireError> {
    let mut cursor = block.cursor_at(1);
    let version = cursor.read_u8()?;
    let num_dtd = cursor.read_u8()?;
    let num_cvt = cursor.read_u8()?;
    let num_st = cursor.read_u8()?;
    debug!(
        index = block.index(),
        version, num_dtd, num_cvt, num_st, "VTB-EXT header"
    );

    state.report(format!("Version: {version}"));
    if version != VTB_VERSION {
        state.fail(format!("Invalid version {version}"));
    }

    let needed = required_len(num_dtd, num_cvt, num_st);
    if needed > BLOCK_SIZE {
        state.violation(format!(
            "{num_dtd} DTDs, {num_cvt} CVT codes and {num_st} Standard Timings need \
             {needed} bytes, but the block has {BLOCK_SIZE}"
        ));
    } else if needed == BLOCK_SIZE {
        state.warn("The last record overlaps the checksum byte");
    }

    let mut summary = VtbSummary::default();

    if num_dtd > 0 {
        state.report("Detailed Timing Descriptors:");
        state.nested(|s| -> Result<(), WireError> {
            for n in 1..=usize::from(num_dtd) {
                if !cursor.has(DTD_SIZE) {
                    break;
                }
                timings::report_dtd(s, n, cursor.read_array::<DTD_SIZE>()?);
                summary.dtds += 1;
            }
            Ok(())
        })?;
    }

    if num_cvt > 0 {
        state.report("Coordinated Video Timings:");
        state.nested(|s| -> Result<(), WireError> {
            for n in 1..=usize::from(num_cvt) {
                if !cursor.has(CVT_SIZE) {
                    break;
                }
                timings::report_cvt(s, n, cursor.read_array::<CVT_SIZE>()?, EmptyRecords::Itemize);
                summary.cvts += 1;
            }
            Ok(())
        })?;
    }

    if num_st > 0 {
        state.report("Standard Timings:");
        state.nested(|s| -> Result<(), WireError> {
            for _ in 0..num_st {
                if !cursor.has(STANDARD_TIMING_SIZE) {
                    break;
                }
                let [x0, x1] = *cursor.read_array::<STANDARD_TIMING_SIZE>()?;
                let timing = timings::report_standard(s, x0, x1, EmptyRecords::Itemize);
                summary.standard_timings += 1;
                if let Some(t) = timing
                    && config.flag_vtb_refresh_convention
                    && t.refresh_field() == 60
                {
                    s.advise(format!(
                        "Standard Timing {}x{} stores refresh field 60 ({} Hz); \
                         a 60 Hz mode stores 0",
                        t.h_active, t.v_active, t.refresh_hz
                    ));
                }
            }
            Ok(())
        })?;
    }

    summary.consumed = cursor.position();
    Ok(summary)
}
