//! Report helpers shared by every block that carries timings.
//!
//! The base block, VTB-EXT and CTA-861 all embed the same three record
//! encodings. Each helper prints one record and raises the diagnostics
//! for values inside it; callers own iteration and counts.

use edid_types::cvt::Cvt3;
use edid_types::detailed_timing::{DetailedTiming, StereoMode, SyncKind, DTD_SIZE};
use edid_types::established::{self, EstablishedTiming};
use edid_types::standard_timing::{StandardSlot, StandardTiming};

use crate::state::DecodeState;

/// How a helper treats a record that carries no timing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmptyRecords {
    /// Print a line for it: the record was counted explicitly.
    Itemize,
    /// Stay silent: the record is filler in a fixed-size table.
    Skip,
}

// ── Detailed timings ──────────────────────────────────────────────────

/// Report one 18-byte DTD slot as `DTD n`.
///
/// A slot whose pixel clock is zero is not a timing. All-zero slots are
/// reported as empty; any other zero-clock slot fails.
pub fn report_dtd(state: &mut DecodeState, n: usize, raw: &[u8; DTD_SIZE]) -> Option<DetailedTiming> {
    let Some(timing) = DetailedTiming::parse(raw) else {
        if raw.iter().all(|&b| b == 0) {
            state.report(format!("DTD {n}: Empty"));
        } else {
            state.report(format!("DTD {n}: no timing"));
            state.fail(format!("DTD {n} has a zero pixel clock but non-zero fields"));
        }
        return None;
    };
    state.report(dtd_line(n, &timing));
    state.nested(|s| {
        for line in dtd_detail_lines(&timing) {
            s.report(line);
        }
        for issue in timing.issues() {
            s.fail(format!("DTD {n}: {issue}"));
        }
    });
    Some(timing)
}

fn dtd_line(n: usize, t: &DetailedTiming) -> String {
    let (ar_w, ar_h) = t.aspect();
    let scan = if t.interlaced { "i" } else { "" };
    format!(
        "DTD {n}: {}x{}{scan} {:.3} Hz {ar_w}:{ar_h} {:.3} kHz {:.3} MHz ({} mm x {} mm)",
        t.h_active,
        t.v_active,
        t.refresh_hz(),
        t.h_freq_khz(),
        f64::from(t.pixel_clock_khz) / 1000.0,
        t.width_mm,
        t.height_mm,
    )
}

fn dtd_detail_lines(t: &DetailedTiming) -> Vec<String> {
    let h_back = t.h_blank.saturating_sub(t.h_front + t.h_sync);
    let v_back = t.v_blank.saturating_sub(t.v_front + t.v_sync);
    let (h_pol, v_pol) = match t.sync {
        SyncKind::DigitalSeparate {
            v_positive,
            h_positive,
        } => (Some(h_positive), Some(v_positive)),
        SyncKind::DigitalComposite { h_positive, .. } => (Some(h_positive), None),
        SyncKind::Analog { .. } => (None, None),
    };
    let pol = |p: Option<bool>| match p {
        Some(true) => " Hpol P",
        Some(false) => " Hpol N",
        None => "",
    };
    let mut lines = vec![
        format!(
            "Hfront {:4} Hsync {:3} Hback {:4}{}",
            t.h_front,
            t.h_sync,
            h_back,
            pol(h_pol)
        ),
        format!(
            "Vfront {:4} Vsync {:3} Vback {:4}{}",
            t.v_front,
            t.v_sync,
            v_back,
            pol(v_pol).replace('H', "V")
        ),
    ];
    if t.h_border != 0 || t.v_border != 0 {
        lines.push(format!("Hborder {} Vborder {}", t.h_border, t.v_border));
    }
    match t.sync {
        SyncKind::Analog {
            bipolar, serrations, on_rgb,
        } => lines.push(format!(
            "Analog {}composite sync{}{}",
            if bipolar { "bipolar " } else { "" },
            if serrations { ", serrations" } else { "" },
            if on_rgb { ", sync on all RGB lines" } else { "" },
        )),
        SyncKind::DigitalComposite { serrations: true, .. } => {
            lines.push("Digital composite sync, serrations".to_owned());
        }
        _ => {}
    }
    if let Some(stereo) = stereo_label(t.stereo) {
        lines.push(format!("Stereo: {stereo}"));
    }
    lines
}

fn stereo_label(mode: StereoMode) -> Option<&'static str> {
    Some(match mode {
        StereoMode::None => return None,
        StereoMode::FieldSequentialRight => "field sequential, right during stereo sync",
        StereoMode::FieldSequentialLeft => "field sequential, left during stereo sync",
        StereoMode::InterleavedRightEven => "2-way interleaved, right image on even lines",
        StereoMode::InterleavedLeftEven => "2-way interleaved, left image on even lines",
        StereoMode::FourWay => "4-way interleaved",
        StereoMode::SideBySide => "side-by-side interleaved",
    })
}

// ── CVT codes ─────────────────────────────────────────────────────────

/// Report one CVT 3-byte code. `n` numbers the code within its list so
/// issues from different codes stay distinct.
pub fn report_cvt(
    state: &mut DecodeState,
    n: usize,
    raw: &[u8; 3],
    empty: EmptyRecords,
) -> Option<Cvt3> {
    let Some(cvt) = Cvt3::parse(raw) else {
        if empty == EmptyRecords::Itemize {
            state.report("CVT: Empty");
        }
        return None;
    };
    state.report(format!("CVT: {cvt}"));
    for issue in cvt.issues() {
        state.fail(format!("CVT {n}: {issue}"));
    }
    Some(cvt)
}

// ── Standard timings ──────────────────────────────────────────────────

/// Report one standard timing pair, decoded against the EDID revision
/// recorded in `state`.
pub fn report_standard(
    state: &mut DecodeState,
    x0: u8,
    x1: u8,
    empty: EmptyRecords,
) -> Option<StandardTiming> {
    match StandardSlot::parse(x0, x1, state.revision) {
        StandardSlot::Timing(timing) => {
            state.report(timing.to_string());
            Some(timing)
        }
        StandardSlot::Unused => {
            if empty == EmptyRecords::Itemize {
                state.report("Unused");
            }
            None
        }
        StandardSlot::Zero => {
            if empty == EmptyRecords::Itemize {
                state.report("Unused");
            }
            state.warn("Use 0x0101 as the invalid Standard Timings code, not 0x0000");
            None
        }
        StandardSlot::Invalid { x0, x1 } => {
            state.report(format!("Invalid: 0x{x0:02x} 0x{x1:02x}"));
            state.fail(format!(
                "Invalid Standard Timing 0x{x0:02x} 0x{x1:02x}: horizontal field is zero"
            ));
            None
        }
    }
}

// ── Established timings ───────────────────────────────────────────────

/// Report every mode selected by `bits` in `table`. Returns how many
/// were listed.
pub fn report_established(
    state: &mut DecodeState,
    bits: &[u8],
    table: &[EstablishedTiming],
) -> usize {
    let mut listed = 0;
    for timing in established::decode_bits(bits, table) {
        state.report(timing.to_string());
        listed += 1;
    }
    listed
}

#[cfg(test)]
mod tests {
    use super::*;

    const DTD_1080P: [u8; 18] = [
        0x02, 0x3A, 0x80, 0x18, 0x71, 0x38, 0x2D, 0x40, 0x58, 0x2C, 0x45, 0x00, 0x58, 0x54,
        0x21, 0x00, 0x00, 0x1E,
    ];

    fn lines(state: DecodeState) -> Vec<String> {
        state
            .finish()
            .lines
            .into_iter()
            .map(|l| l.text)
            .collect()
    }

    #[test]
    fn dtd_line_and_porches() {
        let mut state = DecodeState::new();
        assert!(report_dtd(&mut state, 1, &DTD_1080P).is_some());
        assert_eq!(
            lines(state),
            vec![
                "DTD 1: 1920x1080 60.000 Hz 16:9 67.500 kHz 148.500 MHz (600 mm x 340 mm)",
                "Hfront   88 Hsync  44 Hback  148 Hpol P",
                "Vfront    4 Vsync   5 Vback   36 Vpol P",
            ]
        );
    }

    #[test]
    fn zero_clock_dtd() {
        let mut state = DecodeState::new();
        assert!(report_dtd(&mut state, 2, &[0; 18]).is_none());
        assert_eq!(state.failure_count(), 0);

        let mut garbage = [0u8; 18];
        garbage[5] = 0x38;
        assert!(report_dtd(&mut state, 3, &garbage).is_none());
        assert_eq!(state.failure_count(), 1);
        assert_eq!(lines(state), vec!["DTD 2: Empty", "DTD 3: no timing", "DTD 3 has a zero pixel clock but non-zero fields"]);
    }

    #[test]
    fn impossible_sync_fails() {
        let mut raw = DTD_1080P;
        raw[8] = 0xFF; // Hfront 255 + Hsync 44 > blank 280
        let mut state = DecodeState::new();
        report_dtd(&mut state, 1, &raw);
        assert_eq!(state.failure_count(), 1);
    }

    #[test]
    fn standard_slot_variants() {
        let mut state = DecodeState::new();
        let timing = report_standard(&mut state, 0xD1, 0xC0, EmptyRecords::Skip).unwrap();
        assert_eq!(timing.refresh_hz, 60);
        assert!(report_standard(&mut state, 0x01, 0x01, EmptyRecords::Skip).is_none());
        assert!(report_standard(&mut state, 0x00, 0x00, EmptyRecords::Skip).is_none());
        assert_eq!(state.warning_count(), 1);
        assert!(report_standard(&mut state, 0x00, 0x40, EmptyRecords::Itemize).is_none());
        assert_eq!(state.failure_count(), 1);
        assert_eq!(
            lines(state),
            vec![
                "1920x1080 60 Hz 16:9",
                "Use 0x0101 as the invalid Standard Timings code, not 0x0000",
                "Invalid: 0x00 0x40",
                "Invalid Standard Timing 0x00 0x40: horizontal field is zero",
            ]
        );
    }

    #[test]
    fn cvt_issues_fail() {
        let mut state = DecodeState::new();
        report_cvt(&mut state, 1, &[0x1B, 0x24, 0x29], EmptyRecords::Skip);
        assert_eq!(state.failure_count(), 0);
        report_cvt(&mut state, 2, &[0x1B, 0x24, 0x20], EmptyRecords::Skip);
        assert_eq!(state.failure_count(), 1);
        assert!(report_cvt(&mut state, 3, &[0, 0, 0], EmptyRecords::Itemize).is_none());
        let text = lines(state);
        assert_eq!(text[0], "CVT: 1920x1080 16:9: 60 Hz, 60 Hz RB (preferred 60 Hz)");
        assert_eq!(text.last().map(String::as_str), Some("CVT: Empty"));
    }

    #[test]
    fn identical_cvt_issues_from_separate_codes_both_fail() {
        let mut state = DecodeState::new();
        state.enter_block(1, "Video Timing Extension Block");
        report_cvt(&mut state, 1, &[0x1B, 0x24, 0x20], EmptyRecords::Itemize);
        report_cvt(&mut state, 2, &[0x1B, 0x24, 0x20], EmptyRecords::Itemize);
        let report = state.finish();
        let messages: Vec<_> = report.diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].starts_with("CVT 1: "));
        assert!(messages[1].starts_with("CVT 2: "));
    }
}
