use std::fmt::Write as _;

use serde::Serialize;

use crate::error::DecodeError;
use crate::state::{Diagnostic, ReportLine, Severity};

/// Identity of one decoded block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BlockSummary {
    pub index: usize,
    pub name: String,
    /// Byte 0 of the block (0x00 for the base block).
    pub tag: Option<u8>,
    /// Checksum outcome, `None` if the block never reached its checksum.
    pub checksum_ok: Option<bool>,
}

/// Result of decoding one EDID blob.
///
/// The report is data; [`render`](Self::render) turns it into the
/// indented text form:
///
/// ```text
///   Block 0, Base EDID:
///     EDID Structure Version & Revision: 1.4
///     ...
///   Block 1, Video Timing Extension Block:
///     Version: 2
///     Fail: Invalid version 2
///     ...
///
///   Failures:
///
///   Block 1, Video Timing Extension Block:
///     Invalid version 2
///
///   EDID conformity: FAIL
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DecodeReport {
    pub lines: Vec<ReportLine>,
    pub diagnostics: Vec<Diagnostic>,
    pub blocks: Vec<BlockSummary>,
}

impl DecodeReport {
    pub(crate) fn new(
        lines: Vec<ReportLine>,
        diagnostics: Vec<Diagnostic>,
        blocks: Vec<BlockSummary>,
    ) -> Self {
        Self {
            lines,
            diagnostics,
            blocks,
        }
    }

    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.count(Severity::Failure)
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// True when no failure was raised. Warnings do not affect
    /// conformity.
    #[must_use]
    pub fn conforms(&self) -> bool {
        self.failure_count() == 0
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Diagnostics raised while decoding block `index`.
    pub fn diagnostics_for(&self, index: usize) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.block_index == index)
    }

    /// Full text report: every block, then the warning and failure
    /// summaries and the conformity verdict.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            push_line(&mut out, line);
        }
        self.render_summary(&mut out, "Warnings", Severity::Warning);
        self.render_summary(&mut out, "Failures", Severity::Failure);
        let verdict = if self.conforms() { "PASS" } else { "FAIL" };
        let _ = writeln!(out, "\nEDID conformity: {verdict}");
        out
    }

    /// Text of a single block, without the summary.
    #[must_use]
    pub fn render_block(&self, index: usize) -> String {
        let mut out = String::new();
        for line in self.lines.iter().filter(|l| l.block == index) {
            push_line(&mut out, line);
        }
        out
    }

    /// Pretty-printed JSON form of the whole report.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, DecodeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn render_summary(&self, out: &mut String, title: &str, severity: Severity) {
        let mut current: Option<usize> = None;
        for diag in self.diagnostics.iter().filter(|d| d.severity == severity) {
            if current.is_none() {
                let _ = writeln!(out, "\n{title}:");
            }
            if current != Some(diag.block_index) {
                let _ = writeln!(out, "\nBlock {}, {}:", diag.block_index, diag.block_name);
                current = Some(diag.block_index);
            }
            let _ = writeln!(out, "  {}", diag.message);
        }
    }
}

fn push_line(out: &mut String, line: &ReportLine) {
    for _ in 0..line.depth {
        out.push_str("  ");
    }
    match line.severity {
        Severity::Info => {}
        Severity::Warning => out.push_str("Warning: "),
        Severity::Failure => out.push_str("Fail: "),
    }
    out.push_str(&line.text);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use crate::state::DecodeState;

    #[test]
    fn render_groups_summary_by_block() {
        let mut state = DecodeState::new();
        state.enter_block(0, "Base EDID");
        state.report("EDID Structure Version & Revision: 1.4");
        state.warn("Use 0x0101 as the invalid Standard Timings code, not 0x0000");
        state.enter_block(1, "Video Timing Extension Block");
        state.report("Version: 2");
        state.fail("Invalid version 2");
        let report = state.finish();
        assert!(!report.conforms());
        assert_eq!(
            report.render(),
            "\
Block 0, Base EDID:
  EDID Structure Version & Revision: 1.4
  Warning: Use 0x0101 as the invalid Standard Timings code, not 0x0000
Block 1, Video Timing Extension Block:
  Version: 2
  Fail: Invalid version 2

Warnings:

Block 0, Base EDID:
  Use 0x0101 as the invalid Standard Timings code, not 0x0000

Failures:

Block 1, Video Timing Extension Block:
  Invalid version 2

EDID conformity: FAIL
"
        );
    }

    #[test]
    fn clean_report_passes() {
        let mut state = DecodeState::new();
        state.enter_block(0, "Base EDID");
        state.report("Extension blocks: 0");
        let report = state.finish();
        assert!(report.conforms());
        assert_eq!(
            report.render(),
            "Block 0, Base EDID:\n  Extension blocks: 0\n\nEDID conformity: PASS\n"
        );
        assert_eq!(report.render_block(0), "Block 0, Base EDID:\n  Extension blocks: 0\n");
    }

    #[test]
    fn json_carries_diagnostic_kinds() {
        let mut state = DecodeState::new();
        state.enter_block(1, "Video Timing Extension Block");
        state.violation("Records overrun the block");
        let json = state.finish().to_json().unwrap();
        assert!(json.contains("\"StructuralViolation\""));
        assert!(json.contains("\"block_index\": 1"));
    }
}
