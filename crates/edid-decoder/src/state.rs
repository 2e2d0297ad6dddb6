use std::collections::HashSet;

use serde::Serialize;
use tracing::trace;

use crate::report::{BlockSummary, DecodeReport};

/// How a report line is rendered and counted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Severity {
    /// Structural output: a field, a heading, an itemized record.
    Info,
    Warning,
    Failure,
}

/// Category of a diagnostic.
///
/// ```text
/// ┌─────────────────────┬──────────┬──────────────────────────────────────┐
/// │ Kind                │ Severity │ Raised when                          │
/// ├─────────────────────┼──────────┼──────────────────────────────────────┤
/// │ StructuralViolation │ Failure  │ counts/lengths run past a boundary   │
/// │ SpecNonConformance  │ Fail/Warn│ a present value breaks the standard  │
/// │ UnknownConstruct    │ Warning  │ unrecognized tag, unit skipped       │
/// │ Advisory            │ Warning  │ data looks like a known encoder slip │
/// └─────────────────────┴──────────┴──────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    StructuralViolation,
    SpecNonConformance,
    UnknownConstruct,
    Advisory,
}

/// One failure or warning, attributed to the block it was raised in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub block_index: usize,
    pub block_name: String,
    pub message: String,
}

/// One line of the ordered report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportLine {
    pub block: usize,
    pub depth: usize,
    pub severity: Severity,
    pub text: String,
}

/// Per-run decode context, threaded through every handler as
/// `&mut DecodeState`.
///
/// Lines and diagnostics are appended in the order they are raised, so a
/// failure appears right after the field that caused it. A message raised
/// twice in the same block is kept once.
///
/// ```text
///   EdidDecoder ──▶ DecodeState::new()
///        │              │ enter_block(0, "Base EDID")
///        │              │ report / fail / warn / nested(..)
///        │              │ enter_block(1, ...)
///        │              │ ...
///        └──────────▶ finish() ──▶ DecodeReport
/// ```
#[derive(Debug, Default)]
pub struct DecodeState {
    lines: Vec<ReportLine>,
    diagnostics: Vec<Diagnostic>,
    blocks: Vec<BlockSummary>,
    seen: HashSet<(Severity, String)>,
    block_index: usize,
    block_name: String,
    depth: usize,

    /// EDID version from the base block (byte 18).
    pub version: u8,
    /// EDID revision from the base block (byte 19). Selects the meaning
    /// of standard timing aspect bits in every later block.
    pub revision: u8,
    /// Extension count declared in base block byte 126.
    pub declared_extensions: u8,
}

impl DecodeState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            revision: 4,
            version: 1,
            ..Self::default()
        }
    }

    /// True once the base block signaled EDID 1.4 or later.
    #[must_use]
    pub fn is_edid_1_4(&self) -> bool {
        self.version == 1 && self.revision >= 4
    }

    /// Start attributing output to block `index` and print its heading.
    /// Content reported afterwards is indented one level under it.
    pub fn enter_block(&mut self, index: usize, name: &str) {
        self.block_index = index;
        self.block_name = name.to_owned();
        self.seen.clear();
        self.depth = 0;
        self.push_line(Severity::Info, format!("Block {index}, {name}:"));
        self.depth = 1;
        self.blocks.push(BlockSummary {
            index,
            name: name.to_owned(),
            tag: None,
            checksum_ok: None,
        });
    }

    /// Record the tag byte of the current block.
    pub fn set_block_tag(&mut self, tag: u8) {
        if let Some(summary) = self.blocks.last_mut() {
            summary.tag = Some(tag);
        }
    }

    /// Record whether the current block's checksum matched.
    pub fn set_checksum_ok(&mut self, ok: bool) {
        if let Some(summary) = self.blocks.last_mut() {
            summary.checksum_ok = Some(ok);
        }
    }

    #[must_use]
    pub fn block_index(&self) -> usize {
        self.block_index
    }

    /// Print a structural line at the current depth.
    pub fn report(&mut self, text: impl Into<String>) {
        self.push_line(Severity::Info, text.into());
    }

    /// A value breaks the written standard.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.diagnose(DiagnosticKind::SpecNonConformance, Severity::Failure, message.into());
    }

    /// Declared counts or lengths run past a boundary.
    pub fn violation(&mut self, message: impl Into<String>) {
        self.diagnose(DiagnosticKind::StructuralViolation, Severity::Failure, message.into());
    }

    /// A value is allowed but discouraged.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.diagnose(DiagnosticKind::SpecNonConformance, Severity::Warning, message.into());
    }

    /// An unrecognized construct was skipped.
    pub fn unknown(&mut self, message: impl Into<String>) {
        self.diagnose(DiagnosticKind::UnknownConstruct, Severity::Warning, message.into());
    }

    /// The data is valid but resembles a known encoder mistake.
    pub fn advise(&mut self, message: impl Into<String>) {
        self.diagnose(DiagnosticKind::Advisory, Severity::Warning, message.into());
    }

    /// Run `f` one indentation level deeper.
    pub fn nested<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.count(Severity::Failure)
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Consume the state into the final report.
    #[must_use]
    pub fn finish(self) -> DecodeReport {
        DecodeReport::new(self.lines, self.diagnostics, self.blocks)
    }

    fn diagnose(&mut self, kind: DiagnosticKind, severity: Severity, message: String) {
        if !self.seen.insert((severity, message.clone())) {
            trace!(block = self.block_index, %message, "suppressed repeated diagnostic");
            return;
        }
        trace!(block = self.block_index, ?kind, %message, "diagnostic");
        self.push_line(severity, message.clone());
        self.diagnostics.push(Diagnostic {
            kind,
            severity,
            block_index: self.block_index,
            block_name: self.block_name.clone(),
            message,
        });
    }

    fn push_line(&mut self, severity: Severity, text: String) {
        self.lines.push(ReportLine {
            block: self.block_index,
            depth: self.depth,
            severity,
            text,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_interleave_with_output() {
        let mut state = DecodeState::new();
        state.enter_block(1, "Video Timing Extension Block");
        state.report("Version: 2");
        state.fail("Invalid version 2");
        state.nested(|s| s.report("nested"));
        let report = state.finish();
        let texts: Vec<_> = report.lines.iter().map(|l| (l.depth, l.text.as_str())).collect();
        assert_eq!(
            texts,
            vec![
                (0, "Block 1, Video Timing Extension Block:"),
                (1, "Version: 2"),
                (1, "Invalid version 2"),
                (2, "nested"),
            ]
        );
        assert_eq!(report.failure_count(), 1);
        assert_eq!(report.diagnostics[0].block_index, 1);
    }

    #[test]
    fn repeated_message_in_block_is_recorded_once() {
        let mut state = DecodeState::new();
        state.enter_block(2, "CTA-861 Extension Block");
        state.fail("Padding contains non-zero bytes");
        state.fail("Padding contains non-zero bytes");
        assert_eq!(state.failure_count(), 1);
        state.enter_block(3, "CTA-861 Extension Block");
        state.fail("Padding contains non-zero bytes");
        assert_eq!(state.failure_count(), 2);
    }

    #[test]
    fn same_text_at_another_severity_is_kept() {
        let mut state = DecodeState::new();
        state.enter_block(1, "Video Timing Extension Block");
        state.warn("Odd refresh");
        state.fail("Odd refresh");
        state.warn("Odd refresh");
        assert_eq!(state.warning_count(), 1);
        assert_eq!(state.failure_count(), 1);
    }

    #[test]
    fn kinds_and_severities() {
        let mut state = DecodeState::new();
        state.enter_block(1, "X");
        state.violation("a");
        state.warn("b");
        state.unknown("c");
        state.advise("d");
        let report = state.finish();
        let kinds: Vec<_> = report
            .diagnostics
            .iter()
            .map(|d| (d.kind, d.severity))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (DiagnosticKind::StructuralViolation, Severity::Failure),
                (DiagnosticKind::SpecNonConformance, Severity::Warning),
                (DiagnosticKind::UnknownConstruct, Severity::Warning),
                (DiagnosticKind::Advisory, Severity::Warning),
            ]
        );
        assert_eq!(report.warning_count(), 3);
    }
}
