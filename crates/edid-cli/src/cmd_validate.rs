/// Implementation of `edid validate`.
///
/// Decodes the blob and prints one line per block instead of the full
/// report, then lists each diagnostic under the block that raised it.
///
/// ```text
/// ✓ Block 0: Base EDID
/// ✗ Block 1: Video Timing Extension Block (1 failure, 0 warnings)
///     Fail: Invalid version 2
/// ---
/// EDID conformity: FAIL (1 failure, 0 warnings)
/// ```
///
/// A block with only warnings is marked `!`.
use std::fmt::Write as _;

use anyhow::{Context, Result};
use edid_decoder::{DecodeReport, EdidDecoder, Severity};

use crate::{ExitPolicy, ValidateArgs, input};

/// Run the `edid validate` command and return the exit code.
///
/// # Errors
///
/// Returns an error if the input cannot be read or is not a whole number
/// of 128-byte blocks.
pub fn run(args: &ValidateArgs) -> Result<i32> {
    let bytes = input::read(&args.file)?;
    let report = EdidDecoder::decode(&bytes)
        .with_context(|| format!("failed to decode {}", args.file.display()))?;
    print!("{}", summarize(&report));
    Ok(ExitPolicy { strict: args.strict }.exit_code(&report))
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn summarize(report: &DecodeReport) -> String {
    let mut out = String::new();
    for block in &report.blocks {
        let (failures, warnings) =
            report
                .diagnostics_for(block.index)
                .fold((0, 0), |(f, w), d| match d.severity {
                    Severity::Failure => (f + 1, w),
                    Severity::Warning => (f, w + 1),
                    Severity::Info => (f, w),
                });
        let mark = match (failures, warnings) {
            (0, 0) => "✓",
            (0, _) => "!",
            _ => "✗",
        };
        if failures + warnings == 0 {
            let _ = writeln!(out, "{mark} Block {}: {}", block.index, block.name);
            continue;
        }
        let _ = writeln!(
            out,
            "{mark} Block {}: {} ({}, {})",
            block.index,
            block.name,
            plural(failures, "failure"),
            plural(warnings, "warning")
        );
        for diag in report.diagnostics_for(block.index) {
            let prefix = if diag.severity == Severity::Failure { "Fail" } else { "Warning" };
            let _ = writeln!(out, "    {prefix}: {}", diag.message);
        }
    }
    let verdict = if report.conforms() { "PASS" } else { "FAIL" };
    let _ = writeln!(
        out,
        "---\nEDID conformity: {verdict} ({}, {})",
        plural(report.failure_count(), "failure"),
        plural(report.warning_count(), "warning")
    );
    out
}
