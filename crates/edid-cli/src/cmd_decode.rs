/// Implementation of `edid decode`.
///
/// Decodes every block and prints the report: the indented per-block
/// text followed by the warning and failure summaries and the conformity
/// verdict, or the same data as JSON with `--json`.
///
/// # Output format
///
/// ```text
/// Block 0, Base EDID:
///   EDID Structure Version & Revision: 1.4
///   ...
///   Checksum: 0x..
/// Block 1, Video Timing Extension Block:
///   Version: 1
///   Standard Timings:
///     1280x800 60 Hz 16:10
///   Checksum: 0x..
///
/// EDID conformity: PASS
/// ```
use std::fs;

use anyhow::{Context, Result};
use edid_decoder::{DecoderConfig, EdidDecoder};

use crate::{DecodeArgs, ExitPolicy, input};

/// Run the `edid decode` command and return the exit code.
///
/// # Errors
///
/// Returns an error if the input cannot be read, is not a whole number of
/// 128-byte blocks, or the output file cannot be written.
pub fn run(args: &DecodeArgs) -> Result<i32> {
    let bytes = input::read(&args.file)?;
    let config = DecoderConfig {
        flag_vtb_refresh_convention: !args.no_vtb_hint,
        ..DecoderConfig::default()
    };
    let report = EdidDecoder::decode_with_config(&bytes, &config)
        .with_context(|| format!("failed to decode {}", args.file.display()))?;

    let text = if args.json {
        let mut json = report.to_json()?;
        json.push('\n');
        json
    } else {
        report.render()
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &text).with_context(|| format!("cannot write {}", path.display()))?;
        }
        None => print!("{text}"),
    }

    Ok(ExitPolicy { strict: args.strict }.exit_code(&report))
}
