/// Implementation of `edid inspect`.
///
/// Without `--block`, prints one summary line per block. With
/// `--block N`, prints that block's decoded text and its diagnostics.
/// `--show-hex` adds a hex dump of every block shown.
///
/// # Output format
///
/// ```text
/// EDID: 2 blocks, 256 bytes
/// Block 0: Base EDID (tag 0x00, checksum ok)
/// Block 1: Video Timing Extension Block (tag 0x10, checksum ok)
/// ```
use std::fmt::Write as _;

use anyhow::{Context, Result, bail};
use edid_decoder::{BlockSummary, EdidDecoder};
use edid_wire::block::BLOCK_SIZE;

use crate::{ExitPolicy, InspectArgs, input};

const HEX_LINE: usize = 16;

/// Run the `edid inspect` command and return the exit code.
///
/// # Errors
///
/// Returns an error if the input cannot be read or decoded, or `--block`
/// names a block the input does not have.
pub fn run(args: &InspectArgs) -> Result<i32> {
    let bytes = input::read(&args.file)?;
    let report = EdidDecoder::decode(&bytes)
        .with_context(|| format!("failed to decode {}", args.file.display()))?;

    println!(
        "EDID: {} block{}, {} bytes",
        report.blocks.len(),
        if report.blocks.len() == 1 { "" } else { "s" },
        bytes.len()
    );

    if let Some(index) = args.block {
        let Some(block) = report.blocks.get(index) else {
            bail!("block {index} does not exist (input has {})", report.blocks.len());
        };
        println!("{}", summary_line(block));
        print!("{}", report.render_block(index));
        for diag in report.diagnostics_for(index) {
            println!("  [{:?}] {}", diag.kind, diag.message);
        }
        if args.show_hex {
            print!("{}", hex_dump(&bytes[index * BLOCK_SIZE..(index + 1) * BLOCK_SIZE]));
        }
        return Ok(ExitPolicy::default().exit_code(&report));
    }

    for block in &report.blocks {
        println!("{}", summary_line(block));
        if args.show_hex {
            let start = block.index * BLOCK_SIZE;
            print!("{}", hex_dump(&bytes[start..start + BLOCK_SIZE]));
        }
    }
    Ok(ExitPolicy::default().exit_code(&report))
}

fn summary_line(block: &BlockSummary) -> String {
    let tag = block
        .tag
        .map_or_else(|| "no tag".to_owned(), |t| format!("tag 0x{t:02x}"));
    let checksum = match block.checksum_ok {
        Some(true) => "checksum ok",
        Some(false) => "checksum BAD",
        None => "checksum not reached",
    };
    format!("Block {}: {} ({tag}, {checksum})", block.index, block.name)
}

/// Offset, hex and ASCII columns, 16 bytes per line.
fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::new();
    for (i, chunk) in bytes.chunks(HEX_LINE).enumerate() {
        let hex = hex::encode(chunk);
        let spaced: Vec<&str> = (0..chunk.len()).map(|j| &hex[j * 2..j * 2 + 2]).collect();
        let ascii: String = chunk
            .iter()
            .map(|&b| if b.is_ascii_graphic() { char::from(b) } else { '.' })
            .collect();
        let _ = writeln!(out, "    {:04x}  {:<47}  {ascii}", i * HEX_LINE, spaced.join(" "));
    }
    out
}
