/// EDID command-line tool: decode, validate and inspect EDID blobs.
///
/// # Command overview
///
/// ```text
/// edid <COMMAND> [OPTIONS]
///
/// Commands:
///   decode     Print the full decode report (text or JSON)
///   validate   Print a per-block pass/fail summary
///   inspect    List blocks, or show one block's report and hex dump
///   help       Print help information
///
/// Global options:
///   -v, --verbose    Log decoder activity to stderr
///   -h, --help       Print help
///   -V, --version    Print version
/// ```
///
/// Input is a file path or `-` for stdin, either raw bytes or hex text
/// (whitespace ignored).
///
/// # Exit codes
///
/// | Code | Meaning                                  |
/// |------|------------------------------------------|
/// | 0    | No failures (warnings allowed)           |
/// | 1    | I/O error or input that is not an EDID   |
/// | 2    | Conformance failures                     |
/// | 3    | Warnings only, with `--strict`           |
///
/// The report goes to stdout; errors and logs go to stderr.
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use edid_decoder::DecodeReport;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod cmd_decode;
mod cmd_inspect;
mod cmd_validate;
mod input;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// Decode and check EDID display identification data.
#[derive(Parser)]
#[command(name = "edid", version, about = "EDID decoder and conformity checker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log decoder activity to stderr (same as `RUST_LOG=debug`).
    #[arg(short, long, global = true)]
    verbose: bool,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Print the full decode report.
    Decode(DecodeArgs),
    /// Print a per-block pass/fail summary.
    Validate(ValidateArgs),
    /// List blocks, or show one block in detail.
    Inspect(InspectArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Arguments for `edid decode`.
///
/// ```text
/// ┌───────────────┬──────────────────────────────────────────────────┐
/// │ Flag          │ Effect                                           │
/// ├───────────────┼──────────────────────────────────────────────────┤
/// │ --strict      │ Exit 3 when the EDID has warnings but no failure │
/// │ --no-vtb-hint │ Skip the VTB-EXT refresh-field advisory          │
/// │ --json        │ Print the report as JSON                         │
/// │ -o / --output │ Write to a file instead of stdout                │
/// └───────────────┴──────────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct DecodeArgs {
    /// EDID file, or `-` for stdin.
    pub file: PathBuf,

    /// Treat warnings as a non-zero exit.
    #[arg(long)]
    pub strict: bool,

    /// Do not flag VTB-EXT standard timings that store 60 in the refresh
    /// field.
    #[arg(long)]
    pub no_vtb_hint: bool,

    /// Emit the report as pretty-printed JSON.
    #[arg(long)]
    pub json: bool,

    /// Write the report to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `edid validate`.
#[derive(clap::Args)]
pub struct ValidateArgs {
    /// EDID file, or `-` for stdin.
    pub file: PathBuf,

    /// Treat warnings as a non-zero exit.
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for `edid inspect`.
#[derive(clap::Args)]
pub struct InspectArgs {
    /// EDID file, or `-` for stdin.
    pub file: PathBuf,

    /// Show only the block at this zero-based index.
    #[arg(long)]
    pub block: Option<usize>,

    /// Include a 16-byte-per-line hex dump of each block shown.
    #[arg(long)]
    pub show_hex: bool,
}

// ── Exit policy ───────────────────────────────────────────────────────────────

/// Maps a report to a process exit code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExitPolicy {
    /// Warnings alone produce exit code 3.
    pub strict: bool,
}

impl ExitPolicy {
    pub const IO_ERROR: i32 = 1;
    pub const FAILURES: i32 = 2;
    pub const STRICT_WARNINGS: i32 = 3;

    #[must_use]
    pub fn exit_code(self, report: &DecodeReport) -> i32 {
        if report.failure_count() > 0 {
            Self::FAILURES
        } else if self.strict && report.warning_count() > 0 {
            Self::STRICT_WARNINGS
        } else {
            0
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Decode(args) => cmd_decode::run(&args),
        Commands::Validate(args) => cmd_validate::run(&args),
        Commands::Inspect(args) => cmd_inspect::run(&args),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(ExitPolicy::IO_ERROR);
        }
    }
}
