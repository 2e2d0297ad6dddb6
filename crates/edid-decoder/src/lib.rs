#![warn(clippy::pedantic)]

pub mod error;
pub mod config;
pub mod state;
pub mod report;
pub mod decoder;
pub mod dispatch;
pub mod timings;
pub mod base_block;
pub mod vtb_ext;
pub mod cta;
pub mod displayid;
pub mod block_map;
pub mod vendor;

pub use config::DecoderConfig;
pub use decoder::EdidDecoder;
pub use error::DecodeError;
pub use report::{BlockSummary, DecodeReport};
pub use state::{DecodeState, Diagnostic, DiagnosticKind, ReportLine, Severity};
pub use vtb_ext::VtbSummary;
