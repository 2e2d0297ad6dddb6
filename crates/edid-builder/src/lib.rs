#![warn(clippy::pedantic)]

pub mod error;
pub mod block_writer;
pub mod timing;
pub mod extension;
pub mod builder;

pub use builder::EdidBuilder;
pub use error::BuildError;
pub use extension::{CtaBuilder, DisplayIdBuilder, VtbExtBuilder};
pub use timing::DtdSpec;
