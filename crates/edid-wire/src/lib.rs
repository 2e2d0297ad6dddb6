#![warn(clippy::pedantic)]

pub mod block;
pub mod cursor;
pub mod error;
pub mod header;

pub use block::{BLOCK_SIZE, Block, EdidBlob};
pub use cursor::ByteCursor;
pub use error::WireError;
