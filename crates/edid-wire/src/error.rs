/// Errors raised while slicing raw EDID bytes.
///
/// These only describe the *shape* of the input: a blob that cannot be cut
/// into 128-byte blocks, or a cursor asked to read past the end of its
/// window. Semantic problems inside a well-shaped block are never wire
/// errors; the decoder reports those as diagnostics and keeps going.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WireError {
    /// Input was empty, so there is no base block to decode.
    #[error("input is empty: an EDID needs at least one 128-byte block")]
    Empty,

    /// Input length is not a whole number of 128-byte blocks.
    #[error("input length {len} is not a multiple of 128 bytes")]
    Misaligned { len: usize },

    /// Input holds more blocks than the configured limit.
    #[error("input holds {count} blocks, limit is {limit}")]
    TooManyBlocks { count: usize, limit: usize },

    /// A read would have crossed the end of the current window.
    ///
    /// `offset` is the cursor position at which the read was attempted and
    /// `wanted` the number of bytes the caller asked for.
    #[error("unexpected end of block at offset {offset} (wanted {wanted} bytes)")]
    UnexpectedEof { offset: usize, wanted: usize },
}
