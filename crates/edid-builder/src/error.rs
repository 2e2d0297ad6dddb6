/// Errors that can occur while synthesizing an EDID blob.
///
/// The builder refuses to produce bytes that cannot be expressed in the
/// fixed layouts. Deliberately malformed fixtures are built by overriding
/// individual bytes after the structure has been laid out, never by
/// letting a record spill over its block.
///
/// ```text
///   BuildError
///   ├── BlockOverflow          ← a record would cross into the checksum byte
///   ├── TooManyExtensions      ← more than 255 extension blocks
///   ├── UnencodableResolution  ← standard timing width not in (x+31)*8 form
///   ├── UnencodableRefresh     ← standard timing refresh outside 60..=123 Hz
///   └── DataBlockTooLong       ← CTA / DisplayID payload above its length field
/// ```
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("write of {len} bytes at offset {offset} overflows the 127-byte block body")]
    BlockOverflow { offset: usize, len: usize },

    #[error("{count} extension blocks requested, the extension count byte holds at most 255")]
    TooManyExtensions { count: usize },

    #[error("horizontal resolution {h_active} cannot be expressed as a standard timing")]
    UnencodableResolution { h_active: u16 },

    #[error("refresh rate {hz} Hz cannot be expressed as a standard timing")]
    UnencodableRefresh { hz: u8 },

    #[error("data block payload of {len} bytes exceeds the {limit}-byte length field")]
    DataBlockTooLong { len: usize, limit: usize },
}
