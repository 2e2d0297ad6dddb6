use edid_wire::WireError;

/// Errors that abort a decode run.
///
/// Everything wrong *inside* a well-shaped blob is a diagnostic in the
/// [`DecodeReport`](crate::report::DecodeReport), never an error. The only
/// way `decode` fails is an input that cannot be cut into blocks at all.
///
/// Error hierarchy:
///
/// ```text
///   DecodeError
///   ├── InputSize(WireError)  ← empty, not a multiple of 128, too many blocks
///   └── Json(serde_json)      ← report serialization for --json output
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The input is not a non-empty sequence of whole 128-byte blocks, or
    /// holds more blocks than the configured limit.
    #[error("invalid EDID input: {0}")]
    InputSize(#[from] WireError),

    /// The report could not be serialized.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
