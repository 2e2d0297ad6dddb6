use edid_wire::WireError;

/// Errors from interpreting field values inside a block.
///
/// The field decoders in this crate are lenient by construction (a fixed
/// window always yields *some* record), so `TypeError` is reserved for
/// lookups into closed value sets where a raw value has no meaning.
///
/// ```text
/// ┌─────────────────────────────────────────────────────┐
/// │ TypeError (this crate)                              │
/// │   ├── InvalidEnumValue for out-of-range code values │
/// │   └── wraps WireError for short windows             │
/// └─────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TypeError {
  /// A coded field contained a value outside its defined set, e.g. a
  /// digital interface code of 0x9 or a reserved audio format 0.
  #[error("invalid {enum_name} value: {value:#04X}")]
  InvalidEnumValue { enum_name: &'static str, value: u8 },

  /// A variable-length structure was shorter than its fixed part.
  #[error(transparent)]
  Wire(#[from] WireError),
}
