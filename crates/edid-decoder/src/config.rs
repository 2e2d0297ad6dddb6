/// Configuration for a decode run.
///
/// ```text
/// ┌─────────────────────────────┬─────────┬──────────────────────────────────┐
/// │ Field                       │ Default │ Purpose                          │
/// ├─────────────────────────────┼─────────┼──────────────────────────────────┤
/// │ flag_vtb_refresh_convention │ true    │ Warn on VTB-EXT standard timings │
/// │                             │         │ whose stored refresh field is 60 │
/// │ verify_checksums            │ true    │ Fail blocks with a bad checksum  │
/// │ max_blocks                  │ 256     │ Reject larger inputs up front    │
/// └─────────────────────────────┴─────────┴──────────────────────────────────┘
/// ```
///
/// None of these settings change how bytes are interpreted. The refresh
/// flag only adds an advisory warning; the reported rate is always the
/// stored field plus 60.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Flag VTB-EXT standard timings that look like they follow the
    /// published example (field 60 meant as 60 Hz).
    pub flag_vtb_refresh_convention: bool,

    /// Report checksum mismatches as failures. When off, the checksum is
    /// still printed.
    pub verify_checksums: bool,

    /// Largest number of blocks (base included) accepted.
    pub max_blocks: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            flag_vtb_refresh_convention: true,
            verify_checksums: true,
            max_blocks: 256,
        }
    }
}
