use std::fs;
use std::io::{self, Read as _};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

/// Read EDID bytes from `path`, or stdin when `path` is `-`.
///
/// Input that is entirely hex digits and whitespace is treated as hex
/// text (the form `xxd -p` and sysfs dumps piped through `od` produce);
/// anything else is taken as raw bytes.
///
/// # Errors
///
/// Returns an error if the source cannot be read or looks like hex text
/// with an odd number of digits.
pub fn read(path: &Path) -> Result<Vec<u8>> {
    let bytes = if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .context("cannot read stdin")?;
        buf
    } else {
        fs::read(path).with_context(|| format!("cannot read {}", path.display()))?
    };
    decode_text(bytes)
}

fn decode_text(bytes: Vec<u8>) -> Result<Vec<u8>> {
    if !is_hex_text(&bytes) {
        return Ok(bytes);
    }
    let digits: Vec<u8> = bytes.into_iter().filter(|b| !b.is_ascii_whitespace()).collect();
    debug!(digits = digits.len(), "input is hex text");
    hex::decode(&digits).context("input looks like hex text but does not decode")
}

fn is_hex_text(bytes: &[u8]) -> bool {
    bytes.iter().any(u8::is_ascii_hexdigit)
        && bytes
            .iter()
            .all(|b| b.is_ascii_hexdigit() || b.is_ascii_whitespace())
}
