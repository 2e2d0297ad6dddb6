use std::fmt;

use serde::Serialize;

use crate::enums::{CvtAspect, CvtRate};

/// Size of a CVT 3-byte timing code.
pub const CVT_SIZE: usize = 3;

/// A CVT 3-byte timing code.
///
/// ```text
///  byte 0   ┌─────────────────────────────┐
///           │ addressable lines, bits 7-0 │
///  byte 1   ├──────────────┬────────┬─────┤
///           │ lines 11-8   │ aspect │ res │
///  byte 2   ├─────┬────────┼────────┴─────┤
///           │ res │ pref   │ 50 60 75 85 RB│
///           └─────┴────────┴──────────────┘
/// ```
///
/// The 12-bit line field stores `lines / 2 - 1`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Cvt3 {
    pub lines: u16,
    pub aspect: CvtAspect,
    pub preferred: CvtRate,
    /// Supported-rate bits, `0x10` (50 Hz) through `0x01` (60 Hz RB).
    pub supported: u8,
    reserved: u8,
}

/// A CVT code that decodes but contradicts itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CvtIssue {
    ReservedBits,
    NoRateSupported,
    PreferredNotSupported(CvtRate),
}

impl fmt::Display for CvtIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReservedBits => f.write_str("CVT reserved bits are set"),
            Self::NoRateSupported => f.write_str("CVT code supports no refresh rate"),
            Self::PreferredNotSupported(rate) => {
                write!(f, "CVT preferred rate {rate} is not in the supported set")
            }
        }
    }
}

impl Cvt3 {
    /// Decode a 3-byte window. An all-zero window is unused filler and
    /// yields `None`.
    #[must_use]
    pub fn parse(b: &[u8; CVT_SIZE]) -> Option<Self> {
        if b == &[0, 0, 0] {
            return None;
        }
        let raw_lines = u16::from(b[0]) | (u16::from(b[1] >> 4) << 8);
        Some(Self {
            lines: (raw_lines + 1) * 2,
            aspect: CvtAspect::from_bits(b[1] >> 2),
            preferred: CvtRate::preferred_from_bits(b[2] >> 5),
            supported: b[2] & 0x1F,
            reserved: (b[1] & 0b11) | (b[2] & 0x80),
        })
    }

    /// Horizontal addressable pixels derived from the line count and
    /// aspect ratio.
    #[must_use]
    pub fn width(&self) -> u16 {
        self.aspect.width_for(self.lines)
    }

    /// Supported rates in mask order.
    #[must_use]
    pub fn supported_rates(&self) -> Vec<CvtRate> {
        CvtRate::ALL
            .into_iter()
            .filter(|rate| self.supported & rate.mask() != 0)
            .collect()
    }

    fn supports(&self, rate: CvtRate) -> bool {
        match rate {
            CvtRate::R60 => self.supported & (CvtRate::R60.mask() | CvtRate::R60Rb.mask()) != 0,
            other => self.supported & other.mask() != 0,
        }
    }

    #[must_use]
    pub fn issues(&self) -> Vec<CvtIssue> {
        let mut issues = Vec::new();
        if self.reserved != 0 {
            issues.push(CvtIssue::ReservedBits);
        }
        if self.supported == 0 {
            issues.push(CvtIssue::NoRateSupported);
        } else if !self.supports(self.preferred) {
            issues.push(CvtIssue::PreferredNotSupported(self.preferred));
        }
        issues
    }
}

impl fmt::Display for Cvt3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} {}:", self.width(), self.lines, self.aspect)?;
        let rates = self.supported_rates();
        if rates.is_empty() {
            f.write_str(" no rates")?;
        }
        for (i, rate) in rates.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{rate}")?;
        }
        write!(f, " (preferred {})", self.preferred)
    }
}
