use edid_types::enums::{AspectRatio, CvtAspect, CvtRate};

use crate::error::BuildError;

/// Field values for an 18-byte detailed timing descriptor.
///
/// `flags` is byte 17 verbatim (interlace, stereo and sync bits).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DtdSpec {
    pub pixel_clock_khz: u32,
    pub h_active: u16,
    pub h_blank: u16,
    pub v_active: u16,
    pub v_blank: u16,
    pub h_front: u16,
    pub h_sync: u16,
    pub v_front: u16,
    pub v_sync: u16,
    pub width_mm: u16,
    pub height_mm: u16,
    pub flags: u8,
}

impl DtdSpec {
    /// CTA-861 1920x1080 at 60 Hz, 148.5 MHz, digital separate sync +/+.
    #[must_use]
    pub const fn cea_1080p60() -> Self {
        Self {
            pixel_clock_khz: 148_500,
            h_active: 1920,
            h_blank: 280,
            v_active: 1080,
            v_blank: 45,
            h_front: 88,
            h_sync: 44,
            v_front: 4,
            v_sync: 5,
            width_mm: 600,
            height_mm: 340,
            flags: 0x1E,
        }
    }

    /// CTA-861 1280x720 at 60 Hz, 74.25 MHz, digital separate sync +/+.
    #[must_use]
    pub const fn cea_720p60() -> Self {
        Self {
            pixel_clock_khz: 74_250,
            h_active: 1280,
            h_blank: 370,
            v_active: 720,
            v_blank: 30,
            h_front: 110,
            h_sync: 40,
            v_front: 5,
            v_sync: 5,
            width_mm: 600,
            height_mm: 340,
            flags: 0x1E,
        }
    }

    /// Pack into the wire layout. Fields wider than their slot are
    /// truncated to the bits that exist on the wire.
    #[must_use]
    pub fn encode(&self) -> [u8; 18] {
        let lo = |v: u16| (v & 0xFF) as u8;
        let hi = |v: u16| ((v >> 8) & 0x0F) as u8;
        let clock = u16::try_from(self.pixel_clock_khz / 10).unwrap_or(u16::MAX);
        let [c0, c1] = clock.to_le_bytes();
        [
            c0,
            c1,
            lo(self.h_active),
            lo(self.h_blank),
            (hi(self.h_active) << 4) | hi(self.h_blank),
            lo(self.v_active),
            lo(self.v_blank),
            (hi(self.v_active) << 4) | hi(self.v_blank),
            lo(self.h_front),
            lo(self.h_sync),
            (((self.v_front & 0x0F) as u8) << 4) | (self.v_sync & 0x0F) as u8,
            ((((self.h_front >> 8) & 0b11) as u8) << 6)
                | ((((self.h_sync >> 8) & 0b11) as u8) << 4)
                | ((((self.v_front >> 4) & 0b11) as u8) << 2)
                | ((self.v_sync >> 4) & 0b11) as u8,
            lo(self.width_mm),
            lo(self.height_mm),
            (hi(self.width_mm) << 4) | hi(self.height_mm),
            0,
            0,
            self.flags,
        ]
    }
}

/// Encode a standard timing pair.
///
/// # Errors
///
/// - [`BuildError::UnencodableResolution`] unless `h_active` is a
///   multiple of 8 between 256 and 2288.
/// - [`BuildError::UnencodableRefresh`] unless `refresh_hz` is in
///   60..=123.
pub fn standard_timing(
    h_active: u16,
    aspect: AspectRatio,
    refresh_hz: u8,
) -> Result<[u8; 2], BuildError> {
    if h_active % 8 != 0 || !(256..=2288).contains(&h_active) {
        return Err(BuildError::UnencodableResolution { h_active });
    }
    if !(60..=123).contains(&refresh_hz) {
        return Err(BuildError::UnencodableRefresh { hz: refresh_hz });
    }
    let x0 = u8::try_from(h_active / 8 - 31)
        .map_err(|_| BuildError::UnencodableResolution { h_active })?;
    let bits = match aspect {
        AspectRatio::A16_10 | AspectRatio::A1_1 => 0b00,
        AspectRatio::A4_3 => 0b01,
        AspectRatio::A5_4 => 0b10,
        AspectRatio::A16_9 => 0b11,
    };
    Ok([x0, (bits << 6) | (refresh_hz - 60)])
}

/// Encode a CVT 3-byte code for `lines` addressable lines.
#[must_use]
pub fn cvt3(lines: u16, aspect: CvtAspect, preferred: CvtRate, supported: &[CvtRate]) -> [u8; 3] {
    let raw = (lines / 2).saturating_sub(1) & 0x0FFF;
    let aspect_bits = match aspect {
        CvtAspect::A4_3 => 0,
        CvtAspect::A16_9 => 1,
        CvtAspect::A16_10 => 2,
        CvtAspect::A15_9 => 3,
    };
    let preferred_bits = match preferred {
        CvtRate::R50 => 0,
        CvtRate::R60 | CvtRate::R60Rb => 1,
        CvtRate::R75 => 2,
        CvtRate::R85 => 3,
    };
    let mask = supported.iter().fold(0u8, |acc, rate| acc | rate.mask());
    [
        (raw & 0xFF) as u8,
        (((raw >> 8) as u8) << 4) | (aspect_bits << 2),
        (preferred_bits << 5) | mask,
    ]
}
