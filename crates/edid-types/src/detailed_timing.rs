use std::fmt;

use serde::Serialize;

/// Size of a detailed timing descriptor on the wire.
pub const DTD_SIZE: usize = 18;

/// An 18-byte detailed timing descriptor.
///
/// ```text
/// ┌────────┬────────────────────────────────────────────────┐
/// │ Bytes  │ Field                                          │
/// ├────────┼────────────────────────────────────────────────┤
/// │ 0-1    │ Pixel clock, little-endian, 10 kHz units       │
/// │ 2,3,4  │ H active / H blanking (low 8 + high nibbles)   │
/// │ 5,6,7  │ V active / V blanking (low 8 + high nibbles)   │
/// │ 8-11   │ H front porch, H sync, V front porch, V sync   │
/// │ 12-14  │ Image size in mm (low 8 + high nibbles)        │
/// │ 15,16  │ H border, V border                             │
/// │ 17     │ Flags: interlace, stereo, sync definition      │
/// └────────┴────────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DetailedTiming {
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
    pub h_border: u8,
    pub v_border: u8,
    pub interlaced: bool,
    pub stereo: StereoMode,
    pub sync: SyncKind,
}

/// Stereo viewing support (byte 17, bits 6-5 and 0).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum StereoMode {
    None,
    FieldSequentialRight,
    FieldSequentialLeft,
    InterleavedRightEven,
    InterleavedLeftEven,
    FourWay,
    SideBySide,
}

/// Sync signal definition (byte 17, bits 4-1).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SyncKind {
    Analog { bipolar: bool, serrations: bool, on_rgb: bool },
    DigitalComposite { serrations: bool, h_positive: bool },
    DigitalSeparate { v_positive: bool, h_positive: bool },
}

/// A value inside a detailed timing that no display could use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimingIssue {
    ZeroActive,
    ZeroBlanking,
    HSyncOutsideBlanking { needed: u16, blank: u16 },
    VSyncOutsideBlanking { needed: u16, blank: u16 },
    PartialImageSize,
}

impl fmt::Display for TimingIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroActive => f.write_str("Active area is zero"),
            Self::ZeroBlanking => f.write_str("Blanking is zero"),
            Self::HSyncOutsideBlanking { needed, blank } => write!(
                f,
                "Horizontal front porch + sync ({needed}) exceeds blanking ({blank})"
            ),
            Self::VSyncOutsideBlanking { needed, blank } => write!(
                f,
                "Vertical front porch + sync ({needed}) exceeds blanking ({blank})"
            ),
            Self::PartialImageSize => {
                f.write_str("Only one of the image size dimensions is zero")
            }
        }
    }
}

fn nibble_join(low: u8, high: u8) -> u16 {
    u16::from(low) | (u16::from(high & 0x0F) << 8)
}

impl DetailedTiming {
    /// Parse an 18-byte window. Returns `None` when the pixel clock is
    /// zero, which marks the window as a display descriptor instead.
    #[must_use]
    pub fn parse(b: &[u8; DTD_SIZE]) -> Option<Self> {
        let clock = u16::from_le_bytes([b[0], b[1]]);
        if clock == 0 {
            return None;
        }
        let flags = b[17];
        let stereo = match ((flags >> 4) & 0b110) | (flags & 0b1) {
            0b010 => StereoMode::FieldSequentialRight,
            0b100 => StereoMode::FieldSequentialLeft,
            0b011 => StereoMode::InterleavedRightEven,
            0b101 => StereoMode::InterleavedLeftEven,
            0b110 => StereoMode::FourWay,
            0b111 => StereoMode::SideBySide,
            _ => StereoMode::None,
        };
        let sync = if flags & 0x10 == 0 {
            SyncKind::Analog {
                bipolar: flags & 0x08 != 0,
                serrations: flags & 0x04 != 0,
                on_rgb: flags & 0x02 != 0,
            }
        } else if flags & 0x08 == 0 {
            SyncKind::DigitalComposite {
                serrations: flags & 0x04 != 0,
                h_positive: flags & 0x02 != 0,
            }
        } else {
            SyncKind::DigitalSeparate {
                v_positive: flags & 0x04 != 0,
                h_positive: flags & 0x02 != 0,
            }
        };
        Some(Self {
            pixel_clock_khz: u32::from(clock) * 10,
            h_active: nibble_join(b[2], b[4] >> 4),
            h_blank: nibble_join(b[3], b[4]),
            v_active: nibble_join(b[5], b[7] >> 4),
            v_blank: nibble_join(b[6], b[7]),
            h_front: u16::from(b[8]) | (u16::from(b[11] >> 6) << 8),
            h_sync: u16::from(b[9]) | (u16::from((b[11] >> 4) & 0b11) << 8),
            v_front: u16::from(b[10] >> 4) | (u16::from((b[11] >> 2) & 0b11) << 4),
            v_sync: u16::from(b[10] & 0x0F) | (u16::from(b[11] & 0b11) << 4),
            width_mm: nibble_join(b[12], b[14] >> 4),
            height_mm: nibble_join(b[13], b[14]),
            h_border: b[15],
            v_border: b[16],
            interlaced: flags & 0x80 != 0,
            stereo,
            sync,
        })
    }

    #[must_use]
    pub fn h_total(&self) -> u32 {
        u32::from(self.h_active) + u32::from(self.h_blank)
    }

    #[must_use]
    pub fn v_total(&self) -> u32 {
        u32::from(self.v_active) + u32::from(self.v_blank)
    }

    /// Addressable frame height (an interlaced DTD stores field lines).
    #[must_use]
    pub fn frame_height(&self) -> u32 {
        if self.interlaced {
            u32::from(self.v_active) * 2
        } else {
            u32::from(self.v_active)
        }
    }

    /// Vertical refresh in Hz, or 0.0 for a degenerate total.
    #[must_use]
    pub fn refresh_hz(&self) -> f64 {
        let total = f64::from(self.h_total()) * f64::from(self.v_total());
        if total == 0.0 {
            return 0.0;
        }
        f64::from(self.pixel_clock_khz) * 1000.0 / total
    }

    /// Horizontal frequency in kHz, or 0.0 for a zero line length.
    #[must_use]
    pub fn h_freq_khz(&self) -> f64 {
        if self.h_total() == 0 {
            return 0.0;
        }
        f64::from(self.pixel_clock_khz) / f64::from(self.h_total())
    }

    /// Reduced aspect ratio of the addressable area, e.g. `(16, 9)`.
    #[must_use]
    pub fn aspect(&self) -> (u32, u32) {
        let w = u32::from(self.h_active);
        let h = self.frame_height();
        let g = gcd(w, h);
        if g == 0 { (0, 0) } else { (w / g, h / g) }
    }

    /// Values that are structurally present but physically impossible.
    #[must_use]
    pub fn issues(&self) -> Vec<TimingIssue> {
        let mut issues = Vec::new();
        if self.h_active == 0 || self.v_active == 0 {
            issues.push(TimingIssue::ZeroActive);
        }
        if self.h_blank == 0 || self.v_blank == 0 {
            issues.push(TimingIssue::ZeroBlanking);
        }
        let h_needed = self.h_front + self.h_sync;
        if self.h_blank != 0 && h_needed > self.h_blank {
            issues.push(TimingIssue::HSyncOutsideBlanking {
                needed: h_needed,
                blank: self.h_blank,
            });
        }
        let v_needed = self.v_front + self.v_sync;
        if self.v_blank != 0 && v_needed > self.v_blank {
            issues.push(TimingIssue::VSyncOutsideBlanking {
                needed: v_needed,
                blank: self.v_blank,
            });
        }
        if (self.width_mm == 0) != (self.height_mm == 0) {
            issues.push(TimingIssue::PartialImageSize);
        }
        issues
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 1920x1080@60 CEA timing, 600x340 mm, digital separate +/+.
    const DTD_1080P: [u8; 18] = [
        0x02, 0x3A, 0x80, 0x18, 0x71, 0x38, 0x2D, 0x40, 0x58, 0x2C, 0x45, 0x00, 0x58, 0x54,
        0x21, 0x00, 0x00, 0x1E,
    ];

    #[test]
    fn parses_1080p() {
        let t = DetailedTiming::parse(&DTD_1080P).unwrap();
        assert_eq!(t.pixel_clock_khz, 148_500);
        assert_eq!((t.h_active, t.h_blank), (1920, 280));
        assert_eq!((t.v_active, t.v_blank), (1080, 45));
        assert_eq!((t.h_front, t.h_sync), (88, 44));
        assert_eq!((t.v_front, t.v_sync), (4, 5));
        assert_eq!((t.width_mm, t.height_mm), (600, 340));
        assert!(!t.interlaced);
        assert_eq!(t.stereo, StereoMode::None);
        assert_eq!(
            t.sync,
            SyncKind::DigitalSeparate {
                v_positive: true,
                h_positive: true
            }
        );
        assert_eq!(t.h_total(), 2200);
        assert_eq!(t.v_total(), 1125);
        assert!((t.refresh_hz() - 60.0).abs() < 1e-9);
        assert!((t.h_freq_khz() - 67.5).abs() < 1e-9);
        assert_eq!(t.aspect(), (16, 9));
        assert!(t.issues().is_empty());
    }

    #[test]
    fn zero_clock_is_not_a_timing() {
        let mut raw = DTD_1080P;
        raw[0] = 0;
        raw[1] = 0;
        assert!(DetailedTiming::parse(&raw).is_none());
    }

    #[test]
    fn sync_outside_blanking_is_reported() {
        let mut raw = DTD_1080P;
        // h front porch 250 + sync 44 > blank 280
        raw[8] = 250;
        let t = DetailedTiming::parse(&raw).unwrap();
        assert_eq!(
            t.issues(),
            vec![TimingIssue::HSyncOutsideBlanking {
                needed: 294,
                blank: 280
            }]
        );
    }

    #[test]
    fn partial_image_size_is_reported() {
        let mut raw = DTD_1080P;
        raw[13] = 0;
        raw[14] = 0x20;
        let t = DetailedTiming::parse(&raw).unwrap();
        assert_eq!(t.height_mm, 0);
        assert_eq!(t.issues(), vec![TimingIssue::PartialImageSize]);
    }

    #[test]
    fn interlaced_doubles_frame_height() {
        let mut raw = DTD_1080P;
        raw[5] = 0x1C; // 540 lines per field
        raw[7] = 0x20 | (raw[7] & 0x0F);
        raw[17] |= 0x80;
        let t = DetailedTiming::parse(&raw).unwrap();
        assert_eq!(t.v_active, 540);
        assert_eq!(t.frame_height(), 1080);
    }
}
