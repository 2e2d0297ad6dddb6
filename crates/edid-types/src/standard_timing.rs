use std::fmt;

use serde::Serialize;

use crate::enums::AspectRatio;

/// Size of a standard timing code.
pub const STANDARD_TIMING_SIZE: usize = 2;

/// A decoded two-byte standard timing.
///
/// `x0` holds `h_active / 8 - 31`; `x1` holds the aspect ratio in bits 7-6
/// and `refresh - 60` in bits 5-0. The refresh rate is always
/// `(x1 & 0x3F) + 60`, whatever convention an encoder may have followed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StandardTiming {
    pub h_active: u16,
    pub v_active: u16,
    pub aspect: AspectRatio,
    pub refresh_hz: u8,
}

impl StandardTiming {
    /// The raw 6-bit refresh field this timing was decoded from.
    #[must_use]
    pub fn refresh_field(&self) -> u8 {
        self.refresh_hz - 60
    }
}

impl fmt::Display for StandardTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} {} Hz {}",
            self.h_active, self.v_active, self.refresh_hz, self.aspect
        )
    }
}

/// What a two-byte standard timing slot contains.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum StandardSlot {
    /// `01 01`, the defined "unused" marker.
    Unused,
    /// `00 00`, unused but should have been `01 01`.
    Zero,
    /// `x0 == 0` with a non-zero `x1`; there is no resolution 248.
    Invalid { x0: u8, x1: u8 },
    Timing(StandardTiming),
}

impl StandardSlot {
    /// Decode `(x0, x1)`. `revision` is the base block's EDID revision,
    /// which selects the meaning of aspect bits `00`.
    #[must_use]
    pub fn parse(x0: u8, x1: u8, revision: u8) -> Self {
        match (x0, x1) {
            (0x01, 0x01) => Self::Unused,
            (0x00, 0x00) => Self::Zero,
            (0x00, _) => Self::Invalid { x0, x1 },
            _ => {
                let h_active = (u16::from(x0) + 31) * 8;
                let aspect = AspectRatio::from_bits(x1 >> 6, revision);
                Self::Timing(StandardTiming {
                    h_active,
                    v_active: aspect.height_for(h_active),
                    aspect,
                    refresh_hz: (x1 & 0x3F) + 60,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unused_markers() {
        assert_eq!(StandardSlot::parse(0x01, 0x01, 4), StandardSlot::Unused);
        assert_eq!(StandardSlot::parse(0x00, 0x00, 4), StandardSlot::Zero);
        assert_eq!(
            StandardSlot::parse(0x00, 0x40, 4),
            StandardSlot::Invalid { x0: 0, x1: 0x40 }
        );
    }

    #[test]
    fn decodes_1280x1024_at_60() {
        // (1280 / 8) - 31 = 129 = 0x81; 5:4 = 0b10; refresh 60 → 0
        let StandardSlot::Timing(t) = StandardSlot::parse(0x81, 0x80, 4) else {
            panic!("expected a timing");
        };
        assert_eq!((t.h_active, t.v_active), (1280, 1024));
        assert_eq!(t.aspect, AspectRatio::A5_4);
        assert_eq!(t.refresh_hz, 60);
        assert_eq!(t.to_string(), "1280x1024 60 Hz 5:4");
    }

    #[test]
    fn refresh_follows_written_formula_for_every_x1() {
        for x1 in 0..=u8::MAX {
            let slot = StandardSlot::parse(0xD1, x1, 4);
            let StandardSlot::Timing(t) = slot else {
                panic!("x1={x1:#04X} did not decode to a timing");
            };
            assert_eq!(u16::from(t.refresh_hz), u16::from(x1 & 0x3F) + 60);
            assert_eq!(t.refresh_field(), x1 & 0x3F);
        }
    }

    #[test]
    fn stored_sixty_means_one_twenty() {
        let StandardSlot::Timing(t) = StandardSlot::parse(0xD1, 0xC0 | 60, 4) else {
            panic!("expected a timing");
        };
        assert_eq!(t.refresh_hz, 120);
        assert_eq!((t.h_active, t.v_active), (1920, 1080));
    }

    #[test]
    fn aspect_zero_before_edid_1_3_is_square() {
        let StandardSlot::Timing(t) = StandardSlot::parse(0x01, 0x00, 2) else {
            panic!("expected a timing");
        };
        assert_eq!((t.h_active, t.v_active), (256, 256));
    }
}
