use std::fmt;

/// Size of one DisplayID Type I / Type VII detailed timing.
pub const DISPLAYID_TIMING_SIZE: usize = 20;

/// A DisplayID detailed timing (Type I in DisplayID 1.x, Type VII in
/// DisplayID 2.x). Every 16-bit field stores `value - 1`.
///
/// ```text
/// ┌───────┬───────────────────────────────────────────────┐
/// │ Bytes │ Field                                         │
/// ├───────┼───────────────────────────────────────────────┤
/// │ 0-2   │ Pixel clock - 1 (10 kHz for Type I, 1 kHz VII)│
/// │ 3     │ preferred, stereo, interlaced, aspect         │
/// │ 4-11  │ H active, H blank, H offset (+pol), H sync    │
/// │ 12-19 │ V active, V blank, V offset (+pol), V sync    │
/// └───────┴───────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayIdTiming {
    pub pixel_clock_khz: u32,
    pub preferred: bool,
    pub interlaced: bool,
    pub aspect_code: u8,
    pub h_active: u32,
    pub h_blank: u32,
    pub h_front: u32,
    pub h_sync: u32,
    pub h_sync_positive: bool,
    pub v_active: u32,
    pub v_blank: u32,
    pub v_front: u32,
    pub v_sync: u32,
    pub v_sync_positive: bool,
}

fn field(b: &[u8], at: usize) -> (u32, bool) {
    let raw = u16::from_le_bytes([b[at], b[at + 1]]);
    (u32::from(raw & 0x7FFF) + 1, raw & 0x8000 != 0)
}

fn wide(b: &[u8], at: usize) -> u32 {
    u32::from(u16::from_le_bytes([b[at], b[at + 1]])) + 1
}

impl DisplayIdTiming {
    /// Decode a 20-byte record. `clock_unit_khz` is 10 for Type I and 1
    /// for Type VII.
    #[must_use]
    pub fn parse(b: &[u8; DISPLAYID_TIMING_SIZE], clock_unit_khz: u32) -> Self {
        let clock = u32::from_le_bytes([b[0], b[1], b[2], 0]) + 1;
        let (h_front, h_sync_positive) = field(b, 8);
        let (v_front, v_sync_positive) = field(b, 16);
        Self {
            pixel_clock_khz: clock * clock_unit_khz,
            preferred: b[3] & 0x80 != 0,
            interlaced: b[3] & 0x10 != 0,
            aspect_code: b[3] & 0x0F,
            h_active: wide(b, 4),
            h_blank: wide(b, 6),
            h_front,
            h_sync: wide(b, 10),
            h_sync_positive,
            v_active: wide(b, 12),
            v_blank: wide(b, 14),
            v_front,
            v_sync: wide(b, 18),
            v_sync_positive,
        }
    }

    /// Aspect ratio label for the 4-bit code, `None` if reserved.
    #[must_use]
    pub fn aspect(&self) -> Option<&'static str> {
        Some(match self.aspect_code {
            0 => "1:1",
            1 => "5:4",
            2 => "4:3",
            3 => "15:9",
            4 => "16:9",
            5 => "16:10",
            6 => "64:27",
            7 => "256:135",
            8 => "undefined",
            _ => return None,
        })
    }

    #[must_use]
    pub fn refresh_hz(&self) -> f64 {
        let h_total = f64::from(self.h_active + self.h_blank);
        let v_total = f64::from(self.v_active + self.v_blank);
        f64::from(self.pixel_clock_khz) * 1000.0 / (h_total * v_total)
    }
}

impl fmt::Display for DisplayIdTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scan = if self.interlaced { "i" } else { "" };
        write!(
            f,
            "{}x{}{scan} {:.3} Hz {} {:.3} MHz",
            self.h_active,
            self.v_active,
            self.refresh_hz(),
            self.aspect().unwrap_or("reserved"),
            f64::from(self.pixel_clock_khz) / 1000.0,
        )?;
        if self.preferred {
            f.write_str(" (preferred)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(v: u16) -> [u8; 2] {
        (v - 1).to_le_bytes()
    }

    fn timing_1080p() -> [u8; DISPLAYID_TIMING_SIZE] {
        let mut raw = [0u8; DISPLAYID_TIMING_SIZE];
        raw[0..3].copy_from_slice(&(14_850u32 - 1).to_le_bytes()[..3]);
        raw[3] = 0x84;
        raw[4..6].copy_from_slice(&encode(1920));
        raw[6..8].copy_from_slice(&encode(280));
        raw[8..10].copy_from_slice(&encode(88));
        raw[9] |= 0x80;
        raw[10..12].copy_from_slice(&encode(44));
        raw[12..14].copy_from_slice(&encode(1080));
        raw[14..16].copy_from_slice(&encode(45));
        raw[16..18].copy_from_slice(&encode(4));
        raw[18..20].copy_from_slice(&encode(5));
        raw
    }

    #[test]
    fn decodes_type_i_timing() {
        let t = DisplayIdTiming::parse(&timing_1080p(), 10);
        assert_eq!(t.pixel_clock_khz, 148_500);
        assert!(t.preferred);
        assert_eq!((t.h_active, t.h_blank, t.h_front, t.h_sync), (1920, 280, 88, 44));
        assert!(t.h_sync_positive);
        assert!(!t.v_sync_positive);
        assert_eq!((t.v_active, t.v_blank, t.v_front, t.v_sync), (1080, 45, 4, 5));
        assert_eq!(t.aspect(), Some("16:9"));
        assert_eq!(
            t.to_string(),
            "1920x1080 60.000 Hz 16:9 148.500 MHz (preferred)"
        );
    }

    #[test]
    fn type_vii_uses_kilohertz_clock() {
        let t = DisplayIdTiming::parse(&timing_1080p(), 1);
        assert_eq!(t.pixel_clock_khz, 14_850);
    }

    #[test]
    fn reserved_aspect_code() {
        let mut raw = timing_1080p();
        raw[3] = 0x0C;
        let t = DisplayIdTiming::parse(&raw, 10);
        assert_eq!(t.aspect(), None);
        assert!(!t.preferred);
    }
}
