use std::fmt;

/// A CTA-861 video format named by its Video Identification Code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VideoFormat {
    pub vic: u8,
    pub h_active: u16,
    pub v_active: u16,
    pub interlaced: bool,
    pub refresh_hz: u8,
    pub aspect: &'static str,
}

impl fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scan = if self.interlaced { 'i' } else { 'p' };
        write!(
            f,
            "VIC {:3}: {}x{}{scan} {} Hz {}",
            self.vic, self.h_active, self.v_active, self.refresh_hz, self.aspect
        )
    }
}

// (h, v, interlaced, Hz, aspect) for VICs 1..=64
const FORMATS: [(u16, u16, bool, u8, &str); 64] = [
    (640, 480, false, 60, "4:3"),
    (720, 480, false, 60, "4:3"),
    (720, 480, false, 60, "16:9"),
    (1280, 720, false, 60, "16:9"),
    (1920, 1080, true, 60, "16:9"),
    (1440, 480, true, 60, "4:3"),
    (1440, 480, true, 60, "16:9"),
    (1440, 240, false, 60, "4:3"),
    (1440, 240, false, 60, "16:9"),
    (2880, 480, true, 60, "4:3"),
    (2880, 480, true, 60, "16:9"),
    (2880, 240, false, 60, "4:3"),
    (2880, 240, false, 60, "16:9"),
    (1440, 480, false, 60, "4:3"),
    (1440, 480, false, 60, "16:9"),
    (1920, 1080, false, 60, "16:9"),
    (720, 576, false, 50, "4:3"),
    (720, 576, false, 50, "16:9"),
    (1280, 720, false, 50, "16:9"),
    (1920, 1080, true, 50, "16:9"),
    (1440, 576, true, 50, "4:3"),
    (1440, 576, true, 50, "16:9"),
    (1440, 288, false, 50, "4:3"),
    (1440, 288, false, 50, "16:9"),
    (2880, 576, true, 50, "4:3"),
    (2880, 576, true, 50, "16:9"),
    (2880, 288, false, 50, "4:3"),
    (2880, 288, false, 50, "16:9"),
    (1440, 576, false, 50, "4:3"),
    (1440, 576, false, 50, "16:9"),
    (1920, 1080, false, 50, "16:9"),
    (1920, 1080, false, 24, "16:9"),
    (1920, 1080, false, 25, "16:9"),
    (1920, 1080, false, 30, "16:9"),
    (2880, 480, false, 60, "4:3"),
    (2880, 480, false, 60, "16:9"),
    (2880, 576, false, 50, "4:3"),
    (2880, 576, false, 50, "16:9"),
    (1920, 1080, true, 50, "16:9"),
    (1920, 1080, true, 100, "16:9"),
    (1280, 720, false, 100, "16:9"),
    (720, 576, false, 100, "4:3"),
    (720, 576, false, 100, "16:9"),
    (1440, 576, true, 100, "4:3"),
    (1440, 576, true, 100, "16:9"),
    (1920, 1080, true, 120, "16:9"),
    (1280, 720, false, 120, "16:9"),
    (720, 480, false, 120, "4:3"),
    (720, 480, false, 120, "16:9"),
    (1440, 480, true, 120, "4:3"),
    (1440, 480, true, 120, "16:9"),
    (720, 576, false, 200, "4:3"),
    (720, 576, false, 200, "16:9"),
    (1440, 576, true, 200, "4:3"),
    (1440, 576, true, 200, "16:9"),
    (720, 480, false, 240, "4:3"),
    (720, 480, false, 240, "16:9"),
    (1440, 480, true, 240, "4:3"),
    (1440, 480, true, 240, "16:9"),
    (1280, 720, false, 24, "16:9"),
    (1280, 720, false, 25, "16:9"),
    (1280, 720, false, 30, "16:9"),
    (1920, 1080, false, 120, "16:9"),
    (1920, 1080, false, 100, "16:9"),
];

/// Look up a VIC. Returns `None` for 0 and for codes past the table.
#[must_use]
pub fn lookup(vic: u8) -> Option<VideoFormat> {
    let index = usize::from(vic).checked_sub(1)?;
    let &(h_active, v_active, interlaced, refresh_hz, aspect) = FORMATS.get(index)?;
    Some(VideoFormat {
        vic,
        h_active,
        v_active,
        interlaced,
        refresh_hz,
        aspect,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_codes() {
        let vga = lookup(1).unwrap();
        assert_eq!((vga.h_active, vga.v_active, vga.refresh_hz), (640, 480, 60));
        let fhd = lookup(16).unwrap();
        assert_eq!(fhd.to_string(), "VIC  16: 1920x1080p 60 Hz 16:9");
        let pal = lookup(20).unwrap();
        assert!(pal.interlaced);
        assert_eq!(pal.refresh_hz, 50);
        assert_eq!(lookup(64).unwrap().refresh_hz, 100);
    }

    #[test]
    fn out_of_table_codes() {
        assert!(lookup(0).is_none());
        assert!(lookup(65).is_none());
        assert!(lookup(255).is_none());
    }
}
