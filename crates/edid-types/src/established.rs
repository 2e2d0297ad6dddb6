use std::fmt;

/// One mode from an established timing bit table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EstablishedTiming {
    pub h_active: u16,
    pub v_active: u16,
    pub refresh_hz: u8,
    pub interlaced: bool,
    pub reduced_blanking: bool,
    pub source: &'static str,
}

const fn mode(h: u16, v: u16, hz: u8, source: &'static str) -> EstablishedTiming {
    EstablishedTiming {
        h_active: h,
        v_active: v,
        refresh_hz: hz,
        interlaced: false,
        reduced_blanking: false,
        source,
    }
}

const fn rb(h: u16, v: u16, hz: u8) -> EstablishedTiming {
    EstablishedTiming {
        reduced_blanking: true,
        ..mode(h, v, hz, "DMT")
    }
}

impl fmt::Display for EstablishedTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scan = if self.interlaced { "i" } else { "" };
        write!(
            f,
            "{}x{}{scan} {} Hz {}",
            self.h_active, self.v_active, self.refresh_hz, self.source
        )?;
        if self.reduced_blanking {
            f.write_str(" (RB)")?;
        }
        Ok(())
    }
}

/// Established timings I and II (base block bytes 0x23-0x25), most
/// significant bit of byte 0x23 first. Byte 0x25 only defines bit 7; bits
/// 6-0 are manufacturer timings.
pub const ESTABLISHED_I_II: [EstablishedTiming; 17] = [
    mode(720, 400, 70, "IBM"),
    mode(720, 400, 88, "IBM"),
    mode(640, 480, 60, "DMT"),
    mode(640, 480, 67, "Apple"),
    mode(640, 480, 72, "DMT"),
    mode(640, 480, 75, "DMT"),
    mode(800, 600, 56, "DMT"),
    mode(800, 600, 60, "DMT"),
    mode(800, 600, 72, "DMT"),
    mode(800, 600, 75, "DMT"),
    mode(832, 624, 75, "Apple"),
    EstablishedTiming {
        interlaced: true,
        ..mode(1024, 768, 87, "IBM")
    },
    mode(1024, 768, 60, "DMT"),
    mode(1024, 768, 70, "DMT"),
    mode(1024, 768, 75, "DMT"),
    mode(1280, 1024, 75, "DMT"),
    mode(1152, 870, 75, "Apple"),
];

/// Established timings III (display descriptor tag 0xF7, bytes 6-11),
/// most significant bit first. The low four bits of the last byte are
/// reserved.
pub const ESTABLISHED_III: [EstablishedTiming; 44] = [
    mode(640, 350, 85, "DMT"),
    mode(640, 400, 85, "DMT"),
    mode(720, 400, 85, "DMT"),
    mode(640, 480, 85, "DMT"),
    mode(848, 480, 60, "DMT"),
    mode(800, 600, 85, "DMT"),
    mode(1024, 768, 85, "DMT"),
    mode(1152, 864, 75, "DMT"),
    rb(1280, 768, 60),
    mode(1280, 768, 60, "DMT"),
    mode(1280, 768, 75, "DMT"),
    mode(1280, 768, 85, "DMT"),
    mode(1280, 960, 60, "DMT"),
    mode(1280, 960, 85, "DMT"),
    mode(1280, 1024, 60, "DMT"),
    mode(1280, 1024, 85, "DMT"),
    mode(1360, 768, 60, "DMT"),
    rb(1440, 900, 60),
    mode(1440, 900, 60, "DMT"),
    mode(1440, 900, 75, "DMT"),
    mode(1440, 900, 85, "DMT"),
    rb(1400, 1050, 60),
    mode(1400, 1050, 60, "DMT"),
    mode(1400, 1050, 75, "DMT"),
    mode(1400, 1050, 85, "DMT"),
    rb(1680, 1050, 60),
    mode(1680, 1050, 60, "DMT"),
    mode(1680, 1050, 75, "DMT"),
    mode(1680, 1050, 85, "DMT"),
    mode(1600, 1200, 60, "DMT"),
    mode(1600, 1200, 65, "DMT"),
    mode(1600, 1200, 70, "DMT"),
    mode(1600, 1200, 75, "DMT"),
    mode(1600, 1200, 85, "DMT"),
    mode(1792, 1344, 60, "DMT"),
    mode(1792, 1344, 75, "DMT"),
    mode(1856, 1392, 60, "DMT"),
    mode(1856, 1392, 75, "DMT"),
    rb(1920, 1200, 60),
    mode(1920, 1200, 60, "DMT"),
    mode(1920, 1200, 75, "DMT"),
    mode(1920, 1200, 85, "DMT"),
    mode(1920, 1440, 60, "DMT"),
    mode(1920, 1440, 75, "DMT"),
];

/// Select the table entries whose bits are set in `bytes`, reading each
/// byte from bit 7 down. Bits beyond the end of `table` are ignored.
pub fn decode_bits<'t>(
    bytes: &[u8],
    table: &'t [EstablishedTiming],
) -> impl Iterator<Item = &'t EstablishedTiming> + use<'t> {
    let bits: Vec<bool> = bytes
        .iter()
        .flat_map(|&b| (0..8).rev().map(move |i| b & (1 << i) != 0))
        .collect();
    table
        .iter()
        .zip(bits)
        .filter_map(|(timing, set)| set.then_some(timing))
}
