use std::fmt;

use serde::Serialize;

use crate::error::TypeError;

// ── Macro for coded-value enum boilerplate ────────────────────────────
//
// Several EDID fields are small integer codes with a closed set of
// meanings and reserved values in between. Each enum gets a
// `from_code` that rejects reserved values and a `code` inverse, so the
// decoder can report the raw value when a code is out of range.

macro_rules! wire_enum {
  (
    $(#[$meta:meta])*
    pub enum $name:ident {
      $( $(#[$vmeta:meta])* $variant:ident = $wire:expr => $label:expr ),+ $(,)?
    }
  ) => {
    $(#[$meta])*
    pub enum $name {
      $( $(#[$vmeta])* $variant ),+
    }

    impl $name {
      /// The raw code for this variant.
      #[must_use]
      pub fn code(self) -> u8 {
        match self {
          $( Self::$variant => $wire ),+
        }
      }

      /// Decode a raw code.
      ///
      /// # Errors
      ///
      /// Returns `TypeError::InvalidEnumValue` for reserved codes.
      pub fn from_code(value: u8) -> Result<Self, TypeError> {
        match value {
          $( $wire => Ok(Self::$variant), )+
          other => Err(TypeError::InvalidEnumValue {
            enum_name: stringify!($name),
            value: other,
          }),
        }
      }

      /// Human-readable name as printed in reports.
      #[must_use]
      pub fn label(self) -> &'static str {
        match self {
          $( Self::$variant => $label ),+
        }
      }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
      }
    }
  };
}

// ── DigitalInterface ──────────────────────────────────────────────────

wire_enum! {
  /// Digital video interface standard (base block byte 20, bits 3-0,
  /// EDID 1.4 only).
  #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
  pub enum DigitalInterface {
    Undefined = 0x0 => "Digital interface is not defined",
    Dvi = 0x1 => "DVI interface",
    HdmiA = 0x2 => "HDMI-a interface",
    HdmiB = 0x3 => "HDMI-b interface",
    Mddi = 0x4 => "MDDI interface",
    DisplayPort = 0x5 => "DisplayPort interface",
  }
}

// ── RangeTimingSupport ────────────────────────────────────────────────

wire_enum! {
  /// Video timing support flag of a display range limits descriptor
  /// (byte 10).
  #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
  pub enum RangeTimingSupport {
    DefaultGtf = 0x00 => "GTF is supported",
    RangeLimitsOnly = 0x01 => "Bare Limits",
    SecondaryGtf = 0x02 => "Secondary GTF is supported",
    Cvt = 0x04 => "CVT is supported",
  }
}

// ── AudioFormat ───────────────────────────────────────────────────────

wire_enum! {
  /// Audio format code of a CTA-861 short audio descriptor (byte 0,
  /// bits 6-3). Code 0 is reserved.
  #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
  pub enum AudioFormat {
    Lpcm = 1 => "Linear PCM",
    Ac3 = 2 => "AC-3",
    Mpeg1 = 3 => "MPEG 1 (Layers 1 & 2)",
    Mp3 = 4 => "MPEG 1 Layer 3 (MP3)",
    Mpeg2 = 5 => "MPEG2 (multichannel)",
    Aac = 6 => "AAC LC",
    Dts = 7 => "DTS",
    Atrac = 8 => "ATRAC",
    OneBit = 9 => "One Bit Audio",
    EnhancedAc3 = 10 => "Enhanced AC-3 (DD+)",
    DtsHd = 11 => "DTS-HD",
    Mat = 12 => "MAT (MLP)",
    Dst = 13 => "DST",
    WmaPro = 14 => "WMA Pro",
    Extended = 15 => "Extended format",
  }
}

// ── AspectRatio ───────────────────────────────────────────────────────

/// Aspect ratio encoded in the top two bits of a standard timing's
/// second byte.
///
/// ```text
/// ┌──────┬────────────────────────────┐
/// │ Bits │ Ratio                      │
/// ├──────┼────────────────────────────┤
/// │ 00   │ 16:10 (EDID 1.3+), 1:1 pre │
/// │ 01   │ 4:3                        │
/// │ 10   │ 5:4                        │
/// │ 11   │ 16:9                       │
/// └──────┴────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AspectRatio {
  A1_1,
  A16_10,
  A4_3,
  A5_4,
  A16_9,
}

impl AspectRatio {
  /// Decode the two ratio bits. `revision` is the base block's EDID
  /// revision; the meaning of `00` changed in EDID 1.3.
  #[must_use]
  pub fn from_bits(bits: u8, revision: u8) -> Self {
    match bits & 0b11 {
      0b00 if revision < 3 => Self::A1_1,
      0b00 => Self::A16_10,
      0b01 => Self::A4_3,
      0b10 => Self::A5_4,
      _ => Self::A16_9,
    }
  }

  /// Vertical resolution for a given horizontal resolution.
  #[must_use]
  pub fn height_for(self, width: u16) -> u16 {
    let w = u32::from(width);
    let h = match self {
      Self::A1_1 => w,
      Self::A16_10 => w * 10 / 16,
      Self::A4_3 => w * 3 / 4,
      Self::A5_4 => w * 4 / 5,
      Self::A16_9 => w * 9 / 16,
    };
    u16::try_from(h).unwrap_or(u16::MAX)
  }
}

impl fmt::Display for AspectRatio {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::A1_1 => "1:1",
      Self::A16_10 => "16:10",
      Self::A4_3 => "4:3",
      Self::A5_4 => "5:4",
      Self::A16_9 => "16:9",
    })
  }
}

// ── CVT enums ─────────────────────────────────────────────────────────

/// Aspect ratio of a CVT 3-byte code (byte 1, bits 3-2). All four
/// values are defined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CvtAspect {
  A4_3,
  A16_9,
  A16_10,
  A15_9,
}

impl CvtAspect {
  #[must_use]
  pub fn from_bits(bits: u8) -> Self {
    match bits & 0b11 {
      0 => Self::A4_3,
      1 => Self::A16_9,
      2 => Self::A16_10,
      _ => Self::A15_9,
    }
  }

  /// Horizontal resolution for `lines` addressable lines, rounded down to
  /// a multiple of 8 cells.
  #[must_use]
  pub fn width_for(self, lines: u16) -> u16 {
    let h = u32::from(lines);
    let w = match self {
      Self::A4_3 => h * 4 / 3,
      Self::A16_9 => h * 16 / 9,
      Self::A16_10 => h * 16 / 10,
      Self::A15_9 => h * 15 / 9,
    };
    u16::try_from(8 * (w / 8)).unwrap_or(u16::MAX)
  }
}

impl fmt::Display for CvtAspect {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::A4_3 => "4:3",
      Self::A16_9 => "16:9",
      Self::A16_10 => "16:10",
      Self::A15_9 => "15:9",
    })
  }
}

/// Vertical refresh rates named by CVT 3-byte codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CvtRate {
  R50,
  R60,
  R75,
  R85,
  /// 60 Hz with reduced blanking.
  R60Rb,
}

impl CvtRate {
  /// Preferred rate (byte 2, bits 6-5).
  #[must_use]
  pub fn preferred_from_bits(bits: u8) -> Self {
    match bits & 0b11 {
      0 => Self::R50,
      1 => Self::R60,
      2 => Self::R75,
      _ => Self::R85,
    }
  }

  /// Supported-rate mask bit for this rate (byte 2, bits 4-0).
  #[must_use]
  pub fn mask(self) -> u8 {
    match self {
      Self::R50 => 0x10,
      Self::R60 => 0x08,
      Self::R75 => 0x04,
      Self::R85 => 0x02,
      Self::R60Rb => 0x01,
    }
  }

  /// Rates in the order they appear in the supported mask.
  pub const ALL: [Self; 5] = [Self::R50, Self::R60, Self::R75, Self::R85, Self::R60Rb];

  #[must_use]
  pub fn hz(self) -> u8 {
    match self {
      Self::R50 => 50,
      Self::R60 | Self::R60Rb => 60,
      Self::R75 => 75,
      Self::R85 => 85,
    }
  }
}

impl fmt::Display for CvtRate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::R60Rb => f.write_str("60 Hz RB"),
      other => write!(f, "{} Hz", other.hz()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn digital_interface_codes() {
    for code in 0..=5 {
      let iface = DigitalInterface::from_code(code).unwrap();
      assert_eq!(iface.code(), code);
    }
    assert_eq!(
      DigitalInterface::from_code(9),
      Err(TypeError::InvalidEnumValue {
        enum_name: "DigitalInterface",
        value: 9
      })
    );
  }

  #[test]
  fn audio_format_zero_is_reserved() {
    assert!(AudioFormat::from_code(0).is_err());
    assert_eq!(AudioFormat::from_code(1).unwrap(), AudioFormat::Lpcm);
    assert_eq!(AudioFormat::Lpcm.to_string(), "Linear PCM");
  }

  #[test]
  fn range_timing_support_skips_three() {
    assert!(RangeTimingSupport::from_code(0x03).is_err());
    assert_eq!(
      RangeTimingSupport::from_code(0x04).unwrap(),
      RangeTimingSupport::Cvt
    );
  }

  #[test]
  fn aspect_ratio_depends_on_revision() {
    assert_eq!(AspectRatio::from_bits(0, 2), AspectRatio::A1_1);
    assert_eq!(AspectRatio::from_bits(0, 3), AspectRatio::A16_10);
    assert_eq!(AspectRatio::from_bits(0, 4), AspectRatio::A16_10);
  }

  #[test]
  fn aspect_ratio_heights() {
    assert_eq!(AspectRatio::A4_3.height_for(640), 480);
    assert_eq!(AspectRatio::A16_9.height_for(1920), 1080);
    assert_eq!(AspectRatio::A16_10.height_for(1280), 800);
    assert_eq!(AspectRatio::A5_4.height_for(1280), 1024);
    assert_eq!(AspectRatio::A1_1.height_for(256), 256);
  }

  #[test]
  fn cvt_widths_are_cell_aligned() {
    assert_eq!(CvtAspect::A16_9.width_for(1080), 1920);
    assert_eq!(CvtAspect::A4_3.width_for(768), 1024);
    assert_eq!(CvtAspect::A16_10.width_for(1050), 1680);
    assert_eq!(CvtAspect::A15_9.width_for(480), 800);
  }
}
