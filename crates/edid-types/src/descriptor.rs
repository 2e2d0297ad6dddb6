/// Tag byte (offset 3) of an 18-byte display descriptor, i.e. a descriptor
/// slot whose pixel clock is zero.
///
/// ```text
/// ┌───────────┬──────────────────────────────────┐
/// │ Tag       │ Descriptor                       │
/// ├───────────┼──────────────────────────────────┤
/// │ 0xFF      │ Display product serial number    │
/// │ 0xFE      │ Alphanumeric data string         │
/// │ 0xFD      │ Display range limits             │
/// │ 0xFC      │ Display product name             │
/// │ 0xFB      │ Color point data                 │
/// │ 0xFA      │ Standard timing identifications  │
/// │ 0xF9      │ Display color management data    │
/// │ 0xF8      │ CVT 3-byte timing codes          │
/// │ 0xF7      │ Established timings III          │
/// │ 0x10      │ Dummy descriptor                 │
/// │ 0x00-0x0F │ Manufacturer specified           │
/// └───────────┴──────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DescriptorTag {
    SerialNumber,
    DataString,
    RangeLimits,
    ProductName,
    ColorPoint,
    StandardTimings,
    ColorManagement,
    CvtCodes,
    EstablishedIii,
    Dummy,
    Manufacturer(u8),
    Reserved(u8),
}

impl DescriptorTag {
    #[must_use]
    pub fn from_byte(tag: u8) -> Self {
        match tag {
            0xFF => Self::SerialNumber,
            0xFE => Self::DataString,
            0xFD => Self::RangeLimits,
            0xFC => Self::ProductName,
            0xFB => Self::ColorPoint,
            0xFA => Self::StandardTimings,
            0xF9 => Self::ColorManagement,
            0xF8 => Self::CvtCodes,
            0xF7 => Self::EstablishedIii,
            0x10 => Self::Dummy,
            0x00..=0x0F => Self::Manufacturer(tag),
            other => Self::Reserved(other),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SerialNumber => "Display Product Serial Number",
            Self::DataString => "Alphanumeric Data String",
            Self::RangeLimits => "Display Range Limits",
            Self::ProductName => "Display Product Name",
            Self::ColorPoint => "Color Point Data",
            Self::StandardTimings => "Standard Timing Identifications",
            Self::ColorManagement => "Display Color Management Data",
            Self::CvtCodes => "CVT 3 Byte Timing Codes",
            Self::EstablishedIii => "Established timings III",
            Self::Dummy => "Dummy Descriptor",
            Self::Manufacturer(_) => "Manufacturer-Specified Display Descriptor",
            Self::Reserved(_) => "Reserved Display Descriptor",
        }
    }
}

/// Text field of a string descriptor (bytes 5-17).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DescriptorText {
    pub text: String,
    /// Non-printable characters were replaced with `.`.
    pub had_unprintable: bool,
    /// Padding after the `0x0A` terminator was not `0x20`.
    pub bad_padding: bool,
}

/// Decode a 13-byte descriptor string: ASCII up to an optional `0x0A`
/// terminator, then `0x20` padding.
#[must_use]
pub fn descriptor_text(bytes: &[u8]) -> DescriptorText {
    let end = bytes.iter().position(|&b| b == 0x0A).unwrap_or(bytes.len());
    let mut had_unprintable = false;
    let text: String = bytes[..end]
        .iter()
        .map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                char::from(b)
            } else {
                had_unprintable = true;
                '.'
            }
        })
        .collect();
    let bad_padding = bytes
        .get(end + 1..)
        .is_some_and(|pad| pad.iter().any(|&b| b != 0x20));
    DescriptorText {
        text: text.trim_end().to_owned(),
        had_unprintable,
        bad_padding,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_classification() {
        assert_eq!(DescriptorTag::from_byte(0xFC), DescriptorTag::ProductName);
        assert_eq!(DescriptorTag::from_byte(0x05), DescriptorTag::Manufacturer(5));
        assert_eq!(DescriptorTag::from_byte(0x11), DescriptorTag::Reserved(0x11));
        assert_eq!(DescriptorTag::from_byte(0x10).name(), "Dummy Descriptor");
    }

    #[test]
    fn terminated_text_with_padding() {
        let text = descriptor_text(b"DELL U2720Q\n ");
        assert_eq!(text.text, "DELL U2720Q");
        assert!(!text.had_unprintable);
        assert!(!text.bad_padding);
    }

    #[test]
    fn full_width_text_needs_no_terminator() {
        let text = descriptor_text(b"ABCDEFGHIJKLM");
        assert_eq!(text.text, "ABCDEFGHIJKLM");
        assert!(!text.bad_padding);
    }

    #[test]
    fn bad_padding_and_control_bytes() {
        let text = descriptor_text(b"AB\x01\n\0\0\0\0\0\0\0\0\0");
        assert_eq!(text.text, "AB.");
        assert!(text.had_unprintable);
        assert!(text.bad_padding);
    }
}
