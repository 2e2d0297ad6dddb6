#![warn(clippy::pedantic)]

pub mod error;
pub mod enums;
pub mod extension_tag;
pub mod detailed_timing;
pub mod cvt;
pub mod standard_timing;
pub mod established;
pub mod descriptor;
pub mod displayid_timing;
pub mod vic;

pub use cvt::{Cvt3, CvtIssue};
pub use descriptor::DescriptorTag;
pub use detailed_timing::{DetailedTiming, TimingIssue};
pub use enums::{AspectRatio, AudioFormat, CvtAspect, CvtRate, DigitalInterface, RangeTimingSupport};
pub use error::TypeError;
pub use extension_tag::ExtensionTag;
pub use standard_timing::{StandardSlot, StandardTiming};
