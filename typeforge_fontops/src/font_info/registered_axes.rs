use std::ops::RangeInclusive;

/// A variation axis from the OpenType design-variation axis registry.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum RegisteredAxis {
    OpticalSize,
    Width,
    Weight,
    Italic,
    Slant,
}
impl RegisteredAxis {
    pub const ALL: [RegisteredAxis; 5] = [
        RegisteredAxis::OpticalSize,
        RegisteredAxis::Width,
        RegisteredAxis::Weight,
        RegisteredAxis::Italic,
        RegisteredAxis::Slant,
    ];

    pub fn from_tag(tag: &str) -> Option<RegisteredAxis> {
        Self::ALL.into_iter().find(|axis| axis.tag() == tag)
    }

    pub fn tag(&self) -> &'static str {
        match self {
            RegisteredAxis::OpticalSize => "opsz",
            RegisteredAxis::Width => "wdth",
            RegisteredAxis::Weight => "wght",
            RegisteredAxis::Italic => "ital",
            RegisteredAxis::Slant => "slnt",
        }
    }

    pub fn standard_name(&self) -> &'static str {
        match self {
            RegisteredAxis::OpticalSize => "Optical size",
            RegisteredAxis::Width => "Width",
            RegisteredAxis::Weight => "Weight",
            RegisteredAxis::Italic => "Italic",
            RegisteredAxis::Slant => "Slant",
        }
    }

    /// Checks that a font's axis range is sensible for this axis, e.g. that a weight axis
    /// contains the regular weight.
    pub fn is_valid(&self, range: &RangeInclusive<f32>) -> bool {
        let (min, max) = (*range.start(), *range.end());
        if min > max {
            return false;
        }
        match self {
            RegisteredAxis::OpticalSize => min > 0.0,
            RegisteredAxis::Width => min > 0.0 && min <= 100.0 && max >= 100.0,
            RegisteredAxis::Weight => min > 0.0 && min <= 400.0 && max >= 400.0 && max <= 1000.0,
            RegisteredAxis::Italic => min >= 0.0 && max <= 1.0,
            RegisteredAxis::Slant => min >= -90.0 && max <= 90.0,
        }
    }
}
