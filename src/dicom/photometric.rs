//! Photometric interpretation (grayscale polarity)

use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PhotometricInterpretation {
    /// Minimum intensity is displayed as white
    Monochrome1,
    /// Minimum intensity is displayed as black
    #[default]
    Monochrome2,
    /// Colour or palette data, which the renderer does not handle
    Other(String),
}

impl From<&str> for PhotometricInterpretation {
    fn from(s: &str) -> Self {
        match s.trim() {
            "MONOCHROME1" => Self::Monochrome1,
            "MONOCHROME2" => Self::Monochrome2,
            other => Self::Other(other.to_string()),
        }
    }
}

impl PhotometricInterpretation {
    #[inline(always)]
    #[must_use]
    pub fn is_grayscale(&self) -> bool {
        matches!(self, Self::Monochrome1 | Self::Monochrome2)
    }

    #[inline(always)]
    #[must_use]
    pub fn should_invert(&self) -> bool {
        matches!(self, Self::Monochrome1)
    }
}

impl Display for PhotometricInterpretation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Monochrome1 => write!(f, "MONOCHROME1"),
            Self::Monochrome2 => write!(f, "MONOCHROME2"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        assert_eq!(PhotometricInterpretation::from("MONOCHROME1 "), PhotometricInterpretation::Monochrome1);
        assert_eq!(PhotometricInterpretation::from("MONOCHROME2"), PhotometricInterpretation::Monochrome2);
        let rgb = PhotometricInterpretation::from("RGB");
        assert!(!rgb.is_grayscale());
        assert_eq!(rgb.to_string(), "RGB");
        assert!(PhotometricInterpretation::Monochrome1.should_invert());
        assert!(!PhotometricInterpretation::default().should_invert());
    }
}
