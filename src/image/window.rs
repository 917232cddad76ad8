//! Radiological windowing from intensity to 8-bit display values

use crate::error::{Error, Result};
use std::fmt;

/// A validated center/width window.
///
/// `width` is always positive and finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    center: f64,
    width: f64,
}

impl Window {
    /// # Errors
    ///
    /// `InvalidWindow` when `width` is not a positive finite number or
    /// `center` is not finite.
    pub fn new(center: f64, width: f64) -> Result<Self> {
        if !width.is_finite() || width <= 0.0 || !center.is_finite() {
            return Err(Error::InvalidWindow { center, width });
        }
        Ok(Self { center, width })
    }

    /// Default window spanning `[min, max]`.
    ///
    /// A constant image (`min == max`) gets width 1 centred on the value, so
    /// every pixel renders mid-gray.
    #[must_use]
    pub fn from_range(min: f64, max: f64) -> Self {
        let width = max - min;
        if width > 0.0 && width.is_finite() {
            Self {
                center: min + width / 2.0,
                width,
            }
        } else {
            Self {
                center: if min.is_finite() { min } else { 0.0 },
                width: 1.0,
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn center(&self) -> f64 {
        self.center
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn lower(&self) -> f64 {
        self.center - self.width / 2.0
    }

    #[inline]
    #[must_use]
    pub fn upper(&self) -> f64 {
        self.center + self.width / 2.0
    }

    /// Map an intensity into `0..=255`
    #[inline]
    #[must_use]
    pub fn map(&self, intensity: f64) -> u8 {
        let lower = self.lower();
        if intensity <= lower {
            0
        } else if intensity >= self.upper() {
            255
        } else {
            (((intensity - lower) / self.width) * 255.0).round() as u8
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C={center} W={width}", center = self.center, width = self.width)
    }
}

/// Map one intensity with an unvalidated center/width.
///
/// # Errors
///
/// `InvalidWindow` for a non-positive width.
pub fn map_to_display(intensity: f64, center: f64, width: f64) -> Result<u8> {
    Ok(Window::new(center, width)?.map(intensity))
}
