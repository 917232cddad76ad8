//! Domain-specific types shared by the decoder and the renderer

use dicom::encoding::TransferSyntaxIndex;
use dicom::transfer_syntax::{entries, TransferSyntaxRegistry};
use std::fmt;

/// Byte order of multi-byte values in the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

/// DICOM transfer syntax (UID, name)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferSyntax {
    pub uid: String,
    pub name: String,
}

impl TransferSyntax {
    #[must_use]
    pub fn new(uid: String, name: String) -> Self {
        Self { uid, name }
    }

    /// Build from a UID as found in the file meta group, looking up its name
    #[must_use]
    pub fn from_uid(raw: &str) -> Self {
        let uid = raw.trim_end_matches(['\0', ' ']).to_string();
        let name = TransferSyntaxRegistry
            .get(&uid)
            .map_or_else(|| "Unknown".to_string(), |ts| ts.name().to_string());
        Self { uid, name }
    }

    /// Byte order of the native encodings this crate reads.
    ///
    /// Returns `None` for compressed or deflated syntaxes.
    #[must_use]
    #[allow(deprecated)] // Explicit VR Big Endian is retired but still in use
    pub fn native_encoding(&self) -> Option<Endianness> {
        if self.uid == entries::IMPLICIT_VR_LITTLE_ENDIAN.uid()
            || self.uid == entries::EXPLICIT_VR_LITTLE_ENDIAN.uid()
        {
            Some(Endianness::Little)
        } else if self.uid == entries::EXPLICIT_VR_BIG_ENDIAN.uid() {
            Some(Endianness::Big)
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub fn is_big_endian(&self) -> bool {
        self.native_encoding() == Some(Endianness::Big)
    }
}

impl fmt::Display for TransferSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{name} ({uid})", name = self.name, uid = self.uid)
    }
}

/// SOP Class (UID, name)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SOPClass {
    pub uid: String,
    pub name: String,
}

impl fmt::Display for SOPClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{name} ({uid})", name = self.name, uid = self.uid)
    }
}

/// Native image size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub rows: u16,
    pub cols: u16,
}

impl Dimensions {
    #[must_use]
    pub fn new(rows: u16, cols: u16) -> Self {
        Self { rows, cols }
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        u32::from(self.cols)
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        u32::from(self.rows)
    }

    #[inline]
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        usize::from(self.rows) * usize::from(self.cols)
    }

    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.rows > 0 && self.cols > 0
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{cols}x{rows}", cols = self.cols, rows = self.rows)
    }
}

/// Linear rescale from stored sample values to real-world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RescaleParams {
    pub slope: f64,
    pub intercept: f64,
}

impl RescaleParams {
    #[must_use]
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    #[inline(always)]
    #[must_use]
    // Hot path: called for every pixel during calibration and compositing
    pub fn apply(&self, sample: f64) -> f64 {
        sample.mul_add(self.slope, self.intercept)
    }
}

impl Default for RescaleParams {
    fn default() -> Self {
        Self {
            slope: 1.0,
            intercept: 0.0,
        }
    }
}

impl fmt::Display for RescaleParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "slope={slope}, intercept={intercept}",
            slope = self.slope,
            intercept = self.intercept
        )
    }
}

/// Bit layout of each stored sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitDepth {
    pub allocated: u16,
    pub stored: u16,
    pub high_bit: u16,
}

impl BitDepth {
    /// Bit depth with the conventional high bit (`stored - 1`)
    #[must_use]
    pub fn new(allocated: u16, stored: u16) -> Self {
        Self {
            allocated,
            stored,
            high_bit: stored.saturating_sub(1),
        }
    }

    #[must_use]
    pub fn with_high_bit(self, high_bit: u16) -> Self {
        Self { high_bit, ..self }
    }

    #[inline]
    #[must_use]
    pub fn bytes_per_sample(&self) -> usize {
        usize::from(self.allocated / 8)
    }

    /// Stored bits fit inside the allocated width, ending at the high bit
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.stored > 0
            && self.stored <= self.allocated
            && self.high_bit < self.allocated
            && self.high_bit + 1 >= self.stored
    }
}

impl fmt::Display for BitDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{stored}/{allocated} bits (high bit {high_bit})",
            stored = self.stored,
            allocated = self.allocated,
            high_bit = self.high_bit
        )
    }
}

/// Pixel Representation (0028,0103)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelRepresentation {
    #[default]
    Unsigned,
    Signed,
}

impl PixelRepresentation {
    #[must_use]
    pub fn from_code(code: u16) -> Self {
        if code == 0 { Self::Unsigned } else { Self::Signed }
    }

    #[inline]
    #[must_use]
    pub fn is_signed(&self) -> bool {
        matches!(self, Self::Signed)
    }
}

impl fmt::Display for PixelRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsigned => write!(f, "unsigned"),
            Self::Signed => write!(f, "signed"),
        }
    }
}

/// Caller-owned render parameters, supplied fresh on every render call.
///
/// `window_width` is validated at render time; a non-positive width fails that
/// call with `InvalidWindow`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub scale: f64,
    pub rotation_degrees: f64,
    pub window_center: f64,
    pub window_width: f64,
}

impl ViewState {
    #[must_use]
    pub fn new(scale: f64, rotation_degrees: f64, window_center: f64, window_width: f64) -> Self {
        Self {
            scale,
            rotation_degrees,
            window_center,
            window_width,
        }
    }

    #[must_use]
    pub fn with_scale(self, scale: f64) -> Self {
        Self { scale, ..self }
    }

    #[must_use]
    pub fn with_rotation(self, rotation_degrees: f64) -> Self {
        Self {
            rotation_degrees,
            ..self
        }
    }

    #[must_use]
    pub fn with_window(self, window_center: f64, window_width: f64) -> Self {
        Self {
            window_center,
            window_width,
            ..self
        }
    }
}
