//! Raster compositing: windowed RGBA at native size, then scale, then rotate

use super::window::Window;
use crate::dicom::ImageDescriptor;
use crate::error::{Error, Result};
use crate::types::ViewState;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Largest RGBA surface `composite` will allocate (a 16384x16384 raster)
pub const MAX_SURFACE_BYTES: u64 = 1 << 30;

/// An RGBA raster ready to be drawn by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySurface {
    image: RgbaImage,
}

impl DisplaySurface {
    /// A 0x0 surface, produced when the scaled size collapses
    #[must_use]
    pub fn empty() -> Self {
        Self {
            image: RgbaImage::new(0, 0),
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.image.width() == 0 || self.image.height() == 0
    }

    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Row-major RGBA bytes
    #[must_use]
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    #[must_use]
    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    #[must_use]
    pub fn to_dynamic_image(&self) -> DynamicImage {
        DynamicImage::ImageRgba8(self.image.clone())
    }
}

/// Render `descriptor` under `view`.
///
/// Every sample is calibrated, windowed and written as opaque gray at native
/// resolution; the raster is then scaled to `floor(width * scale) x
/// floor(height * scale)` and rotated about its own centre.
///
/// # Errors
///
/// `InvalidWindow` when the view's window width is not positive, and
/// `SurfaceTooLarge` when the scaled raster would exceed [`MAX_SURFACE_BYTES`].
pub fn composite(descriptor: &ImageDescriptor, view: &ViewState) -> Result<DisplaySurface> {
    let window = Window::new(view.window_center, view.window_width)?;

    let Some((width, height)) = scaled_size(descriptor.width(), descriptor.height(), view.scale)? else {
        return Ok(DisplaySurface::empty());
    };

    let native = native_raster(descriptor, &window)?;
    let scaled = scale_raster(native, width, height);
    let image = rotate_about_center(scaled, view.rotation_degrees);

    Ok(DisplaySurface { image })
}

/// Output size for `scale`, or `None` if either side would be empty
fn scaled_size(width: u32, height: u32, scale: f64) -> Result<Option<(u32, u32)>> {
    if !scale.is_finite() {
        return Ok(None);
    }
    let w = (f64::from(width) * scale).floor();
    let h = (f64::from(height) * scale).floor();
    if !(w >= 1.0 && h >= 1.0) {
        return Ok(None);
    }

    let too_large = || Error::SurfaceTooLarge { width: w, height: h };
    if w > f64::from(u32::MAX) || h > f64::from(u32::MAX) {
        return Err(too_large());
    }
    let (w_px, h_px) = (w as u32, h as u32);
    let bytes = u64::from(w_px)
        .checked_mul(u64::from(h_px))
        .and_then(|pixels| pixels.checked_mul(4));
    match bytes {
        Some(bytes) if bytes <= MAX_SURFACE_BYTES => Ok(Some((w_px, h_px))),
        _ => Err(too_large()),
    }
}

fn native_raster(descriptor: &ImageDescriptor, window: &Window) -> Result<RgbaImage> {
    let rescale = descriptor.rescale();
    let invert = descriptor.photometric_interpretation().should_invert();

    let mut rgba = Vec::with_capacity(descriptor.samples().len() * 4);
    for sample in descriptor.samples().values() {
        let gray = window.map(rescale.apply(sample));
        let gray = if invert { 255 - gray } else { gray };
        rgba.extend_from_slice(&[gray, gray, gray, 255]);
    }

    RgbaImage::from_raw(descriptor.width(), descriptor.height(), rgba).ok_or_else(|| {
        Error::InvalidPixelData(format!(
            "{} samples do not fill a {} image",
            descriptor.samples().len(),
            descriptor.dimensions()
        ))
    })
}

fn scale_raster(native: RgbaImage, width: u32, height: u32) -> RgbaImage {
    if native.dimensions() == (width, height) {
        return native;
    }
    imageops::resize(&native, width, height, FilterType::Nearest)
}

/// Sine and cosine, exact for quarter turns
fn sin_cos_degrees(degrees: f64) -> (f64, f64) {
    if degrees == 90.0 {
        (1.0, 0.0)
    } else if degrees == 180.0 {
        (0.0, -1.0)
    } else if degrees == 270.0 {
        (-1.0, 0.0)
    } else {
        degrees.to_radians().sin_cos()
    }
}

/// Rotate clockwise by `degrees` about the centre, keeping the same size.
///
/// Each output pixel centre is mapped back into the source; pixels that land
/// outside it are transparent.
fn rotate_about_center(source: RgbaImage, degrees: f64) -> RgbaImage {
    let turn = degrees.rem_euclid(360.0);
    if turn == 0.0 || !turn.is_finite() {
        return source;
    }

    let (sin, cos) = sin_cos_degrees(turn);
    let (width, height) = source.dimensions();
    let (w, h) = (f64::from(width), f64::from(height));
    let (cx, cy) = (w / 2.0, h / 2.0);

    RgbaImage::from_fn(width, height, |x, y| {
        let dx = f64::from(x) + 0.5 - cx;
        let dy = f64::from(y) + 0.5 - cy;
        let sx = cos.mul_add(dx, sin * dy) + cx;
        let sy = cos.mul_add(dy, -sin * dx) + cy;
        if sx >= 0.0 && sy >= 0.0 && sx < w && sy < h {
            *source.get_pixel(sx.floor() as u32, sy.floor() as u32)
        } else {
            TRANSPARENT
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dicom::SampleArray;
    use crate::types::{BitDepth, Dimensions, PixelRepresentation, RescaleParams};
    use crate::dicom::PhotometricInterpretation;
    use assert_matches::assert_matches;

    fn descriptor(rows: u16, cols: u16, samples: Vec<u16>, rescale: RescaleParams) -> ImageDescriptor {
        ImageDescriptor::new(
            Dimensions::new(rows, cols),
            BitDepth::new(16, 16),
            PixelRepresentation::Unsigned,
            rescale,
            SampleArray::U16(samples),
        )
        .expect("descriptor")
    }

    /// 3 rows x 4 columns with distinct values
    fn ramp() -> ImageDescriptor {
        descriptor(3, 4, (0..12).map(|v| v * 20).collect(), RescaleParams::new(2.0, 5.0))
    }

    #[test]
    fn test_native_pixels_match_window_mapping() {
        let image = ramp();
        let view = ViewState::initial(&image);
        let surface = composite(&image, &view).unwrap();
        let window = Window::new(view.window_center, view.window_width).unwrap();

        assert_eq!((surface.width(), surface.height()), (4, 3));
        for y in 0..3u32 {
            for x in 0..4u32 {
                let sample = image.samples().get((y * 4 + x) as usize).unwrap();
                let gray = window.map(image.rescale().apply(sample));
                assert_eq!(surface.pixel(x, y), Some([gray, gray, gray, 255]), "pixel ({x},{y})");
            }
        }
        assert_eq!(surface.pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(surface.pixel(3, 2), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_composite_is_deterministic() {
        let image = ramp();
        let view = ViewState::initial(&image).with_scale(1.7).with_rotation(33.0);
        let first = composite(&image, &view).unwrap();
        let second = composite(&image, &view).unwrap();
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn test_scaled_size_is_floored() {
        let image = ramp();
        let view = ViewState::initial(&image).with_scale(2.6);
        let surface = composite(&image, &view).unwrap();
        assert_eq!((surface.width(), surface.height()), (10, 7));

        let view = view.with_scale(0.5);
        let surface = composite(&image, &view).unwrap();
        assert_eq!((surface.width(), surface.height()), (2, 1));
    }

    #[test]
    fn test_collapsed_scale_gives_empty_surface() {
        let image = ramp();
        for scale in [0.0, -1.0, 0.2, f64::NAN, f64::INFINITY] {
            let surface = composite(&image, &ViewState::initial(&image).with_scale(scale)).unwrap();
            assert!(surface.is_empty(), "scale {scale}");
        }
    }

    #[test]
    fn test_oversized_scale_is_rejected_before_allocating() {
        let image = descriptor(2, 2, vec![0, 1, 2, 3], RescaleParams::default());
        let view = ViewState::initial(&image);

        assert_matches!(
            composite(&image, &view.with_scale(1e10)),
            Err(Error::SurfaceTooLarge { width, height }) if width == 2e10 && height == 2e10
        );
        // 16385 x 16385 RGBA is just over the limit
        assert_matches!(
            composite(&image, &view.with_scale(8192.5)),
            Err(Error::SurfaceTooLarge { .. })
        );
        assert_eq!(scaled_size(2, 2, 8192.0).unwrap(), Some((16384, 16384)));
    }

    #[test]
    fn test_integer_upscale_replicates_pixels() {
        let image = descriptor(1, 2, vec![0, 100], RescaleParams::default());
        let surface = composite(&image, &ViewState::initial(&image).with_scale(2.0)).unwrap();
        assert_eq!((surface.width(), surface.height()), (4, 2));
        for y in 0..2 {
            assert_eq!(surface.pixel(0, y), Some([0, 0, 0, 255]));
            assert_eq!(surface.pixel(1, y), Some([0, 0, 0, 255]));
            assert_eq!(surface.pixel(2, y), Some([255, 255, 255, 255]));
            assert_eq!(surface.pixel(3, y), Some([255, 255, 255, 255]));
        }
    }

    #[test]
    fn test_half_turn_mirrors_both_axes() {
        let image = ramp();
        let upright = composite(&image, &ViewState::initial(&image)).unwrap();
        let turned = composite(&image, &ViewState::initial(&image).with_rotation(180.0)).unwrap();
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(turned.pixel(x, y), upright.pixel(3 - x, 2 - y));
            }
        }
    }

    #[test]
    fn test_quarter_turn_is_clockwise() {
        let image = descriptor(2, 2, vec![0, 100, 200, 300], RescaleParams::default());
        let upright = composite(&image, &ViewState::initial(&image)).unwrap();
        let turned = composite(&image, &ViewState::initial(&image).with_rotation(90.0)).unwrap();
        // bottom-left moves to top-left
        assert_eq!(turned.pixel(0, 0), upright.pixel(0, 1));
        assert_eq!(turned.pixel(1, 0), upright.pixel(0, 0));
        assert_eq!(turned.pixel(1, 1), upright.pixel(1, 0));
        assert_eq!(turned.pixel(0, 1), upright.pixel(1, 1));
    }

    #[test]
    fn test_full_turn_is_identity() {
        let image = ramp();
        let upright = composite(&image, &ViewState::initial(&image)).unwrap();
        for rotation in [360.0, -360.0, 720.0] {
            let turned = composite(&image, &ViewState::initial(&image).with_rotation(rotation)).unwrap();
            assert_eq!(turned, upright);
        }
    }

    #[test]
    fn test_rotation_clips_corners_to_transparent() {
        let image = descriptor(8, 8, vec![100; 64], RescaleParams::default());
        let surface = composite(&image, &ViewState::initial(&image).with_rotation(45.0)).unwrap();
        assert_eq!((surface.width(), surface.height()), (8, 8));
        assert_eq!(surface.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(4, 4).map(|p| p[3]), Some(255));
    }

    #[test]
    fn test_rotation_applies_after_scaling() {
        let image = descriptor(1, 2, vec![0, 100], RescaleParams::default());
        let view = ViewState::initial(&image).with_scale(2.0).with_rotation(90.0);
        let surface = composite(&image, &view).unwrap();
        // The scaled 4x2 surface keeps its size; a quarter turn leaves the
        // band outside the rotated footprint transparent
        assert_eq!((surface.width(), surface.height()), (4, 2));
        assert_eq!(surface.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(1, 0).map(|p| p[3]), Some(255));
    }

    #[test]
    fn test_invalid_window_is_rejected() {
        let image = ramp();
        for width in [0.0, -10.0] {
            let view = ViewState::initial(&image).with_window(100.0, width);
            assert_matches!(composite(&image, &view), Err(Error::InvalidWindow { .. }));
        }
        // The descriptor stays usable afterwards
        assert!(composite(&image, &ViewState::initial(&image)).is_ok());
    }

    #[test]
    fn test_constant_image_renders_mid_gray() {
        let image = descriptor(2, 2, vec![50; 4], RescaleParams::default());
        let surface = composite(&image, &ViewState::initial(&image)).unwrap();
        for chunk in surface.as_raw().chunks_exact(4) {
            assert_eq!(chunk, &[128, 128, 128, 255]);
        }
    }

    #[test]
    fn test_monochrome1_is_inverted() {
        let image = descriptor(1, 2, vec![0, 100], RescaleParams::default())
            .with_photometric_interpretation(PhotometricInterpretation::Monochrome1);
        let surface = composite(&image, &ViewState::initial(&image)).unwrap();
        assert_eq!(surface.pixel(0, 0), Some([255, 255, 255, 255]));
        assert_eq!(surface.pixel(1, 0), Some([0, 0, 0, 255]));
    }
}
