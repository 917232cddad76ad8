mod calibration;
mod compositor;
mod window;

pub use calibration::{calibrate, intensity_range, Calibrated, SCAN_CHUNK};
pub use compositor::{composite, DisplaySurface, MAX_SURFACE_BYTES};
pub use window::{map_to_display, Window};

use crate::dicom::ImageDescriptor;
use crate::error::Result;
use crate::types::ViewState;
use log::debug;

/// Render a decoded image for display
///
/// # Errors
///
/// Returns `InvalidWindow` if the view's window width is not positive and
/// `SurfaceTooLarge` if the scale asks for an unreasonably large raster. The
/// descriptor remains valid for further render calls.
pub fn render(descriptor: &ImageDescriptor, view: &ViewState) -> Result<DisplaySurface> {
    let surface = composite(descriptor, view)?;
    debug!(
        "rendered {}x{} image to {}x{} (scale {}, rotation {} deg, window C={} W={})",
        descriptor.width(),
        descriptor.height(),
        surface.width(),
        surface.height(),
        view.scale,
        view.rotation_degrees,
        view.window_center,
        view.window_width
    );
    Ok(surface)
}
