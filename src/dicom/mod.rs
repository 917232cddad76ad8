//! DICOM container parsing and image decoding
//!
//! This module turns a Part-10 byte buffer into an [`ImageDescriptor`]: it
//! walks the container, extracts the first frame's samples and computes the
//! calibrated intensity range.

mod descriptor;
mod parser;
mod photometric;
mod pixel_data;
mod tags;
mod validation;

// Re-export public API
pub use descriptor::{DatasetInfo, ImageDescriptor};
pub use parser::{ByteRange, ElementCatalog, ElementDescriptor};
pub use photometric::PhotometricInterpretation;
pub use pixel_data::{extract_samples, SampleArray, SampleLayout, Samples};
pub use tags::ElementTag;

use crate::error::{Error, Result};
use crate::image::Window;
use crate::types::{BitDepth, Dimensions, PixelRepresentation, RescaleParams};
use log::{debug, warn};

/// Decode a Part-10 buffer into a single-frame grayscale image.
///
/// The buffer is only borrowed for the duration of the call.
///
/// # Errors
///
/// Structural problems are `MalformedContainer`, absent Rows/Columns/Pixel
/// Data are `MissingElement`, unsupported bit widths, colour models and
/// transfer syntaxes are `UnsupportedEncoding`, and pixel bytes that disagree
/// with the declared layout are `InvalidPixelData`.
pub fn decode(buffer: &[u8]) -> Result<ImageDescriptor> {
    let catalog = ElementCatalog::parse(buffer)?;

    let dimensions = Dimensions::new(
        catalog.read_u16(ElementTag::Rows)?,
        catalog.read_u16(ElementTag::Columns)?,
    );
    let samples_per_pixel = catalog.read_u16_or(ElementTag::SamplesPerPixel, 1)?;
    let photometric_interpretation = catalog
        .read_string(ElementTag::PhotometricInterpretation)
        .map_or(PhotometricInterpretation::Monochrome2, |s| PhotometricInterpretation::from(s.as_str()));

    let bit_depth = read_bit_depth(&catalog)?;
    let representation =
        PixelRepresentation::from_code(catalog.read_u16_or(ElementTag::PixelRepresentation, 0)?);

    validation::validate_metadata(&photometric_interpretation, samples_per_pixel, dimensions, bit_depth)?;

    // Rescale slope and intercept are mostly present for CT and PET
    let rescale = RescaleParams::new(
        catalog.read_float_string(ElementTag::RescaleSlope).unwrap_or(1.0),
        catalog.read_float_string(ElementTag::RescaleIntercept).unwrap_or(0.0),
    );

    let number_of_frames = catalog
        .read_int_string(ElementTag::NumberOfFrames)
        .and_then(|n| u32::try_from(n).ok())
        .filter(|&n| n > 0)
        .unwrap_or(1);

    let range = catalog.read_byte_range(ElementTag::PixelData)?;
    let layout = SampleLayout {
        bit_depth,
        representation,
        endianness: catalog.endianness(),
    };
    let mut samples = extract_samples(buffer, range, &layout)?;

    let pixel_count = dimensions.pixel_count();
    if samples.len() < pixel_count {
        return Err(Error::InvalidPixelData(format!(
            "{} samples for a {dimensions} image",
            samples.len()
        )));
    }
    if samples.len() > pixel_count {
        debug!(
            "keeping the first frame: {pixel_count} of {} samples ({number_of_frames} frames declared)",
            samples.len()
        );
        samples.truncate(pixel_count);
    }

    let descriptor = ImageDescriptor::new(dimensions, bit_depth, representation, rescale, samples)?
        .with_photometric_interpretation(photometric_interpretation)
        .with_declared_window(read_declared_window(&catalog))
        .with_number_of_frames(number_of_frames)
        .with_info(DatasetInfo::from_catalog(&catalog));

    debug!(
        "decoded {dimensions} image, {bit_depth}, {representation}, {rescale}, intensity {}..{}",
        descriptor.min_intensity(),
        descriptor.max_intensity()
    );

    Ok(descriptor)
}

fn read_bit_depth(catalog: &ElementCatalog<'_>) -> Result<BitDepth> {
    // Bits Allocated defaults to 16 when absent
    let allocated = catalog.read_u16_or(ElementTag::BitsAllocated, 16)?;
    let stored = catalog.read_u16_or(ElementTag::BitsStored, allocated)?;
    let high_bit = catalog.read_u16_or(ElementTag::HighBit, stored.saturating_sub(1))?;
    Ok(BitDepth::new(allocated, stored).with_high_bit(high_bit))
}

fn read_declared_window(catalog: &ElementCatalog<'_>) -> Option<Window> {
    let center = catalog.read_float_string(ElementTag::WindowCenter)?;
    let width = catalog.read_float_string(ElementTag::WindowWidth)?;
    match Window::new(center, width) {
        Ok(window) => Some(window),
        Err(e) => {
            warn!("ignoring declared window: {e}");
            None
        }
    }
}
