use crate::dicom::PhotometricInterpretation;
use crate::error::{Error, Result};
use crate::types::{BitDepth, Dimensions};

#[inline]
pub fn validate_grayscale(
    photometric_interpretation: &PhotometricInterpretation,
    samples_per_pixel: u16,
) -> Result<()> {
    if !photometric_interpretation.is_grayscale() {
        return Err(Error::UnsupportedEncoding(format!(
            "photometric interpretation {photometric_interpretation} (expected MONOCHROME1 or MONOCHROME2)"
        )));
    }

    if samples_per_pixel != 1 {
        return Err(Error::UnsupportedEncoding(format!(
            "{samples_per_pixel} samples per pixel for {photometric_interpretation}"
        )));
    }

    Ok(())
}

#[inline]
pub fn validate_bits_allocated(bits_allocated: u16) -> Result<()> {
    if !matches!(bits_allocated, 8 | 16) {
        return Err(Error::UnsupportedEncoding(format!(
            "{bits_allocated} bits allocated (expected 8 or 16)"
        )));
    }

    Ok(())
}

#[inline]
pub fn validate_dimensions(dimensions: Dimensions) -> Result<()> {
    if !dimensions.is_valid() {
        return Err(Error::InvalidPixelData(format!("empty image dimensions {dimensions}")));
    }

    Ok(())
}

pub fn validate_metadata(
    photometric_interpretation: &PhotometricInterpretation,
    samples_per_pixel: u16,
    dimensions: Dimensions,
    bit_depth: BitDepth,
) -> Result<()> {
    validate_grayscale(photometric_interpretation, samples_per_pixel)?;
    validate_bits_allocated(bit_depth.allocated)?;
    validate_dimensions(dimensions)?;
    Ok(())
}
