//! The decoded image and its descriptive metadata

use super::parser::ElementCatalog;
use super::photometric::PhotometricInterpretation;
use super::pixel_data::SampleArray;
use super::tags::ElementTag;
use crate::error::{Error, Result};
use crate::image::{calibrate, Window};
use crate::types::{
    BitDepth, Dimensions, PixelRepresentation, RescaleParams, SOPClass, TransferSyntax, ViewState,
};
use dicom::core::dictionary::UidDictionary;
use dicom::dictionary_std::sop_class;

/// Descriptive fields carried along for display; none affect rendering
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DatasetInfo {
    pub sop_class: Option<SOPClass>,
    /// Always set by `decode`; `None` only for a descriptor assembled with
    /// [`ImageDescriptor::new`] that never saw a container
    pub transfer_syntax: Option<TransferSyntax>,
    pub modality: Option<String>,
    pub patient_name: Option<String>,
    pub patient_id: Option<String>,
    pub study_date: Option<String>,
    pub study_description: Option<String>,
    pub series_description: Option<String>,
}

impl DatasetInfo {
    #[must_use]
    pub fn from_catalog(catalog: &ElementCatalog<'_>) -> Self {
        let sop_class = catalog.read_string(ElementTag::SopClassUid).map(|uid| {
            let name = sop_class::StandardSopClassDictionary
                .by_uid(&uid)
                .map_or_else(|| "Unknown".to_string(), |entry| entry.name.to_string());
            SOPClass { uid, name }
        });

        Self {
            sop_class,
            transfer_syntax: Some(catalog.transfer_syntax().clone()),
            modality: catalog.read_string(ElementTag::Modality),
            patient_name: catalog.read_string(ElementTag::PatientName),
            patient_id: catalog.read_string(ElementTag::PatientId),
            study_date: catalog.read_string(ElementTag::StudyDate),
            study_description: catalog.read_string(ElementTag::StudyDescription),
            series_description: catalog.read_string(ElementTag::SeriesDescription),
        }
    }
}

/// A decoded single-frame grayscale image.
///
/// Immutable once built: `width * height == samples.len()` always holds and
/// the intensity range is computed from the calibrated samples.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDescriptor {
    dimensions: Dimensions,
    bit_depth: BitDepth,
    representation: PixelRepresentation,
    rescale: RescaleParams,
    min_intensity: f64,
    max_intensity: f64,
    samples: SampleArray,
    photometric_interpretation: PhotometricInterpretation,
    declared_window: Option<Window>,
    number_of_frames: u32,
    info: DatasetInfo,
}

impl ImageDescriptor {
    /// # Errors
    ///
    /// `InvalidPixelData` when the sample count does not match the dimensions.
    pub fn new(
        dimensions: Dimensions,
        bit_depth: BitDepth,
        representation: PixelRepresentation,
        rescale: RescaleParams,
        samples: SampleArray,
    ) -> Result<Self> {
        if samples.len() != dimensions.pixel_count() {
            return Err(Error::InvalidPixelData(format!(
                "{} samples for a {dimensions} image",
                samples.len()
            )));
        }

        let calibrated = calibrate(&samples, rescale);

        Ok(Self {
            dimensions,
            bit_depth,
            representation,
            rescale,
            min_intensity: calibrated.min,
            max_intensity: calibrated.max,
            samples,
            photometric_interpretation: PhotometricInterpretation::Monochrome2,
            declared_window: None,
            number_of_frames: 1,
            info: DatasetInfo::default(),
        })
    }

    #[must_use]
    pub fn with_photometric_interpretation(self, photometric_interpretation: PhotometricInterpretation) -> Self {
        Self {
            photometric_interpretation,
            ..self
        }
    }

    #[must_use]
    pub fn with_declared_window(self, declared_window: Option<Window>) -> Self {
        Self {
            declared_window,
            ..self
        }
    }

    #[must_use]
    pub fn with_number_of_frames(self, number_of_frames: u32) -> Self {
        Self {
            number_of_frames,
            ..self
        }
    }

    #[must_use]
    pub fn with_info(self, info: DatasetInfo) -> Self {
        Self { info, ..self }
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.dimensions.width()
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.dimensions.height()
    }

    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    #[must_use]
    pub fn bit_depth(&self) -> BitDepth {
        self.bit_depth
    }

    #[must_use]
    pub fn pixel_representation(&self) -> PixelRepresentation {
        self.representation
    }

    #[must_use]
    pub fn rescale(&self) -> RescaleParams {
        self.rescale
    }

    #[must_use]
    pub fn min_intensity(&self) -> f64 {
        self.min_intensity
    }

    #[must_use]
    pub fn max_intensity(&self) -> f64 {
        self.max_intensity
    }

    #[must_use]
    pub fn samples(&self) -> &SampleArray {
        &self.samples
    }

    #[must_use]
    pub fn photometric_interpretation(&self) -> &PhotometricInterpretation {
        &self.photometric_interpretation
    }

    /// Window stored in the dataset, if it declared a usable one
    #[must_use]
    pub fn declared_window(&self) -> Option<Window> {
        self.declared_window
    }

    /// Window derived from the intensity range
    #[must_use]
    pub fn default_window(&self) -> Window {
        Window::from_range(self.min_intensity, self.max_intensity)
    }

    /// Declared window if present, otherwise the default one
    #[must_use]
    pub fn initial_window(&self) -> Window {
        self.declared_window.unwrap_or_else(|| self.default_window())
    }

    #[must_use]
    pub fn number_of_frames(&self) -> u32 {
        self.number_of_frames
    }

    #[must_use]
    pub fn info(&self) -> &DatasetInfo {
        &self.info
    }
}

impl ViewState {
    /// Unscaled, unrotated view with the image's initial window
    #[must_use]
    pub fn initial(descriptor: &ImageDescriptor) -> Self {
        let window = descriptor.initial_window();
        Self::new(1.0, 0.0, window.center(), window.width())
    }
}
