//! The closed set of data elements the decoder looks up

use dicom::core::Tag;
use dicom::dictionary_std::tags;
use std::fmt;

/// Data elements recorded in the element catalog.
///
/// Anything not listed here is walked over and discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementTag {
    SopClassUid,
    StudyDate,
    Modality,
    StudyDescription,
    SeriesDescription,
    PatientName,
    PatientId,
    SamplesPerPixel,
    PhotometricInterpretation,
    NumberOfFrames,
    Rows,
    Columns,
    BitsAllocated,
    BitsStored,
    HighBit,
    PixelRepresentation,
    WindowCenter,
    WindowWidth,
    RescaleIntercept,
    RescaleSlope,
    PixelData,
}

impl ElementTag {
    pub const ALL: [ElementTag; 21] = [
        Self::SopClassUid,
        Self::StudyDate,
        Self::Modality,
        Self::StudyDescription,
        Self::SeriesDescription,
        Self::PatientName,
        Self::PatientId,
        Self::SamplesPerPixel,
        Self::PhotometricInterpretation,
        Self::NumberOfFrames,
        Self::Rows,
        Self::Columns,
        Self::BitsAllocated,
        Self::BitsStored,
        Self::HighBit,
        Self::PixelRepresentation,
        Self::WindowCenter,
        Self::WindowWidth,
        Self::RescaleIntercept,
        Self::RescaleSlope,
        Self::PixelData,
    ];

    #[must_use]
    pub fn tag(self) -> Tag {
        match self {
            Self::SopClassUid => tags::SOP_CLASS_UID,
            Self::StudyDate => tags::STUDY_DATE,
            Self::Modality => tags::MODALITY,
            Self::StudyDescription => tags::STUDY_DESCRIPTION,
            Self::SeriesDescription => tags::SERIES_DESCRIPTION,
            Self::PatientName => tags::PATIENT_NAME,
            Self::PatientId => tags::PATIENT_ID,
            Self::SamplesPerPixel => tags::SAMPLES_PER_PIXEL,
            Self::PhotometricInterpretation => tags::PHOTOMETRIC_INTERPRETATION,
            Self::NumberOfFrames => tags::NUMBER_OF_FRAMES,
            Self::Rows => tags::ROWS,
            Self::Columns => tags::COLUMNS,
            Self::BitsAllocated => tags::BITS_ALLOCATED,
            Self::BitsStored => tags::BITS_STORED,
            Self::HighBit => tags::HIGH_BIT,
            Self::PixelRepresentation => tags::PIXEL_REPRESENTATION,
            Self::WindowCenter => tags::WINDOW_CENTER,
            Self::WindowWidth => tags::WINDOW_WIDTH,
            Self::RescaleIntercept => tags::RESCALE_INTERCEPT,
            Self::RescaleSlope => tags::RESCALE_SLOPE,
            Self::PixelData => tags::PIXEL_DATA,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::SopClassUid => "SOP Class UID",
            Self::StudyDate => "Study Date",
            Self::Modality => "Modality",
            Self::StudyDescription => "Study Description",
            Self::SeriesDescription => "Series Description",
            Self::PatientName => "Patient Name",
            Self::PatientId => "Patient ID",
            Self::SamplesPerPixel => "Samples per Pixel",
            Self::PhotometricInterpretation => "Photometric Interpretation",
            Self::NumberOfFrames => "Number of Frames",
            Self::Rows => "Rows",
            Self::Columns => "Columns",
            Self::BitsAllocated => "Bits Allocated",
            Self::BitsStored => "Bits Stored",
            Self::HighBit => "High Bit",
            Self::PixelRepresentation => "Pixel Representation",
            Self::WindowCenter => "Window Center",
            Self::WindowWidth => "Window Width",
            Self::RescaleIntercept => "Rescale Intercept",
            Self::RescaleSlope => "Rescale Slope",
            Self::PixelData => "Pixel Data",
        }
    }

    /// Reverse lookup from a raw tag
    #[must_use]
    pub fn from_tag(tag: Tag) -> Option<Self> {
        Self::ALL.into_iter().find(|known| known.tag() == tag)
    }
}

impl fmt::Display for ElementTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = self.tag();
        write!(
            f,
            "{} ({:04X},{:04X})",
            self.name(),
            tag.group(),
            tag.element()
        )
    }
}
