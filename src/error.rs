//! Error types for decoding and rendering

use crate::dicom::ElementTag;
use thiserror::Error;

/// Failures raised by the decode and render pipeline.
///
/// Every variant is fatal for the call that produced it. `InvalidWindow` and
/// `SurfaceTooLarge` only invalidate the render call, never the decoded image.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The buffer does not follow the container framing
    #[error("Malformed DICOM container: {0}")]
    MalformedContainer(String),

    /// A required element is absent from the dataset
    #[error("Missing required element {0}")]
    MissingElement(ElementTag),

    /// The pixel encoding or transfer syntax is not supported
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// Pixel bytes disagree with the declared encoding
    #[error("Invalid pixel data: {0}")]
    InvalidPixelData(String),

    /// Window width must be positive and finite
    #[error("Invalid window: width {width} (center {center}) must be positive")]
    InvalidWindow { center: f64, width: f64 },

    /// The scaled surface would not fit in memory
    #[error("Surface of {width}x{height} pixels is too large to render")]
    SurfaceTooLarge { width: f64, height: f64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error type for the command line front end, tagged with the failing stage
#[derive(Debug, Error)]
pub enum ProcessError {
    /// File could not be read from disk
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Buffer could not be decoded into an image
    #[error("{0}")]
    DecodeFailed(#[from] Error),

    /// Image decoded, but the requested view could not be rendered
    #[error("{0}")]
    RenderFailed(Error),

    /// Surface ready but presenting it failed
    #[error("{0}")]
    DisplayFailed(String),
}
