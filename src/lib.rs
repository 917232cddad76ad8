pub mod cli;
pub mod dicom;
pub mod error;
pub mod image;
pub mod display;
pub mod display_metadata;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export the decode/render boundary
pub use crate::dicom::{decode, ImageDescriptor};
pub use display_metadata::{print_dataset_info, print_metadata};
pub use error::{Error, Result};
pub use crate::image::{render, DisplaySurface};
pub use types::ViewState;
