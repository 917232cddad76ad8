use clap::Parser;
use std::path::PathBuf;

/// Decode DICOM images and render them with windowing, zoom and rotation
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// DICOM file path(s) to render
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Zoom factor applied to the native resolution
    #[arg(short, long, default_value_t = 1.0)]
    pub scale: f64,

    /// Clockwise rotation in degrees, applied after scaling
    #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub rotate: f64,

    /// Window center in rescaled units (defaults to the file's window or the intensity range)
    #[arg(long, requires = "window_width", allow_negative_numbers = true)]
    pub window_center: Option<f64>,

    /// Window width in rescaled units
    #[arg(long, requires = "window_center", allow_negative_numbers = true)]
    pub window_width: Option<f64>,

    /// Write PNG files into this directory instead of printing to the terminal
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Output width in terminal columns
    #[arg(short = 'W', long)]
    pub width: Option<u32>,

    /// Output height in terminal rows
    #[arg(short = 'H', long)]
    pub height: Option<u32>,

    /// Show DICOM metadata
    #[arg(short, long)]
    pub verbose: bool,
}
