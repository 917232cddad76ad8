use crate::cli::Args;
use crate::image::DisplaySurface;
use anyhow::{anyhow, bail, Context, Result};
use image::ImageFormat;
use std::io::{IsTerminal, Write};
use std::path::Path;
use viuer::{print, Config as ViuerConfig};

pub fn print_surface(surface: &DisplaySurface, args: &Args) -> Result<()> {
    if surface.is_empty() {
        bail!("Nothing to display: rendered surface is empty");
    }

    let is_tty = std::io::stdout().is_terminal();

    let (config_width, config_height) = match (args.width, args.height) {
        (Some(w), ..) => (Some(w), None),
        (None, Some(h)) => (None, Some(h)),
        (None, None) => (Some(24), None),
    };

    let config = ViuerConfig {
        width: config_width,
        height: config_height,
        absolute_offset: false,
        transparent: true,
        use_kitty: is_tty,
        use_iterm: is_tty,
        use_sixel: is_tty,
        ..Default::default()
    };

    std::io::stdout().flush()
        .map_err(|e| anyhow!("Failed to flush stdout: {e}"))?;

    print(&surface.to_dynamic_image(), &config)
        .map_err(|e| anyhow!("Failed to display image: {e}"))?;

    Ok(())
}

/// Save the surface as a PNG file
pub fn write_png(surface: &DisplaySurface, path: &Path) -> Result<()> {
    if surface.is_empty() {
        bail!("Nothing to write: rendered surface is empty");
    }

    surface
        .as_image()
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", path.display()))
}
