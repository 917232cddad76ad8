use clap::{CommandFactory, Parser};
use dcmrender::cli::Args;
use dcmrender::error::ProcessError;
use dcmrender::dicom::{DatasetInfo, ElementCatalog};
use dcmrender::{decode, display, render, ViewState};
use log::info;
use std::path::{Path, PathBuf};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    if args.files.is_empty() {
        let _ = Args::command().print_help();
        println!();
        return;
    }

    let multiple_files = args.files.len() > 1;
    let mut any_failed = false;

    for (idx, file_path) in args.files.iter().enumerate() {
        if multiple_files {
            println!("{}", file_path.display());
        }

        if let Err(e) = process_file(file_path, &args) {
            println!("Error: {e}");
            any_failed = true;
        }

        if multiple_files && idx < args.files.len() - 1 {
            println!();
        }
    }

    if any_failed {
        std::process::exit(1);
    }
}

/// Process a single DICOM file
fn process_file(file_path: &Path, args: &Args) -> Result<(), ProcessError> {
    // Stage 1: Read the whole file into memory
    let buffer = std::fs::read(file_path).map_err(|source| ProcessError::ReadFailed {
        path: file_path.display().to_string(),
        source,
    })?;

    // Stage 2: Decode, the buffer is not needed afterwards
    let image = match decode(&buffer) {
        Ok(image) => image,
        Err(e) => {
            // Decoding failed - show whatever metadata the container still yields
            if args.verbose
                && let Ok(catalog) = ElementCatalog::parse(&buffer)
            {
                dcmrender::print_dataset_info(&DatasetInfo::from_catalog(&catalog));
            }
            return Err(ProcessError::DecodeFailed(e));
        }
    };
    drop(buffer);

    // Stage 3: Verbose output
    if args.verbose {
        dcmrender::print_metadata(&image);
    }

    // Stage 4: Render the requested view
    let view = view_state(&image, args);
    let surface = render(&image, &view).map_err(ProcessError::RenderFailed)?;

    // Stage 5: Write or display
    let presented = match &args.output {
        Some(dir) => {
            let path = output_path(dir, file_path);
            info!("writing {}", path.display());
            display::write_png(&surface, &path)
        }
        None => display::print_surface(&surface, args),
    };
    presented.map_err(|e| ProcessError::DisplayFailed(format!("{e:#}")))?;

    Ok(())
}

fn view_state(image: &dcmrender::ImageDescriptor, args: &Args) -> ViewState {
    let initial = ViewState::initial(image);
    let view = initial.with_scale(args.scale).with_rotation(args.rotate);
    match (args.window_center, args.window_width) {
        (Some(center), Some(width)) => view.with_window(center, width),
        _ => view,
    }
}

fn output_path(dir: &Path, file_path: &Path) -> PathBuf {
    let stem = file_path
        .file_stem()
        .map_or_else(|| "image".into(), |s| s.to_string_lossy().into_owned());
    dir.join(format!("{stem}.png"))
}
