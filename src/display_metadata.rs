use crate::dicom::{DatasetInfo, ImageDescriptor};

pub fn print_metadata(image: &ImageDescriptor) {
    let info = image.info();
    print_descriptive_fields(info);

    print_dimensions(image);
    println!("{:20}: {}", "Bit Depth", image.bit_depth());
    println!("{:20}: {}", "Rescale", image.rescale());
    println!(
        "{:20}: {} .. {}",
        "Intensity Range",
        image.min_intensity(),
        image.max_intensity()
    );
    print_window(image);

    print_identifiers(info);
    println!();
}

/// Print what is known about a dataset whose image could not be decoded
pub fn print_dataset_info(info: &DatasetInfo) {
    print_descriptive_fields(info);
    print_identifiers(info);
    println!();
}

fn print_descriptive_fields(info: &DatasetInfo) {
    print_field("Patient Name", info.patient_name.as_ref());
    print_field("Patient ID", info.patient_id.as_ref());

    print_field("Study Date", info.study_date.as_ref());
    print_field("Study Description", info.study_description.as_ref());
    print_field("Modality", info.modality.as_ref());

    print_field("Series Description", info.series_description.as_ref());
}

fn print_identifiers(info: &DatasetInfo) {
    if let Some(sop_class) = &info.sop_class {
        println!("{:20}: {}", "SOP Class UID", sop_class);
    }
    if let Some(transfer_syntax) = &info.transfer_syntax {
        println!("{:20}: {}", "Transfer Syntax", transfer_syntax);
    }
}

fn print_field(name: &str, value: Option<&String>) {
    if let Some(v) = value {
        println!("{name:20}: {v}");
    }
}

fn print_dimensions(image: &ImageDescriptor) {
    let frames = if image.number_of_frames() > 1 {
        format!(", frame 1 of {}", image.number_of_frames())
    } else {
        String::new()
    };
    println!(
        "{:20}: {} [{}, {}{}]",
        "Dimensions",
        image.dimensions(),
        image.photometric_interpretation(),
        image.pixel_representation(),
        frames
    );
}

fn print_window(image: &ImageDescriptor) {
    match image.declared_window() {
        Some(window) => println!("{:20}: {} (declared)", "Window", window),
        None => println!("{:20}: {} (from range)", "Window", image.default_window()),
    }
}
