// crates/edge-image-validation/src/image.rs
// ============================================================================
// Module: Image Validation
// Description: Rules for the image section.
// Purpose: Ensure the build knows what to customize and what to produce.
// Dependencies: edge-image-definition, tracing
// ============================================================================

//! ## Overview
//! The image section is checked only when it is populated or when the
//! operating system declares ISO- or raw-specific options, so an empty
//! document stays valid. The base image must exist under the base images
//! directory of the image configuration root.

// ============================================================================
// SECTION: Imports
// ============================================================================

use edge_image_definition::Image;
use edge_image_definition::OperatingSystem;
use edge_image_definition::VALID_ARCHES;
use edge_image_definition::VALID_IMAGE_TYPES;

use crate::failure::Failure;
use crate::layout::ImageConfigLayout;
use crate::probe::FileProbe;

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates the image section.
#[must_use]
pub fn validate_image(
    image: &Image,
    os: &OperatingSystem,
    layout: &ImageConfigLayout,
    probe: &dyn FileProbe,
) -> Vec<Failure> {
    let mut failures = Vec::new();
    if !image.is_populated() && !os.has_image_type_configuration() {
        return failures;
    }

    if image.image_type.is_empty() {
        failures.push(Failure::new("The 'imageType' field is required in the 'image' section."));
    } else if !VALID_IMAGE_TYPES.contains(&image.image_type.as_str()) {
        failures.push(Failure::new(format!(
            "The 'imageType' field must be one of: {}",
            VALID_IMAGE_TYPES.join(", ")
        )));
    }

    if image.arch.is_empty() {
        failures.push(Failure::new("The 'arch' field is required in the 'image' section."));
    } else if !VALID_ARCHES.contains(&image.arch.as_str()) {
        failures
            .push(Failure::new(format!("The 'arch' field must be one of: {}", VALID_ARCHES.join(", "))));
    }

    if image.base_image.is_empty() {
        failures.push(Failure::new("The 'baseImage' field is required in the 'image' section."));
    } else {
        failures.extend(validate_base_image(&image.base_image, layout, probe));
    }

    if image.output_image_name.is_empty() {
        failures
            .push(Failure::new("The 'outputImageName' field is required in the 'image' section."));
    }
    failures
}

/// Checks that the base image exists.
fn validate_base_image(
    name: &str,
    layout: &ImageConfigLayout,
    probe: &dyn FileProbe,
) -> Option<Failure> {
    let path = layout.base_image(name);
    match probe.exists(&path) {
        Ok(true) => None,
        Ok(false) => Some(Failure::new(format!("The specified base image '{name}' cannot be found."))),
        Err(err) => {
            tracing::error!(path = %path.display(), error = %err, "base image could not be probed");
            Some(Failure::with_cause(format!("The specified base image '{name}' cannot be read."), err))
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test fixtures use unwraps for clarity.")]

    use std::fs;

    use super::*;
    use crate::probe::FsProbe;

    fn messages(failures: &[Failure]) -> Vec<&str> {
        failures.iter().map(Failure::user_message).collect()
    }

    #[test]
    fn empty_image_is_not_checked() {
        let layout = ImageConfigLayout::new("/nonexistent");
        let failures =
            validate_image(&Image::default(), &OperatingSystem::default(), &layout, &FsProbe);
        assert!(failures.is_empty());
    }

    #[test]
    fn raw_options_require_an_image_section() {
        let layout = ImageConfigLayout::new("/nonexistent");
        let mut os = OperatingSystem::default();
        os.raw_configuration.luks_key = "1234".to_string();
        let failures = validate_image(&Image::default(), &os, &layout, &FsProbe);
        assert_eq!(
            messages(&failures),
            [
                "The 'imageType' field is required in the 'image' section.",
                "The 'arch' field is required in the 'image' section.",
                "The 'baseImage' field is required in the 'image' section.",
                "The 'outputImageName' field is required in the 'image' section.",
            ]
        );
    }

    #[test]
    fn unsupported_values_and_missing_base_image() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ImageConfigLayout::new(dir.path());
        let image = Image {
            image_type: "qcow2".to_string(),
            arch: "riscv64".to_string(),
            base_image: "missing.raw".to_string(),
            output_image_name: "out.raw".to_string(),
        };
        let failures = validate_image(&image, &OperatingSystem::default(), &layout, &FsProbe);
        assert_eq!(
            messages(&failures),
            [
                "The 'imageType' field must be one of: iso, raw",
                "The 'arch' field must be one of: x86_64, aarch64",
                "The specified base image 'missing.raw' cannot be found.",
            ]
        );
    }

    #[test]
    fn present_base_image_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ImageConfigLayout::new(dir.path());
        fs::create_dir_all(layout.base_images_dir()).unwrap();
        fs::write(layout.base_image("sl.raw"), b"").unwrap();
        let image = Image {
            image_type: "raw".to_string(),
            arch: "aarch64".to_string(),
            base_image: "sl.raw".to_string(),
            output_image_name: "out.raw".to_string(),
        };
        assert!(validate_image(&image, &OperatingSystem::default(), &layout, &FsProbe).is_empty());
    }
}
