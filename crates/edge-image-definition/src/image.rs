// crates/edge-image-definition/src/image.rs
// ============================================================================
// Module: Image Section
// Description: Image identity records (type, architecture, base, output).
// Purpose: Describe which base image is customized and what is produced.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The `image` section names the base image, its architecture, and the type of
//! artifact to produce. Values are kept as decoded strings so that validation
//! can report unsupported values instead of failing at decode time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Self-installing ISO image type.
pub const IMAGE_TYPE_ISO: &str = "iso";
/// Raw disk image type.
pub const IMAGE_TYPE_RAW: &str = "raw";
/// Supported image types, in display order.
pub const VALID_IMAGE_TYPES: &[&str] = &[IMAGE_TYPE_ISO, IMAGE_TYPE_RAW];

/// 64-bit x86 architecture.
pub const ARCH_X86_64: &str = "x86_64";
/// 64-bit ARM architecture.
pub const ARCH_AARCH64: &str = "aarch64";
/// Supported architectures, in display order.
pub const VALID_ARCHES: &[&str] = &[ARCH_X86_64, ARCH_AARCH64];

// ============================================================================
// SECTION: Image
// ============================================================================

/// Image identity section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Image {
    /// Output image type (`iso` or `raw`).
    pub image_type: String,
    /// Target architecture.
    pub arch: String,
    /// Base image file name, relative to the `base-images` directory.
    pub base_image: String,
    /// File name of the built image.
    pub output_image_name: String,
}

impl Image {
    /// Returns true when any field of the section is set.
    #[must_use]
    pub fn is_populated(&self) -> bool {
        !self.image_type.is_empty()
            || !self.arch.is_empty()
            || !self.base_image.is_empty()
            || !self.output_image_name.is_empty()
    }

    /// Returns true when the image type is `iso`.
    #[must_use]
    pub fn is_iso(&self) -> bool {
        self.image_type == IMAGE_TYPE_ISO
    }

    /// Returns true when the image type is `raw`.
    #[must_use]
    pub fn is_raw(&self) -> bool {
        self.image_type == IMAGE_TYPE_RAW
    }
}

/// Maps an architecture to the short name used by container and Helm tooling.
///
/// Returns `None` for architectures outside [`VALID_ARCHES`].
#[must_use]
pub fn arch_short_name(arch: &str) -> Option<&'static str> {
    match arch {
        ARCH_X86_64 => Some("amd64"),
        ARCH_AARCH64 => Some("arm64"),
        _ => None,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
