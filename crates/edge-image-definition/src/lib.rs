// crates/edge-image-definition/src/lib.rs
// ============================================================================
// Module: Edge Image Definition Library
// Description: Canonical image definition model and schema version handling.
// Purpose: Single source of truth for image definition document shapes.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! `edge-image-definition` defines the typed configuration document consumed by
//! the edge image build pipeline. Documents are decoded with unknown-field
//! rejection and are never mutated after decoding. Two front ends share the
//! same records: the full [`ImageDefinition`] and the reduced
//! [`ConfigDriveDefinition`], which has no `image` section.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod definition;
pub mod image;
pub mod kubernetes;
pub mod operating_system;
pub mod registry;
pub mod version;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use definition::*;
pub use image::*;
pub use kubernetes::*;
pub use operating_system::*;
pub use registry::*;
pub use version::*;
