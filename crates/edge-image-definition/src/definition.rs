// crates/edge-image-definition/src/definition.rs
// ============================================================================
// Module: Definition Documents
// Description: Top-level definition documents and their capability traits.
// Purpose: Let validators depend on the sections they read, not on a document.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Two document shapes exist: the full [`ImageDefinition`] and the reduced
//! [`ConfigDriveDefinition`]. Consumers that only need one section depend on
//! the matching capability trait, which both documents implement directly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;

use crate::image::Image;
use crate::kubernetes::Kubernetes;
use crate::operating_system::OperatingSystem;
use crate::registry::EmbeddedArtifactRegistry;

// ============================================================================
// SECTION: Capability Traits
// ============================================================================

/// Documents carrying an operating system section.
pub trait HasOperatingSystem {
    /// Returns the operating system section.
    fn operating_system(&self) -> &OperatingSystem;
}

/// Documents carrying an embedded artifact registry section.
pub trait HasArtifactRegistry {
    /// Returns the embedded artifact registry section.
    fn embedded_artifact_registry(&self) -> &EmbeddedArtifactRegistry;
}

/// Documents carrying a Kubernetes section.
pub trait HasKubernetes {
    /// Returns the Kubernetes section.
    fn kubernetes(&self) -> &Kubernetes;
}

/// A complete definition document accepted by the build.
pub trait Definition: HasOperatingSystem + HasArtifactRegistry + HasKubernetes {
    /// Returns the declared schema version.
    fn api_version(&self) -> &str;

    /// Returns the image section, when the document shape has one.
    fn image(&self) -> Option<&Image>;
}

// ============================================================================
// SECTION: Image Definition
// ============================================================================

/// Full image definition document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ImageDefinition {
    /// Declared schema version.
    pub api_version: String,
    /// Image identity.
    pub image: Image,
    /// Operating system customization.
    pub operating_system: OperatingSystem,
    /// Embedded artifact registry.
    pub embedded_artifact_registry: EmbeddedArtifactRegistry,
    /// Kubernetes cluster definition.
    pub kubernetes: Kubernetes,
}

impl HasOperatingSystem for ImageDefinition {
    fn operating_system(&self) -> &OperatingSystem {
        &self.operating_system
    }
}

impl HasArtifactRegistry for ImageDefinition {
    fn embedded_artifact_registry(&self) -> &EmbeddedArtifactRegistry {
        &self.embedded_artifact_registry
    }
}

impl HasKubernetes for ImageDefinition {
    fn kubernetes(&self) -> &Kubernetes {
        &self.kubernetes
    }
}

impl Definition for ImageDefinition {
    fn api_version(&self) -> &str {
        &self.api_version
    }

    fn image(&self) -> Option<&Image> {
        Some(&self.image)
    }
}

// ============================================================================
// SECTION: Config Drive Definition
// ============================================================================

/// Reduced definition used to build a configuration drive for an existing OS.
///
/// # Invariants
/// - There is no image section; image checks do not apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigDriveDefinition {
    /// Declared schema version.
    pub api_version: String,
    /// Operating system customization.
    pub operating_system: OperatingSystem,
    /// Embedded artifact registry.
    pub embedded_artifact_registry: EmbeddedArtifactRegistry,
    /// Kubernetes cluster definition.
    pub kubernetes: Kubernetes,
}

impl HasOperatingSystem for ConfigDriveDefinition {
    fn operating_system(&self) -> &OperatingSystem {
        &self.operating_system
    }
}

impl HasArtifactRegistry for ConfigDriveDefinition {
    fn embedded_artifact_registry(&self) -> &EmbeddedArtifactRegistry {
        &self.embedded_artifact_registry
    }
}

impl HasKubernetes for ConfigDriveDefinition {
    fn kubernetes(&self) -> &Kubernetes {
        &self.kubernetes
    }
}

impl Definition for ConfigDriveDefinition {
    fn api_version(&self) -> &str {
        &self.api_version
    }

    fn image(&self) -> Option<&Image> {
        None
    }
}
