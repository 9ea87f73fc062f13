// crates/edge-image-definition/src/registry.rs
// ============================================================================
// Module: Embedded Artifact Registry Section
// Description: Container images and registry mirrors embedded in the image.
// Purpose: Describe which container images are pulled into the image.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The `embeddedArtifactRegistry` section lists container images to embed and
//! the registries (with optional credentials) they are pulled from.

use serde::Deserialize;

/// Embedded artifact registry section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmbeddedArtifactRegistry {
    /// Container images to embed.
    #[serde(rename = "images")]
    pub container_images: Vec<ContainerImage>,
    /// Registry mirrors and their credentials.
    pub registries: Vec<Registry>,
}

/// Container image reference to embed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContainerImage {
    /// Image reference, e.g. `docker.io/library/nginx:1.27`.
    pub name: String,
}

/// Registry mirror entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Registry {
    /// Registry reference URI, e.g. `docker.io` or `192.168.1.100:5000`.
    pub uri: String,
    /// Registry credentials.
    pub authentication: RegistryAuthentication,
}

/// Registry credentials; both fields are supplied together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryAuthentication {
    /// Registry user name.
    pub username: String,
    /// Registry password.
    pub password: String,
}
