// crates/edge-image-validation/src/layout.rs
// ============================================================================
// Module: Image Config Layout
// Description: On-disk locations within an image configuration directory.
// Purpose: Resolve every path the engine probes from one root.
// Dependencies: none
// ============================================================================

//! ## Overview
//! An image configuration directory holds the definition file alongside the
//! artifacts it references. [`ImageConfigLayout`] is the single place that
//! knows where each artifact lives relative to that root.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Directory holding base images.
pub const BASE_IMAGES_DIR: &str = "base-images";
/// Directory holding Kubernetes artifacts.
pub const KUBERNETES_DIR: &str = "kubernetes";
/// Directory under [`KUBERNETES_DIR`] holding Helm artifacts.
pub const HELM_DIR: &str = "helm";
/// Directory under [`HELM_DIR`] holding chart values files.
pub const HELM_VALUES_DIR: &str = "values";
/// Directory under [`HELM_DIR`] holding repository CA certificates.
pub const HELM_CERTS_DIR: &str = "certs";
/// Directory under [`KUBERNETES_DIR`] holding local manifests.
pub const MANIFESTS_DIR: &str = "manifests";
/// Directory under [`KUBERNETES_DIR`] holding node configs.
pub const KUBERNETES_CONFIG_DIR: &str = "config";
/// Server node config file name.
pub const SERVER_CONFIG_FILE: &str = "server.yaml";

// ============================================================================
// SECTION: Layout
// ============================================================================

/// Paths within an image configuration directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageConfigLayout {
    /// Image configuration root.
    root: PathBuf,
}

impl ImageConfigLayout {
    /// Creates a layout rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
        }
    }

    /// Returns the image configuration root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the base images directory.
    #[must_use]
    pub fn base_images_dir(&self) -> PathBuf {
        self.root.join(BASE_IMAGES_DIR)
    }

    /// Returns the path of a base image.
    #[must_use]
    pub fn base_image(&self, name: &str) -> PathBuf {
        self.base_images_dir().join(name)
    }

    /// Returns the Helm values directory.
    #[must_use]
    pub fn helm_values_dir(&self) -> PathBuf {
        self.root.join(KUBERNETES_DIR).join(HELM_DIR).join(HELM_VALUES_DIR)
    }

    /// Returns the Helm certificates directory.
    #[must_use]
    pub fn helm_certs_dir(&self) -> PathBuf {
        self.root.join(KUBERNETES_DIR).join(HELM_DIR).join(HELM_CERTS_DIR)
    }

    /// Returns the local manifests directory.
    #[must_use]
    pub fn manifests_dir(&self) -> PathBuf {
        self.root.join(KUBERNETES_DIR).join(MANIFESTS_DIR)
    }

    /// Returns the Kubernetes server config path.
    #[must_use]
    pub fn server_config(&self) -> PathBuf {
        self.root.join(KUBERNETES_DIR).join(KUBERNETES_CONFIG_DIR).join(SERVER_CONFIG_FILE)
    }
}
