// crates/edge-image-validation/src/kubernetes/mod.rs
// ============================================================================
// Module: Kubernetes Validation
// Description: Rules for the kubernetes section and its on-disk artifacts.
// Purpose: Validate cluster topology, addressing, manifests, and Helm.
// Dependencies: edge-image-definition, tracing
// ============================================================================

//! ## Overview
//! The Kubernetes component has two entry points with different gating:
//! - [`validate_kubernetes`] runs only when a cluster version is declared.
//! - [`validate_additional_artifacts`] always runs, reporting artifacts that
//!   are declared without a cluster version to install them into.
//!
//! Keeping them separate makes the ungated check visible to callers instead
//! of hiding it behind the version gate.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod helm;
pub mod manifests;
pub mod network;
pub mod nodes;

// ============================================================================
// SECTION: Imports
// ============================================================================

use edge_image_definition::Kubernetes;

use crate::failure::Failure;
use crate::layout::ImageConfigLayout;
use crate::probe::FileProbe;
use crate::probe::ServerConfigReader;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use helm::validate_helm;
pub use manifests::validate_manifest_urls;
pub use network::validate_cidr_config;
pub use network::validate_network;
pub use network::validate_node_ip;
pub use network::validate_server_config;
pub use nodes::validate_nodes;

// ============================================================================
// SECTION: Entry Points
// ============================================================================

/// Validates a defined cluster; returns nothing when no version is declared.
#[must_use]
pub fn validate_kubernetes(
    kubernetes: &Kubernetes,
    layout: &ImageConfigLayout,
    probe: &dyn FileProbe,
    reader: &dyn ServerConfigReader,
) -> Vec<Failure> {
    let mut failures = Vec::new();
    if !kubernetes.is_defined() {
        return failures;
    }
    failures.extend(validate_nodes(kubernetes));
    failures.extend(validate_manifest_urls(&kubernetes.manifests));
    failures.extend(validate_helm(&kubernetes.helm, layout, probe));
    failures.extend(validate_network(&kubernetes.network));
    failures.extend(validate_server_config(kubernetes, layout, reader));
    failures
}

/// Reports Kubernetes artifacts declared without a cluster version.
///
/// Each artifact kind is reported on its own. Local manifests count as
/// declared when the manifests directory exists and is not empty.
#[must_use]
pub fn validate_additional_artifacts(
    kubernetes: &Kubernetes,
    layout: &ImageConfigLayout,
    probe: &dyn FileProbe,
) -> Vec<Failure> {
    let mut failures = Vec::new();
    if kubernetes.is_defined() {
        return failures;
    }
    if !kubernetes.helm.charts.is_empty() {
        failures.push(Failure::new("Kubernetes version must be defined when Helm charts are specified"));
    }
    if !kubernetes.manifests.urls.is_empty() {
        failures.push(Failure::new(
            "Kubernetes version must be defined when manifest URLs are specified",
        ));
    }
    let manifests_dir = layout.manifests_dir();
    match probe.has_entries(&manifests_dir) {
        Ok(false) => {}
        Ok(true) => failures.push(Failure::new(
            "Kubernetes version must be defined when local manifests are configured",
        )),
        Err(err) => {
            tracing::error!(
                path = %manifests_dir.display(),
                error = %err,
                "local manifests directory could not be read"
            );
            failures.push(Failure::with_cause(
                format!(
                    "Kubernetes local manifests directory '{}' could not be read.",
                    manifests_dir.display()
                ),
                err,
            ));
        }
    }
    failures
}

// ============================================================================
// SECTION: Tests
// ============================================================================
