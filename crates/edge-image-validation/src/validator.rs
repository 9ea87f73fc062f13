// crates/edge-image-validation/src/validator.rs
// ============================================================================
// Module: Validation Orchestrator
// Description: Runs every component validator and groups the results.
// Purpose: Provide the single entry point used before an image build.
// Dependencies: edge-image-definition, tracing
// ============================================================================

//! ## Overview
//! [`Validator`] owns the image configuration layout and the filesystem
//! collaborators, runs the component validators in a fixed order, appends the
//! schema version gate findings to the owning components, and returns one
//! [`GroupedFailures`].
//!
//! Runs are deterministic: the same document and filesystem state always
//! produce the same grouped result, in the same order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use edge_image_definition::ConfigDriveDefinition;
use edge_image_definition::Definition;
use edge_image_definition::ImageDefinition;

use crate::failure::Component;
use crate::failure::Failure;
use crate::failure::GroupedFailures;
use crate::image::validate_image;
use crate::kubernetes::validate_additional_artifacts;
use crate::kubernetes::validate_kubernetes;
use crate::layout::ImageConfigLayout;
use crate::operating_system::validate_operating_system;
use crate::probe::FileProbe;
use crate::probe::FsProbe;
use crate::probe::ServerConfigReader;
use crate::probe::YamlServerConfigReader;
use crate::registry::validate_artifact_registry;
use crate::version::validate_version;

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Validation engine bound to an image configuration directory.
///
/// # Invariants
/// - Validation never mutates the document or the filesystem.
/// - Every component validator runs, regardless of earlier failures.
#[derive(Debug, Clone)]
pub struct Validator<P = FsProbe, R = YamlServerConfigReader> {
    /// On-disk locations probed by the rules.
    layout: ImageConfigLayout,
    /// Existence checks for referenced files.
    probe: P,
    /// Source of the Kubernetes server config.
    server_config: R,
}

impl Validator {
    /// Creates a validator backed by the local filesystem.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_collaborators(ImageConfigLayout::new(root), FsProbe, YamlServerConfigReader)
    }
}

impl<P: FileProbe, R: ServerConfigReader> Validator<P, R> {
    /// Creates a validator with explicit collaborators.
    #[must_use]
    pub const fn with_collaborators(layout: ImageConfigLayout, probe: P, server_config: R) -> Self {
        Self {
            layout,
            probe,
            server_config,
        }
    }

    /// Returns the image configuration layout.
    #[must_use]
    pub const fn layout(&self) -> &ImageConfigLayout {
        &self.layout
    }

    /// Validates a definition document.
    ///
    /// Components are evaluated in the order image, operating system,
    /// artifact registry, Kubernetes. Gate findings follow the domain
    /// findings of their component.
    #[must_use]
    pub fn validate<D: Definition + ?Sized>(&self, definition: &D) -> GroupedFailures {
        let os = definition.operating_system();
        let kubernetes = definition.kubernetes();

        let image_failures = definition
            .image()
            .map(|image| validate_image(image, os, &self.layout, &self.probe))
            .unwrap_or_default();
        let mut kubernetes_failures =
            validate_kubernetes(kubernetes, &self.layout, &self.probe, &self.server_config);
        kubernetes_failures.extend(validate_additional_artifacts(
            kubernetes,
            &self.layout,
            &self.probe,
        ));

        let mut components: [(Component, Vec<Failure>); 4] = [
            (Component::Image, image_failures),
            (Component::OperatingSystem, validate_operating_system(os, definition.image())),
            (
                Component::ArtifactRegistry,
                validate_artifact_registry(definition.embedded_artifact_registry()),
            ),
            (Component::Kubernetes, kubernetes_failures),
        ];
        for (component, failure) in validate_version(definition) {
            if let Some((_, failures)) = components.iter_mut().find(|(owner, _)| *owner == component)
            {
                failures.push(failure);
            }
        }

        let mut grouped = GroupedFailures::new();
        for (component, failures) in components {
            tracing::debug!(
                component = component.as_str(),
                failures = failures.len(),
                "component validated"
            );
            grouped.extend(component, failures);
        }
        grouped
    }
}

// ============================================================================
// SECTION: Convenience Entry Points
// ============================================================================

/// Validates a full image definition against the filesystem at `root`.
#[must_use]
pub fn validate_definition(
    definition: &ImageDefinition,
    root: impl Into<PathBuf>,
) -> GroupedFailures {
    Validator::new(root).validate(definition)
}

/// Validates a config-drive definition against the filesystem at `root`.
#[must_use]
pub fn validate_config_drive(
    definition: &ConfigDriveDefinition,
    root: impl Into<PathBuf>,
) -> GroupedFailures {
    Validator::new(root).validate(definition)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
