// crates/edge-image-validation/src/registry.rs
// ============================================================================
// Module: Embedded Artifact Registry Validation
// Description: Rules for embedded container images and registry mirrors.
// Purpose: Ensure every embedded artifact can be named and pulled.
// Dependencies: edge-image-definition, regex
// ============================================================================

//! ## Overview
//! Registry URIs must parse as container image references under the docker
//! distribution grammar: an optional `host[:port]/` domain, lowercase path
//! components, an optional `:tag`, and an optional `@algorithm:hex` digest.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::LazyLock;

use edge_image_definition::ContainerImage;
use edge_image_definition::EmbeddedArtifactRegistry;
use edge_image_definition::Registry;
use regex::Regex;

use crate::duplicates::find_duplicates;
use crate::failure::Failure;
use crate::failure::FailureCause;

// ============================================================================
// SECTION: Reference Grammar
// ============================================================================

/// Longest repository name accepted by registries.
const MAX_NAME_LENGTH: usize = 255;

/// Lowercase path component with `.`, `_`, `__`, or dash-run separators.
const PATH_COMPONENT: &str = r"[a-z0-9]+(?:(?:[._]|__|-+)[a-z0-9]+)*";
/// DNS label, IPv6 literal in brackets, and optional port.
const DOMAIN: &str = concat!(
    r"(?:(?:[a-zA-Z0-9]|[a-zA-Z0-9][a-zA-Z0-9-]*[a-zA-Z0-9])",
    r"(?:\.(?:[a-zA-Z0-9]|[a-zA-Z0-9][a-zA-Z0-9-]*[a-zA-Z0-9]))*",
    r"|\[[a-fA-F0-9:]+\])(?::[0-9]+)?"
);
/// Tag following the name; ASCII word characters only.
const TAG: &str = r"[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}";
/// Content digest following the tag.
const DIGEST: &str = r"[A-Za-z][A-Za-z0-9]*(?:[-_+.][A-Za-z][A-Za-z0-9]*)*:[[:xdigit:]]{32,}";

/// Compiled reference grammar; group `name` captures the repository name.
static REFERENCE: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?P<name>(?:{DOMAIN}/)?{PATH_COMPONENT}(?:/{PATH_COMPONENT})*)(?::{TAG})?(?:@{DIGEST})?$"
    ))
});

/// Checks a container image reference against the distribution grammar.
///
/// # Errors
///
/// Returns [`FailureCause::Reference`] naming the broken rule.
pub fn parse_reference(reference: &str) -> Result<(), FailureCause> {
    let reject = |reason: &str| FailureCause::Reference {
        reference: reference.to_string(),
        reason: reason.to_string(),
    };
    if reference.is_empty() {
        return Err(reject("repository name must have at least one component"));
    }
    let grammar = REFERENCE.as_ref().map_err(|err| reject(&err.to_string()))?;
    let Some(captures) = grammar.captures(reference) else {
        if grammar.is_match(&reference.to_lowercase()) {
            return Err(reject("repository name must be lowercase"));
        }
        return Err(reject("invalid reference format"));
    };
    let name_length = captures.name("name").map_or(0, |name| name.as_str().len());
    if name_length > MAX_NAME_LENGTH {
        return Err(reject("repository name must not be more than 255 characters"));
    }
    Ok(())
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates the embedded artifact registry section.
#[must_use]
pub fn validate_artifact_registry(registry: &EmbeddedArtifactRegistry) -> Vec<Failure> {
    let mut failures = Vec::new();
    failures.extend(validate_registry_uris(&registry.registries));
    failures.extend(validate_registry_credentials(&registry.registries));
    failures.extend(validate_container_images(&registry.container_images));
    failures
}

/// Validates registry mirror URIs.
#[must_use]
pub fn validate_registry_uris(registries: &[Registry]) -> Vec<Failure> {
    let mut failures = Vec::new();
    let mut parsed = Vec::new();
    for registry in registries {
        if registry.uri.is_empty() {
            failures.push(Failure::new(
                "The 'uri' field is required for each entry in 'embeddedArtifactRegistry.registries'.",
            ));
            continue;
        }
        match parse_reference(&registry.uri) {
            Ok(()) => parsed.push(registry.uri.as_str()),
            Err(cause) => failures.push(Failure::with_cause(
                format!("Embedded artifact registry URI '{}' could not be parsed.", registry.uri),
                cause,
            )),
        }
    }
    for uri in find_duplicates(parsed) {
        failures.push(Failure::new(format!(
            "Duplicate registry URI '{uri}' found in the 'embeddedArtifactRegistry.registries' \
             section."
        )));
    }
    failures
}

/// Validates that registry credentials are supplied together.
#[must_use]
pub fn validate_registry_credentials(registries: &[Registry]) -> Vec<Failure> {
    let mut failures = Vec::new();
    for registry in registries {
        let credentials = &registry.authentication;
        if !credentials.username.is_empty() && credentials.password.is_empty() {
            failures.push(Failure::new(
                "The 'password' field is required for each entry in \
                 'embeddedArtifactRegistry.registries.credentials'.",
            ));
        }
        if credentials.username.is_empty() && !credentials.password.is_empty() {
            failures.push(Failure::new(
                "The 'username' field is required for each entry in \
                 'embeddedArtifactRegistry.registries.credentials'.",
            ));
        }
    }
    failures
}

/// Validates embedded container image names.
#[must_use]
pub fn validate_container_images(images: &[ContainerImage]) -> Vec<Failure> {
    let mut failures = Vec::new();
    for image in images {
        if image.name.is_empty() {
            failures.push(Failure::new("The 'name' field is required for each entry in 'images'."));
        }
    }
    let names = images.iter().map(|image| image.name.as_str()).filter(|name| !name.is_empty());
    for name in find_duplicates(names) {
        failures.push(Failure::new(format!(
            "Duplicate image name '{name}' found in the 'images' section."
        )));
    }
    failures
}

// ============================================================================
// SECTION: Tests
// ============================================================================
