// crates/edge-image-validation/src/kubernetes/helm.rs
// ============================================================================
// Module: Helm Validation
// Description: Rules for Helm charts, repositories, and their files.
// Purpose: Ensure every chart resolves to a reachable, consistently secured repository.
// Dependencies: edge-image-definition, tracing
// ============================================================================

//! ## Overview
//! Helm is checked only when at least one chart is declared. Charts and
//! repositories cross-reference each other by name: every chart must name a
//! declared repository and every repository must be used by some chart.
//! Values files and CA files are probed under the image configuration root.
//!
//! Security posture: repository transport flags are checked against the URL
//! scheme so that TLS settings cannot silently contradict each other.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use edge_image_definition::Helm;
use edge_image_definition::HelmChart;
use edge_image_definition::HelmRepository;

use crate::duplicates::find_duplicates;
use crate::failure::Failure;
use crate::layout::ImageConfigLayout;
use crate::probe::FileProbe;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Accepted values file extensions.
const VALUES_FILE_EXTENSIONS: &[&str] = &["yaml", "yml"];
/// Accepted CA file extensions.
const CERT_FILE_EXTENSIONS: &[&str] = &["pem", "crt", "cer"];

/// Plain HTTP scheme prefix.
const HTTP_PREFIX: &str = "http://";
/// HTTPS scheme prefix.
const HTTPS_PREFIX: &str = "https://";
/// OCI registry scheme prefix.
const OCI_PREFIX: &str = "oci://";

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Validates Helm charts and repositories.
#[must_use]
pub fn validate_helm(helm: &Helm, layout: &ImageConfigLayout, probe: &dyn FileProbe) -> Vec<Failure> {
    let mut failures = Vec::new();
    if helm.charts.is_empty() {
        return failures;
    }
    if helm.repositories.is_empty() {
        failures.push(Failure::new("Helm charts defined with no Helm repositories defined."));
        return failures;
    }

    failures.extend(validate_release_names(&helm.charts));

    let repository_names: BTreeSet<&str> =
        helm.repositories.iter().map(|repo| repo.name.as_str()).collect();
    for chart in &helm.charts {
        failures.extend(validate_chart(chart, &repository_names, layout, probe));
    }

    let referenced: BTreeSet<&str> =
        helm.charts.iter().map(|chart| chart.repository_name.as_str()).collect();
    for repository in &helm.repositories {
        failures.extend(validate_repository(repository, &referenced, layout, probe));
    }
    failures
}

// ============================================================================
// SECTION: Charts
// ============================================================================

/// Rejects charts sharing both name and release name.
fn validate_release_names(charts: &[HelmChart]) -> Vec<Failure> {
    let releases = charts
        .iter()
        .filter(|chart| !chart.name.is_empty())
        .map(|chart| (chart.name.as_str(), chart.release_name.as_str()));
    find_duplicates(releases)
        .into_iter()
        .map(|(name, release)| {
            Failure::new(format!(
                "Helm charts with the same 'name' require a unique 'releaseName'. Duplicate \
                 found:\nName: '{name}', Release name: '{release}'"
            ))
        })
        .collect()
}

/// Validates a single chart.
fn validate_chart(
    chart: &HelmChart,
    repository_names: &BTreeSet<&str>,
    layout: &ImageConfigLayout,
    probe: &dyn FileProbe,
) -> Vec<Failure> {
    let mut failures = Vec::new();
    let name = &chart.name;

    if name.is_empty() {
        failures.push(Failure::new("Helm chart 'name' field must be defined."));
    }

    if chart.repository_name.is_empty() {
        failures.push(Failure::new(format!(
            "Helm chart 'repositoryName' field for \"{name}\" must be defined."
        )));
    } else if !repository_names.contains(chart.repository_name.as_str()) {
        failures.push(Failure::new(format!(
            "Helm chart 'repositoryName' \"{}\" for Helm chart \"{name}\" does not match the \
             name of any defined repository.",
            chart.repository_name
        )));
    }

    if chart.version.is_empty() {
        failures.push(Failure::new(format!(
            "Helm chart 'version' field for \"{name}\" field must be defined."
        )));
    }

    if chart.create_namespace && chart.target_namespace.is_empty() {
        failures.push(Failure::new(format!(
            "Helm chart 'createNamespace' field for \"{name}\" cannot be true without \
             'targetNamespace' being defined."
        )));
    }

    if !chart.values_file.is_empty() {
        failures.extend(validate_values_file(name, &chart.values_file, layout, probe));
    }
    failures
}

/// Validates the extension and presence of a chart values file.
fn validate_values_file(
    chart_name: &str,
    values_file: &str,
    layout: &ImageConfigLayout,
    probe: &dyn FileProbe,
) -> Option<Failure> {
    if !has_extension(values_file, VALUES_FILE_EXTENSIONS) {
        return Some(Failure::new(format!(
            "Helm chart 'valuesFile' field for \"{chart_name}\" must be the name of a valid yaml \
             file ending in '.yaml' or '.yml'."
        )));
    }
    let path = layout.helm_values_dir().join(values_file);
    match probe.exists(&path) {
        Ok(true) => None,
        Ok(false) => Some(Failure::new(format!(
            "Helm chart values file '{values_file}' could not be found at '{}'.",
            path.display()
        ))),
        Err(err) => {
            tracing::error!(path = %path.display(), error = %err, "values file could not be probed");
            Some(Failure::with_cause(
                format!("Helm chart values file '{values_file}' could not be read."),
                err,
            ))
        }
    }
}

// ============================================================================
// SECTION: Repositories
// ============================================================================

/// Validates a single repository.
fn validate_repository(
    repository: &HelmRepository,
    referenced: &BTreeSet<&str>,
    layout: &ImageConfigLayout,
    probe: &dyn FileProbe,
) -> Vec<Failure> {
    let mut failures = Vec::new();
    let name = &repository.name;
    let url = repository.url.as_str();

    if name.is_empty() {
        failures.push(Failure::new("Helm repository 'name' field must be defined."));
    } else if !referenced.contains(name.as_str()) {
        failures.push(Failure::new(format!(
            "Helm repository 'name' field for \"{name}\" must match the 'repositoryName' field in \
             at least one defined Helm chart."
        )));
    }

    if url.is_empty() {
        failures.push(Failure::new(format!(
            "Helm repository 'url' field for \"{name}\" must be defined."
        )));
    } else if ![OCI_PREFIX, HTTP_PREFIX, HTTPS_PREFIX].iter().any(|prefix| url.starts_with(prefix)) {
        failures.push(Failure::new(format!(
            "Helm repository 'url' field for \"{name}\" must begin with either 'oci://', \
             'http://', or 'https://'."
        )));
    }

    let credentials = &repository.authentication;
    if !credentials.username.is_empty() && credentials.password.is_empty() {
        failures.push(Failure::new(format!(
            "Helm repository 'password' field not defined for \"{name}\"."
        )));
    }
    if credentials.username.is_empty() && !credentials.password.is_empty() {
        failures.push(Failure::new(format!(
            "Helm repository 'username' field not defined for \"{name}\"."
        )));
    }

    failures.extend(validate_transport(repository));
    if !repository.ca_file.is_empty() {
        failures.extend(validate_ca_file(repository, layout, probe));
    }
    failures
}

/// Checks TLS flags against the repository URL scheme.
fn validate_transport(repository: &HelmRepository) -> Vec<Failure> {
    let mut failures = Vec::new();
    let name = &repository.name;
    let url = repository.url.as_str();

    if repository.plain_http && repository.skip_tls_verify {
        failures.push(Failure::new(format!(
            "Helm repository 'plainHTTP' and 'skipTLSVerify' fields for \"{name}\" cannot both be \
             true."
        )));
    }
    if url.starts_with(HTTP_PREFIX) {
        if !repository.plain_http {
            failures.push(Failure::new(format!(
                "Helm repository 'url' field for \"{name}\" contains 'http://' but 'plainHTTP' \
                 field is false."
            )));
        }
        if repository.skip_tls_verify {
            failures.push(Failure::new(format!(
                "Helm repository 'url' field for \"{name}\" contains 'http://' but \
                 'skipTLSVerify' field is true."
            )));
        }
    }
    if url.starts_with(HTTPS_PREFIX) && repository.plain_http {
        failures.push(Failure::new(format!(
            "Helm repository 'url' field for \"{name}\" contains 'https://' but 'plainHTTP' field \
             is true."
        )));
    }
    failures
}

/// Validates a repository CA file reference.
fn validate_ca_file(
    repository: &HelmRepository,
    layout: &ImageConfigLayout,
    probe: &dyn FileProbe,
) -> Vec<Failure> {
    let mut failures = Vec::new();
    let name = &repository.name;
    let ca_file = repository.ca_file.as_str();

    if repository.plain_http {
        failures.push(Failure::new(format!(
            "Helm repository 'caFile' field for \"{name}\" cannot be defined while 'plainHTTP' is \
             true."
        )));
    }
    if repository.skip_tls_verify {
        failures.push(Failure::new(format!(
            "Helm repository 'caFile' field for \"{name}\" cannot be defined while \
             'skipTLSVerify' is true."
        )));
    }
    if repository.url.starts_with(HTTP_PREFIX) {
        failures.push(Failure::new(format!(
            "Helm repository 'url' field for \"{name}\" contains 'http://' but 'caFile' field is \
             defined."
        )));
    }

    if !has_extension(ca_file, CERT_FILE_EXTENSIONS) {
        let extensions: Vec<String> =
            CERT_FILE_EXTENSIONS.iter().map(|extension| format!(".{extension}")).collect();
        failures.push(Failure::new(format!(
            "Helm chart 'caFile' field for \"{name}\" must be the name of a valid cert file/bundle \
             with one of the following extensions: {}",
            extensions.join(", ")
        )));
        return failures;
    }

    let path = layout.helm_certs_dir().join(ca_file);
    match probe.exists(&path) {
        Ok(true) => {}
        Ok(false) => failures.push(Failure::new(format!(
            "Helm repo cert file/bundle '{ca_file}' could not be found at '{}'.",
            path.display()
        ))),
        Err(err) => {
            tracing::error!(path = %path.display(), error = %err, "cert file could not be probed");
            failures.push(Failure::with_cause(
                format!("Helm repo cert file/bundle '{ca_file}' could not be read."),
                err,
            ));
        }
    }
    failures
}

/// Returns true when the file name ends in one of `extensions`.
///
/// The extension is whatever follows the last `.` of the final path element,
/// so a bare `.yaml` counts as a yaml file.
fn has_extension(file: &str, extensions: &[&str]) -> bool {
    let name = file.rsplit('/').next().unwrap_or(file);
    name.rsplit_once('.').is_some_and(|(_, extension)| extensions.contains(&extension))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
