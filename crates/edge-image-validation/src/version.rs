// crates/edge-image-validation/src/version.rs
// ============================================================================
// Module: Schema Version Gate
// Description: Field-level minimum schema version requirements.
// Purpose: Reject newer fields in documents that declare an older API version.
// Dependencies: edge-image-definition, tracing
// ============================================================================

//! ## Overview
//! A static, ordered table maps field paths to the schema version that
//! introduced them. A field that is set in a document declaring an older
//! version produces one failure, filed under the component owning the field.
//! A document that declares no version is not gated.
//!
//! Security posture: the declared version is untrusted input. A version that
//! does not parse is treated as older than every minimum so that no gated
//! field slips through; the parse error is attached as the cause.

// ============================================================================
// SECTION: Imports
// ============================================================================

use edge_image_definition::Definition;
use edge_image_definition::EmbeddedArtifactRegistry;
use edge_image_definition::Kubernetes;
use edge_image_definition::OperatingSystem;
use edge_image_definition::SchemaVersion;
use edge_image_definition::is_schema_version_supported;

use crate::failure::Component;
use crate::failure::Failure;

// ============================================================================
// SECTION: Gate Table
// ============================================================================

/// Predicate reporting whether a gated field is set, keyed by owning section.
#[derive(Clone, Copy)]
enum FieldProbe {
    /// Field under `operatingSystem`.
    OperatingSystem(fn(&OperatingSystem) -> bool),
    /// Field under `embeddedArtifactRegistry`.
    ArtifactRegistry(fn(&EmbeddedArtifactRegistry) -> bool),
    /// Field under `kubernetes`.
    Kubernetes(fn(&Kubernetes) -> bool),
}

impl FieldProbe {
    /// Returns the component that owns the probed field.
    const fn component(self) -> Component {
        match self {
            Self::OperatingSystem(_) => Component::OperatingSystem,
            Self::ArtifactRegistry(_) => Component::ArtifactRegistry,
            Self::Kubernetes(_) => Component::Kubernetes,
        }
    }

    /// Returns true when the field holds a non-default value.
    fn is_set<D: Definition + ?Sized>(self, definition: &D) -> bool {
        match self {
            Self::OperatingSystem(probe) => probe(definition.operating_system()),
            Self::ArtifactRegistry(probe) => probe(definition.embedded_artifact_registry()),
            Self::Kubernetes(probe) => probe(definition.kubernetes()),
        }
    }
}

/// One row of the gate table.
struct GatedField {
    /// Dotted document path reported to the user.
    path: &'static str,
    /// First schema version that accepts the field.
    minimum: SchemaVersion,
    /// Presence check for the field.
    probe: FieldProbe,
}

/// Gated fields in reporting order.
static GATED_FIELDS: &[GatedField] = &[
    GatedField {
        path: "kubernetes.helm.charts.apiVersions",
        minimum: SchemaVersion::new(1, 1, 0),
        probe: FieldProbe::Kubernetes(|kubernetes| {
            kubernetes.helm.charts.iter().any(|chart| !chart.api_versions.is_empty())
        }),
    },
    GatedField {
        path: "operatingSystem.enableFIPS",
        minimum: SchemaVersion::new(1, 1, 0),
        probe: FieldProbe::OperatingSystem(|os| os.enable_fips),
    },
    GatedField {
        path: "kubernetes.network.apiVIP6",
        minimum: SchemaVersion::new(1, 2, 0),
        probe: FieldProbe::Kubernetes(|kubernetes| !kubernetes.network.api_vip6.is_empty()),
    },
    GatedField {
        path: "kubernetes.helm.charts.releaseName",
        minimum: SchemaVersion::new(1, 2, 0),
        probe: FieldProbe::Kubernetes(|kubernetes| {
            kubernetes.helm.charts.iter().any(|chart| !chart.release_name.is_empty())
        }),
    },
    GatedField {
        path: "operatingSystem.rawConfiguration.luksKey",
        minimum: SchemaVersion::new(1, 2, 0),
        probe: FieldProbe::OperatingSystem(|os| !os.raw_configuration.luks_key.is_empty()),
    },
    GatedField {
        path: "operatingSystem.rawConfiguration.expandEncryptedPartition",
        minimum: SchemaVersion::new(1, 2, 0),
        probe: FieldProbe::OperatingSystem(|os| os.raw_configuration.expand_encrypted_partition),
    },
    GatedField {
        path: "operatingSystem.packages.enableExtras",
        minimum: SchemaVersion::new(1, 2, 0),
        probe: FieldProbe::OperatingSystem(|os| os.packages.enable_extras),
    },
    GatedField {
        path: "embeddedArtifactRegistry.registries",
        minimum: SchemaVersion::new(1, 2, 0),
        probe: FieldProbe::ArtifactRegistry(|registry| !registry.registries.is_empty()),
    },
];

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Checks every gated field against the declared schema version.
///
/// Failures are returned in table order, each paired with the component
/// that owns the field.
#[must_use]
pub fn validate_version<D: Definition + ?Sized>(definition: &D) -> Vec<(Component, Failure)> {
    let declared_text = definition.api_version();
    if declared_text.is_empty() {
        return Vec::new();
    }
    if !is_schema_version_supported(declared_text) {
        tracing::warn!(api_version = declared_text, "definition declares an unsupported schema version");
    }
    let declared = declared_text.parse::<SchemaVersion>();

    let mut failures = Vec::new();
    for field in GATED_FIELDS {
        if !field.probe.is_set(definition) {
            continue;
        }
        let message = format!(
            "Field `{}` is only available in API version >= {}",
            field.path, field.minimum
        );
        let failure = match &declared {
            Ok(version) if *version >= field.minimum => continue,
            Ok(_) => Failure::new(message),
            Err(err) => Failure::with_cause(message, err.clone()),
        };
        failures.push((field.probe.component(), failure));
    }
    failures
}

// ============================================================================
// SECTION: Tests
// ============================================================================
