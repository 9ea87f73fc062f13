// crates/edge-image-validation/src/failure.rs
// ============================================================================
// Module: Failure Records
// Description: Diagnostic records and their per-component grouping.
// Purpose: Carry user-facing messages with optional low-level causes.
// Dependencies: edge-image-definition, thiserror
// ============================================================================

//! ## Overview
//! A [`Failure`] is the atomic diagnostic: a complete user-facing sentence and
//! an optional [`FailureCause`] that is logged but not shown verbatim.
//! [`GroupedFailures`] maps each [`Component`] to its failures in the order the
//! rules produced them.
//!
//! Security posture: failure messages echo document values back to the user;
//! they never include file contents.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use edge_image_definition::VersionError;
use thiserror::Error;

use crate::network::AddressError;
use crate::probe::ProbeError;

// ============================================================================
// SECTION: Component
// ============================================================================

/// Top-level definition component a failure is filed under.
///
/// # Invariants
/// - Ordering follows the order in which components are validated.
/// - Display names are stable; callers render them as headings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Component {
    /// The `image` section.
    Image,
    /// The `operatingSystem` section.
    OperatingSystem,
    /// The `embeddedArtifactRegistry` section.
    ArtifactRegistry,
    /// The `kubernetes` section.
    Kubernetes,
}

impl Component {
    /// Every component, in validation order.
    pub const ALL: [Self; 4] =
        [Self::Image, Self::OperatingSystem, Self::ArtifactRegistry, Self::Kubernetes];

    /// Returns the display name of the component.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "Image",
            Self::OperatingSystem => "Operating System",
            Self::ArtifactRegistry => "Artifact Registry",
            Self::Kubernetes => "Kubernetes",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Failure
// ============================================================================

/// Single validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Complete sentence naming the violated field or rule.
    user_message: String,
    /// Lower-level error behind the failure, if any.
    cause: Option<FailureCause>,
}

impl Failure {
    /// Creates a failure without a cause.
    #[must_use]
    pub fn new(user_message: impl Into<String>) -> Self {
        Self {
            user_message: user_message.into(),
            cause: None,
        }
    }

    /// Creates a failure wrapping a lower-level cause.
    #[must_use]
    pub fn with_cause(user_message: impl Into<String>, cause: impl Into<FailureCause>) -> Self {
        Self {
            user_message: user_message.into(),
            cause: Some(cause.into()),
        }
    }

    /// Returns the user-facing message.
    #[must_use]
    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    /// Returns the lower-level cause, if any.
    #[must_use]
    pub const fn cause(&self) -> Option<&FailureCause> {
        self.cause.as_ref()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user_message)
    }
}

/// Lower-level error wrapped by a [`Failure`].
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Causes are plain data so identical runs compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureCause {
    /// An address or CIDR did not parse.
    #[error(transparent)]
    Address(#[from] AddressError),
    /// A container image reference did not parse.
    #[error("invalid reference '{reference}': {reason}")]
    Reference {
        /// Rejected reference.
        reference: String,
        /// Grammar rule the reference broke.
        reason: String,
    },
    /// The declared schema version did not parse.
    #[error(transparent)]
    Version(#[from] VersionError),
    /// A filesystem or server config probe failed.
    #[error("{0}")]
    Probe(String),
}

impl From<ProbeError> for FailureCause {
    fn from(error: ProbeError) -> Self {
        Self::Probe(error.to_string())
    }
}

// ============================================================================
// SECTION: Grouped Failures
// ============================================================================

/// Failures grouped by component.
///
/// # Invariants
/// - Components without failures are absent.
/// - Failures keep the order in which the rules produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedFailures {
    /// Failures keyed by component.
    groups: BTreeMap<Component, Vec<Failure>>,
}

impl GroupedFailures {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends failures to a component, leaving empty input unrecorded.
    pub fn extend(&mut self, component: Component, failures: impl IntoIterator<Item = Failure>) {
        let mut failures = failures.into_iter().peekable();
        if failures.peek().is_none() {
            return;
        }
        self.groups.entry(component).or_default().extend(failures);
    }

    /// Returns the failures for a component; empty when it has none.
    #[must_use]
    pub fn get(&self, component: Component) -> &[Failure] {
        self.groups.get(&component).map_or(&[], Vec::as_slice)
    }

    /// Returns true when no component has failures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns the total number of failures across components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Iterates components with failures, in component order.
    pub fn iter(&self) -> impl Iterator<Item = (Component, &[Failure])> {
        self.groups.iter().map(|(component, failures)| (*component, failures.as_slice()))
    }

    /// Returns every user message, in component order.
    #[must_use]
    pub fn messages(&self) -> Vec<&str> {
        self.groups.values().flatten().map(Failure::user_message).collect()
    }

    /// Consumes the result into its underlying map.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<Component, Vec<Failure>> {
        self.groups
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_does_not_create_a_group() {
        let mut grouped = GroupedFailures::new();
        grouped.extend(Component::Image, Vec::new());
        assert!(grouped.is_empty());
        assert!(grouped.get(Component::Image).is_empty());
    }

    #[test]
    fn groups_iterate_in_component_order() {
        let mut grouped = GroupedFailures::new();
        grouped.extend(Component::Kubernetes, [Failure::new("k")]);
        grouped.extend(Component::Image, [Failure::new("i")]);
        grouped.extend(Component::Kubernetes, [Failure::new("k2")]);
        let order: Vec<&str> = grouped.iter().map(|(component, _)| component.as_str()).collect();
        assert_eq!(order, ["Image", "Kubernetes"]);
        assert_eq!(grouped.messages(), ["i", "k", "k2"]);
        assert_eq!(grouped.len(), 3);
    }

    #[test]
    fn component_names_are_stable() {
        let names: Vec<String> = Component::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(names, ["Image", "Operating System", "Artifact Registry", "Kubernetes"]);
    }

    #[test]
    fn cause_is_not_part_of_display() {
        let failure = Failure::with_cause("could not be read", FailureCause::Probe("denied".into()));
        assert_eq!(failure.to_string(), "could not be read");
        assert_eq!(failure.cause(), Some(&FailureCause::Probe("denied".to_string())));
    }
}
