// crates/edge-image-definition/src/version.rs
// ============================================================================
// Module: Schema Version
// Description: Parsing and numeric comparison of definition API versions.
// Purpose: Gate newer definition fields on the declared schema version.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Definition documents declare the schema they were written against through
//! `apiVersion`. Versions are dotted numeric strings compared component-wise,
//! so `1.10` orders after `1.2`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Schema versions accepted by the build, oldest first.
pub const SUPPORTED_SCHEMA_VERSIONS: &[&str] = &["1.0", "1.1", "1.2"];

/// Maximum number of dotted components in a schema version.
const MAX_VERSION_COMPONENTS: usize = 3;

// ============================================================================
// SECTION: Schema Version
// ============================================================================

/// Numeric `major.minor[.patch]` schema version.
///
/// # Invariants
/// - Missing components are zero, so `1` equals `1.0` and `1.0.0`.
/// - Ordering is numeric per component, never lexicographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaVersion {
    /// Major component.
    pub major: u64,
    /// Minor component.
    pub minor: u64,
    /// Patch component.
    pub patch: u64,
}

impl SchemaVersion {
    /// Creates a version from its components.
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl FromStr for SchemaVersion {
    type Err = VersionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(VersionError::Empty);
        }
        let mut components = [0_u64; MAX_VERSION_COMPONENTS];
        let mut count = 0;
        for part in trimmed.split('.') {
            if count == MAX_VERSION_COMPONENTS {
                return Err(VersionError::TooManyComponents(value.to_string()));
            }
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(VersionError::Invalid(value.to_string()));
            }
            components[count] =
                part.parse().map_err(|_| VersionError::Invalid(value.to_string()))?;
            count += 1;
        }
        Ok(Self::new(components[0], components[1], components[2]))
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.patch == 0 {
            write!(f, "{}.{}", self.major, self.minor)
        } else {
            write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
        }
    }
}

/// Compares two dotted version strings numerically.
///
/// # Errors
///
/// Returns [`VersionError`] when either side does not parse.
pub fn compare_versions(left: &str, right: &str) -> Result<std::cmp::Ordering, VersionError> {
    let left: SchemaVersion = left.parse()?;
    let right: SchemaVersion = right.parse()?;
    Ok(left.cmp(&right))
}

/// Returns true when the version equals one of [`SUPPORTED_SCHEMA_VERSIONS`].
#[must_use]
pub fn is_schema_version_supported(value: &str) -> bool {
    let Ok(version) = value.parse::<SchemaVersion>() else {
        return false;
    };
    SUPPORTED_SCHEMA_VERSIONS
        .iter()
        .filter_map(|supported| supported.parse::<SchemaVersion>().ok())
        .any(|supported| supported == version)
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Schema version parsing errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// The version string is empty.
    #[error("schema version is empty")]
    Empty,
    /// A component is not a non-negative integer.
    #[error("schema version '{0}' is not a dotted numeric version")]
    Invalid(String),
    /// The version has more than three components.
    #[error("schema version '{0}' has too many components")]
    TooManyComponents(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
