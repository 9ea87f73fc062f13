// crates/edge-image-validation/src/lib.rs
// ============================================================================
// Module: Edge Image Validation Library
// Description: Rule-based validation engine for edge image definitions.
// Purpose: Report every configuration problem before an image build starts.
// Dependencies: edge-image-definition, regex, serde, serde_yaml, thiserror, tracing
// ============================================================================

//! ## Overview
//! `edge-image-validation` checks a decoded definition document for internal
//! consistency and returns every violation at once, grouped by component.
//! Invalid configuration is never an error: it is a populated
//! [`GroupedFailures`]. Environment faults (unreadable files) degrade into
//! failure records that carry the fault as their cause.
//!
//! The engine is synchronous and read-only. Filesystem access goes through the
//! [`FileProbe`] and [`ServerConfigReader`] collaborators so hosts and tests
//! can substitute them.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod duplicates;
pub mod failure;
pub mod image;
pub mod kubernetes;
pub mod layout;
pub mod network;
pub mod operating_system;
pub mod probe;
pub mod registry;
pub mod validator;
pub mod version;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use duplicates::find_duplicates;
pub use failure::Component;
pub use failure::Failure;
pub use failure::FailureCause;
pub use failure::GroupedFailures;
pub use kubernetes::validate_additional_artifacts;
pub use kubernetes::validate_kubernetes;
pub use layout::ImageConfigLayout;
pub use network::AddressError;
pub use network::AddressFamily;
pub use network::is_unicast;
pub use network::validate_address;
pub use probe::FileProbe;
pub use probe::FsProbe;
pub use probe::ProbeError;
pub use probe::ServerConfigReader;
pub use probe::ServerNetworkConfig;
pub use probe::YamlServerConfigReader;
pub use validator::Validator;
pub use validator::validate_config_drive;
pub use validator::validate_definition;
pub use version::validate_version;
