// crates/edge-image-validation/src/probe.rs
// ============================================================================
// Module: Filesystem Collaborators
// Description: Existence probes and the Kubernetes server config reader.
// Purpose: Isolate every filesystem read the engine performs behind traits.
// Dependencies: serde, serde_yaml, thiserror
// ============================================================================

//! ## Overview
//! Validators never touch the filesystem directly. They ask a [`FileProbe`]
//! whether referenced files exist and a [`ServerConfigReader`] for the cluster
//! server config. Both report "not found" as a normal value; only genuine
//! environment faults (permissions, unreadable content) are [`ProbeError`]s.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: File Probe
// ============================================================================

/// Read-only filesystem existence checks.
pub trait FileProbe {
    /// Returns whether `path` exists.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] when existence cannot be determined; a missing
    /// path is `Ok(false)`.
    fn exists(&self, path: &Path) -> Result<bool, ProbeError>;

    /// Returns whether `path` is a directory with at least one entry.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] when the directory cannot be listed; a missing
    /// path is `Ok(false)`.
    fn has_entries(&self, path: &Path) -> Result<bool, ProbeError>;
}

/// [`FileProbe`] backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl FileProbe for FsProbe {
    fn exists(&self, path: &Path) -> Result<bool, ProbeError> {
        match fs::metadata(path) {
            Ok(_) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(ProbeError::io(path, err)),
        }
    }

    fn has_entries(&self, path: &Path) -> Result<bool, ProbeError> {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(err) => return Err(ProbeError::io(path, err)),
        };
        if !metadata.is_dir() {
            return Ok(false);
        }
        let mut entries = fs::read_dir(path).map_err(|err| ProbeError::io(path, err))?;
        match entries.next() {
            None => Ok(false),
            Some(Ok(_)) => Ok(true),
            Some(Err(err)) => Err(ProbeError::io(path, err)),
        }
    }
}

// ============================================================================
// SECTION: Server Config
// ============================================================================

/// Networking keys of the Kubernetes server config.
///
/// # Invariants
/// - Values are kept verbatim; list keys are comma-separated strings.
/// - Keys unrelated to networking are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerNetworkConfig {
    /// Pod network blocks.
    #[serde(rename = "cluster-cidr")]
    pub cluster_cidr: Option<String>,
    /// Service network blocks.
    #[serde(rename = "service-cidr")]
    pub service_cidr: Option<String>,
    /// Addresses the server node advertises.
    #[serde(rename = "node-ip")]
    pub node_ip: Option<String>,
}

/// Source of the Kubernetes server config.
pub trait ServerConfigReader {
    /// Reads the server config at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] when the file exists but cannot be read or
    /// decoded; a missing file is `Ok(None)`.
    fn read(&self, path: &Path) -> Result<Option<ServerNetworkConfig>, ProbeError>;
}

/// [`ServerConfigReader`] decoding YAML from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlServerConfigReader;

impl ServerConfigReader for YamlServerConfigReader {
    fn read(&self, path: &Path) -> Result<Option<ServerNetworkConfig>, ProbeError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(ProbeError::io(path, err)),
        };
        if content.trim().is_empty() {
            return Ok(Some(ServerNetworkConfig::default()));
        }
        serde_yaml::from_str(&content).map(Some).map_err(|err| ProbeError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Filesystem probe errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - "Not found" is never represented here.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The path could not be inspected.
    #[error("failed to inspect '{}': {source}", .path.display())]
    Io {
        /// Probed path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The file content could not be decoded.
    #[error("failed to decode '{}': {message}", .path.display())]
    Parse {
        /// Decoded path.
        path: PathBuf,
        /// Decoder message.
        message: String,
    },
}

impl ProbeError {
    /// Wraps an I/O error for `path`.
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
