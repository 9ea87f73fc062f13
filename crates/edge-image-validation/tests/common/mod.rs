// crates/edge-image-validation/tests/common/mod.rs
// =============================================================================
// Module: Validation Test Helpers
// Description: Shared fixtures for validation engine integration tests.
// Purpose: Build definition documents and image configuration directories.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use edge_image_definition::ConfigDriveDefinition;
use edge_image_definition::ImageDefinition;
use edge_image_validation::Component;
use edge_image_validation::Failure;
use edge_image_validation::FileProbe;
use edge_image_validation::GroupedFailures;
use edge_image_validation::ImageConfigLayout;
use edge_image_validation::ProbeError;
use tempfile::TempDir;

/// Parses a YAML string into an `ImageDefinition` for tests.
pub fn definition_from_yaml(yaml: &str) -> Result<ImageDefinition, String> {
    serde_yaml::from_str(yaml).map_err(|err| err.to_string())
}

/// Parses a YAML string into a `ConfigDriveDefinition` for tests.
pub fn config_drive_from_yaml(yaml: &str) -> Result<ConfigDriveDefinition, String> {
    serde_yaml::from_str(yaml).map_err(|err| err.to_string())
}

/// Returns the messages recorded for one component.
pub fn messages(grouped: &GroupedFailures, component: Component) -> Vec<String> {
    grouped.get(component).iter().map(|failure| failure.user_message().to_string()).collect()
}

/// Fails with a readable diff when two message lists differ.
pub fn expect_messages(actual: &[String], expected: &[&str]) -> Result<(), String> {
    if actual.iter().map(String::as_str).eq(expected.iter().copied()) {
        return Ok(());
    }
    Err(format!("expected {expected:#?}\nactual {actual:#?}"))
}

/// Fails when `message` is not among `failures`.
pub fn expect_contains(failures: &[Failure], message: &str) -> Result<(), String> {
    if failures.iter().any(|failure| failure.user_message() == message) {
        return Ok(());
    }
    let actual: Vec<&str> = failures.iter().map(Failure::user_message).collect();
    Err(format!("missing {message:?} in {actual:#?}"))
}

// ============================================================================
// SECTION: Image Configuration Directory
// ============================================================================

/// Temporary image configuration directory.
pub struct ConfigDir {
    /// Owned temporary directory, removed on drop.
    dir: TempDir,
}

impl ConfigDir {
    /// Creates an empty configuration directory.
    pub fn new() -> Result<Self, String> {
        let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
        Ok(Self {
            dir,
        })
    }

    /// Creates a directory holding every file [`VALID_DEFINITION`] references.
    pub fn with_valid_artifacts() -> Result<Self, String> {
        let config = Self::new()?;
        config.write("base-images/slemicro.raw", "")?;
        config.write("kubernetes/helm/values/metallb.yaml", "controller: {}\n")?;
        config.write("kubernetes/helm/certs/ca.crt", "-----BEGIN CERTIFICATE-----\n")?;
        config.write("kubernetes/config/server.yaml", DUAL_STACK_SERVER_CONFIG)?;
        Ok(config)
    }

    /// Returns the directory root.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Returns the layout rooted at this directory.
    pub fn layout(&self) -> ImageConfigLayout {
        ImageConfigLayout::new(self.dir.path())
    }

    /// Writes a file relative to the root, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> Result<(), String> {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| err.to_string())?;
        }
        fs::write(&path, content).map_err(|err| err.to_string())
    }

    /// Removes a file relative to the root.
    pub fn remove(&self, relative: &str) -> Result<(), String> {
        fs::remove_file(self.dir.path().join(relative)).map_err(|err| err.to_string())
    }
}

// ============================================================================
// SECTION: Fault Injection
// ============================================================================

/// Probe that fails for every path under a prefix and defers elsewhere.
pub struct FaultyProbe<P> {
    /// Paths under this prefix fail with permission denied.
    pub failing: PathBuf,
    /// Probe used for every other path.
    pub inner: P,
}

impl<P> FaultyProbe<P> {
    /// Returns the injected fault for `path`, if any.
    fn fault(&self, path: &Path) -> Option<ProbeError> {
        path.starts_with(&self.failing).then(|| ProbeError::Io {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        })
    }
}

impl<P: FileProbe> FileProbe for FaultyProbe<P> {
    fn exists(&self, path: &Path) -> Result<bool, ProbeError> {
        match self.fault(path) {
            Some(err) => Err(err),
            None => self.inner.exists(path),
        }
    }

    fn has_entries(&self, path: &Path) -> Result<bool, ProbeError> {
        match self.fault(path) {
            Some(err) => Err(err),
            None => self.inner.has_entries(path),
        }
    }
}

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Dual-stack server config matching [`VALID_DEFINITION`].
pub const DUAL_STACK_SERVER_CONFIG: &str = "\
cluster-cidr: 10.42.0.0/16,fd12:3456:789b::/48
service-cidr: 10.43.0.0/16,fd12:3456:789c::/112
write-kubeconfig-mode: \"0644\"
";

/// Definition that passes every rule given [`ConfigDir::with_valid_artifacts`].
pub const VALID_DEFINITION: &str = r#"
apiVersion: "1.2"
image:
  imageType: raw
  arch: x86_64
  baseImage: slemicro.raw
  outputImageName: edge.raw
operatingSystem:
  kernelArgs:
    - console=ttyS0
    - quiet=1
  groups:
    - name: ops
  users:
    - username: alice
      encryptedPassword: $6$salt$hash
      sshKeys:
        - ssh-ed25519 AAAA alice
      createHomeDir: true
  systemd:
    enable:
      - sshd
    disable:
      - cups
  packages:
    packageList:
      - vim
    additionalRepos:
      - url: https://download.example.com/repo
    sccRegistrationCode: REG-CODE
  rawConfiguration:
    diskSize: 64G
    luksKey: secret
    expandEncryptedPartition: true
  time:
    timezone: Europe/London
    ntp:
      forceWait: true
      pools:
        - 2.suse.pool.ntp.org
  enableFIPS: true
embeddedArtifactRegistry:
  images:
    - name: docker.io/library/nginx:1.27
  registries:
    - uri: docker.io
      authentication:
        username: user
        password: pass
kubernetes:
  version: v1.30.3+k3s1
  network:
    apiVIP: 192.168.122.100
    apiVIP6: fd12:3456:789a::21
  nodes:
    - hostname: node1
      type: server
      initializer: true
    - hostname: node2
      type: agent
  manifests:
    urls:
      - https://example.com/manifest.yaml
  helm:
    charts:
      - name: metallb
        releaseName: lb
        repositoryName: suse-edge
        version: 0.14.3
        targetNamespace: metallb-system
        createNamespace: true
        valuesFile: metallb.yaml
        apiVersions:
          - metallb.io/v1beta1
    repositories:
      - name: suse-edge
        url: https://suse-edge.github.io/charts
        caFile: ca.crt
"#;
