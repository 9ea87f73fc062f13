// crates/edge-image-definition/tests/common/mod.rs
// =============================================================================
// Module: Definition Test Helpers
// Description: Shared helpers for definition decoding tests.
// Purpose: Reduce duplication across integration tests for edge-image-definition.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use edge_image_definition::ConfigDriveDefinition;
use edge_image_definition::ImageDefinition;

/// Parses a YAML string into an `ImageDefinition` for tests.
pub fn definition_from_yaml(yaml: &str) -> Result<ImageDefinition, String> {
    serde_yaml::from_str(yaml).map_err(|err| err.to_string())
}

/// Parses a YAML string into a `ConfigDriveDefinition` for tests.
pub fn config_drive_from_yaml(yaml: &str) -> Result<ConfigDriveDefinition, String> {
    serde_yaml::from_str(yaml).map_err(|err| err.to_string())
}

/// Full definition exercising every section.
pub const FULL_DEFINITION: &str = r#"
apiVersion: "1.2"
image:
  imageType: raw
  arch: x86_64
  baseImage: slemicro.raw
  outputImageName: edge.raw
operatingSystem:
  kernelArgs:
    - console=ttyS0
  groups:
    - name: ops
      gid: 2000
  users:
    - username: alice
      encryptedPassword: $6$salt$hash
      sshKeys:
        - ssh-ed25519 AAAA alice
      createHomeDir: true
      secondaryGroups:
        - ops
  systemd:
    enable:
      - sshd
    disable:
      - cups
  packages:
    noGPGCheck: false
    enableExtras: true
    packageList:
      - vim
    additionalRepos:
      - url: https://download.example.com/repo
        unsigned: true
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
  proxy:
    httpProxy: http://proxy:3128
    noProxy:
      - localhost
  keymap: us
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
    apiHost: api.cluster.local
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
        installationNamespace: kube-system
        valuesFile: metallb.yaml
        apiVersions:
          - metallb.io/v1beta1
    repositories:
      - name: suse-edge
        url: https://suse-edge.github.io/charts
        caFile: ca.crt
"#;
