// crates/edge-image-definition/src/kubernetes.rs
// ============================================================================
// Module: Kubernetes Section
// Description: Kubernetes cluster definition records.
// Purpose: Describe cluster version, addressing, nodes, manifests, and Helm.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The `kubernetes` section defines the cluster installed on the image. A
//! cluster is considered defined only when its version string is non-empty;
//! every other field is ignored by the build when the version is blank.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Control-plane node role.
pub const NODE_TYPE_SERVER: &str = "server";
/// Worker node role.
pub const NODE_TYPE_AGENT: &str = "agent";
/// Supported node roles, in display order.
pub const VALID_NODE_TYPES: &[&str] = &[NODE_TYPE_SERVER, NODE_TYPE_AGENT];

// ============================================================================
// SECTION: Cluster
// ============================================================================

/// Kubernetes cluster definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Kubernetes {
    /// Distribution version, e.g. `v1.30.3+k3s1`.
    pub version: String,
    /// Control-plane addressing.
    pub network: Network,
    /// Cluster nodes.
    pub nodes: Vec<Node>,
    /// Remote manifests applied after install.
    pub manifests: Manifests,
    /// Helm charts and repositories.
    pub helm: Helm,
}

impl Kubernetes {
    /// Returns true when a cluster version is declared.
    #[must_use]
    pub fn is_defined(&self) -> bool {
        !self.version.is_empty()
    }

    /// Returns the number of nodes with the server role.
    #[must_use]
    pub fn server_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_server()).count()
    }
}

/// Control-plane addressing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Network {
    /// Host name resolving to the cluster API.
    pub api_host: String,
    /// IPv4 virtual address of the cluster API.
    #[serde(rename = "apiVIP")]
    pub api_vip4: String,
    /// IPv6 virtual address of the cluster API.
    #[serde(rename = "apiVIP6")]
    pub api_vip6: String,
}

impl Network {
    /// Returns true when at least one API address is declared.
    #[must_use]
    pub fn has_api_vip(&self) -> bool {
        !self.api_vip4.is_empty() || !self.api_vip6.is_empty()
    }

    /// Returns true when both IPv4 and IPv6 API addresses are declared.
    #[must_use]
    pub fn is_dual_stack(&self) -> bool {
        !self.api_vip4.is_empty() && !self.api_vip6.is_empty()
    }
}

/// Cluster node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Node {
    /// Node host name.
    pub hostname: String,
    /// Node role (`server` or `agent`).
    #[serde(rename = "type")]
    pub node_type: String,
    /// Marks the node that bootstraps the control plane.
    #[serde(rename = "initializer")]
    pub initialiser: bool,
}

impl Node {
    /// Returns true when the node has the server role.
    #[must_use]
    pub fn is_server(&self) -> bool {
        self.node_type == NODE_TYPE_SERVER
    }
}

/// Remote manifests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Manifests {
    /// Manifest URLs.
    pub urls: Vec<String>,
}

// ============================================================================
// SECTION: Helm
// ============================================================================

/// Helm charts and the repositories they are pulled from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Helm {
    /// Charts to install.
    pub charts: Vec<HelmChart>,
    /// Chart repositories.
    pub repositories: Vec<HelmRepository>,
}

/// Helm chart installation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct HelmChart {
    /// Chart name.
    pub name: String,
    /// Release name; defaults to the chart name downstream.
    pub release_name: String,
    /// Name of the repository the chart is pulled from.
    pub repository_name: String,
    /// Chart version.
    pub version: String,
    /// Namespace the release is installed into.
    pub target_namespace: String,
    /// Creates the target namespace.
    pub create_namespace: bool,
    /// Namespace holding the Helm controller resource.
    pub installation_namespace: String,
    /// Values file name, relative to the values directory.
    pub values_file: String,
    /// Kubernetes API versions passed to chart templating.
    pub api_versions: Vec<String>,
}

/// Helm chart repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct HelmRepository {
    /// Repository name referenced by charts.
    pub name: String,
    /// Repository URL (`oci://`, `http://`, or `https://`).
    pub url: String,
    /// Repository credentials.
    pub authentication: HelmAuthentication,
    /// Uses plain HTTP for the repository.
    #[serde(rename = "plainHTTP")]
    pub plain_http: bool,
    /// Skips TLS certificate verification.
    #[serde(rename = "skipTLSVerify")]
    pub skip_tls_verify: bool,
    /// CA certificate file name, relative to the certs directory.
    pub ca_file: String,
}

/// Helm repository credentials; both fields are supplied together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HelmAuthentication {
    /// Repository user name.
    pub username: String,
    /// Repository password.
    pub password: String,
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_defined_only_by_version() {
        let mut kubernetes = Kubernetes {
            nodes: vec![Node::default(), Node::default()],
            ..Kubernetes::default()
        };
        assert!(!kubernetes.is_defined());
        kubernetes.version = "v1.30.3+k3s1".to_string();
        assert!(kubernetes.is_defined());
    }

    #[test]
    fn network_stack_detection() {
        let mut network = Network {
            api_vip4: "192.168.1.1".to_string(),
            ..Network::default()
        };
        assert!(network.has_api_vip());
        assert!(!network.is_dual_stack());
        network.api_vip6 = "fd12:3456:789a::21".to_string();
        assert!(network.is_dual_stack());
    }
}
