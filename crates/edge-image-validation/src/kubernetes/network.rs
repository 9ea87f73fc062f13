// crates/edge-image-validation/src/kubernetes/network.rs
// ============================================================================
// Module: Kubernetes Network Validation
// Description: Control-plane address and server config networking rules.
// Purpose: Enforce single- and dual-stack addressing correctness.
// Dependencies: edge-image-definition, tracing
// ============================================================================

//! ## Overview
//! Two sources describe cluster addressing. The definition declares the API
//! virtual addresses (`apiVIP`, `apiVIP6`), each validated independently for
//! family and unicast-ness. The server config file declares `cluster-cidr`,
//! `service-cidr`, and `node-ip`.
//!
//! Declaring both API addresses requests dual-stack, which requires both CIDR
//! keys to carry one block per family. When a field lists two blocks, the
//! family listed first is that field's priority, and `cluster-cidr` and
//! `service-cidr` must agree on it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::IpAddr;

use edge_image_definition::Kubernetes;
use edge_image_definition::Network;

use crate::failure::Failure;
use crate::layout::ImageConfigLayout;
use crate::network::AddressError;
use crate::network::AddressFamily;
use crate::network::Cidr;
use crate::network::is_unicast;
use crate::network::validate_address;
use crate::probe::ServerConfigReader;
use crate::probe::ServerNetworkConfig;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Server config key for pod network blocks.
const CLUSTER_CIDR_KEY: &str = "cluster-cidr";
/// Server config key for service network blocks.
const SERVICE_CIDR_KEY: &str = "service-cidr";
/// Server config key for advertised node addresses.
const NODE_IP_KEY: &str = "node-ip";

/// Definition field holding the IPv4 API address.
const API_VIP4_FIELD: &str = "apiVIP";
/// Definition field holding the IPv6 API address.
const API_VIP6_FIELD: &str = "apiVIP6";

/// Blocks per CIDR key in a dual-stack cluster.
const DUAL_STACK_ENTRIES: usize = 2;

// ============================================================================
// SECTION: API Addresses
// ============================================================================

/// Validates the API virtual addresses.
#[must_use]
pub fn validate_network(network: &Network) -> Vec<Failure> {
    let mut failures = Vec::new();
    if !network.api_vip4.is_empty() {
        failures.extend(validate_api_address(&network.api_vip4, API_VIP4_FIELD, AddressFamily::V4));
    }
    if !network.api_vip6.is_empty() {
        failures.extend(validate_api_address(&network.api_vip6, API_VIP6_FIELD, AddressFamily::V6));
    }
    failures
}

/// Validates one API address against its family.
fn validate_api_address(value: &str, field: &str, family: AddressFamily) -> Option<Failure> {
    match validate_address(value, family) {
        Ok(address) if is_unicast(address) => None,
        Ok(_) => Some(Failure::new(format!(
            "Non-unicast cluster API address ({value}) for field '{field}' is invalid."
        ))),
        Err(err @ AddressError::FamilyMismatch { .. }) => Some(Failure::with_cause(
            format!("Only {family} addresses are valid for field '{field}'."),
            err,
        )),
        Err(err) => Some(Failure::with_cause(
            format!("Invalid address value \"{value}\" for field '{field}'."),
            err,
        )),
    }
}

// ============================================================================
// SECTION: Server Config
// ============================================================================

/// Validates the server config networking keys against the definition.
///
/// A missing server config is only reported when dual-stack is requested.
#[must_use]
pub fn validate_server_config(
    kubernetes: &Kubernetes,
    layout: &ImageConfigLayout,
    reader: &dyn ServerConfigReader,
) -> Vec<Failure> {
    let path = layout.server_config();
    match reader.read(&path) {
        Ok(Some(config)) => {
            let mut failures = validate_cidr_config(&kubernetes.network, &config);
            failures.extend(validate_node_ip(kubernetes, &config));
            failures
        }
        Ok(None) if kubernetes.network.is_dual_stack() => vec![Failure::new(format!(
            "Kubernetes server config could not be found at '{}'; dual-stack configuration \
             requires a valid cluster-cidr and service-cidr.",
            path.display()
        ))],
        Ok(None) => Vec::new(),
        Err(err) => {
            tracing::error!(path = %path.display(), error = %err, "server config could not be read");
            vec![Failure::with_cause(
                format!("Kubernetes server config at '{}' could not be read.", path.display()),
                err,
            )]
        }
    }
}

/// Validates `cluster-cidr` and `service-cidr`.
#[must_use]
pub fn validate_cidr_config(network: &Network, config: &ServerNetworkConfig) -> Vec<Failure> {
    let dual_stack = network.is_dual_stack();
    let mut failures = Vec::new();
    let cluster = validate_cidr_key(CLUSTER_CIDR_KEY, config.cluster_cidr.as_deref(), dual_stack);
    let service = validate_cidr_key(SERVICE_CIDR_KEY, config.service_cidr.as_deref(), dual_stack);
    failures.extend(cluster.failures);
    failures.extend(service.failures);

    if let (Some(cluster), Some(service)) = (cluster.priority, service.priority)
        && cluster != service
    {
        failures.push(Failure::new(format!(
            "Kubernetes server config {CLUSTER_CIDR_KEY} cannot prioritize one address family \
             while {SERVICE_CIDR_KEY} prioritizes another; both must have the same priority"
        )));
    }
    failures
}

/// Outcome of validating one CIDR key.
struct CidrKeyOutcome {
    /// Failures for the key.
    failures: Vec<Failure>,
    /// Family listed first, when the key holds one valid block per family.
    priority: Option<AddressFamily>,
}

/// Validates one comma-separated CIDR key.
fn validate_cidr_key(key: &str, value: Option<&str>, dual_stack: bool) -> CidrKeyOutcome {
    let mut failures = Vec::new();
    let entries = split_list(value);
    let missing_for_dual_stack = dual_stack && entries.len() < DUAL_STACK_ENTRIES;
    if entries.len() > DUAL_STACK_ENTRIES || missing_for_dual_stack {
        failures.push(Failure::new(format!(
            "Kubernetes server config must contain a valid {key} when configuring dual-stack"
        )));
        return CidrKeyOutcome {
            failures,
            priority: None,
        };
    }

    let mut families = Vec::new();
    for entry in &entries {
        match entry.parse::<Cidr>() {
            Ok(block) => {
                if !is_unicast(block.address()) {
                    failures.push(Failure::new(format!(
                        "Kubernetes server config {key} value '{entry}' must be a valid unicast \
                         address"
                    )));
                }
                families.push(block.family());
            }
            Err(err) => failures.push(Failure::with_cause(
                format!("Kubernetes server config {key} value '{entry}' could not be parsed"),
                err,
            )),
        }
    }

    let mut priority = None;
    if let [first, second] = families.as_slice() {
        if first == second {
            failures.push(same_family_failure(key));
        } else {
            priority = Some(*first);
        }
    }
    CidrKeyOutcome {
        failures,
        priority,
    }
}

/// Validates `node-ip`.
#[must_use]
pub fn validate_node_ip(kubernetes: &Kubernetes, config: &ServerNetworkConfig) -> Vec<Failure> {
    let mut failures = Vec::new();
    let entries = split_list(config.node_ip.as_deref());
    if entries.is_empty() {
        return failures;
    }
    if kubernetes.server_count() > 1 {
        failures.push(Failure::new(format!(
            "Kubernetes server config {NODE_IP_KEY} can not be specified when there is more than \
             one Kubernetes server node"
        )));
    }

    let mut families = Vec::new();
    for entry in &entries {
        match entry.parse::<IpAddr>() {
            Ok(address) => {
                if !is_unicast(address) {
                    failures.push(Failure::new(format!(
                        "Kubernetes server config {NODE_IP_KEY} value '{entry}' must be a valid \
                         unicast address"
                    )));
                }
                families.push(AddressFamily::of(address));
            }
            Err(_) => failures.push(Failure::with_cause(
                format!("Kubernetes server config {NODE_IP_KEY} value '{entry}' could not be parsed"),
                AddressError::InvalidAddress((*entry).to_string()),
            )),
        }
    }

    let repeats =
        families.iter().enumerate().any(|(index, family)| families[..index].contains(family));
    if repeats {
        failures.push(same_family_failure(NODE_IP_KEY));
    }
    failures
}

/// Failure for a key listing two addresses of one family.
fn same_family_failure(key: &str) -> Failure {
    Failure::new(format!(
        "Kubernetes server config {key} cannot contain addresses of the same IP address family; \
         one must be IPv4, and the other IPv6"
    ))
}

/// Splits a comma-separated server config value into trimmed entries.
fn split_list(value: Option<&str>) -> Vec<&str> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| value.split(',').map(str::trim).collect())
        .unwrap_or_default()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
