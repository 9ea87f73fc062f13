// crates/edge-image-validation/src/kubernetes/nodes.rs
// ============================================================================
// Module: Kubernetes Node Validation
// Description: Role and addressing rules for multi-node clusters.
// Purpose: Ensure a multi-node cluster can elect and reach its control plane.
// Dependencies: edge-image-definition
// ============================================================================

//! ## Overview
//! Clusters of two or more nodes need an API VIP, unique hostnames, a valid
//! type per node, a server node, and at most one initialiser, which must be a
//! server.

use edge_image_definition::Kubernetes;
use edge_image_definition::NODE_TYPE_SERVER;
use edge_image_definition::VALID_NODE_TYPES;

use crate::duplicates::find_duplicates;
use crate::failure::Failure;

/// Validates the node list; single-node clusters need no coordination.
#[must_use]
pub fn validate_nodes(kubernetes: &Kubernetes) -> Vec<Failure> {
    let mut failures = Vec::new();
    let nodes = &kubernetes.nodes;
    if nodes.len() <= 1 {
        return failures;
    }

    if !kubernetes.network.has_api_vip() {
        failures.push(Failure::new(
            "At least one of the (`apiVIP`, `apiVIP6`) fields is required in the 'network' \
             section for multi node clusters.",
        ));
    }

    for node in nodes {
        if node.hostname.is_empty() {
            failures.push(Failure::new(
                "The 'hostname' field is required for entries in the 'nodes' section.",
            ));
        }
        if !VALID_NODE_TYPES.contains(&node.node_type.as_str()) {
            failures.push(Failure::new(format!(
                "The 'type' field for entries in the 'nodes' section must be one of: {}",
                VALID_NODE_TYPES.join(", ")
            )));
        }
        if node.initialiser && !node.is_server() {
            failures.push(Failure::new(format!(
                "The node labeled with 'initialiser' must be of type '{NODE_TYPE_SERVER}'."
            )));
        }
    }

    let hostnames =
        nodes.iter().map(|node| node.hostname.as_str()).filter(|hostname| !hostname.is_empty());
    let duplicates = find_duplicates(hostnames);
    if !duplicates.is_empty() {
        failures.push(Failure::new(format!(
            "The 'nodes' section contains duplicate entries: {}",
            duplicates.join(", ")
        )));
    }

    if kubernetes.server_count() == 0 {
        failures.push(Failure::new(format!(
            "There must be at least one node of type '{NODE_TYPE_SERVER}' defined."
        )));
    }

    if nodes.iter().filter(|node| node.initialiser).count() > 1 {
        failures.push(Failure::new("Only one node may be specified as the cluster initializer."));
    }
    failures
}
