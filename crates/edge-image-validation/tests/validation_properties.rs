//! Validation property tests for edge-image-validation.
// crates/edge-image-validation/tests/validation_properties.rs
// =============================================================================
// Module: Validation Property Tests
// Description: Property checks for rule counting, exemptions, and determinism.
// Purpose: Ensure rule outcomes hold for generated inputs, not just fixtures.
// =============================================================================

use std::collections::HashMap;
use std::net::IpAddr;

use edge_image_definition::ImageDefinition;
use edge_image_definition::Kubernetes;
use edge_image_definition::Node;
use edge_image_validation::Validator;
use edge_image_validation::find_duplicates;
use edge_image_validation::is_unicast;
use edge_image_validation::kubernetes::validate_nodes;
use edge_image_validation::operating_system::validate_kernel_args;
use proptest::prelude::*;

/// Failure reported once per malformed kernel argument.
const MALFORMED_MESSAGE: &str = "Kernel arguments must be specified as 'key=value'.";
/// Prefix of the duplicate kernel argument failure.
const DUPLICATE_PREFIX: &str = "Duplicate kernel argument found: ";

/// Nodes with any mix of missing and invalid fields.
fn node_strategy() -> impl Strategy<Value = Node> {
    (
        prop::sample::select(vec!["", "node1", "node2", "Node 3"]),
        prop::sample::select(vec!["", "server", "agent", "worker"]),
        any::<bool>(),
    )
        .prop_map(|(hostname, node_type, initialiser)| Node {
            hostname: hostname.to_string(),
            node_type: node_type.to_string(),
            initialiser,
        })
}

/// Well-formed `kN=vN` arguments mixed with malformed ones.
fn kernel_arg_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (0_u8..4, 0_u8..3).prop_map(|(key, value)| format!("k{key}=v{value}")),
        prop::sample::select(vec!["baz", "=v", "k0=", "="]).prop_map(str::to_string),
    ]
}

/// Mirrors the `key=value` rule for expected counts.
fn is_well_formed(arg: &str) -> bool {
    arg.split_once('=').is_some_and(|(key, value)| !key.is_empty() && !value.is_empty())
}

proptest! {
    #[test]
    fn single_node_clusters_are_exempt(node in node_strategy(), vip in any::<bool>()) {
        let mut kubernetes = Kubernetes {
            version: "v1.30.3+k3s1".to_string(),
            nodes: vec![node],
            ..Kubernetes::default()
        };
        if vip {
            kubernetes.network.api_vip4 = "192.168.122.100".to_string();
        }
        prop_assert!(validate_nodes(&kubernetes).is_empty());
    }

    #[test]
    fn kernel_arg_failures_are_counted_per_entry(
        args in prop::collection::vec(kernel_arg_strategy(), 0..12),
    ) {
        let failures = validate_kernel_args(&args);
        let malformed = args.iter().filter(|arg| !is_well_formed(arg)).count();
        let mut key_counts: HashMap<&str, usize> = HashMap::new();
        for arg in args.iter().filter(|arg| is_well_formed(arg)) {
            let key = arg.split('=').next().unwrap_or_default();
            *key_counts.entry(key).or_default() += 1;
        }
        let repeated = key_counts.values().filter(|count| **count > 1).count();

        let reported_malformed =
            failures.iter().filter(|failure| failure.user_message() == MALFORMED_MESSAGE).count();
        let reported_duplicates = failures
            .iter()
            .filter(|failure| failure.user_message().starts_with(DUPLICATE_PREFIX))
            .count();
        prop_assert_eq!(reported_malformed, malformed);
        prop_assert_eq!(reported_duplicates, repeated);
    }

    #[test]
    fn duplicates_are_exactly_the_repeated_keys(
        keys in prop::collection::vec(0_u8..8, 0..24),
    ) {
        let duplicates = find_duplicates(keys.iter().copied());
        let mut counts: HashMap<u8, usize> = HashMap::new();
        for key in &keys {
            *counts.entry(*key).or_default() += 1;
        }
        let mut expected: Vec<u8> =
            counts.iter().filter(|(_, count)| **count > 1).map(|(key, _)| *key).collect();
        let first_positions: Vec<Option<usize>> = duplicates
            .iter()
            .map(|duplicate| keys.iter().position(|key| key == duplicate))
            .collect();
        prop_assert!(first_positions.windows(2).all(|pair| pair[0] < pair[1]));

        let mut actual = duplicates.clone();
        expected.sort_unstable();
        actual.sort_unstable();
        prop_assert_eq!(actual, expected);
        prop_assert!(find_duplicates(duplicates.iter().copied()).is_empty());
    }

    #[test]
    fn repeated_runs_are_identical(
        args in prop::collection::vec(kernel_arg_strategy(), 0..6),
        nodes in prop::collection::vec(node_strategy(), 0..4),
        urls in prop::collection::vec(
            prop::sample::select(vec!["https://a.io/m.yaml", "ftp://b.io/m.yaml", ""]),
            0..4,
        ),
    ) {
        let mut definition = ImageDefinition::default();
        definition.operating_system.kernel_args = args;
        definition.kubernetes.version = "v1.30.3+rke2r1".to_string();
        definition.kubernetes.nodes = nodes;
        definition.kubernetes.manifests.urls = urls.into_iter().map(str::to_string).collect();

        let dir = tempfile::tempdir().map_err(|err| TestCaseError::fail(err.to_string()))?;
        let validator = Validator::new(dir.path());
        prop_assert_eq!(validator.validate(&definition), validator.validate(&definition));
    }
}

#[test]
fn reserved_addresses_are_not_unicast() -> Result<(), String> {
    let rejected = [
        "169.254.1.1",
        "224.224.224.224",
        "127.0.0.1",
        "0.0.0.0",
        "FE80::1",
        "FF01::1",
        "::1",
        "::",
    ];
    for value in rejected {
        let address: IpAddr = value.parse().map_err(|_| format!("{value} should parse"))?;
        if is_unicast(address) {
            return Err(format!("{value} should not be unicast"));
        }
    }
    for value in ["10.42.0.0", "192.168.122.100", "fd12:3456:789a::21"] {
        let address: IpAddr = value.parse().map_err(|_| format!("{value} should parse"))?;
        if !is_unicast(address) {
            return Err(format!("{value} should be unicast"));
        }
    }
    Ok(())
}
