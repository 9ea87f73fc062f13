// crates/edge-image-validation/src/kubernetes/manifests.rs
// ============================================================================
// Module: Kubernetes Manifest Validation
// Description: Rules for remote manifest URLs.
// Purpose: Ensure manifest URLs are fetchable and listed once.
// Dependencies: edge-image-definition
// ============================================================================

//! ## Overview
//! Remote manifest URLs must use an `http://` or `https://` scheme and appear
//! once. Local manifests are checked with the additional artifacts.

use edge_image_definition::Manifests;

use crate::duplicates::find_duplicates;
use crate::failure::Failure;

/// Validates manifest URLs.
#[must_use]
pub fn validate_manifest_urls(manifests: &Manifests) -> Vec<Failure> {
    let mut failures = Vec::new();
    for url in &manifests.urls {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            failures.push(Failure::new(
                "Entries in 'urls' must begin with either 'http://' or 'https://'.",
            ));
        }
    }
    for url in find_duplicates(manifests.urls.iter().map(String::as_str)) {
        failures.push(Failure::new(format!("The 'urls' field contains duplicate entries: {url}")));
    }
    failures
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifests(urls: &[&str]) -> Manifests {
        Manifests {
            urls: urls.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn accepts_http_and_https() {
        let urls = manifests(&["http://a.example/m.yaml", "https://b.example/m.yaml"]);
        assert!(validate_manifest_urls(&urls).is_empty());
    }

    #[test]
    fn rejects_other_schemes_and_duplicates() {
        let urls = manifests(&["ftp://a/m.yaml", "httpx://b", "https://c", "https://c", "https://c"]);
        let failures = validate_manifest_urls(&urls);
        let messages: Vec<&str> = failures.iter().map(Failure::user_message).collect();
        assert_eq!(
            messages,
            [
                "Entries in 'urls' must begin with either 'http://' or 'https://'.",
                "Entries in 'urls' must begin with either 'http://' or 'https://'.",
                "The 'urls' field contains duplicate entries: https://c",
            ]
        );
    }
}
