// crates/edge-image-validation/src/duplicates.rs
// ============================================================================
// Module: Duplicate Checker
// Description: Finds keys that repeat within an ordered sequence.
// Purpose: Keep every "duplicate X" rule consistent across validators.
// Dependencies: none
// ============================================================================

//! ## Overview
//! [`find_duplicates`] backs every "contains duplicate entries" rule, so each
//! validator reports repeated keys once and in the same order.

use std::collections::HashMap;
use std::hash::Hash;

/// Returns the keys occurring more than once, each reported once.
///
/// Keys are reported in the order of their first occurrence, so
/// `[foo, bar, bar, foo]` yields `[foo, bar]`.
#[must_use]
pub fn find_duplicates<I, K>(keys: I) -> Vec<K>
where
    I: IntoIterator<Item = K>,
    K: Eq + Hash + Clone,
{
    let mut counts: HashMap<K, usize> = HashMap::new();
    let mut first_seen = Vec::new();
    for key in keys {
        let count = counts.entry(key.clone()).or_insert(0);
        if *count == 0 {
            first_seen.push(key);
        }
        *count += 1;
    }
    first_seen.into_iter().filter(|key| counts.get(key).is_some_and(|count| *count > 1)).collect()
}
