//! Structural invariants of the ordered index.
//!
//! These walk the whole tree (O(n)) and are meant for tests and for
//! validating an index rebuilt from persisted data.

use super::node::Link;
use super::tree::OrderedIndex;

/// INVARIANT-2: in-order traversal is strictly ascending (which also rules
/// out duplicate keys).
pub fn invariant_sorted<K: Ord, V>(index: &OrderedIndex<K, V>) -> bool {
    let mut keys = index.keys();
    let Some(mut previous) = keys.next() else {
        return true;
    };
    for key in keys {
        if previous >= key {
            return false;
        }
        previous = key;
    }
    true
}

/// INVARIANT-3 and INVARIANT-4: every cached height is exact and every
/// balance factor lies in `{-1, 0, 1}`.
pub fn invariant_balanced<K, V>(index: &OrderedIndex<K, V>) -> bool {
    checked_height(&index.root).is_some()
}

/// The number of reachable entries matches `len()`.
pub fn invariant_len<K, V>(index: &OrderedIndex<K, V>) -> bool {
    index.iter().count() == index.len()
}

/// All structural invariants at once.
pub fn verify<K: Ord, V>(index: &OrderedIndex<K, V>) -> bool {
    invariant_sorted(index) && invariant_balanced(index) && invariant_len(index)
}

/// Recomputes the height of `link`, or `None` if any node in it is
/// unbalanced or carries a stale height.
fn checked_height<K, V>(link: &Link<K, V>) -> Option<u32> {
    let Some(node) = link.as_deref() else {
        return Some(0);
    };
    let left = checked_height(&node.left)?;
    let right = checked_height(&node.right)?;
    let height = 1 + left.max(right);

    if left.abs_diff(right) > 1 || node.height != height {
        return None;
    }
    Some(height)
}
