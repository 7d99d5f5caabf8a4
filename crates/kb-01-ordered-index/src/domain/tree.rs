//! # OrderedIndex
//!
//! Key-value map backed by an AVL tree. All keyed operations are O(log n).

use super::errors::IndexError;
use super::iter::Iter;
use super::node::{self, Link, Node};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

/// Ordered key-value storage with AVL balancing.
///
/// INVARIANTS:
/// - INVARIANT-1: No duplicate keys
/// - INVARIANT-2: In-order traversal yields keys in ascending order
/// - INVARIANT-3: Every node's subtrees differ in height by at most one
///
/// Node layout and balance information never leave this module; callers
/// only see keys and values.
#[derive(Clone)]
pub struct OrderedIndex<K, V> {
    pub(crate) root: Link<K, V>,
    len: usize,
}

impl<K, V> OrderedIndex<K, V> {
    /// Creates an empty index.
    pub const fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the tree (0 when empty).
    pub fn height(&self) -> usize {
        node::height(&self.root) as usize
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Ascending iterator over `(key, value)` pairs.
    ///
    /// Calling `iter()` again restarts from the smallest key. The index cannot
    /// be mutated while the returned iterator is alive.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.root, self.len)
    }

    /// Ascending iterator over keys.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Values in ascending key order.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, value)| value)
    }

    /// Entry with the smallest key.
    pub fn first(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some((&node.key, &node.value))
    }

    /// Entry with the largest key.
    pub fn last(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some((&node.key, &node.value))
    }
}

impl<K: Ord, V> OrderedIndex<K, V> {
    /// Inserts `value` under `key` and returns the stored value.
    ///
    /// # Errors
    /// - `DuplicateKey` if `key` is already present; the index is unchanged.
    pub fn insert(&mut self, key: K, value: V) -> Result<&mut V, IndexError>
    where
        K: Clone,
    {
        let probe = key.clone();
        Self::insert_at(&mut self.root, key, value)?;
        self.len += 1;
        self.get_mut(&probe)
    }

    /// Looks up the value stored under `key`.
    ///
    /// # Errors
    /// - `KeyNotFound` if `key` is absent.
    pub fn get<Q>(&self, key: &Q) -> Result<&V, IndexError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cursor = self.root.as_deref();
        while let Some(node) = cursor {
            match key.cmp(node.key.borrow()) {
                Ordering::Less => cursor = node.left.as_deref(),
                Ordering::Greater => cursor = node.right.as_deref(),
                Ordering::Equal => return Ok(&node.value),
            }
        }
        Err(IndexError::KeyNotFound)
    }

    /// Mutable lookup. Keys cannot be changed through the returned reference.
    ///
    /// # Errors
    /// - `KeyNotFound` if `key` is absent.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V, IndexError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cursor = self.root.as_deref_mut();
        while let Some(node) = cursor {
            match key.cmp(node.key.borrow()) {
                Ordering::Less => cursor = node.left.as_deref_mut(),
                Ordering::Greater => cursor = node.right.as_deref_mut(),
                Ordering::Equal => return Ok(&mut node.value),
            }
        }
        Err(IndexError::KeyNotFound)
    }

    /// Returns true if `key` is present. Never fails.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).is_ok()
    }

    /// Removes `key` and returns its value.
    ///
    /// A node with two children is replaced by its in-order successor.
    ///
    /// # Errors
    /// - `KeyNotFound` if `key` is absent; the index is unchanged.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<V, IndexError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let value = Self::remove_at(&mut self.root, key).ok_or(IndexError::KeyNotFound)?;
        self.len -= 1;
        Ok(value)
    }

    fn insert_at(link: &mut Link<K, V>, key: K, value: V) -> Result<(), IndexError> {
        match link {
            None => {
                *link = Some(Node::leaf(key, value));
                return Ok(());
            }
            Some(node) => match key.cmp(&node.key) {
                Ordering::Less => Self::insert_at(&mut node.left, key, value)?,
                Ordering::Greater => Self::insert_at(&mut node.right, key, value)?,
                Ordering::Equal => return Err(IndexError::DuplicateKey),
            },
        }
        node::rebalance(link);
        Ok(())
    }

    fn remove_at<Q>(link: &mut Link<K, V>, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = link.as_deref_mut()?;
        let removed = match key.cmp(node.key.borrow()) {
            Ordering::Less => Self::remove_at(&mut node.left, key)?,
            Ordering::Greater => Self::remove_at(&mut node.right, key)?,
            Ordering::Equal => {
                let mut target = link.take()?;
                *link = match (target.left.take(), target.right.take()) {
                    (None, None) => None,
                    (Some(child), None) | (None, Some(child)) => Some(child),
                    (Some(left), Some(right)) => {
                        let (mut successor, rest) = node::take_min(right);
                        successor.left = Some(left);
                        successor.right = rest;
                        Some(successor)
                    }
                };
                let Node { value, .. } = *target;
                value
            }
        };
        node::rebalance(link);
        Some(removed)
    }
}

impl<K, V> Default for OrderedIndex<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedIndex<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedIndex<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
