use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The entry a [`DualIndex`] keeps for every registered child key.
///
/// It holds the child's optional value and the parents that reference it, in the order the links
/// were made. A parent appears once per link, so it can be listed more than once.
///
/// Records handed out by [`snapshot_children`] are owned copies and can be freely modified.
///
/// [`DualIndex`]: crate::DualIndex
/// [`snapshot_children`]: crate::DualIndex::snapshot_children
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChildRecord<K, V> {
    /// The value attached to the child, `None` until one is set
    pub value: Option<V>,
    /// The parents linked to the child, in arrival order
    pub parents: Vec<K>,
}

impl<K, V> ChildRecord<K, V> {
    /// Creates a record with no value and no parents
    pub fn new() -> Self {
        Self {
            value: None,
            parents: Vec::new(),
        }
    }

    /// Returns true if the record has no parent links
    pub fn is_orphan(&self) -> bool {
        self.parents.is_empty()
    }
}

impl<K, V> Default for ChildRecord<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone> Clone for ChildRecord<K, V> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            parents: self.parents.clone(),
        }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for ChildRecord<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.value.eq(&other.value) && self.parents.eq(&other.parents)
    }
}

impl<K: Eq, V: Eq> Eq for ChildRecord<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for ChildRecord<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ChildRecord {{ value: {:?}, parents: {:?} }}",
            self.value, self.parents
        )
    }
}
