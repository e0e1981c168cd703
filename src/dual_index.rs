use core::borrow::Borrow;
use std::{
    fmt,
    hash::{BuildHasher, Hash},
    iter::FusedIterator,
};

use hashbrown::{
    hash_map::{self, DefaultHashBuilder, Entry},
    HashMap,
};
use tracing::trace;

use crate::error::{IndexError, IndexResult, Role};
use crate::link_policy::LinkPolicy;
use crate::record::ChildRecord;
use crate::utils::*;

/// A hash index of many-to-many links between parent keys and child keys.
///
/// [`DualIndex`] answers "who are this parent's children" and "who are this child's parents" in
/// the same near-constant time. Rather than storing a directed adjacency list and scanning it for
/// the reverse direction, it keeps two maps: a parent-map from each parent to its sequence of
/// children, and a child-map from each child to a [`ChildRecord`] holding an optional value and
/// its sequence of parents. Every link is written to both maps at once, so the two always agree.
///
/// A key can be a parent, a child, both, or (after deletion) neither. Entries are only ever
/// removed by an explicit delete; a parent whose last child was deleted stays registered with an
/// empty sequence, and likewise for children.
///
/// Sequences keep arrival order and, under the default [`LinkPolicy::Duplicate`], a repeated link
/// is recorded again. See [`LinkPolicy`] for the alternative.
///
/// Like the maps in [`hashbrown`], keys need to implement [`Eq`] and [`Hash`]. They also need to
/// implement [`Clone`] since each link stores the key on both sides. It is a logic error for a key
/// to be modified in a way that changes its hash or equality while it is in the index.
///
/// # Examples
/// ```
/// use dual_index::{DualIndex, IndexError, Role};
///
/// let mut pages: DualIndex<String, u16> = DualIndex::new();
///
/// // Linking a child registers both sides
/// pages.add_child_under("about".to_string(), ["index".to_string()]);
/// pages.add_child_under("contact".to_string(), ["index".to_string(), "about".to_string()]);
///
/// assert_eq!(pages.children_of("index").unwrap(), &["about", "contact"]);
/// assert_eq!(pages.parents_of("contact").unwrap(), &["index", "about"]);
///
/// // Children carry an optional value
/// pages.set_value("about", 200).unwrap();
/// assert_eq!(pages.get_value("about"), Ok(Some(&200)));
/// assert_eq!(pages.get_value("contact"), Ok(None));
/// assert_eq!(pages.get_value("missing"), Err(IndexError::KeyNotFound(Role::Child)));
///
/// // Deleting a key removes it from every sequence that referenced it
/// pages.delete("index");
/// assert!(!pages.exists("index"));
/// assert_eq!(pages.parents_of("contact").unwrap(), &["about"]);
/// assert!(pages.orphans().contains_key(&"about".to_string()));
/// ```
pub struct DualIndex<K, V, S = DefaultHashBuilder> {
    pub(crate) policy: LinkPolicy,
    pub(crate) parent_map: HashMap<K, Vec<K>, S>,
    pub(crate) child_map: HashMap<K, ChildRecord<K, V>, S>,
}

impl<K, V> DualIndex<K, V, DefaultHashBuilder> {
    /// Creates an empty index that uses the default link policy
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty index whose maps can each hold `capacity` keys without reallocating
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }

    /// Creates an empty index that handles repeated links according to `policy`
    #[inline]
    pub fn with_policy(policy: LinkPolicy) -> Self {
        let mut index = Self::new();
        index.policy = policy;
        index
    }
}

impl<K, V, S> DualIndex<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    /// Links `child` under every key in `parents`.
    ///
    /// The child is registered if it is not already, with no value. Each parent is registered if
    /// it is not already, then the parent is appended to the child's parent sequence and the child
    /// to the parent's child sequence. A single parent can be passed as `[parent]` or
    /// `Some(parent)`; an empty collection just registers the child.
    ///
    /// Under [`LinkPolicy::Duplicate`] repeated links are appended again, including a parent
    /// listed twice in the same call.
    pub fn add_child_under<I>(&mut self, child: K, parents: I)
    where
        I: IntoIterator<Item = K>,
    {
        let record = self
            .child_map
            .entry(child.clone())
            .or_insert_with(ChildRecord::new);
        let mut linked: usize = 0;
        let mut skipped: usize = 0;
        for parent in parents {
            if !self.policy.admits(&record.parents, &parent) {
                skipped += 1;
                continue;
            }
            self.parent_map
                .entry(parent.clone())
                .or_insert_with(Vec::new)
                .push(child.clone());
            record.parents.push(parent);
            linked += 1;
        }
        trace!(linked, skipped, "linked child under parents");
    }

    /// Registers every key in `parents` as a parent with no children.
    ///
    /// Keys that are already parents are left untouched. The child-map is never modified.
    pub fn register_parent<I>(&mut self, parents: I)
    where
        I: IntoIterator<Item = K>,
    {
        let mut created: usize = 0;
        for parent in parents {
            if let Entry::Vacant(entry) = self.parent_map.entry(parent) {
                entry.insert(Vec::new());
                created += 1;
            }
        }
        trace!(created, "registered parents");
    }

    /// Registers every key in `children` as a child with no value and no parents.
    ///
    /// Keys that are already children are left untouched. The parent-map is never modified.
    pub fn register_child<I>(&mut self, children: I)
    where
        I: IntoIterator<Item = K>,
    {
        let mut created: usize = 0;
        for child in children {
            if let Entry::Vacant(entry) = self.child_map.entry(child) {
                entry.insert(ChildRecord::new());
                created += 1;
            }
        }
        trace!(created, "registered children");
    }

    /// Sets the value of a registered child and returns the value it replaced.
    pub fn set_value<Q>(&mut self, child: &Q, value: V) -> IndexResult<Option<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let record = self.record_mut(child)?;
        Ok(record.value.replace(value))
    }

    /// Resets the value of a registered child to absent and returns the value it held.
    pub fn clear_value<Q>(&mut self, child: &Q) -> IndexResult<Option<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let record = self.record_mut(child)?;
        Ok(record.value.take())
    }

    /// Returns the value of a registered child, or `None` if no value has been set.
    pub fn get_value<Q>(&self, child: &Q) -> IndexResult<Option<&V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let record = self.record(child)?;
        Ok(record.value.as_ref())
    }

    /// Returns a mutable reference to the value of a registered child, or `None` if no value has
    /// been set.
    pub fn get_value_mut<Q>(&mut self, child: &Q) -> IndexResult<Option<&mut V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let record = self.record_mut(child)?;
        Ok(record.value.as_mut())
    }

    /// Returns the parents of a registered child in the order they were linked.
    pub fn parents_of<Q>(&self, child: &Q) -> IndexResult<&[K]>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let record = self.record(child)?;
        Ok(&record.parents)
    }

    /// Returns the children of a registered parent in the order they were linked.
    ///
    /// A key that is only registered as a child is not found here.
    pub fn children_of<Q>(&self, parent: &Q) -> IndexResult<&[K]>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.parent_map
            .get(parent)
            .map(Vec::as_slice)
            .ok_or(IndexError::KeyNotFound(Role::Parent))
    }

    /// Collects the value of each child of a registered parent.
    ///
    /// A child linked more than once appears once in the returned map.
    pub fn values_of_children<Q>(&self, parent: &Q) -> IndexResult<HashMap<&K, Option<&V>, S>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        S: Clone,
    {
        let children = self.children_of(parent)?;
        let mut digest =
            HashMap::with_capacity_and_hasher(children.len(), self.child_map.hasher().clone());
        for child in children {
            if let Some(record) = self.child_map.get::<K>(child) {
                digest.insert(child, record.value.as_ref());
            }
        }
        Ok(digest)
    }

    /// Returns a copy of the parent-map. Changes to the copy do not affect the index.
    pub fn snapshot_parents(&self) -> HashMap<K, Vec<K>, S>
    where
        S: Clone,
    {
        self.parent_map.clone()
    }

    /// Returns a copy of the child-map. Changes to the copy do not affect the index.
    pub fn snapshot_children(&self) -> HashMap<K, ChildRecord<K, V>, S>
    where
        V: Clone,
        S: Clone,
    {
        self.child_map.clone()
    }

    /// Determines if the key is registered as a parent, a child, or both
    pub fn exists<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.is_parent(key) || self.is_child(key)
    }

    /// Determines if the key is registered as a child
    pub fn is_child<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.child_map.contains_key(key)
    }

    /// Determines if the key is registered as a parent
    pub fn is_parent<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.parent_map.contains_key(key)
    }

    /// Determines if `child` is linked under `parent`
    ///
    /// Returns false if either key isn't registered in its associated map.
    pub fn are_linked<Q>(&self, child: &Q, parent: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.child_map.get(child) {
            Some(record) => record.parents.iter().any(equivalent_key::<K, Q>(parent)),
            None => false,
        }
    }

    /// Counts how many times `child` is linked under `parent`
    ///
    /// This is zero if either key isn't registered in its associated map. Under
    /// [`LinkPolicy::Unique`] it is never more than one for links made while that policy was set.
    pub fn link_count<Q>(&self, child: &Q, parent: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.child_map.get(child) {
            Some(record) => count_of(&record.parents, parent),
            None => 0,
        }
    }

    /// Removes a child and every reference to it from the child sequences of its parents.
    ///
    /// All occurrences are removed, so a child linked twice under the same parent is fully
    /// unlinked. The removed record is returned; deleting an unregistered key does nothing.
    pub fn delete_child<Q>(&mut self, child: &Q) -> Option<ChildRecord<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let record = self.child_map.remove(child)?;
        let mut unlinked: usize = 0;
        for parent in record.parents.iter() {
            if let Some(children) = self.parent_map.get_mut::<K>(parent) {
                unlinked += strip_all(children, child);
            }
        }
        trace!(unlinked, "deleted child");
        Some(record)
    }

    /// Removes a parent and every reference to it from the parent sequences of its children.
    ///
    /// All occurrences are removed. The removed child sequence is returned; deleting an
    /// unregistered key does nothing.
    pub fn delete_parent<Q>(&mut self, parent: &Q) -> Option<Vec<K>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let children = self.parent_map.remove(parent)?;
        let mut unlinked: usize = 0;
        for child in children.iter() {
            if let Some(record) = self.child_map.get_mut::<K>(child) {
                unlinked += strip_all(&mut record.parents, parent);
            }
        }
        trace!(unlinked, "deleted parent");
        Some(children)
    }

    /// Removes every trace of the key, as both a child and a parent.
    ///
    /// Returns true if the key was registered in either map.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let as_child = self.delete_child(key).is_some();
        let as_parent = self.delete_parent(key).is_some();
        as_child || as_parent
    }

    /// Collects the children that have no parents
    pub fn orphans(&self) -> HashMap<&K, &ChildRecord<K, V>, S>
    where
        S: Clone,
    {
        let mut digest = HashMap::with_hasher(self.child_map.hasher().clone());
        digest.extend(self.child_map.iter().filter(|(_, record)| record.is_orphan()));
        digest
    }

    /// Collects the parents that have no children
    pub fn childless(&self) -> HashMap<&K, &[K], S>
    where
        S: Clone,
    {
        let mut digest = HashMap::with_hasher(self.parent_map.hasher().clone());
        digest.extend(
            self.parent_map
                .iter()
                .filter(|(_, children)| children.is_empty())
                .map(|(parent, children)| (parent, children.as_slice())),
        );
        digest
    }

    fn record<Q>(&self, child: &Q) -> IndexResult<&ChildRecord<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.child_map
            .get(child)
            .ok_or(IndexError::KeyNotFound(Role::Child))
    }

    fn record_mut<Q>(&mut self, child: &Q) -> IndexResult<&mut ChildRecord<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.child_map
            .get_mut(child)
            .ok_or(IndexError::KeyNotFound(Role::Child))
    }
}

impl<K, V, S> DualIndex<K, V, S>
where
    S: Clone,
{
    /// Creates an empty index that hashes keys with `hash_builder`
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            policy: LinkPolicy::default(),
            parent_map: HashMap::with_hasher(hash_builder.clone()),
            child_map: HashMap::with_hasher(hash_builder),
        }
    }

    /// Creates an empty index that hashes keys with `hash_builder` and whose maps can each hold
    /// `capacity` keys without reallocating
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            policy: LinkPolicy::default(),
            parent_map: HashMap::with_capacity_and_hasher(capacity, hash_builder.clone()),
            child_map: HashMap::with_capacity_and_hasher(capacity, hash_builder),
        }
    }
}

impl<K, V, S> DualIndex<K, V, S> {
    /// Returns a reference to the index's hasher
    pub fn hasher(&self) -> &S {
        self.parent_map.hasher()
    }

    /// Returns the policy applied to repeated links
    pub fn policy(&self) -> LinkPolicy {
        self.policy
    }

    /// Changes the policy applied to repeated links. Existing links are not rewritten.
    pub fn set_policy(&mut self, policy: LinkPolicy) {
        self.policy = policy;
    }

    /// Returns the number of registered parents
    pub fn len_parents(&self) -> usize {
        self.parent_map.len()
    }

    /// Returns the number of registered children
    pub fn len_children(&self) -> usize {
        self.child_map.len()
    }

    /// Returns true if no key is registered in either map
    pub fn is_empty(&self) -> bool {
        self.parent_map.is_empty() && self.child_map.is_empty()
    }

    /// Removes every key from both maps, keeping the allocated memory
    pub fn clear(&mut self) {
        self.parent_map.clear();
        self.child_map.clear();
    }

    /// Iterates over every registered parent along with its children
    pub fn iter_parents(&self) -> ParentIter<'_, K> {
        ParentIter {
            iter: self.parent_map.iter(),
        }
    }

    /// Iterates over every registered child along with its record
    pub fn iter_children(&self) -> ChildIter<'_, K, V> {
        ChildIter {
            iter: self.child_map.iter(),
        }
    }
}

impl<K, V, S> Default for DualIndex<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self {
            policy: LinkPolicy::default(),
            parent_map: HashMap::with_hasher(S::default()),
            child_map: HashMap::with_hasher(S::default()),
        }
    }
}

impl<K, V, S> Clone for DualIndex<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            policy: self.policy,
            parent_map: self.parent_map.clone(),
            child_map: self.child_map.clone(),
        }
    }
}

impl<K, V, S> PartialEq for DualIndex<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.policy == other.policy
            && self.parent_map == other.parent_map
            && self.child_map == other.child_map
    }
}

impl<K, V, S> Eq for DualIndex<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> fmt::Debug for DualIndex<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DualIndex")
            .field("policy", &self.policy)
            .field("parents", &self.parent_map)
            .field("children", &self.child_map)
            .finish()
    }
}

impl<K, V, S> FromIterator<(K, K)> for DualIndex<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher + Default,
{
    /// Builds an index from `(child, parent)` pairs
    fn from_iter<T: IntoIterator<Item = (K, K)>>(iter: T) -> Self {
        let mut index = Self::default();
        index.extend(iter);
        index
    }
}

impl<K, V, S> Extend<(K, K)> for DualIndex<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    /// Links each `child` under its paired `parent`
    fn extend<T: IntoIterator<Item = (K, K)>>(&mut self, iter: T) {
        for (child, parent) in iter {
            self.add_child_under(child, [parent]);
        }
    }
}

/// An iterator over the parents of a `DualIndex` and their child sequences.
pub struct ParentIter<'a, K> {
    iter: hash_map::Iter<'a, K, Vec<K>>,
}

impl<K> Clone for ParentIter<'_, K> {
    fn clone(&self) -> Self {
        Self {
            iter: self.iter.clone(),
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for ParentIter<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K> Iterator for ParentIter<'a, K> {
    type Item = (&'a K, &'a [K]);

    fn next(&mut self) -> Option<Self::Item> {
        self.iter
            .next()
            .map(|(parent, children)| (parent, children.as_slice()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<K> ExactSizeIterator for ParentIter<'_, K> {
    fn len(&self) -> usize {
        self.iter.len()
    }
}

impl<K> FusedIterator for ParentIter<'_, K> {}

/// An iterator over the children of a `DualIndex` and their records.
pub struct ChildIter<'a, K, V> {
    iter: hash_map::Iter<'a, K, ChildRecord<K, V>>,
}

impl<K, V> Clone for ChildIter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            iter: self.iter.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for ChildIter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for ChildIter<'a, K, V> {
    type Item = (&'a K, &'a ChildRecord<K, V>);

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ChildIter<'_, K, V> {
    fn len(&self) -> usize {
        self.iter.len()
    }
}

impl<K, V> FusedIterator for ChildIter<'_, K, V> {}
