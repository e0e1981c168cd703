#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Decides what happens when a link between a child and a parent is requested a second time.
///
/// Every parent and child sequence in a [`DualIndex`] keeps arrival order. Under the default
/// [`LinkPolicy::Duplicate`] a repeated link is appended again, so a child added twice under the
/// same parent is listed twice on both sides. [`LinkPolicy::Unique`] drops the repeated link on
/// both sides instead.
///
/// Changing the policy of a populated index does not touch links that are already present.
///
/// # Examples
/// ```rust
/// use dual_index::{DualIndex, LinkPolicy};
///
/// let mut index: DualIndex<&str, u64> = DualIndex::with_policy(LinkPolicy::Unique);
/// index.add_child_under("page2", ["page1", "page1"]);
/// index.add_child_under("page2", ["page1"]);
///
/// assert_eq!(index.parents_of(&"page2").unwrap(), &["page1"]);
/// assert_eq!(index.children_of(&"page1").unwrap(), &["page2"]);
/// ```
///
/// [`DualIndex`]: crate::DualIndex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LinkPolicy {
    /// Append every requested link, even if the pair is already linked
    #[default]
    Duplicate,
    /// Skip a requested link if the pair is already linked
    Unique,
}

impl LinkPolicy {
    /// Returns true if `self` is `LinkPolicy::Unique`
    pub fn is_unique(&self) -> bool {
        *self == LinkPolicy::Unique
    }

    /// Returns the negation of [`is_unique`]
    ///
    /// [`is_unique`]: enum.LinkPolicy.html#method.is_unique
    pub fn is_duplicate(&self) -> bool {
        !self.is_unique()
    }

    // Whether `key` may be appended to a sequence of existing links
    pub(crate) fn admits<K: PartialEq>(&self, links: &[K], key: &K) -> bool {
        match self {
            LinkPolicy::Duplicate => true,
            LinkPolicy::Unique => !links.contains(key),
        }
    }
}
