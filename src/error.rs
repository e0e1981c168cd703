use std::fmt;

use thiserror::Error;

/// Names which of the two maps of a [`DualIndex`] a key was looked up in.
///
/// [`DualIndex`]: crate::DualIndex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The parent-map, keyed by parent and holding child sequences
    Parent,
    /// The child-map, keyed by child and holding a [`ChildRecord`]
    ///
    /// [`ChildRecord`]: crate::ChildRecord
    Child,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Parent => write!(f, "parent"),
            Role::Child => write!(f, "child"),
        }
    }
}

/// The errors returned by the keyed lookups of a [`DualIndex`].
///
/// Registration and deletion never fail, so this only covers reads and value writes addressed to
/// a key that was never registered in the relevant map.
///
/// [`DualIndex`]: crate::DualIndex
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexError {
    /// The key is not registered in the map named by the [`Role`]
    #[error("key is not registered as a {0}")]
    KeyNotFound(Role),
}

/// A shorthand for results of [`DualIndex`] lookups
///
/// [`DualIndex`]: crate::DualIndex
pub type IndexResult<T> = Result<T, IndexError>;

impl IndexError {
    /// Returns the map that the failed lookup was addressed to
    pub fn role(&self) -> Role {
        match self {
            IndexError::KeyNotFound(role) => *role,
        }
    }
}
