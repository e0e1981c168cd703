//! A many-to-many index between parent keys and child keys that can be searched from either side
//! in near-constant time. See [`DualIndex`].

#![deny(unused_imports, missing_debug_implementations, unreachable_pub)]
#![cfg_attr(doc, deny(missing_docs, rustdoc::broken_intra_doc_links))]
#![warn(rust_2018_idioms)]

/// The main data struct
pub mod dual_index;
pub use crate::dual_index::*;

/// The record kept for each child key
pub mod record;
pub use crate::record::*;

/// How repeated links are handled
pub mod link_policy;
pub use crate::link_policy::*;

/// Lookup errors
pub mod error;
pub use crate::error::*;

/// Various helpful functions
pub(crate) mod utils;

#[cfg(feature = "serde")]
mod serde;
