//! # An ordered map on a plain binary search tree
//!
//! `bst-map` provides [`BstMap`], a key/value container kept in key order by
//! an unbalanced binary search tree.  Each node exclusively owns its two
//! subtrees; there is no rebalancing, so the shape of the tree, and the cost
//! of lookups, depends on insertion order.
//!
//! Besides the usual map API the crate offers a [`Cursor`], an in-order
//! traversal driven by an explicit stack of ancestors instead of recursion or
//! parent links.  The cursor borrows the map, so the tree cannot change
//! shape while a traversal is in progress; values may still be updated through
//! [`BstMap::iter_mut`].
//!
//! The map is not synchronized.  Share it across threads behind a lock.

mod bst;
pub use bst::{BstMap, Cursor, IntoIter, Iter, IterMut};

mod error;
pub use error::{CheckError, CursorError};

#[cfg(feature = "serde")]
mod serde;
