//! Ordered dictionary with duplicate keys, built on an AVL tree whose
//! nodes are also threaded into a sorted doubly linked list.
//!
//! Lookups descend the tree, ordered traversal walks the list. See
//! [`AvlDict`] for details.

mod compare;
mod dict;
pub mod dot;
mod error;
mod histogram;
mod iter;
pub mod keystream;
mod node;

pub use crate::compare::{Compare, Natural};
pub use crate::dict::{AvlDict, Stats};
pub use crate::error::Error;
pub use crate::histogram::Histogram;
pub use crate::iter::Iter;
pub use crate::node::{Node, NodeId};

#[cfg(test)]
mod proptests;
