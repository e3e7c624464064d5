use thiserror::Error;

use crate::node::NodeId;

/// Error enumerates over all possible errors that this package
/// shall return.
#[derive(Debug, PartialEq, Error)]
pub enum Error<K> {
    /// Arena could not grow to hold a new node. Returned by
    /// [`try_insert`](crate::AvlDict::try_insert), the dictionary is
    /// left untouched.
    #[error("allocation failed, node not inserted")]
    AllocFailed,
    /// Fatal case, subtree heights under node differ by more than one.
    #[error("node {node} out of balance, factor {balance}")]
    Unbalanced { node: NodeId, balance: isize },
    /// Fatal case, cached height does not match the subtree.
    #[error("node {node} records height {recorded}, actual {actual}")]
    HeightMismatch {
        node: NodeId,
        recorded: usize,
        actual: usize,
    },
    /// Fatal case, entries are not in sort-order. First key was found
    /// before the second one.
    #[error("sort error, {0:?} placed before {1:?}")]
    SortError(K, K),
    /// Fatal case, child and parent links disagree.
    #[error("node {0} has a broken parent link")]
    BrokenParent(NodeId),
    /// Fatal case, next and prev links disagree, or the list does not
    /// follow the tree's in-order sequence.
    #[error("node {0} has a broken list link")]
    BrokenList(NodeId),
    /// Fatal case, duplicate chain starting at node is malformed.
    #[error("duplicate chain at node {0} is broken")]
    BrokenChain(NodeId),
    /// Fatal case, pair count differs from what the list reaches.
    #[error("size {expected} but {found} pairs reachable")]
    SizeMismatch { expected: usize, found: usize },
}
