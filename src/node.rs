use std::fmt;

/// Stable handle to a node held by an [`AvlDict`](crate::AvlDict).
///
/// Handles stay valid until the pair they point to is deleted. After
/// that the slot may be reused by a later insert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Return the arena slot behind this handle.
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Node corresponds to a single {key, value} pair in [`AvlDict`].
///
/// A node is either *canonical*, the first pair inserted for its key and
/// part of the tree, or a *duplicate*, a later pair with an equal key that
/// only lives in the sorted list right after its canonical node.
///
/// [`AvlDict`]: crate::AvlDict
#[derive(Clone)]
pub struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) height: usize,
    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
    pub(crate) prev: Option<NodeId>,
    pub(crate) end: Option<NodeId>, // chain tail, None for duplicates
}

impl<K, V> Node<K, V> {
    pub(crate) fn new(key: K, value: V) -> Node<K, V> {
        Node {
            key,
            value,
            height: 1,
            parent: None,
            left: None,
            right: None,
            next: None,
            prev: None,
            end: None,
        }
    }

    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Height of the subtree rooted at this node, leaves are 1.
    /// Meaningless for duplicates.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    #[inline]
    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    /// Next pair in sorted order, duplicates included.
    #[inline]
    pub fn next(&self) -> Option<NodeId> {
        self.next
    }

    /// Previous pair in sorted order, duplicates included.
    #[inline]
    pub fn prev(&self) -> Option<NodeId> {
        self.prev
    }

    /// Last node in this key's duplicate chain. Points back at the node
    /// itself when there are no duplicates, `None` for duplicates.
    #[inline]
    pub fn end(&self) -> Option<NodeId> {
        self.end
    }

    #[inline]
    pub fn is_canonical(&self) -> bool {
        self.end.is_some()
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}
