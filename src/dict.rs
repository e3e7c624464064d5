use std::{
    borrow::Borrow,
    cmp::Ordering,
    fmt, mem,
    ops::{Bound, RangeBounds},
};

use crate::compare::{Compare, Natural};
use crate::error::Error;
use crate::histogram::Histogram;
use crate::iter::Iter;
use crate::node::{Node, NodeId};

/// AvlDict manage a single instance of in-memory dictionary using an
/// [AVL][avl] tree, where every node is also threaded into one sorted,
/// doubly linked list.
///
/// Keys can repeat. The first pair inserted for a key is its *canonical*
/// node and takes part in the tree. Later pairs with an equal key are
/// *duplicates*, appended to the canonical node's chain in the list, and
/// removed newest first.
///
/// Nodes live in an arena and link to each other through [`NodeId`]
/// handles, so rotations and list splices only rewrite indices.
///
/// [avl]: https://en.wikipedia.org/wiki/AVL_tree
pub struct AvlDict<K, V, C = Natural> {
    name: String,
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<NodeId>,
    root: Option<NodeId>,
    n_count: usize, // number of pairs, duplicates included.
    cmp: C,
}

/// Different ways to construct a new AvlDict instance.
impl<K, V> AvlDict<K, V, Natural>
where
    K: Ord,
{
    /// Create an empty instance of AvlDict ordered by `K`'s [`Ord`],
    /// identified by `name`.
    pub fn new<S>(name: S) -> AvlDict<K, V, Natural>
    where
        S: AsRef<str>,
    {
        AvlDict::with_comparator(name, Natural)
    }

    /// Create a new instance of AvlDict and load it with entries from
    /// `iter`. Repeating keys are kept as duplicates.
    pub fn load_from<S, I>(name: S, iter: I) -> Result<AvlDict<K, V, Natural>, Error<K>>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut dict = AvlDict::new(name);
        for (key, value) in iter {
            dict.try_insert(key, value)?;
        }
        Ok(dict)
    }
}

impl<K, V, C> AvlDict<K, V, C>
where
    C: Compare<K>,
{
    /// Create an empty instance of AvlDict that orders keys with `cmp`.
    pub fn with_comparator<S>(name: S, cmp: C) -> AvlDict<K, V, C>
    where
        S: AsRef<str>,
    {
        AvlDict {
            name: name.as_ref().to_string(),
            slots: vec![],
            free: vec![],
            root: None,
            n_count: 0,
            cmp,
        }
    }
}

/// Maintenance API.
impl<K, V, C> AvlDict<K, V, C> {
    /// Identify this instance. Applications can choose unique names while
    /// creating AvlDict instances.
    #[inline]
    pub fn id(&self) -> String {
        self.name.clone()
    }

    /// Return number of pairs in this instance, duplicates included.
    #[inline]
    pub fn len(&self) -> usize {
        self.n_count
    }

    /// Check whether this instance holds no pairs, that is, whether the
    /// tree has no root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Return the comparator that orders keys in this instance.
    #[inline]
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Return quickly with basic statisics, only entries(), node_size()
    /// and height() are valid with this statisics.
    pub fn stats(&self) -> Stats {
        let height = self.height_of(self.root);
        Stats::new(self.n_count, mem::size_of::<Node<K, V>>(), height)
    }

    /// Drop every pair, walking the sorted list from its minimum, and
    /// release the arena.
    pub fn clear(&mut self) {
        let mut cursor = self.first();
        while let Some(id) = cursor {
            cursor = self.release(id).next;
        }
        self.slots.clear();
        self.free.clear();
        self.root = None;
        self.n_count = 0;
    }
}

/// Structural read operations, they only follow links and never
/// compare keys.
impl<K, V, C> AvlDict<K, V, C> {
    /// Return the root of the tree.
    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Return the node behind `id`, `None` if the handle does not point
    /// to a live node.
    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node<K, V>> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    /// Return the node with minimum key in the subtree under `start`.
    pub fn minimum(&self, start: NodeId) -> Option<NodeId> {
        self.node(start)?;
        Some(self.minimum_from(start))
    }

    /// Return the node with maximum key in the subtree under `start`.
    pub fn maximum(&self, start: NodeId) -> Option<NodeId> {
        self.node(start)?;
        Some(self.maximum_from(start))
    }

    /// Return the in-order successor of `id` among canonical nodes,
    /// ignoring duplicate chains. Use [`Node::next`] to step through
    /// duplicates as well.
    pub fn successor(&self, id: NodeId) -> Option<NodeId> {
        let node = self.node(id)?;
        if !node.is_canonical() {
            return None;
        }
        if let Some(right) = node.right {
            return Some(self.minimum_from(right));
        }
        let (mut child, mut parent) = (id, node.parent);
        while let Some(p) = parent {
            if self.at(p).right != Some(child) {
                break;
            }
            child = p;
            parent = self.at(p).parent;
        }
        parent
    }

    /// Return the in-order predecessor of `id` among canonical nodes,
    /// ignoring duplicate chains. Use [`Node::prev`] to step through
    /// duplicates as well.
    pub fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        let node = self.node(id)?;
        if !node.is_canonical() {
            return None;
        }
        if let Some(left) = node.left {
            return Some(self.maximum_from(left));
        }
        let (mut child, mut parent) = (id, node.parent);
        while let Some(p) = parent {
            if self.at(p).left != Some(child) {
                break;
            }
            child = p;
            parent = self.at(p).parent;
        }
        parent
    }

    /// Return the head of the sorted list, the node with smallest key.
    pub fn first(&self) -> Option<NodeId> {
        self.root.map(|root| self.minimum_from(root))
    }

    /// Return the tail of the sorted list, the newest pair for the
    /// largest key.
    pub fn last(&self) -> Option<NodeId> {
        self.root.map(|root| self.end_of(self.maximum_from(root)))
    }

    /// Return balance factor of node, height(left) - height(right) with
    /// absent children counting as zero.
    pub fn balance(&self, id: NodeId) -> isize {
        match self.node(id) {
            Some(node) if node.is_canonical() => {
                self.height_of(node.left) as isize - self.height_of(node.right) as isize
            }
            _ => 0,
        }
    }

    /// Return an iterator over all pairs in sorted order. Pairs sharing a
    /// key come out in insertion order.
    pub fn iter(&self) -> Iter<K, V, C> {
        Iter::new(self, self.first(), self.last())
    }

    #[inline]
    pub(crate) fn at(&self, id: NodeId) -> &Node<K, V> {
        match self.slots.get(id.0) {
            Some(Some(node)) => node,
            _ => panic!("at(): dangling node {}, call the programmer", id),
        }
    }

    #[inline]
    fn at_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        match self.slots.get_mut(id.0) {
            Some(Some(node)) => node,
            _ => panic!("at_mut(): dangling node {}, call the programmer", id),
        }
    }

    #[inline]
    fn height_of(&self, id: Option<NodeId>) -> usize {
        id.map_or(0, |id| self.at(id).height)
    }

    #[inline]
    fn balance_of(&self, id: Option<NodeId>) -> isize {
        id.map_or(0, |id| self.balance(id))
    }

    #[inline]
    fn end_of(&self, id: NodeId) -> NodeId {
        self.at(id).end.unwrap_or(id)
    }

    fn minimum_from(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.at(id).left {
            id = left;
        }
        id
    }

    fn maximum_from(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.at(id).right {
            id = right;
        }
        id
    }

    fn update_height(&mut self, id: NodeId) {
        let node = self.at(id);
        let height = 1 + self.height_of(node.left).max(self.height_of(node.right));
        self.at_mut(id).height = height;
    }

    fn alloc(&mut self, key: K, value: V) -> NodeId {
        let node = Some(Node::new(key, value));
        match self.free.pop() {
            Some(id) => {
                self.slots[id.0] = node;
                id
            }
            None => {
                self.slots.push(node);
                NodeId(self.slots.len() - 1)
            }
        }
    }

    fn release(&mut self, id: NodeId) -> Node<K, V> {
        match self.slots.get_mut(id.0).and_then(Option::take) {
            Some(node) => {
                self.free.push(id);
                node
            }
            None => panic!("release(): dangling node {}, call the programmer", id),
        }
    }

    // exchange key and value between two live nodes, links stay put.
    fn swap_payload(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            panic!("swap_payload(): same node {}, call the programmer", a);
        }
        let (lo, hi) = if a.0 < b.0 { (a.0, b.0) } else { (b.0, a.0) };
        let (head, tail) = self.slots.split_at_mut(hi);
        match (head[lo].as_mut(), tail[0].as_mut()) {
            (Some(x), Some(y)) => {
                mem::swap(&mut x.key, &mut y.key);
                mem::swap(&mut x.value, &mut y.value);
            }
            _ => panic!("swap_payload(): dangling {} {}, call the programmer", a, b),
        }
    }
}

/// Read operations that need the comparator. Lookups accept any borrowed
/// form of the key, as long as the comparator can order it.
impl<K, V, C> AvlDict<K, V, C>
where
    C: Compare<K>,
{
    /// Search for `key` in the subtree under `start` and return its
    /// canonical node. Duplicate chains are not searched, walk from the
    /// returned node up to its [`end`](Node::end) for those.
    pub fn search<Q>(&self, start: NodeId, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let mut node = self.node(start).map(|_| start);
        while let Some(id) = node {
            let nref = self.at(id);
            node = match self.compare_key(&nref.key, key) {
                Ordering::Greater => nref.left,
                Ordering::Less => nref.right,
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    /// Get the value of the oldest pair for key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let id = self.search(self.root?, key)?;
        Some(&self.at(id).value)
    }

    /// Get mutable access to the value of the oldest pair for key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let id = self.search(self.root?, key)?;
        Some(&mut self.at_mut(id).value)
    }

    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.get(key).is_some()
    }

    /// Return an iterator over every pair for key, oldest first.
    pub fn get_all<Q>(&self, key: &Q) -> Iter<K, V, C>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        match self.root.and_then(|root| self.search(root, key)) {
            Some(id) => Iter::new(self, Some(id), Some(self.end_of(id))),
            None => Iter::new(self, None, None),
        }
    }

    /// Return number of pairs stored under key.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.get_all(key).count()
    }

    /// Return the depth of key's canonical node, root is at level 1.
    pub fn level<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let mut node = self.root;
        let mut level = 1;
        while let Some(id) = node {
            let nref = self.at(id);
            node = match self.compare_key(&nref.key, key) {
                Ordering::Greater => nref.left,
                Ordering::Less => nref.right,
                Ordering::Equal => return Some(level),
            };
            level += 1;
        }
        None
    }

    /// Range over all pairs from low to high, duplicates included. The
    /// returned iterator is double ended, `.rev()` walks high to low.
    pub fn range<Q, R>(&self, range: R) -> Iter<K, V, C>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
        R: RangeBounds<Q>,
    {
        let low = self.lower_bound(range.start_bound());
        let high = self.upper_bound(range.end_bound());
        match (low, high) {
            (Some(low), Some(high)) => {
                let (lkey, hkey) = (&self.at(low).key, &self.at(high).key);
                if <C as Compare<K>>::compare(&self.cmp, lkey, hkey) == Ordering::Greater {
                    Iter::new(self, None, None)
                } else {
                    Iter::new(self, Some(low), Some(high))
                }
            }
            _ => Iter::new(self, None, None),
        }
    }

    // first canonical node that falls within the lower bound.
    fn lower_bound<Q>(&self, bound: Bound<&Q>) -> Option<NodeId>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let (key, inclusive) = match bound {
            Bound::Unbounded => return self.first(),
            Bound::Included(key) => (key, true),
            Bound::Excluded(key) => (key, false),
        };
        let (mut node, mut found) = (self.root, None);
        while let Some(id) = node {
            let nref = self.at(id);
            let ok = match self.compare_key(&nref.key, key) {
                Ordering::Greater => true,
                Ordering::Equal => inclusive,
                Ordering::Less => false,
            };
            if ok {
                found = Some(id);
                node = nref.left;
            } else {
                node = nref.right;
            }
        }
        found
    }

    // chain tail of the last canonical node within the upper bound.
    fn upper_bound<Q>(&self, bound: Bound<&Q>) -> Option<NodeId>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let (key, inclusive) = match bound {
            Bound::Unbounded => return self.last(),
            Bound::Included(key) => (key, true),
            Bound::Excluded(key) => (key, false),
        };
        let (mut node, mut found) = (self.root, None);
        while let Some(id) = node {
            let nref = self.at(id);
            let ok = match self.compare_key(&nref.key, key) {
                Ordering::Less => true,
                Ordering::Equal => inclusive,
                Ordering::Greater => false,
            };
            if ok {
                found = Some(id);
                node = nref.right;
            } else {
                node = nref.left;
            }
        }
        found.map(|id| self.end_of(id))
    }

    #[inline]
    fn compare_key<Q>(&self, key: &K, other: &Q) -> Ordering
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        <C as Compare<Q>>::compare(&self.cmp, <K as Borrow<Q>>::borrow(key), other)
    }
}

/// Write operations on AvlDict instance.
impl<K, V, C> AvlDict<K, V, C>
where
    C: Compare<K>,
{
    /// Insert a {key, value} pair and return its node. If key is already
    /// present the pair is appended to the end of key's duplicate chain.
    ///
    /// Return `None`, leaving the dictionary untouched, only when the
    /// arena could not grow.
    pub fn insert(&mut self, key: K, value: V) -> Option<NodeId> {
        self.try_insert(key, value).ok()
    }

    /// Same as [`insert`](AvlDict::insert), but report allocation
    /// failure as [`Error::AllocFailed`].
    pub fn try_insert(&mut self, key: K, value: V) -> Result<NodeId, Error<K>> {
        if self.free.is_empty() {
            self.slots.try_reserve(1).map_err(|_| Error::AllocFailed)?;
        }

        let mut iter = match self.root {
            Some(root) => root,
            None => {
                let id = self.alloc(key, value);
                self.at_mut(id).end = Some(id);
                self.root = Some(id);
                self.n_count = 1;
                return Ok(id);
            }
        };

        let ord = loop {
            let nref = self.at(iter);
            let ord = self.cmp.compare(&key, &nref.key);
            let child = match ord {
                Ordering::Less => nref.left,
                Ordering::Greater => nref.right,
                Ordering::Equal => break ord,
            };
            match child {
                Some(child) => iter = child,
                None => break ord,
            }
        };

        let id = self.alloc(key, value);
        match ord {
            Ordering::Equal => self.append_duplicate(iter, id),
            Ordering::Less => self.attach_left(iter, id),
            Ordering::Greater => self.attach_right(iter, id),
        }
        self.n_count += 1;
        Ok(id)
    }

    /// Delete one pair for key and return its value. When key has
    /// duplicates the newest pair goes first. If key is not present,
    /// then delete is effectively a no-op.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let id = self.search(self.root?, key)?;

        let tail = self.end_of(id);
        if tail != id {
            return Some(self.pop_duplicate(id, tail));
        }

        let nref = self.at(id);
        let (_, value) = match (nref.left, nref.right) {
            (Some(_), Some(right)) => {
                // successor's pair, and its chain, move into this node.
                // Its old pair leaves with the successor's node.
                let succ = self.minimum_from(right);
                self.swap_payload(id, succ);
                let succ_end = self.end_of(succ);
                let end = if succ_end == succ { id } else { succ_end };
                self.at_mut(id).end = Some(end);
                self.at_mut(succ).end = Some(succ);
                self.remove_node(succ)
            }
            _ => self.remove_node(id),
        };
        Some(value)
    }

    /// Rotate the subtree under `id` to the left, returning the node that
    /// took its place. No-op returning `None` when node has no right
    /// child.
    ///
    /// ```text
    ///          (i)                       (i)
    ///           |                         |
    ///          node                       x
    ///          /  \                      / \
    ///         /    \                    /   \
    ///        /      \                  /     \
    ///      left      x              node      xr
    ///               / \             /  \
    ///             xl   xr       left    xl
    /// ```
    ///
    /// Heights along the path above are not touched, the list order never
    /// changes.
    pub fn rotate_left(&mut self, id: NodeId) -> Option<NodeId> {
        let x = self.node(id)?.right?;
        let (parent, xl) = (self.at(id).parent, self.at(x).left);

        self.at_mut(id).right = xl;
        if let Some(xl) = xl {
            self.at_mut(xl).parent = Some(id);
        }
        self.at_mut(x).left = Some(id);
        self.at_mut(x).parent = parent;
        self.at_mut(id).parent = Some(x);
        self.reattach(parent, x);

        self.update_height(id);
        self.update_height(x);
        Some(x)
    }

    /// Rotate the subtree under `id` to the right, returning the node
    /// that took its place. No-op returning `None` when node has no left
    /// child.
    ///
    /// ```text
    ///          (i)                       (i)
    ///           |                         |
    ///          node                       x
    ///          /  \                      / \
    ///         /    \                    /   \
    ///        /      \                  /     \
    ///       x      right             xl      node
    ///      / \                               / \
    ///    xl   xr                           xr  right
    /// ```
    pub fn rotate_right(&mut self, id: NodeId) -> Option<NodeId> {
        let x = self.node(id)?.left?;
        let (parent, xr) = (self.at(id).parent, self.at(x).right);

        self.at_mut(id).left = xr;
        if let Some(xr) = xr {
            self.at_mut(xr).parent = Some(id);
        }
        self.at_mut(x).right = Some(id);
        self.at_mut(x).parent = parent;
        self.at_mut(id).parent = Some(x);
        self.reattach(parent, x);

        self.update_height(id);
        self.update_height(x);
        Some(x)
    }

    // hang child under parent on the side its key belongs to.
    fn reattach(&mut self, parent: Option<NodeId>, child: NodeId) {
        let parent = match parent {
            Some(parent) => parent,
            None => {
                self.root = Some(child);
                return;
            }
        };
        let ord = self.cmp.compare(&self.at(child).key, &self.at(parent).key);
        match ord {
            Ordering::Greater => self.at_mut(parent).right = Some(child),
            _ => self.at_mut(parent).left = Some(child),
        }
    }

    fn append_duplicate(&mut self, canon: NodeId, id: NodeId) {
        let tail = self.end_of(canon);
        let after = self.at(tail).next;

        let node = self.at_mut(id);
        node.prev = Some(tail);
        node.next = after;
        if let Some(after) = after {
            self.at_mut(after).prev = Some(id);
        }
        self.at_mut(tail).next = Some(id);
        self.at_mut(canon).end = Some(id);
    }

    // new node goes right before parent in the list.
    fn attach_left(&mut self, parent: NodeId, id: NodeId) {
        let before = self.at(parent).prev;

        let node = self.at_mut(id);
        node.parent = Some(parent);
        node.end = Some(id);
        node.prev = before;
        node.next = Some(parent);
        if let Some(before) = before {
            self.at_mut(before).next = Some(id);
        }
        let pref = self.at_mut(parent);
        pref.left = Some(id);
        pref.prev = Some(id);

        self.insert_fixup(parent);
    }

    // new node goes right after parent's chain in the list.
    fn attach_right(&mut self, parent: NodeId, id: NodeId) {
        let tail = self.end_of(parent);
        let after = self.at(tail).next;

        let node = self.at_mut(id);
        node.parent = Some(parent);
        node.end = Some(id);
        node.prev = Some(tail);
        node.next = after;
        if let Some(after) = after {
            self.at_mut(after).prev = Some(id);
        }
        self.at_mut(tail).next = Some(id);
        self.at_mut(parent).right = Some(id);

        self.insert_fixup(parent);
    }

    fn pop_duplicate(&mut self, canon: NodeId, tail: NodeId) -> V {
        let (prev, next) = (self.at(tail).prev, self.at(tail).next);
        if let Some(prev) = prev {
            self.at_mut(prev).next = next;
        }
        if let Some(next) = next {
            self.at_mut(next).prev = prev;
        }
        self.at_mut(canon).end = prev;
        self.n_count -= 1;
        self.release(tail).value
    }

    // unlink a canonical node, without duplicates and with at most one
    // child, from both the tree and the list.
    fn remove_node(&mut self, id: NodeId) -> (K, V) {
        let nref = self.at(id);
        let (parent, prev, next) = (nref.parent, nref.prev, nref.next);
        let child = match (nref.left, nref.right) {
            (Some(_), Some(_)) => panic!("remove_node(): two children, call the programmer"),
            (left, right) => left.or(right),
        };

        if let Some(child) = child {
            self.at_mut(child).parent = parent;
        }
        match parent {
            None => self.root = child,
            Some(parent) => {
                let pref = self.at_mut(parent);
                if pref.left == Some(id) {
                    pref.left = child;
                } else {
                    pref.right = child;
                }
            }
        }

        if let Some(prev) = prev {
            self.at_mut(prev).next = next;
        }
        if let Some(next) = next {
            self.at_mut(next).prev = prev;
        }

        let node = self.release(id);
        self.n_count -= 1;
        if let Some(parent) = parent {
            self.delete_fixup(parent);
        }
        (node.key, node.value)
    }

    // a single insert leaves at most one subtree off by exactly two.
    fn insert_fixup(&mut self, from: NodeId) {
        let mut node = Some(from);
        while let Some(id) = node {
            self.update_height(id);

            let (left, right) = (self.at(id).left, self.at(id).right);
            let bf = self.balance(id);
            let (lbf, rbf) = (self.balance_of(left), self.balance_of(right));
            match (bf, lbf, rbf) {
                (2, 1, _) => {
                    self.rotate_right(id);
                }
                (-2, _, -1) => {
                    self.rotate_left(id);
                }
                (2, -1, _) => {
                    if let Some(left) = left {
                        self.rotate_left(left);
                    }
                    self.rotate_right(id);
                }
                (-2, _, 1) => {
                    if let Some(right) = right {
                        self.rotate_right(right);
                    }
                    self.rotate_left(id);
                }
                _ => (),
            }

            node = self.at(id).parent;
        }
    }

    // after delete the heavy child may be perfectly balanced, which must
    // be treated as a single rotation.
    fn delete_fixup(&mut self, from: NodeId) {
        let mut node = Some(from);
        while let Some(id) = node {
            self.update_height(id);

            let (left, right) = (self.at(id).left, self.at(id).right);
            let bf = self.balance(id);
            let (lbf, rbf) = (self.balance_of(left), self.balance_of(right));
            if bf > 1 && lbf >= 0 {
                self.rotate_right(id);
            } else if bf < -1 && rbf <= 0 {
                self.rotate_left(id);
            } else if bf > 1 {
                if let Some(left) = left {
                    self.rotate_left(left);
                }
                self.rotate_right(id);
            } else if bf < -1 {
                if let Some(right) = right {
                    self.rotate_right(right);
                }
                self.rotate_left(id);
            }

            node = self.at(id).parent;
        }
    }
}

/// Validation.
impl<K, V, C> AvlDict<K, V, C>
where
    K: Clone,
    C: Compare<K>,
{
    /// Validate the tree and the list together:
    ///
    /// * Canonical keys are in sort order and parent links agree.
    /// * Cached heights are right and no node is out of balance.
    /// * Each duplicate chain holds equal keys and ends at `end`.
    /// * The list visits every pair once, in the tree's in-order
    ///   sequence, with matching `prev` links.
    /// * Pair count matches what the list reaches.
    ///
    /// Additionally return full statistics on the dictionary. Refer to
    /// [`Stats`] for more information.
    pub fn validate(&self) -> Result<Stats, Error<K>> {
        let mut stats = self.stats();
        let mut depths = Histogram::new("depth");
        let mut chains = Histogram::new("chain");
        let mut inorder = Vec::with_capacity(self.n_count);

        if let Some(root) = self.root {
            if self.at(root).parent.is_some() {
                return Err(Error::BrokenParent(root));
            }
            self.validate_tree(root, 1, &mut depths, &mut inorder)?;
        }

        let mut walked = 0;
        let (mut prev, mut cursor) = (None, self.first());
        let mut canons = inorder.iter();
        while let Some(id) = cursor {
            let nref = self.at(id);
            if nref.prev != prev {
                return Err(Error::BrokenList(id));
            }
            if canons.next() != Some(&id) {
                return Err(Error::BrokenList(id));
            }
            let tail = self.end_of(id);
            let mut chain = 1;
            let mut link = id;
            while link != tail {
                let dup = match self.at(link).next {
                    Some(dup) => dup,
                    None => return Err(Error::BrokenChain(id)),
                };
                let dref = self.at(dup);
                let ok = dref.prev == Some(link) && !dref.is_canonical();
                if !ok || self.cmp.compare(&nref.key, &dref.key) != Ordering::Equal {
                    return Err(Error::BrokenChain(id));
                }
                link = dup;
                chain += 1;
                if chain > self.n_count {
                    return Err(Error::BrokenChain(id));
                }
            }
            chains.sample(chain);
            walked += chain;
            prev = Some(tail);
            cursor = self.at(tail).next;
            if let Some(next) = cursor {
                let (a, b) = (&nref.key, &self.at(next).key);
                if self.cmp.compare(a, b) != Ordering::Less {
                    return Err(Error::SortError(a.clone(), b.clone()));
                }
            }
        }
        if let Some(&id) = canons.next() {
            return Err(Error::BrokenList(id));
        }

        let live = self.slots.len() - self.free.len();
        if walked != self.n_count || live != self.n_count {
            let found = if walked != self.n_count { walked } else { live };
            let expected = self.n_count;
            return Err(Error::SizeMismatch { expected, found });
        }

        stats.set_keys(inorder.len());
        stats.set_depths(depths);
        stats.set_chains(chains);
        Ok(stats)
    }

    // return subtree height.
    fn validate_tree(
        &self,
        id: NodeId,
        depth: usize,
        depths: &mut Histogram,
        inorder: &mut Vec<NodeId>,
    ) -> Result<usize, Error<K>> {
        let nref = self.at(id);
        if !nref.is_canonical() {
            return Err(Error::BrokenChain(id));
        }

        let mut lheight = 0;
        if let Some(left) = nref.left {
            let lref = self.node(left).ok_or(Error::BrokenParent(id))?;
            if lref.parent != Some(id) {
                return Err(Error::BrokenParent(left));
            }
            if self.cmp.compare(&lref.key, &nref.key) != Ordering::Less {
                let (lkey, parent) = (lref.key.clone(), nref.key.clone());
                return Err(Error::SortError(lkey, parent));
            }
            lheight = self.validate_tree(left, depth + 1, depths, inorder)?;
        }

        inorder.push(id);

        let mut rheight = 0;
        if let Some(right) = nref.right {
            let rref = self.node(right).ok_or(Error::BrokenParent(id))?;
            if rref.parent != Some(id) {
                return Err(Error::BrokenParent(right));
            }
            if self.cmp.compare(&nref.key, &rref.key) != Ordering::Less {
                let (parent, rkey) = (nref.key.clone(), rref.key.clone());
                return Err(Error::SortError(parent, rkey));
            }
            rheight = self.validate_tree(right, depth + 1, depths, inorder)?;
        }

        if nref.is_leaf() {
            depths.sample(depth);
        }

        let height = 1 + lheight.max(rheight);
        if nref.height != height {
            let (recorded, actual) = (nref.height, height);
            return Err(Error::HeightMismatch { node: id, recorded, actual });
        }
        let balance = lheight as isize - rheight as isize;
        if balance.abs() > 1 {
            return Err(Error::Unbalanced { node: id, balance });
        }
        Ok(height)
    }
}

impl<K, V, C> Drop for AvlDict<K, V, C> {
    fn drop(&mut self) {
        self.clear()
    }
}

impl<K, V, C> fmt::Debug for AvlDict<K, V, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, C> IntoIterator for &'a AvlDict<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, C> Extend<(K, V)> for AvlDict<K, V, C>
where
    C: Compare<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

/// Statistics on [`AvlDict`]. Serves two purpose:
///
/// * To get partial but quick statistics via [`AvlDict::stats`] method.
/// * To get full statisics via [`AvlDict::validate`] method.
#[derive(Debug)]
pub struct Stats {
    entries: usize, // number of pairs, duplicates included.
    node_size: usize,
    height: usize,
    keys: Option<usize>,
    depths: Option<Histogram>,
    chains: Option<Histogram>,
}

impl Stats {
    fn new(entries: usize, node_size: usize, height: usize) -> Stats {
        Stats {
            entries,
            node_size,
            height,
            keys: None,
            depths: None,
            chains: None,
        }
    }

    #[inline]
    fn set_keys(&mut self, keys: usize) {
        self.keys = Some(keys)
    }

    #[inline]
    fn set_depths(&mut self, depths: Histogram) {
        self.depths = Some(depths)
    }

    #[inline]
    fn set_chains(&mut self, chains: Histogram) {
        self.chains = Some(chains)
    }

    /// Return number of pairs in [`AvlDict`] instance.
    #[inline]
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Return node-size, including over-head for `AvlDict<K, V>`. Although
    /// the node overhead is constant, the node size varies based on
    /// key and value types. EG:
    ///
    /// ```
    /// use avl_dict::AvlDict;
    /// let dict: AvlDict<u64, i128> = AvlDict::new("myinstance");
    ///
    /// // size of key: 8 bytes
    /// // size of value: 16 bytes
    /// // overhead is 8 bytes height and 6 links of 16 bytes each
    /// assert_eq!(dict.stats().node_size(), 128);
    /// ```
    #[inline]
    pub fn node_size(&self) -> usize {
        self.node_size
    }

    /// Return height of the tree, zero when empty.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Return number of distinct keys, that is, canonical nodes.
    #[inline]
    pub fn keys(&self) -> Option<usize> {
        self.keys
    }

    /// Return leaf-node depth statistics.
    pub fn depths(&self) -> Option<Histogram> {
        match &self.depths {
            Some(depths) if depths.samples() > 0 => Some(depths.clone()),
            _ => None,
        }
    }

    /// Return duplicate-chain length statistics, one sample per key.
    pub fn chains(&self) -> Option<Histogram> {
        match &self.chains {
            Some(chains) if chains.samples() > 0 => Some(chains.clone()),
            _ => None,
        }
    }

    /// Pretty print statistics in human readable format, useful in logs.
    pub fn pretty_print(&self, prefix: &str) {
        println!(
            "{}entries: {} keys: {:?} height: {} node_size: {}",
            prefix, self.entries, self.keys, self.height, self.node_size
        );
        if let Some(depths) = self.depths() {
            depths.pretty_print(prefix);
        }
        if let Some(chains) = self.chains() {
            chains.pretty_print(prefix);
        }
    }
}
