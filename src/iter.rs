use std::iter::FusedIterator;

use crate::dict::AvlDict;
use crate::node::NodeId;

/// Iterator over a contiguous run of the sorted list, from `front` up to
/// and including `back`. Returned by [`AvlDict::iter`],
/// [`AvlDict::range`] and [`AvlDict::get_all`].
///
/// Walks `next`/`prev` links only, each step is O(1).
pub struct Iter<'a, K, V, C> {
    dict: &'a AvlDict<K, V, C>,
    front: Option<NodeId>,
    back: Option<NodeId>,
}

impl<'a, K, V, C> Iter<'a, K, V, C> {
    pub(crate) fn new(
        dict: &'a AvlDict<K, V, C>,
        front: Option<NodeId>,
        back: Option<NodeId>,
    ) -> Iter<'a, K, V, C> {
        match (front, back) {
            (Some(_), Some(_)) => Iter { dict, front, back },
            _ => Iter {
                dict,
                front: None,
                back: None,
            },
        }
    }

    // both ends met, nothing left.
    fn finish(&mut self) {
        self.front = None;
        self.back = None;
    }
}

impl<'a, K, V, C> Iterator for Iter<'a, K, V, C> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let dict: &'a AvlDict<K, V, C> = self.dict;
        let id = self.front?;
        let node = dict.node(id)?;
        if self.front == self.back {
            self.finish();
        } else {
            self.front = node.next();
        }
        Some((node.key(), node.value()))
    }
}

impl<'a, K, V, C> DoubleEndedIterator for Iter<'a, K, V, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let dict: &'a AvlDict<K, V, C> = self.dict;
        let id = self.back?;
        let node = dict.node(id)?;
        if self.front == self.back {
            self.finish();
        } else {
            self.back = node.prev();
        }
        Some((node.key(), node.value()))
    }
}

impl<'a, K, V, C> FusedIterator for Iter<'a, K, V, C> {}
