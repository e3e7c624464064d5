use std::cmp::Ordering;

/// Three-way comparison over keys, used by [`AvlDict`](crate::AvlDict)
/// to order its entries.
///
/// Implementations must describe a strict weak ordering and return the
/// same answer every time they see the same pair of keys. Any
/// `Fn(&K, &K) -> Ordering` closure qualifies.
pub trait Compare<K: ?Sized> {
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// Order keys by their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Natural;

impl<K: Ord + ?Sized> Compare<K> for Natural {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

impl<K: ?Sized, F> Compare<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}
