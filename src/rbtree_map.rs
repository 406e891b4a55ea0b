use core::borrow::Borrow;
use core::fmt;
use core::iter::FusedIterator;
use core::ops::{Index, IndexMut};

use crate::compare::{Comparator, Natural};
use crate::error::Error;
use crate::raw::{Handle, RawRBTreeMap};

mod capacity;
mod cursor;

pub use cursor::Cursor;

/// An ordered map based on a [red-black tree].
///
/// Keys are arranged by a [`Comparator`], [`Natural`] (the key's [`Ord`])
/// unless another one is supplied with [`RBTreeMap::with_comparator`]. Two
/// keys are the same key when neither orders before the other; `PartialEq`
/// on the key type is never consulted.
///
/// Iterators obtained from [`RBTreeMap::iter`], [`RBTreeMap::keys`] and
/// [`RBTreeMap::values`] produce their items in ascending comparator order.
/// They step between nodes through parent links, so they need no stack and
/// take amortized constant time per item. The same walk is exposed as a
/// [`Cursor`] through [`RBTreeMap::begin`] and [`RBTreeMap::end`].
///
/// It is a logic error for a key to be modified in such a way that its
/// ordering relative to any other key changes while it is in the map. The
/// behavior resulting from such a logic error is not specified, but will be
/// encapsulated to the `RBTreeMap` that observed it and not result in
/// undefined behavior.
///
/// # Examples
///
/// ```
/// use cross_refs::{Error, RBTreeMap};
///
/// let mut lines = RBTreeMap::new();
/// lines.insert("beta", vec![1]);
/// lines.insert("alpha", vec![2]);
///
/// if lines.contains("beta") {
///     lines["beta"].push(3);
/// }
/// assert_eq!(lines.try_get("gamma"), Err(Error::KeyNotFound));
///
/// let rows: Vec<_> = lines.iter().collect();
/// assert_eq!(rows, [(&"alpha", &vec![2]), (&"beta", &vec![1, 3])]);
/// ```
///
/// [red-black tree]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
pub struct RBTreeMap<K, V, C = Natural> {
    raw: RawRBTreeMap<K, V>,
    cmp: C,
}

/// An iterator over the entries of a `RBTreeMap`.
///
/// This `struct` is created by the [`iter`] method on [`RBTreeMap`].
///
/// ```
/// use cross_refs::RBTreeMap;
///
/// let map = RBTreeMap::from([(1, "a"), (2, "b")]);
/// let mut iter = map.iter();
/// assert_eq!(iter.next(), Some((&1, &"a")));
/// assert_eq!(iter.next_back(), Some((&2, &"b")));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: RBTreeMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    tree: &'a RawRBTreeMap<K, V>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

/// An owning iterator over the entries of a `RBTreeMap`, sorted by key.
pub struct IntoIter<K, V> {
    inner: alloc::vec::IntoIter<(K, V)>,
}

/// An iterator over the keys of a `RBTreeMap`.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of a `RBTreeMap`.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<K, V> RBTreeMap<K, V> {
    /// Makes a new, empty `RBTreeMap` ordered by [`Natural`].
    ///
    /// Does not allocate anything on its own.
    ///
    /// ```
    /// use cross_refs::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<K, V, C> RBTreeMap<K, V, C> {
    /// Makes a new, empty `RBTreeMap` ordered by `cmp`.
    ///
    /// ```
    /// use cross_refs::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::with_comparator(|a: &i32, b: &i32| a.abs() < b.abs());
    /// map.insert(-3, "minus three");
    /// map.insert(2, "two");
    /// assert_eq!(map.keys().copied().collect::<Vec<_>>(), [2, -3]);
    /// assert!(map.contains(&3));
    /// ```
    #[must_use]
    pub const fn with_comparator(cmp: C) -> Self {
        Self {
            raw: RawRBTreeMap::new(),
            cmp,
        }
    }

    /// Returns the comparator ordering this map.
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Returns the number of elements in the map.
    ///
    /// ```
    /// use cross_refs::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.insert(1, "a");
    /// assert_eq!(a.len(), 1);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Clears the map, dropping every node.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Moves every entry into a new map, leaving `self` empty.
    ///
    /// This is the ownership-transfer counterpart to [`Clone`]: no node is
    /// copied, and the source keeps its comparator so it stays usable.
    ///
    /// ```
    /// use cross_refs::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::from([(1, "a"), (2, "b")]);
    /// let b = a.take();
    /// assert!(a.is_empty());
    /// assert_eq!(b.len(), 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use = "the taken entries are dropped if the result is unused"]
    pub fn take(&mut self) -> Self
    where
        C: Clone,
    {
        let cmp = self.cmp.clone();
        core::mem::replace(self, Self::with_comparator(cmp))
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// The key may be any borrowed form of the map's key type, but the
    /// comparator must order the borrowed form the same way.
    ///
    /// ```
    /// use cross_refs::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// assert!(map.contains(&1));
    /// assert!(!map.contains(&2));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.contains_key(key, &self.cmp)
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.get(key, &self.cmp)
    }

    /// Returns the stored key and its value.
    ///
    /// Useful with comparators that consider distinct keys equal.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.get_key_value(key, &self.cmp)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.get_mut(key, &self.cmp)
    }

    /// Keyed lookup that reports absence as [`Error::KeyNotFound`].
    ///
    /// Absence is a caller error here; test with [`contains`](Self::contains)
    /// first when a missing key is a legitimate outcome.
    ///
    /// ```
    /// use cross_refs::{Error, RBTreeMap};
    ///
    /// let map = RBTreeMap::from([("a", 1)]);
    /// assert_eq!(map.try_get("a"), Ok(&1));
    /// assert_eq!(map.try_get("b"), Err(Error::KeyNotFound));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if no entry matches `key`.
    pub fn try_get<Q>(&self, key: &Q) -> Result<&V, Error>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Writable form of [`try_get`](Self::try_get).
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if no entry matches `key`.
    pub fn try_get_mut<Q>(&mut self, key: &Q) -> Result<&mut V, Error>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.get_mut(key).ok_or(Error::KeyNotFound)
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, a new red leaf is linked in,
    /// the tree is rebalanced and `None` is returned.
    ///
    /// If the map did have this key present, only the value is replaced and
    /// the old value is returned. The key is not updated and the tree shape
    /// does not change.
    ///
    /// ```
    /// use cross_refs::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.insert(37, "b"), Some("a"));
    /// assert_eq!(map[&37], "b");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, key: K, value: V) -> Option<V>
    where
        C: Comparator<K>,
    {
        self.raw.insert(key, value, &self.cmp)
    }

    /// Removes a key from the map, returning its value if it was present.
    ///
    /// ```
    /// use cross_refs::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::from([(1, "a")]);
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.remove_entry(key, &self.cmp)
    }

    /// Returns the first (smallest) key-value pair.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.begin().entry()
    }

    /// Returns the last (largest) key-value pair.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.raw.last().map(|h| {
            let node = self.raw.node(h);
            (node.key(), node.value())
        })
    }

    /// Gets an iterator over the entries of the map, in ascending key order.
    ///
    /// # Complexity
    ///
    /// O(log n) to create the iterator; amortized O(1) per step.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            tree: &self.raw,
            front: self.raw.first(),
            back: self.raw.last(),
            remaining: self.raw.len(),
        }
    }

    /// Gets an iterator over the keys of the map, in ascending order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the map, in key order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for RBTreeMap<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
            cmp: self.cmp.clone(),
        }
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for RBTreeMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<K: Eq, V: Eq, C> Eq for RBTreeMap<K, V, C> {}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for RBTreeMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C: Default> Default for RBTreeMap<K, V, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K, V, C: Comparator<K> + Default> FromIterator<(K, V)> for RBTreeMap<K, V, C> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K, V, C: Comparator<K>> Extend<(K, V)> for RBTreeMap<K, V, C> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for RBTreeMap<K, V> {
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, K, V, C> IntoIterator for &'a RBTreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V, C> IntoIterator for RBTreeMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Gets an owning iterator over the entries of the map, sorted by key.
    ///
    /// ```
    /// use cross_refs::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(2, "b"), (1, "a")]);
    /// assert_eq!(map.into_iter().collect::<Vec<_>>(), [(1, "a"), (2, "b")]);
    /// ```
    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.raw.into_sorted_entries().into_iter(),
        }
    }
}

impl<K, Q, V, C> Index<&Q> for RBTreeMap<K, V, C>
where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Comparator<Q>,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics with [`Error::KeyNotFound`]'s message if the key is absent.
    fn index(&self, key: &Q) -> &V {
        match self.try_get(key) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<K, Q, V, C> IndexMut<&Q> for RBTreeMap<K, V, C>
where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Comparator<Q>,
{
    /// # Panics
    ///
    /// Panics with [`Error::KeyNotFound`]'s message if the key is absent.
    fn index_mut(&mut self, key: &Q) -> &mut V {
        match self.try_get_mut(key) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front?;
        self.front = self.tree.successor(handle);
        self.remaining -= 1;

        let node = self.tree.node(handle);
        Some((node.key(), node.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back?;
        self.back = self.tree.predecessor(handle);
        self.remaining -= 1;

        let node = self.tree.node(handle);
        Some((node.key(), node.value()))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter { ..*self }
    }
}

impl<K, V> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").field("remaining", &self.remaining).finish()
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::compare::Reverse;
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;
    use static_assertions::assert_impl_all;

    assert_impl_all!(RBTreeMap<i32, i32>: Send, Sync, Clone, Default);
    assert_impl_all!(Iter<'static, i32, i32>: Send, Sync, Clone, ExactSizeIterator);

    #[test]
    fn borrowed_lookups_on_string_keys() {
        let mut map: RBTreeMap<String, usize> = RBTreeMap::new();
        map.insert("word".to_string(), 1);
        assert!(map.contains("word"));
        map["word"] += 1;
        assert_eq!(map.get("word"), Some(&2));
        assert_eq!(map.try_get_mut("other"), Err(Error::KeyNotFound));
    }

    #[test]
    #[should_panic(expected = "no entry found for key")]
    fn index_of_absent_key_panics() {
        let map: RBTreeMap<i32, i32> = RBTreeMap::new();
        let _ = map[&1];
    }

    #[test]
    fn reverse_comparator_keeps_invariants() {
        let mut map = RBTreeMap::with_comparator(Reverse);
        for k in 0..200 {
            map.insert(k, ());
            map.raw.validate_invariants(&map.cmp);
        }
        for k in (0..200).step_by(2) {
            map.remove(&k);
            map.raw.validate_invariants(&map.cmp);
        }
        let keys: Vec<_> = map.keys().copied().collect();
        assert_eq!(keys, (0..200).rev().filter(|k| k % 2 == 1).collect::<Vec<_>>());
    }

    #[test]
    fn iter_meets_in_the_middle() {
        let map: RBTreeMap<_, _> = (0..10).map(|k| (k, k)).collect();
        let mut iter = map.iter();
        let mut seen = Vec::new();
        while let Some((k, _)) = iter.next() {
            seen.push(*k);
            if let Some((k, _)) = iter.next_back() {
                seen.push(*k);
            }
        }
        assert_eq!(seen, [0, 9, 1, 8, 2, 7, 3, 6, 4, 5]);
        assert_eq!(iter.len(), 0);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn take_leaves_a_usable_empty_map() {
        let mut map = RBTreeMap::with_comparator(Reverse);
        map.extend([(1, 'a'), (2, 'b')]);
        let moved = map.take();
        assert!(map.is_empty());
        assert_eq!(map.begin(), map.end());
        map.insert(5, 'e');
        map.insert(6, 'f');
        assert_eq!(map.first_key_value(), Some((&6, &'f')));
        assert_eq!(moved.last_key_value(), Some((&1, &'a')));
    }
}
