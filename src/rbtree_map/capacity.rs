use super::RBTreeMap;
use crate::compare::Natural;
use crate::raw::RawRBTreeMap;

impl<K, V> RBTreeMap<K, V> {
    /// Creates an empty map with room for at least `capacity` nodes.
    ///
    /// ```
    /// use cross_refs::RBTreeMap;
    ///
    /// let map: RBTreeMap<i32, i32> = RBTreeMap::with_capacity(32);
    /// assert!(map.is_empty());
    /// assert!(map.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RBTreeMap {
            raw: RawRBTreeMap::with_capacity(capacity),
            cmp: Natural,
        }
    }
}

impl<K, V, C> RBTreeMap<K, V, C> {
    /// Returns how many nodes the map can hold without reallocating.
    ///
    /// Slots freed by [`remove`](RBTreeMap::remove) are reused before the
    /// map grows.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
