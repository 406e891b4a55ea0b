use core::fmt;

use super::RBTreeMap;
use crate::error::Error;
use crate::raw::{Handle, RawRBTreeMap};

/// A position in a `RBTreeMap`: either a node or the end sentinel.
///
/// Cursors are created by [`RBTreeMap::begin`] and [`RBTreeMap::end`] and
/// move with [`move_next`](Cursor::move_next) and
/// [`move_prev`](Cursor::move_prev), following parent links to the in-order
/// neighbor without any auxiliary storage. Any number of cursors can read the
/// same map at once; the borrow checker rules out mutation meanwhile.
///
/// ```
/// use cross_refs::RBTreeMap;
///
/// let map = RBTreeMap::from([("b", 2), ("a", 1)]);
///
/// let mut cursor = map.begin();
/// let mut seen = Vec::new();
/// while cursor != map.end() {
///     seen.push(cursor.entry().unwrap());
///     cursor.move_next();
/// }
/// assert_eq!(seen, [(&"a", &1), (&"b", &2)]);
/// ```
pub struct Cursor<'a, K, V> {
    tree: &'a RawRBTreeMap<K, V>,
    // `None` is the end sentinel.
    current: Option<Handle>,
}

impl<K, V, C> RBTreeMap<K, V, C> {
    /// Returns a cursor on the smallest key, or the end sentinel if the map
    /// is empty.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn begin(&self) -> Cursor<'_, K, V> {
        Cursor {
            tree: &self.raw,
            current: self.raw.first(),
        }
    }

    /// Returns the end sentinel. It equals no cursor positioned on a node.
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn end(&self) -> Cursor<'_, K, V> {
        Cursor {
            tree: &self.raw,
            current: None,
        }
    }
}

impl<'a, K, V> Cursor<'a, K, V> {
    /// Returns `true` if this is the end sentinel.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// The key under the cursor, `None` at the end sentinel.
    #[must_use]
    pub fn key(&self) -> Option<&'a K> {
        self.entry().map(|(k, _)| k)
    }

    /// The value under the cursor, `None` at the end sentinel.
    #[must_use]
    pub fn value(&self) -> Option<&'a V> {
        self.entry().map(|(_, v)| v)
    }

    /// The key-value pair under the cursor, `None` at the end sentinel.
    #[must_use]
    pub fn entry(&self) -> Option<(&'a K, &'a V)> {
        let node = self.tree.node(self.current?);
        Some((node.key(), node.value()))
    }

    /// Like [`entry`](Self::entry), but treats the sentinel as an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PastTheEnd`] at the end sentinel.
    pub fn try_entry(&self) -> Result<(&'a K, &'a V), Error> {
        self.entry().ok_or(Error::PastTheEnd)
    }

    /// Advances to the in-order successor.
    ///
    /// From a node with a right child this is the leftmost node of that
    /// subtree; otherwise it is the first ancestor reached from a left
    /// child. With no such ancestor the cursor becomes the end sentinel.
    /// Advancing the sentinel leaves it in place.
    pub fn move_next(&mut self) {
        if let Some(handle) = self.current {
            self.current = self.tree.successor(handle);
        }
    }

    /// Steps back to the in-order predecessor. From the end sentinel this
    /// moves to the largest key; before the smallest key it becomes the
    /// sentinel.
    pub fn move_prev(&mut self) {
        self.current = match self.current {
            Some(handle) => self.tree.predecessor(handle),
            None => self.tree.last(),
        };
    }
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Cursor<'_, K, V> {}

impl<K, V> PartialEq for Cursor<'_, K, V> {
    /// Cursors are equal when they sit on the same node of the same map, or
    /// are both the end sentinel of the same map.
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.tree, other.tree) && self.current == other.current
    }
}

impl<K, V> Eq for Cursor<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Cursor<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.entry() {
            Some((k, v)) => f.debug_tuple("Cursor").field(k).field(v).finish(),
            None => f.write_str("Cursor(end)"),
        }
    }
}
