//! Order relations used to arrange keys in an [`RBTreeMap`](crate::RBTreeMap).

/// A strict weak ordering over `T`.
///
/// `less(a, b)` must be irreflexive and transitive, and the equivalence it
/// induces (`!less(a, b) && !less(b, a)`) is what the map treats as key
/// equality. No separate `PartialEq` is consulted.
///
/// Any `Fn(&T, &T) -> bool` is a comparator:
///
/// ```
/// use cross_refs::RBTreeMap;
///
/// let mut by_len = RBTreeMap::with_comparator(|a: &&str, b: &&str| a.len() < b.len());
/// by_len.insert("three", 3);
/// by_len.insert("one", 1);
/// by_len.insert("two", 2); // same length as "one": overwrites it
///
/// let keys: Vec<_> = by_len.keys().copied().collect();
/// assert_eq!(keys, ["one", "three"]);
/// assert_eq!(by_len[&"one"], 2);
/// ```
pub trait Comparator<T: ?Sized> {
    /// Returns `true` if `a` orders strictly before `b`.
    fn less(&self, a: &T, b: &T) -> bool;
}

/// The natural order given by [`Ord`]. The default comparator.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Natural;

impl<T: ?Sized + Ord> Comparator<T> for Natural {
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        a < b
    }
}

/// The reverse of [`Ord`]: iteration visits keys in descending order.
///
/// ```
/// use cross_refs::RBTreeMap;
/// use cross_refs::compare::Reverse;
///
/// let mut map = RBTreeMap::with_comparator(Reverse);
/// map.extend([(1, 'a'), (3, 'c'), (2, 'b')]);
/// assert_eq!(map.keys().copied().collect::<Vec<_>>(), [3, 2, 1]);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Reverse;

impl<T: ?Sized + Ord> Comparator<T> for Reverse {
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        b < a
    }
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}
