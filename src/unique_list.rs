//! An append-only sequence that keeps only the first occurrence of a value.

use core::fmt;
use core::iter::FusedIterator;

use crate::error::Error;
use crate::raw::{Arena, Handle};

struct Link<T> {
    value: T,
    next: Option<Handle>,
}

/// A singly-linked list that ignores values it already holds.
///
/// [`push_back`](UniqueList::push_back) scans the whole list before
/// appending, so every operation that grows the list is O(n). Elements are
/// kept in the order of their first occurrence.
///
/// ```
/// use cross_refs::UniqueList;
///
/// let mut lines = UniqueList::new();
/// for line in [3, 1, 3, 2, 1] {
///     lines.push_back(line);
/// }
/// assert_eq!(lines.iter().copied().collect::<Vec<_>>(), [3, 1, 2]);
/// ```
pub struct UniqueList<T> {
    links: Arena<Link<T>>,
    head: Option<Handle>,
    tail: Option<Handle>,
}

/// Iterator over a [`UniqueList`], front to back.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T> {
    links: &'a Arena<Link<T>>,
    next: Option<Handle>,
    remaining: usize,
}

impl<T> UniqueList<T> {
    /// Makes a new, empty list. Does not allocate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            links: Arena::new(),
            head: None,
            tail: None,
        }
    }

    /// Returns the number of distinct elements in the list.
    ///
    /// ```
    /// use cross_refs::UniqueList;
    ///
    /// let list: UniqueList<_> = [1, 1, 2].into_iter().collect();
    /// assert_eq!(list.len(), 2);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns `true` if the list holds no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Returns the first element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyContainer`] if the list is empty.
    pub fn peek_front(&self) -> Result<&T, Error> {
        let head = self.head.ok_or(Error::EmptyContainer)?;
        Ok(&self.links.get(head).value)
    }

    /// Returns the last element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyContainer`] if the list is empty.
    pub fn peek_back(&self) -> Result<&T, Error> {
        let tail = self.tail.ok_or(Error::EmptyContainer)?;
        Ok(&self.links.get(tail).value)
    }

    /// Gets an iterator over the elements, in order of first insertion.
    ///
    /// ```
    /// use cross_refs::UniqueList;
    ///
    /// let list: UniqueList<_> = ['b', 'a', 'b'].into_iter().collect();
    /// assert_eq!(list.iter().collect::<String>(), "ba");
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            links: &self.links,
            next: self.head,
            remaining: self.len(),
        }
    }

    /// Removes every element. The list can be reused afterwards.
    pub fn clear(&mut self) {
        self.links.clear();
        self.head = None;
        self.tail = None;
    }
}

impl<T: PartialEq> UniqueList<T> {
    /// Returns `true` if an equal value is in the list.
    pub fn contains(&self, value: &T) -> bool {
        self.iter().any(|v| v == value)
    }

    /// Appends `value` unless an equal value is already present.
    ///
    /// Returns whether the value was appended.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn push_back(&mut self, value: T) -> bool {
        if self.contains(&value) {
            return false;
        }

        let link = self.links.alloc(Link { value, next: None });
        match self.tail {
            Some(tail) => self.links.get_mut(tail).next = Some(link),
            None => self.head = Some(link),
        }
        self.tail = Some(link);
        true
    }
}

impl<T> Default for UniqueList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + PartialEq> Clone for UniqueList<T> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T: PartialEq> PartialEq for UniqueList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for UniqueList<T> {}

impl<T: fmt::Debug> fmt::Debug for UniqueList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> FromIterator<T> for UniqueList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T: PartialEq> Extend<T> for UniqueList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<'a, T> IntoIterator for &'a UniqueList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let link = self.links.get(self.next?);
        self.next = link.next;
        self.remaining -= 1;
        Some(&link.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter { ..*self }
    }
}
