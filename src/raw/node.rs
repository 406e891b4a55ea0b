use super::handle::Handle;

/// Two-state node color.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Which child link of a parent a node hangs from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn flip(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A tree vertex.
///
/// `left` and `right` own their subtrees (the arena slot is only released
/// when the node is unlinked), while `parent` is a back-reference used for
/// successor walks and rotation bookkeeping.
pub(crate) struct Node<K, V> {
    key: K,
    value: V,
    color: Color,
    parent: Option<Handle>,
    left: Option<Handle>,
    right: Option<Handle>,
}

impl<K, V> Node<K, V> {
    /// Creates a detached red leaf.
    pub(crate) const fn new(key: K, value: V, parent: Option<Handle>) -> Self {
        Self {
            key,
            value,
            color: Color::Red,
            parent,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub(crate) fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Replaces the value, returning the previous one.
    pub(crate) fn replace_value(&mut self, value: V) -> V {
        core::mem::replace(&mut self.value, value)
    }

    /// Exchanges key and value with another node, leaving links and colors alone.
    pub(crate) fn swap_entry(&mut self, other: &mut Self) {
        core::mem::swap(&mut self.key, &mut other.key);
        core::mem::swap(&mut self.value, &mut other.value);
    }

    pub(crate) fn into_entry(self) -> (K, V) {
        (self.key, self.value)
    }

    #[inline]
    pub(crate) fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub(crate) fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    #[inline]
    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    #[inline]
    pub(crate) fn parent(&self) -> Option<Handle> {
        self.parent
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<Handle> {
        self.right
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// Which side `child` hangs from.
    ///
    /// # Panics
    ///
    /// Panics if `child` is not a child of this node.
    pub(crate) fn side_of(&self, child: Handle) -> Side {
        if self.left == Some(child) {
            Side::Left
        } else if self.right == Some(child) {
            Side::Right
        } else {
            panic!("`Node::side_of()` - `child` is not linked under this node!");
        }
    }
}

impl<K: Clone, V: Clone> Node<K, V> {
    /// Copies key, value and color; links are left for the caller to fill in.
    pub(crate) fn clone_detached(&self, parent: Option<Handle>) -> Self {
        Self {
            key: self.key.clone(),
            value: self.value.clone(),
            color: self.color,
            parent,
            left: None,
            right: None,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn new_nodes_are_red_leaves() {
        let parent = Handle::from_index(3);
        let node = Node::new("k", 1, Some(parent));
        assert!(node.is_red());
        assert_eq!(node.parent(), Some(parent));
        assert_eq!((node.left(), node.right()), (None, None));
    }

    #[test]
    fn side_of_follows_child_links() {
        let (l, r) = (Handle::from_index(1), Handle::from_index(2));
        let mut node = Node::new(0, (), None);
        node.set_child(Side::Left, Some(l));
        node.set_child(Side::Right.flip().flip(), Some(r));
        assert_eq!(node.side_of(l), Side::Left);
        assert_eq!(node.side_of(r), Side::Right);
        assert_eq!(node.child(Side::Left.flip()), Some(r));
    }

    #[test]
    #[should_panic(expected = "`Node::side_of()` - `child` is not linked under this node!")]
    fn side_of_stranger_panics() {
        let node: Node<u8, ()> = Node::new(0, (), None);
        node.side_of(Handle::from_index(9));
    }

    #[test]
    fn swap_entry_keeps_structure() {
        let mut a = Node::new(1, "one", None);
        let mut b = Node::new(2, "two", Some(Handle::from_index(0)));
        b.set_color(Color::Black);
        a.swap_entry(&mut b);
        assert_eq!((*a.key(), *a.value(), a.color()), (2, "two", Color::Red));
        assert_eq!((*b.key(), *b.value(), b.color()), (1, "one", Color::Black));
        assert_eq!(b.parent(), Some(Handle::from_index(0)));
    }
}
