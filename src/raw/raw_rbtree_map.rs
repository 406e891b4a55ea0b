use alloc::vec::Vec;
use core::borrow::Borrow;

use smallvec::{SmallVec, smallvec};

use super::node::{Color, Node, Side};
use super::{Arena, Handle};
use crate::compare::Comparator;

/// The red-black tree backing `RBTreeMap`.
///
/// Nodes live in an arena and link to each other by [`Handle`]. The
/// comparator is owned by the public wrapper and passed in to every
/// operation that compares keys; rotations and traversal never compare.
pub(crate) struct RawRBTreeMap<K, V> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K, V>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
}

impl<K, V> RawRBTreeMap<K, V> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
        }
    }

    /// Returns the number of key-value pairs in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Drops every node.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    #[cfg(test)]
    pub(crate) fn root(&self) -> Option<Handle> {
        self.root
    }

    pub(crate) fn node(&self, handle: Handle) -> &Node<K, V> {
        self.nodes.get(handle)
    }

    /// Leftmost node of the whole tree.
    pub(crate) fn first(&self) -> Option<Handle> {
        self.root.map(|root| self.extreme(root, Side::Left))
    }

    /// Rightmost node of the whole tree.
    pub(crate) fn last(&self) -> Option<Handle> {
        self.root.map(|root| self.extreme(root, Side::Right))
    }

    /// Follows `side` links from `handle` until there are none left.
    fn extreme(&self, mut handle: Handle, side: Side) -> Handle {
        while let Some(child) = self.nodes.get(handle).child(side) {
            handle = child;
        }
        handle
    }

    /// In-order successor, or `None` past the last node.
    pub(crate) fn successor(&self, handle: Handle) -> Option<Handle> {
        self.neighbor(handle, Side::Right)
    }

    /// In-order predecessor, or `None` before the first node.
    pub(crate) fn predecessor(&self, handle: Handle) -> Option<Handle> {
        self.neighbor(handle, Side::Left)
    }

    // Successor when `toward` is `Right`, predecessor when `Left`. Uses only
    // parent links, no stack.
    fn neighbor(&self, handle: Handle, toward: Side) -> Option<Handle> {
        if let Some(child) = self.nodes.get(handle).child(toward) {
            return Some(self.extreme(child, toward.flip()));
        }

        let mut current = handle;
        let mut parent = self.nodes.get(handle).parent();
        while let Some(p) = parent {
            if self.nodes.get(p).child(toward) != Some(current) {
                break;
            }
            current = p;
            parent = self.nodes.get(p).parent();
        }
        parent
    }

    /// Walks parent links up to the node that has none.
    fn top_of(&self, mut handle: Handle) -> Handle {
        while let Some(parent) = self.nodes.get(handle).parent() {
            handle = parent;
        }
        handle
    }

    fn is_red(&self, handle: Option<Handle>) -> bool {
        handle.is_some_and(|h| self.nodes.get(h).is_red())
    }

    fn set_color(&mut self, handle: Handle, color: Color) {
        self.nodes.get_mut(handle).set_color(color);
    }

    /// Rotates `n` down towards `n.left`; its right child takes its place.
    #[cfg(test)]
    pub(crate) fn rotate_left(&mut self, n: Handle) {
        self.rotate(n, Side::Left);
    }

    /// Rotates `n` down towards `n.right`; its left child takes its place.
    #[cfg(test)]
    pub(crate) fn rotate_right(&mut self, n: Handle) {
        self.rotate(n, Side::Right);
    }

    /// Single rotation moving `n` down on side `dir`.
    ///
    /// The pivot is `n`'s child opposite `dir`. The pivot's inner subtree is
    /// handed to `n`, `n` becomes the pivot's `dir` child and the pivot is
    /// linked into `n`'s former slot. `self.root` is left untouched; callers
    /// re-derive it afterwards.
    fn rotate(&mut self, n: Handle, dir: Side) {
        let up = dir.flip();
        let pivot = self.nodes.get(n).child(up).expect("`RawRBTreeMap::rotate()` - pivot child is missing!");
        let parent = self.nodes.get(n).parent();
        let inner = self.nodes.get(pivot).child(dir);

        self.nodes.get_mut(n).set_child(up, inner);
        if let Some(inner) = inner {
            self.nodes.get_mut(inner).set_parent(Some(n));
        }

        if let Some(parent) = parent {
            let side = self.nodes.get(parent).side_of(n);
            self.nodes.get_mut(parent).set_child(side, Some(pivot));
        }
        self.nodes.get_mut(pivot).set_parent(parent);

        self.nodes.get_mut(pivot).set_child(dir, Some(n));
        self.nodes.get_mut(n).set_parent(Some(pivot));
    }

    /// Restores the red-black invariants after `n` was linked in as a red leaf.
    fn insert_fixup(&mut self, mut n: Handle) {
        loop {
            let Some(mut parent) = self.nodes.get(n).parent() else {
                // Reached the root.
                self.set_color(n, Color::Black);
                return;
            };
            if !self.nodes.get(parent).is_red() {
                return;
            }

            // A red parent is never the root, so the grandparent exists.
            let grandparent =
                self.nodes.get(parent).parent().expect("`RawRBTreeMap::insert_fixup()` - red root!");
            let parent_side = self.nodes.get(grandparent).side_of(parent);
            let uncle = self.nodes.get(grandparent).child(parent_side.flip());

            if let Some(uncle) = uncle.filter(|&u| self.nodes.get(u).is_red()) {
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                n = grandparent;
                continue;
            }

            if self.nodes.get(parent).side_of(n) != parent_side {
                // Zig-zag: straighten it so `n` and its parent line up.
                self.rotate(parent, parent_side);
                core::mem::swap(&mut n, &mut parent);
            }

            self.rotate(grandparent, parent_side.flip());
            self.set_color(parent, Color::Black);
            self.set_color(grandparent, Color::Red);
            return;
        }
    }

    /// Restores the black-height after a black node was unlinked from
    /// `parent`'s `side`. `x` is whatever took its place.
    fn remove_fixup(&mut self, mut x: Option<Handle>, mut parent: Option<Handle>, mut side: Side) {
        while let Some(p) = parent {
            if self.is_red(x) {
                break;
            }

            let mut sibling =
                self.nodes.get(p).child(side.flip()).expect("`RawRBTreeMap::remove_fixup()` - sibling is missing!");

            if self.nodes.get(sibling).is_red() {
                self.set_color(sibling, Color::Black);
                self.set_color(p, Color::Red);
                self.rotate(p, side);
                sibling = self.nodes.get(p).child(side.flip()).expect("`RawRBTreeMap::remove_fixup()` - sibling is missing!");
            }

            let near = self.nodes.get(sibling).child(side);
            let far = self.nodes.get(sibling).child(side.flip());

            if !self.is_red(near) && !self.is_red(far) {
                // Push the missing black up one level.
                self.set_color(sibling, Color::Red);
                x = Some(p);
                parent = self.nodes.get(p).parent();
                if let Some(grandparent) = parent {
                    side = self.nodes.get(grandparent).side_of(p);
                }
                continue;
            }

            if !self.is_red(far) {
                if let Some(near) = near {
                    self.set_color(near, Color::Black);
                }
                self.set_color(sibling, Color::Red);
                self.rotate(sibling, side.flip());
                sibling = self.nodes.get(p).child(side.flip()).expect("`RawRBTreeMap::remove_fixup()` - sibling is missing!");
            }

            let parent_color = self.nodes.get(p).color();
            self.set_color(sibling, parent_color);
            self.set_color(p, Color::Black);
            if let Some(far) = self.nodes.get(sibling).child(side.flip()) {
                self.set_color(far, Color::Black);
            }
            self.rotate(p, side);
            return;
        }

        if let Some(x) = x {
            self.set_color(x, Color::Black);
        }
    }

    /// Consumes the tree, returning its entries in ascending order.
    pub(crate) fn into_sorted_entries(mut self) -> Vec<(K, V)> {
        let mut order = Vec::with_capacity(self.len());
        let mut current = self.first();
        while let Some(handle) = current {
            order.push(handle);
            current = self.successor(handle);
        }
        self.root = None;
        order.into_iter().map(|handle| self.nodes.take(handle).into_entry()).collect()
    }
}

impl<K, V> RawRBTreeMap<K, V> {
    /// Comparator-driven descent. Equality is "neither orders before the other".
    pub(crate) fn search<Q, C>(&self, key: &Q, cmp: &C) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let here: &Q = node.key().borrow();
            current = if cmp.less(here, key) {
                node.right()
            } else if cmp.less(key, here) {
                node.left()
            } else {
                return Some(handle);
            };
        }
        None
    }

    pub(crate) fn get<Q, C>(&self, key: &Q, cmp: &C) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let handle = self.search(key, cmp)?;
        Some(self.nodes.get(handle).value())
    }

    pub(crate) fn get_key_value<Q, C>(&self, key: &Q, cmp: &C) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let node = self.nodes.get(self.search(key, cmp)?);
        Some((node.key(), node.value()))
    }

    pub(crate) fn get_mut<Q, C>(&mut self, key: &Q, cmp: &C) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let handle = self.search(key, cmp)?;
        Some(self.nodes.get_mut(handle).value_mut())
    }

    pub(crate) fn contains_key<Q, C>(&self, key: &Q, cmp: &C) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.search(key, cmp).is_some()
    }

    /// Inserts a key-value pair into the tree.
    /// Returns the old value if the key was already present; the stored key
    /// is kept and the tree shape does not change in that case.
    pub(crate) fn insert<C>(&mut self, key: K, value: V, cmp: &C) -> Option<V>
    where
        C: Comparator<K>,
    {
        let mut prev = None;
        let mut side = Side::Left;
        let mut current = self.root;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            side = if cmp.less(node.key(), &key) {
                Side::Right
            } else if cmp.less(&key, node.key()) {
                Side::Left
            } else {
                return Some(self.nodes.get_mut(handle).replace_value(value));
            };
            prev = Some(handle);
            current = node.child(side);
        }

        let n = self.nodes.alloc(Node::new(key, value, prev));
        match prev {
            Some(parent) => self.nodes.get_mut(parent).set_child(side, Some(n)),
            None => self.root = Some(n),
        }

        self.insert_fixup(n);
        self.root = Some(self.top_of(n));
        None
    }

    /// Removes a key from the tree and returns the key-value pair.
    pub(crate) fn remove_entry<Q, C>(&mut self, key: &Q, cmp: &C) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let mut target = self.search(key, cmp)?;

        // A node with two children trades its entry with its successor, which
        // has no left child, and the successor's slot is unlinked instead.
        let node = self.nodes.get(target);
        if let (Some(_), Some(right)) = (node.left(), node.right()) {
            let successor = self.extreme(right, Side::Left);
            let (a, b) = self.nodes.get2_mut(target, successor);
            a.swap_entry(b);
            target = successor;
        }

        let node = self.nodes.get(target);
        let child = node.left().or(node.right());
        let parent = node.parent();
        let unlinked_black = !node.is_red();

        if let Some(child) = child {
            self.nodes.get_mut(child).set_parent(parent);
        }
        let side = match parent {
            Some(parent) => {
                let side = self.nodes.get(parent).side_of(target);
                self.nodes.get_mut(parent).set_child(side, child);
                side
            }
            None => {
                self.root = child;
                Side::Left
            }
        };

        let entry = self.nodes.take(target).into_entry();

        if unlinked_black {
            self.remove_fixup(child, parent, side);
        }
        if let Some(anchor) = child.or(parent) {
            self.root = Some(self.top_of(anchor));
        }
        Some(entry)
    }
}

impl<K: Clone, V: Clone> Clone for RawRBTreeMap<K, V> {
    /// Deep copy into a fresh, compacted arena with the same shape and colors.
    fn clone(&self) -> Self {
        let mut nodes = Arena::with_capacity(self.len());
        let Some(root) = self.root else {
            return Self { nodes, root: None };
        };

        let new_root = nodes.alloc(self.nodes.get(root).clone_detached(None));
        let mut pending: SmallVec<[(Handle, Handle); 32]> = smallvec![(root, new_root)];

        while let Some((old, new)) = pending.pop() {
            for side in [Side::Left, Side::Right] {
                if let Some(old_child) = self.nodes.get(old).child(side) {
                    let new_child = nodes.alloc(self.nodes.get(old_child).clone_detached(Some(new)));
                    nodes.get_mut(new).set_child(side, Some(new_child));
                    pending.push((old_child, new_child));
                }
            }
        }

        Self {
            nodes,
            root: Some(new_root),
        }
    }
}
