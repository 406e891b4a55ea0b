use alloc::vec::Vec;

use super::handle::Handle;

enum Slot<T> {
    Occupied(T),
    // Vacant slots form a singly-linked free list threaded through the slots.
    Vacant { next_free: Option<Handle> },
}

/// Slot storage for tree nodes.
///
/// Handles stay valid until the slot is released with [`Arena::take`]; a
/// released slot is reused by the next [`Arena::alloc`].
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<Handle>,
    len: usize,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            len: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Number of occupied slots.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(handle) = self.free_head {
            let slot = &mut self.slots[handle.to_index()];
            let Slot::Vacant { next_free } = *slot else {
                unreachable!("`Arena::alloc()` - free list points at an occupied slot!");
            };
            self.free_head = next_free;
            *slot = Slot::Occupied(element);
            self.len += 1;
            return handle;
        }

        assert!(
            self.slots.len() <= Handle::MAX,
            "`Arena::alloc()` - arena is at maximum capacity ({})",
            Handle::MAX + 1
        );
        let handle = Handle::from_index(self.slots.len());
        self.slots.push(Slot::Occupied(element));
        self.len += 1;
        handle
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        match &self.slots[handle.to_index()] {
            Slot::Occupied(element) => element,
            Slot::Vacant { .. } => panic!("`Arena::get()` - `handle` is invalid!"),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        match &mut self.slots[handle.to_index()] {
            Slot::Occupied(element) => element,
            Slot::Vacant { .. } => panic!("`Arena::get_mut()` - `handle` is invalid!"),
        }
    }

    /// Returns mutable references to two distinct slots at once.
    pub(crate) fn get2_mut(&mut self, a: Handle, b: Handle) -> (&mut T, &mut T) {
        let (ia, ib) = (a.to_index(), b.to_index());
        assert_ne!(ia, ib, "`Arena::get2_mut()` - handles alias the same slot!");
        let (first, second) = if ia < ib {
            let (head, tail) = self.slots.split_at_mut(ib);
            (&mut head[ia], &mut tail[0])
        } else {
            let (head, tail) = self.slots.split_at_mut(ia);
            (&mut tail[0], &mut head[ib])
        };
        match (first, second) {
            (Slot::Occupied(x), Slot::Occupied(y)) => (x, y),
            _ => panic!("`Arena::get2_mut()` - `handle` is invalid!"),
        }
    }

    /// Releases a slot, handing back its element.
    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let vacant = Slot::Vacant {
            next_free: self.free_head,
        };
        match core::mem::replace(&mut self.slots[handle.to_index()], vacant) {
            Slot::Occupied(element) => {
                self.free_head = Some(handle);
                self.len -= 1;
                element
            }
            Slot::Vacant { next_free } => {
                // Undo the overwrite before reporting the misuse.
                self.slots[handle.to_index()] = Slot::Vacant { next_free };
                panic!("`Arena::take()` - `handle` is invalid!");
            }
        }
    }

    /// Drops every element and forgets every handle.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.len = 0;
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    #[test]
    fn released_slots_are_reused_last_in_first_out() {
        let mut arena = Arena::new();
        let a = arena.alloc('a');
        let b = arena.alloc('b');
        let c = arena.alloc('c');

        assert_eq!(arena.take(a), 'a');
        assert_eq!(arena.take(c), 'c');
        assert_eq!(arena.len(), 1);

        assert_eq!(arena.alloc('x'), c);
        assert_eq!(arena.alloc('y'), a);
        assert_eq!(*arena.get(b), 'b');
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn get2_mut_hands_out_both_slots() {
        let mut arena = Arena::with_capacity(4);
        let lo = arena.alloc(1);
        let hi = arena.alloc(2);

        let (x, y) = arena.get2_mut(hi, lo);
        core::mem::swap(x, y);

        assert_eq!(*arena.get(lo), 2);
        assert_eq!(*arena.get(hi), 1);
        assert!(arena.capacity() >= 4);
    }

    #[test]
    fn full_arena_keeps_its_len_after_a_failed_alloc() {
        let mut arena = Arena::new();
        for _ in 0..=Handle::MAX {
            arena.alloc(0u8);
        }
        let full = arena.len();
        assert_eq!(full, Handle::MAX + 1);

        let result = std::panic::catch_unwind(core::panic::AssertUnwindSafe(|| arena.alloc(1)));
        assert!(result.is_err());
        assert_eq!(arena.len(), full);
        assert_eq!(*arena.get(Handle::from_index(Handle::MAX)), 0);
    }

    #[test]
    #[should_panic(expected = "`Arena::take()` - `handle` is invalid!")]
    fn double_take_panics() {
        let mut arena = Arena::new();
        let h = arena.alloc(7u8);
        arena.take(h);
        arena.take(h);
    }

    #[test]
    #[should_panic(expected = "`Arena::get()` - `handle` is invalid!")]
    fn get_after_take_panics() {
        let mut arena = Arena::new();
        let h = arena.alloc(7u8);
        arena.take(h);
        arena.get(h);
    }

    #[derive(Clone, Debug)]
    enum Step {
        Alloc(u32),
        Overwrite(usize, u32),
        Release(usize),
        Clear,
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![
            12 => any::<u32>().prop_map(Step::Alloc),
            4 => (any::<usize>(), any::<u32>()).prop_map(|(at, v)| Step::Overwrite(at, v)),
            6 => any::<usize>().prop_map(Step::Release),
            1 => Just(Step::Clear),
        ]
    }

    proptest! {
        #[test]
        fn live_handles_keep_their_elements(steps in prop::collection::vec(step(), 0..256)) {
            let mut live: Vec<(Handle, u32)> = Vec::new();
            let mut arena = Arena::new();

            for step in steps {
                match step {
                    Step::Alloc(v) => {
                        let h = arena.alloc(v);
                        prop_assert!(live.iter().all(|&(other, _)| other != h));
                        live.push((h, v));
                    }
                    Step::Overwrite(at, v) if !live.is_empty() => {
                        let at = at % live.len();
                        *arena.get_mut(live[at].0) = v;
                        live[at].1 = v;
                    }
                    Step::Release(at) if !live.is_empty() => {
                        let (h, v) = live.swap_remove(at % live.len());
                        prop_assert_eq!(arena.take(h), v);
                    }
                    Step::Clear => {
                        arena.clear();
                        live.clear();
                    }
                    Step::Overwrite(..) | Step::Release(_) => {}
                }

                prop_assert_eq!(arena.len(), live.len());
                prop_assert_eq!(arena.is_empty(), live.is_empty());
                for &(h, v) in &live {
                    prop_assert_eq!(*arena.get(h), v);
                }
            }
        }
    }
}
