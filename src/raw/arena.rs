use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use super::link::Link;

/// Growable slot table addressed by [`Link`]s.
///
/// Vacated slots are kept on a free list and handed out again before the
/// table grows, so links stay small and dense under insert/delete churn.
#[derive(Clone, Debug)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    vacant: Vec<Link>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            vacant: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            vacant: Vec::new(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Number of occupied slots.
    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.vacant.len())
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn insert(&mut self, element: T) -> Link {
        if let Some(link) = self.vacant.pop() {
            self.slots[link.slot()] = Some(element);
            return link;
        }

        assert!(
            self.slots.len() <= Link::MAX,
            "`Arena::insert()` - arena is full ({} slots)",
            Link::MAX + 1
        );
        self.slots.push(Some(element));
        Link::from_slot(self.slots.len() - 1)
    }

    /// Vacates the slot behind `link` and returns its element.
    pub(crate) fn remove(&mut self, link: Link) -> T {
        let element = self.slots[link.slot()].take().expect("`Arena::remove()` - `link` is vacant!");
        self.vacant.push(link);
        element
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.vacant.clear();
    }
}

impl<T> Index<Link> for Arena<T> {
    type Output = T;

    #[inline]
    fn index(&self, link: Link) -> &T {
        self.slots[link.slot()].as_ref().expect("`Arena::index()` - `link` is vacant!")
    }
}

impl<T> IndexMut<Link> for Arena<T> {
    #[inline]
    fn index_mut(&mut self, link: Link) -> &mut T {
        self.slots[link.slot()].as_mut().expect("`Arena::index_mut()` - `link` is vacant!")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn reserves_requested_capacity() {
        let arena: Arena<u64> = Arena::with_capacity(10);
        assert!(arena.capacity() >= 10);
        assert!(arena.is_empty());
    }

    #[test]
    fn vacated_slots_are_reused() {
        let mut arena = Arena::new();
        let a = arena.insert(1u64);
        let b = arena.insert(2u64);
        assert_eq!(arena.remove(a), 1);
        let c = arena.insert(3u64);
        assert_eq!(c, a);
        assert_eq!(arena[b], 2);
        assert_eq!(arena[c], 3);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    #[should_panic(expected = "`Arena::index()` - `link` is vacant!")]
    fn reading_a_vacant_slot_panics() {
        let mut arena = Arena::new();
        let link = arena.insert(7u64);
        arena.remove(link);
        let _value: u64 = arena[link];
    }

    #[test]
    #[should_panic(expected = "`Arena::insert()` - arena is full")]
    fn insert_past_link_range_panics() {
        let mut arena = Arena::new();
        for value in 0..=Link::MAX + 1 {
            arena.insert(value);
        }
    }

    proptest! {
        #[test]
        fn arena_tracks_live_elements(operations in prop::collection::vec(operation_strategy(), 0..256)) {
            let mut live: Vec<(Link, u64)> = Vec::new();
            let mut arena: Arena<u64> = Arena::new();

            for operation in operations {
                match operation {
                    Operation::Insert(value) => {
                        let link = arena.insert(value);
                        live.push((link, value));
                    }
                    Operation::Overwrite(which, value) => {
                        if live.is_empty() {
                            continue;
                        }
                        let position = which % live.len();
                        arena[live[position].0] = value;
                        live[position].1 = value;
                    }
                    Operation::Remove(which) => {
                        if live.is_empty() {
                            continue;
                        }
                        let position = which % live.len();
                        let (link, expected) = live.swap_remove(position);
                        prop_assert_eq!(arena.remove(link), expected);
                    }
                    Operation::Clear => {
                        arena.clear();
                        live.clear();
                    }
                }

                prop_assert_eq!(arena.len(), live.len());
                for &(link, value) in &live {
                    prop_assert_eq!(arena[link], value);
                }
            }
        }
    }

    #[derive(Clone, Debug)]
    enum Operation {
        Insert(u64),
        Overwrite(usize, u64),
        Remove(usize),
        Clear,
    }

    fn operation_strategy() -> impl Strategy<Value = Operation> {
        prop_oneof![
            20 => any::<u64>().prop_map(Operation::Insert),
            5 => (any::<usize>(), any::<u64>()).prop_map(|(which, value)| Operation::Overwrite(which, value)),
            8 => any::<usize>().prop_map(Operation::Remove),
            1 => Just(Operation::Clear),
        ]
    }
}
