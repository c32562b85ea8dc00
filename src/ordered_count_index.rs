use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;

use crate::raw::{Link, RawCountTree};
use crate::{Count, Id, InvariantViolation};

mod capacity;
mod order_statistic;

pub use crate::Rank;

/// An ordered index from integer ids to event counts.
///
/// The index is a red-black tree in which every node also records the number
/// of nodes and the total count of its subtree. Point updates, range sums,
/// neighbor lookups and rank queries all run in O(log n).
///
/// Ids are unique. Counts never go negative: [`reduce`] clamps at zero and
/// drops the id once it gets there.
///
/// Absent ids are a normal outcome rather than an error: [`count`] reports
/// 0, [`reduce`] does nothing, and [`next_id`]/[`previous_id`] return `None`.
///
/// # Examples
///
/// ```
/// use event_counter::OrderedCountIndex;
///
/// let mut index = OrderedCountIndex::new();
///
/// index.increase(10, 5);
/// index.increase(20, 7);
/// index.increase(10, 1);
///
/// assert_eq!(index.count(10), 6);
/// assert_eq!(index.count(15), 0);
/// assert_eq!(index.range_sum(0, 100), 13);
///
/// // Reducing below zero clamps and removes the id.
/// assert_eq!(index.reduce(20, 100), 0);
/// assert!(!index.contains(20));
/// assert_eq!(index.len(), 1);
/// ```
///
/// Mutations take `&mut self` and queries take `&self`, so a host that shares an
/// index between threads wraps it in a `RwLock`: many concurrent readers, one
/// writer at a time.
///
/// [`count`]: OrderedCountIndex::count
/// [`reduce`]: OrderedCountIndex::reduce
/// [`next_id`]: OrderedCountIndex::next_id
/// [`previous_id`]: OrderedCountIndex::previous_id
#[derive(Clone)]
pub struct OrderedCountIndex {
    raw: RawCountTree,
}

/// An iterator over the `(id, count)` entries of an [`OrderedCountIndex`], in
/// ascending id order.
///
/// This `struct` is created by the [`iter`] method on [`OrderedCountIndex`].
///
/// # Examples
///
/// ```
/// use event_counter::OrderedCountIndex;
///
/// let index = OrderedCountIndex::from([(1, 10), (2, 20)]);
/// let mut iter = index.iter();
/// assert_eq!(iter.next(), Some((1, 10)));
/// assert_eq!(iter.next_back(), Some((2, 20)));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: OrderedCountIndex::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
#[derive(Clone)]
pub struct Iter<'a> {
    tree: &'a RawCountTree,
    front: Option<Link>,
    back: Option<Link>,
    remaining: usize,
}

impl OrderedCountIndex {
    /// Makes a new, empty index.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use event_counter::OrderedCountIndex;
    ///
    /// let index = OrderedCountIndex::new();
    /// assert!(index.is_empty());
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        OrderedCountIndex { raw: RawCountTree::new() }
    }

    /// Builds an index from entries already sorted by id.
    ///
    /// The median entry becomes the root and each half is built recursively,
    /// giving a perfectly height-balanced tree without any rebalancing.
    ///
    /// # Panics
    ///
    /// Panics if the ids are not strictly ascending.
    ///
    /// # Complexity
    ///
    /// O(n)
    ///
    /// # Examples
    ///
    /// ```
    /// use event_counter::OrderedCountIndex;
    ///
    /// let index = OrderedCountIndex::from_sorted(&[(10, 1), (20, 1), (30, 1)]);
    /// assert_eq!(index.count(20), 1);
    /// assert_eq!(index.height(), 2);
    /// ```
    #[must_use]
    pub fn from_sorted(entries: &[(Id, Count)]) -> Self {
        OrderedCountIndex {
            raw: RawCountTree::from_sorted(entries),
        }
    }

    /// Returns the number of ids in the index.
    ///
    /// # Examples
    ///
    /// ```
    /// use event_counter::OrderedCountIndex;
    ///
    /// let mut index = OrderedCountIndex::new();
    /// assert_eq!(index.len(), 0);
    /// index.increase(1, 1);
    /// assert_eq!(index.len(), 1);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the index holds no ids.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Removes every id.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the count stored for `id`, or `None` if the id is absent.
    ///
    /// Unlike [`count`](Self::count), this distinguishes an absent id from one
    /// stored with a count of zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use event_counter::OrderedCountIndex;
    ///
    /// let index = OrderedCountIndex::from_sorted(&[(1, 0), (2, 4)]);
    /// assert_eq!(index.get(1), Some(0));
    /// assert_eq!(index.get(2), Some(4));
    /// assert_eq!(index.get(3), None);
    /// ```
    #[must_use]
    pub fn get(&self, id: Id) -> Option<Count> {
        self.raw.get(id)
    }

    /// Returns `true` if `id` is present.
    #[must_use]
    pub fn contains(&self, id: Id) -> bool {
        self.raw.find(id).is_some()
    }

    /// Returns the count of `id`, or 0 if the id is absent.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn count(&self, id: Id) -> Count {
        self.raw.get(id).unwrap_or(0)
    }

    /// Stores `count` for `id`.
    ///
    /// Ids are unique: if `id` is already present its count is replaced and the
    /// previous count returned; otherwise a node is added and `None` returned.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use event_counter::OrderedCountIndex;
    ///
    /// let mut index = OrderedCountIndex::new();
    /// assert_eq!(index.insert(37, 1), None);
    /// assert_eq!(index.insert(37, 5), Some(1));
    /// assert_eq!(index.count(37), 5);
    /// assert_eq!(index.len(), 1);
    /// ```
    pub fn insert(&mut self, id: Id, count: Count) -> Option<Count> {
        self.raw.insert(id, count)
    }

    /// Deletes `id`, returning the count it held. Absent ids are left alone.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use event_counter::OrderedCountIndex;
    ///
    /// let mut index = OrderedCountIndex::from([(1, 10)]);
    /// assert_eq!(index.remove(1), Some(10));
    /// assert_eq!(index.remove(1), None);
    /// ```
    pub fn remove(&mut self, id: Id) -> Option<Count> {
        self.raw.remove(id)
    }

    /// Adds `delta` to the count of `id` and returns the new count.
    ///
    /// An absent id is inserted with `delta` as its count, except that a zero
    /// `delta` never creates an id. The count saturates at [`Count::MAX`].
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use event_counter::OrderedCountIndex;
    ///
    /// let mut index = OrderedCountIndex::new();
    /// assert_eq!(index.increase(350, 100), 100);
    /// assert_eq!(index.increase(350, 5), 105);
    /// assert_eq!(index.increase(7, 0), 0);
    /// assert!(!index.contains(7));
    /// ```
    pub fn increase(&mut self, id: Id, delta: Count) -> Count {
        self.raw.increase(id, delta)
    }

    /// Subtracts `delta` from the count of `id` and returns the new count.
    ///
    /// The count clamps at zero, and an id whose count is brought to zero is
    /// removed. Absent ids are left alone and report 0. A zero `delta` never
    /// changes anything.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use event_counter::OrderedCountIndex;
    ///
    /// let mut index = OrderedCountIndex::from([(350, 100)]);
    /// assert_eq!(index.reduce(350, 50), 50);
    /// assert_eq!(index.reduce(350, 50), 0);
    /// assert!(index.is_empty());
    /// assert_eq!(index.reduce(350, 50), 0);
    /// ```
    pub fn reduce(&mut self, id: Id, delta: Count) -> Count {
        self.raw.reduce(id, delta)
    }

    /// Returns the sum of every count in the index.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn total(&self) -> u128 {
        self.raw.total()
    }

    /// Returns the entry with the smallest id.
    #[must_use]
    pub fn first(&self) -> Option<(Id, Count)> {
        self.raw.first().map(|link| self.entry(link))
    }

    /// Returns the entry with the largest id.
    #[must_use]
    pub fn last(&self) -> Option<(Id, Count)> {
        self.raw.last().map(|link| self.entry(link))
    }

    /// Gets an iterator over the entries of the index, sorted by id.
    ///
    /// # Examples
    ///
    /// ```
    /// use event_counter::OrderedCountIndex;
    ///
    /// let mut index = OrderedCountIndex::new();
    /// index.increase(3, 1);
    /// index.increase(1, 2);
    /// index.increase(2, 3);
    ///
    /// let ids: Vec<_> = index.iter().map(|(id, _)| id).collect();
    /// assert_eq!(ids, [1, 2, 3]);
    /// ```
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            tree: &self.raw,
            front: self.raw.first(),
            back: self.raw.last(),
            remaining: self.raw.len(),
        }
    }

    /// Returns the number of nodes on the longest path from the root to a leaf.
    ///
    /// A red-black tree with `n` ids is never taller than `2 * log2(n + 1)`.
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Verifies the red-black and augmentation invariants.
    ///
    /// On success, returns the number of black nodes on every path from the
    /// root down to an absent child.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    ///
    /// # Examples
    ///
    /// ```
    /// use event_counter::OrderedCountIndex;
    ///
    /// let index: OrderedCountIndex = (0..100).map(|id| (id, 1)).collect();
    /// assert!(index.check_invariants().is_ok());
    /// ```
    pub fn check_invariants(&self) -> Result<usize, InvariantViolation> {
        self.raw.check_invariants()
    }

    fn entry(&self, link: Link) -> (Id, Count) {
        let node = self.raw.node(link);
        (node.id, node.count)
    }
}

impl Default for OrderedCountIndex {
    /// Creates an empty index.
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OrderedCountIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl PartialEq for OrderedCountIndex {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for OrderedCountIndex {}

impl FromIterator<(Id, Count)> for OrderedCountIndex {
    /// Collects entries in any order. When an id repeats, the last count wins.
    fn from_iter<I: IntoIterator<Item = (Id, Count)>>(iter: I) -> Self {
        let mut entries: Vec<(Id, Count)> = iter.into_iter().collect();
        entries.sort_by_key(|&(id, _)| id);

        let mut unique: Vec<(Id, Count)> = Vec::with_capacity(entries.len());
        for (id, count) in entries {
            match unique.last_mut() {
                Some(last) if last.0 == id => last.1 = count,
                _ => unique.push((id, count)),
            }
        }
        Self::from_sorted(&unique)
    }
}

impl Extend<(Id, Count)> for OrderedCountIndex {
    /// Inserts every entry, replacing the counts of ids already present.
    fn extend<I: IntoIterator<Item = (Id, Count)>>(&mut self, iter: I) {
        for (id, count) in iter {
            self.insert(id, count);
        }
    }
}

impl<const N: usize> From<[(Id, Count); N]> for OrderedCountIndex {
    /// Converts an array of entries into an index.
    ///
    /// ```
    /// use event_counter::OrderedCountIndex;
    ///
    /// let index1 = OrderedCountIndex::from([(1, 2), (3, 4)]);
    /// let index2: OrderedCountIndex = [(1, 2), (3, 4)].into();
    /// assert_eq!(index1, index2);
    /// ```
    fn from(entries: [(Id, Count); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a OrderedCountIndex {
    type Item = (Id, Count);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl Iterator for Iter<'_> {
    type Item = (Id, Count);

    fn next(&mut self) -> Option<(Id, Count)> {
        if self.remaining == 0 {
            return None;
        }
        let link = self.front?;
        self.front = self.tree.successor(link);
        self.remaining -= 1;

        let node = self.tree.node(link);
        Some((node.id, node.count))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<(Id, Count)> {
        if self.remaining == 0 {
            return None;
        }
        let link = self.back?;
        self.back = self.tree.predecessor(link);
        self.remaining -= 1;

        let node = self.tree.node(link);
        Some((node.id, node.count))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

impl fmt::Debug for Iter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
