use super::OrderedCountIndex;
use crate::raw::RawCountTree;

impl OrderedCountIndex {
    /// Creates an empty index with room for at least `capacity` ids before
    /// its node storage has to grow.
    ///
    /// # Examples
    ///
    /// ```
    /// use event_counter::OrderedCountIndex;
    ///
    /// let index = OrderedCountIndex::with_capacity(32);
    /// assert!(index.is_empty());
    /// assert!(index.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        OrderedCountIndex {
            raw: RawCountTree::with_capacity(capacity),
        }
    }

    /// Returns how many ids the index can hold before its node storage grows.
    ///
    /// Slots freed by removals are reused, so this never shrinks.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
