use core::ops::Index;

use super::OrderedCountIndex;
use crate::{Count, Id, Rank};

impl OrderedCountIndex {
    /// Returns the sum of the counts of every id in `low..=high`.
    ///
    /// An empty range (`low > high`) sums to 0.
    ///
    /// # Complexity
    ///
    /// O(log n), independent of how many ids fall in the range.
    ///
    /// # Examples
    ///
    /// ```
    /// use event_counter::OrderedCountIndex;
    ///
    /// let index = OrderedCountIndex::from([(10, 1), (20, 2), (30, 3), (40, 4)]);
    /// assert_eq!(index.range_sum(15, 35), 5);
    /// assert_eq!(index.range_sum(20, 20), 2);
    /// assert_eq!(index.range_sum(35, 15), 0);
    /// ```
    #[must_use]
    pub fn range_sum(&self, low: Id, high: Id) -> u128 {
        self.raw.range_sum(low, high)
    }

    /// Returns how many ids fall in `low..=high`.
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
    /// let index = OrderedCountIndex::from([(10, 1), (20, 2), (30, 3), (40, 4)]);
    /// assert_eq!(index.range_len(15, 35), 2);
    /// assert_eq!(index.range_len(i64::MIN, i64::MAX), 4);
    /// ```
    #[must_use]
    pub fn range_len(&self, low: Id, high: Id) -> usize {
        self.raw.range_len(low, high)
    }

    /// Returns the smallest id strictly greater than `id`, present or not.
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
    /// let index = OrderedCountIndex::from([(10, 1), (20, 1), (30, 1)]);
    /// assert_eq!(index.next_id(10), Some(20));
    /// assert_eq!(index.next_id(11), Some(20));
    /// assert_eq!(index.next_id(30), None);
    /// ```
    #[must_use]
    pub fn next_id(&self, id: Id) -> Option<Id> {
        self.raw.next_id(id)
    }

    /// Returns the largest id strictly less than `id`, present or not.
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
    /// let index = OrderedCountIndex::from([(10, 1), (20, 1), (30, 1)]);
    /// assert_eq!(index.previous_id(30), Some(20));
    /// assert_eq!(index.previous_id(1000), Some(30));
    /// assert_eq!(index.previous_id(10), None);
    /// ```
    #[must_use]
    pub fn previous_id(&self, id: Id) -> Option<Id> {
        self.raw.previous_id(id)
    }

    /// Returns the zero-based position of `id` in ascending order, or `None`
    /// if the id is absent.
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
    /// let index = OrderedCountIndex::from([(10, 1), (20, 1)]);
    /// assert_eq!(index.rank_of(10), Some(0));
    /// assert_eq!(index.rank_of(20), Some(1));
    /// assert_eq!(index.rank_of(15), None);
    /// ```
    #[must_use]
    pub fn rank_of(&self, id: Id) -> Option<usize> {
        self.raw.rank_of(id)
    }

    /// Returns the entry at zero-based position `rank` in ascending order.
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
    /// let index = OrderedCountIndex::from([(30, 3), (10, 1), (20, 2)]);
    /// assert_eq!(index.get_by_rank(1), Some((20, 2)));
    /// assert_eq!(index.get_by_rank(3), None);
    /// ```
    #[must_use]
    pub fn get_by_rank(&self, rank: usize) -> Option<(Id, Count)> {
        self.raw.link_by_rank(rank).map(|link| self.entry(link))
    }
}

/// Indexes into the index by rank, yielding the count.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
impl Index<Rank> for OrderedCountIndex {
    type Output = Count;

    fn index(&self, rank: Rank) -> &Count {
        let link = self.raw.link_by_rank(rank.0).expect("rank out of bounds");
        &self.raw.node(link).count
    }
}
