/// A zero-based rank into the ascending id order of an [`OrderedCountIndex`].
///
/// # Examples
///
/// ```
/// use event_counter::{OrderedCountIndex, Rank};
///
/// let index = OrderedCountIndex::from([(7, 70), (3, 30)]);
///
/// assert_eq!(index[Rank(0)], 30);
/// assert_eq!(index[Rank(1)], 70);
/// ```
///
/// [`OrderedCountIndex`]: crate::OrderedCountIndex
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);
