use core::num::NonZero;

#[cfg(test)]
type RawLink = u16;
#[cfg(not(test))]
type RawLink = u32;

/// A reference to a node slot in the arena.
///
/// Links are stored one-based so that `Option<Link>` (an absent child or
/// parent) costs no more than a bare `Link`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Link(NonZero<RawLink>);

impl Link {
    /// The largest slot index a link can address.
    pub(crate) const MAX: usize = (RawLink::MAX - 1) as usize;

    #[inline]
    pub(crate) const fn from_slot(slot: usize) -> Self {
        assert!(slot <= Self::MAX, "`Link::from_slot()` - `slot` > `Link::MAX`!");
        #[allow(clippy::cast_possible_truncation)]
        match NonZero::new((slot + 1) as RawLink) {
            Some(raw) => Self(raw),
            None => unreachable!(),
        }
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        (self.0.get() - 1) as usize
    }
}
