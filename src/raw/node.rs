use super::link::Link;
use crate::{Count, Id};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Which child slot of a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// One entry of the tree.
///
/// `size` and `sum` are aggregates over the subtree rooted here (this node
/// included): the number of nodes and the total of their counts. They must be
/// refreshed bottom-up whenever the subtree's membership or any count in it
/// changes.
#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) id: Id,
    pub(crate) count: Count,
    pub(crate) size: usize,
    pub(crate) sum: u128,
    pub(crate) color: Color,
    pub(crate) parent: Option<Link>,
    pub(crate) left: Option<Link>,
    pub(crate) right: Option<Link>,
}

impl Node {
    /// A detached single-node subtree.
    pub(crate) const fn new(id: Id, count: Count, color: Color) -> Self {
        Self {
            id,
            count,
            size: 1,
            sum: count as u128,
            color,
            parent: None,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Option<Link> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Option<Link>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    #[inline]
    pub(crate) const fn is_red(&self) -> bool {
        matches!(self.color, Color::Red)
    }

    /// The side of this node that `child` hangs from, if it is a child at all.
    #[inline]
    pub(crate) fn side_of(&self, child: Link) -> Option<Side> {
        if self.left == Some(child) {
            Some(Side::Left)
        } else if self.right == Some(child) {
            Some(Side::Right)
        } else {
            None
        }
    }
}
