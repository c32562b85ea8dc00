//! An event counter built on an augmented red-black tree.
//!
//! [`OrderedCountIndex`] maps integer ids to non-negative counts and answers,
//! in O(log n):
//!
//! - point updates: [`increase`](OrderedCountIndex::increase) and
//!   [`reduce`](OrderedCountIndex::reduce) (an id whose count reaches zero is removed)
//! - point and range queries: [`count`](OrderedCountIndex::count) and
//!   [`range_sum`](OrderedCountIndex::range_sum)
//! - navigation: [`next_id`](OrderedCountIndex::next_id) and
//!   [`previous_id`](OrderedCountIndex::previous_id)
//! - rank queries: [`rank_of`](OrderedCountIndex::rank_of),
//!   [`get_by_rank`](OrderedCountIndex::get_by_rank) and indexing by [`Rank`]
//!
//! # Example
//!
//! ```
//! use event_counter::OrderedCountIndex;
//!
//! let mut events = OrderedCountIndex::from_sorted(&[(10, 1), (20, 1), (30, 1)]);
//!
//! assert_eq!(events.increase(350, 100), 100);
//! assert_eq!(events.reduce(350, 50), 50);
//! assert_eq!(events.range_sum(0, 349), 3);
//! assert_eq!(events.next_id(10), Some(20));
//! assert_eq!(events.previous_id(30), Some(20));
//!
//! // Reducing to zero removes the id.
//! assert_eq!(events.reduce(350, 50), 0);
//! assert_eq!(events.next_id(30), None);
//! ```
//!
//! The [`load`] and [`command`] modules implement the text formats used by the
//! `event-counter` binary: a bulk-load file and a line-oriented command language.
//!
//! # Implementation
//!
//! Nodes are stored in an arena and linked by compact indices, so the parent
//! back-references that rebalancing needs do not form ownership cycles. Every
//! node carries the size and count total of its subtree; both are maintained
//! through rotations and splices and drive the rank and range queries.

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod order_statistic;
mod raw;

pub mod command;
pub mod error;
pub mod load;
pub mod ordered_count_index;

pub use error::{CommandError, InvariantViolation, LoadError};
pub use order_statistic::Rank;
pub use ordered_count_index::OrderedCountIndex;

/// Key of an entry. Ids sort in ascending numeric order.
pub type Id = i64;

/// Payload of an entry.
pub type Count = u64;
