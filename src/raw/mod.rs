mod arena;
mod link;
mod node;
mod raw_count_tree;

pub(crate) use link::Link;
pub(crate) use raw_count_tree::RawCountTree;
