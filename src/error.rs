//! Error types.
//!
//! Looking up, reducing or navigating from an absent id is not an error: those
//! operations return sentinel values (`0`, `None`) instead. The types here cover
//! malformed external input and structural self-checks.

use alloc::string::String;
use core::num::ParseIntError;

use thiserror::Error;

use crate::Id;

/// A broken red-black or augmentation invariant, as reported by
/// [`OrderedCountIndex::check_invariants`](crate::OrderedCountIndex::check_invariants).
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum InvariantViolation {
    #[error("root {id} is red")]
    RedRoot { id: Id },
    #[error("red node {id} has a red parent")]
    RedChildOfRed { id: Id },
    #[error("node {id} has black-height {left} on the left but {right} on the right")]
    BlackHeightMismatch { id: Id, left: usize, right: usize },
    #[error("node {id} records subtree size {stored}, expected {expected}")]
    SizeMismatch { id: Id, stored: usize, expected: usize },
    #[error("node {id} records subtree sum {stored}, expected {expected}")]
    SumMismatch { id: Id, stored: u128, expected: u128 },
    #[error("node {id} is out of ascending order")]
    OutOfOrder { id: Id },
    #[error("node {id} does not point back at its parent")]
    BrokenParentLink { id: Id },
}

/// A malformed bulk-load file.
///
/// Line numbers are 1-based.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum LoadError {
    #[error("input is empty, expected an entry count")]
    MissingHeader,
    #[error("line {line}: invalid entry count")]
    InvalidHeader {
        line: usize,
        #[source]
        source: ParseIntError,
    },
    #[error("line {line}: {reason}")]
    InvalidEntry { line: usize, reason: String },
    #[error("line {line}: id {id} does not follow {previous}")]
    NotAscending { line: usize, previous: Id, id: Id },
    #[error("header announces {expected} entries but {found} were given")]
    CountMismatch { expected: usize, found: usize },
}

/// A command line that could not be parsed.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error("`{command}` is missing its <{argument}> argument")]
    MissingArgument { command: &'static str, argument: &'static str },
    #[error("`{command}`: <{argument}> must be an integer, got `{value}`")]
    InvalidArgument {
        command: &'static str,
        argument: &'static str,
        value: String,
    },
    #[error("`{command}` takes no further arguments")]
    TrailingInput { command: &'static str },
}
