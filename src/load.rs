//! Bulk loading of an initial data set.
//!
//! The format is line oriented: the first non-blank line holds the number of
//! entries `n`, followed by exactly `n` lines of `<id> <count>` with ids in
//! strictly ascending order. Blank lines are ignored.
//!
//! ```
//! use event_counter::load;
//!
//! let index = load::load("3\n10 1\n20 1\n30 1\n")?;
//! assert_eq!(index.count(20), 1);
//! assert_eq!(index.next_id(10), Some(20));
//! # Ok::<(), event_counter::LoadError>(())
//! ```

use alloc::format;
use alloc::vec::Vec;

use log::debug;

use crate::{Count, Id, LoadError, OrderedCountIndex};

/// Parses and validates a bulk-load file into sorted entries.
///
/// # Errors
///
/// Returns a [`LoadError`] naming the first offending line if the header is
/// missing or not a number, an entry is malformed, ids are not strictly
/// ascending, or the number of entries differs from the header.
pub fn parse_entries(input: &str) -> Result<Vec<(Id, Count)>, LoadError> {
    let mut lines = input
        .lines()
        .enumerate()
        .map(|(index, text)| (index + 1, text.trim()))
        .filter(|(_, text)| !text.is_empty());

    let (header_line, header) = lines.next().ok_or(LoadError::MissingHeader)?;
    let expected: usize = header.parse().map_err(|source| LoadError::InvalidHeader {
        line: header_line,
        source,
    })?;

    // The header is untrusted; never reserve more than the input could hold.
    let mut entries: Vec<(Id, Count)> = Vec::with_capacity(expected.min(input.len() / 4));
    for (line, text) in lines {
        let (id, count) = parse_entry(line, text)?;
        if let Some(&(previous, _)) = entries.last()
            && previous >= id
        {
            return Err(LoadError::NotAscending { line, previous, id });
        }
        entries.push((id, count));
    }

    if entries.len() != expected {
        return Err(LoadError::CountMismatch {
            expected,
            found: entries.len(),
        });
    }

    debug!("parsed {} entries", entries.len());
    Ok(entries)
}

/// Parses a bulk-load file and builds a balanced index from it.
///
/// # Errors
///
/// See [`parse_entries`].
pub fn load(input: &str) -> Result<OrderedCountIndex, LoadError> {
    let entries = parse_entries(input)?;
    Ok(OrderedCountIndex::from_sorted(&entries))
}

fn parse_entry(line: usize, text: &str) -> Result<(Id, Count), LoadError> {
    let mut fields = text.split_whitespace();
    let (Some(id), Some(count), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(LoadError::InvalidEntry {
            line,
            reason: format!("expected `<id> <count>`, got `{text}`"),
        });
    };

    let id = id.parse::<Id>().map_err(|err| LoadError::InvalidEntry {
        line,
        reason: format!("invalid id `{id}`: {err}"),
    })?;
    let count = count.parse::<Count>().map_err(|err| LoadError::InvalidEntry {
        line,
        reason: format!("invalid count `{count}`: {err}"),
    })?;
    Ok((id, count))
}
