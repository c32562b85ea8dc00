//! The line-oriented command language.
//!
//! Each line is one command; every command except `quit` produces one reply.
//!
//! | Command               | Reply                                     |
//! |-----------------------|-------------------------------------------|
//! | `increase <id> <m>`   | the new count                             |
//! | `reduce <id> <m>`     | the new count                             |
//! | `count <id>`          | the count, 0 when absent                  |
//! | `inrange <low> <high>`| the sum of counts with `low <= id <= high`|
//! | `next <id>`           | the next larger id, 0 when none           |
//! | `previous <id>`       | the next smaller id, 0 when none          |
//! | `quit`                | none; ends the session                    |
//!
//! ```
//! use event_counter::OrderedCountIndex;
//! use event_counter::command::Command;
//!
//! let mut index = OrderedCountIndex::new();
//! let command: Command = "increase 350 100".parse()?;
//! let reply = command.apply(&mut index).expect("increase always replies");
//! assert_eq!(reply.to_string(), "100");
//! # Ok::<(), event_counter::CommandError>(())
//! ```

use alloc::string::ToString;
use core::fmt;
use core::str::{FromStr, SplitWhitespace};

use crate::{CommandError, Count, Id, OrderedCountIndex};

/// One parsed command line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    Increase { id: Id, delta: Count },
    Reduce { id: Id, delta: Count },
    Count { id: Id },
    InRange { low: Id, high: Id },
    Next { id: Id },
    Previous { id: Id },
    Quit,
}

/// The single result line a command produces.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Reply {
    /// A count after `increase`, `reduce` or `count`.
    Count(Count),
    /// The total of an `inrange` query.
    Sum(u128),
    /// The neighbor found by `next` or `previous`. Displays as `0` when absent.
    Id(Option<Id>),
}

impl Command {
    /// Runs the command against `index`. Returns `None` for `quit`.
    pub fn apply(self, index: &mut OrderedCountIndex) -> Option<Reply> {
        let reply = match self {
            Command::Increase { id, delta } => Reply::Count(index.increase(id, delta)),
            Command::Reduce { id, delta } => Reply::Count(index.reduce(id, delta)),
            Command::Count { id } => Reply::Count(index.count(id)),
            Command::InRange { low, high } => Reply::Sum(index.range_sum(low, high)),
            Command::Next { id } => Reply::Id(index.next_id(id)),
            Command::Previous { id } => Reply::Id(index.previous_id(id)),
            Command::Quit => return None,
        };
        Some(reply)
    }

    /// The keyword that introduces this command.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.keyword().name()
    }

    const fn keyword(self) -> Keyword {
        match self {
            Command::Increase { .. } => Keyword::Increase,
            Command::Reduce { .. } => Keyword::Reduce,
            Command::Count { .. } => Keyword::Count,
            Command::InRange { .. } => Keyword::InRange,
            Command::Next { .. } => Keyword::Next,
            Command::Previous { .. } => Keyword::Previous,
            Command::Quit => Keyword::Quit,
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let word = words.next().ok_or(CommandError::Empty)?;
        let keyword = Keyword::parse(word).ok_or_else(|| CommandError::Unknown(word.to_string()))?;

        let mut args = Arguments {
            command: keyword.name(),
            words,
        };
        let command = match keyword {
            Keyword::Increase => Command::Increase {
                id: args.take("id")?,
                delta: args.take("m")?,
            },
            Keyword::Reduce => Command::Reduce {
                id: args.take("id")?,
                delta: args.take("m")?,
            },
            Keyword::Count => Command::Count { id: args.take("id")? },
            Keyword::InRange => Command::InRange {
                low: args.take("low")?,
                high: args.take("high")?,
            },
            Keyword::Next => Command::Next { id: args.take("id")? },
            Keyword::Previous => Command::Previous { id: args.take("id")? },
            Keyword::Quit => Command::Quit,
        };
        args.finish()?;
        Ok(command)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name();
        match *self {
            Command::Increase { id, delta } | Command::Reduce { id, delta } => write!(f, "{name} {id} {delta}"),
            Command::Count { id } | Command::Next { id } | Command::Previous { id } => write!(f, "{name} {id}"),
            Command::InRange { low, high } => write!(f, "{name} {low} {high}"),
            Command::Quit => f.write_str(name),
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Reply::Count(count) => write!(f, "{count}"),
            Reply::Sum(sum) => write!(f, "{sum}"),
            Reply::Id(Some(id)) => write!(f, "{id}"),
            Reply::Id(None) => f.write_str("0"),
        }
    }
}

#[derive(Clone, Copy)]
enum Keyword {
    Increase,
    Reduce,
    Count,
    InRange,
    Next,
    Previous,
    Quit,
}

impl Keyword {
    fn parse(word: &str) -> Option<Self> {
        Some(match word {
            "increase" => Keyword::Increase,
            "reduce" => Keyword::Reduce,
            "count" => Keyword::Count,
            "inrange" => Keyword::InRange,
            "next" => Keyword::Next,
            "previous" => Keyword::Previous,
            "quit" => Keyword::Quit,
            _ => return None,
        })
    }

    const fn name(self) -> &'static str {
        match self {
            Keyword::Increase => "increase",
            Keyword::Reduce => "reduce",
            Keyword::Count => "count",
            Keyword::InRange => "inrange",
            Keyword::Next => "next",
            Keyword::Previous => "previous",
            Keyword::Quit => "quit",
        }
    }
}

/// The words after a keyword, consumed left to right.
struct Arguments<'a> {
    command: &'static str,
    words: SplitWhitespace<'a>,
}

impl Arguments<'_> {
    fn take<T: FromStr>(&mut self, argument: &'static str) -> Result<T, CommandError> {
        let command = self.command;
        let word = self
            .words
            .next()
            .ok_or(CommandError::MissingArgument { command, argument })?;
        word.parse().map_err(|_| CommandError::InvalidArgument {
            command,
            argument,
            value: word.to_string(),
        })
    }

    fn finish(mut self) -> Result<(), CommandError> {
        match self.words.next() {
            None => Ok(()),
            Some(_) => Err(CommandError::TrailingInput { command: self.command }),
        }
    }
}
