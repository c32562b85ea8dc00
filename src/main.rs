//! `event-counter`: loads an initial data set, then answers commands read from
//! standard input, one reply line per command on standard output.
//!
//! ```shell
//! event-counter data.txt < commands.txt
//! RUST_LOG=debug event-counter data.txt
//! ```

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{debug, info};

use event_counter::command::Command;
use event_counter::{OrderedCountIndex, load};

#[derive(Debug, Parser)]
#[command(version, about = "Counts events per id and answers range and neighbor queries")]
struct Args {
    /// Bulk-load file: an entry count, then one `<id> <count>` line per entry
    /// with ids ascending. Without it the counter starts empty.
    input: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, env = "EVENT_COUNTER_LOG", default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str()))
        .format_timestamp(None)
        .init();

    let mut index = match &args.input {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
            let index = load::load(&text).with_context(|| format!("failed to load {}", path.display()))?;
            info!("loaded {} ids from {} (height {})", index.len(), path.display(), index.height());
            index
        }
        None => OrderedCountIndex::new(),
    };

    run(&mut index, io::stdin().lock(), &mut io::stdout().lock())
}

/// Answers commands until `quit` or end of input.
fn run(index: &mut OrderedCountIndex, input: impl BufRead, output: &mut impl Write) -> Result<()> {
    for line in input.lines() {
        let line = line.context("failed to read command")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(command) => {
                debug!("{command}");
                let Some(reply) = command.apply(index) else {
                    break;
                };
                writeln!(output, "{reply}")?;
                output.flush()?;
            }
            Err(err) => {
                debug!("rejected `{line}`: {err}");
                eprintln!("invalid command: {err}");
            }
        }
    }
    Ok(())
}
