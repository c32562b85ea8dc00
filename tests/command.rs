use event_counter::command::{Command, Reply};
use event_counter::{CommandError, OrderedCountIndex, load};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// Runs `script` the way the binary does and collects the reply lines.
fn replies(index: &mut OrderedCountIndex, script: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for line in script.lines().filter(|line| !line.trim().is_empty()) {
        let Ok(command) = line.parse::<Command>() else {
            continue;
        };
        match command.apply(index) {
            Some(reply) => lines.push(reply.to_string()),
            None => break,
        }
    }
    lines
}

#[test]
fn sample_session() {
    let mut index = load::load(
        "10\n\
         5 5\n10 3\n18 10\n20 4\n35 1\n60 8\n75 2\n80 6\n85 7\n100 9\n",
    )
    .expect("sample should load");

    let script = "\
increase 350 100
reduce 350 50
count 350
inrange 20 85
next 35
previous 35
next 100
previous 5
count 42
reduce 18 10
count 18
inrange 0 400
quit
count 5
";
    assert_eq!(
        replies(&mut index, script),
        vec!["100", "50", "50", "28", "60", "20", "350", "0", "0", "0", "0", "95"]
    );
    assert!(!index.contains(18));
    assert!(index.check_invariants().is_ok());
}

#[test]
fn parse_all_commands() {
    let cases = [
        ("increase 7 3", Command::Increase { id: 7, delta: 3 }),
        ("reduce -7 3", Command::Reduce { id: -7, delta: 3 }),
        ("count 7", Command::Count { id: 7 }),
        ("inrange 1 9", Command::InRange { low: 1, high: 9 }),
        ("next 7", Command::Next { id: 7 }),
        ("previous 7", Command::Previous { id: 7 }),
        ("quit", Command::Quit),
        ("  next \t 7  ", Command::Next { id: 7 }),
    ];
    for (line, expected) in cases {
        assert_eq!(line.parse::<Command>(), Ok(expected), "{line:?}");
    }
}

#[test]
fn parse_errors() {
    assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
    assert_eq!("jump 1".parse::<Command>(), Err(CommandError::Unknown("jump".to_owned())));
    assert_eq!(
        "increase 1".parse::<Command>(),
        Err(CommandError::MissingArgument { command: "increase", argument: "m" })
    );
    assert_eq!(
        "reduce 1 -5".parse::<Command>(),
        Err(CommandError::InvalidArgument {
            command: "reduce",
            argument: "m",
            value: "-5".to_owned(),
        })
    );
    assert_eq!(
        "quit now".parse::<Command>(),
        Err(CommandError::TrailingInput { command: "quit" })
    );
    assert_eq!(
        "count 1 2".parse::<Command>().map_err(|err| err.to_string()),
        Err("`count` takes no further arguments".to_owned())
    );
}

#[test]
fn replies_display_zero_for_missing_ids() {
    assert_eq!(Reply::Id(None).to_string(), "0");
    assert_eq!(Reply::Id(Some(-4)).to_string(), "-4");
    assert_eq!(Reply::Sum(u128::from(u64::MAX) * 2).to_string(), "36893488147419103230");
    assert_eq!(Reply::Count(0).to_string(), "0");
}

#[test]
fn quit_has_no_reply() {
    let mut index = OrderedCountIndex::from([(1, 1)]);
    assert_eq!(Command::Quit.apply(&mut index), None);
    assert_eq!(index.len(), 1);
}

fn command_strategy() -> impl Strategy<Value = Command> {
    let id = -1_000i64..1_000;
    let delta = 0u64..1_000;
    prop_oneof![
        (id.clone(), delta.clone()).prop_map(|(id, delta)| Command::Increase { id, delta }),
        (id.clone(), delta).prop_map(|(id, delta)| Command::Reduce { id, delta }),
        id.clone().prop_map(|id| Command::Count { id }),
        (id.clone(), id.clone()).prop_map(|(low, high)| Command::InRange { low, high }),
        id.clone().prop_map(|id| Command::Next { id }),
        id.prop_map(|id| Command::Previous { id }),
        Just(Command::Quit),
    ]
}

proptest! {
    /// Displaying a command yields a line that parses back to it.
    #[test]
    fn display_parses_back(command in command_strategy()) {
        prop_assert_eq!(command.to_string().parse::<Command>(), Ok(command));
    }
}
