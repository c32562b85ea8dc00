use event_counter::{LoadError, load};
use pretty_assertions::assert_eq;

#[test]
fn loads_entries_and_skips_blank_lines() {
    let input = "\n3\n\n10 1\n  20 5  \n\n30 1\n\n";
    assert_eq!(load::parse_entries(input), Ok(vec![(10, 1), (20, 5), (30, 1)]));

    let index = load::load(input).expect("input is valid");
    assert_eq!(index.len(), 3);
    assert_eq!(index.total(), 7);
    assert_eq!(index.height(), 2);
    assert!(index.check_invariants().is_ok());
}

#[test]
fn empty_data_set() {
    let index = load::load("0\n").expect("zero entries is valid");
    assert!(index.is_empty());
}

#[test]
fn large_data_set_is_balanced() {
    let mut input = String::from("1000\n");
    for id in 0..1000 {
        input.push_str(&format!("{} {}\n", id * 3, id % 7 + 1));
    }

    let index = load::load(&input).expect("input is valid");
    assert_eq!(index.len(), 1000);
    assert_eq!(index.height(), 10);
    assert!(index.check_invariants().is_ok());
}

#[test]
fn rejects_missing_header() {
    assert_eq!(load::parse_entries(""), Err(LoadError::MissingHeader));
    assert_eq!(load::parse_entries("\n  \n"), Err(LoadError::MissingHeader));
}

#[test]
fn rejects_bad_header() {
    let err = load::parse_entries("\nthree\n1 1\n").expect_err("header is not a number");
    assert!(matches!(err, LoadError::InvalidHeader { line: 2, .. }), "{err:?}");
    assert_eq!(err.to_string(), "line 2: invalid entry count");
}

#[test]
fn rejects_malformed_entries() {
    for (input, line) in [("2\n1 1\n2\n", 3), ("1\n1 1 1\n", 2), ("1\nx 1\n", 2), ("1\n1 -1\n", 2)] {
        let err = load::parse_entries(input).expect_err("entry is malformed");
        assert!(
            matches!(err, LoadError::InvalidEntry { line: found, .. } if found == line),
            "{input:?}: {err:?}"
        );
    }
}

#[test]
fn rejects_unsorted_ids() {
    assert_eq!(
        load::parse_entries("3\n1 1\n5 1\n5 2\n"),
        Err(LoadError::NotAscending { line: 4, previous: 5, id: 5 })
    );
    assert_eq!(
        load::parse_entries("2\n9 1\n3 1\n"),
        Err(LoadError::NotAscending { line: 3, previous: 9, id: 3 })
    );
}

#[test]
fn rejects_wrong_entry_count() {
    assert_eq!(
        load::parse_entries("3\n1 1\n2 1\n"),
        Err(LoadError::CountMismatch { expected: 3, found: 2 })
    );
    assert_eq!(
        load::parse_entries("1\n1 1\n2 1\n"),
        Err(LoadError::CountMismatch { expected: 1, found: 2 })
    );
}
