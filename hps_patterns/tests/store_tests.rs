//! Pattern file loading tests

use hps_patterns::{PatternError, PatternStep, PatternStore};
use std::io::{self, BufReader, Cursor, Read, Write};
use tempfile::NamedTempFile;

fn pattern_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_pattern_file() {
    let file = pattern_file(
        "# chaser\n\
         81 250\n\
         0x42 250\n\
         \n\
         24 125 fast\n\
         not a step\n\
         18 125\n",
    );

    let (store, report) = PatternStore::from_file(file.path(), false).unwrap();

    assert_eq!(
        store.steps(),
        &[
            PatternStep::new(0x81, 250),
            PatternStep::new(0x42, 250),
            PatternStep::new(0x24, 125),
            PatternStep::new(0x18, 125),
        ]
    );
    assert_eq!(report.accepted, 4);
    assert_eq!(report.malformed, 1);
    assert!(!store.is_looping());
}

#[test]
fn test_file_stops_at_capacity() {
    let content: String = (0..64).map(|i| format!("{:02X} 10\n", i)).collect();
    let file = pattern_file(&content);

    let (store, report) = PatternStore::from_file(file.path(), true).unwrap();

    assert_eq!(store.len(), 32);
    assert!(report.truncated);
    assert_eq!(store.steps()[0], PatternStep::new(0x00, 10));
    assert_eq!(store.steps()[31], PatternStep::new(0x1F, 10));
}

#[test]
fn test_file_of_garbage_is_empty() {
    let file = pattern_file("hello\nworld\n");

    let (store, report) = PatternStore::from_file(file.path(), false).unwrap();

    assert!(store.is_empty());
    assert_eq!(report.malformed, 2);
    assert!(matches!(
        store.ensure_playable(),
        Err(PatternError::EmptySequence)
    ));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = PatternStore::from_file(&dir.path().join("missing.txt"), false);
    assert!(matches!(result, Err(PatternError::Io(_))));
}

#[test]
fn test_invalid_utf8_line_is_skipped() {
    let input: &[u8] = b"81 250\n\xE9t\xE9 10\n\xE9 10\n42 100\n";

    let (store, report) = PatternStore::from_reader(Cursor::new(input), false).unwrap();

    assert_eq!(
        store.steps(),
        &[PatternStep::new(0x81, 250), PatternStep::new(0x42, 100)]
    );
    assert_eq!(report.accepted, 2);
    assert_eq!(report.malformed, 2);
}

#[test]
fn test_reading_stops_once_full() {
    let mut input: Vec<u8> = (0..32).flat_map(|i| format!("{:X} 5\n", i).into_bytes()).collect();
    input.extend_from_slice(b"\xFF\xFE garbage\n");

    let (store, report) = PatternStore::from_reader(Cursor::new(input), true).unwrap();

    assert_eq!(store.len(), 32);
    assert_eq!(report.malformed, 0);
    assert!(report.truncated);
}

#[test]
fn test_endless_input_after_full_store() {
    let head: Vec<u8> = (0..32).flat_map(|i| format!("{:X} 1\n", i).into_bytes()).collect();
    let endless = BufReader::new(Cursor::new(head).chain(io::repeat(b'7')));

    let (store, report) = PatternStore::from_reader(endless, false).unwrap();

    assert_eq!(store.len(), 32);
    assert!(report.truncated);
}

#[test]
fn test_exactly_full_file_is_not_truncated() {
    let input: Vec<u8> = (0..32).flat_map(|i| format!("{:X} 1\n", i).into_bytes()).collect();

    let (store, report) = PatternStore::from_reader(Cursor::new(input), false).unwrap();

    assert_eq!(store.len(), 32);
    assert!(report.is_complete());
}

#[test]
fn test_overlong_line_is_split_and_skipped() {
    let mut input = vec![b'z'; 1000];
    input.extend_from_slice(b"\n0x0F 20\n");

    let (store, report) = PatternStore::from_reader(Cursor::new(input), false).unwrap();

    assert_eq!(store.steps(), &[PatternStep::new(0x0F, 20)]);
    assert!(report.malformed >= 1);
}
