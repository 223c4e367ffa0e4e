//! Bounded pattern step storage
//!
//! A [`PatternStore`] holds at most [`MAX_STEPS`] `(pattern, delay)` steps in
//! playback order, plus the loop flag. Stores are built once, from inline
//! pairs or from a pattern file, and handed to the sequencer by value.
//!
//! Ingestion is best-effort on both paths:
//!
//! - inline pairs past the capacity are dropped and reported
//! - file lines that do not parse are skipped and counted
//! - file loading stops at end of input or once the store is full
//!
//! # Pattern file format
//!
//! ```text
//! # pattern  delay_ms
//! 0x81 250
//! 42   250
//! ff   100   trailing tokens are ignored
//! ```
//!
//! Patterns are hexadecimal with an optional `0x` prefix, delays are decimal
//! milliseconds. Blank lines and `#` comments are skipped without counting as
//! malformed.

use crate::error::{PatternError, PatternResult};
use hps::consts::MAX_STEPS;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// One displayed pattern and how long it stays up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternStep {
    /// LED pattern written to the pattern register.
    pub pattern: u8,
    /// Display time in milliseconds.
    pub delay_ms: u32,
}

impl PatternStep {
    /// Create a step.
    pub const fn new(pattern: u8, delay_ms: u32) -> Self {
        Self { pattern, delay_ms }
    }

    /// Display time as a `Duration`.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.delay_ms))
    }
}

impl From<(u8, u32)> for PatternStep {
    fn from((pattern, delay_ms): (u8, u32)) -> Self {
        Self::new(pattern, delay_ms)
    }
}

/// Longest pattern file line read in one piece.
pub const MAX_LINE_LEN: usize = 256;

/// Outcome of loading steps into a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Steps stored.
    pub accepted: usize,
    /// Inline steps dropped past capacity.
    pub discarded: usize,
    /// File lines skipped because they did not parse.
    pub malformed: usize,
    /// Input remained when the store filled up.
    pub truncated: bool,
}

impl LoadReport {
    /// True when every offered step was stored.
    pub fn is_complete(&self) -> bool {
        self.discarded == 0 && self.malformed == 0 && !self.truncated
    }

    fn log_truncation(&self) {
        if self.truncated {
            warn!("Pattern file truncated at {} steps", MAX_STEPS);
        }
    }
}

/// Classification of a single pattern file line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedLine {
    /// A well-formed step.
    Step(PatternStep),
    /// Blank line or comment.
    Skip,
    /// Line that does not parse as a step.
    Malformed,
}

/// Parse one pattern file line.
pub fn parse_line(line: &str) -> ParsedLine {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return ParsedLine::Skip;
    }

    let mut tokens = line.split_whitespace();
    let pattern = tokens.next().and_then(|token| {
        let digits = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);
        u32::from_str_radix(digits, 16)
            .ok()
            .and_then(|value| u8::try_from(value).ok())
    });
    let delay_ms = tokens.next().and_then(|token| token.parse::<u32>().ok());

    match (pattern, delay_ms) {
        (Some(pattern), Some(delay_ms)) => ParsedLine::Step(PatternStep::new(pattern, delay_ms)),
        _ => ParsedLine::Malformed,
    }
}

/// Ordered, bounded sequence of playback steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternStore {
    steps: heapless::Vec<PatternStep, MAX_STEPS>,
    looping: bool,
}

impl PatternStore {
    /// Create an empty store.
    pub fn new(looping: bool) -> Self {
        Self {
            steps: heapless::Vec::new(),
            looping,
        }
    }

    /// Build a store from inline `(pattern, delay_ms)` pairs.
    ///
    /// Pairs beyond [`MAX_STEPS`] are dropped and counted in the report.
    pub fn from_literal<I>(pairs: I, looping: bool) -> (Self, LoadReport)
    where
        I: IntoIterator<Item = (u8, u32)>,
    {
        let mut store = Self::new(looping);
        let mut report = LoadReport::default();

        for step in pairs {
            if store.push(PatternStep::from(step)) {
                report.accepted += 1;
            } else {
                report.discarded += 1;
            }
        }
        if report.discarded > 0 {
            report.truncated = true;
            warn!(
                "Pattern holds at most {} steps; dropped {} extra",
                MAX_STEPS, report.discarded
            );
        }

        (store, report)
    }

    /// Build a store from pattern file lines.
    ///
    /// Malformed lines are skipped. Loading stops at the end of input or as
    /// soon as the store is full.
    pub fn from_lines<I>(lines: I, looping: bool) -> (Self, LoadReport)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut store = Self::new(looping);
        let mut report = LoadReport::default();
        let mut lines = lines.into_iter().enumerate();

        while !store.is_full() {
            let Some((number, line)) = lines.next() else {
                break;
            };
            store.ingest(&mut report, number + 1, line.as_ref());
        }
        if store.is_full() && lines.next().is_some() {
            report.truncated = true;
        }
        report.log_truncation();

        (store, report)
    }

    /// Build a store from a buffered reader of pattern lines.
    ///
    /// Lines are read one at a time and at most [`MAX_LINE_LEN`] bytes at a
    /// time; a longer line is split. Bytes that are not UTF-8 make their line
    /// malformed. Nothing past the last stored step is read.
    ///
    /// # Errors
    /// Returns `Io` if reading fails.
    pub fn from_reader<R: BufRead>(mut reader: R, looping: bool) -> PatternResult<(Self, LoadReport)> {
        let mut store = Self::new(looping);
        let mut report = LoadReport::default();
        let mut buf = Vec::with_capacity(MAX_LINE_LEN);
        let mut number = 0;

        while !store.is_full() {
            buf.clear();
            let read = (&mut reader)
                .take(MAX_LINE_LEN as u64)
                .read_until(b'\n', &mut buf)?;
            if read == 0 {
                break;
            }
            number += 1;
            match std::str::from_utf8(&buf) {
                Ok(line) => store.ingest(&mut report, number, line),
                Err(_) => {
                    report.malformed += 1;
                    warn!("Skipping pattern line {} with invalid UTF-8", number);
                }
            }
        }
        if store.is_full() && !reader.fill_buf()?.is_empty() {
            report.truncated = true;
        }
        report.log_truncation();

        Ok((store, report))
    }

    /// Build a store from a pattern file.
    ///
    /// # Errors
    /// Returns `Io` if the file cannot be opened or read.
    pub fn from_file(path: &Path, looping: bool) -> PatternResult<(Self, LoadReport)> {
        info!("Loading pattern file {:?}", path);
        let file = File::open(path)?;
        let (store, report) = Self::from_reader(BufReader::new(file), looping)?;
        debug!("Pattern file {:?}: {:?}", path, report);
        Ok((store, report))
    }

    /// Append a step. Returns `false` when the store is full.
    pub fn push(&mut self, step: PatternStep) -> bool {
        self.steps.push(step).is_ok()
    }

    /// True when no further step fits.
    pub fn is_full(&self) -> bool {
        self.steps.len() == MAX_STEPS
    }

    /// Parse one file line into the store, updating `report`.
    fn ingest(&mut self, report: &mut LoadReport, number: usize, line: &str) {
        match parse_line(line) {
            ParsedLine::Step(step) => {
                if self.push(step) {
                    report.accepted += 1;
                }
            }
            ParsedLine::Skip => {}
            ParsedLine::Malformed => {
                report.malformed += 1;
                warn!("Skipping malformed pattern line {}: {:?}", number, line.trim());
            }
        }
    }

    /// Steps in playback order.
    pub fn steps(&self) -> &[PatternStep] {
        &self.steps
    }

    /// Number of stored steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True when no steps are stored.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Wrap around after the last step.
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Change the loop flag.
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Total display time of one pass over the steps.
    pub fn cycle_duration(&self) -> Duration {
        self.steps.iter().map(PatternStep::delay).sum()
    }

    /// Check that the store can be played.
    ///
    /// # Errors
    /// Returns `EmptySequence` if no steps are stored.
    pub fn ensure_playable(&self) -> PatternResult<()> {
        if self.steps.is_empty() {
            return Err(PatternError::EmptySequence);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("81 250"), ParsedLine::Step(PatternStep::new(0x81, 250)));
        assert_eq!(parse_line("0xAA 50\n"), ParsedLine::Step(PatternStep::new(0xAA, 50)));
        assert_eq!(parse_line("  ff\t0  "), ParsedLine::Step(PatternStep::new(0xFF, 0)));
        assert_eq!(
            parse_line("3 100 extra words"),
            ParsedLine::Step(PatternStep::new(0x03, 100))
        );
    }

    #[test]
    fn test_parse_line_skips() {
        assert_eq!(parse_line(""), ParsedLine::Skip);
        assert_eq!(parse_line("   \n"), ParsedLine::Skip);
        assert_eq!(parse_line("# header"), ParsedLine::Skip);
    }

    #[test]
    fn test_parse_line_malformed() {
        assert_eq!(parse_line("zz 100"), ParsedLine::Malformed);
        assert_eq!(parse_line("81"), ParsedLine::Malformed);
        assert_eq!(parse_line("81 -5"), ParsedLine::Malformed);
        assert_eq!(parse_line("100 10"), ParsedLine::Malformed);
        assert_eq!(parse_line("0x 10"), ParsedLine::Malformed);
    }

    #[test]
    fn test_literal_keeps_order() {
        let (store, report) = PatternStore::from_literal([(0x01, 100), (0xAA, 50)], false);
        assert_eq!(
            store.steps(),
            &[PatternStep::new(0x01, 100), PatternStep::new(0xAA, 50)]
        );
        assert!(report.is_complete());
        assert!(!store.is_looping());
        assert_eq!(store.cycle_duration(), Duration::from_millis(150));
    }

    #[test]
    fn test_literal_truncates_at_capacity() {
        let pairs = (0..40u32).map(|i| (i as u8, i));
        let (store, report) = PatternStore::from_literal(pairs, true);

        assert_eq!(store.len(), MAX_STEPS);
        assert_eq!(report.accepted, 32);
        assert_eq!(report.discarded, 8);
        assert!(report.truncated);
        assert_eq!(store.steps()[31], PatternStep::new(31, 31));
    }

    #[test]
    fn test_lines_skip_malformed() {
        let lines = ["# demo", "01 10", "garbage", "", "0x02 20", "03"];
        let (store, report) = PatternStore::from_lines(lines, false);

        assert_eq!(store.len(), 2);
        assert_eq!(report.accepted, 2);
        assert_eq!(report.malformed, 2);
        assert!(!report.truncated);
    }

    #[test]
    fn test_lines_stop_when_full() {
        let lines: Vec<String> = (0..50).map(|i| format!("{:x} 1", i)).collect();
        let (store, report) = PatternStore::from_lines(&lines, false);

        assert_eq!(store.len(), MAX_STEPS);
        assert!(report.truncated);
        assert_eq!(store.steps().last(), Some(&PatternStep::new(31, 1)));
    }

    #[test]
    fn test_empty_store_not_playable() {
        let store = PatternStore::new(true);
        assert!(matches!(
            store.ensure_playable(),
            Err(PatternError::EmptySequence)
        ));

        let (store, _) = PatternStore::from_lines(["nothing here"], false);
        assert!(store.is_empty());
        assert!(store.ensure_playable().is_err());
    }
}
