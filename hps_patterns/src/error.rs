//! Error types for pattern loading and playback

use crate::sequencer::PlaybackState;
use hps::config::ConfigError;
use hps_regmap::RegError;
use thiserror::Error;

/// Errors that can occur while loading or playing a pattern sequence
#[derive(Error, Debug)]
pub enum PatternError {
    /// No playback steps were ingested
    #[error("No pattern steps to play")]
    EmptySequence,

    /// Operation requested in the wrong playback state
    #[error("Invalid playback state: expected {expected:?}, found {actual:?}")]
    InvalidState {
        /// State the operation requires
        expected: PlaybackState,
        /// State the sequencer was in
        actual: PlaybackState,
    },

    /// Register access failed
    #[error("Register window error: {0}")]
    Window(#[from] RegError),

    /// Pattern file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Both inline steps and a pattern file were given
    #[error("Inline patterns and a pattern file are mutually exclusive")]
    ConflictingSources,
}

/// Result type for pattern operations
pub type PatternResult<T> = Result<T, PatternError>;
