//! # HPS LED Pattern Player
//!
//! Timed LED pattern playback over the HPS LED register window.
//!
//! # Module Structure
//!
//! - [`store`] - Bounded pattern step storage, inline and file loading
//! - [`sequencer`] - Playback state machine, cancellation, override scope
//! - [`error`] - Error types
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        hps_patterns                              │
//! │  ┌──────────────┐    ┌──────────────┐    ┌────────────────────┐  │
//! │  │ PatternStore │───►│  Sequencer   │◄───│ CancelToken        │  │
//! │  │ (≤ 32 steps) │    │ (step loop)  │    │ (Ctrl-C handler)   │  │
//! │  └──────────────┘    └──────┬───────┘    └────────────────────┘  │
//! │                             │ OverrideGuard                      │
//! │                             ▼                                    │
//! │                   ┌───────────────────┐                          │
//! │                   │ hps_regmap        │                          │
//! │                   │ AccessGuard       │                          │
//! │                   └───────────────────┘                          │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use hps_patterns::{CancelToken, PatternStore, PlaybackState, Sequencer};
//! use hps_regmap::{AccessGuard, RegisterWindow};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), hps_patterns::PatternError> {
//! let (window, sim) = RegisterWindow::simulated();
//! let guard = Arc::new(AccessGuard::new(window));
//!
//! let (store, _report) = PatternStore::from_literal([(0x81, 0), (0x42, 0)], false);
//! let mut sequencer = Sequencer::new(guard, store, CancelToken::new());
//! let summary = sequencer.run()?;
//!
//! assert_eq!(summary.final_state, PlaybackState::Stopped);
//! assert_eq!(sim.writes_to(0x4), vec![0x81, 0x42]);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod error;
pub mod sequencer;
pub mod store;

// Re-export key types for convenience
pub use crate::error::{PatternError, PatternResult};
pub use crate::sequencer::{CancelToken, OverrideGuard, PlaybackState, PlaybackSummary, Sequencer};
pub use crate::store::{LoadReport, ParsedLine, PatternStep, PatternStore, parse_line};
