//! Timed playback of a pattern store.
//!
//! The [`Sequencer`] walks its [`PatternStore`] one step at a time, writing
//! each pattern to the pattern register and holding it for the step's delay.
//!
//! # State Machine
//!
//! ```text
//! Idle ──start──► Armed ──first write──► Playing ──┐ next step / wrap
//!                   │                       │  ◄───┘
//!                   │ cancelled             │ cancelled | last step (one-shot)
//!                   └──────────► Draining ◄─┘
//!                                   │ override cleared
//!                                   ▼
//!                                Stopped (terminal)
//! ```
//!
//! Cancellation is cooperative: the [`CancelToken`] is checked once at the top
//! of every step, never in the middle of a step's delay.
//!
//! While playback runs the override bit is held by an [`OverrideGuard`]. The
//! guard clears the bit exactly once on every way out of `Armed`/`Playing`,
//! including errors and unwinding.

use crate::error::{PatternError, PatternResult};
use crate::store::PatternStore;
use hps::register::{ControlFlags, Register};
use hps_regmap::{AccessGuard, RegResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use tracing::{debug, error, info};

/// Playback lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Constructed, nothing written yet.
    Idle,
    /// Override asserted, no pattern written yet.
    Armed,
    /// Displaying steps.
    Playing,
    /// Leaving playback, override about to be cleared.
    Draining,
    /// Terminal.
    Stopped,
}

/// Shared stop request, set asynchronously and observed at step boundaries.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create an unset token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop. Safe to call from a signal handler thread.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Has a stop been requested?
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Holds the override bit for as long as it lives.
///
/// [`engage`](Self::engage) sets Control to enabled. Either
/// [`release`](Self::release) or drop clears it again, whichever comes first.
/// A failure on the drop path is logged, not raised.
#[derive(Debug)]
pub struct OverrideGuard {
    guard: Arc<AccessGuard>,
    engaged: bool,
}

impl OverrideGuard {
    /// Assert the override bit.
    ///
    /// # Errors
    /// Returns the register error if the control write fails; nothing is
    /// held in that case.
    pub fn engage(guard: Arc<AccessGuard>) -> RegResult<Self> {
        guard.write_register(Register::Control, ControlFlags::OVERRIDE.bits())?;
        debug!("Pattern override enabled");
        Ok(Self {
            guard,
            engaged: true,
        })
    }

    /// Is the override still held?
    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Clear the override bit now and report the outcome.
    pub fn release(mut self) -> RegResult<()> {
        self.clear()
    }

    fn clear(&mut self) -> RegResult<()> {
        if !self.engaged {
            return Ok(());
        }
        self.engaged = false;
        self.guard
            .write_register(Register::Control, ControlFlags::empty().bits())?;
        debug!("Pattern override cleared");
        Ok(())
    }
}

impl Drop for OverrideGuard {
    fn drop(&mut self) {
        if let Err(e) = self.clear() {
            error!("Failed to clear pattern override: {}", e);
        }
    }
}

/// What a finished playback run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackSummary {
    /// Pattern register writes performed.
    pub steps_played: u64,
    /// Passes that reached the last step.
    pub cycles_completed: u64,
    /// Playback ended on a stop request.
    pub cancelled: bool,
    /// State after the run.
    pub final_state: PlaybackState,
}

/// Single-use playback state machine over a pattern store.
#[derive(Debug)]
pub struct Sequencer {
    guard: Arc<AccessGuard>,
    store: PatternStore,
    cancel: CancelToken,
    state: PlaybackState,
    index: usize,
}

impl Sequencer {
    /// Create an idle sequencer. The store is owned, and so frozen, from here on.
    pub fn new(guard: Arc<AccessGuard>, store: PatternStore, cancel: CancelToken) -> Self {
        Self {
            guard,
            store,
            cancel,
            state: PlaybackState::Idle,
            index: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Index of the step currently displayed (or next to display).
    pub fn current_index(&self) -> usize {
        self.index
    }

    /// The steps being played.
    pub fn store(&self) -> &PatternStore {
        &self.store
    }

    /// Handle for requesting a stop from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Play the store until it runs out (one-shot) or a stop is requested.
    ///
    /// Blocks the calling thread. The override bit is cleared before this
    /// returns, whatever the outcome.
    ///
    /// # Errors
    /// - `InvalidState` if the sequencer has already run
    /// - `EmptySequence` if the store has no steps; no register is touched
    /// - `Window` if a register write fails
    pub fn run(&mut self) -> PatternResult<PlaybackSummary> {
        if self.state != PlaybackState::Idle {
            return Err(PatternError::InvalidState {
                expected: PlaybackState::Idle,
                actual: self.state,
            });
        }
        self.store.ensure_playable()?;

        info!(
            "Starting playback: {} steps, loop={}",
            self.store.len(),
            self.store.is_looping()
        );

        let scope = match OverrideGuard::engage(Arc::clone(&self.guard)) {
            Ok(scope) => scope,
            Err(e) => {
                self.state = PlaybackState::Stopped;
                return Err(e.into());
            }
        };
        self.state = PlaybackState::Armed;

        let mut summary = PlaybackSummary {
            steps_played: 0,
            cycles_completed: 0,
            cancelled: false,
            final_state: PlaybackState::Armed,
        };
        let played = self.play(&mut summary);

        self.state = PlaybackState::Draining;
        let released = scope.release();
        self.state = PlaybackState::Stopped;
        summary.final_state = PlaybackState::Stopped;

        played?;
        released?;

        info!(
            "Playback stopped after {} steps ({} cycles, cancelled={})",
            summary.steps_played, summary.cycles_completed, summary.cancelled
        );
        Ok(summary)
    }

    /// Step loop. Leaves `state` at `Armed` or `Playing`.
    fn play(&mut self, summary: &mut PlaybackSummary) -> PatternResult<()> {
        let Self {
            guard,
            store,
            cancel,
            state,
            index,
        } = self;
        let steps = store.steps();

        loop {
            if cancel.is_cancelled() {
                info!("Stop requested at step {}", *index);
                summary.cancelled = true;
                return Ok(());
            }

            let step = steps[*index];
            debug!(
                "Displaying pattern step {:#X} for {} ms",
                step.pattern, step.delay_ms
            );
            guard.write_register(Register::Pattern, u32::from(step.pattern))?;
            *state = PlaybackState::Playing;
            summary.steps_played += 1;

            if step.delay_ms > 0 {
                thread::sleep(step.delay());
            }

            if *index + 1 < steps.len() {
                *index += 1;
                continue;
            }
            summary.cycles_completed += 1;
            if !store.is_looping() {
                return Ok(());
            }
            *index = 0;
        }
    }
}
