//! Animation loop bookkeeping shared by every time-driven screensaver.
//!
//! The host (browser `requestAnimationFrame`, a timer, or a test) owns the
//! actual scheduling. A [`FrameLoop`] hands out a [`LoopToken`] each time it
//! is (re)started; ticks carrying an older token are dropped, so a callback
//! that was already queued when the loop stopped can never touch the widget.
//! Generations are unique process-wide, so a token from one widget never
//! matches another widget's loop either.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// Identifies one run of a [`FrameLoop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoopToken(u64);

impl LoopToken {
    /// Raw generation number, for hosts that need to pass it through JS.
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.0
    }

    /// Rebuild a token from its generation number.
    #[must_use]
    pub const fn from_generation(generation: u64) -> Self {
        Self(generation)
    }
}

/// Start/stop state and elapsed-time tracking for one animation loop.
#[derive(Debug, Default, Clone)]
pub struct FrameLoop {
    generation: u64,
    running: bool,
    last_ms: Option<f64>,
}

impl FrameLoop {
    /// Create a stopped loop.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            generation: 0,
            running: false,
            last_ms: None,
        }
    }

    /// Start (or restart) the loop, invalidating any outstanding token.
    pub fn start(&mut self) -> LoopToken {
        self.generation = next_generation();
        self.running = true;
        self.last_ms = None;
        LoopToken(self.generation)
    }

    /// Stop the loop. Idempotent.
    pub fn stop(&mut self) {
        if self.running {
            self.generation = next_generation();
        }
        self.running = false;
        self.last_ms = None;
    }

    /// Whether the loop is running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Token of the current run, if running.
    #[must_use]
    pub const fn token(&self) -> Option<LoopToken> {
        if self.running {
            Some(LoopToken(self.generation))
        } else {
            None
        }
    }

    /// Record a frame at `now_ms` and return the milliseconds elapsed since
    /// the previous frame.
    ///
    /// The first frame after a start establishes the baseline and reports
    /// zero. Returns `None` for stale tokens or a stopped loop.
    pub fn advance(&mut self, token: LoopToken, now_ms: f64) -> Option<f64> {
        if !self.running || token.0 != self.generation || !now_ms.is_finite() {
            return None;
        }
        let elapsed = self.last_ms.map_or(0.0, |last| (now_ms - last).max(0.0));
        self.last_ms = Some(now_ms);
        Some(elapsed)
    }
}

/// Wrap `value` into `[0, period)`. Non-finite input maps to 0.
#[must_use]
pub fn wrap(value: f64, period: f64) -> f64 {
    if !value.is_finite() || period <= 0.0 {
        return 0.0;
    }
    let wrapped = value.rem_euclid(period);
    // rem_euclid can round up to exactly `period` for tiny negative inputs
    if wrapped >= period {
        0.0
    } else {
        wrapped
    }
}

/// Accumulates elapsed time and fires once per fixed interval.
#[derive(Debug, Clone, Default)]
pub struct StepTimer {
    since_step_ms: f64,
}

impl StepTimer {
    /// Create a timer with nothing accumulated.
    #[must_use]
    pub const fn new() -> Self {
        Self { since_step_ms: 0.0 }
    }

    /// Add `elapsed_ms`; returns true (and resets) once `interval_ms` has
    /// passed since the last step.
    pub fn advance(&mut self, elapsed_ms: f64, interval_ms: f64) -> bool {
        self.since_step_ms += elapsed_ms;
        if self.since_step_ms >= interval_ms {
            self.since_step_ms = 0.0;
            true
        } else {
            false
        }
    }

    /// Forget accumulated time.
    pub fn reset(&mut self) {
        self.since_step_ms = 0.0;
    }
}
