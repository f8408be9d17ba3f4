//! Frame timing.
//!
//! [`FrameClock`] turns the wall-clock time between iterations into a
//! [`StepPlan`]: how many updates to run and with which step. Time itself
//! comes from a [`TimeSource`] so tests can drive the pump deterministically.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Slack that absorbs rounding when durations are built from float seconds.
pub const STEP_TOLERANCE: Duration = Duration::from_micros(1);

/// How update steps are derived from elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMode {
    /// Constant-size updates; as many as fit in the accumulated time.
    Fixed(Duration),
    /// One update per frame with the real elapsed time.
    Variable,
}

/// Updates to run for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepPlan {
    /// Number of updates.
    pub updates: u32,
    /// Time step passed to each update.
    pub step: Duration,
    /// Interpolation factor between the last two updates, in `[0, 1)` for
    /// fixed stepping and `1.0` for variable stepping.
    pub alpha: f32,
}

/// Time bookkeeping owned by the frame pump.
#[derive(Debug, Clone)]
pub struct FrameClock {
    mode: StepMode,
    max_catchup: u32,
    accumulator: Duration,
    total: Duration,
    delta: Duration,
    frame: u64,
    dropped: Duration,
}

impl FrameClock {
    /// Create a clock. `max_catchup` bounds updates per frame in fixed mode.
    pub fn new(mode: StepMode, max_catchup: u32) -> Self {
        let mode = match mode {
            StepMode::Fixed(step) if step.is_zero() => {
                log::warn!("FrameClock: zero fixed step, using variable stepping");
                StepMode::Variable
            }
            mode => mode,
        };
        Self {
            mode,
            max_catchup: max_catchup.max(1),
            accumulator: Duration::ZERO,
            total: Duration::ZERO,
            delta: Duration::ZERO,
            frame: 0,
            dropped: Duration::ZERO,
        }
    }

    /// Account for `elapsed` wall time and plan this frame's updates.
    pub fn advance(&mut self, elapsed: Duration) -> StepPlan {
        self.total += elapsed;
        self.delta = elapsed;
        self.frame += 1;

        let step = match self.mode {
            StepMode::Variable => {
                return StepPlan {
                    updates: 1,
                    step: elapsed,
                    alpha: 1.0,
                };
            }
            StepMode::Fixed(step) => step,
        };

        self.accumulator += elapsed;
        let mut updates = 0;
        while updates < self.max_catchup && self.accumulator + STEP_TOLERANCE >= step {
            self.accumulator = self.accumulator.saturating_sub(step);
            updates += 1;
        }

        if self.accumulator + STEP_TOLERANCE >= step {
            let kept = Duration::from_nanos((self.accumulator.as_nanos() % step.as_nanos()) as u64);
            let dropped = self.accumulator - kept;
            log::debug!(
                "FrameClock: catch-up capped at {} steps, dropping {:?}",
                self.max_catchup,
                dropped
            );
            self.dropped += dropped;
            self.accumulator = kept;
        }

        StepPlan {
            updates,
            step,
            alpha: (self.accumulator.as_secs_f64() / step.as_secs_f64()) as f32,
        }
    }

    /// Stepping mode.
    pub fn mode(&self) -> StepMode {
        self.mode
    }

    /// Total time accounted so far.
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Elapsed time of the latest frame.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Frames advanced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Unconsumed time in the fixed-step accumulator.
    pub fn accumulator(&self) -> Duration {
        self.accumulator
    }

    /// Backlog discarded because of the catch-up cap.
    pub fn dropped(&self) -> Duration {
        self.dropped
    }
}

// ============================================================================
// Time sources
// ============================================================================

/// Where the pump gets elapsed time from.
pub trait TimeSource {
    /// Time since the previous call (or since creation, on the first call).
    fn delta(&mut self) -> Duration;
}

/// Monotonic wall clock.
#[derive(Debug)]
pub struct RealTimeSource {
    last: Instant,
}

impl RealTimeSource {
    /// Start measuring from now.
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }
}

impl Default for RealTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for RealTimeSource {
    fn delta(&mut self) -> Duration {
        let now = Instant::now();
        let delta = now.duration_since(self.last);
        self.last = now;
        delta
    }
}

/// Deterministic time for tests and replays.
///
/// Returns scripted deltas first, then the fallback step forever.
#[derive(Debug, Clone)]
pub struct ManualTimeSource {
    script: VecDeque<Duration>,
    fallback: Duration,
}

impl ManualTimeSource {
    /// Every frame takes `step`.
    pub fn fixed(step: Duration) -> Self {
        Self {
            script: VecDeque::new(),
            fallback: step,
        }
    }

    /// Replay `deltas`, then continue with `fallback`.
    pub fn scripted(deltas: impl IntoIterator<Item = Duration>, fallback: Duration) -> Self {
        Self {
            script: deltas.into_iter().collect(),
            fallback,
        }
    }
}

impl TimeSource for ManualTimeSource {
    fn delta(&mut self) -> Duration {
        self.script.pop_front().unwrap_or(self.fallback)
    }
}
