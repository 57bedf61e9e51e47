//! Control-cycle time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter; one tick is one
//! dispatch cycle.  The mapping to wall-clock time is held in `SimClock`:
//!
//!   wall_time = start_unix_secs + tick * tick_duration_secs
//!
//! Request creation, pickup and drop-off times are all recorded as ticks, so
//! waiting-time statistics are exact integer differences.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute control-cycle counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Ticks elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between tick counts and Unix wall-clock seconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Unix timestamp (seconds since epoch) of tick 0.
    pub start_unix_secs: i64,
    /// How many real seconds one cycle represents.
    pub tick_duration_secs: u32,
    /// The current tick, advanced by `SimClock::advance()` each cycle.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(start_unix_secs: i64, tick_duration_secs: u32) -> Self {
        Self {
            start_unix_secs,
            tick_duration_secs,
            current_tick: Tick::ZERO,
        }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Unix timestamp corresponding to `tick`.
    #[inline]
    pub fn unix_secs_at(&self, tick: Tick) -> i64 {
        self.start_unix_secs + tick.0 as i64 * self.tick_duration_secs as i64
    }

    /// Unix timestamp of the current tick.
    #[inline]
    pub fn now_unix_secs(&self) -> i64 {
        self.unix_secs_at(self.current_tick)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level run configuration.
///
/// Loaded from JSON by the application crate and handed to the cycle driver.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Unix timestamp for tick 0.
    pub start_unix_secs: i64,

    /// Seconds per dispatch cycle.
    pub tick_duration_secs: u32,

    /// Total cycles to run.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical runs.
    pub seed: u64,

    /// Generate one new request every N ticks.  0 disables generation.
    pub request_interval_ticks: u64,

    /// Report cycle summaries every N ticks.  1 = every tick.
    pub output_interval_ticks: u64,
}

impl SimConfig {
    /// The tick at which the run ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.start_unix_secs, self.tick_duration_secs)
    }

    /// `true` if a request should be generated at `tick`.
    #[inline]
    pub fn generates_request_at(&self, tick: Tick) -> bool {
        self.request_interval_ticks > 0 && tick.0 % self.request_interval_ticks == 0
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start_unix_secs:        0,
            tick_duration_secs:     1,
            total_ticks:            600,
            seed:                   42,
            request_interval_ticks: 10,
            output_interval_ticks:  1,
        }
    }
}
