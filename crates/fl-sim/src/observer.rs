//! Simulation observer trait for progress reporting and data collection.

use fl_core::Tick;
use fl_dispatch::{Command, FleetSnapshot};

use crate::fleet::{CycleReport, FleetState};
use crate::stats::FleetStats;

/// Callbacks invoked by [`Sim`][crate::Sim] at key points of every cycle.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: delivery counter
///
/// ```rust,ignore
/// struct Deliveries(usize);
///
/// impl SimObserver for Deliveries {
///     fn on_tick_end(&mut self, _tick: Tick, report: &CycleReport) {
///         self.0 += report.filled.len();
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before request generation.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after the dispatcher ran, before the commands are applied.
    ///
    /// `snapshot` is exactly what the dispatcher saw; `request_index` in each
    /// command refers to `snapshot.requests`.
    fn on_dispatch(&mut self, _tick: Tick, _snapshot: &FleetSnapshot, _commands: &[Command]) {}

    /// Called at the end of each tick with what the motion layer did.
    fn on_tick_end(&mut self, _tick: Tick, _report: &CycleReport) {}

    /// Called at output intervals (every `config.output_interval_ticks`
    /// ticks), after `on_tick_end`.
    fn on_snapshot(&mut self, _tick: Tick, _fleet: &FleetState) {}

    /// Called once after the final tick of [`Sim::run`][crate::Sim::run].
    fn on_sim_end(&mut self, _final_tick: Tick, _stats: &FleetStats) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
