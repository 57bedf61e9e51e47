//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use fl_core::{SimClock, SimConfig, Tick};
use fl_dispatch::{Command, FleetSnapshot};
use fl_sim::{CycleReport, FleetState, FleetStats, SimObserver};

use crate::row::{CommandRow, CycleSummaryRow, FilledRequestRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that records commands, cycle summaries and delivered
/// requests to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    clock:      SimClock,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// Create an observer backed by `writer`, using `config` for wall-clock
    /// conversion.
    pub fn new(writer: W, config: &SimConfig) -> Self {
        Self {
            writer,
            clock:      config.make_clock(),
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_dispatch(&mut self, tick: Tick, snapshot: &FleetSnapshot, commands: &[Command]) {
        if commands.is_empty() {
            return;
        }
        let unix_time_secs = self.clock.unix_secs_at(tick);
        let rows: Vec<CommandRow> = commands
            .iter()
            .map(|c| CommandRow {
                tick: tick.0,
                unix_time_secs,
                unit_id:       c.unit_id.to_string(),
                request_index: c.request_index as u64,
                request_id:    snapshot.requests.get(c.request_index).map_or(u32::MAX, |r| r.id.0),
                goal_node:     c.goal_node.0,
            })
            .collect();

        let result = self.writer.write_commands(&rows);
        self.store_err(result);
    }

    fn on_tick_end(&mut self, _tick: Tick, report: &CycleReport) {
        if report.filled.is_empty() {
            return;
        }
        let rows: Vec<FilledRequestRow> = report
            .filled
            .iter()
            .map(|f| FilledRequestRow {
                request_id:    f.id.0,
                unit_id:       f.unit_id.to_string(),
                start_node:    f.start_node.0,
                end_node:      f.end_node.0,
                creation_tick: f.creation_time.0,
                pickup_tick:   f.pickup_time.0,
                end_tick:      f.end_time.0,
            })
            .collect();

        let result = self.writer.write_filled(&rows);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, fleet: &FleetState) {
        let stats = FleetStats::collect(fleet);
        let row = CycleSummaryRow {
            tick:               tick.0,
            unix_time_secs:     self.clock.unix_secs_at(tick),
            idle_units:         stats.idle_units as u64,
            en_route_units:     stats.en_route_units as u64,
            delivering_units:   stats.delivering_units as u64,
            open_requests:      stats.open_requests as u64,
            assigned_requests:  stats.assigned_requests as u64,
            filled_requests:    stats.filled_requests as u64,
            abandoned_requests: stats.abandoned_requests as u64,
        };
        let result = self.writer.write_cycle_summary(&row);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_tick: Tick, _stats: &FleetStats) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
