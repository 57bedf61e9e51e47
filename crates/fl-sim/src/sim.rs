//! The `Sim` struct and its dispatch cycle.

use tracing::{debug, info};

use fl_core::{SimClock, SimConfig, Tick};
use fl_dispatch::Dispatcher;
use fl_graph::RoadNetwork;

use crate::fleet::{CommandSink, CycleReport, FleetState};
use crate::generator::RequestGenerator;
use crate::stats::FleetStats;
use crate::{SimObserver, SimResult};

/// The cycle driver.
///
/// Each tick:
///
/// 1. **Generate**: open one random request if `config.request_interval_ticks`
///    divides the tick.
/// 2. **Snapshot**: read units and active requests from the fleet.
/// 3. **Dispatch**: [`Dispatcher::update`] on the snapshot.
/// 4. **Execute**: hand the commands to the fleet, which applies them and
///    moves every busy unit one lane.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    /// Global configuration (total ticks, seed, request interval, …).
    pub config: SimConfig,

    /// Simulation clock; tracks the current tick.
    pub clock: SimClock,

    /// The static road graph.  Never mutated after build.
    pub network: RoadNetwork,

    /// Units, active requests and delivery history.
    pub fleet: FleetState,

    pub(crate) generator: RequestGenerator,
}

impl Sim {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current tick to `config.end_tick()` and return the
    /// final statistics.
    ///
    /// A structural dispatch error (corrupt lane index, unknown node) aborts
    /// the run.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<FleetStats> {
        while self.clock.current_tick < self.config.end_tick() {
            self.step(observer)?;
        }

        let stats = FleetStats::collect(&self.fleet);
        observer.on_sim_end(self.clock.current_tick, &stats);
        info!(
            ticks = self.clock.current_tick.0,
            end_unix_secs = self.clock.now_unix_secs(),
            units = stats.units,
            filled = stats.filled_requests,
            open = stats.open_requests,
            assigned = stats.assigned_requests,
            abandoned = stats.abandoned_requests,
            mean_wait_ticks = stats.mean_wait_ticks.unwrap_or(f64::NAN),
            mean_ride_ticks = stats.mean_ride_ticks.unwrap_or(f64::NAN),
            "run finished"
        );
        Ok(stats)
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Run one dispatch cycle and advance the clock.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<CycleReport> {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);

        if self.config.generates_request_at(now) {
            self.generate(now)?;
        }

        let snapshot = self.fleet.snapshot();
        let commands = Dispatcher::new(&self.network).update(&snapshot)?;
        observer.on_dispatch(now, &snapshot, &commands);

        let report = self.fleet.execute(&self.network, &commands, now)?;
        observer.on_tick_end(now, &report);

        if self.config.output_interval_ticks > 0
            && now.0 % self.config.output_interval_ticks == 0
        {
            observer.on_snapshot(now, &self.fleet);
        }

        debug!(
            %now,
            commands = commands.len(),
            stale = report.stale,
            pickups = report.pickups,
            filled = report.filled.len(),
            "cycle done"
        );

        self.clock.advance();
        Ok(report)
    }

    pub fn stats(&self) -> FleetStats {
        FleetStats::collect(&self.fleet)
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn generate(&mut self, now: Tick) -> SimResult<()> {
        if let Some((start, end)) = self.generator.draw(&self.network)? {
            self.fleet.open_request(start, end, now);
        }
        Ok(())
    }
}
