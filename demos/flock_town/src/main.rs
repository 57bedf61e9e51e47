//! flock_town — command-line demo for the flock fleet dispatcher.
//!
//! `simulate` runs a fleet of units over a road network (a 4 × 3 grid town
//! unless CSV files are given), generating transport requests at a fixed
//! interval and dispatching idle units to them every tick.
//!
//! `dispatch` runs one dispatch cycle on a fleet snapshot read from JSON and
//! prints the resulting commands, so the dispatcher can sit behind any
//! transport that speaks the same schema.

mod config;
mod network;

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

use fl_core::{SimConfig, Tick};
use fl_dispatch::{CommandMsg, Dispatcher, SnapshotMsg};
use fl_graph::RoadNetwork;
use fl_output::{CsvWriter, SimOutputObserver};
use fl_sim::{CycleReport, FleetState, FleetStats, NoopObserver, SimBuilder, SimObserver};

use config::{Cli, Command, DemoConfig, DispatchArgs, SimulateArgs};
use network::select_network;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    match cli.command {
        Command::Simulate(args) => simulate(args),
        Command::Dispatch(args) => dispatch(args),
    }
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

// ── simulate ──────────────────────────────────────────────────────────────────

fn simulate(args: SimulateArgs) -> Result<()> {
    let mut demo = match &args.config {
        Some(path) => DemoConfig::load(path)?,
        None       => DemoConfig::default(),
    };
    if let Some(ticks) = args.ticks {
        demo.sim.total_ticks = ticks;
    }
    if let Some(seed) = args.seed {
        demo.sim.seed = seed;
    }

    let nodes = args.network.nodes.as_deref().or(demo.nodes_csv.as_deref());
    let edges = args.network.edges.as_deref().or(demo.edges_csv.as_deref());
    let network = select_network(nodes, edges)?;
    let sim = build_sim(&demo, network)?;

    info!(
        units = demo.units.len(),
        ticks = demo.sim.total_ticks,
        seed = demo.sim.seed,
        request_interval = demo.sim.request_interval_ticks,
        "simulation starting"
    );

    let t0 = Instant::now();
    let (sim, stats) = match &args.output {
        Some(dir) => run_with_output(sim, &demo.sim, dir)?,
        None => {
            let mut sim = sim;
            let stats = sim.run(&mut Progress::new(NoopObserver))?;
            (sim, stats)
        }
    };
    info!(elapsed_ms = t0.elapsed().as_millis() as u64, "simulation complete");

    for id in sim.fleet.units().keys() {
        let unit = sim.fleet.unit(id)?;
        let pose = sim.fleet.unit_pose(id, &sim.network, 1.0)?;
        info!(
            unit = %id,
            status = %unit.status,
            lane = %unit.lane,
            x = pose.x,
            y = pose.y,
            "final position"
        );
    }

    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn build_sim(demo: &DemoConfig, network: RoadNetwork) -> Result<fl_sim::Sim> {
    let requests = demo
        .requests
        .iter()
        .map(|r| Ok((network.require_node(&r.start)?, network.require_node(&r.end)?)))
        .collect::<Result<Vec<_>>>()?;

    let mut builder = SimBuilder::new(demo.sim.clone(), network);
    for unit in &demo.units {
        builder = builder.placement(unit.id.as_str(), unit.placement()?);
    }
    for (start, end) in requests {
        builder = builder.request(start, end);
    }
    Ok(builder.build()?)
}

fn run_with_output(
    mut sim: fl_sim::Sim,
    config:  &SimConfig,
    dir:     &Path,
) -> Result<(fl_sim::Sim, FleetStats)> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let writer = CsvWriter::new(dir)?;
    let mut obs = Progress::new(SimOutputObserver::new(writer, config));

    let stats = sim.run(&mut obs)?;
    if let Some(e) = obs.inner.take_error() {
        tracing::error!(error = %e, "output error");
    }
    info!(
        dir = %dir.display(),
        commands = obs.commands,
        filled = obs.filled,
        "output written"
    );
    Ok((sim, stats))
}

// ── dispatch ──────────────────────────────────────────────────────────────────

fn dispatch(args: DispatchArgs) -> Result<()> {
    let network = select_network(args.network.nodes.as_deref(), args.network.edges.as_deref())?;

    let text = std::fs::read_to_string(&args.snapshot)
        .with_context(|| format!("reading {}", args.snapshot.display()))?;
    let msg: SnapshotMsg = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", args.snapshot.display()))?;
    let snapshot = msg.into_snapshot(&network)?;

    let commands = Dispatcher::new(&network).update(&snapshot)?;
    let out = commands
        .iter()
        .map(|c| CommandMsg::from_command(c, &network))
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        units = snapshot.units.len(),
        idle = snapshot.idle_unit_count(),
        requests = snapshot.requests.len(),
        commands = out.len(),
        "dispatched"
    );
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

// ── Progress observer ─────────────────────────────────────────────────────────

/// Logs a progress line (at `debug`) every output interval and forwards all
/// hooks to `inner`.
struct Progress<O: SimObserver> {
    inner:    O,
    commands: usize,
    filled:   usize,
}

impl<O: SimObserver> Progress<O> {
    fn new(inner: O) -> Self {
        Self { inner, commands: 0, filled: 0 }
    }
}

impl<O: SimObserver> SimObserver for Progress<O> {
    fn on_tick_start(&mut self, tick: Tick) {
        self.inner.on_tick_start(tick);
    }

    fn on_dispatch(&mut self, tick: Tick, snapshot: &fl_dispatch::FleetSnapshot, commands: &[fl_dispatch::Command]) {
        self.commands += commands.len();
        self.inner.on_dispatch(tick, snapshot, commands);
    }

    fn on_tick_end(&mut self, tick: Tick, report: &CycleReport) {
        self.filled += report.filled.len();
        self.inner.on_tick_end(tick, report);
    }

    fn on_snapshot(&mut self, tick: Tick, fleet: &FleetState) {
        let stats = FleetStats::collect(fleet);
        debug!(
            %tick,
            idle = stats.idle_units,
            open = stats.open_requests,
            assigned = stats.assigned_requests,
            filled = stats.filled_requests,
            "progress"
        );
        self.inner.on_snapshot(tick, fleet);
    }

    fn on_sim_end(&mut self, final_tick: Tick, stats: &FleetStats) {
        self.inner.on_sim_end(final_tick, stats);
    }
}
