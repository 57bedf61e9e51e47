//! Command-line flags and the JSON run configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Deserialize;

use fl_core::{MapPoint, SimConfig};
use fl_sim::Placement;

/// `flock_town` — run the flock fleet dispatcher against a small town.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Emit logs as JSON lines instead of plain text.  Filter with `RUST_LOG`.
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Simulate units serving randomly generated requests.
    Simulate(SimulateArgs),
    /// Dispatch one JSON fleet snapshot and print the commands as JSON.
    Dispatch(DispatchArgs),
}

#[derive(clap::Args, Debug)]
pub struct NetworkArgs {
    /// Nodes CSV (`node,x,y`).  Requires `--edges`.
    #[arg(long)]
    pub nodes: Option<PathBuf>,

    /// Edges CSV (`from,to,lane,weight`).  Without `--nodes`, every node is
    /// placed at the origin.
    #[arg(long)]
    pub edges: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct SimulateArgs {
    /// JSON run configuration.  Defaults apply to every missing field.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub network: NetworkArgs,

    /// Directory for `commands.csv`, `cycle_summaries.csv` and
    /// `filled_requests.csv`.  Created if missing.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Override `sim.total_ticks`.
    #[arg(long)]
    pub ticks: Option<u64>,

    /// Override `sim.seed`.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(clap::Args, Debug)]
pub struct DispatchArgs {
    /// Fleet snapshot JSON (`{"units": {...}, "requests": [...]}`).
    #[arg(long)]
    pub snapshot: PathBuf,

    #[command(flatten)]
    pub network: NetworkArgs,
}

// ── JSON run configuration ────────────────────────────────────────────────────

/// Contents of the `--config` file.
///
/// ```json
/// {
///   "sim": { "total_ticks": 300, "seed": 7, "request_interval_ticks": 5 },
///   "units": [
///     { "id": "duckie-0", "lane": "l-n00-n01" },
///     { "id": "duckie-1", "position": { "x": 2.4, "y": 1.1 } }
///   ],
///   "requests": [ { "start": "n00", "end": "n23" } ]
/// }
/// ```
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct DemoConfig {
    pub sim:       SimConfig,
    pub units:     Vec<UnitSpec>,
    pub requests:  Vec<RequestSpec>,
    /// Network files; `--nodes`/`--edges` take precedence.
    pub nodes_csv: Option<PathBuf>,
    pub edges_csv: Option<PathBuf>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            sim:       SimConfig::default(),
            units:     default_units(),
            requests:  Vec::new(),
            nodes_csv: None,
            edges_csv: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct UnitSpec {
    pub id: String,
    #[serde(default)]
    pub lane: Option<String>,
    #[serde(default)]
    pub position: Option<MapPoint>,
}

impl UnitSpec {
    pub fn placement(&self) -> Result<Placement> {
        match (&self.lane, self.position) {
            (Some(lane), None) => Ok(Placement::Lane(lane.as_str().into())),
            (None, Some(pos))  => Ok(Placement::Point(pos)),
            _ => bail!("unit {:?} needs exactly one of `lane` or `position`", self.id),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub start: String,
    pub end:   String,
}

/// Four units at the corners of the built-in town.
fn default_units() -> Vec<UnitSpec> {
    [(0.0, 0.0), (3.0, 0.0), (0.0, 2.0), (3.0, 2.0)]
        .into_iter()
        .enumerate()
        .map(|(i, (x, y))| UnitSpec {
            id:       format!("duckie-{i}"),
            lane:     None,
            position: Some(MapPoint::new(x, y)),
        })
        .collect()
}

impl DemoConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }
}
