//! Built-in town map and network selection.

use std::path::Path;

use anyhow::{Result, bail};
use tracing::info;

use fl_core::MapPoint;
use fl_graph::{RoadNetwork, RoadNetworkBuilder, load_edges_csv, load_network_csv};

/// Columns × rows of the built-in grid town.
pub const TOWN_COLS: usize = 4;
pub const TOWN_ROWS: usize = 3;

/// Build a grid town of `cols × rows` intersections, one tile apart.
///
/// Nodes are named `n{row}{col}`; every pair of neighbouring intersections is
/// joined by a two-lane road whose lanes are named `l-{from}-{to}`.
pub fn build_town(cols: usize, rows: usize) -> Result<RoadNetwork> {
    let mut b = RoadNetworkBuilder::with_capacity(cols * rows, 4 * cols * rows);

    let mut grid = Vec::with_capacity(rows);
    for r in 0..rows {
        let row: Vec<_> = (0..cols)
            .map(|c| b.add_node(format!("n{r}{c}"), MapPoint::new(c as f32, r as f32)))
            .collect();
        grid.push(row);
    }

    for r in 0..rows {
        for c in 0..cols {
            let here = grid[r][c];
            let name = format!("n{r}{c}");
            if c + 1 < cols {
                let east = format!("n{r}{}", c + 1);
                b.add_road(here, grid[r][c + 1], format!("l-{name}-{east}"), format!("l-{east}-{name}"), 1.0);
            }
            if r + 1 < rows {
                let north = format!("n{}{c}", r + 1);
                b.add_road(here, grid[r + 1][c], format!("l-{name}-{north}"), format!("l-{north}-{name}"), 1.0);
            }
        }
    }

    Ok(b.build()?)
}

/// Load the road network from CSV files, or fall back to the built-in town.
///
/// `edges` alone loads an edge list and places every node at the origin.
pub fn select_network(nodes: Option<&Path>, edges: Option<&Path>) -> Result<RoadNetwork> {
    let network = match (nodes, edges) {
        (Some(n), Some(e)) => load_network_csv(n, e)?,
        (None, Some(e))    => load_edges_csv(e)?,
        (Some(_), None)    => bail!("a nodes file needs an edges file"),
        (None, None)       => build_town(TOWN_COLS, TOWN_ROWS)?,
    };
    info!(nodes = network.node_count(), lanes = network.edge_count(), "road network ready");
    Ok(network)
}
