//! CSV road-network loader.
//!
//! # CSV format
//!
//! Nodes, one row per node, positions in tile units:
//!
//! ```csv
//! node,x,y
//! n0,0.5,0.5
//! n1,1.5,0.5
//! ```
//!
//! Edges, one row per **directed** lane:
//!
//! ```csv
//! from,to,lane,weight
//! n0,n1,l001,1.0
//! n1,n0,l002,1.0
//! ```
//!
//! [`load_edges_reader`] accepts an edges file on its own and creates every
//! node it mentions at the map origin, in first-seen order.  Use it when node
//! positions do not matter (no spatial snapping).

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use fl_core::{MapPoint, NodeId};

use crate::network::{RoadNetwork, RoadNetworkBuilder};
use crate::{GraphError, GraphResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    node: String,
    x:    f32,
    y:    f32,
}

#[derive(Deserialize)]
struct EdgeRecord {
    from:   String,
    to:     String,
    lane:   String,
    weight: f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a network from a nodes CSV and an edges CSV.
pub fn load_network_csv(nodes: &Path, edges: &Path) -> GraphResult<RoadNetwork> {
    let nodes = std::fs::File::open(nodes)?;
    let edges = std::fs::File::open(edges)?;
    load_network_reader(nodes, edges)
}

/// Like [`load_network_csv`] but accepts any `Read` sources.
///
/// Edges naming a node absent from the nodes file fail with `UnknownNode`.
pub fn load_network_reader<N: Read, E: Read>(nodes: N, edges: E) -> GraphResult<RoadNetwork> {
    let mut builder = RoadNetworkBuilder::new();
    let mut ids: HashMap<String, NodeId> = HashMap::new();

    for result in csv::Reader::from_reader(nodes).deserialize::<NodeRecord>() {
        let row = result.map_err(|e| GraphError::Parse(e.to_string()))?;
        let id = builder.add_node(row.node.clone(), MapPoint::new(row.x, row.y));
        if ids.insert(row.node.clone(), id).is_some() {
            return Err(GraphError::DuplicateNode(row.node));
        }
    }

    add_edges(&mut builder, edges, |_, name| {
        ids.get(name)
            .copied()
            .ok_or_else(|| GraphError::UnknownNode(name.to_owned()))
    })?;

    finish(builder)
}

/// Load a network from an edges CSV alone.
pub fn load_edges_csv(edges: &Path) -> GraphResult<RoadNetwork> {
    load_edges_reader(std::fs::File::open(edges)?)
}

/// Like [`load_edges_csv`] but accepts any `Read` source.
pub fn load_edges_reader<E: Read>(edges: E) -> GraphResult<RoadNetwork> {
    let mut builder = RoadNetworkBuilder::new();
    let mut ids: HashMap<String, NodeId> = HashMap::new();

    add_edges(&mut builder, edges, |builder, name| {
        Ok(*ids
            .entry(name.to_owned())
            .or_insert_with(|| builder.add_node(name, MapPoint::ORIGIN)))
    })?;

    finish(builder)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn add_edges<E, F>(builder: &mut RoadNetworkBuilder, edges: E, mut resolve: F) -> GraphResult<()>
where
    E: Read,
    F: FnMut(&mut RoadNetworkBuilder, &str) -> GraphResult<NodeId>,
{
    for result in csv::Reader::from_reader(edges).deserialize::<EdgeRecord>() {
        let row  = result.map_err(|e| GraphError::Parse(e.to_string()))?;
        let from = resolve(builder, row.from.trim())?;
        let to   = resolve(builder, row.to.trim())?;
        builder.add_lane(from, to, row.lane.trim(), row.weight);
    }
    Ok(())
}

fn finish(builder: RoadNetworkBuilder) -> GraphResult<RoadNetwork> {
    let network = builder.build()?;
    info!(nodes = network.node_count(), lanes = network.edge_count(), "loaded road network");
    Ok(network)
}
