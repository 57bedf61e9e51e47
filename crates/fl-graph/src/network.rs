//! Road network representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_from[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_weight`, `edge_lane`) are
//! sorted by source node and indexed by `EdgeId`.  Within one source node the
//! edges keep their insertion order, so Dijkstra relaxes neighbours in the
//! same order on every build from the same input.
//!
//! # Lanes
//!
//! Every edge carries exactly one lane label and every label names exactly
//! one edge.  [`RoadNetworkBuilder::build`] rejects duplicates, so the lane
//! index never has to choose between candidates at query time.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps map coordinates to the nearest `NodeId`.
//! Used at set-up time to place fleet units given as map positions.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use tracing::debug;

use fl_core::{EdgeId, LaneId, MapPoint, NodeId};

use crate::{GraphError, GraphResult};

#[cfg(feature = "fx-hash")]
type LabelMap<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
type LabelMap<K, V> = std::collections::HashMap<K, V>;

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f32; 2], // [x, y]
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Directed, lane-labelled road graph in CSR format plus a spatial index.
///
/// Immutable once built; share it by reference (it is `Send + Sync`).  Do
/// not construct directly; use [`RoadNetworkBuilder`].
pub struct RoadNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Wire name of each node.  Indexed by `NodeId`.
    pub node_names: Vec<String>,

    /// Map position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<MapPoint>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    pub edge_from: Vec<NodeId>,
    pub edge_to: Vec<NodeId>,

    /// Non-negative traversal cost of each edge.
    pub edge_weight: Vec<f64>,

    /// Lane label carried by each edge.
    pub edge_lane: Vec<LaneId>,

    // ── Lookup tables ─────────────────────────────────────────────────────
    lane_index: LabelMap<LaneId, EdgeId>,
    name_index: LabelMap<String, NodeId>,
    spatial_idx: RTree<NodeEntry>,
}

impl RoadNetwork {
    /// Construct an empty network with no nodes or edges.
    ///
    /// Every routing query against it fails with `NodeNotFound`.
    pub fn empty() -> Self {
        Self {
            node_names:     Vec::new(),
            node_pos:       Vec::new(),
            node_out_start: vec![0],
            edge_from:      Vec::new(),
            edge_to:        Vec::new(),
            edge_weight:    Vec::new(),
            edge_lane:      Vec::new(),
            lane_index:     LabelMap::default(),
            name_index:     LabelMap::default(),
            spatial_idx:    RTree::new(),
        }
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    // ── Names and lanes ───────────────────────────────────────────────────

    /// Look up a node by its wire name.
    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.name_index.get(name).copied()
    }

    /// Look up a node by its wire name, failing with `UnknownNode`.
    pub fn require_node(&self, name: &str) -> GraphResult<NodeId> {
        self.node_by_name(name)
            .ok_or_else(|| GraphError::UnknownNode(name.to_owned()))
    }

    /// Wire name of `node`, or `None` if it is out of range.
    pub fn node_name(&self, node: NodeId) -> Option<&str> {
        self.node_names.get(node.index()).map(String::as_str)
    }

    /// The edge carrying `lane`.
    pub fn lane_edge(&self, lane: &LaneId) -> Option<EdgeId> {
        self.lane_index.get(lane).copied()
    }

    /// Lane of the first edge `from → to` in adjacency order.
    pub fn lane_between(&self, from: NodeId, to: NodeId) -> Option<&LaneId> {
        if !self.contains(from) {
            return None;
        }
        self.out_edges(from)
            .find(|e| self.edge_to[e.index()] == to)
            .map(|e| &self.edge_lane[e.index()])
    }

    /// Lane of the lowest-numbered edge whose head is `node`.
    ///
    /// A unit placed on this lane has `node` as its reference node.
    pub fn lane_into(&self, node: NodeId) -> Option<&LaneId> {
        self.edge_to
            .iter()
            .position(|&to| to == node)
            .map(|i| &self.edge_lane[i])
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the `NodeId` of the nearest node to `pos`.
    ///
    /// Returns `None` only if the network has no nodes.
    pub fn snap_to_node(&self, pos: MapPoint) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.x, pos.y])
            .map(|e| e.id)
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use fl_core::MapPoint;
/// use fl_graph::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// let a = b.add_node("a", MapPoint::new(0.0, 0.0));
/// let c = b.add_node("c", MapPoint::new(1.0, 0.0));
/// b.add_road(a, c, "l-ac", "l-ca", 1.0);
/// let net = b.build().unwrap();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // one lane per direction
/// ```
pub struct RoadNetworkBuilder {
    names:     Vec<String>,
    nodes:     Vec<MapPoint>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:   NodeId,
    to:     NodeId,
    lane:   LaneId,
    weight: f64,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self { names: Vec::new(), nodes: Vec::new(), raw_edges: Vec::new() }
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            names:     Vec::with_capacity(nodes),
            nodes:     Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a named node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, name: impl Into<String>, pos: MapPoint) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.names.push(name.into());
        self.nodes.push(pos);
        id
    }

    /// Add a **directed** edge from `from` to `to` carrying `lane`.
    pub fn add_lane(&mut self, from: NodeId, to: NodeId, lane: impl Into<LaneId>, weight: f64) {
        self.raw_edges.push(RawEdge { from, to, lane: lane.into(), weight });
    }

    /// Convenience: one lane in each direction with the same weight.
    pub fn add_road(
        &mut self,
        a:       NodeId,
        b:       NodeId,
        lane_ab: impl Into<LaneId>,
        lane_ba: impl Into<LaneId>,
        weight:  f64,
    ) {
        self.add_lane(a, b, lane_ab, weight);
        self.add_lane(b, a, lane_ba, weight);
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Validate and consume the builder, producing a [`RoadNetwork`].
    ///
    /// # Errors
    ///
    /// - `DuplicateNode` if two nodes share a name.
    /// - `NodeNotFound` if an edge references a node that was never added.
    /// - `InvalidWeight` for negative or non-finite weights.
    /// - `DuplicateLane` if two edges carry the same label.
    pub fn build(self) -> GraphResult<RoadNetwork> {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        let mut name_index: LabelMap<String, NodeId> = LabelMap::default();
        for (i, name) in self.names.iter().enumerate() {
            if name_index.insert(name.clone(), NodeId(i as u32)).is_some() {
                return Err(GraphError::DuplicateNode(name.clone()));
            }
        }

        for e in &self.raw_edges {
            for node in [e.from, e.to] {
                if node.index() >= node_count {
                    return Err(GraphError::NodeNotFound(node));
                }
            }
            if !e.weight.is_finite() || e.weight < 0.0 {
                return Err(GraphError::InvalidWeight { lane: e.lane.clone(), weight: e.weight });
            }
        }

        // Stable sort keeps per-node insertion order.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let mut lane_index: LabelMap<LaneId, EdgeId> = LabelMap::default();
        for (i, e) in raw.iter().enumerate() {
            if lane_index.insert(e.lane.clone(), EdgeId(i as u32)).is_some() {
                return Err(GraphError::DuplicateLane(e.lane.clone()));
            }
        }

        let edge_from:   Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to:     Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_weight: Vec<f64>    = raw.iter().map(|e| e.weight).collect();
        let edge_lane:   Vec<LaneId> = raw.into_iter().map(|e| e.lane).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for from in &edge_from {
            node_out_start[from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry {
                point: [pos.x, pos.y],
                id: NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        debug!(nodes = node_count, lanes = edge_count, "road network built");

        Ok(RoadNetwork {
            node_names: self.names,
            node_pos: self.nodes,
            node_out_start,
            edge_from,
            edge_to,
            edge_weight,
            edge_lane,
            lane_index,
            name_index,
            spatial_idx,
        })
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
