//! The `RoadGraph` accessor trait and the Dijkstra implementation behind it.
//!
//! # Pluggability
//!
//! The dispatcher only ever talks to a [`RoadGraph`], so tests and other
//! hosts can substitute their own graph without touching the matching logic.
//! [`RoadNetwork`] is the production implementation.
//!
//! # Determinism
//!
//! The frontier heap is keyed on `(cost, NodeId)`, and CSR adjacency keeps
//! insertion order, so among several minimum-cost paths the same one is
//! returned on every call against the same network.  A search that stops at
//! its target and a full single-source search settle the target (and all of
//! its predecessors) identically, so [`ShortestPathTree::path`] and
//! [`RoadGraph::shortest_path`] always agree.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use fl_core::{EdgeId, LaneId, NodeId};

use crate::network::RoadNetwork;
use crate::{GraphError, GraphResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// A shortest path: nodes from source to destination, inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Never empty; `nodes[0]` is the source.
    pub nodes: Vec<NodeId>,
    /// Sum of edge weights along `nodes`.
    pub total_weight: f64,
}

impl Route {
    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// The first node strictly ahead of the source, or the source itself for
    /// a trivial route.
    pub fn next_hop(&self) -> NodeId {
        self.nodes.get(1).copied().unwrap_or(self.nodes[0])
    }

    pub fn destination(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }
}

// ── ShortestPathTree ──────────────────────────────────────────────────────────

/// All shortest paths out of one source node.
///
/// Built once per unit and queried for every open request, so a dispatch
/// cycle costs one Dijkstra run per idle unit rather than one per
/// unit–request pair.
#[derive(Debug, Clone)]
pub struct ShortestPathTree {
    source:    NodeId,
    dist:      Vec<f64>,
    prev_node: Vec<NodeId>,
}

impl ShortestPathTree {
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Shortest-path length from the source to `to`.
    pub fn distance(&self, to: NodeId) -> GraphResult<f64> {
        let d = *self.dist.get(to.index()).ok_or(GraphError::NodeNotFound(to))?;
        if d.is_finite() {
            Ok(d)
        } else {
            Err(GraphError::Unreachable { from: self.source, to })
        }
    }

    /// Node sequence of the shortest path from the source to `to`.
    pub fn path(&self, to: NodeId) -> GraphResult<Vec<NodeId>> {
        self.distance(to)?;
        let mut nodes = vec![to];
        let mut cur = to;
        while cur != self.source {
            cur = self.prev_node[cur.index()];
            nodes.push(cur);
        }
        nodes.reverse();
        Ok(nodes)
    }

    pub fn route(&self, to: NodeId) -> GraphResult<Route> {
        Ok(Route { total_weight: self.distance(to)?, nodes: self.path(to)? })
    }
}

// ── RoadGraph trait ───────────────────────────────────────────────────────────

/// The graph operations the dispatcher consumes.
///
/// Implementations must be immutable for the duration of a dispatch cycle and
/// safe to share across threads.
pub trait RoadGraph: Send + Sync {
    /// Sum of edge weights along a minimum-cost path from `from` to `to`.
    fn shortest_path_length(&self, from: NodeId, to: NodeId) -> GraphResult<f64>;

    /// One minimum-cost path from `from` to `to`, both ends included.
    fn shortest_path(&self, from: NodeId, to: NodeId) -> GraphResult<Vec<NodeId>>;

    /// Head node of the unique edge carrying `lane`.
    fn lane_destination_node(&self, lane: &LaneId) -> GraphResult<NodeId>;

    /// All shortest paths out of `from`, if the graph can build them in one
    /// pass.  Callers fall back to per-pair queries on `None`.
    fn shortest_path_tree(&self, _from: NodeId) -> Option<ShortestPathTree> {
        None
    }
}

impl RoadGraph for RoadNetwork {
    fn shortest_path_length(&self, from: NodeId, to: NodeId) -> GraphResult<f64> {
        self.route(from, to).map(|r| r.total_weight)
    }

    fn shortest_path(&self, from: NodeId, to: NodeId) -> GraphResult<Vec<NodeId>> {
        self.route(from, to).map(|r| r.nodes)
    }

    fn lane_destination_node(&self, lane: &LaneId) -> GraphResult<NodeId> {
        self.lane_edge(lane)
            .map(|e| self.edge_to[e.index()])
            .ok_or_else(|| GraphError::UnknownLane(lane.clone()))
    }

    fn shortest_path_tree(&self, from: NodeId) -> Option<ShortestPathTree> {
        self.tree_from(from).ok()
    }
}

impl RoadNetwork {
    /// Shortest route from `from` to `to`.
    ///
    /// `from == to` yields a one-node route of weight zero.
    pub fn route(&self, from: NodeId, to: NodeId) -> GraphResult<Route> {
        for node in [from, to] {
            if !self.contains(node) {
                return Err(GraphError::NodeNotFound(node));
            }
        }
        if from == to {
            return Ok(Route { nodes: vec![from], total_weight: 0.0 });
        }

        let search = dijkstra(self, from, Some(to));
        let total_weight = search.dist[to.index()];
        if !total_weight.is_finite() {
            return Err(GraphError::Unreachable { from, to });
        }
        Ok(Route { nodes: search.trace(self, from, to), total_weight })
    }

    /// Full single-source search from `from`.
    ///
    /// Fails with `NodeNotFound` if `from` is not a node of this network.
    pub fn tree_from(&self, from: NodeId) -> GraphResult<ShortestPathTree> {
        if !self.contains(from) {
            return Err(GraphError::NodeNotFound(from));
        }
        let search = dijkstra(self, from, None);
        let prev_node = search
            .prev_edge
            .iter()
            .map(|&e| if e == EdgeId::INVALID { NodeId::INVALID } else { self.edge_from[e.index()] })
            .collect();
        Ok(ShortestPathTree { source: from, dist: search.dist, prev_node })
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Min-heap entry.  `Ord` is reversed so `BinaryHeap` (a max-heap) pops the
/// cheapest entry first; the secondary `NodeId` key breaks cost ties.
#[derive(Copy, Clone, PartialEq)]
struct Frontier {
    cost: f64,
    node: NodeId,
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct Search {
    /// Best known cost to each node; `INFINITY` if unreached.
    dist: Vec<f64>,
    /// Edge that last improved each node; `EdgeId::INVALID` for unreached nodes.
    prev_edge: Vec<EdgeId>,
}

impl Search {
    fn trace(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> Vec<NodeId> {
        let mut nodes = vec![to];
        let mut cur = to;
        while cur != from {
            let e = self.prev_edge[cur.index()];
            cur = network.edge_from[e.index()];
            nodes.push(cur);
        }
        nodes.reverse();
        nodes
    }
}

/// Dijkstra from `from`, stopping once `target` is settled (if given).
fn dijkstra(network: &RoadNetwork, from: NodeId, target: Option<NodeId>) -> Search {
    let n = network.node_count();
    let mut dist      = vec![f64::INFINITY; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0.0;

    let mut heap = BinaryHeap::new();
    heap.push(Frontier { cost: 0.0, node: from });

    while let Some(Frontier { cost, node }) = heap.pop() {
        if Some(node) == target {
            break;
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in network.out_edges(node) {
            let neighbor = network.edge_to[edge.index()];
            let new_cost = cost + network.edge_weight[edge.index()];

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Frontier { cost: new_cost, node: neighbor });
            }
        }
    }

    Search { dist, prev_edge }
}
