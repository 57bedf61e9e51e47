//! The greedy nearest-request dispatcher.

use std::cmp::Ordering;

use fl_core::{NodeId, UnitId};
use fl_graph::{GraphError, GraphResult, RoadGraph, ShortestPathTree};
use tracing::debug;

use crate::model::{Assignment, Command, FleetSnapshot, Request};
use crate::DispatchResult;

/// Matches idle units to open requests, one cycle at a time.
///
/// Holds nothing but a reference to the road graph; every call to
/// [`update`](Self::update) is independent of the previous one.
///
/// # Example
///
/// ```rust,ignore
/// let dispatcher = Dispatcher::new(&network);
/// let commands = dispatcher.update(&snapshot)?;
/// fleet.execute(&network, &commands, now)?;
/// ```
pub struct Dispatcher<'g, G: RoadGraph + ?Sized> {
    graph: &'g G,
}

impl<'g, G: RoadGraph + ?Sized> Dispatcher<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &'g G {
        self.graph
    }

    /// Run one dispatch cycle and return one command per matched unit, in
    /// the order the matches were made.
    ///
    /// # Errors
    ///
    /// Fails when a request names a node the graph does not have, or when an
    /// idle unit's lane cannot be resolved and requests are still open after
    /// every other unit was matched.
    pub fn update(&self, snapshot: &FleetSnapshot) -> DispatchResult<Vec<Command>> {
        Ok(self.assign(snapshot)?.iter().map(Assignment::command).collect())
    }

    /// Like [`update`](Self::update) but returns the full routing path of
    /// every match.
    ///
    /// Matching is greedy over all (idle unit, open request) pairs, cheapest
    /// first.  Equal distances go to the unit with the lower id, then to the
    /// request earlier in the list.  Every matched request is therefore the
    /// nearest request still open for its unit at the moment it is taken,
    /// and assignments are returned in that order.
    ///
    /// A unit whose lane does not resolve takes no part.  Its error is
    /// returned only if some request is left open, i.e. the unit would have
    /// been offered one.
    pub fn assign(&self, snapshot: &FleetSnapshot) -> DispatchResult<Vec<Assignment>> {
        let open: Vec<(usize, &Request)> = snapshot.open_requests().collect();
        if open.is_empty() {
            return Ok(Vec::new());
        }

        let mut lane_error: Option<GraphError> = None;
        let mut origins: Vec<(&UnitId, NodeId)> = Vec::new();
        for (id, unit) in snapshot.units.iter().filter(|(_, unit)| unit.status.is_idle()) {
            match self.graph.lane_destination_node(&unit.lane) {
                Ok(node) => origins.push((id, node)),
                Err(e) => {
                    debug!(unit = %id, lane = %unit.lane, error = %e, "lane unresolved, unit held back");
                    if lane_error.is_none() {
                        lane_error = Some(e);
                    }
                }
            }
        }

        let rows = self.measure(&origins, &open)?;

        let mut candidates: Vec<Candidate> = rows
            .iter()
            .enumerate()
            .flat_map(|(unit, row)| {
                row.distances
                    .iter()
                    .enumerate()
                    .filter_map(move |(slot, d)| d.map(|distance| Candidate { distance, unit, slot }))
            })
            .collect();
        candidates.sort_by(Candidate::cmp_greedy);

        let mut unit_taken    = vec![false; origins.len()];
        let mut request_taken = vec![false; open.len()];
        let limit = origins.len().min(open.len());
        let mut matched: Vec<Candidate> = Vec::with_capacity(limit);

        for c in candidates {
            if matched.len() == limit {
                break;
            }
            if unit_taken[c.unit] || request_taken[c.slot] {
                continue;
            }
            unit_taken[c.unit] = true;
            request_taken[c.slot] = true;
            matched.push(c);
        }

        if matched.len() < open.len() {
            if let Some(e) = lane_error {
                return Err(e.into());
            }
        }

        for (unit, row) in rows.iter().enumerate() {
            if row.distances.iter().all(Option::is_none) {
                debug!(unit = %origins[unit].0, open = open.len(), "no reachable open request, unit skipped");
            }
        }

        let mut assignments = Vec::with_capacity(matched.len());
        for c in matched {
            let unit_id = origins[c.unit].0;
            let (request_index, request) = open[c.slot];
            let path = rows[c.unit].routes.path(request.start_node)?;

            debug!(
                unit = %unit_id,
                request = %request.id,
                request_index,
                distance = c.distance,
                hops = path.len() - 1,
                "assigned"
            );

            assignments.push(Assignment {
                unit_id: unit_id.clone(),
                request_index,
                path,
                distance: c.distance,
            });
        }

        debug!(
            assigned = assignments.len(),
            still_open = open.len() - assignments.len(),
            "dispatch cycle done"
        );
        Ok(assignments)
    }

    /// Measure one idle unit, standing at `from`, against every open request.
    fn measure_unit(&self, from: NodeId, open: &[(usize, &Request)]) -> GraphResult<UnitRow<'g, G>> {
        let routes = match self.graph.shortest_path_tree(from) {
            Some(tree) => Routes::Tree(tree),
            None       => Routes::Pairwise { graph: self.graph, from },
        };

        let distances = open
            .iter()
            .map(|(_, request)| match routes.length(request.start_node) {
                Ok(d) => Ok(Some(d)),
                Err(e) if e.is_unreachable() => Ok(None),
                Err(e) => Err(e),
            })
            .collect::<GraphResult<Vec<_>>>()?;

        Ok(UnitRow { routes, distances })
    }

    #[cfg(not(feature = "parallel"))]
    fn measure(&self, origins: &[(&UnitId, NodeId)], open: &[(usize, &Request)]) -> GraphResult<Vec<UnitRow<'g, G>>> {
        origins.iter().map(|&(_, from)| self.measure_unit(from, open)).collect()
    }

    /// One shortest-path tree per idle unit, built on Rayon's pool.  Matching
    /// itself stays sequential, so results equal the sequential build.
    #[cfg(feature = "parallel")]
    fn measure(&self, origins: &[(&UnitId, NodeId)], open: &[(usize, &Request)]) -> GraphResult<Vec<UnitRow<'g, G>>> {
        use rayon::prelude::*;

        origins.par_iter().map(|&(_, from)| self.measure_unit(from, open)).collect()
    }
}

// ── Matching internals ────────────────────────────────────────────────────────

/// One reachable (idle unit, open request) pair.  `unit` indexes the
/// resolved idle units in ascending id order, `slot` the open requests in
/// list order.
#[derive(Copy, Clone, Debug)]
struct Candidate {
    distance: f64,
    unit:     usize,
    slot:     usize,
}

impl Candidate {
    fn cmp_greedy(a: &Self, b: &Self) -> Ordering {
        a.distance
            .total_cmp(&b.distance)
            .then(a.unit.cmp(&b.unit))
            .then(a.slot.cmp(&b.slot))
    }
}

/// Routing source of one idle unit plus its distance to every open request
/// (`None` = unreachable).
struct UnitRow<'g, G: ?Sized> {
    routes:    Routes<'g, G>,
    distances: Vec<Option<f64>>,
}

/// Distances and paths out of one reference node.
enum Routes<'g, G: ?Sized> {
    /// One single-source search answers every query.
    Tree(ShortestPathTree),
    /// The graph offers no tree; ask it pair by pair.
    Pairwise { graph: &'g G, from: NodeId },
}

impl<G: RoadGraph + ?Sized> Routes<'_, G> {
    fn length(&self, to: NodeId) -> GraphResult<f64> {
        match self {
            Routes::Tree(tree)               => tree.distance(to),
            Routes::Pairwise { graph, from } => graph.shortest_path_length(*from, to),
        }
    }

    fn path(&self, to: NodeId) -> GraphResult<Vec<NodeId>> {
        match self {
            Routes::Tree(tree)               => tree.path(to),
            Routes::Pairwise { graph, from } => graph.shortest_path(*from, to),
        }
    }
}
