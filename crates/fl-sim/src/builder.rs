//! Fluent builder for constructing a [`Sim`].

use fl_core::{FlError, LaneId, MapPoint, NodeId, SimConfig, SimRng, Tick, UnitId};
use fl_graph::{RoadGraph, RoadNetwork};

use crate::fleet::FleetState;
use crate::generator::RequestGenerator;
use crate::state::UnitState;
use crate::{Sim, SimResult};

/// RNG stream offset for the request generator.
const REQUEST_STREAM: u64 = 1;

/// Where a unit starts.
#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    /// On a named lane; the unit stands at the lane's head node.
    Lane(LaneId),
    /// Near a map position; snapped to the closest node, then placed on a
    /// lane leading into it.
    Point(MapPoint),
}

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`]: total ticks, seed, request interval, …
/// - [`RoadNetwork`]: the static road graph
///
/// # Optional inputs
///
/// | Method              | Default              |
/// |---------------------|----------------------|
/// | `.unit(id, lane)`   | No units             |
/// | `.unit_at(id, pos)` | No units             |
/// | `.request(s, e)`    | No initial requests  |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, network)
///     .unit("duckie-0", "l-ab")
///     .unit_at("duckie-1", MapPoint::new(3.0, 1.0))
///     .build()?;
/// let stats = sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:   SimConfig,
    network:  RoadNetwork,
    units:    Vec<(UnitId, Placement)>,
    requests: Vec<(NodeId, NodeId)>,
}

impl SimBuilder {
    pub fn new(config: SimConfig, network: RoadNetwork) -> Self {
        Self { config, network, units: Vec::new(), requests: Vec::new() }
    }

    /// Place a unit on `lane`.
    pub fn unit(mut self, id: impl Into<UnitId>, lane: impl Into<LaneId>) -> Self {
        self.units.push((id.into(), Placement::Lane(lane.into())));
        self
    }

    /// Place a unit at the node nearest `pos`.
    pub fn unit_at(mut self, id: impl Into<UnitId>, pos: MapPoint) -> Self {
        self.units.push((id.into(), Placement::Point(pos)));
        self
    }

    pub fn placement(mut self, id: impl Into<UnitId>, placement: Placement) -> Self {
        self.units.push((id.into(), placement));
        self
    }

    /// Open a request at tick 0.
    pub fn request(mut self, start: NodeId, end: NodeId) -> Self {
        self.requests.push((start, end));
        self
    }

    /// Validate inputs, place units and open initial requests.
    pub fn build(self) -> SimResult<Sim> {
        if self.config.tick_duration_secs == 0 {
            return Err(FlError::Config("tick_duration_secs must be positive".into()).into());
        }

        let mut fleet = FleetState::new();
        for (id, placement) in self.units {
            let (lane, node) = resolve(&self.network, &placement)?;
            fleet.add_unit(id, UnitState::idle(lane, node))?;
        }

        for (start, end) in self.requests {
            if !self.network.contains(start) || !self.network.contains(end) {
                return Err(FlError::Config(format!("request {start} → {end} names an unknown node")).into());
            }
            if start == end {
                return Err(FlError::Config(format!("request pickup and drop-off are both {start}")).into());
            }
            fleet.open_request(start, end, Tick::ZERO);
        }

        let mut rng = SimRng::new(self.config.seed);
        let generator = RequestGenerator::new(rng.child(REQUEST_STREAM));

        Ok(Sim {
            clock:   self.config.make_clock(),
            config:  self.config,
            network: self.network,
            fleet,
            generator,
        })
    }
}

fn resolve(network: &RoadNetwork, placement: &Placement) -> SimResult<(LaneId, NodeId)> {
    match placement {
        Placement::Lane(lane) => Ok((lane.clone(), network.lane_destination_node(lane)?)),
        Placement::Point(pos) => {
            let node = network
                .snap_to_node(*pos)
                .ok_or_else(|| FlError::Config(format!("no road node near {pos}")))?;
            let lane = network.lane_into(node).ok_or_else(|| {
                FlError::Config(format!(
                    "node {} has no inbound lane",
                    network.node_name(node).unwrap_or("?")
                ))
            })?;
            Ok((lane.clone(), node))
        }
    }
}
