//! Per-unit and per-request motion-layer state.

use std::fmt;

use fl_core::{LaneId, NodeId, RequestId, Tick, UnitId};
use fl_dispatch::{Request, UnitStatus};

/// Motion state of one unit.
///
/// Units move on rails: a unit always stands on the head node of the lane it
/// last travelled and advances by exactly one lane per tick while busy.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UnitState {
    pub status: UnitStatus,

    /// Lane the unit last travelled.
    pub lane: LaneId,

    /// Head node of `lane`; the unit's current position.
    pub node: NodeId,

    /// Request being served.  `None` while idle.
    pub request: Option<RequestId>,

    /// Commanded first waypoint, consumed by the next hop.
    pub waypoint: Option<NodeId>,
}

impl UnitState {
    /// An idle unit standing at `node`, the head of `lane`.
    pub fn idle(lane: impl Into<LaneId>, node: NodeId) -> Self {
        Self {
            status:   UnitStatus::Idle,
            lane:     lane.into(),
            node,
            request:  None,
            waypoint: None,
        }
    }

    /// Drop the current request and return to `Idle` in place.
    pub fn release(&mut self) {
        self.status   = UnitStatus::Idle;
        self.request  = None;
        self.waypoint = None;
    }
}

/// Lifecycle of an active request.  Filled requests leave the active list.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum RequestStatus {
    /// Not yet picked up (assigned or not).
    #[default]
    Waiting,
    /// On board a unit heading for the drop-off node.
    PickedUp,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Waiting  => "WAITING",
            RequestStatus::PickedUp => "PICKEDUP",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request that has not been delivered yet.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ActiveRequest {
    pub request:     Request,
    pub status:      RequestStatus,
    pub pickup_time: Option<Tick>,
}

impl ActiveRequest {
    pub fn waiting(request: Request) -> Self {
        Self { request, status: RequestStatus::Waiting, pickup_time: None }
    }
}

/// A delivered request.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FilledRequest {
    pub id:            RequestId,
    pub unit_id:       UnitId,
    pub start_node:    NodeId,
    pub end_node:      NodeId,
    pub creation_time: Tick,
    pub pickup_time:   Tick,
    pub end_time:      Tick,
}

impl FilledRequest {
    /// Ticks between creation and pickup.
    pub fn wait_ticks(&self) -> u64 {
        self.pickup_time.since(self.creation_time)
    }

    /// Ticks spent on board.
    pub fn ride_ticks(&self) -> u64 {
        self.end_time.since(self.pickup_time)
    }
}
