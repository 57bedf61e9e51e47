//! Fleet records read by the dispatcher and commands it emits.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use fl_core::{FlError, LaneId, NodeId, RequestId, Tick, UnitId};

// ── UnitStatus ────────────────────────────────────────────────────────────────

/// Motion status of a fleet unit.  Only [`Idle`](UnitStatus::Idle) units are
/// dispatched.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum UnitStatus {
    /// Free to take a request.
    #[default]
    Idle,
    /// Driving to a request's pickup node.
    EnRoute,
    /// Carrying a passenger to the drop-off node.
    Delivering,
}

impl UnitStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UnitStatus::Idle       => "IDLE",
            UnitStatus::EnRoute    => "EN_ROUTE",
            UnitStatus::Delivering => "DELIVERING",
        }
    }

    #[inline]
    pub fn is_idle(self) -> bool {
        self == UnitStatus::Idle
    }
}

impl FromStr for UnitStatus {
    type Err = FlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "IDLE"       => Ok(UnitStatus::Idle),
            "EN_ROUTE"   => Ok(UnitStatus::EnRoute),
            "DELIVERING" => Ok(UnitStatus::Delivering),
            other        => Err(FlError::UnknownStatus(other.to_owned())),
        }
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── FleetUnit / Request ───────────────────────────────────────────────────────

/// One fleet unit as seen by the dispatcher.
///
/// A unit is positioned by the lane it occupies; its reference node for
/// routing is the head of that lane.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FleetUnit {
    pub status: UnitStatus,
    pub lane:   LaneId,
}

impl FleetUnit {
    pub fn new(status: UnitStatus, lane: impl Into<LaneId>) -> Self {
        Self { status, lane: lane.into() }
    }

    pub fn idle(lane: impl Into<LaneId>) -> Self {
        Self::new(UnitStatus::Idle, lane)
    }
}

/// A transport request from `start_node` (pickup) to `end_node` (drop-off).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Request {
    pub id:            RequestId,
    pub creation_time: Tick,
    pub start_node:    NodeId,
    pub end_node:      NodeId,
    /// `None` while the request is open.
    pub assigned_unit: Option<UnitId>,
}

impl Request {
    /// A fresh, unassigned request.
    pub fn open(id: RequestId, creation_time: Tick, start_node: NodeId, end_node: NodeId) -> Self {
        Self { id, creation_time, start_node, end_node, assigned_unit: None }
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.assigned_unit.is_none()
    }
}

// ── FleetSnapshot ─────────────────────────────────────────────────────────────

/// Read-only view of the fleet for one cycle.
///
/// `units` is a `BTreeMap`, so iteration is always ascending by `UnitId`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FleetSnapshot {
    pub units:    BTreeMap<UnitId, FleetUnit>,
    pub requests: Vec<Request>,
}

impl FleetSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper used when assembling snapshots by hand.
    pub fn with_unit(mut self, id: impl Into<UnitId>, unit: FleetUnit) -> Self {
        self.units.insert(id.into(), unit);
        self
    }

    pub fn with_request(mut self, request: Request) -> Self {
        self.requests.push(request);
        self
    }

    /// Open requests with their index into `requests`, in list order.
    pub fn open_requests(&self) -> impl Iterator<Item = (usize, &Request)> + '_ {
        self.requests.iter().enumerate().filter(|(_, r)| r.is_open())
    }

    pub fn idle_unit_count(&self) -> usize {
        self.units.values().filter(|u| u.status.is_idle()).count()
    }
}

// ── Assignment / Command ──────────────────────────────────────────────────────

/// One unit matched to one request, with the full routing path.
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    pub unit_id:       UnitId,
    /// Index into the snapshot's `requests`.
    pub request_index: usize,
    /// From the unit's reference node to the request's start node; never empty.
    pub path:          Vec<NodeId>,
    /// Shortest-path length of `path`.
    pub distance:      f64,
}

impl Assignment {
    /// First waypoint strictly ahead of the unit, or the start node if the
    /// unit is already there.
    pub fn goal_node(&self) -> NodeId {
        self.path.get(1).copied().unwrap_or(self.path[0])
    }

    pub fn command(&self) -> Command {
        Command {
            unit_id:       self.unit_id.clone(),
            request_index: self.request_index,
            goal_node:     self.goal_node(),
        }
    }
}

/// The next waypoint handed to the motion layer for one unit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Command {
    pub unit_id:       UnitId,
    pub request_index: usize,
    pub goal_node:     NodeId,
}
