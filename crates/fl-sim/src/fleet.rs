//! `FleetState` — the on-rails motion layer that consumes dispatch commands.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use fl_core::{FlError, FlResult, MapPoint, NodeId, RequestId, Tick, UnitId};
use fl_dispatch::{Command, FleetSnapshot, FleetUnit, Request, UnitStatus};
use fl_graph::{GraphError, RoadNetwork};

use crate::state::{ActiveRequest, FilledRequest, RequestStatus, UnitState};
use crate::SimResult;

// ── CommandSink ───────────────────────────────────────────────────────────────

/// The motion layer seen from the cycle driver.
///
/// Each cycle the driver asks for a [`snapshot`](Self::snapshot), runs the
/// dispatcher on it, and hands the commands back to
/// [`execute`](Self::execute).  `execute` takes `&mut self`, so one cycle can
/// never start while another is still applying.
pub trait CommandSink {
    /// Current units and active requests, in the form the dispatcher reads.
    fn snapshot(&self) -> FleetSnapshot;

    /// Apply `commands` (produced from the latest snapshot) and advance every
    /// busy unit by one tick.
    fn execute(
        &mut self,
        network:  &RoadNetwork,
        commands: &[Command],
        now:      Tick,
    ) -> SimResult<CycleReport>;
}

/// What happened during one call to [`CommandSink::execute`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    pub tick: Tick,
    /// Commands that started a unit on a request.
    pub applied: usize,
    /// Commands skipped because the unit or request had moved on.
    pub stale: usize,
    pub pickups: usize,
    /// Requests handed back to the open pool because their pickup node
    /// became unreachable.
    pub released: usize,
    /// Requests dropped because their drop-off node is unreachable.
    pub abandoned: usize,
    /// Requests delivered this tick.
    pub filled: Vec<FilledRequest>,
}

// ── FleetState ────────────────────────────────────────────────────────────────

/// All units, active requests and delivery history.
///
/// `units` is ordered by `UnitId` and `requests` by creation, so commands
/// and hops are always processed in the same order.
#[derive(Debug, Clone, Default)]
pub struct FleetState {
    units:           BTreeMap<UnitId, UnitState>,
    requests:        Vec<ActiveRequest>,
    filled:          Vec<FilledRequest>,
    abandoned:       Vec<Request>,
    next_request_id: u32,
}

impl FleetState {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Set-up ────────────────────────────────────────────────────────────

    /// Add a unit.  Unit ids must be unique.
    pub fn add_unit(&mut self, id: impl Into<UnitId>, state: UnitState) -> FlResult<()> {
        let id = id.into();
        if self.units.contains_key(&id) {
            return Err(FlError::Config(format!("duplicate unit id {id}")));
        }
        self.units.insert(id, state);
        Ok(())
    }

    /// Open a new request and return its id.
    pub fn open_request(&mut self, start: NodeId, end: NodeId, now: Tick) -> RequestId {
        let id = RequestId(self.next_request_id);
        self.next_request_id += 1;
        self.requests.push(ActiveRequest::waiting(Request::open(id, now, start, end)));
        debug!(request = %id, %start, %end, %now, "request opened");
        id
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn units(&self) -> &BTreeMap<UnitId, UnitState> {
        &self.units
    }

    pub fn unit(&self, id: &UnitId) -> FlResult<&UnitState> {
        self.units.get(id).ok_or_else(|| FlError::UnitNotFound(id.clone()))
    }

    /// Requests not yet delivered, oldest first.
    pub fn requests(&self) -> &[ActiveRequest] {
        &self.requests
    }

    pub fn filled(&self) -> &[FilledRequest] {
        &self.filled
    }

    pub fn abandoned(&self) -> &[Request] {
        &self.abandoned
    }

    /// Map position of unit `id`, `progress` of the way along its current
    /// lane (`0.0` = tail, `1.0` = head, where the unit logically stands).
    pub fn unit_pose(&self, id: &UnitId, network: &RoadNetwork, progress: f32) -> FlResult<MapPoint> {
        let unit = self.unit(id)?;
        let head = network.node_pos.get(unit.node.index()).copied().unwrap_or(MapPoint::ORIGIN);
        let tail = network
            .lane_edge(&unit.lane)
            .map(|e| network.node_pos[network.edge_from[e.index()].index()])
            .unwrap_or(head);
        Ok(tail.lerp(head, progress))
    }

    // ── Command application ───────────────────────────────────────────────

    fn apply(&mut self, command: &Command, now: Tick, report: &mut CycleReport) {
        let Some(unit) = self.units.get_mut(&command.unit_id) else {
            warn!(unit = %command.unit_id, "command for unknown unit skipped");
            report.stale += 1;
            return;
        };
        if !unit.status.is_idle() {
            warn!(unit = %command.unit_id, status = %unit.status, "command for busy unit skipped");
            report.stale += 1;
            return;
        }
        let Some(active) = self
            .requests
            .get_mut(command.request_index)
            .filter(|a| a.request.is_open())
        else {
            warn!(
                unit = %command.unit_id,
                request_index = command.request_index,
                "command for missing or assigned request skipped"
            );
            report.stale += 1;
            return;
        };

        active.request.assigned_unit = Some(command.unit_id.clone());
        unit.status   = UnitStatus::EnRoute;
        unit.request  = Some(active.request.id);
        unit.waypoint = Some(command.goal_node);
        report.applied += 1;

        debug!(
            unit = %command.unit_id,
            request = %active.request.id,
            goal = %command.goal_node,
            %now,
            "en route"
        );
    }

    // ── Movement ──────────────────────────────────────────────────────────

    /// Move busy unit `id` one lane toward its current target, then handle
    /// pickup or drop-off if it has arrived.
    fn advance(
        &mut self,
        network: &RoadNetwork,
        id:      &UnitId,
        now:     Tick,
        report:  &mut CycleReport,
    ) -> SimResult<()> {
        let Some(slot) = self.slot_of(id) else {
            if let Some(unit) = self.units.get_mut(id) {
                warn!(unit = %id, "busy unit has no active request, returning to idle");
                unit.release();
            }
            return Ok(());
        };

        // Already standing on the target: no hop this tick.
        if self.settle(network, id, slot, now, report)? {
            return Ok(());
        }

        let unit   = self.unit(id)?;
        let from   = unit.node;
        let target = target_of(unit, &self.requests[slot]);
        let next = match unit
            .waypoint
            .filter(|&w| w != from && network.lane_between(from, w).is_some())
        {
            Some(w) => Some(w),
            None => match network.route(from, target) {
                Ok(route) => Some(route.next_hop()),
                Err(e) if e.is_unreachable() => None,
                Err(e) => return Err(e.into()),
            },
        };

        let Some(next) = next else {
            self.give_up(id, slot, target, report);
            return Ok(());
        };
        let lane = network
            .lane_between(from, next)
            .cloned()
            .ok_or(GraphError::Unreachable { from, to: next })?;

        if let Some(unit) = self.units.get_mut(id) {
            unit.node     = next;
            unit.lane     = lane;
            unit.waypoint = None;
        }
        self.settle(network, id, slot, now, report)?;
        Ok(())
    }

    /// Pick up or drop off if unit `id` stands on its target.  Returns `true`
    /// if it did either.
    fn settle(
        &mut self,
        network: &RoadNetwork,
        id:      &UnitId,
        slot:    usize,
        now:     Tick,
        report:  &mut CycleReport,
    ) -> SimResult<bool> {
        let unit   = self.units.get_mut(id).ok_or_else(|| FlError::UnitNotFound(id.clone()))?;
        let active = &mut self.requests[slot];
        let status = unit.status;

        match status {
            UnitStatus::EnRoute if unit.node == active.request.start_node => {
                active.status      = RequestStatus::PickedUp;
                active.pickup_time = Some(now);
                unit.status        = UnitStatus::Delivering;
                report.pickups += 1;
                debug!(unit = %id, request = %active.request.id, %now, "picked up");

                let (here, dropoff) = (unit.node, active.request.end_node);
                if here == dropoff {
                    self.fill(id, slot, now, report);
                } else if let Err(e) = network.route(here, dropoff) {
                    if !e.is_unreachable() {
                        return Err(e.into());
                    }
                    self.give_up(id, slot, dropoff, report);
                }
                Ok(true)
            }
            UnitStatus::Delivering if unit.node == active.request.end_node => {
                self.fill(id, slot, now, report);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn fill(&mut self, id: &UnitId, slot: usize, now: Tick, report: &mut CycleReport) {
        let active = self.requests.remove(slot);
        if let Some(unit) = self.units.get_mut(id) {
            unit.release();
        }

        let filled = FilledRequest {
            id:            active.request.id,
            unit_id:       id.clone(),
            start_node:    active.request.start_node,
            end_node:      active.request.end_node,
            creation_time: active.request.creation_time,
            pickup_time:   active.pickup_time.unwrap_or(now),
            end_time:      now,
        };
        debug!(
            unit = %id,
            request = %filled.id,
            wait = filled.wait_ticks(),
            ride = filled.ride_ticks(),
            "delivered"
        );
        report.filled.push(filled.clone());
        self.filled.push(filled);
    }

    /// `target` cannot be reached from unit `id`.  A passenger on board is
    /// abandoned; a request not yet picked up goes back to the open pool.
    fn give_up(&mut self, id: &UnitId, slot: usize, target: NodeId, report: &mut CycleReport) {
        let Some(unit) = self.units.get_mut(id) else { return };
        let (status, from) = (unit.status, unit.node);
        unit.release();

        if status == UnitStatus::Delivering {
            let active = self.requests.remove(slot);
            warn!(unit = %id, request = %active.request.id, %from, %target, "drop-off unreachable, request abandoned");
            self.abandoned.push(active.request);
            report.abandoned += 1;
        } else {
            let active = &mut self.requests[slot];
            active.request.assigned_unit = None;
            warn!(unit = %id, request = %active.request.id, %from, %target, "pickup unreachable, request released");
            report.released += 1;
        }
    }

    fn slot_of(&self, id: &UnitId) -> Option<usize> {
        let request = self.units.get(id)?.request?;
        self.requests.iter().position(|a| a.request.id == request)
    }
}

/// Where a busy unit is heading: the pickup node until picked up, then the
/// drop-off node.
fn target_of(unit: &UnitState, active: &ActiveRequest) -> NodeId {
    match unit.status {
        UnitStatus::Delivering => active.request.end_node,
        _                      => active.request.start_node,
    }
}

impl CommandSink for FleetState {
    fn snapshot(&self) -> FleetSnapshot {
        FleetSnapshot {
            units: self
                .units
                .iter()
                .map(|(id, u)| (id.clone(), FleetUnit::new(u.status, u.lane.clone())))
                .collect(),
            requests: self.requests.iter().map(|a| a.request.clone()).collect(),
        }
    }

    fn execute(
        &mut self,
        network:  &RoadNetwork,
        commands: &[Command],
        now:      Tick,
    ) -> SimResult<CycleReport> {
        let mut report = CycleReport { tick: now, ..CycleReport::default() };

        // Commands index into the snapshot they came from, so apply them all
        // before any request leaves the active list.
        for command in commands {
            self.apply(command, now, &mut report);
        }

        let busy: Vec<UnitId> = self
            .units
            .iter()
            .filter(|(_, u)| !u.status.is_idle())
            .map(|(id, _)| id.clone())
            .collect();
        for id in &busy {
            self.advance(network, id, now, &mut report)?;
        }

        Ok(report)
    }
}
