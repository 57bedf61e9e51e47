//! Wire schema for snapshots and commands exchanged with the motion layer.
//!
//! On the wire nodes, lanes, units and statuses are plain strings.
//! [`SnapshotMsg::into_snapshot`] validates them against a [`RoadNetwork`]
//! and produces the typed [`FleetSnapshot`] the dispatcher consumes.
//!
//! ```json
//! {
//!   "units": { "duckie-0": { "status": "IDLE", "lane": "l001" } },
//!   "requests": [
//!     { "creation_time": 12, "start_node": "n4", "end_node": "n9", "assigned_unit": null }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use fl_core::{LaneId, NodeId, RequestId, Tick, UnitId};
use fl_graph::{GraphError, RoadNetwork};

use crate::model::{Command, FleetSnapshot, FleetUnit, Request};
use crate::DispatchResult;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UnitMsg {
    pub status: String,
    pub lane:   String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RequestMsg {
    /// Defaults to the request's position in the list.
    #[serde(default)]
    pub request_id:    Option<u32>,
    pub creation_time: u64,
    pub start_node:    String,
    pub end_node:      String,
    /// `null` or `""` both mean open.
    #[serde(default)]
    pub assigned_unit: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SnapshotMsg {
    pub units:    BTreeMap<String, UnitMsg>,
    pub requests: Vec<RequestMsg>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CommandMsg {
    pub unit_id:       String,
    pub request_index: usize,
    pub goal_node:     String,
}

impl SnapshotMsg {
    /// Validate statuses and node names and build a typed snapshot.
    pub fn into_snapshot(self, network: &RoadNetwork) -> DispatchResult<FleetSnapshot> {
        let mut snapshot = FleetSnapshot::new();

        for (id, unit) in self.units {
            let status = unit.status.parse()?;
            snapshot.units.insert(UnitId(id), FleetUnit { status, lane: LaneId(unit.lane) });
        }

        for (i, r) in self.requests.into_iter().enumerate() {
            snapshot.requests.push(Request {
                id:            RequestId(r.request_id.unwrap_or(i as u32)),
                creation_time: Tick(r.creation_time),
                start_node:    network.require_node(&r.start_node)?,
                end_node:      network.require_node(&r.end_node)?,
                assigned_unit: r.assigned_unit.filter(|u| !u.is_empty()).map(UnitId),
            });
        }

        Ok(snapshot)
    }

    /// Render a typed snapshot for publishing.
    pub fn from_snapshot(snapshot: &FleetSnapshot, network: &RoadNetwork) -> DispatchResult<Self> {
        let units = snapshot
            .units
            .iter()
            .map(|(id, unit)| {
                (id.0.clone(), UnitMsg { status: unit.status.to_string(), lane: unit.lane.0.clone() })
            })
            .collect();

        let requests = snapshot
            .requests
            .iter()
            .map(|r| {
                Ok(RequestMsg {
                    request_id:    Some(r.id.0),
                    creation_time: r.creation_time.0,
                    start_node:    node_name(network, r.start_node)?,
                    end_node:      node_name(network, r.end_node)?,
                    assigned_unit: r.assigned_unit.as_ref().map(|u| u.0.clone()),
                })
            })
            .collect::<DispatchResult<_>>()?;

        Ok(Self { units, requests })
    }
}

impl CommandMsg {
    pub fn from_command(command: &Command, network: &RoadNetwork) -> DispatchResult<Self> {
        Ok(Self {
            unit_id:       command.unit_id.0.clone(),
            request_index: command.request_index,
            goal_node:     node_name(network, command.goal_node)?,
        })
    }
}

fn node_name(network: &RoadNetwork, node: NodeId) -> DispatchResult<String> {
    network
        .node_name(node)
        .map(str::to_owned)
        .ok_or_else(|| GraphError::NodeNotFound(node).into())
}
