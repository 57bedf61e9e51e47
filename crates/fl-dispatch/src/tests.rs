//! Unit tests for fl-dispatch.

use fl_core::{LaneId, MapPoint, NodeId, RequestId, Tick, UnitId};
use fl_graph::{GraphError, GraphResult, RoadGraph, RoadNetwork, RoadNetworkBuilder};

use crate::{Dispatcher, FleetSnapshot, FleetUnit, Request, UnitStatus};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// A — B — C — D, unit weights, one lane per direction:
///   l1: A→B  l1r: B→A   l2: B→C  l2r: C→B   l3: C→D  l3r: D→C
fn line_network() -> (RoadNetwork, [NodeId; 4]) {
    let mut b = RoadNetworkBuilder::new();
    let a = b.add_node("A", MapPoint::new(0.0, 0.0));
    let bb = b.add_node("B", MapPoint::new(1.0, 0.0));
    let c = b.add_node("C", MapPoint::new(2.0, 0.0));
    let d = b.add_node("D", MapPoint::new(3.0, 0.0));
    b.add_road(a, bb, "l1", "l1r", 1.0);
    b.add_road(bb, c, "l2", "l2r", 1.0);
    b.add_road(c, d, "l3", "l3r", 1.0);
    (b.build().unwrap(), [a, bb, c, d])
}

/// `line_network` plus an island node `E` with a self-contained lane
/// `le: E→E` and no connection to the rest.
fn line_with_island() -> (RoadNetwork, [NodeId; 5]) {
    let mut b = RoadNetworkBuilder::new();
    let a = b.add_node("A", MapPoint::new(0.0, 0.0));
    let bb = b.add_node("B", MapPoint::new(1.0, 0.0));
    let c = b.add_node("C", MapPoint::new(2.0, 0.0));
    let d = b.add_node("D", MapPoint::new(3.0, 0.0));
    let e = b.add_node("E", MapPoint::new(9.0, 9.0));
    b.add_road(a, bb, "l1", "l1r", 1.0);
    b.add_road(bb, c, "l2", "l2r", 1.0);
    b.add_road(c, d, "l3", "l3r", 1.0);
    b.add_lane(e, e, "le", 0.0);
    (b.build().unwrap(), [a, bb, c, d, e])
}

fn request(id: u32, start: NodeId, end: NodeId) -> Request {
    Request::open(RequestId(id), Tick(0), start, end)
}

fn assigned(id: u32, start: NodeId, end: NodeId, unit: &str) -> Request {
    Request { assigned_unit: Some(UnitId::from(unit)), ..request(id, start, end) }
}

/// Exposes only the three pairwise operations, forcing the dispatcher onto
/// its per-pair fallback.
struct PairwiseOnly<'a>(&'a RoadNetwork);

impl RoadGraph for PairwiseOnly<'_> {
    fn shortest_path_length(&self, from: NodeId, to: NodeId) -> GraphResult<f64> {
        self.0.shortest_path_length(from, to)
    }

    fn shortest_path(&self, from: NodeId, to: NodeId) -> GraphResult<Vec<NodeId>> {
        self.0.shortest_path(from, to)
    }

    fn lane_destination_node(&self, lane: &LaneId) -> GraphResult<NodeId> {
        self.0.lane_destination_node(lane)
    }
}

/// Reports every lane as ambiguous.
struct CorruptLanes;

impl RoadGraph for CorruptLanes {
    fn shortest_path_length(&self, _from: NodeId, _to: NodeId) -> GraphResult<f64> {
        Ok(0.0)
    }

    fn shortest_path(&self, from: NodeId, _to: NodeId) -> GraphResult<Vec<NodeId>> {
        Ok(vec![from])
    }

    fn lane_destination_node(&self, lane: &LaneId) -> GraphResult<NodeId> {
        Err(GraphError::DuplicateLane(lane.clone()))
    }
}

// ── Empty inputs ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod empty_inputs {
    use super::*;

    #[test]
    fn no_requests_no_commands() {
        let (net, _) = line_network();
        let snapshot = FleetSnapshot::new().with_unit("duckie-0", FleetUnit::idle("l1"));
        assert!(Dispatcher::new(&net).update(&snapshot).unwrap().is_empty());
    }

    #[test]
    fn all_requests_assigned_no_commands() {
        let (net, [a, _, _, d]) = line_network();
        let snapshot = FleetSnapshot::new()
            .with_unit("duckie-0", FleetUnit::idle("l1"))
            .with_request(assigned(0, d, a, "duckie-9"));
        assert!(Dispatcher::new(&net).update(&snapshot).unwrap().is_empty());
    }

    #[test]
    fn empty_fleet_no_commands() {
        let (net, [a, _, _, d]) = line_network();
        let snapshot = FleetSnapshot::new().with_request(request(0, d, a));
        assert!(Dispatcher::new(&net).update(&snapshot).unwrap().is_empty());
    }

    #[test]
    fn no_requests_skips_lane_resolution() {
        let snapshot = FleetSnapshot::new().with_unit("duckie-0", FleetUnit::idle("l1"));
        assert!(Dispatcher::new(&CorruptLanes).update(&snapshot).unwrap().is_empty());
    }
}

// ── Single match and goal derivation ──────────────────────────────────────────

#[cfg(test)]
mod single_match {
    use super::*;

    #[test]
    fn end_to_end_example() {
        // Unit on l1 → reference node B.  Request at D.  Path B→C→D.
        let (net, [a, _, c, d]) = line_network();
        let snapshot = FleetSnapshot::new()
            .with_unit("duckie-0", FleetUnit::idle("l1"))
            .with_request(request(0, d, a));

        let commands = Dispatcher::new(&net).update(&snapshot).unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].unit_id, UnitId::from("duckie-0"));
        assert_eq!(commands[0].request_index, 0);
        assert_eq!(commands[0].goal_node, c);
    }

    #[test]
    fn full_path_and_distance() {
        let (net, [a, b, c, d]) = line_network();
        let snapshot = FleetSnapshot::new()
            .with_unit("duckie-0", FleetUnit::idle("l1"))
            .with_request(request(0, d, a));

        let assignments = Dispatcher::new(&net).assign(&snapshot).unwrap();
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].path, vec![b, c, d]);
        assert_eq!(assignments[0].distance, 2.0);
    }

    #[test]
    fn unit_already_at_start_node() {
        let (net, [_, b, _, d]) = line_network();
        let snapshot = FleetSnapshot::new()
            .with_unit("duckie-0", FleetUnit::idle("l1"))
            .with_request(request(0, b, d));

        let commands = Dispatcher::new(&net).update(&snapshot).unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].goal_node, b);
    }

    #[test]
    fn request_index_refers_to_full_list() {
        let (net, [a, b, c, d]) = line_network();
        let snapshot = FleetSnapshot::new()
            .with_unit("duckie-0", FleetUnit::idle("l1"))
            .with_request(assigned(0, a, b, "duckie-7"))
            .with_request(assigned(1, a, c, "duckie-8"))
            .with_request(request(2, d, a));

        let commands = Dispatcher::new(&net).update(&snapshot).unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].request_index, 2);
    }

    #[test]
    fn snapshot_is_not_mutated() {
        let (net, [a, _, _, d]) = line_network();
        let snapshot = FleetSnapshot::new()
            .with_unit("duckie-0", FleetUnit::idle("l1"))
            .with_request(request(0, d, a));
        let before = snapshot.clone();
        Dispatcher::new(&net).update(&snapshot).unwrap();
        assert_eq!(snapshot, before);
    }
}

// ── Greedy matching ───────────────────────────────────────────────────────────

#[cfg(test)]
mod greedy {
    use super::*;

    #[test]
    fn nearer_unit_wins_sole_request() {
        // duckie-a on l1r → A (distance 3 to D); duckie-b on l3 → D (distance 0).
        let (net, [a, _, _, d]) = line_network();
        let snapshot = FleetSnapshot::new()
            .with_unit("duckie-a", FleetUnit::idle("l1r"))
            .with_unit("duckie-b", FleetUnit::idle("l3"))
            .with_request(request(0, d, a));

        let commands = Dispatcher::new(&net).update(&snapshot).unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].unit_id, UnitId::from("duckie-b"));
    }

    #[test]
    fn nearer_unit_wins_regardless_of_id_order() {
        let (net, [a, _, _, d]) = line_network();
        for (near, far) in [("u1", "u2"), ("u2", "u1")] {
            let snapshot = FleetSnapshot::new()
                .with_unit(near, FleetUnit::idle("l2")) // → C, distance 1
                .with_unit(far, FleetUnit::idle("l1r")) // → A, distance 3
                .with_request(request(0, d, a));
            let commands = Dispatcher::new(&net).update(&snapshot).unwrap();
            assert_eq!(commands.len(), 1);
            assert_eq!(commands[0].unit_id, UnitId::from(near));
        }
    }

    #[test]
    fn no_request_assigned_twice() {
        let (net, [a, b, c, d]) = line_network();
        let snapshot = FleetSnapshot::new()
            .with_unit("duckie-0", FleetUnit::idle("l1"))
            .with_unit("duckie-1", FleetUnit::idle("l2"))
            .with_unit("duckie-2", FleetUnit::idle("l3"))
            .with_request(request(0, d, a))
            .with_request(request(1, b, c));

        let commands = Dispatcher::new(&net).update(&snapshot).unwrap();
        assert_eq!(commands.len(), 2);
        assert_ne!(commands[0].request_index, commands[1].request_index);
        assert_ne!(commands[0].unit_id, commands[1].unit_id);
    }

    #[test]
    fn each_unit_takes_its_nearest() {
        // duckie-0 at B, duckie-2 at D.  Request 0 at D, request 1 at B.
        let (net, [a, b, _, d]) = line_network();
        let snapshot = FleetSnapshot::new()
            .with_unit("duckie-0", FleetUnit::idle("l1"))
            .with_unit("duckie-2", FleetUnit::idle("l3"))
            .with_request(request(0, d, a))
            .with_request(request(1, b, a));

        let commands = Dispatcher::new(&net).update(&snapshot).unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].unit_id, UnitId::from("duckie-0"));
        assert_eq!(commands[0].request_index, 1);
        assert_eq!(commands[0].goal_node, b);
        assert_eq!(commands[1].unit_id, UnitId::from("duckie-2"));
        assert_eq!(commands[1].request_index, 0);
        assert_eq!(commands[1].goal_node, d);
    }

    #[test]
    fn equal_distance_first_request_wins() {
        // Unit at B; requests at A and C are both 1 away.
        let (net, [a, _, c, d]) = line_network();
        let snapshot = FleetSnapshot::new()
            .with_unit("duckie-0", FleetUnit::idle("l1"))
            .with_request(request(0, c, d))
            .with_request(request(1, a, d));

        let commands = Dispatcher::new(&net).update(&snapshot).unwrap();
        assert_eq!(commands[0].request_index, 0);
        assert_eq!(commands[0].goal_node, c);
    }

    #[test]
    fn equal_distance_lower_unit_id_wins() {
        // Both units at B, one request at D.
        let (net, [a, _, _, d]) = line_network();
        let snapshot = FleetSnapshot::new()
            .with_unit("duckie-1", FleetUnit::idle("l2r"))
            .with_unit("duckie-0", FleetUnit::idle("l1"))
            .with_request(request(0, d, a));

        let commands = Dispatcher::new(&net).update(&snapshot).unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].unit_id, UnitId::from("duckie-0"));
    }

    #[test]
    fn more_units_than_requests() {
        let (net, [a, _, _, d]) = line_network();
        let snapshot = FleetSnapshot::new()
            .with_unit("duckie-0", FleetUnit::idle("l1"))
            .with_unit("duckie-1", FleetUnit::idle("l2"))
            .with_unit("duckie-2", FleetUnit::idle("l3"))
            .with_request(request(0, d, a));

        let commands = Dispatcher::new(&net).update(&snapshot).unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].unit_id, UnitId::from("duckie-2"));
    }

    #[test]
    fn commands_follow_assignment_order() {
        // "a" at A is 1 from request 1 at B; "z" at D is 0 from request 0 at D.
        // The cheaper pair is matched first, so "z" leads despite its id.
        let (net, [a, b, _, d]) = line_network();
        let snapshot = FleetSnapshot::new()
            .with_unit("a", FleetUnit::idle("l1r"))
            .with_unit("z", FleetUnit::idle("l3"))
            .with_request(request(0, d, a))
            .with_request(request(1, b, a));

        let dispatcher = Dispatcher::new(&net);
        let assignments = dispatcher.assign(&snapshot).unwrap();
        let distances: Vec<_> = assignments.iter().map(|a| a.distance).collect();
        assert_eq!(distances, [0.0, 1.0]);

        let commands = dispatcher.update(&snapshot).unwrap();
        let ids: Vec<_> = commands.iter().map(|c| c.unit_id.as_str()).collect();
        assert_eq!(ids, ["z", "a"]);
        assert_eq!(commands[0].request_index, 0);
        assert_eq!(commands[1].request_index, 1);
    }

    #[test]
    fn non_idle_units_never_commanded() {
        let (net, [a, _, _, d]) = line_network();
        let snapshot = FleetSnapshot::new()
            .with_unit("duckie-0", FleetUnit::new(UnitStatus::EnRoute, "l3"))
            .with_unit("duckie-1", FleetUnit::new(UnitStatus::Delivering, "l3"))
            .with_unit("duckie-2", FleetUnit::idle("l1r"))
            .with_request(request(0, d, a));

        let commands = Dispatcher::new(&net).update(&snapshot).unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].unit_id, UnitId::from("duckie-2"));
    }

    #[test]
    fn only_busy_units_no_commands() {
        let (net, [a, _, _, d]) = line_network();
        let snapshot = FleetSnapshot::new()
            .with_unit("duckie-0", FleetUnit::new(UnitStatus::EnRoute, "l3"))
            .with_request(request(0, d, a));
        assert!(Dispatcher::new(&net).update(&snapshot).unwrap().is_empty());
    }
}

// ── Reachability and errors ───────────────────────────────────────────────────

#[cfg(test)]
mod reachability {
    use super::*;

    #[test]
    fn unreachable_request_yields_no_command() {
        let (net, [_, _, _, d, e]) = line_with_island();
        let snapshot = FleetSnapshot::new()
            .with_unit("duckie-0", FleetUnit::idle("l1"))
            .with_request(request(0, e, d));
        assert!(Dispatcher::new(&net).update(&snapshot).unwrap().is_empty());
    }

    #[test]
    fn unreachable_request_does_not_block_others() {
        let (net, [a, _, c, _, e]) = line_with_island();
        let snapshot = FleetSnapshot::new()
            .with_unit("duckie-0", FleetUnit::idle("l1"))
            .with_unit("duckie-1", FleetUnit::idle("l3"))
            .with_request(request(0, e, a))
            .with_request(request(1, c, a));

        let commands = Dispatcher::new(&net).update(&snapshot).unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].request_index, 1);
        assert_eq!(commands[0].unit_id, UnitId::from("duckie-0"));
    }

    #[test]
    fn stranded_unit_skipped_others_matched() {
        let (net, [a, _, _, d, _]) = line_with_island();
        let snapshot = FleetSnapshot::new()
            .with_unit("duckie-0", FleetUnit::idle("le"))
            .with_unit("duckie-1", FleetUnit::idle("l1"))
            .with_request(request(0, d, a));

        let commands = Dispatcher::new(&net).update(&snapshot).unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].unit_id, UnitId::from("duckie-1"));
    }

    #[test]
    fn unknown_lane_is_fatal() {
        let (net, [a, _, _, d]) = line_network();
        let snapshot = FleetSnapshot::new()
            .with_unit("duckie-0", FleetUnit::idle("nowhere"))
            .with_request(request(0, d, a));
        let err = Dispatcher::new(&net).update(&snapshot).unwrap_err();
        assert!(matches!(err, crate::DispatchError::Graph(GraphError::UnknownLane(_))));
    }

    #[test]
    fn unresolved_lane_ignored_once_requests_run_out() {
        let (net, [a, _, _, d]) = line_network();
        let snapshot = FleetSnapshot::new()
            .with_unit("a", FleetUnit::idle("l1"))
            .with_unit("b", FleetUnit::idle("no-such-lane"))
            .with_request(request(0, d, a));

        let commands = Dispatcher::new(&net).update(&snapshot).unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].unit_id, UnitId::from("a"));
        assert_eq!(commands[0].request_index, 0);
    }

    #[test]
    fn unresolved_lane_fatal_while_requests_remain() {
        let (net, [a, b, _, d]) = line_network();
        let snapshot = FleetSnapshot::new()
            .with_unit("a", FleetUnit::idle("l1"))
            .with_unit("b", FleetUnit::idle("no-such-lane"))
            .with_request(request(0, d, a))
            .with_request(request(1, b, a));

        let err = Dispatcher::new(&net).update(&snapshot).unwrap_err();
        assert!(matches!(err, crate::DispatchError::Graph(GraphError::UnknownLane(_))));
    }

    #[test]
    fn duplicate_lane_is_fatal() {
        let snapshot = FleetSnapshot::new()
            .with_unit("duckie-0", FleetUnit::idle("l1"))
            .with_request(request(0, NodeId(0), NodeId(1)));
        let err = Dispatcher::new(&CorruptLanes).update(&snapshot).unwrap_err();
        assert!(matches!(err, crate::DispatchError::Graph(GraphError::DuplicateLane(_))));
    }

    #[test]
    fn unknown_request_node_is_fatal() {
        let (net, [a, ..]) = line_network();
        let snapshot = FleetSnapshot::new()
            .with_unit("duckie-0", FleetUnit::idle("l1"))
            .with_request(request(0, NodeId(77), a));
        let err = Dispatcher::new(&net).update(&snapshot).unwrap_err();
        assert!(matches!(err, crate::DispatchError::Graph(GraphError::NodeNotFound(NodeId(77)))));
    }
}

// ── Pairwise fallback ─────────────────────────────────────────────────────────

#[cfg(test)]
mod pairwise {
    use super::*;

    #[test]
    fn fallback_matches_tree_results() {
        let (net, [a, b, c, d, e]) = line_with_island();
        let snapshot = FleetSnapshot::new()
            .with_unit("duckie-0", FleetUnit::idle("l1"))
            .with_unit("duckie-1", FleetUnit::idle("l3"))
            .with_unit("duckie-2", FleetUnit::idle("l1r"))
            .with_unit("duckie-3", FleetUnit::idle("le"))
            .with_request(request(0, e, a))
            .with_request(request(1, c, a))
            .with_request(request(2, a, d))
            .with_request(request(3, b, d));

        let with_tree = Dispatcher::new(&net).assign(&snapshot).unwrap();
        let pairwise  = Dispatcher::new(&PairwiseOnly(&net)).assign(&snapshot).unwrap();
        assert_eq!(with_tree, pairwise);
        // duckie-3 is stranded on the island but request 0 starts there.
        assert_eq!(with_tree.len(), 4);
    }

    #[test]
    fn dispatcher_accepts_trait_objects() {
        let (net, [a, _, c, d]) = line_network();
        let graph: &dyn RoadGraph = &net;
        let snapshot = FleetSnapshot::new()
            .with_unit("duckie-0", FleetUnit::idle("l1"))
            .with_request(request(0, d, a));
        let commands = Dispatcher::new(graph).update(&snapshot).unwrap();
        assert_eq!(commands[0].goal_node, c);
    }
}

// ── Model ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod model {
    use super::*;

    #[test]
    fn status_parsing() {
        assert_eq!("IDLE".parse::<UnitStatus>().unwrap(), UnitStatus::Idle);
        assert_eq!("EN_ROUTE".parse::<UnitStatus>().unwrap(), UnitStatus::EnRoute);
        assert_eq!("DELIVERING".parse::<UnitStatus>().unwrap(), UnitStatus::Delivering);
        assert!("idle".parse::<UnitStatus>().is_err());
        assert!("PARKED".parse::<UnitStatus>().is_err());
        assert_eq!(UnitStatus::EnRoute.to_string(), "EN_ROUTE");
    }

    #[test]
    fn open_requests_keep_indices() {
        let snapshot = FleetSnapshot::new()
            .with_request(request(0, NodeId(0), NodeId(1)))
            .with_request(assigned(1, NodeId(0), NodeId(1), "x"))
            .with_request(request(2, NodeId(1), NodeId(0)));
        let open: Vec<usize> = snapshot.open_requests().map(|(i, _)| i).collect();
        assert_eq!(open, [0, 2]);
    }

    #[test]
    fn idle_count() {
        let snapshot = FleetSnapshot::new()
            .with_unit("a", FleetUnit::idle("l1"))
            .with_unit("b", FleetUnit::new(UnitStatus::EnRoute, "l1"));
        assert_eq!(snapshot.idle_unit_count(), 1);
    }
}

// ── Wire schema ───────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "serde"))]
mod wire {
    use super::*;
    use crate::{CommandMsg, SnapshotMsg};

    const SNAPSHOT_JSON: &str = r#"{
        "units": {
            "duckie-0": { "status": "IDLE", "lane": "l1" },
            "duckie-1": { "status": "EN_ROUTE", "lane": "l3" }
        },
        "requests": [
            { "creation_time": 4, "start_node": "D", "end_node": "A", "assigned_unit": "" },
            { "creation_time": 5, "start_node": "C", "end_node": "A", "assigned_unit": "duckie-1" }
        ]
    }"#;

    #[test]
    fn snapshot_from_json() {
        let (net, [a, _, c, d]) = line_network();
        let msg: SnapshotMsg = serde_json::from_str(SNAPSHOT_JSON).unwrap();
        let snapshot = msg.into_snapshot(&net).unwrap();

        assert_eq!(snapshot.units.len(), 2);
        assert_eq!(snapshot.units[&UnitId::from("duckie-1")].status, UnitStatus::EnRoute);
        assert_eq!(snapshot.requests[0].start_node, d);
        assert_eq!(snapshot.requests[0].id, RequestId(0));
        assert!(snapshot.requests[0].is_open());
        assert_eq!(snapshot.requests[1].end_node, a);
        assert!(!snapshot.requests[1].is_open());

        let commands = Dispatcher::new(&net).update(&snapshot).unwrap();
        let msg = CommandMsg::from_command(&commands[0], &net).unwrap();
        assert_eq!(msg, CommandMsg { unit_id: "duckie-0".into(), request_index: 0, goal_node: "C".into() });
        assert_eq!(commands[0].goal_node, c);
    }

    #[test]
    fn bad_status_rejected() {
        let (net, _) = line_network();
        let json = r#"{ "units": { "d": { "status": "FLYING", "lane": "l1" } }, "requests": [] }"#;
        let msg: SnapshotMsg = serde_json::from_str(json).unwrap();
        assert!(matches!(msg.into_snapshot(&net), Err(crate::DispatchError::Record(_))));
    }

    #[test]
    fn bad_node_rejected() {
        let (net, _) = line_network();
        let json = r#"{ "units": {}, "requests": [
            { "creation_time": 0, "start_node": "Q", "end_node": "A" }
        ] }"#;
        let msg: SnapshotMsg = serde_json::from_str(json).unwrap();
        assert!(matches!(
            msg.into_snapshot(&net),
            Err(crate::DispatchError::Graph(GraphError::UnknownNode(_)))
        ));
    }

    #[test]
    fn snapshot_publishes_names() {
        let (net, [a, _, _, d]) = line_network();
        let snapshot = FleetSnapshot::new()
            .with_unit("duckie-0", FleetUnit::idle("l1"))
            .with_request(assigned(3, d, a, "duckie-0"));
        let msg = SnapshotMsg::from_snapshot(&snapshot, &net).unwrap();
        assert_eq!(msg.units["duckie-0"].status, "IDLE");
        assert_eq!(msg.requests[0].start_node, "D");
        assert_eq!(msg.requests[0].request_id, Some(3));
        assert_eq!(msg.requests[0].assigned_unit.as_deref(), Some("duckie-0"));
    }
}
