//! `fl-dispatch` — assigns idle fleet units to open transport requests.
//!
//! # One dispatch cycle
//!
//! ```text
//! FleetSnapshot ──► Dispatcher::update ──► Vec<Command> ──► motion layer
//!                        │
//!                        └─ reads RoadGraph (immutable)
//! ```
//!
//! 1. Requests with no assigned unit form the **open** pool (caller order).
//! 2. Every idle unit is measured against every open request by
//!    shortest-path length from the unit's reference node to the request's
//!    start node.  Non-idle units take no part.
//! 3. Pairs are taken greedily, shortest first; ties go to the lower
//!    `UnitId`, then to the earlier request.  A taken request leaves the
//!    pool, so no request is matched twice in one cycle, and each unit gets
//!    the nearest request still open when it is matched.
//! 4. Each match becomes a [`Command`] whose `goal_node` is the next hop on
//!    the path (the start node itself if the unit is already there).
//!    Commands are returned in assignment order.
//!
//! Requests unreachable from a unit are ignored for that unit; a unit with no
//! reachable request is skipped.  A unit whose lane does not resolve is held
//! out of matching; if requests are still open afterwards the cycle fails
//! with that lane error.  A request naming an unknown node always fails it.
//!
//! The dispatcher never mutates the snapshot.  Marking requests assigned and
//! moving units out of `Idle` is the motion layer's job.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                     |
//! |------------|------------------------------------------------------------|
//! | `serde`    | Wire schema in [`wire`] and serde derives on model types.  |
//! | `parallel` | Builds per-unit shortest-path trees on Rayon's pool.       |

pub mod dispatcher;
pub mod error;
pub mod model;

#[cfg(feature = "serde")]
pub mod wire;

#[cfg(test)]
mod tests;

pub use dispatcher::Dispatcher;
pub use error::{DispatchError, DispatchResult};
pub use model::{Assignment, Command, FleetSnapshot, FleetUnit, Request, UnitStatus};

#[cfg(feature = "serde")]
pub use wire::{CommandMsg, RequestMsg, SnapshotMsg, UnitMsg};
