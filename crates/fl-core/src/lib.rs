//! `fl-core` — foundational types for the `flock` fleet dispatcher.
//!
//! This crate is a dependency of every other `fl-*` crate.  It has no `fl-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                                   |
//! |-----------|------------------------------------------------------------|
//! | [`ids`]   | `NodeId`, `EdgeId`, `RequestId`, `UnitId`, `LaneId`        |
//! | [`geo`]   | `MapPoint`, planar distance in tile units                  |
//! | [`time`]  | `Tick`, `SimClock`, `SimConfig`                            |
//! | [`rng`]   | `SimRng` (seeded, single-threaded)                         |
//! | [`error`] | `FlError`, `FlResult`                                      |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{FlError, FlResult};
pub use geo::MapPoint;
pub use ids::{EdgeId, LaneId, NodeId, RequestId, UnitId};
pub use rng::SimRng;
pub use time::{SimClock, SimConfig, Tick};
