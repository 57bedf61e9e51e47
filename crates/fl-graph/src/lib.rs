//! `fl-graph` — lane-labelled road network and shortest-path routing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`network`] | `RoadNetwork` (CSR + lane index + R-tree), `RoadNetworkBuilder` |
//! | [`router`]  | `RoadGraph` trait, `Route`, `ShortestPathTree`, Dijkstra        |
//! | [`loader`]  | CSV node/edge loading                                           |
//! | [`error`]   | `GraphError`, `GraphResult<T>`                                  |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                      |
//! |-----------|-------------------------------------------------------------|
//! | `serde`   | Derives `Serialize`/`Deserialize` on `fl-core` types.       |
//! | `fx-hash` | FxHash for the lane and node-name lookup tables.            |

pub mod error;
pub mod loader;
pub mod network;
pub mod router;


pub use error::{GraphError, GraphResult};
pub use loader::{load_edges_csv, load_edges_reader, load_network_csv, load_network_reader};
pub use network::{RoadNetwork, RoadNetworkBuilder};
pub use router::{RoadGraph, Route, ShortestPathTree};
