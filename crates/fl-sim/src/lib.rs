//! `fl-sim` — on-rails motion layer and dispatch cycle driver.
//!
//! # One cycle
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Generate  — every request_interval_ticks, open one request with
//!                 distinct, mutually reachable random nodes.
//!   ② Snapshot  — FleetState → FleetSnapshot.
//!   ③ Dispatch  — Dispatcher::update(snapshot) → Vec<Command>.
//!   ④ Execute   — FleetState::execute:
//!                   apply commands  (stale ones are logged and skipped)
//!                   move each busy unit one lane toward its target
//!                   pickup / drop-off on arrival
//! ```
//!
//! # Request lifecycle
//!
//! ```text
//! open (Waiting) ──command──► assigned (Waiting) ──pickup──► PickedUp ──drop-off──► filled
//!                                   │                           │
//!                      pickup unreachable: back to open   drop-off unreachable: abandoned
//! ```
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`state`]     | `UnitState`, `ActiveRequest`, `FilledRequest`             |
//! | [`fleet`]     | `FleetState`, `CommandSink`, `CycleReport`                |
//! | [`generator`] | `RequestGenerator`                                        |
//! | [`builder`]   | `SimBuilder`, `Placement`                                 |
//! | [`sim`]       | `Sim` — the cycle driver                                  |
//! | [`observer`]  | `SimObserver`, `NoopObserver`                             |
//! | [`stats`]     | `FleetStats`                                              |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `serde`    | `Serialize` on stats and fleet records.                |
//! | `parallel` | Per-unit shortest-path trees on Rayon's thread pool.   |

pub mod builder;
pub mod error;
pub mod fleet;
pub mod generator;
pub mod observer;
pub mod sim;
pub mod state;
pub mod stats;


pub use builder::{Placement, SimBuilder};
pub use error::{SimError, SimResult};
pub use fleet::{CommandSink, CycleReport, FleetState};
pub use generator::RequestGenerator;
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
pub use state::{ActiveRequest, FilledRequest, RequestStatus, UnitState};
pub use stats::FleetStats;
