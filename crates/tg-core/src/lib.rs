//! `tg-core` — foundational types for the `rust_tg` topology generator.
//!
//! This crate is a dependency of every other `tg-*` crate.  It intentionally
//! has no `tg-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                               |
//! |------------|--------------------------------------------------------|
//! | [`ids`]    | `NodeId`, `EdgeId`, `SignalGroup`                      |
//! | [`geo`]    | `Point`, planar distance                               |
//! | [`params`] | `GeometryParameters`, `SpeedLimit`                     |
//! | [`rng`]    | `RouteRng` (seeded path sampling)                      |
//! | [`error`]  | `TopologyError`, `ErrorKind`, `TopologyResult`         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | `Serialize`/`Deserialize` on public types; needed to load `GeometryParameters` from JSON. |

pub mod error;
pub mod geo;
pub mod ids;
pub mod params;
pub mod rng;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{ErrorKind, TopologyError, TopologyResult};
pub use geo::Point;
pub use ids::{EdgeId, NodeId, SignalGroup};
pub use params::{GeometryParameters, SpeedLimit};
pub use rng::RouteRng;
