//! `tg-gen` — topology generation orchestrator for the rust_tg workspace.
//!
//! # Pipeline
//!
//! ```text
//! GeometryParameters
//!   ① NodeBuilder        interior + boundary nodes
//!   ② EdgeBuilder        corridor, side-street and end edges
//!   ③ ConnectionBuilder  per-intersection movements with signal groups
//!      ConflictMatrix    derived or supplied, then checked
//!   ④ RoutePolicy        candidate paths → RouteTable::validate
//!   ⑤ Seeding            traffic-light programs, placements, inflows
//!   ⑥ Topology           indexed, then the global integrity pass
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | `generate_batch` runs on Rayon's thread pool.          |
//! | `fx-hash`  | FxHash instead of SipHash for identifier indices.      |
//! | `serde`    | Serde derives on placements and inflows.               |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use tg_core::GeometryParameters;
//! use tg_gen::TopologyGenerator;
//!
//! let topo = TopologyGenerator::new(GeometryParameters::default()).generate()?;
//! assert_eq!(topo.edges().len(), 18);
//! ```

pub mod generator;
pub mod placement;
pub mod topology;


pub use generator::{generate_batch, generate_batch_with, TopologyGenerator};
pub use placement::{initial_placements, DepartLane, Inflow, InflowSpec, Placement};
pub use topology::{AttachedProgram, Topology};
