//! `tg-network` — the node, edge, and connection stages of generation.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`node`]       | `Node`, `NodeSet`, `NodeBuilder`                          |
//! | [`edge`]       | `Edge`, `EdgeSet`, `EdgeBuilder`, per-node `Approaches`   |
//! | [`connection`] | `Connection`, `ConnectionSet`, `ConnectionBuilder`        |
//! | [`signal`]     | `SignalGrouping`, `ConflictMatrix`, traffic-light programs|
//!
//! Each stage consumes the typed handles produced by the stage before it;
//! string identifiers exist only for the engine-facing output and for
//! resolving user declarations.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod connection;
pub mod edge;
pub mod node;
pub mod signal;

#[cfg(test)]
mod tests;

pub use connection::{Connection, ConnectionBuilder, ConnectionDecl, ConnectionSet, Movement, NodeConnections};
pub use edge::{Approach, ApproachEdges, Approaches, Edge, EdgeBuilder, EdgeSet, Orientation};
pub use node::{InteriorControl, Node, NodeBuilder, NodeKind, NodeSet};
pub use signal::{ConflictMatrix, Phase, SignalGrouping, TlsType, TrafficLightProgram};
