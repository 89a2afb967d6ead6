//! Route policies: where candidate paths come from.
//!
//! # Pluggability
//!
//! The generator asks a [`RoutePolicy`] for candidate rows and then runs
//! [`RouteTable::validate`](crate::RouteTable::validate) on whatever it
//! returns, so a policy never needs to repeat the integrity checks.
//!
//! | Policy                  | Paths                 | Weights              |
//! |-------------------------|-----------------------|----------------------|
//! | `DeclaredRoutes`        | hand-listed edge ids  | hand-assigned        |
//! | `UniformCorridorRoutes` | corridor walk, all exits | equal per entry   |

use tracing::warn;

use tg_core::{EdgeId, NodeId, TopologyError, TopologyResult};
use tg_network::{EdgeSet, NodeSet};

use crate::table::RouteEntry;

// ── RoutePolicy trait ─────────────────────────────────────────────────────────

/// Source of candidate routes for a generated network.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so one policy can be shared by
/// generators running on different threads.
pub trait RoutePolicy: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// Candidate rows, in table order.
    fn routes(&self, nodes: &NodeSet, edges: &EdgeSet) -> TopologyResult<Vec<RouteEntry>>;
}

// ── DeclaredRoutes ────────────────────────────────────────────────────────────

/// One hand-listed path.  `edges` includes the entry edge.
#[derive(Clone, Debug, PartialEq)]
pub struct DeclaredPath {
    pub edges:       Vec<String>,
    pub probability: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeclaredEntry {
    pub entry: String,
    pub paths: Vec<DeclaredPath>,
}

/// Explicit, designer-controlled route table referring to edges by engine
/// identifier.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct DeclaredRoutes {
    pub entries:      Vec<DeclaredEntry>,
    /// Corridor size the table was written for, if known.
    pub designed_for: Option<u32>,
}

impl DeclaredRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry with its `(path, probability)` list.
    pub fn entry(mut self, entry: &str, paths: Vec<(Vec<&str>, f64)>) -> Self {
        self.entries.push(DeclaredEntry {
            entry: entry.to_owned(),
            paths: paths
                .into_iter()
                .map(|(edges, probability)| DeclaredPath {
                    edges: edges.into_iter().map(str::to_owned).collect(),
                    probability,
                })
                .collect(),
        });
        self
    }

    /// The hand-specified table of the four-intersection corridor.
    ///
    /// Entries `out0_0 … out4_0` favour the far exits (weights 0.1, 0.1,
    /// 0.1, 0.3, 0.4 in exit order); `out5_1` spreads evenly.
    pub fn corridor() -> Self {
        let mut t = DeclaredRoutes::new()
            .entry("out0_0", vec![
                (vec!["out0_0", "out1_1"], 0.1),
                (vec!["out0_0", "inner0_0", "out2_1"], 0.1),
                (vec!["out0_0", "inner0_0", "inner1_0", "out3_1"], 0.1),
                (vec!["out0_0", "inner0_0", "inner1_0", "inner2_0", "out4_1"], 0.3),
                (vec!["out0_0", "inner0_0", "inner1_0", "inner2_0", "out5_0"], 0.4),
            ])
            .entry("out1_0", vec![
                (vec!["out1_0", "out0_1"], 0.1),
                (vec!["out1_0", "inner0_0", "out2_1"], 0.1),
                (vec!["out1_0", "inner0_0", "inner1_0", "out3_1"], 0.1),
                (vec!["out1_0", "inner0_0", "inner1_0", "inner2_0", "out4_1"], 0.3),
                (vec!["out1_0", "inner0_0", "inner1_0", "inner2_0", "out5_0"], 0.4),
            ])
            .entry("out2_0", vec![
                (vec!["out2_0", "inner0_1", "out0_1"], 0.1),
                (vec!["out2_0", "inner0_1", "out1_1"], 0.1),
                (vec!["out2_0", "inner1_0", "out3_1"], 0.1),
                (vec!["out2_0", "inner1_0", "inner2_0", "out4_1"], 0.3),
                (vec!["out2_0", "inner1_0", "inner2_0", "out5_0"], 0.4),
            ])
            .entry("out3_0", vec![
                (vec!["out3_0", "inner1_1", "inner0_1", "out0_1"], 0.1),
                (vec!["out3_0", "inner1_1", "inner0_1", "out1_1"], 0.1),
                (vec!["out3_0", "inner1_1", "out2_1"], 0.1),
                (vec!["out3_0", "inner2_0", "out4_1"], 0.3),
                (vec!["out3_0", "inner2_0", "out5_0"], 0.4),
            ])
            .entry("out4_0", vec![
                (vec!["out4_0", "inner2_1", "inner1_1", "inner0_1", "out0_1"], 0.1),
                (vec!["out4_0", "inner2_1", "inner1_1", "inner0_1", "out1_1"], 0.1),
                (vec!["out4_0", "inner2_1", "inner1_1", "out2_1"], 0.1),
                (vec!["out4_0", "inner2_1", "out3_1"], 0.3),
                (vec!["out4_0", "out5_0"], 0.4),
            ])
            .entry("out5_1", vec![
                (vec!["out5_1", "inner2_1", "inner1_1", "inner0_1", "out0_1"], 0.2),
                (vec!["out5_1", "inner2_1", "inner1_1", "inner0_1", "out1_1"], 0.2),
                (vec!["out5_1", "inner2_1", "inner1_1", "out2_1"], 0.2),
                (vec!["out5_1", "inner2_1", "out3_1"], 0.2),
                (vec!["out5_1", "out4_1"], 0.2),
            ]);
        t.designed_for = Some(4);
        t
    }
}

impl RoutePolicy for DeclaredRoutes {
    fn name(&self) -> &'static str {
        "declared"
    }

    fn routes(&self, nodes: &NodeSet, edges: &EdgeSet) -> TopologyResult<Vec<RouteEntry>> {
        if let Some(n) = self.designed_for {
            if n as usize != nodes.interior.len() {
                warn!(
                    designed_for = n,
                    interior = nodes.interior.len(),
                    "declared route table was written for a different corridor size"
                );
            }
        }

        let mut out = Vec::with_capacity(self.entries.iter().map(|e| e.paths.len()).sum());
        for decl in &self.entries {
            let entry = edges.resolve(&decl.entry)?;
            for path in &decl.paths {
                let ids = path
                    .edges
                    .iter()
                    .map(|name| edges.resolve(name))
                    .collect::<TopologyResult<Vec<_>>>()?;
                out.push(RouteEntry::new(entry, ids, path.probability));
            }
        }
        Ok(out)
    }
}

// ── UniformCorridorRoutes ─────────────────────────────────────────────────────

/// Every boundary entry routed to every other boundary exit with equal
/// weight.  Works for any corridor size; paths are walked along the
/// corridor, so each (entry, exit) pair has exactly one path.
#[derive(Copy, Clone, Debug, Default)]
pub struct UniformCorridorRoutes;

impl RoutePolicy for UniformCorridorRoutes {
    fn name(&self) -> &'static str {
        "uniform-corridor"
    }

    fn routes(&self, nodes: &NodeSet, edges: &EdgeSet) -> TopologyResult<Vec<RouteEntry>> {
        let exits = nodes.boundary.len().saturating_sub(1);
        if exits == 0 {
            return Ok(Vec::new());
        }
        let p = 1.0 / exits as f64;

        let mut out = Vec::with_capacity(nodes.boundary.len() * exits);
        for &origin in &nodes.boundary {
            let entry = boundary_edge(nodes, edges, origin, true)?;
            let start = interior_slot(nodes, edges.get(entry).map(|e| e.to))?;

            for &dest in nodes.boundary.iter().filter(|&&b| b != origin) {
                let exit = boundary_edge(nodes, edges, dest, false)?;
                let end = interior_slot(nodes, edges.get(exit).map(|e| e.from))?;

                let mut path = vec![entry];
                let mut cur = start;
                while cur != end {
                    let a = &edges.approaches[cur];
                    let step = if cur < end { a.east.outbound } else { a.west.outbound };
                    let step = step.ok_or_else(|| {
                        TopologyError::MissingEdge(format!("corridor step from {}", nodes.nodes[nodes.interior[cur].index()].id))
                    })?;
                    path.push(step);
                    cur = if cur < end { cur + 1 } else { cur - 1 };
                }
                path.push(exit);
                out.push(RouteEntry::new(entry, path, p));
            }
        }
        Ok(out)
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// The single inbound (`true`) or outbound edge of a boundary node.
fn boundary_edge(nodes: &NodeSet, edges: &EdgeSet, node: NodeId, inbound: bool) -> TopologyResult<EdgeId> {
    let found = if inbound {
        edges.out_edges(node).next()
    } else {
        edges.in_edges(node).next()
    };
    found.ok_or_else(|| {
        let name = nodes.resolve(node).map(|n| n.id.clone()).unwrap_or_else(|_| node.to_string());
        TopologyError::MissingEdge(format!("{} edge of {name}", if inbound { "entry" } else { "exit" }))
    })
}

fn interior_slot(nodes: &NodeSet, node: Option<NodeId>) -> TopologyResult<usize> {
    let node = node.ok_or_else(|| TopologyError::MissingNode("route endpoint".into()))?;
    nodes
        .interior
        .iter()
        .position(|&n| n == node)
        .ok_or_else(|| TopologyError::Config(format!("{node} is not an interior node")))
}
