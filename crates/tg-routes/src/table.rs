//! The validated route table.
//!
//! Rows are grouped by entry edge in first-seen order.  For each group the
//! table guarantees:
//!
//! - every entry edge runs from a boundary node into the network,
//! - every path starts at its entry edge, every edge exists, and the last
//!   edge ends at a boundary node,
//! - consecutive edges are contiguous (`to` of edge k is `from` of edge k+1),
//! - every transition is a permitted connection at the shared node,
//! - every probability lies in `(0, 1]` and the group sums to 1 within
//!   [`WEIGHT_TOLERANCE`].

use rand::distributions::{Distribution, WeightedIndex};

use tg_core::{EdgeId, NodeId, RouteRng, TopologyError, TopologyResult};
use tg_network::{ConnectionSet, Edge, EdgeSet, NodeKind, NodeSet};

/// Allowed deviation of a per-entry probability sum from 1.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// One weighted candidate path from an entry edge to an exit.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteEntry {
    pub entry:       EdgeId,
    /// Full path, starting with `entry`.
    pub edges:       Vec<EdgeId>,
    pub probability: f64,
}

impl RouteEntry {
    pub fn new(entry: EdgeId, edges: Vec<EdgeId>, probability: f64) -> Self {
        Self { entry, edges, probability }
    }

    /// Final edge of the path.
    pub fn exit(&self) -> Option<EdgeId> {
        self.edges.last().copied()
    }
}

/// All routes of one entry edge.
#[derive(Clone, Debug, PartialEq)]
pub struct EntryRoutes {
    pub entry:  EdgeId,
    pub routes: Vec<RouteEntry>,
}

/// Routes grouped by entry edge.  Construct with [`RouteTable::validate`].
#[derive(Clone, Debug, PartialEq, Default)]
pub struct RouteTable {
    groups: Vec<EntryRoutes>,
}

impl RouteTable {
    /// Group `candidates` by entry and check every guarantee listed in the
    /// module docs, failing on the first violation.
    pub fn validate(
        candidates:  Vec<RouteEntry>,
        nodes:       &NodeSet,
        edges:       &EdgeSet,
        connections: &ConnectionSet,
    ) -> TopologyResult<RouteTable> {
        let mut groups: Vec<EntryRoutes> = Vec::new();
        for r in candidates {
            match groups.iter_mut().find(|g| g.entry == r.entry) {
                Some(g) => g.routes.push(r),
                None => groups.push(EntryRoutes { entry: r.entry, routes: vec![r] }),
            }
        }

        for g in &groups {
            let entry = edge_name(edges, g.entry)?;
            if !is_boundary(nodes, edges, g.entry, |e| e.from) {
                return Err(TopologyError::NotEntry(entry));
            }
            for (i, r) in g.routes.iter().enumerate() {
                check_path(&entry, i, r, nodes, edges, connections)?;
                if !(r.probability > 0.0 && r.probability <= 1.0) {
                    return Err(TopologyError::Probability { entry, route: i, p: r.probability });
                }
            }
            let sum: f64 = g.routes.iter().map(|r| r.probability).sum();
            if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
                return Err(TopologyError::RouteWeight { entry, sum });
            }
        }

        Ok(RouteTable { groups })
    }

    /// Number of route rows across all entries.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.routes.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Entry edges in table order.
    pub fn entries(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.groups.iter().map(|g| g.entry)
    }

    pub fn groups(&self) -> &[EntryRoutes] {
        &self.groups
    }

    pub fn routes_for(&self, entry: EdgeId) -> Option<&[RouteEntry]> {
        self.groups
            .iter()
            .find(|g| g.entry == entry)
            .map(|g| g.routes.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> + '_ {
        self.groups.iter().flat_map(|g| g.routes.iter())
    }

    /// Draw one route for a vehicle inserted on `entry`, by weight.
    ///
    /// Returns `None` if `entry` has no routes.
    pub fn sample(&self, entry: EdgeId, rng: &mut RouteRng) -> Option<&RouteEntry> {
        let routes = self.routes_for(entry)?;
        let dist = WeightedIndex::new(routes.iter().map(|r| r.probability)).ok()?;
        routes.get(dist.sample(rng.inner()))
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn edge_name(edges: &EdgeSet, id: EdgeId) -> TopologyResult<String> {
    edges
        .get(id)
        .map(|e| e.id.clone())
        .ok_or_else(|| TopologyError::MissingEdge(id.to_string()))
}

fn check_path(
    entry:       &str,
    route:       usize,
    r:           &RouteEntry,
    nodes:       &NodeSet,
    edges:       &EdgeSet,
    connections: &ConnectionSet,
) -> TopologyResult<()> {
    if r.edges.first() != Some(&r.entry) {
        return Err(TopologyError::Config(format!(
            "route {route} of entry {entry:?} does not start at its entry edge"
        )));
    }
    for pair in r.edges.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let ea = edges.get(a).ok_or_else(|| TopologyError::MissingEdge(a.to_string()))?;
        let eb = edges.get(b).ok_or_else(|| TopologyError::MissingEdge(b.to_string()))?;
        if ea.to != eb.from {
            return Err(TopologyError::Discontiguous {
                entry: entry.to_owned(),
                route,
                from:  ea.id.clone(),
                to:    eb.id.clone(),
            });
        }
        if !connections.permits(ea.to, a, b) {
            let node = nodes.resolve(ea.to)?.id.clone();
            return Err(TopologyError::MissingMovement { node, from: ea.id.clone(), to: eb.id.clone() });
        }
    }
    if let Some(&last) = r.edges.last() {
        let edge = edge_name(edges, last)?;
        if !is_boundary(nodes, edges, last, |e| e.to) {
            return Err(TopologyError::NotExit { entry: entry.to_owned(), route, edge });
        }
    }
    Ok(())
}

/// Whether the endpoint of `id` picked by `end` is a boundary node.
fn is_boundary(nodes: &NodeSet, edges: &EdgeSet, id: EdgeId, end: impl Fn(&Edge) -> NodeId) -> bool {
    edges
        .get(id)
        .and_then(|e| nodes.get(end(e)))
        .is_some_and(|n| n.kind == NodeKind::Boundary)
}
