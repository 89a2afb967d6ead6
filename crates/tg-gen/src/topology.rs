//! The immutable generation result.
//!
//! A [`Topology`] is only ever produced by
//! [`TopologyGenerator::generate`](crate::TopologyGenerator::generate), which
//! runs the global integrity pass before handing it out.  There is no way to
//! mutate it afterwards, so every cross-reference checked at construction
//! stays valid for its lifetime.

use tg_core::{EdgeId, GeometryParameters, NodeId, TopologyError, TopologyResult};
use tg_network::{ConflictMatrix, ConnectionSet, Edge, EdgeSet, Node, NodeSet, TrafficLightProgram};
use tg_routes::{RouteEntry, RouteTable};

use crate::placement::{Inflow, Placement};

#[cfg(feature = "fx-hash")]
type IdIndex<V> = rustc_hash::FxHashMap<String, V>;
#[cfg(not(feature = "fx-hash"))]
type IdIndex<V> = std::collections::HashMap<String, V>;

/// A traffic-light program bound to its interior node.
#[derive(Clone, Debug, PartialEq)]
pub struct AttachedProgram {
    pub node:    NodeId,
    pub program: TrafficLightProgram,
}

/// Everything the generator produced, before indexing and the integrity pass.
pub(crate) struct TopologyParts {
    pub params:      GeometryParameters,
    pub policy:      &'static str,
    pub nodes:       NodeSet,
    pub edges:       EdgeSet,
    pub connections: ConnectionSet,
    pub conflicts:   ConflictMatrix,
    pub routes:      RouteTable,
    pub programs:    Vec<AttachedProgram>,
    pub placements:  Vec<Placement>,
    pub inflows:     Vec<Inflow>,
}

/// Corridor network plus its route table and vehicle seeding.
///
/// `Send + Sync`; share it freely between threads.
#[derive(Clone, Debug)]
pub struct Topology {
    params:      GeometryParameters,
    policy:      &'static str,
    nodes:       NodeSet,
    edges:       EdgeSet,
    connections: ConnectionSet,
    conflicts:   ConflictMatrix,
    routes:      RouteTable,
    programs:    Vec<AttachedProgram>,
    placements:  Vec<Placement>,
    inflows:     Vec<Inflow>,
    node_index:  IdIndex<NodeId>,
    edge_index:  IdIndex<EdgeId>,
}

impl Topology {
    /// Index the parts and run the integrity pass.
    pub(crate) fn assemble(parts: TopologyParts) -> TopologyResult<Topology> {
        let mut node_index = IdIndex::default();
        for (id, node) in parts.nodes.iter() {
            if node_index.insert(node.id.clone(), id).is_some() {
                return Err(TopologyError::DuplicateId { what: "node", id: node.id.clone() });
            }
        }
        let mut edge_index = IdIndex::default();
        for (id, edge) in parts.edges.iter() {
            if edge_index.insert(edge.id.clone(), id).is_some() {
                return Err(TopologyError::DuplicateId { what: "edge", id: edge.id.clone() });
            }
        }

        let topo = Topology {
            params: parts.params,
            policy: parts.policy,
            nodes: parts.nodes,
            edges: parts.edges,
            connections: parts.connections,
            conflicts: parts.conflicts,
            routes: parts.routes,
            programs: parts.programs,
            placements: parts.placements,
            inflows: parts.inflows,
            node_index,
            edge_index,
        };
        topo.check_integrity()?;
        Ok(topo)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn params(&self) -> &GeometryParameters {
        &self.params
    }

    /// Name of the route policy that produced the table.
    pub fn route_policy(&self) -> &'static str {
        self.policy
    }

    pub fn nodes(&self) -> &NodeSet {
        &self.nodes
    }

    pub fn edges(&self) -> &EdgeSet {
        &self.edges
    }

    pub fn connections(&self) -> &ConnectionSet {
        &self.connections
    }

    pub fn conflicts(&self) -> &ConflictMatrix {
        &self.conflicts
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn programs(&self) -> &[AttachedProgram] {
        &self.programs
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn inflows(&self) -> &[Inflow] {
        &self.inflows
    }

    // ── Lookup by identifier ──────────────────────────────────────────────

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.node_index.get(name).copied()
    }

    pub fn edge_id(&self, name: &str) -> Option<EdgeId> {
        self.edge_index.get(name).copied()
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.node_id(name).and_then(|id| self.nodes.get(id))
    }

    pub fn edge(&self, name: &str) -> Option<&Edge> {
        self.edge_id(name).and_then(|id| self.edges.get(id))
    }

    /// Routes of the entry edge called `name`.
    pub fn routes_from(&self, name: &str) -> Option<&[RouteEntry]> {
        self.edge_id(name).and_then(|id| self.routes.routes_for(id))
    }

    pub fn program_for(&self, node: NodeId) -> Option<&TrafficLightProgram> {
        self.programs.iter().find(|p| p.node == node).map(|p| &p.program)
    }

    // ── Integrity ─────────────────────────────────────────────────────────

    /// Cross-check every reference between the parts, failing on the first
    /// dangling one.
    fn check_integrity(&self) -> TopologyResult<()> {
        for (_, e) in self.edges.iter() {
            for end in [e.from, e.to] {
                if self.nodes.get(end).is_none() {
                    return Err(TopologyError::MissingNode(format!("{end} (endpoint of edge {})", e.id)));
                }
            }
        }

        for (node, c) in self.connections.iter() {
            let owner = self.nodes.resolve(node)?;
            if !owner.is_interior() {
                return Err(TopologyError::Config(format!(
                    "connections declared at boundary node {:?}",
                    owner.id
                )));
            }
            let from = self.edge_by_id(c.from)?;
            let to = self.edge_by_id(c.to)?;
            if from.to != node {
                return Err(TopologyError::NotIncident { edge: from.id.clone(), node: owner.id.clone() });
            }
            if to.from != node {
                return Err(TopologyError::NotIncident { edge: to.id.clone(), node: owner.id.clone() });
            }
            if c.from_lane >= from.num_lanes || c.to_lane >= to.num_lanes {
                return Err(TopologyError::Config(format!(
                    "connection {} → {} at {:?} uses lane {} → {} beyond the edge lane count",
                    from.id, to.id, owner.id, c.from_lane, c.to_lane
                )));
            }
        }

        for r in self.routes.iter() {
            for &e in &r.edges {
                self.edge_by_id(e)?;
            }
        }

        let mut seen: Vec<NodeId> = Vec::with_capacity(self.programs.len());
        for p in &self.programs {
            let node = self.nodes.resolve(p.node)?;
            if !node.is_signalled() {
                return Err(TopologyError::Config(format!(
                    "traffic-light program attached to non-signalled node {:?}",
                    node.id
                )));
            }
            if seen.contains(&p.node) {
                return Err(TopologyError::DuplicateId { what: "traffic-light program", id: node.id.clone() });
            }
            seen.push(p.node);
        }

        for edge in self.placements.iter().map(|p| p.edge).chain(self.inflows.iter().map(|f| f.edge)) {
            if self.routes.routes_for(edge).is_none() {
                let name = self.edge_by_id(edge)?.id.clone();
                return Err(TopologyError::Config(format!("vehicles seeded on {name:?}, which has no routes")));
            }
        }

        Ok(())
    }

    fn edge_by_id(&self, id: EdgeId) -> TopologyResult<&Edge> {
        self.edges.get(id).ok_or_else(|| TopologyError::MissingEdge(id.to_string()))
    }
}
