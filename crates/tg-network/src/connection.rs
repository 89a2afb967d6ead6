//! Lane-to-lane movements across interior nodes.
//!
//! Every interior node has three approaches (west, north, east).  The builder
//! emits the six non-U-turn movements between them, once per lane pair, and
//! tags each with the signal group assigned by the configured
//! [`SignalGrouping`].  Extra movements can be declared by engine
//! identifier; those are resolved against the edge set and fail with the
//! missing identifier if they do not resolve.

use tracing::debug;

use tg_core::{EdgeId, NodeId, SignalGroup, TopologyError, TopologyResult};

use crate::edge::{Approach, EdgeSet};
use crate::node::NodeSet;
use crate::signal::SignalGrouping;

// ── Movement ──────────────────────────────────────────────────────────────────

/// A turn from one approach of an interior node to another.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Movement {
    pub from: Approach,
    pub to:   Approach,
}

impl Movement {
    /// All non-U-turn movements of a three-way junction, in emission order.
    pub const ALL: [Movement; 6] = [
        Movement { from: Approach::West,  to: Approach::North },
        Movement { from: Approach::West,  to: Approach::East },
        Movement { from: Approach::North, to: Approach::West },
        Movement { from: Approach::North, to: Approach::East },
        Movement { from: Approach::East,  to: Approach::North },
        Movement { from: Approach::East,  to: Approach::West },
    ];
}

// ── Connection ────────────────────────────────────────────────────────────────

/// One permitted lane-to-lane movement.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Connection {
    pub from:         EdgeId,
    pub to:           EdgeId,
    /// 0-based lane on `from`.
    pub from_lane:    u8,
    /// 0-based lane on `to`.
    pub to_lane:      u8,
    pub signal_group: SignalGroup,
    /// `None` for declared movements that do not map onto an approach pair.
    pub movement:     Option<Movement>,
}

/// An extra movement declared by engine identifiers.
///
/// `lane` is 1-based, as in the engine's connection declarations.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConnectionDecl {
    pub node:         String,
    pub from:         String,
    pub to:           String,
    pub lane:         i32,
    pub signal_group: u8,
}

/// All connections of one interior node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeConnections {
    pub node:        NodeId,
    pub connections: Vec<Connection>,
}

/// Output of [`ConnectionBuilder`], keyed by interior node.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ConnectionSet {
    pub nodes: Vec<NodeConnections>,
}

impl ConnectionSet {
    /// Total number of connections across all nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().map(|n| n.connections.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn for_node(&self, node: NodeId) -> Option<&[Connection]> {
        self.nodes
            .iter()
            .find(|n| n.node == node)
            .map(|n| n.connections.as_slice())
    }

    /// `true` if some lane pair of `from → to` is permitted at `node`.
    pub fn permits(&self, node: NodeId, from: EdgeId, to: EdgeId) -> bool {
        self.for_node(node)
            .is_some_and(|cs| cs.iter().any(|c| c.from == from && c.to == to))
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Connection)> + '_ {
        self.nodes
            .iter()
            .flat_map(|n| n.connections.iter().map(move |c| (n.node, c)))
    }
}

// ── ConnectionBuilder ─────────────────────────────────────────────────────────

/// Derives the connection set from the node and edge stages.
pub struct ConnectionBuilder<'a> {
    nodes:    &'a NodeSet,
    edges:    &'a EdgeSet,
    grouping: SignalGrouping,
    declared: Vec<ConnectionDecl>,
}

impl<'a> ConnectionBuilder<'a> {
    pub fn new(nodes: &'a NodeSet, edges: &'a EdgeSet) -> Self {
        Self {
            nodes,
            edges,
            grouping: SignalGrouping::default(),
            declared: Vec::new(),
        }
    }

    pub fn grouping(mut self, grouping: SignalGrouping) -> Self {
        self.grouping = grouping;
        self
    }

    /// Append movements declared by identifier after the derived ones.
    pub fn declared(mut self, decls: Vec<ConnectionDecl>) -> Self {
        self.declared = decls;
        self
    }

    pub fn build(self) -> TopologyResult<ConnectionSet> {
        let mut set = ConnectionSet::default();

        for approaches in &self.edges.approaches {
            let node = approaches.node;
            let mut connections = Vec::new();

            for m in Movement::ALL {
                let from = approaches.side(m.from).inbound.ok_or_else(|| {
                    missing_approach(self.nodes, node, m.from, "inbound")
                })?;
                let to = approaches.side(m.to).outbound.ok_or_else(|| {
                    missing_approach(self.nodes, node, m.to, "outbound")
                })?;
                let group = self.grouping.group_for(m);
                let lanes = self.lanes_between(from, to)?;
                for lane in 1..=lanes {
                    connections.push(connection(from, to, lane as i32, group, Some(m))?);
                }
            }

            set.nodes.push(NodeConnections { node, connections });
        }

        for decl in &self.declared {
            let (node, conn) = self.resolve(decl)?;
            match set.nodes.iter_mut().find(|n| n.node == node) {
                Some(n) => n.connections.push(conn),
                None => {
                    return Err(TopologyError::Config(format!(
                        "connection declared at {:?}, which is not an interior node",
                        decl.node
                    )));
                }
            }
        }

        debug!(connections = set.len(), grouping = ?self.grouping, "built connections");
        Ok(set)
    }

    fn lanes_between(&self, from: EdgeId, to: EdgeId) -> TopologyResult<u8> {
        let a = self.edge(from)?;
        let b = self.edge(to)?;
        Ok(a.num_lanes.min(b.num_lanes))
    }

    fn edge(&self, id: EdgeId) -> TopologyResult<&crate::Edge> {
        self.edges
            .get(id)
            .ok_or_else(|| TopologyError::MissingEdge(id.to_string()))
    }

    fn resolve(&self, decl: &ConnectionDecl) -> TopologyResult<(NodeId, Connection)> {
        let node = self
            .nodes
            .find(&decl.node)
            .ok_or_else(|| TopologyError::MissingNode(decl.node.clone()))?;
        let from = self.edges.resolve(&decl.from)?;
        let to = self.edges.resolve(&decl.to)?;

        for (id, name) in [(from, &decl.from), (to, &decl.to)] {
            let e = self.edge(id)?;
            if e.from != node && e.to != node {
                return Err(TopologyError::NotIncident { edge: name.clone(), node: decl.node.clone() });
            }
        }

        let movement = self.edges.approaches_of(node).and_then(|a| {
            let side_in = Approach::ALL.into_iter().find(|&s| a.side(s).inbound == Some(from))?;
            let side_out = Approach::ALL.into_iter().find(|&s| a.side(s).outbound == Some(to))?;
            Some(Movement { from: side_in, to: side_out })
        });

        let conn = connection(from, to, decl.lane, SignalGroup(decl.signal_group), movement)?;
        if conn.from_lane >= self.edge(from)?.num_lanes || conn.to_lane >= self.edge(to)?.num_lanes {
            return Err(TopologyError::Config(format!(
                "lane {} exceeds the lane count of {:?} → {:?}",
                decl.lane, decl.from, decl.to
            )));
        }
        Ok((node, conn))
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Build a same-lane connection from a 1-based lane index.
fn connection(
    from:     EdgeId,
    to:       EdgeId,
    lane:     i32,
    group:    SignalGroup,
    movement: Option<Movement>,
) -> TopologyResult<Connection> {
    if lane < 1 || lane > u8::MAX as i32 {
        return Err(TopologyError::Config(format!(
            "connection lane must be a positive 1-based index, got {lane}"
        )));
    }
    if group == SignalGroup::INVALID || group.0 == 0 {
        return Err(TopologyError::Config(format!("{group} is not a valid signal group")));
    }
    let lane0 = (lane - 1) as u8;
    Ok(Connection {
        from,
        to,
        from_lane:    lane0,
        to_lane:      lane0,
        signal_group: group,
        movement,
    })
}

fn missing_approach(nodes: &NodeSet, node: NodeId, side: Approach, dir: &str) -> TopologyError {
    let name = nodes.get(node).map(|n| n.id.as_str()).unwrap_or("?");
    TopologyError::MissingEdge(format!("{dir} {} approach of {name}", side.as_str()))
}
