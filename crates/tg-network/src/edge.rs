//! Directed edge synthesis.
//!
//! # Naming
//!
//! Identifiers are `inner{i}_{d}` for the segment between `inner{i}` and
//! `inner{i+1}`, and `out{k}_{d}` for the segment between boundary node
//! `out{k}` and the interior node it attaches to.  The suffix `d` is the
//! travel direction: 0 for rightward/downward, 1 for leftward/upward.  It is
//! exported as the edge's `lane` field.
//!
//! # Boundary attachment
//!
//! Each boundary node is attached to its nearest interior node.  An R-tree
//! (via `rstar`) over the interior positions answers the query; the
//! attachment side (west, north, east) follows from the relative position.

use std::collections::HashMap;

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use tracing::debug;

use tg_core::{EdgeId, GeometryParameters, NodeId, Point, TopologyError, TopologyResult};

use crate::node::NodeSet;

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct InteriorEntry {
    point: [f64; 2],
    slot:  usize,
}

impl RTreeObject for InteriorEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for InteriorEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Edge ──────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Along the corridor.
    Horizontal,
    /// Side street.
    Vertical,
}

/// One directed road segment.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub id:          String,
    pub from:        NodeId,
    pub to:          NodeId,
    pub length:      f64,
    /// Direction suffix of `id`; see the module docs.
    pub lane:        u8,
    pub priority:    i32,
    /// Lanes in this direction.
    pub num_lanes:   u8,
    /// Speed limit, m/s.
    pub speed:       f64,
    pub orientation: Orientation,
}

// ── Approaches ────────────────────────────────────────────────────────────────

/// The side of an interior node a road arrives from.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Approach {
    West,
    North,
    East,
}

impl Approach {
    pub const ALL: [Approach; 3] = [Approach::West, Approach::North, Approach::East];

    pub fn as_str(self) -> &'static str {
        match self {
            Approach::West  => "west",
            Approach::North => "north",
            Approach::East  => "east",
        }
    }
}

/// The inbound/outbound edge pair on one side of an interior node.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ApproachEdges {
    /// Edge arriving at the interior node.
    pub inbound:  Option<EdgeId>,
    /// Edge leaving the interior node.
    pub outbound: Option<EdgeId>,
}

/// All three approaches of one interior node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Approaches {
    pub node:  NodeId,
    pub west:  ApproachEdges,
    pub north: ApproachEdges,
    pub east:  ApproachEdges,
}

impl Approaches {
    fn new(node: NodeId) -> Self {
        Self {
            node,
            west:  ApproachEdges::default(),
            north: ApproachEdges::default(),
            east:  ApproachEdges::default(),
        }
    }

    pub fn side(&self, a: Approach) -> ApproachEdges {
        match a {
            Approach::West  => self.west,
            Approach::North => self.north,
            Approach::East  => self.east,
        }
    }

    fn side_mut(&mut self, a: Approach) -> &mut ApproachEdges {
        match a {
            Approach::West  => &mut self.west,
            Approach::North => &mut self.north,
            Approach::East  => &mut self.east,
        }
    }
}

// ── EdgeSet ───────────────────────────────────────────────────────────────────

/// Output of [`EdgeBuilder`]: every edge indexed by `EdgeId`, a name index,
/// and the approach table consumed by the connection stage.
#[derive(Clone, Debug)]
pub struct EdgeSet {
    pub edges:      Vec<Edge>,
    /// Indexed by interior position (`inner{i}` → `approaches[i]`).
    pub approaches: Vec<Approaches>,
    by_name:        HashMap<String, EdgeId>,
}

impl EdgeSet {
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    #[inline]
    pub fn get(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index())
    }

    /// Look up an edge by engine identifier.
    pub fn lookup(&self, name: &str) -> Option<EdgeId> {
        self.by_name.get(name).copied()
    }

    /// Like [`lookup`](Self::lookup) but fails with `MissingEdge` naming `name`.
    pub fn resolve(&self, name: &str) -> TopologyResult<EdgeId> {
        self.lookup(name)
            .ok_or_else(|| TopologyError::MissingEdge(name.to_owned()))
    }

    /// Engine identifier of `id`, or its handle's display form if unknown.
    pub fn name(&self, id: EdgeId) -> String {
        self.get(id)
            .map(|e| e.id.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn iter(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeId(i as u32), e))
    }

    /// Edges leaving `node`, in `EdgeId` order.
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.iter().filter(move |(_, e)| e.from == node).map(|(id, _)| id)
    }

    /// Edges arriving at `node`, in `EdgeId` order.
    pub fn in_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.iter().filter(move |(_, e)| e.to == node).map(|(id, _)| id)
    }

    /// Approach table of the interior node `node`, if it is one.
    pub fn approaches_of(&self, node: NodeId) -> Option<&Approaches> {
        self.approaches.iter().find(|a| a.node == node)
    }
}

// ── EdgeBuilder ───────────────────────────────────────────────────────────────

/// Derives the directed edges joining the nodes of a [`NodeSet`].
pub struct EdgeBuilder<'a> {
    params: &'a GeometryParameters,
    nodes:  &'a NodeSet,
}

struct RawEdge {
    name:        String,
    from:        NodeId,
    to:          NodeId,
    lane:        u8,
    orientation: Orientation,
}

impl<'a> EdgeBuilder<'a> {
    pub fn new(params: &'a GeometryParameters, nodes: &'a NodeSet) -> Self {
        Self { params, nodes }
    }

    /// Emit inner edges (both directions per adjacent interior pair), then one
    /// inbound/outbound pair per boundary node.
    pub fn build(self) -> TopologyResult<EdgeSet> {
        let nodes = self.nodes;
        let mut raw: Vec<RawEdge> = Vec::with_capacity(4 * nodes.interior.len() + 2);

        // ── Inner edges ───────────────────────────────────────────────────
        for (i, pair) in nodes.interior.windows(2).enumerate() {
            let (a, b) = (pair[0], pair[1]);
            raw.push(self.raw(format!("inner{i}_0"), a, b, Orientation::Horizontal)?);
            raw.push(self.raw(format!("inner{i}_1"), b, a, Orientation::Horizontal)?);
        }

        // ── Outer edges ───────────────────────────────────────────────────
        let tree = RTree::bulk_load(
            nodes
                .interior
                .iter()
                .enumerate()
                .map(|(slot, &id)| {
                    let pos = nodes.resolve(id)?.pos;
                    Ok(InteriorEntry { point: [pos.x, pos.y], slot })
                })
                .collect::<TopologyResult<Vec<_>>>()?,
        );

        for (k, &out) in nodes.boundary.iter().enumerate() {
            let pos = nodes.resolve(out)?.pos;
            let Some(nearest) = tree.nearest_neighbor(&[pos.x, pos.y]) else {
                return Err(TopologyError::Config("network has no interior nodes".into()));
            };
            let inner = nodes.interior[nearest.slot];
            let orientation = if (pos.y - nearest.point[1]).abs() > (pos.x - nearest.point[0]).abs() {
                Orientation::Vertical
            } else {
                Orientation::Horizontal
            };

            // Inbound first, then outbound; the suffix follows travel direction.
            let inbound = direction_suffix(pos, Point::new(nearest.point[0], nearest.point[1]));
            raw.push(self.raw(format!("out{k}_{inbound}"), out, inner, orientation)?);
            raw.push(self.raw(format!("out{k}_{}", 1 - inbound), inner, out, orientation)?);
        }

        // ── Materialise, index, and record approaches ─────────────────────
        let mut edges = Vec::with_capacity(raw.len());
        let mut by_name = HashMap::with_capacity(raw.len());
        let mut approaches: Vec<Approaches> =
            nodes.interior.iter().map(|&n| Approaches::new(n)).collect();

        for (i, r) in raw.into_iter().enumerate() {
            let id = EdgeId::try_from(i)
                .map_err(|_| TopologyError::Config(format!("edge index {i} exceeds the id range")))?;
            if by_name.insert(r.name.clone(), id).is_some() {
                return Err(TopologyError::DuplicateId { what: "edge", id: r.name });
            }

            for (slot, &inner) in nodes.interior.iter().enumerate() {
                if r.to == inner {
                    let side = self.approach_side(inner, r.from)?;
                    set_once(&mut approaches[slot].side_mut(side).inbound, id, nodes, inner, side)?;
                }
                if r.from == inner {
                    let side = self.approach_side(inner, r.to)?;
                    set_once(&mut approaches[slot].side_mut(side).outbound, id, nodes, inner, side)?;
                }
            }

            let (num_lanes, speed) = match r.orientation {
                Orientation::Horizontal => (self.params.horizontal_lanes, self.params.speed_limit.horizontal()),
                Orientation::Vertical   => (self.params.vertical_lanes, self.params.speed_limit.vertical()),
            };
            edges.push(Edge {
                id:          r.name,
                from:        r.from,
                to:          r.to,
                length:      self.params.section_length,
                lane:        r.lane,
                priority:    self.params.edge_priority,
                num_lanes,
                speed,
                orientation: r.orientation,
            });
        }

        debug!(edges = edges.len(), "built edges");
        Ok(EdgeSet { edges, approaches, by_name })
    }

    fn raw(&self, name: String, from: NodeId, to: NodeId, orientation: Orientation) -> TopologyResult<RawEdge> {
        let a = self.nodes.resolve(from)?.pos;
        let b = self.nodes.resolve(to)?.pos;
        Ok(RawEdge { name, from, to, lane: direction_suffix(a, b), orientation })
    }

    /// Side of `inner` on which `other` lies.
    fn approach_side(&self, inner: NodeId, other: NodeId) -> TopologyResult<Approach> {
        let c = self.nodes.resolve(inner)?.pos;
        let o = self.nodes.resolve(other)?.pos;
        let (dx, dy) = (o.x - c.x, o.y - c.y);
        Ok(if dy.abs() > dx.abs() {
            Approach::North
        } else if dx < 0.0 {
            Approach::West
        } else {
            Approach::East
        })
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// 0 for rightward/downward travel, 1 for leftward/upward.
fn direction_suffix(from: Point, to: Point) -> u8 {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    if dx.abs() >= dy.abs() {
        u8::from(dx < 0.0)
    } else {
        u8::from(dy > 0.0)
    }
}

fn set_once(
    slot:  &mut Option<EdgeId>,
    id:    EdgeId,
    nodes: &NodeSet,
    inner: NodeId,
    side:  Approach,
) -> TopologyResult<()> {
    if slot.is_some() {
        let name = nodes.get(inner).map(|n| n.id.as_str()).unwrap_or("?");
        return Err(TopologyError::Config(format!(
            "node {name:?} has more than one {} approach",
            side.as_str()
        )));
    }
    *slot = Some(id);
    Ok(())
}
