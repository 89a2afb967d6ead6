//! Interior and boundary node synthesis.
//!
//! # Layout
//!
//! ```text
//!   y = L          out1      out2     ...    out{n}
//!                   |         |                |
//!   y = 0  out0 -- inner0 -- inner1 -- ... -- inner{n-1} -- out{n+1}
//!          x=0      x=L       x=2L             x=nL          x=(n+1)L
//! ```
//!
//! `NodeId`s are assigned sequentially: interior nodes first
//! (`NodeId(0) .. NodeId(n)`), then boundary nodes in `out{k}` order.

use tracing::debug;

use tg_core::{GeometryParameters, NodeId, Point, TopologyError, TopologyResult};

// ── Node ──────────────────────────────────────────────────────────────────────

/// Control type shared by every interior node of one topology.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InteriorControl {
    /// Signal-controlled; may carry a traffic-light program.
    TrafficLight,
    /// Right-of-way by priority rules.
    Priority,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    Interior(InteriorControl),
    Boundary,
}

/// One network node as handed to the engine.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    /// Engine identifier: `inner{i}` or `out{k}`.
    pub id:     String,
    pub pos:    Point,
    pub kind:   NodeKind,
    /// Junction radius; interior nodes only.
    pub radius: Option<f64>,
}

impl Node {
    #[inline]
    pub fn is_interior(&self) -> bool {
        matches!(self.kind, NodeKind::Interior(_))
    }

    #[inline]
    pub fn is_signalled(&self) -> bool {
        self.kind == NodeKind::Interior(InteriorControl::TrafficLight)
    }

    /// Junction type string in the engine's node format.
    pub fn engine_type(&self) -> &'static str {
        match self.kind {
            NodeKind::Interior(InteriorControl::TrafficLight) => "traffic_light",
            NodeKind::Interior(InteriorControl::Priority) | NodeKind::Boundary => "priority",
        }
    }
}

// ── NodeSet ───────────────────────────────────────────────────────────────────

/// Output of [`NodeBuilder`]: every node, indexed by `NodeId`.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSet {
    pub nodes:    Vec<Node>,
    /// Interior nodes in corridor order (west to east).
    pub interior: Vec<NodeId>,
    /// Boundary nodes in `out{k}` order.
    pub boundary: Vec<NodeId>,
}

impl NodeSet {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Like [`get`](Self::get) but fails with `MissingNode` naming the handle.
    pub fn resolve(&self, id: NodeId) -> TopologyResult<&Node> {
        self.get(id)
            .ok_or_else(|| TopologyError::MissingNode(id.to_string()))
    }

    /// Linear lookup by engine identifier.  Node counts are small; the
    /// generated topology keeps a hashed index for repeated lookups.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.id == name)
            .map(|i| NodeId(i as u32))
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }
}

// ── NodeBuilder ───────────────────────────────────────────────────────────────

/// Derives the interior and boundary nodes from [`GeometryParameters`].
///
/// # Example
///
/// ```
/// use tg_core::GeometryParameters;
/// use tg_network::NodeBuilder;
///
/// let nodes = NodeBuilder::new(&GeometryParameters::default()).build().unwrap();
/// assert_eq!(nodes.interior.len(), 4);
/// assert_eq!(nodes.boundary.len(), 6);
/// ```
pub struct NodeBuilder<'a> {
    params: &'a GeometryParameters,
}

impl<'a> NodeBuilder<'a> {
    pub fn new(params: &'a GeometryParameters) -> Self {
        Self { params }
    }

    pub fn build(self) -> TopologyResult<NodeSet> {
        let p = self.params;
        if p.interior_count == 0 {
            return Err(TopologyError::Config(
                "interior_count must be at least 1, got 0".into(),
            ));
        }
        if !(p.section_length.is_finite() && p.section_length > 0.0) {
            return Err(TopologyError::Config(format!(
                "section_length must be a positive number, got {}",
                p.section_length
            )));
        }

        let n = p.interior_count as usize;
        let l = p.section_length;
        let control = if p.traffic_lights {
            InteriorControl::TrafficLight
        } else {
            InteriorControl::Priority
        };

        let mut nodes = Vec::with_capacity(2 * n + 2);

        for i in 0..n {
            nodes.push(Node {
                id:     format!("inner{i}"),
                pos:    Point::new((i + 1) as f64 * l, 0.0),
                kind:   NodeKind::Interior(control),
                radius: Some(p.inner_radius),
            });
        }

        // West end, one above each interior node, east end.
        let mut boundary_pos = Vec::with_capacity(n + 2);
        boundary_pos.push(Point::new(0.0, 0.0));
        for k in 1..=n {
            boundary_pos.push(Point::new(k as f64 * l, l));
        }
        boundary_pos.push(Point::new((n + 1) as f64 * l, 0.0));

        for (k, pos) in boundary_pos.into_iter().enumerate() {
            nodes.push(Node {
                id:     format!("out{k}"),
                pos,
                kind:   NodeKind::Boundary,
                radius: None,
            });
        }

        let interior = (0..n).map(node_id).collect::<TopologyResult<_>>()?;
        let boundary = (n..nodes.len()).map(node_id).collect::<TopologyResult<_>>()?;

        debug!(interior = n, boundary = n + 2, "built nodes");
        Ok(NodeSet { nodes, interior, boundary })
    }
}

fn node_id(i: usize) -> TopologyResult<NodeId> {
    NodeId::try_from(i).map_err(|_| TopologyError::Config(format!("node index {i} exceeds the id range")))
}
