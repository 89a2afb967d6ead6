//! Signal groups, the conflict matrix, and opaque traffic-light programs.
//!
//! # Grouping
//!
//! | Grouping     | Groups                                   |
//! |--------------|------------------------------------------|
//! | `Shared`     | every movement in group 1                |
//! | `ByApproach` | 1 = from west, 2 = from north, 3 = east  |
//!
//! # Conflicts
//!
//! A [`ConflictMatrix`] declares which groups must never be green together.
//! It is symmetric and irreflexive by construction.  Validation requires
//! that any two connections at one node which merge into the same outgoing
//! edge are either in the same group (resolved by priority within the phase)
//! or in groups the matrix declares conflicting.
//!
//! Traffic-light programs are carried through untouched: phase state strings
//! are never interpreted here.

use tg_core::{NodeId, SignalGroup, TopologyError, TopologyResult};

use crate::connection::{ConnectionSet, Movement};
use crate::edge::{Approach, EdgeSet};
use crate::node::NodeSet;

// ── SignalGrouping ────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SignalGrouping {
    #[default]
    Shared,
    ByApproach,
}

impl SignalGrouping {
    pub fn group_for(self, m: Movement) -> SignalGroup {
        match self {
            SignalGrouping::Shared => SignalGroup::SHARED,
            SignalGrouping::ByApproach => match m.from {
                Approach::West  => SignalGroup(1),
                Approach::North => SignalGroup(2),
                Approach::East  => SignalGroup(3),
            },
        }
    }

    /// Number of groups this grouping assigns.
    pub fn group_count(self) -> u8 {
        match self {
            SignalGrouping::Shared => 1,
            SignalGrouping::ByApproach => 3,
        }
    }
}

// ── ConflictMatrix ────────────────────────────────────────────────────────────

/// Symmetric, irreflexive conflict relation over groups `1..=size`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConflictMatrix {
    size: u8,
    bits: Vec<bool>,
}

impl ConflictMatrix {
    /// Matrix over groups `1..=size` with no conflicts declared.
    pub fn new(size: u8) -> Self {
        let n = size as usize;
        Self { size, bits: vec![false; n * n] }
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    #[inline]
    pub fn contains(&self, g: SignalGroup) -> bool {
        g.0 >= 1 && g.0 <= self.size
    }

    /// Declare `a` and `b` mutually exclusive.
    pub fn declare(&mut self, a: SignalGroup, b: SignalGroup) -> TopologyResult<()> {
        for g in [a, b] {
            if !self.contains(g) {
                return Err(TopologyError::Config(format!(
                    "{g} is outside the conflict matrix (groups 1..={})",
                    self.size
                )));
            }
        }
        if a == b {
            return Err(TopologyError::Config(format!("{a} cannot conflict with itself")));
        }
        let (i, j) = (self.slot(a), self.slot(b));
        let n = self.size as usize;
        self.bits[i * n + j] = true;
        self.bits[j * n + i] = true;
        Ok(())
    }

    /// Builder-style [`declare`](Self::declare).
    pub fn with_conflict(mut self, a: SignalGroup, b: SignalGroup) -> TopologyResult<Self> {
        self.declare(a, b)?;
        Ok(self)
    }

    pub fn conflicts(&self, a: SignalGroup, b: SignalGroup) -> bool {
        if !self.contains(a) || !self.contains(b) {
            return false;
        }
        self.bits[self.slot(a) * self.size as usize + self.slot(b)]
    }

    /// Declared conflicting pairs with `a < b`, in ascending order.
    pub fn pairs(&self) -> Vec<(SignalGroup, SignalGroup)> {
        let mut out = Vec::new();
        for a in 1..=self.size {
            for b in (a + 1)..=self.size {
                if self.conflicts(SignalGroup(a), SignalGroup(b)) {
                    out.push((SignalGroup(a), SignalGroup(b)));
                }
            }
        }
        out
    }

    /// The minimal matrix under which `connections` validate: every pair of
    /// distinct groups that merge into a common edge is declared.
    pub fn derive(grouping: SignalGrouping, connections: &ConnectionSet) -> TopologyResult<Self> {
        let size = connections
            .iter()
            .map(|(_, c)| c.signal_group.0)
            .max()
            .unwrap_or(0)
            .max(grouping.group_count());
        let mut m = ConflictMatrix::new(size);
        for nc in &connections.nodes {
            for (i, a) in nc.connections.iter().enumerate() {
                for b in &nc.connections[i + 1..] {
                    if a.to == b.to && a.signal_group != b.signal_group {
                        m.declare(a.signal_group, b.signal_group)?;
                    }
                }
            }
        }
        Ok(m)
    }

    /// Check `connections` against this matrix, failing on the first
    /// undeclared group or undeclared merge conflict.
    pub fn validate(&self, nodes: &NodeSet, edges: &EdgeSet, connections: &ConnectionSet) -> TopologyResult<()> {
        for (_, c) in connections.iter() {
            if !self.contains(c.signal_group) {
                return Err(TopologyError::Config(format!(
                    "{} is used by a connection but not declared (groups 1..={})",
                    c.signal_group, self.size
                )));
            }
        }
        for nc in &connections.nodes {
            for (i, a) in nc.connections.iter().enumerate() {
                for b in &nc.connections[i + 1..] {
                    if a.to == b.to
                        && a.signal_group != b.signal_group
                        && !self.conflicts(a.signal_group, b.signal_group)
                    {
                        return Err(TopologyError::UndeclaredConflict {
                            node: node_name(nodes, nc.node),
                            edge: edges.name(a.to),
                            a:    a.signal_group,
                            b:    b.signal_group,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    #[inline]
    fn slot(&self, g: SignalGroup) -> usize {
        (g.0 - 1) as usize
    }
}

// ── Traffic-light programs ────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TlsType {
    #[default]
    Static,
    Actuated,
}

impl TlsType {
    pub fn as_str(self) -> &'static str {
        match self {
            TlsType::Static   => "static",
            TlsType::Actuated => "actuated",
        }
    }
}

/// One signal phase.  `state` is passed to the engine verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Phase {
    pub duration: u32,
    pub min_dur:  u32,
    pub max_dur:  u32,
    pub state:    String,
}

impl Phase {
    pub fn new(duration: u32, min_dur: u32, max_dur: u32, state: &str) -> Self {
        Self { duration, min_dur, max_dur, state: state.to_owned() }
    }
}

/// Phase program for one signal-controlled interior node.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrafficLightProgram {
    /// Engine identifier of the interior node.
    pub node:       String,
    pub program_id: u32,
    pub tls_type:   TlsType,
    pub phases:     Vec<Phase>,
}

impl TrafficLightProgram {
    pub fn new(node: &str, program_id: u32, tls_type: TlsType, phases: Vec<Phase>) -> Self {
        Self { node: node.to_owned(), program_id, tls_type, phases }
    }

    /// The corridor's two-direction cycle: main street green, amber, side
    /// street green, amber.
    pub fn corridor_phases() -> Vec<Phase> {
        vec![
            Phase::new(31, 8, 45, "rrGGGG"),
            Phase::new(6, 3, 6, "rryyyy"),
            Phase::new(31, 8, 45, "GGrrrr"),
            Phase::new(6, 3, 6, "yyrrrr"),
        ]
    }

    /// Resolve the target node, which must be a signal-controlled interior
    /// node, and sanity-check phase durations.
    pub fn attach(&self, nodes: &NodeSet) -> TopologyResult<NodeId> {
        let id = nodes
            .find(&self.node)
            .ok_or_else(|| TopologyError::MissingNode(self.node.clone()))?;
        let node = nodes.resolve(id)?;
        if !node.is_signalled() {
            return Err(TopologyError::Config(format!(
                "traffic-light program {} targets {:?}, which is not signal-controlled",
                self.program_id, self.node
            )));
        }
        if self.phases.is_empty() {
            return Err(TopologyError::Config(format!(
                "traffic-light program {} for {:?} has no phases",
                self.program_id, self.node
            )));
        }
        for (i, p) in self.phases.iter().enumerate() {
            if p.duration == 0 || p.min_dur > p.duration || p.duration > p.max_dur {
                return Err(TopologyError::Config(format!(
                    "phase {i} of {:?}: expected min_dur <= duration <= max_dur with duration > 0, got {}/{}/{}",
                    self.node, p.min_dur, p.duration, p.max_dur
                )));
            }
        }
        Ok(id)
    }
}

fn node_name(nodes: &NodeSet, id: NodeId) -> String {
    nodes
        .get(id)
        .map(|n| n.id.clone())
        .unwrap_or_else(|| id.to_string())
}
