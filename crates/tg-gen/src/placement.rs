//! Vehicle seeding: pre-placed vehicles and continuous inflows.
//!
//! Both are keyed by entry edge, i.e. the edges that head a route-table
//! group.  A vehicle placed or inserted anywhere else would have no route to
//! follow.

use std::fmt;

use tg_core::{EdgeId, TopologyError, TopologyResult};

// ── Placement ─────────────────────────────────────────────────────────────────

/// A vehicle present at the start of a run.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    pub edge:   EdgeId,
    pub lane:   u8,
    /// Distance from the upstream end of `edge`, in metres.
    pub offset: f64,
}

/// One vehicle per entry edge, lane 0, at the upstream end.
pub fn initial_placements(entries: impl IntoIterator<Item = EdgeId>) -> Vec<Placement> {
    entries
        .into_iter()
        .map(|edge| Placement { edge, lane: 0, offset: 0.0 })
        .collect()
}

// ── Inflow ────────────────────────────────────────────────────────────────────

/// Lane a newly inserted vehicle departs on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DepartLane {
    /// Engine picks the least occupied lane.
    #[default]
    Free,
    Index(u8),
}

impl fmt::Display for DepartLane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepartLane::Free => f.write_str("free"),
            DepartLane::Index(i) => write!(f, "{i}"),
        }
    }
}

/// Inflow template, stamped onto every entry edge by the generator.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InflowSpec {
    pub vehicle_type: String,
    /// Per-second insertion probability.
    pub probability:  f64,
    pub depart_lane:  DepartLane,
    /// Metres per second.
    pub depart_speed: f64,
}

impl Default for InflowSpec {
    fn default() -> Self {
        Self {
            vehicle_type: "human".into(),
            probability:  0.25,
            depart_lane:  DepartLane::Free,
            depart_speed: 20.0,
        }
    }
}

impl InflowSpec {
    pub fn validate(&self) -> TopologyResult<()> {
        if self.vehicle_type.is_empty() {
            return Err(TopologyError::Config("inflow vehicle type must not be empty".into()));
        }
        if !(self.probability > 0.0 && self.probability <= 1.0) {
            return Err(TopologyError::Config(format!(
                "inflow probability must be in (0, 1], got {}",
                self.probability
            )));
        }
        if !(self.depart_speed >= 0.0 && self.depart_speed.is_finite()) {
            return Err(TopologyError::Config(format!(
                "inflow depart speed must be finite and non-negative, got {}",
                self.depart_speed
            )));
        }
        Ok(())
    }

    /// One [`Inflow`] per entry edge.
    pub fn apply(&self, entries: impl IntoIterator<Item = EdgeId>) -> TopologyResult<Vec<Inflow>> {
        self.validate()?;
        Ok(entries
            .into_iter()
            .map(|edge| Inflow {
                edge,
                vehicle_type: self.vehicle_type.clone(),
                probability:  self.probability,
                depart_lane:  self.depart_lane,
                depart_speed: self.depart_speed,
            })
            .collect())
    }
}

/// Continuous vehicle source on one entry edge.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inflow {
    pub edge:         EdgeId,
    pub vehicle_type: String,
    pub probability:  f64,
    pub depart_lane:  DepartLane,
    pub depart_speed: f64,
}
