//! Structural input for topology generation.
//!
//! # Corridor shape
//!
//! ```text
//!            out1      out2      out3      out4
//!             |         |         |         |
//!   out0 -- inner0 -- inner1 -- inner2 -- inner3 -- out5
//! ```
//!
//! `interior_count` intersections sit on the x axis every `section_length`
//! metres, each with one side street leading to a boundary node above it,
//! plus one boundary node at each end of the corridor.  The default
//! parameters describe the four-intersection corridor shown above.
//!
//! Typically loaded from a JSON file by the application crate (feature
//! `serde`) and passed to the generator.

use crate::{TopologyError, TopologyResult};

// ── SpeedLimit ────────────────────────────────────────────────────────────────

/// Speed limit in m/s, either one value for every edge or split by
/// orientation.
///
/// With `serde`, a bare number deserialises to `Uniform` and an object with
/// `horizontal` / `vertical` keys to `Split`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum SpeedLimit {
    Uniform(f64),
    Split { horizontal: f64, vertical: f64 },
}

impl SpeedLimit {
    /// Limit on corridor (east–west) edges.
    #[inline]
    pub fn horizontal(self) -> f64 {
        match self {
            SpeedLimit::Uniform(v) => v,
            SpeedLimit::Split { horizontal, .. } => horizontal,
        }
    }

    /// Limit on side-street (north–south) edges.
    #[inline]
    pub fn vertical(self) -> f64 {
        match self {
            SpeedLimit::Uniform(v) => v,
            SpeedLimit::Split { vertical, .. } => vertical,
        }
    }
}

impl Default for SpeedLimit {
    fn default() -> Self {
        SpeedLimit::Uniform(35.0)
    }
}

// ── GeometryParameters ────────────────────────────────────────────────────────

/// Validated structural parameters of one corridor network.
///
/// Immutable once handed to the generator; regenerating with different
/// values means building a new topology from scratch.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GeometryParameters {
    /// Number of interior intersections.  Must be at least 1.
    pub interior_count: u32,

    /// Length of every segment and spacing between intersections, metres.
    pub section_length: f64,

    /// Lanes per direction on corridor edges.
    pub horizontal_lanes: u8,

    /// Lanes per direction on side-street edges.
    pub vertical_lanes: u8,

    pub speed_limit: SpeedLimit,

    /// Junction radius of interior nodes, metres.
    pub inner_radius: f64,

    /// `true` tags interior nodes as signal-controlled, `false` as
    /// priority-controlled.
    pub traffic_lights: bool,

    /// Priority value written on every edge.
    pub edge_priority: i32,
}

impl Default for GeometryParameters {
    fn default() -> Self {
        Self {
            interior_count:   4,
            section_length:   100.0,
            horizontal_lanes: 1,
            vertical_lanes:   1,
            speed_limit:      SpeedLimit::default(),
            inner_radius:     6.2,
            traffic_lights:   true,
            edge_priority:    78,
        }
    }
}

impl GeometryParameters {
    /// Parameters for a corridor of `interior_count` intersections spaced
    /// `section_length` apart; everything else at its default.
    pub fn corridor(interior_count: u32, section_length: f64) -> Self {
        Self { interior_count, section_length, ..Self::default() }
    }

    /// Boundary nodes: one above each interior node plus both corridor ends.
    #[inline]
    pub fn boundary_count(&self) -> u32 {
        self.interior_count + 2
    }

    /// Check every structural parameter, failing on the first bad one.
    pub fn validate(&self) -> TopologyResult<()> {
        if self.interior_count == 0 {
            return Err(config("interior_count must be at least 1, got 0"));
        }
        positive("section_length", self.section_length)?;
        if self.horizontal_lanes == 0 {
            return Err(config("horizontal_lanes must be at least 1, got 0"));
        }
        if self.vertical_lanes == 0 {
            return Err(config("vertical_lanes must be at least 1, got 0"));
        }
        positive("horizontal speed limit", self.speed_limit.horizontal())?;
        positive("vertical speed limit", self.speed_limit.vertical())?;
        if !self.inner_radius.is_finite() || self.inner_radius < 0.0 {
            return Err(config(&format!(
                "inner_radius must be a non-negative number, got {}",
                self.inner_radius
            )));
        }
        Ok(())
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn config(msg: &str) -> TopologyError {
    TopologyError::Config(msg.to_owned())
}

fn positive(what: &str, v: f64) -> TopologyResult<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(config(&format!("{what} must be a positive number, got {v}")))
    }
}
