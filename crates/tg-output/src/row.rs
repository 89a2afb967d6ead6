//! Plain data row types written by output backends.
//!
//! Field names follow the traffic engine's network-file attributes
//! (`numLanes`, `fromLane`, `toLane`, `type`, …) so the exported tables can
//! be fed to it without renaming.

use serde::Serialize;

/// A row type with a fixed table name and column order.
pub trait Row: Serialize {
    /// Table name; the CSV backend appends `.csv`.
    const TABLE: &'static str;
    /// Column names in serialisation order.
    const HEADER: &'static [&'static str];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRow {
    pub id:     String,
    pub x:      f64,
    pub y:      f64,
    /// `traffic_light` or `priority`.
    #[serde(rename = "type")]
    pub kind:   &'static str,
    /// Empty for boundary nodes.
    pub radius: Option<f64>,
}

impl Row for NodeRow {
    const TABLE: &'static str = "nodes";
    const HEADER: &'static [&'static str] = &["id", "x", "y", "type", "radius"];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeRow {
    pub id:        String,
    pub from:      String,
    pub to:        String,
    pub length:    f64,
    pub lane:      u8,
    pub priority:  i32,
    #[serde(rename = "numLanes")]
    pub num_lanes: u8,
    pub speed:     f64,
}

impl Row for EdgeRow {
    const TABLE: &'static str = "edges";
    const HEADER: &'static [&'static str] =
        &["id", "from", "to", "length", "lane", "priority", "numLanes", "speed"];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionRow {
    /// Interior node the movement belongs to.
    pub node:         String,
    pub from:         String,
    pub to:           String,
    #[serde(rename = "fromLane")]
    pub from_lane:    u8,
    #[serde(rename = "toLane")]
    pub to_lane:      u8,
    pub signal_group: u8,
}

impl Row for ConnectionRow {
    const TABLE: &'static str = "connections";
    const HEADER: &'static [&'static str] =
        &["node", "from", "to", "fromLane", "toLane", "signal_group"];
}

/// Same layout the route loader reads, so exported tables load back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRow {
    pub entry:       String,
    pub route:       u32,
    /// Space-separated edge identifiers, entry edge first.
    pub edges:       String,
    pub probability: f64,
}

impl Row for RouteRow {
    const TABLE: &'static str = "routes";
    const HEADER: &'static [&'static str] = &["entry", "route", "edges", "probability"];
}

/// One phase of one traffic-light program.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseRow {
    pub node:       String,
    pub program_id: u32,
    pub tls_type:   &'static str,
    pub phase:      u32,
    pub duration:   u32,
    pub min_dur:    u32,
    pub max_dur:    u32,
    pub state:      String,
}

impl Row for PhaseRow {
    const TABLE: &'static str = "programs";
    const HEADER: &'static [&'static str] =
        &["node", "program_id", "tls_type", "phase", "duration", "min_dur", "max_dur", "state"];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementRow {
    pub edge:   String,
    pub lane:   u8,
    pub offset: f64,
}

impl Row for PlacementRow {
    const TABLE: &'static str = "placements";
    const HEADER: &'static [&'static str] = &["edge", "lane", "offset"];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InflowRow {
    pub edge:         String,
    pub vehicle_type: String,
    pub probability:  f64,
    pub depart_lane:  String,
    pub depart_speed: f64,
}

impl Row for InflowRow {
    const TABLE: &'static str = "inflows";
    const HEADER: &'static [&'static str] =
        &["edge", "vehicle_type", "probability", "depart_lane", "depart_speed"];
}
