//! CSV route-table loader.
//!
//! # CSV format
//!
//! One row per candidate path.  `edges` is a space-separated list of edge
//! identifiers starting with the entry edge; `route` orders the paths of one
//! entry and must be unique within it.
//!
//! ```csv
//! entry,route,edges,probability
//! out0_0,0,out0_0 out1_1,0.1
//! out0_0,1,out0_0 inner0_0 out2_1,0.9
//! out5_1,0,out5_1 out4_1,1.0
//! ```
//!
//! Entries keep the order in which they first appear.  The loader only
//! parses; identifiers are resolved and weights checked when the generator
//! validates the table.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use tg_core::{TopologyError, TopologyResult};

use crate::policy::{DeclaredEntry, DeclaredPath, DeclaredRoutes};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RouteRecord {
    entry:       String,
    route:       u32,
    edges:       String,
    probability: f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`DeclaredRoutes`] table from a CSV file.
pub fn load_routes_csv(path: &Path) -> TopologyResult<DeclaredRoutes> {
    let file = std::fs::File::open(path)?;
    load_routes_reader(file)
}

/// Like [`load_routes_csv`] but accepts any `Read` source.
pub fn load_routes_reader<R: Read>(reader: R) -> TopologyResult<DeclaredRoutes> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rows: Vec<(String, Vec<(u32, DeclaredPath)>)> = Vec::new();

    for result in csv_reader.deserialize::<RouteRecord>() {
        let row = result.map_err(|e| TopologyError::Parse(e.to_string()))?;
        let edges: Vec<String> = row.edges.split_whitespace().map(str::to_owned).collect();
        if edges.is_empty() {
            return Err(TopologyError::Parse(format!(
                "route {} of entry {:?} lists no edges",
                row.route, row.entry
            )));
        }
        let path = DeclaredPath { edges, probability: row.probability };

        match rows.iter_mut().find(|(e, _)| *e == row.entry) {
            Some((_, paths)) => {
                if paths.iter().any(|(r, _)| *r == row.route) {
                    return Err(TopologyError::Parse(format!(
                        "duplicate route {} for entry {:?}",
                        row.route, row.entry
                    )));
                }
                paths.push((row.route, path));
            }
            None => rows.push((row.entry, vec![(row.route, path)])),
        }
    }

    let entries = rows
        .into_iter()
        .map(|(entry, mut paths)| {
            paths.sort_by_key(|(r, _)| *r);
            DeclaredEntry {
                entry,
                paths: paths.into_iter().map(|(_, p)| p).collect(),
            }
        })
        .collect();

    Ok(DeclaredRoutes { entries, designed_for: None })
}
