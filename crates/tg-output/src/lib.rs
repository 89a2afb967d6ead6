//! `tg-output` — topology exporters for the rust_tg workspace.
//!
//! Two backends are provided, the second behind a Cargo feature:
//!
//! | Feature   | Backend | Files created                                         |
//! |-----------|---------|-------------------------------------------------------|
//! | *(none)*  | CSV     | `nodes.csv`, `edges.csv`, `connections.csv`, `routes.csv`, `programs.csv`, `placements.csv`, `inflows.csv` |
//! | `sqlite`  | SQLite  | `topology.db`                                         |
//!
//! Both implement [`TopologyWriter`] and are driven by [`export`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use tg_output::{export, CsvWriter};
//!
//! let mut writer = CsvWriter::new(Path::new("./out"))?;
//! export(&topology, &mut writer)?;
//! ```

pub mod csv;
pub mod error;
pub mod export;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use export::export;
pub use row::{ConnectionRow, EdgeRow, InflowRow, NodeRow, PhaseRow, PlacementRow, Row, RouteRow};
pub use writer::TopologyWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
