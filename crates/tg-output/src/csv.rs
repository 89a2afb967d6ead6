//! CSV output backend.
//!
//! Creates one file per table in the configured output directory:
//! `nodes.csv`, `edges.csv`, `connections.csv`, `routes.csv`,
//! `programs.csv`, `placements.csv`, `inflows.csv`.  Headers are written on
//! open, so empty tables still carry their column names.

use std::fs::File;
use std::path::Path;

use csv::{Writer, WriterBuilder};

use crate::row::{ConnectionRow, EdgeRow, InflowRow, NodeRow, PhaseRow, PlacementRow, Row, RouteRow};
use crate::writer::TopologyWriter;
use crate::{OutputError, OutputResult};

/// Writes a topology as a directory of CSV files.
pub struct CsvWriter {
    nodes:       Writer<File>,
    edges:       Writer<File>,
    connections: Writer<File>,
    routes:      Writer<File>,
    programs:    Writer<File>,
    placements:  Writer<File>,
    inflows:     Writer<File>,
    finished:    bool,
}

impl CsvWriter {
    /// Create `dir` if needed, then open (truncating) every table file and
    /// write its header row.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            nodes:       open::<NodeRow>(dir)?,
            edges:       open::<EdgeRow>(dir)?,
            connections: open::<ConnectionRow>(dir)?,
            routes:      open::<RouteRow>(dir)?,
            programs:    open::<PhaseRow>(dir)?,
            placements:  open::<PlacementRow>(dir)?,
            inflows:     open::<InflowRow>(dir)?,
            finished:    false,
        })
    }

    fn check_open(&self) -> OutputResult<()> {
        if self.finished { Err(OutputError::Finished) } else { Ok(()) }
    }
}

fn open<R: Row>(dir: &Path) -> OutputResult<Writer<File>> {
    let mut w = WriterBuilder::new()
        .has_headers(false)
        .from_path(dir.join(format!("{}.csv", R::TABLE)))?;
    w.write_record(R::HEADER)?;
    Ok(w)
}

fn append<R: Row>(w: &mut Writer<File>, rows: &[R]) -> OutputResult<()> {
    for row in rows {
        w.serialize(row)?;
    }
    Ok(())
}

impl TopologyWriter for CsvWriter {
    fn write_nodes(&mut self, rows: &[NodeRow]) -> OutputResult<()> {
        self.check_open()?;
        append(&mut self.nodes, rows)
    }

    fn write_edges(&mut self, rows: &[EdgeRow]) -> OutputResult<()> {
        self.check_open()?;
        append(&mut self.edges, rows)
    }

    fn write_connections(&mut self, rows: &[ConnectionRow]) -> OutputResult<()> {
        self.check_open()?;
        append(&mut self.connections, rows)
    }

    fn write_routes(&mut self, rows: &[RouteRow]) -> OutputResult<()> {
        self.check_open()?;
        append(&mut self.routes, rows)
    }

    fn write_programs(&mut self, rows: &[PhaseRow]) -> OutputResult<()> {
        self.check_open()?;
        append(&mut self.programs, rows)
    }

    fn write_placements(&mut self, rows: &[PlacementRow]) -> OutputResult<()> {
        self.check_open()?;
        append(&mut self.placements, rows)
    }

    fn write_inflows(&mut self, rows: &[InflowRow]) -> OutputResult<()> {
        self.check_open()?;
        append(&mut self.inflows, rows)
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        // Only mark finished once every table has flushed.
        self.nodes.flush()?;
        self.edges.flush()?;
        self.connections.flush()?;
        self.routes.flush()?;
        self.programs.flush()?;
        self.placements.flush()?;
        self.inflows.flush()?;
        self.finished = true;
        Ok(())
    }
}
