//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `topology.db` file in the configured output directory
//! with one table per row type.  Column names match the CSV headers.

use std::path::Path;

use rusqlite::{params, Connection};

use crate::row::{ConnectionRow, EdgeRow, InflowRow, NodeRow, PhaseRow, PlacementRow, RouteRow};
use crate::writer::TopologyWriter;
use crate::{OutputError, OutputResult};

/// Writes a topology to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `topology.db` in `dir` and initialise the schema.
    ///
    /// Existing tables are dropped first; a database holds one topology.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join("topology.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             DROP TABLE IF EXISTS nodes;
             DROP TABLE IF EXISTS edges;
             DROP TABLE IF EXISTS connections;
             DROP TABLE IF EXISTS routes;
             DROP TABLE IF EXISTS programs;
             DROP TABLE IF EXISTS placements;
             DROP TABLE IF EXISTS inflows;
             CREATE TABLE nodes (
                 id     TEXT PRIMARY KEY,
                 x      REAL NOT NULL,
                 y      REAL NOT NULL,
                 type   TEXT NOT NULL,
                 radius REAL
             );
             CREATE TABLE edges (
                 id       TEXT PRIMARY KEY,
                 \"from\" TEXT NOT NULL REFERENCES nodes(id),
                 \"to\"   TEXT NOT NULL REFERENCES nodes(id),
                 length   REAL NOT NULL,
                 lane     INTEGER NOT NULL,
                 priority INTEGER NOT NULL,
                 numLanes INTEGER NOT NULL,
                 speed    REAL NOT NULL
             );
             CREATE TABLE connections (
                 node         TEXT NOT NULL REFERENCES nodes(id),
                 \"from\"     TEXT NOT NULL REFERENCES edges(id),
                 \"to\"       TEXT NOT NULL REFERENCES edges(id),
                 fromLane     INTEGER NOT NULL,
                 toLane       INTEGER NOT NULL,
                 signal_group INTEGER NOT NULL
             );
             CREATE TABLE routes (
                 entry       TEXT NOT NULL REFERENCES edges(id),
                 route       INTEGER NOT NULL,
                 edges       TEXT NOT NULL,
                 probability REAL NOT NULL,
                 PRIMARY KEY (entry, route)
             );
             CREATE TABLE programs (
                 node       TEXT NOT NULL REFERENCES nodes(id),
                 program_id INTEGER NOT NULL,
                 tls_type   TEXT NOT NULL,
                 phase      INTEGER NOT NULL,
                 duration   INTEGER NOT NULL,
                 min_dur    INTEGER NOT NULL,
                 max_dur    INTEGER NOT NULL,
                 state      TEXT NOT NULL
             );
             CREATE TABLE placements (
                 edge   TEXT NOT NULL REFERENCES edges(id),
                 lane   INTEGER NOT NULL,
                 \"offset\" REAL NOT NULL
             );
             CREATE TABLE inflows (
                 edge         TEXT NOT NULL REFERENCES edges(id),
                 vehicle_type TEXT NOT NULL,
                 probability  REAL NOT NULL,
                 depart_lane  TEXT NOT NULL,
                 depart_speed REAL NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }

    /// Insert `rows` inside one transaction.
    fn insert<R>(
        &mut self,
        sql:  &str,
        rows: &[R],
        bind: impl Fn(&mut rusqlite::CachedStatement<'_>, &R) -> rusqlite::Result<usize>,
    ) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished);
        }
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(sql)?;
            for row in rows {
                bind(&mut stmt, row)?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

impl TopologyWriter for SqliteWriter {
    fn write_nodes(&mut self, rows: &[NodeRow]) -> OutputResult<()> {
        self.insert(
            "INSERT INTO nodes (id, x, y, type, radius) VALUES (?1, ?2, ?3, ?4, ?5)",
            rows,
            |stmt, r| stmt.execute(params![r.id, r.x, r.y, r.kind, r.radius]),
        )
    }

    fn write_edges(&mut self, rows: &[EdgeRow]) -> OutputResult<()> {
        self.insert(
            "INSERT INTO edges (id, \"from\", \"to\", length, lane, priority, numLanes, speed) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rows,
            |stmt, r| {
                stmt.execute(params![r.id, r.from, r.to, r.length, r.lane, r.priority, r.num_lanes, r.speed])
            },
        )
    }

    fn write_connections(&mut self, rows: &[ConnectionRow]) -> OutputResult<()> {
        self.insert(
            "INSERT INTO connections (node, \"from\", \"to\", fromLane, toLane, signal_group) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rows,
            |stmt, r| stmt.execute(params![r.node, r.from, r.to, r.from_lane, r.to_lane, r.signal_group]),
        )
    }

    fn write_routes(&mut self, rows: &[RouteRow]) -> OutputResult<()> {
        self.insert(
            "INSERT INTO routes (entry, route, edges, probability) VALUES (?1, ?2, ?3, ?4)",
            rows,
            |stmt, r| stmt.execute(params![r.entry, r.route, r.edges, r.probability]),
        )
    }

    fn write_programs(&mut self, rows: &[PhaseRow]) -> OutputResult<()> {
        self.insert(
            "INSERT INTO programs (node, program_id, tls_type, phase, duration, min_dur, max_dur, state) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rows,
            |stmt, r| {
                stmt.execute(params![
                    r.node, r.program_id, r.tls_type, r.phase, r.duration, r.min_dur, r.max_dur, r.state
                ])
            },
        )
    }

    fn write_placements(&mut self, rows: &[PlacementRow]) -> OutputResult<()> {
        self.insert(
            "INSERT INTO placements (edge, lane, \"offset\") VALUES (?1, ?2, ?3)",
            rows,
            |stmt, r| stmt.execute(params![r.edge, r.lane, r.offset]),
        )
    }

    fn write_inflows(&mut self, rows: &[InflowRow]) -> OutputResult<()> {
        self.insert(
            "INSERT INTO inflows (edge, vehicle_type, probability, depart_lane, depart_speed) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rows,
            |stmt, r| stmt.execute(params![r.edge, r.vehicle_type, r.probability, r.depart_lane, r.depart_speed]),
        )
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        self.finished = true;
        Ok(())
    }
}
