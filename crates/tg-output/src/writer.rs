//! The `TopologyWriter` trait implemented by all backend writers.

use crate::row::{ConnectionRow, EdgeRow, InflowRow, NodeRow, PhaseRow, PlacementRow, RouteRow};
use crate::OutputResult;

/// Trait implemented by the CSV and SQLite writers.
///
/// [`export`](crate::export) calls each `write_*` method once, in
/// declaration order, then [`finish`](TopologyWriter::finish).  Writers
/// must accept empty slices.
pub trait TopologyWriter {
    fn write_nodes(&mut self, rows: &[NodeRow]) -> OutputResult<()>;

    fn write_edges(&mut self, rows: &[EdgeRow]) -> OutputResult<()>;

    fn write_connections(&mut self, rows: &[ConnectionRow]) -> OutputResult<()>;

    fn write_routes(&mut self, rows: &[RouteRow]) -> OutputResult<()>;

    fn write_programs(&mut self, rows: &[PhaseRow]) -> OutputResult<()>;

    fn write_placements(&mut self, rows: &[PlacementRow]) -> OutputResult<()>;

    fn write_inflows(&mut self, rows: &[InflowRow]) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent.  Writes after `finish` fail with
    /// [`OutputError::Finished`](crate::OutputError::Finished).
    fn finish(&mut self) -> OutputResult<()>;
}
