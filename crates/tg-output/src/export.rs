//! Flattening a [`Topology`] into rows and driving a writer.

use tracing::debug;

use tg_core::NodeId;
use tg_gen::Topology;

use crate::row::{ConnectionRow, EdgeRow, InflowRow, NodeRow, PhaseRow, PlacementRow, RouteRow};
use crate::writer::TopologyWriter;
use crate::OutputResult;

/// Write every table of `topo` to `writer`, then finish it.
pub fn export<W: TopologyWriter>(topo: &Topology, writer: &mut W) -> OutputResult<()> {
    let nodes = node_rows(topo);
    let edges = edge_rows(topo);
    let connections = connection_rows(topo);
    let routes = route_rows(topo);
    let programs = phase_rows(topo);

    writer.write_nodes(&nodes)?;
    writer.write_edges(&edges)?;
    writer.write_connections(&connections)?;
    writer.write_routes(&routes)?;
    writer.write_programs(&programs)?;
    writer.write_placements(&placement_rows(topo))?;
    writer.write_inflows(&inflow_rows(topo))?;
    writer.finish()?;

    debug!(
        nodes       = nodes.len(),
        edges       = edges.len(),
        connections = connections.len(),
        routes      = routes.len(),
        phases      = programs.len(),
        "topology exported"
    );
    Ok(())
}

fn node_name(topo: &Topology, id: NodeId) -> String {
    topo.nodes().get(id).map(|n| n.id.clone()).unwrap_or_else(|| id.to_string())
}

pub fn node_rows(topo: &Topology) -> Vec<NodeRow> {
    topo.nodes()
        .iter()
        .map(|(_, n)| NodeRow {
            id:     n.id.clone(),
            x:      n.pos.x,
            y:      n.pos.y,
            kind:   n.engine_type(),
            radius: n.radius,
        })
        .collect()
}

pub fn edge_rows(topo: &Topology) -> Vec<EdgeRow> {
    topo.edges()
        .iter()
        .map(|(_, e)| EdgeRow {
            id:        e.id.clone(),
            from:      node_name(topo, e.from),
            to:        node_name(topo, e.to),
            length:    e.length,
            lane:      e.lane,
            priority:  e.priority,
            num_lanes: e.num_lanes,
            speed:     e.speed,
        })
        .collect()
}

pub fn connection_rows(topo: &Topology) -> Vec<ConnectionRow> {
    let edges = topo.edges();
    topo.connections()
        .iter()
        .map(|(node, c)| ConnectionRow {
            node:         node_name(topo, node),
            from:         edges.name(c.from),
            to:           edges.name(c.to),
            from_lane:    c.from_lane,
            to_lane:      c.to_lane,
            signal_group: c.signal_group.0,
        })
        .collect()
}

/// Route numbers restart at 0 for every entry edge.
pub fn route_rows(topo: &Topology) -> Vec<RouteRow> {
    let edges = topo.edges();
    topo.routes()
        .groups()
        .iter()
        .flat_map(|g| {
            let entry = edges.name(g.entry);
            g.routes.iter().zip(0u32..).map(move |(r, route)| RouteRow {
                entry: entry.clone(),
                route,
                edges: r.edges.iter().map(|&e| edges.name(e)).collect::<Vec<_>>().join(" "),
                probability: r.probability,
            })
        })
        .collect()
}

pub fn phase_rows(topo: &Topology) -> Vec<PhaseRow> {
    topo.programs()
        .iter()
        .flat_map(|a| {
            let p = &a.program;
            let node = node_name(topo, a.node);
            p.phases.iter().zip(0u32..).map(move |(ph, phase)| PhaseRow {
                node: node.clone(),
                program_id: p.program_id,
                tls_type: p.tls_type.as_str(),
                phase,
                duration: ph.duration,
                min_dur: ph.min_dur,
                max_dur: ph.max_dur,
                state: ph.state.clone(),
            })
        })
        .collect()
}

pub fn placement_rows(topo: &Topology) -> Vec<PlacementRow> {
    topo.placements()
        .iter()
        .map(|p| PlacementRow { edge: topo.edges().name(p.edge), lane: p.lane, offset: p.offset })
        .collect()
}

pub fn inflow_rows(topo: &Topology) -> Vec<InflowRow> {
    topo.inflows()
        .iter()
        .map(|f| InflowRow {
            edge:         topo.edges().name(f.edge),
            vehicle_type: f.vehicle_type.clone(),
            probability:  f.probability,
            depart_lane:  f.depart_lane.to_string(),
            depart_speed: f.depart_speed,
        })
        .collect()
}
