//! Unit tests for tg-network.
//!
//! All tests build from `GeometryParameters` directly; no files involved.

#[cfg(test)]
mod helpers {
    use tg_core::GeometryParameters;

    use crate::{ConnectionBuilder, ConnectionSet, EdgeBuilder, EdgeSet, NodeBuilder, NodeSet};

    /// Nodes + edges + connections for `params` with the default grouping.
    pub fn stages(params: &GeometryParameters) -> (NodeSet, EdgeSet, ConnectionSet) {
        let nodes = NodeBuilder::new(params).build().unwrap();
        let edges = EdgeBuilder::new(params, &nodes).build().unwrap();
        let conns = ConnectionBuilder::new(&nodes, &edges).build().unwrap();
        (nodes, edges, conns)
    }

    pub fn corridor() -> (NodeSet, EdgeSet, ConnectionSet) {
        stages(&GeometryParameters::default())
    }
}

// ── Nodes ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod nodes {
    use std::collections::HashSet;

    use tg_core::{ErrorKind, GeometryParameters, NodeId, Point};

    use crate::{InteriorControl, NodeBuilder, NodeKind};

    #[test]
    fn four_interior_six_boundary() {
        let nodes = NodeBuilder::new(&GeometryParameters::default()).build().unwrap();
        assert_eq!(nodes.interior.len(), 4);
        assert_eq!(nodes.boundary.len(), 6);
        assert_eq!(nodes.len(), 10);
    }

    #[test]
    fn handles_are_sequential() {
        let nodes = NodeBuilder::new(&GeometryParameters::default()).build().unwrap();
        let handles: Vec<NodeId> = nodes.interior.iter().chain(&nodes.boundary).copied().collect();
        assert_eq!(handles, (0..10).map(NodeId).collect::<Vec<_>>());
        assert_eq!(nodes.find("out0"), Some(NodeId(4)));
    }

    #[test]
    fn interior_positions_and_kind() {
        let nodes = NodeBuilder::new(&GeometryParameters::default()).build().unwrap();
        for (i, &id) in nodes.interior.iter().enumerate() {
            let n = nodes.get(id).unwrap();
            assert_eq!(n.id, format!("inner{i}"));
            assert_eq!(n.pos, Point::new((i + 1) as f64 * 100.0, 0.0));
            assert_eq!(n.kind, NodeKind::Interior(InteriorControl::TrafficLight));
            assert_eq!(n.radius, Some(6.2));
            assert_eq!(n.engine_type(), "traffic_light");
        }
    }

    #[test]
    fn boundary_positions() {
        let nodes = NodeBuilder::new(&GeometryParameters::default()).build().unwrap();
        let pos: Vec<_> = nodes.boundary.iter().map(|&id| nodes.get(id).unwrap().pos).collect();
        assert_eq!(
            pos,
            [
                Point::new(0.0, 0.0),
                Point::new(100.0, 100.0),
                Point::new(200.0, 100.0),
                Point::new(300.0, 100.0),
                Point::new(400.0, 100.0),
                Point::new(500.0, 0.0),
            ]
        );
        let out5 = nodes.get(nodes.boundary[5]).unwrap();
        assert_eq!(out5.id, "out5");
        assert_eq!(out5.kind, NodeKind::Boundary);
        assert_eq!(out5.radius, None);
        assert_eq!(out5.engine_type(), "priority");
    }

    #[test]
    fn priority_flag_applies_to_all_interior() {
        let p = GeometryParameters { traffic_lights: false, ..Default::default() };
        let nodes = NodeBuilder::new(&p).build().unwrap();
        assert!(nodes
            .interior
            .iter()
            .all(|&id| nodes.get(id).unwrap().kind == NodeKind::Interior(InteriorControl::Priority)));
    }

    #[test]
    fn ids_unique_for_many_sizes() {
        for n in 1..=12 {
            let nodes = NodeBuilder::new(&GeometryParameters::corridor(n, 50.0)).build().unwrap();
            let names: HashSet<_> = nodes.nodes.iter().map(|n| n.id.as_str()).collect();
            assert_eq!(names.len(), nodes.len());
            assert_eq!(nodes.len(), 2 * n as usize + 2);
        }
    }

    #[test]
    fn zero_interior_rejected() {
        let err = NodeBuilder::new(&GeometryParameters::corridor(0, 100.0)).build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn find_by_name() {
        let nodes = NodeBuilder::new(&GeometryParameters::default()).build().unwrap();
        assert_eq!(nodes.find("inner0"), Some(NodeId(0)));
        assert_eq!(nodes.find("out0"), Some(NodeId(4)));
        assert_eq!(nodes.find("inner9"), None);
    }
}

// ── Edges ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod edges {
    use std::collections::HashSet;

    use tg_core::{GeometryParameters, SpeedLimit};

    use crate::{EdgeBuilder, NodeBuilder, Orientation};

    #[test]
    fn eighteen_edges_for_default_corridor() {
        let (_, edges, _) = super::helpers::corridor();
        let inner = edges.edges.iter().filter(|e| e.id.starts_with("inner")).count();
        let outer = edges.edges.iter().filter(|e| e.id.starts_with("out")).count();
        assert_eq!(inner, 6);
        assert_eq!(outer, 12);
        assert_eq!(edges.len(), 18);
    }

    #[test]
    fn endpoints_exist_and_ids_unique() {
        let (nodes, edges, _) = super::helpers::corridor();
        let names: HashSet<_> = edges.edges.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(names.len(), edges.len());
        for e in &edges.edges {
            assert!(nodes.get(e.from).is_some());
            assert!(nodes.get(e.to).is_some());
            assert_eq!(e.length, 100.0);
            assert_eq!(e.priority, 78);
        }
    }

    #[test]
    fn inner_edge_directions() {
        let (nodes, edges, _) = super::helpers::corridor();
        let e = edges.get(edges.resolve("inner1_0").unwrap()).unwrap();
        assert_eq!(nodes.get(e.from).unwrap().id, "inner1");
        assert_eq!(nodes.get(e.to).unwrap().id, "inner2");
        assert_eq!(e.lane, 0);
        let e = edges.get(edges.resolve("inner1_1").unwrap()).unwrap();
        assert_eq!(nodes.get(e.from).unwrap().id, "inner2");
        assert_eq!(nodes.get(e.to).unwrap().id, "inner1");
        assert_eq!(e.lane, 1);
    }

    #[test]
    fn boundary_attachment() {
        let (nodes, edges, _) = super::helpers::corridor();
        let ends = |name: &str| {
            let e = edges.get(edges.resolve(name).unwrap()).unwrap();
            (nodes.get(e.from).unwrap().id.clone(), nodes.get(e.to).unwrap().id.clone())
        };
        assert_eq!(ends("out0_0"), ("out0".into(), "inner0".into()));
        assert_eq!(ends("out0_1"), ("inner0".into(), "out0".into()));
        assert_eq!(ends("out1_0"), ("out1".into(), "inner0".into()));
        assert_eq!(ends("out2_1"), ("inner1".into(), "out2".into()));
        assert_eq!(ends("out4_0"), ("out4".into(), "inner3".into()));
        // East end: suffix follows travel direction, so inbound is `_1`.
        assert_eq!(ends("out5_1"), ("out5".into(), "inner3".into()));
        assert_eq!(ends("out5_0"), ("inner3".into(), "out5".into()));
    }

    #[test]
    fn lanes_and_speed_by_orientation() {
        let p = GeometryParameters {
            horizontal_lanes: 2,
            vertical_lanes:   1,
            speed_limit:      SpeedLimit::Split { horizontal: 30.0, vertical: 15.0 },
            ..Default::default()
        };
        let nodes = NodeBuilder::new(&p).build().unwrap();
        let edges = EdgeBuilder::new(&p, &nodes).build().unwrap();
        let h = edges.get(edges.resolve("out0_0").unwrap()).unwrap();
        assert_eq!(h.orientation, Orientation::Horizontal);
        assert_eq!((h.num_lanes, h.speed), (2, 30.0));
        let v = edges.get(edges.resolve("out3_1").unwrap()).unwrap();
        assert_eq!(v.orientation, Orientation::Vertical);
        assert_eq!((v.num_lanes, v.speed), (1, 15.0));
    }

    #[test]
    fn single_intersection() {
        let p = GeometryParameters::corridor(1, 80.0);
        let nodes = NodeBuilder::new(&p).build().unwrap();
        let edges = EdgeBuilder::new(&p, &nodes).build().unwrap();
        assert_eq!(edges.len(), 6);
        let a = &edges.approaches[0];
        assert!(a.west.inbound.is_some() && a.north.outbound.is_some() && a.east.inbound.is_some());
    }

    #[test]
    fn approaches_complete_for_every_interior() {
        for n in 1..=8 {
            let p = GeometryParameters::corridor(n, 100.0);
            let nodes = NodeBuilder::new(&p).build().unwrap();
            let edges = EdgeBuilder::new(&p, &nodes).build().unwrap();
            assert_eq!(edges.len(), 2 * (n as usize - 1) + 2 * (n as usize + 2));
            for a in &edges.approaches {
                for side in crate::Approach::ALL {
                    let s = a.side(side);
                    assert!(s.inbound.is_some() && s.outbound.is_some(), "n={n} {side:?}");
                }
            }
        }
    }

    #[test]
    fn unknown_name_is_integrity_error() {
        let (_, edges, _) = super::helpers::corridor();
        let err = edges.resolve("inner9_0").unwrap_err();
        assert_eq!(err.kind(), tg_core::ErrorKind::Integrity);
        assert!(err.to_string().contains("inner9_0"));
    }

    #[test]
    fn in_out_edges() {
        let (nodes, edges, _) = super::helpers::corridor();
        let inner1 = nodes.find("inner1").unwrap();
        assert_eq!(edges.out_edges(inner1).count(), 3);
        assert_eq!(edges.in_edges(inner1).count(), 3);
        for e in edges.out_edges(inner1) {
            assert_eq!(edges.get(e).unwrap().from, inner1);
        }
    }
}

// ── Connections ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod connections {
    use tg_core::{ErrorKind, GeometryParameters, SignalGroup, TopologyError};

    use crate::{ConnectionBuilder, ConnectionDecl, EdgeBuilder, NodeBuilder};

    fn names(edges: &crate::EdgeSet, c: &crate::Connection) -> (String, String) {
        (edges.name(c.from), edges.name(c.to))
    }

    #[test]
    fn six_movements_per_interior_node() {
        let (nodes, edges, conns) = super::helpers::corridor();
        assert_eq!(conns.nodes.len(), 4);
        assert_eq!(conns.len(), 24);
        for nc in &conns.nodes {
            assert!(nodes.get(nc.node).unwrap().is_interior());
            assert_eq!(nc.connections.len(), 6);
            for c in &nc.connections {
                assert_eq!(c.signal_group, SignalGroup::SHARED);
                assert_eq!((c.from_lane, c.to_lane), (0, 0));
                let from = edges.get(c.from).unwrap();
                let to = edges.get(c.to).unwrap();
                assert_eq!(from.to, nc.node);
                assert_eq!(to.from, nc.node);
            }
        }
    }

    #[test]
    fn inner0_movements() {
        let (nodes, edges, conns) = super::helpers::corridor();
        let inner0 = nodes.find("inner0").unwrap();
        let got: Vec<_> = conns.for_node(inner0).unwrap().iter().map(|c| names(&edges, c)).collect();
        let want: Vec<(String, String)> = [
            ("out0_0", "out1_1"),
            ("out0_0", "inner0_0"),
            ("out1_0", "out0_1"),
            ("out1_0", "inner0_0"),
            ("inner0_1", "out1_1"),
            ("inner0_1", "out0_1"),
        ]
        .iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect();
        assert_eq!(got, want);
    }

    #[test]
    fn last_node_uses_east_end() {
        let (nodes, edges, conns) = super::helpers::corridor();
        let inner3 = nodes.find("inner3").unwrap();
        let from = edges.resolve("out5_1").unwrap();
        let to = edges.resolve("out4_1").unwrap();
        assert!(conns.permits(inner3, from, to));
        let through = edges.resolve("out5_0").unwrap();
        assert!(conns.permits(inner3, edges.resolve("inner2_0").unwrap(), through));
    }

    #[test]
    fn lane_pairs_follow_min_lane_count() {
        let p = GeometryParameters { horizontal_lanes: 2, vertical_lanes: 1, ..Default::default() };
        let (_, _, conns) = super::helpers::stages(&p);
        // Per node: W→E and E→W keep 2 lanes, the four turns 1 lane each.
        for nc in &conns.nodes {
            assert_eq!(nc.connections.len(), 8);
            assert!(nc.connections.iter().any(|c| c.from_lane == 1));
        }
    }

    #[test]
    fn declared_missing_edge_names_identifier() {
        let p = GeometryParameters::default();
        let nodes = NodeBuilder::new(&p).build().unwrap();
        let edges = EdgeBuilder::new(&p, &nodes).build().unwrap();
        let err = ConnectionBuilder::new(&nodes, &edges)
            .declared(vec![ConnectionDecl {
                node:         "inner0".into(),
                from:         "inner9_0".into(),
                to:           "out1_1".into(),
                lane:         1,
                signal_group: 1,
            }])
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Integrity);
        assert!(matches!(&err, TopologyError::MissingEdge(name) if name == "inner9_0"));
    }

    #[test]
    fn declared_non_positive_lane_rejected() {
        let p = GeometryParameters::default();
        let nodes = NodeBuilder::new(&p).build().unwrap();
        let edges = EdgeBuilder::new(&p, &nodes).build().unwrap();
        for lane in [0, -1] {
            let err = ConnectionBuilder::new(&nodes, &edges)
                .declared(vec![ConnectionDecl {
                    node:         "inner1".into(),
                    from:         "inner0_0".into(),
                    to:           "out2_1".into(),
                    lane,
                    signal_group: 1,
                }])
                .build()
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Configuration);
        }
    }

    #[test]
    fn declared_edge_must_touch_node() {
        let p = GeometryParameters::default();
        let nodes = NodeBuilder::new(&p).build().unwrap();
        let edges = EdgeBuilder::new(&p, &nodes).build().unwrap();
        let err = ConnectionBuilder::new(&nodes, &edges)
            .declared(vec![ConnectionDecl {
                node:         "inner0".into(),
                from:         "out3_0".into(),
                to:           "out1_1".into(),
                lane:         1,
                signal_group: 1,
            }])
            .build()
            .unwrap_err();
        assert!(matches!(err, TopologyError::NotIncident { .. }));
    }

    #[test]
    fn declared_movement_is_appended() {
        let p = GeometryParameters::default();
        let nodes = NodeBuilder::new(&p).build().unwrap();
        let edges = EdgeBuilder::new(&p, &nodes).build().unwrap();
        let conns = ConnectionBuilder::new(&nodes, &edges)
            .declared(vec![ConnectionDecl {
                node:         "inner1".into(),
                from:         "inner0_0".into(),
                to:           "inner0_1".into(),
                lane:         1,
                signal_group: 1,
            }])
            .build()
            .unwrap();
        let inner1 = nodes.find("inner1").unwrap();
        let cs = conns.for_node(inner1).unwrap();
        assert_eq!(cs.len(), 7);
        // A U-turn maps onto the west approach in both directions.
        assert_eq!(cs[6].movement.map(|m| (m.from, m.to)), Some((crate::Approach::West, crate::Approach::West)));
    }
}

// ── Signal groups ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod signals {
    use tg_core::{ErrorKind, GeometryParameters, SignalGroup, TopologyError};

    use crate::{
        ConflictMatrix, ConnectionBuilder, EdgeBuilder, NodeBuilder, Phase, SignalGrouping, TlsType,
        TrafficLightProgram,
    };

    #[test]
    fn shared_grouping_needs_no_conflicts() {
        let (nodes, edges, conns) = super::helpers::corridor();
        let m = ConflictMatrix::derive(SignalGrouping::Shared, &conns).unwrap();
        assert_eq!(m.size(), 1);
        assert!(m.pairs().is_empty());
        m.validate(&nodes, &edges, &conns).unwrap();
    }

    #[test]
    fn by_approach_derives_all_merges() {
        let p = GeometryParameters::default();
        let nodes = NodeBuilder::new(&p).build().unwrap();
        let edges = EdgeBuilder::new(&p, &nodes).build().unwrap();
        let conns = ConnectionBuilder::new(&nodes, &edges)
            .grouping(SignalGrouping::ByApproach)
            .build()
            .unwrap();
        let m = ConflictMatrix::derive(SignalGrouping::ByApproach, &conns).unwrap();
        assert_eq!(
            m.pairs(),
            [
                (SignalGroup(1), SignalGroup(2)),
                (SignalGroup(1), SignalGroup(3)),
                (SignalGroup(2), SignalGroup(3)),
            ]
        );
        m.validate(&nodes, &edges, &conns).unwrap();
    }

    #[test]
    fn missing_conflict_detected() {
        let p = GeometryParameters::default();
        let nodes = NodeBuilder::new(&p).build().unwrap();
        let edges = EdgeBuilder::new(&p, &nodes).build().unwrap();
        let conns = ConnectionBuilder::new(&nodes, &edges)
            .grouping(SignalGrouping::ByApproach)
            .build()
            .unwrap();
        let m = ConflictMatrix::new(3)
            .with_conflict(SignalGroup(1), SignalGroup(2))
            .unwrap();
        let err = m.validate(&nodes, &edges, &conns).unwrap_err();
        assert!(matches!(err, TopologyError::UndeclaredConflict { .. }));
    }

    #[test]
    fn undeclared_group_rejected() {
        let p = GeometryParameters::default();
        let nodes = NodeBuilder::new(&p).build().unwrap();
        let edges = EdgeBuilder::new(&p, &nodes).build().unwrap();
        let conns = ConnectionBuilder::new(&nodes, &edges)
            .grouping(SignalGrouping::ByApproach)
            .build()
            .unwrap();
        let err = ConflictMatrix::new(2).validate(&nodes, &edges, &conns).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn matrix_is_symmetric_and_irreflexive() {
        let mut m = ConflictMatrix::new(3);
        m.declare(SignalGroup(3), SignalGroup(1)).unwrap();
        assert!(m.conflicts(SignalGroup(1), SignalGroup(3)));
        assert!(m.conflicts(SignalGroup(3), SignalGroup(1)));
        assert!(!m.conflicts(SignalGroup(1), SignalGroup(2)));
        assert!(m.declare(SignalGroup(2), SignalGroup(2)).is_err());
        assert!(m.declare(SignalGroup(0), SignalGroup(1)).is_err());
        assert!(m.declare(SignalGroup(1), SignalGroup(4)).is_err());
    }

    #[test]
    fn program_attaches_to_signalled_node() {
        let (nodes, _, _) = super::helpers::corridor();
        let prog = TrafficLightProgram::new("inner2", 1, TlsType::Actuated, TrafficLightProgram::corridor_phases());
        assert_eq!(prog.attach(&nodes).unwrap(), nodes.find("inner2").unwrap());
        assert_eq!(prog.phases[0].state, "rrGGGG");
    }

    #[test]
    fn program_rejected_on_priority_or_boundary_node() {
        let (nodes, _, _) = super::helpers::corridor();
        let prog = TrafficLightProgram::new("out0", 1, TlsType::Static, TrafficLightProgram::corridor_phases());
        assert_eq!(prog.attach(&nodes).unwrap_err().kind(), ErrorKind::Configuration);

        let p = GeometryParameters { traffic_lights: false, ..Default::default() };
        let (nodes, _, _) = super::helpers::stages(&p);
        let prog = TrafficLightProgram::new("inner0", 1, TlsType::Static, TrafficLightProgram::corridor_phases());
        assert!(prog.attach(&nodes).is_err());
    }

    #[test]
    fn program_unknown_node_and_bad_phase() {
        let (nodes, _, _) = super::helpers::corridor();
        let prog = TrafficLightProgram::new("inner7", 1, TlsType::Static, TrafficLightProgram::corridor_phases());
        assert!(matches!(prog.attach(&nodes), Err(TopologyError::MissingNode(n)) if n == "inner7"));

        let prog = TrafficLightProgram::new("inner0", 1, TlsType::Static, vec![Phase::new(5, 8, 45, "GG")]);
        assert!(prog.attach(&nodes).is_err());

        let prog = TrafficLightProgram::new("inner0", 1, TlsType::Static, vec![]);
        assert!(prog.attach(&nodes).is_err());
    }
}
