//! Unit tests for tg-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EdgeId, NodeId, SignalGroup};

    #[test]
    fn index_roundtrip() {
        let id = EdgeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(EdgeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(EdgeId::INVALID.0, u32::MAX);
        assert_eq!(SignalGroup::INVALID.0, u8::MAX);
        assert_eq!(NodeId::default(), NodeId::INVALID);
    }

    #[test]
    fn signal_group_out_of_range() {
        assert!(SignalGroup::try_from(300usize).is_err());
        assert_eq!(SignalGroup::SHARED, SignalGroup(1));
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(7).to_string(), "NodeId(7)");
        assert_eq!(SignalGroup(2).to_string(), "SignalGroup(2)");
    }
}

#[cfg(test)]
mod geo {
    use crate::Point;

    #[test]
    fn distance_345() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(a.distance_2(b), 25.0);
    }
}

#[cfg(test)]
mod params {
    use crate::{ErrorKind, GeometryParameters, SpeedLimit};

    #[test]
    fn default_is_four_intersection_corridor() {
        let p = GeometryParameters::default();
        assert_eq!(p.interior_count, 4);
        assert_eq!(p.section_length, 100.0);
        assert_eq!(p.boundary_count(), 6);
        assert!(p.traffic_lights);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn zero_interior_count_rejected() {
        let p = GeometryParameters::corridor(0, 100.0);
        let err = p.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn non_positive_length_rejected() {
        for len in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let p = GeometryParameters::corridor(4, len);
            assert!(p.validate().is_err(), "length {len} accepted");
        }
    }

    #[test]
    fn zero_lanes_rejected() {
        let p = GeometryParameters { vertical_lanes: 0, ..Default::default() };
        assert!(p.validate().is_err());
        let p = GeometryParameters { horizontal_lanes: 0, ..Default::default() };
        assert!(p.validate().is_err());
    }

    #[test]
    fn split_speed_limit() {
        let s = SpeedLimit::Split { horizontal: 20.0, vertical: 10.0 };
        assert_eq!(s.horizontal(), 20.0);
        assert_eq!(s.vertical(), 10.0);

        let p = GeometryParameters {
            speed_limit: SpeedLimit::Split { horizontal: 20.0, vertical: 0.0 },
            ..Default::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn negative_radius_rejected() {
        let p = GeometryParameters { inner_radius: -1.0, ..Default::default() };
        assert!(p.validate().is_err());
    }
}

#[cfg(test)]
mod error {
    use crate::{ErrorKind, SignalGroup, TopologyError};

    #[test]
    fn kinds() {
        assert_eq!(TopologyError::MissingEdge("inner9_0".into()).kind(), ErrorKind::Integrity);
        assert_eq!(
            TopologyError::RouteWeight { entry: "out0_0".into(), sum: 0.95 }.kind(),
            ErrorKind::RouteWeight
        );
        assert_eq!(TopologyError::Config("x".into()).kind(), ErrorKind::Configuration);
        let conflict = TopologyError::UndeclaredConflict {
            node: "inner0".into(),
            edge: "inner0_0".into(),
            a:    SignalGroup(1),
            b:    SignalGroup(2),
        };
        assert_eq!(conflict.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn message_names_identifier() {
        let e = TopologyError::MissingEdge("inner9_0".into());
        assert!(e.to_string().contains("inner9_0"));
    }
}

#[cfg(test)]
mod rng {
    use crate::{EdgeId, RouteRng};

    #[test]
    fn same_seed_same_stream() {
        let mut a = RouteRng::for_edge(42, EdgeId(3));
        let mut b = RouteRng::for_edge(42, EdgeId(3));
        for _ in 0..16 {
            assert_eq!(a.unit(), b.unit());
        }
    }

    #[test]
    fn edges_get_distinct_streams() {
        let mut a = RouteRng::for_edge(42, EdgeId(0));
        let mut b = RouteRng::for_edge(42, EdgeId(1));
        let xs: Vec<f64> = (0..8).map(|_| a.unit()).collect();
        let ys: Vec<f64> = (0..8).map(|_| b.unit()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn unit_range() {
        let mut r = RouteRng::new(7);
        for _ in 0..1000 {
            let u = r.unit();
            assert!((0.0..1.0).contains(&u));
        }
    }
}
