//! Scenario setup shared by the demo: parameters, route policy, programs.

use std::path::Path;

use anyhow::{Context, Result};

use tg_core::GeometryParameters;
use tg_gen::{InflowSpec, TopologyGenerator};
use tg_network::{TlsType, TrafficLightProgram};
use tg_routes::{load_routes_csv, DeclaredRoutes, UniformCorridorRoutes};

/// Parameters from a JSON file, or the defaults when `path` is `None`.
///
/// Missing fields fall back to their defaults, so `{"interior_count": 6}`
/// is a complete file.
pub fn load_params(path: Option<&Path>) -> Result<GeometryParameters> {
    let Some(path) = path else {
        return Ok(GeometryParameters::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading parameters from {}", path.display()))?;
    let params: GeometryParameters = serde_json::from_str(&text)
        .with_context(|| format!("parsing parameters in {}", path.display()))?;
    Ok(params)
}

/// One program per interior node; the western half static, the eastern half
/// actuated.
pub fn programs(params: &GeometryParameters) -> Vec<TrafficLightProgram> {
    if !params.traffic_lights {
        return Vec::new();
    }
    let n = params.interior_count;
    (0..n)
        .map(|i| {
            let tls = if i < n / 2 { TlsType::Static } else { TlsType::Actuated };
            TrafficLightProgram::new(&format!("inner{i}"), 1, tls, TrafficLightProgram::corridor_phases())
        })
        .collect()
}

/// Configure a generator for `params`.
///
/// Routes come from `routes_csv` when given.  Otherwise the hand-written
/// table is used on the four-intersection corridor and the uniform policy
/// on any other size.
pub fn generator(params: GeometryParameters, routes_csv: Option<&Path>) -> Result<TopologyGenerator> {
    let programs = programs(&params);
    let n = params.interior_count;
    let g = TopologyGenerator::new(params)
        .traffic_lights(programs)
        .inflows(InflowSpec::default());

    Ok(match routes_csv {
        Some(path) => {
            let table = load_routes_csv(path)
                .with_context(|| format!("loading routes from {}", path.display()))?;
            g.route_policy(table)
        }
        None if n == 4 => g.route_policy(DeclaredRoutes::corridor()),
        None => g.route_policy(UniformCorridorRoutes),
    })
}
