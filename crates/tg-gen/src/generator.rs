//! Fluent builder that runs every stage and assembles a [`Topology`].

use tracing::{debug, info};

use tg_core::{EdgeId, GeometryParameters, TopologyResult};
use tg_network::{
    ConflictMatrix, ConnectionBuilder, ConnectionDecl, EdgeBuilder, NodeBuilder, SignalGrouping,
    TrafficLightProgram,
};
use tg_routes::{DeclaredRoutes, RoutePolicy, RouteTable};

use crate::placement::{initial_placements, InflowSpec};
use crate::topology::{AttachedProgram, Topology, TopologyParts};

/// Configures and runs one topology generation.
///
/// # Required inputs
///
/// - [`GeometryParameters`]: corridor size, lanes, speeds, …
///
/// # Optional inputs (have defaults)
///
/// | Method                  | Default                                   |
/// |-------------------------|-------------------------------------------|
/// | `.route_policy(p)`      | [`DeclaredRoutes::corridor`]              |
/// | `.signal_grouping(g)`   | [`SignalGrouping::Shared`]                |
/// | `.conflict_matrix(m)`   | derived from the connections              |
/// | `.extra_connections(v)` | none                                      |
/// | `.traffic_lights(v)`    | no programs                               |
/// | `.inflows(spec)`        | no inflows                                |
/// | `.initial_placement(b)` | `true`: one vehicle per entry edge        |
///
/// # Example
///
/// ```rust,ignore
/// let topo = TopologyGenerator::new(GeometryParameters::default())
///     .route_policy(UniformCorridorRoutes)
///     .inflows(InflowSpec::default())
///     .generate()?;
/// ```
///
/// `generate` takes `&self`, so one configured generator can be run
/// repeatedly; every run yields an identical topology.
pub struct TopologyGenerator {
    params:     GeometryParameters,
    policy:     Box<dyn RoutePolicy>,
    grouping:   SignalGrouping,
    conflicts:  Option<ConflictMatrix>,
    extra:      Vec<ConnectionDecl>,
    programs:   Vec<TrafficLightProgram>,
    inflow:     Option<InflowSpec>,
    placements: bool,
}

impl TopologyGenerator {
    pub fn new(params: GeometryParameters) -> Self {
        Self {
            params,
            policy:     Box::new(DeclaredRoutes::corridor()),
            grouping:   SignalGrouping::default(),
            conflicts:  None,
            extra:      Vec::new(),
            programs:   Vec::new(),
            inflow:     None,
            placements: true,
        }
    }

    pub fn route_policy<P: RoutePolicy + 'static>(mut self, policy: P) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub fn signal_grouping(mut self, grouping: SignalGrouping) -> Self {
        self.grouping = grouping;
        self
    }

    /// Use an explicit conflict matrix instead of deriving one.
    ///
    /// Generation fails with `UndeclaredConflict` if two groups merge into
    /// the same edge without being declared conflicting here.
    pub fn conflict_matrix(mut self, matrix: ConflictMatrix) -> Self {
        self.conflicts = Some(matrix);
        self
    }

    /// Connections declared by identifier, added after the derived ones.
    pub fn extra_connections(mut self, decls: Vec<ConnectionDecl>) -> Self {
        self.extra = decls;
        self
    }

    /// Programs to attach; each must name a signal-controlled interior node.
    pub fn traffic_lights(mut self, programs: Vec<TrafficLightProgram>) -> Self {
        self.programs = programs;
        self
    }

    /// Stamp `spec` onto every entry edge.
    pub fn inflows(mut self, spec: InflowSpec) -> Self {
        self.inflow = Some(spec);
        self
    }

    pub fn initial_placement(mut self, enabled: bool) -> Self {
        self.placements = enabled;
        self
    }

    pub fn params(&self) -> &GeometryParameters {
        &self.params
    }

    /// Run every stage in dependency order and return the checked topology.
    ///
    /// Fails fast: the first error from any stage or from the final
    /// integrity pass is returned and nothing partial escapes.
    pub fn generate(&self) -> TopologyResult<Topology> {
        self.params.validate()?;

        let nodes = NodeBuilder::new(&self.params).build()?;
        let edges = EdgeBuilder::new(&self.params, &nodes).build()?;
        let connections = ConnectionBuilder::new(&nodes, &edges)
            .grouping(self.grouping)
            .declared(self.extra.clone())
            .build()?;

        let conflicts = match &self.conflicts {
            Some(m) => m.clone(),
            None => ConflictMatrix::derive(self.grouping, &connections)?,
        };
        conflicts.validate(&nodes, &edges, &connections)?;
        debug!(groups = conflicts.size(), pairs = conflicts.pairs().len(), "signal groups checked");

        let candidates = self.policy.routes(&nodes, &edges)?;
        let routes = RouteTable::validate(candidates, &nodes, &edges, &connections)?;
        debug!(policy = self.policy.name(), entries = routes.groups().len(), routes = routes.len(), "built route table");

        let programs = self
            .programs
            .iter()
            .map(|p| p.attach(&nodes).map(|node| AttachedProgram { node, program: p.clone() }))
            .collect::<TopologyResult<Vec<_>>>()?;

        let entries: Vec<EdgeId> = routes.entries().collect();
        let placements = if self.placements {
            initial_placements(entries.iter().copied())
        } else {
            Vec::new()
        };
        let inflows = match &self.inflow {
            Some(spec) => spec.apply(entries.iter().copied())?,
            None => Vec::new(),
        };

        let topo = Topology::assemble(TopologyParts {
            params: self.params.clone(),
            policy: self.policy.name(),
            nodes,
            edges,
            connections,
            conflicts,
            routes,
            programs,
            placements,
            inflows,
        })?;

        info!(
            interior    = topo.nodes().interior.len(),
            boundary    = topo.nodes().boundary.len(),
            edges       = topo.edges().len(),
            connections = topo.connections().len(),
            routes      = topo.routes().len(),
            "topology generated"
        );
        Ok(topo)
    }
}

// ── Batch generation ──────────────────────────────────────────────────────────

/// Generate one topology per parameter set with default options.
///
/// Results are returned in input order; one failing set does not stop the
/// others.  With the `parallel` Cargo feature the sets are generated on
/// Rayon's thread pool.
pub fn generate_batch(params: &[GeometryParameters]) -> Vec<TopologyResult<Topology>> {
    generate_batch_with(params, |p| TopologyGenerator::new(p.clone()))
}

/// Like [`generate_batch`] but lets `configure` set up each generator.
pub fn generate_batch_with<F>(params: &[GeometryParameters], configure: F) -> Vec<TopologyResult<Topology>>
where
    F: Fn(&GeometryParameters) -> TopologyGenerator + Send + Sync,
{
    #[cfg(not(feature = "parallel"))]
    {
        params.iter().map(|p| configure(p).generate()).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        params.par_iter().map(|p| configure(p).generate()).collect()
    }
}
