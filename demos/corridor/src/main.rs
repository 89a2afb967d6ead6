//! corridor — generate the reference corridor and export it.
//!
//! Usage: `corridor [params.json] [routes.csv]`
//!
//! With no arguments this builds the four-intersection corridor with its
//! hand-written route table, attaches the two-phase signal programs, seeds
//! inflows on every entry edge, and writes the engine tables to
//! `output/corridor/`.  Set `RUST_LOG=debug` to see each generation stage.

mod scenario;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, prelude::*};

use tg_core::RouteRng;
use tg_output::{CsvWriter, export};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:       u64   = 42;
const SAMPLES:    usize = 3; // departures drawn per entry edge
const OUTPUT_DIR: &str  = "output/corridor";

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let mut args = std::env::args().skip(1).map(PathBuf::from);
    let params_path = args.next();
    let routes_path = args.next();

    println!("=== corridor — rust_tg topology generator ===");

    // 1. Parameters and generator.
    let params = scenario::load_params(params_path.as_deref())?;
    println!(
        "Interior: {}  |  Section: {} m  |  Lanes: {}h/{}v  |  Signals: {}",
        params.interior_count,
        params.section_length,
        params.horizontal_lanes,
        params.vertical_lanes,
        params.traffic_lights,
    );
    let generator = scenario::generator(params, routes_path.as_deref())?;

    // 2. Generate.
    let t0 = Instant::now();
    let topo = generator.generate()?;
    let elapsed = t0.elapsed();
    println!("Generated in {:.3} ms (route policy: {})", elapsed.as_secs_f64() * 1e3, topo.route_policy());
    println!(
        "  {} nodes ({} interior), {} edges, {} connections, {} routes, {} programs",
        topo.nodes().len(),
        topo.nodes().interior.len(),
        topo.edges().len(),
        topo.connections().len(),
        topo.routes().len(),
        topo.programs().len(),
    );
    println!();

    // 3. Route table.
    println!("{:<8} {:<6} {:<48}", "Entry", "P", "Path");
    println!("{}", "-".repeat(64));
    for g in topo.routes().groups() {
        for r in &g.routes {
            let path: Vec<String> = r.edges.iter().map(|&e| topo.edges().name(e)).collect();
            println!("{:<8} {:<6.2} {}", topo.edges().name(g.entry), r.probability, path.join(" → "));
        }
    }
    println!();

    // 4. Sample a few departures per entry.
    for g in topo.routes().groups() {
        let mut rng = RouteRng::for_edge(SEED, g.entry);
        let exits: Vec<String> = (0..SAMPLES)
            .filter_map(|_| topo.routes().sample(g.entry, &mut rng))
            .filter_map(|r| r.exit())
            .map(|e| topo.edges().name(e))
            .collect();
        println!("  {} → {}", topo.edges().name(g.entry), exits.join(", "));
    }
    println!();

    // 5. Export.
    let dir = Path::new(OUTPUT_DIR);
    let mut writer = CsvWriter::new(dir)?;
    export(&topo, &mut writer)?;
    info!(dir = OUTPUT_DIR, "wrote CSV tables");

    #[cfg(feature = "sqlite")]
    {
        let mut db = tg_output::SqliteWriter::new(dir)?;
        export(&topo, &mut db)?;
        info!(dir = OUTPUT_DIR, "wrote topology.db");
    }

    Ok(())
}
