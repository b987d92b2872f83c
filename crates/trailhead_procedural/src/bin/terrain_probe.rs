//! # Terrain Probe
//!
//! Builds a world and prints a transect along the trail: centerline, trail
//! and off-trail heights, blend factor and surface normal every few metres.
//!
//! ```bash
//! # Reference world
//! terrain_probe
//!
//! # Custom constants, 400m transect at 5m steps, with debug logs
//! RUST_LOG=trailhead_procedural=debug terrain_probe world.toml 400 5
//! ```

use std::process::ExitCode;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use trailhead_procedural::{TerrainResult, World, WorldConfig};

const DEFAULT_LENGTH: f64 = 200.0;
const DEFAULT_STEP: f64 = 10.0;
/// Rows beyond this are cut off.
const MAX_SAMPLES: f64 = 100_000.0;
/// Lateral distance of the off-trail sample.
const OFF_TRAIL: f64 = 25.0;

fn init_logging() {
    // Info by default, overridable via RUST_LOG
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_timer(fmt::time::uptime()))
        .init();
}

fn parse_number(arg: Option<&String>, default: f64, name: &str) -> f64 {
    match arg.map(|s| s.parse::<f64>()) {
        None => default,
        Some(Ok(v)) if v.is_finite() && v > 0.0 => v,
        Some(_) => {
            tracing::warn!(argument = name, default, "ignoring invalid value");
            default
        }
    }
}

/// Sample positions along a transect of `length` centred on `z = 0`.
///
/// Counts samples rather than accumulating `z`, so a step below the float
/// spacing still terminates.
fn transect(length: f64, step: f64) -> impl Iterator<Item = f64> {
    let start = -length * 0.5;
    let wanted = (length / step).floor();
    if wanted > MAX_SAMPLES {
        tracing::warn!(wanted, kept = MAX_SAMPLES, "transect truncated");
    }
    let samples = wanted.min(MAX_SAMPLES) as u64;
    (0..=samples).map(move |k| start + k as f64 * step)
}

fn run(args: &[String]) -> TerrainResult<()> {
    let config = match args.first() {
        Some(path) => WorldConfig::load(path)?,
        None => WorldConfig::default(),
    };
    let length = parse_number(args.get(1), DEFAULT_LENGTH, "length");
    let step = parse_number(args.get(2), DEFAULT_STEP, "step");

    let world = World::new(config)?;
    tracing::info!(
        seed = world.seed().value(),
        path_bound = world.config().path.amplitude_bound(),
        "world ready"
    );

    println!("═══════════════════════════════════════════════════════════════════════════");
    println!("                      TRAILHEAD TERRAIN PROBE");
    println!("═══════════════════════════════════════════════════════════════════════════");
    println!(
        "{:>8} {:>9} {:>9} {:>9} {:>6} {:>6}   {}",
        "z", "center", "trail", "wild+25", "width", "blend", "normal@trail"
    );

    for z in transect(length, step) {
        let center = world.path_center_at(z);
        let profile = world.path_profile_at(z);
        let trail = world.height_at(center, z);
        let off = world.sample(center + OFF_TRAIL, z);
        let n = world.normal_at(center, z);
        println!(
            "{z:>8.1} {center:>9.3} {trail:>9.3} {:>9.3} {:>6.2} {:>6.3}   ({:+.3}, {:+.3}, {:+.3})",
            off.height, profile.width, off.blend, n.x, n.y, n.z
        );
    }

    Ok(())
}

fn main() -> ExitCode {
    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "terrain probe failed");
            ExitCode::FAILURE
        }
    }
}
