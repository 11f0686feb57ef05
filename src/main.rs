use horizon::{bench_step, bench_step_curve, measure, preset, run_2d, run_3d};
use horizon::{Scenario, Scenario2D, Scenario3D, ScenarioConfig, StopReason};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, info};

use std::path::PathBuf;

/// Frame budget for headless runs that set no other bound
const HEADLESS_FRAMES: u64 = 1000;

/// Headless runs log diagnostics every this many frames
const REPORT_EVERY: u64 = 100;

#[derive(Parser, Debug)]
#[command(version, about = "Particles falling onto a central attractor")]
struct Args {
    /// Scenario YAML file, also looked up under scenarios/
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Built-in scenario used when no file is given (plot2d, orbit3d)
    #[arg(short, long, default_value = "orbit3d")]
    preset: String,

    /// Step without a window and log diagnostics
    #[arg(long)]
    headless: bool,

    /// Keep the scenario's frame rate in headless mode
    #[arg(long)]
    paced: bool,

    /// Override the frame budget
    #[arg(long)]
    frames: Option<u64>,

    /// Override the wall-clock budget, in seconds
    #[arg(long)]
    seconds: Option<f64>,

    /// Override the initial conditions seed
    #[arg(long)]
    seed: Option<u64>,

    /// Run the step benchmark and exit
    #[arg(long)]
    bench: bool,

    /// With --bench, print a CSV curve instead of the summary table
    #[arg(long, requires = "bench")]
    curve: bool,
}

// load here to keep main clean
fn load_scenario(args: &Args) -> Result<ScenarioConfig> {
    let mut cfg = match &args.file {
        Some(file) => {
            let path = if file.exists() {
                file.clone()
            } else {
                PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file)
            };
            ScenarioConfig::from_path(&path)
                .with_context(|| format!("failed to load scenario {}", path.display()))?
        }
        None => preset(&args.preset)?,
    };

    if let Some(frames) = args.frames {
        cfg.engine.frames = Some(frames);
    }
    if let Some(seconds) = args.seconds {
        cfg.engine.seconds = Some(seconds);
    }
    if let Some(seed) = args.seed {
        cfg.initial.set_seed(seed);
    }
    if args.headless && cfg.engine.frames.is_none() && cfg.engine.seconds.is_none() {
        cfg.engine.frames = Some(HEADLESS_FRAMES);
    }

    cfg.validate().context("invalid scenario")?;
    Ok(cfg)
}

fn run_headless<const D: usize>(mut scenario: Scenario<D>, paced: bool) -> StopReason {
    if !paced {
        scenario.simulation.limits.rate = None;
    }

    let attractor = scenario.simulation.integrator.attractor;
    let eps = scenario.simulation.integrator.params.eps;

    let start = measure(&scenario.simulation.state, &attractor, eps);
    info!(
        "start: {} particles, E = {:.6}, L = {:.6}",
        start.alive,
        start.total_energy(),
        start.angular_momentum
    );

    let reason = scenario.simulation.run(|state, _| {
        if state.step % REPORT_EVERY == 0 {
            let d = measure(state, &attractor, eps);
            debug!(
                "t = {:8.3}: alive {:5}, absorbed {:5}, E = {:.6}, L = {:.6}",
                state.t,
                d.alive,
                d.absorbed,
                d.total_energy(),
                d.angular_momentum
            );
        }
    });

    let end = measure(&scenario.simulation.state, &attractor, eps);
    info!(
        "end: t = {:.3}, {} alive, {} absorbed, E drift = {:.6}, L drift = {:.6}",
        scenario.simulation.state.t,
        end.alive,
        end.absorbed,
        end.total_energy() - start.total_energy(),
        end.angular_momentum - start.angular_momentum
    );
    reason
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.bench {
        if args.curve {
            bench_step_curve();
        } else {
            bench_step();
        }
        return Ok(());
    }

    let cfg = load_scenario(&args)?;

    match (cfg.engine.dimension, args.headless) {
        (2, true) => {
            run_headless(Scenario2D::build_scenario(&cfg)?, args.paced);
        }
        (3, true) => {
            run_headless(Scenario3D::build_scenario_3d(&cfg)?, args.paced);
        }
        (2, false) => run_2d(Scenario2D::build_scenario(&cfg)?),
        (3, false) => run_3d(Scenario3D::build_scenario_3d(&cfg)?),
        (d, _) => bail!("unsupported dimension {d}"),
    }

    Ok(())
}
