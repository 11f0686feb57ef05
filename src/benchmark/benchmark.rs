use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::simulation::initial::Shell;
use crate::simulation::integrator::GravityIntegrator;
use crate::simulation::params::{Attractor, Parameters};
use crate::simulation::states::State3;

/// Helper to build a seeded shell of `n` particles
fn make_state(n: usize) -> State3 {
    let mut rng = StdRng::seed_from_u64(42);
    let shell = Shell {
        count: n,
        ..Shell::default()
    };
    State3::new(shell.generate(&mut rng))
}

/// Helper to build the integrator the orbit preset uses
fn make_integrator() -> GravityIntegrator<3> {
    GravityIntegrator::new(
        Attractor::at_origin(100.0, 10.0),
        Parameters {
            dt: 0.01,
            eps: 1.0e-6,
            absorption_radius: Some(0.5),
        },
    )
}

/// Time `steps` steps on a copy of `template`, returns ms per step
fn time_steps(template: &State3, integrator: &GravityIntegrator<3>, steps: usize) -> f64 {
    let mut sys = template.clone();

    // Warm up
    integrator.step(&mut sys);

    let t0 = Instant::now();
    for _ in 0..steps {
        integrator.step(&mut sys);
    }
    t0.elapsed().as_secs_f64() * 1000.0 / steps as f64
}

/// Step cost for a range of particle counts
pub fn bench_step() {
    let ns = [100, 1_000, 10_000, 100_000, 1_000_000];
    let integrator = make_integrator();

    for n in ns {
        let steps = if n <= 10_000 { 100 } else { 10 };
        let template = make_state(n);
        let ms = time_steps(&template, &integrator, steps);
        println!(
            "N = {n:8}, step = {ms:10.4} ms, per particle = {:8.2} ns",
            ms * 1.0e6 / n as f64
        );
    }
}

/// Same measurement on a finer grid, printed as CSV
pub fn bench_step_curve() {
    println!("N,step_ms");

    let integrator = make_integrator();
    for n in (5_000..=100_000).step_by(5_000) {
        let template = make_state(n);
        let ms = time_steps(&template, &integrator, 20);
        println!("{},{:.6}", n, ms);
    }
}
