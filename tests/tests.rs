use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use horizon::simulation::diagnostics::measure;
use horizon::simulation::forces::{AccelSet, Acceleration};
use horizon::simulation::initial::{Annulus, Shell};
use horizon::simulation::integrator::{euler_integrator, GravityIntegrator};
use horizon::simulation::params::{Attractor, Parameters};
use horizon::simulation::states::{NVec2, NVec3, Particle2, Particle3, State2, State3, Status, Vector};
use horizon::{preset, Band, DistanceBands, Scenario3D};

/// Attractor and parameters of the flat-ring scenario (G = 10, M = 1000)
pub fn ring_integrator(absorption_radius: Option<f64>) -> GravityIntegrator<2> {
    GravityIntegrator::new(
        Attractor::at_origin(1000.0, 10.0),
        Parameters {
            dt: 0.01,
            eps: 1.0e-3,
            absorption_radius,
        },
    )
}

/// Attractor and parameters of the orbit scenario (G = 10, M = 100, horizon 0.5)
pub fn orbit_integrator() -> GravityIntegrator<3> {
    GravityIntegrator::new(
        Attractor::at_origin(100.0, 10.0),
        Parameters {
            dt: 0.01,
            eps: 1.0e-6,
            absorption_radius: Some(0.5),
        },
    )
}

/// One 2D particle at `x` with velocity `v`
pub fn single(x: [f64; 2], v: [f64; 2]) -> State2 {
    State2::new(vec![Particle2::new(x.into(), v.into())])
}

/// Seeded shell of `count` particles
pub fn shell_state(count: usize, spin: f64, seed: u64) -> State3 {
    let mut rng = StdRng::seed_from_u64(seed);
    let shell = Shell {
        count,
        spin,
        ..Shell::default()
    };
    State3::new(shell.generate(&mut rng))
}

// ==================================================================================
// Force tests
// ==================================================================================

#[test]
fn gravity_points_toward_attractor() {
    let gravity = Attractor::<3>::at_origin(100.0, 10.0).gravity(1e-6);
    let x = NVec3::new(3.0, -4.0, 1.0);
    let a = gravity.acceleration(0.0, &x);

    assert!(a.dot(&x) < 0.0, "Acceleration is not toward the attractor");
    assert_relative_eq!(a.normalize(), -x.normalize(), epsilon = 1e-12);
}

#[test]
fn gravity_inverse_square_law() {
    let gravity = Attractor::<2>::at_origin(1.0, 1.0).gravity(1e-12);
    let a_r = gravity.acceleration(0.0, &NVec2::new(1.0, 0.0));
    let a_2r = gravity.acceleration(0.0, &NVec2::new(2.0, 0.0));

    let ratio = a_r.norm() / a_2r.norm();
    assert!((ratio - 4.0).abs() < 1e-9, "Expected ~4x, got {}", ratio);
}

#[test]
fn softening_keeps_force_finite_at_the_attractor() {
    let gravity = Attractor::<2>::at_origin(1000.0, 10.0).gravity(1e-3);

    let at_center = gravity.acceleration(0.0, &NVec2::zeros());
    assert_eq!(at_center, NVec2::zeros());

    let close = gravity.acceleration(0.0, &NVec2::new(1e-9, 0.0));
    assert!(close.norm().is_finite());
    // magnitude bounded by G*M*r/eps near the center
    assert!(close.norm() <= 10.0 * 1000.0 * 1e-9 / 1e-3 + 1e-12);
}

struct ConstantWind(NVec2);

impl Acceleration<2> for ConstantWind {
    fn acceleration(&self, _t: f64, _x: &Vector<2>) -> Vector<2> {
        self.0
    }
}

#[test]
fn accel_set_sums_terms() {
    let gravity = Attractor::<2>::at_origin(1000.0, 10.0).gravity(1e-3);
    let x = NVec2::new(10.0, 0.0);
    let alone = gravity.acceleration(0.0, &x);

    let forces = AccelSet::new()
        .with(gravity)
        .with(ConstantWind(NVec2::new(0.0, 2.0)));
    assert_eq!(forces.len(), 2);

    let total = forces.accumulate(0.0, &x);
    assert_relative_eq!(total, alone + NVec2::new(0.0, 2.0), epsilon = 1e-12);
    assert_eq!(AccelSet::<2>::new().accumulate(0.0, &x), NVec2::zeros());
}

#[test]
fn extra_terms_join_central_gravity() {
    let plain = ring_integrator(None);
    let windy = ring_integrator(None).with_term(ConstantWind(NVec2::new(0.0, 2.0)));
    assert_eq!(windy.forces.len(), 2);

    let mut a = single([10.0, 0.0], [0.0, 3.0]);
    let mut b = a.clone();
    plain.step(&mut a);
    windy.step(&mut b);

    assert_relative_eq!(b.particles[0].v.y - a.particles[0].v.y, 2.0 * 0.01, epsilon = 1e-12);
    assert_relative_eq!(b.particles[0].v.x, a.particles[0].v.x, epsilon = 1e-12);
}

// ==================================================================================
// Integrator tests
// ==================================================================================

#[test]
fn one_step_matches_hand_computation() {
    let integrator = ring_integrator(None);
    let mut sys = single([10.0, 0.0], [0.0, 3.0]);

    let report = integrator.step(&mut sys);
    assert_eq!(report.advanced, 1);
    assert_eq!(report.absorbed, 0);

    let expected_vx = -10.0 * 1000.0 * 10.0 / (1000.0 + 1e-3) * 0.01;
    let p = &sys.particles[0];

    assert_relative_eq!(expected_vx, -1.0, epsilon = 1e-5);
    assert_relative_eq!(p.v.x, expected_vx, max_relative = 1e-12);
    assert_relative_eq!(p.v.y, 3.0, max_relative = 1e-12);

    // position moves with the updated velocity
    assert_relative_eq!(p.x.x, 10.0 + expected_vx * 0.01, max_relative = 1e-12);
    assert_relative_eq!(p.x.y, 0.03, max_relative = 1e-12);

    assert_relative_eq!(sys.t, 0.01);
    assert_eq!(sys.step, 1);
}

#[test]
fn free_function_and_integrator_agree() {
    let integrator = ring_integrator(Some(0.5));
    let mut a = single([4.0, 1.0], [0.5, 2.0]);
    let mut b = a.clone();

    for _ in 0..100 {
        integrator.step(&mut a);
        euler_integrator(&mut b, &integrator.forces, &integrator.attractor, &integrator.params);
    }
    assert_eq!(a, b);
}

#[test]
fn step_is_continuous() {
    let integrator = orbit_integrator();
    let center = integrator.attractor.position;
    let dt = integrator.params.dt;
    let mut sys = shell_state(80, 0.3, 7);

    for _ in 0..500 {
        let before = sys.clone();
        integrator.step(&mut sys);

        for (old, new) in before.particles.iter().zip(sys.particles.iter()) {
            if !old.is_alive() || !new.is_alive() {
                continue;
            }
            let jump = (new.distance_to(&center) - old.distance_to(&center)).abs();
            assert!(
                jump <= new.v.norm() * dt + 1e-9,
                "distance jumped by {} with |v| dt = {}",
                jump,
                new.v.norm() * dt
            );
        }
    }
}

#[test]
fn trajectories_are_deterministic() {
    let integrator = orbit_integrator();
    let mut a = shell_state(80, 0.3, 42);
    let mut b = shell_state(80, 0.3, 42);
    assert_eq!(a, b);

    for _ in 0..1000 {
        integrator.step(&mut a);
        integrator.step(&mut b);
    }
    assert_eq!(a, b);
}

#[test]
fn euler_energy_drifts_but_stays_bounded() {
    let integrator = ring_integrator(None);
    let attractor = integrator.attractor;
    let eps = integrator.params.eps;
    // slightly eccentric orbit, apoapsis at r = 10
    let mut sys = single([10.0, 0.0], [0.0, 30.0]);

    let e0 = measure(&sys, &attractor, eps).total_energy();
    let mut max_drift: f64 = 0.0;
    for _ in 0..1000 {
        integrator.step(&mut sys);
        let e = measure(&sys, &attractor, eps).total_energy();
        max_drift = max_drift.max((e - e0).abs());
    }

    assert!(max_drift > 1e-6 * e0.abs(), "energy drift {} looks conserved", max_drift);
    assert!(max_drift < 0.1 * e0.abs(), "energy drift {} is unbounded", max_drift);
}

// ==================================================================================
// Absorption tests
// ==================================================================================

#[test]
fn particle_on_the_horizon_is_absorbed_the_same_frame() {
    let integrator = orbit_integrator();
    let mut sys = State3::new(vec![
        Particle3::new(NVec3::new(0.5, 0.0, 0.0), NVec3::new(0.0, 1.0, 0.0)),
        Particle3::new(NVec3::new(0.5 + 1e-9, 0.0, 0.0), NVec3::zeros()),
    ]);

    let report = integrator.step(&mut sys);
    assert_eq!(report.absorbed, 1);
    assert_eq!(report.advanced, 1);

    let on = &sys.particles[0];
    assert_eq!(on.status, Status::Absorbed { step: 0, t: 0.0 });
    // absorbed particles are not moved
    assert_eq!(on.x, NVec3::new(0.5, 0.0, 0.0));

    // just outside: advanced this frame, pulled inside, absorbed on the next
    assert!(sys.particles[1].is_alive());
    integrator.step(&mut sys);
    assert!(matches!(sys.particles[1].status, Status::Absorbed { step: 1, .. }));
}

#[test]
fn absorbed_particles_never_come_back() {
    let integrator = orbit_integrator();
    let mut sys = shell_state(200, 0.0, 3);
    // guaranteed plungers: already inside, and one that lands inside after one step
    sys.particles.push(Particle3::new(NVec3::new(0.3, 0.0, 0.0), NVec3::zeros()));
    sys.particles.push(Particle3::new(NVec3::new(1.0, 0.0, 0.0), NVec3::new(-60.0, 0.0, 0.0)));

    let mut alive = sys.alive_count();
    let mut frozen: Vec<Option<NVec3>> = vec![None; sys.particles.len()];

    for _ in 0..2000 {
        integrator.step(&mut sys);

        let now = sys.alive_count();
        assert!(now <= alive, "alive count grew from {} to {}", alive, now);
        alive = now;

        for (i, p) in sys.particles.iter().enumerate() {
            let seen = frozen[i];
            match seen {
                Some(x) => {
                    assert!(!p.is_alive(), "particle {} came back", i);
                    assert_eq!(p.x, x);
                }
                None if !p.is_alive() => frozen[i] = Some(p.x),
                None => {}
            }
        }
        assert!(sys.active().all(|(i, _)| frozen[i].is_none()));
    }

    assert!(sys.absorbed_count() >= 2);
    assert_eq!(sys.absorbed_count() + sys.alive_count(), sys.particles.len());
}

#[test]
fn no_absorption_without_radius() {
    let integrator = ring_integrator(None);
    let mut sys = single([0.0, 0.0], [0.0, 0.0]);

    for _ in 0..10 {
        integrator.step(&mut sys);
    }
    let p = &sys.particles[0];
    assert!(p.is_alive());
    assert_eq!(p.x, NVec2::zeros());
}

// ==================================================================================
// Diagnostics and bands
// ==================================================================================

#[test]
fn diagnostics_measure_live_particles() {
    let attractor = Attractor::<2>::at_origin(1000.0, 10.0);
    let mut sys = single([10.0, 0.0], [0.0, 3.0]);
    sys.particles.push(Particle2 {
        x: NVec2::new(0.1, 0.0),
        v: NVec2::new(100.0, 0.0),
        status: Status::Absorbed { step: 0, t: 0.0 },
    });

    let d = measure(&sys, &attractor, 1e-3);
    assert_eq!(d.alive, 1);
    assert_eq!(d.absorbed, 1);
    assert_relative_eq!(d.kinetic, 4.5);
    assert_relative_eq!(d.potential, -1000.0);
    assert_relative_eq!(d.angular_momentum, 30.0, epsilon = 1e-12);

    let attractor3 = Attractor::<3>::at_origin(1.0, 1.0);
    let sys3 = State3::new(vec![Particle3::new(
        NVec3::new(1.0, 0.0, 0.0),
        NVec3::new(0.0, 2.0, 0.0),
    )]);
    assert_relative_eq!(measure(&sys3, &attractor3, 1e-6).angular_momentum, 2.0, epsilon = 1e-12);
}

#[test]
fn bands_split_on_thresholds() {
    let bands = DistanceBands::default();
    assert_eq!(bands.classify(8.0, 1e-6), Band::Far);
    assert_eq!(bands.classify(5.0, 1e-6), Band::Mid);
    assert_eq!(bands.classify(3.0, 1e-6), Band::Mid);
    assert_eq!(bands.classify(2.0, 1e-6), Band::NearHorizon);
    assert_eq!(bands.classify(0.0, 1e-6), Band::NearHorizon);
    assert_ne!(Band::Far.rgb(), Band::NearHorizon.rgb());
}

// ==================================================================================
// Initial conditions
// ==================================================================================

#[test]
fn annulus_stays_in_its_ring() {
    let mut rng = StdRng::seed_from_u64(1);
    let annulus = Annulus::default();
    let particles = annulus.generate(&mut rng);

    assert_eq!(particles.len(), 300);
    for p in &particles {
        let r = p.x.norm();
        assert!((8.0..12.0).contains(&r), "radius {} outside the ring", r);
        // orbit bias: spin * (-y, x) plus small noise
        let bias = NVec2::new(-0.3 * p.x.y, 0.3 * p.x.x);
        assert!((p.v - bias).norm() < 1.0);
        assert!(p.is_alive());
    }
}

#[test]
fn shell_respects_bounds_and_exclusion() {
    let mut rng = StdRng::seed_from_u64(2);
    let shell = Shell {
        count: 500,
        extent: 15.0,
        exclusion: 7.0,
        ..Shell::default()
    };
    let particles = shell.generate(&mut rng);

    assert_eq!(particles.len(), 500);
    for p in &particles {
        let r = p.x.norm();
        assert!(r > 7.0 && r <= 9.0 + 1e-9, "radius {} outside (7, 9]", r);
        assert!(p.v.z.abs() <= 0.05 + 1e-12);
    }
}

#[test]
fn narrow_shell_outside_exclusion_still_fills() {
    let mut rng = StdRng::seed_from_u64(4);
    // only the outermost sliver of [6, 9] is clear of the exclusion radius
    let shell = Shell {
        count: 200,
        extent: 15.0,
        exclusion: 9.0 - 1e-9,
        ..Shell::default()
    };
    let particles = shell.generate(&mut rng);

    assert_eq!(particles.len(), 200);
    for p in &particles {
        let r = p.x.norm();
        assert!(r > 9.0 - 1e-6 && r <= 9.0 + 1e-9, "radius {} outside the sliver", r);
    }
}

#[test]
fn shell_inside_exclusion_is_empty() {
    let mut rng = StdRng::seed_from_u64(3);
    let shell = Shell {
        exclusion: 9.0,
        ..Shell::default()
    };
    assert!(shell.generate(&mut rng).is_empty());
}

#[test]
fn same_seed_same_scenario() {
    let mut cfg = preset("orbit3d").unwrap();
    cfg.initial.set_seed(42);

    let mut a = Scenario3D::build_scenario_3d(&cfg).unwrap();
    let mut b = Scenario3D::build_scenario_3d(&cfg).unwrap();
    assert_eq!(a.seed, Some(42));
    assert_eq!(a.simulation.state, b.simulation.state);

    for _ in 0..300 {
        a.simulation.step();
        b.simulation.step();
    }
    assert_eq!(a.simulation.state, b.simulation.state);

    cfg.initial.set_seed(43);
    let c = Scenario3D::build_scenario_3d(&cfg).unwrap();
    assert_ne!(c.simulation.state.particles[0].x, b.simulation.state.particles[0].x);
}
