use bevy::log::LogPlugin;
use bevy::math::primitives::Sphere;
use bevy::prelude::*;
use log::info;

use super::trail::Trail;
use super::{particle_color, DEFAULT_RATE};
use crate::simulation::scenario::Scenario3D;
use crate::simulation::states::NVec3;

/// Component tagging each sphere with its particle index into the simulation state
#[derive(Component)]
struct ParticleIndex3(pub usize);

/// One trail per particle, same indexing as the simulation state
#[derive(Resource)]
struct Trails(Vec<Trail<Vec3>>);

const TRAIL_COLOR: Color = Color::srgba(1.0, 0.6, 0.0, 0.35);

fn to_vec3(x: &NVec3) -> Vec3 {
    Vec3::new(x.x as f32, x.y as f32, x.z as f32)
}

pub fn run_3d(scenario: Scenario3D) {
    let rate = scenario.view.rate.unwrap_or(DEFAULT_RATE);
    let trails = Trails(vec![
        Trail::new(scenario.view.trail);
        scenario.simulation.state.particles.len()
    ]);

    App::new()
        .insert_resource(scenario)
        .insert_resource(trails)
        .insert_resource(Time::<Fixed>::from_hz(rate))
        .insert_resource(ClearColor(Color::srgb(0.02, 0.02, 0.04)))
        // logging goes through env_logger, set up in main
        .add_plugins(DefaultPlugins.build().disable::<LogPlugin>())
        .add_systems(Startup, setup_3d)
        .add_systems(FixedUpdate, (physics_step_3d, record_trails_3d).chain())
        .add_systems(Update, (sync_particles_3d, draw_trails_3d))
        .run();
}

/// Startup system: spawn camera, horizon and one sphere per particle
fn setup_3d(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    scenario: Res<Scenario3D>,
) {
    let sim = &scenario.simulation;
    info!(
        "run_3d: starting Bevy 3D viewer with {} particles",
        sim.state.particles.len()
    );

    let extent = scenario.view.view_extent as f32;
    commands.spawn(Camera3dBundle {
        transform: Transform::from_xyz(0.0, 0.6 * extent, 2.2 * extent).looking_at(Vec3::ZERO, Vec3::Y),
        ..Default::default()
    });

    // Event horizon
    if let Some(radius) = sim.integrator.params.absorption_radius {
        commands.spawn(PbrBundle {
            mesh: meshes.add(Sphere::new(radius as f32).mesh()),
            material: materials.add(StandardMaterial {
                base_color: Color::BLACK,
                unlit: true,
                ..Default::default()
            }),
            transform: Transform::from_translation(to_vec3(&sim.integrator.attractor.position)),
            ..Default::default()
        });
    }

    let eps = sim.integrator.params.eps;
    let center = sim.integrator.attractor.position;
    let mesh = meshes.add(Sphere::new(scenario.view.ball_radius as f32).mesh());

    for (i, p) in sim.state.particles.iter().enumerate() {
        commands.spawn((
            PbrBundle {
                mesh: mesh.clone(),
                material: materials.add(StandardMaterial {
                    base_color: particle_color(&scenario.view, p.distance_to(&center), eps),
                    unlit: true,
                    ..Default::default()
                }),
                transform: Transform::from_translation(to_vec3(&p.x)),
                ..Default::default()
            },
            ParticleIndex3(i),
        ));
    }
}

/// One integration step per fixed tick
fn physics_step_3d(mut scenario: ResMut<Scenario3D>) {
    scenario.simulation.step();
}

/// Trails freeze once the simulation has stopped
fn record_trails_3d(scenario: Res<Scenario3D>, mut trails: ResMut<Trails>) {
    if !scenario.simulation.is_running() {
        return;
    }
    for (p, trail) in scenario.simulation.state.particles.iter().zip(trails.0.iter_mut()) {
        if p.is_alive() {
            trail.push(to_vec3(&p.x));
        } else {
            trail.clear();
        }
    }
}

fn sync_particles_3d(
    scenario: Res<Scenario3D>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut query: Query<(
        &ParticleIndex3,
        &mut Transform,
        &mut Visibility,
        &Handle<StandardMaterial>,
    )>,
) {
    let sim = &scenario.simulation;
    let eps = sim.integrator.params.eps;
    let center = sim.integrator.attractor.position;
    let recolour = scenario.view.bands.is_some();

    for (ParticleIndex3(i), mut transform, mut visibility, mat_handle) in &mut query {
        let Some(p) = sim.state.particles.get(*i) else {
            continue;
        };
        if !p.is_alive() {
            *visibility = Visibility::Hidden;
            continue;
        }

        transform.translation = to_vec3(&p.x);

        if recolour {
            if let Some(mat) = materials.get_mut(mat_handle) {
                mat.base_color = particle_color(&scenario.view, p.distance_to(&center), eps);
            }
        }
    }
}

fn draw_trails_3d(mut gizmos: Gizmos, trails: Res<Trails>) {
    for trail in trails.0.iter().filter(|t| t.len() > 1) {
        gizmos.linestrip(trail.iter(), TRAIL_COLOR);
    }
}
