use bevy::log::LogPlugin;
use bevy::math::primitives::Circle;
use bevy::prelude::*;
use bevy::sprite::{MaterialMesh2dBundle, Mesh2dHandle};
use log::info;

use super::{particle_color, DEFAULT_RATE};
use crate::simulation::scenario::Scenario2D;

#[derive(Component)]
struct ParticleIndex(pub usize);

/// Screen pixels per simulation unit
#[derive(Resource)]
struct ViewScale(f32);

/// Half the window height in pixels the view extent is fitted into
const HALF_VIEW_PX: f32 = 340.0;

/// Drawn radius of the attractor, simulation units
const ATTRACTOR_RADIUS: f32 = 0.4;

pub fn run_2d(scenario: Scenario2D) {
    let rate = scenario.view.rate.unwrap_or(DEFAULT_RATE);
    let scale = HALF_VIEW_PX / scenario.view.view_extent as f32;

    App::new()
        .insert_resource(scenario)
        .insert_resource(ViewScale(scale))
        .insert_resource(Time::<Fixed>::from_hz(rate))
        .insert_resource(ClearColor(Color::WHITE))
        // logging goes through env_logger, set up in main
        .add_plugins(DefaultPlugins.build().disable::<LogPlugin>())
        .add_systems(Startup, setup_particles_2d)
        .add_systems(FixedUpdate, physics_step_2d)
        .add_systems(Update, sync_particles_2d)
        .run();
}

fn setup_particles_2d(
    mut commands: Commands,
    scenario: Res<Scenario2D>,
    scale: Res<ViewScale>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let sim = &scenario.simulation;
    info!(
        "run_2d: starting Bevy 2D viewer with {} particles",
        sim.state.particles.len()
    );

    commands.spawn(Camera2dBundle::default());

    // Attractor
    commands.spawn(MaterialMesh2dBundle {
        mesh: Mesh2dHandle(meshes.add(Circle::new(ATTRACTOR_RADIUS * scale.0))),
        material: materials.add(ColorMaterial::from(Color::BLACK)),
        transform: Transform::from_xyz(0.0, 0.0, 0.0),
        ..Default::default()
    });

    let eps = sim.integrator.params.eps;
    let center = sim.integrator.attractor.position;
    let mesh = Mesh2dHandle(meshes.add(Circle::new(scenario.view.ball_radius as f32 * scale.0)));

    for (i, p) in sim.state.particles.iter().enumerate() {
        let color = particle_color(&scenario.view, p.distance_to(&center), eps);
        commands.spawn((
            MaterialMesh2dBundle {
                mesh: mesh.clone(),
                // one material per particle so each can change colour on its own
                material: materials.add(ColorMaterial::from(color)),
                transform: Transform::from_xyz(
                    p.x.x as f32 * scale.0,
                    p.x.y as f32 * scale.0,
                    1.0,
                ),
                ..Default::default()
            },
            ParticleIndex(i),
        ));
    }
}

fn physics_step_2d(mut scenario: ResMut<Scenario2D>) {
    scenario.simulation.step();
}

fn sync_particles_2d(
    scenario: Res<Scenario2D>,
    scale: Res<ViewScale>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut query: Query<(
        &ParticleIndex,
        &mut Transform,
        &mut Visibility,
        &Handle<ColorMaterial>,
    )>,
) {
    let sim = &scenario.simulation;
    let eps = sim.integrator.params.eps;
    let center = sim.integrator.attractor.position;
    let recolour = scenario.view.bands.is_some();

    for (ParticleIndex(i), mut transform, mut visibility, handle) in &mut query {
        let Some(p) = sim.state.particles.get(*i) else {
            continue;
        };
        if !p.is_alive() {
            *visibility = Visibility::Hidden;
            continue;
        }

        transform.translation.x = p.x.x as f32 * scale.0;
        transform.translation.y = p.x.y as f32 * scale.0;

        if recolour {
            if let Some(mat) = materials.get_mut(handle) {
                mat.color = particle_color(&scenario.view, p.distance_to(&center), eps);
            }
        }
    }
}
