//! Demo scene for the binary: chase camera, light, one planar zone and one
//! radial attractor.  Visual dressing is kept to primitive meshes.

use crate::camera::ChaseCamera;
use crate::flight::{FlightState, PlanarZone, RadialZone};
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

// ── Layout ────────────────────────────────────────────────────────────────────

/// Center of the planar gravity volume.
const PLANAR_ZONE_CENTER: Vec3 = Vec3::new(0.0, -20.0, -160.0);
/// Half-extents of the planar gravity volume.
const PLANAR_ZONE_HALF_EXTENTS: Vec3 = Vec3::new(80.0, 30.0, 80.0);

/// Center of the asteroid acting as radial attractor.
const ASTEROID_CENTER: Vec3 = Vec3::new(260.0, 40.0, -420.0);
/// Radius of the asteroid surface.
const ASTEROID_RADIUS: f32 = 45.0;
/// Radius of the radial gravity sensor around the asteroid.
const ASTEROID_ZONE_RADIUS: f32 = 140.0;

// ── Startup ───────────────────────────────────────────────────────────────────

/// Spawn the 3D camera with the chase marker.
pub fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        ChaseCamera,
        Transform::from_xyz(0.0, 2.0, 8.0),
    ));
}

/// Spawn the light and the two gravity zones.
pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            ..default()
        },
        Transform::from_xyz(200.0, 400.0, 100.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Planar zone: a floor slab with a sensor volume above it.
    let floor_top = PLANAR_ZONE_CENTER.y - PLANAR_ZONE_HALF_EXTENTS.y;
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(
            PLANAR_ZONE_HALF_EXTENTS.x * 2.0,
            1.0,
            PLANAR_ZONE_HALF_EXTENTS.z * 2.0,
        ))),
        MeshMaterial3d(materials.add(Color::srgb(0.25, 0.3, 0.35))),
        Transform::from_xyz(PLANAR_ZONE_CENTER.x, floor_top - 0.5, PLANAR_ZONE_CENTER.z),
    ));
    commands.spawn((
        PlanarZone,
        Collider::cuboid(
            PLANAR_ZONE_HALF_EXTENTS.x,
            PLANAR_ZONE_HALF_EXTENTS.y,
            PLANAR_ZONE_HALF_EXTENTS.z,
        ),
        Sensor,
        Transform::from_translation(PLANAR_ZONE_CENTER),
    ));

    // Radial zone: an asteroid whose sensor ball reaches well past its surface.
    commands.spawn((
        RadialZone {
            radius: ASTEROID_RADIUS,
        },
        Collider::ball(ASTEROID_ZONE_RADIUS),
        Sensor,
        Mesh3d(meshes.add(Sphere::new(ASTEROID_RADIUS))),
        MeshMaterial3d(materials.add(Color::srgb(0.45, 0.38, 0.3))),
        Transform::from_translation(ASTEROID_CENTER),
    ));

    info!(
        "[scene] Planar zone at {PLANAR_ZONE_CENTER}, asteroid at {ASTEROID_CENTER} (r = {ASTEROID_RADIUS})"
    );
}

// ── Update: body mesh ─────────────────────────────────────────────────────────

/// Give a newly spawned flying body its visible hull.
pub fn attach_body_mesh_system(
    mut commands: Commands,
    q_new: Query<Entity, Added<FlightState>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for entity in q_new.iter() {
        commands.entity(entity).insert((
            // Long axis along −Z so the nose points forward.
            Mesh3d(meshes.add(Cuboid::new(0.6, 0.3, 1.4))),
            MeshMaterial3d(materials.add(Color::srgb(0.85, 0.85, 0.9))),
        ));
    }
}
