use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier3d::prelude::*;

use spacewalk::config::{self, FlightConfig};
use spacewalk::flight::{self, FlightPlugin};
use spacewalk::{scene, telemetry};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Spacewalk".into(),
                resolution: WindowResolution::new(1280, 720),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(Color::srgb(0.02, 0.02, 0.05)))
        // Compiled defaults; load_flight_config overwrites them from
        // assets/flight.toml (if present) in the Startup schedule.
        .insert_resource(FlightConfig::default())
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        .add_plugins(FlightPlugin)
        .add_systems(
            Startup,
            (
                // Load config first so every other startup system sees the final values.
                config::load_flight_config,
                scene::setup_camera.after(config::load_flight_config),
                scene::setup_scene.after(config::load_flight_config),
                telemetry::setup_telemetry_text.after(config::load_flight_config),
                flight::spawn_flight_body.after(config::load_flight_config),
            ),
        )
        .add_systems(Update, scene::attach_body_mesh_system)
        .run();
}
