//! Flight module: the body's state, look controller, locomotion, input and
//! gravity zones.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`state`] | `FlightState` component and its plain data (`BodyKinematics`, `GravityRegime`, `ActiveInputs`, drag session) |
//! | [`look`] | Pointer drag → free rotation or constrained yaw offset |
//! | [`locomotion`] | Regime transitions and the fixed tick (thrust, gravity, boundary, upright solver) |
//! | [`input`] | Key bindings, keyboard/pointer edges, restart |
//! | [`zones`] | Rapier sensor zones → `ZoneEvent` → regime transitions |
//!
//! ## Schedule
//!
//! | Schedule | Systems |
//! |----------|---------|
//! | `Startup` | [`disable_engine_gravity`] |
//! | `FixedUpdate` | [`flight_tick_system`] |
//! | `Update` | input → zones → [`sync_body_transform_system`] → camera follow → telemetry |
//!
//! Public items are re-exported here so the rest of the crate can use flat
//! `crate::flight::*` imports.

pub mod input;
pub mod locomotion;
pub mod look;
pub mod state;
pub mod zones;

// ── Flat re-exports ───────────────────────────────────────────────────────────

pub use input::{
    keyboard_input_system, pointer_input_system, restart_system, KeyBindings, RestartFlight,
};
pub use locomotion::Transition;
pub use look::{apply_look_delta, pointer_sample};
pub use state::{
    ActiveInputs, Attractor, BodyKinematics, ControlAction, DragSession, FlightState,
    GravityRegime, PointerSample,
};
pub use zones::{
    attractor_tracking_system, zone_sensor_system, zone_transition_system, PlanarZone,
    RadialZone, ZoneEvent,
};

use crate::camera::camera_follow_system;
use crate::config::FlightConfig;
use crate::telemetry::{telemetry_display_system, telemetry_update_system, Telemetry};
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

// ── Plugin ────────────────────────────────────────────────────────────────────

/// Registers the flight resources, messages and systems.
///
/// Expects a [`FlightConfig`] resource (inserted by the host, usually
/// refreshed by [`crate::config::load_flight_config`] at startup).  Spawning
/// the body is left to the host; see [`spawn_flight_body`].
pub struct FlightPlugin;

impl Plugin for FlightPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<KeyBindings>()
            .init_resource::<Telemetry>()
            .add_message::<ZoneEvent>()
            .add_message::<RestartFlight>()
            .add_systems(Startup, disable_engine_gravity)
            .add_systems(FixedUpdate, flight_tick_system)
            .add_systems(
                Update,
                (
                    (keyboard_input_system, pointer_input_system, restart_system).chain(),
                    (
                        zone_sensor_system,
                        zone_transition_system,
                        attractor_tracking_system,
                    )
                        .chain(),
                    sync_body_transform_system,
                    camera_follow_system,
                    (telemetry_update_system, telemetry_display_system).chain(),
                )
                    .chain(),
            );
    }
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Advance every flying body by one fixed tick.
pub fn flight_tick_system(mut q_body: Query<&mut FlightState>, config: Res<FlightConfig>) {
    for mut state in q_body.iter_mut() {
        state.tick(config.tick_seconds, &config);
    }
}

/// Copy the body's pose into its `Transform`, which Rapier reads as the
/// kinematic target and the renderer draws.
pub fn sync_body_transform_system(mut q_body: Query<(&FlightState, &mut Transform)>) {
    for (state, mut transform) in q_body.iter_mut() {
        transform.translation = state.body.position;
        transform.rotation = state.body.orientation;
    }
}

/// Zero the Rapier world gravity; the flight tick applies gravity itself.
pub fn disable_engine_gravity(mut rapier_config: Query<&mut RapierConfiguration>) {
    for mut cfg in rapier_config.iter_mut() {
        cfg.gravity = Vec3::ZERO;
    }
}

// ── Body spawn ────────────────────────────────────────────────────────────────

/// Spawn the flying body at the world origin, at rest, in `Free`.
///
/// The body is kinematic: its pose is driven entirely by [`FlightState`] and
/// Rapier is used only to report sensor overlaps with zones.  Kinematic–fixed
/// pairs are not reported by default, hence the extra collision types.
pub fn spawn_flight_body(mut commands: Commands, config: Res<FlightConfig>) {
    commands.spawn((
        FlightState::new(),
        // Physics
        RigidBody::KinematicPositionBased,
        Collider::ball(config.body_collider_radius),
        ActiveEvents::COLLISION_EVENTS,
        ActiveCollisionTypes::default() | ActiveCollisionTypes::KINEMATIC_STATIC,
        // Transform / visibility
        Transform::from_translation(Vec3::ZERO),
        Visibility::default(),
    ));

    info!("[flight] Body spawned at origin");
}
