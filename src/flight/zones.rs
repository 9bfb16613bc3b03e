//! Gravity zones: Rapier sensor overlaps → regime transitions.
//!
//! Zones are sensor colliders tagged with [`PlanarZone`] or [`RadialZone`].
//! The pipeline is split in two so hosts without a physics engine can drive
//! the state machine directly by writing [`ZoneEvent`]s:
//!
//! 1. [`zone_sensor_system`] — `CollisionEvent`s between the body and a zone
//!    → `ZoneEvent` messages.
//! 2. [`zone_transition_system`] — `ZoneEvent`s → `FlightState` transitions.
//! 3. [`attractor_tracking_system`] — keeps the active attractor's center in
//!    step with its entity, so moving attractors pull toward where they are.
//!
//! The flight tick owns gravity; the Rapier world gravity is zeroed by
//! [`super::disable_engine_gravity`].

use super::locomotion::Transition;
use super::state::{Attractor, FlightState, GravityRegime};
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

/// Sensor volume inside which down is world −Y.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PlanarZone;

/// Sensor volume around an attractor; inside it, down points at the zone's
/// translation.
#[derive(Component, Debug, Clone, Copy)]
pub struct RadialZone {
    /// Radius of the attractor body itself (not the sensor).
    pub radius: f32,
}

/// A zone boundary crossing, as seen by the state machine.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum ZoneEvent {
    EnterPlanar,
    ExitPlanar,
    EnterRadial(Attractor),
    ExitRadial(Entity),
}

/// Translate sensor overlaps between the flying body and zones into
/// [`ZoneEvent`]s.
pub fn zone_sensor_system(
    mut collision_events: MessageReader<CollisionEvent>,
    q_body: Query<Entity, With<FlightState>>,
    q_planar: Query<(), With<PlanarZone>>,
    q_radial: Query<(&RadialZone, &GlobalTransform)>,
    mut zone_events: MessageWriter<ZoneEvent>,
) {
    let Ok(body) = q_body.single() else {
        collision_events.clear();
        return;
    };

    for event in collision_events.read() {
        let (e1, e2, started) = match event {
            CollisionEvent::Started(e1, e2, _) => (*e1, *e2, true),
            CollisionEvent::Stopped(e1, e2, _) => (*e1, *e2, false),
        };

        let zone = if e1 == body {
            e2
        } else if e2 == body {
            e1
        } else {
            continue;
        };

        if q_planar.contains(zone) {
            zone_events.write(if started {
                ZoneEvent::EnterPlanar
            } else {
                ZoneEvent::ExitPlanar
            });
        } else if let Ok((radial, transform)) = q_radial.get(zone) {
            zone_events.write(if started {
                ZoneEvent::EnterRadial(Attractor {
                    id: zone,
                    center: transform.translation(),
                    radius: radial.radius,
                })
            } else {
                ZoneEvent::ExitRadial(zone)
            });
        }
    }
}

/// Apply [`ZoneEvent`]s to the flying body.
pub fn zone_transition_system(
    mut zone_events: MessageReader<ZoneEvent>,
    mut q_body: Query<&mut FlightState>,
) {
    let Ok(mut state) = q_body.single_mut() else {
        zone_events.clear();
        return;
    };

    for event in zone_events.read() {
        let before = state.regime.label();
        let outcome = match *event {
            ZoneEvent::EnterPlanar => state.enter_planar_zone(),
            ZoneEvent::ExitPlanar => state.exit_planar_zone(),
            ZoneEvent::EnterRadial(attractor) => state.enter_radial_zone(attractor),
            ZoneEvent::ExitRadial(attractor) => state.exit_radial_zone(attractor),
        };
        match outcome {
            Transition::Applied => {
                info!("[flight] {before} → {} ({event:?})", state.regime.label());
            }
            Transition::Ignored => {
                debug!("[flight] Ignored {event:?} while {before}");
            }
        }
    }
}

/// Refresh the stored center of the active attractor from its entity.
pub fn attractor_tracking_system(
    mut q_body: Query<&mut FlightState>,
    q_radial: Query<&GlobalTransform, With<RadialZone>>,
) {
    for mut state in q_body.iter_mut() {
        let GravityRegime::Radial(active) = state.regime else {
            continue;
        };
        if let Ok(transform) = q_radial.get(active.id) {
            let center = transform.translation();
            if center != active.center {
                state.track_attractor(active.id, center);
            }
        }
    }
}
