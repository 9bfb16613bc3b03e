//! Locomotion & gravity state machine.
//!
//! ## Regime transitions
//!
//! | From         | Event               | To       | Side effect                                   |
//! |--------------|---------------------|----------|-----------------------------------------------|
//! | Free         | enter planar zone   | Planar   | yaw offset → 0; capture upright anchor        |
//! | Planar       | exit planar zone    | Free     | yaw offset → 0                                |
//! | Free/Planar  | enter radial zone   | Radial   | yaw offset → 0; record attractor; anchor      |
//! | Radial       | exit radial zone    | Free     | clear attractor; yaw offset → 0               |
//!
//! Any other (state, event) pair is ignored.  Transitions never write the
//! orientation: the anchor is only consumed by the next tick, so entering and
//! leaving a zone with no tick in between leaves the body exactly as it was.
//!
//! ## Tick (fixed timestep)
//!
//! 1. Thrust (and roll input in `Free`); brake zeroes velocity afterwards.
//! 2. Gravity for the active regime.
//! 3. `position += velocity · dt`, then the sphere boundary.
//! 4. Orientation: roll in `Free`, upright solver otherwise.
//!
//! The boundary runs before the upright solver so that a rescaled position
//! still gets a body aligned with the gravity direction at that position.
//!
//! Thrust and gravity are per-tick velocity increments, see
//! [`crate::constants`].

use super::state::{Attractor, ControlAction, FlightState, GravityRegime};
use crate::config::FlightConfig;
use crate::rotation::{align_axis_to, basis_vectors, compose, project_onto_plane, renormalize, Frame};
use bevy::prelude::*;

/// Outcome of feeding a zone event to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The regime changed.
    Applied,
    /// The event does not apply in the current regime.
    Ignored,
}

impl FlightState {
    // ── Transitions ───────────────────────────────────────────────────────────

    /// `Free → Planar`.
    pub fn enter_planar_zone(&mut self) -> Transition {
        if self.regime != GravityRegime::Free {
            return Transition::Ignored;
        }
        self.regime = GravityRegime::Planar;
        self.yaw_offset = 0.0;
        self.body.roll_rate = 0.0;
        self.anchor = upright_anchor(self.body.orientation, Vec3::Y);
        Transition::Applied
    }

    /// `Planar → Free`.
    pub fn exit_planar_zone(&mut self) -> Transition {
        if self.regime != GravityRegime::Planar {
            return Transition::Ignored;
        }
        self.regime = GravityRegime::Free;
        self.yaw_offset = 0.0;
        Transition::Applied
    }

    /// `Free/Planar → Radial`.
    pub fn enter_radial_zone(&mut self, attractor: Attractor) -> Transition {
        if let GravityRegime::Radial(_) = self.regime {
            return Transition::Ignored;
        }
        self.regime = GravityRegime::Radial(attractor);
        self.yaw_offset = 0.0;
        self.body.roll_rate = 0.0;
        let up = (self.body.position - attractor.center)
            .try_normalize()
            .unwrap_or_else(|| basis_vectors(self.body.orientation).up);
        self.anchor = upright_anchor(self.body.orientation, up);
        Transition::Applied
    }

    /// `Radial → Free`, only for the attractor that is currently active.
    pub fn exit_radial_zone(&mut self, attractor: Entity) -> Transition {
        match self.regime {
            GravityRegime::Radial(active) if active.id == attractor => {
                self.regime = GravityRegime::Free;
                self.yaw_offset = 0.0;
                Transition::Applied
            }
            _ => Transition::Ignored,
        }
    }

    /// Update the stored center of the active attractor.
    pub fn track_attractor(&mut self, attractor: Entity, center: Vec3) {
        if let GravityRegime::Radial(active) = &mut self.regime {
            if active.id == attractor {
                active.center = center;
            }
        }
    }

    // ── Tick ──────────────────────────────────────────────────────────────────

    /// Advance the body by one fixed tick of `dt` seconds.
    pub fn tick(&mut self, dt: f32, config: &FlightConfig) {
        let frame = self.upright_frame(config);

        self.apply_thrust(config, frame);
        if let Some(Upright { up, gravity }) = frame {
            self.body.velocity -= up * gravity;
        }
        self.body.position += self.body.velocity * dt;
        self.apply_boundary(config.world_radius);

        // Re-sampled at the final position so radial bodies stand on the
        // surface normal under them, not the one they left.
        match self.upright_frame(config) {
            None => self.apply_roll(dt),
            Some(Upright { up, .. }) => self.stand_upright(up),
        }
    }

    /// The one place the regime decides what "up" is and how hard gravity
    /// pulls against it.  `None` in `Free`.
    fn upright_frame(&self, config: &FlightConfig) -> Option<Upright> {
        match self.regime {
            GravityRegime::Free => None,
            GravityRegime::Planar => Some(Upright {
                up: Vec3::Y,
                gravity: config.planar_gravity,
            }),
            GravityRegime::Radial(attractor) => {
                Some(match (self.body.position - attractor.center).try_normalize() {
                    Some(up) => Upright {
                        up,
                        gravity: config.radial_gravity,
                    },
                    // On the center itself: keep the previous up, no pull.
                    None => Upright {
                        up: self.anchor * Vec3::Y,
                        gravity: 0.0,
                    },
                })
            }
        }
    }

    fn apply_thrust(&mut self, config: &FlightConfig, frame: Option<Upright>) {
        let basis = basis_vectors(self.body.orientation);
        let power = config.thrust_power;

        match frame {
            None => {
                for action in self.inputs.iter_held() {
                    let direction = match action {
                        ControlAction::ThrustForward => basis.forward,
                        ControlAction::ThrustBack => -basis.forward,
                        ControlAction::ThrustRight => basis.right,
                        ControlAction::ThrustLeft => -basis.right,
                        ControlAction::ThrustUp => basis.up,
                        ControlAction::ThrustDown => -basis.up,
                        ControlAction::RollRight => {
                            self.body.roll_rate += config.roll_power;
                            continue;
                        }
                        ControlAction::RollLeft => {
                            self.body.roll_rate -= config.roll_power;
                            continue;
                        }
                        ControlAction::Brake => continue,
                    };
                    self.body.velocity += direction * power;
                }
            }
            Some(Upright { up, .. }) => {
                let forward = project_onto_plane(basis.forward, up).unwrap_or(Vec3::ZERO);
                let right = project_onto_plane(basis.right, up).unwrap_or(Vec3::ZERO);
                for action in self.inputs.iter_held() {
                    let direction = match action {
                        ControlAction::ThrustForward => forward,
                        ControlAction::ThrustBack => -forward,
                        ControlAction::ThrustRight => right,
                        ControlAction::ThrustLeft => -right,
                        _ => continue,
                    };
                    self.body.velocity += direction * power;
                }
            }
        }

        if self.inputs.is_held(ControlAction::Brake) {
            self.body.velocity = Vec3::ZERO;
            self.body.roll_rate = 0.0;
        }
    }

    /// Free flight: spin about the local forward axis at the current roll rate.
    fn apply_roll(&mut self, dt: f32) {
        if self.body.roll_rate != 0.0 {
            self.body.orientation = compose(
                self.body.orientation,
                Vec3::NEG_Z,
                self.body.roll_rate * dt,
                Frame::Body,
            );
        }
    }

    /// Upright solver: swing the anchor's up onto `up` by the minimal
    /// rotation, then apply the accumulated heading about `up`.
    fn stand_upright(&mut self, up: Vec3) {
        let anchor_up = self.anchor * Vec3::Y;
        self.anchor = renormalize(align_axis_to(anchor_up, up) * self.anchor);
        self.body.orientation = with_heading(self.anchor, up, self.yaw_offset);
    }

    /// Rescale the body back onto the world sphere and drop outward velocity.
    fn apply_boundary(&mut self, radius: f32) {
        let dist = self.body.position.length();
        if dist <= radius {
            return;
        }
        let outward = self.body.position / dist;
        self.body.position = outward * radius;
        let radial_speed = self.body.velocity.dot(outward);
        if radial_speed > 0.0 {
            self.body.velocity -= outward * radial_speed;
        }
    }
}

/// Local up and gravity magnitude for a constrained tick.
#[derive(Debug, Clone, Copy)]
struct Upright {
    up: Vec3,
    /// Velocity removed along `up` each tick.
    gravity: f32,
}

/// Strip every non-yaw component from `orientation` relative to `up`.
fn upright_anchor(orientation: Quat, up: Vec3) -> Quat {
    let body_up = orientation * Vec3::Y;
    renormalize(align_axis_to(body_up, up) * orientation)
}

/// Turn `anchor` by `heading` radians to the right about `up`.
fn with_heading(anchor: Quat, up: Vec3, heading: f32) -> Quat {
    compose(anchor, up, -heading, Frame::World)
}
