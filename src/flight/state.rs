//! Flight components and plain data types.
//!
//! [`FlightState`] is the single owned state object for a flying body.  Input
//! systems, the fixed-tick locomotion system, and the camera all reach it
//! through ECS queries; nothing is stored in globals.  Systems that mutate it
//! live in the sibling modules:
//! - [`super::look`] — pointer drag → orientation / yaw offset
//! - [`super::locomotion`] — per-tick integration and regime transitions
//! - [`super::input`] — key and pointer edges
//! - [`super::zones`] — sensor events → regime transitions

use crate::rotation::{basis_vectors, Basis};
use bevy::prelude::*;

// ── Logical actions ───────────────────────────────────────────────────────────

/// Discrete controls the body understands, independent of the physical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlAction {
    ThrustForward,
    ThrustBack,
    ThrustLeft,
    ThrustRight,
    ThrustUp,
    ThrustDown,
    RollLeft,
    RollRight,
    Brake,
}

impl ControlAction {
    pub const COUNT: usize = 9;

    pub const ALL: [ControlAction; Self::COUNT] = [
        Self::ThrustForward,
        Self::ThrustBack,
        Self::ThrustLeft,
        Self::ThrustRight,
        Self::ThrustUp,
        Self::ThrustDown,
        Self::RollLeft,
        Self::RollRight,
        Self::Brake,
    ];

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }
}

/// The set of currently held [`ControlAction`]s.
///
/// Mutated by press/release edges, read once per tick.  Fixed-size, so
/// pressing and releasing never allocates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveInputs {
    held: [bool; ControlAction::COUNT],
}

impl ActiveInputs {
    pub fn press(&mut self, action: ControlAction) {
        self.held[action.index()] = true;
    }

    pub fn release(&mut self, action: ControlAction) {
        self.held[action.index()] = false;
    }

    #[inline]
    pub fn is_held(&self, action: ControlAction) -> bool {
        self.held[action.index()]
    }

    pub fn clear(&mut self) {
        self.held = [false; ControlAction::COUNT];
    }

    /// Held actions in declaration order.
    pub fn iter_held(&self) -> impl Iterator<Item = ControlAction> + '_ {
        ControlAction::ALL
            .into_iter()
            .filter(move |action| self.is_held(*action))
    }
}

// ── Gravity ───────────────────────────────────────────────────────────────────

/// A body that defines radial gravity while the flyer is inside its zone.
///
/// Owned by the scene; the flight state only keeps a copy of its last known
/// center, refreshed each frame by `attractor_tracking_system`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attractor {
    /// Opaque handle of the attractor in the scene.
    pub id: Entity,
    /// World-space center.
    pub center: Vec3,
    /// Effective radius of the attractor's influence zone.
    pub radius: f32,
}

/// The active constraint mode governing what "down" means and how steering
/// input is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GravityRegime {
    /// No gravity, full three-axis rotation.
    #[default]
    Free,
    /// Down is world −Y; yaw-only steering.
    Planar,
    /// Down points at the attractor's center; yaw-only steering.
    Radial(Attractor),
}

impl GravityRegime {
    /// `true` for the regimes that keep the body upright.
    #[inline]
    pub fn is_constrained(&self) -> bool {
        !matches!(self, GravityRegime::Free)
    }

    /// Short name for logs and telemetry.
    pub fn label(&self) -> &'static str {
        match self {
            GravityRegime::Free => "Free",
            GravityRegime::Planar => "Planar",
            GravityRegime::Radial(_) => "Radial",
        }
    }
}

// ── Kinematics ────────────────────────────────────────────────────────────────

/// Position, velocity, and orientation of the flying body, all in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyKinematics {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Unit quaternion, body → world.
    pub orientation: Quat,
    /// Spin about the local forward axis in rad/s, driven by the roll inputs.
    pub roll_rate: f32,
}

impl Default for BodyKinematics {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            roll_rate: 0.0,
        }
    }
}

impl BodyKinematics {
    /// World-space forward/right/up of the current orientation.
    #[inline]
    pub fn basis(&self) -> Basis {
        basis_vectors(self.orientation)
    }
}

// ── Pointer ───────────────────────────────────────────────────────────────────

/// One pointer sample, already filtered to the game viewport upstream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    /// Whether the pointer is currently held down.
    pub engaged: bool,
    /// Screen-space position in pixels.
    pub position: Vec2,
}

/// An in-progress drag; exists only between engage and release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Last sampled screen position.
    pub last: Vec2,
}

// ── The body ──────────────────────────────────────────────────────────────────

/// Everything the orientation & locomotion engine knows about one body.
#[derive(Component, Debug, Clone, PartialEq, Default)]
pub struct FlightState {
    pub body: BodyKinematics,
    pub regime: GravityRegime,
    /// Heading accumulated in the constrained regimes, in radians.
    /// Positive turns the body to its right.
    pub yaw_offset: f32,
    pub inputs: ActiveInputs,
    pub drag: Option<DragSession>,
    /// Yaw-free upright frame the upright solver builds on.  Only meaningful
    /// while the regime is constrained.
    pub(crate) anchor: Quat,
}

impl FlightState {
    /// A fresh body at the origin with identity orientation, in `Free`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore the start-of-session state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
