//! Look controller: pointer drags → rotation.
//!
//! The steering mode follows the active [`GravityRegime`]:
//!
//! | Regime           | Horizontal drag (`dx`)              | Vertical drag (`dy`)               |
//! |------------------|-------------------------------------|------------------------------------|
//! | `Free`           | yaw about local up by `−dx·s`       | pitch about local right by `−dy·s` |
//! | `Planar`/`Radial`| `yaw_offset += dx·s`                | discarded                          |
//!
//! In `Free` the two rotations are composed in the body frame, pitch first
//! and yaw second, every sample.  Body-frame composition is what lets roll
//! accumulate over long drags; the order is fixed because the two orders
//! diverge under repeated input.  Pitch is never clamped.
//!
//! In the constrained regimes the orientation is rebuilt every tick by the
//! upright solver from the gravity direction and `yaw_offset`, so the look
//! controller never touches the quaternion there.

use super::state::{DragSession, FlightState, GravityRegime, PointerSample};
use crate::rotation::{compose, Frame};
use bevy::prelude::*;
use std::f32::consts::{PI, TAU};

/// Feed one pointer sample through the drag session.
///
/// - Engage edge (no session yet): start a session, no rotation.
/// - Engaged with a session: rotate by the delta from the last sample.
/// - Released: drop the session.
pub fn pointer_sample(state: &mut FlightState, sample: PointerSample, sensitivity: f32) {
    if !sample.engaged {
        state.drag = None;
        return;
    }
    let delta = match state.drag.as_mut() {
        Some(session) => {
            let delta = sample.position - session.last;
            session.last = sample.position;
            delta
        }
        None => {
            state.drag = Some(DragSession {
                last: sample.position,
            });
            return;
        }
    };
    apply_look_delta(state, delta, sensitivity);
}

/// Apply a raw screen-space drag delta according to the active regime.
pub fn apply_look_delta(state: &mut FlightState, delta: Vec2, sensitivity: f32) {
    if delta == Vec2::ZERO {
        return;
    }
    match state.regime {
        GravityRegime::Free => {
            let q = state.body.orientation;
            let q = compose(q, Vec3::X, -delta.y * sensitivity, Frame::Body);
            let q = compose(q, Vec3::Y, -delta.x * sensitivity, Frame::Body);
            state.body.orientation = q;
        }
        GravityRegime::Planar | GravityRegime::Radial(_) => {
            state.yaw_offset = wrap_angle(state.yaw_offset + delta.x * sensitivity);
        }
    }
}

/// Wrap an angle into `(−π, π]`.
fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::state::Attractor;
    use crate::rotation::basis_vectors;

    const S: f32 = 0.01;

    fn engaged(x: f32, y: f32) -> PointerSample {
        PointerSample {
            engaged: true,
            position: Vec2::new(x, y),
        }
    }

    fn released() -> PointerSample {
        PointerSample {
            engaged: false,
            position: Vec2::ZERO,
        }
    }

    #[test]
    fn engage_edge_starts_session_without_rotating() {
        let mut state = FlightState::new();
        pointer_sample(&mut state, engaged(100.0, 100.0), S);
        assert_eq!(state.body.orientation, Quat::IDENTITY);
        assert_eq!(
            state.drag,
            Some(DragSession {
                last: Vec2::new(100.0, 100.0)
            })
        );
    }

    #[test]
    fn release_discards_session() {
        let mut state = FlightState::new();
        pointer_sample(&mut state, engaged(0.0, 0.0), S);
        pointer_sample(&mut state, released(), S);
        assert!(state.drag.is_none());

        // A new engage after release must not produce a jump.
        pointer_sample(&mut state, engaged(500.0, 500.0), S);
        assert_eq!(state.body.orientation, Quat::IDENTITY);
    }

    #[test]
    fn drag_right_yaws_right_in_free() {
        let mut state = FlightState::new();
        pointer_sample(&mut state, engaged(0.0, 0.0), S);
        pointer_sample(&mut state, engaged(50.0, 0.0), S);
        let forward = basis_vectors(state.body.orientation).forward;
        assert!(forward.x > 0.1, "expected forward to swing toward +X, got {forward:?}");
        assert!(forward.y.abs() < 1e-5);
    }

    #[test]
    fn drag_down_pitches_down_in_free() {
        let mut state = FlightState::new();
        apply_look_delta(&mut state, Vec2::new(0.0, 30.0), S);
        let forward = basis_vectors(state.body.orientation).forward;
        assert!(forward.y < -0.1, "expected nose down, got {forward:?}");
    }

    #[test]
    fn free_look_composes_pitch_then_yaw_in_body_frame() {
        let delta = Vec2::new(40.0, -25.0);
        let mut state = FlightState::new();
        state.body.orientation = Quat::from_rotation_z(0.4);
        let start = state.body.orientation;
        apply_look_delta(&mut state, delta, S);

        let expected = start
            * Quat::from_rotation_x(-delta.y * S)
            * Quat::from_rotation_y(-delta.x * S);
        assert!(state.body.orientation.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn pitch_is_not_clamped() {
        let mut state = FlightState::new();
        // 200 px at 0.01 rad/px = 2 rad > π/2: nose goes past vertical.
        apply_look_delta(&mut state, Vec2::new(0.0, -200.0), S);
        let b = basis_vectors(state.body.orientation);
        assert!(b.up.y < 0.0, "expected to pitch past vertical, up = {:?}", b.up);
    }

    #[test]
    fn constrained_modes_only_accumulate_yaw() {
        let attractor = Attractor {
            id: Entity::PLACEHOLDER,
            center: Vec3::new(0.0, -50.0, 0.0),
            radius: 20.0,
        };
        for regime in [GravityRegime::Planar, GravityRegime::Radial(attractor)] {
            let mut state = FlightState::new();
            state.regime = regime;
            apply_look_delta(&mut state, Vec2::new(30.0, 80.0), S);
            assert_eq!(state.body.orientation, Quat::IDENTITY);
            assert!((state.yaw_offset - 0.3).abs() < 1e-6);
        }
    }

    #[test]
    fn yaw_offset_wraps() {
        assert!((wrap_angle(PI + 0.5) - (-PI + 0.5)).abs() < 1e-5);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-5);
        assert!((wrap_angle(0.25) - 0.25).abs() < 1e-6);
    }
}
