//! Chase camera: pose derivation and the follow system.
//!
//! The camera sits behind and above the body in body space:
//!
//! ```text
//! camera_position = position + up · up_offset − forward · back_offset
//! ```
//!
//! Its orientation comes from one of two [`CameraPolicy`] variants.  They
//! agree while the body flies level and diverge once it rolls or inverts:
//! `CopyOrientation` rolls with the body, `LookAtReconstruct` re-derives roll
//! from the body's up each frame while aiming at the body itself.

use crate::config::FlightConfig;
use crate::flight::FlightState;
use crate::rotation::{basis_vectors, renormalize};
use bevy::prelude::*;
use serde::Deserialize;

/// How the chase camera derives its orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum CameraPolicy {
    /// Camera orientation is exactly the body orientation.
    #[default]
    CopyOrientation,
    /// Aim at the body, using the body's up as the roll reference.
    LookAtReconstruct,
}

/// Position and orientation of the chase camera for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl CameraPose {
    pub fn to_transform(self) -> Transform {
        Transform::from_translation(self.position).with_rotation(self.orientation)
    }
}

/// Marker for the camera that follows the flying body.
#[derive(Component)]
pub struct ChaseCamera;

/// Derive the chase camera pose from the body's final pose for the tick.
pub fn chase_camera_pose(
    position: Vec3,
    orientation: Quat,
    up_offset: f32,
    back_offset: f32,
    policy: CameraPolicy,
) -> CameraPose {
    let basis = basis_vectors(orientation);
    let camera_position = position + basis.up * up_offset - basis.forward * back_offset;

    let camera_orientation = match policy {
        CameraPolicy::CopyOrientation => orientation,
        CameraPolicy::LookAtReconstruct => {
            look_at(camera_position, position, basis.up).unwrap_or(orientation)
        }
    };

    CameraPose {
        position: camera_position,
        orientation: camera_orientation,
    }
}

/// Orientation whose forward (−Z) points from `eye` to `target` with roll
/// taken from `up_hint`, or `None` when the two are (nearly) parallel or the
/// eye sits on the target.
fn look_at(eye: Vec3, target: Vec3, up_hint: Vec3) -> Option<Quat> {
    let forward = (target - eye).try_normalize()?;
    let right = forward.cross(up_hint).try_normalize()?;
    let up = right.cross(forward);
    let basis = Mat3::from_cols(right, up, -forward);
    Some(renormalize(Quat::from_mat3(&basis)))
}

/// Place every [`ChaseCamera`] behind the body using the configured policy.
///
/// Reads the latest state directly; no interpolation between ticks.
pub fn camera_follow_system(
    q_body: Query<&FlightState>,
    mut q_camera: Query<&mut Transform, With<ChaseCamera>>,
    config: Res<FlightConfig>,
) {
    let Ok(state) = q_body.single() else {
        return;
    };
    let pose = chase_camera_pose(
        state.body.position,
        state.body.orientation,
        config.camera_up_offset,
        config.camera_back_offset,
        config.camera_policy,
    );
    for mut transform in q_camera.iter_mut() {
        *transform = pose.to_transform();
    }
}
