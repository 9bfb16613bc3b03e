//! Pose telemetry and the optional on-screen readout.
//!
//! [`Telemetry`] is refreshed every frame from the body and the derived
//! chase-camera pose.  It keeps both the raw values (for hosts and tests) and
//! a copy rounded to `telemetry_decimals` for display.  Euler angles use the
//! `YXZ` order (yaw, then pitch, then roll) and are reported in degrees as
//! `(pitch, yaw, roll)`.

use crate::camera::chase_camera_pose;
use crate::config::FlightConfig;
use crate::constants::MAX_TELEMETRY_DECIMALS;
use crate::flight::FlightState;
use bevy::prelude::*;

// ── Resources ─────────────────────────────────────────────────────────────────

/// Position and orientation of one object, in display-friendly form.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PoseReadout {
    pub position: Vec3,
    /// `(pitch, yaw, roll)` in degrees.
    pub euler_degrees: Vec3,
    pub quaternion: Quat,
}

impl PoseReadout {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        let (yaw, pitch, roll) = orientation.to_euler(EulerRot::YXZ);
        Self {
            position,
            euler_degrees: Vec3::new(pitch.to_degrees(), yaw.to_degrees(), roll.to_degrees()),
            quaternion: orientation,
        }
    }

    pub fn rounded(&self, decimals: u32) -> Self {
        Self {
            position: round_vec(self.position, decimals),
            euler_degrees: round_vec(self.euler_degrees, decimals),
            quaternion: Quat::from_xyzw(
                round_to(self.quaternion.x, decimals),
                round_to(self.quaternion.y, decimals),
                round_to(self.quaternion.z, decimals),
                round_to(self.quaternion.w, decimals),
            ),
        }
    }
}

/// One frame of telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TelemetrySnapshot {
    pub regime: &'static str,
    pub velocity: Vec3,
    pub yaw_offset_degrees: f32,
    pub body: PoseReadout,
    pub camera: PoseReadout,
}

impl TelemetrySnapshot {
    pub fn rounded(&self, decimals: u32) -> Self {
        Self {
            regime: self.regime,
            velocity: round_vec(self.velocity, decimals),
            yaw_offset_degrees: round_to(self.yaw_offset_degrees, decimals),
            body: self.body.rounded(decimals),
            camera: self.camera.rounded(decimals),
        }
    }
}

/// Latest telemetry, raw and rounded for display.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct Telemetry {
    pub raw: TelemetrySnapshot,
    pub display: TelemetrySnapshot,
}

/// Marker for the telemetry overlay root node.
#[derive(Component)]
pub struct TelemetryTextDisplay;

/// Round to `decimals` places (at most [`MAX_TELEMETRY_DECIMALS`]); never
/// yields `-0.0`.
pub fn round_to(value: f32, decimals: u32) -> f32 {
    let scale = 10f32.powi(decimals.min(MAX_TELEMETRY_DECIMALS) as i32);
    (value * scale).round() / scale + 0.0
}

fn round_vec(v: Vec3, decimals: u32) -> Vec3 {
    Vec3::new(
        round_to(v.x, decimals),
        round_to(v.y, decimals),
        round_to(v.z, decimals),
    )
}

// ── Update: telemetry ─────────────────────────────────────────────────────────

/// Sample the body and the chase-camera pose into [`Telemetry`].
pub fn telemetry_update_system(
    q_body: Query<&FlightState>,
    config: Res<FlightConfig>,
    mut telemetry: ResMut<Telemetry>,
) {
    let Ok(state) = q_body.single() else {
        return;
    };
    let camera = chase_camera_pose(
        state.body.position,
        state.body.orientation,
        config.camera_up_offset,
        config.camera_back_offset,
        config.camera_policy,
    );
    let raw = TelemetrySnapshot {
        regime: state.regime.label(),
        velocity: state.body.velocity,
        yaw_offset_degrees: state.yaw_offset.to_degrees(),
        body: PoseReadout::new(state.body.position, state.body.orientation),
        camera: PoseReadout::new(camera.position, camera.orientation),
    };
    if raw == telemetry.raw {
        return;
    }
    telemetry.display = raw.rounded(config.telemetry_decimals);
    telemetry.raw = raw;
}

// ── Startup: overlay text ─────────────────────────────────────────────────────

/// Spawn the top-left telemetry overlay (hidden unless `show_telemetry`).
pub fn setup_telemetry_text(mut commands: Commands, config: Res<FlightConfig>) {
    let visibility = if config.show_telemetry {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                top: Val::Px(10.0),
                ..default()
            },
            TelemetryTextDisplay,
            visibility,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Regime: Free"),
                TextFont {
                    font_size: config.telemetry_font_size,
                    ..default()
                },
                TextColor(Color::srgb(0.0, 1.0, 1.0)),
            ));
        });
}

// ── Update: overlay text ──────────────────────────────────────────────────────

/// Rewrite the overlay text whenever [`Telemetry`] changes.
pub fn telemetry_display_system(
    telemetry: Res<Telemetry>,
    config: Res<FlightConfig>,
    parent_query: Query<&Children, With<TelemetryTextDisplay>>,
    mut text_query: Query<&mut Text>,
) {
    if !telemetry.is_changed() {
        return;
    }
    let decimals = config.telemetry_decimals.min(MAX_TELEMETRY_DECIMALS) as usize;
    let body = format_telemetry(&telemetry.display, decimals);
    for children in parent_query.iter() {
        for child in children.iter() {
            if let Ok(mut text) = text_query.get_mut(child) {
                *text = Text::new(body.clone());
            }
        }
    }
}

/// Multi-line overlay text for one snapshot.
pub fn format_telemetry(snapshot: &TelemetrySnapshot, decimals: usize) -> String {
    let v3 = |v: Vec3| format!("({:.*}, {:.*}, {:.*})", decimals, v.x, decimals, v.y, decimals, v.z);
    let q = |q: Quat| {
        format!(
            "[{:.*}, {:.*}, {:.*}, {:.*}]",
            decimals, q.x, decimals, q.y, decimals, q.z, decimals, q.w
        )
    };
    format!(
        "Regime: {}  yaw offset {:.*}°\n\
         Body   pos {}  rot {}°  q {}\n\
         Camera pos {}  rot {}°  q {}\n\
         Velocity {}",
        snapshot.regime,
        decimals,
        snapshot.yaw_offset_degrees,
        v3(snapshot.body.position),
        v3(snapshot.body.euler_degrees),
        q(snapshot.body.quaternion),
        v3(snapshot.camera.position),
        v3(snapshot.camera.euler_degrees),
        q(snapshot.camera.quaternion),
        v3(snapshot.velocity),
    )
}
