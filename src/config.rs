//! Runtime flight configuration loaded from `assets/flight.toml`.
//!
//! [`FlightConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`load_flight_config`] reads
//! `assets/flight.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the values you care about:
//!
//! ```toml
//! look_sensitivity = 0.006
//! camera_policy = "LookAtReconstruct"
//! ```
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `FlightConfig::default()`.

use std::path::Path;

use crate::camera::CameraPolicy;
use crate::constants::*;
use crate::error::{
    require_at_most, require_non_negative, require_positive, ConfigError, ConfigResult,
};
use bevy::prelude::*;
use serde::Deserialize;

/// Default location of the config file, relative to the working directory.
pub const CONFIG_PATH: &str = "assets/flight.toml";

/// Runtime-tunable flight, gravity, and camera configuration.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    // ── Tick ──────────────────────────────────────────────────────────────────
    pub tick_seconds: f32,

    // ── Look ──────────────────────────────────────────────────────────────────
    pub look_sensitivity: f32,

    // ── Thrust ────────────────────────────────────────────────────────────────
    pub thrust_power: f32,
    pub roll_power: f32,

    // ── Gravity ───────────────────────────────────────────────────────────────
    pub planar_gravity: f32,
    pub radial_gravity: f32,

    // ── World Bounds ──────────────────────────────────────────────────────────
    pub world_radius: f32,

    // ── Camera ────────────────────────────────────────────────────────────────
    pub camera_up_offset: f32,
    pub camera_back_offset: f32,
    pub camera_policy: CameraPolicy,

    // ── Body ──────────────────────────────────────────────────────────────────
    pub body_collider_radius: f32,

    // ── Telemetry ─────────────────────────────────────────────────────────────
    pub telemetry_decimals: u32,
    pub telemetry_font_size: f32,
    pub show_telemetry: bool,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            tick_seconds: TICK_SECONDS,
            look_sensitivity: LOOK_SENSITIVITY,
            thrust_power: THRUST_POWER,
            roll_power: ROLL_POWER,
            planar_gravity: PLANAR_GRAVITY,
            radial_gravity: RADIAL_GRAVITY,
            world_radius: WORLD_RADIUS,
            camera_up_offset: CAMERA_UP_OFFSET,
            camera_back_offset: CAMERA_BACK_OFFSET,
            camera_policy: CameraPolicy::default(),
            body_collider_radius: BODY_COLLIDER_RADIUS,
            telemetry_decimals: TELEMETRY_DECIMALS,
            telemetry_font_size: TELEMETRY_FONT_SIZE,
            show_telemetry: true,
        }
    }
}

impl FlightConfig {
    /// Parse and validate a config from TOML text.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        let config: FlightConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate the config at `path`.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn load_from_path(path: impl AsRef<Path>) -> ConfigResult<Option<Self>> {
        let path = path.as_ref();
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        Self::from_toml_str(&contents).map(Some)
    }

    /// Reject values the flight tick cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        require_positive("tick_seconds", self.tick_seconds)?;
        require_positive("look_sensitivity", self.look_sensitivity)?;
        require_non_negative("thrust_power", self.thrust_power)?;
        require_non_negative("roll_power", self.roll_power)?;
        require_non_negative("planar_gravity", self.planar_gravity)?;
        require_non_negative("radial_gravity", self.radial_gravity)?;
        require_positive("world_radius", self.world_radius)?;
        require_non_negative("camera_up_offset", self.camera_up_offset)?;
        require_non_negative("camera_back_offset", self.camera_back_offset)?;
        require_positive("body_collider_radius", self.body_collider_radius)?;
        require_positive("telemetry_font_size", self.telemetry_font_size)?;
        require_at_most(
            "telemetry_decimals",
            self.telemetry_decimals,
            MAX_TELEMETRY_DECIMALS,
            "[0, 6]",
        )?;
        Ok(())
    }
}

/// Startup system: load `assets/flight.toml` into the `FlightConfig` resource
/// and align the fixed timestep with `tick_seconds`.
///
/// A missing file keeps the compiled defaults.  Read, parse, and validation
/// errors are logged and also keep the defaults; they never abort the app.
pub fn load_flight_config(mut config: ResMut<FlightConfig>, mut fixed: ResMut<Time<Fixed>>) {
    match FlightConfig::load_from_path(CONFIG_PATH) {
        Ok(Some(loaded)) => {
            *config = loaded;
            info!("Loaded flight config from {CONFIG_PATH}");
        }
        Ok(None) => info!("No {CONFIG_PATH} found; using compiled defaults"),
        Err(e) => warn!("{e}; using compiled defaults"),
    }
    fixed.set_timestep_seconds(f64::from(config.tick_seconds));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(FlightConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = FlightConfig::from_toml_str("look_sensitivity = 0.01\n").unwrap();
        assert!((config.look_sensitivity - 0.01).abs() < 1e-6);
        assert_eq!(config.thrust_power, THRUST_POWER);
        assert_eq!(config.camera_policy, CameraPolicy::CopyOrientation);
    }

    #[test]
    fn camera_policy_parses_by_name() {
        let config = FlightConfig::from_toml_str("camera_policy = \"LookAtReconstruct\"\n").unwrap();
        assert_eq!(config.camera_policy, CameraPolicy::LookAtReconstruct);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = FlightConfig::from_toml_str("tick_seconds = 0.0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                name: "tick_seconds",
                ..
            }
        ));
    }

    #[test]
    fn excessive_telemetry_decimals_are_rejected() {
        let err = FlightConfig::from_toml_str("telemetry_decimals = 40\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                name: "telemetry_decimals",
                ..
            }
        ));
        let ok = FlightConfig::from_toml_str("telemetry_decimals = 6\n").unwrap();
        assert_eq!(ok.telemetry_decimals, MAX_TELEMETRY_DECIMALS);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = FlightConfig::from_toml_str("thrust_power = \"fast\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let loaded = FlightConfig::load_from_path("definitely/not/here/flight.toml").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn startup_system_sets_fixed_timestep() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(FlightConfig::default());
        app.add_systems(Startup, load_flight_config);
        app.update();

        let fixed = app.world().resource::<Time<Fixed>>();
        let expected = f64::from(app.world().resource::<FlightConfig>().tick_seconds);
        assert!((fixed.timestep().as_secs_f64() - expected).abs() < 1e-9);
    }
}
