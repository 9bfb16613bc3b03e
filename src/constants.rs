//! Centralised flight, gravity, and camera constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! [`crate::config::FlightConfig::default`] mirrors every constant below;
//! `assets/flight.toml` can override any subset at startup.
//!
//! ## Units
//!
//! Thrust and gravity values are **per-tick velocity increments** (world
//! units per second, added once per fixed tick), not accelerations.  Changing
//! `TICK_SECONDS` therefore changes how fast the body speeds up in wall-clock
//! time.

// ── Simulation Tick ───────────────────────────────────────────────────────────

/// Length of one logical simulation tick in seconds (16 ms ≈ 62.5 Hz).
///
/// Also used as the `Time<Fixed>` timestep, so the tick system always
/// integrates with exactly this `dt`.
pub const TICK_SECONDS: f32 = 0.016;

// ── Look ──────────────────────────────────────────────────────────────────────

/// Radians of rotation per pixel of pointer drag.
///
/// Applied linearly (no acceleration curve).  At 0.004 a 400 px drag turns
/// the body roughly 90°.
pub const LOOK_SENSITIVITY: f32 = 0.004;

// ── Thrust ────────────────────────────────────────────────────────────────────

/// Velocity added per tick along each held thrust direction.
pub const THRUST_POWER: f32 = 0.05;

/// Roll rate (rad/s) added per tick while a roll input is held (Free only).
pub const ROLL_POWER: f32 = 0.02;

// ── Gravity ───────────────────────────────────────────────────────────────────

/// Downward velocity added per tick inside a planar gravity zone.
pub const PLANAR_GRAVITY: f32 = 0.03;

/// Velocity added per tick toward the attractor inside a radial gravity zone.
pub const RADIAL_GRAVITY: f32 = 0.03;

// ── World Bounds ──────────────────────────────────────────────────────────────

/// Radius of the bounding sphere around the origin.
///
/// A body that leaves the sphere is rescaled back onto its surface and loses
/// the outward component of its velocity.
pub const WORLD_RADIUS: f32 = 1500.0;

// ── Camera ────────────────────────────────────────────────────────────────────

/// Chase camera offset along the body's local up axis.
pub const CAMERA_UP_OFFSET: f32 = 2.0;

/// Chase camera offset behind the body (along its local +Z).
pub const CAMERA_BACK_OFFSET: f32 = 8.0;

// ── Body ──────────────────────────────────────────────────────────────────────

/// Radius of the body's ball collider, used only for sensor overlap tests.
pub const BODY_COLLIDER_RADIUS: f32 = 0.5;

// ── Telemetry ─────────────────────────────────────────────────────────────────

/// Decimal places kept when rounding telemetry values for display.
pub const TELEMETRY_DECIMALS: u32 = 2;

/// Largest accepted `telemetry_decimals`; f32 carries ~7 significant digits.
pub const MAX_TELEMETRY_DECIMALS: u32 = 6;

/// Font size of the on-screen telemetry overlay.
pub const TELEMETRY_FONT_SIZE: f32 = 14.0;
