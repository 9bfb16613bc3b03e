//! Orientation and locomotion engine for a free-flying body.
//!
//! A quaternion-oriented body flies freely in zero gravity, or walks upright
//! under planar or radial gravity while inside a zone; a chase camera follows
//! it.  Everything is driven through Bevy ECS systems registered by
//! [`flight::FlightPlugin`].

pub mod camera;
pub mod config;
pub mod constants;
pub mod error;
pub mod flight;
pub mod rotation;
pub mod scene;
pub mod telemetry;
