//! Orbit animation: per-frame placement of celestial bodies from elapsed time.
//!
//! Bodies move on circles in the XZ plane at a fixed height, optionally
//! relative to a parent body resolved in the same frame. Nothing here is
//! physically accurate; it is a stable, deterministic function of the clock.

pub mod animator;
pub mod body;
pub mod error;
pub mod system;

pub use animator::{
    BodyTransform, body_transform, local_offset, model_matrix, orbit_phase, shell_transform,
    spin_rotation, world_position,
};
pub use body::{AtmosphereShell, BodyId, CelestialBody, Spin};
pub use error::OrbitError;
pub use system::{FrameTransforms, SolarSystem};
