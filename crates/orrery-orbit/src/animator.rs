//! Pure per-body animation functions.
//!
//! All of these are deterministic in `(elapsed, parameters)`. A zero period
//! factor divides by zero and yields a non-finite phase; that NaN/inf flows
//! into the resulting position or rotation unchecked.

use glam::{Mat4, Quat, Vec3};

use crate::body::{AtmosphereShell, CelestialBody, Spin};

/// Resolved placement of one body for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyTransform {
    pub position: Vec3,
    pub model: Mat4,
}

/// Orbital angle in radians. Never wrapped, so it grows without bound.
#[inline]
#[must_use]
pub fn orbit_phase(elapsed: f32, period_factor: f32) -> f32 {
    elapsed / period_factor
}

/// Offset from the orbit centre: `(sin θ·r, vertical_offset, cos θ·r)`.
#[must_use]
pub fn local_offset(body: &CelestialBody, elapsed: f32) -> Vec3 {
    let theta = orbit_phase(elapsed, body.orbital_period_factor);
    Vec3::new(
        theta.sin() * body.orbit_radius,
        body.vertical_offset,
        theta.cos() * body.orbit_radius,
    )
}

/// Local offset plus the parent's position from the same frame.
#[must_use]
pub fn world_position(body: &CelestialBody, elapsed: f32, parent_position: Option<Vec3>) -> Vec3 {
    local_offset(body, elapsed) + parent_position.unwrap_or(Vec3::ZERO)
}

#[must_use]
pub fn spin_rotation(spin: Spin, elapsed: f32) -> Quat {
    match spin {
        Spin::Continuous { period_factor } => {
            Quat::from_rotation_y(orbit_phase(elapsed, period_factor))
        }
        Spin::Fixed { axis, angle } => Quat::from_axis_angle(axis.normalize(), angle),
        Spin::None => Quat::IDENTITY,
    }
}

/// `translate(position) * scale(scale) * rotate(rotation)`.
///
/// The rotation is applied first in object space, so the spin axis is not
/// affected by the translation.
#[must_use]
pub fn model_matrix(position: Vec3, scale: f32, rotation: Quat) -> Mat4 {
    Mat4::from_translation(position)
        * Mat4::from_scale(Vec3::splat(scale))
        * Mat4::from_quat(rotation)
}

#[must_use]
pub fn body_transform(
    body: &CelestialBody,
    elapsed: f32,
    parent_position: Option<Vec3>,
) -> BodyTransform {
    let position = world_position(body, elapsed, parent_position);
    let model = model_matrix(position, body.scale, spin_rotation(body.spin, elapsed));
    BodyTransform { position, model }
}

/// Model matrix of a shell around an anchor already placed this frame.
#[must_use]
pub fn shell_transform(shell: &AtmosphereShell, anchor_position: Vec3) -> Mat4 {
    Mat4::from_translation(anchor_position) * Mat4::from_scale(Vec3::splat(shell.scale))
}
