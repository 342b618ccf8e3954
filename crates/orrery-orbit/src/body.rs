//! Static description of the bodies being animated.

use glam::Vec3;

/// Index of a body inside the [`SolarSystem`](crate::SolarSystem) that
/// issued it. Meaningless for any other system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub(crate) usize);

impl BodyId {
    /// Position of the body in insertion order.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// How a body turns about its own centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Spin {
    /// Rotate about +Y by `elapsed / period_factor` radians.
    Continuous { period_factor: f32 },
    /// Constant orientation, `angle` radians about `axis`.
    Fixed { axis: Vec3, angle: f32 },
    /// No rotation.
    None,
}

/// A sun, planet or moon.
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialBody {
    pub name: String,
    /// Distance from the origin, or from the parent when there is one.
    pub orbit_radius: f32,
    /// Divisor of elapsed time giving the orbital angle. Smaller magnitude
    /// orbits faster; a negative value reverses direction.
    pub orbital_period_factor: f32,
    /// Height above the orbital plane, relative to the parent if any.
    pub vertical_offset: f32,
    /// Uniform size multiplier.
    pub scale: f32,
    pub spin: Spin,
    pub parent: Option<BodyId>,
}

impl CelestialBody {
    /// A body at the origin that only scales and spins.
    #[must_use]
    pub fn star(name: impl Into<String>, scale: f32, spin: Spin) -> Self {
        Self {
            name: name.into(),
            orbit_radius: 0.0,
            orbital_period_factor: 1.0,
            vertical_offset: 0.0,
            scale,
            spin,
            parent: None,
        }
    }

    /// A body on a circular orbit with no parent.
    #[must_use]
    pub fn orbiting(
        name: impl Into<String>,
        orbit_radius: f32,
        orbital_period_factor: f32,
        vertical_offset: f32,
        scale: f32,
        spin: Spin,
    ) -> Self {
        Self {
            name: name.into(),
            orbit_radius,
            orbital_period_factor,
            vertical_offset,
            scale,
            spin,
            parent: None,
        }
    }

    /// Builder-style: orbit `parent` instead of the origin.
    #[must_use]
    pub fn with_parent(mut self, parent: BodyId) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// Translucent sphere drawn around a body. Follows its anchor, never spins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtmosphereShell {
    pub anchor: BodyId,
    pub scale: f32,
    pub color: [f32; 3],
    pub alpha: f32,
}
