//! The body catalog and its ordered per-frame evaluation pass.

use glam::{Mat4, Vec3};

use crate::animator::{BodyTransform, body_transform, shell_transform};
use crate::body::{AtmosphereShell, BodyId, CelestialBody};
use crate::error::OrbitError;

/// Bodies in insertion order plus their atmosphere shells.
///
/// A parent must be added before its children, so insertion order is always
/// a valid evaluation order.
#[derive(Debug, Clone, Default)]
pub struct SolarSystem {
    bodies: Vec<CelestialBody>,
    shells: Vec<AtmosphereShell>,
}

/// Everything placed by one [`SolarSystem::evaluate`] call.
#[derive(Debug, Clone)]
pub struct FrameTransforms {
    /// The clock value these transforms were computed for.
    pub elapsed: f32,
    bodies: Vec<BodyTransform>,
    shells: Vec<Mat4>,
}

impl FrameTransforms {
    /// Transform of `id`, if it belongs to the evaluated system.
    #[must_use]
    pub fn body(&self, id: BodyId) -> Option<&BodyTransform> {
        self.bodies.get(id.0)
    }

    #[must_use]
    pub fn position(&self, id: BodyId) -> Option<Vec3> {
        self.body(id).map(|t| t.position)
    }

    /// Body transforms in insertion order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &BodyTransform)> {
        self.bodies.iter().enumerate().map(|(i, t)| (BodyId(i), t))
    }

    /// Shell model matrices, in the order shells were added.
    #[must_use]
    pub fn shells(&self) -> &[Mat4] {
        &self.shells
    }
}

impl SolarSystem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a body. Its parent, if any, must already be present.
    pub fn add_body(&mut self, body: CelestialBody) -> Result<BodyId, OrbitError> {
        if let Some(parent) = body.parent
            && parent.0 >= self.bodies.len()
        {
            return Err(OrbitError::UnknownParent {
                body: body.name,
                parent,
            });
        }
        let id = BodyId(self.bodies.len());
        log::debug!("Added body '{}' as {id:?}", body.name);
        self.bodies.push(body);
        Ok(id)
    }

    /// Append an atmosphere shell anchored on an existing body.
    pub fn add_shell(&mut self, shell: AtmosphereShell) -> Result<usize, OrbitError> {
        if shell.anchor.0 >= self.bodies.len() {
            return Err(OrbitError::UnknownAnchor {
                anchor: shell.anchor,
            });
        }
        self.shells.push(shell);
        Ok(self.shells.len() - 1)
    }

    #[must_use]
    pub fn get(&self, id: BodyId) -> Option<&CelestialBody> {
        self.bodies.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &CelestialBody)> {
        self.bodies.iter().enumerate().map(|(i, b)| (BodyId(i), b))
    }

    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<BodyId> {
        self.bodies.iter().position(|b| b.name == name).map(BodyId)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    #[must_use]
    pub fn shells(&self) -> &[AtmosphereShell] {
        &self.shells
    }

    /// Place every body and shell for `elapsed` seconds.
    ///
    /// Bodies resolve in insertion order, so a child reads its parent's
    /// position from this same pass. Shells resolve last.
    #[must_use]
    pub fn evaluate(&self, elapsed: f32) -> FrameTransforms {
        let mut bodies: Vec<BodyTransform> = Vec::with_capacity(self.bodies.len());
        for body in &self.bodies {
            let parent_position = body.parent.map(|p| bodies[p.0].position);
            bodies.push(body_transform(body, elapsed, parent_position));
        }

        let shells = self
            .shells
            .iter()
            .map(|shell| shell_transform(shell, bodies[shell.anchor.0].position))
            .collect();

        FrameTransforms {
            elapsed,
            bodies,
            shells,
        }
    }
}
