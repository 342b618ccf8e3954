//! The default scene: a sun, eight planets, the moon and two atmospheres.

use glam::Vec3;
use orrery_orbit::{AtmosphereShell, BodyId, CelestialBody, OrbitError, SolarSystem, Spin};

/// How a body is drawn. Bodies carry a flat tint instead of a texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    pub tint: Vec3,
    /// Self-lit; also the position of the point light.
    pub emissive: bool,
}

/// Bodies plus one [`Appearance`] per body, indexed by [`BodyId::index`].
#[derive(Debug, Clone)]
pub struct Scene {
    pub system: SolarSystem,
    appearances: Vec<Appearance>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            system: SolarSystem::new(),
            appearances: Vec::new(),
        }
    }

    /// Add a body with its appearance.
    pub fn add(&mut self, body: CelestialBody, appearance: Appearance) -> Result<BodyId, OrbitError> {
        let id = self.system.add_body(body)?;
        self.appearances.push(appearance);
        Ok(id)
    }

    pub fn appearance(&self, id: BodyId) -> Option<&Appearance> {
        self.appearances.get(id.index())
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

fn lit(r: f32, g: f32, b: f32) -> Appearance {
    Appearance {
        tint: Vec3::new(r, g, b),
        emissive: false,
    }
}

fn spin(period_factor: f32) -> Spin {
    Spin::Continuous { period_factor }
}

/// Build the solar system shown at startup.
pub fn default_catalog() -> Result<Scene, OrbitError> {
    let mut scene = Scene::new();

    scene.add(
        CelestialBody::star("sun", 10.5, spin(4.0)),
        Appearance {
            tint: Vec3::new(1.0, 0.85, 0.45),
            emissive: true,
        },
    )?;
    scene.add(
        CelestialBody::orbiting("mercury", 13.0, 4.0, 4.0, 1.7, spin(3.0)),
        lit(0.62, 0.58, 0.55),
    )?;
    let venus = scene.add(
        CelestialBody::orbiting("venus", 18.0, 5.0, 4.0, 2.4, spin(-2.0)),
        lit(0.9, 0.74, 0.45),
    )?;
    let earth = scene.add(
        CelestialBody::orbiting("earth", 24.3, 6.0, 4.0, 2.3, spin(2.0)),
        lit(0.25, 0.45, 0.8),
    )?;
    scene.add(
        CelestialBody::orbiting("moon", 2.85, 0.5, 0.5, 0.3, spin(4.0)).with_parent(earth),
        lit(0.7, 0.7, 0.68),
    )?;
    scene.add(
        CelestialBody::orbiting("mars", 30.0, 7.0, 4.0, 2.2, spin(2.0)),
        lit(0.8, 0.42, 0.25),
    )?;
    scene.add(
        CelestialBody::orbiting("jupiter", 37.0, 8.0, 4.0, 3.7, spin(1.0)),
        lit(0.85, 0.7, 0.52),
    )?;
    scene.add(
        CelestialBody::orbiting(
            "saturn",
            44.0,
            9.0,
            4.0,
            3.4,
            Spin::Fixed {
                axis: Vec3::X,
                angle: (-90.0f32).to_radians(),
            },
        ),
        lit(0.9, 0.8, 0.57),
    )?;
    scene.add(
        CelestialBody::orbiting("uranus", 49.6, 10.0, 4.0, 2.5, spin(2.0)),
        lit(0.6, 0.85, 0.9),
    )?;
    scene.add(
        CelestialBody::orbiting("neptune", 56.0, 11.0, 4.0, 2.6, spin(2.0)),
        lit(0.3, 0.45, 0.9),
    )?;

    scene.system.add_shell(AtmosphereShell {
        anchor: earth,
        scale: 2.4,
        color: [0.53, 0.65, 0.81],
        alpha: 0.1,
    })?;
    scene.system.add_shell(AtmosphereShell {
        anchor: venus,
        scale: 2.5,
        color: [0.78, 0.5, 0.06],
        alpha: 0.1,
    })?;

    Ok(scene)
}
