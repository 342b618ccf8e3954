//! Camera pose and tuning parameters.

use glam::Vec3;
use orrery_config::CameraConfig;
use orrery_input::ControlAction;

/// World up, used to derive the camera basis.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Pose of the observer. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverState {
    pub position: Vec3,
    /// Unit view direction.
    pub front: Vec3,
    /// Camera up, orthogonal to `front` and `right`.
    pub up: Vec3,
    pub right: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Vertical field of view.
    pub fov: f32,
    /// World units per second.
    pub movement_speed: f32,
}

impl ObserverState {
    /// Front vector for the given yaw/pitch in degrees.
    ///
    /// Yaw 0 faces +X, yaw -90 (or 270) faces -Z.
    #[must_use]
    pub fn front_from_angles(yaw: f32, pitch: f32) -> Vec3 {
        let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());
        Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize()
    }

    /// Recompute `front`, `right` and `up` from `yaw` and `pitch`.
    pub fn update_vectors(&mut self) {
        self.front = Self::front_from_angles(self.yaw, self.pitch);
        self.right = self.front.cross(WORLD_UP).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

/// Tuning for an [`ObserverController`](crate::ObserverController).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverParams {
    /// Degrees per unit of pointer offset.
    pub sensitivity: f32,
    pub movement_speed: f32,
    pub pitch_limit: f32,
    pub fov: f32,
    pub fov_min: f32,
    pub fov_max: f32,
    pub invert_y: bool,
    pub wrap_yaw: bool,
    pub near: f32,
    pub far: f32,
}

impl Default for ObserverParams {
    fn default() -> Self {
        Self::from(&CameraConfig::default())
    }
}

/// Bounds are normalised on the way in, so a hand-edited config can never
/// hand `f32::clamp` an inverted or NaN range.
impl From<&CameraConfig> for ObserverParams {
    fn from(config: &CameraConfig) -> Self {
        let (fov_min, fov_max) = config.fov_range();
        Self {
            sensitivity: config.mouse_sensitivity,
            movement_speed: config.movement_speed,
            pitch_limit: config.pitch_limit(),
            fov: config.clamp_fov(config.fov_deg),
            fov_min,
            fov_max,
            invert_y: config.invert_y,
            wrap_yaw: config.wrap_yaw,
            near: config.near,
            far: config.far,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

impl MoveDirection {
    pub const ALL: [Self; 6] = [
        Self::Forward,
        Self::Backward,
        Self::Left,
        Self::Right,
        Self::Up,
        Self::Down,
    ];

    /// Movement direction carried by a control action, if it is one.
    #[must_use]
    pub fn from_action(action: ControlAction) -> Option<Self> {
        Some(match action {
            ControlAction::MoveForward => Self::Forward,
            ControlAction::MoveBackward => Self::Backward,
            ControlAction::MoveLeft => Self::Left,
            ControlAction::MoveRight => Self::Right,
            ControlAction::MoveUp => Self::Up,
            ControlAction::MoveDown => Self::Down,
            _ => return None,
        })
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}
