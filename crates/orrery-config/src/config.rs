//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Observer camera tuning.
    pub camera: CameraConfig,
    /// Rendering settings.
    pub render: RenderConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Window title.
    pub title: String,
}

/// Observer camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Degrees of yaw/pitch per pixel of pointer movement.
    pub mouse_sensitivity: f32,
    /// Movement speed in world units per second.
    pub movement_speed: f32,
    /// Pitch is clamped to `[-pitch_limit_deg, pitch_limit_deg]`.
    pub pitch_limit_deg: f32,
    /// Initial vertical field of view in degrees.
    pub fov_deg: f32,
    /// Smallest field of view reachable by zooming.
    pub fov_min_deg: f32,
    /// Largest field of view reachable by zooming.
    pub fov_max_deg: f32,
    /// Screen-down moves the view down (pointer y is inverted).
    pub invert_y: bool,
    /// Keep yaw inside `[0, 360)` instead of letting it grow without bound.
    pub wrap_yaw: bool,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Longitudinal segments of the generated body sphere.
    pub sphere_segments: u32,
    /// Latitudinal rings of the generated body sphere.
    pub sphere_rings: u32,
    /// Star grid resolution of the procedural skybox.
    pub star_density: f32,
    /// Fraction of skybox cells that contain a star.
    pub star_probability: f32,
    /// Specular exponent for lit bodies.
    pub shininess: f32,
    /// Point light constant attenuation term.
    pub light_constant: f32,
    /// Point light linear attenuation term.
    pub light_linear: f32,
    /// Point light quadratic attenuation term.
    pub light_quadratic: f32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// File name of the persisted program settings inside the data directory.
    pub settings_file: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 700,
            vsync: true,
            title: "Solar system".to_string(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 0.1,
            movement_speed: 17.5,
            pitch_limit_deg: 89.0,
            fov_deg: 45.0,
            fov_min_deg: 1.0,
            fov_max_deg: 90.0,
            invert_y: true,
            wrap_yaw: true,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl CameraConfig {
    /// Largest usable pitch limit. At 90° the front vector becomes parallel
    /// to world up and the camera basis degenerates.
    pub const MAX_PITCH_LIMIT_DEG: f32 = 89.9;

    /// `pitch_limit_deg` as a usable bound: sign dropped, capped below 90°,
    /// the default when the value is not finite.
    pub fn pitch_limit(&self) -> f32 {
        if !self.pitch_limit_deg.is_finite() {
            let fallback = Self::default().pitch_limit_deg;
            log::warn!(
                "camera.pitch_limit_deg is {}, using {fallback}",
                self.pitch_limit_deg
            );
            return fallback;
        }
        let limit = self.pitch_limit_deg.abs();
        if limit != self.pitch_limit_deg || limit > Self::MAX_PITCH_LIMIT_DEG {
            log::warn!(
                "camera.pitch_limit_deg {} out of range, using {}",
                self.pitch_limit_deg,
                limit.min(Self::MAX_PITCH_LIMIT_DEG)
            );
        }
        limit.min(Self::MAX_PITCH_LIMIT_DEG)
    }

    /// Zoom bounds as an ordered `(min, max)` pair. Swapped bounds are put
    /// back in order; a non-finite bound falls back to its default.
    pub fn fov_range(&self) -> (f32, f32) {
        let defaults = Self::default();
        let finite_or = |value: f32, fallback: f32, name: &str| {
            if value.is_finite() {
                value
            } else {
                log::warn!("camera.{name} is {value}, using {fallback}");
                fallback
            }
        };
        let a = finite_or(self.fov_min_deg, defaults.fov_min_deg, "fov_min_deg");
        let b = finite_or(self.fov_max_deg, defaults.fov_max_deg, "fov_max_deg");
        if a > b {
            log::warn!("camera.fov_min_deg {a} exceeds fov_max_deg {b}, swapping");
            (b, a)
        } else {
            (a, b)
        }
    }

    /// `fov` clamped into [`fov_range`](Self::fov_range). A non-finite `fov`
    /// becomes the default field of view, clamped the same way.
    pub fn clamp_fov(&self, fov: f32) -> f32 {
        let (min, max) = self.fov_range();
        let fov = if fov.is_finite() {
            fov
        } else {
            Self::default().fov_deg
        };
        fov.clamp(min, max)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sphere_segments: 48,
            sphere_rings: 24,
            star_density: 220.0,
            star_probability: 0.004,
            shininess: 128.0,
            light_constant: 1.0,
            light_linear: 0.09,
            light_quadratic: 0.001,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            settings_file: "program_state.txt".to_string(),
        }
    }
}

impl Config {
    /// File name inside the config directory.
    pub const FILE_NAME: &'static str = "config.ron";

    /// Read `config.ron` from `config_dir`, writing the defaults there first
    /// when it does not exist yet.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(Self::FILE_NAME);
        if !path.exists() {
            let config = Self::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", path.display());
            return Ok(config);
        }

        let config = read_config(&path)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write this config to `config_dir/config.ron`, creating the directory.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let path = config_dir.join(Self::FILE_NAME);
        let write_error = |source| ConfigError::Write {
            path: path.clone(),
            source,
        };
        std::fs::create_dir_all(config_dir).map_err(write_error)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized = ron::ser::to_string_pretty(self, pretty)?;
        std::fs::write(&path, serialized).map_err(write_error)
    }

    /// Re-read the file. `Some` only when it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let fresh = read_config(&config_dir.join(Self::FILE_NAME))?;
        if fresh == *self {
            return Ok(None);
        }
        log::info!("Config reloaded with changes");
        Ok(Some(fresh))
    }
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ron::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("width: 1000"));
        assert!(ron_str.contains("pitch_limit_deg: 89.0"));
    }

    #[test]
    fn test_camera_defaults_match_observer_conventions() {
        let camera = CameraConfig::default();
        assert_eq!(camera.fov_min_deg, 1.0);
        assert_eq!(camera.fov_max_deg, 90.0);
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 100.0);
        assert!(camera.invert_y);
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.camera.movement_speed = 3.25;
        config.render.sphere_segments = 12;
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(window: (width: 640))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 700);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.title = "Orrery test".to_string();
        config.camera.wrap_yaw = false;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.camera.mouse_sensitivity = 0.25;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().camera.mouse_sensitivity, 0.25);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_negative_pitch_limit_uses_magnitude() {
        let config: Config = ron::from_str("(camera: (pitch_limit_deg: -10.0))").unwrap();
        assert_eq!(config.camera.pitch_limit(), 10.0);
    }

    #[test]
    fn test_pitch_limit_capped_below_vertical() {
        let camera = CameraConfig {
            pitch_limit_deg: 120.0,
            ..Default::default()
        };
        assert_eq!(camera.pitch_limit(), CameraConfig::MAX_PITCH_LIMIT_DEG);
        let camera = CameraConfig {
            pitch_limit_deg: f32::NAN,
            ..Default::default()
        };
        assert_eq!(camera.pitch_limit(), 89.0);
    }

    #[test]
    fn test_inverted_fov_range_is_reordered() {
        let config: Config =
            ron::from_str("(camera: (fov_min_deg: 90.0, fov_max_deg: 1.0))").unwrap();
        assert_eq!(config.camera.fov_range(), (1.0, 90.0));
        assert_eq!(config.camera.clamp_fov(150.0), 90.0);
    }

    #[test]
    fn test_non_finite_fov_values_fall_back() {
        let camera = CameraConfig {
            fov_min_deg: f32::NAN,
            fov_max_deg: f32::INFINITY,
            ..Default::default()
        };
        assert_eq!(camera.fov_range(), (1.0, 90.0));
        assert_eq!(camera.clamp_fov(f32::NAN), 45.0);
    }
}
