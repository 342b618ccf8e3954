//! Configuration system for Orrery.
//!
//! Two kinds of durable state live here:
//!
//! - [`Config`]: engine settings persisted as `config.ron`, with CLI
//!   overrides via clap and hot-reload detection.
//! - [`PersistedSettings`]: the small program state (background color,
//!   overlay flag, camera pose) written as a flat text file at shutdown.

mod cli;
mod config;
mod error;
mod settings;

pub use cli::CliArgs;
pub use config::{CameraConfig, Config, DebugConfig, RenderConfig, WindowConfig};
pub use error::{ConfigError, SettingsError};
pub use settings::{DEFAULT_CAMERA_FRONT, DEFAULT_CAMERA_POSITION, PersistedSettings};
