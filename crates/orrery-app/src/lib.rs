//! Orrery application: frame clock, application context, scene catalog,
//! frame composition, overlay and the winit event loop.

pub mod clock;
pub mod context;
pub mod frame;
pub mod overlay;
pub mod platform;
pub mod scene;
pub mod window;

pub use clock::FrameClock;
pub use context::AppContext;
pub use frame::compose_frame;
pub use overlay::{overlay_text, window_title};
pub use platform::{PlatformDirs, PlatformError};
pub use scene::{Appearance, Scene, default_catalog};
pub use window::{AppError, OrreryApp, run};
