//! Window creation and event handling via winit.
//!
//! [`OrreryApp`] implements winit's [`ApplicationHandler`]. Each redraw runs
//! input, animation and rendering in that order, then asks for the next
//! redraw, so the loop runs as fast as presentation allows.

use std::path::PathBuf;
use std::sync::Arc;

use orrery_config::Config;
use orrery_input::{InputSink, KeyBindings, KeyTransition, KeyboardState, MouseState};
use orrery_render::{
    GpuDrawer, RenderContext, RenderContextError, StarfieldParams, SurfaceError,
    init_render_context_blocking,
};
use tracing::{error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::clock::FrameClock;
use crate::context::AppContext;
use crate::frame::compose_frame;
use crate::overlay::window_title;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("GPU initialization failed: {0}")]
    Gpu(#[from] RenderContextError),

    #[error("GPU out of memory")]
    OutOfMemory,
}

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            f64::from(config.window.width),
            f64::from(config.window.height),
        ))
}

pub struct OrreryApp {
    config: Config,
    ctx: AppContext,
    bindings: KeyBindings,
    settings_path: PathBuf,
    window: Option<Arc<Window>>,
    gpu: Option<RenderContext>,
    drawer: Option<GpuDrawer>,
    keyboard: KeyboardState,
    mouse: MouseState,
    clock: FrameClock,
    title: String,
    fatal: Option<AppError>,
}

impl OrreryApp {
    pub fn new(
        config: Config,
        ctx: AppContext,
        bindings: KeyBindings,
        settings_path: PathBuf,
    ) -> Self {
        let title = config.window.title.clone();
        Self {
            config,
            ctx,
            bindings,
            settings_path,
            window: None,
            gpu: None,
            drawer: None,
            keyboard: KeyboardState::new(),
            mouse: MouseState::new(),
            clock: FrameClock::new(),
            title,
            fatal: None,
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        error!("{err}");
        self.fatal = Some(err);
        event_loop.exit();
    }

    /// Route a key edge through the bindings into the context.
    fn route_key(&mut self, transition: KeyTransition) {
        if let Some(action) = self.bindings.action_for_physical(transition.key) {
            self.ctx.on_key(action, transition.pressed);
        }
    }

    /// Grab or release the OS cursor to match the overlay state.
    fn sync_cursor(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        let grab = self.ctx.cursor_grabbed();
        if self.mouse.is_captured() != grab {
            self.mouse.set_captured(window, grab);
        }
    }

    fn update_title(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        let title = window_title(&self.config.window.title, &self.ctx);
        if title != self.title {
            window.set_title(&title);
            self.title = title;
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let dt = self.clock.tick();

        let scroll = self.mouse.scroll();
        if scroll != 0.0 {
            self.ctx.on_scroll(scroll);
        }
        self.mouse.clear_transients();
        self.keyboard.clear_transients();

        self.ctx.observer_mut().advance(dt);
        let transforms = self.ctx.scene().system.evaluate(self.clock.elapsed());

        let presented = match (&self.gpu, &mut self.drawer) {
            (Some(gpu), Some(drawer)) => {
                compose_frame(&self.ctx, &transforms, gpu.aspect_ratio(), drawer);
                drawer.present(gpu)
            }
            _ => Ok(()),
        };
        match presented {
            Ok(()) => {}
            Err(SurfaceError::Timeout) => warn!("Surface timeout, skipping frame"),
            Err(SurfaceError::Lost) => warn!("Surface lost, skipping frame"),
            Err(SurfaceError::OutOfMemory) => {
                self.fail(event_loop, AppError::OutOfMemory);
                return;
            }
        }

        self.update_title();
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for OrreryApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(window_attributes_from_config(&self.config)) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(event_loop, e.into());
                return;
            }
        };

        let gpu = match init_render_context_blocking(window.clone(), self.config.window.vsync) {
            Ok(gpu) => gpu,
            Err(e) => {
                self.fail(event_loop, e.into());
                return;
            }
        };

        let render = &self.config.render;
        let drawer = GpuDrawer::new(
            &gpu,
            render.sphere_segments,
            render.sphere_rings,
            StarfieldParams {
                density: render.star_density,
                probability: render.star_probability,
            },
        );
        let size = window.inner_size();
        info!("Window created: {}x{}", size.width, size.height);

        self.gpu = Some(gpu);
        self.drawer = Some(drawer);
        self.window = Some(window.clone());
        self.sync_cursor();
        window.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                    if let Some(drawer) = &mut self.drawer {
                        drawer.resize(&gpu.device, new_size.width, new_size.height);
                    }
                }
                info!("Window resized to {}x{}", new_size.width, new_size.height);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(transition) = self.keyboard.process_event(&event) {
                    self.route_key(transition);
                    self.sync_cursor();
                }
                if self.ctx.exit_requested() {
                    event_loop.exit();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(pointer) = self.mouse.on_cursor_moved(position.x, position.y) {
                    self.ctx.on_mouse_move(pointer.x, pointer.y);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.mouse.on_scroll(delta);
            }
            WindowEvent::Focused(false) => {
                for transition in self.keyboard.release_all() {
                    self.route_key(transition);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event
            && let Some(pointer) = self.mouse.on_raw_motion(delta.0, delta.1)
        {
            self.ctx.on_mouse_move(pointer.x, pointer.y);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        let settings = self.ctx.snapshot_settings();
        match settings.save(&self.settings_path) {
            Ok(()) => info!("Settings saved to {}", self.settings_path.display()),
            Err(e) => error!("Failed to save settings: {e}"),
        }
    }
}

/// Create the event loop and run until the window closes or Exit is
/// pressed. Settings are written on the way out.
#[instrument(skip_all)]
pub fn run(
    config: Config,
    ctx: AppContext,
    bindings: KeyBindings,
    settings_path: PathBuf,
) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = OrreryApp::new(config, ctx, bindings, settings_path);
    event_loop.run_app(&mut app)?;
    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;
    use orrery_config::PersistedSettings;
    use orrery_input::ControlAction;
    use orrery_observer::MoveDirection;
    use winit::keyboard::{KeyCode, PhysicalKey};

    fn app() -> OrreryApp {
        let config = Config::default();
        let ctx = AppContext::new(&config, PersistedSettings::default(), Scene::new());
        OrreryApp::new(config, ctx, KeyBindings::default(), PathBuf::from("unused.txt"))
    }

    #[test]
    fn test_bound_key_reaches_context() {
        let mut app = app();
        app.route_key(KeyTransition {
            key: PhysicalKey::Code(KeyCode::KeyW),
            pressed: true,
        });
        assert!(app.context().observer().is_held(MoveDirection::Forward));
    }

    #[test]
    fn test_unbound_key_is_ignored() {
        let mut app = app();
        app.route_key(KeyTransition {
            key: PhysicalKey::Code(KeyCode::KeyZ),
            pressed: true,
        });
        assert!(MoveDirection::ALL
            .iter()
            .all(|d| !app.context().observer().is_held(*d)));
    }

    #[test]
    fn test_escape_requests_exit() {
        let mut app = app();
        assert_eq!(
            app.bindings.action_for(KeyCode::Escape),
            Some(ControlAction::Exit)
        );
        app.route_key(KeyTransition {
            key: PhysicalKey::Code(KeyCode::Escape),
            pressed: true,
        });
        assert!(app.context().exit_requested());
    }

    #[test]
    fn test_new_app_has_no_window() {
        let app = app();
        assert!(app.window.is_none());
        assert!(app.gpu.is_none());
        assert_eq!(app.title, "Solar system");
    }
}
