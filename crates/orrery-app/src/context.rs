//! Application state passed explicitly through the frame loop.

use orrery_config::{Config, PersistedSettings, RenderConfig};
use orrery_input::{ControlAction, InputSink};
use orrery_observer::{ObserverController, ObserverParams};
use tracing::{debug, info};

use crate::scene::Scene;

/// Everything one frame needs: the observer, the scene, the durable
/// settings and the toggles driven by one-shot key actions.
pub struct AppContext {
    observer: ObserverController,
    settings: PersistedSettings,
    scene: Scene,
    render: RenderConfig,
    blinn: bool,
    /// Background channel edited by the overlay keys (0 red, 1 green, 2 blue).
    background_channel: usize,
    exit_requested: bool,
}

/// Amount one overlay key press moves a background channel.
pub const BACKGROUND_STEP: f32 = 0.05;

impl AppContext {
    /// Start from persisted settings. The observer resumes at the saved pose;
    /// mouse look starts disabled when the overlay was left open.
    pub fn new(config: &Config, settings: PersistedSettings, scene: Scene) -> Self {
        let mut observer = ObserverController::new(
            ObserverParams::from(&config.camera),
            settings.camera_position,
            settings.camera_front,
        );
        if settings.ui_visible {
            observer.set_capture_enabled(false);
        }

        Self {
            observer,
            settings,
            scene,
            render: config.render.clone(),
            blinn: false,
            background_channel: 0,
            exit_requested: false,
        }
    }

    pub fn observer(&self) -> &ObserverController {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut ObserverController {
        &mut self.observer
    }

    pub fn settings(&self) -> &PersistedSettings {
        &self.settings
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn render_config(&self) -> &RenderConfig {
        &self.render
    }

    pub fn ui_visible(&self) -> bool {
        self.settings.ui_visible
    }

    /// Blinn-Phong instead of Phong specular.
    pub fn blinn(&self) -> bool {
        self.blinn
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// The OS cursor is grabbed whenever the overlay is hidden.
    pub fn cursor_grabbed(&self) -> bool {
        !self.settings.ui_visible
    }

    /// Show or hide the overlay. Opening it stops mouse look so the cursor
    /// can be used. Closing it leaves mouse look as it is; `C` turns it back on.
    pub fn toggle_overlay(&mut self) {
        self.settings.ui_visible = !self.settings.ui_visible;
        if self.settings.ui_visible {
            self.observer.set_capture_enabled(false);
        }
        info!("Overlay {}", if self.settings.ui_visible { "shown" } else { "hidden" });
    }

    /// Channel the overlay keys currently edit.
    pub fn background_channel(&self) -> usize {
        self.background_channel
    }

    /// Overwrite the background color. Channels are clamped to `[0, 1]`;
    /// a non-finite channel keeps its previous value.
    pub fn set_background_color(&mut self, color: [f32; 3]) {
        for (current, new) in self.settings.background_color.iter_mut().zip(color) {
            if new.is_finite() {
                *current = new.clamp(0.0, 1.0);
            }
        }
    }

    /// Move the selected background channel by `delta`.
    pub fn step_background(&mut self, delta: f32) {
        let mut color = self.settings.background_color;
        color[self.background_channel] += delta;
        self.set_background_color(color);
    }

    /// Overlay-only edits. Returns false when the overlay is hidden.
    fn edit_background(&mut self, action: ControlAction) -> bool {
        if !self.settings.ui_visible {
            return false;
        }
        match action {
            ControlAction::NextBackgroundChannel => {
                self.background_channel = (self.background_channel + 1) % 3;
            }
            ControlAction::BackgroundUp => self.step_background(BACKGROUND_STEP),
            ControlAction::BackgroundDown => self.step_background(-BACKGROUND_STEP),
            _ => return false,
        }
        let [r, g, b] = self.settings.background_color;
        debug!("Background ({r:.2}, {g:.2}, {b:.2}), channel {}", self.background_channel);
        true
    }

    /// Copy the observer pose into the settings and return them for saving.
    pub fn snapshot_settings(&mut self) -> PersistedSettings {
        let state = self.observer.state();
        self.settings.camera_position = state.position;
        self.settings.camera_front = state.front;
        self.settings
    }
}

impl InputSink for AppContext {
    fn on_key(&mut self, action: ControlAction, pressed: bool) {
        if action.is_continuous() {
            self.observer.on_key(action, pressed);
            return;
        }
        if !pressed {
            return;
        }
        match action {
            ControlAction::ToggleOverlay => self.toggle_overlay(),
            ControlAction::ToggleCapture => {
                let enabled = self.observer.toggle_capture();
                info!("Mouse look {}", if enabled { "enabled" } else { "disabled" });
            }
            ControlAction::ToggleBlinn => {
                self.blinn = !self.blinn;
                info!("Specular model: {}", if self.blinn { "Blinn-Phong" } else { "Phong" });
            }
            ControlAction::NextBackgroundChannel
            | ControlAction::BackgroundUp
            | ControlAction::BackgroundDown => {
                self.edit_background(action);
            }
            ControlAction::Exit => {
                info!("Exit requested");
                self.exit_requested = true;
            }
            _ => {}
        }
    }

    fn on_mouse_move(&mut self, x: f32, y: f32) {
        self.observer.on_mouse_move(x, y);
    }

    fn on_scroll(&mut self, delta: f32) {
        self.observer.on_scroll(delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use orrery_observer::MoveDirection;

    fn context(settings: PersistedSettings) -> AppContext {
        AppContext::new(&Config::default(), settings, Scene::new())
    }

    #[test]
    fn test_starts_from_saved_pose() {
        let settings = PersistedSettings {
            camera_position: Vec3::new(1.0, 2.0, 3.0),
            camera_front: Vec3::X,
            ..Default::default()
        };
        let ctx = context(settings);
        assert_eq!(ctx.observer().state().position, Vec3::new(1.0, 2.0, 3.0));
        assert!(ctx.observer().state().front.abs_diff_eq(Vec3::X, 1e-5));
        assert!(ctx.observer().capture_enabled());
        assert!(ctx.cursor_grabbed());
    }

    #[test]
    fn test_saved_overlay_disables_mouse_look() {
        let ctx = context(PersistedSettings {
            ui_visible: true,
            ..Default::default()
        });
        assert!(!ctx.observer().capture_enabled());
        assert!(!ctx.cursor_grabbed());
    }

    #[test]
    fn test_overlay_toggle_round_trip() {
        let mut ctx = context(PersistedSettings::default());
        ctx.on_key(ControlAction::ToggleOverlay, true);
        assert!(ctx.ui_visible());
        assert!(!ctx.observer().capture_enabled());

        ctx.on_key(ControlAction::ToggleOverlay, false);
        assert!(ctx.ui_visible(), "release must not toggle");

        ctx.on_key(ControlAction::ToggleOverlay, true);
        assert!(!ctx.ui_visible());
        assert!(
            !ctx.observer().capture_enabled(),
            "closing the overlay leaves mouse look off"
        );
        assert!(ctx.cursor_grabbed());

        ctx.on_key(ControlAction::ToggleCapture, true);
        assert!(ctx.observer().capture_enabled());
    }

    #[test]
    fn test_one_shot_actions_fire_on_press_only() {
        let mut ctx = context(PersistedSettings::default());
        ctx.on_key(ControlAction::ToggleBlinn, true);
        ctx.on_key(ControlAction::ToggleBlinn, false);
        assert!(ctx.blinn());

        ctx.on_key(ControlAction::ToggleCapture, true);
        assert!(!ctx.observer().capture_enabled());

        assert!(!ctx.exit_requested());
        ctx.on_key(ControlAction::Exit, true);
        assert!(ctx.exit_requested());
    }

    #[test]
    fn test_background_keys_only_work_with_overlay_open() {
        let mut ctx = context(PersistedSettings::default());
        ctx.on_key(ControlAction::BackgroundUp, true);
        assert_eq!(ctx.settings().background_color, [0.0; 3]);

        ctx.on_key(ControlAction::ToggleOverlay, true);
        ctx.on_key(ControlAction::BackgroundUp, true);
        ctx.on_key(ControlAction::BackgroundUp, false);
        ctx.on_key(ControlAction::NextBackgroundChannel, true);
        ctx.on_key(ControlAction::NextBackgroundChannel, true);
        ctx.on_key(ControlAction::BackgroundUp, true);
        ctx.on_key(ControlAction::BackgroundUp, true);
        assert_eq!(ctx.background_channel(), 2);
        assert_eq!(
            ctx.settings().background_color,
            [BACKGROUND_STEP, 0.0, BACKGROUND_STEP * 2.0]
        );

        ctx.on_key(ControlAction::NextBackgroundChannel, true);
        assert_eq!(ctx.background_channel(), 0);
    }

    #[test]
    fn test_background_channels_saturate() {
        let mut ctx = context(PersistedSettings::default());
        ctx.on_key(ControlAction::ToggleOverlay, true);
        ctx.on_key(ControlAction::BackgroundDown, true);
        assert_eq!(ctx.settings().background_color[0], 0.0);

        ctx.set_background_color([2.0, f32::NAN, 0.5]);
        assert_eq!(ctx.settings().background_color, [1.0, 0.0, 0.5]);
        ctx.on_key(ControlAction::BackgroundUp, true);
        assert_eq!(ctx.settings().background_color[0], 1.0);
    }

    #[test]
    fn test_movement_is_forwarded() {
        let mut ctx = context(PersistedSettings::default());
        ctx.on_key(ControlAction::MoveForward, true);
        assert!(ctx.observer().is_held(MoveDirection::Forward));
        ctx.on_key(ControlAction::MoveForward, false);
        assert!(!ctx.observer().is_held(MoveDirection::Forward));
    }

    #[test]
    fn test_scroll_zooms() {
        let mut ctx = context(PersistedSettings::default());
        ctx.on_scroll(5.0);
        assert_eq!(ctx.observer().state().fov, 40.0);
    }

    #[test]
    fn test_snapshot_copies_observer_pose() {
        let mut ctx = context(PersistedSettings::default());
        ctx.observer_mut().move_in(MoveDirection::Up, 1.0);
        let saved = ctx.snapshot_settings();
        assert_eq!(saved.camera_position, ctx.observer().state().position);
        assert_eq!(saved.camera_front, ctx.observer().state().front);
        assert_ne!(saved.camera_position, PersistedSettings::default().camera_position);
    }
}
