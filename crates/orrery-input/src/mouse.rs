//! Mouse state: a virtual pointer plus per-frame scroll.
//!
//! While the cursor is captured the OS pointer is locked in place, so the
//! pointer is advanced from raw device motion instead. While free it follows
//! `CursorMoved`. Either way consumers see one continuous pointer position
//! and can derive look offsets from successive samples.

use glam::Vec2;
use winit::event::MouseScrollDelta;

/// Pixels of a high-resolution scroll that count as one wheel line.
const PIXELS_PER_LINE: f64 = 40.0;

#[derive(Debug, Clone, Default)]
pub struct MouseState {
    pointer: Vec2,
    scroll: f32,
    captured: bool,
}

impl MouseState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a `CursorMoved` event. Returns the new pointer position when
    /// the cursor is free; ignored while captured.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) -> Option<Vec2> {
        if self.captured {
            return None;
        }
        self.pointer = Vec2::new(x as f32, y as f32);
        Some(self.pointer)
    }

    /// Process a `DeviceEvent::MouseMotion` delta. Returns the advanced
    /// pointer while captured; ignored otherwise.
    pub fn on_raw_motion(&mut self, dx: f64, dy: f64) -> Option<Vec2> {
        if !self.captured {
            return None;
        }
        self.pointer += Vec2::new(dx as f32, dy as f32);
        Some(self.pointer)
    }

    /// Process a `MouseWheel` event. Positive is away from the user.
    pub fn on_scroll(&mut self, delta: MouseScrollDelta) {
        match delta {
            MouseScrollDelta::LineDelta(_x, y) => {
                self.scroll += y;
            }
            MouseScrollDelta::PixelDelta(pos) => {
                self.scroll += (pos.y / PIXELS_PER_LINE) as f32;
            }
        }
    }

    /// Set capture state and apply grab/visibility to `window`.
    pub fn set_captured(&mut self, window: &winit::window::Window, captured: bool) {
        use winit::window::CursorGrabMode;
        self.captured = captured;
        if captured {
            // Locked is ideal; some platforms only support Confined.
            if window.set_cursor_grab(CursorGrabMode::Locked).is_err()
                && let Err(e) = window.set_cursor_grab(CursorGrabMode::Confined)
            {
                tracing::warn!("Cursor grab unavailable: {e}");
            }
            window.set_cursor_visible(false);
        } else {
            grab_released(window.set_cursor_grab(CursorGrabMode::None));
            window.set_cursor_visible(true);
        }
    }

    #[cfg(test)]
    pub(crate) fn set_captured_flag(&mut self, captured: bool) {
        self.captured = captured;
    }

    /// Clears the accumulated scroll. Call at end of frame.
    pub fn clear_transients(&mut self) {
        self.scroll = 0.0;
    }

    #[must_use]
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Scroll lines accumulated this frame.
    #[must_use]
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    #[must_use]
    pub fn is_captured(&self) -> bool {
        self.captured
    }
}

/// Report the outcome of releasing the cursor grab. Failure only leaves the
/// cursor confined, so it is logged at debug.
fn grab_released<E: std::fmt::Display>(result: Result<(), E>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!("Cursor release failed: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn test_free_cursor_follows_cursor_moved() {
        let mut ms = MouseState::new();
        assert_eq!(
            ms.on_cursor_moved(100.0, 200.0),
            Some(Vec2::new(100.0, 200.0))
        );
        assert_eq!(ms.on_raw_motion(5.0, 5.0), None);
        assert_eq!(ms.pointer(), Vec2::new(100.0, 200.0));
    }

    #[test]
    fn test_captured_pointer_advances_from_raw_motion() {
        let mut ms = MouseState::new();
        ms.on_cursor_moved(100.0, 200.0);
        ms.set_captured_flag(true);
        assert_eq!(ms.on_cursor_moved(500.0, 500.0), None);
        assert_eq!(ms.on_raw_motion(10.0, -5.0), Some(Vec2::new(110.0, 195.0)));
        assert_eq!(ms.on_raw_motion(1.0, 1.0), Some(Vec2::new(111.0, 196.0)));
    }

    #[test]
    fn test_scroll_accumulates_within_frame() {
        let mut ms = MouseState::new();
        ms.on_scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        ms.on_scroll(MouseScrollDelta::LineDelta(0.0, 0.5));
        assert!((ms.scroll() - 1.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_pixel_scroll_is_normalized_to_lines() {
        let mut ms = MouseState::new();
        ms.on_scroll(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 80.0)));
        assert!((ms.scroll() - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_scroll_resets_after_clear() {
        let mut ms = MouseState::new();
        ms.on_scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        ms.clear_transients();
        assert_eq!(ms.scroll(), 0.0);
    }

    #[test]
    fn test_grab_release_failure_is_reported() {
        assert!(grab_released::<String>(Ok(())));
        assert!(!grab_released(Err("grab mode not supported")));
    }
}
