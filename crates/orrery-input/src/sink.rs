//! The seam between the windowing layer and whatever consumes input.

use crate::ControlAction;

/// Receives already-decoded input.
///
/// The window layer translates raw events (key codes through
/// [`KeyBindings`](crate::KeyBindings), pointer through
/// [`MouseState`](crate::MouseState)) and calls these in arrival order.
pub trait InputSink {
    /// A bound key changed state. Called once per edge, never for repeats.
    fn on_key(&mut self, action: ControlAction, pressed: bool);

    /// The pointer moved to `(x, y)` in screen-style coordinates (y down).
    fn on_mouse_move(&mut self, x: f32, y: f32);

    /// Wheel scrolled by `delta` lines, positive away from the user.
    fn on_scroll(&mut self, delta: f32);
}
