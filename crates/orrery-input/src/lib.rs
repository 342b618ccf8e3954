//! Input plumbing: keyboard and mouse frame state, key bindings to control
//! actions, and the [`InputSink`] seam the rest of the program consumes.

pub mod bindings;
pub mod keyboard;
pub mod mouse;
pub mod sink;

pub use bindings::{ControlAction, KeyBinding, KeyBindings};
pub use keyboard::{KeyTransition, KeyboardState, RawKeyEvent};
pub use mouse::MouseState;
pub use sink::InputSink;
