//! Frame-coherent keyboard state tracker.
//!
//! [`KeyboardState`] accumulates winit [`KeyEvent`]s and reports each real
//! press/release edge exactly once, so held-key movement and one-shot toggles
//! can be driven from the same stream. OS key repeat never produces an edge.
//!
//! Physical key codes are used throughout so WASD works the same on every
//! keyboard layout.

use std::collections::HashSet;

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::PhysicalKey;

/// Minimal description of a key event for processing.
#[derive(Debug, Clone, Copy)]
pub struct RawKeyEvent {
    /// The physical key involved.
    pub key: PhysicalKey,
    /// Whether the key was pressed or released.
    pub state: ElementState,
    /// Whether this is a repeat event.
    pub repeat: bool,
}

/// A press or release edge for a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyTransition {
    pub key: PhysicalKey,
    pub pressed: bool,
}

/// Tracks held keys plus the edges seen since the last
/// [`clear_transients`](Self::clear_transients).
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    pressed: HashSet<PhysicalKey>,
    just_pressed: HashSet<PhysicalKey>,
    just_released: HashSet<PhysicalKey>,
}

impl KeyboardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes a winit [`KeyEvent`], returning the edge it produced.
    pub fn process_event(&mut self, event: &KeyEvent) -> Option<KeyTransition> {
        self.process_raw(RawKeyEvent {
            key: event.physical_key,
            state: event.state,
            repeat: event.repeat,
        })
    }

    /// Processes a [`RawKeyEvent`] (platform-independent, test-friendly).
    ///
    /// Returns `None` for repeats, for a press of an already-held key and for
    /// a release of a key that was never seen pressed.
    pub fn process_raw(&mut self, event: RawKeyEvent) -> Option<KeyTransition> {
        if event.repeat {
            return None;
        }
        let pressed = event.state.is_pressed();
        let changed = if pressed {
            self.pressed.insert(event.key)
        } else {
            self.pressed.remove(&event.key)
        };
        if !changed {
            return None;
        }

        let edges = if pressed {
            &mut self.just_pressed
        } else {
            &mut self.just_released
        };
        edges.insert(event.key);
        Some(KeyTransition {
            key: event.key,
            pressed,
        })
    }

    /// Release every held key, e.g. when the window loses focus and the
    /// matching release events will never arrive.
    pub fn release_all(&mut self) -> Vec<KeyTransition> {
        let released: Vec<KeyTransition> = self
            .pressed
            .drain()
            .map(|key| KeyTransition {
                key,
                pressed: false,
            })
            .collect();
        self.just_released
            .extend(released.iter().map(|transition| transition.key));
        released
    }

    #[must_use]
    pub fn is_pressed(&self, key: PhysicalKey) -> bool {
        self.pressed.contains(&key)
    }

    #[must_use]
    pub fn just_pressed(&self, key: PhysicalKey) -> bool {
        self.just_pressed.contains(&key)
    }

    #[must_use]
    pub fn just_released(&self, key: PhysicalKey) -> bool {
        self.just_released.contains(&key)
    }

    /// Clears the per-frame edge sets. Call at end of frame.
    pub fn clear_transients(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::KeyCode;

    fn raw(code: KeyCode, state: ElementState, repeat: bool) -> RawKeyEvent {
        RawKeyEvent {
            key: PhysicalKey::Code(code),
            state,
            repeat,
        }
    }

    #[test]
    fn test_press_produces_edge() {
        let mut kb = KeyboardState::new();
        let edge = kb.process_raw(raw(KeyCode::KeyW, ElementState::Pressed, false));
        let pk = PhysicalKey::Code(KeyCode::KeyW);
        assert_eq!(
            edge,
            Some(KeyTransition {
                key: pk,
                pressed: true
            })
        );
        assert!(kb.is_pressed(pk));
        assert!(kb.just_pressed(pk));
    }

    #[test]
    fn test_repeat_and_double_press_produce_no_edge() {
        let mut kb = KeyboardState::new();
        assert!(
            kb.process_raw(raw(KeyCode::KeyB, ElementState::Pressed, false))
                .is_some()
        );
        assert!(
            kb.process_raw(raw(KeyCode::KeyB, ElementState::Pressed, true))
                .is_none()
        );
        assert!(
            kb.process_raw(raw(KeyCode::KeyB, ElementState::Pressed, false))
                .is_none()
        );
    }

    #[test]
    fn test_release_clears_pressed() {
        let mut kb = KeyboardState::new();
        kb.process_raw(raw(KeyCode::KeyW, ElementState::Pressed, false));
        let edge = kb.process_raw(raw(KeyCode::KeyW, ElementState::Released, false));
        let pk = PhysicalKey::Code(KeyCode::KeyW);
        assert_eq!(edge.map(|e| e.pressed), Some(false));
        assert!(!kb.is_pressed(pk));
        assert!(kb.just_released(pk));
    }

    #[test]
    fn test_stray_release_ignored() {
        let mut kb = KeyboardState::new();
        assert!(
            kb.process_raw(raw(KeyCode::KeyS, ElementState::Released, false))
                .is_none()
        );
    }

    #[test]
    fn test_just_pressed_true_for_one_frame_only() {
        let mut kb = KeyboardState::new();
        kb.process_raw(raw(KeyCode::KeyQ, ElementState::Pressed, false));
        let pk = PhysicalKey::Code(KeyCode::KeyQ);
        kb.clear_transients();
        assert!(!kb.just_pressed(pk));
        assert!(kb.is_pressed(pk));
    }

    #[test]
    fn test_release_all_reports_every_held_key() {
        let mut kb = KeyboardState::new();
        kb.process_raw(raw(KeyCode::KeyW, ElementState::Pressed, false));
        kb.process_raw(raw(KeyCode::KeyD, ElementState::Pressed, false));
        let mut released = kb.release_all();
        released.sort_by_key(|t| format!("{:?}", t.key));
        assert_eq!(released.len(), 2);
        assert!(released.iter().all(|t| !t.pressed));
        assert!(!kb.is_pressed(PhysicalKey::Code(KeyCode::KeyW)));
        assert!(kb.just_released(PhysicalKey::Code(KeyCode::KeyD)));
    }
}
