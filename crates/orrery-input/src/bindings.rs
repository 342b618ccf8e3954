//! Key bindings from physical keys to [`ControlAction`]s, persisted as RON.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Serde helper that stores a [`KeyCode`] by its variant name (`"KeyW"`).
mod keycode_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use winit::keyboard::KeyCode;

    pub fn serialize<S: Serializer>(code: &KeyCode, s: S) -> Result<S::Ok, S::Error> {
        format!("{code:?}").serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<KeyCode, D::Error> {
        let name = String::deserialize(d)?;
        super::keycode_from_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown key: {name}")))
    }
}

/// Parse the `Debug` name of a bindable [`KeyCode`].
pub fn keycode_from_name(name: &str) -> Option<KeyCode> {
    Some(match name {
        "KeyA" => KeyCode::KeyA,
        "KeyB" => KeyCode::KeyB,
        "KeyC" => KeyCode::KeyC,
        "KeyD" => KeyCode::KeyD,
        "KeyE" => KeyCode::KeyE,
        "KeyF" => KeyCode::KeyF,
        "KeyG" => KeyCode::KeyG,
        "KeyH" => KeyCode::KeyH,
        "KeyI" => KeyCode::KeyI,
        "KeyJ" => KeyCode::KeyJ,
        "KeyK" => KeyCode::KeyK,
        "KeyL" => KeyCode::KeyL,
        "KeyM" => KeyCode::KeyM,
        "KeyN" => KeyCode::KeyN,
        "KeyO" => KeyCode::KeyO,
        "KeyP" => KeyCode::KeyP,
        "KeyQ" => KeyCode::KeyQ,
        "KeyR" => KeyCode::KeyR,
        "KeyS" => KeyCode::KeyS,
        "KeyT" => KeyCode::KeyT,
        "KeyU" => KeyCode::KeyU,
        "KeyV" => KeyCode::KeyV,
        "KeyW" => KeyCode::KeyW,
        "KeyX" => KeyCode::KeyX,
        "KeyY" => KeyCode::KeyY,
        "KeyZ" => KeyCode::KeyZ,
        "F1" => KeyCode::F1,
        "F2" => KeyCode::F2,
        "F3" => KeyCode::F3,
        "F4" => KeyCode::F4,
        "F5" => KeyCode::F5,
        "F6" => KeyCode::F6,
        "F7" => KeyCode::F7,
        "F8" => KeyCode::F8,
        "F9" => KeyCode::F9,
        "F10" => KeyCode::F10,
        "F11" => KeyCode::F11,
        "F12" => KeyCode::F12,
        "Space" => KeyCode::Space,
        "Enter" => KeyCode::Enter,
        "Escape" => KeyCode::Escape,
        "Tab" => KeyCode::Tab,
        "ShiftLeft" => KeyCode::ShiftLeft,
        "ShiftRight" => KeyCode::ShiftRight,
        "ControlLeft" => KeyCode::ControlLeft,
        "ControlRight" => KeyCode::ControlRight,
        "ArrowUp" => KeyCode::ArrowUp,
        "ArrowDown" => KeyCode::ArrowDown,
        "ArrowLeft" => KeyCode::ArrowLeft,
        "ArrowRight" => KeyCode::ArrowRight,
        "PageUp" => KeyCode::PageUp,
        "PageDown" => KeyCode::PageDown,
        _ => return None,
    })
}

/// Everything a key can do in the viewer.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum ControlAction {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    /// Show or hide the debug overlay.
    ToggleOverlay,
    /// Grab or release the cursor for mouse look.
    ToggleCapture,
    /// Switch between Phong and Blinn-Phong specular.
    ToggleBlinn,
    /// Overlay: select the next background color channel (R, G, B).
    NextBackgroundChannel,
    /// Overlay: raise the selected background channel one step.
    BackgroundUp,
    /// Overlay: lower the selected background channel one step.
    BackgroundDown,
    Exit,
}

impl ControlAction {
    /// Held actions act every frame; the rest fire once on press.
    #[must_use]
    pub fn is_continuous(self) -> bool {
        matches!(
            self,
            Self::MoveForward
                | Self::MoveBackward
                | Self::MoveLeft
                | Self::MoveRight
                | Self::MoveUp
                | Self::MoveDown
        )
    }
}

/// One key to one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    #[serde(with = "keycode_serde")]
    pub key: KeyCode,
    pub action: ControlAction,
}

/// The binding table. A key maps to at most one action; an action may have
/// several keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub bindings: Vec<KeyBinding>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use ControlAction::*;
        let table = [
            (KeyCode::KeyW, MoveForward),
            (KeyCode::KeyS, MoveBackward),
            (KeyCode::KeyA, MoveLeft),
            (KeyCode::KeyD, MoveRight),
            (KeyCode::KeyQ, MoveUp),
            (KeyCode::KeyE, MoveDown),
            (KeyCode::F1, ToggleOverlay),
            (KeyCode::KeyC, ToggleCapture),
            (KeyCode::KeyB, ToggleBlinn),
            (KeyCode::Tab, NextBackgroundChannel),
            (KeyCode::ArrowUp, BackgroundUp),
            (KeyCode::ArrowDown, BackgroundDown),
            (KeyCode::Escape, Exit),
        ];
        Self {
            bindings: table
                .into_iter()
                .map(|(key, action)| KeyBinding { key, action })
                .collect(),
        }
    }
}

impl KeyBindings {
    /// File name used inside the config directory.
    pub const FILE_NAME: &'static str = "keybindings.ron";

    /// Action bound to `key`, if any.
    #[must_use]
    pub fn action_for(&self, key: KeyCode) -> Option<ControlAction> {
        self.bindings
            .iter()
            .find(|binding| binding.key == key)
            .map(|binding| binding.action)
    }

    /// Like [`action_for`](Self::action_for) for a winit physical key.
    #[must_use]
    pub fn action_for_physical(&self, key: PhysicalKey) -> Option<ControlAction> {
        match key {
            PhysicalKey::Code(code) => self.action_for(code),
            PhysicalKey::Unidentified(_) => None,
        }
    }

    /// Bind `key` to `action`, replacing whatever `key` did before.
    pub fn bind(&mut self, key: KeyCode, action: ControlAction) {
        self.bindings.retain(|binding| binding.key != key);
        self.bindings.push(KeyBinding { key, action });
    }

    /// Keys currently bound to `action`.
    pub fn keys_for(&self, action: ControlAction) -> impl Iterator<Item = KeyCode> + '_ {
        self.bindings
            .iter()
            .filter(move |binding| binding.action == action)
            .map(|binding| binding.key)
    }

    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }

    pub fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    /// Load bindings from `path`, creating the file with defaults when it
    /// does not exist. A malformed file falls back to defaults with a warning.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_ron(&contents) {
                Ok(bindings) => bindings,
                Err(e) => {
                    warn!(
                        "Malformed keybinding file {}: {e}; using defaults",
                        path.display()
                    );
                    Self::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let bindings = Self::default();
                if let Err(e) = bindings.save(path) {
                    warn!("Could not write default keybindings {}: {e}", path.display());
                }
                bindings
            }
            Err(e) => {
                warn!(
                    "Could not read keybinding file {}: {e}; using defaults",
                    path.display()
                );
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let kb = KeyBindings::default();
        assert_eq!(kb.action_for(KeyCode::KeyW), Some(ControlAction::MoveForward));
        assert_eq!(kb.action_for(KeyCode::KeyE), Some(ControlAction::MoveDown));
        assert_eq!(kb.action_for(KeyCode::F1), Some(ControlAction::ToggleOverlay));
        assert_eq!(kb.action_for(KeyCode::Escape), Some(ControlAction::Exit));
        assert_eq!(kb.action_for(KeyCode::Tab), Some(ControlAction::NextBackgroundChannel));
        assert_eq!(kb.action_for(KeyCode::ArrowUp), Some(ControlAction::BackgroundUp));
        assert_eq!(kb.action_for(KeyCode::KeyZ), None);
    }

    #[test]
    fn test_unidentified_key_has_no_action() {
        let kb = KeyBindings::default();
        let key = PhysicalKey::Unidentified(winit::keyboard::NativeKeyCode::Unidentified);
        assert_eq!(kb.action_for_physical(key), None);
    }

    #[test]
    fn test_bind_replaces_previous_action_for_key() {
        let mut kb = KeyBindings::default();
        kb.bind(KeyCode::KeyW, ControlAction::Exit);
        assert_eq!(kb.action_for(KeyCode::KeyW), Some(ControlAction::Exit));
        assert_eq!(kb.keys_for(ControlAction::MoveForward).count(), 0);
        assert_eq!(kb.keys_for(ControlAction::Exit).count(), 2);
    }

    #[test]
    fn test_continuous_actions() {
        assert!(ControlAction::MoveUp.is_continuous());
        assert!(!ControlAction::ToggleBlinn.is_continuous());
        assert!(!ControlAction::BackgroundUp.is_continuous());
    }

    #[test]
    fn test_ron_uses_key_names() {
        let ron = KeyBindings::default().to_ron().unwrap();
        assert!(ron.contains("\"KeyW\""));
        assert!(ron.contains("ToggleCapture"));
        assert_eq!(KeyBindings::from_ron(&ron).unwrap(), KeyBindings::default());
    }

    #[test]
    fn test_unknown_key_name_rejected() {
        let ron = r#"(bindings: [(key: "Hyper", action: Exit)])"#;
        assert!(KeyBindings::from_ron(ron).is_err());
    }

    #[test]
    fn test_load_missing_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(KeyBindings::FILE_NAME);
        let kb = KeyBindings::load_or_default(&path);
        assert_eq!(kb, KeyBindings::default());
        assert!(path.exists());
    }

    #[test]
    fn test_load_malformed_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(KeyBindings::FILE_NAME);
        std::fs::write(&path, "not ron at all (((").unwrap();
        assert_eq!(KeyBindings::load_or_default(&path), KeyBindings::default());
    }

    #[test]
    fn test_save_then_load_custom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join(KeyBindings::FILE_NAME);
        let mut kb = KeyBindings::default();
        kb.bind(KeyCode::ArrowUp, ControlAction::MoveForward);
        kb.save(&path).unwrap();
        assert_eq!(KeyBindings::load_or_default(&path), kb);
    }
}
