//! Durable program state written as a flat text file.
//!
//! The file holds ten values, one per line and without labels, in a fixed
//! order: background R, G, B, overlay flag (0/1), camera position X, Y, Z,
//! camera front X, Y, Z.

use std::path::Path;
use std::str::SplitWhitespace;

use glam::Vec3;

use crate::error::SettingsError;

/// Camera position used when no settings file exists.
pub const DEFAULT_CAMERA_POSITION: Vec3 = Vec3::new(-11.1, 0.5, 38.38);

/// Camera front used when no settings file exists (yaw -90 degrees).
pub const DEFAULT_CAMERA_FRONT: Vec3 = Vec3::new(0.0, 0.0, -1.0);

/// Number of values in a complete settings file.
const FIELD_COUNT: usize = 10;

/// Program state that survives restarts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersistedSettings {
    pub background_color: [f32; 3],
    pub ui_visible: bool,
    pub camera_position: Vec3,
    pub camera_front: Vec3,
}

impl Default for PersistedSettings {
    fn default() -> Self {
        Self {
            background_color: [0.0, 0.0, 0.0],
            ui_visible: false,
            camera_position: DEFAULT_CAMERA_POSITION,
            camera_front: DEFAULT_CAMERA_FRONT,
        }
    }
}

/// Sequential reader over whitespace-separated tokens.
struct TokenReader<'a> {
    tokens: SplitWhitespace<'a>,
    consumed: usize,
}

impl<'a> TokenReader<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            tokens: text.split_whitespace(),
            consumed: 0,
        }
    }

    fn float(&mut self) -> Option<f32> {
        let value = self.tokens.next()?.parse::<f32>().ok()?;
        self.consumed += 1;
        Some(value)
    }

    fn flag(&mut self) -> Option<bool> {
        let value = match self.tokens.next()? {
            "0" => false,
            "1" => true,
            _ => return None,
        };
        self.consumed += 1;
        Some(value)
    }
}

impl PersistedSettings {
    /// Parse settings text, keeping defaults for every field at or after the
    /// first missing or malformed token.
    pub fn parse(text: &str) -> Self {
        Self::parse_counted(text).0
    }

    /// Like [`parse`](Self::parse), also returning how many fields were read.
    fn parse_counted(text: &str) -> (Self, usize) {
        let mut settings = Self::default();
        let mut reader = TokenReader::new(text);
        // A `None` here only means the file ended early.
        let _ = settings.fill(&mut reader);
        (settings, reader.consumed)
    }

    fn fill(&mut self, reader: &mut TokenReader<'_>) -> Option<()> {
        for channel in &mut self.background_color {
            *channel = reader.float()?;
        }
        self.ui_visible = reader.flag()?;
        self.camera_position.x = reader.float()?;
        self.camera_position.y = reader.float()?;
        self.camera_position.z = reader.float()?;
        self.camera_front.x = reader.float()?;
        self.camera_front.y = reader.float()?;
        self.camera_front.z = reader.float()?;
        Some(())
    }

    /// Render all ten fields, one per line.
    pub fn to_text(&self) -> String {
        let [r, g, b] = self.background_color;
        let p = self.camera_position;
        let f = self.camera_front;
        format!(
            "{r}\n{g}\n{b}\n{}\n{}\n{}\n{}\n{}\n{}\n{}\n",
            u8::from(self.ui_visible),
            p.x,
            p.y,
            p.z,
            f.x,
            f.y,
            f.z,
        )
    }

    /// Load settings from `path`. Never fails: a missing or unreadable file
    /// yields defaults and a short file keeps defaults for the tail.
    pub fn load(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Self::default();
            }
            Err(e) => {
                log::warn!("Failed to read settings {}: {e}", path.display());
                return Self::default();
            }
        };

        let (settings, read) = Self::parse_counted(&text);
        if read < FIELD_COUNT {
            log::warn!(
                "Settings file {} has {read} of {FIELD_COUNT} values, keeping defaults for the rest",
                path.display()
            );
        } else {
            log::info!("Loaded settings from {}", path.display());
        }
        settings
    }

    /// Write all fields to `path`, overwriting whatever is there.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        std::fs::write(path, self.to_text()).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Saved settings to {}", path.display());
        Ok(())
    }
}
