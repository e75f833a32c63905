//! Game settings and preferences
//!
//! Read from LocalStorage on the web and from a JSON file on native.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading or writing settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings file could not be read
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Settings JSON is malformed
    #[error("settings JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which `KeyboardEvent.key` values drive each logical input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub move_negative: Vec<String>,
    pub move_positive: Vec<String>,
    pub fire: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        // AZERTY-friendly q/d plus arrows
        Self {
            move_negative: vec!["q".into(), "ArrowLeft".into()],
            move_positive: vec!["d".into(), "ArrowRight".into()],
            fire: vec![" ".into()],
        }
    }
}

/// Which logical input a key maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveNegative,
    MovePositive,
    Fire,
}

impl KeyBindings {
    /// Look up a key, ignoring ASCII case for single letters
    pub fn action_for(&self, key: &str) -> Option<Action> {
        let matches = |keys: &[String]| {
            keys.iter()
                .any(|k| k.as_str() == key || (k.len() == 1 && k.eq_ignore_ascii_case(key)))
        };
        if matches(&self.move_negative) {
            Some(Action::MoveNegative)
        } else if matches(&self.move_positive) {
            Some(Action::MovePositive)
        } else if matches(&self.fire) {
            Some(Action::Fire)
        } else {
            None
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub keys: KeyBindings,

    // === Visual Effects ===
    /// Draw destruction sparks
    pub particles: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Simulation ===
    /// Fixed RNG seed; a clock-derived seed is used when unset
    pub seed: Option<u64>,
    /// Length of a native headless session, in ticks
    pub headless_ticks: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            keys: KeyBindings::default(),
            particles: true,
            show_fps: true,
            seed: None,
            headless_ticks: 3600,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "star_invaders_settings";

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a JSON file
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }
}
