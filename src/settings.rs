//! Game settings and preferences
//!
//! Loaded from LocalStorage on web and from a JSON file on native.

use serde::{Deserialize, Serialize};

use crate::consts::FRAME_RATE;
use crate::error::{Error, Result};

/// Highest frame rate the loop will try to hold
pub const MAX_FRAME_RATE: u32 = 1000;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Target frames per second. Dots move a fixed amount per frame, so this
    /// also sets how fast they travel.
    pub frame_rate: u32,

    /// Show FPS counter
    pub show_fps: bool,

    /// RNG seed; a fresh one is picked at startup when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frame_rate: FRAME_RATE,
            show_fps: false,
            seed: None,
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.frame_rate == 0 || self.frame_rate > MAX_FRAME_RATE {
            return Err(Error::InvalidSettings(format!(
                "frame_rate must be between 1 and {}, got {}",
                MAX_FRAME_RATE, self.frame_rate
            )));
        }
        Ok(())
    }

    /// Seconds per frame at the target rate
    pub fn frame_duration_secs(&self) -> f64 {
        1.0 / self.frame_rate as f64
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "poke_the_dots_settings";

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

    /// Load settings from a JSON file (native only)
    ///
    /// A missing file means defaults; an unreadable or invalid one is an error.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let settings = Self::from_json(&json)?;
                log::info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}
