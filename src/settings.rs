//! Game settings and preferences
//!
//! Persisted separately from the player profile in LocalStorage.

use serde::{Deserialize, Serialize};

/// Player preferences, stored as one JSON blob
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Overall volume, 0 to 1
    pub master_volume: f32,
    /// Effect volume, 0 to 1, multiplied with master
    pub sfx_volume: f32,
    /// Silence audio while the window is unfocused
    pub mute_on_blur: bool,
    /// FPS readout in the HUD
    pub show_fps: bool,
    /// Skip the cosmetic actor tilt
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            mute_on_blur: true,
            show_fps: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "flapurr_settings";

    /// Effective sound volume
    pub fn effective_volume(&self) -> f32 {
        (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
    }

    /// Load from LocalStorage; any missing or unreadable blob falls back to
    /// defaults (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|s| s.get_item(Self::STORAGE_KEY).ok())
            .flatten()
            .and_then(|json| serde_json::from_str(&json).ok());

        match stored {
            Some(settings) => settings,
            None => {
                log::info!("no saved settings, using defaults");
                Self::default()
            }
        }
    }

    /// Write back to LocalStorage; failures are ignored (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if let (Some(storage), Ok(json)) = (storage, serde_json::to_string(self)) {
            let _ = storage.set_item(Self::STORAGE_KEY, &json);
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
