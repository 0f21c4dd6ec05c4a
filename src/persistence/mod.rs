//! Local player profile persistence
//!
//! Two scalars under fixed LocalStorage keys: the best score (plain integer
//! string, absent means 0) and the last-entered player name (≤16 chars).
//! Storage failures are never fatal; the game keeps tracking both locally.

use crate::leaderboard::clamp_name;

/// Best score key (used only in wasm32)
#[allow(dead_code)]
const BEST_KEY: &str = "flapurr_best";
/// Player name key (used only in wasm32)
#[allow(dead_code)]
const NAME_KEY: &str = "flapurr_name";

/// Persisted player profile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub best: u32,
    pub name: String,
}

impl Profile {
    /// Load from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let Some(storage) = storage else {
            log::warn!("LocalStorage unavailable, starting with a fresh profile");
            return Self::default();
        };

        let best = storage
            .get_item(BEST_KEY)
            .ok()
            .flatten()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        let name = storage
            .get_item(NAME_KEY)
            .ok()
            .flatten()
            .map(|s| clamp_name(&s))
            .unwrap_or_default();

        log::info!("Loaded profile (best {best})");
        Self { best, name }
    }

    /// Write both keys to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            let _ = storage.set_item(BEST_KEY, &self.best.to_string());
            let _ = storage.set_item(NAME_KEY, &clamp_name(&self.name));
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

    /// Record a finished session; returns true when the best improved and
    /// was written back.
    pub fn record_session(&mut self, score: u32) -> bool {
        if score > self.best {
            self.best = score;
            self.save();
            true
        } else {
            false
        }
    }

    /// Remember the submitted name (clamped) and persist it
    pub fn set_name(&mut self, name: &str) {
        self.name = clamp_name(name);
        self.save();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_session_updates_only_on_improvement() {
        let mut profile = Profile {
            best: 10,
            name: String::new(),
        };
        assert!(!profile.record_session(7));
        assert_eq!(profile.best, 10);
        assert!(profile.record_session(12));
        assert_eq!(profile.best, 12);
    }

    #[test]
    fn set_name_clamps() {
        let mut profile = Profile::default();
        profile.set_name("a-very-long-cat-name-indeed");
        assert_eq!(profile.name.len(), 16);
    }
}
