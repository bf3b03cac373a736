//! Game settings and preferences
//!
//! Persisted separately from game saves (LocalStorage on web, a JSON file
//! in [`DEFAULT_DATA_DIR`] on native).

use serde::{Deserialize, Serialize};

use crate::persistence::DEFAULT_SAVE_KEY;

/// Native settings directory, and the save directory when no `data_dir` is configured
pub const DEFAULT_DATA_DIR: &str = ".dice_farmer";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Save automatically when a turn completes or an achievement unlocks
    pub autosave: bool,
    /// Storage key of the save slot
    pub save_key: String,
    /// Fixed seed for reproducible runs (clock-seeded when unset)
    pub seed: Option<u64>,
    /// Turns the native demo plays
    pub autoplay_turns: u32,
    /// Native save directory
    pub data_dir: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            autosave: true,
            save_key: DEFAULT_SAVE_KEY.to_string(),
            seed: None,
            autoplay_turns: 10,
            data_dir: None,
        }
    }
}

impl Settings {
    /// Settings storage key / file stem
    const STORAGE_KEY: &'static str = "dice_farmer_settings";

    /// Parse settings JSON, defaulting on any failure
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring malformed settings: {e}");
                Self::default()
            }
        }
    }

    /// Directory native saves live in
    pub fn data_dir(&self) -> &str {
        self.data_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage
            && let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY)
        {
            log::info!("Loaded settings from LocalStorage");
            return Self::from_json(&json);
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage
            && let Ok(json) = serde_json::to_string(self)
        {
            let _ = storage.set_item(Self::STORAGE_KEY, &json);
            log::info!("Settings saved");
        }
    }

    /// Load settings from the default data directory
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::load_from(std::path::Path::new(DEFAULT_DATA_DIR))
    }

    /// Load `<dir>/dice_farmer_settings.json`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(dir: &std::path::Path) -> Self {
        let path = dir.join(format!("{}.json", Self::STORAGE_KEY));
        match std::fs::read_to_string(&path) {
            Ok(json) => {
                log::info!("Loaded settings from {}", path.display());
                Self::from_json(&json)
            }
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Write settings to the default data directory, where [`Settings::load`] looks
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        self.save_to(std::path::Path::new(DEFAULT_DATA_DIR))
    }

    /// Write `<dir>/dice_farmer_settings.json`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, dir: &std::path::Path) {
        let path = dir.join(format!("{}.json", Self::STORAGE_KEY));
        let written = serde_json::to_string_pretty(self)
            .map_err(std::io::Error::other)
            .and_then(|json| {
                std::fs::create_dir_all(dir)?;
                std::fs::write(&path, json)
            });
        match written {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings to {}: {e}", path.display()),
        }
    }
}
