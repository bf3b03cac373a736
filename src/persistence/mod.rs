//! Save/load persistence
//!
//! Features:
//! - Versioned JSON envelope with lenient decoding
//! - Pluggable key/value storage (LocalStorage on web, files on native)
//! - Failures are logged and degraded, never fatal

pub mod envelope;
pub mod storage;

pub use envelope::{SAVE_VERSION, SaveInfo, format_age};
#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
pub use storage::{MemoryStorage, Storage, StorageError};

use crate::platform;
use crate::sim::GameState;

/// Default storage key for the single save slot
pub const DEFAULT_SAVE_KEY: &str = "dice_farmer_save";

/// Write the current game under `key`
pub fn save_game(
    storage: &mut dyn Storage,
    key: &str,
    state: &GameState,
) -> Result<(), StorageError> {
    let json = envelope::encode(state, platform::now_ms())?;
    storage.write(key, &json)?;
    log::info!("Game saved (turn {}, ${:.2})", state.turn, state.money);
    Ok(())
}

/// Load the game under `key`; `None` if there is none or it can't be read
pub fn load_game(storage: &dyn Storage, key: &str) -> Option<GameState> {
    let json = read(storage, key)?;
    let state = envelope::decode(&json)?;
    log::info!("Loaded save (turn {}, level {})", state.turn, state.level);
    Some(state)
}

pub fn has_save(storage: &dyn Storage, key: &str) -> bool {
    read(storage, key).is_some()
}

pub fn delete_save(storage: &mut dyn Storage, key: &str) -> Result<(), StorageError> {
    storage.remove(key)?;
    log::info!("Saved game cleared");
    Ok(())
}

pub fn save_info(storage: &dyn Storage, key: &str) -> Option<SaveInfo> {
    envelope::decode_info(&read(storage, key)?)
}

fn read(storage: &dyn Storage, key: &str) -> Option<String> {
    match storage.read(key) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("Failed to read save {key}: {e}");
            None
        }
    }
}
