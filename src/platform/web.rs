//! JS-facing game handle
//!
//! The page sends actions as JSON (`{"type":"placeCrop","plot":0,"space":3}`)
//! and gets a JSON snapshot back to render.

use wasm_bindgen::prelude::*;

use crate::persistence::{LocalStorage, format_age};
use crate::session::Session;
use crate::settings::Settings;
use crate::sim::Action;

#[wasm_bindgen]
pub struct WebGame {
    session: Session,
}

#[wasm_bindgen]
impl WebGame {
    /// Resume the saved game, or start fresh
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        let session = Session::load(Settings::load(), Box::new(LocalStorage));
        WebGame { session }
    }

    /// Apply one JSON action and return the resulting snapshot as JSON
    pub fn dispatch(&mut self, action_json: &str) -> String {
        match serde_json::from_str::<Action>(action_json) {
            Ok(action) => {
                self.session.apply(action);
            }
            Err(e) => log::warn!("Ignoring malformed action {action_json}: {e}"),
        }
        self.snapshot()
    }

    /// Current snapshot as JSON (drains pending events)
    pub fn snapshot(&mut self) -> String {
        serde_json::to_string(&self.session.snapshot()).unwrap_or_else(|e| {
            log::error!("Failed to encode snapshot: {e}");
            "{}".to_string()
        })
    }

    /// "Saved 3 hours ago, turn 12", if there is a save
    pub fn save_summary(&self) -> Option<String> {
        let info = self.session.save_info()?;
        Some(format!(
            "Saved {}, turn {}",
            format_age(info.timestamp, js_sys::Date::now()),
            info.turn
        ))
    }

    pub fn save(&mut self) -> bool {
        self.session.save()
    }

    pub fn reset(&mut self) -> String {
        self.session.reset();
        self.snapshot()
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}
