//! Game session: owns the state, its randomness and its save slot
//!
//! Front ends drive a [`Session`] with [`Action`]s and read back a
//! [`Snapshot`] after each one.

use serde::Serialize;

use crate::persistence::{self, SaveInfo, Storage};
use crate::platform;
use crate::settings::Settings;
use crate::sim::achievements;
use crate::sim::autoplay;
use crate::sim::{Action, GameEvent, GameState, SeededRandomness, Severity, turn};

/// Everything a front end needs to redraw after an action
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub state: GameState,
    /// One-shot events since the previous snapshot
    pub events: Vec<GameEvent>,
}

pub struct Session {
    state: GameState,
    rng: SeededRandomness,
    storage: Box<dyn Storage>,
    settings: Settings,
}

impl Session {
    /// Start a fresh farm
    pub fn new(settings: Settings, storage: Box<dyn Storage>) -> Self {
        let seed = settings.seed.unwrap_or_else(platform::clock_seed);
        let mut session = Self {
            state: GameState::new(),
            rng: SeededRandomness::new(seed),
            storage,
            settings,
        };
        log::info!("New game with seed {}", seed);
        session
            .state
            .notify("Welcome to Dice Farmer! 🌱", Severity::Success);
        turn::start(&mut session.state, &mut session.rng);
        session
    }

    /// Resume the saved farm, or start a fresh one when there is none
    pub fn load(settings: Settings, storage: Box<dyn Storage>) -> Self {
        let Some(state) = persistence::load_game(storage.as_ref(), &settings.save_key) else {
            return Self::new(settings, storage);
        };

        let seed = settings.seed.unwrap_or_else(platform::clock_seed);
        let mut session = Self {
            state,
            rng: SeededRandomness::new(seed),
            storage,
            settings,
        };
        session
            .state
            .notify("Welcome back! Game loaded.", Severity::Success);
        achievements::check_all(&mut session.state);
        turn::start(&mut session.state, &mut session.rng);
        session.autosave();
        session
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Apply one player action; returns whether it did anything
    pub fn apply(&mut self, action: Action) -> bool {
        let applied = turn::apply(&mut self.state, &mut self.rng, action);
        self.autosave();
        applied
    }

    /// Let the idle player finish the current turn
    ///
    /// Actions go through [`Session::apply`], so autosave fires at the same
    /// points as for a human player.
    pub fn autoplay_turn(&mut self) -> usize {
        let start_turn = self.state.turn;
        let mut applied = 0;

        while self.state.turn == start_turn && applied < autoplay::MAX_ACTIONS_PER_TURN {
            let action = autoplay::next_action(&self.state);
            if !self.apply(action) {
                log::warn!("Idle player stuck on {:?}", action);
                break;
            }
            applied += 1;
        }
        applied
    }

    /// Current state plus the events drained since the last snapshot
    pub fn snapshot(&mut self) -> Snapshot {
        Snapshot {
            events: self.state.drain_events(),
            state: self.state.clone(),
        }
    }

    /// Save now regardless of the autosave setting
    pub fn save(&mut self) -> bool {
        self.state.take_save_request();
        match persistence::save_game(self.storage.as_mut(), &self.settings.save_key, &self.state) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Save failed: {e}");
                self.state.notify("Failed to save game!", Severity::Error);
                false
            }
        }
    }

    pub fn save_info(&self) -> Option<SaveInfo> {
        persistence::save_info(self.storage.as_ref(), &self.settings.save_key)
    }

    /// Throw away the farm and its save, then start over
    pub fn reset(&mut self) {
        if let Err(e) = persistence::delete_save(self.storage.as_mut(), &self.settings.save_key) {
            log::warn!("Failed to delete save: {e}");
        }
        self.state = GameState::new();
        self.state.notify("Game reset!", Severity::Info);
        turn::start(&mut self.state, &mut self.rng);
    }

    fn autosave(&mut self) {
        if self.state.take_save_request() && self.settings.autosave {
            self.save();
        }
    }
}
