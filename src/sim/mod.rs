//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Injected randomness only
//! - Stable iteration order (catalog order, plot ID, space index)
//! - No rendering, storage or platform dependencies

pub mod achievements;
pub mod autoplay;
pub mod catalog;
pub mod dice;
pub mod garden;
pub mod harvest;
pub mod market;
pub mod random;
pub mod shop;
pub mod state;
pub mod turn;
pub mod watering;

pub use achievements::AchievementId;
pub use catalog::{CropKind, UpgradeKind};
pub use harvest::HarvestReport;
pub use random::{Randomness, ScriptedRandomness, SeededRandomness};
pub use state::{
    Cell, DiceResult, GameEvent, GamePhase, GameState, Inventory, Plot, Severity, Stats,
    TurnState,
};
pub use turn::{Action, apply, start};
