//! Dice Farmer - A turn-based dice farming game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (turn phases, dice, garden, market, economy)
//! - `session`: Owned game session (state + RNG + storage) for front ends
//! - `persistence`: Versioned save envelope with lenient per-field loading
//! - `platform`: Browser/native platform abstraction
//! - `settings`: Player preferences

pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use session::{Session, Snapshot};
pub use settings::Settings;

/// Game balance constants
pub mod consts {
    /// Money a fresh farm starts with
    pub const STARTING_MONEY: f64 = 15.0;
    /// Water dice a fresh farm starts with
    pub const STARTING_WATER_DICE: u32 = 2;
    /// Most dice of each kind a loaded save may carry
    pub const MAX_CROP_DICE: usize = 1000;
    pub const MAX_WATER_DICE: u32 = 1000;

    /// Cells per garden plot (3x3 grid)
    pub const PLOT_SIZE: usize = 9;

    /// XP required per level (threshold = level * XP_PER_LEVEL)
    pub const XP_PER_LEVEL: u32 = 50;
    /// Flat XP for completing a turn
    pub const TURN_COMPLETE_XP: u32 = 5;

    /// Shop prices
    pub const GARDEN_PLOT_COST: f64 = 25.0;
    pub const WATER_DIE_COST: f64 = 12.0;

    /// Money per leftover crop with the compost bin upgrade
    pub const COMPOST_VALUE: f64 = 1.0;

    /// Market price bounds relative to base price
    pub const MIN_PRICE_FACTOR: f64 = 0.5;
    pub const MAX_PRICE_FACTOR: f64 = 2.0;
    /// Price at or above base * this counts as market timing
    pub const MARKET_TIMING_FACTOR: f64 = 1.5;

    /// Die faces
    pub const DIE_FACES: u8 = 6;
    /// Irrigation floor for water dice
    pub const IRRIGATION_MIN_ROLL: u8 = 3;

    /// Achievement thresholds
    pub const GREEN_THUMB_HARVESTS: u64 = 50;
    pub const DIVERSIFICATION_TYPES: usize = 4;
}

/// Round a money amount to 2 decimal places
#[inline]
pub fn round_money(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
