//! Game state and core simulation types
//!
//! Everything persisted between sessions lives on [`GameState`]; the
//! per-turn scratch data lives on [`TurnState`] and is rebuilt every turn.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::achievements::AchievementId;
use super::catalog::{CropKind, UpgradeKind};
use super::harvest::HarvestReport;
use crate::consts::*;
use crate::round_money;

/// Turn phases, in cyclic order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    /// Prices move, player reviews the market
    #[default]
    Market,
    /// Player picks which crop dice to roll
    Planning,
    /// Rolled crops are placed into the garden
    Planting,
    /// Water pool is spent on planted cells
    Watering,
    /// Ready cells are sold (automatic)
    Harvest,
    /// Purchases, then end turn
    Shop,
}

impl GamePhase {
    /// The phase that follows this one
    pub fn next(&self) -> Self {
        match self {
            GamePhase::Market => GamePhase::Planning,
            GamePhase::Planning => GamePhase::Planting,
            GamePhase::Planting => GamePhase::Watering,
            GamePhase::Watering => GamePhase::Harvest,
            GamePhase::Harvest => GamePhase::Shop,
            GamePhase::Shop => GamePhase::Market,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Market => "market",
            GamePhase::Planning => "planning",
            GamePhase::Planting => "planting",
            GamePhase::Watering => "watering",
            GamePhase::Harvest => "harvest",
            GamePhase::Shop => "shop",
        }
    }
}

/// One garden space
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub crop: Option<CropKind>,
    pub water_level: u8,
    pub ready: bool,
}

impl Cell {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.crop.is_none()
    }

    /// Planted and can still take water
    pub fn needs_water(&self) -> bool {
        self.crop.is_some() && !self.ready
    }

    pub fn plant(&mut self, crop: CropKind) {
        self.crop = Some(crop);
        self.water_level = 0;
        self.ready = false;
    }

    pub fn clear(&mut self) {
        *self = Cell::default();
    }
}

/// A 3x3 garden plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plot {
    /// Stable id (plot count at purchase time)
    pub id: u32,
    /// Always exactly `PLOT_SIZE` cells
    pub spaces: Vec<Cell>,
}

impl Plot {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            spaces: vec![Cell::default(); PLOT_SIZE],
        }
    }

    pub fn empty_count(&self) -> usize {
        self.spaces.iter().filter(|c| c.is_empty()).count()
    }
}

/// Owned dice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    /// One entry per physical crop die (duplicates allowed)
    pub crop_dice: Vec<CropKind>,
    pub water_dice: u32,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            crop_dice: CropKind::STARTER.to_vec(),
            water_dice: STARTING_WATER_DICE,
        }
    }
}

/// Lifetime counters (monotonic)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_earnings: f64,
    pub crops_harvested: u64,
    pub turns_played: u64,
}

/// One rolled crop die and how many of its units are still unplaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceResult {
    #[serde(rename = "cropType")]
    pub crop: CropKind,
    pub value: u8,
    pub remaining: u8,
}

/// Per-turn scratch state (never persisted)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnState {
    /// Indices into `inventory.crop_dice`, in selection order, no duplicates
    pub selected_dice: Vec<usize>,
    /// Roll results in selection order
    pub dice_results: Vec<DiceResult>,
    /// Always the sum of `remaining` over `dice_results`
    pub crops_to_place: u32,
    /// Individual water die faces for this turn
    pub water_faces: Vec<u8>,
    pub water_pool: u32,
    pub water_used: u32,
}

impl TurnState {
    pub fn water_remaining(&self) -> u32 {
        self.water_pool.saturating_sub(self.water_used)
    }

    /// Drop every unplaced unit, returning how many there were
    pub fn discard_remaining(&mut self) -> u32 {
        let leftover = self.crops_to_place;
        for result in &mut self.dice_results {
            result.remaining = 0;
        }
        self.crops_to_place = 0;
        leftover
    }
}

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Error,
    Money,
}

/// One-shot events for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    /// Toast message
    Notice { text: String, severity: Severity },
    AchievementUnlocked {
        id: AchievementId,
        name: String,
        description: String,
    },
    PhaseChanged { from: GamePhase, to: GamePhase },
    /// Price deltas from the last market move
    MarketMoved { deltas: BTreeMap<CropKind, f64> },
    DiceRolled { results: Vec<DiceResult> },
    WaterRolled { faces: Vec<u8>, pool: u32 },
    Harvested { report: HarvestReport },
    LevelUp { level: u32 },
    CropUnlocked { crop: CropKind },
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Current turn (1-based)
    pub turn: u32,
    /// Always rounded to 2 decimals
    pub money: f64,
    pub xp: u32,
    pub level: u32,
    pub phase: GamePhase,
    /// In purchase order
    pub garden_plots: Vec<Plot>,
    pub inventory: Inventory,
    pub market_prices: BTreeMap<CropKind, f64>,
    /// Immutable after init
    pub base_prices: BTreeMap<CropKind, f64>,
    pub unlocked_crops: BTreeSet<CropKind>,
    pub upgrades: BTreeSet<UpgradeKind>,
    pub achievements: BTreeSet<AchievementId>,
    pub stats: Stats,
    pub turn_state: TurnState,
    /// Pending notifications (drained by the front end)
    #[serde(skip)]
    events: Vec<GameEvent>,
    /// Set when something worth saving happened
    #[serde(skip)]
    save_requested: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Fresh farm: one plot, starter dice, base prices
    pub fn new() -> Self {
        let base_prices = default_base_prices();
        Self {
            turn: 1,
            money: STARTING_MONEY,
            xp: 0,
            level: 1,
            phase: GamePhase::Market,
            garden_plots: vec![Plot::new(0)],
            inventory: Inventory::default(),
            market_prices: base_prices.clone(),
            base_prices,
            unlocked_crops: default_unlocked_crops(),
            upgrades: BTreeSet::new(),
            achievements: BTreeSet::new(),
            stats: Stats::default(),
            turn_state: TurnState::default(),
            events: Vec::new(),
            save_requested: false,
        }
    }

    pub fn reset_turn_state(&mut self) {
        self.turn_state = TurnState::default();
    }

    pub fn has_upgrade(&self, upgrade: UpgradeKind) -> bool {
        self.upgrades.contains(&upgrade)
    }

    pub fn price(&self, crop: CropKind) -> f64 {
        self.market_prices
            .get(&crop)
            .copied()
            .unwrap_or(crop.def().base_price)
    }

    pub fn base_price(&self, crop: CropKind) -> f64 {
        self.base_prices
            .get(&crop)
            .copied()
            .unwrap_or(crop.def().base_price)
    }

    pub fn plot(&self, plot_id: u32) -> Option<&Plot> {
        self.garden_plots.iter().find(|p| p.id == plot_id)
    }

    pub fn cell(&self, plot_id: u32, space: usize) -> Option<&Cell> {
        self.plot(plot_id)?.spaces.get(space)
    }

    pub fn cell_mut(&mut self, plot_id: u32, space: usize) -> Option<&mut Cell> {
        self.garden_plots
            .iter_mut()
            .find(|p| p.id == plot_id)?
            .spaces
            .get_mut(space)
    }

    pub fn empty_cell_count(&self) -> usize {
        self.garden_plots.iter().map(Plot::empty_count).sum()
    }

    pub fn total_cell_count(&self) -> usize {
        self.garden_plots.len() * PLOT_SIZE
    }

    /// Number of distinct crop types across owned dice
    pub fn distinct_crop_dice(&self) -> usize {
        self.inventory
            .crop_dice
            .iter()
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Add money (keeps 2-decimal rounding)
    pub fn add_money(&mut self, amount: f64) {
        self.money = round_money(self.money + amount);
    }

    /// Deduct `cost` if affordable
    pub fn try_spend(&mut self, cost: f64) -> bool {
        if self.money < cost {
            return false;
        }
        self.money = round_money(self.money - cost);
        true
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn notify(&mut self, text: impl Into<String>, severity: Severity) {
        self.events.push(GameEvent::Notice {
            text: text.into(),
            severity,
        });
    }

    /// Pending events (oldest first)
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn request_save(&mut self) {
        self.save_requested = true;
    }

    /// Returns and clears the save request flag
    pub fn take_save_request(&mut self) -> bool {
        std::mem::replace(&mut self.save_requested, false)
    }
}

/// Base price of every catalog crop
pub fn default_base_prices() -> BTreeMap<CropKind, f64> {
    CropKind::ALL
        .into_iter()
        .map(|c| (c, c.def().base_price))
        .collect()
}

/// Crops available at level 1
pub fn default_unlocked_crops() -> BTreeSet<CropKind> {
    CropKind::unlocked_at(1).collect()
}
