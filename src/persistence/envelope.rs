//! Versioned JSON save envelope
//!
//! `{ "version": "1.0", "timestamp": <ms>, "gameState": { ... } }`
//!
//! Decoding is lenient: every field falls back to its fresh-game default
//! when missing or malformed, and bad entries inside lists are dropped.
//! Only text that isn't a JSON object at all is rejected.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::consts::{
    MAX_CROP_DICE, MAX_PRICE_FACTOR, MAX_WATER_DICE, MIN_PRICE_FACTOR, PLOT_SIZE,
    STARTING_MONEY, STARTING_WATER_DICE,
};
use crate::round_money;
use crate::sim::state::{default_base_prices, default_unlocked_crops};
use crate::sim::{
    AchievementId, Cell, CropKind, GameState, Inventory, Plot, Stats, UpgradeKind,
};

/// Save format version written by this build
pub const SAVE_VERSION: &str = "1.0";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveData<'a> {
    version: &'static str,
    timestamp: f64,
    game_state: SavedState<'a>,
}

/// Persisted subset of [`GameState`] (turn scratch data and phase excluded)
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SavedState<'a> {
    turn: u32,
    money: f64,
    xp: u32,
    level: u32,
    garden_plots: &'a [Plot],
    inventory: &'a Inventory,
    market_prices: &'a BTreeMap<CropKind, f64>,
    base_prices: &'a BTreeMap<CropKind, f64>,
    unlocked_crops: &'a BTreeSet<CropKind>,
    upgrades: &'a BTreeSet<UpgradeKind>,
    achievements: &'a BTreeSet<AchievementId>,
    stats: &'a Stats,
}

/// Header fields of a save, for "continue?" prompts
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SaveInfo {
    pub timestamp: f64,
    pub turn: u32,
    pub level: u32,
    pub money: f64,
}

pub fn encode(state: &GameState, timestamp: f64) -> Result<String, serde_json::Error> {
    let data = SaveData {
        version: SAVE_VERSION,
        timestamp,
        game_state: SavedState {
            turn: state.turn,
            money: state.money,
            xp: state.xp,
            level: state.level,
            garden_plots: &state.garden_plots,
            inventory: &state.inventory,
            market_prices: &state.market_prices,
            base_prices: &state.base_prices,
            unlocked_crops: &state.unlocked_crops,
            upgrades: &state.upgrades,
            achievements: &state.achievements,
            stats: &state.stats,
        },
    };
    serde_json::to_string(&data)
}

fn parse_envelope(json: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(json) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) => {
            log::warn!("Save is not a JSON object");
            None
        }
        Err(e) => {
            log::warn!("Save is not valid JSON: {e}");
            None
        }
    }
}

fn inner_state(envelope: &Map<String, Value>) -> Map<String, Value> {
    match envelope.get("gameState") {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    }
}

/// Typed read of one field; `None` if missing or the wrong shape
fn field<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Option<T> {
    obj.get(key)
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

fn finite(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    obj.get(key).and_then(Value::as_f64).filter(|v| v.is_finite())
}

fn crop_list(value: Option<&Value>) -> Option<Vec<CropKind>> {
    let items = value?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|v| v.as_str().and_then(CropKind::from_str))
            .collect(),
    )
}

fn decode_cell(value: &Value) -> Cell {
    let Some(obj) = value.as_object() else {
        return Cell::default();
    };
    let Some(crop) = obj.get("crop").and_then(Value::as_str).and_then(CropKind::from_str) else {
        return Cell::default();
    };

    let needed = crop.water_needed();
    let water_level = field::<u8>(obj, "waterLevel").unwrap_or(0).min(needed);
    Cell {
        crop: Some(crop),
        water_level,
        ready: water_level >= needed,
    }
}

fn decode_plots(value: Option<&Value>) -> Vec<Plot> {
    // Plots are renumbered by position so ids always match indices
    let mut plots: Vec<Plot> = value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
        .zip(0u32..)
        .map(|(obj, id)| {
            let mut spaces: Vec<Cell> = obj
                .get("spaces")
                .and_then(Value::as_array)
                .map(|cells| cells.iter().take(PLOT_SIZE).map(decode_cell).collect())
                .unwrap_or_default();
            spaces.resize(PLOT_SIZE, Cell::default());
            Plot { id, spaces }
        })
        .collect();

    if plots.is_empty() {
        plots.push(Plot::new(0));
    }
    plots
}

fn decode_inventory(value: Option<&Value>) -> Inventory {
    let mut inventory = Inventory::default();
    let Some(obj) = value.and_then(Value::as_object) else {
        return inventory;
    };

    // A farm with no crop dice could never roll again
    if let Some(mut dice) = crop_list(obj.get("cropDice")).filter(|d| !d.is_empty()) {
        dice.truncate(MAX_CROP_DICE);
        inventory.crop_dice = dice;
    }
    inventory.water_dice = field(obj, "waterDice")
        .unwrap_or(STARTING_WATER_DICE)
        .min(MAX_WATER_DICE);
    inventory
}

fn decode_prices(
    value: Option<&Value>,
    defaults: &BTreeMap<CropKind, f64>,
) -> BTreeMap<CropKind, f64> {
    let mut prices = defaults.clone();
    let Some(obj) = value.and_then(Value::as_object) else {
        return prices;
    };

    for (key, price) in obj {
        let (Some(crop), Some(price)) = (CropKind::from_str(key), price.as_f64()) else {
            continue;
        };
        if price.is_finite() && price > 0.0 {
            prices.insert(crop, round_money(price));
        }
    }
    prices
}

fn decode_ids<T: Ord>(value: Option<&Value>, parse: fn(&str) -> Option<T>) -> BTreeSet<T> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|v| v.as_str().and_then(parse))
        .collect()
}

fn decode_stats(value: Option<&Value>) -> Stats {
    let Some(obj) = value.and_then(Value::as_object) else {
        return Stats::default();
    };
    Stats {
        total_earnings: finite(obj, "totalEarnings").map(round_money).unwrap_or(0.0),
        crops_harvested: field(obj, "cropsHarvested").unwrap_or(0),
        turns_played: field(obj, "turnsPlayed").unwrap_or(0),
    }
}

/// Rebuild a game from a save; `None` only for non-object JSON
pub fn decode(json: &str) -> Option<GameState> {
    let envelope = parse_envelope(json)?;
    if let Some(version) = envelope.get("version").and_then(Value::as_str)
        && version != SAVE_VERSION
    {
        log::warn!("Loading save with unknown version {version}");
    }

    let saved = inner_state(&envelope);
    let mut state = GameState::new();

    state.turn = field(&saved, "turn").filter(|&t| t >= 1).unwrap_or(1);
    state.money = finite(&saved, "money")
        .filter(|&m| m >= 0.0)
        .map(round_money)
        .unwrap_or(STARTING_MONEY);
    state.xp = field(&saved, "xp").unwrap_or(0);
    state.level = field(&saved, "level").filter(|&l| l >= 1).unwrap_or(1);
    state.garden_plots = decode_plots(saved.get("gardenPlots"));
    state.inventory = decode_inventory(saved.get("inventory"));

    state.base_prices = decode_prices(saved.get("basePrices"), &default_base_prices());
    let mut market = decode_prices(saved.get("marketPrices"), &state.base_prices);
    for (crop, price) in market.iter_mut() {
        let base = state.base_price(*crop);
        *price = round_money(price.clamp(base * MIN_PRICE_FACTOR, base * MAX_PRICE_FACTOR));
    }
    state.market_prices = market;

    // Whatever the save says, everything the level has earned stays unlocked
    let mut unlocked = crop_list(saved.get("unlockedCrops"))
        .map(|list| list.into_iter().collect::<BTreeSet<_>>())
        .unwrap_or_else(default_unlocked_crops);
    unlocked.extend(CropKind::unlocked_through(state.level));
    state.unlocked_crops = unlocked;

    state.upgrades = decode_ids(saved.get("upgrades"), UpgradeKind::from_str);
    state.achievements = decode_ids(saved.get("achievements"), AchievementId::from_str);
    state.stats = decode_stats(saved.get("stats"));

    Some(state)
}

/// Read just the save header
pub fn decode_info(json: &str) -> Option<SaveInfo> {
    let envelope = parse_envelope(json)?;
    let saved = inner_state(&envelope);
    Some(SaveInfo {
        timestamp: finite(&envelope, "timestamp").unwrap_or(0.0),
        turn: field(&saved, "turn").unwrap_or(1),
        level: field(&saved, "level").unwrap_or(1),
        money: finite(&saved, "money").unwrap_or(STARTING_MONEY),
    })
}

/// Relative age of a save, e.g. "3 hours ago"
pub fn format_age(timestamp: f64, now: f64) -> String {
    let diff_mins = (now - timestamp) / 60_000.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i64;
        if days == 1 {
            "Yesterday".to_string()
        } else {
            format!("{} days ago", days)
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i64;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i64;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}
