//! Achievement definitions and evaluation
//!
//! Achievements are checked at fixed checkpoints (after harvest, plot
//! purchase, die purchase, watering confirm), never polled. Two of them,
//! Well Watered and Market Timing, have no predicate over stored state: they
//! are unlocked directly by the code path that observes the condition.

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GameState, Severity};
use crate::consts::{DIVERSIFICATION_TYPES, GREEN_THUMB_HARVESTS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AchievementId {
    FirstHarvest,
    Expansion,
    Diversification,
    WellWatered,
    GreenThumb,
    MarketTiming,
}

/// Static description of a single achievement
pub struct AchievementDef {
    pub name: &'static str,
    pub description: &'static str,
    /// `None` for achievements that are only unlocked manually
    pub predicate: Option<fn(&GameState) -> bool>,
}

fn first_harvest(state: &GameState) -> bool {
    state.stats.crops_harvested >= 1
}

fn expansion(state: &GameState) -> bool {
    state.garden_plots.len() >= 2
}

fn diversification(state: &GameState) -> bool {
    state.distinct_crop_dice() >= DIVERSIFICATION_TYPES
}

fn green_thumb(state: &GameState) -> bool {
    state.stats.crops_harvested >= GREEN_THUMB_HARVESTS
}

impl AchievementId {
    pub const ALL: [AchievementId; 6] = [
        AchievementId::FirstHarvest,
        AchievementId::Expansion,
        AchievementId::Diversification,
        AchievementId::WellWatered,
        AchievementId::GreenThumb,
        AchievementId::MarketTiming,
    ];

    pub fn def(&self) -> AchievementDef {
        match self {
            AchievementId::FirstHarvest => AchievementDef {
                name: "First Harvest",
                description: "Harvest your first crop",
                predicate: Some(first_harvest),
            },
            AchievementId::Expansion => AchievementDef {
                name: "Expansion",
                description: "Buy your second garden plot",
                predicate: Some(expansion),
            },
            AchievementId::Diversification => AchievementDef {
                name: "Diversification",
                description: "Own 4 different crop types",
                predicate: Some(diversification),
            },
            AchievementId::WellWatered => AchievementDef {
                name: "Well Watered",
                description: "Use all water in a single turn",
                predicate: None,
            },
            AchievementId::GreenThumb => AchievementDef {
                name: "Green Thumb",
                description: "Harvest 50 total crops",
                predicate: Some(green_thumb),
            },
            AchievementId::MarketTiming => AchievementDef {
                name: "Market Timing",
                description: "Sell crops at 150%+ market price",
                predicate: None,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementId::FirstHarvest => "firstHarvest",
            AchievementId::Expansion => "expansion",
            AchievementId::Diversification => "diversification",
            AchievementId::WellWatered => "wellWatered",
            AchievementId::GreenThumb => "greenThumb",
            AchievementId::MarketTiming => "marketTiming",
        }
    }

    /// Unknown ids (including the never-defined "farmingEmpire") yield `None`
    pub fn from_str(s: &str) -> Option<Self> {
        AchievementId::ALL.into_iter().find(|a| a.as_str() == s)
    }
}

/// Record an achievement; false if it was already unlocked
pub fn unlock(state: &mut GameState, id: AchievementId) -> bool {
    if !state.achievements.insert(id) {
        return false;
    }

    let def = id.def();
    log::info!("Achievement unlocked: {}", def.name);
    state.push_event(GameEvent::AchievementUnlocked {
        id,
        name: def.name.to_string(),
        description: def.description.to_string(),
    });
    state.notify(format!("Achievement: {}", def.name), Severity::Success);
    state.request_save();
    true
}

/// Evaluate one achievement's predicate, unlocking it if it holds
///
/// Already-unlocked and manual-only achievements are skipped.
pub fn check(state: &mut GameState, id: AchievementId) -> bool {
    if state.achievements.contains(&id) {
        return false;
    }
    match id.def().predicate {
        Some(predicate) if predicate(state) => unlock(state, id),
        _ => false,
    }
}

/// Evaluate every predicate-backed achievement; returns the new unlocks
pub fn check_all(state: &mut GameState) -> Vec<AchievementId> {
    AchievementId::ALL
        .into_iter()
        .filter(|&id| check(state, id))
        .collect()
}
