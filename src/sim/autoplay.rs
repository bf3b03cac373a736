//! Idle/demo player
//!
//! Picks a reasonable action for whatever phase the game is in. Used by the
//! native demo binary and by tests that need long realistic sessions.

use super::catalog::{CropKind, UpgradeKind};
use super::random::Randomness;
use super::state::{GamePhase, GameState};
use super::turn::{self, Action};
use super::watering::thirsty_cells;
use crate::consts::{GARDEN_PLOT_COST, WATER_DIE_COST};

/// Money the idle player never spends
const CASH_RESERVE: f64 = 5.0;

/// Upper bound on actions in one turn (a turn normally takes far fewer)
pub const MAX_ACTIONS_PER_TURN: usize = 1000;

/// The idle player stops growing the farm past these sizes
pub const MAX_IDLE_CROP_DICE: usize = 12;
pub const MAX_IDLE_PLOTS: usize = 16;

/// Upgrades in the order the idle player buys them
const UPGRADE_PRIORITY: [UpgradeKind; 3] = [
    UpgradeKind::Fertilizer,
    UpgradeKind::Irrigation,
    UpgradeKind::CompostBin,
];

fn affordable(state: &GameState, cost: f64) -> bool {
    state.money - cost >= CASH_RESERVE
}

/// Choose the next action for the current phase
pub fn next_action(state: &GameState) -> Action {
    match state.phase {
        GamePhase::Market => Action::Continue,
        GamePhase::Planning => {
            let selected = &state.turn_state.selected_dice;
            match (0..state.inventory.crop_dice.len()).find(|i| !selected.contains(i)) {
                Some(index) => Action::ToggleDie { index },
                None => Action::Roll,
            }
        }
        GamePhase::Planting => Action::AutoFill,
        GamePhase::Watering => {
            if state.turn_state.water_remaining() == 0 {
                return Action::ConfirmWatering;
            }
            match thirsty_cells(state).next() {
                Some((plot, space)) => Action::WaterCell { plot, space },
                None => Action::ConfirmWatering,
            }
        }
        // Entering Harvest moves straight on to Shop, so this is never reached
        GamePhase::Harvest => Action::EndTurn,
        GamePhase::Shop => shop_action(state).unwrap_or(Action::EndTurn),
    }
}

fn shop_action(state: &GameState) -> Option<Action> {
    if let Some(&upgrade) = UPGRADE_PRIORITY.first()
        && !state.has_upgrade(upgrade)
        && affordable(state, upgrade.def().cost)
    {
        return Some(Action::BuyUpgrade { upgrade });
    }

    // Expected roll is 3.5 per die; make room before buying more dice
    let dice = state.inventory.crop_dice.len();
    if state.garden_plots.len() < MAX_IDLE_PLOTS
        && (state.empty_cell_count() as f64) < dice as f64 * 3.5
        && affordable(state, GARDEN_PLOT_COST)
    {
        return Some(Action::BuyGardenPlot);
    }

    if let Some(&upgrade) = UPGRADE_PRIORITY
        .iter()
        .skip(1)
        .find(|u| !state.has_upgrade(**u) && affordable(state, u.def().cost))
    {
        return Some(Action::BuyUpgrade { upgrade });
    }

    if (state.inventory.water_dice as usize) < dice && affordable(state, WATER_DIE_COST) {
        return Some(Action::BuyWaterDie);
    }

    if dice >= MAX_IDLE_CROP_DICE {
        return None;
    }
    best_crop(state)
        .filter(|crop| affordable(state, crop.def().purchase_cost))
        .map(|crop| Action::BuyCropDie { crop })
}

/// Unlocked crop with the best current price per water unit
fn best_crop(state: &GameState) -> Option<CropKind> {
    state
        .unlocked_crops
        .iter()
        .copied()
        .max_by(|a, b| {
            let value = |c: &CropKind| state.price(*c) / f64::from(c.water_needed().max(1));
            value(a)
                .partial_cmp(&value(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Play until the turn counter advances; returns actions applied
pub fn play_turn(state: &mut GameState, rng: &mut dyn Randomness) -> usize {
    let start_turn = state.turn;
    let mut applied = 0;

    while state.turn == start_turn && applied < MAX_ACTIONS_PER_TURN {
        let action = next_action(state);
        if !turn::apply(state, rng, action) {
            log::warn!("Idle player stuck on {:?} in {}", action, state.phase.as_str());
            break;
        }
        applied += 1;
    }

    applied
}
