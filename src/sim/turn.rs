//! Turn/phase state machine
//!
//! Market -> Planning -> Planting -> Watering -> Harvest -> Shop -> Market.
//! Every mutating operation is gated on the current phase; an action that
//! doesn't belong to the active phase is a no-op returning `false`.

use serde::{Deserialize, Serialize};

use super::achievements::{self, AchievementId};
use super::catalog::{CropKind, UpgradeKind};
use super::random::Randomness;
use super::state::{GameEvent, GamePhase, GameState, Severity};
use super::{dice, garden, harvest, market, shop, watering};
use crate::consts::TURN_COMPLETE_XP;

/// Player commands (deterministic)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    /// Leave the market view
    Continue,
    /// Toggle selection of a crop die (index into the inventory)
    ToggleDie { index: usize },
    /// Roll the selected crop dice
    Roll,
    PlaceCrop { plot: u32, space: usize },
    AutoFill,
    /// Finish planting; unplaced units are composted or discarded
    ConfirmPlanting,
    WaterCell { plot: u32, space: usize },
    ConfirmWatering,
    BuyCropDie { crop: CropKind },
    BuyWaterDie,
    BuyGardenPlot,
    BuyUpgrade { upgrade: UpgradeKind },
    EndTurn,
}

/// Apply one action; returns whether it did anything
pub fn apply(state: &mut GameState, rng: &mut dyn Randomness, action: Action) -> bool {
    match action {
        Action::Continue => continue_to_planning(state, rng),
        Action::ToggleDie { index } => toggle_die(state, index),
        Action::Roll => roll(state, rng),
        Action::PlaceCrop { plot, space } => place_crop(state, rng, plot, space),
        Action::AutoFill => auto_fill(state, rng),
        Action::ConfirmPlanting => confirm_planting(state, rng),
        Action::WaterCell { plot, space } => water_cell(state, plot, space),
        Action::ConfirmWatering => confirm_watering(state, rng),
        Action::BuyCropDie { crop } => in_shop(state, |s| shop::buy_crop_die(s, crop)),
        Action::BuyWaterDie => in_shop(state, shop::buy_water_die),
        Action::BuyGardenPlot => in_shop(state, shop::buy_garden_plot),
        Action::BuyUpgrade { upgrade } => in_shop(state, |s| shop::buy_upgrade(s, upgrade)),
        Action::EndTurn => end_turn(state, rng),
    }
}

/// Begin play on a fresh or freshly loaded state
///
/// Turn scratch data is rebuilt and the turn restarts at the market.
pub fn start(state: &mut GameState, rng: &mut dyn Randomness) {
    state.reset_turn_state();
    enter(state, rng, GamePhase::Market);
}

/// Switch phase and run its entry actions
fn enter(state: &mut GameState, rng: &mut dyn Randomness, phase: GamePhase) {
    let from = state.phase;
    state.phase = phase;
    log::debug!("Turn {}: {} -> {}", state.turn, from.as_str(), phase.as_str());
    state.push_event(GameEvent::PhaseChanged { from, to: phase });

    match phase {
        GamePhase::Market => {
            let deltas = market::advance_market(&mut state.market_prices, &state.base_prices, rng);
            state.push_event(GameEvent::MarketMoved { deltas });
        }
        GamePhase::Planning => {
            let turn = &mut state.turn_state;
            turn.selected_dice.clear();
            turn.dice_results.clear();
            turn.crops_to_place = 0;
        }
        GamePhase::Planting => {}
        GamePhase::Watering => {
            let irrigation = state.has_upgrade(UpgradeKind::Irrigation);
            let (faces, pool) = dice::roll_water_dice(state.inventory.water_dice, irrigation, rng);
            state.turn_state.water_faces = faces.clone();
            state.turn_state.water_pool = pool;
            state.turn_state.water_used = 0;
            state.push_event(GameEvent::WaterRolled { faces, pool });
            state.notify(format!("You have {pool} water 💧"), Severity::Info);
        }
        GamePhase::Harvest => {
            harvest::harvest_all(state);
            enter(state, rng, GamePhase::Shop);
        }
        GamePhase::Shop => {
            harvest::gain_xp(state, TURN_COMPLETE_XP);
            state.stats.turns_played += 1;
            state.request_save();
        }
    }
}

pub fn continue_to_planning(state: &mut GameState, rng: &mut dyn Randomness) -> bool {
    if state.phase != GamePhase::Market {
        return false;
    }
    enter(state, rng, GamePhase::Planning);
    true
}

/// Toggle a crop die in or out of the selection
pub fn toggle_die(state: &mut GameState, index: usize) -> bool {
    if state.phase != GamePhase::Planning || index >= state.inventory.crop_dice.len() {
        return false;
    }
    let selected = &mut state.turn_state.selected_dice;
    match selected.iter().position(|&i| i == index) {
        Some(pos) => {
            selected.remove(pos);
        }
        None => selected.push(index),
    }
    true
}

/// Roll the selected dice and move to planting
pub fn roll(state: &mut GameState, rng: &mut dyn Randomness) -> bool {
    if state.phase != GamePhase::Planning || state.turn_state.selected_dice.is_empty() {
        return false;
    }

    let fertilizer = state.has_upgrade(UpgradeKind::Fertilizer);
    let results = dice::roll_crop_dice(
        &state.inventory.crop_dice,
        &state.turn_state.selected_dice,
        fertilizer,
        rng,
    );
    state.turn_state.crops_to_place = dice::total_units(&results);
    state.turn_state.dice_results = results.clone();
    log::debug!(
        "Rolled {} dice for {} crops",
        results.len(),
        state.turn_state.crops_to_place
    );
    state.push_event(GameEvent::DiceRolled { results });

    enter(state, rng, GamePhase::Planting);
    true
}

/// Plant one unit; moves on to watering once everything is placed
pub fn place_crop(state: &mut GameState, rng: &mut dyn Randomness, plot: u32, space: usize) -> bool {
    if state.phase != GamePhase::Planting || !garden::place_crop(state, plot, space) {
        return false;
    }
    if state.turn_state.crops_to_place == 0 {
        enter(state, rng, GamePhase::Watering);
    }
    true
}

/// Fill every empty cell, dispose of the rest, move to watering
pub fn auto_fill(state: &mut GameState, rng: &mut dyn Randomness) -> bool {
    if state.phase != GamePhase::Planting {
        return false;
    }
    garden::auto_fill(state);
    garden::dispose_leftovers(state);
    enter(state, rng, GamePhase::Watering);
    true
}

pub fn confirm_planting(state: &mut GameState, rng: &mut dyn Randomness) -> bool {
    if state.phase != GamePhase::Planting {
        return false;
    }
    garden::dispose_leftovers(state);
    enter(state, rng, GamePhase::Watering);
    true
}

pub fn water_cell(state: &mut GameState, plot: u32, space: usize) -> bool {
    state.phase == GamePhase::Watering && watering::water_cell(state, plot, space)
}

/// Finish watering; harvest runs and the turn lands in the shop
pub fn confirm_watering(state: &mut GameState, rng: &mut dyn Randomness) -> bool {
    if state.phase != GamePhase::Watering {
        return false;
    }
    let turn = &state.turn_state;
    if turn.water_pool > 0 && turn.water_used == turn.water_pool {
        achievements::unlock(state, AchievementId::WellWatered);
    }
    enter(state, rng, GamePhase::Harvest);
    true
}

fn in_shop(state: &mut GameState, purchase: impl FnOnce(&mut GameState) -> bool) -> bool {
    state.phase == GamePhase::Shop && purchase(state)
}

/// Close the turn and open the next one at the market
pub fn end_turn(state: &mut GameState, rng: &mut dyn Randomness) -> bool {
    if state.phase != GamePhase::Shop {
        return false;
    }
    state.turn = state.turn.saturating_add(1);
    state.reset_turn_state();
    log::info!("Starting turn {}", state.turn);
    enter(state, rng, GamePhase::Market);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::random::ScriptedRandomness;

    /// Units that keep the market flat
    fn flat_market() -> Vec<f64> {
        vec![0.0; CropKind::ALL.len()]
    }

    fn started(rng: &mut ScriptedRandomness) -> GameState {
        let mut state = GameState::new();
        start(&mut state, rng);
        state
    }

    #[test]
    fn test_start_runs_market() {
        let mut rng = ScriptedRandomness::new().with_units(&flat_market());
        let state = started(&mut rng);
        assert_eq!(state.phase, GamePhase::Market);
        assert_eq!(state.market_prices, state.base_prices);
        assert!(
            state
                .events()
                .iter()
                .any(|e| matches!(e, GameEvent::MarketMoved { .. }))
        );
    }

    #[test]
    fn test_roll_requires_selection() {
        let mut rng = ScriptedRandomness::new().with_units(&flat_market());
        let mut state = started(&mut rng);
        assert!(!roll(&mut state, &mut rng));
        assert!(apply(&mut state, &mut rng, Action::Continue));
        assert!(!apply(&mut state, &mut rng, Action::Roll));
        assert_eq!(state.phase, GamePhase::Planning);
    }

    #[test]
    fn test_toggle_die() {
        let mut rng = ScriptedRandomness::new().with_units(&flat_market());
        let mut state = started(&mut rng);
        continue_to_planning(&mut state, &mut rng);

        assert!(toggle_die(&mut state, 2));
        assert!(toggle_die(&mut state, 0));
        assert_eq!(state.turn_state.selected_dice, vec![2, 0]);
        assert!(toggle_die(&mut state, 2));
        assert_eq!(state.turn_state.selected_dice, vec![0]);
        assert!(!toggle_die(&mut state, 3));
    }

    #[test]
    fn test_tomato_four_then_watering() {
        let mut rng = ScriptedRandomness::new()
            .with_units(&flat_market())
            .with_faces(&[4, 3, 2]);
        let mut state = started(&mut rng);

        apply(&mut state, &mut rng, Action::Continue);
        apply(&mut state, &mut rng, Action::ToggleDie { index: 0 });
        assert!(apply(&mut state, &mut rng, Action::Roll));
        assert_eq!(state.phase, GamePhase::Planting);
        assert_eq!(state.turn_state.crops_to_place, 4);
        assert_eq!(state.turn_state.dice_results[0].crop, CropKind::Tomato);

        for space in 0..3 {
            assert!(apply(&mut state, &mut rng, Action::PlaceCrop { plot: 0, space }));
            assert_eq!(state.phase, GamePhase::Planting);
        }
        assert!(apply(&mut state, &mut rng, Action::PlaceCrop { plot: 0, space: 3 }));
        assert_eq!(state.turn_state.crops_to_place, 0);
        assert_eq!(state.phase, GamePhase::Watering);
        // Two water dice rolled on entry
        assert_eq!(state.turn_state.water_pool, 5);
    }

    #[test]
    fn test_wrong_phase_actions_are_noops() {
        let mut rng = ScriptedRandomness::new().with_units(&flat_market());
        let mut state = started(&mut rng);
        state.money = 100.0;

        assert!(!apply(&mut state, &mut rng, Action::WaterCell { plot: 0, space: 0 }));
        assert!(!apply(&mut state, &mut rng, Action::PlaceCrop { plot: 0, space: 0 }));
        assert!(!apply(&mut state, &mut rng, Action::BuyWaterDie));
        assert!(!apply(&mut state, &mut rng, Action::EndTurn));
        assert!(!apply(&mut state, &mut rng, Action::ConfirmWatering));
        assert_eq!(state.phase, GamePhase::Market);
        assert_eq!(state.money, 100.0);
        assert_eq!(state.inventory.water_dice, 2);
    }

    #[test]
    fn test_full_turn_cycle() {
        let mut rng = ScriptedRandomness::new()
            .with_units(&flat_market())
            .with_faces(&[2, 6, 6]);
        let mut state = started(&mut rng);

        apply(&mut state, &mut rng, Action::Continue);
        apply(&mut state, &mut rng, Action::ToggleDie { index: 1 });
        apply(&mut state, &mut rng, Action::Roll);
        assert!(apply(&mut state, &mut rng, Action::AutoFill));
        assert_eq!(state.phase, GamePhase::Watering);
        assert_eq!(state.turn_state.water_pool, 12);

        // Corn needs 2 water each: 4 water -> 2 ready cells
        for _ in 0..2 {
            assert!(apply(&mut state, &mut rng, Action::WaterCell { plot: 0, space: 0 }));
            assert!(apply(&mut state, &mut rng, Action::WaterCell { plot: 0, space: 1 }));
        }
        assert!(apply(&mut state, &mut rng, Action::ConfirmWatering));

        // Harvest ran and auto-advanced
        assert_eq!(state.phase, GamePhase::Shop);
        assert_eq!(state.money, 21.0);
        assert_eq!(state.stats.crops_harvested, 2);
        assert_eq!(state.stats.turns_played, 1);
        assert_eq!(state.xp, 2 + TURN_COMPLETE_XP);
        assert!(!state.achievements.contains(&AchievementId::WellWatered));
        assert!(state.take_save_request());

        rng.push_units(&flat_market());
        assert!(apply(&mut state, &mut rng, Action::EndTurn));
        assert_eq!(state.turn, 2);
        assert_eq!(state.phase, GamePhase::Market);
        assert_eq!(state.turn_state.water_pool, 0);
        assert!(state.turn_state.dice_results.is_empty());
        assert_eq!(state.empty_cell_count(), 9);
    }

    #[test]
    fn test_confirm_planting_discards_rest() {
        let mut rng = ScriptedRandomness::new()
            .with_units(&flat_market())
            .with_faces(&[3, 1, 1]);
        let mut state = started(&mut rng);

        apply(&mut state, &mut rng, Action::Continue);
        apply(&mut state, &mut rng, Action::ToggleDie { index: 0 });
        apply(&mut state, &mut rng, Action::Roll);
        apply(&mut state, &mut rng, Action::ConfirmPlanting);
        assert_eq!(state.phase, GamePhase::Watering);
        assert_eq!(state.turn_state.crops_to_place, 0);
        assert_eq!(state.turn_state.water_pool, 2);

        apply(&mut state, &mut rng, Action::Continue);
        assert!(!apply(&mut state, &mut rng, Action::WaterCell { plot: 0, space: 0 }));

        // Nothing planted, pool unspent
        apply(&mut state, &mut rng, Action::ConfirmWatering);
        assert!(!state.achievements.contains(&AchievementId::WellWatered));
    }

    #[test]
    fn test_well_watered_when_pool_spent() {
        let mut rng = ScriptedRandomness::new()
            .with_units(&flat_market())
            .with_faces(&[1, 1, 1]);
        let mut state = started(&mut rng);

        apply(&mut state, &mut rng, Action::Continue);
        apply(&mut state, &mut rng, Action::ToggleDie { index: 2 });
        apply(&mut state, &mut rng, Action::Roll);
        apply(&mut state, &mut rng, Action::PlaceCrop { plot: 0, space: 8 });
        assert_eq!(state.phase, GamePhase::Watering);

        apply(&mut state, &mut rng, Action::WaterCell { plot: 0, space: 8 });
        apply(&mut state, &mut rng, Action::WaterCell { plot: 0, space: 8 });
        assert_eq!(state.turn_state.water_used, 2);
        apply(&mut state, &mut rng, Action::ConfirmWatering);
        assert!(state.achievements.contains(&AchievementId::WellWatered));
        assert!(state.achievements.contains(&AchievementId::FirstHarvest));
    }

    #[test]
    fn test_shop_purchases_need_shop_phase() {
        let mut rng = ScriptedRandomness::new().with_units(&flat_market());
        let mut state = started(&mut rng);
        state.phase = GamePhase::Shop;
        assert!(apply(&mut state, &mut rng, Action::BuyCropDie { crop: CropKind::Corn }));
        assert_eq!(state.money, 5.0);
        assert!(!apply(&mut state, &mut rng, Action::BuyCropDie { crop: CropKind::Corn }));
        assert_eq!(state.money, 5.0);
        assert_eq!(state.inventory.crop_dice.len(), 4);
    }

    #[test]
    fn test_action_json() {
        let action: Action = serde_json::from_str(r#"{"type":"placeCrop","plot":0,"space":3}"#).unwrap();
        assert_eq!(action, Action::PlaceCrop { plot: 0, space: 3 });
        let action: Action =
            serde_json::from_str(r#"{"type":"buyUpgrade","upgrade":"compostBin"}"#).unwrap();
        assert_eq!(action, Action::BuyUpgrade { upgrade: UpgradeKind::CompostBin });
    }
}
