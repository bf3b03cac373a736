//! Property-based tests for farm mechanics.
//!
//! These tests verify invariants of the market, planting, watering and the
//! full turn cycle under the idle player.
//! Run with: cargo test --release prop_game

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use dice_farmer::consts::{MAX_PRICE_FACTOR, MIN_PRICE_FACTOR, PLOT_SIZE};
use dice_farmer::round_money;
use dice_farmer::sim::autoplay;
use dice_farmer::sim::market::{advance_market, next_price};
use dice_farmer::sim::{
    Action, CropKind, GamePhase, GameState, ScriptedRandomness, SeededRandomness, apply, start,
};

fn is_rounded(amount: f64) -> bool {
    round_money(amount) == amount
}

fn remaining_sum(state: &GameState) -> u32 {
    state
        .turn_state
        .dice_results
        .iter()
        .map(|r| u32::from(r.remaining))
        .sum()
}

/// Check every structural invariant that must hold between actions
fn check_invariants(state: &GameState) -> Result<(), TestCaseError> {
    for crop in CropKind::ALL {
        let base = state.base_price(crop);
        let price = state.price(crop);
        prop_assert!(price >= base * MIN_PRICE_FACTOR - 1e-9, "{crop:?} {price}");
        prop_assert!(price <= base * MAX_PRICE_FACTOR + 1e-9, "{crop:?} {price}");
        prop_assert!(is_rounded(price));
    }

    prop_assert!(state.money >= 0.0);
    prop_assert!(is_rounded(state.money));
    prop_assert!(state.level >= 1);
    prop_assert!(state.xp < state.level * 50 + 50);

    for (index, plot) in state.garden_plots.iter().enumerate() {
        prop_assert_eq!(plot.id as usize, index);
        prop_assert_eq!(plot.spaces.len(), PLOT_SIZE);
        for cell in &plot.spaces {
            match cell.crop {
                Some(crop) => {
                    prop_assert!(cell.water_level <= crop.water_needed());
                    prop_assert_eq!(cell.ready, cell.water_level == crop.water_needed());
                }
                None => {
                    prop_assert_eq!(cell.water_level, 0);
                    prop_assert!(!cell.ready);
                }
            }
        }
    }

    for crop in CropKind::ALL {
        if crop.def().unlock_level <= state.level {
            prop_assert!(state.unlocked_crops.contains(&crop));
        }
    }

    let turn = &state.turn_state;
    prop_assert_eq!(remaining_sum(state), turn.crops_to_place);
    prop_assert!(turn.water_used <= turn.water_pool);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// A single price step stays inside the band and is cent-rounded.
    #[test]
    fn prop_price_step_bounded(
        base in 0.5f64..50.0,
        start in 0.0f64..1.0,
        factor in 0.8f64..1.2,
    ) {
        let old = round_money(base * (MIN_PRICE_FACTOR + start * (MAX_PRICE_FACTOR - MIN_PRICE_FACTOR)));
        let new = next_price(old, base, factor);
        prop_assert!(new >= round_money(base * MIN_PRICE_FACTOR) - 0.01);
        prop_assert!(new <= round_money(base * MAX_PRICE_FACTOR) + 0.01);
        prop_assert!(is_rounded(new));
    }

    /// Many market moves in a row never leave the band.
    #[test]
    fn prop_market_walk_bounded(units in prop::collection::vec(0.0f64..1.0, 0..400)) {
        let mut state = GameState::new();
        let mut rng = ScriptedRandomness::new().with_units(&units);
        for _ in 0..40 {
            advance_market(&mut state.market_prices, &state.base_prices, &mut rng);
        }
        check_invariants(&state)?;
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Placing at arbitrary cells keeps the unplaced total in sync.
    #[test]
    fn prop_placement_sum(
        faces in prop::collection::vec(1u8..=6, 3),
        selection in prop::collection::vec(0usize..3, 1..4),
        targets in prop::collection::vec((0u32..2, 0usize..12), 0..20),
        fertilizer in any::<bool>(),
    ) {
        let mut state = GameState::new();
        if fertilizer {
            state.upgrades.insert(dice_farmer::sim::UpgradeKind::Fertilizer);
        }
        let mut rng = ScriptedRandomness::new().with_faces(&faces);
        start(&mut state, &mut rng);
        apply(&mut state, &mut rng, Action::Continue);
        for index in selection {
            apply(&mut state, &mut rng, Action::ToggleDie { index });
        }
        if !apply(&mut state, &mut rng, Action::Roll) {
            // Toggled everything back off
            prop_assert!(state.turn_state.selected_dice.is_empty());
            return Ok(());
        }

        let rolled = state.turn_state.crops_to_place;
        let mut planted = 0;
        for (plot, space) in targets {
            if apply(&mut state, &mut rng, Action::PlaceCrop { plot, space }) {
                planted += 1;
            }
            check_invariants(&state)?;
            prop_assert_eq!(planted + state.turn_state.crops_to_place, rolled);
        }

        let planted_cells = state.total_cell_count() - state.empty_cell_count();
        prop_assert_eq!(planted_cells as u32, planted);
        if state.turn_state.crops_to_place == 0 {
            prop_assert_eq!(state.phase, GamePhase::Watering);
        }
    }

    /// Watering never overspends the pool or overfills a cell.
    #[test]
    fn prop_watering_bounded(
        faces in prop::collection::vec(1u8..=6, 5),
        targets in prop::collection::vec(0usize..9, 0..30),
    ) {
        let mut state = GameState::new();
        let mut rng = ScriptedRandomness::new().with_faces(&faces);
        start(&mut state, &mut rng);
        apply(&mut state, &mut rng, Action::Continue);
        for index in 0..3 {
            apply(&mut state, &mut rng, Action::ToggleDie { index });
        }
        apply(&mut state, &mut rng, Action::Roll);
        apply(&mut state, &mut rng, Action::AutoFill);
        prop_assert_eq!(state.phase, GamePhase::Watering);

        let pool = state.turn_state.water_pool;
        for space in targets {
            let before = state.turn_state.water_used;
            let applied = apply(&mut state, &mut rng, Action::WaterCell { plot: 0, space });
            prop_assert_eq!(state.turn_state.water_used, before + u32::from(applied));
            check_invariants(&state)?;
        }
        prop_assert!(state.turn_state.water_used <= pool);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Long idle-player games keep every invariant, and progress only grows.
    #[test]
    fn prop_autoplay_invariants(seed in any::<u64>(), turns in 1usize..40) {
        let mut rng = SeededRandomness::new(seed);
        let mut state = GameState::new();
        start(&mut state, &mut rng);

        let mut harvested = 0;
        let mut earnings = 0.0;
        let mut achievements = 0;
        for turn in 0..turns {
            let actions = autoplay::play_turn(&mut state, &mut rng);
            prop_assert!(actions > 0);
            prop_assert_eq!(state.turn as usize, turn + 2);
            prop_assert_eq!(state.phase, GamePhase::Market);
            check_invariants(&state)?;

            prop_assert!(state.stats.crops_harvested >= harvested);
            prop_assert!(state.stats.total_earnings >= earnings);
            prop_assert!(state.achievements.len() >= achievements);
            harvested = state.stats.crops_harvested;
            earnings = state.stats.total_earnings;
            achievements = state.achievements.len();
        }
        prop_assert_eq!(state.stats.turns_played as usize, turns);
    }
}
