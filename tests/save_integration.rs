//! Save/load integration tests.
//!
//! Exercises the full session lifecycle against file storage and checks that
//! lenient decoding survives arbitrary input.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use serde_json::json;

use dice_farmer::persistence::envelope::{decode, encode};
use dice_farmer::persistence::{self, FileStorage, MemoryStorage, Storage};
use dice_farmer::sim::{GamePhase, GameState, SeededRandomness, autoplay, start};
use dice_farmer::{Session, Settings};

fn played(seed: u64, turns: usize) -> GameState {
    let mut rng = SeededRandomness::new(seed);
    let mut state = GameState::new();
    start(&mut state, &mut rng);
    for _ in 0..turns {
        autoplay::play_turn(&mut state, &mut rng);
    }
    state
}

#[test]
fn test_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings {
        seed: Some(5),
        data_dir: Some(dir.path().to_string_lossy().into_owned()),
        ..Settings::default()
    };

    let (turn, money, harvested) = {
        let storage = FileStorage::new(settings.data_dir());
        let mut session = Session::load(settings.clone(), Box::new(storage));
        for _ in 0..6 {
            session.autoplay_turn();
        }
        session.save();
        let state = session.state();
        (state.turn, state.money, state.stats.crops_harvested)
    };

    let storage = FileStorage::new(settings.data_dir());
    assert!(persistence::has_save(&storage, &settings.save_key));
    let session = Session::load(settings, Box::new(storage));
    let state = session.state();
    assert_eq!(state.turn, turn);
    assert_eq!(state.money, money);
    assert_eq!(state.stats.crops_harvested, harvested);
    assert_eq!(state.phase, GamePhase::Market);
    assert!(state.turn_state.dice_results.is_empty());
}

#[test]
fn test_played_game_reloads_identically() {
    let state = played(2024, 15);
    let loaded = decode(&encode(&state, 0.0).unwrap()).unwrap();

    assert_eq!(loaded.turn, state.turn);
    assert_eq!(loaded.money, state.money);
    assert_eq!(loaded.xp, state.xp);
    assert_eq!(loaded.level, state.level);
    assert_eq!(loaded.garden_plots, state.garden_plots);
    assert_eq!(loaded.inventory, state.inventory);
    assert_eq!(loaded.market_prices, state.market_prices);
    assert_eq!(loaded.base_prices, state.base_prices);
    assert_eq!(loaded.unlocked_crops, state.unlocked_crops);
    assert_eq!(loaded.upgrades, state.upgrades);
    assert_eq!(loaded.achievements, state.achievements);
    assert_eq!(loaded.stats, state.stats);
}

#[test]
fn test_legacy_save_with_unknown_achievement() {
    let mut storage = MemoryStorage::new();
    let save = json!({
        "version": "1.0",
        "timestamp": 1_700_000_000_000u64,
        "gameState": {
            "turn": 30,
            "money": 120.5,
            "level": 4,
            "achievements": ["firstHarvest", "farmingEmpire"],
            "stats": {"cropsHarvested": 75}
        }
    });
    storage.write("dice_farmer_save", &save.to_string()).unwrap();

    let settings = Settings {
        seed: Some(1),
        ..Settings::default()
    };
    let session = Session::load(settings, Box::new(storage));
    let state = session.state();
    assert_eq!(state.turn, 30);
    assert_eq!(state.money, 120.5);
    // farmingEmpire dropped; greenThumb picked up by the load-time check
    let ids: Vec<_> = state.achievements.iter().map(|a| a.as_str()).collect();
    assert_eq!(ids, vec!["firstHarvest", "greenThumb"]);
}

fn json_value() -> impl Strategy<Value = serde_json::Value> {
    let leaf = prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::from),
        any::<i64>().prop_map(serde_json::Value::from),
        (-1e6f64..1e6).prop_map(serde_json::Value::from),
        prop::sample::select(vec!["tomato", "corn", "carrot", "irrigation", "wellWatered", "x"])
            .prop_map(serde_json::Value::from),
    ];
    leaf.prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(serde_json::Value::Array),
            prop::collection::btree_map(
                prop::sample::select(vec![
                    "turn", "money", "level", "xp", "gardenPlots", "inventory", "cropDice",
                    "spaces", "crop", "waterLevel", "marketPrices", "tomato", "stats",
                ])
                .prop_map(str::to_string),
                inner,
                0..6,
            )
            .prop_map(|m| serde_json::Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Any object-shaped save loads into a playable, well-formed farm.
    #[test]
    fn prop_lenient_load_never_fails(game_state in json_value()) {
        let save = json!({"version": "1.0", "timestamp": 0, "gameState": game_state});
        let state = decode(&save.to_string()).unwrap();

        prop_assert!(state.turn >= 1);
        prop_assert!(state.level >= 1);
        prop_assert!(!state.garden_plots.is_empty());
        prop_assert!(state.garden_plots.iter().all(|p| p.spaces.len() == 9));
        prop_assert!(!state.inventory.crop_dice.is_empty());
        prop_assert!(state.money.is_finite() && state.money >= 0.0);
    }

    /// Arbitrary text is either a save or "no save", never a panic.
    #[test]
    fn prop_garbage_text_is_handled(text in ".{0,64}") {
        let _ = decode(&text);
    }
}
