//! Dice Farmer entry point
//!
//! On the web this only sets up logging; the page drives the game through
//! the exported `WebGame` handle. Natively it runs the idle player against
//! the save in the data directory.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
    }
    log::info!("Dice Farmer starting...");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use dice_farmer::persistence::{FileStorage, format_age};
    use dice_farmer::platform::now_ms;
    use dice_farmer::{Session, Settings};

    env_logger::init();
    log::info!("Dice Farmer (native) starting...");

    let settings = Settings::load();
    let storage = FileStorage::new(settings.data_dir());
    log::info!("Using save directory {}", storage.dir().display());

    let turns = settings.autoplay_turns;
    let mut session = Session::load(settings, Box::new(storage));
    if let Some(info) = session.save_info() {
        log::info!(
            "Resuming save from {} (turn {}, level {}, ${:.2})",
            format_age(info.timestamp, now_ms()),
            info.turn,
            info.level,
            info.money
        );
    }

    for _ in 0..turns {
        session.autoplay_turn();
        for event in session.snapshot().events {
            log::debug!("{:?}", event);
        }
    }

    let state = session.state();
    println!(
        "Turn {} | Level {} ({} xp) | ${:.2} | {} plots | {} crop dice, {} water dice",
        state.turn,
        state.level,
        state.xp,
        state.money,
        state.garden_plots.len(),
        state.inventory.crop_dice.len(),
        state.inventory.water_dice
    );
    println!(
        "Harvested {} crops for ${:.2} over {} turns; {} achievements",
        state.stats.crops_harvested,
        state.stats.total_earnings,
        state.stats.turns_played,
        state.achievements.len()
    );
}
