//! Shop purchases
//!
//! Every purchase is an affordability-gated balance transfer. Failures leave
//! the state untouched apart from an error notice.

use super::achievements::{self, AchievementId};
use super::catalog::{CropKind, UpgradeKind};
use super::state::{GameState, Plot, Severity};
use crate::consts::{GARDEN_PLOT_COST, WATER_DIE_COST};

const NOT_ENOUGH_MONEY: &str = "Not enough money!";

/// Buy one die of an unlocked crop
pub fn buy_crop_die(state: &mut GameState, crop: CropKind) -> bool {
    if !state.unlocked_crops.contains(&crop) {
        state.notify("Crop not unlocked!", Severity::Error);
        return false;
    }
    let def = crop.def();
    if !state.try_spend(def.purchase_cost) {
        state.notify(NOT_ENOUGH_MONEY, Severity::Error);
        return false;
    }

    state.inventory.crop_dice.push(crop);
    state.notify(format!("Purchased {crop} die!"), Severity::Success);
    achievements::check(state, AchievementId::Diversification);
    true
}

pub fn buy_water_die(state: &mut GameState) -> bool {
    if !state.try_spend(WATER_DIE_COST) {
        state.notify(NOT_ENOUGH_MONEY, Severity::Error);
        return false;
    }

    state.inventory.water_dice = state.inventory.water_dice.saturating_add(1);
    state.notify("Purchased water die!", Severity::Success);
    true
}

/// Add a fresh 3x3 plot; its id is the plot count before purchase
pub fn buy_garden_plot(state: &mut GameState) -> bool {
    if !state.try_spend(GARDEN_PLOT_COST) {
        state.notify(NOT_ENOUGH_MONEY, Severity::Error);
        return false;
    }

    let id = u32::try_from(state.garden_plots.len()).unwrap_or(u32::MAX);
    state.garden_plots.push(Plot::new(id));
    state.notify("Purchased new garden plot!", Severity::Success);
    achievements::check(state, AchievementId::Expansion);
    true
}

pub fn buy_upgrade(state: &mut GameState, upgrade: UpgradeKind) -> bool {
    let def = upgrade.def();
    if state.has_upgrade(upgrade) {
        state.notify("Already owned!", Severity::Error);
        return false;
    }
    if !state.try_spend(def.cost) {
        state.notify(NOT_ENOUGH_MONEY, Severity::Error);
        return false;
    }

    state.upgrades.insert(upgrade);
    state.notify(format!("Purchased {}!", def.name), Severity::Success);
    true
}
