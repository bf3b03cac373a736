//! Garden placement allocator
//!
//! Rolled units are handed out first-available: every placement takes from
//! the earliest dice result (roll order) that still has units left.
//! Phase gating is the caller's job (see `turn`).

use serde::{Deserialize, Serialize};

use super::catalog::{CropKind, UpgradeKind};
use super::state::{DiceResult, GameState, Severity};
use crate::consts::COMPOST_VALUE;

/// What happened to units that found no cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeftoverReport {
    pub count: u32,
    /// Money earned from composting (0 without the compost bin)
    pub composted_for: f64,
}

/// Take one unit from the first result with units remaining
fn take_unit(results: &mut [DiceResult]) -> Option<CropKind> {
    let line = results.iter_mut().find(|r| r.remaining > 0)?;
    line.remaining -= 1;
    Some(line.crop)
}

/// Plant the next queued unit into one cell
///
/// No-op (false) if the cell doesn't exist, is occupied, or nothing is
/// left to place.
pub fn place_crop(state: &mut GameState, plot_id: u32, space: usize) -> bool {
    match state.cell(plot_id, space) {
        Some(cell) if cell.is_empty() => {}
        _ => return false,
    }

    let Some(crop) = take_unit(&mut state.turn_state.dice_results) else {
        return false;
    };
    state.turn_state.crops_to_place = state.turn_state.crops_to_place.saturating_sub(1);

    if let Some(cell) = state.cell_mut(plot_id, space) {
        cell.plant(crop);
    }
    true
}

/// Fill empty cells in plot-then-space order until cells or units run out
///
/// Returns the number of units placed.
pub fn auto_fill(state: &mut GameState) -> u32 {
    let mut placed = 0;

    'plots: for plot in &mut state.garden_plots {
        for cell in plot.spaces.iter_mut().filter(|c| c.is_empty()) {
            let Some(crop) = take_unit(&mut state.turn_state.dice_results) else {
                break 'plots;
            };
            cell.plant(crop);
            state.turn_state.crops_to_place = state.turn_state.crops_to_place.saturating_sub(1);
            placed += 1;
        }
    }

    placed
}

/// Compost (with the compost bin) or discard every unplaced unit
pub fn dispose_leftovers(state: &mut GameState) -> LeftoverReport {
    let count = state.turn_state.discard_remaining();
    let mut report = LeftoverReport {
        count,
        composted_for: 0.0,
    };
    if count == 0 {
        return report;
    }

    if state.has_upgrade(UpgradeKind::CompostBin) {
        let value = f64::from(count) * COMPOST_VALUE;
        state.add_money(value);
        report.composted_for = value;
        state.notify(
            format!("Composted {count} crops for ${value:.0}!"),
            Severity::Success,
        );
    } else {
        state.notify(format!("{count} crops discarded (no space)"), Severity::Info);
    }
    report
}
