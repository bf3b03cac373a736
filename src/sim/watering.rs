//! Watering allocator: one pooled water unit per call

use super::state::GameState;

/// Pour one unit of the turn's water pool into a cell
///
/// No-op (false) if the cell is missing, empty, already ready, or the pool
/// is exhausted. A cell turns ready the moment it reaches its crop's need,
/// so water can never overshoot.
pub fn water_cell(state: &mut GameState, plot_id: u32, space: usize) -> bool {
    if state.turn_state.water_used >= state.turn_state.water_pool {
        return false;
    }

    let Some(cell) = state.cell_mut(plot_id, space) else {
        return false;
    };
    let Some(crop) = cell.crop else {
        return false;
    };
    let needed = crop.water_needed();
    if cell.ready || cell.water_level >= needed {
        return false;
    }

    cell.water_level += 1;
    if cell.water_level >= needed {
        cell.ready = true;
    }
    state.turn_state.water_used += 1;
    true
}

/// Cells that can still take water, in plot-then-space order
pub fn thirsty_cells(state: &GameState) -> impl Iterator<Item = (u32, usize)> + '_ {
    state.garden_plots.iter().flat_map(|plot| {
        plot.spaces
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.needs_water())
            .map(move |(i, _)| (plot.id, i))
    })
}
