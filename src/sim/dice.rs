//! Crop and water dice resolution

use super::catalog::CropKind;
use super::random::Randomness;
use super::state::DiceResult;
use crate::consts::{DIE_FACES, IRRIGATION_MIN_ROLL};

/// Roll the selected crop dice, in selection order
///
/// Indices that don't name an owned die are skipped. With fertilizer each
/// face gets +1, capped at 6.
pub fn roll_crop_dice(
    dice: &[CropKind],
    selected: &[usize],
    fertilizer: bool,
    rng: &mut dyn Randomness,
) -> Vec<DiceResult> {
    selected
        .iter()
        .filter_map(|&index| dice.get(index).copied())
        .map(|crop| {
            let mut value = rng.d6();
            if fertilizer {
                value = (value + 1).min(DIE_FACES);
            }
            DiceResult {
                crop,
                value,
                remaining: value,
            }
        })
        .collect()
}

/// Total units across roll results
pub fn total_units(results: &[DiceResult]) -> u32 {
    results
        .iter()
        .fold(0u32, |total, r| total.saturating_add(u32::from(r.value)))
}

/// Roll `count` water dice; returns the faces and the pool they sum to
pub fn roll_water_dice(count: u32, irrigation: bool, rng: &mut dyn Randomness) -> (Vec<u8>, u32) {
    let faces: Vec<u8> = (0..count)
        .map(|_| {
            let roll = rng.d6();
            if irrigation {
                roll.max(IRRIGATION_MIN_ROLL)
            } else {
                roll
            }
        })
        .collect();
    let pool = faces
        .iter()
        .fold(0u32, |total, &f| total.saturating_add(u32::from(f)));
    (faces, pool)
}
