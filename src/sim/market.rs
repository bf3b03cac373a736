//! Market price evolution
//!
//! Each turn every crop independently either holds (60%), rises 10-20% (30%)
//! or falls 10-20% (10%), then is clamped to [0.5x, 2x] of its base price.

use std::collections::BTreeMap;

use super::catalog::CropKind;
use super::random::Randomness;
use crate::consts::{MAX_PRICE_FACTOR, MIN_PRICE_FACTOR};
use crate::round_money;

/// Cumulative bucket edges for the price-movement draw
const HOLD_CHANCE: f64 = 0.6;
const RISE_CHANCE: f64 = 0.3;

/// Pick the multiplicative price factor for one crop
pub fn price_factor(rng: &mut dyn Randomness) -> f64 {
    let roll = rng.unit();
    if roll < HOLD_CHANCE {
        1.0
    } else if roll < HOLD_CHANCE + RISE_CHANCE {
        1.1 + rng.unit() * 0.1
    } else {
        0.8 + rng.unit() * 0.1
    }
}

/// Apply a factor to a price and clamp it into the band around `base`
pub fn next_price(old: f64, base: f64, factor: f64) -> f64 {
    let moved = (old * factor).clamp(base * MIN_PRICE_FACTOR, base * MAX_PRICE_FACTOR);
    round_money(moved)
}

/// Move every crop's price one step; returns per-crop deltas
pub fn advance_market(
    prices: &mut BTreeMap<CropKind, f64>,
    base_prices: &BTreeMap<CropKind, f64>,
    rng: &mut dyn Randomness,
) -> BTreeMap<CropKind, f64> {
    let mut deltas = BTreeMap::new();

    for (&crop, &base) in base_prices {
        let old = prices.get(&crop).copied().unwrap_or(base);
        let new = next_price(old, base, price_factor(rng));
        prices.insert(crop, new);
        deltas.insert(crop, round_money(new - old));
    }

    log::debug!("Market moved: {:?}", deltas);
    deltas
}
