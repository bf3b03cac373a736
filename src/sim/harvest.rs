//! Harvest, earnings and leveling

use serde::{Deserialize, Serialize};

use super::achievements::{self, AchievementId};
use super::catalog::CropKind;
use super::state::{GameEvent, GameState, Severity};
use crate::consts::{MARKET_TIMING_FACTOR, XP_PER_LEVEL};
use crate::round_money;

/// Harvest totals for one crop type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarvestLine {
    pub crop: CropKind,
    pub count: u32,
    pub earnings: f64,
}

/// Result of a full harvest pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarvestReport {
    /// One line per harvested crop type, catalog order
    pub lines: Vec<HarvestLine>,
    pub total_count: u32,
    pub total_earnings: f64,
}

impl HarvestReport {
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    fn add(&mut self, crop: CropKind, price: f64) {
        match self.lines.iter_mut().find(|l| l.crop == crop) {
            Some(line) => {
                line.count += 1;
                line.earnings += price;
            }
            None => self.lines.push(HarvestLine {
                crop,
                count: 1,
                earnings: price,
            }),
        }
        self.total_count += 1;
        self.total_earnings += price;
    }

    /// Toast text, e.g. "Harvested: 3 🍅 ($6.00), 1 🌽 ($3.30)"
    pub fn summary(&self) -> String {
        let parts: Vec<String> = self
            .lines
            .iter()
            .map(|l| format!("{} {} (${:.2})", l.count, l.crop.def().emoji, l.earnings))
            .collect();
        format!("Harvested: {}", parts.join(", "))
    }
}

/// Levels gained and crops unlocked by an XP gain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelReport {
    pub levels_gained: u32,
    pub unlocked: Vec<CropKind>,
}

/// Sell every ready cell at the current market price
///
/// Cells are cleared, money and lifetime stats updated, XP granted (one per
/// crop) and harvest achievements checked. Nothing changes when no cell is
/// ready.
pub fn harvest_all(state: &mut GameState) -> HarvestReport {
    let mut report = HarvestReport::default();

    for plot in &mut state.garden_plots {
        for cell in &mut plot.spaces {
            if !cell.ready {
                continue;
            }
            if let Some(crop) = cell.crop {
                let price = state
                    .market_prices
                    .get(&crop)
                    .copied()
                    .unwrap_or(crop.def().base_price);
                report.add(crop, price);
            }
            cell.clear();
        }
    }

    if report.is_empty() {
        state.notify("No crops ready to harvest", Severity::Info);
        return report;
    }

    report.lines.sort_by_key(|l| l.crop);
    for line in &mut report.lines {
        line.earnings = round_money(line.earnings);
    }
    report.total_earnings = round_money(report.total_earnings);

    state.stats.crops_harvested += u64::from(report.total_count);
    state.add_money(report.total_earnings);
    state.stats.total_earnings = round_money(state.stats.total_earnings + report.total_earnings);

    log::info!(
        "Harvested {} crops for ${:.2}",
        report.total_count,
        report.total_earnings
    );
    state.notify(report.summary(), Severity::Money);
    state.push_event(GameEvent::Harvested {
        report: report.clone(),
    });

    gain_xp(state, report.total_count);

    achievements::check(state, AchievementId::FirstHarvest);
    achievements::check(state, AchievementId::GreenThumb);
    for line in &report.lines {
        if state.price(line.crop) >= state.base_price(line.crop) * MARKET_TIMING_FACTOR {
            achievements::unlock(state, AchievementId::MarketTiming);
        }
    }

    report
}

/// Add XP, applying every level-up and crop unlock it pays for
///
/// The per-level threshold is taken from the level at entry, so a large gain
/// is consumed in equal `level * 50` steps.
pub fn gain_xp(state: &mut GameState, amount: u32) -> LevelReport {
    let mut report = LevelReport::default();
    state.xp = state.xp.saturating_add(amount);

    let threshold = state.level.saturating_mul(XP_PER_LEVEL);
    if threshold == 0 {
        return report;
    }

    while state.xp >= threshold {
        state.xp -= threshold;
        state.level = state.level.saturating_add(1);
        report.levels_gained += 1;

        let level = state.level;
        log::info!("Level up: {}", level);
        state.push_event(GameEvent::LevelUp { level });
        state.notify(
            format!("Level Up! You are now level {level}"),
            Severity::Success,
        );

        for crop in CropKind::unlocked_at(level) {
            if state.unlocked_crops.insert(crop) {
                report.unlocked.push(crop);
                state.push_event(GameEvent::CropUnlocked { crop });
                state.notify(format!("Unlocked: {crop}!"), Severity::Success);
            }
        }
    }

    report
}
