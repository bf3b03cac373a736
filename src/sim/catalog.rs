//! Static crop and upgrade reference data
//!
//! Catalog order (the order of `CropKind::ALL` / `UpgradeKind::ALL`) is the
//! definition order used for unlock ties and report ordering.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Crop types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CropKind {
    Tomato,
    Corn,
    Lettuce,
    Carrot,
    Eggplant,
}

/// Static stats for a crop type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropDef {
    pub name: &'static str,
    pub emoji: &'static str,
    /// Starting market price
    pub base_price: f64,
    /// Water units needed before the crop is ready
    pub water_needed: u8,
    /// Level at which dice for this crop can be bought
    pub unlock_level: u32,
    /// Shop price of one die
    pub purchase_cost: f64,
}

const TOMATO: CropDef = CropDef {
    name: "Tomato",
    emoji: "🍅",
    base_price: 2.0,
    water_needed: 2,
    unlock_level: 1,
    purchase_cost: 10.0,
};

const CORN: CropDef = CropDef {
    name: "Corn",
    emoji: "🌽",
    base_price: 3.0,
    water_needed: 2,
    unlock_level: 1,
    purchase_cost: 10.0,
};

const LETTUCE: CropDef = CropDef {
    name: "Lettuce",
    emoji: "🥬",
    base_price: 2.0,
    water_needed: 2,
    unlock_level: 1,
    purchase_cost: 10.0,
};

const CARROT: CropDef = CropDef {
    name: "Carrot",
    emoji: "🥕",
    base_price: 4.0,
    water_needed: 1,
    unlock_level: 2,
    purchase_cost: 12.0,
};

const EGGPLANT: CropDef = CropDef {
    name: "Eggplant",
    emoji: "🍆",
    base_price: 6.0,
    water_needed: 3,
    unlock_level: 5,
    purchase_cost: 20.0,
};

impl CropKind {
    /// Every crop, in catalog order
    pub const ALL: [CropKind; 5] = [
        CropKind::Tomato,
        CropKind::Corn,
        CropKind::Lettuce,
        CropKind::Carrot,
        CropKind::Eggplant,
    ];

    /// Crops a new farm starts with (one die each)
    pub const STARTER: [CropKind; 3] = [CropKind::Tomato, CropKind::Corn, CropKind::Lettuce];

    pub fn def(&self) -> &'static CropDef {
        match self {
            CropKind::Tomato => &TOMATO,
            CropKind::Corn => &CORN,
            CropKind::Lettuce => &LETTUCE,
            CropKind::Carrot => &CARROT,
            CropKind::Eggplant => &EGGPLANT,
        }
    }

    /// Identifier used in save data
    pub fn as_str(&self) -> &'static str {
        match self {
            CropKind::Tomato => "tomato",
            CropKind::Corn => "corn",
            CropKind::Lettuce => "lettuce",
            CropKind::Carrot => "carrot",
            CropKind::Eggplant => "eggplant",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        CropKind::ALL.into_iter().find(|c| c.as_str() == s)
    }

    #[inline]
    pub fn water_needed(&self) -> u8 {
        self.def().water_needed
    }

    /// Crops that unlock exactly at `level`, in catalog order
    pub fn unlocked_at(level: u32) -> impl Iterator<Item = CropKind> {
        CropKind::ALL
            .into_iter()
            .filter(move |c| c.def().unlock_level == level)
    }

    /// Every crop a farm at `level` has earned
    pub fn unlocked_through(level: u32) -> impl Iterator<Item = CropKind> {
        CropKind::ALL
            .into_iter()
            .filter(move |c| c.def().unlock_level <= level)
    }
}

impl fmt::Display for CropKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let def = self.def();
        write!(f, "{} {}", def.emoji, def.name)
    }
}

/// One-time permanent upgrades
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpgradeKind {
    /// Water dice minimum value = 3
    Irrigation,
    /// Gain $1 per discarded crop
    CompostBin,
    /// +1 to all crop dice rolls
    Fertilizer,
}

/// Static shop data for an upgrade
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeDef {
    pub name: &'static str,
    pub description: &'static str,
    pub cost: f64,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 3] = [
        UpgradeKind::Irrigation,
        UpgradeKind::CompostBin,
        UpgradeKind::Fertilizer,
    ];

    pub fn def(&self) -> &'static UpgradeDef {
        match self {
            UpgradeKind::Irrigation => &UpgradeDef {
                name: "Irrigation System",
                description: "Water dice minimum value = 3",
                cost: 60.0,
            },
            UpgradeKind::CompostBin => &UpgradeDef {
                name: "Compost Bin",
                description: "Gain $1 per discarded crop",
                cost: 40.0,
            },
            UpgradeKind::Fertilizer => &UpgradeDef {
                name: "Fertilizer",
                description: "+1 to all crop dice rolls",
                cost: 30.0,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UpgradeKind::Irrigation => "irrigation",
            UpgradeKind::CompostBin => "compostBin",
            UpgradeKind::Fertilizer => "fertilizer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        UpgradeKind::ALL.into_iter().find(|u| u.as_str() == s)
    }
}
