// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Items in the candidate pool.

use crate::gear::{Gear, GearSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identity of an item.
///
/// Cheap to clone: every captured build carries six of these.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Arc<str>);

impl ItemId {
    pub fn new(id: &str) -> Self {
        Self(Arc::from(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of stat line that can appear on an item.
///
/// Percent kinds of attack, health and defense scale with the character's
/// base value; every other kind is added as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKind {
    Attack,
    AttackPercent,
    Health,
    HealthPercent,
    Defense,
    DefensePercent,
    Speed,
    CriticalHitChancePercent,
    CriticalHitDamagePercent,
    EffectivenessPercent,
    EffectResistancePercent,
}

/// One stat line on an item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemStat {
    pub kind: StatKind,
    pub value: f32,
    /// Value after reforging, when the item can still be reforged.
    #[serde(default)]
    pub reforged_value: Option<f32>,
}

impl ItemStat {
    pub fn new(kind: StatKind, value: f32) -> Self {
        Self {
            kind,
            value,
            reforged_value: None,
        }
    }

    /// Value to use, optionally predicting the reforged value.
    pub fn effective_value(&self, predict_reforges: bool) -> f32 {
        match (predict_reforges, self.reforged_value) {
            (true, Some(reforged)) => reforged,
            _ => self.value,
        }
    }
}

/// An equippable item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub gear: Gear,
    pub set: GearSet,
    #[serde(default)]
    pub main: Option<ItemStat>,
    #[serde(default)]
    pub substats: Vec<ItemStat>,
    /// Remaining upgrade (reforge) steps.
    #[serde(default)]
    pub upgradeable: i32,
    /// Remaining stat conversions.
    #[serde(default)]
    pub convertable: i32,
    #[serde(default)]
    pub priority: i32,
}

impl Item {
    /// An item with no stats and zero tags.
    pub fn new(id: &str, gear: Gear, set: GearSet) -> Self {
        Self {
            id: ItemId::new(id),
            gear,
            set,
            main: None,
            substats: Vec::new(),
            upgradeable: 0,
            convertable: 0,
            priority: 0,
        }
    }

    pub fn with_main(mut self, stat: ItemStat) -> Self {
        self.main = Some(stat);
        self
    }

    pub fn with_substat(mut self, stat: ItemStat) -> Self {
        self.substats.push(stat);
        self
    }

    pub fn with_tags(mut self, upgradeable: i32, convertable: i32, priority: i32) -> Self {
        self.upgradeable = upgradeable;
        self.convertable = convertable;
        self.priority = priority;
        self
    }

    /// Main stat followed by substats.
    pub fn stats(&self) -> impl Iterator<Item = &ItemStat> {
        self.main.iter().chain(self.substats.iter())
    }
}
