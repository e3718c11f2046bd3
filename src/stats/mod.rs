// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Stats of characters, items and builds.
//!
//! The engine never looks inside the combat formulas. It needs three things:
//!
//! - [`BaseStats`]: what the character has with nothing equipped
//! - [`StatVector`]: one item's additive contribution, memoized per item
//! - [`DerivedStats`]: the fully computed numbers a filter inspects
//!
//! Turning the first two into the third is the job of a
//! [`StatCalculator`](calculator::StatCalculator).

pub mod base;
pub mod calculator;

pub use base::{BaseStatsEntry, BaseStatsProvider, BaseStatsTable};
pub use calculator::{ReferenceCalculator, StatCalculator};

use serde::{Deserialize, Serialize};
use strum::EnumCount;
use strum_macros::{EnumCount as EnumCountMacro, EnumIter};

/// Stats tracked in a contribution vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumCountMacro, EnumIter)]
#[repr(u8)]
pub enum Stat {
    Attack,
    Health,
    Defense,
    Speed,
    CritRate,
    CritDamage,
    Effectiveness,
    Resistance,
    Score,
}

/// Additive effect of one item on every tracked stat.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StatVector([f32; Stat::COUNT]);

impl StatVector {
    pub const ZERO: StatVector = StatVector([0.0; Stat::COUNT]);

    #[inline]
    pub fn get(&self, stat: Stat) -> f32 {
        self.0[stat as usize]
    }

    #[inline]
    pub fn add(&mut self, stat: Stat, value: f32) {
        self.0[stat as usize] += value;
    }

    /// Element-wise sum of several vectors.
    pub fn sum<'a>(vectors: impl IntoIterator<Item = &'a StatVector>) -> StatVector {
        let mut total = StatVector::ZERO;
        for vector in vectors {
            for (acc, value) in total.0.iter_mut().zip(vector.0.iter()) {
                *acc += value;
            }
        }
        total
    }
}

/// A character's stats before any gear.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseStats {
    pub atk: f32,
    pub hp: f32,
    pub def: f32,
    pub spd: f32,
    pub cr: f32,
    pub cd: f32,
    pub eff: f32,
    pub res: f32,
    /// Percent bias applied to the damage-type derived fields.
    pub damage_bias: f32,
}

/// Integer tags summed over the six items of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuildTags {
    pub upgrades: i32,
    pub conversions: i32,
    pub priority: i32,
}

/// Every numeric field a filter can constrain.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DerivedStats {
    pub atk: f32,
    pub hp: f32,
    pub def: f32,
    pub spd: f32,
    pub cr: f32,
    pub cd: f32,
    pub eff: f32,
    pub res: f32,
    /// Combat power.
    pub cp: f32,
    /// Health per speed point.
    pub hpps: f32,
    /// Effective health.
    pub ehp: f32,
    pub ehpps: f32,
    pub dmg: f32,
    pub dmgps: f32,
    /// Damage when every hit crits.
    pub mcdmg: f32,
    pub mcdmgps: f32,
    /// Damage scaling on the attacker's health.
    pub dmgh: f32,
    pub score: f32,
    pub priority: i32,
    pub upgrades: i32,
    pub conversions: i32,
}
