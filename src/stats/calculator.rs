// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The stat-combination seam.
//!
//! The engine calls a [`StatCalculator`] twice over:
//!
//! 1. `contribution` once per distinct item per run (memoized by the
//!    accumulator cache, possibly more than once under races)
//! 2. `combine` once per enumerated build
//!
//! Both must be pure functions of their inputs. The cache relies on it, and
//! two builds made of the same items compare equal only because of it.

use crate::error::{Result, SearchError};
use crate::gear::constants::{SET_COUNT, SLOT_COUNT};
use crate::gear::{GearSet, Item, StatKind};
use crate::stats::{BaseStats, BuildTags, DerivedStats, Stat, StatVector};

/// Turns items and a base character into derived build stats.
pub trait StatCalculator: Send + Sync {
    /// The additive effect of one item, seeded with the base stats.
    fn contribution(
        &self,
        base: &BaseStats,
        item: &Item,
        predict_reforges: bool,
    ) -> Result<StatVector>;

    /// Derive every filterable field of a build.
    fn combine(
        &self,
        base: &BaseStats,
        parts: [&StatVector; SLOT_COUNT],
        sets: &[GearSet; SLOT_COUNT],
        tags: BuildTags,
    ) -> DerivedStats;

    /// Name for logging.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// A small, self-contained calculator.
///
/// Percent stats scale with the base value, set bonuses stack per completed
/// set, and the derived fields use simple closed forms. It is good enough to
/// rank builds against each other, not to reproduce any particular game.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceCalculator;

/// Substat weights used for the gear score.
fn score_weight(kind: StatKind) -> f32 {
    match kind {
        StatKind::Attack => 3.46 / 39.0,
        StatKind::Health => 3.09 / 174.0,
        StatKind::Defense => 4.99 / 31.0,
        StatKind::Speed => 2.0,
        StatKind::CriticalHitChancePercent => 1.6,
        StatKind::CriticalHitDamagePercent => 1.14,
        StatKind::AttackPercent
        | StatKind::HealthPercent
        | StatKind::DefensePercent
        | StatKind::EffectivenessPercent
        | StatKind::EffectResistancePercent => 1.0,
    }
}

/// (stat, amount, scales with base) granted by each completed set.
fn set_bonus(set: GearSet) -> Option<(Stat, f32, bool)> {
    match set {
        GearSet::Health => Some((Stat::Health, 15.0, true)),
        GearSet::Defense => Some((Stat::Defense, 15.0, true)),
        GearSet::Attack => Some((Stat::Attack, 45.0, true)),
        GearSet::Speed => Some((Stat::Speed, 25.0, true)),
        GearSet::Revenge => Some((Stat::Speed, 12.0, true)),
        GearSet::Critical => Some((Stat::CritRate, 12.0, false)),
        GearSet::Hit => Some((Stat::Effectiveness, 20.0, false)),
        GearSet::Resist => Some((Stat::Resistance, 20.0, false)),
        GearSet::Destruction => Some((Stat::CritDamage, 60.0, false)),
        _ => None,
    }
}

fn base_value(base: &BaseStats, stat: Stat) -> f32 {
    match stat {
        Stat::Attack => base.atk,
        Stat::Health => base.hp,
        Stat::Defense => base.def,
        Stat::Speed => base.spd,
        Stat::CritRate => base.cr,
        Stat::CritDamage => base.cd,
        Stat::Effectiveness => base.eff,
        Stat::Resistance => base.res,
        Stat::Score => 0.0,
    }
}

impl StatCalculator for ReferenceCalculator {
    fn contribution(
        &self,
        base: &BaseStats,
        item: &Item,
        predict_reforges: bool,
    ) -> Result<StatVector> {
        let mut vector = StatVector::ZERO;

        for (index, line) in item.stats().enumerate() {
            let value = line.effective_value(predict_reforges);
            if !value.is_finite() {
                return Err(SearchError::MalformedItem {
                    id: item.id.to_string(),
                    reason: format!("{:?} has non-finite value {}", line.kind, value),
                });
            }

            match line.kind {
                StatKind::Attack => vector.add(Stat::Attack, value),
                StatKind::AttackPercent => vector.add(Stat::Attack, base.atk * value / 100.0),
                StatKind::Health => vector.add(Stat::Health, value),
                StatKind::HealthPercent => vector.add(Stat::Health, base.hp * value / 100.0),
                StatKind::Defense => vector.add(Stat::Defense, value),
                StatKind::DefensePercent => vector.add(Stat::Defense, base.def * value / 100.0),
                StatKind::Speed => vector.add(Stat::Speed, value),
                StatKind::CriticalHitChancePercent => vector.add(Stat::CritRate, value),
                StatKind::CriticalHitDamagePercent => vector.add(Stat::CritDamage, value),
                StatKind::EffectivenessPercent => vector.add(Stat::Effectiveness, value),
                StatKind::EffectResistancePercent => vector.add(Stat::Resistance, value),
            }

            // The main stat does not count towards gear score.
            let is_main = index == 0 && item.main.is_some();
            if !is_main {
                vector.add(Stat::Score, value * score_weight(line.kind));
            }
        }

        Ok(vector)
    }

    fn combine(
        &self,
        base: &BaseStats,
        parts: [&StatVector; SLOT_COUNT],
        sets: &[GearSet; SLOT_COUNT],
        tags: BuildTags,
    ) -> DerivedStats {
        let mut total = StatVector::sum(parts);

        let mut counts = [0usize; SET_COUNT];
        for set in sets {
            counts[set.id() as usize] += 1;
        }
        for (id, &count) in counts.iter().enumerate() {
            let Some(set) = GearSet::from_id(id as u8) else {
                continue;
            };
            let completed = count / set.pieces();
            if completed == 0 {
                continue;
            }
            if let Some((stat, amount, scales)) = set_bonus(set) {
                let bonus = if scales {
                    base_value(base, stat) * amount / 100.0
                } else {
                    amount
                };
                total.add(stat, bonus * completed as f32);
            }
        }

        let atk = base.atk + total.get(Stat::Attack);
        let hp = base.hp + total.get(Stat::Health);
        let def = base.def + total.get(Stat::Defense);
        let spd = base.spd + total.get(Stat::Speed);
        let cr = base.cr + total.get(Stat::CritRate);
        let cd = base.cd + total.get(Stat::CritDamage);
        let eff = base.eff + total.get(Stat::Effectiveness);
        let res = base.res + total.get(Stat::Resistance);

        let crit_chance = cr.clamp(0.0, 100.0) / 100.0;
        let crit_multiplier = cd.clamp(0.0, 350.0) / 100.0;
        let bias = 1.0 + base.damage_bias / 100.0;

        let ehp = hp * (def / 300.0 + 1.0);
        let dmg = atk * (crit_chance * crit_multiplier + (1.0 - crit_chance)) * bias;
        let mcdmg = atk * crit_multiplier * bias;
        let dmgh = hp * crit_multiplier * bias / 10.0;

        let offense = atk * 1.6 + atk * 1.6 * crit_chance * crit_multiplier;
        let cp = (offense * (1.0 + (spd - 45.0) * 0.02) + hp + def * 9.3)
            * (1.0 + (res / 100.0 + eff / 100.0) / 4.0);

        DerivedStats {
            atk,
            hp,
            def,
            spd,
            cr,
            cd,
            eff,
            res,
            cp,
            hpps: hp * spd / 100.0,
            ehp,
            ehpps: ehp * spd / 100.0,
            dmg,
            dmgps: dmg * spd / 100.0,
            mcdmg,
            mcdmgps: mcdmg * spd / 100.0,
            dmgh,
            score: total.get(Stat::Score),
            priority: tags.priority,
            upgrades: tags.upgrades,
            conversions: tags.conversions,
        }
    }
}
