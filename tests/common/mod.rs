// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use gear_search::config::SearchConfig;
use gear_search::gear::{Gear, GearSet, Item, SLOT_COUNT};
use gear_search::session::SessionRegistry;
use gear_search::stats::{BaseStats, ReferenceCalculator};
use std::sync::Arc;

pub const GEARS: [Gear; SLOT_COUNT] = [
    Gear::Weapon,
    Gear::Helmet,
    Gear::Armor,
    Gear::Necklace,
    Gear::Ring,
    Gear::Boots,
];

/// `counts[slot]` stat-less items per slot, all of one set, with ids
/// `"{slot}-{i}"`.
pub fn uniform_items(counts: [usize; SLOT_COUNT], set: GearSet) -> Vec<Item> {
    let mut items = Vec::new();
    for (slot, gear) in GEARS.into_iter().enumerate() {
        for i in 0..counts[slot] {
            items.push(Item::new(&format!("{slot}-{i}"), gear, set));
        }
    }
    items
}

/// Stat-less items whose sets are given per slot.
pub fn items_with_sets(sets: &[Vec<GearSet>; SLOT_COUNT]) -> Vec<Item> {
    let mut items = Vec::new();
    for (slot, gear) in GEARS.into_iter().enumerate() {
        for (i, &set) in sets[slot].iter().enumerate() {
            items.push(Item::new(&format!("{slot}-{i}"), gear, set));
        }
    }
    items
}

pub fn base() -> BaseStats {
    BaseStats {
        atk: 1000.0,
        hp: 5000.0,
        def: 600.0,
        spd: 100.0,
        cr: 15.0,
        cd: 150.0,
        eff: 30.0,
        res: 20.0,
        damage_bias: 0.0,
    }
}

pub fn config(max_results: usize, threads: usize) -> SearchConfig {
    SearchConfig::default()
        .with_max_results(max_results)
        .with_worker_threads(threads)
}

pub fn registry(max_results: usize, threads: usize) -> SessionRegistry {
    SessionRegistry::new(config(max_results, threads), Arc::new(ReferenceCalculator))
        .expect("registry")
}
