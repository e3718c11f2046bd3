// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Per-slot item pools.
//!
//! The candidate pool is split by gear slot, keeping the caller's relative
//! order. When the set format asks for a four-piece primary set, each slot is
//! additionally reordered:
//!
//! 1. stable sort by set id
//! 2. stable partition so primary-set items come first
//!
//! After that, once weapon, helmet and armor are all non-primary, every later
//! armor is non-primary too, and no build under the current weapon and helmet
//! can wear four primary pieces. The executor breaks its armor loop there.

use crate::gear::constants::{SET_COUNT, SLOT_COUNT};
use crate::gear::{Gear, GearSet, Item};
use crate::memo::set_format::SetFormat;
use strum::IntoEnumIterator;

/// Items grouped by slot, ordered for enumeration.
#[derive(Debug, Clone)]
pub struct SlotPools {
    pools: [Vec<Item>; SLOT_COUNT],
    primary: [bool; SET_COUNT],
    prunable: bool,
}

impl SlotPools {
    /// Group and order the candidate pool for a set format.
    pub fn partition(items: &[Item], format: &SetFormat) -> Self {
        let mut pools: [Vec<Item>; SLOT_COUNT] = Default::default();
        for item in items {
            pools[item.gear.as_usize()].push(item.clone());
        }

        let mut primary = [false; SET_COUNT];
        for set in &format.primary {
            primary[set.id() as usize] = true;
        }

        let prunable = format.mode.is_four_piece();
        if prunable {
            for pool in pools.iter_mut() {
                // Both sorts are stable.
                pool.sort_by_key(|item| item.set.id());
                pool.sort_by_key(|item| !primary[item.set.id() as usize]);
            }
        }

        Self {
            pools,
            primary,
            prunable,
        }
    }

    #[inline]
    pub fn slot(&self, gear: Gear) -> &[Item] {
        &self.pools[gear.as_usize()]
    }

    /// Pool sizes in slot order.
    pub fn sizes(&self) -> [usize; SLOT_COUNT] {
        let mut sizes = [0; SLOT_COUNT];
        for gear in Gear::iter() {
            sizes[gear.as_usize()] = self.pools[gear.as_usize()].len();
        }
        sizes
    }

    /// Size of the full cross product.
    pub fn combinations(&self) -> u64 {
        self.pools.iter().map(|pool| pool.len() as u64).product()
    }

    /// Whether some slot has no items, so there is nothing to enumerate.
    pub fn has_empty_slot(&self) -> bool {
        self.pools.iter().any(|pool| pool.is_empty())
    }

    #[inline]
    pub fn is_primary(&self, set: GearSet) -> bool {
        self.primary[set.id() as usize]
    }

    /// Whether the executor may break its armor loop.
    #[inline]
    pub fn is_prunable(&self) -> bool {
        self.prunable
    }

    /// Remove the armor-level break, keeping the ordering.
    ///
    /// Used to compare pruned against exhaustive enumeration.
    pub fn without_pruning(mut self) -> Self {
        self.prunable = false;
        self
    }

    /// Whether the armor loop can stop at this weapon, helmet and armor.
    #[inline]
    pub fn can_prune(&self, weapon: &Item, helmet: &Item, armor: &Item) -> bool {
        self.prunable
            && !self.is_primary(weapon.set)
            && !self.is_primary(helmet.set)
            && !self.is_primary(armor.set)
    }
}
