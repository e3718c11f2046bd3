// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! SetCombo type for the multiset of set ids worn by a build.
//!
//! Six items give six set ids. Sorting them collapses every ordering of the
//! same multiset to one canonical tuple, which is then read as a six-digit
//! base-16 number (most significant digit first) to give an address in
//! `0..SET_COMBO_SPACE`.
//!
//! # Examples
//!
//! ```
//! use gear_search::gear::SetCombo;
//!
//! let combo = SetCombo::from_ids([3, 0, 3, 3, 1, 3]);
//! assert_eq!(combo.ids(), &[0, 1, 3, 3, 3, 3]);
//! assert_eq!(combo.address(), 0x013333);
//! assert_eq!(SetCombo::from_address(0x013333), combo);
//! ```

use crate::gear::constants::{SET_COMBO_SPACE, SET_COUNT, SLOT_COUNT};
use crate::gear::GearSet;
use std::fmt;

/// A sorted tuple of six set ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SetCombo([u8; SLOT_COUNT]);

impl SetCombo {
    /// Build a combo from six raw set ids, sorting them.
    ///
    /// # Panics
    ///
    /// Panics if any id is `>= SET_COUNT`.
    pub fn from_ids(mut ids: [u8; SLOT_COUNT]) -> Self {
        for &id in &ids {
            assert!((id as usize) < SET_COUNT, "Set id out of range: {}", id);
        }
        ids.sort_unstable();
        Self(ids)
    }

    /// Build a combo from the six sets of a build.
    pub fn from_sets(sets: &[GearSet; SLOT_COUNT]) -> Self {
        let mut ids = sets.map(GearSet::id);
        ids.sort_unstable();
        Self(ids)
    }

    /// Decode an address back into its sorted tuple.
    ///
    /// # Panics
    ///
    /// Panics if `address >= SET_COMBO_SPACE`.
    pub fn from_address(address: u32) -> Self {
        assert!(
            (address as usize) < SET_COMBO_SPACE,
            "Set combo address out of range: {}",
            address
        );
        let mut ids = [0u8; SLOT_COUNT];
        let mut rest = address;
        for slot in (0..SLOT_COUNT).rev() {
            ids[slot] = (rest % SET_COUNT as u32) as u8;
            rest /= SET_COUNT as u32;
        }
        Self(ids)
    }

    /// Base-16 address of the sorted tuple.
    #[inline]
    pub fn address(&self) -> u32 {
        self.0
            .iter()
            .fold(0u32, |acc, &id| acc * SET_COUNT as u32 + id as u32)
    }

    /// The sorted set ids.
    pub fn ids(&self) -> &[u8; SLOT_COUNT] {
        &self.0
    }

    /// Number of pieces of the given set in the combo.
    pub fn count(&self, set: GearSet) -> usize {
        self.0.iter().filter(|&&id| id == set.id()).count()
    }
}

impl fmt::Display for SetCombo {
    /// Format as six hex digits, e.g. "013333".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for id in self.0 {
            write!(f, "{:x}", id)?;
        }
        Ok(())
    }
}
