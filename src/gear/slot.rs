// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Gear slots.
//!
//! A build fills each of the six slots with exactly one item. The declaration
//! order of [`Gear`] is also the enumeration order of the search: weapon is
//! the outermost loop and boots the innermost.

use serde::{Deserialize, Serialize};
use strum_macros::{EnumCount as EnumCountMacro, EnumIter};

/// One of the six equipment positions.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumCountMacro,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[repr(u8)]
pub enum Gear {
    Weapon,
    Helmet,
    Armor,
    Necklace,
    Ring,
    Boots,
}

impl Gear {
    /// Position of the slot in enumeration order (0 = weapon).
    pub fn as_usize(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gear::constants::SLOT_COUNT;
    use strum::{EnumCount, IntoEnumIterator};

    #[test]
    fn test_slot_count_matches_constant() {
        assert_eq!(Gear::COUNT, SLOT_COUNT);
    }

    #[test]
    fn test_enumeration_order() {
        let order: Vec<usize> = Gear::iter().map(Gear::as_usize).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(Gear::iter().next(), Some(Gear::Weapon));
        assert_eq!(Gear::iter().last(), Some(Gear::Boots));
    }
}
