// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Equipment sets.
//!
//! Every item belongs to exactly one of sixteen sets. A set grants its bonus
//! once enough pieces are worn: two pieces for the small sets, four for the
//! large ones.

use crate::gear::constants::SET_COUNT;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{EnumCount as EnumCountMacro, EnumIter};

/// An equipment set. The discriminant is the set id used by the combo index.
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
pub enum GearSet {
    Health,
    Defense,
    Attack,
    Speed,
    Critical,
    Hit,
    Destruction,
    Lifesteal,
    Counter,
    Resist,
    Unity,
    Rage,
    Immunity,
    Penetration,
    Revenge,
    Injury,
}

impl GearSet {
    /// Look up a set by id, returning None if out of range.
    pub fn from_id(id: u8) -> Option<Self> {
        if (id as usize) < SET_COUNT {
            GearSet::iter().nth(id as usize)
        } else {
            None
        }
    }

    /// The set id in `0..SET_COUNT`.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Pieces needed to activate the set bonus.
    pub fn pieces(self) -> usize {
        match self {
            GearSet::Attack
            | GearSet::Speed
            | GearSet::Destruction
            | GearSet::Lifesteal
            | GearSet::Counter
            | GearSet::Rage
            | GearSet::Revenge
            | GearSet::Injury => 4,
            _ => 2,
        }
    }
}
