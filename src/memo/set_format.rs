// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Set-format validity index.
//!
//! A set format says which sets a build must wear, as groups of four or two
//! pieces drawn from up to three lists of sets. The remaining slots are
//! wildcards. The index precomputes, for every sorted six-tuple of set ids,
//! whether some choice from the lists plus some wildcard filling produces it.
//!
//! | mode | groups          | wildcards |
//! |------|-----------------|-----------|
//! | 0    | none, all valid | n/a       |
//! | 1    | 4 + 2           | 0         |
//! | 2    | 4               | 2         |
//! | 3    | 2               | 4         |
//! | 4    | 2 + 2           | 2         |
//! | 5    | 2 + 2 + 2       | 0         |
//!
//! Each group contributes its set id repeated group-size times, so a 4-group
//! for Speed contributes `[3, 3, 3, 3]`. An empty list makes every tuple that
//! needs it unreachable; a mode that needs that list then validates nothing.
//!
//! # Memory
//!
//! One bit per address: 16^6 bits = 2 MiB, heap-allocated, immutable after
//! construction and shared read-only by all workers.

use crate::error::SearchError;
use crate::gear::constants::{SET_COMBO_SPACE, SET_COMBO_WORDS, SET_COUNT, SLOT_COUNT};
use crate::gear::{GearSet, SetCombo};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Which groups of sets a build must complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SetFormatMode {
    /// Any combination of sets.
    #[default]
    Any,
    /// A four-piece set from the primary list and a two-piece set from the
    /// secondary list.
    FourTwo,
    /// A four-piece set from the primary list; two free slots.
    Four,
    /// A two-piece set from the primary list; four free slots.
    Two,
    /// Two-piece sets from the primary and secondary lists; two free slots.
    TwoTwo,
    /// Two-piece sets from each of the three lists.
    TwoTwoTwo,
}

impl SetFormatMode {
    /// Group sizes, in list order.
    pub fn groups(self) -> &'static [usize] {
        match self {
            SetFormatMode::Any => &[],
            SetFormatMode::FourTwo => &[4, 2],
            SetFormatMode::Four => &[4],
            SetFormatMode::Two => &[2],
            SetFormatMode::TwoTwo => &[2, 2],
            SetFormatMode::TwoTwoTwo => &[2, 2, 2],
        }
    }

    /// Whether the primary list is worn as a four-piece group.
    ///
    /// Only these modes allow pruning at the armor level.
    pub fn is_four_piece(self) -> bool {
        matches!(self, SetFormatMode::FourTwo | SetFormatMode::Four)
    }
}

impl TryFrom<u8> for SetFormatMode {
    type Error = SearchError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SetFormatMode::Any),
            1 => Ok(SetFormatMode::FourTwo),
            2 => Ok(SetFormatMode::Four),
            3 => Ok(SetFormatMode::Two),
            4 => Ok(SetFormatMode::TwoTwo),
            5 => Ok(SetFormatMode::TwoTwoTwo),
            other => Err(SearchError::InvalidSetFormat(other)),
        }
    }
}

impl From<SetFormatMode> for u8 {
    fn from(mode: SetFormatMode) -> Self {
        mode as u8
    }
}

/// A set-format configuration: the mode plus up to three lists of sets.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SetFormat {
    pub mode: SetFormatMode,
    pub primary: Vec<GearSet>,
    pub secondary: Vec<GearSet>,
    pub tertiary: Vec<GearSet>,
}

impl SetFormat {
    /// No set constraint at all.
    pub fn any() -> Self {
        Self::default()
    }

    /// Build a configuration from a raw mode number.
    pub fn new(
        mode: u8,
        primary: Vec<GearSet>,
        secondary: Vec<GearSet>,
        tertiary: Vec<GearSet>,
    ) -> crate::error::Result<Self> {
        Ok(Self {
            mode: SetFormatMode::try_from(mode)?,
            primary,
            secondary,
            tertiary,
        })
    }

    fn lists(&self) -> [&[GearSet]; 3] {
        [
            self.primary.as_slice(),
            self.secondary.as_slice(),
            self.tertiary.as_slice(),
        ]
    }
}

/// Bit table over all set-combo addresses.
#[derive(Clone, PartialEq, Eq)]
pub struct SetFormatIndex {
    bits: Vec<u64>,
}

impl SetFormatIndex {
    /// Index in which every combination is valid.
    pub fn all() -> Self {
        Self {
            bits: vec![u64::MAX; SET_COMBO_WORDS],
        }
    }

    fn empty() -> Self {
        Self {
            bits: vec![0; SET_COMBO_WORDS],
        }
    }

    /// Precompute the index for a configuration.
    pub fn build(format: &SetFormat) -> Self {
        if format.mode == SetFormatMode::Any {
            debug!("Set format index: mode 0, every combination valid");
            return Self::all();
        }

        let mut index = Self::empty();
        let groups = format.mode.groups();
        let mut prefix = Vec::with_capacity(SLOT_COUNT);
        index.mark_groups(groups, &format.lists()[..groups.len()], &mut prefix);

        debug!(
            "Set format index: mode {} marked {} of {} combinations",
            u8::from(format.mode),
            index.len(),
            SET_COMBO_SPACE
        );
        index
    }

    /// Walk the cartesian product of the lists, one group per list.
    fn mark_groups(&mut self, groups: &[usize], lists: &[&[GearSet]], prefix: &mut Vec<u8>) {
        let Some((&size, rest)) = groups.split_first() else {
            self.mark_wildcards(prefix);
            return;
        };
        for set in lists[0] {
            let len = prefix.len();
            prefix.extend(std::iter::repeat(set.id()).take(size));
            self.mark_groups(rest, &lists[1..], prefix);
            prefix.truncate(len);
        }
    }

    /// Mark every filling of the slots the prefix leaves free.
    fn mark_wildcards(&mut self, prefix: &[u8]) {
        let free = SLOT_COUNT - prefix.len();
        let fillings = SET_COUNT.pow(free as u32);
        let mut ids = [0u8; SLOT_COUNT];
        ids[..prefix.len()].copy_from_slice(prefix);

        for filling in 0..fillings {
            let mut rest = filling;
            for slot in prefix.len()..SLOT_COUNT {
                ids[slot] = (rest % SET_COUNT) as u8;
                rest /= SET_COUNT;
            }
            self.insert(SetCombo::from_ids(ids));
        }
    }

    fn insert(&mut self, combo: SetCombo) {
        let address = combo.address() as usize;
        self.bits[address / 64] |= 1u64 << (address % 64);
    }

    /// Whether the combination satisfies the configuration.
    #[inline]
    pub fn is_valid(&self, combo: SetCombo) -> bool {
        let address = combo.address() as usize;
        (self.bits[address / 64] >> (address % 64)) & 1 != 0
    }

    /// Whether the six sets of a build satisfy the configuration.
    #[inline]
    pub fn is_valid_sets(&self, sets: &[GearSet; SLOT_COUNT]) -> bool {
        self.is_valid(SetCombo::from_sets(sets))
    }

    /// Number of valid addresses.
    ///
    /// Only sorted tuples are ever marked, so this counts multisets.
    pub fn len(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&w| w == 0)
    }
}

impl fmt::Debug for SetFormatIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetFormatIndex")
            .field("valid", &self.len())
            .finish()
    }
}
