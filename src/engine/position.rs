// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Positional index of a build.
//!
//! The six per-slot offsets are read as a mixed-radix number whose digits
//! have the pool sizes as bases, weapon most significant:
//!
//! ```text
//! index = ((((w * H + h) * A + a) * N + n) * R + r) * B + b
//! ```
//!
//! Given the sizes, the index identifies the offsets uniquely.
//!
//! # Examples
//!
//! ```
//! use gear_search::engine::Position;
//!
//! let sizes = [2, 3, 1, 1, 1, 4];
//! let position = Position::new([1, 2, 0, 0, 0, 3]);
//! let index = position.encode(sizes);
//! assert_eq!(index, 1 * 12 + 2 * 4 + 3);
//! assert_eq!(Position::decode(index, sizes), Some(position));
//! ```

use crate::gear::{Gear, SLOT_COUNT};
use serde::{Deserialize, Serialize};

/// Offsets into the six slot pools, in slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position([usize; SLOT_COUNT]);

impl Position {
    pub fn new(offsets: [usize; SLOT_COUNT]) -> Self {
        Self(offsets)
    }

    pub fn offsets(&self) -> [usize; SLOT_COUNT] {
        self.0
    }

    pub fn offset(&self, gear: Gear) -> usize {
        self.0[gear.as_usize()]
    }

    #[inline]
    pub fn encode(&self, sizes: [usize; SLOT_COUNT]) -> u64 {
        self.0
            .iter()
            .zip(sizes.iter())
            .fold(0u64, |acc, (&offset, &size)| acc * size as u64 + offset as u64)
    }

    /// Recover the offsets. None if any pool is empty or the index lies
    /// outside the cross product.
    pub fn decode(index: u64, sizes: [usize; SLOT_COUNT]) -> Option<Self> {
        if sizes.iter().any(|&size| size == 0) {
            return None;
        }
        let mut offsets = [0usize; SLOT_COUNT];
        let mut rest = index;
        for slot in (0..SLOT_COUNT).rev() {
            let size = sizes[slot] as u64;
            offsets[slot] = (rest % size) as usize;
            rest /= size;
        }
        (rest == 0).then_some(Self(offsets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_origin() {
        let sizes = [3, 3, 3, 3, 3, 3];
        assert_eq!(Position::new([0; SLOT_COUNT]).encode(sizes), 0);
        assert_eq!(Position::decode(0, sizes), Some(Position::new([0; 6])));
    }

    #[test]
    fn test_out_of_range() {
        let sizes = [2, 1, 1, 1, 1, 2];
        assert_eq!(Position::decode(4, sizes), None);
        assert!(Position::decode(3, sizes).is_some());
        assert_eq!(Position::decode(0, [1, 1, 0, 1, 1, 1]), None);
    }

    #[test]
    fn test_weapon_is_most_significant() {
        let sizes = [2, 2, 1, 1, 1, 1];
        let indices: Vec<u64> = [[0, 0], [0, 1], [1, 0], [1, 1]]
            .iter()
            .map(|&[w, h]| Position::new([w, h, 0, 0, 0, 0]).encode(sizes))
            .collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(Position::decode(2, sizes).unwrap().offset(Gear::Weapon), 1);
    }

    proptest! {
        #[test]
        fn test_encode_decode(
            sizes in prop::array::uniform6(1usize..40),
            seeds in prop::array::uniform6(any::<usize>()),
        ) {
            let mut offsets = [0usize; SLOT_COUNT];
            for slot in 0..SLOT_COUNT {
                offsets[slot] = seeds[slot] % sizes[slot];
            }
            let position = Position::new(offsets);
            let index = position.encode(sizes);
            let total: u64 = sizes.iter().map(|&s| s as u64).product();
            prop_assert!(index < total);
            prop_assert_eq!(Position::decode(index, sizes), Some(position));
        }
    }
}
