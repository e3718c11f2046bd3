// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Constants describing the shape of the search space.

/// Number of gear slots in a build.
pub const SLOT_COUNT: usize = 6;

/// Number of distinct equipment sets.
///
/// Set ids are in `0..SET_COUNT` and fit in one hexadecimal digit, which is
/// what makes the base-16 combo encoding work.
pub const SET_COUNT: usize = 16;

/// Number of addresses in the set-combo space (16^6).
pub const SET_COMBO_SPACE: usize = SET_COUNT.pow(SLOT_COUNT as u32);

/// Number of u64 words needed to hold one bit per set combo.
pub const SET_COMBO_WORDS: usize = SET_COMBO_SPACE / 64;

/// Default hard cap on captured results per run.
pub const DEFAULT_MAX_RESULTS: usize = 5_000_000;

/// Upper bound on search worker threads.
pub const MAX_WORKERS: usize = 100;
