// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Statistics
//!
//! Run counters shared by every worker. Workers add to them without locking;
//! readers may poll them at any time and see monotonically growing values.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use strum::EnumCount;
use strum_macros::EnumCount as EnumCountMacro;

#[derive(Debug, EnumCountMacro, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Counters {
    /// Builds whose stats were derived and offered to the filter.
    Searched,
    /// Armor loops cut short by the four-piece prune.
    Pruned,
    /// Weapon partitions that ran to the end of their loops.
    PartitionsCompleted,
}

#[derive(Debug, Default)]
pub struct Statistics {
    stats: [AtomicU64; Counters::COUNT],
}

impl Statistics {
    pub fn new() -> Self {
        Statistics::default()
    }

    /// Increment the specified counter by 1.
    #[inline]
    pub fn increment_counter(&self, counter: Counters) {
        self.add(counter, 1);
    }

    /// Add `n` to the specified counter.
    #[inline]
    pub fn add(&self, counter: Counters, n: u64) {
        if n > 0 {
            self.stats[counter as usize].fetch_add(n, Ordering::Relaxed);
        }
    }

    /// Get the current value of the specified counter.
    pub fn get(&self, counter: Counters) -> u64 {
        self.stats[counter as usize].load(Ordering::Relaxed)
    }
}

/// Counters as reported to a poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub searched: u64,
    pub accepted: u64,
}
