// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Base-stat lookup by hero name and star level.

use crate::stats::BaseStats;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Source of base stats for a hero at a given star level.
pub trait BaseStatsProvider: Send + Sync {
    fn base_stats(&self, hero: &str, stars: u8) -> Option<BaseStats>;
}

/// One row of a [`BaseStatsTable`] as it appears in a request file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseStatsEntry {
    pub hero: String,
    pub stars: u8,
    pub stats: BaseStats,
}

/// In-memory table of base stats.
#[derive(Debug, Clone, Default)]
pub struct BaseStatsTable {
    rows: HashMap<(String, u8), BaseStats>,
}

impl BaseStatsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the stats for `(hero, stars)`.
    pub fn insert(&mut self, hero: &str, stars: u8, stats: BaseStats) {
        self.rows.insert((hero.to_string(), stars), stats);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<BaseStatsEntry> for BaseStatsTable {
    fn from_iter<I: IntoIterator<Item = BaseStatsEntry>>(iter: I) -> Self {
        let mut table = Self::new();
        for entry in iter {
            table.insert(&entry.hero, entry.stars, entry.stats);
        }
        table
    }
}

impl BaseStatsProvider for BaseStatsTable {
    fn base_stats(&self, hero: &str, stars: u8) -> Option<BaseStats> {
        self.rows.get(&(hero.to_string(), stars)).copied()
    }
}
