// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Per-item contribution cache.
//!
//! One cache lives for one run, so the base stats and the reforge flag are
//! fixed and the item id alone is a sufficient key. Two workers may compute
//! the same vector at once; the first insert wins and both callers get the
//! stored vector. A reader only ever sees a complete vector.

use crate::error::Result;
use crate::gear::{Item, ItemId};
use crate::stats::StatVector;
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct AccumulatorCache {
    vectors: DashMap<ItemId, StatVector>,
}

impl AccumulatorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached vector for an item, computing and storing it on a miss.
    pub fn get_or_compute<F>(&self, item: &Item, compute: F) -> Result<StatVector>
    where
        F: FnOnce(&Item) -> Result<StatVector>,
    {
        let cached = self.vectors.get(&item.id).map(|entry| *entry);
        if let Some(vector) = cached {
            return Ok(vector);
        }
        // No shard lock is held while computing.
        let vector = compute(item)?;
        let stored = *self.vectors.entry(item.id.clone()).or_insert(vector);
        Ok(stored)
    }

    pub fn get(&self, id: &ItemId) -> Option<StatVector> {
        self.vectors.get(id).map(|entry| *entry)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::gear::{Gear, GearSet};
    use crate::stats::Stat;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn vector(speed: f32) -> StatVector {
        let mut v = StatVector::ZERO;
        v.add(Stat::Speed, speed);
        v
    }

    #[test]
    fn test_computes_once_per_item() {
        let cache = AccumulatorCache::new();
        let calls = AtomicUsize::new(0);
        let item = Item::new("b1", Gear::Boots, GearSet::Speed);

        for _ in 0..3 {
            let v = cache
                .get_or_compute(&item, |_| {
                    calls.fetch_add(1, Ordering::Relaxed);
                    Ok(vector(45.0))
                })
                .unwrap();
            assert_eq!(v.get(Stat::Speed), 45.0);
        }
        assert_eq!(calls.load(Ordering::Relaxed), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&item.id), Some(vector(45.0)));
    }

    #[test]
    fn test_first_insert_wins() {
        let cache = AccumulatorCache::new();
        let item = Item::new("n1", Gear::Necklace, GearSet::Speed);
        // Another worker stores its vector while this one is computing.
        let v = cache
            .get_or_compute(&item, |item| {
                cache.vectors.insert(item.id.clone(), vector(10.0));
                Ok(vector(99.0))
            })
            .unwrap();
        assert_eq!(v, vector(10.0));
        assert_eq!(cache.get(&item.id), Some(vector(10.0)));
    }

    #[test]
    fn test_errors_are_not_cached() {
        let cache = AccumulatorCache::new();
        let item = Item::new("bad", Gear::Ring, GearSet::Hit);
        let result = cache.get_or_compute(&item, |item| {
            Err(SearchError::MalformedItem {
                id: item.id.to_string(),
                reason: "test".into(),
            })
        });
        assert!(result.is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_readers_see_whole_vectors() {
        let cache = AccumulatorCache::new();
        let items: Vec<Item> = (0..50)
            .map(|i| Item::new(&format!("i{i}"), Gear::Necklace, GearSet::Health))
            .collect();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for (i, item) in items.iter().enumerate() {
                        let v = cache.get_or_compute(item, |_| Ok(vector(i as f32))).unwrap();
                        assert_eq!(v, vector(i as f32));
                    }
                });
            }
        });
        assert_eq!(cache.len(), 50);
    }
}
