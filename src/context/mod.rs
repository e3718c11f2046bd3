// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Search context for one run.
//!
//! The SearchContext combines:
//! - Immutable data: the slot pools, base stats and calculator
//! - The shared accumulator cache, the only part written during the run
//!
//! Every worker borrows the same context. Nothing in it is locked; the cache
//! is a concurrent map.

use crate::error::Result;
use crate::gear::Item;
use crate::memo::SlotPools;
use crate::stats::{BaseStats, StatCalculator, StatVector};
use crate::state::AccumulatorCache;
use std::fmt;
use std::sync::Arc;

pub struct SearchContext {
    pub pools: SlotPools,
    pub base: BaseStats,
    pub predict_reforges: bool,
    pub calculator: Arc<dyn StatCalculator>,
    pub cache: AccumulatorCache,
}

impl SearchContext {
    pub fn new(
        pools: SlotPools,
        base: BaseStats,
        predict_reforges: bool,
        calculator: Arc<dyn StatCalculator>,
    ) -> Self {
        Self {
            pools,
            base,
            predict_reforges,
            calculator,
            cache: AccumulatorCache::new(),
        }
    }

    /// Contribution vector of one item, memoized.
    #[inline]
    pub fn contribution(&self, item: &Item) -> Result<StatVector> {
        self.cache.get_or_compute(item, |item| {
            self.calculator
                .contribution(&self.base, item, self.predict_reforges)
        })
    }
}

impl fmt::Debug for SearchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchContext")
            .field("sizes", &self.pools.sizes())
            .field("predict_reforges", &self.predict_reforges)
            .field("calculator", &self.calculator.name())
            .field("cached", &self.cache.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gear::{Gear, GearSet, ItemStat, StatKind};
    use crate::memo::SetFormat;
    use crate::stats::{ReferenceCalculator, Stat};

    #[test]
    fn test_contributions_fill_cache() {
        let items = vec![
            Item::new("h1", Gear::Helmet, GearSet::Health)
                .with_substat(ItemStat::new(StatKind::Speed, 3.0)),
            Item::new("h2", Gear::Helmet, GearSet::Health)
                .with_substat(ItemStat::new(StatKind::Speed, 5.0)),
        ];
        let ctx = SearchContext::new(
            SlotPools::partition(&items, &SetFormat::any()),
            BaseStats::default(),
            false,
            Arc::new(ReferenceCalculator),
        );
        let vectors: Vec<StatVector> = ctx
            .pools
            .slot(Gear::Helmet)
            .iter()
            .map(|item| ctx.contribution(item).unwrap())
            .collect();
        assert_eq!(vectors[1].get(Stat::Speed), 5.0);
        assert_eq!(ctx.cache.len(), 2);
        assert_eq!(ctx.contribution(&items[1]).unwrap(), vectors[1]);
        assert_eq!(ctx.cache.len(), 2);
    }
}
