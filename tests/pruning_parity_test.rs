// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The four-piece armor prune never loses a build.
//!
//! For set formats with a four-piece primary group, the same ordered pools
//! are enumerated twice, once with the armor-level break and once without,
//! and both runs must accept exactly the same positions.

mod common;

use common::{base, config, items_with_sets};
use gear_search::context::SearchContext;
use gear_search::engine::{SearchExecutor, SearchSummary};
use gear_search::gear::{GearSet, SLOT_COUNT};
use gear_search::memo::{SetFormat, SetFormatMode, SlotPools};
use gear_search::predicates::{CompiledFilter, FilterSpec};
use gear_search::state::{CaptureBuffer, Interrupt, Statistics};
use gear_search::stats::ReferenceCalculator;
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Sets drawn from a small universe so primary pieces are common.
fn small_set() -> impl Strategy<Value = GearSet> {
    prop::sample::select(vec![
        GearSet::Health,
        GearSet::Attack,
        GearSet::Speed,
        GearSet::Critical,
        GearSet::Hit,
    ])
}

fn pools() -> impl Strategy<Value = [Vec<GearSet>; SLOT_COUNT]> {
    prop::array::uniform6(prop::collection::vec(small_set(), 1..4))
}

fn run(pools: SlotPools, filter: &CompiledFilter) -> (SearchSummary, BTreeSet<u64>) {
    let ctx = SearchContext::new(pools, base(), false, Arc::new(ReferenceCalculator));
    let executor = SearchExecutor::new(&config(10_000, 2), Interrupt::new()).unwrap();
    let statistics = Statistics::new();
    let buffer = CaptureBuffer::with_capacity(10_000);
    let summary = executor.execute(&ctx, filter, &statistics, &buffer);
    let positions = buffer
        .snapshot()
        .candidates()
        .iter()
        .map(|c| c.position)
        .collect();
    (summary, positions)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn test_pruned_matches_exhaustive(
        sets in pools(),
        four_two in any::<bool>(),
        primary in prop::collection::vec(small_set(), 1..3),
        secondary in prop::collection::vec(small_set(), 1..3),
    ) {
        let format = SetFormat {
            mode: if four_two { SetFormatMode::FourTwo } else { SetFormatMode::Four },
            primary,
            secondary,
            ..SetFormat::default()
        };
        let filter = CompiledFilter::compile(&FilterSpec::new().with_set_format(format.clone()));
        let items = items_with_sets(&sets);

        let pruned_pools = SlotPools::partition(&items, &format);
        prop_assert!(pruned_pools.is_prunable());
        let exhaustive_pools = pruned_pools.clone().without_pruning();
        let total = exhaustive_pools.combinations();

        let (pruned, pruned_positions) = run(pruned_pools, &filter);
        let (exhaustive, exhaustive_positions) = run(exhaustive_pools, &filter);

        prop_assert_eq!(exhaustive.searched, total);
        prop_assert_eq!(exhaustive.pruned, 0);
        prop_assert!(pruned.searched <= exhaustive.searched);
        prop_assert_eq!(pruned.accepted, exhaustive.accepted);
        prop_assert_eq!(pruned_positions, exhaustive_positions);
    }
}
