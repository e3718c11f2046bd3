// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! End-to-end runs through the session registry.
//!
//! These tests validate that a run:
//! - evaluates every build of the cross product exactly once
//! - assigns result ids and positional indices correctly
//! - honors the capture cap
//! - reports cancellation and timeouts

mod common;

use common::{base, registry, uniform_items};
use gear_search::config::SearchConfig;
use gear_search::engine::Position;
use gear_search::gear::{GearSet, SLOT_COUNT};
use gear_search::predicates::{Field, FilterSpec, StatRange};
use gear_search::session::{SearchRequest, SessionRegistry};
use gear_search::stats::{BuildTags, ReferenceCalculator, StatCalculator, StatVector};
use std::collections::HashSet;
use std::sync::Arc;
use strum::IntoEnumIterator;

fn request(items: Vec<gear_search::gear::Item>, filter: FilterSpec) -> SearchRequest {
    SearchRequest {
        items,
        filter,
        base: base(),
        predict_reforges: false,
    }
}

#[test]
fn test_single_build_matches_exact_ranges() {
    let sets = [GearSet::Critical; SLOT_COUNT];
    let zero = StatVector::ZERO;
    let derived = ReferenceCalculator.combine(&base(), [&zero; SLOT_COUNT], &sets, BuildTags::default());

    let mut filter = FilterSpec::new();
    for field in Field::iter() {
        let value = field.value(&derived);
        filter = filter.with_range(field, StatRange::new(value, value));
    }

    let registry = registry(10, 2);
    let id = registry.prepare();
    let items = uniform_items([1; SLOT_COUNT], GearSet::Critical);
    let summary = registry.run(&id, &request(items, filter)).unwrap();

    assert_eq!(summary.searched, 1);
    assert_eq!(summary.accepted, 1);
    assert_eq!(summary.captured, 1);
    let result = registry.result(&id, 0).unwrap();
    assert_eq!(result.position, 0);
    assert_eq!(result.stats, derived);
    assert_eq!(result.sets, sets);
}

#[test]
fn test_two_weapons_two_helmets() {
    let registry = registry(10, 4);
    let id = registry.prepare();
    let items = uniform_items([2, 2, 1, 1, 1, 1], GearSet::Hit);
    let summary = registry.run(&id, &request(items, FilterSpec::new())).unwrap();

    assert_eq!(summary.searched, 4);
    assert_eq!(summary.accepted, 4);

    let rows = registry.rows(&id, 0..10);
    let positions: HashSet<u64> = rows.iter().map(|c| c.position).collect();
    assert_eq!(positions, HashSet::from([0, 1, 2, 3]));

    let sizes = [2, 2, 1, 1, 1, 1];
    for row in &rows {
        let offsets = Position::decode(row.position, sizes).unwrap().offsets();
        assert_eq!(row.items[0].as_str(), format!("0-{}", offsets[0]));
        assert_eq!(row.items[1].as_str(), format!("1-{}", offsets[1]));
    }
    let ids: HashSet<u64> = rows.iter().map(|c| c.id).collect();
    assert_eq!(ids, HashSet::from([0, 1, 2, 3]));
}

#[test]
fn test_cap_exceeded() {
    let registry = registry(5, 3);
    let id = registry.prepare();
    let items = uniform_items([3, 2, 2, 1, 1, 1], GearSet::Speed);
    let summary = registry.run(&id, &request(items, FilterSpec::new())).unwrap();

    assert!(summary.cap_reached);
    assert_eq!(summary.captured, 5);
    assert!(summary.accepted > 5);
    assert_eq!(registry.result_count(&id), 5);

    let ids: Vec<u64> = registry.rows(&id, 0..100).iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_cap_not_exceeded() {
    for cap in [12, 13, 100] {
        let registry = registry(cap, 3);
        let id = registry.prepare();
        let items = uniform_items([3, 2, 2, 1, 1, 1], GearSet::Speed);
        let summary = registry.run(&id, &request(items, FilterSpec::new())).unwrap();

        assert!(!summary.cap_reached, "cap {cap}");
        assert_eq!(summary.searched, 12);
        assert_eq!(summary.accepted, 12);
        assert_eq!(summary.captured, 12);
    }
}

#[test]
fn test_empty_slot() {
    let registry = registry(10, 2);
    let id = registry.prepare();
    let items = uniform_items([3, 2, 0, 1, 1, 1], GearSet::Speed);
    let summary = registry.run(&id, &request(items, FilterSpec::new())).unwrap();
    assert_eq!(summary.searched, 0);
    assert_eq!(summary.captured, 0);
    assert!(registry.rows(&id, 0..10).is_empty());
}

/// Enough builds that no run finishes before it is interrupted.
fn large_items() -> Vec<gear_search::gear::Item> {
    uniform_items([8, 16, 16, 16, 16, 16], GearSet::Speed)
}

/// Rejects every build, so neither the cap nor a short run can end it.
fn unreachable_filter() -> FilterSpec {
    FilterSpec::new().with_range(Field::Priority, StatRange::at_least(1.0))
}

#[test]
fn test_interrupt_cancels_run() {
    let registry = registry(1_000, 2);
    let id = registry.prepare();
    let request = request(large_items(), unreachable_filter());

    let summary = std::thread::scope(|scope| {
        let handle = scope.spawn(|| registry.run(&id, &request));
        while registry.progress(&id).searched == 0 {
            std::thread::yield_now();
        }
        registry.interrupt();
        handle.join().unwrap()
    })
    .unwrap();

    assert!(summary.cancelled);
    assert!(!summary.cap_reached);
    assert_eq!(summary.accepted, 0);
    assert!(summary.searched < 8 * 16u64.pow(5));
    assert!(!registry.is_running(&id));
}

#[test]
fn test_timeout_cancels_run() {
    let config = SearchConfig {
        await_timeout_secs: 0,
        ..common::config(1_000, 2)
    };
    let registry = SessionRegistry::new(config, Arc::new(ReferenceCalculator)).unwrap();
    let id = registry.prepare();
    let summary = registry
        .run(&id, &request(large_items(), unreachable_filter()))
        .unwrap();
    assert!(summary.cancelled);
    assert!(!summary.cap_reached);
    assert!(summary.searched < 8 * 16u64.pow(5));
}

#[test]
fn test_progress_never_decreases() {
    let registry = registry(1_000, 2);
    let id = registry.prepare();
    let request = request(
        uniform_items([4, 8, 8, 8, 8, 8], GearSet::Speed),
        FilterSpec::new().with_range(Field::Priority, StatRange::at_least(1.0)),
    );

    std::thread::scope(|scope| {
        let handle = scope.spawn(|| registry.run(&id, &request));
        let mut last = registry.progress(&id);
        while !handle.is_finished() {
            let now = registry.progress(&id);
            assert!(now.searched >= last.searched);
            assert!(now.accepted >= last.accepted);
            last = now;
        }
        let summary = handle.join().unwrap().unwrap();
        assert_eq!(summary.searched, 4 * 8u64.pow(5));
        assert_eq!(summary.accepted, 0);
        assert!(registry.progress(&id).searched >= last.searched);
    });
}
