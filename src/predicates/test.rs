// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Simple predicates for exercising the executor.

use crate::engine::CandidatePredicate;
use crate::gear::{GearSet, SLOT_COUNT};
use crate::stats::DerivedStats;

/// Accepts every build.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl CandidatePredicate for AcceptAll {
    fn accepts(&self, _stats: &DerivedStats, _sets: &[GearSet; SLOT_COUNT]) -> bool {
        true
    }

    fn name(&self) -> &str {
        "AcceptAll"
    }
}

/// Rejects every build.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectAll;

impl CandidatePredicate for RejectAll {
    fn accepts(&self, _stats: &DerivedStats, _sets: &[GearSet; SLOT_COUNT]) -> bool {
        false
    }

    fn name(&self) -> &str {
        "RejectAll"
    }
}

/// Accepts builds whose priority sum is at least the threshold.
#[derive(Debug, Clone, Copy)]
pub struct MinPriority(pub i32);

impl CandidatePredicate for MinPriority {
    fn accepts(&self, stats: &DerivedStats, _sets: &[GearSet; SLOT_COUNT]) -> bool {
        stats.priority >= self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trivial_predicates() {
        let stats = DerivedStats::default();
        let sets = [GearSet::Health; SLOT_COUNT];
        assert!(AcceptAll.accepts(&stats, &sets));
        assert!(!RejectAll.accepts(&stats, &sets));
        assert!(MinPriority(0).accepts(&stats, &sets));
        assert!(!MinPriority(1).accepts(&stats, &sets));
        assert_eq!(AcceptAll.name(), "AcceptAll");
    }
}
