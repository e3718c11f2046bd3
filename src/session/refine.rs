// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Narrowing captured results.
//!
//! Every captured build already passed the run's set format, so narrowing
//! re-checks only numeric ranges, plus a list of item ids the caller no
//! longer wants to wear.

use crate::gear::ItemId;
use crate::predicates::{CompiledFilter, FilterSpec};
use crate::memo::SetFormatIndex;
use crate::state::CapturedResults;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// The narrowed view of a session's results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refinement {
    /// Result ids that survived, ascending.
    pub ids: Vec<u64>,
}

impl Refinement {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Keep the captured builds inside the ranges that wear no excluded item.
pub fn refine(
    results: &CapturedResults,
    spec: &FilterSpec,
    excluded: &HashSet<ItemId>,
) -> Refinement {
    let filter = CompiledFilter::with_index(spec, Arc::new(SetFormatIndex::all()));
    let ids = results
        .candidates()
        .par_iter()
        .filter(|candidate| filter.accepts_stats(&candidate.stats))
        .filter(|candidate| !candidate.items.iter().any(|id| excluded.contains(id)))
        .map(|candidate| candidate.id)
        .collect();
    Refinement { ids }
}
