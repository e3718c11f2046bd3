// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Parallel search executor.
//!
//! The executor splits a run into one partition per weapon and hands the
//! partitions to a fixed-size rayon pool, one task each. Partitions share the
//! context, the predicate, the statistics and the capture buffer; none of
//! them takes a lock.
//!
//! # Lifecycle
//!
//! 1. The caller builds a [`SearchContext`] and a predicate
//! 2. `execute` runs every partition and waits, up to the configured timeout
//! 3. On timeout the interrupt is raised and the partitions drain
//! 4. Per-partition outcomes are folded into a [`SearchSummary`]
//!
//! A partition that fails (calculator error or panic) is reported as a fault
//! and does not stop its siblings. A non-weapon item whose contribution fails
//! is dropped from its pool and reported; the other builds still run.
//!
//! # Example
//!
//! ```
//! use gear_search::config::SearchConfig;
//! use gear_search::context::SearchContext;
//! use gear_search::engine::SearchExecutor;
//! use gear_search::gear::{Gear, GearSet, Item};
//! use gear_search::memo::{SetFormat, SlotPools};
//! use gear_search::predicates::test::AcceptAll;
//! use gear_search::state::{CaptureBuffer, Interrupt, Statistics};
//! use gear_search::stats::{BaseStats, ReferenceCalculator};
//! use std::sync::Arc;
//!
//! let items = vec![
//!     Item::new("w", Gear::Weapon, GearSet::Speed),
//!     Item::new("h", Gear::Helmet, GearSet::Speed),
//!     Item::new("a", Gear::Armor, GearSet::Speed),
//!     Item::new("n", Gear::Necklace, GearSet::Speed),
//!     Item::new("r", Gear::Ring, GearSet::Hit),
//!     Item::new("b", Gear::Boots, GearSet::Hit),
//! ];
//! let ctx = SearchContext::new(
//!     SlotPools::partition(&items, &SetFormat::any()),
//!     BaseStats::default(),
//!     false,
//!     Arc::new(ReferenceCalculator),
//! );
//! let config = SearchConfig::default().with_worker_threads(2);
//! let executor = SearchExecutor::new(&config, Interrupt::new()).unwrap();
//! let statistics = Statistics::new();
//! let buffer = CaptureBuffer::with_capacity(10);
//!
//! let summary = executor.execute(&ctx, &AcceptAll, &statistics, &buffer);
//! assert_eq!(summary.searched, 1);
//! assert_eq!(summary.captured, 1);
//! ```

pub mod position;
pub mod predicate;
pub mod worker;

pub use position::Position;
pub use predicate::CandidatePredicate;
pub use worker::{ItemFault, PartitionOutcome, PartitionTask, Resolved, ResolvedPools};

use crate::config::SearchConfig;
use crate::context::SearchContext;
use crate::error::{Result, SearchError};
use crate::gear::Gear;
use crate::state::{CaptureBuffer, Counters, Interrupt, Statistics};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// A partition that failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionFault {
    pub weapon: usize,
    pub message: String,
}

impl From<PartitionFault> for SearchError {
    fn from(fault: PartitionFault) -> Self {
        SearchError::WorkerFault {
            weapon: fault.weapon,
            message: fault.message,
        }
    }
}

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchSummary {
    /// Builds evaluated.
    pub searched: u64,
    /// Builds the predicate accepted, including those past the cap.
    pub accepted: u64,
    /// Builds held in the capture buffer.
    pub captured: usize,
    pub cap_reached: bool,
    pub cancelled: bool,
    /// Armor loops cut short by the four-piece prune.
    pub pruned: u64,
    pub faults: Vec<PartitionFault>,
    /// Items left out of every partition.
    pub dropped: Vec<ItemFault>,
}

/// Runs partitions on a bounded worker pool.
pub struct SearchExecutor {
    pool: ThreadPool,
    interrupt: Interrupt,
    timeout: Duration,
}

impl SearchExecutor {
    pub fn new(config: &SearchConfig, interrupt: Interrupt) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.workers())
            .thread_name(|i| format!("gear-search-{i}"))
            .build()?;
        Ok(Self {
            pool,
            interrupt,
            timeout: config.await_timeout(),
        })
    }

    pub fn interrupt(&self) -> &Interrupt {
        &self.interrupt
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run every weapon partition and wait for them.
    pub fn execute<P>(
        &self,
        ctx: &SearchContext,
        predicate: &P,
        statistics: &Statistics,
        buffer: &CaptureBuffer,
    ) -> SearchSummary
    where
        P: CandidatePredicate + ?Sized,
    {
        let start = Instant::now();
        let weapons = if ctx.pools.has_empty_slot() {
            0
        } else {
            ctx.pools.slot(Gear::Weapon).len()
        };

        let (resolved, dropped) = if weapons == 0 {
            (ResolvedPools::default(), Vec::new())
        } else {
            ResolvedPools::resolve(ctx)
        };

        let task = PartitionTask {
            ctx,
            resolved: &resolved,
            predicate,
            statistics,
            buffer,
            interrupt: &self.interrupt,
        };

        info!(
            "Searching {} builds in {} partitions on {} workers",
            ctx.pools.combinations(),
            weapons,
            self.workers()
        );

        let outcomes: Vec<Result<PartitionOutcome>> = std::thread::scope(|scope| {
            let (sender, receiver) = mpsc::channel();
            let task = &task;
            scope.spawn(move || {
                let outcomes: Vec<Result<PartitionOutcome>> = self.pool.install(|| {
                    (0..weapons)
                        .into_par_iter()
                        .with_max_len(1)
                        .map(|w| task.run_guarded(w))
                        .collect()
                });
                // The receiver only goes away if the orchestrator is gone.
                let _ = sender.send(outcomes);
            });

            match receiver.recv_timeout(self.timeout) {
                Ok(outcomes) => outcomes,
                Err(RecvTimeoutError::Timeout) => {
                    warn!(
                        "Search did not finish within {:?}; cancelling",
                        self.timeout
                    );
                    self.interrupt.raise();
                    receiver.recv().unwrap_or_default()
                }
                Err(RecvTimeoutError::Disconnected) => Vec::new(),
            }
        });

        let mut summary = SearchSummary {
            searched: statistics.get(Counters::Searched),
            accepted: buffer.claimed(),
            captured: buffer.len(),
            cap_reached: buffer.cap_reached(),
            pruned: statistics.get(Counters::Pruned),
            dropped,
            ..SearchSummary::default()
        };
        for outcome in outcomes {
            match outcome {
                Ok(PartitionOutcome::Cancelled) => summary.cancelled = true,
                Ok(_) => {}
                Err(SearchError::WorkerFault { weapon, message }) => {
                    summary.faults.push(PartitionFault { weapon, message })
                }
                Err(other) => summary.faults.push(PartitionFault {
                    weapon: usize::MAX,
                    message: other.to_string(),
                }),
            }
        }
        summary.faults.sort_by_key(|fault| fault.weapon);

        if !summary.dropped.is_empty() {
            warn!("{} items dropped from the search", summary.dropped.len());
        }
        if summary.cap_reached {
            warn!(
                "Result cap of {} reached after {} accepted builds",
                buffer.capacity(),
                summary.accepted
            );
        }
        if summary.cancelled {
            warn!("Search cancelled after {} builds", summary.searched);
        }
        info!(
            "Search finished in {:?}: searched {}, accepted {}, captured {}, {} faults",
            start.elapsed(),
            summary.searched,
            summary.accepted,
            summary.captured,
            summary.faults.len()
        );
        summary
    }
}

impl std::fmt::Debug for SearchExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchExecutor")
            .field("workers", &self.workers())
            .field("timeout", &self.timeout)
            .finish()
    }
}
