// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Parallel search over six-slot gear builds.
//!
//! Given a pool of items for six gear slots, the search enumerates every
//! combination of one item per slot, derives the build's stats, and keeps
//! the builds that satisfy numeric ranges and an equipment-set format.
//!
//! # Architecture
//!
//! The implementation uses a two-tier memory model:
//!
//! ## Tier 1: MEMO Data (Immutable)
//!
//! Precomputed once per run, then shared read-only by every worker:
//! - [`memo::SetFormatIndex`]: one bit per sorted six-tuple of set ids
//! - [`memo::SlotPools`]: the items grouped by slot, ordered for pruning
//!
//! ## Tier 2: Shared State (Lock-free)
//!
//! Written by workers during the run:
//! - [`state::AccumulatorCache`]: per-item contribution vectors
//! - [`state::CaptureBuffer`]: fixed-capacity, write-once result slots
//! - [`state::Statistics`]: searched and pruning counters
//! - [`state::Interrupt`]: the cooperative abort flag
//!
//! # Search Algorithm
//!
//! 1. Build the set-format index and partition the items by slot
//! 2. Run one task per weapon on a bounded rayon pool
//! 3. Each task walks helmet × armor × necklace × ring × boots, derives the
//!    stats through a [`stats::StatCalculator`], applies the filter, and
//!    claims a slot in the capture buffer for each accepted build
//! 4. For four-piece set formats, a task stops its armor loop as soon as the
//!    first three pieces can no longer make four of a primary set
//!
//! # Sessions
//!
//! [`session::SessionRegistry`] wraps runs into sessions addressed by an
//! execution id, with progress polling, cancellation, narrowing and paging.

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod gear;
pub mod memo;
pub mod predicates;
pub mod session;
pub mod state;
pub mod stats;

// Re-export commonly used types
pub use config::SearchConfig;
pub use context::SearchContext;
pub use engine::{CandidatePredicate, SearchExecutor, SearchSummary};
pub use error::{Result, SearchError};
pub use session::{ExecutionId, SearchRequest, SessionRegistry};
