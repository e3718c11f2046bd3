// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Mutable run state, shared by all workers without locks.
//!
//! - `accumulators`: per-item contribution cache
//! - `capture`: the bounded result buffer
//! - `interrupt`: the cooperative abort flag
//! - `statistics`: searched and pruning counters

pub mod accumulators;
pub mod capture;
pub mod interrupt;
pub mod statistics;

pub use accumulators::AccumulatorCache;
pub use capture::{Candidate, CaptureBuffer, CapturedResults, Claim};
pub use interrupt::Interrupt;
pub use statistics::{Counters, ProgressSnapshot, Statistics};
