// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Candidate predicates.
//!
//! # Organization
//!
//! - `filter`: the request filter (numeric ranges then set format)
//! - `test`: trivial predicates for exercising the executor

pub mod filter;
pub mod test;

pub use filter::{CompiledFilter, Field, FilterSpec, StatRange};
