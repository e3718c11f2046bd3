// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Immutable per-run data, computed once before enumeration starts.
//!
//! - [`SetFormatIndex`]: validity of every sorted six-tuple of set ids
//! - [`SlotPools`]: the item pool grouped by slot and ordered for pruning
//!
//! Both are built on the orchestrating thread and then shared read-only by
//! every worker.

pub mod partition;
pub mod set_format;

pub use partition::SlotPools;
pub use set_format::{SetFormat, SetFormatIndex, SetFormatMode};
