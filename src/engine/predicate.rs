// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Predicate trait for accepting or rejecting candidate builds.
//!
//! The executor calls the predicate once per enumerated build, from many
//! worker threads at once, before anything is allocated for the build. A
//! predicate therefore sees only the derived stats and the six sets; the item
//! ids are attached after acceptance.
//!
//! # Example
//!
//! ```
//! use gear_search::engine::CandidatePredicate;
//! use gear_search::gear::{GearSet, SLOT_COUNT};
//! use gear_search::stats::DerivedStats;
//!
//! #[derive(Debug)]
//! struct FastEnough(f32);
//!
//! impl CandidatePredicate for FastEnough {
//!     fn accepts(&self, stats: &DerivedStats, _sets: &[GearSet; SLOT_COUNT]) -> bool {
//!         stats.spd >= self.0
//!     }
//! }
//!
//! let fast = DerivedStats { spd: 250.0, ..DerivedStats::default() };
//! assert!(FastEnough(200.0).accepts(&fast, &[GearSet::Speed; SLOT_COUNT]));
//! ```

use crate::gear::{GearSet, SLOT_COUNT};
use crate::stats::DerivedStats;
use std::fmt::Debug;

/// Decides whether an enumerated build is kept.
///
/// Must be pure: the same stats and sets always give the same answer, on any
/// thread.
pub trait CandidatePredicate: Debug + Send + Sync {
    fn accepts(&self, stats: &DerivedStats, sets: &[GearSet; SLOT_COUNT]) -> bool;

    /// Optional: a name for logging.
    ///
    /// Default implementation returns the type name.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<P: CandidatePredicate + ?Sized> CandidatePredicate for &P {
    fn accepts(&self, stats: &DerivedStats, sets: &[GearSet; SLOT_COUNT]) -> bool {
        (**self).accepts(stats, sets)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
