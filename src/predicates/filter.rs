// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Range and set-format filter.
//!
//! A [`FilterSpec`] is what a request carries: optional inclusive bounds per
//! numeric field plus a [`SetFormat`]. Compiling it gives a
//! [`CompiledFilter`], which keeps only the bounded fields and the prebuilt
//! [`SetFormatIndex`], and is what the workers share.

use crate::engine::CandidatePredicate;
use crate::gear::{GearSet, SLOT_COUNT};
use crate::memo::{SetFormat, SetFormatIndex};
use crate::stats::DerivedStats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use strum_macros::{EnumCount as EnumCountMacro, EnumIter};
use tracing::debug;

/// Every numeric field a filter can bound.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumCountMacro,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Atk,
    Hp,
    Def,
    Spd,
    Cr,
    Cd,
    Eff,
    Res,
    Cp,
    Hpps,
    Ehp,
    Ehpps,
    Dmg,
    Dmgps,
    Mcdmg,
    Mcdmgps,
    Dmgh,
    Score,
    Priority,
    Upgrades,
    Conversions,
}

impl Field {
    /// Read this field from a build. Widened to f64, which is exact for both
    /// the f32 and the i32 fields.
    #[inline]
    pub fn value(self, stats: &DerivedStats) -> f64 {
        match self {
            Field::Atk => stats.atk as f64,
            Field::Hp => stats.hp as f64,
            Field::Def => stats.def as f64,
            Field::Spd => stats.spd as f64,
            Field::Cr => stats.cr as f64,
            Field::Cd => stats.cd as f64,
            Field::Eff => stats.eff as f64,
            Field::Res => stats.res as f64,
            Field::Cp => stats.cp as f64,
            Field::Hpps => stats.hpps as f64,
            Field::Ehp => stats.ehp as f64,
            Field::Ehpps => stats.ehpps as f64,
            Field::Dmg => stats.dmg as f64,
            Field::Dmgps => stats.dmgps as f64,
            Field::Mcdmg => stats.mcdmg as f64,
            Field::Mcdmgps => stats.mcdmgps as f64,
            Field::Dmgh => stats.dmgh as f64,
            Field::Score => stats.score as f64,
            Field::Priority => stats.priority as f64,
            Field::Upgrades => stats.upgrades as f64,
            Field::Conversions => stats.conversions as f64,
        }
    }
}

/// Inclusive bounds; a missing side is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl StatRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn at_most(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    fn bounds(&self) -> (f64, f64) {
        (
            self.min.unwrap_or(f64::NEG_INFINITY),
            self.max.unwrap_or(f64::INFINITY),
        )
    }

    fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Filter as it arrives in a request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    pub ranges: BTreeMap<Field, StatRange>,
    pub set_format: SetFormat,
}

impl FilterSpec {
    /// No bounds and no set constraint.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_range(mut self, field: Field, range: StatRange) -> Self {
        self.ranges.insert(field, range);
        self
    }

    pub fn with_set_format(mut self, set_format: SetFormat) -> Self {
        self.set_format = set_format;
        self
    }
}

/// A filter ready for the hot path.
#[derive(Debug, Clone)]
pub struct CompiledFilter {
    bounds: Vec<(Field, f64, f64)>,
    index: Arc<SetFormatIndex>,
}

impl CompiledFilter {
    /// Keep the bounded fields and build the set-format index.
    pub fn compile(spec: &FilterSpec) -> Self {
        let index = Arc::new(SetFormatIndex::build(&spec.set_format));
        Self::with_index(spec, index)
    }

    /// Compile the numeric part against an index built elsewhere.
    pub fn with_index(spec: &FilterSpec, index: Arc<SetFormatIndex>) -> Self {
        let bounds: Vec<(Field, f64, f64)> = spec
            .ranges
            .iter()
            .filter(|(_, range)| !range.is_unbounded())
            .map(|(&field, range)| {
                let (min, max) = range.bounds();
                (field, min, max)
            })
            .collect();
        debug!("Compiled filter with {} bounded fields", bounds.len());
        Self { bounds, index }
    }

    /// The numeric check alone.
    #[inline]
    pub fn accepts_stats(&self, stats: &DerivedStats) -> bool {
        self.bounds.iter().all(|&(field, min, max)| {
            let value = field.value(stats);
            min <= value && value <= max
        })
    }

    pub fn index(&self) -> &Arc<SetFormatIndex> {
        &self.index
    }
}

impl CandidatePredicate for CompiledFilter {
    #[inline]
    fn accepts(&self, stats: &DerivedStats, sets: &[GearSet; SLOT_COUNT]) -> bool {
        self.accepts_stats(stats) && self.index.is_valid_sets(sets)
    }

    fn name(&self) -> &str {
        "Filter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memo::SetFormatMode;
    use strum::{EnumCount, IntoEnumIterator};

    fn stats() -> DerivedStats {
        DerivedStats {
            atk: 3000.0,
            spd: 250.0,
            cr: 100.0,
            priority: 4,
            ..DerivedStats::default()
        }
    }

    #[test]
    fn test_field_count() {
        assert_eq!(Field::COUNT, 21);
        let s = DerivedStats {
            conversions: -3,
            ..DerivedStats::default()
        };
        assert_eq!(Field::Conversions.value(&s), -3.0);
        assert_eq!(Field::iter().filter(|f| f.value(&s) != 0.0).count(), 1);
    }

    #[test]
    fn test_inclusive_bounds() {
        let any = [GearSet::Speed; SLOT_COUNT];
        let exact = CompiledFilter::compile(
            &FilterSpec::new().with_range(Field::Spd, StatRange::new(250.0, 250.0)),
        );
        assert!(exact.accepts(&stats(), &any));

        let above = CompiledFilter::compile(
            &FilterSpec::new().with_range(Field::Spd, StatRange::at_least(250.5)),
        );
        assert!(!above.accepts(&stats(), &any));

        let priority = CompiledFilter::compile(
            &FilterSpec::new().with_range(Field::Priority, StatRange::at_most(3.0)),
        );
        assert!(!priority.accepts(&stats(), &any));
    }

    #[test]
    fn test_set_format_checked_after_ranges() {
        let format = SetFormat {
            mode: SetFormatMode::Four,
            primary: vec![GearSet::Speed],
            ..SetFormat::default()
        };
        let filter = CompiledFilter::compile(&FilterSpec::new().with_set_format(format));
        let speed = [
            GearSet::Speed,
            GearSet::Speed,
            GearSet::Hit,
            GearSet::Speed,
            GearSet::Speed,
            GearSet::Hit,
        ];
        assert!(filter.accepts(&stats(), &speed));
        assert!(filter.accepts_stats(&stats()));
        assert!(!filter.accepts(&stats(), &[GearSet::Hit; SLOT_COUNT]));
    }

    #[test]
    fn test_unbounded_ranges_dropped() {
        let filter = CompiledFilter::compile(
            &FilterSpec::new().with_range(Field::Atk, StatRange::default()),
        );
        assert!(filter.bounds.is_empty());
    }

    #[test]
    fn test_spec_json() {
        let spec: FilterSpec = serde_json::from_str(
            r#"{
                "ranges": {"spd": {"min": 200}, "cr": {"min": 90, "max": 100}},
                "set_format": {"mode": 0}
            }"#,
        )
        .unwrap();
        assert_eq!(spec.ranges[&Field::Spd], StatRange::at_least(200.0));
        assert_eq!(spec.ranges[&Field::Cr], StatRange::new(90.0, 100.0));
        assert!(CompiledFilter::compile(&spec).accepts_stats(&stats()));
    }
}
