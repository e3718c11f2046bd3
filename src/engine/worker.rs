// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The work for one weapon.
//!
//! Before any partition starts, the executor resolves the contribution
//! vectors of the helmet, armor, necklace, ring and boots pools once, through
//! the shared cache. An item whose vector cannot be computed is dropped from
//! its pool and reported; builds of the remaining items still run.
//!
//! A partition fixes the weapon and walks helmet × armor × necklace × ring ×
//! boots over the resolved pools in that order.

use crate::context::SearchContext;
use crate::engine::position::Position;
use crate::engine::predicate::CandidatePredicate;
use crate::error::{Result, SearchError};
use crate::gear::{Gear, Item, SLOT_COUNT};
use crate::state::{Candidate, CaptureBuffer, Claim, Counters, Interrupt, Statistics};
use crate::stats::{BuildTags, StatVector};
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error};

/// How a partition ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionOutcome {
    Completed,
    /// The interrupt was observed.
    Cancelled,
    /// A claim landed at or past capacity.
    CapReached,
}

/// An item left out of a run because its contribution could not be computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFault {
    pub id: String,
    pub message: String,
}

/// A usable pool entry: its offset in the pool and its contribution.
#[derive(Debug, Clone, Copy)]
pub struct Resolved {
    pub offset: usize,
    pub vector: StatVector,
}

/// Contribution vectors of every non-weapon pool, computed once per run.
#[derive(Debug, Default)]
pub struct ResolvedPools {
    slots: [Vec<Resolved>; SLOT_COUNT],
}

impl ResolvedPools {
    const SLOTS: [Gear; SLOT_COUNT - 1] = [
        Gear::Helmet,
        Gear::Armor,
        Gear::Necklace,
        Gear::Ring,
        Gear::Boots,
    ];

    /// Resolve the non-weapon pools, dropping items that fail or panic.
    pub fn resolve(ctx: &SearchContext) -> (Self, Vec<ItemFault>) {
        let mut resolved = Self::default();
        let mut faults = Vec::new();
        for gear in Self::SLOTS {
            for (offset, item) in ctx.pools.slot(gear).iter().enumerate() {
                let vector = panic::catch_unwind(AssertUnwindSafe(|| ctx.contribution(item)))
                    .unwrap_or_else(|payload| {
                        Err(SearchError::MalformedItem {
                            id: item.id.to_string(),
                            reason: panic_message(payload.as_ref()),
                        })
                    });
                match vector {
                    Ok(vector) => resolved.slots[gear.as_usize()].push(Resolved { offset, vector }),
                    Err(err) => {
                        error!("Dropping {gear:?} {}: {err}", item.id);
                        faults.push(ItemFault {
                            id: item.id.to_string(),
                            message: err.to_string(),
                        });
                    }
                }
            }
        }
        (resolved, faults)
    }

    /// Usable entries of a slot, in pool order. Always empty for the weapon.
    pub fn slot(&self, gear: Gear) -> &[Resolved] {
        &self.slots[gear.as_usize()]
    }
}

/// Everything a partition reads or writes, borrowed from the run.
#[derive(Debug)]
pub struct PartitionTask<'a, P: ?Sized> {
    pub ctx: &'a SearchContext,
    pub resolved: &'a ResolvedPools,
    pub predicate: &'a P,
    pub statistics: &'a Statistics,
    pub buffer: &'a CaptureBuffer,
    pub interrupt: &'a Interrupt,
}

impl<P: CandidatePredicate + ?Sized> PartitionTask<'_, P> {
    /// Run one partition, turning a panic into a fault for that weapon only.
    pub fn run_guarded(&self, weapon: usize) -> Result<PartitionOutcome> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run(weapon)))
            .unwrap_or_else(|payload| {
                Err(SearchError::WorkerFault {
                    weapon,
                    message: panic_message(payload.as_ref()),
                })
            })
            .map_err(|err| match err {
                SearchError::WorkerFault { .. } => err,
                other => SearchError::WorkerFault {
                    weapon,
                    message: other.to_string(),
                },
            });

        match &outcome {
            Ok(outcome) => debug!("Partition {weapon} finished: {outcome:?}"),
            Err(err) => error!("{err}"),
        }
        outcome
    }

    /// Enumerate every build with this weapon.
    pub fn run(&self, w: usize) -> Result<PartitionOutcome> {
        if self.interrupt.is_raised() {
            return Ok(PartitionOutcome::Cancelled);
        }

        let ctx = self.ctx;
        let pools = &ctx.pools;
        let sizes = pools.sizes();

        let weapon = &pools.slot(Gear::Weapon)[w];
        let helmets = pools.slot(Gear::Helmet);
        let armors = pools.slot(Gear::Armor);
        let necklaces = pools.slot(Gear::Necklace);
        let rings = pools.slot(Gear::Ring);
        let boots_pool = pools.slot(Gear::Boots);

        let wv = ctx.contribution(weapon)?;
        let resolved = self.resolved;

        // Searched counts are flushed once per ring so the shared counter is
        // not contended per build.
        let mut searched = 0u64;

        for h in resolved.slot(Gear::Helmet) {
            let helmet = &helmets[h.offset];
            for a in resolved.slot(Gear::Armor) {
                let armor = &armors[a.offset];
                if pools.can_prune(weapon, helmet, armor) {
                    self.statistics.increment_counter(Counters::Pruned);
                    break;
                }

                for n in resolved.slot(Gear::Necklace) {
                    for r in resolved.slot(Gear::Ring) {
                        for b in resolved.slot(Gear::Boots) {
                            if self.interrupt.is_raised() {
                                self.statistics.add(Counters::Searched, searched);
                                return Ok(PartitionOutcome::Cancelled);
                            }

                            let items = [
                                weapon,
                                helmet,
                                armor,
                                &necklaces[n.offset],
                                &rings[r.offset],
                                &boots_pool[b.offset],
                            ];
                            let sets = items.map(|item| item.set);
                            let stats = ctx.calculator.combine(
                                &ctx.base,
                                [&wv, &h.vector, &a.vector, &n.vector, &r.vector, &b.vector],
                                &sets,
                                build_tags(&items),
                            );
                            searched += 1;

                            if !self.predicate.accepts(&stats, &sets) {
                                continue;
                            }

                            let offsets = [w, h.offset, a.offset, n.offset, r.offset, b.offset];
                            let position = Position::new(offsets).encode(sizes);
                            let claim = self.buffer.try_insert(|id| Candidate {
                                id,
                                position,
                                stats,
                                items: items.map(|item| item.id.clone()),
                                sets,
                            });
                            if claim == Claim::Full {
                                self.statistics.add(Counters::Searched, searched);
                                return Ok(PartitionOutcome::CapReached);
                            }
                        }
                        self.statistics.add(Counters::Searched, searched);
                        searched = 0;
                    }
                }
            }
        }

        self.statistics.increment_counter(Counters::PartitionsCompleted);
        Ok(PartitionOutcome::Completed)
    }
}

fn build_tags(items: &[&Item; SLOT_COUNT]) -> BuildTags {
    items.iter().fold(BuildTags::default(), |tags, item| BuildTags {
        upgrades: tags.upgrades + item.upgradeable,
        conversions: tags.conversions + item.convertable,
        priority: tags.priority + item.priority,
    })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic".to_string()
    }
}
