// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Bounded result capture.
//!
//! The buffer is sized once, before the run, and never grows. Accepting a
//! build is a two-step protocol:
//!
//! 1. claim: `fetch_add` on the shared counter hands out a unique index
//! 2. write: an index below capacity owns its write-once slot; an index at or
//!    past capacity is discarded and marks the cap as reached
//!
//! The counter is never reset during a run, so it doubles as the running
//! total of accepted builds, including the ones discarded past the cap.
//!
//! Each slot holds a boxed candidate, so an empty slot costs one pointer plus
//! the once-flag and a large cap stays cheap until builds are accepted.
//!
//! Slots are read only after every worker has finished, via
//! [`CaptureBuffer::into_results`] or [`CaptureBuffer::snapshot`].

use crate::gear::{GearSet, ItemId, SLOT_COUNT};
use crate::stats::DerivedStats;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::OnceLock;
use tracing::warn;

/// One accepted build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Sequential result id; also the slot it was written to.
    pub id: u64,
    /// Encoded per-slot offsets, see [`Position`](crate::engine::Position).
    pub position: u64,
    pub stats: DerivedStats,
    /// Item ids in slot order.
    pub items: [ItemId; SLOT_COUNT],
    /// Set memberships in slot order.
    pub sets: [GearSet; SLOT_COUNT],
}

/// Outcome of offering a build to the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    Stored(u64),
    Full,
}

pub struct CaptureBuffer {
    slots: Box<[OnceLock<Box<Candidate>>]>,
    claimed: AtomicU64,
    cap_reached: AtomicBool,
}

impl CaptureBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| OnceLock::new()).collect(),
            claimed: AtomicU64::new(0),
            cap_reached: AtomicBool::new(false),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Claim an index and, if it is below capacity, write the candidate
    /// `make` builds for it.
    pub fn try_insert<F>(&self, make: F) -> Claim
    where
        F: FnOnce(u64) -> Candidate,
    {
        let index = self.claimed.fetch_add(1, Ordering::AcqRel);
        match self.slots.get(index as usize) {
            Some(slot) => {
                // Each index is handed out once, so the slot is empty.
                let stored = slot.set(Box::new(make(index))).is_ok();
                debug_assert!(stored, "slot {index} written twice");
                Claim::Stored(index)
            }
            None => {
                self.cap_reached.store(true, Ordering::Release);
                Claim::Full
            }
        }
    }

    /// Running count of claims, including discarded ones.
    pub fn claimed(&self) -> u64 {
        self.claimed.load(Ordering::Acquire)
    }

    pub fn cap_reached(&self) -> bool {
        self.cap_reached.load(Ordering::Acquire)
    }

    /// Number of captured results: the capacity once the cap was hit,
    /// otherwise the exact claim count.
    pub fn len(&self) -> usize {
        if self.cap_reached() {
            self.capacity()
        } else {
            (self.claimed() as usize).min(self.capacity())
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy out the captured results, leaving the buffer intact.
    pub fn snapshot(&self) -> CapturedResults {
        let len = self.len();
        let candidates = self.slots[..len]
            .iter()
            .filter_map(|slot| slot.get().map(|candidate| candidate.as_ref().clone()))
            .collect();
        CapturedResults::new(candidates, len, self.claimed(), self.cap_reached())
    }

    /// Move the captured results out of the buffer. Call only after the run
    /// has joined.
    pub fn into_results(self) -> CapturedResults {
        let len = self.len();
        let accepted = self.claimed();
        let cap_reached = self.cap_reached();
        let candidates = self
            .slots
            .into_vec()
            .into_iter()
            .take(len)
            .filter_map(OnceLock::into_inner)
            .map(|candidate| *candidate)
            .collect();
        CapturedResults::new(candidates, len, accepted, cap_reached)
    }
}

impl std::fmt::Debug for CaptureBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureBuffer")
            .field("capacity", &self.capacity())
            .field("claimed", &self.claimed())
            .field("cap_reached", &self.cap_reached())
            .finish()
    }
}

/// Frozen results of a finished run, ordered by result id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapturedResults {
    candidates: Vec<Candidate>,
    accepted: u64,
    cap_reached: bool,
}

impl CapturedResults {
    fn new(candidates: Vec<Candidate>, expected: usize, accepted: u64, cap_reached: bool) -> Self {
        if candidates.len() != expected {
            warn!(
                "Capture buffer has {} empty slots out of {}",
                expected - candidates.len(),
                expected
            );
        }
        Self {
            candidates,
            accepted,
            cap_reached,
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Accepted count, which exceeds `len()` when the cap was reached.
    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    pub fn cap_reached(&self) -> bool {
        self.cap_reached
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Look up a candidate by result id.
    pub fn get(&self, id: u64) -> Option<&Candidate> {
        match self.candidates.get(id as usize) {
            Some(candidate) if candidate.id == id => Some(candidate),
            _ => self
                .candidates
                .binary_search_by_key(&id, |c| c.id)
                .ok()
                .map(|i| &self.candidates[i]),
        }
    }

    /// Candidates in a row range, clamped to what exists.
    pub fn rows(&self, range: Range<usize>) -> &[Candidate] {
        let end = range.end.min(self.candidates.len());
        let start = range.start.min(end);
        &self.candidates[start..end]
    }
}
