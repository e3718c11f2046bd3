// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Search sessions.
//!
//! A session is one optimization, identified by an execution id. It is
//! created by `prepare`, filled by `run`, narrowed by `refine`, read through
//! the paging accessors and dropped by `delete`. Running again on the same id
//! replaces the previous results.
//!
//! The registry owns the worker pool and the single process-wide interrupt.
//! Raising it cancels every run in flight; every run clears it when it
//! starts.

pub mod refine;

pub use refine::Refinement;

use crate::config::SearchConfig;
use crate::context::SearchContext;
use crate::engine::{SearchExecutor, SearchSummary};
use crate::error::{Result, SearchError};
use crate::gear::{Item, ItemId};
use crate::memo::SlotPools;
use crate::predicates::{CompiledFilter, FilterSpec};
use crate::state::{
    Candidate, CaptureBuffer, CapturedResults, Counters, Interrupt, ProgressSnapshot, Statistics,
};
use crate::stats::{BaseStats, StatCalculator};
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Identity of a session.
pub type ExecutionId = Uuid;

/// Inputs of one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    pub items: Vec<Item>,
    pub filter: FilterSpec,
    pub base: BaseStats,
    pub predict_reforges: bool,
}

/// Counters and buffer of a run in flight.
#[derive(Debug)]
struct ActiveRun {
    statistics: Statistics,
    buffer: CaptureBuffer,
}

#[derive(Debug)]
struct FinishedRun {
    summary: SearchSummary,
    results: CapturedResults,
}

#[derive(Debug, Default)]
enum RunState {
    #[default]
    Idle,
    Running(Arc<ActiveRun>),
    Finished(Arc<FinishedRun>),
}

#[derive(Debug, Default)]
struct Session {
    state: RwLock<RunState>,
    refinement: RwLock<Option<Arc<Refinement>>>,
}

impl Session {
    fn finished(&self) -> Option<Arc<FinishedRun>> {
        match &*self.state.read() {
            RunState::Finished(run) => Some(Arc::clone(run)),
            _ => None,
        }
    }
}

/// All live sessions.
pub struct SessionRegistry {
    sessions: DashMap<ExecutionId, Arc<Session>>,
    executor: SearchExecutor,
    calculator: Arc<dyn StatCalculator>,
    config: SearchConfig,
}

impl SessionRegistry {
    pub fn new(config: SearchConfig, calculator: Arc<dyn StatCalculator>) -> Result<Self> {
        let executor = SearchExecutor::new(&config, Interrupt::new())?;
        info!(
            "Session registry ready: {} workers, capacity {}, calculator {}",
            executor.workers(),
            config.max_results,
            calculator.name()
        );
        Ok(Self {
            sessions: DashMap::new(),
            executor,
            calculator,
            config,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    fn session(&self, id: &ExecutionId) -> Option<Arc<Session>> {
        self.sessions.get(id).map(|entry| Arc::clone(entry.value()))
    }

    fn require(&self, id: &ExecutionId) -> Result<Arc<Session>> {
        self.session(id)
            .ok_or_else(|| SearchError::UnknownSession(id.to_string()))
    }

    /// Create an empty session.
    pub fn prepare(&self) -> ExecutionId {
        let id = Uuid::new_v4();
        self.sessions.insert(id, Arc::new(Session::default()));
        info!("Prepared session {id}");
        id
    }

    /// Run a search in a session, blocking until it finishes.
    pub fn run(&self, id: &ExecutionId, request: &SearchRequest) -> Result<SearchSummary> {
        let session = self.require(id)?;
        self.executor.interrupt().clear();

        info!(
            "Session {id}: {} items, set format {:?}",
            request.items.len(),
            request.filter.set_format.mode
        );
        let filter = CompiledFilter::compile(&request.filter);
        let pools = SlotPools::partition(&request.items, &request.filter.set_format);
        debug!("Session {id}: pool sizes {:?}", pools.sizes());
        let ctx = SearchContext::new(
            pools,
            request.base,
            request.predict_reforges,
            Arc::clone(&self.calculator),
        );

        let run = Arc::new(ActiveRun {
            statistics: Statistics::new(),
            buffer: CaptureBuffer::with_capacity(self.config.max_results),
        });
        *session.state.write() = RunState::Running(Arc::clone(&run));
        *session.refinement.write() = None;

        let summary = self
            .executor
            .execute(&ctx, &filter, &run.statistics, &run.buffer);

        let mut state = session.state.write();
        if !matches!(&*state, RunState::Running(current) if Arc::ptr_eq(current, &run)) {
            // A newer run on the same session owns the state now.
            return Ok(summary);
        }
        // Readers only touch a running run under the lock, so once the state
        // lets go of it this handle is the last one.
        drop(std::mem::take(&mut *state));
        let results = match Arc::try_unwrap(run) {
            Ok(run) => run.buffer.into_results(),
            Err(run) => run.buffer.snapshot(),
        };
        *state = RunState::Finished(Arc::new(FinishedRun {
            summary: summary.clone(),
            results,
        }));
        Ok(summary)
    }

    /// Searched and accepted counts. Zeros for an unknown or idle session.
    pub fn progress(&self, id: &ExecutionId) -> ProgressSnapshot {
        let Some(session) = self.session(id) else {
            return ProgressSnapshot::default();
        };
        let state = session.state.read();
        match &*state {
            RunState::Idle => ProgressSnapshot::default(),
            RunState::Running(run) => ProgressSnapshot {
                searched: run.statistics.get(Counters::Searched),
                accepted: run.buffer.claimed(),
            },
            RunState::Finished(run) => ProgressSnapshot {
                searched: run.summary.searched,
                accepted: run.summary.accepted,
            },
        }
    }

    pub fn is_running(&self, id: &ExecutionId) -> bool {
        let Some(session) = self.session(id) else {
            return false;
        };
        let running = matches!(&*session.state.read(), RunState::Running(_));
        running
    }

    /// Drop a session and its results. Returns whether it existed.
    pub fn delete(&self, id: &ExecutionId) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            info!("Deleted session {id}");
        }
        removed
    }

    /// Raise the process-wide interrupt.
    pub fn interrupt(&self) {
        info!("Interrupt raised");
        self.executor.interrupt().raise();
    }

    /// Narrow a finished session's results. A session with no finished run
    /// narrows to nothing.
    pub fn refine(
        &self,
        id: &ExecutionId,
        spec: &FilterSpec,
        excluded: &HashSet<ItemId>,
    ) -> Result<usize> {
        let session = self.require(id)?;
        let refinement = match session.finished() {
            Some(run) => refine::refine(&run.results, spec, excluded),
            None => Refinement::default(),
        };
        let count = refinement.len();
        debug!("Session {id}: refined to {count} results");
        *session.refinement.write() = Some(Arc::new(refinement));
        Ok(count)
    }

    /// Summary of the last finished run.
    pub fn summary(&self, id: &ExecutionId) -> Option<SearchSummary> {
        self.session(id)?.finished().map(|run| run.summary.clone())
    }

    /// Number of captured results of the last finished run.
    pub fn result_count(&self, id: &ExecutionId) -> usize {
        self.session(id)
            .and_then(|session| session.finished())
            .map(|run| run.results.len())
            .unwrap_or(0)
    }

    /// One captured result by result id.
    pub fn result(&self, id: &ExecutionId, result_id: u64) -> Option<Candidate> {
        self.session(id)?.finished()?.results.get(result_id).cloned()
    }

    /// Number of rows in the narrowed view; all captured results if the
    /// session was never refined.
    pub fn row_count(&self, id: &ExecutionId) -> usize {
        let Some(session) = self.session(id) else {
            return 0;
        };
        let refinement = session.refinement.read().clone();
        match refinement {
            Some(refinement) => refinement.len(),
            None => session.finished().map(|run| run.results.len()).unwrap_or(0),
        }
    }

    /// A range of rows of the narrowed view.
    pub fn rows(&self, id: &ExecutionId, range: Range<usize>) -> Vec<Candidate> {
        let Some(session) = self.session(id) else {
            return Vec::new();
        };
        let Some(run) = session.finished() else {
            return Vec::new();
        };
        let refinement = session.refinement.read().clone();
        match refinement {
            Some(refinement) => {
                let end = range.end.min(refinement.len());
                let start = range.start.min(end);
                refinement.ids[start..end]
                    .iter()
                    .filter_map(|&result_id| run.results.get(result_id).cloned())
                    .collect()
            }
            None => run.results.rows(range).to_vec(),
        }
    }
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("sessions", &self.sessions.len())
            .field("executor", &self.executor)
            .field("calculator", &self.calculator.name())
            .finish()
    }
}
