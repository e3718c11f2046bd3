// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Search configuration.
//!
//! Settings come from an optional file (any format the `config` crate
//! understands) layered under `GEAR_SEARCH_*` environment variables. Keys
//! missing from both fall back to the defaults below.

use crate::error::Result;
use crate::gear::constants::{DEFAULT_MAX_RESULTS, MAX_WORKERS};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment prefix, e.g. `GEAR_SEARCH_MAX_RESULTS=1000`.
pub const ENV_PREFIX: &str = "GEAR_SEARCH";

/// Roughly 1.6 years: long enough to never fire in practice, but finite.
const DEFAULT_AWAIT_TIMEOUT_SECS: u64 = 50_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Capacity of the result capture buffer.
    pub max_results: usize,
    /// Worker threads; 0 means available parallelism.
    pub worker_threads: usize,
    /// How long the orchestrator waits before cancelling a run.
    pub await_timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            worker_threads: 0,
            await_timeout_secs: DEFAULT_AWAIT_TIMEOUT_SECS,
        }
    }
}

impl SearchConfig {
    /// Load configuration from an optional file plus the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Effective worker count, clamped to `1..=MAX_WORKERS`.
    pub fn workers(&self) -> usize {
        let requested = if self.worker_threads == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        } else {
            self.worker_threads
        };
        requested.clamp(1, MAX_WORKERS)
    }

    pub fn await_timeout(&self) -> Duration {
        Duration::from_secs(self.await_timeout_secs)
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_worker_threads(mut self, worker_threads: usize) -> Self {
        self.worker_threads = worker_threads;
        self
    }
}
