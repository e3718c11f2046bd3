// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Error types for the search engine.

use thiserror::Error;

/// Errors raised while configuring or running a search.
///
/// Reaching the result cap and cancellation are not errors; they are reported
/// on [`SearchSummary`](crate::engine::SearchSummary).
#[derive(Debug, Error)]
pub enum SearchError {
    /// The set-format mode is not one of 0..=5.
    #[error("invalid set format {0}")]
    InvalidSetFormat(u8),

    /// No live session has this execution id.
    #[error("unknown session {0}")]
    UnknownSession(String),

    /// An item could not be turned into a contribution vector.
    #[error("item {id} is malformed: {reason}")]
    MalformedItem { id: String, reason: String },

    /// One weapon partition failed. Sibling partitions are unaffected.
    #[error("partition for weapon {weapon} failed: {message}")]
    WorkerFault { weapon: usize, message: String },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl SearchError {
    /// Whether the caller should treat this as an empty result rather than a
    /// failure.
    pub fn is_benign(&self) -> bool {
        matches!(self, SearchError::UnknownSession(_))
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
