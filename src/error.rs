// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for the overlay.
//!
//! Bootstrap failures come in two flavors: load errors (the runtime bridge or
//! the engine binary never came up) and init errors (the engine started but
//! rejected the index). Query errors happen after the engine is ready and are
//! always recovered locally. All variants are `Clone` because one failed
//! bootstrap outcome is handed to every caller that was waiting on it.

use std::time::Duration;
use thiserror::Error;

/// Coarse classification used for surfacing and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Load,
    Init,
    Query,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlayError {
    #[error("failed to load runtime bridge from {url}: {reason}")]
    RuntimeBridge { url: String, reason: String },

    #[error("runtime bridge loaded but its runtime is still undefined")]
    BridgeMissing,

    #[error("failed to fetch search module from {url}: {reason}")]
    ModuleFetch { url: String, reason: String },

    #[error("failed to start search module: {0}")]
    ModuleStart(String),

    #[error("`{0}` is not available after the search module started")]
    EntryPointMissing(&'static str),

    #[error("failed to initialize search index from {url}: {reason}")]
    Init { url: String, reason: String },

    #[error("search bootstrap timed out after {0:?}")]
    Timeout(Duration),

    #[error("search failed: {0}")]
    Query(String),
}

impl OverlayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OverlayError::RuntimeBridge { .. }
            | OverlayError::BridgeMissing
            | OverlayError::ModuleFetch { .. }
            | OverlayError::ModuleStart(_)
            | OverlayError::EntryPointMissing(_)
            | OverlayError::Timeout(_) => ErrorKind::Load,
            OverlayError::Init { .. } => ErrorKind::Init,
            OverlayError::Query(_) => ErrorKind::Query,
        }
    }

    /// Bootstrap failures end the bootstrap attempt they came from.
    pub fn is_bootstrap_failure(&self) -> bool {
        self.kind() != ErrorKind::Query
    }
}

/// Errors raised while reading an [`OverlayConfig`](crate::config::OverlayConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
