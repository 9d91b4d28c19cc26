// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The engine contract.
//!
//! The search engine itself is somebody else's binary. All the controller needs
//! from it is two entry points: `initSearch(indexPath)` to load the index and
//! `searchPosts(query, scope)` to run a query. [`EngineHost`] describes how to
//! get to the point where those exist; [`SearchEngine`] is the query side,
//! wrapped in an [`EngineHandle`] once bootstrap succeeds so nothing downstream
//! reaches for ambient globals.

use crate::error::OverlayError;
use crate::types::ResultRecord;
use std::fmt;
use std::rc::Rc;

/// Synchronous query entry point of a ready engine.
pub trait SearchEngine {
    /// Run `query` within `scope`. Order of the returned records is the
    /// engine's ranking and must be preserved.
    fn search(&self, query: &str, scope: &str) -> Result<Vec<ResultRecord>, String>;
}

/// Capability obtained from a successful bootstrap.
#[derive(Clone)]
pub struct EngineHandle {
    engine: Rc<dyn SearchEngine>,
    doc_count: u64,
}

impl EngineHandle {
    pub fn new(engine: Rc<dyn SearchEngine>, doc_count: u64) -> Self {
        Self { engine, doc_count }
    }

    /// Documents reported by `initSearch`.
    pub fn doc_count(&self) -> u64 {
        self.doc_count
    }

    pub fn search(&self, query: &str, scope: &str) -> Result<Vec<ResultRecord>, OverlayError> {
        self.engine.search(query, scope).map_err(OverlayError::Query)
    }
}

impl fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineHandle")
            .field("doc_count", &self.doc_count)
            .finish_non_exhaustive()
    }
}

/// The environment the engine is bootstrapped in.
///
/// Each method is one step of the bootstrap sequence. Errors are plain strings
/// because they come from foreign code; the loader wraps them with the step
/// and URL they belong to.
#[allow(async_fn_in_trait)]
pub trait EngineHost {
    /// Whether the runtime the engine binary needs is already defined.
    fn has_runtime_bridge(&self) -> bool;

    /// Load the runtime bridge script from `url`.
    async fn load_runtime_bridge(&self, url: &str) -> Result<(), String>;

    /// Retrieve the engine binary module.
    async fn fetch_module(&self, url: &str) -> Result<Vec<u8>, String>;

    /// Instantiate and start the module. After this the entry points should exist.
    async fn start_module(&self, module: Vec<u8>) -> Result<(), String>;

    /// Whether a named global entry point (`initSearch`, `searchPosts`) exists.
    fn has_entry_point(&self, name: &str) -> bool;

    /// Call `initSearch(indexUrl)`; resolves with the indexed document count.
    async fn init_search(&self, index_url: &str) -> Result<u64, String>;

    /// The query side of the started engine.
    fn engine(&self) -> Rc<dyn SearchEngine>;
}

/// Name of the index initialization entry point.
pub const INIT_ENTRY_POINT: &str = "initSearch";

/// Name of the query entry point.
pub const SEARCH_ENTRY_POINT: &str = "searchPosts";
