// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Lazy, single-flight engine bootstrap.
//!
//! The engine is heavy (a WASM binary plus an index) so nothing is fetched
//! until the user first opens the search modal. From then on there is exactly
//! one bootstrap attempt in flight at any time: every caller that asks for the
//! engine while it is loading awaits the same `OnceCell`, and gets the same
//! outcome, success or failure.
//!
//! The sequence, in order:
//!
//! 1. make sure the runtime bridge is present, loading it once if not
//! 2. fetch the engine binary
//! 3. instantiate and start it
//! 4. call `initSearch(indexUrl)` and keep the document count
//!
//! Any failure marks the engine `Failed`. Whether a later call starts over is
//! the `retry_failed_bootstrap` policy; a failure is never retried while
//! someone is still waiting on it.

use crate::config::OverlayConfig;
use crate::engine::{EngineHandle, EngineHost, INIT_ENTRY_POINT, SEARCH_ENTRY_POINT};
use crate::error::OverlayError;
use crate::runtime::{with_timeout, Elapsed, Scheduler};
use crate::types::EngineState;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;
use tokio::sync::OnceCell;

/// Outcome shared by every caller of one bootstrap attempt.
pub type BootstrapOutcome = Result<EngineHandle, OverlayError>;

pub struct Bootstrapper<H: EngineHost + 'static> {
    host: Rc<H>,
    scheduler: Rc<dyn Scheduler>,
    config: Rc<OverlayConfig>,
    state: Cell<EngineState>,
    task: RefCell<Option<Rc<OnceCell<BootstrapOutcome>>>>,
    /// Set once the bridge script loaded; failed loads leave it empty.
    bridge: OnceCell<()>,
    attempts: Cell<u32>,
}

impl<H: EngineHost + 'static> Bootstrapper<H> {
    pub fn new(host: Rc<H>, scheduler: Rc<dyn Scheduler>, config: Rc<OverlayConfig>) -> Rc<Self> {
        Rc::new(Self {
            host,
            scheduler,
            config,
            state: Cell::new(EngineState::NotLoaded),
            task: RefCell::new(None),
            bridge: OnceCell::new(),
            attempts: Cell::new(0),
        })
    }

    pub fn state(&self) -> EngineState {
        self.state.get()
    }

    /// Number of bootstrap attempts started so far.
    pub fn attempts(&self) -> u32 {
        self.attempts.get()
    }

    pub fn host(&self) -> &Rc<H> {
        &self.host
    }

    /// The engine handle, once bootstrap has succeeded.
    pub fn handle(&self) -> Option<EngineHandle> {
        let task = self.task.borrow();
        task.as_ref()
            .and_then(|cell| cell.get())
            .and_then(|outcome| outcome.as_ref().ok())
            .cloned()
    }

    /// The cached failure of the current attempt, if it failed.
    pub fn failure(&self) -> Option<OverlayError> {
        let task = self.task.borrow();
        task.as_ref()
            .and_then(|cell| cell.get())
            .and_then(|outcome| outcome.as_ref().err())
            .cloned()
    }

    /// Get the engine, starting the bootstrap if needed.
    ///
    /// The state transition to `Loading` happens synchronously in this call;
    /// the returned future performs (or joins) the actual work.
    pub fn ensure_ready(self: &Rc<Self>) -> impl Future<Output = BootstrapOutcome> + 'static {
        let cell = self.current_task();
        let this = Rc::clone(self);
        async move { cell.get_or_init(move || this.run()).await.clone() }
    }

    /// Load the runtime bridge unless it is already defined.
    ///
    /// Concurrent callers share one load. A load that succeeds but leaves the
    /// runtime undefined is reported as [`OverlayError::BridgeMissing`].
    pub async fn ensure_runtime_bridge(&self) -> Result<(), OverlayError> {
        if self.host.has_runtime_bridge() {
            return Ok(());
        }

        let url = self.config.runtime_bridge_url();
        let host = &self.host;
        let url_ref = &url;
        self.bridge
            .get_or_try_init(move || async move {
                tracing::debug!(url = %url_ref, "loading runtime bridge");
                host.load_runtime_bridge(url_ref)
                    .await
                    .map_err(|reason| OverlayError::RuntimeBridge {
                        url: url_ref.clone(),
                        reason,
                    })
            })
            .await?;

        if !self.host.has_runtime_bridge() {
            return Err(OverlayError::BridgeMissing);
        }
        Ok(())
    }

    /// Pick the cell callers should await, creating a fresh attempt when there
    /// is none yet or the last one failed and retries are allowed.
    fn current_task(&self) -> Rc<OnceCell<BootstrapOutcome>> {
        let mut slot = self.task.borrow_mut();
        if self.state.get() == EngineState::Failed && self.config.retry_failed_bootstrap {
            tracing::info!("retrying search bootstrap after earlier failure");
            *slot = None;
        }
        let cell = slot.get_or_insert_with(|| {
            self.state.set(EngineState::Loading);
            self.attempts.set(self.attempts.get() + 1);
            Rc::new(OnceCell::new())
        });
        Rc::clone(cell)
    }

    async fn run(self: Rc<Self>) -> BootstrapOutcome {
        tracing::info!(attempt = self.attempts.get(), "initializing search engine");

        let limit = self.config.bootstrap_timeout();
        let outcome = match with_timeout(self.scheduler.as_ref(), limit, self.steps()).await {
            Ok(outcome) => outcome,
            Err(Elapsed(limit)) => Err(OverlayError::Timeout(limit)),
        };

        match &outcome {
            Ok(handle) => {
                self.state.set(EngineState::Ready);
                tracing::info!(docs = handle.doc_count(), "search engine ready");
            }
            Err(err) => {
                self.state.set(EngineState::Failed);
                tracing::error!(error = %err, "search initialization failed");
            }
        }
        outcome
    }

    async fn steps(&self) -> BootstrapOutcome {
        self.ensure_runtime_bridge().await?;

        let engine_url = self.config.engine_url();
        tracing::debug!(url = %engine_url, "fetching search module");
        let module = self
            .host
            .fetch_module(&engine_url)
            .await
            .map_err(|reason| OverlayError::ModuleFetch {
                url: engine_url.clone(),
                reason,
            })?;

        tracing::debug!(bytes = module.len(), "starting search module");
        self.host
            .start_module(module)
            .await
            .map_err(OverlayError::ModuleStart)?;

        for name in [INIT_ENTRY_POINT, SEARCH_ENTRY_POINT] {
            if !self.host.has_entry_point(name) {
                return Err(OverlayError::EntryPointMissing(name));
            }
        }

        let index_url = self.config.index_url();
        tracing::debug!(url = %index_url, "initializing search index");
        let doc_count = self
            .host
            .init_search(&index_url)
            .await
            .map_err(|reason| OverlayError::Init {
                url: index_url.clone(),
                reason,
            })?;

        Ok(EngineHandle::new(self.host.engine(), doc_count))
    }
}
