// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Debounced query dispatch.
//!
//! Keystrokes arrive much faster than it is worth querying. Each input cancels
//! whatever timer was pending and starts a new one; only the timer that
//! survives the quiet window reaches the engine (trailing edge, last write
//! wins).
//!
//! Cancellation is belt and braces: the previous task is aborted, and every
//! timer also carries the generation it was scheduled under and does nothing
//! if a newer one has been scheduled since. The generation check alone is what
//! guarantees correctness on executors that cannot abort.

use crate::engine::EngineHandle;
use crate::error::OverlayError;
use crate::runtime::{Scheduler, TaskHandle};
use crate::types::ResultRecord;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// Result of one engine call, delivered to the session.
pub type QueryOutcome = Result<Vec<ResultRecord>, OverlayError>;

/// What `submit` decided for an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Nothing to query (blank input or engine not ready); results must be
    /// cleared immediately.
    Cleared,
    /// A timer is pending under this generation.
    Scheduled(u64),
}

pub struct QueryPipeline {
    scheduler: Rc<dyn Scheduler>,
    delay: Duration,
    scope: String,
    generation: Cell<u64>,
    pending: RefCell<Option<TaskHandle>>,
    executed: Cell<u64>,
}

impl QueryPipeline {
    pub fn new(scheduler: Rc<dyn Scheduler>, delay: Duration, scope: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            scheduler,
            delay,
            scope: scope.into(),
            generation: Cell::new(0),
            pending: RefCell::new(None),
            executed: Cell::new(0),
        })
    }

    /// Handle one input value.
    ///
    /// `engine` is `None` while the engine is not ready. When a query does run,
    /// `deliver` receives the engine's outcome; it is never called for a
    /// superseded timer.
    pub fn submit<F>(self: &Rc<Self>, raw: &str, engine: Option<EngineHandle>, deliver: F) -> Dispatch
    where
        F: FnOnce(QueryOutcome) + 'static,
    {
        self.cancel();

        let engine = match engine {
            Some(engine) if !raw.trim().is_empty() => engine,
            _ => return Dispatch::Cleared,
        };

        let generation = self.generation.get();
        let this = Rc::clone(self);
        let query = raw.to_string();
        let sleep = self.scheduler.sleep(self.delay);

        let task = self.scheduler.spawn(Box::pin(async move {
            sleep.await;
            if this.generation.get() != generation {
                tracing::debug!(query = %query, "debounced query superseded");
                return;
            }
            this.pending.borrow_mut().take();
            this.executed.set(this.executed.get() + 1);
            tracing::debug!(query = %query, scope = %this.scope, "running search");
            deliver(engine.search(&query, &this.scope));
        }));

        *self.pending.borrow_mut() = Some(task);
        Dispatch::Scheduled(generation)
    }

    /// Drop any pending timer without running it.
    pub fn cancel(&self) {
        self.generation.set(self.generation.get() + 1);
        if let Some(task) = self.pending.borrow_mut().take() {
            task.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }

    /// Number of queries that actually reached the engine.
    pub fn executed(&self) -> u64 {
        self.executed.get()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }
}
