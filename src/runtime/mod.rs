// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Event loop bindings.
//!
//! The controller runs on a single-threaded cooperative loop, but which loop
//! depends on where it is compiled. Natively it is a tokio current-thread
//! runtime with a `LocalSet`; in the browser it is the page's own microtask
//! queue plus `setTimeout`. The [`Scheduler`] trait is the only thing the core
//! knows about either: spawn a local task, sleep for a while.

#[cfg(feature = "wasm")]
pub mod wasm;

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

/// A `!Send` task for the local event loop.
pub type LocalTask = Pin<Box<dyn Future<Output = ()>>>;

/// A timer future produced by [`Scheduler::sleep`].
pub type SleepFuture = Pin<Box<dyn Future<Output = ()>>>;

pub trait Scheduler {
    /// Run `task` on the local event loop without blocking the caller.
    fn spawn(&self, task: LocalTask) -> TaskHandle;

    /// Resolve after `duration` has elapsed.
    fn sleep(&self, duration: Duration) -> SleepFuture;
}

/// Handle to a spawned task.
///
/// Dropping the handle detaches the task. `abort` stops it where the executor
/// supports cancellation and is a no-op elsewhere, so callers that need
/// last-write-wins must not rely on abort alone.
pub struct TaskHandle {
    abort: Option<Box<dyn FnOnce()>>,
}

impl TaskHandle {
    pub fn detached() -> Self {
        Self { abort: None }
    }

    pub fn from_abort(abort: impl FnOnce() + 'static) -> Self {
        Self {
            abort: Some(Box::new(abort)),
        }
    }

    pub fn abort(mut self) {
        if let Some(abort) = self.abort.take() {
            abort();
        }
    }
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("abortable", &self.abort.is_some())
            .finish()
    }
}

/// Scheduler backed by `tokio::task::spawn_local` and `tokio::time`.
///
/// Must be used from inside a `tokio::task::LocalSet`.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

#[cfg(not(target_arch = "wasm32"))]
impl Scheduler for TokioScheduler {
    fn spawn(&self, task: LocalTask) -> TaskHandle {
        let handle = tokio::task::spawn_local(task);
        TaskHandle::from_abort(move || handle.abort())
    }

    fn sleep(&self, duration: Duration) -> SleepFuture {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Returned by [`with_timeout`] when the deadline passes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed(pub Duration);

/// Race `work` against a timer from `scheduler`.
///
/// With `limit = None` the work runs unbounded.
pub async fn with_timeout<F>(
    scheduler: &dyn Scheduler,
    limit: Option<Duration>,
    work: F,
) -> Result<F::Output, Elapsed>
where
    F: Future,
{
    match limit {
        None => Ok(work.await),
        Some(limit) => {
            Race {
                work: Box::pin(work),
                timer: scheduler.sleep(limit),
                limit,
            }
            .await
        }
    }
}

struct Race<F: Future> {
    work: Pin<Box<F>>,
    timer: SleepFuture,
    limit: Duration,
}

impl<F: Future> Future for Race<F> {
    type Output = Result<F::Output, Elapsed>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        // Work first: a result that is ready at the deadline still wins.
        if let Poll::Ready(value) = this.work.as_mut().poll(cx) {
            return Poll::Ready(Ok(value));
        }
        match this.timer.as_mut().poll(cx) {
            Poll::Ready(()) => Poll::Ready(Err(Elapsed(this.limit))),
            Poll::Pending => Poll::Pending,
        }
    }
}
