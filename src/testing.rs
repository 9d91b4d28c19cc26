// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled on native targets but hidden from
//! documentation. It provides the canonical fixtures so tests do not each
//! invent their own result sets and wiring.

#![doc(hidden)]

use crate::config::OverlayConfig;
use crate::harness::{FixtureEngine, FixtureHost, HostOptions, RecordingSurface};
use crate::runtime::TokioScheduler;
use crate::session::SearchSession;
use crate::types::ResultRecord;
use std::rc::Rc;

/// Create `n` records with predictable titles and links.
///
/// This is the canonical implementation used across all tests.
pub fn sample_records(n: usize) -> Vec<ResultRecord> {
    (0..n)
        .map(|i| {
            ResultRecord::new(
                format!("Post {}", i),
                format!("Snippet for <mark>post</mark> {}", i),
                format!("/posts/{}/", i),
            )
        })
        .collect()
}

/// The fixture table most session tests run against.
///
/// `rust` has three hits, `go` has one, `nothing` has none.
pub fn sample_engine() -> Rc<FixtureEngine> {
    let engine = Rc::new(FixtureEngine::new());
    engine.insert(
        "rust",
        vec![
            ResultRecord::new("Ownership in Rust", "the <mark>rust</mark> borrow checker", "/posts/ownership/"),
            ResultRecord::new("Async Rust", "futures and <mark>rust</mark> executors", "/posts/async/"),
            ResultRecord::new("Rust on WASM", "shipping <mark>rust</mark> to the browser", "/posts/wasm/"),
        ],
    );
    engine.insert("go", vec![ResultRecord::new("Go channels", "", "/posts/go/")]);
    engine.insert("nothing", Vec::new());
    engine
}

/// Everything a session test needs to poke at.
pub struct TestSession {
    pub session: SearchSession<FixtureHost>,
    pub surface: Rc<RecordingSurface>,
    pub engine: Rc<FixtureEngine>,
}

impl TestSession {
    pub fn host(&self) -> &FixtureHost {
        self.session.bootstrapper().host()
    }
}

/// Wire a session to the sample engine, a recording surface and tokio.
///
/// Must be called inside a `LocalSet`.
pub fn test_session(config: OverlayConfig, options: HostOptions) -> TestSession {
    let engine = sample_engine();
    let surface = RecordingSurface::new();
    let host = FixtureHost::with_engine(Rc::clone(&engine), options);
    let session = SearchSession::new(config, host, surface.clone(), Rc::new(TokioScheduler));
    TestSession {
        session,
        surface,
        engine,
    }
}
