// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! In-memory stand-ins for the page and the engine.
//!
//! The overlay is normally driven by a browser, which makes it awkward to
//! exercise end to end. This module provides everything needed to run a real
//! [`SearchSession`](crate::session::SearchSession) on a tokio `LocalSet`
//! instead: an engine that answers from fixtures, a host that "boots" it with
//! configurable latency and failures, and a surface that records what the
//! session asked the page to do. The `sitefind replay` command and the test
//! suite both build on it.

use crate::engine::{EngineHost, SearchEngine, INIT_ENTRY_POINT, SEARCH_ENTRY_POINT};
use crate::render::Panel;
use crate::session::Surface;
use crate::types::ResultRecord;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

// ============================================================================
// FIXTURE ENGINE
// ============================================================================

/// Engine that answers from a query → records table.
///
/// Lookups use the trimmed, lowercased query. Unknown queries return no
/// results. Every call is recorded.
#[derive(Debug, Default)]
pub struct FixtureEngine {
    answers: RefCell<HashMap<String, Vec<ResultRecord>>>,
    failures: RefCell<HashMap<String, String>>,
    queries: RefCell<Vec<(String, String)>>,
}

impl FixtureEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON object mapping queries to arrays of `{title, snippet, link}`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let table: HashMap<String, Vec<ResultRecord>> = serde_json::from_str(json)?;
        let engine = Self::new();
        for (query, records) in table {
            engine.insert(&query, records);
        }
        Ok(engine)
    }

    pub fn insert(&self, query: &str, records: Vec<ResultRecord>) {
        self.answers.borrow_mut().insert(normalize(query), records);
    }

    /// Make `query` throw `reason`.
    pub fn fail_on(&self, query: &str, reason: &str) {
        self.failures
            .borrow_mut()
            .insert(normalize(query), reason.to_string());
    }

    /// `(query, scope)` pairs in call order.
    pub fn queries(&self) -> Vec<(String, String)> {
        self.queries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.answers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.borrow().is_empty()
    }
}

impl SearchEngine for FixtureEngine {
    fn search(&self, query: &str, scope: &str) -> Result<Vec<ResultRecord>, String> {
        self.queries
            .borrow_mut()
            .push((query.to_string(), scope.to_string()));
        let key = normalize(query);
        if let Some(reason) = self.failures.borrow().get(&key) {
            return Err(reason.clone());
        }
        Ok(self.answers.borrow().get(&key).cloned().unwrap_or_default())
    }
}

fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

// ============================================================================
// FIXTURE HOST
// ============================================================================

/// Knobs for [`FixtureHost`].
#[derive(Debug, Clone)]
pub struct HostOptions {
    /// Delay applied to each async bootstrap step.
    pub latency: Duration,
    /// The runtime bridge is defined before anything is loaded.
    pub bridge_preloaded: bool,
    /// Loading the bridge defines the runtime.
    pub bridge_defines_runtime: bool,
    /// Starting the module defines `initSearch` and `searchPosts`.
    pub exposes_entry_points: bool,
    pub doc_count: u64,
    pub fail_bridge: Option<String>,
    pub fail_fetch: Option<String>,
    pub fail_start: Option<String>,
    pub fail_init: Option<String>,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            latency: Duration::ZERO,
            bridge_preloaded: false,
            bridge_defines_runtime: true,
            exposes_entry_points: true,
            doc_count: 42,
            fail_bridge: None,
            fail_fetch: None,
            fail_start: None,
            fail_init: None,
        }
    }
}

/// Host whose bootstrap steps succeed or fail on command.
pub struct FixtureHost {
    engine: Rc<FixtureEngine>,
    options: RefCell<HostOptions>,
    bridge_defined: Cell<bool>,
    started: Cell<bool>,
    calls: RefCell<Vec<String>>,
}

impl FixtureHost {
    pub fn new(options: HostOptions) -> Self {
        Self::with_engine(Rc::new(FixtureEngine::new()), options)
    }

    pub fn with_engine(engine: Rc<FixtureEngine>, options: HostOptions) -> Self {
        Self {
            engine,
            bridge_defined: Cell::new(options.bridge_preloaded),
            options: RefCell::new(options),
            started: Cell::new(false),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn fixture(&self) -> &Rc<FixtureEngine> {
        &self.engine
    }

    /// Every step invoked so far, with its URL where it has one.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Calls whose step name starts with `step`.
    pub fn count(&self, step: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(step))
            .count()
    }

    /// Let every later step succeed.
    pub fn clear_failures(&self) {
        let mut options = self.options.borrow_mut();
        options.fail_bridge = None;
        options.fail_fetch = None;
        options.fail_start = None;
        options.fail_init = None;
    }

    async fn step(&self, call: String, failure: Option<String>) -> Result<(), String> {
        self.calls.borrow_mut().push(call);
        let latency = self.options.borrow().latency;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        match failure {
            Some(reason) => Err(reason),
            None => Ok(()),
        }
    }
}

impl EngineHost for FixtureHost {
    fn has_runtime_bridge(&self) -> bool {
        self.bridge_defined.get()
    }

    async fn load_runtime_bridge(&self, url: &str) -> Result<(), String> {
        let failure = self.options.borrow().fail_bridge.clone();
        self.step(format!("load_runtime_bridge {url}"), failure).await?;
        if self.options.borrow().bridge_defines_runtime {
            self.bridge_defined.set(true);
        }
        Ok(())
    }

    async fn fetch_module(&self, url: &str) -> Result<Vec<u8>, String> {
        let failure = self.options.borrow().fail_fetch.clone();
        self.step(format!("fetch_module {url}"), failure).await?;
        Ok(b"\0asm\x01\0\0\0".to_vec())
    }

    async fn start_module(&self, module: Vec<u8>) -> Result<(), String> {
        let failure = self.options.borrow().fail_start.clone();
        self.step("start_module".to_string(), failure).await?;
        if !module.starts_with(b"\0asm") {
            return Err("not a WebAssembly module".to_string());
        }
        self.started.set(true);
        Ok(())
    }

    fn has_entry_point(&self, name: &str) -> bool {
        self.started.get()
            && self.options.borrow().exposes_entry_points
            && (name == INIT_ENTRY_POINT || name == SEARCH_ENTRY_POINT)
    }

    async fn init_search(&self, index_url: &str) -> Result<u64, String> {
        let failure = self.options.borrow().fail_init.clone();
        self.step(format!("init_search {index_url}"), failure).await?;
        Ok(self.options.borrow().doc_count)
    }

    fn engine(&self) -> Rc<dyn SearchEngine> {
        self.engine.clone()
    }
}

// ============================================================================
// RECORDING SURFACE
// ============================================================================

/// One instruction the session gave the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Shown,
    Hidden,
    ScrollLocked,
    ScrollUnlocked,
    InputFocused,
    InputCleared,
    Rendered(Panel),
    Selected(usize),
    Navigated(String),
}

impl fmt::Display for SurfaceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceEvent::Shown => write!(f, "modal shown"),
            SurfaceEvent::Hidden => write!(f, "modal hidden"),
            SurfaceEvent::ScrollLocked => write!(f, "page scroll locked"),
            SurfaceEvent::ScrollUnlocked => write!(f, "page scroll unlocked"),
            SurfaceEvent::InputFocused => write!(f, "input focused"),
            SurfaceEvent::InputCleared => write!(f, "input cleared"),
            SurfaceEvent::Rendered(Panel::Blank) => write!(f, "panel cleared"),
            SurfaceEvent::Rendered(Panel::NoResults) => write!(f, "panel: no results"),
            SurfaceEvent::Rendered(Panel::Failure(msg)) => write!(f, "panel: {msg}"),
            SurfaceEvent::Rendered(Panel::Items(items)) => write!(f, "panel: {} results", items.len()),
            SurfaceEvent::Selected(i) => write!(f, "selected #{i}"),
            SurfaceEvent::Navigated(href) => write!(f, "navigate → {href}"),
        }
    }
}

/// Surface that remembers every call and tracks what a page would show.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    events: RefCell<Vec<SurfaceEvent>>,
    visible: Cell<bool>,
    scroll_locked: Cell<bool>,
    focused: Cell<bool>,
    panel: RefCell<Panel>,
    selected: Cell<Option<usize>>,
}

impl RecordingSurface {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events.borrow().clone()
    }

    /// Events since the last call.
    pub fn take_events(&self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked.get()
    }

    pub fn is_input_focused(&self) -> bool {
        self.focused.get()
    }

    pub fn panel(&self) -> Panel {
        self.panel.borrow().clone()
    }

    /// Highlighted row, cleared whenever the panel is re-rendered.
    pub fn selected(&self) -> Option<usize> {
        self.selected.get()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Navigated(href) => Some(href.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: SurfaceEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl Surface for RecordingSurface {
    fn show(&self) {
        self.visible.set(true);
        self.record(SurfaceEvent::Shown);
    }

    fn hide(&self) {
        self.visible.set(false);
        self.focused.set(false);
        self.record(SurfaceEvent::Hidden);
    }

    fn lock_scroll(&self) {
        self.scroll_locked.set(true);
        self.record(SurfaceEvent::ScrollLocked);
    }

    fn unlock_scroll(&self) {
        self.scroll_locked.set(false);
        self.record(SurfaceEvent::ScrollUnlocked);
    }

    fn focus_input(&self) {
        self.focused.set(true);
        self.record(SurfaceEvent::InputFocused);
    }

    fn clear_input(&self) {
        self.record(SurfaceEvent::InputCleared);
    }

    fn render(&self, panel: &Panel) {
        *self.panel.borrow_mut() = panel.clone();
        self.selected.set(None);
        self.record(SurfaceEvent::Rendered(panel.clone()));
    }

    fn select(&self, position: usize) {
        self.selected.set(Some(position));
        self.record(SurfaceEvent::Selected(position));
    }

    fn navigate(&self, href: &str) {
        self.record(SurfaceEvent::Navigated(href.to_string()));
    }
}
