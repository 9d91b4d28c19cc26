// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The search session: modal lifecycle and the glue between the parts.
//!
//! One [`SearchSession`] lives for the whole page. It owns the modal state,
//! the current query and results, and the selection cursor, and it hands work
//! to the [`Bootstrapper`] and the [`QueryPipeline`]. Everything runs on one
//! local event loop, so state is a plain `RefCell` and nothing is locked.
//!
//! The page itself sits behind [`Surface`]: the session tells it what to show
//! and never reads anything back. Real DOM listeners stay in the page glue,
//! which calls `open`, `close`, `on_query_input` and `on_key`.
//!
//! ```text
//!   open() ──▶ Bootstrapper ──ready──▶ focus input
//!                                          │
//!   on_query_input() ──▶ QueryPipeline ──▶ engine.search ──▶ results ──▶ Surface::render
//!                                                               │
//!   on_key(ArrowUp/Down/Enter) ──▶ Selection ──────────────────┴──▶ Surface::select / navigate
//! ```

use crate::bootstrap::{BootstrapOutcome, Bootstrapper};
use crate::config::OverlayConfig;
use crate::contracts;
use crate::engine::{EngineHandle, EngineHost};
use crate::keymap::{self, Command};
use crate::query::{Dispatch, QueryOutcome, QueryPipeline};
use crate::render::{failure_message, Panel};
use crate::runtime::Scheduler;
use crate::selection::Selection;
use crate::types::{EngineState, KeyDisposition, KeyEvent, ModalState, ResultRecord};
use std::cell::RefCell;
use std::future::Future;
use std::rc::{Rc, Weak};

/// The page the session draws on.
pub trait Surface {
    fn show(&self);
    fn hide(&self);
    fn lock_scroll(&self);
    fn unlock_scroll(&self);
    fn focus_input(&self);
    fn clear_input(&self);
    /// Replace the results container contents.
    fn render(&self, panel: &Panel);
    /// Mark the item at `position` selected and scroll it into view.
    fn select(&self, position: usize);
    fn navigate(&self, href: &str);
}

/// Failure text covering the results panel.
#[derive(Debug, Clone)]
enum Notice {
    Bootstrap(String),
    Query(String),
}

#[derive(Debug, Default)]
struct SessionState {
    modal: ModalState,
    query: String,
    results: Vec<ResultRecord>,
    /// Set once a query has completed since the last clear.
    answered: bool,
    selection: Selection,
    notice: Option<Notice>,
    last_navigation: Option<String>,
}

impl SessionState {
    fn clear_results(&mut self) {
        self.results.clear();
        self.answered = false;
        self.selection.reset();
    }

    fn replace_results(&mut self, results: Vec<ResultRecord>) {
        self.results = results;
        self.answered = true;
        self.selection.reset();
        contracts::check_selection_reset(self.selection);
    }

    fn panel(&self, config: &OverlayConfig) -> Panel {
        if let Some(Notice::Bootstrap(text) | Notice::Query(text)) = &self.notice {
            Panel::Failure(text.clone())
        } else if !self.answered {
            Panel::Blank
        } else {
            Panel::from_results(&self.results, self.selection, config)
        }
    }
}

struct Inner<H: EngineHost + 'static> {
    config: Rc<OverlayConfig>,
    surface: Rc<dyn Surface>,
    scheduler: Rc<dyn Scheduler>,
    loader: Rc<Bootstrapper<H>>,
    pipeline: Rc<QueryPipeline>,
    state: RefCell<SessionState>,
}

pub struct SearchSession<H: EngineHost + 'static> {
    inner: Rc<Inner<H>>,
}

impl<H: EngineHost + 'static> Clone for SearchSession<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<H: EngineHost + 'static> SearchSession<H> {
    pub fn new(
        config: OverlayConfig,
        host: H,
        surface: Rc<dyn Surface>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        let config = Rc::new(config);
        let loader = Bootstrapper::new(Rc::new(host), Rc::clone(&scheduler), Rc::clone(&config));
        let pipeline = QueryPipeline::new(
            Rc::clone(&scheduler),
            config.debounce(),
            config.scope.clone(),
        );
        Self {
            inner: Rc::new(Inner {
                config,
                surface,
                scheduler,
                loader,
                pipeline,
                state: RefCell::new(SessionState::default()),
            }),
        }
    }

    fn weak(&self) -> Weak<Inner<H>> {
        Rc::downgrade(&self.inner)
    }

    fn upgrade(weak: &Weak<Inner<H>>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    // ========================================================================
    // MODAL LIFECYCLE
    // ========================================================================

    /// Show the modal and start (or join) the engine bootstrap.
    ///
    /// Returns immediately; focus moves into the input once the engine is ready.
    pub fn open(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.modal == ModalState::Open {
                return;
            }
            state.modal = ModalState::Open;
            state.selection.reset();
        }
        tracing::debug!("opening search modal");
        self.inner.surface.show();
        self.inner.surface.lock_scroll();

        let ready = self.inner.loader.ensure_ready();
        if self.inner.loader.state() != EngineState::Failed {
            self.drop_bootstrap_notice();
        }
        let weak = self.weak();
        // Detached: closing the modal does not cancel an in-flight bootstrap.
        drop(self.inner.scheduler.spawn(Box::pin(async move {
            let outcome = ready.await;
            if let Some(session) = Self::upgrade(&weak) {
                session.bootstrap_finished(outcome);
            }
        })));
    }

    /// Hide the modal and forget the query, results and selection.
    pub fn close(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.modal == ModalState::Closed {
                return;
            }
            state.modal = ModalState::Closed;
            state.query.clear();
            state.clear_results();
            state.notice = None;
            contracts::check_closed_session_clean(&state.query, state.results.len(), state.selection);
        }
        self.inner.pipeline.cancel();
        tracing::debug!("closing search modal");

        let surface = &self.inner.surface;
        surface.hide();
        surface.unlock_scroll();
        surface.clear_input();
        surface.render(&Panel::Blank);
    }

    /// Clicks on the dimmed area around the dialog close it.
    pub fn on_backdrop_click(&self) {
        self.close();
    }

    /// Join the engine bootstrap without touching the modal.
    ///
    /// The outcome still reaches the results panel: a failure is rendered
    /// there, and a success clears a failure left by an earlier attempt.
    pub fn ensure_engine_ready(&self) -> impl Future<Output = BootstrapOutcome> + 'static {
        let ready = self.inner.loader.ensure_ready();
        let weak = self.weak();
        async move {
            let outcome = ready.await;
            if let Some(session) = Self::upgrade(&weak) {
                session.record_bootstrap(&outcome);
            }
            outcome
        }
    }

    fn bootstrap_finished(&self, outcome: BootstrapOutcome) {
        if !self.record_bootstrap(&outcome) || !self.is_open() {
            return;
        }
        self.inner.surface.focus_input();
        // Input typed while the engine was loading was cleared, not queued.
        let pending_query = self.query();
        if !pending_query.trim().is_empty() {
            self.on_query_input(&pending_query);
        }
    }

    /// Reflect a bootstrap outcome in the results panel. True on success.
    fn record_bootstrap(&self, outcome: &BootstrapOutcome) -> bool {
        match outcome {
            Ok(_) => {
                self.drop_bootstrap_notice();
                true
            }
            Err(err) => {
                let panel = {
                    let mut state = self.inner.state.borrow_mut();
                    state.clear_results();
                    state.notice = Some(Notice::Bootstrap(failure_message(&err.to_string())));
                    state.panel(&self.inner.config)
                };
                self.inner.surface.render(&panel);
                false
            }
        }
    }

    /// Remove a bootstrap failure notice and redraw the panel it was covering.
    fn drop_bootstrap_notice(&self) {
        let panel = {
            let mut state = self.inner.state.borrow_mut();
            if !matches!(state.notice, Some(Notice::Bootstrap(_))) {
                return;
            }
            state.notice = None;
            state.panel(&self.inner.config)
        };
        self.inner.surface.render(&panel);
    }

    // ========================================================================
    // QUERY INPUT
    // ========================================================================

    /// Handle the current raw value of the query field.
    pub fn on_query_input(&self, raw: &str) {
        self.inner.state.borrow_mut().query = raw.to_string();

        let weak = self.weak();
        let dispatch = self
            .inner
            .pipeline
            .submit(raw, self.inner.loader.handle(), move |outcome| {
                if let Some(session) = Self::upgrade(&weak) {
                    session.query_finished(outcome);
                }
            });

        if dispatch == Dispatch::Cleared {
            let panel = {
                let mut state = self.inner.state.borrow_mut();
                state.clear_results();
                // A failed bootstrap keeps explaining why nothing can be searched.
                if matches!(state.notice, Some(Notice::Query(_))) {
                    state.notice = None;
                }
                state.panel(&self.inner.config)
            };
            self.inner.surface.render(&panel);
        }
    }

    fn query_finished(&self, outcome: QueryOutcome) {
        match outcome {
            Ok(results) => {
                let panel = {
                    let mut state = self.inner.state.borrow_mut();
                    if state.modal == ModalState::Closed {
                        return;
                    }
                    state.notice = None;
                    state.replace_results(results);
                    state.panel(&self.inner.config)
                };
                self.inner.surface.render(&panel);
            }
            Err(err) => {
                let query = self.query();
                tracing::error!(error = %err, query = %query, "search failed");
                if !self.inner.config.surface_query_errors {
                    return;
                }
                let panel = {
                    let mut state = self.inner.state.borrow_mut();
                    state.notice = Some(Notice::Query(err.to_string()));
                    state.panel(&self.inner.config)
                };
                self.inner.surface.render(&panel);
            }
        }
    }

    // ========================================================================
    // KEYBOARD AND SELECTION
    // ========================================================================

    /// Route a global key press. The return value says whether the page glue
    /// should suppress the browser default.
    pub fn on_key(&self, event: KeyEvent) -> KeyDisposition {
        let (modal, has_selection) = {
            let state = self.inner.state.borrow();
            (state.modal, state.selection.index().is_some())
        };
        let Some((command, disposition)) =
            keymap::resolve(&event, modal, self.inner.config.shortcut_letter, has_selection)
        else {
            return KeyDisposition::Ignored;
        };

        match command {
            Command::Open => self.open(),
            Command::Close => self.close(),
            Command::MoveDown => self.move_selection(Selection::move_down),
            Command::MoveUp => self.move_selection(Selection::move_up),
            Command::Activate => {
                self.activate_selected();
            }
        }
        disposition
    }

    fn move_selection(&self, step: fn(&mut Selection, usize) -> Option<usize>) {
        let moved = {
            let mut state = self.inner.state.borrow_mut();
            let len = state.results.len();
            let position = step(&mut state.selection, len);
            contracts::check_selection_in_bounds(state.selection, len);
            position
        };
        if let Some(position) = moved {
            self.inner.surface.select(position);
        }
    }

    /// Navigate to the selected result. Returns the target URL.
    pub fn activate_selected(&self) -> Option<String> {
        let href = {
            let state = self.inner.state.borrow();
            state
                .selection
                .current(&state.results)
                .map(|record| self.inner.config.link_url(&record.link))
        }?;
        self.navigate(href)
    }

    /// Navigate to the result at `position`, as a click on it would.
    pub fn activate(&self, position: usize) -> Option<String> {
        {
            let mut state = self.inner.state.borrow_mut();
            let len = state.results.len();
            if !state.selection.select(position, len) {
                return None;
            }
        }
        self.activate_selected()
    }

    fn navigate(&self, href: String) -> Option<String> {
        tracing::debug!(href = %href, "navigating to search result");
        self.inner.state.borrow_mut().last_navigation = Some(href.clone());
        self.inner.surface.navigate(&href);
        Some(href)
    }

    // ========================================================================
    // INSPECTION
    // ========================================================================

    pub fn modal_state(&self) -> ModalState {
        self.inner.state.borrow().modal
    }

    pub fn is_open(&self) -> bool {
        self.modal_state() == ModalState::Open
    }

    pub fn engine_state(&self) -> EngineState {
        self.inner.loader.state()
    }

    pub fn engine(&self) -> Option<EngineHandle> {
        self.inner.loader.handle()
    }

    pub fn query(&self) -> String {
        self.inner.state.borrow().query.clone()
    }

    pub fn results(&self) -> Vec<ResultRecord> {
        self.inner.state.borrow().results.clone()
    }

    pub fn selection(&self) -> Selection {
        self.inner.state.borrow().selection
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selection().index()
    }

    pub fn panel(&self) -> Panel {
        self.inner.state.borrow().panel(&self.inner.config)
    }

    pub fn last_navigation(&self) -> Option<String> {
        self.inner.state.borrow().last_navigation.clone()
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.inner.config
    }

    pub fn bootstrapper(&self) -> &Rc<Bootstrapper<H>> {
        &self.inner.loader
    }

    pub fn pipeline(&self) -> &Rc<QueryPipeline> {
        &self.inner.pipeline
    }
}
