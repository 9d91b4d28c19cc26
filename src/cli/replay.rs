// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! `sitefind replay`: drive a real session from a script.
//!
//! A script is a comma-separated list of steps:
//!
//! ```text
//! open, wait:10, type:rust, wait:150, down, down, up, enter, esc
//! ```
//!
//! A comma inside a step is written `\,` (and a backslash `\\`).
//!
//! Each step is applied to a [`SearchSession`] wired to the fixture engine
//! and a recording surface, and the surface events it caused are collected.
//! Time is real tokio time, so `wait` steps are what let debounce windows and
//! bootstrap latency elapse.

use crate::config::OverlayConfig;
use crate::harness::{FixtureEngine, FixtureHost, HostOptions, RecordingSurface, SurfaceEvent};
use crate::runtime::TokioScheduler;
use crate::session::SearchSession;
use crate::types::{EngineState, Key, KeyDisposition, KeyEvent, Modifiers};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Open,
    Close,
    /// Replace the query field contents.
    Type(String),
    Down,
    Up,
    Enter,
    Escape,
    /// Ctrl+K on the page.
    Shortcut,
    Click(usize),
    Backdrop,
    Wait(Duration),
}

impl Step {
    pub fn parse(token: &str) -> Result<Step, String> {
        let token = token.trim();
        let (name, arg) = match token.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (token, None),
        };
        let step = match (name, arg) {
            ("open", None) => Step::Open,
            ("close", None) => Step::Close,
            ("type", Some(text)) => Step::Type(text.to_string()),
            ("type", None) => Step::Type(String::new()),
            ("down", None) => Step::Down,
            ("up", None) => Step::Up,
            ("enter", None) => Step::Enter,
            ("esc", None) => Step::Escape,
            ("shortcut", None) => Step::Shortcut,
            ("backdrop", None) => Step::Backdrop,
            ("click", Some(n)) => Step::Click(
                n.parse()
                    .map_err(|_| format!("click needs a result position, got {:?}", n))?,
            ),
            ("wait", Some(ms)) => Step::Wait(Duration::from_millis(
                ms.parse()
                    .map_err(|_| format!("wait needs milliseconds, got {:?}", ms))?,
            )),
            _ => return Err(format!("unknown step {:?}", token)),
        };
        Ok(step)
    }

    /// Parse a comma-separated script. Empty entries are skipped.
    ///
    /// `\,` is a literal comma and `\\` a literal backslash, so `type:a\,b`
    /// types `a,b`.
    pub fn parse_script(script: &str) -> Result<Vec<Step>, String> {
        split_steps(script)?
            .iter()
            .filter(|t| !t.trim().is_empty())
            .map(|t| Step::parse(t))
            .collect()
    }
}

fn split_steps(script: &str) -> Result<Vec<String>, String> {
    let mut tokens = vec![String::new()];
    let mut chars = script.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped @ (',' | '\\')) => push_char(&mut tokens, escaped),
                Some(other) => return Err(format!("unknown escape \\{} in script", other)),
                None => return Err("script ends with a dangling backslash".to_string()),
            },
            ',' => tokens.push(String::new()),
            c => push_char(&mut tokens, c),
        }
    }
    Ok(tokens)
}

fn push_char(tokens: &mut [String], c: char) {
    if let Some(last) = tokens.last_mut() {
        last.push(c);
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Open => write!(f, "open"),
            Step::Close => write!(f, "close"),
            Step::Type(text) => write!(f, "type {:?}", text),
            Step::Down => write!(f, "↓"),
            Step::Up => write!(f, "↑"),
            Step::Enter => write!(f, "enter"),
            Step::Escape => write!(f, "esc"),
            Step::Shortcut => write!(f, "ctrl+k"),
            Step::Click(n) => write!(f, "click #{}", n),
            Step::Backdrop => write!(f, "backdrop click"),
            Step::Wait(d) => write!(f, "wait {}ms", d.as_millis()),
        }
    }
}

/// Knobs for the simulated host.
#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    pub latency: Duration,
    /// Make `initSearch` fail with this reason.
    pub fail_bootstrap: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StepTrace {
    pub step: Step,
    pub disposition: Option<KeyDisposition>,
    pub events: Vec<SurfaceEvent>,
}

#[derive(Debug, Clone)]
pub struct ReplayReport {
    pub steps: Vec<StepTrace>,
    pub engine_state: EngineState,
    pub doc_count: Option<u64>,
    pub open: bool,
    pub query: String,
    pub result_count: usize,
    pub selected: Option<usize>,
    pub navigations: Vec<String>,
}

/// Run `steps` on a fresh session. Must be called inside a `LocalSet`.
pub async fn replay(
    config: OverlayConfig,
    engine: Rc<FixtureEngine>,
    steps: &[Step],
    options: ReplayOptions,
) -> ReplayReport {
    let surface = RecordingSurface::new();
    let host = FixtureHost::with_engine(
        engine,
        HostOptions {
            latency: options.latency,
            fail_init: options.fail_bootstrap,
            ..HostOptions::default()
        },
    );
    let session = SearchSession::new(config, host, surface.clone(), Rc::new(TokioScheduler));

    let mut traces = Vec::with_capacity(steps.len());
    for step in steps {
        let disposition = apply(&session, step).await;
        traces.push(StepTrace {
            step: step.clone(),
            disposition,
            events: surface.take_events(),
        });
    }

    ReplayReport {
        steps: traces,
        engine_state: session.engine_state(),
        doc_count: session.engine().map(|e| e.doc_count()),
        open: session.is_open(),
        query: session.query(),
        result_count: session.results().len(),
        selected: session.selected_index(),
        navigations: surface.navigations(),
    }
}

async fn apply(session: &SearchSession<FixtureHost>, step: &Step) -> Option<KeyDisposition> {
    let key = |k| Some(session.on_key(KeyEvent::new(k)));
    match step {
        Step::Open => {
            session.open();
            None
        }
        Step::Close => {
            session.close();
            None
        }
        Step::Type(text) => {
            session.on_query_input(text);
            None
        }
        Step::Down => key(Key::ArrowDown),
        Step::Up => key(Key::ArrowUp),
        Step::Enter => key(Key::Enter),
        Step::Escape => key(Key::Escape),
        Step::Shortcut => {
            let letter = session.config().shortcut_letter;
            Some(session.on_key(KeyEvent::new(Key::Char(letter)).with_modifiers(Modifiers::CTRL)))
        }
        Step::Click(n) => {
            session.activate(*n);
            None
        }
        Step::Backdrop => {
            session.on_backdrop_click();
            None
        }
        Step::Wait(duration) => {
            tokio::time::sleep(*duration).await;
            None
        }
    }
}
