// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Search overlay controller for static sites.
//!
//! A static site ships a search engine as a WASM binary plus a prebuilt index.
//! Both are heavy, so nothing is fetched until the reader first opens the
//! search modal. This crate is the controller that sits between that modal
//! and the engine: it bootstraps the engine exactly once, debounces keystrokes
//! into queries, keeps a keyboard-driven selection cursor over the results,
//! and tells the page what to draw.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   open()   ┌──────────────┐  ensure_ready  ┌──────────────┐
//! │   Surface    │◀──────────│ SearchSession │──────────────▶│ Bootstrapper │
//! │ (page / DOM) │  render()  │  (session.rs) │◀──EngineHandle─│(bootstrap.rs)│
//! └──────────────┘            └──────────────┘                └──────────────┘
//!                               │         │                          │
//!                    on_query_input    on_key                   EngineHost
//!                               ▼         ▼                    (bridge, fetch,
//!                     ┌──────────────┐ ┌──────────────┐         start, init)
//!                     │QueryPipeline │ │ keymap +     │
//!                     │  (query.rs)  │ │ Selection    │
//!                     └──────────────┘ └──────────────┘
//!                               │
//!                               ▼
//!                     EngineHandle::search ──▶ render::Panel
//! ```
//!
//! Everything runs on one cooperative event loop. The [`runtime::Scheduler`]
//! trait is the only thing that knows which one: tokio's `LocalSet` natively,
//! the browser's microtask queue under the `wasm` feature.
//!
//! # Usage
//!
//! ```ignore
//! use sitefind::{OverlayConfig, SearchSession};
//! use sitefind::runtime::TokioScheduler;
//!
//! let session = SearchSession::new(OverlayConfig::default(), host, surface, Rc::new(TokioScheduler));
//! session.open();                 // starts the engine bootstrap
//! session.on_query_input("rust"); // runs after the debounce window
//! ```

pub mod bootstrap;
pub mod config;
pub mod contracts;
pub mod engine;
pub mod error;
pub mod keymap;
pub mod paths;
pub mod query;
pub mod render;
pub mod runtime;
pub mod selection;
pub mod session;
pub mod types;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;
#[cfg(not(target_arch = "wasm32"))]
pub mod harness;
#[cfg(not(target_arch = "wasm32"))]
pub mod logging;
#[cfg(not(target_arch = "wasm32"))]
pub mod testing;

// Re-exports for public API
pub use bootstrap::{BootstrapOutcome, Bootstrapper};
pub use config::OverlayConfig;
pub use engine::{EngineHandle, EngineHost, SearchEngine};
pub use error::{ConfigError, ErrorKind, OverlayError};
pub use query::{Dispatch, QueryPipeline};
pub use render::{Panel, ResultItem};
pub use selection::Selection;
pub use session::{SearchSession, Surface};
pub use types::{
    EngineState, FocusTarget, Key, KeyDisposition, KeyEvent, ModalState, Modifiers, ResultRecord,
};
