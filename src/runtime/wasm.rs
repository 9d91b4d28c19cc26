// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! WebAssembly bindings for the search overlay.
//!
//! This is the browser-facing API. The page keeps its own DOM listeners and
//! forwards them here; the controller answers by calling back into two plain
//! JS objects, one that knows how to load things and one that knows how to
//! draw.
//!
//! ```js
//! const overlay = new SearchOverlay(
//!     {
//!         loadScript: (url) => new Promise((ok, err) => { /* <script src=url> */ }),
//!         fetchModule: (url) => fetch(url).then((r) => r.arrayBuffer()),
//!         startModule: (bytes) => { const go = new Go(); /* instantiate + go.run */ },
//!     },
//!     {
//!         show, hide, lockScroll, unlockScroll, focusInput, clearInput,
//!         renderHtml: (html) => { results.innerHTML = html; },
//!         select: (i) => { /* toggle .selected, scrollIntoView */ },
//!         navigate: (href) => { window.location.href = href; },
//!     },
//!     { baseUrl: "/blog" },
//! );
//!
//! trigger.addEventListener("click", () => overlay.open());
//! input.addEventListener("input", (e) => overlay.onQueryInput(e.target.value));
//! document.addEventListener("keydown", (e) => {
//!     if (overlay.onKey(e.key, e.ctrlKey, e.metaKey, isEditable(e.target))) e.preventDefault();
//! });
//! ```
//!
//! The engine itself is reached through the globals its runtime defines:
//! `Go` (the bridge), `initSearch(indexUrl)` and `searchPosts(query, scope)`.

use super::{LocalTask, Scheduler, SleepFuture, TaskHandle};
use crate::config::OverlayConfig;
use crate::engine::{EngineHost, SearchEngine, INIT_ENTRY_POINT, SEARCH_ENTRY_POINT};
use crate::render::Panel;
use crate::session::{SearchSession, Surface};
use crate::types::{FocusTarget, Key, KeyEvent, Modifiers, ResultRecord};
use js_sys::{Array, Function, Promise, Reflect, Uint8Array};
use serde_wasm_bindgen::from_value;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

/// Global the runtime bridge defines once loaded.
const BRIDGE_GLOBAL: &str = "Go";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = setTimeout)]
    fn set_timeout(handler: &Function, timeout: i32) -> JsValue;
}

// ============================================================================
// JS INTEROP HELPERS
// ============================================================================

/// Best-effort message for a thrown JS value.
fn describe(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

fn property(target: &JsValue, name: &str) -> Result<JsValue, JsValue> {
    Reflect::get(target, &JsValue::from_str(name))
}

fn global(name: &str) -> JsValue {
    property(&js_sys::global(), name).unwrap_or(JsValue::UNDEFINED)
}

/// Call `target[name](...args)` with `target` as `this`.
fn call_method(target: &JsValue, name: &str, args: &[JsValue]) -> Result<JsValue, JsValue> {
    let method: Function = property(target, name)?
        .dyn_into()
        .map_err(|_| JsValue::from_str(&format!("{} is not a function", name)))?;
    match args {
        [] => method.call0(target),
        [a] => method.call1(target, a),
        [a, b] => method.call2(target, a, b),
        _ => method.apply(target, &args.iter().collect::<Array>()),
    }
}

/// Call a method that may return a promise and wait for it to settle.
async fn call_async(target: &JsValue, name: &str, args: &[JsValue]) -> Result<JsValue, String> {
    let value = call_method(target, name, args).map_err(|e| describe(&e))?;
    JsFuture::from(Promise::resolve(&value))
        .await
        .map_err(|e| describe(&e))
}

// ============================================================================
// SCHEDULER
// ============================================================================

/// Microtask queue plus `setTimeout`.
///
/// Spawned tasks cannot be aborted; the query pipeline's generation check
/// makes superseded timers harmless.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn spawn(&self, task: LocalTask) -> TaskHandle {
        wasm_bindgen_futures::spawn_local(task);
        TaskHandle::detached()
    }

    fn sleep(&self, duration: Duration) -> SleepFuture {
        let ms = duration.as_millis().min(i32::MAX as u128) as i32;
        let promise = Promise::new(&mut |resolve, _reject| {
            set_timeout(&resolve, ms);
        });
        Box::pin(async move {
            let _ = JsFuture::from(promise).await;
        })
    }
}

// ============================================================================
// HOST
// ============================================================================

/// Bootstrap steps backed by a JS host object and the page globals.
pub struct BrowserHost {
    host: JsValue,
}

impl BrowserHost {
    pub fn new(host: JsValue) -> Self {
        Self { host }
    }
}

impl EngineHost for BrowserHost {
    fn has_runtime_bridge(&self) -> bool {
        !global(BRIDGE_GLOBAL).is_undefined()
    }

    async fn load_runtime_bridge(&self, url: &str) -> Result<(), String> {
        call_async(&self.host, "loadScript", &[JsValue::from_str(url)]).await?;
        Ok(())
    }

    async fn fetch_module(&self, url: &str) -> Result<Vec<u8>, String> {
        let body = call_async(&self.host, "fetchModule", &[JsValue::from_str(url)]).await?;
        if !(body.is_instance_of::<js_sys::ArrayBuffer>() || body.is_instance_of::<Uint8Array>()) {
            return Err("fetchModule must resolve to an ArrayBuffer or Uint8Array".to_string());
        }
        Ok(Uint8Array::new(&body).to_vec())
    }

    async fn start_module(&self, module: Vec<u8>) -> Result<(), String> {
        let bytes = Uint8Array::from(module.as_slice());
        call_async(&self.host, "startModule", &[bytes.into()]).await?;
        Ok(())
    }

    fn has_entry_point(&self, name: &str) -> bool {
        global(name).is_function()
    }

    async fn init_search(&self, index_url: &str) -> Result<u64, String> {
        let count = call_async(&js_sys::global(), INIT_ENTRY_POINT, &[JsValue::from_str(index_url)]).await?;
        count
            .as_f64()
            .filter(|n| n.is_finite() && *n >= 0.0)
            .map(|n| n as u64)
            .ok_or_else(|| format!("{} returned {} instead of a document count", INIT_ENTRY_POINT, describe(&count)))
    }

    fn engine(&self) -> Rc<dyn SearchEngine> {
        Rc::new(GlobalEngine)
    }
}

/// `globalThis.searchPosts`, called synchronously.
struct GlobalEngine;

impl SearchEngine for GlobalEngine {
    fn search(&self, query: &str, scope: &str) -> Result<Vec<ResultRecord>, String> {
        let raw = call_method(
            &js_sys::global(),
            SEARCH_ENTRY_POINT,
            &[JsValue::from_str(query), JsValue::from_str(scope)],
        )
        .map_err(|e| describe(&e))?;
        if raw.is_null() || raw.is_undefined() {
            return Ok(Vec::new());
        }
        from_value(raw).map_err(|e| format!("unexpected {} result: {}", SEARCH_ENTRY_POINT, e))
    }
}

// ============================================================================
// SURFACE
// ============================================================================

/// Surface backed by a JS object with one method per instruction.
pub struct JsSurface {
    target: JsValue,
}

impl JsSurface {
    pub fn new(target: JsValue) -> Self {
        Self { target }
    }

    fn call(&self, name: &str, args: &[JsValue]) {
        if let Err(e) = call_method(&self.target, name, args) {
            tracing::warn!(method = name, error = %describe(&e), "surface call failed");
        }
    }
}

impl Surface for JsSurface {
    fn show(&self) {
        self.call("show", &[]);
    }

    fn hide(&self) {
        self.call("hide", &[]);
    }

    fn lock_scroll(&self) {
        self.call("lockScroll", &[]);
    }

    fn unlock_scroll(&self) {
        self.call("unlockScroll", &[]);
    }

    fn focus_input(&self) {
        self.call("focusInput", &[]);
    }

    fn clear_input(&self) {
        self.call("clearInput", &[]);
    }

    fn render(&self, panel: &Panel) {
        self.call("renderHtml", &[JsValue::from_str(&panel.to_html())]);
    }

    fn select(&self, position: usize) {
        self.call("select", &[JsValue::from(position as u32)]);
    }

    fn navigate(&self, href: &str) {
        self.call("navigate", &[JsValue::from_str(href)]);
    }
}

// ============================================================================
// EXPORTED OVERLAY
// ============================================================================

/// One search overlay for the page.
#[wasm_bindgen]
pub struct SearchOverlay {
    session: SearchSession<BrowserHost>,
}

#[wasm_bindgen]
impl SearchOverlay {
    /// `config` may be `undefined` for the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(host: JsValue, surface: JsValue, config: JsValue) -> Result<SearchOverlay, JsValue> {
        let config: OverlayConfig = if config.is_undefined() || config.is_null() {
            OverlayConfig::default()
        } else {
            from_value(config).map_err(|e| JsValue::from_str(&format!("invalid config: {}", e)))?
        };
        config
            .validate()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(SearchOverlay {
            session: SearchSession::new(
                config,
                BrowserHost::new(host),
                Rc::new(JsSurface::new(surface)),
                Rc::new(BrowserScheduler),
            ),
        })
    }

    pub fn open(&self) {
        self.session.open();
    }

    pub fn close(&self) {
        self.session.close();
    }

    #[wasm_bindgen(js_name = onBackdropClick)]
    pub fn on_backdrop_click(&self) {
        self.session.on_backdrop_click();
    }

    #[wasm_bindgen(js_name = onQueryInput)]
    pub fn on_query_input(&self, value: &str) {
        self.session.on_query_input(value);
    }

    /// Route a `keydown`. Returns true when the caller must `preventDefault()`.
    #[wasm_bindgen(js_name = onKey)]
    pub fn on_key(&self, key: &str, ctrl: bool, meta: bool, target_editable: bool) -> bool {
        let event = KeyEvent::new(Key::from_dom(key))
            .with_modifiers(Modifiers {
                ctrl,
                meta,
                ..Modifiers::NONE
            })
            .from_target(if target_editable {
                FocusTarget::TextInput
            } else {
                FocusTarget::Page
            });
        self.session.on_key(event).prevents_default()
    }

    /// Navigate to the result at `position`, as a click would.
    pub fn activate(&self, position: usize) -> Option<String> {
        self.session.activate(position)
    }

    /// Resolves with the document count once the engine is up.
    #[wasm_bindgen(js_name = ensureReady)]
    pub fn ensure_ready(&self) -> Promise {
        let ready = self.session.ensure_engine_ready();
        wasm_bindgen_futures::future_to_promise(async move {
            match ready.await {
                Ok(handle) => Ok(JsValue::from_f64(handle.doc_count() as f64)),
                Err(e) => Err(JsValue::from_str(&e.to_string())),
            }
        })
    }

    #[wasm_bindgen(getter, js_name = engineState)]
    pub fn engine_state(&self) -> String {
        self.session.engine_state().as_str().to_string()
    }

    #[wasm_bindgen(getter, js_name = isOpen)]
    pub fn is_open(&self) -> bool {
        self.session.is_open()
    }

    /// -1 when nothing is selected.
    #[wasm_bindgen(getter, js_name = selectedIndex)]
    pub fn selected_index(&self) -> i32 {
        self.session.selection().as_signed() as i32
    }

    #[wasm_bindgen(getter, js_name = resultCount)]
    pub fn result_count(&self) -> usize {
        self.session.results().len()
    }
}
