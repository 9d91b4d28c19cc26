// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Core data types shared by every part of the overlay.
//!
//! Nothing in here does work. These are the values that cross the boundary
//! between the page glue (key events, focus targets) and the controller
//! (engine state, result records), so they stay small and `Copy` where they can.

use serde::{Deserialize, Serialize};

/// One match returned by the search engine.
///
/// Produced by the engine and never mutated afterwards. `snippet` may carry
/// highlight markup; `link` is a site-relative path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub title: String,
    pub snippet: String,
    pub link: String,
}

impl ResultRecord {
    pub fn new(title: impl Into<String>, snippet: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
            link: link.into(),
        }
    }
}

/// Lifecycle of the external search engine.
///
/// Moves forward only: `NotLoaded → Loading → Ready | Failed`. The one
/// exception is `Failed → Loading`, taken when the retry policy allows a new
/// attempt on the next open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineState {
    #[default]
    NotLoaded,
    Loading,
    Ready,
    Failed,
}

impl EngineState {
    pub fn is_ready(self) -> bool {
        self == EngineState::Ready
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EngineState::NotLoaded => "not-loaded",
            EngineState::Loading => "loading",
            EngineState::Ready => "ready",
            EngineState::Failed => "failed",
        }
    }
}

/// Visibility of the search modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open,
}

/// Keys the controller cares about. Everything else arrives as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Escape,
    ArrowUp,
    ArrowDown,
    Enter,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Key::Escape,
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowDown" | "Down" => Key::ArrowDown,
            "Enter" => Key::Enter,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Other,
                }
            }
        }
    }
}

/// Modifier keys held during a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        meta: false,
        alt: false,
        shift: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        meta: false,
        alt: false,
        shift: false,
    };

    pub const META: Modifiers = Modifiers {
        ctrl: false,
        meta: true,
        alt: false,
        shift: false,
    };
}

/// Where keyboard focus was when a key event fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTarget {
    #[default]
    Page,
    TextInput,
    TextArea,
    ContentEditable,
}

impl FocusTarget {
    /// True for controls where `/` is ordinary typing.
    pub fn is_text_editing(self) -> bool {
        !matches!(self, FocusTarget::Page)
    }
}

/// A key press as seen by the global listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
    pub target: FocusTarget,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
            target: FocusTarget::Page,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn from_target(mut self, target: FocusTarget) -> Self {
        self.target = target;
        self
    }
}

/// What the page glue should do with the native event after routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// Not ours; let the browser handle it.
    Ignored,
    /// Acted on, browser default still allowed.
    Handled,
    /// Acted on and the browser default must be suppressed.
    PreventDefault,
}

impl KeyDisposition {
    pub fn prevents_default(self) -> bool {
        self == KeyDisposition::PreventDefault
    }
}
