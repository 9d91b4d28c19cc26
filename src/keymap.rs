// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Global key bindings.
//!
//! While the modal is closed only the open shortcuts matter, and only when the
//! user is not typing into some other field. While it is open, navigation keys
//! belong to the modal and their browser defaults are suppressed.

use crate::types::{Key, KeyDisposition, KeyEvent, ModalState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Open,
    Close,
    MoveDown,
    MoveUp,
    Activate,
}

/// Resolve a key event to a command and what to do with the native event.
///
/// `has_selection` gates `Enter`: with nothing selected the key passes through.
pub fn resolve(
    event: &KeyEvent,
    modal: ModalState,
    shortcut_letter: char,
    has_selection: bool,
) -> Option<(Command, KeyDisposition)> {
    match modal {
        ModalState::Closed => {
            if is_open_shortcut(event, shortcut_letter) && !event.target.is_text_editing() {
                Some((Command::Open, KeyDisposition::PreventDefault))
            } else {
                None
            }
        }
        ModalState::Open => match event.key {
            Key::Escape => Some((Command::Close, KeyDisposition::Handled)),
            Key::ArrowDown => Some((Command::MoveDown, KeyDisposition::PreventDefault)),
            Key::ArrowUp => Some((Command::MoveUp, KeyDisposition::PreventDefault)),
            Key::Enter if has_selection => Some((Command::Activate, KeyDisposition::PreventDefault)),
            _ => None,
        },
    }
}

/// `/` on its own, or Ctrl/Cmd plus the shortcut letter.
fn is_open_shortcut(event: &KeyEvent, letter: char) -> bool {
    let m = event.modifiers;
    match event.key {
        Key::Char('/') => !m.ctrl && !m.meta && !m.alt,
        Key::Char(c) => (m.ctrl || m.meta) && !m.alt && c.eq_ignore_ascii_case(&letter),
        _ => false,
    }
}
