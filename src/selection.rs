// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Keyboard cursor over the current result list.
//!
//! The cursor is either on nothing or on a valid position of the list it was
//! last moved against. It never outlives that list: whoever replaces the
//! results resets it.

use crate::types::ResultRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    index: Option<usize>,
}

impl Selection {
    pub const NONE: Selection = Selection { index: None };

    pub fn index(self) -> Option<usize> {
        self.index
    }

    /// Signed view with `-1` for "no selection".
    pub fn as_signed(self) -> isize {
        self.index.map_or(-1, |i| i as isize)
    }

    pub fn reset(&mut self) {
        self.index = None;
    }

    /// Move towards the end, stopping on the last item. Inert on an empty list.
    pub fn move_down(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return self.index;
        }
        let next = match self.index {
            None => 0,
            Some(i) => (i + 1).min(len - 1),
        };
        self.index = Some(next);
        self.index
    }

    /// Move towards the start, stopping on the first item.
    ///
    /// From "no selection" this lands on the first item. Inert on an empty list.
    pub fn move_up(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return self.index;
        }
        let next = match self.index {
            None | Some(0) => 0,
            Some(i) => (i - 1).min(len - 1),
        };
        self.index = Some(next);
        self.index
    }

    /// Point at `position` if it exists in a list of `len` items.
    pub fn select(&mut self, position: usize, len: usize) -> bool {
        if position < len {
            self.index = Some(position);
            true
        } else {
            false
        }
    }

    /// The record `Enter` would activate.
    pub fn current<'a>(self, results: &'a [ResultRecord]) -> Option<&'a ResultRecord> {
        self.index.and_then(|i| results.get(i))
    }

    pub fn in_bounds(self, len: usize) -> bool {
        !matches!(self.index, Some(i) if i >= len)
    }
}
