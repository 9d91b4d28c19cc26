// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Runtime contracts for session invariants.
//!
//! Debug-mode assertions, compiled out of release builds. The session calls
//! these after every state change, so a broken transition fails at the point
//! it happens instead of as an out-of-range index three key presses later.
//!
//! | Contract                       | Invariant                                       |
//! |--------------------------------|-------------------------------------------------|
//! | `check_selection_in_bounds`    | `-1 <= selected < len(results)`                 |
//! | `check_selection_reset`        | selection is `-1` right after results change    |
//! | `check_closed_session_clean`   | closed modal has no query, results or selection |

use crate::selection::Selection;

/// The cursor never points past the result list.
#[inline]
pub fn check_selection_in_bounds(selection: Selection, len: usize) {
    debug_assert!(
        selection.in_bounds(len),
        "selection {} out of bounds for {} results",
        selection.as_signed(),
        len
    );
}

/// Replacing the result list resets the cursor.
#[inline]
pub fn check_selection_reset(selection: Selection) {
    debug_assert!(
        selection.index().is_none(),
        "selection must reset when results are replaced, found {}",
        selection.as_signed()
    );
}

/// A closed modal holds no query state.
#[inline]
pub fn check_closed_session_clean(query: &str, results_len: usize, selection: Selection) {
    debug_assert!(query.is_empty(), "closed session still holds query {:?}", query);
    debug_assert_eq!(results_len, 0, "closed session still holds results");
    debug_assert!(selection.index().is_none(), "closed session still holds a selection");
}
