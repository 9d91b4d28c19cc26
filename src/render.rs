// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Maps engine output to what the results panel shows.
//!
//! Rendering is a pure function of the session state. Every render replaces
//! the panel wholesale; there is no diffing, the lists are short.

use crate::config::OverlayConfig;
use crate::selection::Selection;
use crate::types::ResultRecord;

/// CSS class of one activatable result element.
pub const ITEM_CLASS: &str = "search-result-item";
pub const TITLE_CLASS: &str = "search-result-title";
pub const SNIPPET_CLASS: &str = "search-result-snippet";
pub const SELECTED_CLASS: &str = "selected";

pub const NO_RESULTS_MESSAGE: &str = "No results found.";

/// One display element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultItem {
    pub position: usize,
    pub title: String,
    /// Engine markup, emitted verbatim.
    pub snippet: String,
    /// Link resolved against the base URL.
    pub href: String,
    pub selected: bool,
}

/// Everything the results container can show.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Panel {
    /// No query yet, or the query was cleared.
    #[default]
    Blank,
    /// A query completed with no matches.
    NoResults,
    Items(Vec<ResultItem>),
    /// Bootstrap (or, when configured, query) failure text.
    Failure(String),
}

impl Panel {
    /// Build the panel for a completed query.
    pub fn from_results(results: &[ResultRecord], selection: Selection, config: &OverlayConfig) -> Self {
        if results.is_empty() {
            return Panel::NoResults;
        }
        let selected = selection.index();
        Panel::Items(
            results
                .iter()
                .enumerate()
                .map(|(position, record)| ResultItem {
                    position,
                    title: record.title.clone(),
                    snippet: record.snippet.clone(),
                    href: config.link_url(&record.link),
                    selected: selected == Some(position),
                })
                .collect(),
        )
    }

    pub fn items(&self) -> &[ResultItem] {
        match self {
            Panel::Items(items) => items,
            _ => &[],
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Panel::Blank)
    }

    /// Markup for the results container.
    pub fn to_html(&self) -> String {
        match self {
            Panel::Blank => String::new(),
            Panel::NoResults => format!(
                r#"<div class="search-empty" style="padding: 2rem; text-align: center; color: var(--text-muted);">{}</div>"#,
                NO_RESULTS_MESSAGE
            ),
            Panel::Failure(message) => format!(
                r#"<div class="search-error" style="padding: 2rem; color: #f85149;">{}</div>"#,
                html_escape(message)
            ),
            Panel::Items(items) => {
                let mut html = String::with_capacity(items.len() * 256);
                for item in items {
                    let class = if item.selected {
                        format!("{ITEM_CLASS} {SELECTED_CLASS}")
                    } else {
                        ITEM_CLASS.to_string()
                    };
                    html.push_str(&format!(
                        r#"<a href="{href}" class="{class}" data-position="{pos}"><div class="{TITLE_CLASS}">{title}</div><div class="{SNIPPET_CLASS}">{snippet}</div></a>"#,
                        href = html_escape(&item.href),
                        class = class,
                        pos = item.position,
                        title = html_escape(&item.title),
                        snippet = item.snippet,
                    ));
                }
                html
            }
        }
    }
}

/// Message shown when the engine could not be brought up.
pub fn failure_message(reason: &str) -> String {
    format!("Search initialization failed: {reason}")
}

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
