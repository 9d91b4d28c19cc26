// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Overlay configuration.
//!
//! Set once before the session is created and never changed afterwards. Every
//! field has a default that matches a stock site build, so an empty JSON object
//! is a valid config.

use crate::error::ConfigError;
use crate::paths::join_path;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Default trailing-edge debounce window for query input.
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// Scope token forwarded to the engine with every query.
pub const DEFAULT_SCOPE: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct OverlayConfig {
    /// Prefix applied to every fetched resource and every result link.
    pub base_url: String,
    /// Script that provides the engine's runtime (e.g. Go's `wasm_exec.js`).
    pub runtime_bridge_path: String,
    /// Engine binary module.
    pub engine_path: String,
    /// Prebuilt search index artifact handed to `initSearch`.
    pub index_path: String,
    pub scope: String,
    pub debounce_ms: u64,
    /// No timeout when absent.
    pub bootstrap_timeout_ms: Option<u64>,
    /// Start a fresh bootstrap on the next open after a failure.
    pub retry_failed_bootstrap: bool,
    /// Render query errors in the results panel instead of only logging them.
    pub surface_query_errors: bool,
    /// Letter for the Ctrl/Cmd shortcut that opens the modal.
    pub shortcut_letter: char,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            runtime_bridge_path: "/static/js/wasm_exec.js".to_string(),
            engine_path: "/static/wasm/search.wasm".to_string(),
            index_path: "/search.bin".to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            bootstrap_timeout_ms: None,
            retry_failed_bootstrap: true,
            surface_query_errors: false,
            shortcut_letter: 'k',
        }
    }
}

impl OverlayConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: OverlayConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.debounce_ms == 0 {
            return Err(ConfigError::Invalid("debounceMs must be greater than zero".into()));
        }
        if self.scope.trim().is_empty() {
            return Err(ConfigError::Invalid("scope must not be empty".into()));
        }
        if !self.shortcut_letter.is_ascii_alphabetic() {
            return Err(ConfigError::Invalid(format!(
                "shortcutLetter must be an ASCII letter, got {:?}",
                self.shortcut_letter
            )));
        }
        for (name, value) in [
            ("runtimeBridgePath", &self.runtime_bridge_path),
            ("enginePath", &self.engine_path),
            ("indexPath", &self.index_path),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{name} must not be empty")));
            }
        }
        if self.bootstrap_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "bootstrapTimeoutMs must be greater than zero when set".into(),
            ));
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn bootstrap_timeout(&self) -> Option<Duration> {
        self.bootstrap_timeout_ms.map(Duration::from_millis)
    }

    pub fn runtime_bridge_url(&self) -> String {
        join_path(&self.base_url, &self.runtime_bridge_path)
    }

    pub fn engine_url(&self) -> String {
        join_path(&self.base_url, &self.engine_path)
    }

    pub fn index_url(&self) -> String {
        join_path(&self.base_url, &self.index_path)
    }

    /// Resolve a result link against the base URL.
    pub fn link_url(&self, link: &str) -> String {
        join_path(&self.base_url, link)
    }
}
