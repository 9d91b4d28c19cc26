// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! `sitefind check`: are the three overlay resources present in a built site?
//!
//! The overlay only discovers a missing engine when a visitor opens it, which
//! is too late. This runs against the build output instead and reports each
//! resource's raw size and what it costs over the wire with brotli.

use crate::config::OverlayConfig;
use std::io::Write;
use std::path::{Path, PathBuf};

/// WebAssembly module magic, `\0asm`.
const WASM_MAGIC: &[u8; 4] = b"\0asm";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceCheck {
    pub label: &'static str,
    /// URL the overlay will request.
    pub url: String,
    /// Where that URL lives inside the site directory.
    pub path: PathBuf,
    pub size: Option<u64>,
    pub compressed: Option<u64>,
    pub problem: Option<String>,
}

impl ResourceCheck {
    pub fn is_ok(&self) -> bool {
        self.problem.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub site_dir: PathBuf,
    pub resources: Vec<ResourceCheck>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.resources.iter().all(ResourceCheck::is_ok)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ResourceCheck> {
        self.resources.iter().filter(|r| !r.is_ok())
    }
}

/// Inspect the runtime bridge, engine binary and index under `site_dir`.
///
/// Resource paths are looked up relative to the site root; the base URL is a
/// deployment prefix and does not exist on disk.
pub fn check_site(site_dir: &Path, config: &OverlayConfig) -> Result<CheckReport, String> {
    if !site_dir.is_dir() {
        return Err(format!("{} is not a directory", site_dir.display()));
    }

    let resources = [
        ("runtime bridge", config.runtime_bridge_url(), &config.runtime_bridge_path),
        ("engine", config.engine_url(), &config.engine_path),
        ("index", config.index_url(), &config.index_path),
    ]
    .into_iter()
    .map(|(label, url, path)| check_resource(site_dir, label, url, path))
    .collect();

    Ok(CheckReport {
        site_dir: site_dir.to_path_buf(),
        resources,
    })
}

fn check_resource(site_dir: &Path, label: &'static str, url: String, path: &str) -> ResourceCheck {
    let path = site_dir.join(path.trim_start_matches('/'));
    let mut check = ResourceCheck {
        label,
        url,
        path,
        size: None,
        compressed: None,
        problem: None,
    };

    let bytes = match std::fs::read(&check.path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(path = %check.path.display(), error = %e, "resource unreadable");
            check.problem = Some(format!("missing: {}", e));
            return check;
        }
    };

    check.size = Some(bytes.len() as u64);
    if bytes.is_empty() {
        check.problem = Some("file is empty".to_string());
        return check;
    }
    if label == "engine" && !bytes.starts_with(WASM_MAGIC) {
        check.problem = Some("not a WebAssembly module".to_string());
    }
    match compressed_len(&bytes) {
        Ok(len) => check.compressed = Some(len),
        Err(e) => check.problem = Some(format!("brotli failed: {}", e)),
    }
    check
}

fn compressed_len(data: &[u8]) -> std::io::Result<u64> {
    let mut compressed = Vec::new();
    {
        let mut encoder = brotli::CompressorWriter::new(&mut compressed, 4096, 11, 22);
        encoder.write_all(data)?;
        encoder.flush()?;
    }
    Ok(compressed.len() as u64)
}
