// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the sitefind command-line interface.
//!
//! Three subcommands: `urls` prints what the overlay will fetch, `check`
//! verifies those resources exist in a built site, and `replay` runs a
//! scripted session against fixture results. The browser is the real home of
//! the controller; these exist so a site build can be checked and the session
//! logic exercised without one.

pub mod check;
pub mod display;
pub mod replay;

use crate::config::OverlayConfig;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sitefind",
    about = "Search overlay controller for static sites",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all logging
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Options shared by every subcommand that needs an overlay config.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// JSON overlay config (camelCase keys, all optional)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Base URL prefix; overrides the config file
    #[arg(long, env = "SITEFIND_BASE_URL")]
    pub base_url: Option<String>,
}

impl ConfigArgs {
    pub fn load(&self) -> Result<OverlayConfig, String> {
        let mut config = match &self.config {
            Some(path) => OverlayConfig::from_file(path).map_err(|e| e.to_string())?,
            None => OverlayConfig::default(),
        };
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the resolved URLs of the runtime bridge, engine and index
    Urls {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Verify a built site contains everything the overlay loads
    Check {
        /// Root of the built site (where the index and static/ live)
        site_dir: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Run a scripted session against fixture search results
    Replay {
        /// JSON object mapping queries to arrays of {title, snippet, link}
        #[arg(short, long)]
        fixtures: PathBuf,

        /// Comma-separated steps: open, close, type:<text>, down, up, enter,
        /// esc, shortcut, click:<n>, backdrop, wait:<ms> (`\,` for a literal comma)
        #[arg(short, long)]
        script: String,

        /// Simulated latency of each bootstrap step in milliseconds
        #[arg(long, default_value = "0")]
        latency_ms: u64,

        /// Make index initialization fail with this reason
        #[arg(long)]
        fail_bootstrap: Option<String>,

        #[command(flatten)]
        config: ConfigArgs,
    },
}
