// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Log setup for the native binary.
//!
//! The library only emits `tracing` events; whoever embeds it decides where
//! they go. The CLI sends them to stderr so stdout stays clean for reports.
//! `RUST_LOG` wins over the `-v` count when set.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter directive for a `-v` count.
pub fn filter_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn,sitefind=info",
        1 => "info,sitefind=debug",
        2 => "debug,sitefind=trace",
        _ => "trace",
    }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_tracing(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_for(verbose)));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose > 1),
        )
        .try_init();
}
