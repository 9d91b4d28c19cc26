// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use clap::Parser;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use sitefind::cli::check::{check_site, CheckReport};
use sitefind::cli::display::{self, *};
use sitefind::cli::replay::{replay, ReplayOptions, ReplayReport, Step};
use sitefind::cli::{Cli, Commands, ConfigArgs};
use sitefind::harness::FixtureEngine;
use sitefind::logging::init_tracing;
use sitefind::OverlayConfig;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Urls { config } => run_urls(&config),
        Commands::Check { site_dir, config } => run_check(&site_dir, &config),
        Commands::Replay {
            fixtures,
            script,
            latency_ms,
            fail_bootstrap,
            config,
        } => run_replay(&fixtures, &script, latency_ms, fail_bootstrap, &config),
    };

    if let Err(e) = result {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

fn run_urls(args: &ConfigArgs) -> Result<(), String> {
    let config = args.load()?;
    println!("runtime bridge  {}", config.runtime_bridge_url());
    println!("engine          {}", config.engine_url());
    println!("index           {}", config.index_url());
    Ok(())
}

fn run_check(site_dir: &Path, args: &ConfigArgs) -> Result<(), String> {
    let config = args.load()?;
    let report = check_site(site_dir, &config)?;
    print_check(&report);
    if report.is_ok() {
        Ok(())
    } else {
        let missing: Vec<_> = report.failures().map(|r| r.label).collect();
        Err(format!("site is missing overlay resources: {}", missing.join(", ")))
    }
}

fn print_check(report: &CheckReport) {
    println!();
    display::title(&format!("SITE CHECK: {}", report.site_dir.display()));
    println!();
    section_top("RESOURCES");
    for resource in &report.resources {
        let badge = if resource.is_ok() { ok_badge() } else { fail_badge() };
        let sizes = match (resource.size, resource.compressed) {
            (Some(raw), Some(packed)) => format!(
                "{} → {} br {}",
                format_size(raw),
                format_size(packed),
                ratio(raw, packed)
            ),
            (Some(raw), None) => format_size(raw),
            _ => String::new(),
        };
        row(&format!(
            " {} {} {}",
            badge,
            pad_right(&themed(CYAN, &[BOLD], resource.label), 16),
            pad_right(&resource.url, 36)
        ));
        if !sizes.is_empty() {
            row(&format!("   {}", themed(GRAY, &[], &sizes)));
        }
        if let Some(problem) = &resource.problem {
            row(&format!("   {}", themed(RED, &[], problem)));
        }
    }
    section_bot();
}

fn run_replay(
    fixtures: &Path,
    script: &str,
    latency_ms: u64,
    fail_bootstrap: Option<String>,
    args: &ConfigArgs,
) -> Result<(), String> {
    let config = args.load()?;
    let steps = Step::parse_script(script)?;
    let json = std::fs::read_to_string(fixtures)
        .map_err(|e| format!("failed to read {}: {}", fixtures.display(), e))?;
    let engine = FixtureEngine::from_json(&json)
        .map_err(|e| format!("invalid fixtures {}: {}", fixtures.display(), e))?;
    let options = ReplayOptions {
        latency: Duration::from_millis(latency_ms),
        fail_bootstrap,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(|e| format!("failed to start event loop: {}", e))?;
    let local = tokio::task::LocalSet::new();
    let report = local.block_on(&runtime, replay(config, Rc::new(engine), &steps, options));

    print_replay(&report);
    Ok(())
}

fn print_replay(report: &ReplayReport) {
    println!();
    section_top("REPLAY");
    for trace in &report.steps {
        let mut head = format!(" {}", themed(BRIGHT_CYAN, &[BOLD], &trace.step.to_string()));
        if let Some(disposition) = trace.disposition {
            head.push_str(&themed(GRAY, &[DIM], &format!("  ({:?})", disposition)));
        }
        row(&head);
        for event in &trace.events {
            row(&format!("   {}", surface_event(event)));
        }
    }
    section_mid("FINAL STATE");
    row(&format!(" engine     {}", report.engine_state.as_str()));
    if let Some(docs) = report.doc_count {
        row(&format!(" documents  {}", docs));
    }
    row(&format!(" modal      {}", if report.open { "open" } else { "closed" }));
    row(&format!(" query      {:?}", report.query));
    row(&format!(" results    {}", report.result_count));
    row(&format!(
        " selected   {}",
        report.selected.map_or_else(|| "-1".to_string(), |i| i.to_string())
    ));
    for href in &report.navigations {
        row(&format!(" navigated  {}", href));
    }
    section_bot();
}
