//! Lazy, single-flight engine bootstrap as seen through the session.

use crate::common::*;
use sitefind::harness::HostOptions;
use sitefind::{EngineState, OverlayConfig, OverlayError, Panel};
use std::time::Duration;
use tokio::task::LocalSet;

fn slow() -> HostOptions {
    HostOptions {
        latency: Duration::from_millis(40),
        ..HostOptions::default()
    }
}

#[tokio::test(start_paused = true)]
async fn test_nothing_loads_before_first_open() {
    LocalSet::new()
        .run_until(async {
            let t = test_session(OverlayConfig::default(), HostOptions::default());
            t.session.on_query_input("rust");
            settle(500).await;

            assert_eq!(t.session.engine_state(), EngineState::NotLoaded);
            assert!(t.host().calls().is_empty());
            assert!(t.engine.queries().is_empty());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_open_and_direct_callers_share_one_attempt() {
    LocalSet::new()
        .run_until(async {
            let t = test_session(OverlayConfig::default(), slow());
            t.session.open();
            let direct = tokio::task::spawn_local(t.session.ensure_engine_ready());
            let again = tokio::task::spawn_local(t.session.ensure_engine_ready());

            let (a, b) = (direct.await.unwrap(), again.await.unwrap());
            assert_eq!(a.unwrap().doc_count(), 42);
            assert_eq!(b.unwrap().doc_count(), 42);
            assert_eq!(t.host().count("load_runtime_bridge"), 1);
            assert_eq!(t.host().count("fetch_module"), 1);
            assert_eq!(t.host().count("start_module"), 1);
            assert_eq!(t.host().count("init_search"), 1);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_many_reopens_during_load() {
    LocalSet::new()
        .run_until(async {
            let t = test_session(OverlayConfig::default(), slow());
            for _ in 0..5 {
                t.session.open();
                settle(10).await;
                t.session.close();
            }
            t.session.open();
            settle(1_000).await;

            assert_eq!(t.session.engine_state(), EngineState::Ready);
            assert_eq!(t.session.bootstrapper().attempts(), 1);
            assert_eq!(t.host().count("init_search"), 1);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_steps_run_in_order_with_base_url() {
    LocalSet::new()
        .run_until(async {
            let t = test_session(OverlayConfig::default().with_base_url("/docs"), HostOptions::default());
            t.session.open();
            settle(1).await;
            assert_eq!(
                t.host().calls(),
                vec![
                    "load_runtime_bridge /docs/static/js/wasm_exec.js",
                    "fetch_module /docs/static/wasm/search.wasm",
                    "start_module",
                    "init_search /docs/search.bin",
                ]
            );
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_missing_bridge_is_a_load_failure() {
    LocalSet::new()
        .run_until(async {
            let t = test_session(
                OverlayConfig::default(),
                HostOptions {
                    bridge_defines_runtime: false,
                    ..HostOptions::default()
                },
            );
            t.session.open();
            settle(1).await;

            assert_eq!(t.session.engine_state(), EngineState::Failed);
            assert_eq!(t.host().count("fetch_module"), 0);
            assert_eq!(
                t.surface.panel(),
                Panel::Failure(format!(
                    "Search initialization failed: {}",
                    OverlayError::BridgeMissing
                ))
            );
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_bootstrap_timeout_renders_failure() {
    LocalSet::new()
        .run_until(async {
            let config = OverlayConfig {
                bootstrap_timeout_ms: Some(100),
                ..OverlayConfig::default()
            };
            let t = test_session(
                config,
                HostOptions {
                    latency: Duration::from_secs(2),
                    ..HostOptions::default()
                },
            );
            t.session.open();
            settle(150).await;

            assert_eq!(t.session.engine_state(), EngineState::Failed);
            let Panel::Failure(message) = t.surface.panel() else {
                panic!("expected failure panel");
            };
            assert!(message.contains("timed out"));
            assert!(t.session.is_open());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_preloaded_bridge_is_reused() {
    LocalSet::new()
        .run_until(async {
            let t = test_session(
                OverlayConfig::default(),
                HostOptions {
                    bridge_preloaded: true,
                    ..HostOptions::default()
                },
            );
            t.session.open();
            settle(1).await;
            assert_eq!(t.session.engine_state(), EngineState::Ready);
            assert_eq!(t.host().count("load_runtime_bridge"), 0);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_failure_after_close_is_cleared_by_successful_retry() {
    LocalSet::new()
        .run_until(async {
            let t = test_session(
                OverlayConfig::default(),
                HostOptions {
                    fail_init: Some("boom".into()),
                    ..slow()
                },
            );
            t.session.open();
            settle(10).await;
            t.session.close();
            settle(1_000).await;
            assert_eq!(t.session.engine_state(), EngineState::Failed);
            assert!(matches!(t.surface.panel(), Panel::Failure(_)));

            t.host().clear_failures();
            t.session.open();
            assert!(t.surface.panel().is_blank());
            settle(1_000).await;

            assert_eq!(t.session.engine_state(), EngineState::Ready);
            assert_eq!(t.surface.panel(), Panel::Blank);
            assert_eq!(t.session.panel(), Panel::Blank);
            assert!(t.surface.is_input_focused());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_failure_after_close_shown_on_reopen_without_retry() {
    LocalSet::new()
        .run_until(async {
            let config = OverlayConfig {
                retry_failed_bootstrap: false,
                ..OverlayConfig::default()
            };
            let t = test_session(
                config,
                HostOptions {
                    fail_init: Some("boom".into()),
                    ..slow()
                },
            );
            t.session.open();
            settle(10).await;
            t.session.close();
            settle(1_000).await;

            t.session.open();
            settle(1).await;
            let Panel::Failure(message) = t.session.panel() else {
                panic!("expected failure panel");
            };
            assert!(message.ends_with("boom"));
            assert_eq!(t.surface.panel(), t.session.panel());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_direct_bootstrap_failure_reaches_the_panel() {
    LocalSet::new()
        .run_until(async {
            let t = test_session(
                OverlayConfig::default(),
                HostOptions {
                    fail_init: Some("truncated index".into()),
                    ..HostOptions::default()
                },
            );
            let outcome = t.session.ensure_engine_ready().await;
            assert!(outcome.is_err());
            assert!(!t.session.is_open());
            let Panel::Failure(message) = t.surface.panel() else {
                panic!("expected failure panel");
            };
            assert!(message.contains("truncated index"));

            t.host().clear_failures();
            let outcome = t.session.ensure_engine_ready().await;
            assert_eq!(outcome.unwrap().doc_count(), 42);
            assert_eq!(t.surface.panel(), Panel::Blank);
            assert!(!t.surface.is_input_focused());
        })
        .await;
}
