//! Debounced querying and result rendering.

use crate::common::*;
use sitefind::harness::HostOptions;
use sitefind::render::{NO_RESULTS_MESSAGE, SELECTED_CLASS};
use sitefind::{Key, OverlayConfig, Panel, ResultRecord};
use std::time::Duration;
use tokio::task::LocalSet;

async fn ready(config: OverlayConfig) -> TestSession {
    let t = test_session(config, HostOptions::default());
    t.session.open();
    settle(1).await;
    t
}

#[tokio::test(start_paused = true)]
async fn test_burst_of_keystrokes_runs_one_query() {
    LocalSet::new()
        .run_until(async {
            let t = ready(OverlayConfig::default()).await;
            for prefix in ["r", "ru", "rus", "rust"] {
                t.session.on_query_input(prefix);
                settle(20).await;
            }
            past_debounce().await;

            assert_eq!(t.engine.queries(), vec![("rust".to_string(), "all".to_string())]);
            assert_eq!(t.session.pipeline().executed(), 1);
            assert_eq!(t.session.results().len(), 3);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_pauses_longer_than_window_query_each_time() {
    LocalSet::new()
        .run_until(async {
            let t = ready(OverlayConfig::default()).await;
            t.session.on_query_input("go");
            past_debounce().await;
            t.session.on_query_input("rust");
            past_debounce().await;
            assert_eq!(t.engine.queries().len(), 2);
            assert_eq!(t.session.results().len(), 3);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_custom_debounce_and_scope() {
    LocalSet::new()
        .run_until(async {
            let config = OverlayConfig {
                debounce_ms: 300,
                scope: "posts".into(),
                ..OverlayConfig::default()
            };
            let t = ready(config).await;
            t.session.on_query_input("go");
            settle(250).await;
            assert!(t.engine.queries().is_empty());
            settle(60).await;
            assert_eq!(t.engine.queries(), vec![("go".to_string(), "posts".to_string())]);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_clearing_input_drops_pending_query() {
    LocalSet::new()
        .run_until(async {
            let t = ready(OverlayConfig::default()).await;
            t.session.on_query_input("rust");
            settle(40).await;
            t.session.on_query_input("");
            settle(500).await;
            assert!(t.engine.queries().is_empty());
            assert!(t.surface.panel().is_blank());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_results_keep_engine_order() {
    LocalSet::new()
        .run_until(async {
            let t = ready(OverlayConfig::default()).await;
            t.session.on_query_input("rust");
            past_debounce().await;
            let titles: Vec<_> = t.surface.panel().items().iter().map(|i| i.title.clone()).collect();
            assert_eq!(titles, vec!["Ownership in Rust", "Async Rust", "Rust on WASM"]);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_markup_escapes_titles_and_keeps_snippets() {
    LocalSet::new()
        .run_until(async {
            let t = ready(OverlayConfig::default()).await;
            t.engine.insert(
                "html",
                vec![ResultRecord::new("<script>alert(1)</script>", "a <mark>html</mark> hit", "/posts/html/")],
            );
            t.session.on_query_input("html");
            past_debounce().await;

            let html = t.surface.panel().to_html();
            assert!(html.contains("&lt;script&gt;"));
            assert!(!html.contains("<script>"));
            assert!(html.contains("a <mark>html</mark> hit"));
            assert!(html.contains(r#"href="/posts/html/""#));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_selected_item_is_marked() {
    LocalSet::new()
        .run_until(async {
            let t = ready(OverlayConfig::default()).await;
            t.session.on_query_input("rust");
            past_debounce().await;
            t.session.on_key(key(Key::ArrowDown));

            let panel = t.session.panel();
            assert!(panel.items()[0].selected);
            assert!(!panel.items()[1].selected);
            assert!(panel.to_html().contains(SELECTED_CLASS));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_empty_result_set_shows_notice() {
    LocalSet::new()
        .run_until(async {
            let t = ready(OverlayConfig::default()).await;
            t.session.on_query_input("unknown words");
            past_debounce().await;
            assert_eq!(t.surface.panel(), Panel::NoResults);
            assert!(t.surface.panel().to_html().contains(NO_RESULTS_MESSAGE));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_slow_typing_after_close_never_renders() {
    LocalSet::new()
        .run_until(async {
            let t = ready(OverlayConfig::default()).await;
            t.session.on_query_input("rust");
            settle(99).await;
            t.session.close();
            tokio::time::sleep(Duration::from_secs(1)).await;
            assert!(t.surface.panel().is_blank());
            assert!(t.session.results().is_empty());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_clearing_input_drops_surfaced_query_error() {
    LocalSet::new()
        .run_until(async {
            let config = OverlayConfig {
                surface_query_errors: true,
                ..OverlayConfig::default()
            };
            let t = ready(config).await;
            t.engine.fail_on("rust", "trap");
            t.session.on_query_input("rust");
            past_debounce().await;
            assert_eq!(t.surface.panel(), Panel::Failure("search failed: trap".into()));

            t.session.on_query_input("");
            assert_eq!(t.session.panel(), Panel::Blank);
            assert_eq!(t.surface.panel(), Panel::Blank);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_clearing_input_keeps_bootstrap_failure() {
    LocalSet::new()
        .run_until(async {
            let t = test_session(
                OverlayConfig::default(),
                HostOptions {
                    fail_init: Some("truncated index".into()),
                    ..HostOptions::default()
                },
            );
            t.session.open();
            settle(1).await;
            t.session.on_query_input("rust");
            t.session.on_query_input("");

            assert!(matches!(t.session.panel(), Panel::Failure(_)));
            assert!(matches!(t.surface.panel(), Panel::Failure(_)));
            assert!(t.engine.queries().is_empty());
        })
        .await;
}
