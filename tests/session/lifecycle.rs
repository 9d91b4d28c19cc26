//! Modal open/close transitions and what they do to the page.

use crate::common::*;
use sitefind::harness::{HostOptions, SurfaceEvent};
use sitefind::{EngineState, ModalState, OverlayConfig};
use tokio::task::LocalSet;

#[tokio::test(start_paused = true)]
async fn test_open_shows_and_locks_scroll() {
    LocalSet::new()
        .run_until(async {
            let t = test_session(OverlayConfig::default(), HostOptions::default());
            assert_eq!(t.session.modal_state(), ModalState::Closed);
            t.session.open();
            settle(1).await;
            assert_eq!(
                t.surface.events(),
                vec![SurfaceEvent::Shown, SurfaceEvent::ScrollLocked, SurfaceEvent::InputFocused]
            );
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_open_twice_is_idempotent() {
    LocalSet::new()
        .run_until(async {
            let t = test_session(OverlayConfig::default(), HostOptions::default());
            t.session.open();
            t.session.open();
            settle(1).await;
            let shown = t
                .surface
                .events()
                .iter()
                .filter(|e| **e == SurfaceEvent::Shown)
                .count();
            assert_eq!(shown, 1);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_close_while_closed_does_nothing() {
    LocalSet::new()
        .run_until(async {
            let t = test_session(OverlayConfig::default(), HostOptions::default());
            t.session.close();
            assert!(t.surface.events().is_empty());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_close_restores_page() {
    LocalSet::new()
        .run_until(async {
            let t = test_session(OverlayConfig::default(), HostOptions::default());
            t.session.open();
            settle(1).await;
            t.surface.take_events();

            t.session.close();
            assert_eq!(t.surface.take_events()[..3], [
                SurfaceEvent::Hidden,
                SurfaceEvent::ScrollUnlocked,
                SurfaceEvent::InputCleared,
            ]);
            assert!(!t.surface.is_visible());
            assert!(!t.surface.is_scroll_locked());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_reopen_starts_clean_and_reuses_engine() {
    LocalSet::new()
        .run_until(async {
            let t = test_session(OverlayConfig::default(), HostOptions::default());
            t.session.open();
            settle(1).await;
            t.session.on_query_input("rust");
            past_debounce().await;
            t.session.on_key(key(sitefind::Key::ArrowDown));
            t.session.close();

            t.session.open();
            settle(1).await;
            assert_eq!(t.session.engine_state(), EngineState::Ready);
            assert_eq!(t.session.bootstrapper().attempts(), 1);
            assert!(t.session.query().is_empty());
            assert!(t.session.results().is_empty());
            assert_eq!(t.session.selected_index(), None);
            assert!(t.surface.panel().is_blank());
            assert!(t.surface.is_input_focused());
        })
        .await;
}
