//! Global shortcuts and result navigation.

use crate::common::*;
use sitefind::harness::{HostOptions, SurfaceEvent};
use sitefind::{FocusTarget, Key, KeyDisposition, Modifiers, OverlayConfig};
use tokio::task::LocalSet;

async fn with_results(config: OverlayConfig, query: &str) -> TestSession {
    let t = test_session(config, HostOptions::default());
    t.session.open();
    settle(1).await;
    t.session.on_query_input(query);
    past_debounce().await;
    t
}

#[tokio::test(start_paused = true)]
async fn test_modifier_shortcuts_open() {
    LocalSet::new()
        .run_until(async {
            for modifiers in [Modifiers::CTRL, Modifiers::META] {
                let t = test_session(OverlayConfig::default(), HostOptions::default());
                let event = key(Key::Char('k')).with_modifiers(modifiers);
                assert_eq!(t.session.on_key(event), KeyDisposition::PreventDefault);
                assert!(t.session.is_open());
            }
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_custom_shortcut_letter() {
    LocalSet::new()
        .run_until(async {
            let config = OverlayConfig {
                shortcut_letter: 'p',
                ..OverlayConfig::default()
            };
            let t = test_session(config, HostOptions::default());
            let ctrl_k = key(Key::Char('k')).with_modifiers(Modifiers::CTRL);
            assert_eq!(t.session.on_key(ctrl_k), KeyDisposition::Ignored);
            let ctrl_p = key(Key::Char('p')).with_modifiers(Modifiers::CTRL);
            assert_eq!(t.session.on_key(ctrl_p), KeyDisposition::PreventDefault);
            assert!(t.session.is_open());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_shortcuts_ignored_in_editable_targets() {
    LocalSet::new()
        .run_until(async {
            let t = test_session(OverlayConfig::default(), HostOptions::default());
            for target in [FocusTarget::TextInput, FocusTarget::TextArea, FocusTarget::ContentEditable] {
                assert_eq!(
                    t.session.on_key(key(Key::Char('/')).from_target(target)),
                    KeyDisposition::Ignored
                );
            }
            assert!(!t.session.is_open());
            assert!(t.surface.events().is_empty());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_navigation_keys_ignored_while_closed() {
    LocalSet::new()
        .run_until(async {
            let t = test_session(OverlayConfig::default(), HostOptions::default());
            for k in [Key::ArrowDown, Key::ArrowUp, Key::Enter, Key::Escape] {
                assert_eq!(t.session.on_key(key(k)), KeyDisposition::Ignored);
            }
            assert!(t.surface.events().is_empty());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_selection_clamps_at_both_ends() {
    LocalSet::new()
        .run_until(async {
            let t = with_results(OverlayConfig::default(), "rust").await;
            assert_eq!(t.session.results().len(), 3);

            t.session.on_key(key(Key::ArrowUp));
            assert_eq!(t.session.selected_index(), Some(0));
            t.session.on_key(key(Key::ArrowUp));
            assert_eq!(t.session.selected_index(), Some(0));

            for _ in 0..10 {
                assert_eq!(t.session.on_key(key(Key::ArrowDown)), KeyDisposition::PreventDefault);
            }
            assert_eq!(t.session.selected_index(), Some(2));
            assert_eq!(t.surface.selected(), Some(2));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_enter_without_selection_passes_through() {
    LocalSet::new()
        .run_until(async {
            let t = with_results(OverlayConfig::default(), "rust").await;
            assert_eq!(t.session.on_key(key(Key::Enter)), KeyDisposition::Ignored);
            assert!(t.surface.navigations().is_empty());
            assert_eq!(t.session.last_navigation(), None);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_enter_navigates_to_selected_link() {
    LocalSet::new()
        .run_until(async {
            let t = with_results(OverlayConfig::default().with_base_url("/blog"), "rust").await;
            t.session.on_key(key(Key::ArrowDown));
            t.session.on_key(key(Key::ArrowDown));
            assert_eq!(t.session.on_key(key(Key::Enter)), KeyDisposition::PreventDefault);
            assert_eq!(
                t.surface.events().last(),
                Some(&SurfaceEvent::Navigated("/blog/posts/async/".into()))
            );
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_escape_closes_and_clears() {
    LocalSet::new()
        .run_until(async {
            let t = with_results(OverlayConfig::default(), "rust").await;
            t.session.on_key(key(Key::ArrowDown));
            assert_eq!(t.session.on_key(key(Key::Escape)), KeyDisposition::Handled);
            assert!(!t.session.is_open());
            assert_eq!(t.session.selected_index(), None);
            assert!(t.session.results().is_empty());
        })
        .await;
}
