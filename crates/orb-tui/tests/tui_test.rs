use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

use orb_core::config::Config;
use orb_core::feed::LiveFeed;
use orb_core::seed;
use orb_core::store::ProjectStore;
use orb_core::types::{BudgetStatus, FeatureStatus};

// Binary-crate modules, included by path.
#[path = "../src/app.rs"]
mod app;
#[path = "../src/command.rs"]
mod command;
#[path = "../src/effects.rs"]
mod effects;
#[path = "../src/theme.rs"]
mod theme;
#[path = "../src/ui.rs"]
mod ui;
#[path = "../src/views/mod.rs"]
mod views;
#[path = "../src/widgets/mod.rs"]
mod widgets;

use command::AppCommand;
use widgets::status_bar::FeedState;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::empty(),
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
}

fn demo_app() -> app::App {
    let config = Config::default();
    let project = seed::bundled().unwrap();
    let store = ProjectStore::new(project, config.budget.rules());
    app::App::new(store, config, today(), 42)
}

fn toast_messages(app: &app::App) -> Vec<String> {
    app.toasts.messages().map(str::to_string).collect()
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn test_app_new_creates_valid_state() {
    let app = demo_app();
    assert!(!app.should_quit);
    assert!(!app.show_help);
    assert!(!app.show_burndown);
    assert!(!app.fullscreen);
    assert_eq!(app.segments.len(), 4);
    assert_eq!(app.store.selected_id(), None);
    assert_eq!(app.hovered, None);
    assert_eq!(app.feed_state(), FeedState::Off);
    assert!(!app.burndown.is_empty());
    assert_eq!(app.burndown_params.total_budget, 180_000.0);
}

#[test]
fn test_burndown_is_fixed_per_seed() {
    let a = demo_app();
    let b = demo_app();
    assert_eq!(a.burndown, b.burndown);
}

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

#[test]
fn test_quit_keys() {
    let mut app = demo_app();
    app.on_key(key(KeyCode::Char('q')));
    assert!(app.should_quit);

    let mut app = demo_app();
    app.on_key(KeyEvent {
        code: KeyCode::Char('c'),
        modifiers: KeyModifiers::CONTROL,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    });
    assert!(app.should_quit);
}

#[test]
fn test_release_events_are_ignored() {
    let mut app = demo_app();
    app.on_key(KeyEvent {
        code: KeyCode::Char('q'),
        modifiers: KeyModifiers::empty(),
        kind: KeyEventKind::Release,
        state: KeyEventState::empty(),
    });
    assert!(!app.should_quit);
}

#[test]
fn test_help_swallows_keys_until_closed() {
    let mut app = demo_app();
    app.on_key(key(KeyCode::Char('?')));
    assert!(app.show_help);

    app.on_key(key(KeyCode::Char('q')));
    assert!(!app.should_quit, "help overlay should swallow q");

    app.on_key(key(KeyCode::Esc));
    assert!(!app.show_help);
}

#[test]
fn test_hover_wraps_both_ways() {
    let mut app = demo_app();
    app.on_key(key(KeyCode::Right));
    assert_eq!(app.hovered, Some(0));
    app.on_key(key(KeyCode::Left));
    assert_eq!(app.hovered, Some(3));
    app.on_key(key(KeyCode::Char('l')));
    assert_eq!(app.hovered, Some(0));
    app.on_key(key(KeyCode::Char('h')));
    app.on_key(key(KeyCode::Char('h')));
    assert_eq!(app.hovered, Some(2));
}

#[test]
fn test_enter_selects_hovered_feature() {
    let mut app = demo_app();
    app.on_key(key(KeyCode::Enter));
    assert_eq!(app.store.selected_id(), None, "nothing hovered yet");

    app.on_key(key(KeyCode::Right));
    app.on_key(key(KeyCode::Right));
    app.on_key(key(KeyCode::Enter));
    assert_eq!(app.store.selected_id(), Some(2));
    assert!(app.pending_fx.contains(&app::PendingFx::DetailsOpened));
    assert_eq!(
        app.activity.front().map(|e| e.message.as_str()),
        Some("Selected Data Analytics Dashboard")
    );
}

#[test]
fn test_esc_unwinds_drawer_then_fullscreen_then_selection() {
    let mut app = demo_app();
    let _ = app.select(Some(1));
    app.on_key(key(KeyCode::Char('f')));
    app.on_key(key(KeyCode::Char('b')));
    assert!(app.show_burndown && app.fullscreen);

    app.on_key(key(KeyCode::Esc));
    assert!(!app.show_burndown);
    assert!(app.fullscreen);
    assert_eq!(app.store.selected_id(), Some(1));

    app.on_key(key(KeyCode::Esc));
    assert!(!app.fullscreen);
    assert_eq!(app.store.selected_id(), Some(1));

    app.on_key(key(KeyCode::Esc));
    assert_eq!(app.store.selected_id(), None);
}

#[test]
fn test_burndown_toggle_queues_drawer_effect() {
    let mut app = demo_app();
    app.on_key(key(KeyCode::Char('s')));
    assert!(app.show_burndown);
    assert_eq!(app.pending_fx, vec![app::PendingFx::DrawerOpened]);

    app.on_key(key(KeyCode::Char('b')));
    assert!(!app.show_burndown);
    assert_eq!(app.pending_fx.len(), 1, "closing queues nothing");
}

// ---------------------------------------------------------------------------
// Store events
// ---------------------------------------------------------------------------

#[test]
fn test_hours_update_relayouts_and_reports_status_change() {
    let mut app = demo_app();
    let before = app.segments.iter().find(|s| s.feature_id == 1).unwrap().progress_height;

    app.apply(orb_core::store::StoreCommand::UpdateBurnedHours {
        feature_id: 1,
        burned_hours: 190.0,
    })
    .unwrap();

    let after = app.segments.iter().find(|s| s.feature_id == 1).unwrap().progress_height;
    assert!(after > before);
    assert_eq!(app.store.feature_status(1), Some(FeatureStatus::Delayed));
    assert!(toast_messages(&app).contains(&"User Authentication System is now Delayed".to_string()));
    assert!(app.pending_fx.contains(&app::PendingFx::HoursSpark));
    assert_eq!(
        app.activity.front().map(|e| e.message.as_str()),
        Some("User Authentication System: +50.0h, now 190.0h")
    );
}

#[test]
fn test_recovery_raises_back_on_track_toast() {
    let mut app = demo_app();
    app.apply(orb_core::store::StoreCommand::UpdateBurnedHours {
        feature_id: 2,
        burned_hours: 100.0,
    })
    .unwrap();
    assert!(toast_messages(&app).contains(&"Data Analytics Dashboard is back on track".to_string()));
}

#[test]
fn test_budget_status_change_flashes() {
    let mut app = demo_app();
    assert_eq!(app.store.budget_status(), BudgetStatus::Warning);

    app.apply(orb_core::store::StoreCommand::UpdateBurnedHours {
        feature_id: 4,
        burned_hours: 600.0,
    })
    .unwrap();

    assert_eq!(app.store.budget_status(), BudgetStatus::Critical);
    assert!(app.pending_fx.contains(&app::PendingFx::BudgetFlash));
    assert!(toast_messages(&app).contains(&"Budget status: Critical".to_string()));
}

#[test]
fn test_rejected_update_shows_error_toast() {
    let mut app = demo_app();
    let result = app.apply(orb_core::store::StoreCommand::UpdateBurnedHours {
        feature_id: 99,
        burned_hours: 1.0,
    });
    assert!(result.is_err());
    assert_eq!(app.toasts.messages().count(), 1);
    assert!(app.activity.is_empty());
}

#[test]
fn test_activity_log_is_capped() {
    let mut app = demo_app();
    for i in 0..(app::ACTIVITY_LIMIT + 10) {
        app.apply(orb_core::store::StoreCommand::UpdateBurnedHours {
            feature_id: 3,
            burned_hours: 180.0 + i as f64,
        })
        .unwrap();
    }
    assert_eq!(app.activity.len(), app::ACTIVITY_LIMIT);
}

// ---------------------------------------------------------------------------
// Live feed
// ---------------------------------------------------------------------------

#[test]
fn test_feed_toggle_without_feed_warns() {
    let mut app = demo_app();
    app.on_key(key(KeyCode::Char('p')));
    assert!(!app.feed_paused);
    assert_eq!(toast_messages(&app), vec!["Live feed is disabled".to_string()]);
}

#[test]
fn test_paused_feed_does_not_touch_store() {
    let mut app = demo_app().with_feed(LiveFeed::seeded(7, 8.0));
    assert_eq!(app.feed_state(), FeedState::Live);

    app.on_key(key(KeyCode::Char('p')));
    assert_eq!(app.feed_state(), FeedState::Paused);

    let updated = app.store.last_updated();
    for _ in 0..20 {
        app.on_feed_tick();
    }
    assert_eq!(app.store.last_updated(), updated);

    app.on_key(key(KeyCode::Char('p')));
    assert_eq!(app.feed_state(), FeedState::Live);
}

#[test]
fn test_live_feed_only_increases_hours() {
    let mut app = demo_app().with_feed(LiveFeed::seeded(7, 8.0));
    let before: Vec<f64> = app.store.features().iter().map(|f| f.burned_hours).collect();
    for _ in 0..20 {
        app.on_feed_tick();
    }
    for (feature, old) in app.store.features().iter().zip(before) {
        assert!(feature.burned_hours >= old);
    }
}

// ---------------------------------------------------------------------------
// Mouse picking
// ---------------------------------------------------------------------------

fn rendered_app() -> app::App {
    let mut app = demo_app();
    let backend = ratatui::backend::TestBackend::new(120, 40);
    let mut terminal = ratatui::Terminal::new(backend).unwrap();
    terminal.draw(|frame| ui::render(frame, &mut app)).unwrap();
    app
}

#[test]
fn test_pick_centre_of_sun() {
    let app = rendered_app();
    let viewport = app.orb_viewport.expect("orb drawn");
    let sun_y = app.config.display.segment_height / 2.0 * app.projection.lift;
    let (col, row) = viewport.to_cell(0.0, sun_y);
    assert_eq!(app.pick(col, row), Some(app::OrbPick::Sun));
}

#[test]
fn test_pick_outside_orb_is_none() {
    let app = rendered_app();
    let viewport = app.orb_viewport.expect("orb drawn");
    assert_eq!(app.pick(viewport.area.x, viewport.area.y), None);
    assert_eq!(app.pick(0, 0), None);
}

#[test]
fn test_click_on_sun_toggles_drawer() {
    use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

    let mut app = rendered_app();
    let viewport = app.orb_viewport.expect("orb drawn");
    let sun_y = app.config.display.segment_height / 2.0 * app.projection.lift;
    let (column, row) = viewport.to_cell(0.0, sun_y);

    app.on_mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::empty(),
    });
    assert!(app.show_burndown);
}

/// Cell over the ring at world angle `angle`, part way out from the wall base.
fn ring_cell(app: &app::App, angle: f64) -> (u16, u16) {
    let viewport = app.orb_viewport.expect("orb drawn");
    let sun_y = app.config.display.segment_height / 2.0 * app.projection.lift;
    let r = app.config.display.orb_radius * 0.9;
    viewport.to_cell(r * angle.cos(), sun_y + r * angle.sin() * app.projection.tilt)
}

#[test]
fn test_pick_ring_segment_matches_hit_test() {
    use std::f64::consts::FRAC_PI_4;

    let app = rendered_app();
    for (angle, expected) in [(FRAC_PI_4, 1), (5.0 * FRAC_PI_4, 3)] {
        let by_geometry = orb_core::orb::hit_test(&app.segments, app.rotation.angle(), angle)
            .map(|s| s.feature_id);
        assert_eq!(by_geometry, Some(expected));

        let (col, row) = ring_cell(&app, angle);
        assert_eq!(app.pick(col, row), Some(app::OrbPick::Segment(expected)));
    }
}

#[test]
fn test_click_on_segment_selects_feature() {
    use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

    let mut app = rendered_app();
    let (column, row) = ring_cell(&app, 5.0 * std::f64::consts::FRAC_PI_4);
    app.on_mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::empty(),
    });
    assert_eq!(app.store.selected_id(), Some(3));
    assert!(!app.show_burndown);

    app.on_mouse(MouseEvent {
        kind: MouseEventKind::Moved,
        column,
        row,
        modifiers: KeyModifiers::empty(),
    });
    assert_eq!(app.hovered_feature().map(|f| f.id), Some(3));
}

#[test]
fn test_fullscreen_drops_running_effects() {
    let mut app = rendered_app();
    assert!(app.sun_label_area.is_some());
    app.on_key(key(KeyCode::Char('f')));
    assert!(app.sun_label_area.is_none(), "sun glow re-anchors on next render");
}

// ---------------------------------------------------------------------------
// Effect queue
// ---------------------------------------------------------------------------

#[test]
fn test_effect_queue_holds_one_entry_per_kind() {
    let mut app = demo_app();
    for i in 0..200 {
        command::execute_command(&mut app, AppCommand::Select(1 + (i % 4)));
        command::execute_command(
            &mut app,
            AppCommand::AddHours {
                feature_id: 3,
                delta: 1.0,
            },
        );
        command::execute_command(&mut app, AppCommand::ToggleBurndown);
    }
    assert!(app.pending_fx.len() <= 4, "queue grew to {}", app.pending_fx.len());
}

#[test]
fn test_effects_off_when_nothing_renders() {
    let mut app = demo_app().without_effects();
    for i in 0..500 {
        command::execute_command(&mut app, AppCommand::Select(1 + (i % 4)));
        command::execute_command(
            &mut app,
            AppCommand::SetHours {
                feature_id: 4,
                hours: 150.0 + i as f64,
            },
        );
    }
    assert!(app.pending_fx.is_empty());
    assert_eq!(app.store.feature(4).unwrap().burned_hours, 649.0);
}

// ---------------------------------------------------------------------------
// Command parsing
// ---------------------------------------------------------------------------

#[test]
fn test_parse_text_commands() {
    assert_eq!(command::parse_command(":select 3"), Some(AppCommand::Select(3)));
    assert_eq!(command::parse_command(":sel 1"), Some(AppCommand::Select(1)));
    assert_eq!(command::parse_command(":clear"), Some(AppCommand::Deselect));
    assert_eq!(command::parse_command(":hover next"), Some(AppCommand::HoverNext));
    assert_eq!(
        command::parse_command(":burn 2 400"),
        Some(AppCommand::SetHours {
            feature_id: 2,
            hours: 400.0
        })
    );
    assert_eq!(
        command::parse_command(":add 4 -2.5"),
        Some(AppCommand::AddHours {
            feature_id: 4,
            delta: -2.5
        })
    );
    assert_eq!(command::parse_command(":sun"), Some(AppCommand::ToggleBurndown));
    assert_eq!(command::parse_command(":query burndown"), Some(AppCommand::QueryBurndown));
    assert_eq!(command::parse_command(":q"), Some(AppCommand::Quit));
}

#[test]
fn test_parse_text_rejects_malformed() {
    assert_eq!(command::parse_command("select 3"), None, "missing prefix");
    assert_eq!(command::parse_command(":select"), None);
    assert_eq!(command::parse_command(":select three"), None);
    assert_eq!(command::parse_command(":burn 2"), None);
    assert_eq!(command::parse_command(":hover up"), None);
    assert_eq!(command::parse_command(":nope"), None);
}

#[test]
fn test_parse_json_commands() {
    assert_eq!(
        command::parse_json_command(r#"{"cmd":"select","args":[2]}"#),
        Some(AppCommand::Select(2))
    );
    assert_eq!(
        command::parse_json_command(r#"{"cmd":"set_hours","args":[1, 150.5]}"#),
        Some(AppCommand::SetHours {
            feature_id: 1,
            hours: 150.5
        })
    );
    assert_eq!(
        command::parse_json_command(r#"{"cmd":"query_state"}"#),
        Some(AppCommand::QueryState)
    );
    assert_eq!(command::parse_json_command(r#"{"cmd":"select","args":[-1]}"#), None);
    assert_eq!(command::parse_json_command(r#"{"cmd":"dance"}"#), None);
    assert_eq!(command::parse_json_command("not json"), None);
}

// ---------------------------------------------------------------------------
// Command execution
// ---------------------------------------------------------------------------

#[test]
fn test_execute_selection_and_query() {
    let mut app = demo_app();
    assert!(command::execute_command(&mut app, AppCommand::Select(3)).is_none());

    let json = command::execute_command(&mut app, AppCommand::QuerySelected).unwrap();
    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["feature"]["name"], "API Integration Layer");
    assert_eq!(v["progress"], 75.0);
    assert_eq!(v["remaining_hours"], 60.0);

    command::execute_command(&mut app, AppCommand::Deselect);
    let json = command::execute_command(&mut app, AppCommand::QuerySelected).unwrap();
    assert_eq!(json, "null");
}

#[test]
fn test_query_selected_reports_one_status() {
    let mut app = demo_app();
    command::execute_command(&mut app, AppCommand::Select(4));
    let json = command::execute_command(&mut app, AppCommand::QuerySelected).unwrap();
    let v: serde_json::Value = serde_json::from_str(&json).unwrap();

    // 150 of 480 hours: derived On Track, while the seed declares At Risk.
    assert_eq!(v["status"], "OnTrack");
    assert!(v["feature"].get("status").is_none());
    assert_eq!(v["feature"]["declaredStatus"], "AtRisk");
    assert_eq!(v["progress"], 31.25);
}

#[test]
fn test_query_state_lists_activity_newest_first() {
    let mut app = demo_app();
    command::execute_command(&mut app, AppCommand::Select(2));
    command::execute_command(
        &mut app,
        AppCommand::AddHours {
            feature_id: 4,
            delta: 5.0,
        },
    );

    let json = command::execute_command(&mut app, AppCommand::QueryState).unwrap();
    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    let activity = v["activity"].as_array().unwrap();
    assert_eq!(activity.len(), 2);
    assert_eq!(activity[0]["message"], "Performance Optimization: +5.0h, now 155.0h");
    assert_eq!(activity[1]["message"], "Selected Data Analytics Dashboard");
    assert_eq!(v["toasts"][0], "Performance Optimization +5.0h");
}

#[test]
fn test_execute_query_state() {
    let mut app = demo_app();
    command::execute_command(&mut app, AppCommand::HoverNext);
    command::execute_command(&mut app, AppCommand::ToggleFullscreen);

    let json = command::execute_command(&mut app, AppCommand::QueryState).unwrap();
    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["hovered"], 1);
    assert_eq!(v["fullscreen"], true);
    assert_eq!(v["show_burndown"], false);
    assert_eq!(v["feed"], "off");
    assert!(v["project"].is_object());
}

#[test]
fn test_execute_query_burndown() {
    let mut app = demo_app();
    let json = command::execute_command(&mut app, AppCommand::QueryBurndown).unwrap();
    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["total_budget"], 180_000.0);
    assert_eq!(v["days"].as_u64().unwrap() as usize, app.burndown.len());
    assert_eq!(v["points"].as_array().unwrap().len(), app.burndown.len());
}

#[test]
fn test_execute_rejected_hours_returns_error_event() {
    let mut app = demo_app();
    let json = command::execute_command(
        &mut app,
        AppCommand::SetHours {
            feature_id: 1,
            hours: -5.0,
        },
    )
    .unwrap();
    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["event"], "error");
    assert_eq!(app.store.feature(1).unwrap().burned_hours, 140.0);
}

#[test]
fn test_execute_add_hours() {
    let mut app = demo_app();
    let out = command::execute_command(
        &mut app,
        AppCommand::AddHours {
            feature_id: 4,
            delta: 10.0,
        },
    );
    assert!(out.is_none());
    assert_eq!(app.store.feature(4).unwrap().burned_hours, 160.0);
}

#[test]
fn test_execute_quit_and_help() {
    let mut app = demo_app();
    command::execute_command(&mut app, AppCommand::Help);
    assert!(app.show_help);
    command::execute_command(&mut app, AppCommand::Quit);
    assert!(app.should_quit);
}
