//! Render tests for the dashboard screens.
//!
//! Each test draws into a 120x40 buffer and checks that the expected text
//! shows up, so layout regressions surface without a real terminal.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

use orb_core::config::Config;
use orb_core::seed;
use orb_core::store::ProjectStore;

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

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const WIDTH: u16 = 120;
const HEIGHT: u16 = 40;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::empty(),
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

fn demo_app() -> app::App {
    let config = Config::default();
    let project = seed::bundled().unwrap();
    let store = ProjectStore::new(project, config.budget.rules());
    app::App::new(
        store,
        config,
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
        42,
    )
}

fn render_to_string(app: &mut app::App) -> String {
    let backend = TestBackend::new(WIDTH, HEIGHT);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|frame| ui::render(frame, app)).unwrap();
    buffer_to_string(terminal.backend().buffer())
}

fn buffer_to_string(buf: &Buffer) -> String {
    let area = buf.area;
    let mut lines = Vec::new();
    for y in area.y..area.y + area.height {
        let mut line = String::new();
        for x in area.x..area.x + area.width {
            line.push_str(buf[(x, y)].symbol());
        }
        lines.push(line);
    }
    lines.join("\n")
}

fn assert_contains(output: &str, needle: &str) {
    assert!(
        output.contains(needle),
        "Expected to find {:?} in rendered output.\nFull output:\n{}",
        needle,
        output
    );
}

fn assert_contains_all(output: &str, needles: &[&str]) {
    for needle in needles {
        assert_contains(output, needle);
    }
}

// ---------------------------------------------------------------------------
// Screens
// ---------------------------------------------------------------------------

#[test]
fn header_shows_project_totals() {
    let mut app = demo_app();
    let out = render_to_string(&mut app);
    assert_contains_all(
        &out,
        &[
            "Project Budget Overview",
            "Budget Status",
            "Warning",
            "71%",
            "850/1200",
            "$127,500 / $180,000",
        ],
    );
}

#[test]
fn orb_shows_sun_label_and_legend() {
    let mut app = demo_app();
    let out = render_to_string(&mut app);
    assert_contains_all(&out, &["Budget Orb", "Burning Issues", "Status Legend", "On Track"]);
}

#[test]
fn status_bar_shows_feed_state() {
    let mut app = demo_app();
    let out = render_to_string(&mut app);
    assert_contains(&out, "feed off");
}

#[test]
fn details_hidden_without_selection() {
    let mut app = demo_app();
    let out = render_to_string(&mut app);
    assert!(!out.contains("Work Items"));
}

#[test]
fn details_panel_after_selection() {
    let mut app = demo_app();
    app.on_key(key(KeyCode::Right));
    app.on_key(key(KeyCode::Enter));
    let out = render_to_string(&mut app);
    assert_contains_all(
        &out,
        &[
            "User Authentication System",
            "Implement OAuth2",
            "Burn rate",
            "Work Items",
            "Feature Burndown",
        ],
    );
}

#[test]
fn details_queue_fade_when_opened() {
    let mut app = demo_app();
    let _ = app.select(Some(2));
    assert!(app.pending_fx.contains(&app::PendingFx::DetailsOpened));
    render_to_string(&mut app);
    assert!(app.pending_fx.is_empty(), "render should consume queued effects");
}

#[test]
fn burndown_drawer_renders() {
    let mut app = demo_app();
    app.on_key(key(KeyCode::Char('b')));
    let out = render_to_string(&mut app);
    assert_contains_all(
        &out,
        &[
            "Budget Burndown",
            "Total Budget: $180,000",
            "Remaining",
            "Spent",
            "Progress",
        ],
    );
}

#[test]
fn burndown_drawer_empty_schedule_message() {
    let mut app = demo_app();
    app.burndown.clear();
    app.on_key(key(KeyCode::Char('b')));
    let out = render_to_string(&mut app);
    assert_contains(&out, "No burndown data for this schedule yet.");
}

#[test]
fn activity_panel_lists_newest_first() {
    let mut app = demo_app();
    let out = render_to_string(&mut app);
    assert!(!out.contains("Activity"), "empty log draws nothing");

    let _ = app.apply(orb_core::store::StoreCommand::AddBurnedHours {
        feature_id: 3,
        delta: 10.0,
    });
    let _ = app.apply(orb_core::store::StoreCommand::AddBurnedHours {
        feature_id: 4,
        delta: 5.0,
    });
    let out = render_to_string(&mut app);
    assert_contains(&out, "Activity");

    let newest = out.find("Performance Optimization: +5.0h").expect("newest entry shown");
    let older = out.find("API Integration Layer: +10.0h").expect("older entry shown");
    assert!(newest < older, "newest entry should be on top");
}

#[test]
fn help_modal_renders() {
    let mut app = demo_app();
    app.on_key(key(KeyCode::Char('?')));
    let out = render_to_string(&mut app);
    assert_contains_all(&out, &["Keybindings", "Toggle burndown drawer"]);
}

#[test]
fn fullscreen_hides_header_and_details() {
    let mut app = demo_app();
    let _ = app.select(Some(1));
    app.on_key(key(KeyCode::Char('f')));
    let out = render_to_string(&mut app);
    assert_contains(&out, "full screen");
    assert!(!out.contains("Budget Status"));
    assert!(!out.contains("Work Items"));
}

#[test]
fn render_sets_orb_viewport() {
    let mut app = demo_app();
    assert!(app.orb_viewport.is_none());
    render_to_string(&mut app);
    let viewport = app.orb_viewport.expect("viewport recorded");
    assert!(viewport.area.width > 0 && viewport.area.height > 0);
    assert!(app.sun_label_area.is_some());
}

#[test]
fn tiny_terminal_does_not_panic() {
    let mut app = demo_app();
    app.on_key(key(KeyCode::Char('b')));
    let backend = TestBackend::new(20, 6);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|frame| ui::render(frame, &mut app)).unwrap();
}
