//! Scriptable control of the dashboard.
//!
//! Two input forms are accepted:
//! - **Text**: `:` prefixed commands, e.g. `:select 3`, `:burn 2 400`.
//! - **JSON**: `{"cmd":"select","args":[3]}`, one object per line.
//!
//! Queries return serialized state as JSON strings, so a script can drive
//! the dashboard in `--headless` mode without a terminal.

use orb_core::store::StoreCommand;
use serde_json::json;

use crate::app::App;

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    // Selection
    Select(u32),
    Deselect,
    HoverNext,
    HoverPrev,

    // Data
    SetHours { feature_id: u32, hours: f64 },
    AddHours { feature_id: u32, delta: f64 },
    Tick,

    // View
    ToggleBurndown,
    ToggleFullscreen,
    PauseFeed,

    // Queries
    QueryState,
    QuerySelected,
    QueryBurndown,

    // System
    Quit,
    Help,
}

// ---------------------------------------------------------------------------
// Text command parser
// ---------------------------------------------------------------------------

/// Parse a `:` prefixed command string.
pub fn parse_command(input: &str) -> Option<AppCommand> {
    let input = input.trim().strip_prefix(':')?;
    let mut parts = input.split_whitespace();
    let verb = parts.next()?;
    let args: Vec<&str> = parts.collect();

    let id_arg = |idx: usize| -> Option<u32> { args.get(idx)?.parse().ok() };
    let hours_arg = |idx: usize| -> Option<f64> { args.get(idx)?.parse().ok() };

    match verb {
        "select" | "sel" => Some(AppCommand::Select(id_arg(0)?)),
        "deselect" | "clear" => Some(AppCommand::Deselect),
        "hover" => match *args.first()? {
            "next" => Some(AppCommand::HoverNext),
            "prev" => Some(AppCommand::HoverPrev),
            _ => None,
        },
        "burn" => Some(AppCommand::SetHours {
            feature_id: id_arg(0)?,
            hours: hours_arg(1)?,
        }),
        "add" => Some(AppCommand::AddHours {
            feature_id: id_arg(0)?,
            delta: hours_arg(1)?,
        }),
        "tick" => Some(AppCommand::Tick),
        "burndown" | "sun" => Some(AppCommand::ToggleBurndown),
        "fullscreen" | "f" => Some(AppCommand::ToggleFullscreen),
        "pause" => Some(AppCommand::PauseFeed),
        "query" => match *args.first()? {
            "state" => Some(AppCommand::QueryState),
            "selected" => Some(AppCommand::QuerySelected),
            "burndown" => Some(AppCommand::QueryBurndown),
            _ => None,
        },
        "quit" | "q" => Some(AppCommand::Quit),
        "help" | "?" => Some(AppCommand::Help),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// JSON command parser
// ---------------------------------------------------------------------------

/// Parse `{"cmd":"burn","args":[2, 400]}` style commands.
pub fn parse_json_command(input: &str) -> Option<AppCommand> {
    let v: serde_json::Value = serde_json::from_str(input).ok()?;
    let cmd = v.get("cmd")?.as_str()?;
    let args = v.get("args");

    let arg_id = |idx: usize| -> Option<u32> {
        args?
            .as_array()?
            .get(idx)?
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
    };
    let arg_f64 = |idx: usize| -> Option<f64> { args?.as_array()?.get(idx)?.as_f64() };

    match cmd {
        "select" => Some(AppCommand::Select(arg_id(0)?)),
        "deselect" => Some(AppCommand::Deselect),
        "hover_next" => Some(AppCommand::HoverNext),
        "hover_prev" => Some(AppCommand::HoverPrev),
        "burn" | "set_hours" => Some(AppCommand::SetHours {
            feature_id: arg_id(0)?,
            hours: arg_f64(1)?,
        }),
        "add_hours" => Some(AppCommand::AddHours {
            feature_id: arg_id(0)?,
            delta: arg_f64(1)?,
        }),
        "tick" => Some(AppCommand::Tick),
        "toggle_burndown" | "burndown" => Some(AppCommand::ToggleBurndown),
        "toggle_fullscreen" => Some(AppCommand::ToggleFullscreen),
        "pause_feed" => Some(AppCommand::PauseFeed),
        "query_state" => Some(AppCommand::QueryState),
        "query_selected" => Some(AppCommand::QuerySelected),
        "query_burndown" => Some(AppCommand::QueryBurndown),
        "quit" => Some(AppCommand::Quit),
        "help" => Some(AppCommand::Help),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// Execute a command against the dashboard.
///
/// Returns `Some(json)` for queries and rejected store commands, `None`
/// otherwise.
pub fn execute_command(app: &mut App, cmd: AppCommand) -> Option<String> {
    match cmd {
        AppCommand::Select(id) => {
            let _ = app.select(Some(id));
            None
        }
        AppCommand::Deselect => {
            let _ = app.select(None);
            None
        }
        AppCommand::HoverNext => {
            app.hover_next();
            None
        }
        AppCommand::HoverPrev => {
            app.hover_prev();
            None
        }

        AppCommand::SetHours { feature_id, hours } => apply_or_error(
            app,
            StoreCommand::UpdateBurnedHours {
                feature_id,
                burned_hours: hours,
            },
        ),
        AppCommand::AddHours { feature_id, delta } => {
            apply_or_error(app, StoreCommand::AddBurnedHours { feature_id, delta })
        }
        AppCommand::Tick => {
            app.on_feed_tick();
            None
        }

        AppCommand::ToggleBurndown => {
            app.toggle_burndown();
            None
        }
        AppCommand::ToggleFullscreen => {
            app.toggle_fullscreen();
            None
        }
        AppCommand::PauseFeed => {
            app.toggle_feed();
            None
        }

        AppCommand::QueryState => serde_json::to_string(&state_json(app)).ok(),
        AppCommand::QuerySelected => serde_json::to_string(&selected_json(app)).ok(),
        AppCommand::QueryBurndown => serde_json::to_string(&burndown_json(app)).ok(),

        AppCommand::Quit => {
            app.should_quit = true;
            None
        }
        AppCommand::Help => {
            app.show_help = true;
            None
        }
    }
}

fn apply_or_error(app: &mut App, command: StoreCommand) -> Option<String> {
    match app.apply(command) {
        Ok(()) => None,
        Err(e) => serde_json::to_string(&json!({
            "event": "error",
            "message": e.to_string(),
        }))
        .ok(),
    }
}

// ---------------------------------------------------------------------------
// Serialization helpers
// ---------------------------------------------------------------------------

fn state_json(app: &App) -> serde_json::Value {
    json!({
        "project": app.store.snapshot(),
        "hovered": app.hovered_feature().map(|f| f.id),
        "show_burndown": app.show_burndown,
        "fullscreen": app.fullscreen,
        "feed": format!("{:?}", app.feed_state()).to_lowercase(),
        "show_help": app.show_help,
        "toasts": app.toasts.messages().collect::<Vec<_>>(),
        "activity": app
            .activity
            .iter()
            .map(|e| json!({"at": e.timestamp, "message": e.message}))
            .collect::<Vec<_>>(),
    })
}

fn selected_json(app: &App) -> serde_json::Value {
    match app.store.selected_feature() {
        Some(feature) => json!({
            "feature": feature,
            "status": feature.status(app.store.rules()),
            "progress": feature.progress(),
            "burn_health": feature.burn_health(),
            "remaining_hours": feature.remaining_hours(),
        }),
        None => serde_json::Value::Null,
    }
}

fn burndown_json(app: &App) -> serde_json::Value {
    let params = &app.burndown_params;
    json!({
        "total_budget": params.total_budget,
        "start_date": params.start_date,
        "end_date": params.end_date,
        "days": app.burndown.len(),
        "summary": app.burndown_summary,
        "points": app.burndown,
    })
}
