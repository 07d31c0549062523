use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;

use crate::app::{App, PendingFx};
use crate::effects;
use crate::theme;
use crate::views::{self, details, header};
use crate::widgets::{help_modal, status_bar};

/// Screen regions effects can be anchored to, filled in during a render.
#[derive(Debug, Default, Clone, Copy)]
struct Regions {
    status: Option<Rect>,
    hours: Option<Rect>,
    details: Option<Rect>,
    drawer: Option<Rect>,
}

/// Master render: header, orb with details and legend, burndown drawer,
/// toasts, status bar, help overlay, then effects on top.
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(theme::BG_PRIMARY)), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(if app.fullscreen { 0 } else { header::HEIGHT }),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let mut regions = Regions::default();
    if !app.fullscreen {
        let areas = header::render(frame, app, chunks[0]);
        regions.status = Some(areas.status);
        regions.hours = Some(areas.hours);
    }

    render_body(frame, app, chunks[1], &mut regions);
    app.toasts.render(frame, chunks[1]);
    status_bar::render(frame, chunks[2], app.store.last_updated(), app.feed_state());

    if app.show_help {
        help_modal::render(frame);
    }

    queue_effects(app, regions);
    let delta = std::mem::take(&mut app.frame_delta);
    app.effects.tick_and_render(delta, frame.buffer_mut(), area);
}

fn render_body(frame: &mut Frame, app: &mut App, area: Rect, regions: &mut Regions) {
    let show_details = !app.fullscreen && app.store.selected_feature().is_some();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(if show_details { details::WIDTH } else { 0 }),
        ])
        .split(area);

    let layout = views::orb::render(frame, app, columns[0]);
    app.orb_viewport = Some(layout.viewport);
    if app.sun_label_area != Some(layout.sun_label) && !layout.sun_label.is_empty() {
        app.effects
            .add_named_in(effects::SUN_KEY, effects::glow_pulse(), layout.sun_label);
        app.sun_label_area = Some(layout.sun_label);
    }

    if !app.fullscreen {
        if app.config.display.show_legend {
            views::legend::render(frame, app, columns[0]);
        }
        views::activity::render(frame, app, columns[0]);
    }
    if show_details {
        regions.details = details::render(frame, app, columns[1]);
    }

    if app.show_burndown {
        let drawer = views::burndown::drawer_area(area);
        views::burndown::render(frame, app, drawer);
        regions.drawer = Some(drawer);
    }
}

fn queue_effects(app: &mut App, regions: Regions) {
    for fx in std::mem::take(&mut app.pending_fx) {
        match fx {
            PendingFx::DetailsOpened => {
                if let Some(area) = regions.details {
                    app.effects
                        .add_named_in(effects::DETAILS_KEY, effects::fade_in(), area);
                }
            }
            PendingFx::DrawerOpened => {
                if let Some(area) = regions.drawer {
                    app.effects
                        .add_named_in(effects::DRAWER_KEY, effects::drawer_sweep(), area);
                }
            }
            PendingFx::HoursSpark => {
                if let Some(area) = regions.hours {
                    app.effects
                        .add_named_in(effects::SPARK_KEY, effects::spark(), area);
                }
            }
            PendingFx::BudgetFlash => {
                if let Some(area) = regions.status {
                    app.effects
                        .add_in(effects::flash(theme::budget_gradient(app.store.budget_status()).1), area);
                }
            }
        }
    }
}
