//! Details panel for the selected feature. Renders nothing without a
//! selection.

use orb_core::burndown;
use orb_core::types::Feature;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{
    Axis, Block, Borders, Cell, Chart, Clear, Dataset, GraphType, Paragraph, Row, Table, Wrap,
};
use ratatui::Frame;

use crate::app::App;
use crate::theme;
use crate::views::format_hours;
use crate::widgets::gauge_bar;

pub const WIDTH: u16 = 58;

/// Returns the panel area when something was drawn.
pub fn render(frame: &mut Frame, app: &App, area: Rect) -> Option<Rect> {
    let feature = app.store.selected_feature()?;
    let status = feature.status(app.store.rules());

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {} ", feature.name),
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(" Esc to close ").right_aligned())
        .border_style(Style::default().fg(theme::feature_status(status)))
        .style(Style::default().bg(theme::BG_SECONDARY));
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // description
            Constraint::Length(1), // status
            Constraint::Length(1), // timeline
            Constraint::Length(1), // hours gauge
            Constraint::Min(4),    // work items
            Constraint::Length(9), // feature burndown
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(feature.description.as_str())
            .style(Style::default().fg(theme::TEXT_SECONDARY))
            .wrap(Wrap { trim: true }),
        rows[0],
    );

    let health = feature.burn_health();
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                format!(" {} ", status.glyph()),
                Style::default().fg(theme::feature_status(status)),
            ),
            Span::styled(status.label(), Style::default().fg(theme::TEXT_PRIMARY)),
            Span::styled("   Burn rate ", Style::default().fg(theme::TEXT_MUTED)),
            Span::styled("● ", Style::default().fg(theme::burn_health(health))),
            Span::styled(health.label(), Style::default().fg(theme::TEXT_PRIMARY)),
        ])),
        rows[1],
    );

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" Start ", Style::default().fg(theme::TEXT_MUTED)),
            Span::styled(feature.start_date.to_string(), Style::default().fg(theme::TEXT_PRIMARY)),
            Span::styled("  End ", Style::default().fg(theme::TEXT_MUTED)),
            Span::styled(feature.end_date.to_string(), Style::default().fg(theme::TEXT_PRIMARY)),
            Span::styled(
                format!("  ({} days)", feature.duration_days()),
                Style::default().fg(theme::TEXT_MUTED),
            ),
        ])),
        rows[2],
    );

    let hours_label = format!(
        "{}/{}h",
        format_hours(feature.burned_hours),
        format_hours(feature.planned_hours)
    );
    gauge_bar::render_gauge(
        frame,
        rows[3],
        &hours_label,
        feature.progress(),
        theme::feature_status(status),
    );

    render_work_items(frame, feature, rows[4]);
    render_feature_chart(frame, app, feature, rows[5]);

    Some(area)
}

fn render_work_items(frame: &mut Frame, feature: &Feature, area: Rect) {
    let header = Row::new(["Type", "Work item", "State", "Hours"])
        .style(
            Style::default()
                .fg(theme::TEXT_SECONDARY)
                .add_modifier(Modifier::BOLD),
        );

    let rows: Vec<Row> = feature
        .work_items
        .iter()
        .map(|item| {
            let mut title = vec![Line::from(Span::styled(
                item.title.clone(),
                Style::default().fg(theme::TEXT_PRIMARY),
            ))];
            let commit = match item.latest_commit() {
                Some(c) => format!("↳ {} ({}, {}h)", c.message, c.author, format_hours(c.time_spent)),
                None => format!("↳ {}", item.assigned_to),
            };
            title.push(Line::from(Span::styled(commit, Style::default().fg(theme::TEXT_MUTED))));

            Row::new(vec![
                Cell::from(item.kind.label()).style(Style::default().fg(theme::TEXT_MUTED)),
                Cell::from(Text::from(title)),
                Cell::from(item.state.label())
                    .style(Style::default().fg(theme::work_item_state(item.state))),
                Cell::from(format!(
                    "{}/{}",
                    format_hours(item.burned_hours),
                    format_hours(item.planned_hours)
                )),
            ])
            .height(2)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Min(20),
            Constraint::Length(8),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::TOP)
            .title(" Work Items ")
            .border_style(Style::default().fg(theme::BG_TERTIARY)),
    );
    frame.render_widget(table, area);
}

fn render_feature_chart(frame: &mut Frame, app: &App, feature: &Feature, area: Rect) {
    let points = burndown::feature_burndown(feature, app.today());
    let Some(origin) = points.first().map(|p| p.date) else {
        return;
    };

    let day = |d: chrono::NaiveDate| (d - origin).num_days() as f64;
    let planned: Vec<(f64, f64)> = points.iter().map(|p| (day(p.date), p.planned)).collect();
    let actual: Vec<(f64, f64)> = points.iter().map(|p| (day(p.date), p.actual)).collect();

    let x_min = planned.iter().map(|p| p.0).fold(0.0, f64::min);
    let x_max = planned.iter().map(|p| p.0).fold(1.0, f64::max);
    let y_max = (feature.planned_hours.max(feature.burned_hours) * 1.1).max(1.0);

    let first = points.first().map(|p| p.date.format("%b %-d").to_string());
    let last = points.last().map(|p| p.date.format("%b %-d").to_string());

    let datasets = vec![
        Dataset::default()
            .name("Planned")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme::CHART_PLANNED))
            .data(&planned),
        Dataset::default()
            .name("Actual")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme::CHART_ACTUAL))
            .data(&actual),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .title(" Feature Burndown ")
                .border_style(Style::default().fg(theme::CHART_GRID)),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(theme::TEXT_SECONDARY))
                .bounds([x_min, x_max])
                .labels([first.unwrap_or_default(), last.unwrap_or_default()]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(theme::TEXT_SECONDARY))
                .bounds([0.0, y_max])
                .labels(["0".to_string(), format!("{}h", y_max.round())]),
        );
    frame.render_widget(chart, area);
}
