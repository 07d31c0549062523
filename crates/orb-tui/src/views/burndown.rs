//! Project burndown drawer: ideal, planned and actual spend over the
//! visible part of the schedule, with summary cards underneath.

use orb_core::metrics;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Block, Borders, Chart, Clear, Dataset, GraphType, LegendPosition, Paragraph,
};
use ratatui::Frame;

use crate::app::App;
use crate::theme;
use crate::views::format_thousands;

/// Share of the body width the drawer covers.
pub const WIDTH_PERCENT: u16 = 62;

/// The drawer's rectangle: a right-hand slice of `body`.
pub fn drawer_area(body: Rect) -> Rect {
    let width = (body.width as u32 * WIDTH_PERCENT as u32 / 100) as u16;
    Rect::new(body.x + body.width - width, body.y, width, body.height)
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            " Budget Burndown ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ))
        .title(
            Line::from(Span::styled(
                format!(
                    " Total Budget: {} ",
                    metrics::format_currency(app.burndown_params.total_budget)
                ),
                Style::default().fg(theme::TEXT_SECONDARY),
            ))
            .right_aligned(),
        )
        .title_bottom(
            Line::from(Span::styled(
                " b / Esc to close ",
                Style::default().fg(theme::gradient::COSMIC.1),
            ))
            .right_aligned(),
        )
        .border_style(Style::default().fg(theme::gradient::COSMIC.0))
        .style(Style::default().bg(theme::BG_PRIMARY));
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(3)])
        .split(inner);

    render_chart(frame, app, rows[0]);
    render_summary(frame, app, rows[1]);
}

fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let series = &app.burndown;
    if series.is_empty() {
        frame.render_widget(
            Paragraph::new("No burndown data for this schedule yet.")
                .style(Style::default().fg(theme::TEXT_MUTED))
                .alignment(Alignment::Center),
            area,
        );
        return;
    }

    let collect = |f: fn(&orb_core::burndown::BurndownPoint) -> f64| -> Vec<(f64, f64)> {
        series
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, f(p)))
            .collect()
    };
    let ideal = collect(|p| p.ideal_burndown);
    let planned = collect(|p| p.planned_budget);
    let actual = collect(|p| p.actual_budget);

    let peak = series
        .iter()
        .flat_map(|p| [p.ideal_burndown, p.planned_budget, p.actual_budget])
        .fold(app.burndown_params.total_budget, f64::max);
    let y_max = (peak * 1.05).max(1.0);
    let x_max = (series.len() - 1).max(1) as f64;

    let x_labels = [
        series.first().map(|p| p.label()),
        series.get(series.len() / 2).map(|p| p.label()),
        series.last().map(|p| p.label()),
    ]
    .map(Option::unwrap_or_default);
    let y_labels = [0.0, y_max / 2.0, y_max].map(format_thousands);

    let datasets = vec![
        dataset("Ideal", &ideal, theme::CHART_IDEAL, Marker::Dot),
        dataset("Planned", &planned, theme::CHART_PLANNED, Marker::Braille),
        dataset("Actual", &actual, theme::CHART_ACTUAL, Marker::Braille),
    ];

    let axis_style = Style::default().fg(theme::TEXT_SECONDARY);
    let chart = Chart::new(datasets)
        .legend_position(Some(LegendPosition::TopRight))
        .x_axis(
            Axis::default()
                .style(axis_style)
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(axis_style)
                .bounds([0.0, y_max])
                .labels(y_labels),
        );
    frame.render_widget(chart, area);
}

fn dataset<'a>(name: &'static str, data: &'a [(f64, f64)], color: Color, marker: Marker) -> Dataset<'a> {
    Dataset::default()
        .name(name)
        .marker(marker)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(data)
}

fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let summary = &app.burndown_summary;
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);

    let cards = [
        ("Remaining", metrics::format_currency(summary.remaining), theme::REMAINING),
        ("Spent", metrics::format_currency(summary.spent), theme::SPENT),
        ("Progress", format!("{}%", summary.schedule_percent), theme::SCHEDULE),
    ];

    for (i, (title, value, color)) in cards.into_iter().enumerate() {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", title))
            .title_style(Style::default().fg(theme::TEXT_SECONDARY))
            .border_style(Style::default().fg(theme::BG_TERTIARY));
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                value,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )))
            .block(block)
            .alignment(Alignment::Center),
            cols[i],
        );
    }
}
