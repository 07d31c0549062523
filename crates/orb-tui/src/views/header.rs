use orb_core::metrics;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::theme;
use crate::views::format_hours;

pub const HEIGHT: u16 = 4;

/// Cells that state changes flash over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderAreas {
    pub status: Rect,
    pub hours: Rect,
}

/// Title line and the four stat cards.
pub fn render(frame: &mut Frame, app: &App, area: Rect) -> HeaderAreas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(3)])
        .split(area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {}", app.store.project().name),
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", app.config.general.project_name),
            Style::default().fg(theme::TEXT_MUTED),
        ),
    ]));
    frame.render_widget(title, rows[0]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(rows[1]);

    let project = app.store.project();
    let status = app.store.budget_status();
    let status_color = theme::budget_status(status);

    let status_line = Line::from(vec![
        Span::styled("● ", Style::default().fg(status_color)),
        Span::styled(
            status.label(),
            Style::default()
                .fg(theme::TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    let progress_line = value_line(metrics::format_percent(project.overall_progress()));
    let hours_line = value_line(format!(
        "{}/{}",
        format_hours(project.total_burned_hours()),
        format_hours(project.total_planned_hours())
    ));
    let budget_line = value_line(format!(
        "{} / {}",
        metrics::format_currency(project.actual_spent()),
        metrics::format_currency(project.total_budget())
    ));

    let cards = [
        ("Budget Status", status_line, status_color),
        ("Progress", progress_line, theme::PRIMARY),
        ("Hours", hours_line, theme::SECONDARY),
        ("Spent / Budget", budget_line, theme::ACCENT),
    ];

    for (i, (title, line, color)) in cards.into_iter().enumerate() {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", title))
            .title_style(Style::default().fg(theme::TEXT_SECONDARY))
            .border_style(Style::default().fg(color));
        frame.render_widget(
            Paragraph::new(line)
                .block(block)
                .alignment(Alignment::Center),
            cols[i],
        );
    }

    HeaderAreas {
        status: inner(cols[0]),
        hours: inner(cols[2]),
    }
}

fn value_line(text: String) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default()
            .fg(theme::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD),
    ))
}

fn inner(card: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(card)
}
