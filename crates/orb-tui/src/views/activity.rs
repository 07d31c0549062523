//! Recent activity, newest first, pinned to the top-right of the orb area.

use chrono::Local;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::theme;

const WIDTH: u16 = 60;
/// Entries shown; the full log is kept in [`App::activity`].
const ROWS: usize = 6;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if app.activity.is_empty() || area.width < 24 || area.height < 4 {
        return;
    }
    let rows = app.activity.len().min(ROWS).min(area.height as usize - 3);
    let width = WIDTH.min(area.width - 2);
    let rect = Rect::new(
        area.x + area.width - width - 1,
        area.y + 1,
        width,
        rows as u16 + 2,
    );

    let lines: Vec<Line> = app
        .activity
        .iter()
        .take(rows)
        .map(|entry| {
            Line::from(vec![
                Span::styled(
                    entry.timestamp.with_timezone(&Local).format(" %H:%M:%S ").to_string(),
                    Style::default().fg(theme::TEXT_MUTED),
                ),
                Span::styled(entry.message.as_str(), Style::default().fg(theme::TEXT_PRIMARY)),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Activity ")
        .title_style(
            Style::default()
                .fg(theme::gradient::NEBULA.1)
                .add_modifier(Modifier::BOLD),
        )
        .border_style(Style::default().fg(theme::gradient::NEBULA.0))
        .style(Style::default().bg(theme::BG_SECONDARY));

    frame.render_widget(Clear, rect);
    frame.render_widget(Paragraph::new(lines).block(block), rect);
}
