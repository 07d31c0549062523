use orb_core::types::FeatureStatus;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::theme;

const WIDTH: u16 = 22;
const HEIGHT: u16 = 5;

/// Status legend in the bottom-left corner of `area`, with a feature count
/// per status.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if area.width < WIDTH + 2 || area.height < HEIGHT + 2 {
        return;
    }
    let rect = Rect::new(area.x + 1, area.y + area.height - HEIGHT - 1, WIDTH, HEIGHT);

    let lines: Vec<Line> = [
        FeatureStatus::OnTrack,
        FeatureStatus::AtRisk,
        FeatureStatus::Delayed,
    ]
    .into_iter()
    .map(|status| {
        let count = app
            .store
            .features()
            .iter()
            .filter(|f| f.status(app.store.rules()) == status)
            .count();
        Line::from(vec![
            Span::styled(
                format!(" {} ", status.glyph()),
                Style::default().fg(theme::feature_status(status)),
            ),
            Span::styled(
                format!("{:<10}", status.label()),
                Style::default().fg(theme::TEXT_PRIMARY),
            ),
            Span::styled(format!("{:>3}", count), Style::default().fg(theme::TEXT_MUTED)),
        ])
    })
    .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Status Legend ")
        .title_style(
            Style::default()
                .fg(theme::TEXT_SECONDARY)
                .add_modifier(Modifier::BOLD),
        )
        .border_style(Style::default().fg(theme::BG_TERTIARY))
        .style(Style::default().bg(theme::BG_SECONDARY));

    frame.render_widget(Clear, rect);
    frame.render_widget(Paragraph::new(lines).block(block), rect);
}
