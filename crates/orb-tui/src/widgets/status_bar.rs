use chrono::{DateTime, Local, Utc};
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::theme;

/// State of the live feed as shown on the right of the bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    Live,
    Paused,
    Off,
}

impl FeedState {
    fn label(&self) -> &'static str {
        match self {
            FeedState::Live => "feed live",
            FeedState::Paused => "feed paused",
            FeedState::Off => "feed off",
        }
    }
}

/// Bottom bar: key hints on the left, feed state and the store's last update
/// on the right.
pub fn render(frame: &mut Frame, area: Rect, last_updated: DateTime<Utc>, feed: FeedState) {
    let key = Style::default().fg(theme::SUN_CORE);
    let text = Style::default().fg(theme::TEXT_PRIMARY);

    let left = vec![
        Span::styled("[←/→]", key),
        Span::styled(" Hover  ", text),
        Span::styled("[Enter]", key),
        Span::styled(" Select  ", text),
        Span::styled("[b]", key),
        Span::styled(" Burndown  ", text),
        Span::styled("[p]", key),
        Span::styled(" Pause  ", text),
        Span::styled("[?]", key),
        Span::styled(" Help  ", text),
        Span::styled("[q]", key),
        Span::styled(" Quit", text),
    ];

    let right_text = format!(
        "{} · updated {}",
        feed.label(),
        last_updated.with_timezone(&Local).format("%H:%M:%S")
    );

    // Pad between the two halves; ratatui has no split alignment in one line.
    let left_width: usize = left.iter().map(|s| s.content.width()).sum();
    let total_width = area.width as usize;
    let padding = total_width
        .checked_sub(left_width + right_text.width())
        .unwrap_or(1)
        .max(1);

    let mut spans = left;
    spans.push(Span::raw(" ".repeat(padding)));
    spans.push(Span::styled(right_text, Style::default().fg(theme::TEXT_SECONDARY)));

    let bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme::BG_TERTIARY));
    frame.render_widget(bar, area);
}
