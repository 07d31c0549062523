use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::theme;

const BINDINGS: &[(&str, &str)] = &[
    ("← / h", "Hover previous segment"),
    ("→ / l", "Hover next segment"),
    ("Enter", "Select hovered feature"),
    ("click", "Select segment / toggle burndown on the sun"),
    ("b / s", "Toggle burndown drawer"),
    ("f", "Toggle full-screen orb"),
    ("p", "Pause / resume live feed"),
    ("Esc", "Close drawer, leave full screen, clear selection"),
    ("?", "Toggle this help"),
    ("q / Ctrl-c", "Quit"),
];

/// Centered key binding overlay.
pub fn render(frame: &mut Frame) {
    let area = centered_rect(60, 60, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled(
            "  Keybindings",
            Style::default()
                .fg(theme::SUN_CORE)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(BINDINGS.iter().map(|(key, desc)| help_line(key, desc)));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Press ? or Esc to close",
        Style::default().fg(theme::TEXT_MUTED),
    )));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .border_style(Style::default().fg(theme::ACCENT))
            .style(Style::default().bg(theme::BG_SECONDARY)),
    );

    frame.render_widget(paragraph, area);
}

fn help_line(key: &str, desc: &str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(
            format!("{:<14}", key),
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(desc.to_string(), Style::default().fg(theme::TEXT_PRIMARY)),
    ])
}

/// A rectangle covering `percent_x` by `percent_y` of `parent`, centered.
pub fn centered_rect(percent_x: u16, percent_y: u16, parent: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(parent);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
