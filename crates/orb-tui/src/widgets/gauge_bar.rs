use orb_core::metrics;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::theme;

/// Horizontal hour gauge: ` Hours [██████░░░░] 88% `.
///
/// The bar fills to at most 100% but the label keeps the real figure, so an
/// overspent feature reads `119%` over a full bar. Unknown progress draws an
/// empty bar labelled `--%`.
pub fn render_gauge(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    progress: Option<f64>,
    color: Color,
) {
    let pct_text = format!(" {}", metrics::format_percent(progress));
    let label_display = format!(" {}", label);
    let overhead = label_display.chars().count() + 2 + 1 + pct_text.len();
    let bar_width = (area.width as usize).saturating_sub(overhead);

    if bar_width == 0 || area.height == 0 {
        return;
    }

    let fraction = progress.map(|p| (p / 100.0).clamp(0.0, 1.0)).unwrap_or(0.0);
    let filled_count = (bar_width as f64 * fraction).round() as usize;
    let empty_count = bar_width.saturating_sub(filled_count);

    let line = Line::from(vec![
        Span::styled(label_display, Style::default().fg(theme::TEXT_SECONDARY)),
        Span::raw(" ["),
        Span::styled("\u{2588}".repeat(filled_count), Style::default().fg(color)),
        Span::styled("\u{2591}".repeat(empty_count), Style::default().fg(theme::BG_TERTIARY)),
        Span::raw("]"),
        Span::styled(pct_text, Style::default().fg(theme::TEXT_PRIMARY)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn draw(progress: Option<f64>) -> String {
        let backend = TestBackend::new(40, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_gauge(frame, area, "Hours", progress, theme::ON_TRACK);
            })
            .unwrap();
        let buf = terminal.backend().buffer();
        (0..40).map(|x| buf[(x, 0)].symbol().to_string()).collect()
    }

    #[test]
    fn overspend_fills_the_bar_but_keeps_the_figure() {
        let line = draw(Some(118.75));
        assert!(line.contains("119%"));
        assert!(!line.contains('\u{2591}'));
    }

    #[test]
    fn zero_progress_is_empty() {
        let line = draw(Some(0.0));
        assert!(line.contains("0%"));
        assert!(!line.contains('\u{2588}'));
    }

    #[test]
    fn unknown_progress() {
        let line = draw(None);
        assert!(line.contains("--%"));
    }
}
