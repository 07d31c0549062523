use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};
use ratatui::Frame;

use crate::theme;

const STACK_LIMIT: usize = 4;
const CARD_WIDTH: u16 = 46;
const CARD_HEIGHT: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    /// Routine feed update.
    Info,
    /// A feature recovered to On Track.
    Success,
    /// A feature slipped, or the budget status moved.
    Warning,
    /// A command was rejected.
    Error,
}

impl ToastLevel {
    /// Worse news stays on screen longer.
    pub fn lifetime(self) -> Duration {
        match self {
            ToastLevel::Info => Duration::from_secs(3),
            ToastLevel::Success => Duration::from_secs(4),
            ToastLevel::Warning => Duration::from_secs(5),
            ToastLevel::Error => Duration::from_secs(6),
        }
    }

    fn color(self) -> Color {
        match self {
            ToastLevel::Info => theme::ACCENT,
            ToastLevel::Success => theme::REMAINING,
            ToastLevel::Warning => theme::SUN_CORONA,
            ToastLevel::Error => theme::SUN_GLOW,
        }
    }

    fn glyph(self) -> &'static str {
        match self {
            ToastLevel::Info => "+",
            ToastLevel::Success => "✓",
            ToastLevel::Warning => "!",
            ToastLevel::Error => "✗",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    shown_at: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>, level: ToastLevel) -> Self {
        Self {
            message: message.into(),
            level,
            shown_at: Instant::now(),
        }
    }

    /// Share of the lifetime left at `now`, 1.0 fresh to 0.0 gone.
    fn life_left(&self, now: Instant) -> f64 {
        let age = now.saturating_duration_since(self.shown_at).as_secs_f64();
        (1.0 - age / self.level.lifetime().as_secs_f64()).clamp(0.0, 1.0)
    }
}

/// Notification cards stacked up from the bottom-right, newest lowest.
#[derive(Default)]
pub struct ToastManager {
    stack: VecDeque<Toast>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repeating the newest message restarts its timer instead of stacking a
    /// copy. The oldest card drops off past the limit.
    pub fn push(&mut self, toast: Toast) {
        match self.stack.back_mut() {
            Some(last) if last.message == toast.message && last.level == toast.level => {
                last.shown_at = toast.shown_at;
            }
            _ => {
                self.stack.push_back(toast);
                if self.stack.len() > STACK_LIMIT {
                    self.stack.pop_front();
                }
            }
        }
    }

    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        self.stack.retain(|t| t.life_left(now) > 0.0);
    }

    /// Visible messages, oldest first.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.stack.iter().map(|t| t.message.as_str())
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let width = CARD_WIDTH.min(area.width);
        let now = Instant::now();

        for (slot, toast) in self.stack.iter().rev().enumerate() {
            let rise = (slot as u16 + 1) * (CARD_HEIGHT + 1);
            if rise > area.height {
                break;
            }
            let card = Rect::new(
                area.x + area.width - width,
                area.y + area.height - rise,
                width,
                CARD_HEIGHT,
            );

            let color = toast.level.color();
            let track = width.saturating_sub(3) as usize;
            let lit = (track as f64 * toast.life_left(now)).ceil() as usize;
            let body = Style::default().bg(theme::BG_SECONDARY);

            let lines = vec![
                Line::from(vec![
                    Span::styled("▌", Style::default().fg(color)),
                    Span::styled(
                        format!("{} ", toast.level.glyph()),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(toast.message.as_str(), Style::default().fg(theme::TEXT_PRIMARY)),
                ]),
                Line::from(vec![
                    Span::styled("▌", Style::default().fg(color)),
                    Span::styled(" ", body),
                    Span::styled("─".repeat(lit.min(track)), Style::default().fg(color)),
                ]),
            ];

            frame.render_widget(Clear, card);
            frame.render_widget(Paragraph::new(lines).style(body), card);
        }
    }
}
