//! The orb: a slowly spinning ring of feature segments around a pulsing sun,
//! drawn on a braille canvas in an oblique projection.

use std::f64::consts::TAU;

use orb_core::orb::{sun_shade, LABEL_OFFSET};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine, Points};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{App, OrbViewport, SUN_RADIUS_FACTOR};
use crate::theme;

pub const SUN_LABEL: &str = "Burning Issues";

const SAMPLES_PER_SEGMENT: usize = 24;
const WALL_STRIDE: usize = 4;
const SHADE_LEVELS: usize = 6;
const LABEL_MAX_CHARS: usize = 18;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbLayout {
    pub viewport: OrbViewport,
    pub sun_label: Rect,
}

#[derive(Debug, Clone, Copy)]
struct SunGeometry {
    center_y: f64,
    radius: f64,
    glow_radius: f64,
}

impl SunGeometry {
    fn new(app: &App) -> Self {
        let display = &app.config.display;
        let pulse = app.sun.pulse();
        let base = display.orb_radius * SUN_RADIUS_FACTOR;
        Self {
            center_y: display.segment_height / 2.0 * app.projection.lift,
            radius: base * pulse.scale,
            glow_radius: base * pulse.glow_scale,
        }
    }
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) -> OrbLayout {
    let display = &app.config.display;
    let proj = app.projection;
    let radius = display.orb_radius;
    let x_bounds = [-(radius + 2.0), radius + 2.0];
    let y_bounds = [
        -(radius * proj.tilt + 1.5),
        radius * proj.tilt + display.segment_height * proj.lift + 1.5,
    ];

    let title = if app.fullscreen {
        " Budget Orb · full screen "
    } else {
        " Budget Orb "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_style(Style::default().fg(theme::TEXT_SECONDARY))
        .border_style(Style::default().fg(theme::BG_TERTIARY));
    let inner = block.inner(area);
    let viewport = OrbViewport {
        area: inner,
        x_bounds,
        y_bounds,
    };

    if inner.width == 0 || inner.height == 0 {
        frame.render_widget(block, area);
        return OrbLayout {
            viewport,
            sun_label: Rect::default(),
        };
    }

    let sun = SunGeometry::new(app);
    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .background_color(theme::BG_PRIMARY)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            draw_ring(ctx, app, false);
            ctx.layer();
            draw_sun(ctx, app, sun, &viewport);
            ctx.layer();
            draw_ring(ctx, app, true);
            ctx.layer();
            draw_labels(ctx, app, &viewport);
        });
    frame.render_widget(canvas, area);

    // Drawn as a widget rather than on the canvas so effects can target it.
    let label_width = SUN_LABEL.chars().count() as u16;
    let (col, row) = viewport.to_cell(0.0, sun.center_y - sun.glow_radius - 0.3);
    let sun_label = Rect::new(
        col.saturating_sub(label_width / 2).max(inner.x),
        row,
        label_width,
        1,
    )
    .intersection(inner);
    frame.render_widget(
        Paragraph::new(Span::styled(
            SUN_LABEL,
            Style::default()
                .fg(theme::SUN_CORONA)
                .add_modifier(Modifier::BOLD),
        )),
        sun_label,
    );

    OrbLayout { viewport, sun_label }
}

fn segment_color(app: &App, feature_id: u32) -> Color {
    let base = app
        .store
        .feature_status(feature_id)
        .map(theme::feature_status)
        .unwrap_or(theme::TEXT_MUTED);
    if app.hovered_feature().map(|f| f.id) == Some(feature_id) {
        theme::ACCENT
    } else if app.store.selected_id() == Some(feature_id) {
        theme::lerp(base, theme::TEXT_PRIMARY, 0.4)
    } else {
        base
    }
}

fn draw_ring(ctx: &mut Context, app: &App, front: bool) {
    let proj = app.projection;
    let rotation = app.rotation.angle();
    let shade = if front { 1.0 } else { 0.45 };

    for segment in &app.segments {
        let color = segment_color(app, segment.feature_id);
        let rim = theme::scale(color, shade);
        let wall = theme::scale(color, shade * 0.6);
        let over = app
            .store
            .feature(segment.feature_id)
            .and_then(|f| f.burn_ratio())
            .is_some_and(|r| r > 1.0);
        let marker = theme::scale(
            if over { theme::SUN_CORONA } else { theme::TEXT_PRIMARY },
            shade,
        );

        let gap = (segment.sweep() * 0.04).min(0.05);
        let start = segment.start_angle + gap;
        let span = segment.sweep() - 2.0 * gap;
        let (top, bottom, height) = (segment.top_radius, segment.bottom_radius, segment.height);

        // Progress marker: follows the wall while inside it, then rises
        // straight up at the rim when overspent.
        let level = segment.progress_height;
        let marker_radius = bottom + (top - bottom) * (level / height).clamp(0.0, 1.0);

        let mut prev: Option<f64> = None;
        for k in 0..=SAMPLES_PER_SEGMENT {
            let angle = start + span * k as f64 / SAMPLES_PER_SEGMENT as f64 + rotation;
            if proj.is_front(angle) != front {
                prev = None;
                continue;
            }

            if let Some(p) = prev {
                line(ctx, proj.project(p, top, height), proj.project(angle, top, height), rim);
                line(ctx, proj.project(p, bottom, 0.0), proj.project(angle, bottom, 0.0), rim);
                if level > 0.0 {
                    line(
                        ctx,
                        proj.project(p, marker_radius, level),
                        proj.project(angle, marker_radius, level),
                        marker,
                    );
                }
            }

            let edge = k == 0 || k == SAMPLES_PER_SEGMENT;
            if edge || k % WALL_STRIDE == 0 {
                line(
                    ctx,
                    proj.project(angle, bottom, 0.0),
                    proj.project(angle, top, height),
                    if edge { rim } else { wall },
                );
            }
            prev = Some(angle);
        }
    }
}

fn line(ctx: &mut Context, from: (f64, f64), to: (f64, f64), color: Color) {
    ctx.draw(&CanvasLine::new(from.0, from.1, to.0, to.1, color));
}

fn draw_sun(ctx: &mut Context, app: &App, sun: SunGeometry, viewport: &OrbViewport) {
    let pulse = app.sun.pulse();

    for i in 0..3 {
        let t = (i + 1) as f64 / 3.0;
        let color = theme::scale(
            theme::lerp(theme::SUN_GLOW, theme::SUN_FLARE, i as f64 / 2.0),
            pulse.brightness * (1.0 - i as f64 * 0.25),
        );
        ctx.draw(&Circle {
            x: 0.0,
            y: sun.center_y,
            radius: sun.radius + (sun.glow_radius - sun.radius) * t,
            color,
        });
    }

    let (dx, dy) = viewport.dot_size();
    if !(dx.is_finite() && dy.is_finite() && dx > 0.0 && dy > 0.0) {
        return;
    }

    let r = sun.radius;
    let elapsed = app.sun.elapsed();
    let spin = app.sun.spin() / TAU;
    let mut buckets: Vec<Vec<(f64, f64)>> = vec![Vec::new(); SHADE_LEVELS];

    let mut y = sun.center_y - r;
    while y <= sun.center_y + r {
        let mut x = -r;
        while x <= r {
            let dist = x.hypot(y - sun.center_y) / r;
            if dist <= 1.0 {
                let u = (x / r * 0.5 + 0.5 + spin).fract();
                let v = (y - sun.center_y) / r * 0.5 + 0.5;
                let shade = sun_shade(u, v, dist, elapsed);
                let level = (shade.glow_mix * (SHADE_LEVELS - 1) as f64).round() as usize;
                buckets[level.min(SHADE_LEVELS - 1)].push((x, y));
            }
            x += dx;
        }
        y += dy;
    }

    let brightness = 0.55 + 0.45 * pulse.brightness;
    for (level, coords) in buckets.iter().enumerate() {
        if coords.is_empty() {
            continue;
        }
        let t = level as f64 / (SHADE_LEVELS - 1) as f64;
        ctx.draw(&Points {
            coords: coords.as_slice(),
            color: theme::scale(theme::lerp(theme::SUN_CORE, theme::SUN_GLOW, t), brightness),
        });
    }
}

fn draw_labels(ctx: &mut Context, app: &App, viewport: &OrbViewport) {
    let proj = app.projection;
    let rotation = app.rotation.angle();
    let column = viewport.column_width();
    let [x0, x1] = viewport.x_bounds;

    for segment in &app.segments {
        let Some(feature) = app.store.feature(segment.feature_id) else {
            continue;
        };
        let angle = segment.mid_angle() + rotation;
        let front = proj.is_front(angle);
        let (x, y) = proj.project(angle, segment.top_radius + LABEL_OFFSET, segment.height);

        let text = format!(
            "{} {}",
            truncate(&feature.name, LABEL_MAX_CHARS),
            orb_core::metrics::format_percent(feature.progress())
        );
        let width = text.chars().count() as f64 * column;
        let left = (x - width / 2.0).clamp(x0, (x1 - width).max(x0));

        let style = if front {
            Style::default()
                .fg(theme::TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme::TEXT_MUTED)
        };
        ctx.print(left, y + 0.4, Line::from(Span::styled(text, style)));
    }
}

fn truncate(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        name.to_string()
    } else {
        let mut out: String = name.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
