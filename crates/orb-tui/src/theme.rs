//! Dashboard palette.
//!
//! Feature and budget statuses share the same three blues so the orb, legend
//! and details panel always agree on colour.

use orb_core::metrics::BurnHealth;
use orb_core::types::{BudgetStatus, FeatureStatus, WorkItemState};
use ratatui::style::Color;

const fn hex(rgb: u32) -> Color {
    Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

pub const PRIMARY: Color = hex(0x5B8CAD);
pub const SECONDARY: Color = hex(0x4B8B9D);
pub const ACCENT: Color = hex(0xA1C6D4);

pub const SUCCESS: Color = hex(0x4B8B9D);
pub const WARNING: Color = hex(0x5B8CAD);
pub const DANGER: Color = hex(0xF4F9FF);

pub const ON_TRACK: Color = hex(0x4B8B9D);
pub const AT_RISK: Color = hex(0x5B8CAD);
pub const DELAYED: Color = hex(0xA1C6D4);

pub const BG_PRIMARY: Color = hex(0x0F172A);
pub const BG_SECONDARY: Color = hex(0x1E293B);
pub const BG_TERTIARY: Color = hex(0x334155);

pub const TEXT_PRIMARY: Color = hex(0xF4F9FF);
pub const TEXT_SECONDARY: Color = hex(0xA1C6D4);
pub const TEXT_MUTED: Color = hex(0x4B8B9D);

pub const SUN_CORE: Color = hex(0xFDB813);
pub const SUN_GLOW: Color = hex(0xFF6B00);
pub const SUN_FLARE: Color = hex(0xFF8C00);
pub const SUN_CORONA: Color = hex(0xFFA500);

pub const CHART_IDEAL: Color = hex(0x4B8B9D);
pub const CHART_PLANNED: Color = hex(0x3B82F6);
pub const CHART_ACTUAL: Color = hex(0xF59E0B);
pub const CHART_GRID: Color = hex(0x2A4A6D);

pub const REMAINING: Color = hex(0x4ADE80);
pub const SPENT: Color = hex(0x60A5FA);
pub const SCHEDULE: Color = hex(0x22D3EE);

/// Two-stop gradients for filled shapes.
pub mod gradient {
    use super::hex;
    use ratatui::style::Color;

    pub const HEALTHY: (Color, Color) = (hex(0x4B8B9D), hex(0xA1C6D4));
    pub const WARNING: (Color, Color) = (hex(0x5B8CAD), hex(0x4B8B9D));
    pub const CRITICAL: (Color, Color) = (hex(0xA1C6D4), hex(0xF4F9FF));
    pub const COSMIC: (Color, Color) = (hex(0x5B8CAD), hex(0xA1C6D4));
    pub const NEBULA: (Color, Color) = (hex(0x4B8B9D), hex(0xF4F9FF));
}

pub fn feature_status(status: FeatureStatus) -> Color {
    match status {
        FeatureStatus::OnTrack => ON_TRACK,
        FeatureStatus::AtRisk => AT_RISK,
        FeatureStatus::Delayed => DELAYED,
    }
}

pub fn budget_status(status: BudgetStatus) -> Color {
    match status {
        BudgetStatus::Healthy => SUCCESS,
        BudgetStatus::Warning => WARNING,
        BudgetStatus::Critical => DANGER,
    }
}

pub fn budget_gradient(status: BudgetStatus) -> (Color, Color) {
    match status {
        BudgetStatus::Healthy => gradient::HEALTHY,
        BudgetStatus::Warning => gradient::WARNING,
        BudgetStatus::Critical => gradient::CRITICAL,
    }
}

pub fn burn_health(health: BurnHealth) -> Color {
    match health {
        BurnHealth::Healthy => SUCCESS,
        BurnHealth::AtRisk => WARNING,
        BurnHealth::OverBudget => DANGER,
    }
}

pub fn work_item_state(state: WorkItemState) -> Color {
    match state {
        WorkItemState::Closed => SUCCESS,
        WorkItemState::Active => WARNING,
        _ => TEXT_MUTED,
    }
}

/// Linear blend between two RGB colours. Non-RGB inputs return `a` below the
/// midpoint and `b` above it.
pub fn lerp(a: Color, b: Color, t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    match (a, b) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
            Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
        }
        _ if t < 0.5 => a,
        _ => b,
    }
}

/// Multiply each channel by `factor` (clamped to the valid range).
pub fn scale(color: Color, factor: f64) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let f = |c: u8| (c as f64 * factor).round().clamp(0.0, 255.0) as u8;
            Color::Rgb(f(r), f(g), f(b))
        }
        other => other,
    }
}
