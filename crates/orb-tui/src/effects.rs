//! Visual effects for the dashboard, powered by tachyonfx.
//!
//! Effects are created with a target area and handed to the
//! [`EffectManager`], which paints them over the already rendered frame.

use std::time::Duration;

use ratatui::{buffer::Buffer, layout::Rect, style::Color};
use tachyonfx::{fx, Effect, EffectManager as TachyonManager, Interpolation, Motion};

use crate::theme;

/// Effect keys. Re-adding a key replaces the running effect.
pub const DETAILS_KEY: &str = "details-open";
pub const DRAWER_KEY: &str = "drawer-open";
pub const SUN_KEY: &str = "sun-glow";
pub const SPARK_KEY: &str = "hours-spark";

// ---------------------------------------------------------------------------
// Effect factories
// ---------------------------------------------------------------------------

/// Cells emerge from the panel background over 350 ms.
pub fn fade_in() -> Effect {
    let bg = theme::BG_PRIMARY;
    fx::fade_from(bg, bg, (350, Interpolation::QuadOut))
}

/// Content sweeps in from the right edge over 300 ms, like a drawer sliding
/// open.
pub fn drawer_sweep() -> Effect {
    fx::sweep_in(
        Motion::RightToLeft,
        10,
        3,
        theme::BG_PRIMARY,
        (300, Interpolation::QuadOut),
    )
}

/// Endless hue oscillation on the foreground. Cancel by replacing the key or
/// calling [`EffectManager::remove_all`].
pub fn glow_pulse() -> Effect {
    let forward = fx::hsl_shift_fg([20.0, 0.2, 0.15], (400, Interpolation::SineInOut));
    let back = fx::hsl_shift_fg([-20.0, -0.2, -0.15], (400, Interpolation::SineInOut));
    fx::repeating(fx::sequence(&[forward, back]))
}

/// Quick scatter and snap back, roughly 600 ms, used when hours tick up.
pub fn spark() -> Effect {
    let out = fx::dissolve((200, Interpolation::QuadOut));
    let back = fx::coalesce((400, Interpolation::BounceOut));
    fx::sequence(&[out, back])
}

/// Flash the foreground toward `color` and back.
pub fn flash(color: Color) -> Effect {
    fx::fade_from_fg(color, (500, Interpolation::SineOut))
}

// ---------------------------------------------------------------------------
// EffectManager
// ---------------------------------------------------------------------------

pub struct EffectManager {
    inner: TachyonManager<String>,
}

impl EffectManager {
    pub fn new() -> Self {
        Self {
            inner: TachyonManager::default(),
        }
    }

    /// One-shot effect limited to `area`.
    pub fn add_in(&mut self, effect: Effect, area: Rect) {
        self.inner.add_effect(effect.with_area(area));
    }

    /// Named effect limited to `area`, replacing any running effect with the
    /// same key.
    pub fn add_named_in(&mut self, key: &str, effect: Effect, area: Rect) {
        self.inner
            .add_unique_effect(key.to_string(), effect.with_area(area));
    }

    /// Advance all effects by `delta` and paint them into `buf`. Call after
    /// every widget has rendered.
    pub fn tick_and_render(&mut self, delta: Duration, buf: &mut Buffer, area: Rect) {
        self.inner.process_effects(delta.into(), buf, area);
    }

    /// Drop every running effect, e.g. when the layout changes under them.
    pub fn remove_all(&mut self) {
        self.inner = TachyonManager::default();
    }
}

impl Default for EffectManager {
    fn default() -> Self {
        Self::new()
    }
}
