//! Geometry and animation math for the orb and the sun.
//!
//! The orb is a ring of truncated-cone wall segments, one per feature, seen
//! from slightly above. Everything here is plain arithmetic on angles and
//! radii; drawing is left to the caller.

use std::f64::consts::TAU;
use std::time::Duration;

use crate::types::Feature;

pub const DEFAULT_RADIUS: f64 = 5.0;
pub const DEFAULT_HEIGHT: f64 = 2.0;
/// The bottom rim is narrower than the top.
pub const BOTTOM_RADIUS_FACTOR: f64 = 0.8;
pub const LABEL_OFFSET: f64 = 0.5;

/// Animation rates are expressed per frame at this reference rate.
pub const REFERENCE_FPS: f64 = 60.0;
pub const ORB_ROTATION_PER_FRAME: f64 = 0.001;
pub const SUN_SPIN_PER_FRAME: f64 = 0.002;
const PULSE_FREQUENCY: f64 = 4.0;

// ---------------------------------------------------------------------------
// Segments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct OrbSegment {
    pub feature_id: u32,
    pub index: usize,
    pub start_angle: f64,
    pub end_angle: f64,
    pub top_radius: f64,
    pub bottom_radius: f64,
    pub height: f64,
    /// `height * burned / planned`. Not clamped: overspend rises above the
    /// wall. Zero when the plan is zero.
    pub progress_height: f64,
    /// Label position on the ground plane, `(x, z)`.
    pub label_anchor: (f64, f64),
}

impl OrbSegment {
    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }

    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Whether a ring-local angle falls inside `[start, end)`.
    pub fn contains(&self, local_angle: f64) -> bool {
        let a = local_angle.rem_euclid(TAU);
        a >= self.start_angle && a < self.end_angle
    }

    /// Vertical position of the progress marker relative to the wall's
    /// centre line.
    pub fn progress_level(&self) -> f64 {
        self.progress_height - self.height / 2.0
    }
}

/// Split the ring evenly between `features`, in list order.
pub fn layout_segments(features: &[Feature], radius: f64, height: f64) -> Vec<OrbSegment> {
    let n = features.len();
    features
        .iter()
        .enumerate()
        .map(|(i, feature)| {
            let start_angle = i as f64 / n as f64 * TAU;
            let end_angle = (i + 1) as f64 / n as f64 * TAU;
            let mid = (start_angle + end_angle) / 2.0;
            let progress_height = feature.burn_ratio().map(|r| height * r).unwrap_or(0.0);
            OrbSegment {
                feature_id: feature.id,
                index: i,
                start_angle,
                end_angle,
                top_radius: radius,
                bottom_radius: radius * BOTTOM_RADIUS_FACTOR,
                height,
                progress_height,
                label_anchor: (
                    mid.cos() * (radius + LABEL_OFFSET),
                    mid.sin() * (radius + LABEL_OFFSET),
                ),
            }
        })
        .collect()
}

/// Find the segment under a screen angle, given the ring's current rotation.
pub fn hit_test(segments: &[OrbSegment], rotation: f64, screen_angle: f64) -> Option<&OrbSegment> {
    let local = (screen_angle - rotation).rem_euclid(TAU);
    segments.iter().find(|s| s.contains(local))
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Oblique view of the ring: the ground plane is squashed vertically and
/// height is added straight up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub tilt: f64,
    pub lift: f64,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            tilt: 0.45,
            lift: 1.0,
        }
    }
}

impl Projection {
    /// Map a point at `angle`/`radius` on the ring and height `y` to 2D.
    pub fn project(&self, angle: f64, radius: f64, y: f64) -> (f64, f64) {
        (
            radius * angle.cos(),
            radius * angle.sin() * self.tilt + y * self.lift,
        )
    }

    /// Ground-plane angle of a 2D point, ignoring height.
    pub fn unproject_angle(&self, x: f64, y: f64) -> f64 {
        (y / self.tilt).atan2(x).rem_euclid(TAU)
    }

    /// `true` for the half of the ring facing the viewer.
    pub fn is_front(&self, angle: f64) -> bool {
        angle.rem_euclid(TAU) > std::f64::consts::PI
    }
}

// ---------------------------------------------------------------------------
// Animation
// ---------------------------------------------------------------------------

fn frames(dt: Duration) -> f64 {
    dt.as_secs_f64() * REFERENCE_FPS
}

/// Slow continuous spin of the ring.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrbRotation {
    angle: f64,
}

impl OrbRotation {
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn advance(&mut self, dt: Duration) {
        self.angle = (self.angle + ORB_ROTATION_PER_FRAME * frames(dt)).rem_euclid(TAU);
    }
}

/// Sun animation state at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPulse {
    /// Core sphere scale, `1 ± 0.08`.
    pub scale: f64,
    /// Outer glow scale, `1.3 ± 0.15`.
    pub glow_scale: f64,
    /// Surface brightness multiplier, `0.85 ± 0.15`.
    pub brightness: f64,
}

impl SunPulse {
    pub fn at(elapsed_secs: f64) -> Self {
        let wave = (elapsed_secs * PULSE_FREQUENCY).sin();
        Self {
            scale: 1.0 + wave * 0.08,
            glow_scale: 1.3 + wave * 0.15,
            brightness: wave * 0.15 + 0.85,
        }
    }
}

/// Clock driving the sun: elapsed time for the pulse and the surface spin.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SunClock {
    elapsed: f64,
    spin: f64,
}

impl SunClock {
    pub fn advance(&mut self, dt: Duration) {
        self.elapsed += dt.as_secs_f64();
        self.spin = (self.spin + SUN_SPIN_PER_FRAME * frames(dt)).rem_euclid(TAU);
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn spin(&self) -> f64 {
        self.spin
    }

    pub fn pulse(&self) -> SunPulse {
        SunPulse::at(self.elapsed)
    }
}

// ---------------------------------------------------------------------------
// Surface noise
// ---------------------------------------------------------------------------

fn fract(x: f64) -> f64 {
    x - x.floor()
}

fn mix(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Pseudo-random value in `[0, 1)` for a lattice point.
pub fn hash2(x: f64, y: f64) -> f64 {
    fract((x * 12.9898 + y * 78.233).sin() * 43758.545_312_3)
}

/// Smoothly interpolated lattice noise in `[0, 1]`.
pub fn value_noise(x: f64, y: f64) -> f64 {
    let (ix, iy) = (x.floor(), y.floor());
    let (fx, fy) = (x - ix, y - iy);

    let a = hash2(ix, iy);
    let b = hash2(ix + 1.0, iy);
    let c = hash2(ix, iy + 1.0);
    let d = hash2(ix + 1.0, iy + 1.0);

    let ux = fx * fx * (3.0 - 2.0 * fx);
    let uy = fy * fy * (3.0 - 2.0 * fy);

    mix(a, b, ux) + (c - a) * uy * (1.0 - ux) + (d - b) * ux * uy
}

/// How a single point on the sun disc is shaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunShade {
    /// Blend factor from the core colour (0) to the glow colour (1).
    pub glow_mix: f64,
    pub brightness: f64,
}

/// Shade a point with surface coordinates `(u, v)` in `[0, 1]` at distance
/// `r` (0 centre, 1 rim) from the disc centre.
pub fn sun_shade(u: f64, v: f64, r: f64, elapsed_secs: f64) -> SunShade {
    let drift = elapsed_secs * 0.5;
    let n = value_noise(u * 10.0 + drift, v * 10.0 + drift).clamp(0.0, 1.0);
    let crater = n.powf(1.5);

    let normal_z = (1.0 - r.clamp(0.0, 1.0).powi(2)).sqrt();
    let fresnel = (1.0 - normal_z).powi(2);

    let edge = fresnel;
    let glow_mix = mix(edge, 1.0, crater * 0.5);

    SunShade {
        glow_mix: glow_mix.clamp(0.0, 1.0),
        brightness: SunPulse::at(elapsed_secs).brightness,
    }
}
