//! Burndown series synthesis.
//!
//! The project chart compares three decays of the total budget over the
//! schedule: a linear ideal, a slightly concave plan, and a convex "actual"
//! with a sinusoidal wobble plus uniform noise. The noise source is always
//! passed in, so a seeded [`StdRng`] reproduces a series exactly.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::types::{Feature, ProjectMetrics};

/// Fraction of the schedule shown by default.
pub const DEFAULT_COMPLETION_CAP: f64 = 0.65;

const PLANNED_EXPONENT: f64 = 0.9;
const ACTUAL_EXPONENT: f64 = 1.1;
const VARIANCE_AMPLITUDE: f64 = 5000.0;
const VARIANCE_CYCLES: f64 = 4.0;
const NOISE_SPAN: f64 = 3000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BurndownParams {
    pub total_budget: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub today: NaiveDate,
    /// Upper bound on the visible fraction of the schedule, in (0, 1].
    pub completion_cap: f64,
}

impl BurndownParams {
    /// Budget and schedule taken from the project itself.
    pub fn for_project(project: &ProjectMetrics, today: NaiveDate) -> Self {
        Self {
            total_budget: project.total_budget(),
            start_date: project.start_date,
            end_date: project.end_date,
            today,
            completion_cap: DEFAULT_COMPLETION_CAP,
        }
    }

    pub fn with_cap(mut self, completion_cap: f64) -> Self {
        self.completion_cap = completion_cap;
        self
    }

    pub fn total_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// Number of daily records to emit: days since start, capped at
    /// `floor(total_days * completion_cap)`, never negative.
    pub fn days_elapsed(&self) -> usize {
        let total = self.total_days();
        if total <= 0 {
            return 0;
        }
        let elapsed = (self.today - self.start_date).num_days();
        let cap = (total as f64 * self.completion_cap).floor() as i64;
        elapsed.min(cap).max(0) as usize
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurndownPoint {
    pub date: NaiveDate,
    pub planned_budget: f64,
    pub actual_budget: f64,
    pub ideal_burndown: f64,
}

impl BurndownPoint {
    /// Axis label like `Jan 5`.
    pub fn label(&self) -> String {
        self.date.format("%b %-d").to_string()
    }
}

pub fn ideal_at(total: f64, day: usize, total_days: i64) -> f64 {
    total * (1.0 - day as f64 / total_days as f64)
}

pub fn planned_at(total: f64, day: usize, total_days: i64) -> f64 {
    total * (1.0 - day as f64 / total_days as f64).powf(PLANNED_EXPONENT)
}

/// Deterministic part of the actual-spend wobble: four sine cycles over the
/// schedule.
pub fn variance_wave(day: usize, total_days: i64) -> f64 {
    let progress = day as f64 / total_days as f64;
    (progress * std::f64::consts::PI * VARIANCE_CYCLES).sin() * VARIANCE_AMPLITUDE
}

/// Produce the daily series. Empty for a zero or negative schedule, or when
/// `today` is not after the start date.
pub fn generate<R: Rng + ?Sized>(params: &BurndownParams, rng: &mut R) -> Vec<BurndownPoint> {
    let total_days = params.total_days();
    let count = params.days_elapsed();
    let total = params.total_budget;

    let series: Vec<BurndownPoint> = (0..count)
        .map(|day| {
            let base_actual =
                total * (1.0 - day as f64 / total_days as f64).powf(ACTUAL_EXPONENT);
            let noise = (rng.gen::<f64>() - 0.5) * NOISE_SPAN;
            let actual = (base_actual + variance_wave(day, total_days) + noise).max(0.0);

            BurndownPoint {
                date: params.start_date + Duration::days(day as i64),
                planned_budget: planned_at(total, day, total_days).round(),
                actual_budget: actual.round(),
                ideal_burndown: ideal_at(total, day, total_days).round(),
            }
        })
        .collect();

    tracing::debug!(
        records = series.len(),
        total_days,
        total_budget = total,
        "generated burndown series"
    );
    series
}

/// [`generate`] with a fresh `StdRng` seeded from `seed`.
pub fn generate_seeded(params: &BurndownParams, seed: u64) -> Vec<BurndownPoint> {
    let mut rng = StdRng::seed_from_u64(seed);
    generate(params, &mut rng)
}

/// Figures shown under the chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurndownSummary {
    pub total_budget: f64,
    /// Last actual value, or 0 for an empty series.
    pub remaining: f64,
    pub spent: f64,
    /// Share of the schedule covered by the series, rounded.
    pub schedule_percent: f64,
}

impl BurndownSummary {
    pub fn from_series(params: &BurndownParams, series: &[BurndownPoint]) -> Self {
        let remaining = series.last().map(|p| p.actual_budget).unwrap_or(0.0);
        let total_days = params.total_days();
        let schedule_percent = if total_days > 0 {
            (series.len() as f64 / total_days as f64 * 100.0).round()
        } else {
            0.0
        };
        Self {
            total_budget: params.total_budget,
            remaining,
            spent: params.total_budget - remaining,
            schedule_percent,
        }
    }
}

// ---------------------------------------------------------------------------
// Per-feature chart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturePoint {
    pub date: NaiveDate,
    pub planned: f64,
    pub actual: f64,
}

const FEATURE_SAMPLE_OFFSETS: [i64; 4] = [0, 6, 13, 20];
const FEATURE_PLANNED_SHARE: [f64; 5] = [1.0, 0.75, 0.5, 0.25, 0.0];
const FEATURE_ACTUAL_SHARE: [f64; 5] = [0.0, 0.3, 0.6, 0.8, 1.0];

/// Five-sample sketch of a feature's burn: weekly checkpoints from its start
/// date, then `today`. Planned hours fall to zero while burned hours climb to
/// the current total.
pub fn feature_burndown(feature: &Feature, today: NaiveDate) -> Vec<FeaturePoint> {
    let mut dates: Vec<NaiveDate> = FEATURE_SAMPLE_OFFSETS
        .iter()
        .map(|offset| feature.start_date + Duration::days(*offset))
        .collect();
    dates.push(today);

    dates
        .into_iter()
        .enumerate()
        .map(|(i, date)| FeaturePoint {
            date,
            planned: feature.planned_hours * FEATURE_PLANNED_SHARE[i],
            actual: feature.burned_hours * FEATURE_ACTUAL_SHARE[i],
        })
        .collect()
}
