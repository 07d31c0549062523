//! Pure functions deriving progress, status and cost from hour totals.
//!
//! Nothing here stores state: feature and budget status are always computed
//! from the current hours, so they cannot drift from the numbers they claim
//! to summarize.

use serde::{Deserialize, Serialize};

use crate::types::{BudgetStatus, FeatureStatus};

/// `burned / planned`, or `None` when the plan is zero/negative or either
/// value is not finite.
pub fn burn_ratio(burned: f64, planned: f64) -> Option<f64> {
    if !burned.is_finite() || !planned.is_finite() || planned <= 0.0 {
        return None;
    }
    Some(burned / planned)
}

/// Burn ratio as a percentage. Values above 100 are kept (overspend).
pub fn progress_percent(burned: f64, planned: f64) -> Option<f64> {
    burn_ratio(burned, planned).map(|r| r * 100.0)
}

/// Hours converted to currency at `rate` per hour.
pub fn budget_cost(hours: f64, rate: f64) -> f64 {
    hours * rate
}

/// Rounded percentage for display; `--%` when the value is unknown.
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{}%", v.round() as i64),
        _ => "--%".to_string(),
    }
}

/// Whole-unit currency with thousands separators, e.g. `$120,000`.
pub fn format_currency(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Whether status comes from the burn ratio or from the hand-set seed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPolicy {
    #[default]
    Derived,
    /// Use the seed's declared status when present, otherwise derive it.
    Declared,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusThresholds {
    pub at_risk_ratio: f64,
    pub delayed_ratio: f64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            at_risk_ratio: 0.9,
            delayed_ratio: 1.0,
        }
    }
}

impl StatusThresholds {
    /// An unknown ratio (zero plan) is reported as at risk.
    pub fn classify(&self, ratio: Option<f64>) -> FeatureStatus {
        match ratio {
            None => FeatureStatus::AtRisk,
            Some(r) if r > self.delayed_ratio => FeatureStatus::Delayed,
            Some(r) if r >= self.at_risk_ratio => FeatureStatus::AtRisk,
            Some(_) => FeatureStatus::OnTrack,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetThresholds {
    pub warning_ratio: f64,
    pub critical_ratio: f64,
}

impl Default for BudgetThresholds {
    fn default() -> Self {
        Self {
            warning_ratio: 0.7,
            critical_ratio: 1.0,
        }
    }
}

impl BudgetThresholds {
    pub fn classify(&self, ratio: Option<f64>) -> BudgetStatus {
        match ratio {
            None => BudgetStatus::Warning,
            Some(r) if r > self.critical_ratio => BudgetStatus::Critical,
            Some(r) if r >= self.warning_ratio => BudgetStatus::Warning,
            Some(_) => BudgetStatus::Healthy,
        }
    }
}

/// Per-feature burn rate shown in the details panel. Fixed cut-offs,
/// independent of the configurable status thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BurnHealth {
    Healthy,
    AtRisk,
    OverBudget,
}

impl BurnHealth {
    pub fn from_ratio(ratio: Option<f64>) -> Self {
        match ratio {
            Some(r) if r <= 0.8 => Self::Healthy,
            Some(r) if r <= 1.0 => Self::AtRisk,
            Some(_) => Self::OverBudget,
            None => Self::AtRisk,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::AtRisk => "At Risk",
            Self::OverBudget => "Over Budget",
        }
    }
}

/// Everything needed to turn hours into a status.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StatusRules {
    pub policy: StatusPolicy,
    pub feature: StatusThresholds,
    pub budget: BudgetThresholds,
}
