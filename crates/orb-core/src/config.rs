use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::burndown::BurndownParams;
use crate::metrics::{BudgetThresholds, StatusPolicy, StatusRules, StatusThresholds};
use crate::types::ProjectMetrics;

/// Top-level configuration loaded from `~/.budget-orb/config.toml`.
///
/// Every section defaults, so a partial (or missing) file is valid.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub budget: BudgetConfig,
    #[serde(default)]
    pub burndown: BurndownConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Config {
    /// Load config from `~/.budget-orb/config.toml`, falling back to
    /// defaults when the file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(path)
        } else {
            let cfg = Config::default();
            cfg.validate()?;
            Ok(cfg)
        }
    }

    /// Load from a specific path.
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let text = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let cfg: Config = toml::from_str(&text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    /// Serialize config to TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        self.validate()?;
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Semantic validation for settings that are not fully expressible via type checks.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.budget.validate()?;
        self.burndown.validate()?;
        self.feed.validate()?;
        self.display.validate()?;
        Ok(())
    }

    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".budget-orb")
            .join("config.toml")
    }

    /// Where the interactive dashboard writes its log file.
    pub fn log_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("budget-orb")
            .join("budget-orb.log")
    }

    /// Apply `budget.hourly_rate` to a freshly loaded project.
    pub fn apply_overrides(&self, project: &mut ProjectMetrics) {
        if let Some(rate) = self.budget.hourly_rate {
            tracing::debug!(rate, "overriding hourly rate");
            project.rate_per_hour = rate;
        }
    }

    /// Chart parameters for `project`, honouring the `[burndown]` schedule
    /// overrides and completion cap.
    pub fn burndown_params(&self, project: &ProjectMetrics, today: NaiveDate) -> BurndownParams {
        let mut params =
            BurndownParams::for_project(project, today).with_cap(self.burndown.completion_cap);
        if let Some(start) = self.burndown.start_date {
            params.start_date = start;
        }
        if let Some(end) = self.burndown.end_date {
            params.end_date = end;
        }
        params
    }
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io: {0}")]
    Io(String),
    #[error("parse: {0}")]
    Parse(String),
    #[error("validation: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Section structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_project_name")]
    pub project_name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Seed document to load instead of the bundled sample.
    #[serde(default)]
    pub seed_path: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            project_name: default_project_name(),
            log_level: default_log_level(),
            seed_path: None,
        }
    }
}

fn default_project_name() -> String {
    "budget-orb".into()
}
fn default_log_level() -> String {
    "warn".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetConfig {
    /// Overrides the seed's `ratePerHour` when set.
    #[serde(default)]
    pub hourly_rate: Option<f64>,
    #[serde(default)]
    pub status_policy: StatusPolicy,
    #[serde(default = "default_at_risk_ratio")]
    pub at_risk_ratio: f64,
    #[serde(default = "default_delayed_ratio")]
    pub delayed_ratio: f64,
    #[serde(default = "default_warning_ratio")]
    pub warning_ratio: f64,
    #[serde(default = "default_critical_ratio")]
    pub critical_ratio: f64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            hourly_rate: None,
            status_policy: StatusPolicy::default(),
            at_risk_ratio: default_at_risk_ratio(),
            delayed_ratio: default_delayed_ratio(),
            warning_ratio: default_warning_ratio(),
            critical_ratio: default_critical_ratio(),
        }
    }
}

impl BudgetConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(rate) = self.hourly_rate {
            if !rate.is_finite() || rate < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "budget.hourly_rate must be >= 0, got {}",
                    rate
                )));
            }
        }
        ordered_pair("budget.at_risk_ratio", self.at_risk_ratio, "budget.delayed_ratio", self.delayed_ratio)?;
        ordered_pair("budget.warning_ratio", self.warning_ratio, "budget.critical_ratio", self.critical_ratio)?;
        Ok(())
    }

    pub fn rules(&self) -> StatusRules {
        StatusRules {
            policy: self.status_policy,
            feature: StatusThresholds {
                at_risk_ratio: self.at_risk_ratio,
                delayed_ratio: self.delayed_ratio,
            },
            budget: BudgetThresholds {
                warning_ratio: self.warning_ratio,
                critical_ratio: self.critical_ratio,
            },
        }
    }
}

fn ordered_pair(low_name: &str, low: f64, high_name: &str, high: f64) -> Result<(), ConfigError> {
    if !(low.is_finite() && high.is_finite()) || low <= 0.0 || low > high {
        return Err(ConfigError::Validation(format!(
            "{} ({}) must be positive and not exceed {} ({})",
            low_name, low, high_name, high
        )));
    }
    Ok(())
}

fn default_at_risk_ratio() -> f64 {
    0.9
}
fn default_delayed_ratio() -> f64 {
    1.0
}
fn default_warning_ratio() -> f64 {
    0.7
}
fn default_critical_ratio() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurndownConfig {
    /// Override for the seed's schedule start.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Override for the seed's schedule end.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_completion_cap")]
    pub completion_cap: f64,
    /// Fixed seed for the chart noise. Random per launch when unset.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Default for BurndownConfig {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            completion_cap: default_completion_cap(),
            rng_seed: None,
        }
    }
}

impl BurndownConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.completion_cap > 0.0 && self.completion_cap <= 1.0) {
            return Err(ConfigError::Validation(format!(
                "burndown.completion_cap must be in (0, 1], got {}",
                self.completion_cap
            )));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end <= start {
                return Err(ConfigError::Validation(format!(
                    "burndown.end_date {} must be after start_date {}",
                    end, start
                )));
            }
        }
        Ok(())
    }
}

fn default_completion_cap() -> f64 {
    crate::burndown::DEFAULT_COMPLETION_CAP
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_feed_interval")]
    pub interval_secs: u64,
    #[serde(default = "default_max_increment")]
    pub max_increment_hours: f64,
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: default_feed_interval(),
            max_increment_hours: default_max_increment(),
            rng_seed: None,
        }
    }
}

impl FeedConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_secs == 0 {
            return Err(ConfigError::Validation(
                "feed.interval_secs must be at least 1".to_string(),
            ));
        }
        if !(self.max_increment_hours.is_finite() && self.max_increment_hours > 0.0) {
            return Err(ConfigError::Validation(format!(
                "feed.max_increment_hours must be > 0, got {}",
                self.max_increment_hours
            )));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}
fn default_feed_interval() -> u64 {
    5
}
fn default_max_increment() -> f64 {
    4.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    #[serde(default = "default_orb_radius")]
    pub orb_radius: f64,
    #[serde(default = "default_segment_height")]
    pub segment_height: f64,
    #[serde(default = "default_true")]
    pub show_legend: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            orb_radius: default_orb_radius(),
            segment_height: default_segment_height(),
            show_legend: true,
        }
    }
}

impl DisplayConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=120).contains(&self.frame_rate) {
            return Err(ConfigError::Validation(format!(
                "display.frame_rate must be in 1..=120, got {}",
                self.frame_rate
            )));
        }
        if !(self.orb_radius.is_finite() && self.orb_radius > 0.0) {
            return Err(ConfigError::Validation(format!(
                "display.orb_radius must be > 0, got {}",
                self.orb_radius
            )));
        }
        if !(self.segment_height.is_finite() && self.segment_height > 0.0) {
            return Err(ConfigError::Validation(format!(
                "display.segment_height must be > 0, got {}",
                self.segment_height
            )));
        }
        Ok(())
    }
}

fn default_frame_rate() -> u32 {
    30
}
fn default_orb_radius() -> f64 {
    crate::orb::DEFAULT_RADIUS
}
fn default_segment_height() -> f64 {
    crate::orb::DEFAULT_HEIGHT
}
