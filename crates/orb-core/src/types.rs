use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::metrics::{self, BurnHealth, StatusPolicy, StatusRules};

// ---------------------------------------------------------------------------
// FeatureStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureStatus {
    OnTrack,
    AtRisk,
    Delayed,
}

impl FeatureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnTrack => "on_track",
            Self::AtRisk => "at_risk",
            Self::Delayed => "delayed",
        }
    }

    /// Human label used in the legend and details panel.
    pub fn label(&self) -> &'static str {
        match self {
            Self::OnTrack => "On Track",
            Self::AtRisk => "At Risk",
            Self::Delayed => "Delayed",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Self::OnTrack => "●",
            Self::AtRisk => "◐",
            Self::Delayed => "○",
        }
    }
}

// ---------------------------------------------------------------------------
// BudgetStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BudgetStatus {
    Healthy,
    Warning,
    Critical,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::Warning => "Warning",
            Self::Critical => "Critical",
        }
    }
}

// ---------------------------------------------------------------------------
// Work items
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkItemType {
    Task,
    Bug,
    UserStory,
    Feature,
}

impl WorkItemType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Task => "Task",
            Self::Bug => "Bug",
            Self::UserStory => "User Story",
            Self::Feature => "Feature",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkItemState {
    New,
    Active,
    Resolved,
    Closed,
}

impl WorkItemState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Active => "Active",
            Self::Resolved => "Resolved",
            Self::Closed => "Closed",
        }
    }

    /// `true` once the item no longer accrues hours.
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Resolved | Self::Closed)
    }
}

/// A single commit booked against a work item. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitInfo {
    pub id: String,
    pub message: String,
    pub author: String,
    pub date: NaiveDate,
    /// Hours spent on the change.
    pub time_spent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: WorkItemType,
    pub title: String,
    pub state: WorkItemState,
    pub assigned_to: String,
    pub planned_hours: f64,
    pub burned_hours: f64,
    #[serde(default)]
    pub commits: Vec<CommitInfo>,
}

impl WorkItem {
    pub fn progress(&self) -> Option<f64> {
        metrics::progress_percent(self.burned_hours, self.planned_hours)
    }

    /// Most recent commit by date; ties resolve to the later entry in the list.
    pub fn latest_commit(&self) -> Option<&CommitInfo> {
        self.commits.iter().max_by_key(|c| c.date)
    }
}

// ---------------------------------------------------------------------------
// Feature
// ---------------------------------------------------------------------------

/// A unit of project work with its own hour budget.
///
/// `progress` and `status` are derived from the hours on demand. The seed
/// document may carry a hand-set `status`; it is kept as `declared_status`,
/// written back out as `declaredStatus` so it never shadows the derived
/// status, and only consulted under [`StatusPolicy::Declared`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub planned_hours: f64,
    pub burned_hours: f64,
    #[serde(
        default,
        rename(serialize = "declaredStatus", deserialize = "status"),
        alias = "declaredStatus",
        skip_serializing_if = "Option::is_none"
    )]
    pub declared_status: Option<FeatureStatus>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_commit: Option<String>,
    #[serde(default)]
    pub work_items: Vec<WorkItem>,
}

impl Feature {
    pub fn burn_ratio(&self) -> Option<f64> {
        metrics::burn_ratio(self.burned_hours, self.planned_hours)
    }

    pub fn progress(&self) -> Option<f64> {
        metrics::progress_percent(self.burned_hours, self.planned_hours)
    }

    pub fn burn_health(&self) -> BurnHealth {
        BurnHealth::from_ratio(self.burn_ratio())
    }

    pub fn status(&self, rules: &StatusRules) -> FeatureStatus {
        match (rules.policy, self.declared_status) {
            (StatusPolicy::Declared, Some(declared)) => declared,
            _ => rules.feature.classify(self.burn_ratio()),
        }
    }

    pub fn remaining_hours(&self) -> f64 {
        self.planned_hours - self.burned_hours
    }

    /// The newest commit across all work items, falling back to the free-form
    /// `last_commit` note when no work item has commits.
    pub fn latest_commit_message(&self) -> Option<&str> {
        self.work_items
            .iter()
            .filter_map(WorkItem::latest_commit)
            .max_by_key(|c| c.date)
            .map(|c| c.message.as_str())
            .or(self.last_commit.as_deref())
    }

    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

// ---------------------------------------------------------------------------
// ProjectMetrics
// ---------------------------------------------------------------------------

/// Aggregate root: the project and its ordered feature list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetrics {
    pub name: String,
    pub rate_per_hour: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, rename = "budgetStatus", skip_serializing_if = "Option::is_none")]
    pub declared_budget_status: Option<BudgetStatus>,
    pub features: Vec<Feature>,
}

impl ProjectMetrics {
    pub fn total_planned_hours(&self) -> f64 {
        self.features.iter().map(|f| f.planned_hours).sum()
    }

    pub fn total_burned_hours(&self) -> f64 {
        self.features.iter().map(|f| f.burned_hours).sum()
    }

    pub fn burn_ratio(&self) -> Option<f64> {
        metrics::burn_ratio(self.total_burned_hours(), self.total_planned_hours())
    }

    pub fn overall_progress(&self) -> Option<f64> {
        metrics::progress_percent(self.total_burned_hours(), self.total_planned_hours())
    }

    pub fn budget_status(&self, rules: &StatusRules) -> BudgetStatus {
        match (rules.policy, self.declared_budget_status) {
            (StatusPolicy::Declared, Some(declared)) => declared,
            _ => rules.budget.classify(self.burn_ratio()),
        }
    }

    /// Total budget in currency: planned hours at the hourly rate.
    pub fn total_budget(&self) -> f64 {
        metrics::budget_cost(self.total_planned_hours(), self.rate_per_hour)
    }

    pub fn actual_spent(&self) -> f64 {
        metrics::budget_cost(self.total_burned_hours(), self.rate_per_hour)
    }

    pub fn feature(&self, id: u32) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == id)
    }
}
