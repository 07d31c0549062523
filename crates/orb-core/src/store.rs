//! Application state for the dashboard.
//!
//! [`ProjectStore`] owns the project and the current selection. All mutation
//! goes through [`ProjectStore::apply`] with a [`StoreCommand`]; every change
//! is broadcast to subscribers as a [`StoreEvent`] so views can react without
//! polling.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::metrics::{self, StatusRules};
use crate::types::{BudgetStatus, Feature, FeatureStatus, ProjectMetrics};

/// Named mutations accepted by the store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCommand {
    /// Replace a feature's burned hours.
    UpdateBurnedHours { feature_id: u32, burned_hours: f64 },
    /// Add to a feature's burned hours.
    AddBurnedHours { feature_id: u32, delta: f64 },
    /// Select a feature, or clear the selection with `None`.
    SelectFeature(Option<u32>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StoreEvent {
    HoursUpdated {
        feature_id: u32,
        previous: f64,
        burned_hours: f64,
        at: DateTime<Utc>,
    },
    SelectionChanged {
        selected: Option<u32>,
    },
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum StoreError {
    #[error("feature {0} not found")]
    FeatureNotFound(u32),
    #[error("invalid burned hours for feature {feature_id}: {hours}")]
    InvalidHours { feature_id: u32, hours: f64 },
}

pub struct ProjectStore {
    project: ProjectMetrics,
    selected: Option<u32>,
    last_updated: DateTime<Utc>,
    rules: StatusRules,
    subscribers: Vec<flume::Sender<StoreEvent>>,
}

impl ProjectStore {
    pub fn new(project: ProjectMetrics, rules: StatusRules) -> Self {
        Self {
            project,
            selected: None,
            last_updated: Utc::now(),
            rules,
            subscribers: Vec::new(),
        }
    }

    // -- Accessors ----------------------------------------------------------

    pub fn project(&self) -> &ProjectMetrics {
        &self.project
    }

    pub fn features(&self) -> &[Feature] {
        &self.project.features
    }

    pub fn feature(&self, id: u32) -> Option<&Feature> {
        self.project.feature(id)
    }

    pub fn selected_id(&self) -> Option<u32> {
        self.selected
    }

    pub fn selected_feature(&self) -> Option<&Feature> {
        self.selected.and_then(|id| self.feature(id))
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    pub fn rules(&self) -> &StatusRules {
        &self.rules
    }

    pub fn feature_status(&self, id: u32) -> Option<FeatureStatus> {
        self.feature(id).map(|f| f.status(&self.rules))
    }

    pub fn budget_status(&self) -> BudgetStatus {
        self.project.budget_status(&self.rules)
    }

    // -- Subscriptions ------------------------------------------------------

    /// Receive every event emitted after this call.
    pub fn subscribe(&mut self) -> flume::Receiver<StoreEvent> {
        let (tx, rx) = flume::unbounded();
        self.subscribers.push(tx);
        rx
    }

    fn publish(&mut self, event: StoreEvent) {
        // Disconnected receivers are pruned on send failure.
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    // -- Commands -----------------------------------------------------------

    pub fn apply(&mut self, command: StoreCommand) -> Result<(), StoreError> {
        let result = match command {
            StoreCommand::UpdateBurnedHours {
                feature_id,
                burned_hours,
            } => self.set_burned_hours(feature_id, burned_hours),
            StoreCommand::AddBurnedHours { feature_id, delta } => {
                match self.feature(feature_id).map(|f| f.burned_hours) {
                    Some(current) => self.set_burned_hours(feature_id, current + delta),
                    None => Err(StoreError::FeatureNotFound(feature_id)),
                }
            }
            StoreCommand::SelectFeature(id) => {
                self.select(id);
                Ok(())
            }
        };

        if let Err(ref e) = result {
            tracing::warn!(error = %e, "store command rejected");
        }
        result
    }

    fn set_burned_hours(&mut self, feature_id: u32, hours: f64) -> Result<(), StoreError> {
        if !hours.is_finite() || hours < 0.0 {
            return Err(StoreError::InvalidHours {
                feature_id,
                hours,
            });
        }
        let feature = self
            .project
            .features
            .iter_mut()
            .find(|f| f.id == feature_id)
            .ok_or(StoreError::FeatureNotFound(feature_id))?;

        let previous = feature.burned_hours;
        feature.burned_hours = hours;
        let now = Utc::now();
        self.last_updated = now;

        tracing::info!(feature_id, previous, burned_hours = hours, "burned hours updated");
        self.publish(StoreEvent::HoursUpdated {
            feature_id,
            previous,
            burned_hours: hours,
            at: now,
        });
        Ok(())
    }

    /// An id that is not in the feature list clears the selection.
    fn select(&mut self, id: Option<u32>) {
        let resolved = id.filter(|id| self.feature(*id).is_some());
        if resolved != id {
            tracing::debug!(requested = ?id, "selection target not found, clearing");
        }
        if resolved == self.selected {
            return;
        }
        self.selected = resolved;
        tracing::debug!(selected = ?resolved, "selection changed");
        self.publish(StoreEvent::SelectionChanged { selected: resolved });
    }

    // -- Snapshots ----------------------------------------------------------

    /// Serializable view with every derived figure filled in.
    pub fn snapshot(&self) -> ProjectSnapshot {
        let features = self
            .project
            .features
            .iter()
            .map(|f| self.feature_snapshot(f))
            .collect();
        ProjectSnapshot {
            name: self.project.name.clone(),
            total_planned_hours: self.project.total_planned_hours(),
            total_burned_hours: self.project.total_burned_hours(),
            overall_progress: self.project.overall_progress(),
            budget_status: self.budget_status(),
            total_budget: self.project.total_budget(),
            actual_spent: self.project.actual_spent(),
            selected: self.selected,
            last_updated: self.last_updated,
            features,
        }
    }

    pub fn feature_snapshot(&self, feature: &Feature) -> FeatureSnapshot {
        FeatureSnapshot {
            id: feature.id,
            name: feature.name.clone(),
            planned_hours: feature.planned_hours,
            burned_hours: feature.burned_hours,
            progress: feature.progress(),
            progress_label: metrics::format_percent(feature.progress()),
            status: feature.status(&self.rules),
            work_items: feature.work_items.len(),
            last_commit: feature.latest_commit_message().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectSnapshot {
    pub name: String,
    pub total_planned_hours: f64,
    pub total_burned_hours: f64,
    pub overall_progress: Option<f64>,
    pub budget_status: BudgetStatus,
    pub total_budget: f64,
    pub actual_spent: f64,
    pub selected: Option<u32>,
    pub last_updated: DateTime<Utc>,
    pub features: Vec<FeatureSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureSnapshot {
    pub id: u32,
    pub name: String,
    pub planned_hours: f64,
    pub burned_hours: f64,
    pub progress: Option<f64>,
    pub progress_label: String,
    pub status: FeatureStatus,
    pub work_items: usize,
    pub last_commit: Option<String>,
}
