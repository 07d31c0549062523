//! Seed data: the static project document the dashboard starts from.
//!
//! A default document is compiled into the binary; an alternate one can be
//! read from disk. Both go through the same validation.

use std::collections::HashSet;
use std::path::Path;

use crate::types::ProjectMetrics;

/// The bundled sample project.
pub const BUNDLED_SEED: &str = include_str!("../data/seed.json");

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("io: {0}")]
    Io(String),
    #[error("parse: {0}")]
    Parse(String),
    #[error("validation: {0}")]
    Validation(String),
}

/// Parse and validate the bundled sample project.
pub fn bundled() -> Result<ProjectMetrics, SeedError> {
    parse(BUNDLED_SEED)
}

/// Parse and validate a seed document.
pub fn parse(text: &str) -> Result<ProjectMetrics, SeedError> {
    let project: ProjectMetrics =
        serde_json::from_str(text).map_err(|e| SeedError::Parse(e.to_string()))?;
    validate(&project)?;
    Ok(project)
}

/// Read a seed document from `path`.
pub fn load_from(path: impl AsRef<Path>) -> Result<ProjectMetrics, SeedError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| SeedError::Io(format!("{}: {}", path.display(), e)))?;
    let project = parse(&text)?;
    tracing::info!(
        path = %path.display(),
        features = project.features.len(),
        "loaded seed document"
    );
    Ok(project)
}

/// Structural checks the type system cannot express.
pub fn validate(project: &ProjectMetrics) -> Result<(), SeedError> {
    if project.end_date <= project.start_date {
        return Err(SeedError::Validation(format!(
            "project end date {} is not after start date {}",
            project.end_date, project.start_date
        )));
    }
    if !project.rate_per_hour.is_finite() || project.rate_per_hour < 0.0 {
        return Err(SeedError::Validation(format!(
            "ratePerHour must be a non-negative number, got {}",
            project.rate_per_hour
        )));
    }

    let mut seen = HashSet::new();
    for feature in &project.features {
        if !seen.insert(feature.id) {
            return Err(SeedError::Validation(format!(
                "duplicate feature id {}",
                feature.id
            )));
        }
        if feature.end_date < feature.start_date {
            return Err(SeedError::Validation(format!(
                "feature {} ends ({}) before it starts ({})",
                feature.id, feature.end_date, feature.start_date
            )));
        }
        for (field, value) in [
            ("plannedHours", feature.planned_hours),
            ("burnedHours", feature.burned_hours),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SeedError::Validation(format!(
                    "feature {} has invalid {}: {}",
                    feature.id, field, value
                )));
            }
        }
    }
    Ok(())
}
