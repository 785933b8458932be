//! Saved analysis reports.
//!
//! Any analyzer result can be wrapped in an [`AnalysisReport`] and written
//! to disk as JSON, so a study plan or simulation can be kept and compared
//! later.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A saved analyzer result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Operation that produced the payload (e.g. "simulate").
    pub command: String,
    /// Data directory the analyzer was built from.
    #[serde(default)]
    pub data_dir: Option<String>,
    /// The serialized result.
    pub payload: serde_json::Value,
}

impl AnalysisReport {
    /// Wrap a serializable result.
    pub fn new(command: &str, payload: &impl Serialize) -> Result<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            command: command.to_string(),
            data_dir: None,
            payload: serde_json::to_value(payload).context("failed to serialize report payload")?,
        })
    }

    pub fn with_data_dir(mut self, dir: &Path) -> Self {
        self.data_dir = Some(dir.display().to_string());
        self
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AnalysisReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
