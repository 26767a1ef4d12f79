// src/export.rs — Opaque snapshot report for an external long-term store
//
// The shape is not a compatibility contract. Consumers should treat it as a blob.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::history::event::ActionKey;
use crate::history::store::HistoryStatistics;
use crate::infra::errors::{ForesightError, Result};
use crate::patterns::miner::Pattern;
use crate::suggest::types::SuggestionKind;
use crate::tasks::TaskSession;

#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub statistics: HistoryStatistics,
    pub top_actions: Vec<TopAction>,
    pub patterns: Vec<Pattern>,
    pub sessions: Vec<SessionSummary>,
    pub feedback: BTreeMap<SuggestionKind, u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopAction {
    pub key: ActionKey,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub id: String,
    pub name: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_secs: i64,
    pub action_count: usize,
    /// Most frequent key inside the session, if it had any actions.
    pub dominant_action: Option<ActionKey>,
}

impl From<&TaskSession> for SessionSummary {
    fn from(s: &TaskSession) -> Self {
        let mut counts: BTreeMap<ActionKey, usize> = BTreeMap::new();
        for a in &s.actions {
            *counts.entry(a.key()).or_default() += 1;
        }
        // max_by_key returns the last max; iterate in reverse so ties pick the smallest key.
        let dominant_action = counts
            .into_iter()
            .rev()
            .max_by_key(|(_, c)| *c)
            .map(|(k, _)| k);

        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            started_at: s.started_at,
            ended_at: s.ended_at,
            duration_secs: s.duration_secs(),
            action_count: s.actions.len(),
            dominant_action,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Yaml,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(ForesightError::UnknownFormat(other.to_string())),
        }
    }
}

impl ExportReport {
    pub fn render(&self, format: ExportFormat) -> Result<String> {
        Ok(match format {
            ExportFormat::Json => serde_json::to_string_pretty(self)?,
            ExportFormat::Yaml => serde_yml::to_string(self)?,
        })
    }

    /// Write the rendered report. Failures are reported, not retried.
    pub fn write_to(&self, path: &Path, format: ExportFormat) -> Result<()> {
        let rendered = self.render(format)?;
        std::fs::write(path, rendered)?;
        tracing::info!(path = %path.display(), "Snapshot exported");
        Ok(())
    }
}
