// src/suggest/types.rs — Suggestion and context snapshot types

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::history::event::{ActionKind, ViewContext};

/// Suggestion categories; the feedback ledger is keyed by these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SuggestionKind {
    NextStep,
    QualityCheck,
    LayoutOptimization,
    PatternCompletion,
    ViewSwitch,
    General,
}

impl SuggestionKind {
    pub const ALL: [SuggestionKind; 6] = [
        Self::NextStep,
        Self::QualityCheck,
        Self::LayoutOptimization,
        Self::PatternCompletion,
        Self::ViewSwitch,
        Self::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NextStep => "next_step",
            Self::QualityCheck => "quality_check",
            Self::LayoutOptimization => "layout_optimization",
            Self::PatternCompletion => "pattern_completion",
            Self::ViewSwitch => "view_switch",
            Self::General => "general",
        }
    }
}

/// What the host could do if the user takes the suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedAction {
    pub action: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

impl RecommendedAction {
    pub fn new(action: &str) -> Self {
        Self {
            action: action.to_string(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.parameters.insert(key.to_string(), value.into());
        self
    }

    pub fn from_kind(kind: ActionKind, category: &str) -> Self {
        Self::new(kind.as_str()).param("category", category)
    }
}

/// Which rule produced a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    QualityRule,
    WorkflowRule,
    PatternRule,
    LayoutRule,
    Reactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    pub kind: SuggestionKind,
    /// Dedup key within the pending set.
    pub title: String,
    pub description: String,
    pub relevance: f64,
    pub recommended_action: Option<RecommendedAction>,
    pub source: SuggestionSource,
    pub created_at: DateTime<Utc>,
}

impl Suggestion {
    pub fn new(
        kind: SuggestionKind,
        title: impl Into<String>,
        description: impl Into<String>,
        relevance: f64,
        source: SuggestionSource,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            title: title.into(),
            description: description.into(),
            relevance,
            recommended_action: None,
            source,
            created_at: Utc::now(),
        }
    }

    pub fn with_action(mut self, action: RecommendedAction) -> Self {
        self.recommended_action = Some(action);
        self
    }
}

/// The open document, as the host identifies it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocRef {
    pub id: String,
    #[serde(default)]
    pub title: String,
}

impl DocRef {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
        }
    }

    /// Title for user-facing text, falling back to the id.
    pub fn display_name(&self) -> &str {
        if self.title.is_empty() {
            &self.id
        } else {
            &self.title
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionSummary {
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Point-in-time editing context driving a regeneration cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextSnapshot {
    #[serde(default)]
    pub document: DocRef,
    #[serde(default)]
    pub active_view: Option<ViewContext>,
    /// Sub-views already placed on the active container view.
    #[serde(default)]
    pub placed_view_count: Option<usize>,
    #[serde(default)]
    pub selection: SelectionSummary,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl ContextSnapshot {
    pub fn new(document: DocRef) -> Self {
        Self {
            document,
            active_view: None,
            placed_view_count: None,
            selection: SelectionSummary::default(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_view(mut self, view: ViewContext, placed_view_count: Option<usize>) -> Self {
        self.active_view = Some(view);
        self.placed_view_count = placed_view_count;
        self
    }

    /// A sheet with at most one placed view.
    pub fn is_sparse_container(&self) -> bool {
        matches!(
            (&self.active_view, self.placed_view_count),
            (Some(view), Some(0 | 1)) if view.is_sheet
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_container_detection() {
        let doc = DocRef::new("d1", "Tower");
        let sheet = ViewContext::sheet(1, "A101", "A101");
        assert!(ContextSnapshot::new(doc.clone())
            .with_view(sheet.clone(), Some(0))
            .is_sparse_container());
        assert!(ContextSnapshot::new(doc.clone())
            .with_view(sheet.clone(), Some(1))
            .is_sparse_container());
        assert!(!ContextSnapshot::new(doc.clone())
            .with_view(sheet.clone(), Some(2))
            .is_sparse_container());
        assert!(!ContextSnapshot::new(doc.clone())
            .with_view(sheet, None)
            .is_sparse_container());
        let plan = ViewContext::new(2, "Level 1", "FloorPlan");
        assert!(!ContextSnapshot::new(doc)
            .with_view(plan, Some(0))
            .is_sparse_container());
    }

    #[test]
    fn test_doc_display_name_falls_back_to_id() {
        assert_eq!(DocRef::new("doc-7", "").display_name(), "doc-7");
        assert_eq!(DocRef::new("doc-7", "Tower").display_name(), "Tower");
    }

    #[test]
    fn test_snapshot_deserializes_with_defaults() {
        let snap: ContextSnapshot = serde_json::from_str(r#"{"document":{"id":"d"}}"#).unwrap();
        assert!(snap.active_view.is_none());
        assert_eq!(snap.selection.count, 0);
    }
}
