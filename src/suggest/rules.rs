// src/suggest/rules.rs — Context-driven rule set, evaluated in a fixed order
//
//   1. quality checks      (QualityQuery collaborator)
//   2. workflow next steps (transition index)
//   3. pattern completion  (pattern registry)
//   4. layout optimization (LayoutAdvisor collaborator)
//
// Collaborator errors are logged and the rule contributes nothing.

use std::sync::Arc;

use crate::history::store::HistoryStore;
use crate::infra::config::SuggestionsConfig;

use super::collaborators::{LayoutAdvisor, PreferenceLookup, QualityQuery};
use super::types::{
    ContextSnapshot, DocRef, RecommendedAction, Suggestion, SuggestionKind, SuggestionSource,
};

const QUALITY_RELEVANCE: f64 = 0.8;
const LAYOUT_RELEVANCE: f64 = 0.7;

/// Optional host capabilities. A missing one disables its rule.
#[derive(Clone, Default)]
pub struct Collaborators {
    pub quality: Option<Arc<dyn QualityQuery>>,
    pub layout: Option<Arc<dyn LayoutAdvisor>>,
    pub preferences: Option<Arc<dyn PreferenceLookup>>,
}

/// Run all four rules and return candidates in rule order, before feedback weighting.
pub fn evaluate(
    config: &SuggestionsConfig,
    collaborators: &Collaborators,
    snapshot: &ContextSnapshot,
    history: &HistoryStore,
) -> Vec<Suggestion> {
    let mut out = Vec::new();
    out.extend(quality_checks(config, collaborators, &snapshot.document));
    out.extend(workflow_recommendations(config, collaborators, history));
    out.extend(pattern_completions(config, history));
    out.extend(layout_optimizations(collaborators, snapshot));
    out
}

pub fn quality_checks(
    config: &SuggestionsConfig,
    collaborators: &Collaborators,
    doc: &DocRef,
) -> Vec<Suggestion> {
    let Some(ref quality) = collaborators.quality else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for check in &config.quality_checks {
        let count = match quality.untagged_count(doc, &check.category) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(category = %check.category, error = %e, "Quality query failed");
                continue;
            }
        };
        if count > check.threshold {
            out.push(
                Suggestion::new(
                    SuggestionKind::QualityCheck,
                    format!("Tag untagged {}", check.category.to_lowercase()),
                    format!(
                        "{count} {} in {} have no tag.",
                        check.category,
                        doc.display_name()
                    ),
                    QUALITY_RELEVANCE,
                    SuggestionSource::QualityRule,
                )
                .with_action(
                    RecommendedAction::new("Tag")
                        .param("category", check.category.as_str())
                        .param("count", count.to_string()),
                ),
            );
        }
    }
    out
}

/// Successors of the last recorded action whose follow probability clears the threshold.
pub fn workflow_recommendations(
    config: &SuggestionsConfig,
    collaborators: &Collaborators,
    history: &HistoryStore,
) -> Vec<Suggestion> {
    let Some((current, successors)) = history.last_successors() else {
        return Vec::new();
    };
    let total: u64 = successors.iter().map(|s| s.count).sum();
    if total == 0 {
        return Vec::new();
    }

    successors
        .into_iter()
        .filter_map(|s| {
            let probability = s.count as f64 / total as f64;
            if probability <= config.follow_probability_threshold {
                return None;
            }
            let mut description = format!(
                "After {} you usually {} ({:.0}% of the time).",
                current.describe().to_lowercase(),
                s.key.describe().to_lowercase(),
                probability * 100.0
            );
            if let Some(pref) = collaborators
                .preferences
                .as_ref()
                .and_then(|p| p.preference(s.key.category()))
            {
                description.push_str(&format!(" Your usual choice: {pref}."));
            }
            Some(
                Suggestion::new(
                    SuggestionKind::NextStep,
                    format!("Next: {}", s.key.describe()),
                    description,
                    probability,
                    SuggestionSource::WorkflowRule,
                )
                .with_action(RecommendedAction::from_kind(
                    s.key.kind(),
                    s.key.category(),
                )),
            )
        })
        .collect()
}

pub fn pattern_completions(config: &SuggestionsConfig, history: &HistoryStore) -> Vec<Suggestion> {
    history
        .patterns(config.pattern_min_occurrences)
        .into_iter()
        .take(config.max_pattern_suggestions)
        .map(|p| {
            Suggestion::new(
                SuggestionKind::PatternCompletion,
                format!("Repeat: {}", p.description),
                format!("You often: {}", p.description),
                (p.occurrences as f64 / 10.0).clamp(0.5, 0.9),
                SuggestionSource::PatternRule,
            )
            .with_action(
                RecommendedAction::new("RunSequence")
                    .param("signature", p.signature.as_str())
                    .param("occurrences", p.occurrences.to_string()),
            )
        })
        .collect()
}

pub fn layout_optimizations(
    collaborators: &Collaborators,
    snapshot: &ContextSnapshot,
) -> Vec<Suggestion> {
    if !snapshot.is_sparse_container() {
        return Vec::new();
    }
    let (Some(advisor), Some(view)) = (&collaborators.layout, &snapshot.active_view) else {
        return Vec::new();
    };
    let placed = snapshot.placed_view_count.unwrap_or(0);

    match advisor.advise(&snapshot.document, view, placed) {
        Ok(advice) => advice
            .into_iter()
            .map(|a| {
                let mut action = RecommendedAction::new("PlaceView")
                    .param("sheet", view.view_name.as_str());
                for (k, v) in a.parameters {
                    action = action.param(&k, v);
                }
                Suggestion::new(
                    SuggestionKind::LayoutOptimization,
                    a.title,
                    a.description,
                    LAYOUT_RELEVANCE,
                    SuggestionSource::LayoutRule,
                )
                .with_action(action)
            })
            .collect(),
        Err(e) => {
            tracing::warn!(sheet = %view.view_name, error = %e, "Layout advice failed");
            Vec::new()
        }
    }
}
