// src/assistant.rs — Composition root tying history, mining, tasks and suggestions together
//
// Construct one per process (or per document) and share it through `Arc`.
// Every method takes `&self` and is safe to call from concurrent event handlers.

use std::sync::Arc;

use chrono::Utc;

use crate::export::{ExportReport, SessionSummary, TopAction};
use crate::history::event::{ActionEvent, ActionKey};
use crate::history::index::Successor;
use crate::history::ingest::ChangeNotification;
use crate::history::store::{HistoryStatistics, HistoryStore};
use crate::infra::config::Config;
use crate::patterns::miner::{MiningReport, Pattern};
use crate::patterns::predictor::{Prediction, Predictor};
use crate::suggest::collaborators::{LayoutAdvisor, PreferenceLookup, QualityQuery};
use crate::suggest::engine::SuggestionEngine;
use crate::suggest::rules::Collaborators;
use crate::suggest::types::{ContextSnapshot, DocRef, Suggestion, SuggestionKind};
use crate::tasks::{TaskSession, TaskTracker};

/// Number of top actions included in an export.
const EXPORT_TOP_ACTIONS: usize = 20;

pub struct Assistant {
    history: HistoryStore,
    predictor: Predictor,
    tasks: TaskTracker,
    suggestions: SuggestionEngine,
    pattern_threshold: u32,
}

impl Assistant {
    pub fn new(config: &Config) -> Self {
        Self {
            history: HistoryStore::new(&config.history, &config.mining),
            predictor: Predictor::new(&config.prediction),
            tasks: TaskTracker::new(),
            suggestions: SuggestionEngine::new(
                config.suggestions.clone(),
                Collaborators::default(),
            ),
            pattern_threshold: config.mining.min_occurrences,
        }
    }

    pub fn with_quality_query(mut self, q: Arc<dyn QualityQuery>) -> Self {
        self.suggestions.collaborators_mut().quality = Some(q);
        self
    }

    pub fn with_layout_advisor(mut self, a: Arc<dyn LayoutAdvisor>) -> Self {
        self.suggestions.collaborators_mut().layout = Some(a);
        self
    }

    pub fn with_preferences(mut self, p: Arc<dyn PreferenceLookup>) -> Self {
        self.suggestions.collaborators_mut().preferences = Some(p);
        self
    }

    // -- Ingest --

    pub fn record(&self, event: ActionEvent) {
        self.history.record(event);
    }

    /// Record every event derived from a change notification and react to each.
    pub fn ingest_change(&self, change: ChangeNotification, doc: &DocRef) -> usize {
        let mut reactive = 0;
        for event in change.into_events() {
            reactive += self.suggestions.process_event(&event, doc);
            self.history.record(event);
        }
        reactive
    }

    // -- Queries --

    pub fn predict(&self, current: &ActionKey, max_results: usize) -> Vec<Prediction> {
        self.history.with_index(|index, patterns| {
            self.predictor
                .predict(index, patterns, current, max_results)
        })
    }

    /// Registered patterns with at least `min_occurrences`. Values below the
    /// mining threshold behave like the threshold: nothing weaker is ever registered.
    pub fn patterns(&self, min_occurrences: u32) -> Vec<Pattern> {
        self.history.patterns(min_occurrences.max(self.pattern_threshold))
    }

    pub fn action_frequencies(&self, top_n: usize) -> Vec<(ActionKey, u64)> {
        self.history.top_actions(top_n)
    }

    pub fn probability(&self, key: &ActionKey) -> f64 {
        self.history.probability(key)
    }

    pub fn successors(&self, key: &ActionKey) -> Vec<Successor> {
        self.history.successors(key)
    }

    pub fn recent_actions(&self, n: usize) -> Vec<ActionEvent> {
        self.history.recent(n)
    }

    pub fn statistics(&self) -> HistoryStatistics {
        self.history.statistics()
    }

    pub fn mine_now(&self) -> MiningReport {
        self.history.mine_now()
    }

    pub fn clear_patterns(&self) {
        self.history.clear_patterns();
    }

    // -- Tasks --

    /// Returns the previously open task if starting this one sealed it.
    pub fn start_task(&self, name: &str) -> Option<TaskSession> {
        self.tasks.start_task(name, &self.history)
    }

    pub fn end_task(&self) -> Option<TaskSession> {
        self.tasks.end_task(&self.history)
    }

    pub fn current_task(&self) -> Option<String> {
        self.tasks.current_task()
    }

    pub fn task_sessions(&self, filter: &str) -> Vec<TaskSession> {
        self.tasks.sessions(filter)
    }

    // -- Suggestions --

    pub fn update_context(&self, snapshot: &ContextSnapshot) -> usize {
        self.suggestions.update_context(snapshot, &self.history)
    }

    pub fn process_event(&self, event: &ActionEvent, doc: &DocRef) -> usize {
        self.suggestions.process_event(event, doc)
    }

    pub fn suggestions(&self, max_count: usize) -> Vec<Suggestion> {
        self.suggestions.suggestions(max_count)
    }

    pub fn accept_suggestion(&self, title: &str) -> Option<Suggestion> {
        self.suggestions.accept(title)
    }

    pub fn reject_suggestion(&self, title: &str) -> Option<Suggestion> {
        self.suggestions.reject(title)
    }

    pub fn relevance_multiplier(&self, kind: SuggestionKind) -> f64 {
        self.suggestions.multiplier(kind)
    }

    // -- Export --

    pub fn export_snapshot(&self) -> ExportReport {
        ExportReport {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            statistics: self.history.statistics(),
            top_actions: self
                .history
                .top_actions(EXPORT_TOP_ACTIONS)
                .into_iter()
                .map(|(key, count)| TopAction { key, count })
                .collect(),
            patterns: self.history.patterns(self.pattern_threshold),
            sessions: self
                .tasks
                .sessions("")
                .iter()
                .map(SessionSummary::from)
                .collect(),
            feedback: self.suggestions.ledger(),
        }
    }
}
