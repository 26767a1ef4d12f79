// src/suggest/engine.rs — Pending suggestions, ranking, and the feedback loop
//
// The pending list, the acceptance ledger and the reactive counters share one
// lock, independent of the history store's. Rule evaluation (which may call
// collaborators and read history) happens before this lock is taken.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::history::event::ActionEvent;
use crate::history::store::HistoryStore;
use crate::infra::config::SuggestionsConfig;

use super::ledger::AcceptanceLedger;
use super::reactive::{self, ReactiveState};
use super::rules::{self, Collaborators};
use super::types::{ContextSnapshot, DocRef, Suggestion, SuggestionKind};

struct EngineState {
    pending: Vec<Suggestion>,
    ledger: AcceptanceLedger,
    reactive: ReactiveState,
}

impl EngineState {
    /// Weight by feedback and append, unless the title is already pending.
    fn insert(&mut self, mut suggestion: Suggestion) -> bool {
        if self.pending.iter().any(|p| p.title == suggestion.title) {
            tracing::debug!(title = %suggestion.title, "Duplicate suggestion discarded");
            return false;
        }
        suggestion.relevance *= self.ledger.multiplier(suggestion.kind);
        self.pending.push(suggestion);
        true
    }

    fn take(&mut self, title: &str) -> Option<Suggestion> {
        let pos = self.pending.iter().position(|s| s.title == title)?;
        Some(self.pending.remove(pos))
    }
}

pub struct SuggestionEngine {
    config: SuggestionsConfig,
    collaborators: Collaborators,
    state: Mutex<EngineState>,
}

impl SuggestionEngine {
    pub fn new(config: SuggestionsConfig, collaborators: Collaborators) -> Self {
        let ledger = AcceptanceLedger::new(config.feedback_step);
        Self {
            config,
            collaborators,
            state: Mutex::new(EngineState {
                pending: Vec::new(),
                ledger,
                reactive: ReactiveState::default(),
            }),
        }
    }

    pub fn collaborators_mut(&mut self) -> &mut Collaborators {
        &mut self.collaborators
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace the pending set with a fresh evaluation of the rule set.
    ///
    /// Returns the number of pending suggestions afterwards.
    pub fn update_context(&self, snapshot: &ContextSnapshot, history: &HistoryStore) -> usize {
        let candidates = rules::evaluate(&self.config, &self.collaborators, snapshot, history);
        let generated = candidates.len();

        let mut state = self.lock();
        state.pending.clear();
        for c in candidates {
            state.insert(c);
        }
        tracing::debug!(
            document = %snapshot.document.id,
            generated,
            pending = state.pending.len(),
            "Context updated"
        );
        state.pending.len()
    }

    /// Evaluate the reactive rules for one event. Returns how many were added.
    pub fn process_event(&self, event: &ActionEvent, doc: &DocRef) -> usize {
        let mut state = self.lock();
        let fresh = reactive::react(&self.config, &mut state.reactive, event, doc);
        fresh
            .into_iter()
            .map(|s| state.insert(s))
            .filter(|added| *added)
            .count()
    }

    /// Pending suggestions, most relevant first.
    pub fn suggestions(&self, max_count: usize) -> Vec<Suggestion> {
        let mut out = self.lock().pending.clone();
        out.sort_by(|a, b| {
            b.relevance
                .partial_cmp(&a.relevance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        out.truncate(max_count);
        out
    }

    pub fn pending_len(&self) -> usize {
        self.lock().pending.len()
    }

    /// Remove the pending suggestion and reinforce its kind. Unknown titles are ignored.
    pub fn accept(&self, title: &str) -> Option<Suggestion> {
        let mut state = self.lock();
        let taken = state.take(title)?;
        state.ledger.accept(taken.kind);
        tracing::info!(title, kind = taken.kind.as_str(), "Suggestion accepted");
        Some(taken)
    }

    /// Remove the pending suggestion and dampen its kind. Unknown titles are ignored.
    pub fn reject(&self, title: &str) -> Option<Suggestion> {
        let mut state = self.lock();
        let taken = state.take(title)?;
        state.ledger.reject(taken.kind);
        tracing::info!(title, kind = taken.kind.as_str(), "Suggestion rejected");
        Some(taken)
    }

    pub fn multiplier(&self, kind: SuggestionKind) -> f64 {
        self.lock().ledger.multiplier(kind)
    }

    pub fn ledger(&self) -> BTreeMap<SuggestionKind, u32> {
        self.lock().ledger.snapshot()
    }
}
