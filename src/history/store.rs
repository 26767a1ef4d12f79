// src/history/store.rs — Bounded action log with index and pattern registry
//
// The log, the transition index, and the pattern registry share one lock.
// Mining reads the whole log, so it must see all three in the same state.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::event::{ActionEvent, ActionKey};
use super::index::{Successor, TransitionIndex};
use crate::infra::config::{HistoryConfig, MiningConfig};
use crate::patterns::miner::{MiningReport, Pattern, PatternMiner, PatternRegistry};

/// Point-in-time summary of the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryStatistics {
    /// Events ever recorded, including evicted ones.
    pub total_recorded: u64,
    pub retained: usize,
    pub capacity: usize,
    pub unique_keys: usize,
    pub most_common: Option<(ActionKey, u64)>,
    pub total_transitions: u64,
    pub pattern_count: usize,
    pub appends_since_mining: u64,
}

struct HistoryState {
    log: VecDeque<ActionEvent>,
    index: TransitionIndex,
    patterns: PatternRegistry,
    last_key: Option<ActionKey>,
    appended: u64,
    /// `appended` as of the last mining pass.
    mined_at_append: u64,
}

impl HistoryState {
    fn keys(&self) -> Vec<ActionKey> {
        self.log.iter().map(ActionEvent::key).collect()
    }
}

/// Thread-safe history store. All reads and writes serialize on one mutex.
pub struct HistoryStore {
    state: Mutex<HistoryState>,
    capacity: usize,
    mine_interval: u64,
    miner: PatternMiner,
}

impl HistoryStore {
    pub fn new(history: &HistoryConfig, mining: &MiningConfig) -> Self {
        let capacity = history.capacity.max(1);
        Self {
            state: Mutex::new(HistoryState {
                log: VecDeque::with_capacity(capacity.min(1024)),
                index: TransitionIndex::new(),
                patterns: PatternRegistry::new(),
                last_key: None,
                appended: 0,
                mined_at_append: 0,
            }),
            capacity,
            mine_interval: mining.interval.max(1),
            miner: PatternMiner::new(mining),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HistoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append an event, update the index, evict past capacity, and mine on cadence.
    pub fn record(&self, event: ActionEvent) {
        let key = event.key();
        let mut state = self.lock();

        let previous = state.last_key.take();
        state.index.observe(previous.as_ref(), &key);
        state.last_key = Some(key);
        state.log.push_back(event);
        while state.log.len() > self.capacity {
            state.log.pop_front();
        }

        state.appended += 1;
        if state.appended % self.mine_interval == 0 {
            self.mine_locked(&mut state);
        }
    }

    fn mine_locked(&self, state: &mut HistoryState) -> MiningReport {
        let keys = state.keys();
        state.mined_at_append = state.appended;
        self.miner.mine(&keys, &mut state.patterns, Utc::now())
    }

    /// Mine if anything was appended since the last pass, so pattern reads
    /// never lag the log.
    fn refresh_locked(&self, state: &mut HistoryState) {
        if state.appended != state.mined_at_append {
            self.mine_locked(state);
        }
    }

    /// Run a mining pass now, outside the append cadence.
    pub fn mine_now(&self) -> MiningReport {
        let mut state = self.lock();
        self.mine_locked(&mut state)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().log.is_empty()
    }

    /// The last `n` events, oldest first.
    pub fn recent(&self, n: usize) -> Vec<ActionEvent> {
        let state = self.lock();
        let skip = state.log.len().saturating_sub(n);
        state.log.iter().skip(skip).cloned().collect()
    }

    /// Retained events with `timestamp >= since`, in arrival order.
    pub fn actions_since(&self, since: DateTime<Utc>) -> Vec<ActionEvent> {
        self.lock()
            .log
            .iter()
            .filter(|e| e.timestamp >= since)
            .cloned()
            .collect()
    }

    pub fn top_actions(&self, n: usize) -> Vec<(ActionKey, u64)> {
        self.lock().index.top(n)
    }

    pub fn probability(&self, key: &ActionKey) -> f64 {
        self.lock().index.probability(key)
    }

    pub fn successors(&self, key: &ActionKey) -> Vec<Successor> {
        self.lock().index.successors(key).to_vec()
    }

    pub fn patterns(&self, min_occurrences: u32) -> Vec<Pattern> {
        let mut state = self.lock();
        self.refresh_locked(&mut state);
        state.patterns.at_least(min_occurrences)
    }

    /// The last recorded key and its successors, read under one lock.
    pub fn last_successors(&self) -> Option<(ActionKey, Vec<Successor>)> {
        let state = self.lock();
        let last = state.last_key.clone()?;
        let successors = state.index.successors(&last).to_vec();
        Some((last, successors))
    }

    /// Drop every registered pattern. The log and index are untouched.
    pub fn clear_patterns(&self) {
        let mut state = self.lock();
        let dropped = state.patterns.len();
        state.patterns.clear();
        tracing::info!(dropped, "Pattern registry cleared");
    }

    /// Run `f` against the index and an up-to-date registry under one lock acquisition.
    pub fn with_index<R>(&self, f: impl FnOnce(&TransitionIndex, &PatternRegistry) -> R) -> R {
        let mut state = self.lock();
        self.refresh_locked(&mut state);
        f(&state.index, &state.patterns)
    }

    pub fn statistics(&self) -> HistoryStatistics {
        let state = self.lock();
        HistoryStatistics {
            total_recorded: state.index.total(),
            retained: state.log.len(),
            capacity: self.capacity,
            unique_keys: state.index.unique_keys(),
            most_common: state.index.top(1).into_iter().next(),
            total_transitions: state.index.total_transitions(),
            pattern_count: state.patterns.len(),
            appends_since_mining: state.appended - state.mined_at_append,
        }
    }
}
