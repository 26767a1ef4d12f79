// src/history/index.rs — Unigram counts and bigram "follows" multisets

use std::collections::HashMap;

use serde::Serialize;

use super::event::ActionKey;

/// One successor of a key and how many times it was observed right after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Successor {
    pub key: ActionKey,
    pub count: u64,
}

/// Lifetime frequency and transition statistics.
///
/// Updated one event at a time by the history store; never rebuilt from the log,
/// so eviction from the bounded log does not rewind it.
#[derive(Debug, Default)]
pub struct TransitionIndex {
    counts: HashMap<ActionKey, u64>,
    follows: HashMap<ActionKey, Vec<Successor>>,
    total: u64,
    transitions: u64,
}

impl TransitionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `key`, plus the adjacency `previous → key` if any.
    pub fn observe(&mut self, previous: Option<&ActionKey>, key: &ActionKey) {
        *self.counts.entry(key.clone()).or_default() += 1;
        self.total += 1;

        if let Some(prev) = previous {
            let successors = self.follows.entry(prev.clone()).or_default();
            match successors.iter_mut().find(|s| &s.key == key) {
                Some(s) => s.count += 1,
                None => successors.push(Successor {
                    key: key.clone(),
                    count: 1,
                }),
            }
            self.transitions += 1;
        }
    }

    pub fn count(&self, key: &ActionKey) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn total_transitions(&self) -> u64 {
        self.transitions
    }

    pub fn unique_keys(&self) -> usize {
        self.counts.len()
    }

    /// Share of all observations that were `key`; 0 when unseen.
    pub fn probability(&self, key: &ActionKey) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(key) as f64 / self.total as f64
    }

    /// Successors of `key` in first-seen order.
    pub fn successors(&self, key: &ActionKey) -> &[Successor] {
        self.follows.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of observed adjacencies starting at `key`.
    pub fn successor_total(&self, key: &ActionKey) -> u64 {
        self.successors(key).iter().map(|s| s.count).sum()
    }

    /// Top `n` keys by count, ties broken alphabetically.
    pub fn top(&self, n: usize) -> Vec<(ActionKey, u64)> {
        let mut all: Vec<(ActionKey, u64)> =
            self.counts.iter().map(|(k, c)| (k.clone(), *c)).collect();
        all.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        all.truncate(n);
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> ActionKey {
        ActionKey::parse(s)
    }

    #[test]
    fn test_empty_index_is_zero_valued() {
        let idx = TransitionIndex::new();
        assert_eq!(idx.probability(&key("Add|Walls")), 0.0);
        assert!(idx.successors(&key("Add|Walls")).is_empty());
        assert!(idx.top(5).is_empty());
    }

    #[test]
    fn test_counts_and_probability() {
        let mut idx = TransitionIndex::new();
        let walls = key("Add|Walls");
        let doors = key("Add|Doors");
        idx.observe(None, &walls);
        idx.observe(Some(&walls), &doors);
        idx.observe(Some(&doors), &walls);
        idx.observe(Some(&walls), &walls);

        assert_eq!(idx.count(&walls), 3);
        assert_eq!(idx.total(), 4);
        assert!((idx.probability(&walls) - 0.75).abs() < 1e-9);
        assert_eq!(idx.total_transitions(), 3);
    }

    #[test]
    fn test_successors_first_seen_order() {
        let mut idx = TransitionIndex::new();
        let walls = key("Add|Walls");
        let doors = key("Add|Doors");
        let windows = key("Add|Windows");
        idx.observe(Some(&walls), &windows);
        idx.observe(Some(&walls), &doors);
        idx.observe(Some(&walls), &doors);

        let succ = idx.successors(&walls);
        assert_eq!(succ[0].key, windows);
        assert_eq!(succ[0].count, 1);
        assert_eq!(succ[1].key, doors);
        assert_eq!(succ[1].count, 2);
        assert_eq!(idx.successor_total(&walls), 3);
    }

    #[test]
    fn test_top_orders_by_count_then_key() {
        let mut idx = TransitionIndex::new();
        for k in ["Add|Walls", "Add|Doors", "Add|Walls", "Save|Unknown", "Add|Doors"] {
            idx.observe(None, &key(k));
        }
        let top = idx.top(2);
        assert_eq!(top[0], (key("Add|Doors"), 2));
        assert_eq!(top[1], (key("Add|Walls"), 2));
    }
}
