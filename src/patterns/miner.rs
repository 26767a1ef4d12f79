// src/patterns/miner.rs — Sliding-window sequence mining over the action history

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::history::event::ActionKey;
use crate::infra::config::MiningConfig;

/// A recurring fixed-length run of action keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pattern {
    /// The keys joined with `|`.
    pub signature: String,
    pub keys: Vec<ActionKey>,
    pub length: usize,
    pub occurrences: u32,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub description: String,
}

impl Pattern {
    /// The key that follows `key` inside this pattern, when `key` opens it.
    pub fn continuation_after(&self, key: &ActionKey) -> Option<&ActionKey> {
        match self.keys.as_slice() {
            [first, next, ..] if first == key => Some(next),
            _ => None,
        }
    }
}

pub fn signature_of(keys: &[ActionKey]) -> String {
    keys.iter()
        .map(ActionKey::as_str)
        .collect::<Vec<_>>()
        .join("|")
}

pub fn describe(keys: &[ActionKey]) -> String {
    keys.iter()
        .map(ActionKey::describe)
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Every pattern that has ever crossed the occurrence threshold.
///
/// Entries are refreshed when re-detected and are only removed by `clear`.
#[derive(Debug, Default)]
pub struct PatternRegistry {
    patterns: BTreeMap<String, Pattern>,
}

impl PatternRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn get(&self, signature: &str) -> Option<&Pattern> {
        self.patterns.get(signature)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.values()
    }

    pub fn clear(&mut self) {
        self.patterns.clear();
    }

    /// Returns true when the signature was not registered before.
    fn upsert(&mut self, keys: &[ActionKey], occurrences: u32, now: DateTime<Utc>) -> bool {
        let signature = signature_of(keys);
        if let Some(existing) = self.patterns.get_mut(&signature) {
            existing.occurrences = occurrences;
            existing.last_seen = now;
            return false;
        }
        self.patterns.insert(
            signature.clone(),
            Pattern {
                signature,
                keys: keys.to_vec(),
                length: keys.len(),
                occurrences,
                first_seen: now,
                last_seen: now,
                description: describe(keys),
            },
        );
        true
    }

    /// Patterns with at least `min_occurrences`, most frequent first.
    pub fn at_least(&self, min_occurrences: u32) -> Vec<Pattern> {
        let mut out: Vec<Pattern> = self
            .patterns
            .values()
            .filter(|p| p.occurrences >= min_occurrences)
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            b.occurrences
                .cmp(&a.occurrences)
                .then_with(|| a.signature.cmp(&b.signature))
        });
        out
    }
}

/// Outcome of one mining pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MiningReport {
    pub windows_scanned: usize,
    pub detected: usize,
    pub new_patterns: usize,
}

/// Full-rescan n-gram miner. Counts are exact over the current log.
#[derive(Debug, Clone)]
pub struct PatternMiner {
    window_lengths: Vec<usize>,
    min_occurrences: u32,
}

impl PatternMiner {
    pub fn new(config: &MiningConfig) -> Self {
        Self {
            window_lengths: config.window_lengths.clone(),
            min_occurrences: config.min_occurrences,
        }
    }

    /// Tally every window of every configured length and upsert the frequent ones.
    pub fn mine(
        &self,
        keys: &[ActionKey],
        registry: &mut PatternRegistry,
        now: DateTime<Utc>,
    ) -> MiningReport {
        let mut report = MiningReport::default();

        for &len in &self.window_lengths {
            if len == 0 || keys.len() < len {
                continue;
            }

            let mut tally: HashMap<&[ActionKey], u32> = HashMap::new();
            for window in keys.windows(len) {
                *tally.entry(window).or_default() += 1;
                report.windows_scanned += 1;
            }

            for (window, count) in tally {
                if count < self.min_occurrences {
                    continue;
                }
                report.detected += 1;
                if registry.upsert(window, count, now) {
                    report.new_patterns += 1;
                }
            }
        }

        tracing::debug!(
            windows = report.windows_scanned,
            detected = report.detected,
            new = report.new_patterns,
            "Mining pass complete"
        );
        report
    }
}
