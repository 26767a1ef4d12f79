// src/suggest/ledger.rs — Accept/reject counters per suggestion kind

use std::collections::BTreeMap;

use super::types::SuggestionKind;

/// Per-kind feedback counter. Accept adds one, reject removes one, floor zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AcceptanceLedger {
    counts: BTreeMap<SuggestionKind, u32>,
    step: f64,
}

impl AcceptanceLedger {
    pub fn new(step: f64) -> Self {
        Self {
            counts: BTreeMap::new(),
            step,
        }
    }

    pub fn accept(&mut self, kind: SuggestionKind) {
        *self.counts.entry(kind).or_default() += 1;
    }

    pub fn reject(&mut self, kind: SuggestionKind) {
        if let Some(c) = self.counts.get_mut(&kind) {
            *c = c.saturating_sub(1);
        }
    }

    pub fn count(&self, kind: SuggestionKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// `1 + count × step`; never below 1.0.
    pub fn multiplier(&self, kind: SuggestionKind) -> f64 {
        1.0 + self.count(kind) as f64 * self.step
    }

    pub fn snapshot(&self) -> BTreeMap<SuggestionKind, u32> {
        self.counts.clone()
    }
}
