// src/patterns/predictor.rs — Next-action ranking from transitions and patterns

use serde::Serialize;

use crate::history::event::ActionKey;
use crate::history::index::TransitionIndex;
use crate::infra::config::PredictionConfig;
use crate::patterns::miner::PatternRegistry;

/// A ranked candidate for the next action.
///
/// `score` is a ranking score. Pattern-sourced scores are not capped at 1.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub key: ActionKey,
    pub score: f64,
    pub rationale: String,
    pub source: PredictionSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionSource {
    Transition,
    Pattern,
}

#[derive(Debug, Clone)]
pub struct Predictor {
    pattern_weight: f64,
    pattern_scale: f64,
}

impl Predictor {
    pub fn new(config: &PredictionConfig) -> Self {
        Self {
            pattern_weight: config.pattern_weight,
            pattern_scale: if config.pattern_scale > 0.0 {
                config.pattern_scale
            } else {
                10.0
            },
        }
    }

    pub fn predict(
        &self,
        index: &TransitionIndex,
        patterns: &PatternRegistry,
        current: &ActionKey,
        max_results: usize,
    ) -> Vec<Prediction> {
        let mut out: Vec<Prediction> = Vec::new();

        let successors = index.successors(current);
        let total = index.successor_total(current);
        if total > 0 {
            for s in successors {
                out.push(Prediction {
                    key: s.key.clone(),
                    score: s.count as f64 / total as f64,
                    rationale: format!(
                        "Followed {} in {} of {} observations",
                        current.describe(),
                        s.count,
                        total
                    ),
                    source: PredictionSource::Transition,
                });
            }
        }

        for pattern in patterns.iter() {
            let Some(next) = pattern.continuation_after(current) else {
                continue;
            };
            if out.iter().any(|p| &p.key == next) {
                continue;
            }
            out.push(Prediction {
                key: next.clone(),
                score: self.pattern_weight * (pattern.occurrences as f64 / self.pattern_scale),
                rationale: format!(
                    "Part of a pattern seen {} times: {}",
                    pattern.occurrences, pattern.description
                ),
                source: PredictionSource::Pattern,
            });
        }

        // sort_by is stable: equal scores keep transition-first order.
        out.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        out.truncate(max_results);
        out
    }
}
