// src/suggest/reactive.rs — Immediate per-event suggestions with fixed thresholds

use std::collections::HashMap;

use crate::history::event::{ActionEvent, ActionKind, ViewContext};
use crate::infra::config::SuggestionsConfig;

use super::types::{DocRef, RecommendedAction, Suggestion, SuggestionKind, SuggestionSource};

/// Counters the reactive rules need across events.
#[derive(Debug, Default)]
pub struct ReactiveState {
    modifications: u64,
    view_visits: HashMap<i64, u32>,
}

impl ReactiveState {
    pub fn modifications(&self) -> u64 {
        self.modifications
    }
}

pub fn react(
    config: &SuggestionsConfig,
    state: &mut ReactiveState,
    event: &ActionEvent,
    doc: &DocRef,
) -> Vec<Suggestion> {
    let mut out = Vec::new();

    match event.kind {
        ActionKind::Add if batch_of(event, "Walls", config.wall_batch_threshold) => {
            out.push(
                Suggestion::new(
                    SuggestionKind::NextStep,
                    "Place doors and windows",
                    format!(
                        "You just added {} walls. Openings usually come next.",
                        event.element_count
                    ),
                    0.9,
                    SuggestionSource::Reactive,
                )
                .with_action(RecommendedAction::from_kind(ActionKind::Add, "Doors")),
            );
        }
        ActionKind::Add if batch_of(event, "Rooms", config.wall_batch_threshold) => {
            out.push(
                Suggestion::new(
                    SuggestionKind::QualityCheck,
                    "Tag new rooms",
                    format!("{} rooms were placed without tags.", event.element_count),
                    0.75,
                    SuggestionSource::Reactive,
                )
                .with_action(RecommendedAction::new("Tag").param("category", "Rooms")),
            );
        }
        ActionKind::Modify => {
            state.modifications += 1;
            if state.modifications % config.save_interval.max(1) == 0 {
                out.push(
                    Suggestion::new(
                        SuggestionKind::General,
                        format!("Save {}", doc.display_name()),
                        format!(
                            "{} modifications since this session started.",
                            state.modifications
                        ),
                        0.7,
                        SuggestionSource::Reactive,
                    )
                    .with_action(RecommendedAction::new("Save").param("document", doc.id.as_str())),
                );
            }
        }
        ActionKind::ViewChange => {
            if let Some(view) = &event.view {
                if let Some(s) = revisit(config, state, view) {
                    out.push(s);
                }
            }
        }
        _ => {}
    }

    out
}

fn batch_of(event: &ActionEvent, category: &str, threshold: usize) -> bool {
    event.category.eq_ignore_ascii_case(category) && event.element_count as usize >= threshold
}

/// Fires once, on the visit that reaches the threshold.
fn revisit(
    config: &SuggestionsConfig,
    state: &mut ReactiveState,
    view: &ViewContext,
) -> Option<Suggestion> {
    let visits = state.view_visits.entry(view.view_id).or_default();
    *visits += 1;
    if *visits != config.view_revisit_threshold {
        return None;
    }
    let name = if view.view_name.is_empty() {
        format!("view {}", view.view_id)
    } else {
        view.view_name.clone()
    };
    Some(
        Suggestion::new(
            SuggestionKind::ViewSwitch,
            format!("Keep {name} open"),
            format!("You have returned to {name} {visits} times. Tile it next to your work."),
            0.5,
            SuggestionSource::Reactive,
        )
        .with_action(RecommendedAction::new("TileView").param("view_id", view.view_id.to_string())),
    )
}
