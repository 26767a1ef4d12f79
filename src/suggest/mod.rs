// src/suggest/mod.rs — Context snapshots, suggestion generation, ranking and feedback

pub mod collaborators;
pub mod engine;
pub mod ledger;
pub mod reactive;
pub mod rules;
pub mod types;

pub use collaborators::{LayoutAdvice, LayoutAdvisor, PreferenceLookup, QualityQuery};
pub use engine::SuggestionEngine;
pub use ledger::AcceptanceLedger;
pub use rules::Collaborators;
pub use types::{
    ContextSnapshot, DocRef, RecommendedAction, SelectionSummary, Suggestion, SuggestionKind,
    SuggestionSource,
};
