// src/suggest/collaborators.rs — Host capabilities the generator queries

use serde::{Deserialize, Serialize};

use crate::history::event::ViewContext;
use crate::suggest::types::DocRef;

/// Counts of elements that still need annotation.
pub trait QualityQuery: Send + Sync {
    fn untagged_count(&self, doc: &DocRef, category: &str) -> anyhow::Result<usize>;
}

/// One placement recommendation for a near-empty container view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutAdvice {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<(String, String)>,
}

/// Placement advice for sheets with zero or one placed view.
pub trait LayoutAdvisor: Send + Sync {
    fn advise(
        &self,
        doc: &DocRef,
        view: &ViewContext,
        placed_views: usize,
    ) -> anyhow::Result<Vec<LayoutAdvice>>;
}

/// The user's preferred choice for a category (e.g. a family type), if any.
///
/// Only enriches suggestion text; never changes ranking.
pub trait PreferenceLookup: Send + Sync {
    fn preference(&self, category: &str) -> Option<String>;
}
