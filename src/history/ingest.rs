// src/history/ingest.rs — Collaborator change feed → normalized events

use serde::{Deserialize, Serialize};

use super::event::{ActionDetails, ActionEvent, ActionKind, ViewContext};

/// A document change as delivered by the host application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeNotification {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub added: Vec<i64>,
    #[serde(default)]
    pub removed: Vec<i64>,
    #[serde(default)]
    pub modified: Vec<i64>,
    #[serde(default)]
    pub transaction: Option<String>,
    #[serde(default)]
    pub view: Option<ViewContext>,
}

impl ChangeNotification {
    pub fn new(category: &str) -> Self {
        Self {
            category: category.to_string(),
            ..Default::default()
        }
    }

    pub fn added(mut self, ids: Vec<i64>) -> Self {
        self.added = ids;
        self
    }

    pub fn removed(mut self, ids: Vec<i64>) -> Self {
        self.removed = ids;
        self
    }

    pub fn modified(mut self, ids: Vec<i64>) -> Self {
        self.modified = ids;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    /// One event per non-empty id list, in Add, Delete, Modify order.
    pub fn into_events(self) -> Vec<ActionEvent> {
        let Self {
            category,
            added,
            removed,
            modified,
            transaction,
            view,
        } = self;

        let batches = [
            (ActionKind::Add, added),
            (ActionKind::Delete, removed),
            (ActionKind::Modify, modified),
        ];

        batches
            .into_iter()
            .filter(|(_, ids)| !ids.is_empty())
            .map(|(kind, ids)| {
                let details = match kind {
                    ActionKind::Add => ActionDetails::Elements {
                        added: ids.clone(),
                        removed: Vec::new(),
                        modified: Vec::new(),
                    },
                    ActionKind::Delete => ActionDetails::Elements {
                        added: Vec::new(),
                        removed: ids.clone(),
                        modified: Vec::new(),
                    },
                    _ => ActionDetails::Elements {
                        added: Vec::new(),
                        removed: Vec::new(),
                        modified: ids.clone(),
                    },
                };
                let mut event = ActionEvent::new(kind, &category)
                    .with_count(ids.len() as u32)
                    .with_details(details);
                event.view = view.clone();
                event.transaction = transaction.clone();
                event
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_notification_yields_nothing() {
        let n = ChangeNotification::new("Walls");
        assert!(n.is_empty());
        assert!(n.into_events().is_empty());
    }

    #[test]
    fn test_events_in_add_delete_modify_order() {
        let n = ChangeNotification::new("Doors")
            .modified(vec![7])
            .added(vec![1, 2])
            .removed(vec![3]);
        let events = n.into_events();
        let kinds: Vec<ActionKind> = events.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![ActionKind::Add, ActionKind::Delete, ActionKind::Modify]
        );
        assert_eq!(events[0].element_count, 2);
        assert_eq!(events[1].element_count, 1);
        assert_eq!(events[0].key().as_str(), "Add|Doors");
    }

    #[test]
    fn test_transaction_and_view_carried() {
        let mut n = ChangeNotification::new("Walls").added(vec![1]);
        n.transaction = Some("Wall".into());
        n.view = Some(ViewContext::new(3, "Level 1", "FloorPlan"));
        let events = n.into_events();
        assert_eq!(events[0].transaction.as_deref(), Some("Wall"));
        assert_eq!(events[0].view.as_ref().unwrap().view_name, "Level 1");
    }

    #[test]
    fn test_missing_category_normalizes() {
        let events = ChangeNotification::default().modified(vec![5]).into_events();
        assert_eq!(events[0].key().as_str(), "Modify|Unknown");
    }
}
