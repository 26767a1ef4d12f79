// src/tasks.rs — Named task bracketing over the action history

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::history::event::ActionEvent;
use crate::history::store::HistoryStore;

/// A sealed task with the actions recorded while it was open.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskSession {
    pub id: String,
    pub name: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub actions: Vec<ActionEvent>,
}

impl TaskSession {
    pub fn duration_secs(&self) -> i64 {
        (self.ended_at - self.started_at).num_seconds().max(0)
    }
}

struct ActiveTask {
    name: String,
    started_at: DateTime<Utc>,
}

#[derive(Default)]
struct TrackerState {
    active: Option<ActiveTask>,
    archive: Vec<TaskSession>,
}

/// Idle/Active state machine. Lock order: tracker, then history.
#[derive(Default)]
pub struct TaskTracker {
    state: Mutex<TrackerState>,
}

impl TaskTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Open a task. An already-open task is sealed first and returned.
    pub fn start_task(&self, name: &str, history: &HistoryStore) -> Option<TaskSession> {
        let mut state = self.lock();
        let sealed = Self::seal(&mut state, history);
        if let Some(ref s) = sealed {
            tracing::info!(task = %s.name, actions = s.actions.len(), "Task implicitly ended");
        }
        state.active = Some(ActiveTask {
            name: name.to_string(),
            started_at: Utc::now(),
        });
        tracing::info!(task = name, "Task started");
        sealed
    }

    /// Seal the open task. Idle trackers return `None`.
    pub fn end_task(&self, history: &HistoryStore) -> Option<TaskSession> {
        let mut state = self.lock();
        let sealed = Self::seal(&mut state, history);
        if let Some(ref s) = sealed {
            tracing::info!(task = %s.name, actions = s.actions.len(), "Task ended");
        }
        sealed
    }

    fn seal(state: &mut TrackerState, history: &HistoryStore) -> Option<TaskSession> {
        let active = state.active.take()?;
        let session = TaskSession {
            id: Uuid::new_v4().to_string(),
            actions: history.actions_since(active.started_at),
            name: active.name,
            started_at: active.started_at,
            ended_at: Utc::now(),
        };
        state.archive.push(session.clone());
        Some(session)
    }

    pub fn current_task(&self) -> Option<String> {
        self.lock().active.as_ref().map(|a| a.name.clone())
    }

    /// Archived sessions whose name contains `filter`, case-insensitively.
    pub fn sessions(&self, filter: &str) -> Vec<TaskSession> {
        let needle = filter.to_lowercase();
        self.lock()
            .archive
            .iter()
            .filter(|s| needle.is_empty() || s.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    pub fn session_count(&self) -> usize {
        self.lock().archive.len()
    }
}
