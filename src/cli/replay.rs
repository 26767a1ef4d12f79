// src/cli/replay.rs — Feed a JSON-lines event log through an Assistant

use std::path::Path;

use chrono::Utc;
use serde::Deserialize;

use crate::assistant::Assistant;
use crate::history::event::{ActionEvent, ActionKey};
use crate::history::ingest::ChangeNotification;
use crate::infra::errors::{ForesightError, Result};
use crate::suggest::types::{ContextSnapshot, DocRef};

/// One line of a replay file, tagged by `"type"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayRecord {
    Action(ActionEvent),
    Change(ChangeNotification),
    TaskStart { name: String },
    TaskEnd,
    Context(ContextSnapshot),
    Accept { title: String },
    Reject { title: String },
}

/// Counts of what a replay did, for the summary line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub records: usize,
    pub actions: usize,
    pub sessions_sealed: usize,
    pub context_updates: usize,
    pub feedback: usize,
}

/// Parse replay lines. Blank lines and `#` comments are skipped.
pub fn parse_replay(content: &str) -> Result<Vec<ReplayRecord>> {
    let mut records = Vec::new();
    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let record = serde_json::from_str(trimmed).map_err(|e| ForesightError::Replay {
            line: i + 1,
            message: e.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}

pub fn load_replay(path: &Path) -> Result<Vec<ReplayRecord>> {
    let content = std::fs::read_to_string(path)?;
    parse_replay(&content)
}

/// Apply records in order. Actions are reacted to before they are recorded.
///
/// Actions are re-stamped with the wall clock as they are applied, so that
/// `task_start`/`task_end` lines bracket the actions between them.
pub fn apply(assistant: &Assistant, records: Vec<ReplayRecord>, doc: &DocRef) -> ReplaySummary {
    let mut summary = ReplaySummary::default();

    for record in records {
        summary.records += 1;
        match record {
            ReplayRecord::Action(event) => {
                let event = event.at(Utc::now());
                assistant.process_event(&event, doc);
                assistant.record(event);
                summary.actions += 1;
            }
            ReplayRecord::Change(change) => {
                summary.actions += change.clone().into_events().len();
                assistant.ingest_change(change, doc);
            }
            ReplayRecord::TaskStart { name } => {
                if assistant.start_task(&name).is_some() {
                    summary.sessions_sealed += 1;
                }
            }
            ReplayRecord::TaskEnd => {
                if assistant.end_task().is_some() {
                    summary.sessions_sealed += 1;
                }
            }
            ReplayRecord::Context(snapshot) => {
                assistant.update_context(&snapshot);
                summary.context_updates += 1;
            }
            ReplayRecord::Accept { title } => {
                if assistant.accept_suggestion(&title).is_some() {
                    summary.feedback += 1;
                }
            }
            ReplayRecord::Reject { title } => {
                if assistant.reject_suggestion(&title).is_some() {
                    summary.feedback += 1;
                }
            }
        }
    }

    tracing::debug!(?summary, "Replay applied");
    summary
}

/// Read a single `ContextSnapshot` JSON document.
pub fn load_context(path: &Path) -> Result<ContextSnapshot> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Replay a file, force a mining pass, then evaluate the final context if one is given.
pub fn replay_file(
    assistant: &Assistant,
    file: &Path,
    doc: &DocRef,
    context: Option<&Path>,
) -> Result<ReplaySummary> {
    let records = load_replay(file)?;
    let snapshot = context.map(load_context).transpose()?;

    let mut summary = apply(assistant, records, doc);
    assistant.mine_now();
    if let Some(snapshot) = snapshot {
        assistant.update_context(&snapshot);
        summary.context_updates += 1;
    }
    Ok(summary)
}

/// Handle `foresight replay`.
pub fn run_replay(
    assistant: &Assistant,
    file: &Path,
    document: &str,
    context: Option<&Path>,
    predict: Option<&str>,
    top: usize,
) -> anyhow::Result<()> {
    let doc = DocRef::new(document, document);
    let summary = replay_file(assistant, file, &doc, context)?;

    println!(
        "Replayed {} records ({} actions, {} sessions, {} context updates, {} feedback)",
        summary.records,
        summary.actions,
        summary.sessions_sealed,
        summary.context_updates,
        summary.feedback
    );
    println!();

    let stats = assistant.statistics();
    println!(
        "History: {}/{} retained, {} recorded, {} unique actions, {} patterns",
        stats.retained, stats.capacity, stats.total_recorded, stats.unique_keys, stats.pattern_count
    );
    println!();

    let top_actions = assistant.action_frequencies(top);
    if !top_actions.is_empty() {
        println!("Top actions:");
        for (key, count) in &top_actions {
            println!(
                "  {:<32} {:>6}  ({:.1}%)",
                key.as_str(),
                count,
                assistant.probability(key) * 100.0
            );
        }
        println!();
    }

    let patterns = assistant.patterns(0);
    if !patterns.is_empty() {
        println!("Patterns:");
        for p in patterns.iter().take(top) {
            println!("  {:>4}x  {}", p.occurrences, p.description);
        }
        println!();
    }

    let current = predict
        .map(ActionKey::parse)
        .or_else(|| assistant.statistics().most_common.map(|(k, _)| k));
    if let Some(current) = current {
        let predictions = assistant.predict(&current, top);
        println!("After {}:", current.describe());
        if predictions.is_empty() {
            println!("  (no prediction)");
        }
        for p in &predictions {
            println!("  {:<32} {:>6.2}  {}", p.key.as_str(), p.score, p.rationale);
        }
        println!();
    }

    let suggestions = assistant.suggestions(top);
    if suggestions.is_empty() {
        println!("No pending suggestions.");
    } else {
        println!("Suggestions:");
        for s in &suggestions {
            println!(
                "  [{:<19}] {:.2}  {}: {}",
                s.kind.as_str(),
                s.relevance,
                s.title,
                s.description
            );
        }
    }

    Ok(())
}
