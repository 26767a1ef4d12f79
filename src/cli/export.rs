// src/cli/export.rs — Snapshot export command
//
// Replays an event log, then writes the export report as JSON or YAML.

use std::path::Path;

use crate::assistant::Assistant;
use crate::export::ExportFormat;
use crate::suggest::types::DocRef;

use super::replay;

/// Handle `foresight export`.
pub fn run_export(
    assistant: &Assistant,
    file: &Path,
    document: &str,
    format: &str,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let format = ExportFormat::parse(format)?;
    replay::replay_file(assistant, file, &DocRef::new(document, document), None)?;

    let report = assistant.export_snapshot();
    match output {
        Some(path) => {
            report.write_to(path, format)?;
            println!("Exported snapshot to {}", path.display());
        }
        None => println!("{}", report.render(format)?),
    }
    Ok(())
}
