//! Reprocess command - build the hierarchy for files stored without one

use anyhow::Result;
use chatsight_db::{ChatDb, ReprocessEntry, ReprocessOutcome};

use crate::cli::{Cli, OutputFormat};
use crate::output::colors;

pub fn run(cli: &Cli, db: &mut ChatDb) -> Result<()> {
    let format = cli.effective_format();

    let entries = db.reprocess_files(|entry, i, total| {
        if format == OutputFormat::Human {
            println!("[{}/{}] {}", i, total, describe(entry));
        }
    })?;

    let projected = entries
        .iter()
        .filter(|e| matches!(e.outcome, ReprocessOutcome::Projected(_)))
        .count();
    let failed = entries
        .iter()
        .filter(|e| matches!(e.outcome, ReprocessOutcome::Failed(_)))
        .count();

    match format {
        OutputFormat::Human => {
            println!();
            let summary = format!(
                "{} of {} files projected, {} failed",
                projected,
                entries.len(),
                failed
            );
            if failed > 0 {
                println!("{}", colors::warning(&summary));
            } else {
                println!("{}", colors::success(&summary));
            }
        }
        OutputFormat::Json => {
            for entry in &entries {
                println!("{}", entry_json(entry));
            }
        }
        OutputFormat::Minimal => {
            for entry in entries
                .iter()
                .filter(|e| matches!(e.outcome, ReprocessOutcome::Projected(_)))
            {
                println!("{}", entry.file_id);
            }
        }
    }

    Ok(())
}

fn describe(entry: &ReprocessEntry) -> String {
    let name = format!("{} {}", colors::colored_id(entry.file_id), entry.filename);
    match &entry.outcome {
        ReprocessOutcome::Projected(counts) => colors::success(&format!(
            "{}: {} assignments, {} conversations, {} messages",
            name, counts.assignment_count, counts.conversation_count, counts.message_count
        )),
        ReprocessOutcome::AlreadyProjected { assignments } => {
            format!("{}: {} existing assignments, skipped", name, assignments)
        }
        ReprocessOutcome::NoConversations => {
            colors::warning(&format!("{}: no conversations found, skipped", name))
        }
        ReprocessOutcome::Failed(err) => colors::error(&format!("{}: {}", name, err)),
    }
}

fn entry_json(entry: &ReprocessEntry) -> serde_json::Value {
    let (status, detail) = match &entry.outcome {
        ReprocessOutcome::Projected(counts) => ("projected", serde_json::json!(counts)),
        ReprocessOutcome::AlreadyProjected { assignments } => {
            ("skipped", serde_json::json!({ "existingAssignments": assignments }))
        }
        ReprocessOutcome::NoConversations => (
            "skipped",
            serde_json::json!({ "reason": "no conversations" }),
        ),
        ReprocessOutcome::Failed(err) => ("failed", serde_json::json!({ "error": err })),
    };
    serde_json::json!({
        "fileId": entry.file_id,
        "filename": entry.filename,
        "status": status,
        "detail": detail,
    })
}
