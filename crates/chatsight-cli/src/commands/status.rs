//! Status command - database statistics

use anyhow::Result;
use chatsight_core::format_bytes;
use chatsight_db::ChatDb;

use crate::cli::{Cli, OutputFormat};
use crate::output::colors;

pub fn run(cli: &Cli, db: &ChatDb) -> Result<()> {
    let stats = db.stats()?;
    let path = db
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| ":memory:".to_string());

    match cli.effective_format() {
        OutputFormat::Human => {
            println!("{}", colors::header("Database Status"));
            println!();
            println!("  {}: {}", colors::label("Database"), path);
            println!(
                "  {}: {}",
                colors::label("Size"),
                format_bytes(stats.db_size_bytes)
            );
            println!(
                "  {}: {}",
                colors::label("Version"),
                colors::value(&stats.version.to_string())
            );
            println!();

            let rows = [
                ("Files", stats.file_count),
                ("Assignments", stats.assignment_count),
                ("Conversations", stats.conversation_count),
                ("Messages", stats.message_count),
                ("Code snapshots", stats.code_version_count),
            ];
            for (name, count) in rows {
                println!(
                    "  {}: {}",
                    colors::label(name),
                    colors::format_count(count)
                );
            }
        }

        OutputFormat::Json => {
            let output = serde_json::json!({
                "dbPath": path,
                "dbSizeBytes": stats.db_size_bytes,
                "version": stats.version,
                "fileCount": stats.file_count,
                "assignmentCount": stats.assignment_count,
                "conversationCount": stats.conversation_count,
                "messageCount": stats.message_count,
                "codeVersionCount": stats.code_version_count,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        OutputFormat::Minimal => println!("{}", path),
    }

    Ok(())
}
