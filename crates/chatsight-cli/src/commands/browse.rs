//! Hierarchy commands - walk file → assignment → conversation → message

use anyhow::{bail, Result};
use chatsight_db::ChatDb;

use crate::cli::{Cli, OutputFormat};
use crate::output::{colors, human, json, minimal};

pub fn assignments(cli: &Cli, db: &ChatDb, file_id: i64) -> Result<()> {
    if db.get_file(file_id)?.is_none() {
        bail!("File not found: {}", file_id);
    }
    let assignments = db.assignments_for_file(file_id)?;

    match cli.effective_format() {
        OutputFormat::Human => {
            if assignments.is_empty() {
                println!(
                    "{}",
                    colors::warning("No assignments; run `chatsight reprocess` to project the file")
                );
                return Ok(());
            }
            println!("{}", colors::header("Assignments"));
            println!();
            for assignment in &assignments {
                let count = db.conversations_for_assignment(assignment.id)?.len();
                println!(
                    "{}  {}",
                    human::format_assignment(assignment),
                    colors::label(&format!("{} conversations", count))
                );
            }
        }
        OutputFormat::Json => {
            for assignment in &assignments {
                println!("{}", json::format_line(assignment)?);
            }
        }
        OutputFormat::Minimal => {
            for assignment in &assignments {
                println!("{}\t{}", assignment.id, assignment.assignment_ref);
            }
        }
    }

    Ok(())
}

pub fn conversations(cli: &Cli, db: &ChatDb, assignment_id: i64) -> Result<()> {
    let conversations = db.conversations_for_assignment(assignment_id)?;

    match cli.effective_format() {
        OutputFormat::Human => {
            if conversations.is_empty() {
                println!("{}", colors::warning("No conversations found"));
                return Ok(());
            }
            println!("{}", colors::header("Conversations"));
            println!();
            for conversation in &conversations {
                let count = db.messages_for_conversation(conversation.id)?.len();
                println!(
                    "{}  {}",
                    human::format_conversation(conversation),
                    colors::label(&format!("{} messages", count))
                );
            }
        }
        OutputFormat::Json => {
            for conversation in &conversations {
                println!("{}", json::format_line(conversation)?);
            }
        }
        OutputFormat::Minimal => {
            for conversation in &conversations {
                println!("{}\t{}", conversation.id, conversation.student);
            }
        }
    }

    Ok(())
}

pub fn messages(cli: &Cli, db: &ChatDb, conversation_id: i64, full: bool) -> Result<()> {
    let Some(conversation) = db.get_conversation(conversation_id)? else {
        bail!("Conversation not found: {}", conversation_id);
    };
    let messages = db.messages_for_conversation(conversation_id)?;

    match cli.effective_format() {
        OutputFormat::Human => {
            println!(
                "{} {}",
                colors::header("Conversation"),
                human::format_conversation(&conversation)
            );
            println!();
            for message in &messages {
                println!("{}", human::format_message(message, full));
            }
        }
        OutputFormat::Json => {
            for message in &messages {
                println!("{}", json::format_line(message)?);
            }
        }
        OutputFormat::Minimal => {
            for message in &messages {
                println!("{}", minimal::format_message(message));
            }
        }
    }

    Ok(())
}
