//! Turns command - code snapshots paired with the student turn behind them

use anyhow::{bail, Result};
use chatsight_core::{diff_stats, pair_code_turns, split_lines};
use chatsight_db::ChatDb;

use crate::cli::{Cli, OutputFormat};
use crate::output::json::TurnOutput;
use crate::output::{colors, human, json, minimal};

pub fn run(cli: &Cli, db: &ChatDb, conversation_id: i64, show_diff: bool) -> Result<()> {
    if db.get_conversation(conversation_id)?.is_none() {
        bail!("Conversation not found: {}", conversation_id);
    }
    let messages = db.messages_for_conversation(conversation_id)?;
    let turns = pair_code_turns(&messages);

    match cli.effective_format() {
        OutputFormat::Human => {
            if turns.is_empty() {
                println!("{}", colors::warning("No code snapshots in this conversation"));
                return Ok(());
            }
            for (i, turn) in turns.iter().enumerate() {
                let prompt = turn
                    .student
                    .map(|m| m.preview(60))
                    .unwrap_or_else(|| colors::label("(no student turn)"));
                println!(
                    "{} {} {}",
                    colors::header(&format!("Step {}", i + 1)),
                    colors::label(&format!("message {}", turn.code.sort_order)),
                    prompt
                );

                match turn.diff_from_previous() {
                    Some(diff) => {
                        println!("  {}", human::format_diff_stats(&diff_stats(&diff)));
                        if show_diff {
                            for line in &diff {
                                println!("  {}", human::format_diff_line(line));
                            }
                        }
                    }
                    None => {
                        let lines = split_lines(&turn.code.content).len();
                        println!("  {}", colors::label(&format!("{} lines", lines)));
                        if show_diff {
                            println!("{}", human::format_message(turn.code, true));
                        }
                    }
                }
                println!();
            }
        }
        OutputFormat::Json => {
            for turn in &turns {
                let diff = turn.diff_from_previous();
                let output = TurnOutput {
                    position: turn.position,
                    code: turn.code,
                    student: turn.student,
                    stats: diff.as_deref().map(|d| json::format_stats(&diff_stats(d))),
                    diff: if show_diff { diff } else { None },
                };
                println!("{}", json::format_line(&output)?);
            }
        }
        OutputFormat::Minimal => {
            for turn in &turns {
                match turn.diff_from_previous() {
                    Some(diff) if show_diff => {
                        for line in &diff {
                            println!("{}", minimal::format_diff_line(line));
                        }
                    }
                    _ => println!("{}", minimal::format_message(turn.code)),
                }
            }
        }
    }

    Ok(())
}
