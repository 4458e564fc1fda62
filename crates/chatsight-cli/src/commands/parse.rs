//! Parse command - show the tree a cleaned transcript parses to

use anyhow::{Context, Result};
use chatsight_core::parse_cleaned_file;
use std::path::Path;

use crate::cli::{Cli, OutputFormat};
use crate::output::{human, json};

pub fn run(cli: &Cli, path: &Path) -> Result<()> {
    let parsed = parse_cleaned_file(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    match cli.effective_format() {
        OutputFormat::Human => println!("{}", human::format_parsed(&parsed)),
        OutputFormat::Json => println!("{}", json::format_pretty(&parsed)?),
        OutputFormat::Minimal => {
            for conversation in &parsed.conversations {
                println!(
                    "{}\t{}\t{}",
                    conversation.student,
                    conversation.assignment,
                    conversation.messages.len()
                );
            }
        }
    }

    Ok(())
}
