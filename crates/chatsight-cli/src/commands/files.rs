//! File commands - list, show and delete stored uploads

use anyhow::{bail, Result};
use chatsight_db::ChatDb;

use crate::cli::{Cli, OutputFormat};
use crate::output::{colors, human, json, minimal};

pub fn list(cli: &Cli, db: &ChatDb) -> Result<()> {
    let files = db.list_files()?;

    match cli.effective_format() {
        OutputFormat::Human => {
            if files.is_empty() {
                println!("{}", colors::warning("No files stored"));
                return Ok(());
            }
            println!(
                "{}",
                colors::header(&format!("Files ({})", colors::format_count(files.len() as i64)))
            );
            println!();
            for file in &files {
                println!("{}", human::format_file(file));
            }
        }
        OutputFormat::Json => {
            for file in &files {
                println!("{}", json::format_line(file)?);
            }
        }
        OutputFormat::Minimal => {
            for file in &files {
                println!("{}", minimal::format_file(file));
            }
        }
    }

    Ok(())
}

pub fn show(cli: &Cli, db: &ChatDb, id: i64, show_content: bool) -> Result<()> {
    let Some(file) = db.get_file(id)? else {
        bail!("File not found: {}", id);
    };

    match cli.effective_format() {
        OutputFormat::Human => {
            println!("{}", colors::header("File Info"));
            println!();
            println!("{}", human::format_file_info(&file, show_content));
        }
        OutputFormat::Json => {
            if show_content {
                println!("{}", json::format_pretty(&file)?);
            } else {
                println!("{}", json::format_pretty(&file.metadata())?);
            }
        }
        OutputFormat::Minimal => print!("{}", file.content),
    }

    Ok(())
}

pub fn delete(cli: &Cli, db: &ChatDb, id: i64) -> Result<()> {
    db.delete_file(id)?;

    match cli.effective_format() {
        OutputFormat::Human => {
            println!("{}", colors::success(&format!("Deleted file {}", id)))
        }
        OutputFormat::Json => println!("{}", serde_json::json!({ "deleted": id })),
        OutputFormat::Minimal => println!("{}", id),
    }

    Ok(())
}
