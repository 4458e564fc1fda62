//! Code commands - stored snapshots and line diffs

use anyhow::{bail, Context, Result};
use chatsight_core::{compute_diff, diff_stats, DiffLine};
use chatsight_db::ChatDb;
use std::path::Path;

use crate::cli::{Cli, OutputFormat};
use crate::output::{colors, human, json, minimal};

pub fn get(cli: &Cli, db: &ChatDb, index: i64) -> Result<()> {
    let Some(snapshot) = db.get_code(index)? else {
        bail!("No code stored at index {}", index);
    };

    match cli.effective_format() {
        OutputFormat::Json => println!("{}", json::format_pretty(&snapshot)?),
        OutputFormat::Human | OutputFormat::Minimal => println!("{}", snapshot.code_content),
    }

    Ok(())
}

pub fn save(cli: &Cli, db: &ChatDb, index: i64, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    db.save_code(index, &content)?;

    match cli.effective_format() {
        OutputFormat::Human => println!(
            "{}",
            colors::success(&format!("Saved {} as code at index {}", path.display(), index))
        ),
        OutputFormat::Json => println!("{}", serde_json::json!({ "messageIndex": index })),
        OutputFormat::Minimal => println!("{}", index),
    }

    Ok(())
}

pub fn list(cli: &Cli, db: &ChatDb) -> Result<()> {
    let indices = db.code_indices()?;

    match cli.effective_format() {
        OutputFormat::Json => println!("{}", serde_json::json!(indices)),
        OutputFormat::Human if indices.is_empty() => {
            println!("{}", colors::warning("No code snapshots stored"))
        }
        OutputFormat::Human | OutputFormat::Minimal => {
            for index in indices {
                println!("{}", index);
            }
        }
    }

    Ok(())
}

pub fn diff(cli: &Cli, db: &ChatDb, from: i64, to: i64, changes_only: bool) -> Result<()> {
    let mut data = db.code_diff(from, to)?;

    match cli.effective_format() {
        OutputFormat::Json => {
            if changes_only {
                data.diff = visible_lines(&data.diff, true).into_iter().cloned().collect();
            }
            println!("{}", json::format_pretty(&data)?)
        }
        format => print_diff(
            format,
            &format!("Code {} → {}", from, to),
            &data.diff,
            changes_only,
        ),
    }

    Ok(())
}

pub fn diff_files(cli: &Cli, old: &Path, new: &Path, changes_only: bool) -> Result<()> {
    let old_text = std::fs::read_to_string(old)
        .with_context(|| format!("Failed to read {}", old.display()))?;
    let new_text = std::fs::read_to_string(new)
        .with_context(|| format!("Failed to read {}", new.display()))?;
    let diff = compute_diff(&old_text, &new_text);

    match cli.effective_format() {
        OutputFormat::Json => {
            println!("{}", json::format_pretty(&visible_lines(&diff, changes_only))?)
        }
        format => print_diff(
            format,
            &format!("{} → {}", old.display(), new.display()),
            &diff,
            changes_only,
        ),
    }

    Ok(())
}

/// Lines to print, keeping only added and removed ones when `changes_only`
fn visible_lines(diff: &[DiffLine], changes_only: bool) -> Vec<&DiffLine> {
    diff.iter()
        .filter(|line| !changes_only || line.is_change())
        .collect()
}

fn print_diff(format: OutputFormat, title: &str, diff: &[DiffLine], changes_only: bool) {
    let lines = visible_lines(diff, changes_only);

    if format == OutputFormat::Minimal {
        for line in lines {
            println!("{}", minimal::format_diff_line(line));
        }
        return;
    }

    // Stats always cover the whole diff
    println!(
        "{}  {}",
        colors::header(title),
        human::format_diff_stats(&diff_stats(diff))
    );
    println!();
    for line in lines {
        println!("{}", human::format_diff_line(line));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatsight_core::DiffKind;

    #[test]
    fn test_visible_lines_changes_only() {
        let diff = compute_diff("a\nb\nc", "a\nB\nc");
        assert_eq!(visible_lines(&diff, false).len(), 4);

        let changed = visible_lines(&diff, true);
        let kinds: Vec<_> = changed.iter().map(|l| l.kind).collect();
        assert_eq!(kinds, vec![DiffKind::Removed, DiffKind::Added]);
        assert_eq!(changed[0].content, "b");
        assert_eq!(changed[1].content, "B");
    }

    #[test]
    fn test_visible_lines_identical_texts() {
        let diff = compute_diff("same\n", "same\n");
        assert_eq!(visible_lines(&diff, false).len(), 1);
        assert!(visible_lines(&diff, true).is_empty());
    }
}
