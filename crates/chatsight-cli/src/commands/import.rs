//! Import command - store cleaned transcripts and project their hierarchy

use anyhow::{bail, Result};
use chatsight_db::ChatDb;
use std::path::PathBuf;
use tracing::debug;

use crate::cli::{Cli, OutputFormat};
use crate::output::{colors, human, json};

pub fn run(cli: &Cli, db: &mut ChatDb, paths: &[PathBuf]) -> Result<()> {
    let format = cli.effective_format();
    let mut failed = 0usize;

    for path in paths {
        debug!(path = %path.display(), "importing");
        match db.import_cleaned_file(path) {
            Ok(result) => match format {
                OutputFormat::Human => println!("{}", human::format_dump_result(&result)),
                OutputFormat::Json => println!("{}", json::format_line(&result)?),
                OutputFormat::Minimal => println!("{}", result.file_id),
            },
            Err(e) => {
                failed += 1;
                match format {
                    OutputFormat::Human => eprintln!(
                        "{}",
                        colors::error(&format!("{}: {}", path.display(), e))
                    ),
                    OutputFormat::Json => println!(
                        "{}",
                        serde_json::json!({
                            "path": path.to_string_lossy(),
                            "error": e.to_string(),
                        })
                    ),
                    OutputFormat::Minimal => eprintln!("{}: {}", path.display(), e),
                }
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} files failed to import", failed, paths.len());
    }
    Ok(())
}
