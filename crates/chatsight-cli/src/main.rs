//! chatsight - CLI for importing, browsing and diffing tutoring transcripts

mod cli;
mod commands;
mod output;

use anyhow::Result;
use chatsight_db::ChatDb;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, CodeCommand, Command, FileCommand};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if !cli.use_color() {
        colored::control::set_override(false);
    }

    // Commands that work on plain files need no database
    match &cli.command {
        Command::Parse { path } => return commands::parse::run(&cli, path),
        Command::DiffFiles {
            old,
            new,
            changes_only,
        } => return commands::code::diff_files(&cli, old, new, *changes_only),
        _ => {}
    }

    let mut db = match &cli.db_path {
        Some(path) => ChatDb::open(path)?,
        None => ChatDb::open_default()?,
    };

    match &cli.command {
        Command::Import { paths } => commands::import::run(&cli, &mut db, paths),
        Command::Reprocess => commands::reprocess::run(&cli, &mut db),

        Command::Files => commands::files::list(&cli, &db),
        Command::File(FileCommand::Show { id, no_content }) => {
            commands::files::show(&cli, &db, *id, !*no_content)
        }
        Command::File(FileCommand::Delete { id }) => commands::files::delete(&cli, &db, *id),

        Command::Assignments { file_id } => commands::browse::assignments(&cli, &db, *file_id),
        Command::Conversations { assignment_id } => {
            commands::browse::conversations(&cli, &db, *assignment_id)
        }
        Command::Messages {
            conversation_id,
            full,
        } => commands::browse::messages(&cli, &db, *conversation_id, *full),
        Command::Turns {
            conversation_id,
            diff,
        } => commands::turns::run(&cli, &db, *conversation_id, *diff),

        Command::Code(CodeCommand::Get { index }) => commands::code::get(&cli, &db, *index),
        Command::Code(CodeCommand::Save { index, path }) => {
            commands::code::save(&cli, &db, *index, path)
        }
        Command::Code(CodeCommand::List) => commands::code::list(&cli, &db),
        Command::Diff {
            from,
            to,
            changes_only,
        } => commands::code::diff(&cli, &db, *from, *to, *changes_only),

        Command::Status => commands::status::run(&cli, &db),

        // Handled before the database was opened
        Command::Parse { .. } | Command::DiffFiles { .. } => Ok(()),
    }
}

/// Log to stderr so stdout stays parseable. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "chatsight_core=debug,chatsight_db=debug,chatsight=debug"
    } else {
        "chatsight_core=info,chatsight_db=info,chatsight=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
