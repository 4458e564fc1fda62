//! CLI argument definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI for importing, browsing and diffing tutoring chat transcripts
#[derive(Parser, Debug)]
#[command(name = "chatsight")]
#[command(version)]
#[command(about = "Import, browse and diff cleaned tutoring chat transcripts")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Custom database path
    #[arg(long, global = true, env = "CHATSIGHT_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Output format (defaults to human on a terminal, json otherwise)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Disable color output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log debug events to stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Get the effective output format
    pub fn effective_format(&self) -> OutputFormat {
        if let Some(f) = self.format {
            return f;
        }
        if atty::is(atty::Stream::Stdout) {
            OutputFormat::Human
        } else {
            OutputFormat::Json
        }
    }

    /// Check if colors should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && atty::is(atty::Stream::Stdout)
    }
}

/// Output format for commands
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output with colors
    #[default]
    Human,
    /// JSON output (one object per line for lists)
    Json,
    /// Minimal text output (ids and content only)
    Minimal,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import cleaned transcript files and build their hierarchy
    Import {
        /// Cleaned transcript files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Build the hierarchy for stored files that have none yet
    Reprocess,

    /// Parse a cleaned transcript without touching the database
    Parse {
        /// Cleaned transcript file
        path: PathBuf,
    },

    /// List stored files, newest first
    Files,

    /// Stored file subcommands
    #[command(subcommand)]
    File(FileCommand),

    /// List the assignments of a file
    Assignments {
        /// File id
        file_id: i64,
    },

    /// List the conversations of an assignment
    Conversations {
        /// Assignment id
        assignment_id: i64,
    },

    /// Show the messages of a conversation
    Messages {
        /// Conversation id
        conversation_id: i64,

        /// Show full message content instead of a preview
        #[arg(short, long)]
        full: bool,
    },

    /// Show code snapshots paired with the student turn that produced them
    Turns {
        /// Conversation id
        conversation_id: i64,

        /// Print the diff against the previous snapshot for each turn
        #[arg(short, long)]
        diff: bool,
    },

    /// Stored code snapshot subcommands
    #[command(subcommand)]
    Code(CodeCommand),

    /// Diff two stored code snapshots
    Diff {
        /// Message index of the older snapshot
        from: i64,

        /// Message index of the newer snapshot
        to: i64,

        /// Print only added and removed lines
        #[arg(long)]
        changes_only: bool,
    },

    /// Diff two text files line by line
    DiffFiles {
        old: PathBuf,
        new: PathBuf,

        /// Print only added and removed lines
        #[arg(long)]
        changes_only: bool,
    },

    /// Show database statistics
    Status,
}

#[derive(Subcommand, Debug)]
pub enum FileCommand {
    /// Show a stored file's metadata and content
    Show {
        /// File id
        id: i64,

        /// Print metadata only
        #[arg(long)]
        no_content: bool,
    },

    /// Delete a stored file and everything projected from it
    Delete {
        /// File id
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum CodeCommand {
    /// Print the snapshot stored at a message index
    Get {
        index: i64,
    },

    /// Store a file's content as the snapshot at a message index
    Save {
        index: i64,

        /// File holding the code
        path: PathBuf,
    },

    /// List the message indices that have a snapshot
    List,
}
