//! chatsight-core - Core types and business logic for ChatSight
//!
//! This crate turns cleaned tutoring transcripts into an assignment →
//! conversation → message tree, projects that tree into a storage backend,
//! and computes line diffs between code snapshots. It performs no I/O of its
//! own apart from the file-reading convenience in [`parser`].

pub mod diff;
pub mod ingest;
pub mod parser;
pub mod turns;
pub mod types;

pub use diff::*;
pub use ingest::*;
pub use parser::*;
pub use turns::*;
pub use types::*;
