//! chatsight-db - SQLite storage layer for ChatSight
//!
//! Owns the schema and every read and write path over the transcript
//! hierarchy: file → assignment → conversation → message, plus the code
//! snapshot table backing the diff view. Ingestion runs the core projector
//! against [`SqliteStore`] inside a single transaction per file.

pub mod code;
pub mod connection;
pub mod files;
pub mod import;
pub mod queries;
pub mod schema;
pub mod store;

pub use connection::*;
pub use import::{ReprocessEntry, ReprocessOutcome};
pub use schema::DB_VERSION;
pub use store::SqliteStore;
