//! Database schema creation

use rusqlite::{Connection, OptionalExtension};
use tracing::info;

use crate::connection::DbError;

/// Current database schema version
pub const DB_VERSION: i32 = 1;

/// Create all tables if needed and record the schema version
pub fn init_schema(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS metadata (
            key TEXT PRIMARY KEY,
            value TEXT
        )",
    )?;

    if let Some(found) = stored_version(conn)? {
        if found > DB_VERSION {
            return Err(DbError::VersionMismatch {
                expected: DB_VERSION,
                found,
            });
        }
    }

    // Raw uploads
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS files (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            filename TEXT NOT NULL,
            content TEXT NOT NULL,
            file_type TEXT,
            file_size INTEGER,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_filename ON files(filename);",
    )?;

    // One row per (file, assignment ref)
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS assignments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            file_id INTEGER NOT NULL REFERENCES files(id) ON DELETE CASCADE,
            assignment_ref TEXT NOT NULL,
            created_at TEXT NOT NULL,
            UNIQUE(file_id, assignment_ref)
        );
        CREATE INDEX IF NOT EXISTS idx_assignments_file ON assignments(file_id);",
    )?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS conversations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            assignment_id INTEGER NOT NULL REFERENCES assignments(id) ON DELETE CASCADE,
            student TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_conversations_assignment ON conversations(assignment_id);",
    )?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS messages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            conversation_id INTEGER NOT NULL REFERENCES conversations(id) ON DELETE CASCADE,
            role TEXT,
            timestamp TEXT,
            content TEXT NOT NULL,
            sort_order INTEGER NOT NULL,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_messages_conversation_sort
            ON messages(conversation_id, sort_order);",
    )?;

    // Code snapshots keyed by message index
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS code_versions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            message_index INTEGER NOT NULL UNIQUE,
            code_content TEXT NOT NULL,
            created_at TEXT NOT NULL
        );",
    )?;

    if stored_version(conn)?.is_none() {
        info!(version = DB_VERSION, "initialized database schema");
    }
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES ('version', ?1)",
        [DB_VERSION.to_string()],
    )?;

    Ok(())
}

/// Schema version recorded in the metadata table, if any
pub fn stored_version(conn: &Connection) -> Result<Option<i32>, DbError> {
    let version = conn
        .query_row(
            "SELECT CAST(value AS INTEGER) FROM metadata WHERE key = 'version'",
            [],
            |row| row.get(0),
        )
        .optional()?;
    Ok(version)
}
