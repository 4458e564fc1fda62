//! Database connection management

use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::schema;

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File with id {0} not found")]
    FileNotFound(i64),

    #[error("Code at index {0} not found")]
    CodeNotFound(i64),

    #[error("Database version mismatch: expected at most {expected}, found {found}")]
    VersionMismatch { expected: i32, found: i32 },
}

/// Default database path, relative to the working directory
pub fn default_db_path() -> PathBuf {
    PathBuf::from("database").join("dev.db")
}

/// Read-write database connection
pub struct ChatDb {
    pub(crate) conn: Connection,
    path: Option<PathBuf>,
}

impl ChatDb {
    /// Open or create the database at the default path
    pub fn open_default() -> Result<Self, DbError> {
        Self::open(&default_db_path())
    }

    /// Open or create the database at a specific path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DbError> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        debug!(path = %path.display(), "opened database");
        Self::init(conn, Some(path.to_path_buf()))
    }

    /// Open a private in-memory database (tests, dry runs)
    pub fn open_in_memory() -> Result<Self, DbError> {
        Self::init(Connection::open_in_memory()?, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> Result<Self, DbError> {
        // Cascading deletes from files down to messages rely on this
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        schema::init_schema(&conn)?;
        Ok(Self { conn, path })
    }

    /// Get the database path (`None` for in-memory databases)
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get a reference to the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Execute a closure within a transaction; any error rolls back
    pub fn transaction<F, T>(&mut self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&Connection) -> Result<T, DbError>,
    {
        let tx = self.conn.transaction()?;
        let result = f(&tx)?;
        tx.commit()?;
        Ok(result)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats, DbError> {
        let count = |table: &str| -> Result<i64, DbError> {
            let sql = format!("SELECT COUNT(*) FROM {}", table);
            Ok(self.conn.query_row(&sql, [], |row| row.get(0))?)
        };

        let db_size_bytes = self
            .path
            .as_ref()
            .and_then(|p| std::fs::metadata(p).ok())
            .map(|m| m.len())
            .unwrap_or(0);

        Ok(DbStats {
            version: schema::stored_version(&self.conn)?.unwrap_or(0),
            file_count: count("files")?,
            assignment_count: count("assignments")?,
            conversation_count: count("conversations")?,
            message_count: count("messages")?,
            code_version_count: count("code_versions")?,
            db_size_bytes,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct DbStats {
    pub version: i32,
    pub file_count: i64,
    pub assignment_count: i64,
    pub conversation_count: i64,
    pub message_count: i64,
    pub code_version_count: i64,
    pub db_size_bytes: u64,
}

/// Timestamp stored in `created_at` columns
pub(crate) fn now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
