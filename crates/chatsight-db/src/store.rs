//! SQLite implementation of the projector's storage interface

use chatsight_core::{ParsedMessage, TranscriptStore};
use rusqlite::{params, Connection};

use crate::connection::{now, DbError};

/// Write handle over a connection or an open transaction
pub struct SqliteStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TranscriptStore for SqliteStore<'_> {
    type Error = DbError;

    fn get_or_create_assignment(
        &mut self,
        file_id: i64,
        assignment_ref: &str,
    ) -> Result<i64, DbError> {
        // Single-statement upsert keeps (file_id, assignment_ref) unique
        // without a read-then-write race
        self.conn.execute(
            "INSERT INTO assignments (file_id, assignment_ref, created_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(file_id, assignment_ref) DO NOTHING",
            params![file_id, assignment_ref, now()],
        )?;
        let id = self.conn.query_row(
            "SELECT id FROM assignments WHERE file_id = ?1 AND assignment_ref = ?2",
            params![file_id, assignment_ref],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    fn insert_conversation(&mut self, assignment_id: i64, student: &str) -> Result<i64, DbError> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO conversations (assignment_id, student, created_at) VALUES (?1, ?2, ?3)",
        )?;
        stmt.execute(params![assignment_id, student, now()])?;
        Ok(self.conn.last_insert_rowid())
    }

    fn insert_message(
        &mut self,
        conversation_id: i64,
        message: &ParsedMessage,
        sort_order: i64,
    ) -> Result<(), DbError> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO messages
             (conversation_id, role, timestamp, content, sort_order, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        stmt.execute(params![
            conversation_id,
            message.role,
            message.timestamp,
            message.content,
            sort_order,
            now(),
        ])?;
        Ok(())
    }
}
