//! Code snapshots and the diffs between them

use chatsight_core::{compute_diff, CodeSnapshot, DiffData};
use rusqlite::{params, OptionalExtension};

use crate::connection::{now, ChatDb, DbError};

impl ChatDb {
    /// Get the code snapshot stored at a message index
    pub fn get_code(&self, message_index: i64) -> Result<Option<CodeSnapshot>, DbError> {
        let snapshot = self
            .conn
            .query_row(
                "SELECT message_index, code_content FROM code_versions WHERE message_index = ?1",
                [message_index],
                |row| {
                    Ok(CodeSnapshot {
                        message_index: row.get(0)?,
                        code_content: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(snapshot)
    }

    /// Store a snapshot, replacing any existing one at the same index
    pub fn save_code(&self, message_index: i64, code_content: &str) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO code_versions (message_index, code_content, created_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(message_index) DO UPDATE SET code_content = excluded.code_content",
            params![message_index, code_content, now()],
        )?;
        Ok(())
    }

    /// All indices with a stored snapshot, ascending
    pub fn code_indices(&self) -> Result<Vec<i64>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT message_index FROM code_versions ORDER BY message_index")?;
        let rows = stmt.query_map([], |row| row.get(0))?;

        let mut indices = Vec::new();
        for row in rows {
            indices.push(row?);
        }
        Ok(indices)
    }

    /// Diff the snapshot at `from_index` against the one at `to_index`
    pub fn code_diff(&self, from_index: i64, to_index: i64) -> Result<DiffData, DbError> {
        let from = self
            .get_code(from_index)?
            .ok_or(DbError::CodeNotFound(from_index))?;
        let to = self
            .get_code(to_index)?
            .ok_or(DbError::CodeNotFound(to_index))?;

        Ok(DiffData {
            from_index,
            to_index,
            diff: compute_diff(&from.code_content, &to.code_content),
        })
    }
}
