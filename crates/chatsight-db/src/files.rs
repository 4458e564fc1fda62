//! Raw upload storage

use chatsight_core::{FileListItem, FileRecord};
use rusqlite::{params, Connection, OptionalExtension};

use crate::connection::{now, ChatDb, DbError};

/// Insert a file row and return its id
pub fn insert_file(
    conn: &Connection,
    filename: &str,
    content: &str,
    file_type: Option<&str>,
    file_size: Option<i64>,
) -> Result<i64, DbError> {
    conn.execute(
        "INSERT INTO files (filename, content, file_type, file_size, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![filename, content, file_type, file_size, now()],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Fetch a file with its content
pub fn find_file(conn: &Connection, id: i64) -> Result<Option<FileRecord>, DbError> {
    let file = conn
        .query_row(
            "SELECT id, filename, content, file_type, file_size, created_at
             FROM files WHERE id = ?1",
            [id],
            |row| {
                Ok(FileRecord {
                    id: row.get(0)?,
                    filename: row.get(1)?,
                    content: row.get(2)?,
                    file_type: row.get(3)?,
                    file_size: row.get(4)?,
                    created_at: row.get(5)?,
                })
            },
        )
        .optional()?;
    Ok(file)
}

impl ChatDb {
    /// Store a raw upload
    pub fn save_file(
        &self,
        filename: &str,
        content: &str,
        file_type: Option<&str>,
        file_size: Option<i64>,
    ) -> Result<i64, DbError> {
        insert_file(&self.conn, filename, content, file_type, file_size)
    }

    /// Get a file by id
    pub fn get_file(&self, id: i64) -> Result<Option<FileRecord>, DbError> {
        find_file(&self.conn, id)
    }

    /// List all files, newest first
    pub fn list_files(&self) -> Result<Vec<FileListItem>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, filename, file_type, file_size, created_at
             FROM files
             ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(FileListItem {
                id: row.get(0)?,
                filename: row.get(1)?,
                file_type: row.get(2)?,
                file_size: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?;

        let mut files = Vec::new();
        for row in rows {
            files.push(row?);
        }
        Ok(files)
    }

    /// Delete a file and, by cascade, its assignments, conversations and
    /// messages
    pub fn delete_file(&self, id: i64) -> Result<(), DbError> {
        let deleted = self.conn.execute("DELETE FROM files WHERE id = ?1", [id])?;
        if deleted == 0 {
            return Err(DbError::FileNotFound(id));
        }
        Ok(())
    }
}
