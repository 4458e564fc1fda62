//! Ingestion of cleaned transcripts into the database
//!
//! Every entry point here projects one file inside one transaction, so a
//! storage failure part-way through leaves no half-ingested file behind.

use std::path::Path;

use chatsight_core::{parse_cleaned, project, DumpResult, ParsedCleaned, ProjectionCounts};
use tracing::{info, warn};

use crate::connection::{ChatDb, DbError};
use crate::files::{find_file, insert_file};
use crate::store::SqliteStore;

/// File type recorded for imported cleaned transcripts
const CLEANED_FILE_TYPE: &str = "txt";

/// What the reprocess pass did with one stored file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReprocessOutcome {
    Projected(ProjectionCounts),
    /// Already has assignment rows; left untouched to avoid duplication
    AlreadyProjected { assignments: i64 },
    /// Parsed to zero conversations (likely not cleaned format)
    NoConversations,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReprocessEntry {
    pub file_id: i64,
    pub filename: String,
    pub outcome: ReprocessOutcome,
}

impl ChatDb {
    /// Store `content` as a new file and project its transcript hierarchy
    pub fn import_cleaned(&mut self, filename: &str, content: &str) -> Result<DumpResult, DbError> {
        let parsed = parse_cleaned(content);
        let file_size = content.len() as i64;

        let result = self.transaction(|conn| {
            let file_id = insert_file(
                conn,
                filename,
                content,
                Some(CLEANED_FILE_TYPE),
                Some(file_size),
            )?;
            let counts = project(&mut SqliteStore::new(conn), file_id, &parsed)?;
            Ok(DumpResult::new(file_id, filename, counts))
        })?;

        info!(
            file_id = result.file_id,
            filename,
            conversations = result.conversation_count,
            "imported cleaned transcript"
        );
        Ok(result)
    }

    /// Read a cleaned transcript from disk and import it under its file name
    pub fn import_cleaned_file<P: AsRef<Path>>(&mut self, path: P) -> Result<DumpResult, DbError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        self.import_cleaned(&filename, &content)
    }

    /// Project `content` under an existing file row.
    ///
    /// Does not check for earlier projections: calling this twice for the
    /// same file duplicates its conversations and messages.
    pub fn ingest_into_file(&mut self, file_id: i64, content: &str) -> Result<DumpResult, DbError> {
        let parsed = parse_cleaned(content);
        self.ingest_parsed(file_id, &parsed)
    }

    /// Project an already parsed tree under an existing file row
    pub fn ingest_parsed(
        &mut self,
        file_id: i64,
        parsed: &ParsedCleaned,
    ) -> Result<DumpResult, DbError> {
        self.transaction(|conn| {
            let file = find_file(conn, file_id)?.ok_or(DbError::FileNotFound(file_id))?;
            let counts = project(&mut SqliteStore::new(conn), file_id, parsed)?;
            Ok(DumpResult::new(file_id, file.filename, counts))
        })
    }

    /// Populate the hierarchy for stored files that have none yet.
    ///
    /// Files that already have assignments or parse to zero conversations are
    /// skipped. A failure on one file is recorded and the pass continues.
    pub fn reprocess_files<F>(&mut self, mut on_progress: F) -> Result<Vec<ReprocessEntry>, DbError>
    where
        F: FnMut(&ReprocessEntry, usize, usize),
    {
        let files = self.list_files()?;
        let total = files.len();
        let mut entries = Vec::with_capacity(total);

        for (i, meta) in files.into_iter().enumerate() {
            let outcome = self
                .reprocess_one(meta.id)
                .unwrap_or_else(|e| ReprocessOutcome::Failed(e.to_string()));
            match &outcome {
                ReprocessOutcome::Failed(err) => {
                    warn!(file_id = meta.id, error = %err, "reprocess failed")
                }
                ReprocessOutcome::AlreadyProjected { assignments } => {
                    info!(file_id = meta.id, assignments, "already projected, skipping")
                }
                _ => {}
            }

            let entry = ReprocessEntry {
                file_id: meta.id,
                filename: meta.filename,
                outcome,
            };
            on_progress(&entry, i + 1, total);
            entries.push(entry);
        }

        Ok(entries)
    }

    fn reprocess_one(&mut self, file_id: i64) -> Result<ReprocessOutcome, DbError> {
        let existing = self.assignment_count_for_file(file_id)?;
        if existing > 0 {
            return Ok(ReprocessOutcome::AlreadyProjected {
                assignments: existing,
            });
        }

        let file = self
            .get_file(file_id)?
            .ok_or(DbError::FileNotFound(file_id))?;
        let parsed = parse_cleaned(&file.content);
        if parsed.conversations.is_empty() {
            return Ok(ReprocessOutcome::NoConversations);
        }

        let result = self.ingest_parsed(file_id, &parsed)?;
        Ok(ReprocessOutcome::Projected(result.counts()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatsight_core::parser::block_separator;

    fn cleaned() -> String {
        format!(
            "DSC10 export{s}Student: alice\nAssignment: hw1\nMessages:\n----Student: [1]\nhelp\n----Tutor: [2]\nsure\
             {s}Student: alice\nAssignment: hw1\nMessages:\n----Student: [3]\nagain\
             {s}Student: bob\nAssignment: lab1\nMessages:\n----Code:\nprint(1)",
            s = block_separator()
        )
    }

    #[test]
    fn test_import_cleaned_counts() {
        let mut db = ChatDb::open_in_memory().unwrap();
        let content = cleaned();
        let result = db.import_cleaned("dsc10.txt", &content).unwrap();

        assert_eq!(result.filename, "dsc10.txt");
        assert_eq!(result.assignment_count, 2);
        assert_eq!(result.conversation_count, 3);
        assert_eq!(result.message_count, 4);

        let file = db.get_file(result.file_id).unwrap().unwrap();
        assert_eq!(file.file_type.as_deref(), Some("txt"));
        assert_eq!(file.file_size, Some(content.len() as i64));
    }

    #[test]
    fn test_ingest_twice_duplicates_conversations_only() {
        let mut db = ChatDb::open_in_memory().unwrap();
        let content = cleaned();
        let file_id = db.save_file("raw.txt", &content, Some("txt"), None).unwrap();

        let first = db.ingest_into_file(file_id, &content).unwrap();
        let second = db.ingest_into_file(file_id, &content).unwrap();
        assert_eq!(first.assignment_count, second.assignment_count);
        assert_eq!(second.filename, "raw.txt");

        let stats = db.stats().unwrap();
        assert_eq!(stats.assignment_count, 2);
        assert_eq!(stats.conversation_count, 6);
        assert_eq!(stats.message_count, 8);
    }

    #[test]
    fn test_ingest_into_missing_file() {
        let mut db = ChatDb::open_in_memory().unwrap();
        let err = db.ingest_into_file(12, &cleaned()).unwrap_err();
        assert!(matches!(err, DbError::FileNotFound(12)));
        assert_eq!(db.stats().unwrap().assignment_count, 0);
    }

    #[test]
    fn test_import_cleaned_file_uses_basename() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("cleaned_CSE8A.txt");
        std::fs::write(&path, cleaned()).unwrap();

        let mut db = ChatDb::open_in_memory().unwrap();
        let result = db.import_cleaned_file(&path).unwrap();
        assert_eq!(result.filename, "cleaned_CSE8A.txt");

        let missing = db.import_cleaned_file(tmp.path().join("nope.txt"));
        assert!(matches!(missing, Err(DbError::Io(_))));
    }

    #[test]
    fn test_reprocess_skips_projected_and_non_cleaned_files() {
        let mut db = ChatDb::open_in_memory().unwrap();
        let imported = db.import_cleaned("done.txt", &cleaned()).unwrap();
        let pending = db.save_file("pending.txt", &cleaned(), Some("txt"), None).unwrap();
        let plain = db.save_file("notes.txt", "just some notes", Some("txt"), None).unwrap();

        let mut seen = Vec::new();
        let entries = db
            .reprocess_files(|entry, i, total| seen.push((entry.file_id, i, total)))
            .unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|(_, _, total)| *total == 3));

        let outcome_of = |id: i64| {
            entries
                .iter()
                .find(|e| e.file_id == id)
                .map(|e| e.outcome.clone())
                .unwrap()
        };
        assert_eq!(
            outcome_of(imported.file_id),
            ReprocessOutcome::AlreadyProjected { assignments: 2 }
        );
        assert_eq!(outcome_of(plain), ReprocessOutcome::NoConversations);
        assert_eq!(
            outcome_of(pending),
            ReprocessOutcome::Projected(ProjectionCounts {
                assignment_count: 2,
                conversation_count: 3,
                message_count: 4,
            })
        );

        // A second pass has nothing left to do
        let again = db.reprocess_files(|_, _, _| {}).unwrap();
        assert!(again
            .iter()
            .all(|e| !matches!(e.outcome, ReprocessOutcome::Projected(_))));
    }
}
