//! Read paths over the assignment → conversation → message hierarchy

use chatsight_core::{AssignmentRecord, ConversationRecord, MessageRecord};
use rusqlite::OptionalExtension;

use crate::connection::{ChatDb, DbError};

const MESSAGE_COLUMNS: &str =
    "m.id, m.conversation_id, m.role, m.timestamp, m.content, m.sort_order, m.created_at";

impl ChatDb {
    /// Assignments of a file, in creation order
    pub fn assignments_for_file(&self, file_id: i64) -> Result<Vec<AssignmentRecord>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, file_id, assignment_ref, created_at
             FROM assignments
             WHERE file_id = ?1
             ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([file_id], row_to_assignment)?;

        let mut assignments = Vec::new();
        for row in rows {
            assignments.push(row?);
        }
        Ok(assignments)
    }

    /// Number of assignments already projected for a file
    pub fn assignment_count_for_file(&self, file_id: i64) -> Result<i64, DbError> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM assignments WHERE file_id = ?1",
            [file_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Conversations of an assignment, in creation order
    pub fn conversations_for_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<ConversationRecord>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, assignment_id, student, created_at
             FROM conversations
             WHERE assignment_id = ?1
             ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([assignment_id], row_to_conversation)?;

        let mut conversations = Vec::new();
        for row in rows {
            conversations.push(row?);
        }
        Ok(conversations)
    }

    /// Get a conversation by id
    pub fn get_conversation(&self, id: i64) -> Result<Option<ConversationRecord>, DbError> {
        let conversation = self
            .conn
            .query_row(
                "SELECT id, assignment_id, student, created_at FROM conversations WHERE id = ?1",
                [id],
                row_to_conversation,
            )
            .optional()?;
        Ok(conversation)
    }

    /// Messages of a conversation by sort order
    pub fn messages_for_conversation(
        &self,
        conversation_id: i64,
    ) -> Result<Vec<MessageRecord>, DbError> {
        let sql = format!(
            "SELECT {}
             FROM messages m
             WHERE m.conversation_id = ?1
             ORDER BY m.sort_order ASC, m.id ASC",
            MESSAGE_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([conversation_id], row_to_message)?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        Ok(messages)
    }

    /// All messages of a file, grouped by assignment then conversation
    pub fn messages_for_file(&self, file_id: i64) -> Result<Vec<MessageRecord>, DbError> {
        let sql = format!(
            "SELECT {}
             FROM messages m
             JOIN conversations c ON c.id = m.conversation_id
             JOIN assignments a ON a.id = c.assignment_id
             WHERE a.file_id = ?1
             ORDER BY a.id ASC, c.id ASC, m.sort_order ASC, m.id ASC",
            MESSAGE_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([file_id], row_to_message)?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        Ok(messages)
    }
}

fn row_to_assignment(row: &rusqlite::Row) -> Result<AssignmentRecord, rusqlite::Error> {
    Ok(AssignmentRecord {
        id: row.get(0)?,
        file_id: row.get(1)?,
        assignment_ref: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn row_to_conversation(row: &rusqlite::Row) -> Result<ConversationRecord, rusqlite::Error> {
    Ok(ConversationRecord {
        id: row.get(0)?,
        assignment_id: row.get(1)?,
        student: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn row_to_message(row: &rusqlite::Row) -> Result<MessageRecord, rusqlite::Error> {
    Ok(MessageRecord {
        id: row.get(0)?,
        conversation_id: row.get(1)?,
        role: row.get(2)?,
        timestamp: row.get(3)?,
        content: row.get(4)?,
        sort_order: row.get(5)?,
        created_at: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatsight_core::parser::block_separator;

    fn seeded() -> (ChatDb, i64) {
        let mut db = ChatDb::open_in_memory().unwrap();
        let text = format!(
            "intro{s}Student: alice\nAssignment: hw1\nMessages:\n----Student: [1]\nq1\n----Code:\nx = 1\n----Tutor: [2]\na1\
             {s}Student: bob\nAssignment: hw2\nMessages:\n----Student: [3]\nq2\
             {s}Student: carol\nAssignment: hw1\nMessages:\n----Tutor: [4]\nhello",
            s = block_separator()
        );
        let result = db.import_cleaned("course.txt", &text).unwrap();
        (db, result.file_id)
    }

    #[test]
    fn test_hierarchy_reads() {
        let (db, file_id) = seeded();

        let assignments = db.assignments_for_file(file_id).unwrap();
        let refs: Vec<_> = assignments.iter().map(|a| a.assignment_ref.as_str()).collect();
        assert_eq!(refs, vec!["hw1", "hw2"]);
        assert_eq!(db.assignment_count_for_file(file_id).unwrap(), 2);

        let hw1 = db.conversations_for_assignment(assignments[0].id).unwrap();
        let students: Vec<_> = hw1.iter().map(|c| c.student.as_str()).collect();
        assert_eq!(students, vec!["alice", "carol"]);

        let messages = db.messages_for_conversation(hw1[0].id).unwrap();
        let roles: Vec<_> = messages.iter().map(|m| m.display_role()).collect();
        assert_eq!(roles, vec!["Student", "Code", "Tutor"]);
        let orders: Vec<_> = messages.iter().map(|m| m.sort_order).collect();
        assert_eq!(orders, vec![0, 1, 2]);

        let conversation = db.get_conversation(hw1[1].id).unwrap().unwrap();
        assert_eq!(conversation.student, "carol");
        assert!(db.get_conversation(999).unwrap().is_none());
    }

    #[test]
    fn test_messages_for_file_grouped_by_assignment() {
        let (db, file_id) = seeded();
        let contents: Vec<_> = db
            .messages_for_file(file_id)
            .unwrap()
            .into_iter()
            .map(|m| m.content)
            .collect();
        // hw1 (alice, carol) comes before hw2 (bob)
        assert_eq!(contents, vec!["q1", "x = 1", "a1", "hello", "q2"]);
    }

    #[test]
    fn test_delete_file_cascades() {
        let (db, file_id) = seeded();
        db.delete_file(file_id).unwrap();

        let stats = db.stats().unwrap();
        assert_eq!(stats.file_count, 0);
        assert_eq!(stats.assignment_count, 0);
        assert_eq!(stats.conversation_count, 0);
        assert_eq!(stats.message_count, 0);
    }
}
