//! Projection of a parsed transcript into assignment, conversation and
//! message rows
//!
//! The projector owns no storage. Callers pass a [`TranscriptStore`]; the
//! SQLite implementation lives in `chatsight-db`.
//!
//! Assignments are reused per `(file, ref)`, but conversations and messages
//! are always inserted. Projecting the same file twice duplicates them, so
//! callers must check whether a file already has assignments before
//! re-projecting, and must not project the same file concurrently.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::types::{ParsedCleaned, ParsedMessage, ProjectionCounts};

/// Write primitives the projector needs from a storage backend
pub trait TranscriptStore {
    type Error;

    /// Return the assignment for `(file_id, assignment_ref)`, creating it if
    /// absent. Must be atomic with respect to that uniqueness.
    fn get_or_create_assignment(
        &mut self,
        file_id: i64,
        assignment_ref: &str,
    ) -> Result<i64, Self::Error>;

    fn insert_conversation(&mut self, assignment_id: i64, student: &str)
        -> Result<i64, Self::Error>;

    fn insert_message(
        &mut self,
        conversation_id: i64,
        message: &ParsedMessage,
        sort_order: i64,
    ) -> Result<(), Self::Error>;
}

/// Materialize `parsed` under `file_id`.
///
/// `assignment_count` counts distinct assignment refs seen in this run.
/// Each message's sort order is its index within its conversation. Store
/// errors are returned as-is; nothing is retried or rolled back here.
pub fn project<S: TranscriptStore>(
    store: &mut S,
    file_id: i64,
    parsed: &ParsedCleaned,
) -> Result<ProjectionCounts, S::Error> {
    let mut counts = ProjectionCounts::default();
    let mut seen_refs: HashSet<&str> = HashSet::new();

    for conversation in &parsed.conversations {
        let assignment_ref = conversation.assignment.as_str();
        let assignment_id = store.get_or_create_assignment(file_id, assignment_ref)?;
        if seen_refs.insert(assignment_ref) {
            counts.assignment_count += 1;
        }

        let conversation_id = store.insert_conversation(assignment_id, &conversation.student)?;
        counts.conversation_count += 1;

        for (idx, message) in conversation.messages.iter().enumerate() {
            store.insert_message(conversation_id, message, idx as i64)?;
            counts.message_count += 1;
        }

        debug!(
            file_id,
            assignment_id,
            conversation_id,
            student = %conversation.student,
            messages = conversation.messages.len(),
            "projected conversation"
        );
    }

    info!(
        file_id,
        assignments = counts.assignment_count,
        conversations = counts.conversation_count,
        messages = counts.message_count,
        "projection complete"
    );

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{block_separator, parse_cleaned};
    use crate::types::ParsedConversation;
    use std::collections::HashMap;

    /// In-memory store recording every row
    #[derive(Default)]
    struct MemoryStore {
        assignments: HashMap<(i64, String), i64>,
        conversations: Vec<(i64, i64, String)>,
        messages: Vec<(i64, ParsedMessage, i64)>,
        fail_on_message: Option<usize>,
    }

    impl TranscriptStore for MemoryStore {
        type Error = String;

        fn get_or_create_assignment(
            &mut self,
            file_id: i64,
            assignment_ref: &str,
        ) -> Result<i64, String> {
            let next_id = self.assignments.len() as i64 + 1;
            Ok(*self
                .assignments
                .entry((file_id, assignment_ref.to_string()))
                .or_insert(next_id))
        }

        fn insert_conversation(&mut self, assignment_id: i64, student: &str) -> Result<i64, String> {
            let id = self.conversations.len() as i64 + 1;
            self.conversations.push((id, assignment_id, student.to_string()));
            Ok(id)
        }

        fn insert_message(
            &mut self,
            conversation_id: i64,
            message: &ParsedMessage,
            sort_order: i64,
        ) -> Result<(), String> {
            if self.fail_on_message == Some(self.messages.len()) {
                return Err("disk full".to_string());
            }
            self.messages.push((conversation_id, message.clone(), sort_order));
            Ok(())
        }
    }

    fn conversation(student: &str, assignment: &str, roles: &[&str]) -> ParsedConversation {
        ParsedConversation {
            student: student.to_string(),
            assignment: assignment.to_string(),
            messages: roles
                .iter()
                .enumerate()
                .map(|(i, role)| ParsedMessage::new(*role, None, format!("m{}", i)))
                .collect(),
        }
    }

    fn sample() -> ParsedCleaned {
        ParsedCleaned {
            intro: "course export".to_string(),
            conversations: vec![
                conversation("alice", "hw1", &["Student", "Tutor"]),
                conversation("bob", "hw1", &["Student", "Code", "Tutor"]),
                conversation("alice", "hw2", &["Code"]),
            ],
        }
    }

    #[test]
    fn test_project_counts() {
        let mut store = MemoryStore::default();
        let counts = project(&mut store, 7, &sample()).unwrap();

        assert_eq!(
            counts,
            ProjectionCounts {
                assignment_count: 2,
                conversation_count: 3,
                message_count: 6,
            }
        );
        assert_eq!(store.assignments.len(), 2);
        assert!(store.assignments.contains_key(&(7, "hw1".to_string())));
    }

    #[test]
    fn test_sort_order_is_message_index() {
        let mut store = MemoryStore::default();
        project(&mut store, 1, &sample()).unwrap();

        let orders_for = |conv_id: i64| -> Vec<i64> {
            store
                .messages
                .iter()
                .filter(|(c, _, _)| *c == conv_id)
                .map(|(_, _, order)| *order)
                .collect()
        };
        assert_eq!(orders_for(1), vec![0, 1]);
        assert_eq!(orders_for(2), vec![0, 1, 2]);
        assert_eq!(orders_for(3), vec![0]);

        let roles: Vec<_> = store
            .messages
            .iter()
            .filter(|(c, _, _)| *c == 2)
            .map(|(_, m, _)| m.role.clone().unwrap())
            .collect();
        assert_eq!(roles, vec!["Student", "Code", "Tutor"]);
    }

    #[test]
    fn test_reprojection_reuses_assignments_but_duplicates_conversations() {
        let mut store = MemoryStore::default();
        let parsed = sample();

        let first = project(&mut store, 1, &parsed).unwrap();
        let second = project(&mut store, 1, &parsed).unwrap();

        assert_eq!(first, second);
        // Assignment rows are shared across runs
        assert_eq!(store.assignments.len(), 2);
        // Conversations and messages are appended again
        assert_eq!(store.conversations.len(), 6);
        assert_eq!(store.messages.len(), 12);
    }

    #[test]
    fn test_assignments_are_scoped_per_file() {
        let mut store = MemoryStore::default();
        project(&mut store, 1, &sample()).unwrap();
        project(&mut store, 2, &sample()).unwrap();
        assert_eq!(store.assignments.len(), 4);
    }

    #[test]
    fn test_empty_labels_share_one_assignment() {
        let text = format!(
            "intro{s}Messages:\n----Student: [1]\na{s}Messages:\n----Student: [2]\nb",
            s = block_separator()
        );
        let mut store = MemoryStore::default();
        let counts = project(&mut store, 1, &parse_cleaned(&text)).unwrap();
        assert_eq!(counts.assignment_count, 1);
        assert_eq!(counts.conversation_count, 2);
        assert!(store.assignments.contains_key(&(1, String::new())));
    }

    #[test]
    fn test_store_error_propagates() {
        let mut store = MemoryStore {
            fail_on_message: Some(3),
            ..Default::default()
        };
        let err = project(&mut store, 1, &sample()).unwrap_err();
        assert_eq!(err, "disk full");
        // Rows written before the failure stay; rollback is the store's concern
        assert_eq!(store.messages.len(), 3);
    }

    #[test]
    fn test_empty_tree_projects_nothing() {
        let mut store = MemoryStore::default();
        let counts = project(&mut store, 1, &ParsedCleaned::default()).unwrap();
        assert_eq!(counts, ProjectionCounts::default());
    }
}
