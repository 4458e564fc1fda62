//! Turn pairing: associate code snapshots with the student turn that
//! produced them

use crate::diff::compute_diff;
use crate::types::{DiffLine, MessageRecord, ParsedMessage, CODE_ROLE, STUDENT_ROLE};

/// Minimal view of a message needed for turn pairing
pub trait TurnMessage {
    fn role(&self) -> Option<&str>;
    fn content(&self) -> &str;
}

impl TurnMessage for ParsedMessage {
    fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    fn content(&self) -> &str {
        &self.content
    }
}

impl TurnMessage for MessageRecord {
    fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    fn content(&self) -> &str {
        &self.content
    }
}

/// A `Code` message with its triggering student turn and the previous snapshot
#[derive(Debug)]
pub struct CodeTurn<'a, M> {
    /// Position of the code message in the conversation
    pub position: usize,
    pub code: &'a M,
    /// Nearest earlier `Student` message, if any
    pub student: Option<&'a M>,
    /// Code snapshot before this one, if any
    pub previous_code: Option<&'a M>,
}

impl<M: TurnMessage> CodeTurn<'_, M> {
    /// Diff against the previous snapshot.
    ///
    /// `None` when there is no earlier non-empty snapshot or the code did not
    /// change, in which case the snapshot is shown as-is.
    pub fn diff_from_previous(&self) -> Option<Vec<DiffLine>> {
        let previous = self.previous_code?.content();
        let current = self.code.content();
        if previous.is_empty() || previous == current {
            return None;
        }
        Some(compute_diff(previous, current))
    }
}

/// Pair every `Code` message (in conversation order) with the nearest
/// preceding `Student` message.
pub fn pair_code_turns<M: TurnMessage>(messages: &[M]) -> Vec<CodeTurn<'_, M>> {
    let mut turns = Vec::new();
    let mut last_student: Option<&M> = None;
    let mut last_code: Option<&M> = None;

    for (position, message) in messages.iter().enumerate() {
        match message.role() {
            Some(STUDENT_ROLE) => last_student = Some(message),
            Some(CODE_ROLE) => {
                turns.push(CodeTurn {
                    position,
                    code: message,
                    student: last_student,
                    previous_code: last_code,
                });
                last_code = Some(message);
            }
            _ => {}
        }
    }

    turns
}
