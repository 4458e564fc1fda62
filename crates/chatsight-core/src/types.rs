//! Core type definitions for transcript data

use serde::{Deserialize, Serialize};

/// Role label the parser assigns to code snapshot headers (`----Code:`)
pub const CODE_ROLE: &str = "Code";

/// Role label used for student turns
pub const STUDENT_ROLE: &str = "Student";

/// A single message inside a cleaned transcript block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMessage {
    /// Literal header label ("Student", "Tutor", "Code", ...)
    pub role: Option<String>,
    /// Bracketed timestamp token, brackets included (e.g. `[2024-01-01 10:00]`)
    pub timestamp: Option<String>,
    pub content: String,
}

impl ParsedMessage {
    pub fn new(
        role: impl Into<String>,
        timestamp: Option<&str>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            role: Some(role.into()),
            timestamp: timestamp.map(str::to_string),
            content: content.into(),
        }
    }

    /// Whether this message is a code snapshot
    pub fn is_code(&self) -> bool {
        self.role.as_deref() == Some(CODE_ROLE)
    }
}

/// One separator-delimited block: a single student/assignment conversation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedConversation {
    pub student: String,
    pub assignment: String,
    pub messages: Vec<ParsedMessage>,
}

/// Result of parsing a whole cleaned transcript
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCleaned {
    /// Preamble before the first separator line
    pub intro: String,
    pub conversations: Vec<ParsedConversation>,
}

impl ParsedCleaned {
    /// Total number of messages across all conversations
    pub fn message_count(&self) -> usize {
        self.conversations.iter().map(|c| c.messages.len()).sum()
    }
}

/// Rows created by one projection run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionCounts {
    pub assignment_count: usize,
    pub conversation_count: usize,
    pub message_count: usize,
}

/// Outcome of importing cleaned content into the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DumpResult {
    pub file_id: i64,
    pub filename: String,
    pub assignment_count: usize,
    pub conversation_count: usize,
    pub message_count: usize,
}

impl DumpResult {
    pub fn new(file_id: i64, filename: impl Into<String>, counts: ProjectionCounts) -> Self {
        Self {
            file_id,
            filename: filename.into(),
            assignment_count: counts.assignment_count,
            conversation_count: counts.conversation_count,
            message_count: counts.message_count,
        }
    }

    pub fn counts(&self) -> ProjectionCounts {
        ProjectionCounts {
            assignment_count: self.assignment_count,
            conversation_count: self.conversation_count,
            message_count: self.message_count,
        }
    }
}

/// Classification of a diff line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    Added,
    Removed,
    Unchanged,
}

impl std::fmt::Display for DiffKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiffKind::Added => write!(f, "added"),
            DiffKind::Removed => write!(f, "removed"),
            DiffKind::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// One classified line of a diff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffLine {
    #[serde(rename = "type")]
    pub kind: DiffKind,
    /// Line number in the new text (held, not advanced, for removed lines)
    pub line: usize,
    /// Line number in the old text; absent for added lines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_line: Option<usize>,
    pub content: String,
}

impl DiffLine {
    /// True for added or removed lines
    pub fn is_change(&self) -> bool {
        self.kind != DiffKind::Unchanged
    }
}

/// Diff between two stored code snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffData {
    pub from_index: i64,
    pub to_index: i64,
    pub diff: Vec<DiffLine>,
}

/// A stored code snapshot keyed by message index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSnapshot {
    pub message_index: i64,
    pub code_content: String,
}

/// File metadata as listed (content omitted)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListItem {
    pub id: i64,
    pub filename: String,
    pub file_type: Option<String>,
    pub file_size: Option<i64>,
    pub created_at: String,
}

impl FileListItem {
    /// Format file size as human-readable string
    pub fn format_size(&self) -> String {
        match self.file_size {
            Some(bytes) => format_bytes(bytes.max(0) as u64),
            None => "-".to_string(),
        }
    }
}

/// A stored upload including its raw content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: i64,
    pub filename: String,
    pub content: String,
    pub file_type: Option<String>,
    pub file_size: Option<i64>,
    pub created_at: String,
}

impl FileRecord {
    pub fn metadata(&self) -> FileListItem {
        FileListItem {
            id: self.id,
            filename: self.filename.clone(),
            file_type: self.file_type.clone(),
            file_size: self.file_size,
            created_at: self.created_at.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRecord {
    pub id: i64,
    pub file_id: i64,
    pub assignment_ref: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationRecord {
    pub id: i64,
    pub assignment_id: i64,
    pub student: String,
    pub created_at: String,
}

/// A persisted message row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    pub id: i64,
    pub conversation_id: i64,
    pub role: Option<String>,
    pub timestamp: Option<String>,
    pub content: String,
    /// Zero-based position within the conversation
    pub sort_order: i64,
    pub created_at: String,
}

impl MessageRecord {
    /// Role label for display, `?` when unclassified
    pub fn display_role(&self) -> &str {
        self.role.as_deref().unwrap_or("?")
    }

    /// Get preview text for list display
    pub fn preview(&self, max_len: usize) -> String {
        let first = self.content.lines().next().unwrap_or("").trim();
        truncate_str(first, max_len)
    }
}

pub fn truncate_str(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() > max_len {
        let truncated: String = chars[..max_len.saturating_sub(3)].iter().collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

pub fn format_bytes(bytes: u64) -> String {
    let bytes = bytes as f64;
    if bytes < 1024.0 {
        format!("{} B", bytes)
    } else if bytes < 1024.0 * 1024.0 {
        format!("{:.1} KB", bytes / 1024.0)
    } else if bytes < 1024.0 * 1024.0 * 1024.0 {
        format!("{:.1} MB", bytes / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", bytes / (1024.0 * 1024.0 * 1024.0))
    }
}
