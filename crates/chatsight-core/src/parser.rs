//! Parser for cleaned, standardized transcript text
//!
//! The input is an intro block followed by conversation blocks, each block
//! separated by a line of 80 `=` characters:
//!
//! ```text
//! <intro>
//! ================================================================================
//! Student: Alice
//! Assignment: hw1
//! Messages:
//! ----Student: [2024-01-01 10:00]
//! hello
//! ----Code:
//! print("hi")
//! ```
//!
//! Parsing never fails. Blocks without headers produce empty labels and
//! blocks without a `Messages:` marker produce no messages.

use std::path::Path;

use crate::types::{ParsedCleaned, ParsedConversation, ParsedMessage, CODE_ROLE};

/// Width of the `=` separator line between blocks
pub const SEPARATOR_WIDTH: usize = 80;

const HEADER_PREFIX: &str = "----";
const STUDENT_PREFIX: &str = "Student:";
const ASSIGNMENT_PREFIX: &str = "Assignment:";
const MESSAGES_MARKER: &str = "Messages:";
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Role and timestamp extracted from a `----` header line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageHeader {
    pub role: String,
    pub timestamp: Option<String>,
}

/// The separator between transcript blocks, including its surrounding newlines
pub fn block_separator() -> String {
    format!("\n{}\n", "=".repeat(SEPARATOR_WIDTH))
}

/// Classify a line as a message header.
///
/// Recognizers are tried in a fixed order: bare code header, then
/// `Role: [ts]`, then `Role [ts]`. Returns `None` for non-header lines.
pub fn parse_header(line: &str) -> Option<MessageHeader> {
    let rest = trim_text(line.strip_prefix(HEADER_PREFIX)?);
    code_header(rest)
        .or_else(|| colon_bracket_header(rest))
        .or_else(|| space_bracket_header(rest))
}

fn code_header(rest: &str) -> Option<MessageHeader> {
    if rest == "Code:" || rest == CODE_ROLE {
        Some(MessageHeader {
            role: CODE_ROLE.to_string(),
            timestamp: None,
        })
    } else {
        None
    }
}

/// `Role: [timestamp]`, splitting on the first colon that is followed by a
/// bracket group closing the line.
fn colon_bracket_header(rest: &str) -> Option<MessageHeader> {
    rest.char_indices()
        .filter(|&(i, c)| c == ':' && i > 0)
        .find_map(|(i, _)| {
            let tail = rest[i + 1..].trim_start();
            let timestamp = bracket_group(tail)?;
            let role = rest[..i].trim_end_matches(':').trim();
            Some(MessageHeader {
                role: role.to_string(),
                timestamp: Some(timestamp),
            })
        })
}

/// `Role [timestamp]`, splitting at the first whitespace-preceded bracket
/// group closing the line.
fn space_bracket_header(rest: &str) -> Option<MessageHeader> {
    rest.char_indices()
        .filter(|&(_, c)| c == '[')
        .find_map(|(i, _)| {
            let before = &rest[..i];
            if !before.ends_with(char::is_whitespace) {
                return None;
            }
            let role = before.trim();
            if role.is_empty() {
                return None;
            }
            let timestamp = bracket_group(&rest[i..])?;
            Some(MessageHeader {
                role: role.to_string(),
                timestamp: Some(timestamp),
            })
        })
}

/// Match `[X]` followed only by whitespace, where `X` is non-empty and has
/// no `]`. Returns the group with brackets retained.
fn bracket_group(s: &str) -> Option<String> {
    let inner_and_rest = s.strip_prefix('[')?;
    let close = inner_and_rest.find(']')?;
    let inner = &inner_and_rest[..close];
    if inner.is_empty() || !inner_and_rest[close + 1..].trim().is_empty() {
        return None;
    }
    Some(format!("[{}]", inner))
}

/// Trim whitespace and byte order marks from both ends
fn trim_text(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == BYTE_ORDER_MARK)
}

/// Parse cleaned transcript text into an intro and conversation blocks
pub fn parse_cleaned(content: &str) -> ParsedCleaned {
    let normalized = content.replace("\r\n", "\n");
    let separator = block_separator();
    let mut parts = normalized
        .split(separator.as_str())
        .map(trim_text)
        .filter(|p| !p.is_empty());

    let intro = parts.next().unwrap_or_default().to_string();
    let conversations = parts.map(parse_block).collect();

    ParsedCleaned {
        intro,
        conversations,
    }
}

/// Read and parse a cleaned transcript file
pub fn parse_cleaned_file<P: AsRef<Path>>(path: P) -> std::io::Result<ParsedCleaned> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_cleaned(&content))
}

fn parse_block(block: &str) -> ParsedConversation {
    let mut conversation = ParsedConversation::default();
    let mut lines = block.split('\n');

    // Header section: labels until the Messages: marker
    let mut saw_marker = false;
    for line in lines.by_ref() {
        if let Some(value) = line.strip_prefix(STUDENT_PREFIX) {
            conversation.student = trim_text(value).to_string();
        } else if let Some(value) = line.strip_prefix(ASSIGNMENT_PREFIX) {
            conversation.assignment = trim_text(value).to_string();
        } else if line.starts_with(MESSAGES_MARKER) {
            saw_marker = true;
            break;
        }
    }
    if !saw_marker {
        return conversation;
    }

    // Message section; lines before the first header are dropped
    let mut current: Option<(MessageHeader, Vec<&str>)> = None;
    for line in lines {
        match parse_header(line) {
            Some(header) => {
                if let Some((prev, body)) = current.take() {
                    conversation.messages.push(finish_message(prev, &body));
                }
                current = Some((header, Vec::new()));
            }
            None => {
                if let Some((_, body)) = current.as_mut() {
                    body.push(line);
                }
            }
        }
    }
    if let Some((prev, body)) = current {
        conversation.messages.push(finish_message(prev, &body));
    }

    conversation
}

fn finish_message(header: MessageHeader, body: &[&str]) -> ParsedMessage {
    ParsedMessage {
        role: Some(header.role),
        timestamp: header.timestamp,
        content: trim_text(&body.join("\n")).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sep() -> String {
        block_separator()
    }

    #[test]
    fn test_parse_single_conversation() {
        let text = format!(
            "intro{}Student: Alice\nAssignment: hw1\nMessages:\n----Student: [t1]\nhello\n----Tutor: [t2]\nhi",
            sep()
        );
        let parsed = parse_cleaned(&text);
        assert_eq!(parsed.intro, "intro");
        assert_eq!(parsed.conversations.len(), 1);

        let conv = &parsed.conversations[0];
        assert_eq!(conv.student, "Alice");
        assert_eq!(conv.assignment, "hw1");
        assert_eq!(
            conv.messages,
            vec![
                ParsedMessage::new("Student", Some("[t1]"), "hello"),
                ParsedMessage::new("Tutor", Some("[t2]"), "hi"),
            ]
        );
    }

    #[test]
    fn test_code_header_has_no_timestamp() {
        let text = format!(
            "intro{}Student: Bob\nAssignment: lab2\nMessages:\n----Student [2024-01-01 10:00]\nwhy?\n----Code:\ndef f():\n    return 1\n\n----Tutor [2024-01-01 10:01]\nlook at f",
            sep()
        );
        let parsed = parse_cleaned(&text);
        let messages = &parsed.conversations[0].messages;
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].timestamp.as_deref(), Some("[2024-01-01 10:00]"));
        assert_eq!(messages[1].role.as_deref(), Some("Code"));
        assert_eq!(messages[1].timestamp, None);
        assert_eq!(messages[1].content, "def f():\n    return 1");
        assert!(messages[1].is_code());
    }

    #[test]
    fn test_no_separator_is_all_intro() {
        let parsed = parse_cleaned("  just a preamble\nwith lines  \n");
        assert_eq!(parsed.intro, "just a preamble\nwith lines");
        assert!(parsed.conversations.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let parsed = parse_cleaned("");
        assert_eq!(parsed, ParsedCleaned::default());
    }

    #[test]
    fn test_crlf_is_normalized() {
        let text = format!(
            "intro{}Student: Carol\r\nAssignment: hw3\r\nMessages:\r\n----Student: [t]\r\nline one\r\nline two",
            sep().replace('\n', "\r\n")
        );
        let parsed = parse_cleaned(&text);
        let conv = &parsed.conversations[0];
        assert_eq!(conv.student, "Carol");
        assert_eq!(conv.messages[0].content, "line one\nline two");
    }

    #[test]
    fn test_block_without_labels_or_marker() {
        let text = format!("intro{}some stray text\n----Student: [t]\nignored", sep());
        let parsed = parse_cleaned(&text);
        assert_eq!(parsed.conversations.len(), 1);
        let conv = &parsed.conversations[0];
        assert_eq!(conv.student, "");
        assert_eq!(conv.assignment, "");
        assert!(conv.messages.is_empty());
    }

    #[test]
    fn test_lines_before_first_header_are_skipped() {
        let text = format!(
            "intro{}Student: D\nMessages:\nnoise\nmore noise\n----Tutor: [t]\nhi",
            sep()
        );
        let parsed = parse_cleaned(&text);
        let messages = &parsed.conversations[0].messages;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "hi");
    }

    #[test]
    fn test_multiple_blocks_keep_order() {
        let text = format!(
            "intro{a}Student: A\nAssignment: x\nMessages:\n----Student: [1]\none{a}Student: B\nAssignment: y\nMessages:\n----Student: [2]\ntwo\n",
            a = sep()
        );
        let parsed = parse_cleaned(&text);
        let students: Vec<_> = parsed.conversations.iter().map(|c| c.student.as_str()).collect();
        assert_eq!(students, vec!["A", "B"]);
        assert_eq!(parsed.message_count(), 2);
    }

    #[test]
    fn test_empty_message_bodies() {
        let text = format!(
            "intro{}Messages:\n----Student: [1]\n----Code\n----Tutor [2]\n",
            sep()
        );
        let parsed = parse_cleaned(&text);
        let messages = &parsed.conversations[0].messages;
        assert_eq!(messages.len(), 3);
        assert!(messages.iter().all(|m| m.content.is_empty()));
        assert_eq!(messages[1].role.as_deref(), Some("Code"));
    }

    #[test]
    fn test_header_shapes() {
        assert_eq!(
            parse_header("----Code:"),
            Some(MessageHeader { role: "Code".into(), timestamp: None })
        );
        assert_eq!(
            parse_header("----  Code  "),
            Some(MessageHeader { role: "Code".into(), timestamp: None })
        );
        assert_eq!(
            parse_header("----Tutor: [10:00]"),
            Some(MessageHeader { role: "Tutor".into(), timestamp: Some("[10:00]".into()) })
        );
        assert_eq!(
            parse_header("----Teaching Assistant:: [t]"),
            Some(MessageHeader {
                role: "Teaching Assistant".into(),
                timestamp: Some("[t]".into())
            })
        );
        assert_eq!(
            parse_header("----Student   [2024-01-01 10:00]  "),
            Some(MessageHeader {
                role: "Student".into(),
                timestamp: Some("[2024-01-01 10:00]".into())
            })
        );
        // Code with a timestamp falls through to the bracket shapes
        assert_eq!(
            parse_header("----Code: [t]"),
            Some(MessageHeader { role: "Code".into(), timestamp: Some("[t]".into()) })
        );
    }

    #[test]
    fn test_non_headers() {
        assert_eq!(parse_header("---Student: [t]"), None);
        assert_eq!(parse_header(" ----Student: [t]"), None);
        assert_eq!(parse_header("----Student:"), None);
        assert_eq!(parse_header("----Student: [t] trailing"), None);
        assert_eq!(parse_header("----Student[t]"), None);
        assert_eq!(parse_header("----Student: []"), None);
        assert_eq!(parse_header("----"), None);
        assert_eq!(parse_header("hello"), None);
    }

    #[test]
    fn test_colon_split_uses_first_bracketed_colon() {
        let header = parse_header("----Re: Student: [t]").unwrap();
        assert_eq!(header.role, "Re: Student");
        let header = parse_header("----Tutor: [a:b]").unwrap();
        assert_eq!(header.role, "Tutor");
        assert_eq!(header.timestamp.as_deref(), Some("[a:b]"));
    }

    #[test]
    fn test_leading_byte_order_mark_is_trimmed() {
        let parsed = parse_cleaned("\u{feff}intro");
        assert_eq!(parsed.intro, "intro");

        let text = format!(
            "\u{feff}intro{}Student: \u{feff}Ann\nAssignment: a\nMessages:\n----Student: [t]\nhi",
            sep()
        );
        let parsed = parse_cleaned(&text);
        assert_eq!(parsed.intro, "intro");
        assert_eq!(parsed.conversations[0].student, "Ann");
        assert_eq!(parsed.conversations[0].messages[0].content, "hi");
    }

    #[test]
    fn test_parse_cleaned_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("cleaned.txt");
        let text = format!("intro{}Student: E\nAssignment: a\nMessages:\n----Student: [t]\nx", sep());
        std::fs::write(&path, text).unwrap();

        let parsed = parse_cleaned_file(&path).unwrap();
        assert_eq!(parsed.conversations[0].student, "E");
        assert!(parse_cleaned_file(tmp.path().join("missing.txt")).is_err());
    }
}
