//! Human-readable output formatting

use super::colors::*;
use chatsight_core::{
    AssignmentRecord, ConversationRecord, DiffKind, DiffLine, DiffStats, DumpResult,
    FileListItem, FileRecord, MessageRecord, ParsedCleaned,
};
use colored::Colorize;

/// Format a file for list output
pub fn format_file(file: &FileListItem) -> String {
    format!(
        "{} {}  {}  {}",
        colored_id(file.id),
        value(&file.filename),
        label(&file.format_size()),
        colored_time(&file.created_at)
    )
}

/// Format a stored file's detail view
pub fn format_file_info(file: &FileRecord, show_content: bool) -> String {
    let meta = file.metadata();
    let mut lines = vec![
        format!("{}: {}", label("Id"), value(&file.id.to_string())),
        format!("{}: {}", label("Filename"), value(&file.filename)),
        format!(
            "{}: {}",
            label("Type"),
            value(file.file_type.as_deref().unwrap_or("-"))
        ),
        format!("{}: {}", label("Size"), value(&meta.format_size())),
        format!("{}: {}", label("Created"), value(&file.created_at)),
    ];

    if show_content {
        lines.push(String::new());
        lines.push(file.content.clone());
    }

    lines.join("\n")
}

pub fn format_assignment(assignment: &AssignmentRecord) -> String {
    let name = if assignment.assignment_ref.is_empty() {
        "(unnamed)"
    } else {
        &assignment.assignment_ref
    };
    format!("{} {}", colored_id(assignment.id), value(name))
}

pub fn format_conversation(conversation: &ConversationRecord) -> String {
    format!(
        "{} {}",
        colored_id(conversation.id),
        colored_student(&conversation.student)
    )
}

/// Format a message, either as a one-line preview or with full content
pub fn format_message(message: &MessageRecord, full: bool) -> String {
    let mut parts = vec![format!("{:>4}", message.sort_order)];
    parts.push(format!("[{}]", colored_role(message.role.as_deref())));
    if let Some(ts) = &message.timestamp {
        parts.push(colored_time(ts));
    }
    let header = parts.join(" ");

    if full {
        let indent = "      ";
        let body = message
            .content
            .lines()
            .map(|l| format!("{}{}", indent, l))
            .collect::<Vec<_>>()
            .join("\n");
        format!("{}\n{}", header, body)
    } else {
        format!("{} {}", header, message.preview(70))
    }
}

/// Format one diff line with both line numbers
pub fn format_diff_line(line: &DiffLine) -> String {
    let new_num = match line.kind {
        DiffKind::Removed => None,
        _ => Some(line.line),
    };
    format!(
        "{} {} {}",
        colored_line_num(line.original_line),
        colored_line_num(new_num),
        colored_diff(line.kind, &line.content)
    )
}

pub fn format_diff_stats(stats: &DiffStats) -> String {
    if !stats.has_changes() {
        return label("no changes");
    }
    format!(
        "{} {} {}",
        format!("+{}", stats.added).green(),
        format!("-{}", stats.removed).red(),
        label(&format!("={}", stats.unchanged))
    )
}

/// One line summary of an import
pub fn format_dump_result(result: &DumpResult) -> String {
    success(&format!(
        "{} {} → {} assignments, {} conversations, {} messages",
        colored_id(result.file_id),
        result.filename,
        format_count(result.assignment_count as i64),
        format_count(result.conversation_count as i64),
        format_count(result.message_count as i64)
    ))
}

/// Summary of a parsed tree, one line per conversation
pub fn format_parsed(parsed: &ParsedCleaned) -> String {
    let mut lines = Vec::new();

    if !parsed.intro.is_empty() {
        let intro = parsed.intro.lines().next().unwrap_or("");
        lines.push(format!("{}: {}", label("Intro"), value(intro)));
    }
    lines.push(format!(
        "{}: {}  {}: {}",
        label("Conversations"),
        value(&format_count(parsed.conversations.len() as i64)),
        label("Messages"),
        value(&format_count(parsed.message_count() as i64))
    ));
    lines.push(String::new());

    for (i, conversation) in parsed.conversations.iter().enumerate() {
        let code_count = conversation.messages.iter().filter(|m| m.is_code()).count();
        lines.push(format!(
            "{:>4} {} {} {} messages, {} code",
            i + 1,
            colored_student(&conversation.student),
            label(&format!("[{}]", conversation.assignment)),
            conversation.messages.len(),
            code_count
        ));
    }

    lines.join("\n")
}
