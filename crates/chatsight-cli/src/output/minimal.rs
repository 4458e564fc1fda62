//! Minimal text output formatting

use chatsight_core::{DiffKind, DiffLine, FileListItem, MessageRecord};

/// Format a file as `id<TAB>filename`
pub fn format_file(file: &FileListItem) -> String {
    format!("{}\t{}", file.id, file.filename)
}

/// Format a message as content only
pub fn format_message(message: &MessageRecord) -> String {
    message.content.clone()
}

/// Format a diff line in unified-diff style
pub fn format_diff_line(line: &DiffLine) -> String {
    let marker = match line.kind {
        DiffKind::Added => '+',
        DiffKind::Removed => '-',
        DiffKind::Unchanged => ' ',
    };
    format!("{}{}", marker, line.content)
}
