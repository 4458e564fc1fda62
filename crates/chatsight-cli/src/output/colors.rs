//! ANSI color helpers for terminal output

use chatsight_core::{DiffKind, CODE_ROLE, STUDENT_ROLE};
use colored::Colorize;

/// Get colored role label
pub fn colored_role(role: Option<&str>) -> String {
    match role {
        Some(STUDENT_ROLE) => STUDENT_ROLE.cyan().to_string(),
        Some(CODE_ROLE) => CODE_ROLE.magenta().to_string(),
        Some(other) => other.green().to_string(),
        None => "?".white().dimmed().to_string(),
    }
}

/// Get colored timestamp
pub fn colored_time(timestamp: &str) -> String {
    timestamp.white().dimmed().to_string()
}

/// Get colored student name
pub fn colored_student(name: &str) -> String {
    if name.is_empty() {
        "(unknown)".white().dimmed().to_string()
    } else {
        name.cyan().bold().to_string()
    }
}

/// Get colored id
pub fn colored_id(id: i64) -> String {
    format!("#{}", id).yellow().to_string()
}

/// Get colored line number, blank when absent
pub fn colored_line_num(num: Option<usize>) -> String {
    match num {
        Some(n) => format!("{:>5}", n).white().dimmed().to_string(),
        None => "     ".to_string(),
    }
}

/// Marker and content colored by diff line kind
pub fn colored_diff(kind: DiffKind, content: &str) -> String {
    match kind {
        DiffKind::Added => format!("+ {}", content).green().to_string(),
        DiffKind::Removed => format!("- {}", content).red().to_string(),
        DiffKind::Unchanged => format!("  {}", content),
    }
}

/// Get colored header
pub fn header(text: &str) -> String {
    text.bold().underline().to_string()
}

/// Get colored label
pub fn label(text: &str) -> String {
    text.white().dimmed().to_string()
}

/// Get colored value
pub fn value(text: &str) -> String {
    text.white().to_string()
}

/// Get colored success message
pub fn success(text: &str) -> String {
    format!("{} {}", "✓".green(), text)
}

/// Get colored warning message
pub fn warning(text: &str) -> String {
    format!("{} {}", "⚠".yellow(), text)
}

/// Get colored error message
pub fn error(text: &str) -> String {
    format!("{} {}", "✗".red(), text)
}

/// Format count with comma separators
pub fn format_count(n: i64) -> String {
    let s = n.unsigned_abs().to_string();
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::new();
    if n < 0 {
        result.push('-');
    }

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1234567), "1,234,567");
        assert_eq!(format_count(-1000), "-1,000");
    }

    #[test]
    fn test_colored_diff_markers() {
        colored::control::set_override(false);
        assert_eq!(colored_diff(DiffKind::Added, "x"), "+ x");
        assert_eq!(colored_diff(DiffKind::Removed, "x"), "- x");
        assert_eq!(colored_diff(DiffKind::Unchanged, "x"), "  x");
    }
}
