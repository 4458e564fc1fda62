//! JSON output formatting

use chatsight_core::{DiffLine, DiffStats, MessageRecord};
use serde::Serialize;

/// One compact object per line, for list output
pub fn format_line<T: Serialize>(item: &T) -> serde_json::Result<String> {
    serde_json::to_string(item)
}

/// Pretty-printed document, for single results
pub fn format_pretty<T: Serialize>(item: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(item)
}

pub fn format_stats(stats: &DiffStats) -> serde_json::Value {
    serde_json::json!({
        "added": stats.added,
        "removed": stats.removed,
        "unchanged": stats.unchanged,
    })
}

/// A code turn as emitted by `turns`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnOutput<'a> {
    pub position: usize,
    pub code: &'a MessageRecord,
    pub student: Option<&'a MessageRecord>,
    pub stats: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<Vec<DiffLine>>,
}
