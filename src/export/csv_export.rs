//! Flat CSV export, one row per story
//!
//! Cells are quoted only when they contain a comma, a newline or a double
//! quote, with inner quotes doubled. Rows are joined by `\n` and the output
//! has no trailing newline.

use crate::story::{format_timestamp, StoryDetail};

/// Export columns, in order
pub const HEADER: [&str; 9] = [
    "story_id",
    "title",
    "program",
    "outcome",
    "location",
    "created_at",
    "summary",
    "tags",
    "metrics",
];

/// Separator between tag labels and between metrics within one cell
pub const LIST_SEPARATOR: &str = "; ";

/// Render stories as CSV; no stories yields the header line alone.
pub fn render_csv(rows: &[StoryDetail]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(HEADER.join(","));

    for row in rows {
        let tags = row
            .tags
            .iter()
            .map(|t| t.label.as_str())
            .collect::<Vec<_>>()
            .join(LIST_SEPARATOR);
        let metrics = row
            .metrics
            .iter()
            .map(|m| m.describe())
            .collect::<Vec<_>>()
            .join(LIST_SEPARATOR);

        let cells = [
            row.story.id.to_string(),
            row.story.title.clone(),
            row.story.program.clone(),
            row.story.outcome.clone(),
            row.story.location.clone(),
            format_timestamp(&row.story.created_at),
            row.story.summary.clone(),
            tags,
            metrics,
        ];
        lines.push(cells.iter().map(|c| csv_cell(c)).collect::<Vec<_>>().join(","));
    }

    lines.join("\n")
}

/// Escape one cell
pub fn csv_cell(value: &str) -> String {
    let escaped = value.replace('"', "\"\"");
    if escaped.contains([',', '\n', '"']) {
        format!("\"{}\"", escaped)
    } else {
        escaped
    }
}
