//! Line-oriented text rendering
//!
//! Every function returns the text so callers decide where it goes.

use crate::query::{OutcomeSummary, ProgramSummary};
use crate::story::{format_timestamp, Metric, Story, StoryDetail, Tag};

pub const NO_STORIES: &str = "No stories found.";
pub const NO_METRICS: &str = "No metrics found.";
pub const NO_TAGS: &str = "No tags found.";
pub const NO_OUTCOMES: &str = "No outcomes found.";
pub const NO_PROGRAMS: &str = "No programs found.";

pub fn story_line(story: &Story) -> String {
    format!(
        "{} | {} | {} | {} | {} | {}",
        story.id,
        story.title,
        story.program,
        story.outcome,
        story.location,
        format_timestamp(&story.created_at)
    )
}

pub fn metric_line(metric: &Metric) -> String {
    format!(
        "{} | story {} | {} | {} {}",
        metric.id, metric.story_id, metric.name, metric.value, metric.unit
    )
}

pub fn tag_line(tag: &Tag) -> String {
    format!("{} | {}", tag.id, tag.label)
}

pub fn outcome_line(row: &OutcomeSummary) -> String {
    format!("{} | {}", row.outcome, row.story_count)
}

pub fn program_line(row: &ProgramSummary) -> String {
    format!(
        "{} | {} | latest: {}",
        row.program,
        row.story_count,
        format_timestamp(&row.latest_story_at)
    )
}

/// One line per item, or `empty` when there are none
pub fn lines<T>(items: &[T], empty: &str, line: impl Fn(&T) -> String) -> String {
    if items.is_empty() {
        return empty.to_string();
    }
    items.iter().map(line).collect::<Vec<_>>().join("\n")
}

/// Multi-line brief for one story, ending with a newline
pub fn story_brief(detail: &StoryDetail) -> String {
    let story = &detail.story;
    let tags = if detail.tags.is_empty() {
        "None".to_string()
    } else {
        detail.tags.iter().map(|t| t.label.as_str()).collect::<Vec<_>>().join(", ")
    };
    let metrics = if detail.metrics.is_empty() {
        "No metrics logged.".to_string()
    } else {
        detail
            .metrics
            .iter()
            .map(|m| format!("- {}", m.describe()))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let mut out = String::new();
    out.push_str(&format!("Story {}: {}\n", story.id, story.title));
    out.push_str(&format!("Program: {}\n", story.program));
    out.push_str(&format!("Outcome: {}\n", story.outcome));
    out.push_str(&format!("Location: {}\n", story.location));
    out.push_str(&format!("Created: {}\n", format_timestamp(&story.created_at)));
    out.push_str(&format!("Summary: {}\n", story.summary));
    out.push_str(&format!("Tags: {}\n", tags));
    out.push_str("Metrics:\n");
    out.push_str(&metrics);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::MetricValue;
    use chrono::{TimeZone, Utc};

    fn story() -> Story {
        Story {
            id: 2,
            title: "STEM Scholars Secure Industry Internships".into(),
            summary: "Paid internships.".into(),
            program: "STEM Bridge".into(),
            outcome: "Internship Placement".into(),
            location: "Austin, TX".into(),
            created_at: Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_story_line() {
        assert_eq!(
            story_line(&story()),
            "2 | STEM Scholars Secure Industry Internships | STEM Bridge | Internship Placement | Austin, TX | 2025-03-01T09:30:00.000000Z"
        );
    }

    #[test]
    fn test_lines_empty_message() {
        let none: Vec<Tag> = vec![];
        assert_eq!(lines(&none, NO_TAGS, tag_line), "No tags found.");

        let tags = vec![Tag { id: 1, label: "stem".into() }, Tag { id: 2, label: "workforce".into() }];
        assert_eq!(lines(&tags, NO_TAGS, tag_line), "1 | stem\n2 | workforce");
    }

    #[test]
    fn test_brief_without_metrics_or_tags() {
        let brief = story_brief(&StoryDetail { story: story(), metrics: vec![], tags: vec![] });
        assert!(brief.starts_with("Story 2: STEM Scholars Secure Industry Internships\n"));
        assert!(brief.contains("Tags: None\n"));
        assert!(brief.ends_with("Metrics:\nNo metrics logged.\n"));
    }

    #[test]
    fn test_brief_lists_metrics_and_tags() {
        let detail = StoryDetail {
            story: story(),
            metrics: vec![Metric {
                id: 4,
                story_id: 2,
                name: "Average hourly wage".into(),
                value: MetricValue::parse("24.75").unwrap(),
                unit: "USD".into(),
            }],
            tags: vec![Tag { id: 1, label: "employer".into() }, Tag { id: 2, label: "stem".into() }],
        };
        let brief = story_brief(&detail);
        assert!(brief.contains("Tags: employer, stem\n"));
        assert!(brief.ends_with("Metrics:\n- Average hourly wage: 24.75 USD\n"));
    }

    #[test]
    fn test_metric_and_summary_lines() {
        let metric = Metric {
            id: 9,
            story_id: 2,
            name: "Employer partners".into(),
            value: MetricValue::parse("7").unwrap(),
            unit: "partners".into(),
        };
        assert_eq!(metric_line(&metric), "9 | story 2 | Employer partners | 7.00 partners");

        let row = ProgramSummary {
            program: "P1".into(),
            story_count: 2,
            latest_story_at: Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap(),
        };
        assert_eq!(program_line(&row), "P1 | 2 | latest: 2025-03-01T09:30:00.000000Z");
        assert_eq!(
            outcome_line(&OutcomeSummary { outcome: "Retention".into(), story_count: 1 }),
            "Retention | 1"
        );
    }
}
