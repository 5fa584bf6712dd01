use crate::query::{OutcomeSummary, ProgramSummary, StoreStats};
use crate::story::{format_timestamp, Metric, Story, Tag};
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct StoryRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Program")]
    program: String,
    #[tabled(rename = "Outcome")]
    outcome: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Created")]
    created_at: String,
}

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Story")]
    story_id: i64,
    #[tabled(rename = "Metric")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Unit")]
    unit: String,
}

#[derive(Tabled)]
struct TagRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Label")]
    label: String,
}

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "Outcome")]
    outcome: String,
    #[tabled(rename = "Stories")]
    story_count: u64,
}

#[derive(Tabled)]
struct ProgramRow {
    #[tabled(rename = "Program")]
    program: String,
    #[tabled(rename = "Stories")]
    story_count: u64,
    #[tabled(rename = "Latest")]
    latest: String,
}

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Table")]
    table: &'static str,
    #[tabled(rename = "Rows")]
    rows: u64,
}

fn build<T: Tabled>(rows: Vec<T>) -> String {
    if rows.is_empty() {
        return String::new();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn stories_table(stories: &[Story]) -> String {
    build(
        stories
            .iter()
            .map(|s| StoryRow {
                id: s.id,
                title: s.title.clone(),
                program: s.program.clone(),
                outcome: s.outcome.clone(),
                location: s.location.clone(),
                created_at: format_timestamp(&s.created_at),
            })
            .collect(),
    )
}

pub fn metrics_table(metrics: &[Metric]) -> String {
    build(
        metrics
            .iter()
            .map(|m| MetricRow {
                id: m.id,
                story_id: m.story_id,
                name: m.name.clone(),
                value: m.value.to_string(),
                unit: m.unit.clone(),
            })
            .collect(),
    )
}

pub fn tags_table(tags: &[Tag]) -> String {
    build(
        tags.iter()
            .map(|t| TagRow { id: t.id, label: t.label.clone() })
            .collect(),
    )
}

pub fn outcome_table(rows: &[OutcomeSummary]) -> String {
    build(
        rows.iter()
            .map(|r| OutcomeRow { outcome: r.outcome.clone(), story_count: r.story_count })
            .collect(),
    )
}

pub fn program_table(rows: &[ProgramSummary]) -> String {
    build(
        rows.iter()
            .map(|r| ProgramRow {
                program: r.program.clone(),
                story_count: r.story_count,
                latest: format_timestamp(&r.latest_story_at),
            })
            .collect(),
    )
}

pub fn stats_table(stats: &StoreStats) -> String {
    build(vec![
        StatRow { table: "stories", rows: stats.stories },
        StatRow { table: "metrics", rows: stats.metrics },
        StatRow { table: "tags", rows: stats.tags },
        StatRow { table: "story_tags", rows: stats.links },
    ])
}
