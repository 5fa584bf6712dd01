use crate::{OutputFormat, emit_success};
use anyhow::Context;
use impact_stories::config::{self, ImpactConfig};
use impact_stories::story::parse_timestamp;
use impact_stories::ui::{self, Icons};
use impact_stories::{export, render, seed};
use impact_stories::{Error, MetricValue, NewStory, SqliteStore, StoryDetail, StoryFilter};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Story fields as given on the command line
pub struct StoryArgs {
    pub title: String,
    pub summary: String,
    pub program: String,
    pub outcome: String,
    pub location: String,
    pub created_at: Option<String>,
}

/// Resolve the database location and open it, creating the schema if needed
pub fn open_store(database: Option<&Path>, config_path: Option<&Path>) -> anyhow::Result<SqliteStore> {
    let config = config::load_config(config_path)?;
    let base = std::env::current_dir()?;
    let path = config::resolve_database_path(database, config.as_ref(), &base);
    config::ensure_db_dir(&path)?;

    SqliteStore::open(&path).with_context(|| format!("failed to open database {}", path.display()))
}

pub fn run_init(
    format: OutputFormat,
    database: Option<&Path>,
    config_path: Option<&Path>,
    force: bool,
) -> anyhow::Result<()> {
    let config_path = config_path.map(Path::to_path_buf).unwrap_or_else(config::default_config_path);
    let database = database
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config::default_database_path_in(Path::new("")));
    let config = ImpactConfig {
        database: Some(database.to_string_lossy().to_string()),
    };

    config::write_config(&config_path, &config, force)?;
    let store = open_store(Some(&database), Some(&config_path))?;
    let stats = store.stats()?;

    if format.is_human() {
        ui::success(&format!("Wrote {}", config_path.display()));
        ui::info(&format!("{} Database", Icons::DATABASE), &database.display().to_string());
        if stats.stories == 0 {
            println!("{}", ui::dim("Run `impact-stories seed` to load sample stories."));
        }
    } else {
        emit_success(
            format,
            "init",
            serde_json::json!({
                "config": config_path,
                "database": database,
                "stories": stats.stories,
            }),
        )?;
    }
    Ok(())
}

pub fn run_migrate(_store: &SqliteStore, format: OutputFormat) -> anyhow::Result<()> {
    // Opening the store already ran the schema statements
    if format.is_human() {
        ui::success("Migration complete.");
    } else {
        emit_success(format, "migrate", serde_json::json!({ "migrated": true }))?;
    }
    Ok(())
}

pub fn run_seed(store: &SqliteStore, format: OutputFormat, force: bool) -> anyhow::Result<()> {
    let outcome = seed::seed(store, force)?;
    if format.is_human() {
        if outcome.seeded {
            ui::header(Icons::SEED, &outcome.message);
        } else {
            ui::warn(&outcome.message);
        }
    } else {
        emit_success(format, "seed", serde_json::to_value(&outcome)?)?;
    }
    Ok(())
}

pub fn run_add_story(store: &SqliteStore, format: OutputFormat, args: StoryArgs) -> anyhow::Result<()> {
    let mut story = NewStory::new(args.title, args.summary, args.program, args.outcome, args.location);
    if let Some(created_at) = args.created_at {
        story = story.with_created_at(parse_timestamp(&created_at)?);
    }

    let id = store.add_story(&story)?;
    report_write(format, "add-story", &format!("Added story with id {}", id), serde_json::json!({ "id": id }))
}

pub fn run_list_stories(store: &SqliteStore, format: OutputFormat) -> anyhow::Result<()> {
    let stories = store.list_stories()?;
    show(format, "list-stories", &stories, render::NO_STORIES, render::story_line, ui::stories_table)
}

pub fn run_search_stories(store: &SqliteStore, format: OutputFormat, filter: &StoryFilter) -> anyhow::Result<()> {
    let stories = store.search_stories(filter)?;
    show(format, "search-stories", &stories, render::NO_STORIES, render::story_line, ui::stories_table)
}

pub fn run_story_brief(store: &SqliteStore, format: OutputFormat, story_id: i64) -> anyhow::Result<()> {
    let detail = store.get_story_detail(story_id)?.ok_or(Error::StoryNotFound(story_id))?;
    if format.is_human() {
        print!("{}", render::story_brief(&detail));
    } else {
        emit_success(format, "story-brief", serde_json::to_value(&detail)?)?;
    }
    Ok(())
}

/// The value is validated before the store is opened, so bad input never reaches a write
pub fn run_add_metric(
    open: impl Fn() -> anyhow::Result<SqliteStore>,
    format: OutputFormat,
    story_id: i64,
    name: &str,
    value: &str,
    unit: &str,
) -> anyhow::Result<()> {
    let value = MetricValue::parse(value)?;
    let store = open()?;
    store.get_story(story_id)?.ok_or(Error::StoryNotFound(story_id))?;

    let metric_id = store.add_metric(story_id, name, &value, unit)?;
    report_write(
        format,
        "add-metric",
        &format!("Added metric {} to story {}", metric_id, story_id),
        serde_json::json!({ "id": metric_id, "story_id": story_id, "value": value }),
    )
}

pub fn run_list_metrics(store: &SqliteStore, format: OutputFormat, story_id: Option<i64>) -> anyhow::Result<()> {
    let metrics = store.list_metrics(story_id)?;
    show(format, "list-metrics", &metrics, render::NO_METRICS, render::metric_line, ui::metrics_table)
}

pub fn run_add_tag(store: &SqliteStore, format: OutputFormat, label: &str) -> anyhow::Result<()> {
    let tag_id = store.add_tag(label)?;
    report_write(format, "add-tag", &format!("Tag id {} ready.", tag_id), serde_json::json!({ "id": tag_id }))
}

pub fn run_assign_tag(store: &SqliteStore, format: OutputFormat, story_id: i64, tag_id: i64) -> anyhow::Result<()> {
    store.assign_tag(story_id, tag_id)?;
    report_write(
        format,
        "assign-tag",
        &format!("Assigned tag {} to story {}", tag_id, story_id),
        serde_json::json!({ "story_id": story_id, "tag_id": tag_id }),
    )
}

pub fn run_list_tags(store: &SqliteStore, format: OutputFormat, story_id: Option<i64>) -> anyhow::Result<()> {
    let tags = store.list_tags(story_id)?;
    show(format, "list-tags", &tags, render::NO_TAGS, render::tag_line, ui::tags_table)
}

pub fn run_outcome_summary(store: &SqliteStore, format: OutputFormat) -> anyhow::Result<()> {
    let rows = store.outcome_summary()?;
    show(format, "outcome-summary", &rows, render::NO_OUTCOMES, render::outcome_line, ui::outcome_table)
}

pub fn run_program_summary(store: &SqliteStore, format: OutputFormat) -> anyhow::Result<()> {
    let rows = store.program_summary()?;
    show(format, "program-summary", &rows, render::NO_PROGRAMS, render::program_line, ui::program_table)
}

pub fn run_export_csv(store: &SqliteStore, format: OutputFormat, output: Option<&Path>) -> anyhow::Result<()> {
    let rows = store.export_stories()?;

    if rows.is_empty() && format.is_human() {
        println!("{}", render::NO_STORIES);
        return Ok(());
    }

    match output {
        None if format.is_human() => println!("{}", export::render_csv(&rows)),
        None => emit_success(format, "export-csv", serde_json::to_value(&rows)?)?,
        Some(path) => {
            let written = write_export(&rows, path)?;
            let shown = written.as_deref().unwrap_or(path);
            report_write(
                format,
                "export-csv",
                &format!("{} Exported {} stories to {}", Icons::EXPORT, rows.len(), shown.display()),
                serde_json::json!({ "path": written, "stories": rows.len() }),
            )?;
        }
    }
    Ok(())
}

/// Write the CSV to `path` and return its absolute location; no stories means no file
fn write_export(rows: &[StoryDetail], path: &Path) -> anyhow::Result<Option<PathBuf>> {
    if rows.is_empty() {
        return Ok(None);
    }
    std::fs::write(path, export::render_csv(rows))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(Some(std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())))
}

/// The whole file is parsed before anything is written
pub fn run_import_csv(
    open: impl Fn() -> anyhow::Result<SqliteStore>,
    format: OutputFormat,
    input: &Path,
) -> anyhow::Result<()> {
    let file = std::fs::File::open(input).with_context(|| format!("failed to open {}", input.display()))?;
    let records = export::parse_csv(file)?;

    let store = open()?;
    let summary = export::import_records(&store, &records)?;
    report_write(
        format,
        "import-csv",
        &format!(
            "{} Imported {} stories ({} metrics, {} tag links) from {}",
            Icons::IMPORT,
            summary.story_ids.len(),
            summary.metrics,
            summary.tag_links,
            input.display()
        ),
        serde_json::to_value(&summary)?,
    )
}

pub fn run_stats(store: &SqliteStore, format: OutputFormat) -> anyhow::Result<()> {
    let stats = store.stats()?;
    match format {
        OutputFormat::Text => {
            ui::header(Icons::STATS, "Impact Stories Statistics");
            println!("{}", stats);
        }
        OutputFormat::Table => println!("{}", ui::stats_table(&stats)),
        OutputFormat::Json => emit_success(format, "stats", serde_json::to_value(stats)?)?,
    }
    Ok(())
}

/// Print rows as lines, a table or JSON; human formats print `empty` when there are none
fn show<T: Serialize>(
    format: OutputFormat,
    command: &str,
    items: &[T],
    empty: &str,
    line: impl Fn(&T) -> String,
    table: impl Fn(&[T]) -> String,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => emit_success(format, command, serde_json::to_value(items)?)?,
        _ if items.is_empty() => println!("{}", empty),
        OutputFormat::Table => println!("{}", table(items)),
        OutputFormat::Text => println!("{}", render::lines(items, empty, line)),
    }
    Ok(())
}

fn report_write(format: OutputFormat, command: &str, message: &str, data: serde_json::Value) -> anyhow::Result<()> {
    if format.is_human() {
        ui::success(message);
        Ok(())
    } else {
        emit_success(format, command, data)
    }
}
