//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, ErrorCode, OptionalExtension, params, params_from_iter};
use crate::export::{ImportRecord, ImportSummary};
use crate::query::{OutcomeSummary, ProgramSummary, StoreStats, StoryFilter};
use crate::story::{format_timestamp, parse_timestamp, Metric, NewStory, Story, StoryDetail, Tag};
use crate::value::MetricValue;
use crate::{Error, Result};
use super::schema;

const STORY_COLUMNS: &str = "s.id, s.title, s.summary, s.program, s.outcome, s.location, s.created_at";

/// Newest first; id breaks ties so output is reproducible
const STORY_ORDER: &str = "ORDER BY s.created_at DESC, s.id DESC";

/// SQLite-backed store for stories, metrics and tags
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        tracing::debug!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute_batch(schema::PRAGMAS)?;
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    // ========== Write Operations ==========

    /// Insert a story and return its generated id
    pub fn add_story(&self, story: &NewStory) -> Result<i64> {
        insert_story(&self.conn, story)
    }

    /// Insert a metric for an existing story.
    ///
    /// The story is not looked up first; the foreign key rejects unknown
    /// stories and that surfaces as `StoryNotFound`.
    pub fn add_metric(&self, story_id: i64, name: &str, value: &MetricValue, unit: &str) -> Result<i64> {
        insert_metric(&self.conn, story_id, name, value, unit)
    }

    /// Create a tag, or return the id of the tag that already has this label
    pub fn add_tag(&self, label: &str) -> Result<i64> {
        upsert_tag(&self.conn, label)
    }

    /// Link a tag to a story; linking twice is a no-op
    pub fn assign_tag(&self, story_id: i64, tag_id: i64) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        link_tag(&tx, story_id, tag_id)?;
        tx.commit()?;
        Ok(())
    }

    /// Delete all data, children before parents
    pub fn clear_all(&self) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        delete_all(&tx)?;
        tx.commit()?;
        tracing::info!("Cleared all stories, metrics and tags");
        Ok(())
    }

    /// Insert stories with their metrics and tags as one transaction.
    ///
    /// With `replace`, existing data is deleted inside the same transaction.
    /// Any failure rolls everything back, including the delete.
    pub fn import_records(&self, records: &[ImportRecord], replace: bool) -> Result<ImportSummary> {
        let tx = self.conn.unchecked_transaction()?;
        if replace {
            delete_all(&tx)?;
        }

        let mut summary = ImportSummary::default();
        for record in records {
            let story_id = insert_story(&tx, &record.story)?;
            for metric in &record.metrics {
                insert_metric(&tx, story_id, &metric.name, &metric.value, &metric.unit)?;
                summary.metrics += 1;
            }
            for label in &record.tags {
                let tag_id = upsert_tag(&tx, label)?;
                link_tag(&tx, story_id, tag_id)?;
                summary.tag_links += 1;
            }
            summary.story_ids.push(story_id);
        }

        tx.commit()?;
        if replace {
            tracing::info!("Replaced all stories, metrics and tags");
        }
        tracing::info!(
            "Imported {} stories ({} metrics, {} tag links)",
            summary.story_ids.len(),
            summary.metrics,
            summary.tag_links
        );
        Ok(summary)
    }

    // ========== Story Reads ==========

    /// Get a story by id
    pub fn get_story(&self, id: i64) -> Result<Option<Story>> {
        story_by_id(&self.conn, id)
    }

    /// Get a story with its metrics (by id) and tags (by label)
    pub fn get_story_detail(&self, id: i64) -> Result<Option<StoryDetail>> {
        let tx = self.conn.unchecked_transaction()?;
        let detail = match story_by_id(&tx, id)? {
            Some(story) => Some(StoryDetail {
                metrics: metrics_for_story(&tx, story.id)?,
                tags: tags_for_story(&tx, story.id)?,
                story,
            }),
            None => None,
        };
        tx.commit()?;
        Ok(detail)
    }

    /// All stories, newest first
    pub fn list_stories(&self) -> Result<Vec<Story>> {
        self.search_stories(&StoryFilter::default())
    }

    /// Stories matching every dimension set in `filter`, newest first
    pub fn search_stories(&self, filter: &StoryFilter) -> Result<Vec<Story>> {
        let (clause, param_values) = filter.to_sql();
        let sql = format!("SELECT {} FROM stories s {} {}", STORY_COLUMNS, clause, STORY_ORDER);

        let mut stmt = self.conn.prepare(&sql)?;
        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(AsRef::as_ref).collect();

        let stories = stmt
            .query_map(params_from_iter(params_ref), row_to_story)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        tracing::debug!("Search matched {} stories", stories.len());
        Ok(stories)
    }

    // ========== Metric and Tag Reads ==========

    /// Metrics in insertion order, optionally for one story
    pub fn list_metrics(&self, story_id: Option<i64>) -> Result<Vec<Metric>> {
        match story_id {
            Some(id) => metrics_for_story(&self.conn, id),
            None => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, story_id, name, value, unit FROM metrics ORDER BY id ASC"
                )?;
                let metrics = stmt
                    .query_map([], row_to_metric)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(metrics)
            }
        }
    }

    /// Tags by label, optionally only those linked to one story
    pub fn list_tags(&self, story_id: Option<i64>) -> Result<Vec<Tag>> {
        match story_id {
            Some(id) => tags_for_story(&self.conn, id),
            None => {
                let mut stmt = self.conn.prepare("SELECT id, label FROM tags ORDER BY label ASC")?;
                let tags = stmt
                    .query_map([], row_to_tag)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(tags)
            }
        }
    }

    // ========== Reports ==========

    /// Story counts per outcome, largest first, then by outcome name
    pub fn outcome_summary(&self) -> Result<Vec<OutcomeSummary>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT outcome, COUNT(*) AS story_count
            FROM stories
            GROUP BY outcome
            ORDER BY story_count DESC, outcome ASC
            "#,
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(OutcomeSummary {
                    outcome: row.get(0)?,
                    story_count: row.get::<_, i64>(1)? as u64,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Story counts and latest story per program, largest first, then by program name
    pub fn program_summary(&self) -> Result<Vec<ProgramSummary>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT program, COUNT(*) AS story_count, MAX(created_at) AS latest_story_at
            FROM stories
            GROUP BY program
            ORDER BY story_count DESC, program ASC
            "#,
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(ProgramSummary {
                    program: row.get(0)?,
                    story_count: row.get::<_, i64>(1)? as u64,
                    latest_story_at: timestamp_column(row, 2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    // ========== Export ==========

    /// Every story with its metrics and tags, newest first
    pub fn export_stories(&self) -> Result<Vec<StoryDetail>> {
        let tx = self.conn.unchecked_transaction()?;
        let stories = {
            let mut stmt = tx.prepare(&format!(
                "SELECT {} FROM stories s {}",
                STORY_COLUMNS, STORY_ORDER
            ))?;
            stmt.query_map([], row_to_story)?
                .collect::<rusqlite::Result<Vec<_>>>()?
        };

        let mut rows = Vec::with_capacity(stories.len());
        for story in stories {
            rows.push(StoryDetail {
                metrics: metrics_for_story(&tx, story.id)?,
                tags: tags_for_story(&tx, story.id)?,
                story,
            });
        }
        tx.commit()?;
        Ok(rows)
    }

    // ========== Counts ==========

    /// Count all stories
    pub fn story_count(&self) -> Result<u64> {
        count(&self.conn, "SELECT COUNT(*) FROM stories")
    }

    /// Count all metrics
    pub fn metric_count(&self) -> Result<u64> {
        count(&self.conn, "SELECT COUNT(*) FROM metrics")
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<StoreStats> {
        Ok(StoreStats {
            stories: self.story_count()?,
            metrics: self.metric_count()?,
            tags: count(&self.conn, "SELECT COUNT(*) FROM tags")?,
            links: count(&self.conn, "SELECT COUNT(*) FROM story_tags")?,
        })
    }
}

fn insert_story(conn: &Connection, story: &NewStory) -> Result<i64> {
    conn.execute(
        r#"
        INSERT INTO stories (title, summary, program, outcome, location, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
        params![
            story.title,
            story.summary,
            story.program,
            story.outcome,
            story.location,
            format_timestamp(&story.created_at()),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn insert_metric(conn: &Connection, story_id: i64, name: &str, value: &MetricValue, unit: &str) -> Result<i64> {
    let inserted = conn.execute(
        "INSERT INTO metrics (story_id, name, value, unit) VALUES (?1, ?2, ?3, ?4)",
        params![story_id, name, value.to_string(), unit],
    );
    match inserted {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(e) if is_foreign_key_violation(&e) => Err(Error::StoryNotFound(story_id)),
        Err(e) => Err(e.into()),
    }
}

fn upsert_tag(conn: &Connection, label: &str) -> Result<i64> {
    let id = conn.query_row(
        r#"
        INSERT INTO tags (label) VALUES (?1)
        ON CONFLICT(label) DO UPDATE SET label = excluded.label
        RETURNING id
        "#,
        [label],
        |row| row.get(0),
    )?;
    Ok(id)
}

/// Callers run this inside a transaction so the checks and the insert agree
fn link_tag(conn: &Connection, story_id: i64, tag_id: i64) -> Result<()> {
    if !exists(conn, "SELECT 1 FROM stories WHERE id = ?1", story_id)? {
        return Err(Error::StoryNotFound(story_id));
    }
    if !exists(conn, "SELECT 1 FROM tags WHERE id = ?1", tag_id)? {
        return Err(Error::TagNotFound(tag_id));
    }
    conn.execute(
        "INSERT OR IGNORE INTO story_tags (story_id, tag_id) VALUES (?1, ?2)",
        params![story_id, tag_id],
    )?;
    Ok(())
}

/// Children before parents
fn delete_all(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM story_tags", [])?;
    conn.execute("DELETE FROM metrics", [])?;
    conn.execute("DELETE FROM stories", [])?;
    conn.execute("DELETE FROM tags", [])?;
    Ok(())
}

fn story_by_id(conn: &Connection, id: i64) -> Result<Option<Story>> {
    conn.query_row(
        &format!("SELECT {} FROM stories s WHERE s.id = ?1", STORY_COLUMNS),
        [id],
        row_to_story,
    )
    .optional()
    .map_err(Into::into)
}

fn metrics_for_story(conn: &Connection, story_id: i64) -> Result<Vec<Metric>> {
    let mut stmt = conn.prepare(
        "SELECT id, story_id, name, value, unit FROM metrics WHERE story_id = ?1 ORDER BY id ASC"
    )?;
    let metrics = stmt
        .query_map([story_id], row_to_metric)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(metrics)
}

fn tags_for_story(conn: &Connection, story_id: i64) -> Result<Vec<Tag>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT t.id, t.label
        FROM tags t
        JOIN story_tags st ON st.tag_id = t.id
        WHERE st.story_id = ?1
        ORDER BY t.label ASC
        "#,
    )?;
    let tags = stmt
        .query_map([story_id], row_to_tag)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(tags)
}

fn exists(conn: &Connection, sql: &str, id: i64) -> Result<bool> {
    Ok(conn.query_row(sql, [id], |_| Ok(())).optional()?.is_some())
}

fn count(conn: &Connection, sql: &str) -> Result<u64> {
    let count: i64 = conn.query_row(sql, [], |row| row.get(0))?;
    Ok(count as u64)
}

fn is_foreign_key_violation(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}

/// Helper to convert a row to a Story
fn row_to_story(row: &rusqlite::Row) -> rusqlite::Result<Story> {
    Ok(Story {
        id: row.get(0)?,
        title: row.get(1)?,
        summary: row.get(2)?,
        program: row.get(3)?,
        outcome: row.get(4)?,
        location: row.get(5)?,
        created_at: timestamp_column(row, 6)?,
    })
}

/// Helper to convert a row to a Metric
fn row_to_metric(row: &rusqlite::Row) -> rusqlite::Result<Metric> {
    let value_str: String = row.get(3)?;
    let value = MetricValue::parse(&value_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Metric {
        id: row.get(0)?,
        story_id: row.get(1)?,
        name: row.get(2)?,
        value,
        unit: row.get(4)?,
    })
}

fn row_to_tag(row: &rusqlite::Row) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: row.get(0)?,
        label: row.get(1)?,
    })
}

fn timestamp_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<chrono::DateTime<chrono::Utc>> {
    let text: String = row.get(idx)?;
    parse_timestamp(&text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
