//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - stories(id, title, summary, program, outcome, location, created_at)
//! - metrics(id, story_id, name, value, unit)
//! - tags(id, label)
//! - story_tags(story_id, tag_id)

pub mod schema;
pub mod sqlite;

pub use sqlite::SqliteStore;
