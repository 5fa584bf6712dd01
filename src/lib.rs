//! # Impact Stories - program outcome indexer
//!
//! Records narrative "impact stories" with quantitative metrics and
//! free-form tags, and reports on them.
//!
//! Impact Stories provides:
//! - SQLite-backed storage for stories, metrics, tags and their links
//! - Composable story search (program, outcome, location, tag, text)
//! - Outcome and program summaries
//! - A flat CSV export, and an import that reads it back
//! - A fixed sample dataset for demos

pub mod story;
pub mod value;
pub mod storage;
pub mod query;
pub mod export;
pub mod seed;
pub mod render;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use story::{Metric, NewStory, Story, StoryDetail, Tag};
pub use value::MetricValue;
pub use query::{OutcomeSummary, ProgramSummary, StoryFilter};
pub use storage::SqliteStore;

/// Result type alias for impact story operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for impact story operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Story {0} not found.")]
    StoryNotFound(i64),

    #[error("Tag {0} not found.")]
    TagNotFound(i64),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Import error on line {line}: {message}")]
    Import { line: u64, message: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_error_is_not_prefixed_twice() {
        let bad = "a,b\n1,2,3";
        let err = csv::Reader::from_reader(bad.as_bytes())
            .records()
            .find_map(|r| r.err())
            .unwrap();
        let message = Error::from(err).to_string();

        assert!(message.starts_with("CSV error:"), "{message}");
        assert_eq!(message.matches("CSV error").count(), 1, "{message}");
    }
}
