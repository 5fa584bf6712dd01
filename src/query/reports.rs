//! Aggregate report rows

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Story count for one outcome label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeSummary {
    pub outcome: String,
    pub story_count: u64,
}

/// Story count and most recent story for one program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramSummary {
    pub program: String,
    pub story_count: u64,
    /// Newest `created_at` in the group; a group always has a story
    pub latest_story_at: DateTime<Utc>,
}

/// Row counts across the four relations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub stories: u64,
    pub metrics: u64,
    pub tags: u64,
    pub links: u64,
}

impl std::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Stories: {}", self.stories)?;
        writeln!(f, "  Metrics: {}", self.metrics)?;
        writeln!(f, "  Tags: {}", self.tags)?;
        write!(f, "  Tag links: {}", self.links)
    }
}
