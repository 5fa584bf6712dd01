//! Story model
//!
//! A story is a narrative record of a program outcome. Metrics hang off a
//! story; tags are shared labels linked to stories through `story_tags`.

use crate::value::MetricValue;
use crate::{Error, Result};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// A stored impact story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    /// Generated identifier, stable once assigned
    pub id: i64,
    pub title: String,
    pub summary: String,
    /// Program the story belongs to (categorical)
    pub program: String,
    /// Outcome label (categorical)
    pub outcome: String,
    pub location: String,
    /// Set once at creation
    pub created_at: DateTime<Utc>,
}

/// Fields for a story that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStory {
    pub title: String,
    pub summary: String,
    pub program: String,
    pub outcome: String,
    pub location: String,
    /// Only set through `new` or `with_created_at`, which keep microseconds
    created_at: DateTime<Utc>,
}

impl NewStory {
    /// Create a story stamped with the current time
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        program: impl Into<String>,
        outcome: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            program: program.into(),
            outcome: outcome.into(),
            location: location.into(),
            created_at: Utc::now().trunc_subsecs(6),
        }
    }

    /// Override the creation time (kept to microsecond precision)
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at.trunc_subsecs(6);
        self
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A named, unit-labelled measurement attached to a story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub id: i64,
    pub story_id: i64,
    pub name: String,
    pub value: MetricValue,
    /// Free-form label such as `%`, `USD` or `students`
    pub unit: String,
}

impl Metric {
    /// `name: value unit`, the form used in briefs and exports
    pub fn describe(&self) -> String {
        format!("{}: {} {}", self.name, self.value, self.unit)
    }
}

/// A uniquely labelled classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub label: String,
}

/// A story together with its metrics (by id) and tags (by label).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryDetail {
    pub story: Story,
    pub metrics: Vec<Metric>,
    pub tags: Vec<Tag>,
}

/// Render a timestamp the way it is stored: RFC 3339, UTC, microseconds.
///
/// Fixed width, so text order matches time order.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse an RFC 3339 timestamp into UTC.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(input.trim())
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| Error::InvalidValue(format!("'{}' is not an RFC 3339 timestamp: {}", input, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_format_is_fixed_width() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        assert_eq!(format_timestamp(&at), "2025-03-01T09:30:00.000000Z");
    }

    #[test]
    fn test_parse_timestamp_normalizes_offset() {
        let at = parse_timestamp("2025-03-01T10:30:00+01:00").unwrap();
        assert_eq!(format_timestamp(&at), "2025-03-01T09:30:00.000000Z");
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_new_story_drops_sub_microsecond_precision() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap() + chrono::Duration::nanoseconds(1_234_567);
        let story = NewStory::new("t", "s", "p", "o", "l").with_created_at(at);

        assert_eq!(story.created_at().timestamp_subsec_nanos(), 1_234_000);
        assert_eq!(parse_timestamp(&format_timestamp(&story.created_at())).unwrap(), story.created_at());
    }

    #[test]
    fn test_metric_describe() {
        let metric = Metric {
            id: 1,
            story_id: 1,
            name: "Graduation rate".into(),
            value: MetricValue::parse("92.5").unwrap(),
            unit: "%".into(),
        };
        assert_eq!(metric.describe(), "Graduation rate: 92.50 %");
    }
}
