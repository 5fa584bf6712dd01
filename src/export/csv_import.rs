//! Read the CSV export back into the store
//!
//! `story_id` is informational only; imported stories get new ids. The
//! tags and metrics cells are split on `"; "`, so labels, units and metric
//! names that themselves contain `"; "` do not survive a round trip.
//! An import is all or nothing.

use std::io::Read;
use crate::export::csv_export::{HEADER, LIST_SEPARATOR};
use crate::storage::SqliteStore;
use crate::story::{parse_timestamp, NewStory};
use crate::value::MetricValue;
use crate::{Error, Result};

/// A metric parsed from a `name: value unit` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedMetric {
    pub name: String,
    pub value: MetricValue,
    pub unit: String,
}

/// One CSV row, ready to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    pub story: NewStory,
    pub tags: Vec<String>,
    pub metrics: Vec<ImportedMetric>,
}

/// What an import wrote
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ImportSummary {
    pub story_ids: Vec<i64>,
    pub metrics: usize,
    pub tag_links: usize,
}

/// Parse CSV in the export layout
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<ImportRecord>> {
    // Records end at `\n` only; a bare `\r` is cell content the export leaves unquoted
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_reader(reader);

    let headers = rdr.headers()?;
    if headers.iter().ne(HEADER.iter().copied()) {
        return Err(Error::Import {
            line: 1,
            message: format!("expected header '{}'", HEADER.join(",")),
        });
    }

    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let fail = |message: String| Error::Import { line, message };

        let field = |idx: usize| record.get(idx).unwrap_or("");
        let created_at = parse_timestamp(field(5)).map_err(|e| fail(e.to_string()))?;

        let story = NewStory::new(field(1), field(6), field(2), field(3), field(4))
            .with_created_at(created_at);

        let tags = split_list(field(7)).map(str::to_string).collect();

        let metrics = split_list(field(8))
            .map(|entry| parse_metric(entry).map_err(|e| fail(format!("metric '{}': {}", entry, e))))
            .collect::<Result<Vec<_>>>()?;

        records.push(ImportRecord { story, tags, metrics });
    }

    tracing::debug!("Parsed {} CSV records", records.len());
    Ok(records)
}

/// Insert parsed records in one transaction; nothing is kept if any row fails
pub fn import_records(store: &SqliteStore, records: &[ImportRecord]) -> Result<ImportSummary> {
    store.import_records(records, false)
}

fn split_list(cell: &str) -> impl Iterator<Item = &str> {
    cell.split(LIST_SEPARATOR).filter(|s| !s.is_empty())
}

/// `name: value unit`; the name ends at the last `": "`, the unit may be empty
fn parse_metric(entry: &str) -> Result<ImportedMetric> {
    let (name, rest) = entry
        .rsplit_once(": ")
        .ok_or_else(|| Error::InvalidValue("expected 'name: value unit'".to_string()))?;
    let (value, unit) = rest.split_once(' ').unwrap_or((rest, ""));

    Ok(ImportedMetric {
        name: name.to_string(),
        value: MetricValue::parse(value)?,
        unit: unit.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::csv_export::render_csv;
    use crate::story::format_timestamp;

    const SAMPLE: &str = "story_id,title,program,outcome,location,created_at,summary,tags,metrics\n\
        3,\"Say \"\"hi\"\", now\",STEM Bridge,Internship Placement,\"Austin, TX\",2025-03-01T09:30:00.000000Z,\"Two\nlines\",employer; stem,Internships secured: 31.00 placements; Ratio: 1.50 \n\
        4,Quiet,P,O,L,2025-02-01T00:00:00.000000Z,s,,";

    #[test]
    fn test_parse_sample() {
        let records = parse_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.story.title, "Say \"hi\", now");
        assert_eq!(first.story.location, "Austin, TX");
        assert_eq!(first.story.summary, "Two\nlines");
        assert_eq!(format_timestamp(&first.story.created_at()), "2025-03-01T09:30:00.000000Z");
        assert_eq!(first.tags, ["employer", "stem"]);
        assert_eq!(first.metrics.len(), 2);
        assert_eq!(first.metrics[0].name, "Internships secured");
        assert_eq!(first.metrics[0].value.to_string(), "31.00");
        assert_eq!(first.metrics[0].unit, "placements");
        assert_eq!(first.metrics[1].unit, "");

        assert!(records[1].tags.is_empty());
        assert!(records[1].metrics.is_empty());
    }

    #[test]
    fn test_rejects_wrong_header() {
        let err = parse_csv("id,title\n1,x".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Import { line: 1, .. }));
    }

    #[test]
    fn test_bad_metric_reports_line() {
        let csv = "story_id,title,program,outcome,location,created_at,summary,tags,metrics\n\
                   1,t,p,o,l,2025-01-01T00:00:00Z,s,,Rate: lots %";
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Import { line: 2, .. }), "{err}");
    }

    #[test]
    fn test_export_import_roundtrip() {
        let source = SqliteStore::open_in_memory().unwrap();
        let id = source
            .add_story(&NewStory::new("Say \"hi\", now", "Multi\nline", "P1", "Graduation", "Austin, TX"))
            .unwrap();
        source.add_metric(id, "Graduation rate", &MetricValue::parse("92.5").unwrap(), "%").unwrap();
        let tag = source.add_tag("first-gen").unwrap();
        source.assign_tag(id, tag).unwrap();
        let exported = source.export_stories().unwrap();

        let target = SqliteStore::open_in_memory().unwrap();
        let records = parse_csv(render_csv(&exported).as_bytes()).unwrap();
        let summary = import_records(&target, &records).unwrap();
        assert_eq!(summary.story_ids.len(), 1);
        assert_eq!(summary.metrics, 1);
        assert_eq!(summary.tag_links, 1);

        let imported = target.export_stories().unwrap();
        assert_eq!(render_csv(&imported), render_csv(&exported));
    }

    #[test]
    fn test_carriage_return_in_cell_survives_roundtrip() {
        let source = SqliteStore::open_in_memory().unwrap();
        source
            .add_story(&NewStory::new("Title", "line\rbreak", "P1", "Graduation", "Austin"))
            .unwrap();
        let csv = render_csv(&source.export_stories().unwrap());
        assert!(csv.contains(",line\rbreak,"));

        let records = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].story.summary, "line\rbreak");
        assert_eq!(records[0].story.location, "Austin");
    }

    #[test]
    fn test_import_is_all_or_nothing() {
        let csv = format!(
            "{}\n1,Fine,P,O,L,2025-01-01T00:00:00Z,s,stem,\n2,{},P,O,L,2025-01-02T00:00:00Z,s,,",
            HEADER.join(","),
            "t".repeat(201)
        );
        let records = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);

        let store = SqliteStore::open_in_memory().unwrap();
        assert!(import_records(&store, &records).is_err());
        assert_eq!(store.story_count().unwrap(), 0);
        assert!(store.list_tags(None).unwrap().is_empty());
    }
}
