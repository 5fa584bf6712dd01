use chrono::{Duration, TimeZone, Utc};
use impact_stories::export::{import_records, parse_csv, render_csv, HEADER};
use impact_stories::{seed, Error, MetricValue, NewStory, SqliteStore, StoryFilter};

fn story(title: &str, program: &str, outcome: &str, minutes: i64) -> NewStory {
    let base = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
    NewStory::new(title, format!("{} summary", title), program, outcome, "Austin, TX")
        .with_created_at(base + Duration::minutes(minutes))
}

#[test]
fn test_program_and_outcome_reports() {
    let store = SqliteStore::open_in_memory().unwrap();
    let a = store.add_story(&story("A", "P1", "Graduation", 0)).unwrap();
    let b = store.add_story(&story("B", "P1", "Retention", 10)).unwrap();
    store.add_story(&story("C", "P2", "Graduation", 5)).unwrap();
    assert!(a < b);

    let programs = store.program_summary().unwrap();
    assert_eq!(programs.len(), 2);
    assert_eq!(programs[0].program, "P1");
    assert_eq!(programs[0].story_count, 2);
    assert_eq!(
        programs[0].latest_story_at,
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 10, 0).unwrap()
    );
    assert_eq!(programs[1].program, "P2");

    let outcomes = store.outcome_summary().unwrap();
    assert_eq!(outcomes[0].outcome, "Graduation");
    assert_eq!(outcomes[0].story_count, 2);
    assert_eq!(outcomes[1].outcome, "Retention");

    let total: u64 = outcomes.iter().map(|o| o.story_count).sum();
    assert_eq!(total, store.story_count().unwrap());
}

#[test]
fn test_newest_first_listing() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.add_story(&story("Old", "P1", "Graduation", 0)).unwrap();
    store.add_story(&story("New", "P1", "Graduation", 30)).unwrap();

    let titles: Vec<_> = store.list_stories().unwrap().into_iter().map(|s| s.title).collect();
    assert_eq!(titles, vec!["New", "Old"]);
}

#[test]
fn test_tag_search_returns_each_story_once() {
    let store = SqliteStore::open_in_memory().unwrap();
    let id = store.add_story(&story("Tagged", "P1", "Graduation", 0)).unwrap();
    store.add_story(&story("Untagged", "P1", "Graduation", 1)).unwrap();

    let stem = store.add_tag("stem").unwrap();
    let again = store.add_tag("stem").unwrap();
    assert_eq!(stem, again);
    store.assign_tag(id, stem).unwrap();
    store.assign_tag(id, stem).unwrap();

    let found = store.search_stories(&StoryFilter::new().tag("stem")).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, id);

    let combined = StoryFilter::new().tag("stem").program("P2");
    assert!(store.search_stories(&combined).unwrap().is_empty());
}

#[test]
fn test_missing_story_is_reported() {
    let store = SqliteStore::open_in_memory().unwrap();
    let value = MetricValue::parse("1").unwrap();

    assert!(matches!(
        store.add_metric(99, "Students", &value, "students"),
        Err(Error::StoryNotFound(99))
    ));
    assert!(store.get_story_detail(99).unwrap().is_none());
}

#[test]
fn test_csv_quotes_embedded_delimiters() {
    let store = SqliteStore::open_in_memory().unwrap();
    let id = store
        .add_story(&NewStory::new("Say \"hi\", now", "s", "P1", "Graduation", "Austin"))
        .unwrap();
    store
        .add_metric(id, "Students", &MetricValue::parse("12").unwrap(), "students")
        .unwrap();

    let csv = render_csv(&store.export_stories().unwrap());
    let row = csv.lines().nth(1).unwrap();
    assert!(row.contains("\"Say \"\"hi\"\", now\""));
    assert!(row.ends_with("Students: 12.00 students"));
}

#[test]
fn test_empty_export_is_header_only() {
    let store = SqliteStore::open_in_memory().unwrap();
    assert_eq!(render_csv(&store.export_stories().unwrap()), HEADER.join(","));
}

#[test]
fn test_seeded_export_imports_into_fresh_store() {
    let source = SqliteStore::open_in_memory().unwrap();
    seed::seed(&source, false).unwrap();
    let csv = render_csv(&source.export_stories().unwrap());

    let records = parse_csv(csv.as_bytes()).unwrap();
    let target = SqliteStore::open_in_memory().unwrap();
    let summary = import_records(&target, &records).unwrap();

    assert_eq!(summary.story_ids.len(), seed::sample_size());
    assert_eq!(target.stats().unwrap(), source.stats().unwrap());
    assert_eq!(target.program_summary().unwrap(), source.program_summary().unwrap());
}
