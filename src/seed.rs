//! Sample dataset for demos and manual testing

use crate::export::{ImportRecord, ImportedMetric};
use crate::storage::SqliteStore;
use crate::story::NewStory;
use crate::value::MetricValue;
use crate::Result;

struct MetricSeed {
    name: &'static str,
    value: &'static str,
    unit: &'static str,
}

struct StorySeed {
    title: &'static str,
    summary: &'static str,
    program: &'static str,
    outcome: &'static str,
    location: &'static str,
    metrics: &'static [MetricSeed],
    tags: &'static [&'static str],
}

const fn metric(name: &'static str, value: &'static str, unit: &'static str) -> MetricSeed {
    MetricSeed { name, value, unit }
}

const STORIES: &[StorySeed] = &[
    StorySeed {
        title: "First-Gen Scholars Reach Graduation Milestone",
        summary: "Cohort of first-generation scholars completed capstone projects and graduated with peer mentoring support.",
        program: "First-Gen Success Track",
        outcome: "Graduation",
        location: "Chicago, IL",
        metrics: &[
            metric("Graduation rate", "92.50", "%"),
            metric("Peer mentors activated", "18", "mentors"),
            metric("Capstone projects", "24", "projects"),
        ],
        tags: &["first-gen", "mentoring", "graduation"],
    },
    StorySeed {
        title: "STEM Scholars Secure Industry Internships",
        summary: "Scholar cohort partnered with regional employers to land paid internships in emerging tech roles.",
        program: "STEM Bridge",
        outcome: "Internship Placement",
        location: "Austin, TX",
        metrics: &[
            metric("Internships secured", "31", "placements"),
            metric("Average hourly wage", "24.75", "USD"),
            metric("Employer partners", "7", "partners"),
        ],
        tags: &["stem", "employer", "workforce"],
    },
    StorySeed {
        title: "Transfer Scholars Increase Completion Rate",
        summary: "Wraparound advising helped transfer scholars persist through the first year after transfer.",
        program: "Transfer Momentum",
        outcome: "Retention",
        location: "Phoenix, AZ",
        metrics: &[
            metric("First-year retention", "88.00", "%"),
            metric("Advising hours", "146", "hours"),
            metric("Emergency grants", "12", "grants"),
        ],
        tags: &["transfer", "retention", "advising"],
    },
    StorySeed {
        title: "Community College Scholars Advance to Four-Year Programs",
        summary: "Scholars completed transfer pathways with personalized financial coaching and coaching pods.",
        program: "Pathway Launch",
        outcome: "Transfer",
        location: "Sacramento, CA",
        metrics: &[
            metric("Transfers completed", "19", "students"),
            metric("Coaching sessions", "84", "sessions"),
            metric("Aid packages optimized", "17", "packages"),
        ],
        tags: &["transfer", "financial-coaching", "community-college"],
    },
];

/// Result of a seed run
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SeedOutcome {
    pub seeded: bool,
    pub message: String,
}

/// Number of stories in the sample dataset
pub fn sample_size() -> usize {
    STORIES.len()
}

/// Insert the sample stories.
///
/// Without `force` nothing happens when any story exists. With `force` the
/// store is cleared first, in the same transaction as the inserts.
pub fn seed(store: &SqliteStore, force: bool) -> Result<SeedOutcome> {
    if !force && store.story_count()? > 0 {
        tracing::info!("Stories already present, skipping seed");
        return Ok(SeedOutcome {
            seeded: false,
            message: "Skipped seeding because stories already exist.".to_string(),
        });
    }

    let records = STORIES
        .iter()
        .map(|entry| {
            let metrics = entry
                .metrics
                .iter()
                .map(|m| {
                    Ok(ImportedMetric {
                        name: m.name.to_string(),
                        value: MetricValue::parse(m.value)?,
                        unit: m.unit.to_string(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(ImportRecord {
                story: NewStory::new(entry.title, entry.summary, entry.program, entry.outcome, entry.location),
                tags: entry.tags.iter().map(|t| t.to_string()).collect(),
                metrics,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    // With force, the clear and the inserts commit together
    store.import_records(&records, force)?;

    tracing::info!("Seeded {} stories", STORIES.len());
    Ok(SeedOutcome {
        seeded: true,
        message: format!("Seeded {} stories.", STORIES.len()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::StoryFilter;

    #[test]
    fn test_seed_populates_store() {
        let store = SqliteStore::open_in_memory().unwrap();
        let outcome = seed(&store, false).unwrap();

        assert!(outcome.seeded);
        assert_eq!(outcome.message, "Seeded 4 stories.");

        let stats = store.stats().unwrap();
        assert_eq!(stats.stories, 4);
        assert_eq!(stats.metrics, 12);
        // "transfer" is shared by two stories
        assert_eq!(stats.tags, 11);
        assert_eq!(stats.links, 12);

        let transfer = store.search_stories(&StoryFilter::new().tag("transfer")).unwrap();
        assert_eq!(transfer.len(), 2);
    }

    #[test]
    fn test_seed_skips_when_stories_exist() {
        let store = SqliteStore::open_in_memory().unwrap();
        seed(&store, false).unwrap();

        let again = seed(&store, false).unwrap();
        assert!(!again.seeded);
        assert_eq!(again.message, "Skipped seeding because stories already exist.");
        assert_eq!(store.story_count().unwrap(), 4);
    }

    #[test]
    fn test_force_reseeds() {
        let store = SqliteStore::open_in_memory().unwrap();
        seed(&store, false).unwrap();
        store
            .add_story(&NewStory::new("Extra", "s", "P", "O", "L"))
            .unwrap();
        store.add_tag("extra").unwrap();

        let forced = seed(&store, true).unwrap();
        assert!(forced.seeded);
        assert_eq!(store.story_count().unwrap(), sample_size() as u64);
        assert_eq!(store.metric_count().unwrap(), 12);
        assert_eq!(store.stats().unwrap().tags, 11);
    }

    #[test]
    fn test_seed_values_keep_scale() {
        let store = SqliteStore::open_in_memory().unwrap();
        seed(&store, false).unwrap();

        let values: Vec<_> = store
            .list_metrics(None)
            .unwrap()
            .iter()
            .map(|m| m.value.to_string())
            .collect();
        assert_eq!(values[0], "92.50");
        assert_eq!(values[1], "18.00");
    }
}
