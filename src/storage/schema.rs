//! Database schema definitions

/// Connection settings applied before the schema is created
pub const PRAGMAS: &str = "PRAGMA foreign_keys = ON;";

/// SQL to create the stories table
pub const CREATE_STORIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS stories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL CHECK (length(title) <= 200),
    summary TEXT NOT NULL,
    program TEXT NOT NULL CHECK (length(program) <= 120),
    outcome TEXT NOT NULL CHECK (length(outcome) <= 120),
    location TEXT NOT NULL CHECK (length(location) <= 120),
    created_at TEXT NOT NULL
)
"#;

/// SQL to create the metrics table
/// `value` holds canonical decimal text (`92.50`), never a float
pub const CREATE_METRICS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS metrics (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    story_id INTEGER NOT NULL REFERENCES stories(id) ON DELETE CASCADE,
    name TEXT NOT NULL CHECK (length(name) <= 140),
    value TEXT NOT NULL,
    unit TEXT NOT NULL CHECK (length(unit) <= 40)
)
"#;

/// SQL to create the tags table
pub const CREATE_TAGS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS tags (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    label TEXT NOT NULL UNIQUE CHECK (length(label) <= 80)
)
"#;

/// SQL to create the story_tags association table
pub const CREATE_STORY_TAGS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS story_tags (
    story_id INTEGER NOT NULL REFERENCES stories(id) ON DELETE CASCADE,
    tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
    PRIMARY KEY (story_id, tag_id)
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_stories_created_at ON stories(created_at)",
    "CREATE INDEX IF NOT EXISTS idx_stories_program ON stories(program)",
    "CREATE INDEX IF NOT EXISTS idx_stories_outcome ON stories(outcome)",
    "CREATE INDEX IF NOT EXISTS idx_metrics_story ON metrics(story_id)",
    "CREATE INDEX IF NOT EXISTS idx_story_tags_tag ON story_tags(tag_id)",
];

/// All schema creation statements, parents before children
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![
        CREATE_STORIES_TABLE,
        CREATE_METRICS_TABLE,
        CREATE_TAGS_TABLE,
        CREATE_STORY_TAGS_TABLE,
    ];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
