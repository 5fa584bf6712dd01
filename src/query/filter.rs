//! Composable story search filters
//!
//! Each present dimension narrows the result with AND. Absent dimensions
//! apply no filter. The whole filter compiles to one WHERE clause so search
//! never fetches and then filters in memory.

use rusqlite::types::ToSql;

/// Optional search dimensions for `search_stories`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryFilter {
    /// Exact, case-sensitive program match
    pub program: Option<String>,
    /// Exact, case-sensitive outcome match
    pub outcome: Option<String>,
    /// Exact, case-sensitive location match
    pub location: Option<String>,
    /// Stories linked to a tag with exactly this label
    pub tag: Option<String>,
    /// Case-insensitive substring of title or summary
    pub query: Option<String>,
}

impl StoryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a filter from raw command-line arguments.
    ///
    /// Blank arguments mean "not given".
    pub fn from_args(
        program: Option<String>,
        outcome: Option<String>,
        location: Option<String>,
        tag: Option<String>,
        query: Option<String>,
    ) -> Self {
        Self {
            program: non_blank(program),
            outcome: non_blank(outcome),
            location: non_blank(location),
            tag: non_blank(tag),
            query: non_blank(query),
        }
    }

    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }

    pub fn outcome(mut self, outcome: impl Into<String>) -> Self {
        self.outcome = Some(outcome.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// True when no dimension is set
    pub fn is_empty(&self) -> bool {
        self.program.is_none()
            && self.outcome.is_none()
            && self.location.is_none()
            && self.tag.is_none()
            && self.query.is_none()
    }

    /// Compile to a WHERE clause over `stories s` plus its positional parameters.
    ///
    /// Returns an empty clause when no dimension is set.
    pub fn to_sql(&self) -> (String, Vec<Box<dyn ToSql>>) {
        let mut conditions: Vec<String> = Vec::new();
        let mut param_values: Vec<Box<dyn ToSql>> = Vec::new();

        let exact = [
            ("s.program", &self.program),
            ("s.outcome", &self.outcome),
            ("s.location", &self.location),
        ];
        for (column, value) in exact {
            if let Some(value) = value {
                param_values.push(Box::new(value.clone()));
                conditions.push(format!("{} = ?{}", column, param_values.len()));
            }
        }

        if let Some(ref query) = self.query {
            param_values.push(Box::new(like_pattern(query)));
            let n = param_values.len();
            conditions.push(format!(
                "(s.title LIKE ?{n} ESCAPE '\\' OR s.summary LIKE ?{n} ESCAPE '\\')"
            ));
        }

        // EXISTS keeps one row per story however the links look
        if let Some(ref tag) = self.tag {
            param_values.push(Box::new(tag.clone()));
            conditions.push(format!(
                "EXISTS (SELECT 1 FROM story_tags st JOIN tags t ON t.id = st.tag_id \
                 WHERE st.story_id = s.id AND t.label = ?{})",
                param_values.len()
            ));
        }

        let clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        (clause, param_values)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// `%text%` with LIKE wildcards in `text` matched literally
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
