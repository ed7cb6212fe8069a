//! Filter composer: turns the independently optional criteria picked in the
//! UI into a single `WHERE` clause plus bound values for the items table.
//! All predicates combine with AND.

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::genre::canonical_genre;
use crate::models::{Kind, Mood, Status};
use crate::period::{period_range, Period, PeriodError};
use crate::tags::Tag;
use crate::utils::DATE_FORMAT;

/// Rows returned by a single query; callers refine filters instead of paging
pub const DEFAULT_RESULT_LIMIT: usize = 500;

/// Which column an alphabetical prefix applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrefixField {
    Creator,
    Title,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixMatch {
    pub field: PrefixField,
    pub prefix: String,
}

/// Immutable description of what the item list should show
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFilter {
    /// Case-insensitive substring of title or creator
    pub search: Option<String>,
    pub status: Option<Status>,
    pub kind: Option<Kind>,
    pub genre: Option<String>,
    pub mood: Option<Mood>,
    pub source_tag: Option<String>,
    pub prefix: Option<PrefixMatch>,
    pub year: Option<i32>,
    /// Only used together with `completed_year`
    pub completed_month: Option<u32>,
    pub completed_year: Option<i32>,
}

impl ItemFilter {
    pub fn is_empty(&self) -> bool {
        *self == ItemFilter::default()
    }

    /// Completion window selected by the (month, year) pair, if any
    pub fn completion_period(&self) -> Result<Option<Period>, PeriodError> {
        match self.completed_year {
            Some(year) => period_range(year, self.completed_month).map(Some),
            None => Ok(None),
        }
    }
}

/// Composed query: a `WHERE` clause (empty when unfiltered) and its values
#[derive(Debug, Clone, PartialEq)]
pub struct ItemQuery {
    pub where_clause: String,
    pub values: Vec<Value>,
    pub limit: usize,
}

impl ItemQuery {
    /// Query matching every row
    pub fn all(limit: usize) -> Self {
        Self {
            where_clause: String::new(),
            values: Vec::new(),
            limit,
        }
    }
}

pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

struct Conditions {
    clauses: Vec<String>,
    values: Vec<Value>,
}

impl Conditions {
    fn bind(&mut self, value: Value) -> String {
        self.values.push(value);
        format!("?{}", self.values.len())
    }

    fn push(&mut self, clause: String) {
        self.clauses.push(clause);
    }
}

/// Build the query for `filter`, capped at `limit` rows
pub fn compose(filter: &ItemFilter, limit: usize) -> Result<ItemQuery, PeriodError> {
    let mut c = Conditions {
        clauses: Vec::new(),
        values: Vec::new(),
    };

    if let Some(q) = filter.search.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let idx = c.bind(Value::Text(format!("%{}%", escape_like(&q.to_lowercase()))));
        c.push(format!(
            "(fold(title) LIKE {idx} ESCAPE '\\' OR fold(author) LIKE {idx} ESCAPE '\\')"
        ));
    }

    if let Some(status) = filter.status {
        let idx = c.bind(Value::Text(status.as_str().to_string()));
        c.push(format!("status = {idx}"));
    }

    if let Some(kind) = filter.kind {
        let idx = c.bind(Value::Text(kind.as_str().to_string()));
        c.push(format!("type = {idx}"));
    }

    if let Some(genre) = filter.genre.as_deref().and_then(canonical_genre) {
        let idx = c.bind(Value::Text(genre));
        c.push(format!("genre = {idx}"));
    }

    if let Some(mood) = filter.mood {
        let idx = c.bind(Value::Text(mood.as_str().to_string()));
        c.push(format!("mood = {idx}"));
    }

    // Whole-tag membership; legacy synonyms parse to the same tag
    if let Some(tag) = filter.source_tag.as_deref().and_then(Tag::parse) {
        let idx = c.bind(Value::Text(tag.to_string()));
        c.push(format!("has_tag(source, {idx})"));
    }

    if let Some(prefix) = &filter.prefix {
        let wanted = prefix.prefix.trim();
        if !wanted.is_empty() {
            let column = match prefix.field {
                PrefixField::Creator => "author",
                PrefixField::Title => "title",
            };
            let idx = c.bind(Value::Text(format!("{}%", escape_like(&wanted.to_lowercase()))));
            c.push(format!("fold({column}) LIKE {idx} ESCAPE '\\'"));
        }
    }

    if let Some(year) = filter.year {
        let idx = c.bind(Value::Integer(i64::from(year)));
        c.push(format!("year = {idx}"));
    }

    if let Some(period) = filter.completion_period()? {
        let start = c.bind(Value::Text(period.start.format(DATE_FORMAT).to_string()));
        let end = c.bind(Value::Text(period.end.format(DATE_FORMAT).to_string()));
        c.push(format!("ended_on >= {start} AND ended_on < {end}"));
    }

    let where_clause = if c.clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", c.clauses.join(" AND "))
    };

    Ok(ItemQuery {
        where_clause,
        values: c.values,
        limit,
    })
}
