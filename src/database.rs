use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Type, ValueRef};
use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, OptionalExtension};
use std::path::PathBuf;
use thiserror::Error;

use crate::filter::ItemQuery;
use crate::models::{Item, Kind, Mood, Status};
use crate::period::Period;
use crate::tags::{parse_tags, serialize_tags, Tag};
use crate::utils::{DATE_FORMAT, TIMESTAMP_FORMAT};

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("Failed to create database directory: {0}")]
    DirectoryError(String),
    #[error("Item has not been stored yet")]
    MissingId,
    #[error("No item with id {0}")]
    NotFound(i64),
}

const ITEM_COLUMNS: &str = "id, title, author, type, status, genre, mood, year, source, video_url, note, is_next, ended_on, created_at";

impl ToSql for Kind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Kind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for Status {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Status {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for Mood {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Mood {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

fn parse_column<T>(
    idx: usize,
    raw: &str,
    parse: impl FnOnce(&str) -> Result<T, chrono::ParseError>,
) -> Result<T, rusqlite::Error> {
    parse(raw).map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn source_to_sql(item: &Item) -> Option<String> {
    if item.source_tags.is_empty() {
        None
    } else {
        Some(serialize_tags(&item.source_tags))
    }
}

fn date_to_sql(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(DATE_FORMAT).to_string())
}

fn timestamp_to_sql(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// SQLite-backed item store. Column names follow the external record
/// layout: `author` holds the creator, `type` the kind, `source` the
/// delimited tag text, `is_next` the focus flag and `ended_on` the
/// completion date.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Create a new database connection and initialize the schema
    pub fn new(path: &str) -> Result<Self, DatabaseError> {
        let db_path = PathBuf::from(path);

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DatabaseError::DirectoryError(e.to_string()))?;
            }
        }

        let conn = Connection::open(&db_path)?;
        tracing::debug!(path = %db_path.display(), "opened database");

        let db = Database { conn };
        db.register_functions()?;
        db.initialize_schema()?;

        Ok(db)
    }

    /// Private in-memory database, used by tests
    pub fn in_memory() -> Result<Self, DatabaseError> {
        let db = Database {
            conn: Connection::open_in_memory()?,
        };
        db.register_functions()?;
        db.initialize_schema()?;
        Ok(db)
    }

    /// SQL functions the item filters rely on:
    /// `fold(text)` lower-cases with full Unicode rules, and
    /// `has_tag(source, tag)` tests membership in the parsed tag set.
    fn register_functions(&self) -> Result<(), DatabaseError> {
        let flags = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;

        self.conn.create_scalar_function("fold", 1, flags, |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        })?;

        self.conn.create_scalar_function("has_tag", 2, flags, |ctx| {
            let source: Option<String> = ctx.get(0)?;
            let wanted: Option<String> = ctx.get(1)?;
            let found = match (source, wanted.as_deref().and_then(Tag::parse)) {
                (Some(source), Some(tag)) => parse_tags(&source).contains(&tag),
                _ => false,
            };
            Ok(found)
        })?;

        Ok(())
    }

    fn initialize_schema(&self) -> Result<(), DatabaseError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS items (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                title           TEXT NOT NULL,
                author          TEXT NOT NULL,
                type            TEXT NOT NULL,
                status          TEXT NOT NULL DEFAULT 'active',
                genre           TEXT,
                mood            TEXT,
                year            INTEGER,
                source          TEXT,
                video_url       TEXT,
                note            TEXT,
                is_next         INTEGER NOT NULL DEFAULT 0,
                ended_on        TEXT,
                created_at      TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_items_created_at ON items(created_at);
            CREATE INDEX IF NOT EXISTS idx_items_ended_on ON items(ended_on);
            CREATE INDEX IF NOT EXISTS idx_items_type_status ON items(type, status);
            CREATE INDEX IF NOT EXISTS idx_items_is_next ON items(is_next);",
        )?;
        Ok(())
    }

    /// Get a reference to the underlying connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    fn row_to_item(row: &rusqlite::Row) -> Result<Item, rusqlite::Error> {
        let source: Option<String> = row.get(8)?;
        let ended_on: Option<String> = row.get(12)?;
        let created_at: String = row.get(13)?;

        Ok(Item {
            id: Some(row.get(0)?),
            title: row.get(1)?,
            creator: row.get(2)?,
            kind: row.get(3)?,
            status: row.get(4)?,
            genre: row.get(5)?,
            mood: row.get(6)?,
            year: row.get(7)?,
            source_tags: source.as_deref().map(parse_tags).unwrap_or_default(),
            video_url: row.get(9)?,
            note: row.get(10)?,
            is_focused: row.get::<_, i64>(11)? != 0,
            completed_at: ended_on
                .map(|s| parse_column(12, &s, |s| NaiveDate::parse_from_str(s, DATE_FORMAT)))
                .transpose()?,
            created_at: parse_column(13, &created_at, |s| {
                NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
            })?,
        })
    }

    /// Insert an item and return its new ID
    pub fn insert_item(&self, item: &Item) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO items (title, author, type, status, genre, mood, year, source, video_url, note, is_next, ended_on, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            rusqlite::params![
                item.title,
                item.creator,
                item.kind,
                item.status,
                item.genre,
                item.mood,
                item.year,
                source_to_sql(item),
                item.video_url,
                item.note,
                if item.is_focused { 1 } else { 0 },
                date_to_sql(item.completed_at),
                timestamp_to_sql(item.created_at),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get a single item by ID
    pub fn get_item(&self, id: i64) -> Result<Item, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1"))?;
        stmt.query_row(rusqlite::params![id], Self::row_to_item)
            .optional()?
            .ok_or(DatabaseError::NotFound(id))
    }

    /// Overwrite every mutable column of a stored item
    pub fn update_item(&self, item: &Item) -> Result<(), DatabaseError> {
        let id = item.id.ok_or(DatabaseError::MissingId)?;

        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "UPDATE items SET title = ?1, author = ?2, type = ?3, status = ?4, genre = ?5, mood = ?6,
             year = ?7, source = ?8, video_url = ?9, note = ?10, is_next = ?11, ended_on = ?12
             WHERE id = ?13",
            rusqlite::params![
                item.title,
                item.creator,
                item.kind,
                item.status,
                item.genre,
                item.mood,
                item.year,
                source_to_sql(item),
                item.video_url,
                item.note,
                if item.is_focused { 1 } else { 0 },
                date_to_sql(item.completed_at),
                id
            ],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound(id));
        }
        tx.commit()?;
        Ok(())
    }

    /// Delete an item by ID
    pub fn delete_item(&self, id: i64) -> Result<(), DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute("DELETE FROM items WHERE id = ?1", rusqlite::params![id])?;
        if changed == 0 {
            return Err(DatabaseError::NotFound(id));
        }
        tx.commit()?;
        Ok(())
    }

    /// Every stored item, newest first
    pub fn all_items(&self) -> Result<Vec<Item>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ITEM_COLUMNS} FROM items ORDER BY created_at DESC, id DESC"
        ))?;
        let items = stmt
            .query_map([], Self::row_to_item)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Items currently in focus, newest first
    pub fn focused_items(&self) -> Result<Vec<Item>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE is_next = 1 ORDER BY created_at DESC, id DESC"
        ))?;
        let items = stmt
            .query_map([], Self::row_to_item)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Run a composed filter query, newest first, capped at the query limit
    pub fn select_items(&self, query: &ItemQuery) -> Result<Vec<Item>, DatabaseError> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM items{} ORDER BY created_at DESC, id DESC LIMIT {}",
            query.where_clause, query.limit
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let items = stmt
            .query_map(rusqlite::params_from_iter(query.values.iter()), Self::row_to_item)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Number of rows matching a composed filter, ignoring its limit
    pub fn count_items(&self, query: &ItemQuery) -> Result<u64, DatabaseError> {
        let sql = format!("SELECT COUNT(*) FROM items{}", query.where_clause);
        let count: i64 = self.conn.query_row(
            &sql,
            rusqlite::params_from_iter(query.values.iter()),
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }

    /// Pick one random active, unfocused item of `kind`, optionally narrowed
    /// by genre and mood
    pub fn random_pick(
        &self,
        kind: Kind,
        genre: Option<&str>,
        mood: Option<Mood>,
    ) -> Result<Option<Item>, DatabaseError> {
        let mut sql = format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE type = ?1 AND status = 'active' AND is_next = 0"
        );
        let mut values: Vec<Box<dyn ToSql>> = vec![Box::new(kind)];

        if let Some(genre) = genre {
            values.push(Box::new(genre.to_string()));
            sql.push_str(&format!(" AND genre = ?{}", values.len()));
        }
        if let Some(mood) = mood {
            values.push(Box::new(mood));
            sql.push_str(&format!(" AND mood = ?{}", values.len()));
        }
        sql.push_str(" ORDER BY RANDOM() LIMIT 1");

        let refs: Vec<&dyn ToSql> = values.iter().map(|b| b.as_ref()).collect();
        let item = self
            .conn
            .query_row(&sql, refs.as_slice(), Self::row_to_item)
            .optional()?;
        Ok(item)
    }

    /// Count items completed within `period`, grouped by kind
    pub fn completed_counts_by_kind(&self, period: &Period) -> Result<Vec<(Kind, u64)>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT type, COUNT(*) FROM items
             WHERE ended_on >= ?1 AND ended_on < ?2
             GROUP BY type",
        )?;
        let counts = stmt
            .query_map(
                rusqlite::params![
                    period.start.format(DATE_FORMAT).to_string(),
                    period.end.format(DATE_FORMAT).to_string()
                ],
                |row| Ok((row.get::<_, Kind>(0)?, row.get::<_, i64>(1)?.max(0) as u64)),
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{compose, ItemFilter, DEFAULT_RESULT_LIMIT};
    use crate::models::NewItem;
    use crate::period::period_range;
    use crate::tags::Tag;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn stored(db: &Database, new: NewItem, day: u32) -> Item {
        let mut item = new.into_item(at(day));
        item.id = Some(db.insert_item(&item).unwrap());
        item
    }

    fn run(db: &Database, filter: ItemFilter) -> Vec<Item> {
        db.select_items(&compose(&filter, DEFAULT_RESULT_LIMIT).unwrap())
            .unwrap()
    }

    #[test]
    fn insert_and_get_round_trip() {
        let db = Database::in_memory().unwrap();
        let mut new = NewItem::new("Dune", "Frank Herbert", Kind::Book);
        new.genre = Some("Sci-Fi".to_string());
        new.mood = Some(Mood::Relax);
        new.year = Some(1965);
        new.sources = Some("coda, Amazon".to_string());
        new.note = Some("paperback".to_string());
        let item = stored(&db, new, 3);

        let loaded = db.get_item(item.id.unwrap()).unwrap();
        assert_eq!(loaded, item);
        assert_eq!(loaded.genre.as_deref(), Some("fantascienza"));
    }

    #[test]
    fn stored_source_uses_canonical_text() {
        let db = Database::in_memory().unwrap();
        let mut new = NewItem::new("Dune", "Herbert", Kind::Book);
        new.sources = Some("da comprare; in coda".to_string());
        let item = stored(&db, new, 1);

        let raw: String = db
            .conn()
            .query_row("SELECT source FROM items WHERE id = ?1", [item.id], |r| r.get(0))
            .unwrap();
        assert_eq!(raw, "Wishlist, Queue");
    }

    #[test]
    fn empty_tags_stored_as_null() {
        let db = Database::in_memory().unwrap();
        let item = stored(&db, NewItem::new("Dune", "Herbert", Kind::Book), 1);
        let raw: Option<String> = db
            .conn()
            .query_row("SELECT source FROM items WHERE id = ?1", [item.id], |r| r.get(0))
            .unwrap();
        assert_eq!(raw, None);
    }

    #[test]
    fn missing_rows_are_not_found() {
        let db = Database::in_memory().unwrap();
        assert!(matches!(db.get_item(42), Err(DatabaseError::NotFound(42))));
        assert!(matches!(db.delete_item(42), Err(DatabaseError::NotFound(42))));

        let mut ghost = NewItem::new("Ghost", "Nobody", Kind::Film).into_item(at(1));
        assert!(matches!(db.update_item(&ghost), Err(DatabaseError::MissingId)));
        ghost.id = Some(42);
        assert!(matches!(db.update_item(&ghost), Err(DatabaseError::NotFound(42))));
    }

    #[test]
    fn update_and_delete() {
        let db = Database::in_memory().unwrap();
        let mut item = stored(&db, NewItem::new("Dune", "Herbert", Kind::Book), 1);
        item.is_focused = true;
        item.source_tags.insert(Tag::Wishlist);
        db.update_item(&item).unwrap();
        assert_eq!(db.get_item(item.id.unwrap()).unwrap(), item);
        assert_eq!(db.focused_items().unwrap(), vec![item.clone()]);

        db.delete_item(item.id.unwrap()).unwrap();
        assert!(db.all_items().unwrap().is_empty());
    }

    #[test]
    fn select_orders_newest_first_and_caps() {
        let db = Database::in_memory().unwrap();
        for day in 1..=5 {
            stored(&db, NewItem::new(format!("Film {day}"), "Someone", Kind::Film), day);
        }
        let titles: Vec<String> = run(&db, ItemFilter::default())
            .into_iter()
            .map(|i| i.title)
            .collect();
        assert_eq!(titles, vec!["Film 5", "Film 4", "Film 3", "Film 2", "Film 1"]);

        let capped = db
            .select_items(&compose(&ItemFilter::default(), 2).unwrap())
            .unwrap();
        assert_eq!(capped.len(), 2);
        assert_eq!(db.count_items(&compose(&ItemFilter::default(), 2).unwrap()).unwrap(), 5);
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_creator() {
        let db = Database::in_memory().unwrap();
        stored(&db, NewItem::new("Dune", "Frank Herbert", Kind::Book), 1);
        stored(&db, NewItem::new("Solaris", "Stanislaw Lem", Kind::Book), 2);
        stored(&db, NewItem::new("Stalker", "Tarkovsky", Kind::Film), 3);

        let filter = ItemFilter {
            search: Some("HERB".to_string()),
            ..Default::default()
        };
        let hits = run(&db, filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Dune");

        let filter = ItemFilter {
            search: Some("s".to_string()),
            kind: Some(Kind::Book),
            ..Default::default()
        };
        assert_eq!(run(&db, filter).len(), 1);
    }

    #[test]
    fn wishlist_filter_finds_legacy_rows() {
        let db = Database::in_memory().unwrap();
        db.conn()
            .execute(
                "INSERT INTO items (title, author, type, status, source, created_at)
                 VALUES ('Old', 'Someone', 'book', 'active', 'Da Comprare', '2020-01-01 00:00:00')",
                [],
            )
            .unwrap();
        let mut new = NewItem::new("New", "Someone", Kind::Book);
        new.sources = Some("wishlist".to_string());
        stored(&db, new, 1);
        stored(&db, NewItem::new("Owned", "Someone", Kind::Book), 2);

        let filter = ItemFilter {
            source_tag: Some("Wishlist".to_string()),
            ..Default::default()
        };
        let hits = run(&db, filter);
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|i| i.is_wishlisted()));
    }

    #[test]
    fn queue_filter_finds_legacy_spellings() {
        let db = Database::in_memory().unwrap();
        db.conn()
            .execute(
                "INSERT INTO items (title, author, type, status, source, created_at)
                 VALUES ('Old', 'Someone', 'book', 'active', 'In Coda / Feltrinelli', '2020-01-01 00:00:00')",
                [],
            )
            .unwrap();
        let mut new = NewItem::new("New", "Someone", Kind::Book);
        new.sources = Some("queue".to_string());
        stored(&db, new, 1);

        let filter = ItemFilter {
            source_tag: Some("queue".to_string()),
            ..Default::default()
        };
        assert_eq!(run(&db, filter).len(), 2);
    }

    #[test]
    fn source_filter_matches_whole_tags_only() {
        let db = Database::in_memory().unwrap();
        let mut new = NewItem::new("Gomorra", "Saviano", Kind::Book);
        new.sources = Some("Libraccio".to_string());
        stored(&db, new, 1);
        let mut shop = NewItem::new("Shop", "Someone", Kind::Book);
        shop.sources = Some("wishlist shop".to_string());
        stored(&db, shop, 2);

        let partial = ItemFilter {
            source_tag: Some("braccio".to_string()),
            ..Default::default()
        };
        assert!(run(&db, partial).is_empty());

        let wishlist = ItemFilter {
            source_tag: Some("wishlist".to_string()),
            ..Default::default()
        };
        assert!(run(&db, wishlist).is_empty());

        let whole = ItemFilter {
            source_tag: Some("LIBRACCIO".to_string()),
            ..Default::default()
        };
        assert_eq!(run(&db, whole)[0].title, "Gomorra");
    }

    #[test]
    fn search_folds_accented_capitals() {
        let db = Database::in_memory().unwrap();
        stored(&db, NewItem::new("È stato così", "Natalia Ginzburg", Kind::Book), 1);
        stored(&db, NewItem::new("Germinal", "Émile Zola", Kind::Book), 2);

        for (query, title) in [("è stato", "È stato così"), ("ÉMILE", "Germinal"), ("COSÌ", "È stato così")] {
            let filter = ItemFilter {
                search: Some(query.to_string()),
                ..Default::default()
            };
            let hits = run(&db, filter);
            assert_eq!(hits.len(), 1, "{query}");
            assert_eq!(hits[0].title, title);
        }
    }

    #[test]
    fn title_prefix_folds_case() {
        let db = Database::in_memory().unwrap();
        stored(&db, NewItem::new("Èlia", "Someone", Kind::Book), 1);
        let filter = ItemFilter {
            prefix: Some(crate::filter::PrefixMatch {
                field: crate::filter::PrefixField::Title,
                prefix: "è".to_string(),
            }),
            ..Default::default()
        };
        assert_eq!(run(&db, filter).len(), 1);
    }

    #[test]
    fn completion_window_filter() {
        let db = Database::in_memory().unwrap();
        for (title, date) in [("Nov", (2023, 11, 30)), ("Dec", (2023, 12, 31)), ("Jan", (2024, 1, 1))] {
            let mut new = NewItem::new(title, "Someone", Kind::Game);
            new.archived_on = NaiveDate::from_ymd_opt(date.0, date.1, date.2);
            stored(&db, new, 1);
        }
        let filter = ItemFilter {
            completed_month: Some(12),
            completed_year: Some(2023),
            ..Default::default()
        };
        let hits = run(&db, filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Dec");
    }

    #[test]
    fn random_pick_respects_criteria() {
        let db = Database::in_memory().unwrap();
        assert_eq!(db.random_pick(Kind::Book, None, None).unwrap(), None);

        let mut relax = NewItem::new("Easy", "Someone", Kind::Book);
        relax.mood = Some(Mood::Relax);
        relax.genre = Some("giallo".to_string());
        let relax = stored(&db, relax, 1);

        let mut hard = NewItem::new("Hard", "Someone", Kind::Book);
        hard.mood = Some(Mood::Demanding);
        let mut hard = stored(&db, hard, 2);
        hard.is_focused = true;
        db.update_item(&hard).unwrap();

        let mut done = NewItem::new("Done", "Someone", Kind::Book);
        done.mood = Some(Mood::Relax);
        done.archived_on = NaiveDate::from_ymd_opt(2024, 1, 1);
        stored(&db, done, 3);

        let pick = db.random_pick(Kind::Book, None, Some(Mood::Relax)).unwrap();
        assert_eq!(pick, Some(relax.clone()));
        let pick = db.random_pick(Kind::Book, Some("giallo"), None).unwrap();
        assert_eq!(pick, Some(relax));
        assert_eq!(db.random_pick(Kind::Book, None, Some(Mood::Demanding)).unwrap(), None);
        assert_eq!(db.random_pick(Kind::Film, None, None).unwrap(), None);
    }

    #[test]
    fn completed_counts_group_by_kind() {
        let db = Database::in_memory().unwrap();
        let in_range = NaiveDate::from_ymd_opt(2024, 3, 10);
        let out_of_range = NaiveDate::from_ymd_opt(2024, 4, 1);
        for (kind, date) in [
            (Kind::Book, in_range),
            (Kind::Book, in_range),
            (Kind::Film, in_range),
            (Kind::Film, out_of_range),
            (Kind::Game, None),
        ] {
            let mut new = NewItem::new("x", "y", kind);
            new.archived_on = date;
            stored(&db, new, 1);
        }
        let mut counts = db
            .completed_counts_by_kind(&period_range(2024, Some(3)).unwrap())
            .unwrap();
        counts.sort();
        assert_eq!(counts, vec![(Kind::Book, 2), (Kind::Film, 1)]);
    }

    #[test]
    fn file_database_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("biblioteca.db");
        let db = Database::new(path.to_str().unwrap()).unwrap();
        stored(&db, NewItem::new("Dune", "Herbert", Kind::Book), 1);
        drop(db);

        let reopened = Database::new(path.to_str().unwrap()).unwrap();
        assert_eq!(reopened.all_items().unwrap().len(), 1);
    }
}
