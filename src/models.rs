use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::genre::canonical_genre;
use crate::tags::{parse_tags, SourceTags};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {what} '{value}' (expected one of: {expected})")]
pub struct ParseEnumError {
    what: &'static str,
    value: String,
    expected: String,
}

impl ParseEnumError {
    fn new(what: &'static str, value: &str, expected: &[&str]) -> Self {
        Self {
            what,
            value: value.to_string(),
            expected: expected.join(", "),
        }
    }
}

/// Media kind of a catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Book,
    Audiobook,
    Film,
    Album,
    Video,
    Game,
}

impl Kind {
    pub const ALL: [Kind; 6] = [
        Kind::Book,
        Kind::Audiobook,
        Kind::Film,
        Kind::Album,
        Kind::Video,
        Kind::Game,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Book => "book",
            Kind::Audiobook => "audiobook",
            Kind::Film => "film",
            Kind::Album => "album",
            Kind::Video => "video",
            Kind::Game => "game",
        }
    }

    /// Genre is only kept for books and videos
    pub fn supports_genre(self) -> bool {
        matches!(self, Kind::Book | Kind::Video)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Kind::ALL
            .into_iter()
            .find(|k| k.as_str() == needle)
            .ok_or_else(|| {
                let names: Vec<&str> = Kind::ALL.iter().map(|k| k.as_str()).collect();
                ParseEnumError::new("kind", s, &names)
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Archived,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Archived => "archived",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Status::Active),
            "archived" => Ok(Status::Archived),
            _ => Err(ParseEnumError::new("status", s, &["active", "archived"])),
        }
    }
}

/// What kind of attention an item asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    Relax,
    Focus,
    Learning,
    Demanding,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Relax, Mood::Focus, Mood::Learning, Mood::Demanding];

    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Relax => "Relax",
            Mood::Focus => "Focus",
            Mood::Learning => "Learning",
            Mood::Demanding => "Demanding",
        }
    }

    /// At most one focused item may carry an exclusive mood
    pub fn is_exclusive(self) -> bool {
        matches!(self, Mood::Relax | Mood::Focus)
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Mood::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| {
                let names: Vec<&str> = Mood::ALL.iter().map(|m| m.as_str()).collect();
                ParseEnumError::new("mood", s, &names)
            })
    }
}

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Option<i64>,
    pub title: String,
    pub creator: String,
    pub kind: Kind,
    pub status: Status,
    pub genre: Option<String>,
    pub mood: Option<Mood>,
    pub year: Option<i32>,
    pub source_tags: SourceTags,
    pub video_url: Option<String>,
    pub note: Option<String>,
    pub is_focused: bool,
    pub completed_at: Option<NaiveDate>, // set iff archived
    pub created_at: NaiveDateTime,
}

impl Item {
    pub fn new(title: String, creator: String, kind: Kind, created_at: NaiveDateTime) -> Self {
        Self {
            id: None,
            title,
            creator,
            kind,
            status: Status::Active,
            genre: None,
            mood: None,
            year: None,
            source_tags: SourceTags::new(),
            video_url: None,
            note: None,
            is_focused: false,
            completed_at: None,
            created_at,
        }
    }

    pub fn is_archived(&self) -> bool {
        self.status == Status::Archived
    }

    pub fn is_queued(&self) -> bool {
        self.source_tags.is_queued()
    }

    pub fn is_wishlisted(&self) -> bool {
        self.source_tags.is_wishlisted()
    }

    /// Canonicalize the genre, or clear it for kinds that do not carry one
    pub fn normalize_genre(&mut self) {
        self.genre = if self.kind.supports_genre() {
            self.genre.as_deref().and_then(canonical_genre)
        } else {
            None
        };
    }

    pub fn check_required(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title is required".to_string());
        }
        if self.creator.trim().is_empty() {
            return Err("Creator is required".to_string());
        }
        Ok(())
    }
}

/// Input for the add action
#[derive(Debug, Clone)]
pub struct NewItem {
    pub title: String,
    pub creator: String,
    pub kind: Kind,
    pub genre: Option<String>,
    pub mood: Option<Mood>,
    pub year: Option<i32>,
    pub sources: Option<String>,
    pub video_url: Option<String>,
    pub note: Option<String>,
    /// Instant archive: store the item as already completed on this date
    pub archived_on: Option<NaiveDate>,
}

impl NewItem {
    pub fn new(title: impl Into<String>, creator: impl Into<String>, kind: Kind) -> Self {
        Self {
            title: title.into(),
            creator: creator.into(),
            kind,
            genre: None,
            mood: None,
            year: None,
            sources: None,
            video_url: None,
            note: None,
            archived_on: None,
        }
    }

    pub fn into_item(self, created_at: NaiveDateTime) -> Item {
        let mut item = Item::new(
            self.title.trim().to_string(),
            self.creator.trim().to_string(),
            self.kind,
            created_at,
        );
        item.genre = self.genre;
        item.mood = self.mood;
        item.year = self.year;
        item.source_tags = self.sources.as_deref().map(parse_tags).unwrap_or_default();
        item.video_url = self.video_url;
        item.note = self.note;
        if let Some(date) = self.archived_on {
            item.status = Status::Archived;
            item.completed_at = Some(date);
        }
        item.normalize_genre();
        item
    }
}

/// Field overwrites for the edit action. `None` leaves a field untouched;
/// for optional fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct ItemEdit {
    pub title: Option<String>,
    pub creator: Option<String>,
    pub kind: Option<Kind>,
    pub genre: Option<Option<String>>,
    pub mood: Option<Option<Mood>>,
    pub year: Option<Option<i32>>,
    pub sources: Option<String>,
    pub video_url: Option<Option<String>>,
    pub note: Option<Option<String>>,
}

impl ItemEdit {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.creator.is_none()
            && self.kind.is_none()
            && self.genre.is_none()
            && self.mood.is_none()
            && self.year.is_none()
            && self.sources.is_none()
            && self.video_url.is_none()
            && self.note.is_none()
    }

    pub fn apply(self, item: &Item) -> Item {
        let mut edited = item.clone();
        if let Some(title) = self.title {
            edited.title = title.trim().to_string();
        }
        if let Some(creator) = self.creator {
            edited.creator = creator.trim().to_string();
        }
        if let Some(kind) = self.kind {
            edited.kind = kind;
        }
        if let Some(genre) = self.genre {
            edited.genre = genre;
        }
        if let Some(mood) = self.mood {
            edited.mood = mood;
        }
        if let Some(year) = self.year {
            edited.year = year;
        }
        if let Some(sources) = self.sources {
            edited.source_tags = parse_tags(&sources);
        }
        if let Some(video_url) = self.video_url {
            edited.video_url = video_url;
        }
        if let Some(note) = self.note {
            edited.note = note;
        }
        edited.normalize_genre();
        edited
    }
}
