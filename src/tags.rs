use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Characters accepted as separators in the free-text sources field
pub const TAG_SEPARATORS: &[char] = &[',', ';', '/', '|', '+'];

/// Lower-cased spellings that all mean "not bought yet"
const WISHLIST_SYNONYMS: &[&str] = &["wishlist", "da comprare"];

/// Lower-cased spellings that all mean "planned next"
const QUEUE_SYNONYMS: &[&str] = &["queue", "coda", "in coda"];

/// A single source label. `Wishlist` and `Queue` are reserved state flags,
/// everything else is a store or provenance name kept in lower case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    Wishlist,
    Queue,
    Store(String),
}

impl Tag {
    /// Normalize one raw fragment. Returns `None` for blank fragments.
    pub fn parse(raw: &str) -> Option<Tag> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return None;
        }
        if WISHLIST_SYNONYMS.contains(&normalized.as_str()) {
            Some(Tag::Wishlist)
        } else if QUEUE_SYNONYMS.contains(&normalized.as_str()) {
            Some(Tag::Queue)
        } else {
            Some(Tag::Store(normalized))
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Wishlist => f.write_str("Wishlist"),
            Tag::Queue => f.write_str("Queue"),
            Tag::Store(name) => f.write_str(name),
        }
    }
}

/// Normalized, duplicate-free set of source tags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTags(BTreeSet<Tag>);

impl SourceTags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, tag: &Tag) -> bool {
        self.0.contains(tag)
    }

    /// Returns true if the tag was not present before
    pub fn insert(&mut self, tag: Tag) -> bool {
        self.0.insert(tag)
    }

    /// Returns true if the tag was present
    pub fn remove(&mut self, tag: &Tag) -> bool {
        self.0.remove(tag)
    }

    pub fn is_queued(&self) -> bool {
        self.contains(&Tag::Queue)
    }

    pub fn is_wishlisted(&self) -> bool {
        self.contains(&Tag::Wishlist)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }
}

impl FromIterator<Tag> for SourceTags {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        SourceTags(iter.into_iter().collect())
    }
}

impl fmt::Display for SourceTags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serialize_tags(self))
    }
}

impl Serialize for SourceTags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&serialize_tags(self))
    }
}

impl<'de> Deserialize<'de> for SourceTags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(parse_tags(&raw))
    }
}

/// Parse the free-text sources field into a tag set.
///
/// Fragments are split on any of `,;/|+`, trimmed and lower-cased; known
/// synonyms collapse onto `Wishlist` and `Queue`; blanks are dropped.
pub fn parse_tags(raw: &str) -> SourceTags {
    raw.split(TAG_SEPARATORS).filter_map(Tag::parse).collect()
}

/// Join a tag set back into the stored free-text form, `", "` separated
pub fn serialize_tags(tags: &SourceTags) -> String {
    tags.iter()
        .map(|tag| tag.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
