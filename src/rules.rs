//! Capacity-gated state transitions.
//!
//! Every function here is pure: it takes the item being changed plus a
//! snapshot of the whole collection and returns either the updated item or a
//! typed rejection. Persistence and cache refreshes belong to the caller.

use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;
use thiserror::Error;

use crate::models::{Item, Mood, Status};
use crate::tags::Tag;

/// Maximum number of items in focus at the same time
pub const MAX_FOCUSED: usize = 3;

/// Maximum number of items carrying the `Queue` tag
pub const MAX_QUEUED: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Focus,
    Queue,
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Focus => f.write_str("focus list"),
            Limit::Queue => f.write_str("queue"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("The {what} is full ({limit} items max)")]
    CapacityExceeded { what: Limit, limit: usize },
    #[error("Another item in focus already has mood {0}")]
    MoodConflict(Mood),
    #[error("Item is in focus, which supersedes the queue")]
    PrecededByFocus,
    #[error("Archived items cannot be put in focus")]
    ArchivedItem,
}

/// Outcome of a focus toggle
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub item: Item,
    /// The focused-items cache is stale and must be reloaded by the caller
    pub refresh_focus: bool,
}

/// Every item of the collection except `item` itself
fn others<'a>(item: &'a Item, collection: &'a [Item]) -> impl Iterator<Item = &'a Item> + 'a {
    collection
        .iter()
        .filter(move |other| item.id.is_none() || other.id != item.id)
}

/// Turn focus on or off.
///
/// Turning on checks capacity first, then the exclusive-mood rule, and
/// strips any `Queue` tag since focus supersedes queue membership.
/// Turning off always succeeds; asking the user is the caller's business.
pub fn toggle_focus(item: &Item, collection: &[Item]) -> Result<Transition, RuleError> {
    let mut updated = item.clone();

    if item.is_focused {
        updated.is_focused = false;
        return Ok(Transition {
            item: updated,
            refresh_focus: true,
        });
    }

    if item.is_archived() {
        return Err(RuleError::ArchivedItem);
    }

    let focused: Vec<&Item> = others(item, collection).filter(|i| i.is_focused).collect();
    if focused.len() >= MAX_FOCUSED {
        return Err(RuleError::CapacityExceeded {
            what: Limit::Focus,
            limit: MAX_FOCUSED,
        });
    }

    if let Some(mood) = item.mood.filter(|m| m.is_exclusive()) {
        if focused.iter().any(|i| i.mood == Some(mood)) {
            return Err(RuleError::MoodConflict(mood));
        }
    }

    updated.is_focused = true;
    updated.source_tags.remove(&Tag::Queue);
    Ok(Transition {
        item: updated,
        refresh_focus: true,
    })
}

/// Add the item to the queue, or take it out if it is already queued
pub fn toggle_queue(item: &Item, collection: &[Item]) -> Result<Item, RuleError> {
    if item.is_focused {
        return Err(RuleError::PrecededByFocus);
    }

    let mut updated = item.clone();
    if updated.source_tags.remove(&Tag::Queue) {
        return Ok(updated);
    }

    check_queue_entry(item, collection)?;
    updated.source_tags.insert(Tag::Queue);
    Ok(updated)
}

/// Checks for `item` gaining the `Queue` tag, by toggle or by writing the
/// sources text directly
pub fn check_queue_entry(item: &Item, collection: &[Item]) -> Result<(), RuleError> {
    if item.is_focused {
        return Err(RuleError::PrecededByFocus);
    }
    let queued = others(item, collection).filter(|i| i.is_queued()).count();
    if queued >= MAX_QUEUED {
        return Err(RuleError::CapacityExceeded {
            what: Limit::Queue,
            limit: MAX_QUEUED,
        });
    }
    Ok(())
}

/// Mark as completed on `date`. Always succeeds and never touches tags.
pub fn archive(item: &Item, date: NaiveDate) -> Item {
    let mut updated = item.clone();
    updated.status = Status::Archived;
    updated.completed_at = Some(date);
    updated.is_focused = false;
    updated
}

pub fn unarchive(item: &Item) -> Item {
    let mut updated = item.clone();
    updated.status = Status::Active;
    updated.completed_at = None;
    updated
}

/// Drop the wishlist flag once the item has been bought
pub fn mark_purchased(item: &Item) -> Item {
    let mut updated = item.clone();
    updated.source_tags.remove(&Tag::Wishlist);
    updated
}

/// Start the item over as a new, active, focused entry.
///
/// No capacity or mood check happens here; see [`focus_violations`].
pub fn re_experience(item: &Item, now: NaiveDateTime) -> Item {
    let mut fresh = item.clone();
    fresh.id = None;
    fresh.status = Status::Active;
    fresh.is_focused = true;
    fresh.completed_at = None;
    fresh.created_at = now;
    fresh
}

/// Focus rules the collection currently breaks, if any
pub fn focus_violations(collection: &[Item]) -> Vec<RuleError> {
    let focused: Vec<&Item> = collection.iter().filter(|i| i.is_focused).collect();
    let mut violations = Vec::new();

    if focused.len() > MAX_FOCUSED {
        violations.push(RuleError::CapacityExceeded {
            what: Limit::Focus,
            limit: MAX_FOCUSED,
        });
    }

    for mood in [Mood::Relax, Mood::Focus] {
        if focused.iter().filter(|i| i.mood == Some(mood)).count() > 1 {
            violations.push(RuleError::MoodConflict(mood));
        }
    }

    violations
}
