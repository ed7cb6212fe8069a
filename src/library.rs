//! Orchestration over the rule modules and the store.
//!
//! `Library` owns the database handle plus a client-side snapshot of the
//! whole collection. Rule checks run against that snapshot; on a successful
//! write the snapshot is patched in place, on failure it is left untouched so
//! it never drifts from what the store holds.

use chrono::NaiveDate;
use thiserror::Error;

use crate::database::{Database, DatabaseError};
use crate::filter::{compose, ItemFilter};
use crate::genre::{canonical_genre, is_known_genre};
use crate::models::{Item, ItemEdit, Kind, Mood, NewItem};
use crate::period::{period_range, PeriodError, PeriodStats};
use crate::rules::{self, RuleError};
use crate::utils::now_timestamp;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error(transparent)]
    Rule(#[from] RuleError),
    #[error(transparent)]
    Period(#[from] PeriodError),
    #[error("Persistence error: {0}")]
    Persistence(#[from] DatabaseError),
    #[error("No item with id {0}")]
    NotFound(i64),
    #[error("Removing an item from focus needs confirmation")]
    ConfirmationRequired,
}

pub struct Library {
    database: Database,
    items: Vec<Item>,
    focus: Vec<Item>,
    result_limit: usize,
}

impl Library {
    /// Load the collection snapshot and focus list from the store
    pub fn open(database: Database, result_limit: usize) -> Result<Self, LibraryError> {
        let items = database.all_items()?;
        let focus = database.focused_items()?;
        tracing::debug!(items = items.len(), focused = focus.len(), "library loaded");
        Ok(Self {
            database,
            items,
            focus,
            result_limit,
        })
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Full collection snapshot, newest first
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Cached focus list
    pub fn focus(&self) -> &[Item] {
        &self.focus
    }

    pub fn queue(&self) -> Vec<&Item> {
        self.items.iter().filter(|i| i.is_queued()).collect()
    }

    pub fn get(&self, id: i64) -> Result<&Item, LibraryError> {
        self.items
            .iter()
            .find(|i| i.id == Some(id))
            .ok_or(LibraryError::NotFound(id))
    }

    /// Re-read the snapshot and the focus list from the store
    pub fn reload(&mut self) -> Result<(), LibraryError> {
        self.items = self.database.all_items()?;
        self.refresh_focus()
    }

    fn refresh_focus(&mut self) -> Result<(), LibraryError> {
        self.focus = self.database.focused_items()?;
        Ok(())
    }

    /// Run a filter against the store, capped at the configured row limit
    pub fn search(&self, filter: &ItemFilter) -> Result<Vec<Item>, LibraryError> {
        let query = compose(filter, self.result_limit)?;
        let items = self.database.select_items(&query).map_err(|e| {
            tracing::warn!(error = %e, "item query failed");
            e
        })?;
        tracing::debug!(rows = items.len(), limit = self.result_limit, "item query");
        Ok(items)
    }

    /// Total rows matching a filter, beyond the row cap
    pub fn count(&self, filter: &ItemFilter) -> Result<u64, LibraryError> {
        let query = compose(filter, self.result_limit)?;
        Ok(self.database.count_items(&query)?)
    }

    pub fn add(&mut self, new: NewItem) -> Result<Item, LibraryError> {
        let mut item = new.into_item(now_timestamp());
        item.check_required().map_err(LibraryError::Validation)?;
        if item.is_queued() {
            self.check_queue_entry(&item)?;
        }
        note_unknown_genre(&item);

        let id = self.database.insert_item(&item).map_err(|e| {
            tracing::warn!(error = %e, title = %item.title, "insert failed");
            e
        })?;
        item.id = Some(id);
        self.items.insert(0, item.clone());
        tracing::debug!(id, title = %item.title, status = %item.status, "item added");
        Ok(item)
    }

    pub fn edit(&mut self, id: i64, edit: ItemEdit) -> Result<Item, LibraryError> {
        if edit.is_empty() {
            return Err(LibraryError::Validation("Nothing to change".to_string()));
        }
        let current = self.get(id)?;
        let edited = edit.apply(current);
        edited.check_required().map_err(LibraryError::Validation)?;
        if edited.is_queued() && !current.is_queued() {
            self.check_queue_entry(&edited)?;
        }
        note_unknown_genre(&edited);
        self.commit(edited)
    }

    fn check_queue_entry(&self, item: &Item) -> Result<(), LibraryError> {
        rules::check_queue_entry(item, &self.items).map_err(|e| {
            tracing::info!(id = ?item.id, reason = %e, "queue tag rejected");
            LibraryError::Rule(e)
        })
    }

    pub fn delete(&mut self, id: i64) -> Result<(), LibraryError> {
        let was_focused = self.get(id)?.is_focused;
        self.database.delete_item(id).map_err(|e| {
            tracing::warn!(id, error = %e, "delete failed");
            e
        })?;
        self.items.retain(|i| i.id != Some(id));
        if was_focused {
            self.refresh_focus()?;
        }
        tracing::debug!(id, "item deleted");
        Ok(())
    }

    /// Toggle focus. Turning focus off requires `confirmed`.
    pub fn toggle_focus(&mut self, id: i64, confirmed: bool) -> Result<Item, LibraryError> {
        let item = self.get(id)?;
        if item.is_focused && !confirmed {
            return Err(LibraryError::ConfirmationRequired);
        }

        let transition = rules::toggle_focus(item, &self.items).map_err(|e| {
            tracing::info!(id, reason = %e, "focus change rejected");
            e
        })?;
        let updated = self.commit(transition.item)?;
        if transition.refresh_focus {
            self.refresh_focus()?;
        }
        Ok(updated)
    }

    pub fn toggle_queue(&mut self, id: i64) -> Result<Item, LibraryError> {
        let updated = rules::toggle_queue(self.get(id)?, &self.items).map_err(|e| {
            tracing::info!(id, reason = %e, "queue change rejected");
            e
        })?;
        self.commit(updated)
    }

    pub fn archive(&mut self, id: i64, date: NaiveDate) -> Result<Item, LibraryError> {
        let item = self.get(id)?;
        let was_focused = item.is_focused;
        let updated = self.commit(rules::archive(item, date))?;
        if was_focused {
            self.refresh_focus()?;
        }
        Ok(updated)
    }

    pub fn unarchive(&mut self, id: i64) -> Result<Item, LibraryError> {
        let updated = rules::unarchive(self.get(id)?);
        self.commit(updated)
    }

    pub fn mark_purchased(&mut self, id: i64) -> Result<Item, LibraryError> {
        let updated = rules::mark_purchased(self.get(id)?);
        self.commit(updated)
    }

    /// Start an item over as a new focused entry. The focus limits are not
    /// enforced here; breaches are logged so they can be looked at.
    pub fn re_experience(&mut self, id: i64) -> Result<Item, LibraryError> {
        let mut fresh = rules::re_experience(self.get(id)?, now_timestamp());
        let new_id = self.database.insert_item(&fresh)?;
        fresh.id = Some(new_id);
        self.items.insert(0, fresh.clone());
        self.refresh_focus()?;

        for violation in rules::focus_violations(&self.items) {
            tracing::warn!(source_id = id, new_id, %violation, "re-experience breaks a focus rule");
        }
        Ok(fresh)
    }

    /// Random suggestion among active, unfocused items
    pub fn roll(
        &self,
        kind: Kind,
        genre: Option<&str>,
        mood: Option<Mood>,
    ) -> Result<Option<Item>, LibraryError> {
        let genre = genre.and_then(canonical_genre);
        Ok(self.database.random_pick(kind, genre.as_deref(), mood)?)
    }

    /// Completion counts for a month of `year`, or the whole year
    pub fn stats(&self, year: i32, month: Option<u32>) -> Result<PeriodStats, LibraryError> {
        let period = period_range(year, month)?;
        let counts = self.database.completed_counts_by_kind(&period)?;
        Ok(PeriodStats::from_counts(period, counts))
    }

    /// Persist an updated item, then patch the snapshot
    fn commit(&mut self, item: Item) -> Result<Item, LibraryError> {
        self.database.update_item(&item).map_err(|e| {
            tracing::warn!(id = ?item.id, error = %e, "update failed");
            e
        })?;
        if let Some(slot) = self.items.iter_mut().find(|i| i.id == item.id) {
            *slot = item.clone();
        }
        tracing::debug!(id = ?item.id, focused = item.is_focused, status = %item.status, "item updated");
        Ok(item)
    }
}

fn note_unknown_genre(item: &Item) {
    if let Some(genre) = item.genre.as_deref() {
        if !is_known_genre(genre) {
            tracing::info!(genre, title = %item.title, "genre outside the vocabulary");
        }
    }
}
