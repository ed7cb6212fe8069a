//! Interactive session state: the active filter, the capped result set with
//! its progressively revealed window, and a single transient notice.

use std::time::{Duration, Instant};

use crate::filter::ItemFilter;
use crate::models::Item;

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const DEFAULT_NOTICE_TIMEOUT_SECS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    shown_at: Instant,
}

#[derive(Debug, Clone)]
pub struct Session {
    filter: ItemFilter,
    results: Vec<Item>,
    /// Total matching rows, which may exceed the cap
    matched: u64,
    revealed: usize,
    page_size: usize,
    /// A listing has been shown since the session started
    listed: bool,
    notice: Option<Notice>,
    notice_timeout: Duration,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, DEFAULT_NOTICE_TIMEOUT_SECS)
    }
}

impl Session {
    pub fn new(page_size: usize, notice_timeout_secs: u64) -> Self {
        Self {
            filter: ItemFilter::default(),
            results: Vec::new(),
            matched: 0,
            revealed: 0,
            page_size: page_size.max(1),
            listed: false,
            notice: None,
            notice_timeout: Duration::from_secs(notice_timeout_secs),
        }
    }

    pub fn filter(&self) -> &ItemFilter {
        &self.filter
    }

    /// Replace the filter. Returns false when nothing changed.
    pub fn set_filter(&mut self, filter: ItemFilter) -> bool {
        if filter == self.filter {
            return false;
        }
        self.filter = filter;
        true
    }

    /// Install a fresh result set and reset the reveal window to one page
    pub fn set_results(&mut self, results: Vec<Item>, matched: u64) {
        self.revealed = self.page_size.min(results.len());
        self.results = results;
        self.matched = matched;
        self.listed = true;
    }

    pub fn has_listing(&self) -> bool {
        self.listed
    }

    pub fn results(&self) -> &[Item] {
        &self.results
    }

    pub fn matched(&self) -> u64 {
        self.matched
    }

    /// True when the store holds more rows than the capped result set
    pub fn is_truncated(&self) -> bool {
        self.matched > self.results.len() as u64
    }

    pub fn visible(&self) -> &[Item] {
        &self.results[..self.revealed]
    }

    /// Reveal the next page; returns the newly visible rows
    pub fn reveal_more(&mut self) -> &[Item] {
        let start = self.revealed;
        self.revealed = (self.revealed + self.page_size).min(self.results.len());
        &self.results[start..self.revealed]
    }

    pub fn has_more(&self) -> bool {
        self.revealed < self.results.len()
    }

    pub fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notice = Some(Notice {
            level,
            message: message.into(),
            shown_at: Instant::now(),
        });
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Drop the notice once it has been shown for the configured timeout
    pub fn expire_notice_at(&mut self, now: Instant) {
        if let Some(notice) = &self.notice {
            if now.saturating_duration_since(notice.shown_at) >= self.notice_timeout {
                self.notice = None;
            }
        }
    }

    pub fn expire_notice(&mut self) {
        self.expire_notice_at(Instant::now());
    }
}
