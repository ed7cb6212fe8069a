use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::Kind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("Invalid month {0} (expected 1-12)")]
    InvalidMonth(u32),
    #[error("Year {0} is out of range")]
    InvalidYear(i32),
}

/// Half-open date range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Range covering one month of `year`, or the whole year when `month` is `None`
pub fn period_range(year: i32, month: Option<u32>) -> Result<Period, PeriodError> {
    let first = |y: i32, m: u32| NaiveDate::from_ymd_opt(y, m, 1).ok_or(PeriodError::InvalidYear(y));

    match month {
        Some(m) if !(1..=12).contains(&m) => Err(PeriodError::InvalidMonth(m)),
        Some(12) => Ok(Period {
            start: first(year, 12)?,
            end: first(year + 1, 1)?,
        }),
        Some(m) => Ok(Period {
            start: first(year, m)?,
            end: first(year, m + 1)?,
        }),
        None => Ok(Period {
            start: first(year, 1)?,
            end: first(year + 1, 1)?,
        }),
    }
}

/// Completion counts for a period
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodStats {
    pub period: Period,
    pub total: u64,
    pub by_kind: BTreeMap<Kind, u64>,
}

impl PeriodStats {
    /// Build stats from per-kind counts; kinds that are missing count as zero
    pub fn from_counts(period: Period, counts: impl IntoIterator<Item = (Kind, u64)>) -> Self {
        let mut by_kind: BTreeMap<Kind, u64> = Kind::ALL.iter().map(|k| (*k, 0)).collect();
        for (kind, count) in counts {
            *by_kind.entry(kind).or_insert(0) += count;
        }
        let total = by_kind.values().sum();
        Self {
            period,
            total,
            by_kind,
        }
    }

    pub fn count(&self, kind: Kind) -> u64 {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn december_rolls_over() {
        let period = period_range(2023, Some(12)).unwrap();
        assert_eq!(period.start, date(2023, 12, 1));
        assert_eq!(period.end, date(2024, 1, 1));
    }

    #[test]
    fn regular_month() {
        let period = period_range(2024, Some(2)).unwrap();
        assert_eq!(period.start, date(2024, 2, 1));
        assert_eq!(period.end, date(2024, 3, 1));
    }

    #[test]
    fn whole_year() {
        let period = period_range(2024, None).unwrap();
        assert_eq!(period.start, date(2024, 1, 1));
        assert_eq!(period.end, date(2025, 1, 1));
    }

    #[test]
    fn invalid_month_rejected() {
        assert_eq!(period_range(2024, Some(0)), Err(PeriodError::InvalidMonth(0)));
        assert_eq!(period_range(2024, Some(13)), Err(PeriodError::InvalidMonth(13)));
    }

    #[test]
    fn empty_counts_are_all_zero() {
        let stats = PeriodStats::from_counts(period_range(2024, None).unwrap(), Vec::new());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.by_kind.len(), Kind::ALL.len());
        assert!(stats.by_kind.values().all(|c| *c == 0));
    }

    #[test]
    fn counts_are_totalled() {
        let stats = PeriodStats::from_counts(
            period_range(2024, Some(5)).unwrap(),
            vec![(Kind::Book, 3), (Kind::Film, 2), (Kind::Game, 1)],
        );
        assert_eq!(stats.total, 6);
        assert_eq!(stats.count(Kind::Book), 3);
        assert_eq!(stats.count(Kind::Album), 0);
    }
}
